//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves a fixed body with a configurable status and `Content-Type`, and
//! records the peak number of requests in flight so tests can check the
//! driver's concurrency ceiling.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ImageServerOptions {
    /// Status code for every response.
    pub status: u16,
    /// `Content-Type` header value; `None` omits the header entirely.
    pub content_type: Option<String>,
    /// Delay before the response is written (makes concurrency observable).
    pub delay: Duration,
}

impl Default for ImageServerOptions {
    fn default() -> Self {
        Self {
            status: 200,
            content_type: Some("image/png".to_string()),
            delay: Duration::ZERO,
        }
    }
}

/// Handle to a running test server.
pub struct ImageServer {
    /// Base URL, e.g. `http://127.0.0.1:12345/`.
    pub url: String,
    peak: Arc<AtomicUsize>,
}

impl ImageServer {
    /// Highest number of simultaneously in-flight requests seen so far.
    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

/// Starts a server in a background thread serving `body` as `image/png`.
/// The server runs until the process exits.
pub fn start(body: Vec<u8>) -> ImageServer {
    start_with_options(body, ImageServerOptions::default())
}

/// Like `start` but with custom status, content type, or response delay.
pub fn start_with_options(body: Vec<u8>, opts: ImageServerOptions) -> ImageServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let body = Arc::new(body);
    let in_flight = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));
    let peak_handle = Arc::clone(&peak);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let body = Arc::clone(&body);
            let opts = opts.clone();
            let in_flight = Arc::clone(&in_flight);
            let peak = Arc::clone(&peak);
            thread::spawn(move || {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                handle(stream, &body, &opts);
                in_flight.fetch_sub(1, Ordering::SeqCst);
            });
        }
    });
    ImageServer {
        url: format!("http://127.0.0.1:{}/", port),
        peak: peak_handle,
    }
}

fn handle(mut stream: std::net::TcpStream, body: &[u8], opts: &ImageServerOptions) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(_) => {}
    }
    if !opts.delay.is_zero() {
        thread::sleep(opts.delay);
    }
    let reason = match opts.status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Status",
    };
    let content_type = opts
        .content_type
        .as_ref()
        .map(|ct| format!("Content-Type: {}\r\n", ct))
        .unwrap_or_default();
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\n{}Connection: close\r\n\r\n",
        opts.status,
        reason,
        body.len(),
        content_type
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.write_all(body);
}
