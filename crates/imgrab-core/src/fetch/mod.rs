//! Single image fetch: one GET transfer streaming the body to disk.
//!
//! Uses the curl crate (libcurl). The header callback captures response
//! headers so the file extension can be derived from `Content-Type`; the
//! write callback streams the body to a `.part` file which is renamed to
//! its final name once the transfer succeeds.

mod parse;

pub use parse::extension_from_content_type;

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str;
use std::time::Duration;

use crate::control::CancelFlag;

/// Temporary file suffix used before the final rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Per-transfer knobs taken from the app config.
#[derive(Debug, Clone, Copy)]
pub struct FetchOptions {
    /// TCP/TLS connect timeout.
    pub connect_timeout: Duration,
    /// Whole-transfer timeout.
    pub transfer_timeout: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
            transfer_timeout: Duration::from_secs(300),
        }
    }
}

/// Error from a single image fetch (curl failure, HTTP error, or disk
/// failure). Lets the driver classify outcomes per job instead of halting
/// sibling jobs.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// HTTP response had a non-2xx status.
    #[error("HTTP {0}")]
    BadStatus(u32),
    /// Curl reported an error (timeout, connection, TLS, etc.).
    #[error(transparent)]
    Transfer(#[from] curl::Error),
    /// File create/write/rename failed (e.g. disk full, permission denied).
    #[error("storage: {0}")]
    Storage(#[from] std::io::Error),
    /// The cancel flag was set while the transfer was in flight.
    #[error("transfer aborted by user")]
    Aborted,
}

/// Fetches `url` with a single GET and writes the body to
/// `dest_stem.<ext>`, where `<ext>` is derived from the response
/// `Content-Type`. Returns the final path.
///
/// The body streams to `dest_stem.part` first; the rename to the final name
/// only happens on success, so a failed or aborted transfer never leaves a
/// truncated image behind. The cancel flag is checked at every body chunk.
///
/// Runs a blocking curl transfer in the current thread; call from
/// `spawn_blocking` when used from async code.
pub fn fetch_image(
    url: &str,
    dest_stem: &Path,
    opts: FetchOptions,
    cancel: &CancelFlag,
) -> Result<PathBuf, FetchError> {
    let temp_path = temp_path(dest_stem);
    match transfer_to_file(url, &temp_path, opts, cancel) {
        Ok(content_type) => {
            let ext = parse::extension_from_content_type(content_type.as_deref());
            let final_path = dest_stem.with_extension(ext);
            std::fs::rename(&temp_path, &final_path)?;
            tracing::debug!(url, path = %final_path.display(), "fetched image");
            Ok(final_path)
        }
        Err(e) => {
            // Best-effort: don't leave a stale .part next to the run output.
            let _ = std::fs::remove_file(&temp_path);
            Err(e)
        }
    }
}

/// Path for the temp file: appends `.part` to the destination stem.
pub fn temp_path(dest_stem: &Path) -> PathBuf {
    let mut o = dest_stem.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Performs the GET, streaming the body to `temp_path`. Returns the
/// `Content-Type` of the final response, if any.
fn transfer_to_file(
    url: &str,
    temp_path: &Path,
    opts: FetchOptions,
    cancel: &CancelFlag,
) -> Result<Option<String>, FetchError> {
    let mut file = File::create(temp_path)?;

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(opts.connect_timeout)?;
    easy.timeout(opts.transfer_timeout)?;

    let mut headers: Vec<String> = Vec::new();
    let mut write_error: Option<std::io::Error> = None;

    let perform_result = {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(s) = str::from_utf8(data) {
                headers.push(s.trim_end().to_string());
            }
            true
        })?;
        transfer.write_function(|data| {
            if cancel.is_requested() {
                return Ok(0); // abort transfer
            }
            match file.write_all(data) {
                Ok(()) => Ok(data.len()),
                Err(e) => {
                    write_error = Some(e);
                    Ok(0)
                }
            }
        })?;
        transfer.perform()
    };

    if let Err(e) = perform_result {
        if cancel.is_requested() {
            return Err(FetchError::Aborted);
        }
        if let Some(io) = write_error {
            return Err(FetchError::Storage(io));
        }
        return Err(FetchError::Transfer(e));
    }

    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(FetchError::BadStatus(code));
    }

    Ok(parse::content_type(&headers))
}
