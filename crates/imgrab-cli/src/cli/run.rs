//! The download run: prepare the output directory, drive the batch, render
//! progress, and handle ctrl-c teardown.

use anyhow::{Context, Result};
use imgrab_core::config::{ImgrabConfig, Input};
use imgrab_core::control::CancelFlag;
use imgrab_core::driver::{self, BatchRequest};
use imgrab_core::outdir;
use imgrab_core::progress::{JobOutcome, ProgressStats};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

pub(super) async fn run_batch_command(
    cfg: &ImgrabConfig,
    input: &Input,
    assume_yes: bool,
) -> Result<()> {
    let out_dir = PathBuf::from(&input.save_path);
    if out_dir.exists() && !assume_yes {
        println!("Output folder already exists. If you continue, the folder will be cleared.");
        println!("Press Enter to continue...");
        wait_for_enter();
    }
    outdir::prepare(&out_dir)?;

    let cancel = CancelFlag::new();
    spawn_interrupt_listener(cancel.clone());

    println!(
        "Downloading {} images ({} parallel downloads at most)",
        input.count, input.parallelism
    );

    let (events_tx, events_rx) = tokio::sync::mpsc::channel::<JobOutcome>(16);
    let progress_handle = spawn_progress_aggregator(
        events_rx,
        input.count,
        Duration::from_millis(cfg.progress_interval_ms),
    );

    let req = BatchRequest {
        url: cfg.source_url.clone(),
        count: input.count,
        parallelism: input.parallelism,
        out_dir: out_dir.clone(),
        fetch: cfg.fetch_options(),
    };
    let summary = driver::run_batch(&req, events_tx, &cancel).await?;
    let stats = progress_handle.await.context("progress task join")?;

    if cancel.is_requested() {
        println!();
        println!("Process is stopped by user.");
        println!("Clearing output folder...");
        outdir::teardown(&out_dir)?;
        println!("Done.");
        std::process::exit(130);
    }

    println!();
    if summary.failed > 0 {
        println!(
            "{} of {} images failed; see the log for details.",
            summary.failed, input.count
        );
    }
    tracing::info!(
        completed = stats.completed,
        failed = stats.failed,
        dir = %out_dir.display(),
        "run finished"
    );
    Ok(())
}

/// Sets the cancel flag on the first ctrl-c. Further ctrl-c presses during
/// teardown are ignored; the flag is one-shot.
fn spawn_interrupt_listener(cancel: CancelFlag) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, winding down transfers");
            cancel.request();
        }
    });
}

/// Single consumer of job outcomes: owns the counters and the console line.
fn spawn_progress_aggregator(
    mut events_rx: tokio::sync::mpsc::Receiver<JobOutcome>,
    total: usize,
    redraw_interval: Duration,
) -> tokio::task::JoinHandle<ProgressStats> {
    tokio::spawn(async move {
        let mut stats = ProgressStats::new(total);
        let mut last_draw: Option<Instant> = None;
        while let Some(outcome) = events_rx.recv().await {
            if let Err(e) = &outcome.result {
                println!();
                println!("image {} failed: {}", outcome.index + 1, e);
            }
            stats.record(&outcome.result);

            let due = last_draw.map_or(true, |t| t.elapsed() >= redraw_interval);
            if due || stats.all_done() {
                print!("\rProgress: {}/{}", stats.completed, stats.total);
                let _ = io::stdout().flush();
                last_draw = Some(Instant::now());
            }
            if stats.all_succeeded() {
                println!();
                println!("All images are downloaded.");
            }
        }
        stats
    })
}

fn wait_for_enter() {
    let mut line = String::new();
    let _ = io::stdin().read_line(&mut line);
}
