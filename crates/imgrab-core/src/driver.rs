//! Run a batch of image downloads with a bounded number of transfers in
//! flight.
//!
//! Keeps up to `parallelism` fetches running at once; when one finishes,
//! the next pending index is started until the batch is exhausted. Every
//! spawned task is awaited before returning, even after cancellation.

use anyhow::Result;
use std::path::PathBuf;
use tokio::sync::mpsc::Sender;

use crate::control::CancelFlag;
use crate::fetch::{self, FetchError, FetchOptions};
use crate::progress::JobOutcome;

/// Parameters for one batch run. Immutable for the run's duration.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    /// Endpoint every image is fetched from.
    pub url: String,
    /// Number of images to download.
    pub count: usize,
    /// Maximum transfers in flight at once.
    pub parallelism: usize,
    /// Directory receiving `1.<ext> .. count.<ext>`.
    pub out_dir: PathBuf,
    /// Per-transfer timeouts.
    pub fetch: FetchOptions,
}

/// Tally of how the batch ended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub completed: usize,
    pub failed: usize,
    pub aborted: usize,
}

/// Runs `req.count` download jobs with at most `req.parallelism` in flight.
///
/// Each job's outcome (success or failure) is sent to `events`; a failed
/// job is tallied and its siblings keep running. Once `cancel` is set,
/// in-flight transfers abort at their next I/O checkpoint and pending jobs
/// are never started; jobs that were skipped that way are counted as
/// aborted in the summary without an event.
pub async fn run_batch(
    req: &BatchRequest,
    events: Sender<JobOutcome>,
    cancel: &CancelFlag,
) -> Result<BatchSummary> {
    let parallelism = req.parallelism.max(1);
    let mut summary = BatchSummary::default();
    let mut next_index = 0usize;
    let mut join_set = tokio::task::JoinSet::new();

    loop {
        while join_set.len() < parallelism
            && next_index < req.count
            && !cancel.is_requested()
        {
            let index = next_index;
            next_index += 1;
            let url = req.url.clone();
            let dest_stem = req.out_dir.join((index + 1).to_string());
            let opts = req.fetch;
            let cancel = cancel.clone();
            join_set.spawn(async move {
                let result = spawn_fetch(url, dest_stem, opts, cancel).await;
                JobOutcome { index, result }
            });
        }

        if join_set.is_empty() {
            break;
        }

        let Some(res) = join_set.join_next().await else {
            break;
        };
        let outcome = res.map_err(|e| anyhow::anyhow!("download task join: {}", e))?;
        match &outcome.result {
            Ok(path) => {
                tracing::debug!(index = outcome.index, path = %path.display(), "job completed");
                summary.completed += 1;
            }
            Err(FetchError::Aborted) => {
                tracing::debug!(index = outcome.index, "job aborted");
                summary.aborted += 1;
            }
            Err(e) => {
                tracing::warn!(index = outcome.index, error = %e, "job failed");
                summary.failed += 1;
            }
        }
        let _ = events.send(outcome).await;
    }

    // Jobs never started because of cancellation.
    summary.aborted += req.count.saturating_sub(next_index);

    tracing::info!(
        completed = summary.completed,
        failed = summary.failed,
        aborted = summary.aborted,
        "batch finished"
    );
    Ok(summary)
}

/// Runs one blocking curl transfer on the blocking pool.
async fn spawn_fetch(
    url: String,
    dest_stem: PathBuf,
    opts: FetchOptions,
    cancel: CancelFlag,
) -> Result<PathBuf, FetchError> {
    match tokio::task::spawn_blocking(move || fetch::fetch_image(&url, &dest_stem, opts, &cancel))
        .await
    {
        Ok(result) => result,
        Err(e) => Err(FetchError::Storage(std::io::Error::other(e))),
    }
}
