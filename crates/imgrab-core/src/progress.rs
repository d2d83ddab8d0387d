//! Batch progress: per-job outcome events and the aggregate counters behind
//! the terminal progress line.
//!
//! Workers never touch the console. Each finished job sends one
//! `JobOutcome` over a channel and a single aggregator task owns the
//! counters and the rendering, so increments are never lost and console
//! writes never interleave.

use std::path::PathBuf;

use crate::fetch::FetchError;

/// Result of one finished download job, sent over the progress channel.
#[derive(Debug)]
pub struct JobOutcome {
    /// Zero-based job index; the file on disk is `{index + 1}.<ext>`.
    pub index: usize,
    /// Final path on success, the classified error otherwise.
    pub result: Result<PathBuf, FetchError>,
}

/// Aggregate counters for a batch. Counts only move forward and their sum
/// never exceeds `total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressStats {
    /// Jobs that produced a file.
    pub completed: usize,
    /// Jobs that failed (bad status, transfer or disk error).
    pub failed: usize,
    /// Jobs cut short by cancellation.
    pub aborted: usize,
    /// Total number of jobs in the batch.
    pub total: usize,
}

impl ProgressStats {
    pub fn new(total: usize) -> Self {
        Self {
            completed: 0,
            failed: 0,
            aborted: 0,
            total,
        }
    }

    /// Record one job outcome.
    pub fn record(&mut self, result: &Result<PathBuf, FetchError>) {
        debug_assert!(self.finished() < self.total, "more outcomes than jobs");
        match result {
            Ok(_) => self.completed += 1,
            Err(FetchError::Aborted) => self.aborted += 1,
            Err(_) => self.failed += 1,
        }
    }

    /// Number of jobs accounted for so far.
    pub fn finished(&self) -> usize {
        self.completed + self.failed + self.aborted
    }

    /// True once every job in the batch has an outcome.
    pub fn all_done(&self) -> bool {
        self.finished() >= self.total
    }

    /// True when the whole batch completed without failures or aborts.
    pub fn all_succeeded(&self) -> bool {
        self.completed == self.total
    }

    /// Fraction complete in [0.0, 1.0], counting only successful jobs.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        (self.completed as f64 / self.total as f64).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn ok() -> Result<PathBuf, FetchError> {
        Ok(Path::new("out/1.png").to_path_buf())
    }

    #[test]
    fn counters_classify_outcomes() {
        let mut stats = ProgressStats::new(4);
        stats.record(&ok());
        stats.record(&Err(FetchError::BadStatus(404)));
        stats.record(&Err(FetchError::Aborted));
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.aborted, 1);
        assert_eq!(stats.finished(), 3);
        assert!(!stats.all_done());

        stats.record(&ok());
        assert!(stats.all_done());
        assert!(!stats.all_succeeded());
    }

    #[test]
    fn counters_never_exceed_total() {
        let mut stats = ProgressStats::new(2);
        stats.record(&ok());
        stats.record(&ok());
        assert!(stats.all_done());
        assert!(stats.all_succeeded());
        assert_eq!(stats.finished(), stats.total);
        assert!((stats.fraction() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn empty_batch_is_done_immediately() {
        let stats = ProgressStats::new(0);
        assert!(stats.all_done());
        assert!((stats.fraction() - 1.0).abs() < 1e-9);
    }
}
