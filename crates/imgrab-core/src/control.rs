//! Run cancellation: a shared flag set by the interrupt handler and observed
//! by in-flight transfers at their I/O checkpoints.
//!
//! The CLI sets the flag on ctrl-c; the driver stops starting new jobs and
//! every transfer's write callback aborts at the next chunk. Teardown of the
//! output directory only happens after all transfers have wound down, so the
//! delete never races an in-flight write.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable cancellation flag shared between the interrupt handler, the
/// driver, and every transfer.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent; one-shot (there is no way back to
    /// a running state).
    pub fn request(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// True once cancellation has been requested.
    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_flag_is_shared_between_clones() {
        let flag = CancelFlag::new();
        let observer = flag.clone();
        assert!(!observer.is_requested());
        flag.request();
        assert!(observer.is_requested());
        // A second request changes nothing.
        flag.request();
        assert!(observer.is_requested());
    }
}
