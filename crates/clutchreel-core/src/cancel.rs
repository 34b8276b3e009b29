// crates/clutchreel-core/src/cancel.rs
//
// A single shared cancellation token passed into every stage, replacing the
// per-component boolean flags the design notes (§9) call out as a source of
// "cancel a component but not the pipeline" drift. Cheap to clone, cheap to
// poll, idempotent to trip.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::PipelineError;

#[derive(Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Poll at a suspension point; returns `Err(PipelineError::Cancelled)` the
    /// moment the token has tripped. Every `await`/sleep/retry point in the
    /// pipeline calls this.
    pub fn check(&self) -> Result<(), PipelineError> {
        if self.is_cancelled() { Err(PipelineError::Cancelled) } else { Ok(()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_ok_until_cancelled() {
        let t = CancellationToken::new();
        assert!(t.check().is_ok());
        t.cancel();
        assert!(t.check().is_err());
    }

    #[test]
    fn cancel_is_idempotent_and_shared_across_clones() {
        let t = CancellationToken::new();
        let clone = t.clone();
        t.cancel();
        t.cancel();
        assert!(clone.is_cancelled());
    }
}
