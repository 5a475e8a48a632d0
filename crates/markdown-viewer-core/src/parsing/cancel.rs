use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cooperative stop flag shared between a consumer and an element sequence.
///
/// Sequences look at it only between blocks, so a block that has started
/// parsing is always delivered in full.
#[derive(Debug, Clone, Default)]
pub struct Cancellation(Arc<AtomicBool>);

impl Cancellation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}
