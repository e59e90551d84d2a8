// TempWatch - Button Edge Flag
//
// Set from the GPIO interrupt, cleared by the button task.  A single atomic
// bool, so raising it is safe from ISR context.

use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Default)]
pub struct ButtonEdgeFlag {
    pending: AtomicBool,
}

impl ButtonEdgeFlag {
    pub const fn new() -> Self {
        Self { pending: AtomicBool::new(false) }
    }

    /// Record a press edge.
    pub fn raise(&self) {
        self.pending.store(true, Ordering::Release);
    }

    /// Clear the flag, returning whether a press was pending.
    pub fn take(&self) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }
}
