// TempWatch - Alarm Acknowledgment Latch
//
// Binary semaphore: one token at most.  The button task releases it, the
// alarm task consumes it.  Releasing an already available latch changes
// nothing, so a burst of presses still only acknowledges once.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

#[derive(Debug, Default)]
pub struct AlarmLatch {
    available: Mutex<bool>,
    cond: Condvar,
}

impl AlarmLatch {
    /// Created taken (unavailable).
    pub const fn new() -> Self {
        Self {
            available: Mutex::new(false),
            cond: Condvar::new(),
        }
    }

    // A poisoned lock still guards a plain bool that is always valid.
    fn lock(&self) -> MutexGuard<'_, bool> {
        self.available.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make the token available.  Saturates: no counting.
    pub fn release(&self) {
        let mut available = self.lock();
        *available = true;
        self.cond.notify_one();
    }

    /// Block until the token is available, then take it.
    pub fn acquire(&self) {
        let mut available = self
            .cond
            .wait_while(self.lock(), |available| !*available)
            .unwrap_or_else(PoisonError::into_inner);
        *available = false;
    }

    /// Like [`acquire`](Self::acquire) but gives up after `timeout`.
    /// Returns `true` when the token was taken.
    pub fn acquire_timeout(&self, timeout: Duration) -> bool {
        let (mut available, _) = self
            .cond
            .wait_timeout_while(self.lock(), timeout, |available| !*available)
            .unwrap_or_else(PoisonError::into_inner);
        let taken = *available;
        *available = false;
        taken
    }

    /// Take the token if it is there, without waiting.
    pub fn try_acquire(&self) -> bool {
        std::mem::replace(&mut *self.lock(), false)
    }

    pub fn is_available(&self) -> bool {
        *self.lock()
    }
}
