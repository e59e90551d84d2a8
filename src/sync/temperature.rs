// TempWatch - Shared Temperature Cell
//
// Latest published average, stored as raw f32 bits in an `AtomicU32` so a
// reader can never observe half of a write.

use std::sync::atomic::{AtomicU32, Ordering};

#[derive(Debug)]
pub struct SharedTemperature {
    bits: AtomicU32,
}

impl SharedTemperature {
    /// Starts at 0.0 °C, like every other piece of volatile state.
    pub const fn new() -> Self {
        Self { bits: AtomicU32::new(0) } // 0.0f32.to_bits() == 0
    }

    pub fn get(&self) -> f32 {
        f32::from_bits(self.bits.load(Ordering::Acquire))
    }

    /// Overwrite the current value.  Only the sampling task calls this.
    pub fn set(&self, celsius: f32) {
        self.bits.store(celsius.to_bits(), Ordering::Release);
    }
}

impl Default for SharedTemperature {
    fn default() -> Self {
        Self::new()
    }
}
