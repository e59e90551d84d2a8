// TempWatch - Acknowledge Button
//
// Falling-edge GPIO interrupt (pull-up, active LOW).  The ISR only raises the
// edge flag; debouncing is done by the button task.  ESP-IDF disables the
// pin interrupt after each notification, so the task re-arms it once a
// press has been handled.

use std::sync::Arc;

use esp_idf_hal::gpio::{AnyInputPin, Input, InterruptType, PinDriver};

use crate::config::*;
use crate::drivers::ButtonSource;
use crate::sync::ButtonEdgeFlag;

pub struct EdgeButton {
    pin: PinDriver<'static, AnyInputPin, Input>,
}

impl EdgeButton {
    pub fn new(pin: AnyInputPin, edge: Arc<ButtonEdgeFlag>) -> anyhow::Result<Self> {
        let mut pin = PinDriver::input(pin)?;
        configure_pullup();
        pin.set_interrupt_type(InterruptType::NegEdge)?;

        // SAFETY: the callback runs in ISR context and only performs an
        // atomic store.
        unsafe {
            pin.subscribe(move || edge.raise())?;
        }
        pin.enable_interrupt()?;

        log::info!("Button on GPIO{} armed (falling edge)", PIN_BUTTON);
        Ok(Self { pin })
    }
}

impl ButtonSource for EdgeButton {
    fn rearm(&mut self) -> anyhow::Result<()> {
        self.pin.enable_interrupt()?;
        Ok(())
    }
}

/// Internal pull-up through the raw API; `PinDriver::set_pull` needs an
/// input/output pin type.
fn configure_pullup() {
    unsafe {
        esp_idf_sys::gpio_set_pull_mode(
            PIN_BUTTON,
            esp_idf_sys::gpio_pull_mode_t_GPIO_PULLUP_ONLY,
        );
    }
}
