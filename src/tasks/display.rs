// TempWatch - Display Task
//
// Sole consumer of the temperature channel.  Waits for the next average,
// redraws the two-line screen and holds it before receiving again.

use std::thread;

use crate::config::*;
use crate::drivers::{DisplaySink, Region};
use crate::sync::{Disconnected, TemperatureReceiver};

pub struct DisplayTask<D> {
    display: D,
    rx: TemperatureReceiver,
    timing: Timing,
}

impl<D: DisplaySink> DisplayTask<D> {
    pub fn new(display: D, rx: TemperatureReceiver, timing: Timing) -> Self {
        Self { display, rx, timing }
    }

    /// Title on the first line, value on the second.
    pub fn show(&mut self, celsius: f32) -> anyhow::Result<()> {
        self.display.clear();
        self.display.draw_text(DISPLAY_TEXT_X, DISPLAY_TITLE_Y, DISPLAY_TITLE)?;
        self.display
            .draw_text(DISPLAY_TEXT_X, DISPLAY_VALUE_Y, &format!("Valor: {:.2} °C", celsius))?;
        self.display.flush(Region::full())
    }

    /// Block for one reading and render it.
    pub fn step(&mut self) -> Result<f32, Disconnected> {
        let celsius = self.rx.recv()?;
        if let Err(e) = self.show(celsius) {
            log::warn!("Display error: {}", e);
        }
        Ok(celsius)
    }

    pub fn run(mut self) {
        log::info!("Display task started");

        loop {
            if self.step().is_err() {
                log::warn!("Temperature channel closed - exiting display task");
                return;
            }
            thread::sleep(self.timing.display_hold);
        }
    }
}
