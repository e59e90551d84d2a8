// TempWatch - Status Task
//
// Mirrors the shared temperature onto the RGB indicator.  Reads the shared
// cell, never the channel, so it cannot take readings away from the display.

use std::sync::Arc;
use std::thread;

use crate::config::Timing;
use crate::drivers::IndicatorSink;
use crate::events::IndicatorColor;
use crate::sync::SharedTemperature;

pub struct StatusTask<I> {
    indicator: I,
    temperature: Arc<SharedTemperature>,
    timing: Timing,
    shown: Option<IndicatorColor>,
}

impl<I: IndicatorSink> StatusTask<I> {
    pub fn new(indicator: I, temperature: Arc<SharedTemperature>, timing: Timing) -> Self {
        Self { indicator, temperature, timing, shown: None }
    }

    /// Apply the color for the current temperature and return it.
    pub fn step(&mut self) -> IndicatorColor {
        let color = IndicatorColor::from_temperature(self.temperature.get());
        let (r, g, b) = color.rgb();

        match self.indicator.set_state(r, g, b) {
            Ok(()) => {
                if self.shown != Some(color) {
                    log::debug!("Status -> {:?}", color);
                }
                self.shown = Some(color);
            }
            Err(e) => {
                log::warn!("Indicator error: {}", e);
                self.shown = None;
            }
        }
        color
    }

    pub fn run(mut self) {
        log::info!("Status task started");

        loop {
            self.step();
            thread::sleep(self.timing.status_interval);
        }
    }
}
