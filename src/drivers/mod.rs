// TempWatch - Peripheral Contracts
//
// The tasks only ever talk to hardware through these traits.  The ESP-IDF
// board implements them on real peripherals; the bench board (any other
// target) implements them with logging stand-ins.

use std::ops::RangeInclusive;

use crate::config::{SCREEN_PAGES, SCREEN_WIDTH};

pub mod framebuffer;

#[cfg(target_os = "espidf")]
pub mod adc;
#[cfg(target_os = "espidf")]
pub mod button;
#[cfg(target_os = "espidf")]
pub mod buzzer;
#[cfg(target_os = "espidf")]
pub mod oled;
#[cfg(target_os = "espidf")]
pub mod rgb_led;

#[cfg(not(target_os = "espidf"))]
pub mod sim;

/// Source of raw 12-bit temperature sensor codes.
pub trait SensorSource: Send {
    fn read_raw(&mut self) -> anyhow::Result<u16>;
}

/// Part of the display to push out on flush, in SSD1306 column/page units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub columns: RangeInclusive<u8>,
    pub pages: RangeInclusive<u8>,
}

impl Region {
    pub fn full() -> Self {
        Self {
            columns: 0..=(SCREEN_WIDTH - 1) as u8,
            pages: 0..=(SCREEN_PAGES - 1) as u8,
        }
    }

    /// Intersection with the screen, or `None` if nothing of it is visible.
    pub fn clamped(&self) -> Option<Self> {
        let last_column = (SCREEN_WIDTH - 1) as u8;
        let last_page = (SCREEN_PAGES - 1) as u8;
        let columns = *self.columns.start()..=(*self.columns.end()).min(last_column);
        let pages = *self.pages.start()..=(*self.pages.end()).min(last_page);
        if columns.is_empty() || pages.is_empty() {
            return None;
        }
        Some(Self { columns, pages })
    }
}

pub trait DisplaySink: Send {
    fn clear(&mut self);
    /// Draw `text` with its top-left corner at (`x`, `y`).
    fn draw_text(&mut self, x: i32, y: i32, text: &str) -> anyhow::Result<()>;
    fn flush(&mut self, region: Region) -> anyhow::Result<()>;
}

/// RGB status light.
pub trait IndicatorSink: Send {
    fn set_state(&mut self, red: bool, green: bool, blue: bool) -> anyhow::Result<()>;
}

/// PWM-driven alarm (buzzer).  The driver owns its pin.
pub trait AlarmOutput: Send {
    fn init(&mut self, frequency_hz: u32) -> anyhow::Result<()>;
    /// Duty cycle out of 255; 0 silences the output.
    fn set_level(&mut self, duty: u8) -> anyhow::Result<()>;
}

/// Edge source behind the [`ButtonEdgeFlag`](crate::sync::ButtonEdgeFlag).
pub trait ButtonSource: Send {
    /// Re-enable edge detection after a press has been consumed.
    fn rearm(&mut self) -> anyhow::Result<()>;
}
