// TempWatch - RGB Status LED
//
// Three active-high GPIOs.

use esp_idf_hal::gpio::{AnyOutputPin, Output, PinDriver};

use crate::drivers::IndicatorSink;

pub struct RgbLed {
    red: PinDriver<'static, AnyOutputPin, Output>,
    green: PinDriver<'static, AnyOutputPin, Output>,
    blue: PinDriver<'static, AnyOutputPin, Output>,
}

impl RgbLed {
    pub fn new(red: AnyOutputPin, green: AnyOutputPin, blue: AnyOutputPin) -> anyhow::Result<Self> {
        let mut led = Self {
            red: PinDriver::output(red)?,
            green: PinDriver::output(green)?,
            blue: PinDriver::output(blue)?,
        };
        led.set_state(false, false, false)?;
        Ok(led)
    }
}

impl IndicatorSink for RgbLed {
    fn set_state(&mut self, red: bool, green: bool, blue: bool) -> anyhow::Result<()> {
        self.red.set_level(red.into())?;
        self.green.set_level(green.into())?;
        self.blue.set_level(blue.into())?;
        Ok(())
    }
}
