// TempWatch - Buzzer (LEDC PWM)
//
// The LEDC timer is only configured on `init`, once the alarm task knows the
// tone frequency.  Duty is given out of 255 and scaled to the timer
// resolution.

use anyhow::anyhow;
use esp_idf_hal::gpio::AnyOutputPin;
use esp_idf_hal::ledc::config::TimerConfig;
use esp_idf_hal::ledc::{LedcDriver, LedcTimerDriver, Resolution, CHANNEL0, TIMER0};
use esp_idf_hal::prelude::*;

use crate::drivers::AlarmOutput;

pub struct Buzzer {
    parts: Option<(TIMER0, CHANNEL0, AnyOutputPin)>,
    driver: Option<LedcDriver<'static>>,
}

impl Buzzer {
    pub fn new(timer: TIMER0, channel: CHANNEL0, pin: AnyOutputPin) -> Self {
        Self {
            parts: Some((timer, channel, pin)),
            driver: None,
        }
    }
}

impl AlarmOutput for Buzzer {
    fn init(&mut self, frequency_hz: u32) -> anyhow::Result<()> {
        let (timer, channel, pin) = self
            .parts
            .take()
            .ok_or_else(|| anyhow!("buzzer already initialised"))?;

        let config = TimerConfig::new()
            .frequency(frequency_hz.Hz().into())
            .resolution(Resolution::Bits8);
        let timer = LedcTimerDriver::new(timer, &config)?;
        let mut driver = LedcDriver::new(channel, timer, pin)?;
        driver.set_duty(0)?;

        log::info!("Buzzer PWM ready at {} Hz", frequency_hz);
        self.driver = Some(driver);
        Ok(())
    }

    fn set_level(&mut self, duty: u8) -> anyhow::Result<()> {
        let driver = self
            .driver
            .as_mut()
            .ok_or_else(|| anyhow!("buzzer not initialised"))?;
        let max = driver.get_max_duty();
        driver.set_duty(u32::from(duty) * max / 255)?;
        Ok(())
    }
}
