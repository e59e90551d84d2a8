// TempWatch - Sampling Task
//
// Reads the temperature sensor 20 times at a fixed cadence, averages the
// converted readings, publishes the mean to the shared cell and queues it for
// the display.  The send blocks while the display is behind.

use std::sync::Arc;
use std::thread;

use crate::config::*;
use crate::drivers::SensorSource;
use crate::sync::{Disconnected, SharedTemperature, TemperatureSender};

/// Sensor transfer function: 12-bit code -> degrees Celsius.
pub fn raw_to_celsius(raw: u16) -> f32 {
    let volts = f32::from(raw) * ADC_REFERENCE_V / ADC_RESOLUTION;
    27.0 - (volts - SENSOR_V_AT_27C) / SENSOR_SLOPE_V_PER_C
}

pub struct SamplingTask<S> {
    sensor: S,
    temperature: Arc<SharedTemperature>,
    tx: TemperatureSender,
    timing: Timing,
}

impl<S: SensorSource> SamplingTask<S> {
    pub fn new(
        sensor: S,
        temperature: Arc<SharedTemperature>,
        tx: TemperatureSender,
        timing: Timing,
    ) -> Self {
        Self { sensor, temperature, tx, timing }
    }

    /// Take one averaging window.  Returns `None` if no reading in the window
    /// was usable.
    pub fn sample_window(&mut self) -> Option<f32> {
        let mut sum = 0.0f32;
        let mut count = 0usize;

        for _ in 0..SAMPLES_PER_AVERAGE {
            match self.sensor.read_raw() {
                Ok(raw) if raw <= ADC_MAX_CODE => {
                    sum += raw_to_celsius(raw) + TEMPERATURE_OFFSET_C;
                    count += 1;
                }
                Ok(raw) => log::warn!("Sensor code {} out of 12-bit range - skipped", raw),
                Err(e) => log::warn!("Sensor read error: {}", e),
            }
            thread::sleep(self.timing.sample_interval);
        }

        (count > 0).then(|| sum / count as f32)
    }

    /// One full cycle: sample, publish, queue.  Returns the published mean.
    pub fn cycle(&mut self) -> Result<Option<f32>, Disconnected> {
        let Some(mean) = self.sample_window() else {
            log::warn!("No valid sensor readings this window");
            return Ok(None);
        };

        log::info!("Temperatura média ({} amostras): {:.2} °C", SAMPLES_PER_AVERAGE, mean);

        self.temperature.set(mean);
        self.tx.send(mean)?;
        Ok(Some(mean))
    }

    pub fn run(mut self) {
        log::info!("Sampling task started");

        loop {
            if self.cycle().is_err() {
                // Display task has exited.
                log::warn!("Temperature channel closed - exiting sampling task");
                return;
            }
            thread::sleep(self.timing.sampling_pause);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::temperature_channel;
    use anyhow::anyhow;
    use std::time::Duration;

    /// Replays `codes` in a loop; `None` entries fail the read.
    struct ScriptedSensor {
        codes: Vec<Option<u16>>,
        next: usize,
    }

    impl ScriptedSensor {
        fn new(codes: Vec<Option<u16>>) -> Self {
            Self { codes, next: 0 }
        }
    }

    impl SensorSource for ScriptedSensor {
        fn read_raw(&mut self) -> anyhow::Result<u16> {
            let code = self.codes[self.next % self.codes.len()];
            self.next += 1;
            code.ok_or_else(|| anyhow!("bus glitch"))
        }
    }

    fn fast() -> Timing {
        Timing {
            sample_interval: Duration::ZERO,
            sampling_pause: Duration::ZERO,
            ..Timing::default()
        }
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn conversion_follows_transfer_function() {
        // 819 * 3.3 / 4096 = 0.6598 V
        assert!((raw_to_celsius(819) - 53.82).abs() < 0.01);
        // 0.706 V is 27 °C by definition.
        let raw_at_27 = (SENSOR_V_AT_27C * ADC_RESOLUTION / ADC_REFERENCE_V).round() as u16;
        assert!((raw_to_celsius(raw_at_27) - 27.0).abs() < 0.5);
        // Higher voltage means cooler.
        assert!(raw_to_celsius(900) < raw_to_celsius(850));
    }

    #[test]
    fn window_mean_is_mean_of_converted_readings() {
        let codes: Vec<u16> = (0..SAMPLES_PER_AVERAGE as u16).map(|i| 850 + i * 3).collect();
        let expected = codes.iter().map(|&c| raw_to_celsius(c) + TEMPERATURE_OFFSET_C).sum::<f32>()
            / SAMPLES_PER_AVERAGE as f32;

        let (tx, _rx) = temperature_channel(CHANNEL_CAPACITY);
        let sensor = ScriptedSensor::new(codes.into_iter().map(Some).collect());
        let mut task = SamplingTask::new(sensor, Arc::new(SharedTemperature::new()), tx, fast());

        let mean = task.sample_window().unwrap();
        assert!(approx(mean, expected), "{mean} != {expected}");
    }

    #[test]
    fn bad_readings_are_left_out_of_the_mean() {
        let (tx, _rx) = temperature_channel(CHANNEL_CAPACITY);
        let sensor = ScriptedSensor::new(vec![Some(860), None, Some(5000), Some(860)]);
        let mut task = SamplingTask::new(sensor, Arc::new(SharedTemperature::new()), tx, fast());

        let mean = task.sample_window().unwrap();
        assert!(approx(mean, raw_to_celsius(860) + TEMPERATURE_OFFSET_C));
    }

    #[test]
    fn window_without_valid_readings_publishes_nothing() {
        let (tx, rx) = temperature_channel(CHANNEL_CAPACITY);
        let shared = Arc::new(SharedTemperature::new());
        let sensor = ScriptedSensor::new(vec![None]);
        let mut task = SamplingTask::new(sensor, Arc::clone(&shared), tx, fast());

        assert_eq!(task.cycle(), Ok(None));
        assert_eq!(shared.get(), 0.0);
        assert_eq!(rx.recv_timeout(Duration::from_millis(10)), Ok(None));
    }

    #[test]
    fn cycle_publishes_and_queues_the_same_value() {
        let (tx, rx) = temperature_channel(CHANNEL_CAPACITY);
        let shared = Arc::new(SharedTemperature::new());
        let sensor = ScriptedSensor::new(vec![Some(870)]);
        let mut task = SamplingTask::new(sensor, Arc::clone(&shared), tx, fast());

        let mean = task.cycle().unwrap().unwrap();
        assert_eq!(shared.get(), mean);
        assert_eq!(rx.recv(), Ok(mean));
    }

    #[test]
    fn cycle_reports_a_closed_channel() {
        let (tx, rx) = temperature_channel(CHANNEL_CAPACITY);
        drop(rx);
        let sensor = ScriptedSensor::new(vec![Some(870)]);
        let mut task = SamplingTask::new(sensor, Arc::new(SharedTemperature::new()), tx, fast());
        assert_eq!(task.cycle(), Err(Disconnected));
    }
}
