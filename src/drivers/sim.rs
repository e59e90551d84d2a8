// TempWatch - Bench Board
//
// Stand-ins for the ESP32-C3 peripherals so the monitor can run on a
// development host.  The sensor sweeps a temperature profile through all three
// indicator bands and above the alarm threshold; everything else logs what the
// real hardware would show.  Press Enter to acknowledge the alarm.

use std::io::BufRead;
use std::sync::Arc;
use std::thread;

use anyhow::{anyhow, Context};

use crate::config::*;
use crate::drivers::framebuffer::FrameBuffer;
use crate::drivers::{AlarmOutput, ButtonSource, DisplaySink, IndicatorSink, Region, SensorSource};
use crate::sync::ButtonEdgeFlag;

/// Inverse of the sensor transfer function, rounded to the nearest code.
pub fn celsius_to_raw(celsius: f32) -> u16 {
    let volts = SENSOR_V_AT_27C - (celsius - 27.0) * SENSOR_SLOPE_V_PER_C;
    let code = (volts * ADC_RESOLUTION / ADC_REFERENCE_V).round();
    code.clamp(0.0, f32::from(ADC_MAX_CODE)) as u16
}

// ---------------------------------------------------------------------------
// Sensor: triangle wave between `low` and `high`
// ---------------------------------------------------------------------------
pub struct SimSensor {
    low: f32,
    high: f32,
    /// Averaging windows for one low -> high -> low sweep.
    period_windows: u32,
    reads: u32,
}

impl SimSensor {
    pub fn new(low: f32, high: f32, period_windows: u32) -> Self {
        Self {
            low,
            high,
            period_windows: period_windows.max(2),
            reads: 0,
        }
    }

    fn celsius_now(&self) -> f32 {
        let window = self.reads / SAMPLES_PER_AVERAGE as u32;
        let pos = (window % self.period_windows) as f32 / self.period_windows as f32;
        let tri = if pos < 0.5 { pos * 2.0 } else { (1.0 - pos) * 2.0 };
        self.low + (self.high - self.low) * tri
    }
}

impl Default for SimSensor {
    fn default() -> Self {
        Self::new(20.0, 40.0, 60)
    }
}

impl SensorSource for SimSensor {
    fn read_raw(&mut self) -> anyhow::Result<u16> {
        let raw = celsius_to_raw(self.celsius_now());
        self.reads = self.reads.wrapping_add(1);
        Ok(raw)
    }
}

// ---------------------------------------------------------------------------
// Display: real frame buffer, text mirrored to the log on flush
// ---------------------------------------------------------------------------
#[derive(Default)]
pub struct ConsoleDisplay {
    frame: FrameBuffer,
    lines: Vec<String>,
}

impl ConsoleDisplay {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DisplaySink for ConsoleDisplay {
    fn clear(&mut self) {
        self.frame.clear();
        self.lines.clear();
    }

    fn draw_text(&mut self, x: i32, y: i32, text: &str) -> anyhow::Result<()> {
        self.frame.draw_text(x, y, text);
        self.lines.push(text.to_owned());
        Ok(())
    }

    fn flush(&mut self, region: Region) -> anyhow::Result<()> {
        let bytes = self.frame.region_bytes(&region);
        log::info!(
            "[oled] {} ({} bytes, {} px lit)",
            self.lines.join(" | "),
            bytes.len(),
            self.frame.lit_pixels()
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Indicator
// ---------------------------------------------------------------------------
#[derive(Default)]
pub struct LogIndicator {
    current: Option<(bool, bool, bool)>,
}

impl LogIndicator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IndicatorSink for LogIndicator {
    fn set_state(&mut self, red: bool, green: bool, blue: bool) -> anyhow::Result<()> {
        let state = (red, green, blue);
        if self.current != Some(state) {
            log::info!("[led] R:{} G:{} B:{}", red as u8, green as u8, blue as u8);
            self.current = Some(state);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Buzzer
// ---------------------------------------------------------------------------
#[derive(Default)]
pub struct LogBuzzer {
    frequency_hz: Option<u32>,
    duty: u8,
}

impl LogBuzzer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AlarmOutput for LogBuzzer {
    fn init(&mut self, frequency_hz: u32) -> anyhow::Result<()> {
        if frequency_hz == 0 {
            return Err(anyhow!("buzzer frequency must be non-zero"));
        }
        self.frequency_hz = Some(frequency_hz);
        self.duty = BUZZER_OFF_DUTY;
        log::info!("[buzzer] ready at {} Hz", frequency_hz);
        Ok(())
    }

    fn set_level(&mut self, duty: u8) -> anyhow::Result<()> {
        let hz = self.frequency_hz.ok_or_else(|| anyhow!("buzzer not initialised"))?;
        if duty != self.duty {
            if duty == BUZZER_OFF_DUTY {
                log::info!("[buzzer] off");
            } else {
                log::warn!("[buzzer] ON ({} Hz, duty {}/255) - press Enter to acknowledge", hz, duty);
            }
            self.duty = duty;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Button: every line on stdin is one press edge
// ---------------------------------------------------------------------------
pub struct StdinButton;

impl StdinButton {
    /// Start the stdin reader that raises `edge` for each line.
    pub fn spawn(edge: Arc<ButtonEdgeFlag>) -> anyhow::Result<Self> {
        thread::Builder::new()
            .name("stdin-button".into())
            .spawn(move || {
                let presses = relay_presses(std::io::stdin().lock(), &edge);
                log::warn!("stdin closed after {} presses - button input disabled", presses);
            })
            .context("spawning stdin button reader")?;
        Ok(Self)
    }
}

/// Raise `edge` once per line read from `input`, until end of input.  Lines
/// are raw bytes, so text that is not UTF-8 still counts as a press; read
/// errors other than EOF are logged and skipped.
pub fn relay_presses<R: BufRead>(mut input: R, edge: &ButtonEdgeFlag) -> usize {
    let mut line = Vec::new();
    let mut presses = 0;
    loop {
        line.clear();
        match input.read_until(b'\n', &mut line) {
            Ok(0) => return presses,
            Ok(_) => {
                edge.raise();
                presses += 1;
            }
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => {
                log::warn!("stdin read error: {}", e);
                return presses;
            }
        }
    }
}

impl ButtonSource for StdinButton {
    fn rearm(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}
