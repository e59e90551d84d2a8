// TempWatch - Hardware & System Configuration
// Target: Seeed Studio Xiao ESP32-C3 (RISC-V)

use std::time::Duration;

// ---------------------------------------------------------------------------
// GPIO Pin Definitions (Xiao ESP32-C3 pinout)
// ---------------------------------------------------------------------------
pub const PIN_BUTTON: i32 = 3;       // D1/A1 - Acknowledge button (INPUT_PULLUP, active LOW)
pub const PIN_BUZZER: i32 = 4;       // D2/A2 - Buzzer (LEDC PWM)
pub const PIN_I2C_SDA: i32 = 6;      // D4    - I2C data line
pub const PIN_I2C_SCL: i32 = 7;      // D5    - I2C clock line
pub const PIN_LED_RED: i32 = 21;     // D6
pub const PIN_LED_GREEN: i32 = 20;   // D7
pub const PIN_LED_BLUE: i32 = 10;    // D10
pub const PIN_SENSOR_ADC: u32 = 2;   // D0/A0 - Temperature sensor (ADC1 channel 2)

// ---------------------------------------------------------------------------
// I2C Bus
// ---------------------------------------------------------------------------
pub const I2C_ADDR_OLED: u8 = 0x3C;
pub const I2C_BAUDRATE_KHZ: u32 = 400;
pub const I2C_TIMEOUT_TICKS: u32 = 1000; // FreeRTOS ticks

// ---------------------------------------------------------------------------
// Display (SSD1306 OLED)
// ---------------------------------------------------------------------------
pub const SCREEN_WIDTH: u32 = 128;
pub const SCREEN_HEIGHT: u32 = 64;
pub const SCREEN_PAGES: u32 = SCREEN_HEIGHT / 8;
pub const DISPLAY_BUFFER_SIZE: usize = (SCREEN_WIDTH as usize * SCREEN_HEIGHT as usize) / 8; // 1024

pub const DISPLAY_TITLE: &str = "Temperatura";
pub const DISPLAY_TEXT_X: i32 = 5;
pub const DISPLAY_TITLE_Y: i32 = 0;
pub const DISPLAY_VALUE_Y: i32 = 16;

// ---------------------------------------------------------------------------
// Sampling / ADC conversion
// ---------------------------------------------------------------------------
pub const SAMPLES_PER_AVERAGE: usize = 20;
pub const ADC_MAX_CODE: u16 = 4095;
pub const ADC_REFERENCE_V: f32 = 3.3;
pub const ADC_RESOLUTION: f32 = 4096.0;   // 12-bit
pub const SENSOR_V_AT_27C: f32 = 0.706;
pub const SENSOR_SLOPE_V_PER_C: f32 = 0.001721;

/// Bench offset added to every converted sample (see the `temp-*` features).
pub const TEMPERATURE_OFFSET_C: f32 = {
    let high = if cfg!(feature = "temp-high") { 15.0 } else { 0.0 };
    let medium = if cfg!(feature = "temp-medium") { 5.0 } else { 0.0 };
    high + medium
};

// ---------------------------------------------------------------------------
// Thresholds (degrees Celsius)
// ---------------------------------------------------------------------------
pub const STATUS_YELLOW_FROM_C: f32 = 25.0;
pub const STATUS_RED_FROM_C: f32 = 35.0;
pub const ALARM_THRESHOLD_C: f32 = 35.0; // alarm raises strictly above

// ---------------------------------------------------------------------------
// Alarm output (buzzer)
// ---------------------------------------------------------------------------
pub const BUZZER_FREQ_HZ: u32 = 2000;
pub const BUZZER_ON_DUTY: u8 = 128;      // of 255
pub const BUZZER_OFF_DUTY: u8 = 0;

// ---------------------------------------------------------------------------
// Temperature channel
// ---------------------------------------------------------------------------
pub const CHANNEL_CAPACITY: usize = 20;

// ---------------------------------------------------------------------------
// Task priorities (FreeRTOS, higher preempts lower)
// ---------------------------------------------------------------------------
pub const PRIORITY_BUTTON: u8 = 4;
pub const PRIORITY_ALARM: u8 = 3;
pub const PRIORITY_SAMPLING: u8 = 1;
pub const PRIORITY_DISPLAY: u8 = 1;
pub const PRIORITY_STATUS: u8 = 1;

// ---------------------------------------------------------------------------
// Task Stack Sizes (bytes)
// ---------------------------------------------------------------------------
pub const STACK_SAMPLING: usize = 4096;
pub const STACK_DISPLAY: usize = 8192;
pub const STACK_STATUS: usize = 4096;
pub const STACK_BUTTON: usize = 4096;
pub const STACK_ALARM: usize = 4096;

// ---------------------------------------------------------------------------
// Timing (milliseconds)
// ---------------------------------------------------------------------------
pub const SAMPLE_INTERVAL_MS: u64 = 10;
pub const SAMPLING_PAUSE_MS: u64 = 1000;
pub const DISPLAY_HOLD_MS: u64 = 1000;
pub const STATUS_INTERVAL_MS: u64 = 500;
pub const BUTTON_POLL_MS: u64 = 50;
pub const DEBOUNCE_MS: u64 = 300;
pub const ALARM_POLL_MS: u64 = 200;

/// Task periods.  `Default` gives the production values; tests shorten them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Gap between two raw readings inside one averaging window.
    pub sample_interval: Duration,
    /// Pause after each published average.
    pub sampling_pause: Duration,
    /// How long a rendered value stays up before the next receive.
    pub display_hold: Duration,
    pub status_interval: Duration,
    pub button_poll: Duration,
    /// Window after an accepted press during which further edges are dropped.
    pub debounce: Duration,
    pub alarm_poll: Duration,
    /// Upper bound on the acknowledgment wait.  `None` waits forever.
    pub ack_timeout: Option<Duration>,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            sample_interval: Duration::from_millis(SAMPLE_INTERVAL_MS),
            sampling_pause: Duration::from_millis(SAMPLING_PAUSE_MS),
            display_hold: Duration::from_millis(DISPLAY_HOLD_MS),
            status_interval: Duration::from_millis(STATUS_INTERVAL_MS),
            button_poll: Duration::from_millis(BUTTON_POLL_MS),
            debounce: Duration::from_millis(DEBOUNCE_MS),
            alarm_poll: Duration::from_millis(ALARM_POLL_MS),
            ack_timeout: None,
        }
    }
}
