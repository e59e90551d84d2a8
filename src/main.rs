// TempWatch - Firmware Entry Point
//
// Boot sequence:
//   1. Initialise logging.
//   2. Bring up the board: sensor ADC, OLED, RGB LED, buzzer pins, button ISR.
//   3. Spawn the five monitor tasks (button > alarm > sampling = display = status).
//   4. Park the main task forever.  There is no shutdown path.
//
// On ESP-IDF the tasks run on real peripherals.  On any other target the bench
// board stands in, so the monitor can be watched from a terminal.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tempwatch::config::*;
use tempwatch::sync::ButtonEdgeFlag;

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------
fn main() -> anyhow::Result<()> {
    init_logging();
    log::info!("TempWatch firmware starting…");
    if TEMPERATURE_OFFSET_C != 0.0 {
        log::warn!("Bench offset active: +{:.1} °C on every sample", TEMPERATURE_OFFSET_C);
    }

    // The ISR needs the flag before the button driver exists.
    let edge = Arc::new(ButtonEdgeFlag::new());

    let board = board::take(Arc::clone(&edge))?;
    tempwatch::start(board, edge, CHANNEL_CAPACITY, Timing::default())?;
    log::info!("Boot complete - monitoring");

    // Main thread has nothing left to do - park it forever.
    // (All work happens in the spawned tasks.)
    loop {
        thread::sleep(Duration::from_secs(60));
    }
}

#[cfg(target_os = "espidf")]
fn init_logging() {
    // Link esp-idf-sys runtime patches and initialise logging.
    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();
}

#[cfg(not(target_os = "espidf"))]
fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

// ---------------------------------------------------------------------------
// Board bring-up
// ---------------------------------------------------------------------------
#[cfg(target_os = "espidf")]
mod board {
    use std::sync::Arc;

    use esp_idf_hal::gpio::{InputPin, OutputPin};
    use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
    use esp_idf_hal::prelude::*;

    use tempwatch::config::*;
    use tempwatch::drivers::adc::AdcSensor;
    use tempwatch::drivers::button::EdgeButton;
    use tempwatch::drivers::buzzer::Buzzer;
    use tempwatch::drivers::oled::OledDisplay;
    use tempwatch::drivers::rgb_led::RgbLed;
    use tempwatch::sync::ButtonEdgeFlag;
    use tempwatch::Board;

    pub type EspBoard = Board<AdcSensor, OledDisplay, RgbLed, Buzzer, EdgeButton>;

    pub fn take(edge: Arc<ButtonEdgeFlag>) -> anyhow::Result<EspBoard> {
        let peripherals = Peripherals::take()?;
        let pins = peripherals.pins;

        // ---- Sensor ---------------------------------------------------------
        let sensor = AdcSensor::new()?;

        // ---- OLED on I2C (SDA GPIO6, SCL GPIO7) -----------------------------
        let i2c_config = I2cConfig::new().baudrate(I2C_BAUDRATE_KHZ.kHz().into());
        let i2c = I2cDriver::new(peripherals.i2c0, pins.gpio6, pins.gpio7, &i2c_config)?;
        let mut display = OledDisplay::new(i2c);
        if !display.is_connected() {
            log::error!("OLED not answering at 0x{:02X}", I2C_ADDR_OLED);
        }
        display.init()?;

        // ---- Indicator, buzzer, button --------------------------------------
        let indicator = RgbLed::new(
            pins.gpio21.downgrade_output(),
            pins.gpio20.downgrade_output(),
            pins.gpio10.downgrade_output(),
        )?;
        let alarm = Buzzer::new(
            peripherals.ledc.timer0,
            peripherals.ledc.channel0,
            pins.gpio4.downgrade_output(),
        );
        let button = EdgeButton::new(pins.gpio3.downgrade_input(), edge)?;

        Ok(Board { sensor, display, indicator, alarm, button })
    }
}

#[cfg(not(target_os = "espidf"))]
mod board {
    use std::sync::Arc;

    use tempwatch::drivers::sim::{ConsoleDisplay, LogBuzzer, LogIndicator, SimSensor, StdinButton};
    use tempwatch::sync::ButtonEdgeFlag;
    use tempwatch::Board;

    pub type BenchBoard = Board<SimSensor, ConsoleDisplay, LogIndicator, LogBuzzer, StdinButton>;

    pub fn take(edge: Arc<ButtonEdgeFlag>) -> anyhow::Result<BenchBoard> {
        log::info!("No ESP-IDF target - running on the bench board (Enter = button press)");
        Ok(Board {
            sensor: SimSensor::default(),
            display: ConsoleDisplay::new(),
            indicator: LogIndicator::new(),
            alarm: LogBuzzer::new(),
            button: StdinButton::spawn(edge)?,
        })
    }
}
