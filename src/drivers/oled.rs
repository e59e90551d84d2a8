// TempWatch - SSD1306 OLED Driver
//
// Register-level driver for the 128x64 panel.  Drawing happens in the
// embedded-graphics frame buffer; `flush` pushes the requested column/page
// window over I2C.

use esp_idf_hal::i2c::I2cDriver;

use crate::config::*;
use crate::drivers::framebuffer::FrameBuffer;
use crate::drivers::{DisplaySink, Region};

const CONTROL_CMD: u8 = 0x00;
const CONTROL_DATA: u8 = 0x40;

const CMD_SET_COLUMN_ADDR: u8 = 0x21;
const CMD_SET_PAGE_ADDR: u8 = 0x22;
const CMD_DISPLAY_OFF: u8 = 0xAE;

// Power-up sequence for a 128x64 module with the internal charge pump.
const INIT_SEQUENCE: &[u8] = &[
    CMD_DISPLAY_OFF,
    0xD5, 0x80, // clock divide / oscillator
    0xA8, 0x3F, // multiplex 64
    0xD3, 0x00, // display offset
    0x40,       // start line 0
    0x8D, 0x14, // charge pump on
    0x20, 0x00, // horizontal addressing
    0xA1,       // segment remap
    0xC8,       // COM scan descending
    0xDA, 0x12, // COM pins
    0x81, 0xCF, // contrast
    0xD9, 0xF1, // pre-charge
    0xDB, 0x40, // VCOMH deselect
    0xA4,       // resume from RAM
    0xA6,       // normal (not inverted)
    0xAF,       // display on
];

// Data bytes per I2C transaction (plus the control byte).
const CHUNK: usize = 32;

pub struct OledDisplay {
    i2c: I2cDriver<'static>,
    frame: FrameBuffer,
}

impl OledDisplay {
    pub fn new(i2c: I2cDriver<'static>) -> Self {
        Self { i2c, frame: FrameBuffer::new() }
    }

    fn command(&mut self, bytes: &[u8]) -> anyhow::Result<()> {
        let mut buf = Vec::with_capacity(bytes.len() + 1);
        buf.push(CONTROL_CMD);
        buf.extend_from_slice(bytes);
        self.i2c.write(I2C_ADDR_OLED, &buf, I2C_TIMEOUT_TICKS)?;
        Ok(())
    }

    /// Verify the panel acknowledges its address.
    pub fn is_connected(&mut self) -> bool {
        self.i2c.write(I2C_ADDR_OLED, &[CONTROL_CMD, 0xE3], I2C_TIMEOUT_TICKS).is_ok() // NOP
    }

    /// Send the power-up sequence and blank the screen.
    pub fn init(&mut self) -> anyhow::Result<()> {
        self.command(INIT_SEQUENCE)?;
        self.frame.clear();
        self.flush(Region::full())?;
        log::info!("SSD1306 initialised ({}x{})", SCREEN_WIDTH, SCREEN_HEIGHT);
        Ok(())
    }
}

impl DisplaySink for OledDisplay {
    fn clear(&mut self) {
        self.frame.clear();
    }

    fn draw_text(&mut self, x: i32, y: i32, text: &str) -> anyhow::Result<()> {
        self.frame.draw_text(x, y, text);
        Ok(())
    }

    fn flush(&mut self, region: Region) -> anyhow::Result<()> {
        let Some(region) = region.clamped() else {
            return Ok(());
        };
        self.command(&[
            CMD_SET_COLUMN_ADDR,
            *region.columns.start(),
            *region.columns.end(),
            CMD_SET_PAGE_ADDR,
            *region.pages.start(),
            *region.pages.end(),
        ])?;

        let data = self.frame.region_bytes(&region);
        let mut packet = [0u8; CHUNK + 1];
        packet[0] = CONTROL_DATA;
        for chunk in data.chunks(CHUNK) {
            packet[1..=chunk.len()].copy_from_slice(chunk);
            self.i2c.write(I2C_ADDR_OLED, &packet[..=chunk.len()], I2C_TIMEOUT_TICKS)?;
        }
        Ok(())
    }
}
