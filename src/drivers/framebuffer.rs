// TempWatch - Monochrome Frame Buffer
//
// 128x64 one-bit buffer in SSD1306 page order: byte `page * WIDTH + x`
// holds rows `page * 8 .. page * 8 + 8` of column `x`, LSB on top.  Text is
// rendered with embedded-graphics so the same buffer backs both the OLED
// driver and the bench display.

use core::convert::Infallible;

use embedded_graphics::mono_font::iso_8859_1::FONT_6X10;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};

use crate::config::{DISPLAY_BUFFER_SIZE, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::drivers::Region;

pub struct FrameBuffer {
    buf: [u8; DISPLAY_BUFFER_SIZE],
}

impl FrameBuffer {
    pub const fn new() -> Self {
        Self { buf: [0; DISPLAY_BUFFER_SIZE] }
    }

    pub fn clear(&mut self) {
        self.buf.fill(0);
    }

    /// Render `text` (ISO-8859-1, so `°` is available) with its top-left
    /// corner at (`x`, `y`).  Pixels outside the screen are clipped.
    pub fn draw_text(&mut self, x: i32, y: i32, text: &str) {
        let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
        // Infallible: the buffer clips instead of erroring.
        let _ = Text::with_baseline(text, Point::new(x, y), style, Baseline::Top).draw(self);
    }

    pub fn pixel(&self, x: u32, y: u32) -> bool {
        if x >= SCREEN_WIDTH || y >= SCREEN_HEIGHT {
            return false;
        }
        let idx = (y / 8 * SCREEN_WIDTH + x) as usize;
        self.buf[idx] & (1 << (y % 8)) != 0
    }

    /// Bytes of one page, restricted to `columns`.  Off-screen pages and
    /// columns are cut away.
    pub fn page_slice(&self, page: u8, columns: &core::ops::RangeInclusive<u8>) -> &[u8] {
        let width = SCREEN_WIDTH as usize;
        if u32::from(page) >= SCREEN_HEIGHT / 8 {
            return &[];
        }
        let first = usize::from(*columns.start());
        let last = usize::from(*columns.end()).min(width - 1);
        if first > last {
            return &[];
        }
        let row = usize::from(page) * width;
        &self.buf[row + first..=row + last]
    }

    /// Concatenated page bytes of the visible part of `region`, in the order
    /// the panel expects them after a column/page address window has been
    /// set.
    pub fn region_bytes(&self, region: &Region) -> Vec<u8> {
        let Some(region) = region.clamped() else {
            return Vec::new();
        };
        region
            .pages
            .clone()
            .flat_map(|page| self.page_slice(page, &region.columns).iter().copied())
            .collect()
    }

    pub fn lit_pixels(&self) -> u32 {
        self.buf.iter().map(|b| b.count_ones()).sum()
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(SCREEN_WIDTH, SCREEN_HEIGHT)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            let (Ok(x), Ok(y)) = (u32::try_from(point.x), u32::try_from(point.y)) else {
                continue;
            };
            if x >= SCREEN_WIDTH || y >= SCREEN_HEIGHT {
                continue;
            }
            let idx = (y / 8 * SCREEN_WIDTH + x) as usize;
            let bit = 1 << (y % 8);
            match color {
                BinaryColor::On => self.buf[idx] |= bit,
                BinaryColor::Off => self.buf[idx] &= !bit,
            }
        }
        Ok(())
    }
}
