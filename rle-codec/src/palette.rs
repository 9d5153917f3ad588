//! 16-entry indexed palette.

use rle_common::Rgb565;

/// Number of palette entries addressable by a 4-bit index.
pub const PALETTE_SIZE: usize = 16;

/// Maps 4-bit palette indices to device colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    entries: [Rgb565; PALETTE_SIZE],
}

impl Palette {
    /// Evenly spaced grays from black (0) to white (15).
    pub const GRAYSCALE: Self = Self::from_raw([
        0x0000, 0x1082, 0x2104, 0x3186, 0x4228, 0x52AA, 0x632C, 0x73AE, 0x8C51, 0x9CD3, 0xAD55,
        0xBDD7, 0xCE79, 0xDE7B, 0xEF7D, 0xFFFF,
    ]);

    /// Build a palette from raw RGB565 values.
    pub const fn from_raw(raw: [u16; PALETTE_SIZE]) -> Self {
        let mut entries = [Rgb565(0); PALETTE_SIZE];
        let mut i = 0;
        while i < PALETTE_SIZE {
            entries[i] = Rgb565(raw[i]);
            i += 1;
        }
        Self { entries }
    }

    /// Same colors in reverse index order.
    #[must_use]
    pub fn inverted(&self) -> Self {
        let mut entries = self.entries;
        entries.reverse();
        Self { entries }
    }

    /// Color for `index`; only the low nibble is used.
    #[inline]
    pub fn color(&self, index: u8) -> Rgb565 {
        self.entries[(index & 0x0F) as usize]
    }

    /// All entries in index order.
    pub fn entries(&self) -> &[Rgb565; PALETTE_SIZE] {
        &self.entries
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::GRAYSCALE
    }
}
