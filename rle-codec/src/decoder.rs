//! Row decoder and the single-row pixel cache.
//!
//! The pixel cache holds exactly one decoded logical row spanning every tile
//! column. Each tile occupies [`LINE_WIDTH`] pixels starting at
//! `column * LINE_WIDTH`. Tiles whose line is missing, and the tail of any
//! line whose bytes run out early, are painted with the background color so
//! no pixel survives from the previously cached row.

use crate::palette::Palette;
use crate::scanner::Run;
use rle_common::{Rgb565, LINE_WIDTH};
use tracing::trace;

/// Decode the line at `offset` into `out`, returning the pixels written.
///
/// Decoding stops when `out` is full or the buffer ends; a run crossing the
/// end of `out` is cut short.
pub fn decode_line(data: &[u8], offset: usize, palette: &Palette, out: &mut [Rgb565]) -> usize {
    let Some(bytes) = data.get(offset..) else {
        return 0;
    };
    let mut cursor = 0usize;
    for &byte in bytes {
        if cursor >= out.len() {
            break;
        }
        let run = Run::from_byte(byte);
        let end = (cursor + run.len).min(out.len());
        out[cursor..end].fill(palette.color(run.index));
        cursor = end;
    }
    cursor
}

/// Decoded pixels for one logical row.
#[derive(Debug, Clone)]
pub struct PixelCache {
    pixels: Vec<Rgb565>,
    row: Option<usize>,
    background: Rgb565,
}

impl PixelCache {
    /// Create an empty cache `width` pixels wide.
    pub fn new(width: usize, background: Rgb565) -> Self {
        Self {
            pixels: vec![background; width],
            row: None,
            background,
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.pixels.len()
    }

    /// The row currently held, if any.
    pub fn row(&self) -> Option<usize> {
        self.row
    }

    /// Color painted for missing data.
    pub fn background(&self) -> Rgb565 {
        self.background
    }

    /// Pixel at logical column `x`, or `None` outside the row.
    #[inline]
    pub fn get(&self, x: usize) -> Option<Rgb565> {
        self.pixels.get(x).copied()
    }

    /// The whole decoded row.
    pub fn pixels(&self) -> &[Rgb565] {
        &self.pixels
    }

    /// Forget the cached row.
    pub fn invalidate(&mut self) {
        self.row = None;
    }

    /// Decode row `y` from its per-column line offsets.
    pub fn decode_row(&mut self, data: &[u8], palette: &Palette, offsets: &[Option<usize>], y: usize) {
        let background = self.background;
        for (column, tile) in self.pixels.chunks_mut(LINE_WIDTH).enumerate() {
            let written = match offsets.get(column).copied().flatten() {
                Some(offset) => decode_line(data, offset, palette, tile),
                None => 0,
            };
            if written < tile.len() {
                trace!(
                    "Row {} column {}: padding {} pixels",
                    y,
                    column,
                    tile.len() - written
                );
                tile[written..].fill(background);
            }
        }
        self.row = Some(y);
    }
}
