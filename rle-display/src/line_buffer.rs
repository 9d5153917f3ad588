//! Device line buffer.
//!
//! Composed device rows are staged here and pushed to the sink as one
//! rectangle covering a contiguous band of rows. The band is flushed when it
//! holds [`LINE_BUFFER_ROWS`] rows, when the next row is not directly below
//! the last one, and at the end of every frame.

use crate::sink::{DisplayError, DisplaySink};
use rle_common::{Rect, Rgb565, DEVICE_HEIGHT, DEVICE_WIDTH};
use tracing::trace;

/// Rows staged before a forced flush.
pub const LINE_BUFFER_ROWS: usize = 120;

/// Bounded staging area for composed device rows.
#[derive(Debug, Clone)]
pub struct LineBuffer {
    pixels: Vec<Rgb565>,
    capacity_rows: usize,
    start: usize,
    count: usize,
    background: Rgb565,
    flushes: u64,
}

impl LineBuffer {
    /// A buffer of [`LINE_BUFFER_ROWS`] rows.
    pub fn new(background: Rgb565) -> Self {
        Self::with_rows(LINE_BUFFER_ROWS, background)
    }

    /// A buffer holding `rows` device rows (at least one).
    pub fn with_rows(rows: usize, background: Rgb565) -> Self {
        let rows = rows.max(1);
        Self {
            pixels: vec![background; rows * DEVICE_WIDTH],
            capacity_rows: rows,
            start: 0,
            count: 0,
            background,
            flushes: 0,
        }
    }

    /// Row capacity.
    pub fn capacity_rows(&self) -> usize {
        self.capacity_rows
    }

    /// Rows currently staged.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns true if nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Device row of the first staged row.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Return and reset the flush counter.
    pub fn take_flushes(&mut self) -> u64 {
        std::mem::take(&mut self.flushes)
    }

    /// Stage device row `screen_y`, flushing first if it cannot extend the
    /// current band. Returns the row's pixels, pre-filled with background.
    pub fn begin_row(
        &mut self,
        screen_y: usize,
        sink: &mut dyn DisplaySink,
    ) -> Result<&mut [Rgb565], DisplayError> {
        if screen_y >= DEVICE_HEIGHT {
            return Err(DisplayError::RowOutOfRange(screen_y));
        }
        if self.count > 0
            && (self.count == self.capacity_rows || screen_y != self.start + self.count)
        {
            self.flush(sink)?;
        }
        if self.count == 0 {
            self.start = screen_y;
        }

        let base = self.count * DEVICE_WIDTH;
        self.count += 1;
        let row = &mut self.pixels[base..base + DEVICE_WIDTH];
        row.fill(self.background);
        Ok(row)
    }

    /// Push the staged band to `sink`. Returns false if nothing was staged.
    pub fn flush(&mut self, sink: &mut dyn DisplaySink) -> Result<bool, DisplayError> {
        if self.count == 0 {
            return Ok(false);
        }
        let rect = Rect::new(0, self.start as i32, DEVICE_WIDTH as u32, self.count as u32);
        trace!("Flushing rows {}..{}", self.start, self.start + self.count);
        let staged = self.count * DEVICE_WIDTH;
        self.count = 0;
        sink.push_rect(rect, &self.pixels[..staged])?;
        self.flushes += 1;
        Ok(true)
    }
}
