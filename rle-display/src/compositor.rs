//! Nearest-neighbor compositor.
//!
//! Each frame samples the logical image through the current pan/zoom state.
//! Device rows that map to the same logical row reuse the decoded pixel cache,
//! so a zoomed-out frame decodes each logical row at most once.

use crate::line_buffer::LineBuffer;
use crate::sink::{DisplayError, DisplaySink};
use crate::viewport::PanZoomState;
use rle_codec::{DecoderContext, PixelCache};
use rle_common::{Rect, Rgb565, BACKGROUND, DEVICE_HEIGHT, DEVICE_WIDTH};
use std::fmt;
use tracing::debug;

/// Counters for one rendered frame.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    /// Device rows sampled from image data.
    pub rows_drawn: usize,
    /// Device rows below the image.
    pub rows_skipped: usize,
    /// Logical rows decoded into the pixel cache.
    pub rows_decoded: usize,
    /// Line buffer pushes to the sink.
    pub flushes: u64,
}

impl fmt::Display for FrameStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} drawn, {} skipped, {} decoded, {} flushes",
            self.rows_drawn, self.rows_skipped, self.rows_decoded, self.flushes
        )
    }
}

/// Maps device rows to logical rows and streams them to a sink.
#[derive(Debug, Clone)]
pub struct Compositor {
    row_lookup: Vec<i64>,
    buffer: LineBuffer,
    background: Rgb565,
}

impl Compositor {
    /// Create a compositor painting `background` where there is no data.
    pub fn new(background: Rgb565) -> Self {
        Self {
            row_lookup: vec![0; DEVICE_HEIGHT],
            buffer: LineBuffer::new(background),
            background,
        }
    }

    /// Logical row for each device row, as of the last frame.
    pub fn row_lookup(&self) -> &[i64] {
        &self.row_lookup
    }

    /// Recompute the device-row to logical-row table for a frame.
    pub fn build_row_lookup(&mut self, pan_y: i64, scale: f64) {
        for (screen_y, entry) in self.row_lookup.iter_mut().enumerate() {
            *entry = (pan_y as f64 + screen_y as f64 * scale).floor() as i64;
        }
    }

    /// Repaint the whole device from `ctx` under `view`.
    pub fn render_frame<B: AsRef<[u8]>>(
        &mut self,
        ctx: &mut DecoderContext<B>,
        view: &PanZoomState,
        sink: &mut dyn DisplaySink,
    ) -> Result<FrameStats, DisplayError> {
        self.build_row_lookup(view.pan_y, view.scale);
        let rows = ctx.geometry().rows as i64;
        let mut stats = FrameStats::default();

        self.clear_rows_outside(rows, sink)?;

        for screen_y in 0..DEVICE_HEIGHT {
            let source_y = self.row_lookup[screen_y];
            if source_y < 0 || source_y >= rows {
                stats.rows_skipped += 1;
                continue;
            }
            if ctx.load_row(source_y as usize) {
                stats.rows_decoded += 1;
            }
            self.render_row(screen_y, view.pan_x, view.scale, ctx.pixel_cache(), sink)?;
            stats.rows_drawn += 1;
        }
        self.buffer.flush(sink)?;
        stats.flushes = self.buffer.take_flushes();

        debug!("Frame at {}: {}", view, stats);
        Ok(stats)
    }

    /// Sample one device row from the pixel cache into the line buffer.
    pub fn render_row(
        &mut self,
        screen_y: usize,
        pan_x: i64,
        scale: f64,
        cache: &PixelCache,
        sink: &mut dyn DisplaySink,
    ) -> Result<(), DisplayError> {
        let row = self.buffer.begin_row(screen_y, sink)?;
        for (screen_x, pixel) in row.iter_mut().enumerate() {
            let source_x = (screen_x as f64 * scale + pan_x as f64).floor();
            if source_x < 0.0 {
                continue;
            }
            if let Some(color) = cache.get(source_x as usize) {
                *pixel = color;
            }
        }
        Ok(())
    }

    /// Paint every band of device rows that maps outside `[0, rows)`.
    fn clear_rows_outside(&self, rows: i64, sink: &mut dyn DisplaySink) -> Result<(), DisplayError> {
        let mut band: Option<usize> = None;
        for screen_y in 0..=DEVICE_HEIGHT {
            let outside = self
                .row_lookup
                .get(screen_y)
                .is_some_and(|&y| y < 0 || y >= rows);
            match (outside, band) {
                (true, None) => band = Some(screen_y),
                (false, Some(start)) => {
                    let rect = Rect::new(
                        0,
                        start as i32,
                        DEVICE_WIDTH as u32,
                        (screen_y - start) as u32,
                    );
                    sink.fill_rect(rect, self.background)?;
                    band = None;
                }
                _ => {}
            }
        }
        Ok(())
    }
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new(BACKGROUND)
    }
}
