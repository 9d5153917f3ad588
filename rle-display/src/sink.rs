//! Output device interface and host-side sinks.

use rle_common::{Rect, Rgb565, DEVICE_HEIGHT, DEVICE_WIDTH};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Errors raised while writing to a display sink.
#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("Rectangle {0:?} lies outside the display")]
    OutOfBounds(Rect),

    #[error("Pixel count {actual} does not match rectangle area {expected}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("Device row {0} is outside the display")]
    RowOutOfRange(usize),

    #[error("Failed to write snapshot: {0}")]
    Image(#[from] image::ImageError),
}

/// A device that accepts rectangles of row-major pixels.
pub trait DisplaySink {
    /// Write `pixels` (row-major, `rect.width * rect.height` entries) at `rect`.
    fn push_rect(&mut self, rect: Rect, pixels: &[Rgb565]) -> Result<(), DisplayError>;

    /// Paint `rect` with a single color.
    fn fill_rect(&mut self, rect: Rect, color: Rgb565) -> Result<(), DisplayError> {
        let pixels = vec![color; rect.area() as usize];
        self.push_rect(rect, &pixels)
    }
}

fn check_rect(rect: Rect, len: usize) -> Result<(), DisplayError> {
    if !Rect::screen().contains_rect(&rect) {
        return Err(DisplayError::OutOfBounds(rect));
    }
    let expected = rect.area() as usize;
    if len != expected {
        return Err(DisplayError::SizeMismatch {
            expected,
            actual: len,
        });
    }
    Ok(())
}

/// In-memory copy of the device panel.
///
/// Records every pushed rectangle so callers can inspect how a frame was
/// streamed, and can be saved as a PNG.
#[derive(Debug, Clone)]
pub struct FrameCapture {
    pixels: Vec<Rgb565>,
    pushes: Vec<Rect>,
}

impl FrameCapture {
    /// A blank panel filled with black.
    pub fn new() -> Self {
        Self::filled(Rgb565::BLACK)
    }

    /// A panel filled with `color`.
    pub fn filled(color: Rgb565) -> Self {
        Self {
            pixels: vec![color; DEVICE_WIDTH * DEVICE_HEIGHT],
            pushes: Vec::new(),
        }
    }

    /// All panel pixels, row-major.
    pub fn pixels(&self) -> &[Rgb565] {
        &self.pixels
    }

    /// Pixel at device coordinates, or `None` off the panel.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb565> {
        if x >= DEVICE_WIDTH || y >= DEVICE_HEIGHT {
            return None;
        }
        Some(self.pixels[y * DEVICE_WIDTH + x])
    }

    /// One device row.
    pub fn row(&self, y: usize) -> Option<&[Rgb565]> {
        let start = y.checked_mul(DEVICE_WIDTH)?;
        self.pixels.get(start..start + DEVICE_WIDTH)
    }

    /// Rectangles pushed since creation or the last [`clear_log`](Self::clear_log).
    pub fn pushes(&self) -> &[Rect] {
        &self.pushes
    }

    /// Forget the push log, keeping the pixels.
    pub fn clear_log(&mut self) {
        self.pushes.clear();
    }

    /// Expand the panel to 8-bit RGB.
    pub fn to_image(&self) -> image::RgbImage {
        image::RgbImage::from_fn(DEVICE_WIDTH as u32, DEVICE_HEIGHT as u32, |x, y| {
            image::Rgb(self.pixels[y as usize * DEVICE_WIDTH + x as usize].to_rgb888())
        })
    }

    /// Write the panel to `path` as PNG.
    pub fn save_png(&self, path: &Path) -> Result<(), DisplayError> {
        self.to_image()
            .save_with_format(path, image::ImageFormat::Png)?;
        info!("Saved snapshot to {}", path.display());
        Ok(())
    }
}

impl Default for FrameCapture {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplaySink for FrameCapture {
    fn push_rect(&mut self, rect: Rect, pixels: &[Rgb565]) -> Result<(), DisplayError> {
        check_rect(rect, pixels.len())?;
        let width = rect.width as usize;
        if rect.area() == 0 {
            return Ok(());
        }
        for (row, src) in pixels.chunks_exact(width).enumerate() {
            let start = (rect.y as usize + row) * DEVICE_WIDTH + rect.x as usize;
            self.pixels[start..start + width].copy_from_slice(src);
        }
        debug!("Captured {}x{} at ({}, {})", rect.width, rect.height, rect.x, rect.y);
        self.pushes.push(rect);
        Ok(())
    }
}

/// Sink that validates and counts writes but keeps nothing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NullSink {
    pub pushes: u64,
    pub pixels: u64,
}

impl DisplaySink for NullSink {
    fn push_rect(&mut self, rect: Rect, pixels: &[Rgb565]) -> Result<(), DisplayError> {
        check_rect(rect, pixels.len())?;
        self.pushes += 1;
        self.pixels += pixels.len() as u64;
        Ok(())
    }
}
