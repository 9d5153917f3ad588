//! # rle-display: viewport and compositor for streamed RLE images
//!
//! This crate maps a fixed 320x240 device panel onto a logical image held by a
//! [`rle_codec::DecoderContext`]:
//!
//! - **Viewport**: pan offset and scale with clamping and re-centering zoom
//! - **Compositor**: nearest-neighbor sampling of decoded rows into device rows
//! - **Line buffer**: bounded staging of device rows, pushed in bulk to a sink
//! - **Sinks**: the [`DisplaySink`] device interface plus an in-memory
//!   [`FrameCapture`] that can be saved as PNG
//!
//! ## Example
//!
//! ```rust
//! use rle_codec::{ContextOptions, DecoderContext};
//! use rle_display::{Compositor, FrameCapture, Viewport, ViewportConfig};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let data = vec![0xF8u8; 4 * 240 * 20];
//! let options = ContextOptions { columns: Some(4), ..ContextOptions::default() };
//! let mut ctx = DecoderContext::open(data, &options)?;
//!
//! let geometry = *ctx.geometry();
//! let viewport = Viewport::new(ViewportConfig::default(), geometry.total_width(), geometry.total_height());
//! let mut compositor = Compositor::default();
//! let mut screen = FrameCapture::new();
//! compositor.render_frame(&mut ctx, viewport.state(), &mut screen)?;
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

mod compositor;
mod line_buffer;
mod sink;
mod viewport;

pub use compositor::{Compositor, FrameStats};
pub use line_buffer::{LineBuffer, LINE_BUFFER_ROWS};
pub use sink::{DisplayError, DisplaySink, FrameCapture, NullSink};
pub use viewport::{PanZoomState, Viewport, ViewportConfig};

/// Common result type for display operations
pub type DisplayResult<T> = Result<T, DisplayError>;
