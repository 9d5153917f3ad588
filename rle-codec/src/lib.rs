//! Streaming decode layer for 4-bit run-length encoded line images.
//!
//! An image is a flat stream of run bytes (see [`scanner`]) that decodes to
//! fixed-width lines. Lines are interleaved tile by tile: logical row `y` of
//! a `cols`-wide image is made of lines `y*cols .. y*cols + cols`. The stream
//! may be far larger than what fits decoded in memory, so this crate only ever
//! holds:
//!
//! - a [`SparseLineIndex`] with one checkpoint per [`SAMPLE_INTERVAL`] lines
//! - a small FIFO [`RowCache`] of resolved row offsets plus a [`ScanHint`]
//! - a [`PixelCache`] holding one decoded logical row
//!
//! All of it lives in a [`DecoderContext`].
//!
//! # Example
//!
//! ```
//! use rle_codec::{ContextOptions, DecoderContext};
//!
//! // 960 lines of 20 bytes each: a 1280x240 image with four tile columns.
//! let data = vec![0xF8u8; 960 * 20];
//! let options = ContextOptions { columns: Some(4), ..ContextOptions::default() };
//! let mut ctx = DecoderContext::open(data, &options)?;
//! assert_eq!(ctx.geometry().rows, 240);
//!
//! ctx.load_row(10);
//! assert_eq!(ctx.pixel_cache().row(), Some(10));
//! # Ok::<(), rle_codec::CodecError>(())
//! ```

pub mod context;
pub mod decoder;
pub mod error;
pub mod geometry;
pub mod index;
pub mod palette;
pub mod resolver;
pub mod row_cache;
pub mod scanner;

pub use context::{ContextOptions, DecoderContext};
pub use decoder::{decode_line, PixelCache};
pub use error::CodecError;
pub use geometry::{infer_geometry, Geometry, GeometrySource, FALLBACK_COLS, MAX_COLS, PIXEL_CACHE_WIDTH};
pub use index::{SparseLineIndex, SAMPLE_INTERVAL};
pub use palette::{Palette, PALETTE_SIZE};
pub use resolver::{ResolverStats, RowResolver, ScanHint};
pub use row_cache::{RowCache, RowOffsets, ROW_CACHE_CAPACITY};
pub use scanner::{estimate_line_count, scan_line, LineExtent, LineWalker, Run};
