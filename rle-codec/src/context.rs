//! Decoder context: every piece of mutable decode state for one session.
//!
//! The context owns the encoded buffer handle, the sparse index, the inferred
//! geometry, the row resolver (row cache + scan hint) and the pixel cache.
//! Operations take `&mut self`; there is exactly one context per open image.

use crate::decoder::PixelCache;
use crate::error::CodecError;
use crate::geometry::{infer_geometry, Geometry};
use crate::index::SparseLineIndex;
use crate::palette::Palette;
use crate::resolver::{ResolverStats, RowResolver};
use crate::row_cache::{RowOffsets, ROW_CACHE_CAPACITY};
use rle_common::{Rgb565, BACKGROUND};
use tracing::info;

/// Options applied when opening a stream.
#[derive(Debug, Clone)]
pub struct ContextOptions {
    /// Fixed tile-column count; inferred when `None`.
    pub columns: Option<usize>,
    /// Palette used to resolve indices.
    pub palette: Palette,
    /// Color for missing data.
    pub background: Rgb565,
    /// Rows kept in the row offset cache.
    pub row_cache_capacity: usize,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            columns: None,
            palette: Palette::default(),
            background: BACKGROUND,
            row_cache_capacity: ROW_CACHE_CAPACITY,
        }
    }
}

/// Decode state for one encoded image.
#[derive(Debug)]
pub struct DecoderContext<B> {
    data: B,
    index: SparseLineIndex,
    geometry: Geometry,
    resolver: RowResolver,
    pixels: PixelCache,
    palette: Palette,
}

impl<B: AsRef<[u8]>> DecoderContext<B> {
    /// Index `data` and settle its geometry.
    ///
    /// # Errors
    ///
    /// - [`CodecError::EmptyInput`] if no complete line exists
    /// - [`CodecError::Allocation`] if the sample table cannot be allocated
    /// - [`CodecError::InvalidColumns`] / [`CodecError::GeometryMismatch`] for
    ///   an unusable column override
    pub fn open(data: B, options: &ContextOptions) -> Result<Self, CodecError> {
        let bytes = data.as_ref();
        let index = SparseLineIndex::build(bytes)?;
        if index.is_empty() {
            return Err(CodecError::EmptyInput);
        }

        let geometry = match options.columns {
            Some(cols) => Geometry::with_columns(index.line_count(), cols)?,
            None => infer_geometry(&index, bytes),
        };
        info!(
            "Opened {} bytes: {} lines, {}",
            bytes.len(),
            index.line_count(),
            geometry
        );

        Ok(Self {
            resolver: RowResolver::with_capacity(geometry.cols, options.row_cache_capacity),
            pixels: PixelCache::new(geometry.total_width(), options.background),
            palette: options.palette,
            data,
            index,
            geometry,
        })
    }

    /// The raw encoded bytes.
    pub fn data(&self) -> &[u8] {
        self.data.as_ref()
    }

    /// Logical grid.
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// The sparse line index.
    pub fn index(&self) -> &SparseLineIndex {
        &self.index
    }

    /// Active palette.
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Byte offset of logical line `line`.
    pub fn offset_of(&self, line: usize) -> Option<usize> {
        self.index.offset_of(self.data.as_ref(), line)
    }

    /// Per-column line offsets of logical row `y`.
    pub fn resolve_row(&mut self, y: usize) -> RowOffsets {
        self.resolver.resolve_row(self.data.as_ref(), &self.index, y)
    }

    /// Make the pixel cache hold row `y`, decoding it if needed.
    ///
    /// Returns true if a decode happened.
    pub fn load_row(&mut self, y: usize) -> bool {
        if self.pixels.row() == Some(y) {
            return false;
        }
        let offsets = self.resolve_row(y);
        self.pixels
            .decode_row(self.data.as_ref(), &self.palette, &offsets, y);
        true
    }

    /// The pixel cache.
    pub fn pixel_cache(&self) -> &PixelCache {
        &self.pixels
    }

    /// Forget the decoded row so the next [`load_row`](Self::load_row) decodes.
    pub fn invalidate_pixels(&mut self) {
        self.pixels.invalidate();
    }

    /// Resolver counters since the last call.
    pub fn take_stats(&mut self) -> ResolverStats {
        self.resolver.take_stats()
    }
}
