//! Tile-column inference.
//!
//! The stream interleaves `cols` side-by-side tiles line by line, so logical
//! row `y` consists of lines `y*cols .. y*cols + cols`. Nothing in the stream
//! records `cols`; it is guessed once from the line count.
//!
//! Candidates must divide the line count into a whole number of
//! device-height bands and fit the pixel cache. Each candidate is scored by
//! sampling consecutive row byte spans: true tiling produces large, uniform
//! rows, while a wrong divisor produces short or irregular ones. This is a
//! best-effort heuristic; a malformed stream can win with a wrong column count.

use crate::error::CodecError;
use crate::index::SparseLineIndex;
use rle_common::{DEVICE_HEIGHT, LINE_WIDTH};
use std::fmt;
use tracing::{debug, warn};

/// Largest column count ever considered.
pub const MAX_COLS: usize = 12;

/// Width of the decoded row cache in pixels (four tiles).
pub const PIXEL_CACHE_WIDTH: usize = 4 * LINE_WIDTH;

/// Column count used when no candidate qualifies.
pub const FALLBACK_COLS: usize = 4;

/// Number of row spans sampled per candidate.
const SCORE_SAMPLES: usize = 8;

/// How the column count was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometrySource {
    /// Highest-scoring divisor.
    Scored,
    /// `line_count / 240` was a perfect square; the fixed count was used.
    SquareShortcut,
    /// No candidate qualified.
    Fallback,
    /// Supplied by the user.
    Override,
}

impl fmt::Display for GeometrySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scored => write!(f, "scored"),
            Self::SquareShortcut => write!(f, "square"),
            Self::Fallback => write!(f, "fallback"),
            Self::Override => write!(f, "override"),
        }
    }
}

/// Logical grid of the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub cols: usize,
    pub rows: usize,
    pub source: GeometrySource,
}

impl Geometry {
    /// Geometry with a user-chosen column count.
    ///
    /// Trailing lines that do not fill a whole row are ignored.
    ///
    /// # Errors
    ///
    /// Fails if `cols` is out of range or leaves no complete row.
    pub fn with_columns(line_count: usize, cols: usize) -> Result<Self, CodecError> {
        let max = max_columns();
        if cols == 0 || cols > max {
            return Err(CodecError::InvalidColumns { cols, max });
        }
        let rows = line_count / cols;
        if rows == 0 {
            return Err(CodecError::GeometryMismatch { cols, line_count });
        }
        if line_count % cols != 0 {
            warn!(
                "{} columns leave {} trailing lines unused",
                cols,
                line_count % cols
            );
        }
        Ok(Self {
            cols,
            rows,
            source: GeometrySource::Override,
        })
    }

    /// Logical image width in pixels.
    pub fn total_width(&self) -> usize {
        self.cols * LINE_WIDTH
    }

    /// Logical image height in pixels.
    pub fn total_height(&self) -> usize {
        self.rows
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} ({} cols, {})",
            self.total_width(),
            self.total_height(),
            self.cols,
            self.source
        )
    }
}

/// Largest column count the pixel cache can hold.
pub fn max_columns() -> usize {
    (PIXEL_CACHE_WIDTH / LINE_WIDTH).min(MAX_COLS)
}

fn qualifies(line_count: usize, cols: usize) -> bool {
    if cols == 0 || cols > max_columns() || line_count % cols != 0 {
        return false;
    }
    let rows = line_count / cols;
    rows >= DEVICE_HEIGHT && rows % DEVICE_HEIGHT == 0
}

fn integer_sqrt(n: usize) -> usize {
    let mut root = (n as f64).sqrt() as usize;
    while root * root > n {
        root -= 1;
    }
    while (root + 1) * (root + 1) <= n {
        root += 1;
    }
    root
}

/// `mean / (1 + variance / mean^2)` over the byte spans of the first rows.
fn score_candidate(index: &SparseLineIndex, data: &[u8], cols: usize) -> Option<f64> {
    let rows = index.line_count() / cols;
    let samples = SCORE_SAMPLES.min(rows.saturating_sub(1));
    if samples == 0 {
        return None;
    }

    let mut spans = Vec::with_capacity(samples);
    let mut previous = index.offset_of(data, 0)?;
    for row in 1..=samples {
        let offset = index.offset_of(data, row * cols)?;
        spans.push((offset - previous) as f64);
        previous = offset;
    }

    let n = spans.len() as f64;
    let mean = spans.iter().sum::<f64>() / n;
    if mean <= 0.0 {
        return None;
    }
    let variance = spans.iter().map(|s| (s - mean) * (s - mean)).sum::<f64>() / n;
    Some(mean / (1.0 + variance / (mean * mean)))
}

/// Choose the tile-column count for an indexed stream.
pub fn infer_geometry(index: &SparseLineIndex, data: &[u8]) -> Geometry {
    let line_count = index.line_count();
    let fallback = Geometry {
        cols: FALLBACK_COLS,
        rows: line_count / FALLBACK_COLS,
        source: GeometrySource::Fallback,
    };

    if line_count % DEVICE_HEIGHT == 0 {
        let bands = line_count / DEVICE_HEIGHT;
        let side = integer_sqrt(bands);
        if side * side == bands {
            debug!(
                "{} lines form {}^2 device bands, using {} columns",
                line_count, side, FALLBACK_COLS
            );
            return Geometry {
                source: GeometrySource::SquareShortcut,
                ..fallback
            };
        }
    }

    let mut best: Option<(usize, f64)> = None;
    for cols in 1..=MAX_COLS {
        if !qualifies(line_count, cols) {
            continue;
        }
        let Some(score) = score_candidate(index, data, cols) else {
            continue;
        };
        debug!("Column candidate {}: score {:.2}", cols, score);
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((cols, score));
        }
    }

    match best {
        Some((cols, _)) => Geometry {
            cols,
            rows: line_count / cols,
            source: GeometrySource::Scored,
        },
        None => {
            warn!(
                "No column count fits {} lines, falling back to {}",
                line_count, FALLBACK_COLS
            );
            fallback
        }
    }
}
