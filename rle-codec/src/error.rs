//! Error types for the codec layer.

use thiserror::Error;

/// Errors that can occur while opening an encoded stream.
///
/// Per-line problems (a truncated tail) are not errors: they surface as
/// missing offsets and render as background.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    /// The sample table could not be allocated.
    #[error("Failed to allocate sample table for {lines} lines")]
    Allocation { lines: usize },

    /// The buffer holds no complete line.
    #[error("Input contains no decodable lines")]
    EmptyInput,

    /// A requested column count is outside the supported range.
    #[error("Invalid column count {cols} (supported: 1..={max})")]
    InvalidColumns { cols: usize, max: usize },

    /// The column count leaves no complete logical row.
    #[error("{cols} columns do not fit {line_count} lines")]
    GeometryMismatch { cols: usize, line_count: usize },
}

impl CodecError {
    /// Returns true if the session cannot continue.
    ///
    /// An empty input is not fatal: the viewer idles until exit instead.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::EmptyInput)
    }
}
