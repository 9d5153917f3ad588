//! Error types for the viewer application.

use rle_codec::CodecError;
use rle_display::DisplayError;
use rle_input::InputError;
use thiserror::Error;

/// Errors raised while opening and viewing an image.
#[derive(Debug, Error)]
pub enum ViewerError {
    /// Reading the encoded buffer failed.
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// The buffer could not be indexed or its geometry settled.
    #[error("Decode error: {0}")]
    Codec(#[from] CodecError),

    /// Writing to the display sink or snapshot failed.
    #[error("Display error: {0}")]
    Display(#[from] DisplayError),

    /// Invalid configuration file or values.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid key name or script.
    #[error("Input error: {0}")]
    Input(#[from] InputError),
}

impl ViewerError {
    /// Returns true if the error came from user-supplied settings rather than
    /// the image or the host.
    pub fn is_user_error(&self) -> bool {
        match self {
            Self::Config(_) | Self::Input(_) => true,
            Self::Codec(e) => matches!(
                e,
                CodecError::InvalidColumns { .. } | CodecError::GeometryMismatch { .. }
            ),
            Self::Storage(_) | Self::Display(_) => false,
        }
    }
}
