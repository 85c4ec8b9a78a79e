//! Error type shared by every grid operation.

use thiserror::Error;

/// Result alias for grid operations.
pub type Result<T> = std::result::Result<T, GridError>;

/// Coarse classification of a [`GridError`], for callers that only need
/// to branch on the kind of failure (exit codes, UI messages).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Shape,
    Bounds,
    Io,
    Parse,
}

#[derive(Error, Debug)]
pub enum GridError {
    /// A byte buffer or record array does not match the grid's shape.
    #[error("shape mismatch: expected {expected} bytes, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// A coordinate falls outside `[0, max_width) x [0, max_height)`.
    #[error("coordinate ({x}, {y}) out of range for {max_width}x{max_height} grid")]
    OutOfRange {
        x: usize,
        y: usize,
        max_width: usize,
        max_height: usize,
    },

    #[error("tile index {index} out of range for {len} tiles")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("invalid grid dimensions: {0}")]
    InvalidDimensions(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid item size table: {0}")]
    SizeTable(String),
}

impl GridError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::ShapeMismatch { .. } | Self::InvalidDimensions(_) => ErrorCode::Shape,
            Self::OutOfRange { .. } | Self::IndexOutOfRange { .. } => ErrorCode::Bounds,
            Self::Io(_) => ErrorCode::Io,
            Self::SizeTable(_) => ErrorCode::Parse,
        }
    }

    pub fn invalid_dimensions(msg: impl Into<String>) -> Self {
        Self::InvalidDimensions(msg.into())
    }
}
