//! Error types for the redaction boundary.
//!
//! Transforms never fail; errors only come from turning external input
//! (flat pixel buffers, names, JSON) into grids and parameters.

use thiserror::Error;

/// Error type for grid construction and parameter parsing.
#[derive(Error, Debug)]
pub enum RedactError {
    /// Buffer length or shape does not match the requested dimensions.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Source array has a channel count other than 3.
    #[error("unsupported channel count: {0} (expected 3)")]
    UnsupportedChannels(usize),

    /// Unknown spatial filter name.
    #[error("unknown filter: {0}")]
    UnknownFilter(String),

    /// Unknown channel name for extraction.
    #[error("unknown channel: {0}")]
    UnknownChannel(String),

    /// Unknown point curve name.
    #[error("unknown curve: {0}")]
    UnknownCurve(String),

    /// Parameter document could not be parsed.
    #[error("invalid parameters: {0}")]
    InvalidParameters(#[from] serde_json::Error),
}

/// Result type for redaction boundary operations.
pub type RedactResult<T> = Result<T, RedactError>;
