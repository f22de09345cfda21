//! Error types for the atcodec tool.

use nrf_at::{DecodeError, ValueError};
use thiserror::Error;

/// Errors that can occur while processing one input line.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The line is not valid AT syntax.
    #[error("decode failed: {0}")]
    Decode(#[from] DecodeError),

    /// The JSON value cannot be expressed as AT text.
    #[error("cannot encode: {0}")]
    Value(#[from] ValueError),

    /// The input is not the expected JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading input or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for tool operations.
pub type ToolResult<T> = Result<T, ToolError>;
