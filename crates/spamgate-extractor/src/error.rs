//! Error types for attachment decoding

use std::time::Duration;
use thiserror::Error;

/// Reasons an attachment produced no text
///
/// These never leave the extractor as failures; they are logged and the
/// attachment is omitted from the content.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// File system error (temp file, attachment read)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// External tool is not installed
    #[error("Tool not available: {0}")]
    ToolUnavailable(String),

    /// External tool exceeded its time budget and was killed
    #[error("Tool '{tool}' timed out after {timeout:?}")]
    ToolTimedOut {
        /// Program name
        tool: String,
        /// Budget that was exceeded
        timeout: Duration,
    },

    /// Decoder ran but produced only whitespace
    #[error("No text extracted by {0} decoder")]
    EmptyOutput(&'static str),

    /// Attachment exceeds the configured size limit
    #[error("Attachment too large: {size} bytes (max: {limit})")]
    TooLarge {
        /// Attachment size in bytes
        size: u64,
        /// Configured limit in bytes
        limit: u64,
    },

    /// MIME type has no decoder
    #[error("Unsupported file type: {0}")]
    Unsupported(String),

    /// Image decoding needs an AI classifier and none is configured
    #[error("No AI classifier configured for image text extraction")]
    NoClassifier,

    /// The AI classifier failed to extract text
    #[error("Classifier error: {0}")]
    Classifier(String),
}
