//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded or is invalid
    #[error(transparent)]
    Config(#[from] spamgate_gatekeeper::ConfigError),

    /// Analyzer could not be built
    #[error(transparent)]
    Gatekeeper(#[from] spamgate_gatekeeper::GatekeeperError),

    /// Ticket file error
    #[error("Ticket store error: {0}")]
    Store(#[from] spamgate_store::StoreError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
