//! Gatekeeper error types

use thiserror::Error;

/// Errors loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file could not be read
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is not valid TOML or has wrong types
    #[error("Failed to parse TOML: {0}")]
    Parse(String),

    /// A value is out of range or a required field is missing
    #[error("Configuration error: {0}")]
    Invalid(String),
}

/// Errors that can occur while building the gatekeeper
///
/// Analysis itself never fails with an error; outcomes are reported through
/// `AnalysisResult`.
#[derive(Error, Debug)]
pub enum GatekeeperError {
    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// LLM provider could not be created
    #[error("LLM error: {0}")]
    Llm(#[from] spamgate_llm::LlmError),
}
