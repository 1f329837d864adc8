//! Error types for the CLI application.

use thiserror::Error;
use verbatim_extractor::ExtractorError;
use verbatim_llm::LlmError;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Run manifest error
    #[error("Manifest error: {0}")]
    Manifest(String),

    /// Extraction error
    #[error(transparent)]
    Extractor(#[from] ExtractorError),

    /// Provider setup error
    #[error("Provider error: {0}")]
    Provider(#[from] LlmError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CliError {
    /// True when the error is a readiness-gate warning rather than a failure
    pub fn is_blocking_warning(&self) -> bool {
        matches!(self, CliError::Extractor(e) if e.is_validation())
    }
}
