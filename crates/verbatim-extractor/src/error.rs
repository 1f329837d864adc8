//! Error types for the Extractor

use thiserror::Error;

/// Errors that can occur while preparing or running an extraction
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// No documents in the session
    #[error("No documents uploaded")]
    EmptyInput,

    /// One or more documents have no participant assigned
    #[error("Documents without an assigned participant: {}", .0.join(", "))]
    MissingParticipant(Vec<String>),

    /// Every theme is blank, so there is nothing to extract quotes for
    #[error("No themes defined")]
    NoThemes,

    /// Theme definition was requested without grouping instructions
    #[error("No grouping instructions given")]
    MissingGrouping,

    /// Document index outside the session
    #[error("Unknown document index: {0}")]
    UnknownDocument(usize),

    /// Model output did not match the expected response schema
    #[error("Response does not match schema: {0}")]
    SchemaParseFailure(String),

    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// A provider call exceeded the configured timeout
    #[error("LLM request timed out after {0}s")]
    Timeout(u64),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ExtractorError {
    /// True for errors raised by the readiness gate, before any model call
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ExtractorError::EmptyInput
                | ExtractorError::MissingParticipant(_)
                | ExtractorError::NoThemes
                | ExtractorError::MissingGrouping
        )
    }
}
