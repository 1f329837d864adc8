//! Request and response types for extraction

use verbatim_domain::{AggregatedOutput, QuoteRecord, SessionId, ThemeDefinition};

/// Request to propose themes over a corpus
#[derive(Debug, Clone)]
pub struct ThemeRequest {
    /// Masked document texts
    pub corpus: Vec<String>,

    /// Free-text description of how themes should be grouped
    pub grouping_instructions: String,

    /// Themes to propose per group
    pub max_themes_per_group: u32,

    /// Sampling temperature
    pub temperature: f32,
}

/// Request to extract quotes from a single document
#[derive(Debug, Clone)]
pub struct QuoteRequest {
    /// Masked text of the document
    pub document_text: String,

    /// Themes to find quotes for
    pub themes: Vec<ThemeDefinition>,

    /// Quotes per theme
    pub max_quotes: u32,

    /// Extra instructions for the model
    pub additional_notes: String,

    /// Sampling temperature
    pub temperature: f32,
}

/// Free-form question over a corpus
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// Masked document texts
    pub corpus: Vec<String>,

    /// The question
    pub question: String,

    /// Sampling temperature
    pub temperature: f32,
}

/// Outcome of quote extraction over a whole session
///
/// Records and the aggregated view are still masked; use
/// [`Session::unmask`](crate::Session::unmask) or
/// [`Session::render_report`](crate::Session::render_report) before display.
#[derive(Debug, Clone)]
pub struct QuoteExtractionResult {
    /// Quote records in document order, then model order
    pub records: Vec<QuoteRecord>,

    /// Records grouped by group and theme
    pub aggregated: AggregatedOutput,

    /// Metadata about the run
    pub metadata: ExtractionMetadata,
}

/// Metadata about an extraction run
#[derive(Debug, Clone)]
pub struct ExtractionMetadata {
    /// Session the run belongs to
    pub session_id: SessionId,

    /// Model used
    pub model_name: String,

    /// Documents sent to the model
    pub documents_processed: usize,

    /// Quotes returned across all documents
    pub quotes_extracted: usize,

    /// Wall-clock duration (milliseconds)
    pub processing_time_ms: u64,

    /// Completion time (Unix seconds)
    pub timestamp: u64,
}
