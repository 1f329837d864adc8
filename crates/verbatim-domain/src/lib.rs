//! Verbatim Domain Layer
//!
//! Core model and the text-transformation engine for Verbatim, the interview
//! theme and quote extractor. Like any domain layer it carries no
//! infrastructure: the only external dependency is `uuid` for session ids.
//!
//! ## Key Concepts
//!
//! - **Alias rule**: maps one raw sensitive term to a mask token such as `[company_1]`
//! - **Alias table**: the ordered rule list; its order decides overlapping matches
//! - **Masked text**: document text after every alias rule has been applied
//! - **Quote record**: one verbatim quote tied to a group, theme and participant
//! - **Aggregated output**: quotes pivoted into group → theme → quote list
//!
//! ## Pipeline
//!
//! ```text
//! raw text → mask (AliasTable) → LLM → QuoteRecords → aggregate → render → unmask
//! ```
//!
//! # Examples
//!
//! ```
//! use verbatim_domain::{AliasKind, AliasRow, AliasTable};
//!
//! let table = AliasTable::build(&[AliasRow::new(AliasKind::Company, "Apple Ltd")]);
//! let masked = table.mask("I joined APPLE LTD last year");
//! assert_eq!(masked, "I joined [company_1] last year");
//! assert_eq!(table.unmask(&masked), "I joined Apple Ltd last year");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod alias;
pub mod document;
pub mod masking;
pub mod quote;
pub mod report;
pub mod session_id;
pub mod theme;
pub mod traits;

// Re-exports for convenience
pub use alias::{AliasKind, AliasRow, AliasRule, AliasTable};
pub use document::{normalize_text, Document};
pub use masking::{case_variants, mask_text, unmask_text, Unmask};
pub use quote::{
    aggregate, AggregatedOutput, ExtractedQuote, GroupBucket, ParticipantQuote, QuoteRecord,
    ThemeBucket,
};
pub use report::render_markdown;
pub use session_id::SessionId;
pub use theme::{active_themes, ThemeDefinition};
pub use traits::{ChatMessage, ChatRole, CompletionRequest, LlmProvider, ResponseSchema};
