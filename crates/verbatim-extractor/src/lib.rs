//! Verbatim Extractor
//!
//! Finds themes and verbatim quotes in interview transcripts using an LLM,
//! without ever sending the aliased terms to the model.
//!
//! # Overview
//!
//! A [`Session`] holds the transcripts, the alias rows and the theme list.
//! Every transcript is masked with the session's alias table as soon as it
//! is added or the aliases change. The [`Extractor`] only ever reads masked
//! text, and answers are unmasked against the same table before display.
//!
//! # Architecture
//!
//! ```text
//! Documents → Session (mask) → Extractor → LLM → parse → aggregate → unmask → report
//! ```
//!
//! # Example Usage
//!
//! ```no_run
//! use verbatim_domain::{AliasKind, AliasRow, ThemeDefinition};
//! use verbatim_extractor::{Extractor, ExtractorConfig, Session};
//! use verbatim_llm::MockProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = Session::new();
//! session.add_document("interview-1.txt", "Jane", "Acme gave me a laptop on day one.");
//! session.set_alias_rows(vec![AliasRow::new(AliasKind::Company, "Acme")]);
//! session.set_themes(vec![ThemeDefinition::new("What works", "Equipment")]);
//!
//! let llm = MockProvider::new(r#"{"quotes": []}"#);
//! let extractor = Extractor::new(llm, ExtractorConfig::default())?;
//!
//! let result = extractor.extract_session_quotes(&session).await?;
//! println!("{}", session.render_report(&result.aggregated));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
mod parser;
mod prompt;
mod schema;
mod session;
mod types;

pub use config::{ExtractorConfig, MAX_QUOTES_PER_THEME, MAX_THEMES_PER_GROUP};
pub use error::ExtractorError;
pub use extractor::Extractor;
pub use parser::{parse_quote_response, parse_theme_response};
pub use prompt::{chat_messages, quote_messages, theme_messages};
pub use schema::{quote_schema, theme_schema};
pub use session::Session;
pub use types::{
    ChatRequest, ExtractionMetadata, QuoteExtractionResult, QuoteRequest, ThemeRequest,
};
