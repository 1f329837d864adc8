//! Quotes command implementation.

use crate::cli::QuotesArgs;
use crate::error::Result;
use crate::output::Formatter;
use std::fmt::Display;
use std::fs;
use verbatim_domain::LlmProvider;
use verbatim_extractor::{Extractor, Session};

/// Execute the quotes command.
pub async fn execute_quotes<L>(
    args: &QuotesArgs,
    session: &Session,
    extractor: &Extractor<L>,
    formatter: &Formatter,
) -> Result<()>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: Display,
{
    let result = extractor.extract_session_quotes(session).await?;

    let report = session.render_report(&result.aggregated);
    let records = session.unmask(&result.records);

    println!(
        "{}",
        formatter.format_quotes(&report, &records, &result.metadata)?
    );

    if let Some(path) = &args.output {
        fs::write(path, &report)?;
        eprintln!(
            "{}",
            formatter.success(&format!("Wrote report to {}", path.display()))
        );
    }

    eprintln!(
        "{}",
        formatter.info(&format!(
            "{} quote(s) from {} document(s) in {}ms",
            result.metadata.quotes_extracted,
            result.metadata.documents_processed,
            result.metadata.processing_time_ms
        ))
    );

    Ok(())
}
