//! Themes command implementation.

use crate::cli::ThemesArgs;
use crate::error::Result;
use crate::manifest::themes_to_toml;
use crate::output::Formatter;
use std::fmt::Display;
use std::fs;
use verbatim_domain::LlmProvider;
use verbatim_extractor::{Extractor, Session};

/// Execute the themes command.
pub async fn execute_themes<L>(
    args: &ThemesArgs,
    session: &Session,
    extractor: &Extractor<L>,
    formatter: &Formatter,
) -> Result<()>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: Display,
{
    let themes = extractor.suggest_themes(session, &args.groups).await?;
    let themes = session.unmask(&themes);

    println!("{}", formatter.format_themes(&themes)?);

    if let Some(path) = &args.output {
        fs::write(path, themes_to_toml(&themes)?)?;
        eprintln!(
            "{}",
            formatter.success(&format!(
                "Wrote {} theme(s) to {}",
                themes.len(),
                path.display()
            ))
        );
    }

    Ok(())
}
