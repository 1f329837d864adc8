//! Mask command implementation.

use crate::error::Result;
use crate::output::Formatter;
use verbatim_extractor::Session;

/// Execute the mask command.
///
/// Shows what the model would see. Missing participants are reported as a
/// warning since they only block the model-backed commands.
pub fn execute_mask(session: &Session, formatter: &Formatter) -> Result<()> {
    println!(
        "{}",
        formatter.format_mask_review(session.alias_table(), session.documents())?
    );

    if let Err(e) = session.check_ready() {
        eprintln!("{}", formatter.warning(&e.to_string()));
    }

    Ok(())
}
