//! Markdown rendering of aggregated quotes

use crate::quote::AggregatedOutput;
use std::fmt::Write;

/// Render aggregated quotes as nested Markdown sections
///
/// Groups become `###` headings, themes `####` subheadings, and each quote a
/// bullet ending with the participant in parentheses. Mask tokens are left
/// as they are; unmask the rendered text before display.
///
/// # Examples
///
/// ```
/// use verbatim_domain::{aggregate, render_markdown, QuoteRecord};
///
/// let output = aggregate(&[QuoteRecord::new("Improve", "Tools", "Too slow", "Jane")]);
/// assert_eq!(
///     render_markdown(&output),
///     "### Improve\n\n#### Tools\n\n- Too slow (Jane)\n\n"
/// );
/// ```
pub fn render_markdown(output: &AggregatedOutput) -> String {
    let mut out = String::new();

    for group in &output.groups {
        let _ = write!(out, "### {}\n\n", group.group);
        for theme in &group.themes {
            let _ = write!(out, "#### {}\n\n", theme.theme);
            for quote in &theme.quotes {
                let _ = writeln!(out, "- {} ({})", quote.quote, quote.participant);
            }
            out.push('\n');
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alias::{AliasKind, AliasRow, AliasTable};
    use crate::quote::{aggregate, QuoteRecord};

    #[test]
    fn test_render_nested_sections() {
        let output = aggregate(&[
            QuoteRecord::new("G1", "T1", "q1", "P1"),
            QuoteRecord::new("G1", "T2", "q2", "P1"),
            QuoteRecord::new("G1", "T1", "q3", "P2"),
            QuoteRecord::new("G2", "T3", "q4", "P2"),
        ]);

        let expected = "### G1\n\n\
                        #### T1\n\n\
                        - q1 (P1)\n\
                        - q3 (P2)\n\n\
                        #### T2\n\n\
                        - q2 (P1)\n\n\
                        ### G2\n\n\
                        #### T3\n\n\
                        - q4 (P2)\n\n";
        assert_eq!(render_markdown(&output), expected);
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render_markdown(&aggregate(&[])), "");
    }

    #[test]
    fn test_rendered_report_unmasks() {
        let table = AliasTable::build(&[
            AliasRow::new(AliasKind::Company, "Acme"),
            AliasRow::new(AliasKind::Participant, "Jane"),
        ]);
        let output = aggregate(&[QuoteRecord::new(
            "Views on [company_1]",
            "Leadership",
            "[participant_1] said [company_1] listens",
            "P1",
        )]);

        let rendered = table.unmask(&render_markdown(&output));
        assert!(rendered.contains("### Views on Acme"));
        assert!(rendered.contains("- Jane said Acme listens (P1)"));
        assert!(!rendered.contains('['));
    }
}
