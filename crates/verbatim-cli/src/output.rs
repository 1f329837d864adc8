//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use serde_json::json;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};
use verbatim_domain::{AliasTable, Document, QuoteRecord, ThemeDefinition};
use verbatim_extractor::ExtractionMetadata;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format the masking review: alias table, then every masked document.
    pub fn format_mask_review(
        &self,
        table: &AliasTable,
        documents: &[Document],
    ) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let rules: Vec<serde_json::Value> = table
                    .iter()
                    .map(|r| {
                        json!({
                            "type": r.kind.as_str(),
                            "term": r.raw_term,
                            "token": r.mask_token,
                        })
                    })
                    .collect();
                let docs: Vec<serde_json::Value> = documents
                    .iter()
                    .map(|d| {
                        json!({
                            "identifier": d.identifier,
                            "participant": d.participant,
                            "masked_text": d.masked_text,
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&json!({
                    "aliases": rules,
                    "documents": docs,
                }))?)
            }
            OutputFormat::Table => Ok(format!(
                "{}\n\n{}",
                self.alias_table(table),
                self.masked_documents(documents)
            )),
        }
    }

    fn alias_table(&self, table: &AliasTable) -> String {
        if table.is_empty() {
            return self.colorize("No aliases defined.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Type", "Term", "Token"]);
        for rule in table {
            builder.push_record([
                rule.kind.as_str(),
                rule.raw_term.as_str(),
                rule.mask_token.as_str(),
            ]);
        }
        self.finish_table(builder)
    }

    fn masked_documents(&self, documents: &[Document]) -> String {
        if documents.is_empty() {
            return self.colorize("No documents.", "yellow");
        }

        let mut out = String::new();
        for doc in documents {
            let participant = if doc.has_participant() {
                doc.participant.clone()
            } else {
                self.colorize("(no participant)", "red")
            };
            let header = format!("== {} · {}", doc.identifier, participant);
            out.push_str(&self.colorize(&header, "cyan"));
            out.push('\n');
            out.push_str(&doc.masked_text);
            out.push_str("\n\n");
        }
        out.trim_end().to_string()
    }

    /// Format a theme list.
    pub fn format_themes(&self, themes: &[ThemeDefinition]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let items: Vec<serde_json::Value> = themes
                    .iter()
                    .map(|t| json!({ "group": t.group, "theme": t.theme }))
                    .collect();
                Ok(serde_json::to_string_pretty(&json!({ "themes": items }))?)
            }
            OutputFormat::Table => {
                if themes.is_empty() {
                    return Ok(self.colorize("No themes found.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["Group", "Theme"]);
                for theme in themes {
                    builder.push_record([theme.group.as_str(), theme.theme.as_str()]);
                }
                Ok(self.finish_table(builder))
            }
        }
    }

    /// Format extracted quotes: the Markdown report, or records plus
    /// metadata as JSON.
    pub fn format_quotes(
        &self,
        report: &str,
        records: &[QuoteRecord],
        metadata: &ExtractionMetadata,
    ) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let quotes: Vec<serde_json::Value> = records
                    .iter()
                    .map(|r| {
                        json!({
                            "group": r.group,
                            "theme": r.theme,
                            "quote": r.quote,
                            "participant": r.participant,
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&json!({
                    "session_id": metadata.session_id.to_string(),
                    "model": metadata.model_name,
                    "documents_processed": metadata.documents_processed,
                    "processing_time_ms": metadata.processing_time_ms,
                    "quotes": quotes,
                }))?)
            }
            OutputFormat::Table => {
                if records.is_empty() {
                    return Ok(self.colorize("No quotes found.", "yellow"));
                }
                Ok(report.trim_end().to_string())
            }
        }
    }

    /// Format a chat answer.
    pub fn format_answer(&self, question: &str, answer: &str) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&json!({
                "question": question,
                "answer": answer,
            }))?),
            OutputFormat::Table => Ok(answer.to_string()),
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn finish_table(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verbatim_domain::{AliasKind, AliasRow, SessionId};

    fn metadata() -> ExtractionMetadata {
        ExtractionMetadata {
            session_id: SessionId::new(),
            model_name: "gpt-4o-mini".to_string(),
            documents_processed: 1,
            quotes_extracted: 1,
            processing_time_ms: 12,
            timestamp: 0,
        }
    }

    #[test]
    fn test_mask_review_table() {
        let table = AliasTable::build(&[AliasRow::new(AliasKind::Company, "Acme, ACME Corp")]);
        let docs = vec![Document::new("a.txt", "", "[company_1] rocks")];
        let formatter = Formatter::new(OutputFormat::Table, false);

        let output = formatter.format_mask_review(&table, &docs).unwrap();
        assert!(output.contains("Token"));
        assert!(output.contains("ACME Corp"));
        assert!(output.contains("== a.txt · (no participant)"));
        assert!(output.ends_with("[company_1] rocks"));
    }

    #[test]
    fn test_mask_review_json() {
        let table = AliasTable::build(&[AliasRow::new(AliasKind::Company, "Acme, ACME Corp")]);
        let docs = vec![Document::new("a.txt", "Jane", "[company_1] rocks")];
        let json = Formatter::new(OutputFormat::Json, false)
            .format_mask_review(&table, &docs)
            .unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["aliases"][1]["term"], "ACME Corp");
        assert_eq!(value["aliases"][1]["token"], "[company_1]");
        assert_eq!(value["documents"][0]["participant"], "Jane");
    }

    #[test]
    fn test_mask_review_empty() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter
            .format_mask_review(&AliasTable::default(), &[])
            .unwrap();
        assert!(output.contains("No aliases defined."));
        assert!(output.contains("No documents."));
    }

    #[test]
    fn test_themes_json_envelope() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter
            .format_themes(&[ThemeDefinition::new("G", "Pay")])
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["themes"][0]["theme"], "Pay");
    }

    #[test]
    fn test_themes_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter
            .format_themes(&[ThemeDefinition::new("What works", "Pay")])
            .unwrap();
        assert!(output.contains("Group"));
        assert!(output.contains("What works"));
        assert!(formatter.format_themes(&[]).unwrap().contains("No themes found"));
    }

    #[test]
    fn test_quotes_output() {
        let records = vec![QuoteRecord::new("G", "T", "q", "Jane")];
        let report = "### G\n\n#### T\n\n- q (Jane)\n\n";

        let table = Formatter::new(OutputFormat::Table, false)
            .format_quotes(report, &records, &metadata())
            .unwrap();
        assert_eq!(table, "### G\n\n#### T\n\n- q (Jane)");

        let json = Formatter::new(OutputFormat::Json, false)
            .format_quotes(report, &records, &metadata())
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["quotes"][0]["participant"], "Jane");
        assert_eq!(value["model"], "gpt-4o-mini");
    }

    #[test]
    fn test_empty_quotes() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_quotes("", &[], &metadata()).unwrap();
        assert!(output.contains("No quotes found"));
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
        assert_eq!(formatter.warning("careful"), "⚠ careful");
    }
}
