//! Document module - one uploaded transcript and its masked form

use crate::alias::AliasTable;

/// An interview transcript
///
/// The raw text never leaves the process; only `masked_text` is sent to a
/// model. The masked form is re-derived whenever the alias table changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Identifier shown to the user, usually the file name
    pub identifier: String,

    /// Participant the transcript belongs to; required before extraction
    pub participant: String,

    /// Normalised plain text
    pub raw_text: String,

    /// Text after alias masking
    pub masked_text: String,
}

impl Document {
    /// Create a document from converted plain text
    ///
    /// The text is normalised and starts out unmasked (masked text equal to
    /// raw text) until an alias table is applied.
    pub fn new(
        identifier: impl Into<String>,
        participant: impl Into<String>,
        text: &str,
    ) -> Self {
        let raw_text = normalize_text(text);
        Self {
            identifier: identifier.into(),
            participant: participant.into(),
            masked_text: raw_text.clone(),
            raw_text,
        }
    }

    /// True when a non-blank participant is assigned
    pub fn has_participant(&self) -> bool {
        !self.participant.trim().is_empty()
    }

    /// Re-derive the masked text from the raw text
    pub fn apply_aliases(&mut self, table: &AliasTable) {
        self.masked_text = table.mask(&self.raw_text);
    }
}

/// Collapse runs of three or more newlines into a single blank line
///
/// # Examples
///
/// ```
/// use verbatim_domain::normalize_text;
///
/// assert_eq!(normalize_text("Q1\n\n\n\nA1\n\nQ2"), "Q1\n\nA1\n\nQ2");
/// ```
pub fn normalize_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut newlines = 0;

    for c in text.chars() {
        if c == '\n' {
            newlines += 1;
            if newlines <= 2 {
                out.push(c);
            }
        } else {
            newlines = 0;
            out.push(c);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alias::{AliasKind, AliasRow};

    #[test]
    fn test_new_document_starts_unmasked() {
        let doc = Document::new("a.txt", "Jane", "Hello\n\n\n\nWorld");
        assert_eq!(doc.raw_text, "Hello\n\nWorld");
        assert_eq!(doc.masked_text, doc.raw_text);
    }

    #[test]
    fn test_participant_required() {
        assert!(Document::new("a.txt", "Jane", "x").has_participant());
        assert!(!Document::new("a.txt", "", "x").has_participant());
        assert!(!Document::new("a.txt", "   ", "x").has_participant());
    }

    #[test]
    fn test_apply_aliases_rederives_from_raw() {
        let mut doc = Document::new("a.txt", "Jane", "Acme hired Jane");

        doc.apply_aliases(&AliasTable::build(&[AliasRow::new(AliasKind::Company, "Acme")]));
        assert_eq!(doc.masked_text, "[company_1] hired Jane");

        doc.apply_aliases(&AliasTable::build(&[AliasRow::new(AliasKind::Participant, "Jane")]));
        assert_eq!(doc.masked_text, "Acme hired [participant_1]");
        assert_eq!(doc.raw_text, "Acme hired Jane");
    }

    #[test]
    fn test_normalize_keeps_single_and_double_newlines() {
        assert_eq!(normalize_text("a\nb\n\nc"), "a\nb\n\nc");
        assert_eq!(normalize_text("\n\n\n"), "\n\n");
        assert_eq!(normalize_text(""), "");
    }
}
