//! Run context for one analysis
//!
//! A [`Session`] owns everything an analysis needs between steps: the
//! uploaded documents, the alias rows and the table built from them, and the
//! current theme list. Changing the alias rows re-masks every document, so
//! `masked_text` always reflects the current table.

use crate::error::ExtractorError;
use verbatim_domain::{
    active_themes, render_markdown, AggregatedOutput, AliasRow, AliasTable, Document,
    SessionId, ThemeDefinition, Unmask,
};

/// Documents, aliases and themes for one analysis
#[derive(Debug, Clone, Default)]
pub struct Session {
    id: SessionId,
    documents: Vec<Document>,
    alias_rows: Vec<AliasRow>,
    alias_table: AliasTable,
    themes: Vec<ThemeDefinition>,
}

impl Session {
    /// Create an empty session with a fresh id
    pub fn new() -> Self {
        Self::default()
    }

    /// Session identifier
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Add a document, masked with the current alias table
    ///
    /// Returns the document's index.
    pub fn add_document(
        &mut self,
        identifier: impl Into<String>,
        participant: impl Into<String>,
        text: &str,
    ) -> usize {
        let mut document = Document::new(identifier, participant, text);
        document.apply_aliases(&self.alias_table);
        self.documents.push(document);
        self.documents.len() - 1
    }

    /// Documents in upload order
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Assign the participant of a document
    pub fn set_participant(
        &mut self,
        index: usize,
        participant: impl Into<String>,
    ) -> Result<(), ExtractorError> {
        let document = self
            .documents
            .get_mut(index)
            .ok_or(ExtractorError::UnknownDocument(index))?;
        document.participant = participant.into();
        Ok(())
    }

    /// Replace the alias rows, rebuild the table and re-mask every document
    pub fn set_alias_rows(&mut self, rows: Vec<AliasRow>) {
        self.alias_table = AliasTable::build(&rows);
        self.alias_rows = rows;
        for document in &mut self.documents {
            document.apply_aliases(&self.alias_table);
        }
    }

    /// Alias rows as declared
    pub fn alias_rows(&self) -> &[AliasRow] {
        &self.alias_rows
    }

    /// Alias table built from the current rows
    pub fn alias_table(&self) -> &AliasTable {
        &self.alias_table
    }

    /// Replace the theme list
    pub fn set_themes(&mut self, themes: Vec<ThemeDefinition>) {
        self.themes = themes;
    }

    /// Replace the theme list with themes written in raw terms
    ///
    /// Each theme is masked with the current alias table, so hand-written
    /// labels never carry an aliased term into a prompt.
    pub fn set_themes_from_raw(&mut self, themes: Vec<ThemeDefinition>) {
        self.themes = themes
            .into_iter()
            .map(|t| {
                ThemeDefinition::new(
                    self.alias_table.mask(&t.group),
                    self.alias_table.mask(&t.theme),
                )
            })
            .collect();
    }

    /// Current theme list, including blank entries
    pub fn themes(&self) -> &[ThemeDefinition] {
        &self.themes
    }

    /// Mutable access for editing themes in place
    pub fn themes_mut(&mut self) -> &mut Vec<ThemeDefinition> {
        &mut self.themes
    }

    /// Themes with a non-blank label
    pub fn active_themes(&self) -> Vec<ThemeDefinition> {
        active_themes(&self.themes)
    }

    /// Readiness gate run before any model call
    ///
    /// Fails with `EmptyInput` when there are no documents and with
    /// `MissingParticipant` listing every document without a participant.
    pub fn check_ready(&self) -> Result<(), ExtractorError> {
        if self.documents.is_empty() {
            return Err(ExtractorError::EmptyInput);
        }

        let missing: Vec<String> = self
            .documents
            .iter()
            .filter(|d| !d.has_participant())
            .map(|d| d.identifier.clone())
            .collect();

        if !missing.is_empty() {
            return Err(ExtractorError::MissingParticipant(missing));
        }
        Ok(())
    }

    /// Masked texts of every document, in upload order
    pub fn masked_corpus(&self) -> Vec<String> {
        self.documents.iter().map(|d| d.masked_text.clone()).collect()
    }

    /// Masked texts of the documents belonging to the given participants
    ///
    /// An empty selection means every document.
    pub fn masked_corpus_for<S: AsRef<str>>(&self, participants: &[S]) -> Vec<String> {
        if participants.is_empty() {
            return self.masked_corpus();
        }
        self.documents
            .iter()
            .filter(|d| participants.iter().any(|p| p.as_ref() == d.participant))
            .map(|d| d.masked_text.clone())
            .collect()
    }

    /// Restore raw terms in any maskable value
    pub fn unmask<T: Unmask>(&self, value: &T) -> T {
        value.unmask(&self.alias_table)
    }

    /// Render aggregated quotes as Markdown with raw terms restored
    pub fn render_report(&self, output: &AggregatedOutput) -> String {
        self.alias_table.unmask(&render_markdown(output))
    }

    /// Drop all state and start over with a new id
    pub fn clear(&mut self) {
        *self = Self::new();
    }
}
