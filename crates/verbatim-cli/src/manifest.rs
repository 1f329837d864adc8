//! Run manifest: which transcripts to analyse, with aliases and themes.
//!
//! ```toml
//! [[documents]]
//! path = "interviews/jane.txt"
//! participant = "Jane"
//!
//! [[aliases]]
//! type = "company"
//! alias = "Apple Ltd, Apple"
//!
//! [[themes]]
//! group = "What can be improved"
//! theme = "Onboarding"
//! ```
//!
//! Relative document paths resolve against the manifest's directory.
//! Themes are written in raw terms and masked when loaded.

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use verbatim_domain::{AliasKind, AliasRow, ThemeDefinition};
use verbatim_extractor::Session;

/// Parsed manifest file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    /// Transcripts in upload order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub documents: Vec<DocumentEntry>,

    /// Alias rows in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<AliasEntry>,

    /// Theme list
    #[serde(default)]
    pub themes: Vec<ThemeEntry>,
}

/// One transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentEntry {
    /// Plain-text file
    pub path: PathBuf,

    /// Participant; may be left empty, which blocks extraction
    #[serde(default)]
    pub participant: String,
}

/// One alias row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AliasEntry {
    /// `company`, `group` or `participant`
    #[serde(rename = "type")]
    pub kind: String,

    /// Comma-separated words
    #[serde(default)]
    pub alias: String,
}

/// One theme.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeEntry {
    /// Group label
    pub group: String,

    /// Theme label; blank entries are skipped at extraction time
    #[serde(default)]
    pub theme: String,
}

impl Manifest {
    /// Parse manifest TOML.
    pub fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| CliError::Manifest(e.to_string()))
    }

    /// Read and parse a manifest file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            CliError::Manifest(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Self::parse(&contents)
    }

    /// Typed alias rows, rejecting unknown kinds.
    pub fn alias_rows(&self) -> Result<Vec<AliasRow>> {
        self.aliases
            .iter()
            .map(|a| {
                AliasKind::parse(&a.kind)
                    .map(|kind| AliasRow::new(kind, a.alias.clone()))
                    .ok_or_else(|| {
                        CliError::Manifest(format!(
                            "Unknown alias type '{}' (expected company, group or participant)",
                            a.kind
                        ))
                    })
            })
            .collect()
    }

    /// Theme definitions as written.
    pub fn theme_definitions(&self) -> Vec<ThemeDefinition> {
        self.themes
            .iter()
            .map(|t| ThemeDefinition::new(t.group.clone(), t.theme.clone()))
            .collect()
    }

    /// Build a session: read every document, apply aliases, then themes.
    pub fn into_session(self, base_dir: &Path) -> Result<Session> {
        let rows = self.alias_rows()?;
        let themes = self.theme_definitions();
        let mut session = Session::new();

        for entry in &self.documents {
            let path = if entry.path.is_absolute() {
                entry.path.clone()
            } else {
                base_dir.join(&entry.path)
            };
            let text = fs::read_to_string(&path).map_err(|e| {
                CliError::Manifest(format!("Cannot read document {}: {}", path.display(), e))
            })?;

            let identifier = entry
                .path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| entry.path.display().to_string());

            debug!("Loaded {} ({} chars)", identifier, text.len());
            session.add_document(identifier, entry.participant.clone(), &text);
        }

        session.set_alias_rows(rows);
        session.set_themes_from_raw(themes);
        Ok(session)
    }
}

/// Load a manifest file into a session.
pub fn load_session(path: &Path) -> Result<Session> {
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    Manifest::from_file(path)?.into_session(base_dir)
}

/// Render themes as `[[themes]]` TOML, ready to paste into a manifest.
pub fn themes_to_toml(themes: &[ThemeDefinition]) -> Result<String> {
    let manifest = Manifest {
        themes: themes
            .iter()
            .map(|t| ThemeEntry {
                group: t.group.clone(),
                theme: t.theme.clone(),
            })
            .collect(),
        ..Manifest::default()
    };
    toml::to_string_pretty(&manifest)
        .map_err(|e| CliError::Manifest(format!("Failed to serialize themes: {}", e)))
}
