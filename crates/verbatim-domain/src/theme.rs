//! Theme module - group/theme pairs used to steer quote extraction

use crate::alias::AliasTable;
use crate::masking::Unmask;

/// A theme within a group, authored by hand or proposed by a model
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ThemeDefinition {
    /// Grouping the theme belongs to, e.g. "What can be improved"
    pub group: String,

    /// Theme label
    pub theme: String,
}

impl ThemeDefinition {
    /// Create a new theme definition
    pub fn new(group: impl Into<String>, theme: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            theme: theme.into(),
        }
    }

    /// True when the theme label is empty or whitespace
    pub fn is_blank(&self) -> bool {
        self.theme.trim().is_empty()
    }
}

impl Unmask for ThemeDefinition {
    fn unmask(&self, table: &AliasTable) -> Self {
        Self {
            group: table.unmask(&self.group),
            theme: table.unmask(&self.theme),
        }
    }
}

/// Themes with a non-blank label, in their original order
pub fn active_themes(themes: &[ThemeDefinition]) -> Vec<ThemeDefinition> {
    themes.iter().filter(|t| !t.is_blank()).cloned().collect()
}
