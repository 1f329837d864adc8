//! Alias module - user alias rows and the ordered alias table built from them

use std::fmt;

/// Kind of sensitive entity an alias stands for
///
/// The kind is part of every mask token (`[company_1]`, `[group_2]`, ...)
/// and scopes the occurrence counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AliasKind {
    /// A company or organisation name
    Company,

    /// A team, department or other group
    Group,

    /// An individual interviewee or person mentioned
    Participant,
}

impl AliasKind {
    /// Get the kind name as used in mask tokens
    pub fn as_str(&self) -> &'static str {
        match self {
            AliasKind::Company => "company",
            AliasKind::Group => "group",
            AliasKind::Participant => "participant",
        }
    }

    /// Parse a kind from a string, ignoring case and surrounding whitespace
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "company" => Some(AliasKind::Company),
            "group" => Some(AliasKind::Group),
            "participant" => Some(AliasKind::Participant),
            _ => None,
        }
    }
}

impl fmt::Display for AliasKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AliasKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid alias type: {}", s))
    }
}

/// One user-declared alias row: a kind and a comma-separated word list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasRow {
    /// Entity kind shared by every word in the row
    pub kind: AliasKind,

    /// Comma-separated words to alias, e.g. `"Apple Ltd, Apple"`
    pub alias: String,
}

impl AliasRow {
    /// Create a new alias row
    pub fn new(kind: AliasKind, alias: impl Into<String>) -> Self {
        Self {
            kind,
            alias: alias.into(),
        }
    }

    /// Split the alias list on commas, trimming and dropping empty words
    pub fn words(&self) -> Vec<&str> {
        self.alias
            .split(',')
            .map(str::trim)
            .filter(|w| !w.is_empty())
            .collect()
    }
}

/// Mapping from one raw term to one mask token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasRule {
    /// Entity kind
    pub kind: AliasKind,

    /// The sensitive term as the user typed it
    pub raw_term: String,

    /// 1-based index of the declaring row among rows of the same kind
    pub occurrence_index: usize,

    /// Placeholder substituted for the raw term, `[kind_index]`
    pub mask_token: String,
}

impl AliasRule {
    /// Create a rule, deriving its mask token from kind and index
    pub fn new(kind: AliasKind, raw_term: impl Into<String>, occurrence_index: usize) -> Self {
        Self {
            kind,
            raw_term: raw_term.into(),
            occurrence_index,
            mask_token: mask_token(kind, occurrence_index),
        }
    }
}

/// Format the mask token for a kind and occurrence index
///
/// # Examples
///
/// ```
/// use verbatim_domain::alias::mask_token;
/// use verbatim_domain::AliasKind;
///
/// assert_eq!(mask_token(AliasKind::Group, 3), "[group_3]");
/// ```
pub fn mask_token(kind: AliasKind, occurrence_index: usize) -> String {
    format!("[{}_{}]", kind.as_str(), occurrence_index)
}

/// Ordered sequence of alias rules
///
/// Rule order is load-bearing: masking and unmasking walk the rules strictly
/// in declaration order, so this is a `Vec`, never a set or map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    rules: Vec<AliasRule>,
}

impl AliasTable {
    /// Build the table from user rows
    ///
    /// Each row takes the next index of its kind, whether or not it yields
    /// any words, and every word of the row shares that row's mask token.
    ///
    /// # Examples
    ///
    /// ```
    /// use verbatim_domain::{AliasKind, AliasRow, AliasTable};
    ///
    /// let table = AliasTable::build(&[
    ///     AliasRow::new(AliasKind::Company, "A,B"),
    ///     AliasRow::new(AliasKind::Company, "C"),
    ///     AliasRow::new(AliasKind::Group, "D"),
    /// ]);
    /// let tokens: Vec<_> = table.iter().map(|r| r.mask_token.as_str()).collect();
    /// assert_eq!(tokens, ["[company_1]", "[company_1]", "[company_2]", "[group_1]"]);
    /// ```
    pub fn build(rows: &[AliasRow]) -> Self {
        let mut counters = [0usize; 3];
        let mut rules = Vec::new();

        for row in rows {
            let counter = &mut counters[row.kind as usize];
            *counter += 1;
            for word in row.words() {
                rules.push(AliasRule::new(row.kind, word, *counter));
            }
        }

        Self { rules }
    }

    /// Rules in table order
    pub fn rules(&self) -> &[AliasRule] {
        &self.rules
    }

    /// Iterate rules in table order
    pub fn iter(&self) -> std::slice::Iter<'_, AliasRule> {
        self.rules.iter()
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when the table has no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The raw term restored for a mask token: the first rule declaring it
    pub fn representative(&self, mask_token: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|r| r.mask_token == mask_token)
            .map(|r| r.raw_term.as_str())
    }

    /// Mask one text with every rule in table order
    pub fn mask(&self, text: &str) -> String {
        crate::masking::mask_text(text, &self.rules)
    }

    /// Mask a batch of texts, preserving their order
    pub fn mask_all<S: AsRef<str>>(&self, texts: &[S]) -> Vec<String> {
        texts.iter().map(|t| self.mask(t.as_ref())).collect()
    }

    /// Restore raw terms in a text
    pub fn unmask(&self, text: &str) -> String {
        crate::masking::unmask_text(text, &self.rules)
    }
}

impl<'a> IntoIterator for &'a AliasTable {
    type Item = &'a AliasRule;
    type IntoIter = std::slice::Iter<'a, AliasRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
