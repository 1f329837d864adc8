//! Quote module - extracted quotes and their group → theme aggregation

use crate::alias::AliasTable;
use crate::masking::Unmask;

/// A quote as returned by the model for one document, before the
/// participant is known
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedQuote {
    /// Group the quote supports
    pub group: String,

    /// Theme the quote supports
    pub theme: String,

    /// Verbatim quote, possibly containing mask tokens
    pub quote: String,
}

impl ExtractedQuote {
    /// Create a new extracted quote
    pub fn new(
        group: impl Into<String>,
        theme: impl Into<String>,
        quote: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            theme: theme.into(),
            quote: quote.into(),
        }
    }

    /// Tag the quote with the participant of its source document
    pub fn with_participant(self, participant: impl Into<String>) -> QuoteRecord {
        QuoteRecord {
            group: self.group,
            theme: self.theme,
            quote: self.quote,
            participant: participant.into(),
        }
    }
}

/// One verbatim quote tied to a group, theme and participant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRecord {
    /// Group the quote supports
    pub group: String,

    /// Theme the quote supports
    pub theme: String,

    /// Verbatim quote, possibly containing mask tokens
    pub quote: String,

    /// Participant whose document the quote came from
    pub participant: String,
}

impl QuoteRecord {
    /// Create a new quote record
    pub fn new(
        group: impl Into<String>,
        theme: impl Into<String>,
        quote: impl Into<String>,
        participant: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            theme: theme.into(),
            quote: quote.into(),
            participant: participant.into(),
        }
    }
}

impl Unmask for QuoteRecord {
    fn unmask(&self, table: &AliasTable) -> Self {
        Self {
            group: table.unmask(&self.group),
            theme: table.unmask(&self.theme),
            quote: table.unmask(&self.quote),
            participant: table.unmask(&self.participant),
        }
    }
}

/// A quote and who said it, as stored under a theme
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantQuote {
    /// Verbatim quote
    pub quote: String,

    /// Participant name
    pub participant: String,
}

impl ParticipantQuote {
    /// Create a new participant quote
    pub fn new(quote: impl Into<String>, participant: impl Into<String>) -> Self {
        Self {
            quote: quote.into(),
            participant: participant.into(),
        }
    }
}

/// Quotes collected under one theme
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeBucket {
    /// Theme label
    pub theme: String,

    /// Quotes in production order
    pub quotes: Vec<ParticipantQuote>,
}

/// Themes collected under one group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupBucket {
    /// Group label
    pub group: String,

    /// Themes in first-seen order
    pub themes: Vec<ThemeBucket>,
}

impl GroupBucket {
    /// Look up a theme bucket by label
    pub fn theme(&self, theme: &str) -> Option<&ThemeBucket> {
        self.themes.iter().find(|t| t.theme == theme)
    }

    fn theme_mut(&mut self, theme: &str) -> &mut ThemeBucket {
        let idx = match self.themes.iter().position(|t| t.theme == theme) {
            Some(idx) => idx,
            None => {
                self.themes.push(ThemeBucket {
                    theme: theme.to_string(),
                    quotes: Vec::new(),
                });
                self.themes.len() - 1
            }
        };
        &mut self.themes[idx]
    }
}

/// Quotes pivoted into group → theme → quote list
///
/// Groups and themes keep first-appearance order; quotes under a theme keep
/// the order their records were produced in.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AggregatedOutput {
    /// Groups in first-seen order
    pub groups: Vec<GroupBucket>,
}

impl AggregatedOutput {
    /// Look up a group bucket by label
    pub fn group(&self, group: &str) -> Option<&GroupBucket> {
        self.groups.iter().find(|g| g.group == group)
    }

    /// True when no quotes were aggregated
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of quotes across all buckets
    pub fn quote_count(&self) -> usize {
        self.groups
            .iter()
            .flat_map(|g| g.themes.iter())
            .map(|t| t.quotes.len())
            .sum()
    }

    fn group_mut(&mut self, group: &str) -> &mut GroupBucket {
        let idx = match self.groups.iter().position(|g| g.group == group) {
            Some(idx) => idx,
            None => {
                self.groups.push(GroupBucket {
                    group: group.to_string(),
                    themes: Vec::new(),
                });
                self.groups.len() - 1
            }
        };
        &mut self.groups[idx]
    }
}

impl Unmask for AggregatedOutput {
    fn unmask(&self, table: &AliasTable) -> Self {
        let groups = self
            .groups
            .iter()
            .map(|g| GroupBucket {
                group: table.unmask(&g.group),
                themes: g
                    .themes
                    .iter()
                    .map(|t| ThemeBucket {
                        theme: table.unmask(&t.theme),
                        quotes: t
                            .quotes
                            .iter()
                            .map(|q| ParticipantQuote {
                                quote: table.unmask(&q.quote),
                                participant: table.unmask(&q.participant),
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect();
        Self { groups }
    }
}

/// Fold quote records into an aggregated output
///
/// No sorting and no deduplication: a quote produced twice appears twice.
///
/// # Examples
///
/// ```
/// use verbatim_domain::{aggregate, QuoteRecord};
///
/// let output = aggregate(&[
///     QuoteRecord::new("G1", "T1", "q1", "P1"),
///     QuoteRecord::new("G1", "T2", "q2", "P1"),
///     QuoteRecord::new("G1", "T1", "q3", "P2"),
/// ]);
/// let g1 = output.group("G1").unwrap();
/// assert_eq!(g1.themes[0].theme, "T1");
/// assert_eq!(g1.themes[0].quotes.len(), 2);
/// assert_eq!(g1.themes[1].theme, "T2");
/// ```
pub fn aggregate(records: &[QuoteRecord]) -> AggregatedOutput {
    let mut output = AggregatedOutput::default();

    for record in records {
        output
            .group_mut(&record.group)
            .theme_mut(&record.theme)
            .quotes
            .push(ParticipantQuote::new(
                record.quote.clone(),
                record.participant.clone(),
            ));
    }

    output
}
