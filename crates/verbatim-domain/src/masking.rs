//! Masking and unmasking of sensitive terms
//!
//! Masking walks the alias table in declaration order and, for every rule,
//! replaces each case variant of the raw term with the rule's mask token.
//! Replaced text is consumed: it is held as a token span that later rules
//! and later variants never look inside. That makes declaration order the
//! only tie-break between overlapping terms. If `"apple"` is declared before
//! `"apple pie"`, the second rule never sees a match.
//!
//! Unmasking is the reverse substitution over plain text. A token shared by
//! several words of one alias row restores only the first of them.

use crate::alias::{AliasRule, AliasTable};

/// A piece of text during masking: either still open to matching or already
/// replaced by a mask token
#[derive(Debug, Clone, PartialEq, Eq)]
enum Span {
    Open(String),
    Masked(String),
}

/// Case variants of a raw term, in the order they are applied
///
/// Lower, upper, title (first letter of each word upper, rest lower),
/// sentence (first letter upper, rest unchanged), then the term as
/// declared. Duplicates are dropped.
///
/// # Examples
///
/// ```
/// use verbatim_domain::case_variants;
///
/// assert_eq!(
///     case_variants("apple ltd"),
///     ["apple ltd", "APPLE LTD", "Apple Ltd", "Apple ltd"]
/// );
/// ```
pub fn case_variants(term: &str) -> Vec<String> {
    let candidates = [
        term.to_lowercase(),
        term.to_uppercase(),
        title_case(term),
        sentence_case(term),
        // Mixed-case terms such as "iPhone" match none of the above
        term.to_string(),
    ];

    let mut variants: Vec<String> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if !candidate.is_empty() && !variants.contains(&candidate) {
            variants.push(candidate);
        }
    }
    variants
}

fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

fn sentence_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Replace every open occurrence of `needle` with `token`, left to right,
/// non-overlapping
fn replace_open(spans: Vec<Span>, needle: &str, token: &str) -> Vec<Span> {
    let mut out = Vec::with_capacity(spans.len());

    for span in spans {
        match span {
            Span::Open(text) if text.contains(needle) => {
                let mut pieces = text.split(needle);
                if let Some(head) = pieces.next() {
                    push_open(&mut out, head);
                }
                for piece in pieces {
                    out.push(Span::Masked(token.to_string()));
                    push_open(&mut out, piece);
                }
            }
            other => out.push(other),
        }
    }

    out
}

fn push_open(spans: &mut Vec<Span>, text: &str) {
    if !text.is_empty() {
        spans.push(Span::Open(text.to_string()));
    }
}

/// Mask a text with the given rules, strictly in rule order
///
/// Absence of a match is a silent no-op.
pub fn mask_text(text: &str, rules: &[AliasRule]) -> String {
    let mut spans = vec![Span::Open(text.to_string())];

    for rule in rules {
        for variant in case_variants(&rule.raw_term) {
            spans = replace_open(spans, &variant, &rule.mask_token);
        }
    }

    spans
        .into_iter()
        .map(|span| match span {
            Span::Open(s) | Span::Masked(s) => s,
        })
        .collect()
}

/// Replace mask tokens with their raw terms, in rule order
///
/// The first rule carrying a token wins; later rules sharing that token find
/// nothing left to replace.
pub fn unmask_text(text: &str, rules: &[AliasRule]) -> String {
    let mut out = text.to_string();
    for rule in rules {
        if out.contains(&rule.mask_token) {
            out = out.replace(&rule.mask_token, &rule.raw_term);
        }
    }
    out
}

/// Values that can have their mask tokens resolved back to raw terms
///
/// Unmasking keeps the shape of the value: a string stays a string, an
/// aggregated report keeps its buckets and ordering.
pub trait Unmask {
    /// Return a copy with every mask token replaced by its raw term
    fn unmask(&self, table: &AliasTable) -> Self;
}

impl Unmask for String {
    fn unmask(&self, table: &AliasTable) -> Self {
        table.unmask(self)
    }
}

impl<T: Unmask> Unmask for Vec<T> {
    fn unmask(&self, table: &AliasTable) -> Self {
        self.iter().map(|item| item.unmask(table)).collect()
    }
}

impl<T: Unmask> Unmask for Option<T> {
    fn unmask(&self, table: &AliasTable) -> Self {
        self.as_ref().map(|item| item.unmask(table))
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::alias::{AliasKind, AliasRow};
    use proptest::prelude::*;

    fn token_or_word() -> impl Strategy<Value = String> {
        prop_oneof![
            (1usize..4).prop_map(|i| format!("[company_{}]", i)),
            (1usize..4).prop_map(|i| format!("[group_{}]", i)),
            "[a-z ]{0,8}",
        ]
    }

    proptest! {
        /// Property: masking then unmasking restores the text when rules hold
        /// single, non-nested lowercase terms
        #[test]
        fn test_mask_unmask_roundtrip(
            terms in prop::collection::vec("[a-z]{3,6}", 1..4),
            text in "[a-z .,]{0,60}",
        ) {
            for (i, a) in terms.iter().enumerate() {
                for (j, b) in terms.iter().enumerate() {
                    prop_assume!(i == j || !a.contains(b.as_str()));
                }
            }
            let rows: Vec<_> = terms
                .iter()
                .map(|t| AliasRow::new(AliasKind::Company, t.clone()))
                .collect();
            let table = AliasTable::build(&rows);

            let masked = table.mask(&text);
            prop_assert_eq!(table.unmask(&masked), text);
        }

        /// Property: unmasking is idempotent
        #[test]
        fn test_unmask_idempotent(
            terms in prop::collection::vec("[a-zA-Z ]{1,8}", 0..4),
            parts in prop::collection::vec(token_or_word(), 0..10),
        ) {
            let rows: Vec<_> = terms
                .iter()
                .map(|t| AliasRow::new(AliasKind::Company, t.clone()))
                .chain(terms.iter().map(|t| AliasRow::new(AliasKind::Group, t.clone())))
                .collect();
            let table = AliasTable::build(&rows);
            let text = parts.concat();

            let once = table.unmask(&text);
            prop_assert_eq!(table.unmask(&once), once);
        }

        /// Property: no masked text still contains a lowercase or uppercase
        /// copy of a masked term
        #[test]
        fn test_no_residual_variants(
            term in "[a-z]{3,6}",
            prefix in "[a-z ]{0,10}",
            suffix in "[a-z ]{0,10}",
        ) {
            let table = AliasTable::build(&[AliasRow::new(AliasKind::Participant, term.clone())]);
            let text = format!("{} {} {} {}", prefix, term, term.to_uppercase(), suffix);

            let masked = table.mask(&text);
            prop_assert!(masked.contains("[participant_1]"));

            let residue = masked.replace("[participant_1]", "|");
            prop_assert!(!residue.contains(&term));
            prop_assert!(!residue.contains(&term.to_uppercase()));
        }
    }
}
