//! Parse structured model output into themes and quotes
//!
//! Parsing is strict: a body that is not JSON, lacks the envelope key, or
//! has an item with a missing or non-string field fails as a whole. There is
//! no partial-result fallback.

use crate::error::ExtractorError;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use verbatim_domain::{ExtractedQuote, ThemeDefinition};

#[derive(Deserialize)]
struct ThemeEnvelope {
    themes: Vec<ThemeItem>,
}

#[derive(Deserialize)]
struct ThemeItem {
    group: String,
    theme: String,
}

#[derive(Deserialize)]
struct QuoteEnvelope {
    quotes: Vec<QuoteItem>,
}

#[derive(Deserialize)]
struct QuoteItem {
    group: String,
    theme: String,
    quote: String,
}

/// Parse a `{"themes": [...]}` response
pub fn parse_theme_response(response: &str) -> Result<Vec<ThemeDefinition>, ExtractorError> {
    let envelope: ThemeEnvelope = parse_envelope(response)?;
    Ok(envelope
        .themes
        .into_iter()
        .map(|t| ThemeDefinition::new(t.group, t.theme))
        .collect())
}

/// Parse a `{"quotes": [...]}` response
pub fn parse_quote_response(response: &str) -> Result<Vec<ExtractedQuote>, ExtractorError> {
    let envelope: QuoteEnvelope = parse_envelope(response)?;
    Ok(envelope
        .quotes
        .into_iter()
        .map(|q| ExtractedQuote::new(q.group, q.theme, q.quote))
        .collect())
}

fn parse_envelope<T: DeserializeOwned>(response: &str) -> Result<T, ExtractorError> {
    let json_str = extract_json(response)?;
    serde_json::from_str(json_str)
        .map_err(|e| ExtractorError::SchemaParseFailure(format!("JSON parse error: {}", e)))
}

/// Extract JSON from a response, tolerating a markdown code fence
fn extract_json(response: &str) -> Result<&str, ExtractorError> {
    let trimmed = response.trim();

    if let Some(fenced) = trimmed.strip_prefix("```") {
        // Drop the info string (```json) and the closing fence
        let body = fenced
            .split_once('\n')
            .map(|(_, rest)| rest)
            .ok_or_else(|| ExtractorError::SchemaParseFailure("Empty code block".to_string()))?;
        Ok(body.trim_end().trim_end_matches("```").trim())
    } else {
        Ok(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_themes() {
        let response = r#"{"themes": [
            {"group": "What can be improved", "theme": "Onboarding"},
            {"group": "What is working", "theme": "Team culture"}
        ]}"#;

        let themes = parse_theme_response(response).unwrap();
        assert_eq!(
            themes,
            vec![
                ThemeDefinition::new("What can be improved", "Onboarding"),
                ThemeDefinition::new("What is working", "Team culture"),
            ]
        );
    }

    #[test]
    fn test_parse_quotes_keeps_model_order() {
        let response = r#"{"quotes": [
            {"group": "G", "theme": "T2", "quote": "second theme first"},
            {"group": "G", "theme": "T1", "quote": "then this"}
        ]}"#;

        let quotes = parse_quote_response(response).unwrap();
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].theme, "T2");
        assert_eq!(quotes[1].quote, "then this");
    }

    #[test]
    fn test_parse_empty_quote_list() {
        assert!(parse_quote_response(r#"{"quotes": []}"#).unwrap().is_empty());
    }

    #[test]
    fn test_not_json_is_schema_failure() {
        assert!(matches!(
            parse_quote_response("not json"),
            Err(ExtractorError::SchemaParseFailure(_))
        ));
        assert!(matches!(
            parse_theme_response("not json"),
            Err(ExtractorError::SchemaParseFailure(_))
        ));
    }

    #[test]
    fn test_missing_envelope_key_is_schema_failure() {
        assert!(matches!(
            parse_quote_response(r#"{"themes": []}"#),
            Err(ExtractorError::SchemaParseFailure(_))
        ));
        assert!(parse_quote_response("[]").is_err());
    }

    #[test]
    fn test_missing_item_field_fails_whole_response() {
        let response = r#"{"quotes": [
            {"group": "G", "theme": "T", "quote": "fine"},
            {"group": "G", "theme": "T"}
        ]}"#;
        assert!(matches!(
            parse_quote_response(response),
            Err(ExtractorError::SchemaParseFailure(_))
        ));
    }

    #[test]
    fn test_null_field_is_schema_failure() {
        let response = r#"{"themes": [{"group": null, "theme": "T"}]}"#;
        assert!(parse_theme_response(response).is_err());
    }

    #[test]
    fn test_parse_json_with_markdown_wrapper() {
        let response = "```json\n{\"quotes\": [{\"group\": \"G\", \"theme\": \"T\", \"quote\": \"q\"}]}\n```";
        let quotes = parse_quote_response(response).unwrap();
        assert_eq!(quotes[0].quote, "q");
    }

    #[test]
    fn test_extract_json_variants() {
        assert_eq!(extract_json(r#"  {"a": 1}  "#).unwrap(), r#"{"a": 1}"#);
        assert_eq!(extract_json("```\n{\"a\": 1}\n```").unwrap(), r#"{"a": 1}"#);
        assert!(extract_json("```").is_err());
    }

    #[test]
    fn test_mask_tokens_survive_parsing() {
        let response = r#"{"quotes": [{"group": "G", "theme": "T", "quote": "[company_1] pays well"}]}"#;
        let quotes = parse_quote_response(response).unwrap();
        assert_eq!(quotes[0].quote, "[company_1] pays well");
    }
}
