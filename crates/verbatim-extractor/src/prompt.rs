//! Prompt construction for theme definition, quote extraction and chat

use serde_json::json;
use verbatim_domain::{ChatMessage, ThemeDefinition};

const THEME_SYSTEM_PROMPT: &str = "You will receive a set of interview responses. \
Please group key themes based on the groups provided by the user.";

const QUOTE_SYSTEM_PROMPT: &str =
    "You are a helpful assistant who finds verbatim quotes for themes within survey responses";

const CHAT_SYSTEM_PROMPT: &str = "You will receive a set of interview responses. \
Please answer the question based on the responses provided by the user.";

const KEEP_MASK_TOKENS: &str = "If applicable, in your response keep entities such as \
company_, group_ and participant_ as is with [] brackets";

/// Render a list of texts as a JSON array string
pub fn corpus_json<S: AsRef<str>>(texts: &[S]) -> String {
    let values: Vec<serde_json::Value> = texts
        .iter()
        .map(|t| serde_json::Value::from(t.as_ref()))
        .collect();
    serde_json::Value::Array(values).to_string()
}

/// Render themes as a JSON array of `{group, theme}` objects
pub fn themes_json(themes: &[ThemeDefinition]) -> String {
    let values: Vec<serde_json::Value> = themes
        .iter()
        .map(|t| json!({ "group": t.group, "theme": t.theme }))
        .collect();
    serde_json::Value::Array(values).to_string()
}

/// Messages asking the model to propose themes per group
pub fn theme_messages<S: AsRef<str>>(
    corpus: &[S],
    grouping_instructions: &str,
    max_themes_per_group: u32,
) -> Vec<ChatMessage> {
    let system = format!(
        "{} Provide {} themes for each of the groups",
        THEME_SYSTEM_PROMPT, max_themes_per_group
    );

    let mut user = String::new();
    user.push_str("---\n");
    user.push_str("The interview responses are listed below:\n");
    user.push_str(&corpus_json(corpus));
    user.push_str("\n\n---\n");
    user.push_str("The groupings for themes are listed below:\n");
    user.push_str(grouping_instructions);

    vec![ChatMessage::system(system), ChatMessage::user(user)]
}

/// Messages asking the model for verbatim quotes from one document
pub fn quote_messages(
    document_text: &str,
    themes: &[ThemeDefinition],
    max_quotes: u32,
    additional_notes: &str,
) -> Vec<ChatMessage> {
    let mut user = String::new();
    user.push_str("---\n");
    user.push_str(&format!(
        "Only provide {} verbatim quote(s) per theme.\n\n",
        max_quotes
    ));
    user.push_str("---\n\n");
    user.push_str("The themes are listed below:\n");
    user.push_str(&themes_json(themes));
    user.push_str("\n-----------\n\n");
    user.push_str("The survey response is listed below:\n");
    user.push_str(document_text);
    user.push_str("\n\n");
    user.push_str(KEEP_MASK_TOKENS);
    user.push_str("\n\n---\n");
    user.push_str("Consider these additional notes:\n");
    user.push_str(additional_notes);

    vec![
        ChatMessage::system(QUOTE_SYSTEM_PROMPT),
        ChatMessage::user(user),
    ]
}

/// Messages for a free-form question over the corpus
pub fn chat_messages<S: AsRef<str>>(corpus: &[S], question: &str) -> Vec<ChatMessage> {
    let mut user = String::new();
    user.push_str("---\n");
    user.push_str("The interview responses are listed below:\n");
    user.push_str(&corpus_json(corpus));
    user.push_str("\n\n");
    user.push_str(KEEP_MASK_TOKENS);
    user.push_str("\n\n---\n");
    user.push_str("The question is listed below:\n");
    user.push_str(question);

    vec![ChatMessage::system(CHAT_SYSTEM_PROMPT), ChatMessage::user(user)]
}
