//! JSON response schemas sent with structured requests

use serde_json::json;
use verbatim_domain::ResponseSchema;

/// Name reported to the backend for every schema
pub const SCHEMA_NAME: &str = "response";

fn string_object(fields: &[&str]) -> serde_json::Value {
    let properties: serde_json::Map<String, serde_json::Value> = fields
        .iter()
        .map(|f| (f.to_string(), json!({ "type": "string" })))
        .collect();

    json!({
        "type": "object",
        "properties": properties,
        "required": fields,
        "additionalProperties": false,
    })
}

fn envelope(key: &str, item: serde_json::Value) -> ResponseSchema {
    let schema = json!({
        "type": "object",
        "properties": {
            key: { "type": "array", "items": item }
        },
        "required": [key],
        "additionalProperties": false,
    });

    ResponseSchema {
        name: SCHEMA_NAME.to_string(),
        schema: schema.to_string(),
    }
}

/// Schema for `{"themes": [{"group", "theme"}]}`
pub fn theme_schema() -> ResponseSchema {
    envelope("themes", string_object(&["group", "theme"]))
}

/// Schema for `{"quotes": [{"group", "theme", "quote"}]}`
pub fn quote_schema() -> ResponseSchema {
    envelope("quotes", string_object(&["group", "theme", "quote"]))
}
