//! OpenAI-compatible Provider Implementation
//!
//! Talks to any endpoint implementing the `/chat/completions` API. When a
//! request carries a response schema, the schema is forwarded as a strict
//! `json_schema` response format so the model answers with parseable JSON.
//!
//! Calls are blocking and are not retried; the extractor runs them on a
//! blocking thread under its own timeout.
//!
//! # Examples
//!
//! ```no_run
//! use verbatim_llm::OpenAiProvider;
//!
//! let provider = OpenAiProvider::from_env(verbatim_llm::openai::DEFAULT_BASE_URL, "OPENAI_API_KEY")
//!     .expect("API key set");
//! ```

use crate::LlmError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use verbatim_domain::traits::{CompletionRequest, LlmProvider};

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default HTTP timeout (120 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Provider for OpenAI-compatible chat completion endpoints
pub struct OpenAiProvider {
    base_url: String,
    api_key: String,
    client: reqwest::blocking::Client,
}

#[derive(Serialize)]
struct ChatCompletionBody {
    model: String,
    messages: Vec<WireMessage>,
    temperature: f32,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct WireMessage {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
    json_schema: JsonSchemaFormat,
}

#[derive(Serialize)]
struct JsonSchemaFormat {
    name: String,
    strict: bool,
    schema: serde_json::Value,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

impl OpenAiProvider {
    /// Create a new provider
    ///
    /// # Parameters
    ///
    /// - `base_url`: API root, e.g. `https://api.openai.com/v1`
    /// - `api_key`: bearer token sent with every request
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, LlmError> {
        Self::with_timeout(base_url, api_key, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a new provider with a specific HTTP timeout
    pub fn with_timeout(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Communication(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        })
    }

    /// Create a provider reading the API key from an environment variable
    pub fn from_env(base_url: impl Into<String>, key_var: &str) -> Result<Self, LlmError> {
        let api_key = std::env::var(key_var)
            .map_err(|_| LlmError::Authentication(format!("{} is not set", key_var)))?;
        Self::new(base_url, api_key)
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

fn build_body(request: &CompletionRequest) -> Result<ChatCompletionBody, LlmError> {
    let response_format = match &request.response_schema {
        Some(schema) => {
            let schema_value = serde_json::from_str(&schema.schema)
                .map_err(|e| LlmError::Other(format!("Invalid response schema: {}", e)))?;
            Some(ResponseFormat {
                kind: "json_schema",
                json_schema: JsonSchemaFormat {
                    name: schema.name.clone(),
                    strict: true,
                    schema: schema_value,
                },
            })
        }
        None => None,
    };

    Ok(ChatCompletionBody {
        model: request.model.clone(),
        messages: request
            .messages
            .iter()
            .map(|m| WireMessage {
                role: m.role.as_str(),
                content: m.content.clone(),
            })
            .collect(),
        temperature: request.temperature,
        stream: false,
        response_format,
    })
}

fn status_error(status: reqwest::StatusCode, model: &str, body: String) -> LlmError {
    match status.as_u16() {
        401 | 403 => LlmError::Authentication(format!("HTTP {}", status)),
        404 => LlmError::ModelNotAvailable(model.to_string()),
        429 => LlmError::RateLimitExceeded,
        _ => LlmError::Communication(format!("HTTP {}: {}", status, body)),
    }
}

fn extract_content(response: ChatCompletionResponse) -> Result<String, LlmError> {
    let message = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::InvalidResponse("Response has no choices".to_string()))?
        .message;

    match (message.content, message.refusal) {
        (Some(content), _) => Ok(content),
        (None, Some(refusal)) => Err(LlmError::InvalidResponse(format!(
            "Model refused: {}",
            refusal
        ))),
        (None, None) => Err(LlmError::InvalidResponse(
            "Response message has no content".to_string(),
        )),
    }
}

impl LlmProvider for OpenAiProvider {
    type Error = LlmError;

    fn complete(&self, request: &CompletionRequest) -> Result<String, Self::Error> {
        let body = build_body(request)?;

        debug!(
            "POST {} model={} messages={} structured={}",
            self.endpoint(),
            request.model,
            request.messages.len(),
            request.response_schema.is_some()
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(status_error(status, &request.model, text));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        extract_content(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verbatim_domain::traits::{ChatMessage, ResponseSchema};

    fn request(schema: Option<ResponseSchema>) -> CompletionRequest {
        CompletionRequest {
            model: "gpt-4o-mini".to_string(),
            messages: vec![ChatMessage::system("be helpful"), ChatMessage::user("hi")],
            temperature: 0.3,
            response_schema: schema,
        }
    }

    #[test]
    fn test_provider_creation_trims_base_url() {
        let provider = OpenAiProvider::new("http://localhost:8000/v1/", "key").unwrap();
        assert_eq!(provider.endpoint(), "http://localhost:8000/v1/chat/completions");
    }

    #[test]
    fn test_from_env_missing_key() {
        let result = OpenAiProvider::from_env(DEFAULT_BASE_URL, "VERBATIM_TEST_KEY_THAT_IS_NOT_SET");
        assert!(matches!(result, Err(LlmError::Authentication(_))));
    }

    #[test]
    fn test_body_without_schema() {
        let body = build_body(&request(None)).unwrap();
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hi");
        assert_eq!(json["stream"], false);
        assert!(json.get("response_format").is_none());
    }

    #[test]
    fn test_body_with_schema() {
        let schema = ResponseSchema {
            name: "response".to_string(),
            schema: r#"{"type":"object"}"#.to_string(),
        };
        let body = build_body(&request(Some(schema))).unwrap();
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["response_format"]["type"], "json_schema");
        assert_eq!(json["response_format"]["json_schema"]["name"], "response");
        assert_eq!(json["response_format"]["json_schema"]["strict"], true);
        assert_eq!(json["response_format"]["json_schema"]["schema"]["type"], "object");
    }

    #[test]
    fn test_body_with_invalid_schema() {
        let schema = ResponseSchema {
            name: "response".to_string(),
            schema: "{not json".to_string(),
        };
        assert!(matches!(
            build_body(&request(Some(schema))),
            Err(LlmError::Other(_))
        ));
    }

    #[test]
    fn test_status_mapping() {
        use reqwest::StatusCode;

        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, "m", String::new()),
            LlmError::Authentication(_)
        ));
        assert!(matches!(
            status_error(StatusCode::NOT_FOUND, "m", String::new()),
            LlmError::ModelNotAvailable(model) if model == "m"
        ));
        assert!(matches!(
            status_error(StatusCode::TOO_MANY_REQUESTS, "m", String::new()),
            LlmError::RateLimitExceeded
        ));
        assert!(matches!(
            status_error(StatusCode::BAD_GATEWAY, "m", "upstream".to_string()),
            LlmError::Communication(msg) if msg.contains("upstream")
        ));
    }

    #[test]
    fn test_extract_content() {
        let response: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"{\"themes\":[]}"}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_content(response).unwrap(), r#"{"themes":[]}"#);

        let refused: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"content":null,"refusal":"no"}}]}"#,
        )
        .unwrap();
        assert!(matches!(
            extract_content(refused),
            Err(LlmError::InvalidResponse(_))
        ));

        let empty: ChatCompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(extract_content(empty).is_err());
    }

    #[test]
    fn test_connection_error() {
        let provider =
            OpenAiProvider::with_timeout("http://127.0.0.1:1", "key", Duration::from_secs(2))
                .unwrap();

        match provider.complete(&request(None)) {
            Err(LlmError::Communication(_)) => {}
            other => panic!("Expected Communication error, got {:?}", other.map(|_| ())),
        }
    }
}
