//! Verbatim LLM Provider Layer
//!
//! Implementations of the `LlmProvider` trait from `verbatim-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic, scripted provider for testing
//! - `OpenAiProvider`: OpenAI-compatible chat completions with JSON-schema output
//!
//! # Examples
//!
//! ```
//! use verbatim_llm::MockProvider;
//! use verbatim_domain::{ChatMessage, CompletionRequest, LlmProvider};
//!
//! let provider = MockProvider::new(r#"{"themes": []}"#);
//! let request = CompletionRequest {
//!     model: "gpt-4o-mini".to_string(),
//!     messages: vec![ChatMessage::user("hello")],
//!     temperature: 1.0,
//!     response_schema: None,
//! };
//! assert_eq!(provider.complete(&request).unwrap(), r#"{"themes": []}"#);
//! ```

#![warn(missing_docs)]

pub mod openai;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use verbatim_domain::traits::{CompletionRequest, LlmProvider};

pub use openai::OpenAiProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// API key missing or rejected
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

enum Scripted {
    Reply(String),
    Fail(String),
}

#[derive(Default)]
struct MockState {
    queue: VecDeque<Scripted>,
    keyed: Vec<(String, Scripted)>,
    requests: Vec<CompletionRequest>,
}

/// Mock LLM provider for deterministic testing
///
/// Answers are resolved in this order:
/// 1. a keyed response whose key occurs in any message of the request,
/// 2. the next queued response,
/// 3. the default response.
///
/// Every request is recorded and can be inspected afterwards.
///
/// # Examples
///
/// ```
/// use verbatim_llm::MockProvider;
/// use verbatim_domain::{ChatMessage, CompletionRequest, LlmProvider};
///
/// let provider = MockProvider::default();
/// provider.add_response("Jane", "about jane");
/// provider.push_response("first");
///
/// let ask = |text: &str| CompletionRequest {
///     model: "m".to_string(),
///     messages: vec![ChatMessage::user(text)],
///     temperature: 0.0,
///     response_schema: None,
/// };
/// assert_eq!(provider.complete(&ask("who is Jane?")).unwrap(), "about jane");
/// assert_eq!(provider.complete(&ask("anything")).unwrap(), "first");
/// assert_eq!(provider.complete(&ask("again")).unwrap(), "Default mock response");
/// assert_eq!(provider.call_count(), 3);
/// ```
#[derive(Clone)]
pub struct MockProvider {
    default_response: String,
    state: Arc<Mutex<MockState>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed fallback response
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Queue a response for the next unmatched request
    pub fn push_response(&self, response: impl Into<String>) {
        self.state().queue.push_back(Scripted::Reply(response.into()));
    }

    /// Queue a failure for the next unmatched request
    pub fn push_error(&self, message: impl Into<String>) {
        self.state().queue.push_back(Scripted::Fail(message.into()));
    }

    /// Answer every request mentioning `key` with `response`
    pub fn add_response(&self, key: impl Into<String>, response: impl Into<String>) {
        self.state()
            .keyed
            .push((key.into(), Scripted::Reply(response.into())));
    }

    /// Fail every request mentioning `key`
    pub fn add_error(&self, key: impl Into<String>) {
        self.state()
            .keyed
            .push((key.into(), Scripted::Fail("Mock error".to_string())));
    }

    /// Number of completions requested so far
    pub fn call_count(&self) -> usize {
        self.state().requests.len()
    }

    /// Copies of every request received, in arrival order
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.state().requests.clone()
    }

    /// Forget recorded requests
    pub fn reset(&self) {
        self.state().requests.clear();
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl std::fmt::Debug for MockProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockProvider")
            .field("default_response", &self.default_response)
            .field("call_count", &self.call_count())
            .finish()
    }
}

impl LlmProvider for MockProvider {
    type Error = LlmError;

    fn complete(&self, request: &CompletionRequest) -> Result<String, Self::Error> {
        let mut state = self.state();
        state.requests.push(request.clone());

        let keyed = state
            .keyed
            .iter()
            .find(|(key, _)| {
                request
                    .messages
                    .iter()
                    .any(|m| m.content.contains(key.as_str()))
            })
            .map(|(_, scripted)| match scripted {
                Scripted::Reply(r) => Ok(r.clone()),
                Scripted::Fail(e) => Err(LlmError::Other(e.clone())),
            });

        if let Some(result) = keyed {
            return result;
        }

        match state.queue.pop_front() {
            Some(Scripted::Reply(r)) => Ok(r),
            Some(Scripted::Fail(e)) => Err(LlmError::Other(e)),
            None => Ok(self.default_response.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verbatim_domain::ChatMessage;

    fn request(text: &str) -> CompletionRequest {
        CompletionRequest {
            model: "test-model".to_string(),
            messages: vec![ChatMessage::system("sys"), ChatMessage::user(text)],
            temperature: 0.5,
            response_schema: None,
        }
    }

    #[test]
    fn test_mock_provider_default() {
        let provider = MockProvider::new("Test response");
        assert_eq!(provider.complete(&request("any")).unwrap(), "Test response");
    }

    #[test]
    fn test_mock_provider_queue_is_fifo() {
        let provider = MockProvider::default();
        provider.push_response("one");
        provider.push_response("two");

        assert_eq!(provider.complete(&request("a")).unwrap(), "one");
        assert_eq!(provider.complete(&request("b")).unwrap(), "two");
        assert_eq!(
            provider.complete(&request("c")).unwrap(),
            "Default mock response"
        );
    }

    #[test]
    fn test_mock_provider_keyed_wins_over_queue() {
        let provider = MockProvider::default();
        provider.push_response("queued");
        provider.add_response("special", "keyed");

        assert_eq!(provider.complete(&request("a special case")).unwrap(), "keyed");
        assert_eq!(provider.complete(&request("plain")).unwrap(), "queued");
    }

    #[test]
    fn test_mock_provider_errors() {
        let provider = MockProvider::default();
        provider.add_error("bad prompt");
        provider.push_error("queued failure");

        assert!(matches!(
            provider.complete(&request("bad prompt")),
            Err(LlmError::Other(_))
        ));
        assert!(matches!(
            provider.complete(&request("next")),
            Err(LlmError::Other(msg)) if msg == "queued failure"
        ));
    }

    #[test]
    fn test_mock_provider_records_requests() {
        let provider = MockProvider::new("ok");
        provider.complete(&request("first")).unwrap();
        provider.complete(&request("second")).unwrap();

        let requests = provider.requests();
        assert_eq!(provider.call_count(), 2);
        assert_eq!(requests[0].messages[1].content, "first");
        assert_eq!(requests[1].temperature, 0.5);

        provider.reset();
        assert_eq!(provider.call_count(), 0);
    }

    #[test]
    fn test_mock_provider_clone_shares_state() {
        let provider1 = MockProvider::new("test");
        let provider2 = provider1.clone();

        provider1.complete(&request("x")).unwrap();

        assert_eq!(provider1.call_count(), 1);
        assert_eq!(provider2.call_count(), 1);
    }
}
