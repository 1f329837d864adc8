//! Trait definitions for external interactions
//!
//! The LLM backend is the only external collaborator of the core. It is
//! reduced to one capability so the masking and aggregation pipeline can be
//! exercised against a deterministic stub.

/// Role of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChatRole {
    /// Instructions framing the conversation
    System,

    /// Content supplied on behalf of the user
    User,
}

impl ChatRole {
    /// Role name as used by chat-completion APIs
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::System => "system",
            ChatRole::User => "user",
        }
    }
}

/// One message of a chat completion request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Who is speaking
    pub role: ChatRole,

    /// Message text
    pub content: String,
}

impl ChatMessage {
    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// A named JSON schema the backend must constrain its answer to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseSchema {
    /// Schema name reported to the backend
    pub name: String,

    /// JSON schema document, serialised
    pub schema: String,
}

/// A single completion request
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Model identifier
    pub model: String,

    /// Conversation to complete
    pub messages: Vec<ChatMessage>,

    /// Sampling temperature in [0, 1]
    pub temperature: f32,

    /// Structured-output schema, if the answer must be JSON
    pub response_schema: Option<ResponseSchema>,
}

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (verbatim-llm)
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Run a chat completion and return the content of the answer
    fn complete(&self, request: &CompletionRequest) -> Result<String, Self::Error>;
}
