use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_MAX_TOKENS: i64 = 1024;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

/// One API key usable to authenticate a single outbound request
///
/// The secret is never printed by `Debug`; use [`Credential::fingerprint`] in logs.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// The raw secret, for the `Authorization` header only
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Masked form showing at most the last four characters
    pub fn fingerprint(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 8 {
            return "****".to_string();
        }
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("****{tail}")
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Credential({})", self.fingerprint())
    }
}

/// A caller-visible completion request
///
/// Model-independent and immutable: each attempt builds its own
/// [`ChatCompletionParams`] through [`CompletionRequest::to_params`].
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    messages: Vec<ChatMessage>,
    max_tokens: i64,
    temperature: f32,
}

impl CompletionRequest {
    pub fn new(messages: Vec<ChatMessage>, max_tokens: i64, temperature: f32) -> Self {
        Self {
            messages,
            max_tokens,
            temperature,
        }
    }

    /// Request with the default token budget and temperature
    pub fn from_messages(messages: Vec<ChatMessage>) -> Self {
        Self::new(messages, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE)
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn max_tokens(&self) -> i64 {
        self.max_tokens
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn to_params(&self, model: &str) -> ChatCompletionParams {
        ChatCompletionParams {
            model: model.to_string(),
            messages: self.messages.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

/// Body of a chat completion request (OpenAI wire format)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionParams {
    /// Model ID to use for the completion
    pub model: String,

    /// List of messages comprising the conversation so far
    pub messages: Vec<ChatMessage>,

    /// Maximum number of tokens to generate
    pub max_tokens: i64,

    /// Sampling temperature, typically between 0 and 2
    pub temperature: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub prompt_tokens: i32,
    #[serde(default)]
    pub completion_tokens: i32,
    #[serde(default)]
    pub total_tokens: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatResponseMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionResponseChoice {
    #[serde(default)]
    pub index: i64,
    #[serde(default)]
    pub message: ChatResponseMessage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// Non-streaming chat completion response
///
/// Deserialization is lenient: providers that omit `choices` produce an
/// empty reply rather than a parse failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<ChatCompletionResponseChoice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
}

impl ChatCompletionResponse {
    /// Content of the first choice, or an empty string
    pub fn first_content(&self) -> String {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .unwrap_or_default()
    }
}

/// Coarse failure category used for retry and fallback decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The model does not exist or is not served for this account
    ModelUnavailable,
    /// The credential was rejected (401/403) or is malformed
    Unauthorized,
    /// The credential is throttled (429)
    RateLimited,
    /// Network failure, timeout, 408 or 5xx
    Transient,
    /// Any other 4xx: the request itself was refused
    Rejected,
    Cancelled,
}

#[derive(Debug, Error, Clone, PartialEq, Serialize, Deserialize)]
pub enum CompletionError {
    #[error("HTTP {status_code}: {message}")]
    HttpError { status_code: u16, message: String },
    #[error("Provider connection failed: {0}")]
    Transport(String),
    #[error("Provider did not respond within {seconds}s")]
    Timeout { seconds: u64 },
    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
    #[error("Invalid API key format: {0}")]
    InvalidCredential(String),
    #[error("Request cancelled")]
    Cancelled,
}

/// Phrases providers use when a model id is unknown or not served
const MODEL_UNAVAILABLE_HINTS: [&str; 8] = [
    "not found",
    "does not exist",
    "not supported",
    "unsupported",
    "decommissioned",
    "not available",
    "no such model",
    "unknown model",
];

impl CompletionError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::HttpError {
                status_code,
                message,
            } => classify_status(*status_code, message),
            Self::Transport(_) | Self::Timeout { .. } | Self::InvalidResponse(_) => {
                ErrorClass::Transient
            }
            Self::InvalidCredential(_) => ErrorClass::Unauthorized,
            Self::Cancelled => ErrorClass::Cancelled,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::HttpError { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    /// The provider-facing message without the variant prefix
    pub fn message(&self) -> String {
        match self {
            Self::HttpError { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

fn classify_status(status_code: u16, message: &str) -> ErrorClass {
    match status_code {
        404 => ErrorClass::ModelUnavailable,
        400 | 422 if mentions_unavailable_model(message) => ErrorClass::ModelUnavailable,
        401 | 403 => ErrorClass::Unauthorized,
        429 => ErrorClass::RateLimited,
        408 => ErrorClass::Transient,
        500..=599 => ErrorClass::Transient,
        400..=499 => ErrorClass::Rejected,
        _ => ErrorClass::Transient,
    }
}

fn mentions_unavailable_model(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("model") && MODEL_UNAVAILABLE_HINTS.iter().any(|hint| lower.contains(hint))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(status_code: u16, message: &str) -> CompletionError {
        CompletionError::HttpError {
            status_code,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_params_serialize_to_wire_shape() {
        let request = CompletionRequest::new(
            vec![ChatMessage::system("be brief"), ChatMessage::user("hi")],
            64,
            0.5,
        );

        let json = serde_json::to_value(request.to_params("model-a")).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "model": "model-a",
                "messages": [
                    {"role": "system", "content": "be brief"},
                    {"role": "user", "content": "hi"}
                ],
                "max_tokens": 64,
                "temperature": 0.5
            })
        );
    }

    #[test]
    fn test_to_params_leaves_request_untouched() {
        let request = CompletionRequest::from_messages(vec![ChatMessage::user("hi")]);
        let first = request.to_params("m1");
        let second = request.to_params("m2");

        assert_eq!(first.model, "m1");
        assert_eq!(second.model, "m2");
        assert_eq!(request.max_tokens(), DEFAULT_MAX_TOKENS);
        assert_eq!(request.messages().len(), 1);
    }

    #[test]
    fn test_first_content() {
        let response: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"hello"}},{"message":{"content":"other"}}]}"#,
        )
        .unwrap();
        assert_eq!(response.first_content(), "hello");

        let empty: ChatCompletionResponse = serde_json::from_str(r#"{"id":"x"}"#).unwrap();
        assert_eq!(empty.first_content(), "");

        let null_content: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert_eq!(null_content.first_content(), "");
    }

    #[test]
    fn test_credential_debug_is_masked() {
        let credential = Credential::new("sk-very-secret-value-1234");

        let debug = format!("{credential:?}");
        assert!(!debug.contains("secret"));
        assert_eq!(debug, "Credential(****1234)");
        assert_eq!(Credential::new("short").fingerprint(), "****");
        assert_eq!(credential.expose(), "sk-very-secret-value-1234");
    }

    #[test]
    fn test_error_classification() {
        assert_eq!(http(404, "nope").class(), ErrorClass::ModelUnavailable);
        assert_eq!(
            http(400, "The model `foo` does not exist").class(),
            ErrorClass::ModelUnavailable
        );
        assert_eq!(http(400, "max_tokens too large").class(), ErrorClass::Rejected);
        assert_eq!(http(401, "bad key").class(), ErrorClass::Unauthorized);
        assert_eq!(http(403, "forbidden").class(), ErrorClass::Unauthorized);
        assert_eq!(http(429, "slow down").class(), ErrorClass::RateLimited);
        assert_eq!(http(408, "timeout").class(), ErrorClass::Transient);
        assert_eq!(http(503, "overloaded").class(), ErrorClass::Transient);
        assert_eq!(
            CompletionError::Transport("reset".into()).class(),
            ErrorClass::Transient
        );
        assert_eq!(
            CompletionError::Timeout { seconds: 5 }.class(),
            ErrorClass::Transient
        );
        assert_eq!(
            CompletionError::InvalidCredential("newline".into()).class(),
            ErrorClass::Unauthorized
        );
        assert_eq!(CompletionError::Cancelled.class(), ErrorClass::Cancelled);
    }

    #[test]
    fn test_error_message_strips_prefix_for_http_errors() {
        assert_eq!(http(401, "bad key").message(), "bad key");
        assert_eq!(http(401, "bad key").to_string(), "HTTP 401: bad key");
        assert_eq!(
            CompletionError::Timeout { seconds: 3 }.message(),
            "Provider did not respond within 3s"
        );
    }
}
