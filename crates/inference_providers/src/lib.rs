//! Inference providers crate for outbound completion calls
//!
//! This crate owns everything that touches a completion provider's wire
//! format: the request/response models, the [`CompletionInvoker`] trait for
//! a single (model, credential) call, the OpenAI-compatible HTTP backend,
//! and the normalization of heterogeneous provider error payloads.
//!
//! Retry, credential rotation and model fallback live one layer up, in the
//! `services` crate.
//!
//! # Usage
//!
//! ```rust,ignore
//! use inference_providers::{
//!     BackendConfig, ChatMessage, CompletionInvoker, CompletionRequest, Credential,
//!     OpenAiCompatibleBackend,
//! };
//!
//! async fn example() -> Result<(), inference_providers::CompletionError> {
//!     let backend = OpenAiCompatibleBackend::new(BackendConfig::new(
//!         "https://api.together.xyz/v1",
//!         60,
//!     ))?;
//!     let request = CompletionRequest::new(vec![ChatMessage::user("Hello!")], 100, 0.7);
//!     let reply = backend
//!         .invoke("meta-llama/Llama-3.3-70B-Instruct-Turbo", &Credential::new("sk-..."), &request)
//!         .await?;
//!     println!("{reply}");
//!     Ok(())
//! }
//! ```

pub mod error_message;
pub mod external;
pub mod mock;
pub mod models;

// Re-export commonly used types for convenience
pub use error_message::extract_error_message;
pub use mock::{MockInvoker, RecordedAttempt};
pub use models::{
    ChatCompletionParams, ChatCompletionResponse, ChatCompletionResponseChoice, ChatMessage,
    ChatResponseMessage, CompletionError, CompletionRequest, Credential, ErrorClass, MessageRole,
    TokenUsage, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE,
};

// External provider exports
pub use external::{BackendConfig, CompletionInvoker, OpenAiCompatibleBackend};

#[cfg(any(test, feature = "test-mocks"))]
pub use external::MockCompletionInvoker;
