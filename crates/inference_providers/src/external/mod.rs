//! External provider module for third-party completion APIs
//!
//! # Architecture
//!
//! ```text
//! CompletionInvoker (one call per model/credential pair)
//!     ├── OpenAiCompatibleBackend (OpenAI, Together, Groq, Fireworks, etc.)
//!     └── MockInvoker (tests)
//! ```
//!
//! # Adding New Providers
//!
//! 1. **If OpenAI-compatible**: point `COMPLETION_BASE_URL` at the provider.
//! 2. **If different API format**: add a new backend file implementing `CompletionInvoker`

pub mod backend;
pub mod openai_compatible;

pub use backend::{BackendConfig, CompletionInvoker};
pub use openai_compatible::OpenAiCompatibleBackend;

#[cfg(any(test, feature = "test-mocks"))]
pub use backend::MockCompletionInvoker;
