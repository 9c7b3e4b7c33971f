//! Invoker trait for outbound completion calls
//!
//! A `CompletionInvoker` performs exactly one network call for one
//! (model, credential) pair. Retry, rotation and model fallback are the
//! caller's job; an invoker only classifies success vs. failure.

use crate::{CompletionError, CompletionRequest, Credential};
use async_trait::async_trait;
use std::collections::HashMap;

#[cfg(any(test, feature = "test-mocks"))]
use mockall::automock;

/// Configuration for a backend connection
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL for the provider API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: i64,
    /// Provider-specific extra configuration (e.g., organization_id)
    pub extra: HashMap<String, String>,
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>, timeout_seconds: i64) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_seconds,
            extra: HashMap::new(),
        }
    }

    pub fn with_organization(mut self, organization_id: Option<String>) -> Self {
        if let Some(org_id) = organization_id {
            self.extra.insert("organization_id".to_string(), org_id);
        }
        self
    }

    /// Per-request timeout; non-positive values fall back to one second
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_seconds.max(1) as u64)
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_seconds: 60,
            extra: HashMap::new(),
        }
    }
}

/// Single-attempt completion call
#[cfg_attr(any(test, feature = "test-mocks"), automock)]
#[async_trait]
pub trait CompletionInvoker: Send + Sync {
    /// Returns the backend type identifier (e.g., "openai_compatible", "mock")
    fn backend_type(&self) -> &'static str;

    /// Performs one non-streaming chat completion
    ///
    /// Returns the first choice's content (empty if the provider returned no
    /// choices). Non-2xx responses must surface as
    /// [`CompletionError::HttpError`] carrying the normalized message.
    async fn invoke(
        &self,
        model: &str,
        credential: &Credential,
        request: &CompletionRequest,
    ) -> Result<String, CompletionError>;
}
