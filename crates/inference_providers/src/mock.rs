//! Mock implementation of CompletionInvoker for testing
//!
//! Serves scripted outcomes per (model, credential) pair and records every
//! attempt in order, without touching the network.

use crate::{CompletionError, CompletionInvoker, CompletionRequest, Credential};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};

/// One invocation observed by [`MockInvoker`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedAttempt {
    pub model: String,
    pub credential: Credential,
    pub request: CompletionRequest,
}

pub struct MockInvoker {
    default_response: String,
    /// Outcomes keyed by (model, raw credential)
    scripted: RwLock<HashMap<(String, String), Result<String, CompletionError>>>,
    /// Errors returned for every credential on a model
    failing_models: RwLock<HashMap<String, CompletionError>>,
    /// Error returned for every call regardless of model or credential
    error_override: RwLock<Option<CompletionError>>,
    delay: Option<Duration>,
    attempts: Mutex<Vec<RecordedAttempt>>,
}

impl MockInvoker {
    pub fn new() -> Self {
        Self {
            default_response: "This is a mock response.".to_string(),
            scripted: RwLock::new(HashMap::new()),
            failing_models: RwLock::new(HashMap::new()),
            error_override: RwLock::new(None),
            delay: None,
            attempts: Mutex::new(Vec::new()),
        }
    }

    /// Content returned when no script matches
    pub fn with_response(mut self, content: impl Into<String>) -> Self {
        self.default_response = content.into();
        self
    }

    /// Sleep before answering, to exercise timeouts and cancellation
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_outcome(
        mut self,
        model: impl Into<String>,
        credential: impl Into<String>,
        outcome: Result<String, CompletionError>,
    ) -> Self {
        self.scripted
            .get_mut()
            .insert((model.into(), credential.into()), outcome);
        self
    }

    pub fn with_failing_model(mut self, model: impl Into<String>, error: CompletionError) -> Self {
        self.failing_models.get_mut().insert(model.into(), error);
        self
    }

    /// Force every subsequent call to fail with `error` (or clear with `None`)
    pub async fn set_error_override(&self, error: Option<CompletionError>) {
        *self.error_override.write().await = error;
    }

    pub async fn attempts(&self) -> Vec<RecordedAttempt> {
        self.attempts.lock().await.clone()
    }

    pub async fn attempt_count(&self) -> usize {
        self.attempts.lock().await.len()
    }

    /// (model, raw credential) pairs in call order
    pub async fn attempted_pairs(&self) -> Vec<(String, String)> {
        self.attempts
            .lock()
            .await
            .iter()
            .map(|a| (a.model.clone(), a.credential.expose().to_string()))
            .collect()
    }

    pub async fn reset_attempts(&self) {
        self.attempts.lock().await.clear();
    }
}

impl Default for MockInvoker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionInvoker for MockInvoker {
    fn backend_type(&self) -> &'static str {
        "mock"
    }

    async fn invoke(
        &self,
        model: &str,
        credential: &Credential,
        request: &CompletionRequest,
    ) -> Result<String, CompletionError> {
        self.attempts.lock().await.push(RecordedAttempt {
            model: model.to_string(),
            credential: credential.clone(),
            request: request.clone(),
        });

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(error) = self.error_override.read().await.clone() {
            return Err(error);
        }

        let key = (model.to_string(), credential.expose().to_string());
        if let Some(outcome) = self.scripted.read().await.get(&key) {
            return outcome.clone();
        }

        if let Some(error) = self.failing_models.read().await.get(model) {
            return Err(error.clone());
        }

        Ok(self.default_response.clone())
    }
}
