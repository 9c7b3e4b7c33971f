//! Resilient multi-credential completion routing
//!
//! For one logical request the router draws a rotation base once, then walks
//! the candidate models in order. For each model it tries up to one attempt
//! per credential, starting at the base and stepping forward, before falling
//! back to the next model. Only exhaustion (or cancellation) reaches the caller.

pub mod credentials;
pub mod errors;
pub mod model_list;
pub mod retry;
pub mod rotation;

pub use credentials::CredentialPool;
pub use errors::{sanitize_error_message, AttemptFailure, RouterError};
pub use model_list::{ModelAliases, ModelFallbackList};
pub use retry::{AttemptDecision, RetryPolicy};
pub use rotation::{CounterRotation, RotationStrategy, TimeBucketRotation};

use config::{CompletionConfig, RotationMode};
use inference_providers::{
    BackendConfig, CompletionError, CompletionInvoker, CompletionRequest, Credential,
    OpenAiCompatibleBackend,
};
use std::{collections::HashMap, sync::Arc, time::Duration};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Successful outcome of a logical request
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedCompletion {
    /// Assistant reply; may legitimately be empty
    pub content: String,
    pub model: String,
    pub credential_index: usize,
    /// Network attempts made, including the successful one
    pub attempts: usize,
}

#[derive(Clone)]
pub struct CompletionRouter {
    pool: Arc<CredentialPool>,
    rotation: Arc<dyn RotationStrategy>,
    invoker: Arc<dyn CompletionInvoker>,
    /// Default candidate models
    models: ModelFallbackList,
    /// Candidate models by lowercase task tag
    task_models: HashMap<String, ModelFallbackList>,
    retry_policy: RetryPolicy,
    attempt_timeout: Option<Duration>,
}

impl CompletionRouter {
    pub fn new(
        pool: CredentialPool,
        invoker: Arc<dyn CompletionInvoker>,
        models: ModelFallbackList,
    ) -> Self {
        Self {
            pool: Arc::new(pool),
            rotation: Arc::new(CounterRotation::new()),
            invoker,
            models,
            task_models: HashMap::new(),
            retry_policy: RetryPolicy::default(),
            attempt_timeout: None,
        }
    }

    /// Build the production router: OpenAI-compatible backend, configured
    /// credentials, models, rotation and retry policy
    pub fn from_config(config: &CompletionConfig) -> Result<Self, RouterError> {
        let pool = CredentialPool::build(config.api_keys.iter().cloned());
        let aliases = ModelAliases::builtin().with_aliases(config.model_aliases.clone());
        let models = ModelFallbackList::build(
            &config.primary_model,
            &config.fallback_models,
            &config.default_model,
            &aliases,
        );

        let backend = OpenAiCompatibleBackend::new(
            BackendConfig::new(&config.base_url, config.timeout_seconds)
                .with_organization(config.organization_id.clone()),
        )
        .map_err(|e| RouterError::InvalidConfiguration(e.to_string()))?;

        let rotation: Arc<dyn RotationStrategy> = match config.rotation {
            RotationMode::Counter => Arc::new(CounterRotation::new()),
            RotationMode::TimeBucket => Arc::new(TimeBucketRotation::new(Duration::from_secs(
                config.rotation_window_seconds,
            ))),
        };

        if pool.is_empty() {
            warn!("No completion API credentials configured; completion requests will be rejected");
        }

        info!(
            backend = backend.backend_type(),
            base_url = %config.base_url,
            credentials = pool.len(),
            models = ?models.models(),
            rotation = rotation.name(),
            retry_policy = ?config.retry_policy,
            tasks = config.task_models.len(),
            "Completion router configured"
        );

        let mut router = Self::new(pool, Arc::new(backend), models)
            .with_rotation(rotation)
            .with_retry_policy(config.retry_policy.into())
            .with_attempt_timeout(Duration::from_secs(config.timeout_seconds.max(1) as u64));

        for (task, task_config) in &config.task_models {
            router = router.with_task_models(
                task.as_str(),
                ModelFallbackList::build(
                    &task_config.primary,
                    &task_config.fallbacks,
                    &config.default_model,
                    &aliases,
                ),
            );
        }

        Ok(router)
    }

    pub fn with_rotation(mut self, rotation: Arc<dyn RotationStrategy>) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    /// Upper bound for a single network attempt
    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = Some(timeout);
        self
    }

    pub fn with_task_models(mut self, task: impl Into<String>, models: ModelFallbackList) -> Self {
        self.task_models
            .insert(task.into().to_ascii_lowercase(), models);
        self
    }

    pub fn pool(&self) -> &CredentialPool {
        &self.pool
    }

    pub fn models(&self) -> &ModelFallbackList {
        &self.models
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry_policy
    }

    pub fn rotation_name(&self) -> &'static str {
        self.rotation.name()
    }

    /// Candidate models for a task tag; unknown or absent tags use the defaults
    pub fn models_for(&self, task: Option<&str>) -> &ModelFallbackList {
        task.and_then(|task| self.task_models.get(&task.trim().to_ascii_lowercase()))
            .unwrap_or(&self.models)
    }

    /// Complete a request and return the assistant reply
    pub async fn complete(&self, request: &CompletionRequest) -> Result<String, RouterError> {
        self.complete_for_task(request, None).await
    }

    pub async fn complete_for_task(
        &self,
        request: &CompletionRequest,
        task: Option<&str>,
    ) -> Result<String, RouterError> {
        let never_cancelled = CancellationToken::new();
        self.route(request, task, &never_cancelled)
            .await
            .map(|completion| completion.content)
    }

    /// Run one logical request through the model x credential walk
    ///
    /// Attempts are strictly sequential. Once `cancel` fires, the in-flight
    /// attempt is dropped and no further attempt is started.
    pub async fn route(
        &self,
        request: &CompletionRequest,
        task: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<RoutedCompletion, RouterError> {
        if self.pool.is_empty() {
            warn!("Completion requested but no API credentials are configured");
            return Err(RouterError::NoCredentials);
        }

        let models = self.models_for(task);
        let base = self.rotation.next_base(self.pool.len());
        let mut failures: Vec<AttemptFailure> = Vec::new();

        debug!(
            task = ?task,
            base = base,
            credentials = self.pool.len(),
            models = ?models.models(),
            "Starting completion routing"
        );

        'models: for model in models {
            for retry_offset in 0..self.pool.len() {
                if cancel.is_cancelled() {
                    info!(model = %model, attempts = failures.len(), "Completion cancelled by caller");
                    return Err(RouterError::Cancelled);
                }

                let Some((credential_index, credential)) =
                    self.pool.credential_for(base, retry_offset)
                else {
                    return Err(RouterError::NoCredentials);
                };

                debug!(
                    model = %model,
                    credential_index = credential_index,
                    retry_offset = retry_offset,
                    "Trying completion attempt"
                );

                match self.attempt(model, credential, request, cancel).await {
                    Ok(content) => {
                        info!(
                            model = %model,
                            credential_index = credential_index,
                            attempts = failures.len() + 1,
                            "Completion succeeded"
                        );
                        return Ok(RoutedCompletion {
                            content,
                            model: model.clone(),
                            credential_index,
                            attempts: failures.len() + 1,
                        });
                    }
                    Err(error) => {
                        let decision = self.retry_policy.decide(&error);
                        if decision == AttemptDecision::Abort {
                            info!(model = %model, "Completion cancelled during attempt");
                            return Err(RouterError::Cancelled);
                        }

                        warn!(
                            model = %model,
                            credential_index = credential_index,
                            retry_offset = retry_offset,
                            error_class = ?error.class(),
                            decision = ?decision,
                            error = %error,
                            "Completion attempt failed"
                        );

                        failures.push(AttemptFailure {
                            model: model.clone(),
                            credential_index,
                            error,
                        });

                        if decision == AttemptDecision::NextModel {
                            continue 'models;
                        }
                    }
                }
            }

            debug!(model = %model, "All credentials failed for model, falling back");
        }

        let Some(last) = failures.last() else {
            return Err(RouterError::NoProviderAvailable);
        };

        error!(
            attempts = failures.len(),
            models = models.len(),
            credentials = self.pool.len(),
            last_error = %last.error,
            "All completion attempts failed"
        );

        Err(RouterError::Exhausted {
            attempts: failures.len(),
            last_error: last.error.clone(),
            failures,
        })
    }

    async fn attempt(
        &self,
        model: &str,
        credential: &Credential,
        request: &CompletionRequest,
        cancel: &CancellationToken,
    ) -> Result<String, CompletionError> {
        let call = self.invoker.invoke(model, credential, request);
        let bounded = async {
            match self.attempt_timeout {
                Some(limit) => tokio::time::timeout(limit, call)
                    .await
                    .unwrap_or_else(|_| {
                        Err(CompletionError::Timeout {
                            seconds: limit.as_secs(),
                        })
                    }),
                None => call.await,
            }
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(CompletionError::Cancelled),
            result = bounded => result,
        }
    }
}
