//! OpenAI-compatible backend implementation
//!
//! This backend handles providers that use OpenAI's chat completions format, including:
//! - OpenAI (api.openai.com)
//! - Together AI
//! - Groq
//! - Fireworks AI
//! - Any other OpenAI-compatible provider

use super::backend::{BackendConfig, CompletionInvoker};
use crate::{
    extract_error_message, ChatCompletionResponse, CompletionError, CompletionRequest, Credential,
};
use async_trait::async_trait;
use reqwest::{header::HeaderValue, Client};

/// OpenAI-compatible backend
///
/// Sends one bearer-authenticated POST per invocation; the credential is
/// supplied per call so a single client serves the whole credential pool.
pub struct OpenAiCompatibleBackend {
    client: Client,
    config: BackendConfig,
}

impl OpenAiCompatibleBackend {
    pub fn new(config: BackendConfig) -> Result<Self, CompletionError> {
        let client = Client::builder()
            .connect_timeout(std::time::Duration::from_secs(30))
            .pool_idle_timeout(std::time::Duration::from_secs(90))
            .build()
            .map_err(|e| CompletionError::Transport(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    fn chat_completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn build_headers(&self, credential: &Credential) -> Result<reqwest::header::HeaderMap, String> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));

        // Authorization header
        let auth_value = format!("Bearer {}", credential.expose());
        let mut header_value = HeaderValue::from_str(&auth_value)
            .map_err(|e| format!("credential {}: {e}", credential.fingerprint()))?;
        header_value.set_sensitive(true);
        headers.insert("Authorization", header_value);

        // OpenAI organization header (if provided)
        if let Some(org_id) = self.config.extra.get("organization_id") {
            if let Ok(value) = HeaderValue::from_str(org_id) {
                headers.insert("OpenAI-Organization", value);
            }
        }

        Ok(headers)
    }

    fn map_send_error(&self, error: reqwest::Error) -> CompletionError {
        if error.is_timeout() {
            CompletionError::Timeout {
                seconds: self.config.timeout().as_secs(),
            }
        } else {
            CompletionError::Transport(error.to_string())
        }
    }
}

#[async_trait]
impl CompletionInvoker for OpenAiCompatibleBackend {
    fn backend_type(&self) -> &'static str {
        "openai_compatible"
    }

    async fn invoke(
        &self,
        model: &str,
        credential: &Credential,
        request: &CompletionRequest,
    ) -> Result<String, CompletionError> {
        let url = self.chat_completions_url();
        let params = request.to_params(model);

        let headers = self
            .build_headers(credential)
            .map_err(CompletionError::InvalidCredential)?;

        let response = self
            .client
            .post(&url)
            .headers(headers)
            .timeout(self.config.timeout())
            .json(&params)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if !response.status().is_success() {
            let status = response.status();
            let status_code = status.as_u16();
            let status_text = status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP {status_code}"));
            let error_text = response.text().await.unwrap_or_default();
            return Err(CompletionError::HttpError {
                status_code,
                message: extract_error_message(&error_text, &status_text),
            });
        }

        let raw_bytes = response.bytes().await.map_err(|e| self.map_send_error(e))?;

        let chat_response: ChatCompletionResponse = serde_json::from_slice(&raw_bytes)
            .map_err(|e| CompletionError::InvalidResponse(format!("Failed to parse response: {e}")))?;

        tracing::debug!(
            model = %model,
            response_id = ?chat_response.id,
            choices = chat_response.choices.len(),
            "Received chat completion"
        );

        Ok(chat_response.first_content())
    }
}
