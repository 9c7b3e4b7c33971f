use inference_providers::CompletionError;
use regex::Regex;
use std::sync::LazyLock;

static URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^\s)]+").expect("valid URL regex"));
static IP_PORT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:[0-9]{1,3}\.){3}[0-9]{1,3}:\d+\b").expect("valid IP:port regex")
});
static IP_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:[0-9]{1,3}\.){3}[0-9]{1,3}\b").expect("valid IP regex")
});

/// One failed (model, credential) attempt within a logical request
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptFailure {
    pub model: String,
    pub credential_index: usize,
    pub error: CompletionError,
}

#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    #[error("No API credentials are configured for the completion provider. Set COMPLETION_API_KEY to enable AI responses.")]
    NoCredentials,

    #[error("No completion provider is available")]
    NoProviderAvailable,

    /// Every model and credential failed; carries the last error observed
    #[error("All {attempts} completion attempt(s) failed. Last error: {last_error}")]
    Exhausted {
        attempts: usize,
        last_error: CompletionError,
        failures: Vec<AttemptFailure>,
    },

    #[error("Completion request was cancelled")]
    Cancelled,

    #[error("Invalid completion configuration: {0}")]
    InvalidConfiguration(String),
}

impl RouterError {
    pub fn last_error(&self) -> Option<&CompletionError> {
        match self {
            Self::Exhausted { last_error, .. } => Some(last_error),
            _ => None,
        }
    }

    /// Displayable message with provider URLs and addresses removed
    pub fn public_message(&self) -> String {
        sanitize_error_message(&self.to_string())
    }
}

/// Sanitize error message by removing sensitive information like IP addresses and URLs
pub fn sanitize_error_message(error: &str) -> String {
    let sanitized = URL_REGEX.replace_all(error, "[URL_REDACTED]");
    let sanitized = IP_PORT_REGEX.replace_all(&sanitized, "[IP_REDACTED]");
    let sanitized = IP_REGEX.replace_all(&sanitized, "[IP_REDACTED]");

    // Remove specific error details that might leak internal structure
    sanitized.replace(
        "error sending request for url",
        "provider connection failed",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_error_message() {
        let error = "Provider connection failed: error sending request for url (http://192.168.0.1:8000/v1/chat/completions)";
        let sanitized = sanitize_error_message(error);
        assert!(!sanitized.contains("http://"));
        assert!(!sanitized.contains("192.168.0.1"));
        assert!(sanitized.contains("[URL_REDACTED]"));
        assert!(sanitized.contains("provider connection failed"));

        let sanitized = sanitize_error_message("Connection failed to 192.168.1.100:8080");
        assert!(!sanitized.contains("192.168.1.100"));
        assert!(!sanitized.contains("8080"));
        assert!(sanitized.contains("[IP_REDACTED]"));

        let sanitized = sanitize_error_message("Server at 10.0.0.1 is unreachable");
        assert_eq!(sanitized, "Server at [IP_REDACTED] is unreachable");

        // HTTP status and model names are not sensitive
        let sanitized = sanitize_error_message("HTTP 401: invalid key for meta-llama/Llama-3.3-70B");
        assert_eq!(sanitized, "HTTP 401: invalid key for meta-llama/Llama-3.3-70B");
    }

    #[test]
    fn test_exhausted_reports_last_error() {
        let last_error = CompletionError::HttpError {
            status_code: 429,
            message: "quota exceeded".to_string(),
        };
        let error = RouterError::Exhausted {
            attempts: 4,
            last_error: last_error.clone(),
            failures: Vec::new(),
        };

        assert_eq!(error.last_error(), Some(&last_error));
        assert_eq!(
            error.public_message(),
            "All 4 completion attempt(s) failed. Last error: HTTP 429: quota exceeded"
        );
    }

    #[test]
    fn test_no_credentials_message_is_actionable() {
        let message = RouterError::NoCredentials.public_message();
        assert!(message.contains("COMPLETION_API_KEY"));
        assert_eq!(RouterError::NoCredentials.last_error(), None);
    }
}
