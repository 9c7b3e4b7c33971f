use inference_providers::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
use serde::{Deserialize, Serialize};

const VALID_ROLES: [&str; 3] = ["system", "user", "assistant"];
const MAX_TEMPERATURE: f32 = 2.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

/// Body of `POST /v1/completions`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub messages: Vec<Message>,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: i64,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Optional task tag (e.g., "quiz", "grading") selecting a model list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,
}

impl CompletionRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.messages.is_empty() {
            return Err("messages must not be empty".to_string());
        }

        for (i, message) in self.messages.iter().enumerate() {
            if !VALID_ROLES.contains(&message.role.as_str()) {
                return Err(format!(
                    "messages[{i}].role must be one of: system, user, assistant"
                ));
            }
        }

        if self.max_tokens <= 0 {
            return Err("max_tokens must be greater than 0".to_string());
        }

        if !(0.0..=MAX_TEMPERATURE).contains(&self.temperature) {
            return Err(format!(
                "temperature must be between 0 and {MAX_TEMPERATURE}"
            ));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Assistant reply; may be empty
    pub content: String,
    /// Model that produced the reply
    pub model: String,
    /// Provider attempts made, including the successful one
    pub attempts: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub message: String,
    pub r#type: String,
    pub param: Option<String>,
    pub code: Option<String>,
}

impl ErrorResponse {
    pub fn new(message: String, error_type: String) -> Self {
        Self {
            error: ErrorDetail {
                message,
                r#type: error_type,
                param: None,
                code: None,
            },
        }
    }
}

fn default_max_tokens() -> i64 {
    DEFAULT_MAX_TOKENS
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(body: serde_json::Value) -> CompletionRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_defaults_applied() {
        let request = parse(json!({"messages": [{"role": "user", "content": "hi"}]}));

        assert_eq!(request.max_tokens, 1024);
        assert!((request.temperature - 0.7).abs() < f32::EPSILON);
        assert!(request.task.is_none());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_messages() {
        let request = parse(json!({"messages": []}));

        assert_eq!(request.validate().unwrap_err(), "messages must not be empty");
    }

    #[test]
    fn test_validate_rejects_unknown_role() {
        let request = parse(json!({
            "messages": [
                {"role": "system", "content": "You are a tutor."},
                {"role": "tutor", "content": "hi"}
            ]
        }));

        assert!(request.validate().unwrap_err().starts_with("messages[1].role"));
    }

    #[test]
    fn test_validate_rejects_out_of_range_parameters() {
        let zero_tokens = parse(json!({
            "messages": [{"role": "user", "content": "hi"}],
            "max_tokens": 0
        }));
        let hot = parse(json!({
            "messages": [{"role": "user", "content": "hi"}],
            "temperature": 2.5
        }));
        let negative = parse(json!({
            "messages": [{"role": "user", "content": "hi"}],
            "temperature": -0.1
        }));

        assert!(zero_tokens.validate().is_err());
        assert!(hot.validate().is_err());
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_error_response_serialization() {
        let body = serde_json::to_value(ErrorResponse::new(
            "bad".to_string(),
            "invalid_request_error".to_string(),
        ))
        .unwrap();

        assert_eq!(
            body,
            json!({"error": {"message": "bad", "type": "invalid_request_error", "param": null, "code": null}})
        );
    }
}
