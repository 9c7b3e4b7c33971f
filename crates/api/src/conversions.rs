use crate::models::{CompletionRequest, Message};
use inference_providers::{ChatMessage, MessageRole};

// ============================================================================
// HTTP to Provider Conversions
// ============================================================================

impl From<&Message> for ChatMessage {
    fn from(msg: &Message) -> Self {
        let role = match msg.role.as_str() {
            "system" => MessageRole::System,
            "assistant" => MessageRole::Assistant,
            _ => MessageRole::User,
        };
        ChatMessage::new(role, msg.content.clone())
    }
}

impl From<&CompletionRequest> for inference_providers::CompletionRequest {
    fn from(req: &CompletionRequest) -> Self {
        Self::new(
            req.messages.iter().map(ChatMessage::from).collect(),
            req.max_tokens,
            req.temperature,
        )
    }
}
