use crate::{
    models::{CompletionRequest, CompletionResponse, ErrorResponse},
    AppState,
};
use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson, Response},
};
use services::RouterError;
use tokio_util::sync::CancellationToken;

fn map_router_error(error: &RouterError) -> (StatusCode, &'static str) {
    match error {
        RouterError::NoCredentials => (StatusCode::SERVICE_UNAVAILABLE, "configuration_error"),
        RouterError::NoProviderAvailable | RouterError::InvalidConfiguration(_) => {
            (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable")
        }
        RouterError::Exhausted { .. } => (StatusCode::BAD_GATEWAY, "provider_error"),
        RouterError::Cancelled => (StatusCode::INTERNAL_SERVER_ERROR, "request_cancelled"),
    }
}

/// Route a tutoring completion through the credential pool and model fallbacks
pub async fn create_completion(
    State(state): State<AppState>,
    Json(request): Json<CompletionRequest>,
) -> Response {
    if let Err(error) = request.validate() {
        return (
            StatusCode::BAD_REQUEST,
            ResponseJson(ErrorResponse::new(error, "invalid_request_error".to_string())),
        )
            .into_response();
    }

    let params: inference_providers::CompletionRequest = (&request).into();
    // Dropping this handler (client disconnect) drops the in-flight attempt with it
    let cancel = CancellationToken::new();

    match state
        .router
        .route(&params, request.task.as_deref(), &cancel)
        .await
    {
        Ok(completion) => (
            StatusCode::OK,
            ResponseJson(CompletionResponse {
                content: completion.content,
                model: completion.model,
                attempts: completion.attempts,
            }),
        )
            .into_response(),
        Err(error) => {
            let (status, error_type) = map_router_error(&error);
            tracing::warn!(
                status = status.as_u16(),
                error_type = error_type,
                task = ?request.task,
                error = %error,
                "Completion request failed"
            );
            (
                status,
                ResponseJson(ErrorResponse::new(
                    error.public_message(),
                    error_type.to_string(),
                )),
            )
                .into_response()
        }
    }
}
