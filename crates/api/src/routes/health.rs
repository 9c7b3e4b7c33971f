use crate::AppState;
use axum::{extract::State, http::StatusCode, response::Json as ResponseJson};
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "ok", or "degraded" when no credentials are configured
    pub status: String,
    /// Number of usable credentials in the pool
    pub credentials: usize,
    /// Default candidate models in fallback order
    pub models: Vec<String>,
}

/// Health check endpoint
///
/// Always answers 200 so load balancers keep the instance; a pool without
/// credentials is reported as degraded instead.
pub async fn health_check(
    State(state): State<AppState>,
) -> (StatusCode, ResponseJson<HealthResponse>) {
    let credentials = state.router.pool().len();
    let status = if credentials == 0 { "degraded" } else { "ok" };

    (
        StatusCode::OK,
        ResponseJson(HealthResponse {
            status: status.to_string(),
            credentials,
            models: state.router.models().models().to_vec(),
        }),
    )
}
