pub mod conversions;
pub mod models;
pub mod routes;

use axum::{
    routing::{get, post},
    Router,
};
use services::CompletionRouter;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<CompletionRouter>,
}

/// Build the HTTP application around a configured completion router
pub fn build_app(router: Arc<CompletionRouter>) -> Router {
    let state = AppState { router };

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route(
            "/v1/completions",
            post(routes::completions::create_completion),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
