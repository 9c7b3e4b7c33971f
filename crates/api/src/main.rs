use api::build_app;
use config::{ApiConfig, LoggingConfig};
use services::CompletionRouter;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Load configuration first to get logging settings
    let config = ApiConfig::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {e}");
        eprintln!("Application cannot start without a valid configuration.");
        std::process::exit(1);
    });

    init_tracing(&config.logging);

    let router = CompletionRouter::from_config(&config.completion).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to build completion router");
        std::process::exit(1);
    });

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, address = %bind_address, "Failed to bind listener");
            std::process::exit(1);
        });

    tracing::info!(address = %bind_address, "Server started successfully");
    tracing::info!("API Endpoints:");
    tracing::info!("  - POST /v1/completions (Tutoring completions)");
    tracing::info!("  - GET /health (Health check)");

    if let Err(e) = axum::serve(listener, build_app(Arc::new(router))).await {
        tracing::error!(error = %e, "Server terminated");
        std::process::exit(1);
    }
}

fn init_tracing(logging_config: &LoggingConfig) {
    // RUST_LOG wins over the configured levels when set
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging_config.filter_directive()));

    match logging_config.format.as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .init();
        }
        "compact" => {
            tracing_subscriber::fmt()
                .compact()
                .with_env_filter(filter)
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .pretty()
                .with_env_filter(filter)
                .init();
        }
    }
}
