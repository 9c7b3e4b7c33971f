#![allow(dead_code)]

use api::build_app;
use axum_test::TestServer;
use inference_providers::MockInvoker;
use services::{CompletionRouter, CredentialPool, ModelAliases, ModelFallbackList};
use std::sync::Arc;

/// Candidate list made of exactly `models`; the last entry is the known default
pub fn model_list(models: &[&str]) -> ModelFallbackList {
    let (default, rest) = models.split_last().expect("at least one model");
    let primary = rest.first().copied().unwrap_or(default);
    let fallbacks = rest.iter().skip(1).copied().collect::<Vec<_>>().join(",");
    ModelFallbackList::build(primary, &fallbacks, default, &ModelAliases::empty())
}

pub fn router_with(keys: &[&str], models: &[&str], invoker: Arc<MockInvoker>) -> CompletionRouter {
    CompletionRouter::new(
        CredentialPool::build(keys.iter().map(|k| Some(k.to_string()))),
        invoker,
        model_list(models),
    )
}

pub fn server_for(router: CompletionRouter) -> TestServer {
    TestServer::new(build_app(Arc::new(router))).unwrap()
}

/// Test server over two credentials and two models backed by `invoker`
pub fn setup_test_server(invoker: Arc<MockInvoker>) -> TestServer {
    server_for(router_with(&["key-a", "key-b"], &["m1", "m2"], invoker))
}

pub fn completion_body(content: &str) -> serde_json::Value {
    serde_json::json!({
        "messages": [
            {"role": "system", "content": "You are a friendly algebra tutor."},
            {"role": "user", "content": content}
        ],
        "max_tokens": 64
    })
}
