// E2E tests for the completion endpoint
mod common;

use api::models::{CompletionResponse, ErrorResponse};
use common::*;
use inference_providers::{CompletionError, MockInvoker};
use std::sync::Arc;

#[tokio::test]
async fn test_completion_success() {
    let invoker = Arc::new(MockInvoker::new().with_response("x = 4"));
    let server = setup_test_server(invoker.clone());

    let response = server
        .post("/v1/completions")
        .json(&completion_body("Solve 2x = 8"))
        .await;

    assert_eq!(response.status_code(), 200);
    let body = response.json::<CompletionResponse>();
    assert_eq!(body.content, "x = 4");
    assert_eq!(body.model, "m1");
    assert_eq!(body.attempts, 1);

    let attempts = invoker.attempts().await;
    assert_eq!(attempts.len(), 1);
    assert_eq!(attempts[0].request.messages().len(), 2);
    assert_eq!(attempts[0].request.max_tokens(), 64);
}

#[tokio::test]
async fn test_completion_falls_back_to_next_model() {
    let invoker = Arc::new(MockInvoker::new().with_response("from m2").with_failing_model(
        "m1",
        CompletionError::HttpError {
            status_code: 500,
            message: "internal error".to_string(),
        },
    ));
    let server = setup_test_server(invoker.clone());

    let response = server
        .post("/v1/completions")
        .json(&completion_body("Hello"))
        .await;

    assert_eq!(response.status_code(), 200);
    let body = response.json::<CompletionResponse>();
    assert_eq!(body.content, "from m2");
    assert_eq!(body.model, "m2");
    assert_eq!(body.attempts, 3);
    assert_eq!(
        invoker.attempted_pairs().await,
        vec![
            ("m1".to_string(), "key-a".to_string()),
            ("m1".to_string(), "key-b".to_string()),
            ("m2".to_string(), "key-a".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_empty_reply_is_returned_as_success() {
    let server = setup_test_server(Arc::new(MockInvoker::new().with_response("")));

    let response = server
        .post("/v1/completions")
        .json(&completion_body("Hello"))
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.json::<CompletionResponse>().content, "");
}

#[tokio::test]
async fn test_task_tag_selects_model_list() {
    let invoker = Arc::new(MockInvoker::new());
    let router = router_with(&["key-a"], &["m1", "m2"], invoker.clone())
        .with_task_models("quiz", model_list(&["quiz-model", "m2"]));
    let server = server_for(router);

    let mut body = completion_body("Make a 3 question quiz on fractions");
    body["task"] = serde_json::json!("quiz");
    let response = server.post("/v1/completions").json(&body).await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.json::<CompletionResponse>().model, "quiz-model");
}

#[tokio::test]
async fn test_invalid_request_is_rejected_before_routing() {
    let invoker = Arc::new(MockInvoker::new());
    let server = setup_test_server(invoker.clone());

    let empty = server
        .post("/v1/completions")
        .json(&serde_json::json!({"messages": []}))
        .await;
    let bad_temperature = server
        .post("/v1/completions")
        .json(&serde_json::json!({
            "messages": [{"role": "user", "content": "hi"}],
            "temperature": 3.0
        }))
        .await;

    assert_eq!(empty.status_code(), 400);
    assert_eq!(
        empty.json::<ErrorResponse>().error.r#type,
        "invalid_request_error"
    );
    assert_eq!(bad_temperature.status_code(), 400);
    assert_eq!(invoker.attempt_count().await, 0);
}

#[tokio::test]
async fn test_health_reports_pool_and_models() {
    let server = setup_test_server(Arc::new(MockInvoker::new()));

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), 200);
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["credentials"], 2);
    assert_eq!(body["models"], serde_json::json!(["m1", "m2"]));
}
