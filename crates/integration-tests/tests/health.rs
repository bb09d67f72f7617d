//! Integration tests for the health endpoints.

use axum::http::StatusCode;
use serde_json::Value;

use extended_products_integration_tests::TestContext;

#[tokio::test]
async fn test_liveness() {
    let ctx = TestContext::new();

    let (status, body) = ctx.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("ok".to_string()));
}

#[tokio::test]
async fn test_readiness_with_memory_store() {
    let ctx = TestContext::new();

    let (status, _) = ctx.get("/health/ready").await;

    assert_eq!(status, StatusCode::OK);
}
