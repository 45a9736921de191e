use axum::http::StatusCode;
use serde_json::json;
use upsolve_api::router;
use uuid::Uuid;

use crate::common::{self, TestClient, TestStateBuilder};

#[tokio::test]
async fn test_stats_requires_auth() {
    let state = TestStateBuilder::new()
        .build()
        .expect("Failed to create test state");

    let app = router::router().with_state(state);
    let client = TestClient::new(app);

    let response = client.get("/api/users/stats").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_chart_data_requires_auth() {
    let state = TestStateBuilder::new()
        .build()
        .expect("Failed to create test state");

    let app = router::router().with_state(state);
    let client = TestClient::new(app);

    let response = client.get("/api/users/chart-data").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_attempt_getter_requires_auth() {
    let state = TestStateBuilder::new()
        .build()
        .expect("Failed to create test state");

    let app = router::router().with_state(state);
    let client = TestClient::new(app);

    let response = client.get("/api/users/attempt/1400/B").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_solved_rejects_page_zero() {
    let state = TestStateBuilder::new()
        .build()
        .expect("Failed to create test state");

    let token = common::jwt::create_test_token(Uuid::new_v4(), "pages@example.com", &state.jwt_secret);

    let app = router::router().with_state(state);
    let client = TestClient::new(app);

    // Pagination is validated before the first query
    let response = client.get_with_auth("/api/users/solved?page=0", &token).await;

    response.assert_status(StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Validation failed");
    assert_eq!(body["details"][0]["field"], "page");
    assert_eq!(body["details"][0]["message"], "Page must be a positive integer");
}

#[tokio::test]
async fn test_attempts_reject_oversized_limit() {
    let state = TestStateBuilder::new()
        .build()
        .expect("Failed to create test state");

    let token = common::jwt::create_test_token(Uuid::new_v4(), "pages@example.com", &state.jwt_secret);

    let app = router::router().with_state(state);
    let client = TestClient::new(app);

    let response = client
        .get_with_auth("/api/users/attempts?limit=500", &token)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json();
    assert_eq!(body["details"][0]["field"], "limit");
    assert_eq!(body["details"][0]["message"], "Limit must be between 1 and 100");
}

#[tokio::test]
async fn test_attempts_reject_malformed_solved_flag() {
    let state = TestStateBuilder::new()
        .build()
        .expect("Failed to create test state");

    let token = common::jwt::create_test_token(Uuid::new_v4(), "pages@example.com", &state.jwt_secret);

    let app = router::router().with_state(state);
    let client = TestClient::new(app);

    // `solved` is typed as a bool, anything else is rejected outright
    let response = client
        .get_with_auth("/api/users/attempts?solved=maybe", &token)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_preferences_require_auth() {
    let state = TestStateBuilder::new()
        .build()
        .expect("Failed to create test state");

    let app = router::router().with_state(state);
    let client = TestClient::new(app);

    let request = axum::http::Request::builder()
        .method("PUT")
        .uri("/api/users/preferences")
        .header("x-forwarded-for", "127.0.0.1")
        .header("content-type", "application/json")
        .body(axum::body::Body::from(r#"{"defaultTags":["math"]}"#))
        .expect("Failed to build request");

    let response = client.request(request).await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_preferences_reject_negative_minimum() {
    let state = TestStateBuilder::new()
        .build()
        .expect("Failed to create test state");

    let token = common::jwt::create_test_token(Uuid::new_v4(), "pages@example.com", &state.jwt_secret);

    let app = router::router().with_state(state);
    let client = TestClient::new(app);

    let response = client
        .put_json_with_auth(
            "/api/users/preferences",
            &json!({ "difficultyRange": { "min": -5 } }),
            &token,
        )
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Validation failed");
    assert_eq!(body["details"][0]["field"], "difficultyRange.min");
    assert_eq!(
        body["details"][0]["message"],
        "Minimum difficulty must be a positive integer"
    );
}
