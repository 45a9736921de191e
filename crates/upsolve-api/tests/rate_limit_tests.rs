use axum::http::StatusCode;
use serde_json::json;
use upsolve_api::router;

use crate::common::{TestClient, TestStateBuilder};

#[tokio::test]
async fn test_rate_limit_headers_present() {
    let state = TestStateBuilder::new()
        .build()
        .expect("Failed to create test state");

    let app = router::router().with_state(state);
    let client = TestClient::new(app);

    let response = client.get("/auth/me").await;

    // Quota headers appear even on rejected requests
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert!(
        response.headers.contains_key("x-ratelimit-limit"),
        "Rate limit headers should be set"
    );
    assert!(response.headers.contains_key("x-ratelimit-remaining"));
}

#[tokio::test]
async fn test_token_login_rate_limit_kicks_in() {
    let state = TestStateBuilder::new()
        .build()
        .expect("Failed to create test state");

    let app = router::router().with_state(state);
    let client = TestClient::new(app);

    // Login endpoints allow 5 req/s with a burst of 10
    let body = json!({ "token": "wrong-token" });
    let mut statuses = Vec::new();
    for _ in 0..20 {
        let response = client.post_json("/auth/token", &body).await;
        statuses.push(response.status);
    }

    let rate_limited = statuses
        .iter()
        .filter(|&&status| status == StatusCode::TOO_MANY_REQUESTS)
        .count();
    let rejected = statuses
        .iter()
        .filter(|&&status| status == StatusCode::UNAUTHORIZED)
        .count();

    assert!(
        rate_limited > 0,
        "Some login attempts should be rate limited. Got statuses: {:?}",
        statuses
    );
    assert!(
        rejected > 0,
        "Requests within the burst should reach the handler"
    );
}

#[tokio::test]
async fn test_general_rate_limit_kicks_in() {
    let state = TestStateBuilder::new()
        .build()
        .expect("Failed to create test state");

    let app = router::router().with_state(state);
    let client = TestClient::new(app);

    // General endpoints allow 10 req/s with a burst of 20
    let mut statuses = Vec::new();
    for _ in 0..35 {
        let response = client.get("/auth/me").await;
        statuses.push(response.status);
    }

    let rate_limited = statuses
        .iter()
        .filter(|&&status| status == StatusCode::TOO_MANY_REQUESTS)
        .count();

    assert!(
        rate_limited > 0,
        "Requests past the burst should be rate limited. Got statuses: {:?}",
        statuses
    );
}

#[tokio::test]
async fn test_routers_do_not_share_rate_limit_state() {
    let first = TestStateBuilder::new()
        .build()
        .expect("Failed to create test state");
    let second = TestStateBuilder::new()
        .build()
        .expect("Failed to create test state");

    // Exhaust the burst on the first router
    let client = TestClient::new(router::router().with_state(first));
    for _ in 0..25 {
        client.get("/auth/me").await;
    }

    // A freshly built router starts with a full quota
    let client = TestClient::new(router::router().with_state(second));
    let response = client.get("/auth/me").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}
