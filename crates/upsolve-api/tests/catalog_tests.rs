use axum::http::StatusCode;
use serde_json::json;
use upsolve_api::router;
use uuid::Uuid;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{self, TestClient, TestStateBuilder};

fn catalog_problem(contest_id: i64, index: &str, name: &str, rating: i32) -> serde_json::Value {
    json!({
        "contestId": contest_id,
        "index": index,
        "name": name,
        "type": "PROGRAMMING",
        "rating": rating,
        "tags": ["math"]
    })
}

async fn mock_problemset(server: &MockServer, tags: &str, problems: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/problemset.problems"))
        .and(query_param("tags", tags))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "result": { "problems": problems }
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_get_problems_requires_auth() {
    let state = TestStateBuilder::new()
        .build()
        .expect("Failed to create test state");

    let app = router::router().with_state(state);
    let client = TestClient::new(app);

    let response = client.get("/api/codeforces/problems?tags=math").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_get_problems_requires_tags() {
    let state = TestStateBuilder::new()
        .build()
        .expect("Failed to create test state");

    let token = common::jwt::create_test_token(Uuid::new_v4(), "catalog@example.com", &state.jwt_secret);

    let app = router::router().with_state(state);
    let client = TestClient::new(app);

    let response = client.get_with_auth("/api/codeforces/problems", &token).await;

    response.assert_status(StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Tags parameter is required");
}

#[tokio::test]
async fn test_get_problems_rejects_empty_tags() {
    let state = TestStateBuilder::new()
        .build()
        .expect("Failed to create test state");

    let token = common::jwt::create_test_token(Uuid::new_v4(), "catalog@example.com", &state.jwt_secret);

    let app = router::router().with_state(state);
    let client = TestClient::new(app);

    let response = client
        .get_with_auth("/api/codeforces/problems?tags=", &token)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Tags parameter is required");
}

#[tokio::test]
async fn test_get_problems_drops_unaddressable_entries() {
    let server = MockServer::start().await;

    // The middle entry has no contestId and cannot be linked to
    mock_problemset(
        &server,
        "math",
        json!([
            catalog_problem(4, "A", "Watermelon", 800),
            { "name": "Unaddressable", "rating": 900, "tags": ["math"] },
            catalog_problem(1400, "B", "RPG Protagonist", 1500),
        ]),
    )
    .await;

    let state = TestStateBuilder::new()
        .codeforces_base_url(server.uri())
        .build()
        .expect("Failed to create test state");

    let token = common::jwt::create_test_token(Uuid::new_v4(), "catalog@example.com", &state.jwt_secret);

    let app = router::router().with_state(state);
    let client = TestClient::new(app);

    let response = client
        .get_with_auth("/api/codeforces/problems?tags=math", &token)
        .await;

    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    let problems = body["problems"].as_array().expect("problems should be an array");

    assert_eq!(problems.len(), 2);
    assert_eq!(problems[0]["name"], "Watermelon");
    assert_eq!(problems[1]["name"], "RPG Protagonist");
    assert_eq!(problems[1]["contestId"], 1400);
}

#[tokio::test]
async fn test_random_problem_prefers_exact_rating() {
    let server = MockServer::start().await;

    mock_problemset(
        &server,
        "math",
        json!([
            catalog_problem(100, "A", "Near Low", 1400),
            catalog_problem(200, "B", "Exact", 1500),
            catalog_problem(300, "C", "Near High", 1600),
        ]),
    )
    .await;

    let state = TestStateBuilder::new()
        .codeforces_base_url(server.uri())
        .build()
        .expect("Failed to create test state");

    let token = common::jwt::create_test_token(Uuid::new_v4(), "catalog@example.com", &state.jwt_secret);

    let app = router::router().with_state(state);
    let client = TestClient::new(app);

    let response = client
        .get_with_auth("/api/codeforces/problems/random?tags=math&rating=1500", &token)
        .await;

    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    assert_eq!(body["problem"]["name"], "Exact");
    assert_eq!(body["problem"]["rating"], 1500);
    assert_eq!(
        body["problem"]["url"],
        "https://codeforces.com/problemset/problem/200/B"
    );
}

#[tokio::test]
async fn test_random_problem_widens_to_nearby_ratings() {
    let server = MockServer::start().await;

    mock_problemset(
        &server,
        "math",
        json!([
            catalog_problem(100, "A", "Too Low", 1200),
            catalog_problem(200, "B", "In Band Low", 1300),
            catalog_problem(300, "C", "In Band High", 1700),
        ]),
    )
    .await;

    let state = TestStateBuilder::new()
        .codeforces_base_url(server.uri())
        .build()
        .expect("Failed to create test state");

    let token = common::jwt::create_test_token(Uuid::new_v4(), "catalog@example.com", &state.jwt_secret);

    let app = router::router().with_state(state);
    let client = TestClient::new(app);

    // No problem has rating 1500, so the pick comes from the 1300..=1700 band
    let response = client
        .get_with_auth("/api/codeforces/problems/random?tags=math&rating=1500", &token)
        .await;

    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    let rating = body["problem"]["rating"].as_i64().expect("rating should be set");
    assert!(
        rating == 1300 || rating == 1700,
        "Pick should come from the rating band, got {rating}"
    );
}

#[tokio::test]
async fn test_random_problem_without_match_returns_404() {
    let server = MockServer::start().await;

    mock_problemset(
        &server,
        "math",
        json!([catalog_problem(4, "A", "Watermelon", 800)]),
    )
    .await;

    let state = TestStateBuilder::new()
        .codeforces_base_url(server.uri())
        .build()
        .expect("Failed to create test state");

    let token = common::jwt::create_test_token(Uuid::new_v4(), "catalog@example.com", &state.jwt_secret);

    let app = router::router().with_state(state);
    let client = TestClient::new(app);

    let response = client
        .get_with_auth("/api/codeforces/problems/random?tags=math&rating=3000", &token)
        .await;

    response.assert_status(StatusCode::NOT_FOUND);

    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "No problems found matching your criteria");
    assert_eq!(body["suggestion"], "Try different tags or a wider rating range");
}

#[tokio::test]
async fn test_failed_envelope_surfaces_upstream_comment() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/problemset.problems"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "FAILED",
            "comment": "tags: Incorrect tag format"
        })))
        .mount(&server)
        .await;

    let state = TestStateBuilder::new()
        .codeforces_base_url(server.uri())
        .build()
        .expect("Failed to create test state");

    let token = common::jwt::create_test_token(Uuid::new_v4(), "catalog@example.com", &state.jwt_secret);

    let app = router::router().with_state(state);
    let client = TestClient::new(app);

    let response = client
        .get_with_auth("/api/codeforces/problems?tags=bogus", &token)
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Failed to fetch problems from Codeforces");
    assert_eq!(body["details"], "tags: Incorrect tag format");
}

#[tokio::test]
async fn test_upstream_http_error_returns_500() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/problemset.problems"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let state = TestStateBuilder::new()
        .codeforces_base_url(server.uri())
        .build()
        .expect("Failed to create test state");

    let token = common::jwt::create_test_token(Uuid::new_v4(), "catalog@example.com", &state.jwt_secret);

    let app = router::router().with_state(state);
    let client = TestClient::new(app);

    let response = client
        .get_with_auth("/api/codeforces/problems?tags=math", &token)
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Failed to fetch problems from Codeforces");

    let details = body["details"].as_str().expect("details should be a string");
    assert!(details.contains("503"), "Details should name the upstream status: {details}");
}

#[tokio::test]
async fn test_save_attempt_requires_auth() {
    let state = TestStateBuilder::new()
        .build()
        .expect("Failed to create test state");

    let app = router::router().with_state(state);
    let client = TestClient::new(app);

    let response = client
        .post_json("/api/codeforces/attempt", &json!({ "contestId": 4 }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_save_attempt_rejects_missing_fields() {
    let state = TestStateBuilder::new()
        .build()
        .expect("Failed to create test state");

    let token = common::jwt::create_test_token(Uuid::new_v4(), "catalog@example.com", &state.jwt_secret);

    let app = router::router().with_state(state);
    let client = TestClient::new(app);

    // Validation runs before any database access
    let response = client
        .post_json_with_auth("/api/codeforces/attempt", &json!({}), &token)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Validation failed");

    let details = body["details"].as_array().expect("details should be an array");
    assert_eq!(details.len(), 4);
    assert_eq!(details[0]["field"], "contestId");
    assert_eq!(details[0]["message"], "contestId is required");
    assert_eq!(details[1]["field"], "problemIndex");
    assert_eq!(details[2]["field"], "problemName");
    assert_eq!(details[3]["field"], "solved");
    assert_eq!(details[3]["message"], "solved must be a boolean");
}

#[tokio::test]
async fn test_save_attempt_rejects_negative_time() {
    let state = TestStateBuilder::new()
        .build()
        .expect("Failed to create test state");

    let token = common::jwt::create_test_token(Uuid::new_v4(), "catalog@example.com", &state.jwt_secret);

    let app = router::router().with_state(state);
    let client = TestClient::new(app);

    let response = client
        .post_json_with_auth(
            "/api/codeforces/attempt",
            &json!({
                "contestId": 1400,
                "problemIndex": "B",
                "problemName": "RPG Protagonist",
                "solved": true,
                "timeTaken": -5
            }),
            &token,
        )
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json();
    let details = body["details"].as_array().expect("details should be an array");

    assert_eq!(details.len(), 1);
    assert_eq!(details[0]["field"], "timeTaken");
    assert_eq!(details[0]["message"], "timeTaken must be a positive integer");
}

#[tokio::test]
async fn test_bookmark_rejects_missing_fields() {
    let state = TestStateBuilder::new()
        .build()
        .expect("Failed to create test state");

    let token = common::jwt::create_test_token(Uuid::new_v4(), "catalog@example.com", &state.jwt_secret);

    let app = router::router().with_state(state);
    let client = TestClient::new(app);

    let response = client
        .post_json_with_auth("/api/codeforces/bookmark", &json!({}), &token)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Validation failed");

    let details = body["details"].as_array().expect("details should be an array");
    assert_eq!(details.len(), 3);
    assert_eq!(details[0]["field"], "contestId");
    assert_eq!(details[1]["field"], "problemIndex");
    assert_eq!(details[2]["field"], "problemName");
}
