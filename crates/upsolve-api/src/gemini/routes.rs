use axum::{Json, Router, extract::State, routing::post};
use serde::Deserialize;
use serde_json::{Value, json};
use validator::Validate;

use super::client::GeminiClient;
use crate::{ApiState, auth::AuthUser, error::ApiError, middleware::rate_limit};

/// Create the AI code review routes
pub fn routes() -> Router<ApiState> {
    use crate::make_rate_limit_layer;

    Router::new()
        .route("/api/gemini/review", post(review_code))
        .route("/api/gemini/explain", post(explain_code))
        .layer(make_rate_limit_layer!(
            rate_limit::GENERAL_RATE_PER_SECOND,
            rate_limit::GENERAL_BURST_SIZE
        ))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct CodeReviewPayload {
    #[validate(
        required(message = "Code is required"),
        length(min = 1, message = "Code is required")
    )]
    code: Option<String>,
    problem_statement: Option<String>,
    language: Option<String>,
}

fn review_error(details: String) -> ApiError {
    ApiError::Upstream {
        message: "Failed to generate code review".to_string(),
        details: Some(details),
    }
}

fn explanation_error(details: String) -> ApiError {
    ApiError::Upstream {
        message: "Failed to generate code explanation".to_string(),
        details: Some(details),
    }
}

fn configured_client(
    state: &ApiState,
    missing: fn(String) -> ApiError,
) -> Result<&GeminiClient, ApiError> {
    state
        .gemini
        .as_ref()
        .ok_or_else(|| missing("GEMINI_API_KEY is not configured".to_string()))
}

async fn review_code(
    _auth_user: AuthUser,
    State(state): State<ApiState>,
    Json(payload): Json<CodeReviewPayload>,
) -> Result<Json<Value>, ApiError> {
    payload.validate()?;
    let gemini = configured_client(&state, review_error)?;

    let review = gemini
        .review_code(
            payload.code.as_deref().unwrap_or_default(),
            payload.problem_statement.as_deref(),
            payload.language.as_deref(),
        )
        .await
        .map_err(|err| review_error(err.to_string()))?;

    Ok(Json(json!({ "review": review })))
}

async fn explain_code(
    _auth_user: AuthUser,
    State(state): State<ApiState>,
    Json(payload): Json<CodeReviewPayload>,
) -> Result<Json<Value>, ApiError> {
    payload.validate()?;
    let gemini = configured_client(&state, explanation_error)?;

    let explanation = gemini
        .explain_code(payload.code.as_deref().unwrap_or_default())
        .await
        .map_err(|err| explanation_error(err.to_string()))?;

    Ok(Json(json!({ "explanation": explanation })))
}
