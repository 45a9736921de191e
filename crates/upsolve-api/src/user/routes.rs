use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, put},
};
use serde::Deserialize;
use serde_json::{Value, json};
use upsolve_core::{AttemptRecord, ChartData, UserStatistics, aggregate, chart_series};
use upsolve_db::models::{AttemptCode, ProblemAttempt};
use upsolve_db::repositories::{attempt as attempt_repo, user as user_repo};
use validator::Validate;

use crate::auth::models::{PreferencesResponse, UserResponse};
use crate::{ApiState, auth::AuthUser, error::ApiError, middleware::rate_limit};

/// Create the user statistics and profile routes
pub fn routes() -> Router<ApiState> {
    use crate::make_rate_limit_layer;

    Router::new()
        .route("/api/users/stats", get(get_stats))
        .route("/api/users/solved", get(get_solved_problems))
        .route("/api/users/attempts", get(get_attempts))
        .route("/api/users/chart-data", get(get_chart_data))
        .route("/api/users/profile", get(get_profile))
        .route("/api/users/preferences", put(update_preferences))
        .route(
            "/api/users/attempt/{contest_id}/{problem_index}",
            get(get_attempt),
        )
        .route(
            "/api/users/code/{contest_id}/{problem_index}",
            get(get_code),
        )
        .route(
            "/api/users/review/{contest_id}/{problem_index}",
            get(get_review),
        )
        .layer(make_rate_limit_layer!(
            rate_limit::GENERAL_RATE_PER_SECOND,
            rate_limit::GENERAL_BURST_SIZE
        ))
}

fn attempt_record(attempt: &ProblemAttempt) -> AttemptRecord {
    AttemptRecord {
        problem_name: attempt.problem_name.clone(),
        problem_tags: attempt.problem_tags.clone(),
        problem_rating: attempt.problem_rating,
        solved: attempt.solved,
        time_taken: attempt.time_taken,
        attempt_date: attempt.attempt_date,
    }
}

async fn load_statistics(
    state: &ApiState,
    user_id: sqlx::types::Uuid,
) -> Result<UserStatistics, ApiError> {
    let attempts = attempt_repo::list_all(&state.pool, user_id).await?;
    let records: Vec<AttemptRecord> = attempts.iter().map(attempt_record).collect();
    Ok(aggregate(&records))
}

async fn get_stats(
    auth_user: AuthUser,
    State(state): State<ApiState>,
) -> Result<Json<UserStatistics>, ApiError> {
    let statistics = load_statistics(&state, auth_user.user_id).await?;
    Ok(Json(statistics))
}

async fn get_chart_data(
    auth_user: AuthUser,
    State(state): State<ApiState>,
) -> Result<Json<ChartData>, ApiError> {
    let statistics = load_statistics(&state, auth_user.user_id).await?;
    Ok(Json(chart_series(&statistics)))
}

#[derive(Debug, Deserialize, Validate)]
struct PaginationQuery {
    #[validate(range(min = 1, message = "Page must be a positive integer"))]
    page: Option<i64>,
    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
    limit: Option<i64>,
    solved: Option<bool>,
}

impl PaginationQuery {
    /// Page number and offset for the given default page size.
    fn window(&self, default_limit: i64) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1);
        let limit = self.limit.unwrap_or(default_limit);
        (page, limit, (page - 1) * limit)
    }
}

async fn get_solved_problems(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<Value>, ApiError> {
    query.validate()?;
    let (page, limit, offset) = query.window(10);

    let solved_problems =
        attempt_repo::list_solved_page(&state.pool, auth_user.user_id, limit, offset).await?;
    let total = attempt_repo::count(&state.pool, auth_user.user_id, Some(true)).await?;

    Ok(Json(json!({
        "solvedProblems": solved_problems,
        "currentPage": page,
        "totalPages": (total as u64).div_ceil(limit as u64),
        "totalSolved": total,
    })))
}

async fn get_attempts(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<Value>, ApiError> {
    query.validate()?;
    let (page, limit, offset) = query.window(20);

    let attempts =
        attempt_repo::list_page(&state.pool, auth_user.user_id, query.solved, limit, offset)
            .await?;
    let total = attempt_repo::count(&state.pool, auth_user.user_id, query.solved).await?;

    Ok(Json(json!({
        "attempts": attempts,
        "currentPage": page,
        "totalPages": (total as u64).div_ceil(limit as u64),
        "totalAttempts": total,
    })))
}

async fn get_profile(
    auth_user: AuthUser,
    State(state): State<ApiState>,
) -> Result<Json<Value>, ApiError> {
    let user = user_repo::find_by_id(&state.pool, auth_user.user_id)
        .await?
        .ok_or_else(|| ApiError::Auth("User not found".to_string()))?;

    let statistics = load_statistics(&state, auth_user.user_id).await?;

    Ok(Json(json!({
        "user": UserResponse::with_preferences(&user),
        "stats": statistics.stats,
    })))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct PreferencesPayload {
    default_tags: Option<Vec<String>>,
    #[validate(nested)]
    difficulty_range: Option<DifficultyRangePayload>,
}

#[derive(Debug, Deserialize, Validate)]
struct DifficultyRangePayload {
    #[validate(range(min = 0, message = "Minimum difficulty must be a positive integer"))]
    min: Option<i32>,
    #[validate(range(min = 0, message = "Maximum difficulty must be a positive integer"))]
    max: Option<i32>,
}

/// Partial preference update: absent fields keep their stored values.
async fn update_preferences(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Json(payload): Json<PreferencesPayload>,
) -> Result<Json<Value>, ApiError> {
    payload.validate()?;

    let (min_rating, max_rating) = payload
        .difficulty_range
        .map(|range| (range.min, range.max))
        .unwrap_or((None, None));

    let user = user_repo::update_preferences(
        &state.pool,
        auth_user.user_id,
        payload.default_tags,
        min_rating,
        max_rating,
    )
    .await?;

    Ok(Json(
        json!({ "preferences": PreferencesResponse::from_user(&user) }),
    ))
}

async fn get_attempt(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Path((contest_id, problem_index)): Path<(i64, String)>,
) -> Result<Json<Value>, ApiError> {
    let attempt =
        attempt_repo::find_by_key(&state.pool, auth_user.user_id, contest_id, &problem_index)
            .await?
            .ok_or_else(|| ApiError::NotFound("Attempt not found".to_string()))?;

    Ok(Json(json!({ "attempt": attempt })))
}

async fn get_code(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Path((contest_id, problem_index)): Path<(i64, String)>,
) -> Result<Json<AttemptCode>, ApiError> {
    let stored =
        attempt_repo::find_code_by_key(&state.pool, auth_user.user_id, contest_id, &problem_index)
            .await?
            .filter(|row| row.code.is_some())
            .ok_or_else(|| ApiError::NotFound("No code found for this problem".to_string()))?;

    Ok(Json(stored))
}

async fn get_review(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Path((contest_id, problem_index)): Path<(i64, String)>,
) -> Result<Json<Value>, ApiError> {
    let review =
        attempt_repo::find_by_key(&state.pool, auth_user.user_id, contest_id, &problem_index)
            .await?
            .and_then(|attempt| attempt.review_feedback)
            .ok_or_else(|| ApiError::NotFound("No review found for this problem".to_string()))?;

    Ok(Json(json!({ "review": review })))
}
