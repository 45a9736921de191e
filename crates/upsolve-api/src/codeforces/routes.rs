use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use upsolve_core::{Problem, filter_candidates, pick};
use upsolve_db::models::{AttemptUpsert, BookmarkInsert};
use upsolve_db::repositories::{attempt as attempt_repo, bookmark as bookmark_repo};
use validator::Validate;

use crate::{ApiState, auth::AuthUser, error::ApiError, middleware::rate_limit};

/// Create the problem catalog and attempt/bookmark routes
pub fn routes() -> Router<ApiState> {
    use crate::make_rate_limit_layer;

    Router::new()
        .route("/api/codeforces/problems", get(get_problems))
        .route("/api/codeforces/problems/random", get(get_random_problem))
        .route("/api/codeforces/attempt", post(save_attempt))
        .route("/api/codeforces/bookmark", post(bookmark_problem))
        .route(
            "/api/codeforces/bookmark/{contest_id}/{problem_index}",
            delete(remove_bookmark),
        )
        .route("/api/codeforces/bookmarks", get(get_bookmarks))
        .layer(make_rate_limit_layer!(
            rate_limit::GENERAL_RATE_PER_SECOND,
            rate_limit::GENERAL_BURST_SIZE
        ))
}

#[derive(Debug, Deserialize)]
struct CatalogQuery {
    tags: Option<String>,
    rating: Option<i32>,
}

impl CatalogQuery {
    fn required_tags(&self) -> Result<&str, ApiError> {
        self.tags
            .as_deref()
            .filter(|tags| !tags.is_empty())
            .ok_or_else(|| ApiError::BadRequest("Tags parameter is required".to_string()))
    }
}

/// A catalog problem plus the page it links to.
#[derive(Debug, Serialize)]
struct ProblemWithUrl<'a> {
    #[serde(flatten)]
    problem: &'a Problem,
    url: Option<String>,
}

async fn get_problems(
    _auth_user: AuthUser,
    State(state): State<ApiState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<Value>, ApiError> {
    let tags = query.required_tags()?;

    let problems = state.codeforces.fetch_problems(tags).await?;
    let problems = filter_candidates(problems, None);

    Ok(Json(json!({ "problems": problems })))
}

/// Pick one random problem matching the tag and rating filters.
///
/// An exact rating match is preferred; without one the pool widens to
/// nearby ratings before giving up with a 404.
async fn get_random_problem(
    _auth_user: AuthUser,
    State(state): State<ApiState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<Value>, ApiError> {
    let tags = query.required_tags()?;

    let problems = state.codeforces.fetch_problems(tags).await?;
    let candidates = filter_candidates(problems, query.rating);

    let problem =
        pick(&candidates, &mut rand::thread_rng()).ok_or_else(|| ApiError::NoMatchingProblems {
            message: "No problems found matching your criteria".to_string(),
            suggestion: "Try different tags or a wider rating range".to_string(),
        })?;

    Ok(Json(json!({
        "problem": ProblemWithUrl {
            url: problem.url(),
            problem,
        }
    })))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct AttemptPayload {
    #[validate(required(message = "contestId is required"))]
    contest_id: Option<i64>,
    #[validate(
        required(message = "problemIndex is required"),
        length(min = 1, message = "problemIndex is required")
    )]
    problem_index: Option<String>,
    #[validate(
        required(message = "problemName is required"),
        length(min = 1, message = "problemName is required")
    )]
    problem_name: Option<String>,
    problem_rating: Option<i32>,
    problem_tags: Option<Vec<String>>,
    #[validate(required(message = "solved must be a boolean"))]
    solved: Option<bool>,
    #[validate(range(min = 0, message = "timeTaken must be a positive integer"))]
    time_taken: Option<i32>,
    code: Option<String>,
    language: Option<String>,
    review_feedback: Option<String>,
}

/// Record a submission. Resubmitting the same problem overwrites the
/// previous attempt instead of adding a second row.
async fn save_attempt(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Json(payload): Json<AttemptPayload>,
) -> Result<Json<Value>, ApiError> {
    payload.validate()?;

    let attempt = AttemptUpsert {
        contest_id: payload.contest_id.unwrap_or_default(),
        problem_index: payload.problem_index.unwrap_or_default(),
        problem_name: payload.problem_name.unwrap_or_default(),
        problem_rating: payload.problem_rating,
        problem_tags: payload.problem_tags.unwrap_or_default(),
        solved: payload.solved.unwrap_or_default(),
        time_taken: payload.time_taken,
        code: payload.code,
        language: payload.language,
        review_feedback: payload.review_feedback,
    };

    let attempt = attempt_repo::upsert(&state.pool, auth_user.user_id, &attempt).await?;

    Ok(Json(json!({ "success": true, "attempt": attempt })))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct BookmarkPayload {
    #[validate(required(message = "contestId is required"))]
    contest_id: Option<i64>,
    #[validate(
        required(message = "problemIndex is required"),
        length(min = 1, message = "problemIndex is required")
    )]
    problem_index: Option<String>,
    #[validate(
        required(message = "problemName is required"),
        length(min = 1, message = "problemName is required")
    )]
    problem_name: Option<String>,
    problem_rating: Option<i32>,
    problem_tags: Option<Vec<String>>,
}

async fn bookmark_problem(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Json(payload): Json<BookmarkPayload>,
) -> Result<Json<Value>, ApiError> {
    payload.validate()?;

    let bookmark = BookmarkInsert {
        contest_id: payload.contest_id.unwrap_or_default(),
        problem_index: payload.problem_index.unwrap_or_default(),
        problem_name: payload.problem_name.unwrap_or_default(),
        problem_rating: payload.problem_rating,
        problem_tags: payload.problem_tags.unwrap_or_default(),
    };

    match bookmark_repo::insert(&state.pool, auth_user.user_id, &bookmark).await {
        Ok(bookmark) => Ok(Json(json!({ "success": true, "bookmark": bookmark }))),
        Err(err) if upsolve_db::is_unique_violation(&err) => Err(ApiError::Conflict(
            "Problem already bookmarked".to_string(),
        )),
        Err(err) => Err(err.into()),
    }
}

async fn remove_bookmark(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Path((contest_id, problem_index)): Path<(i64, String)>,
) -> Result<Json<Value>, ApiError> {
    let removed =
        bookmark_repo::delete(&state.pool, auth_user.user_id, contest_id, &problem_index).await?;

    if removed == 0 {
        return Err(ApiError::NotFound("Bookmark not found".to_string()));
    }

    Ok(Json(json!({ "message": "Bookmark removed successfully" })))
}

async fn get_bookmarks(
    auth_user: AuthUser,
    State(state): State<ApiState>,
) -> Result<Json<Value>, ApiError> {
    let bookmarks = bookmark_repo::list(&state.pool, auth_user.user_id).await?;

    Ok(Json(json!({ "bookmarks": bookmarks })))
}
