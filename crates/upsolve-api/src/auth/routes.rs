use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use upsolve_db::repositories::user as user_repo;

use super::{google, jwt, middleware::AuthUser, models::UserResponse, service};
use crate::{ApiState, error::ApiError, middleware::rate_limit};

pub fn routes() -> Router<ApiState> {
    use crate::make_rate_limit_layer;

    // The token login is a credential check, so it gets the stricter limit
    let token_routes = Router::new()
        .route("/auth/token", post(token_auth))
        .layer(make_rate_limit_layer!(
            rate_limit::AUTH_RATE_PER_SECOND,
            rate_limit::AUTH_BURST_SIZE
        ));

    let session_routes = Router::new()
        .route("/auth/me", get(auth_me))
        .route("/auth/logout", get(logout))
        .layer(make_rate_limit_layer!(
            rate_limit::GENERAL_RATE_PER_SECOND,
            rate_limit::GENERAL_BURST_SIZE
        ));

    Router::new()
        .merge(google::routes())
        .merge(token_routes)
        .merge(session_routes)
}

#[derive(Debug, Deserialize)]
struct TokenLogin {
    token: Option<String>,
}

/// Fixed-token login for API exploration without a Google account.
///
/// Compares against `TEST_LOGIN_TOKEN`; when that variable is unset the
/// endpoint always rejects.
async fn token_auth(
    State(state): State<ApiState>,
    Json(payload): Json<TokenLogin>,
) -> Result<Json<Value>, ApiError> {
    match (state.test_login_token.as_deref(), payload.token.as_deref()) {
        (Some(expected), Some(given)) if expected == given => {}
        _ => return Err(ApiError::Auth("Invalid token".to_string())),
    }

    let user = service::find_or_create_test_user(&state.pool).await?;

    let token = jwt::generate_jwt_token(
        user.id,
        user.email.clone(),
        &state.jwt_secret,
        state.jwt_expiry_hours,
    )?;

    Ok(Json(json!({
        "message": "Authenticated with token",
        "user": UserResponse::basic(&user),
        "token": token,
    })))
}

async fn auth_me(
    auth_user: AuthUser,
    State(state): State<ApiState>,
) -> Result<Json<Value>, ApiError> {
    let user = user_repo::find_by_id(&state.pool, auth_user.user_id)
        .await?
        .ok_or_else(|| ApiError::Auth("User not found".to_string()))?;

    Ok(Json(json!({ "user": UserResponse::with_preferences(&user) })))
}

async fn logout(_auth_user: AuthUser) -> Json<Value> {
    // Bearer tokens are stateless; the client discards its copy
    Json(json!({ "message": "Logged out successfully" }))
}
