use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::validation;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation failed")]
    Validation(#[from] validator::ValidationErrors),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Auth(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{message}")]
    NoMatchingProblems { message: String, suggestion: String },
    #[error("{message}")]
    Upstream {
        message: String,
        details: Option<String>,
    },
    #[error("OIDC error: {0}")]
    Oidc(String),
    #[error("Cookie error: {0}")]
    Cookie(String),
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("Invalid ID token: {0}")]
    InvalidIdToken(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "Validation failed",
                    "details": validation::flatten_errors(&errors),
                }),
            ),
            Self::BadRequest(message) | Self::Conflict(message) | Self::Cookie(message) => {
                (StatusCode::BAD_REQUEST, json!({ "error": message }))
            }
            Self::Auth(message) | Self::InvalidIdToken(message) => {
                (StatusCode::UNAUTHORIZED, json!({ "error": message }))
            }
            Self::NotFound(message) => (StatusCode::NOT_FOUND, json!({ "error": message })),
            Self::NoMatchingProblems {
                message,
                suggestion,
            } => (
                StatusCode::NOT_FOUND,
                json!({ "error": message, "suggestion": suggestion }),
            ),
            Self::Upstream { message, details } => {
                tracing::error!(error = %message, details = ?details, "upstream service failure");
                let body = match details {
                    Some(details) => json!({ "error": message, "details": details }),
                    None => json!({ "error": message }),
                };
                (StatusCode::INTERNAL_SERVER_ERROR, body)
            }
            Self::Oidc(message) => {
                tracing::error!(error = %message, "OIDC flow failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": message }),
                )
            }
            Self::Jwt(err) => {
                tracing::error!(error = %err, "JWT signing failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error" }),
                )
            }
            Self::Database(err) => {
                tracing::error!(error = %err, "database query failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
