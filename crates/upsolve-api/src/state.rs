use std::time::Duration;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use sqlx::PgPool;

use crate::{
    ApiConfig,
    auth::google::{OpenIdClient, create_oidc_client},
    codeforces::CodeforcesClient,
    config::Environment,
    gemini::GeminiClient,
};

#[derive(Clone)]
pub struct ApiState {
    pub pool: PgPool,
    /// `None` when the Google OAuth trio is not configured
    pub oidc_client: Option<OpenIdClient>,
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
    pub frontend_url: String,
    pub cookie_key: Key,
    pub environment: Environment,
    /// Fixed token accepted by `POST /auth/token`; `None` disables it
    pub test_login_token: Option<String>,
    pub codeforces: CodeforcesClient,
    /// `None` when `GEMINI_API_KEY` is not configured
    pub gemini: Option<GeminiClient>,
}

impl ApiState {
    pub async fn new(config: ApiConfig, pool: PgPool) -> anyhow::Result<Self> {
        // Create cookie key
        let cookie_key = Key::from(config.cookie_secret.as_bytes());

        // Google sign-in needs the full client id / secret / callback trio
        let oidc_client = match (
            config.google_client_id,
            config.google_client_secret,
            config.google_callback_url,
        ) {
            (Some(client_id), Some(client_secret), Some(callback_url)) => {
                Some(create_oidc_client(client_id, client_secret, callback_url).await?)
            }
            _ => {
                tracing::warn!(
                    "Google sign-in not configured (missing GOOGLE_* environment variables)"
                );
                None
            }
        };

        let http_timeout = Duration::from_secs(config.http_timeout_secs);

        let codeforces = CodeforcesClient::new(config.codeforces_base_url, http_timeout)?;

        let gemini = match config.gemini_api_key {
            Some(api_key) => Some(GeminiClient::new(
                config.gemini_base_url,
                config.gemini_model,
                api_key,
                http_timeout,
            )?),
            None => {
                tracing::warn!("Code review not configured (missing GEMINI_API_KEY)");
                None
            }
        };

        Ok(Self {
            pool,
            oidc_client,
            jwt_secret: config.jwt_secret,
            jwt_expiry_hours: config.jwt_expiry_hours,
            frontend_url: config.frontend_url,
            cookie_key,
            environment: config.environment,
            test_login_token: config.test_login_token,
            codeforces,
            gemini,
        })
    }
}

impl FromRef<ApiState> for Key {
    fn from_ref(state: &ApiState) -> Self {
        state.cookie_key.clone()
    }
}

/// Subset of the state needed by the bearer-token extractor.
///
/// Extractors bound on `AuthConfig: FromRef<S>` instead of the full `ApiState`
/// so they also work against the smaller states used in tests.
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

impl FromRef<ApiState> for AuthConfig {
    fn from_ref(state: &ApiState) -> Self {
        Self {
            jwt_secret: state.jwt_secret.clone(),
        }
    }
}
