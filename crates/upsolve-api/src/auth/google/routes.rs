use axum::{
    Router,
    extract::{Query, State},
    response::Redirect,
    routing::get,
};
use axum_extra::extract::{PrivateCookieJar, cookie::Cookie};
use oauth2::{AuthorizationCode, CsrfToken, PkceCodeChallenge, PkceCodeVerifier, Scope};
use openidconnect::{AuthenticationFlow, Nonce, TokenResponse, core::CoreResponseType};
use serde::Deserialize;

use super::client::OpenIdClient;
use crate::auth::{jwt, models::OidcFlowData, service};
use crate::{ApiState, error::ApiError, middleware::rate_limit};

pub fn routes() -> Router<ApiState> {
    use crate::make_rate_limit_layer;

    Router::new()
        .route("/auth/google", get(google_auth))
        .route("/auth/google/callback", get(auth_callback))
        .layer(make_rate_limit_layer!(
            rate_limit::GENERAL_RATE_PER_SECOND,
            rate_limit::GENERAL_BURST_SIZE
        ))
}

fn oidc_client(state: &ApiState) -> Result<&OpenIdClient, ApiError> {
    state
        .oidc_client
        .as_ref()
        .ok_or_else(|| ApiError::Oidc("Google sign-in is not configured".to_string()))
}

async fn google_auth(
    State(state): State<ApiState>,
    jar: PrivateCookieJar,
) -> Result<(PrivateCookieJar, Redirect), ApiError> {
    let client = oidc_client(&state)?;

    // Generate PKCE code verifier and challenge
    let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

    // Generate CSRF token and nonce
    let (auth_url, csrf_token, nonce) = client
        .authorize_url(
            AuthenticationFlow::<CoreResponseType>::AuthorizationCode,
            CsrfToken::new_random,
            Nonce::new_random,
        )
        .add_scope(Scope::new("email".to_string()))
        .add_scope(Scope::new("profile".to_string()))
        .set_pkce_challenge(pkce_challenge)
        .url();

    // Store CSRF token, nonce, and PKCE verifier in encrypted cookie
    let oidc_data = OidcFlowData {
        csrf_token: csrf_token.secret().clone(),
        nonce: nonce.secret().clone(),
        pkce_verifier: pkce_verifier.secret().clone(),
    };

    let oidc_json = serde_json::to_string(&oidc_data)
        .map_err(|e| ApiError::Cookie(format!("Failed to serialize OIDC data: {}", e)))?;

    let cookie = jwt::create_oidc_flow_cookie(oidc_json, &state.environment);
    let jar = jar.add(cookie);

    Ok((jar, Redirect::to(auth_url.as_str())))
}

#[derive(Debug, Deserialize)]
struct AuthRequest {
    code: String,
    state: String,
}

async fn auth_callback(
    State(state): State<ApiState>,
    jar: PrivateCookieJar,
    Query(query): Query<AuthRequest>,
) -> Result<(PrivateCookieJar, Redirect), ApiError> {
    let client = oidc_client(&state)?;

    // Retrieve OIDC flow data from cookie
    let oidc_cookie = jar
        .get("oidc_flow")
        .ok_or_else(|| ApiError::Cookie("No OIDC flow cookie found".to_string()))?;

    let oidc_data: OidcFlowData = serde_json::from_str(oidc_cookie.value())
        .map_err(|e| ApiError::Cookie(format!("Failed to parse OIDC data: {}", e)))?;

    // Verify CSRF token
    if oidc_data.csrf_token != query.state {
        return Err(ApiError::Cookie("Invalid CSRF token".to_string()));
    }

    // Remove the OIDC flow cookie
    let jar = jar.remove(Cookie::from("oidc_flow"));

    // Exchange authorization code for tokens with PKCE verifier
    let token_response = client
        .exchange_code(AuthorizationCode::new(query.code))
        .map_err(|e| ApiError::Oidc(format!("Token exchange failed: {}", e)))?
        .set_pkce_verifier(PkceCodeVerifier::new(oidc_data.pkce_verifier))
        .request_async(&reqwest::Client::new())
        .await
        .map_err(|e| ApiError::Oidc(format!("Token exchange failed: {}", e)))?;

    // Get and verify the ID token
    let id_token = token_response
        .id_token()
        .ok_or_else(|| ApiError::InvalidIdToken("No ID token in response".to_string()))?;

    let id_token_verifier = client.id_token_verifier();
    let id_token_claims = id_token
        .claims(&id_token_verifier, &Nonce::new(oidc_data.nonce))
        .map_err(|e| ApiError::InvalidIdToken(format!("ID token verification failed: {}", e)))?;

    // Extract user info from ID token
    let google_id = id_token_claims.subject().to_string();
    let email = id_token_claims
        .email()
        .ok_or_else(|| ApiError::InvalidIdToken("No email in ID token".to_string()))?
        .to_string();
    let email_verified = id_token_claims.email_verified().unwrap_or(false);
    let name = id_token_claims
        .name()
        .and_then(|n| n.get(None))
        .map(|n| n.to_string());
    let picture = id_token_claims
        .picture()
        .and_then(|p| p.get(None))
        .map(|p| p.to_string());

    if !email_verified {
        return Err(ApiError::Oidc("Email not verified".to_string()));
    }

    // Find or create user in database
    let user = service::find_or_create_google_user(
        &state.pool,
        &google_id,
        &email,
        name.as_deref(),
        picture.as_deref(),
    )
    .await?;

    // Generate the bearer token and hand it to the SPA via the redirect URL
    let token = jwt::generate_jwt_token(
        user.id,
        user.email.clone(),
        &state.jwt_secret,
        state.jwt_expiry_hours,
    )?;

    let redirect = format!("{}/auth/success?token={}", state.frontend_url, token);

    Ok((jar, Redirect::to(&redirect)))
}
