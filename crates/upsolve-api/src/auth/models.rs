use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use upsolve_db::models::User;

/// State carried through the Google sign-in redirect in an encrypted cookie.
#[derive(Debug, Serialize, Deserialize)]
pub struct OidcFlowData {
    pub csrf_token: String,
    pub nonce: String,
    pub pkce_verifier: String,
}

/// User as serialized on the wire.
///
/// The login responses send the identity fields only; `/auth/me` and the
/// profile endpoint add the preference block.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferences: Option<PreferencesResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesResponse {
    pub default_tags: Vec<String>,
    pub difficulty_range: DifficultyRange,
}

#[derive(Debug, Serialize)]
pub struct DifficultyRange {
    pub min: i32,
    pub max: i32,
}

impl UserResponse {
    /// Identity-only projection for the login responses.
    pub fn basic(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            avatar: user.avatar_url.clone(),
            preferences: None,
        }
    }

    /// Full projection including preferences.
    pub fn with_preferences(user: &User) -> Self {
        Self {
            preferences: Some(PreferencesResponse::from_user(user)),
            ..Self::basic(user)
        }
    }
}

impl PreferencesResponse {
    pub fn from_user(user: &User) -> Self {
        Self {
            default_tags: user.default_tags.clone(),
            difficulty_range: DifficultyRange {
                min: user.min_rating,
                max: user.max_rating,
            },
        }
    }
}
