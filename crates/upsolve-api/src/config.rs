//! Typed environment configuration for the API.
//!
//! All settings come from environment variables (see `.env.example`),
//! deserialized in one step with `envy` so missing or malformed values fail
//! at startup rather than at first use.

use serde::Deserialize;

/// Runtime environment switch.
///
/// Drives tracing output format, cookie security flags, and the HSTS header.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::Development
    }
}

/// Application configuration, one field per environment variable.
///
/// `DATABASE_URL`, `JWT_SECRET`, and `COOKIE_SECRET` are required. The Google
/// OAuth trio, the Gemini API key, and the test login token are optional;
/// leaving them unset disables the corresponding feature instead of failing
/// startup.
#[derive(Clone, Debug, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default = "default_port")]
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    #[serde(default = "default_jwt_expiry_hours")]
    pub jwt_expiry_hours: i64,
    /// Encrypts the short-lived OAuth-flow cookie; must be at least 64 bytes
    pub cookie_secret: String,
    #[serde(default = "default_frontend_url")]
    pub frontend_url: String,
    #[serde(default)]
    pub google_client_id: Option<String>,
    #[serde(default)]
    pub google_client_secret: Option<String>,
    #[serde(default)]
    pub google_callback_url: Option<String>,
    #[serde(default)]
    pub gemini_api_key: Option<String>,
    #[serde(default = "default_gemini_base_url")]
    pub gemini_base_url: String,
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,
    #[serde(default = "default_codeforces_base_url")]
    pub codeforces_base_url: String,
    /// Fixed token accepted by `POST /auth/token`; unset disables the endpoint
    #[serde(default)]
    pub test_login_token: Option<String>,
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

impl ApiConfig {
    /// Load the configuration from the process environment.
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }
}

fn default_port() -> u16 {
    5001
}

fn default_jwt_expiry_hours() -> i64 {
    // 7 days, matching the session length the frontend expects
    168
}

fn default_frontend_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_gemini_model() -> String {
    "models/gemini-1.5-flash".to_string()
}

fn default_codeforces_base_url() -> String {
    "https://codeforces.com/api".to_string()
}

fn default_http_timeout_secs() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    fn required_vars() -> Vec<(String, String)> {
        vec![
            (
                "DATABASE_URL".to_string(),
                "postgres://localhost/upsolve".to_string(),
            ),
            (
                "JWT_SECRET".to_string(),
                "test_jwt_secret_minimum_32_characters_long".to_string(),
            ),
            (
                "COOKIE_SECRET".to_string(),
                "test_cookie_secret_minimum_64_characters_long_for_secure_encryption".to_string(),
            ),
        ]
    }

    #[test]
    fn test_defaults_applied() {
        let config: ApiConfig =
            envy::from_iter(required_vars()).expect("Config should parse with only required vars");

        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.port, 5001);
        assert_eq!(config.jwt_expiry_hours, 168);
        assert_eq!(config.frontend_url, "http://localhost:3000");
        assert_eq!(config.gemini_model, "models/gemini-1.5-flash");
        assert_eq!(config.codeforces_base_url, "https://codeforces.com/api");
        assert_eq!(config.http_timeout_secs, 10);
        assert!(config.google_client_id.is_none());
        assert!(config.gemini_api_key.is_none());
        assert!(config.test_login_token.is_none());
    }

    #[test]
    fn test_missing_required_var_fails() {
        let vars = vec![(
            "DATABASE_URL".to_string(),
            "postgres://localhost/upsolve".to_string(),
        )];

        let result = envy::from_iter::<_, ApiConfig>(vars);

        assert!(result.is_err(), "Parsing should fail without JWT_SECRET");
    }

    #[test]
    fn test_environment_parsing() {
        let mut vars = required_vars();
        vars.push(("ENVIRONMENT".to_string(), "production".to_string()));

        let config: ApiConfig = envy::from_iter(vars).expect("Config should parse");

        assert!(config.environment.is_production());
        assert!(!config.environment.is_development());
    }

    #[test]
    fn test_optional_features_enabled_when_set() {
        let mut vars = required_vars();
        vars.push(("GEMINI_API_KEY".to_string(), "test-key".to_string()));
        vars.push(("TEST_LOGIN_TOKEN".to_string(), "test-token".to_string()));
        vars.push(("PORT".to_string(), "8080".to_string()));

        let config: ApiConfig = envy::from_iter(vars).expect("Config should parse");

        assert_eq!(config.gemini_api_key.as_deref(), Some("test-key"));
        assert_eq!(config.test_login_token.as_deref(), Some("test-token"));
        assert_eq!(config.port, 8080);
    }
}
