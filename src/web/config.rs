use std::time::Duration;

use axum_extra::extract::cookie::Key;
use url::Url;

use super::error::AuthError;
use super::types::ResponseMode;
use crate::oauth::{LinkedInClient, LinkedInConfig};

/// Shared settings used by both config and runtime state.
#[derive(Clone)]
pub(crate) struct AppSettings {
    pub(crate) cookie_key: Key,
    pub(crate) session_cookie_name: String,
    pub(crate) session_ttl: Duration,
    pub(crate) secure_cookies: bool,
    pub(crate) response_mode: ResponseMode,
}

impl AppSettings {
    fn defaults() -> Self {
        Self {
            cookie_key: Key::generate(),
            session_cookie_name: "__linkedin_session".into(),
            session_ttl: Duration::from_secs(60 * 60),
            secure_cookies: true,
            response_mode: ResponseMode::Redirect,
        }
    }
}

/// Application configuration, built once at startup.
///
/// Required field (`client`) is a constructor parameter.
///
/// Use [`from_env()`](AppConfig::from_env) for convention-based setup,
/// or [`new()`](AppConfig::new) with `with_*` methods for full control.
pub struct AppConfig {
    pub(super) client: LinkedInClient,
    pub(super) settings: AppSettings,
}

impl AppConfig {
    /// Create config with the required `LinkedInClient`.
    ///
    /// All optional fields use sensible defaults. Override with `with_*` methods.
    #[must_use]
    pub fn new(client: LinkedInClient) -> Self {
        Self {
            client,
            settings: AppSettings::defaults(),
        }
    }

    /// Create config from environment variables.
    ///
    /// # Required env vars
    /// - `LINKEDIN_CLIENT_ID`: OAuth2 client ID
    /// - `LINKEDIN_CLIENT_SECRET`: OAuth2 client secret
    /// - `REDIRECT_URI`: OAuth2 callback URI (must be a valid URL)
    ///
    /// # Optional env vars
    /// - `LINKEDIN_AUTH_URL`, `LINKEDIN_TOKEN_URL`, `LINKEDIN_PROFILE_URL`,
    ///   `LINKEDIN_CONNECTIONS_URL`: endpoint overrides
    /// - `LINKEDIN_SCOPES`: Comma-separated OAuth2 scopes
    /// - `CALLBACK_RESPONSE_MODE`: `redirect` (default) or `json`
    /// - `COOKIE_KEY`: Cookie encryption key bytes (at least 64)
    /// - `SECURE_COOKIES`: `true` (default) or `false` for plain-HTTP development
    /// - `SESSION_TTL_MINUTES`: Session lifetime, default 60
    /// - `HTTP_TIMEOUT_SECS`: Timeout for LinkedIn requests, default 10
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Config`] if required env vars are missing or values are invalid.
    pub fn from_env() -> Result<Self, AuthError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env()`](AppConfig::from_env), reading values through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Config`] if required values are missing or invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AuthError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| {
            get(key).ok_or_else(|| AuthError::Config(format!("{key} is required")))
        };

        let client_id = required("LINKEDIN_CLIENT_ID")?;
        let client_secret = required("LINKEDIN_CLIENT_SECRET")?;
        let redirect_uri = parse_url("REDIRECT_URI", &required("REDIRECT_URI")?)?;

        let mut linkedin = LinkedInConfig::new(client_id, client_secret, redirect_uri);

        if let Some(url_str) = get("LINKEDIN_AUTH_URL") {
            linkedin = linkedin.with_auth_url(parse_url("LINKEDIN_AUTH_URL", &url_str)?);
        }
        if let Some(url_str) = get("LINKEDIN_TOKEN_URL") {
            linkedin = linkedin.with_token_url(parse_url("LINKEDIN_TOKEN_URL", &url_str)?);
        }
        if let Some(url_str) = get("LINKEDIN_PROFILE_URL") {
            linkedin = linkedin.with_profile_url(parse_url("LINKEDIN_PROFILE_URL", &url_str)?);
        }
        if let Some(url_str) = get("LINKEDIN_CONNECTIONS_URL") {
            linkedin =
                linkedin.with_connections_url(parse_url("LINKEDIN_CONNECTIONS_URL", &url_str)?);
        }
        if let Some(scopes) = get("LINKEDIN_SCOPES") {
            linkedin = linkedin.with_scopes(
                scopes
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            );
        }
        if let Some(secs) = get("HTTP_TIMEOUT_SECS") {
            let secs = parse_u64("HTTP_TIMEOUT_SECS", &secs)?;
            linkedin = linkedin.with_timeout(Duration::from_secs(secs));
        }

        let client = LinkedInClient::new(linkedin)
            .map_err(|e| AuthError::Config(format!("HTTP client: {e}")))?;

        let mut config = Self::new(client);

        if let Some(mode) = get("CALLBACK_RESPONSE_MODE") {
            let mode = mode
                .parse()
                .map_err(|e| AuthError::Config(format!("CALLBACK_RESPONSE_MODE: {e}")))?;
            config = config.with_response_mode(mode);
        }

        if let Some(secure) = get("SECURE_COOKIES") {
            let secure = match secure.trim() {
                "1" | "true" => true,
                "0" | "false" => false,
                other => {
                    return Err(AuthError::Config(format!(
                        "SECURE_COOKIES: expected true or false, got '{other}'"
                    )));
                }
            };
            config = config.with_secure_cookies(secure);
        }

        if let Some(minutes) = get("SESSION_TTL_MINUTES") {
            let minutes = parse_u64("SESSION_TTL_MINUTES", &minutes)?;
            config = config.with_session_ttl(Duration::from_secs(minutes.saturating_mul(60)));
        }

        if let Some(k) = get("COOKIE_KEY") {
            let key = Key::try_from(k.as_bytes()).map_err(|_| {
                AuthError::Config(
                    "COOKIE_KEY is set but invalid (must be at least 64 bytes). \
                     Remove the env var to use an ephemeral key, or provide a valid key."
                        .into(),
                )
            })?;
            config = config.with_cookie_key(key);
        }

        Ok(config)
    }

    #[must_use]
    pub fn client(&self) -> &LinkedInClient {
        &self.client
    }

    #[must_use]
    pub fn response_mode(&self) -> ResponseMode {
        self.settings.response_mode
    }

    #[must_use]
    pub fn session_ttl(&self) -> Duration {
        self.settings.session_ttl
    }

    #[must_use]
    pub fn with_cookie_key(mut self, key: Key) -> Self {
        self.settings.cookie_key = key;
        self
    }

    #[must_use]
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.settings.session_ttl = ttl;
        self
    }

    #[must_use]
    pub fn with_secure_cookies(mut self, secure: bool) -> Self {
        self.settings.secure_cookies = secure;
        self
    }

    #[must_use]
    pub fn with_response_mode(mut self, mode: ResponseMode) -> Self {
        self.settings.response_mode = mode;
        self
    }
}

fn parse_url(key: &str, value: &str) -> Result<Url, AuthError> {
    value
        .parse()
        .map_err(|e| AuthError::Config(format!("{key}: {e}")))
}

fn parse_u64(key: &str, value: &str) -> Result<u64, AuthError> {
    value
        .trim()
        .parse()
        .map_err(|e| AuthError::Config(format!("{key}: {e}")))
}
