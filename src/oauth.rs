use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use url::Url;

use crate::error::Error;
use crate::types::{AccessToken, AuthorizationCode};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// LinkedIn `OAuth2` and API configuration.
///
/// Required fields are constructor parameters, so there are no runtime "missing field" errors.
///
/// ```rust,ignore
/// use linkedin_connections::LinkedInConfig;
///
/// let config = LinkedInConfig::new("client-id", "client-secret", "https://my-app.com/callback".parse()?);
/// // Optional overrides via chaining:
/// let config = config.with_token_url("http://127.0.0.1:9000/oauth/v2/accessToken".parse()?);
/// ```
#[derive(Clone)]
#[non_exhaustive]
pub struct LinkedInConfig {
    pub(crate) client_id: String,
    pub(crate) client_secret: String,
    pub(crate) redirect_uri: Url,
    pub(crate) auth_url: Url,
    pub(crate) token_url: Url,
    pub(crate) profile_url: Url,
    pub(crate) connections_url: Url,
    pub(crate) scopes: Vec<String>,
    pub(crate) timeout: Duration,
}

impl LinkedInConfig {
    /// Create a new LinkedIn configuration.
    ///
    /// Required fields are parameters; optional ones default to the public LinkedIn endpoints.
    #[must_use]
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: Url,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri,
            auth_url: "https://www.linkedin.com/oauth/v2/authorization"
                .parse()
                .expect("valid default URL"),
            token_url: "https://www.linkedin.com/oauth/v2/accessToken"
                .parse()
                .expect("valid default URL"),
            profile_url: "https://api.linkedin.com/v2/me"
                .parse()
                .expect("valid default URL"),
            connections_url: "https://api.linkedin.com/v2/connections?q=viewer&projection=(elements*(firstName,lastName,last_updated))"
                .parse()
                .expect("valid default URL"),
            scopes: vec!["r_liteprofile".into(), "r_emailaddress".into()],
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the LinkedIn authorization endpoint.
    #[must_use]
    pub fn with_auth_url(mut self, url: Url) -> Self {
        self.auth_url = url;
        self
    }

    /// Override the LinkedIn token endpoint.
    #[must_use]
    pub fn with_token_url(mut self, url: Url) -> Self {
        self.token_url = url;
        self
    }

    /// Override the profile endpoint.
    #[must_use]
    pub fn with_profile_url(mut self, url: Url) -> Self {
        self.profile_url = url;
        self
    }

    /// Override the connections endpoint, including its projection query.
    #[must_use]
    pub fn with_connections_url(mut self, url: Url) -> Self {
        self.connections_url = url;
        self
    }

    /// Override the `OAuth2` scopes (default: `["r_liteprofile", "r_emailaddress"]`).
    #[must_use]
    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    /// Timeout applied to every outbound request (default: 10 seconds).
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    #[must_use]
    pub fn redirect_uri(&self) -> &Url {
        &self.redirect_uri
    }

    #[must_use]
    pub fn auth_url(&self) -> &Url {
        &self.auth_url
    }

    #[must_use]
    pub fn token_url(&self) -> &Url {
        &self.token_url
    }

    #[must_use]
    pub fn profile_url(&self) -> &Url {
        &self.profile_url
    }

    #[must_use]
    pub fn connections_url(&self) -> &Url {
        &self.connections_url
    }

    #[must_use]
    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl std::fmt::Debug for LinkedInConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkedInConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri.as_str())
            .field("auth_url", &self.auth_url.as_str())
            .field("token_url", &self.token_url.as_str())
            .field("profile_url", &self.profile_url.as_str())
            .field("connections_url", &self.connections_url.as_str())
            .field("scopes", &self.scopes)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// `OAuth2` and REST client for the LinkedIn API.
///
/// Token exchange lives here; the bearer-authenticated profile and
/// connections fetchers are in [`crate::api`].
#[derive(Debug)]
pub struct LinkedInClient {
    pub(crate) config: LinkedInConfig,
    pub(crate) http: reqwest::Client,
}

/// Token response from the LinkedIn token endpoint.
#[derive(Debug, Clone, Deserialize)]
#[non_exhaustive]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

impl LinkedInClient {
    /// Create a client whose HTTP connection pool applies the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] if the HTTP client cannot be initialised.
    pub fn new(config: LinkedInConfig) -> Result<Self, Error> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, http })
    }

    #[must_use]
    pub fn config(&self) -> &LinkedInConfig {
        &self.config
    }

    /// Build the LinkedIn authorization URL the browser is redirected to.
    #[must_use]
    pub fn authorization_url(&self) -> String {
        let scope = self.config.scopes.join(" ");

        let mut url = self.config.auth_url.clone();
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", self.config.redirect_uri.as_str())
            .append_pair("scope", &scope);

        url.into()
    }

    /// Exchange an authorization code for an access token.
    ///
    /// Only an HTTP 200 carrying a non-empty `access_token` counts as success.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] on network failure or an undecodable body, or
    /// [`Error::OAuth`] on any non-200 status or a missing token.
    pub async fn exchange_code(&self, code: &AuthorizationCode) -> Result<AccessToken, Error> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code.as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
        ];

        let response = self
            .http
            .post(self.config.token_url.clone())
            .form(&params)
            .send()
            .await?;

        let response = Self::ensure_ok(response, "token exchange").await?;
        let token = response.json::<TokenResponse>().await?;

        tracing::debug!(expires_in = ?token.expires_in, "Access token issued");

        token
            .access_token
            .filter(|t| !t.is_empty())
            .map(AccessToken::from)
            .ok_or_else(|| Error::OAuth {
                operation: "token exchange",
                status: Some(StatusCode::OK.as_u16()),
                detail: "response has no access_token".into(),
            })
    }

    /// Checks for HTTP 200; returns the response on success or an error with details.
    pub(crate) async fn ensure_ok(
        response: reqwest::Response,
        operation: &'static str,
    ) -> Result<reqwest::Response, Error> {
        if response.status() == StatusCode::OK {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(Error::OAuth {
            operation,
            status: Some(status),
            detail: body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> LinkedInConfig {
        LinkedInConfig::new(
            "test-client",
            "test-secret",
            "https://example.com/auth/linkedin/callback".parse().unwrap(),
        )
    }

    #[test]
    fn test_authorization_url_contains_required_params() {
        let client = LinkedInClient::new(test_config()).unwrap();
        let url = client.authorization_url();

        assert!(url.starts_with("https://www.linkedin.com/oauth/v2/authorization?"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("client_id=test-client"));
        assert!(url.contains(
            "redirect_uri=https%3A%2F%2Fexample.com%2Fauth%2Flinkedin%2Fcallback"
        ));
        assert!(url.contains("scope=r_liteprofile+r_emailaddress"));
    }

    #[test]
    fn test_authorization_url_never_leaks_secret() {
        let client = LinkedInClient::new(test_config()).unwrap();
        assert!(!client.authorization_url().contains("test-secret"));
    }

    #[test]
    fn test_config_constructor_defaults() {
        let config = test_config();

        assert_eq!(config.client_id(), "test-client");
        assert_eq!(
            config.token_url().as_str(),
            "https://www.linkedin.com/oauth/v2/accessToken"
        );
        assert_eq!(config.profile_url().as_str(), "https://api.linkedin.com/v2/me");
        assert_eq!(config.connections_url().path(), "/v2/connections");
        assert_eq!(config.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_config_with_overrides() {
        let config = test_config()
            .with_auth_url("https://custom.example.com/authorize".parse().unwrap())
            .with_scopes(vec!["r_basicprofile".into()])
            .with_timeout(Duration::from_secs(3));

        assert_eq!(
            config.auth_url().as_str(),
            "https://custom.example.com/authorize"
        );
        assert_eq!(config.scopes(), &["r_basicprofile"]);
        assert_eq!(config.timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_config_debug_redacts_secret() {
        let rendered = format!("{:?}", test_config());
        assert!(!rendered.contains("test-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
