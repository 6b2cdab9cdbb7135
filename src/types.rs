use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use derive_more::{Display, From, Into};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Browser session identifier (opaque string).
///
/// Carried in the encrypted session cookie and used as the key into the
/// [`SessionStore`](crate::web::SessionStore).
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From, Into,
)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    /// Generates a cryptographically random session identifier.
    ///
    /// Returns a 43-character URL-safe string (32 random bytes → base64url).
    #[must_use]
    pub fn generate() -> Self {
        let random_bytes: [u8; 32] = rand::rng().random();
        Self(URL_SAFE_NO_PAD.encode(random_bytes))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// LinkedIn authorization code from the callback query string. Single use.
#[derive(Debug, Clone, PartialEq, Eq, Display, From, Into)]
pub struct AuthorizationCode(pub String);

impl AuthorizationCode {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// OAuth2 bearer token.
///
/// Lives only for the duration of the callback request. `Debug` is redacted
/// and there is deliberately no `Display`.
#[derive(Clone, PartialEq, Eq, From)]
pub struct AccessToken(String);

impl AccessToken {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_id_from_string() {
        let id = SessionId::from("sess-abc".to_string());
        assert_eq!(id.to_string(), "sess-abc");
    }

    #[test]
    fn generated_session_id_is_url_safe() {
        let id = SessionId::generate();
        assert_eq!(id.as_str().len(), 43);
        assert!(
            id.as_str()
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'),
            "session id should be URL-safe: {id}"
        );
    }

    #[test]
    fn generated_session_ids_are_unique() {
        assert_ne!(SessionId::generate(), SessionId::generate());
    }

    #[test]
    fn session_id_serializes_transparently() {
        let id = SessionId::from("sess-abc".to_string());
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"sess-abc\"");
    }

    #[test]
    fn access_token_debug_is_redacted() {
        let token = AccessToken::from("tok1".to_string());
        assert_eq!(format!("{token:?}"), "AccessToken(..)");
        assert_eq!(token.as_str(), "tok1");
    }

    #[test]
    fn authorization_code_displays_raw_value() {
        let code = AuthorizationCode::from("abc123".to_string());
        assert_eq!(code.to_string(), "abc123");
        assert_eq!(code.as_str(), "abc123");
    }
}
