use derive_more::Display;
use time::OffsetDateTime;

use super::error::AuthError;
use super::types::SessionRecord;
use crate::changes::recent_changes;
use crate::oauth::LinkedInClient;
use crate::types::AuthorizationCode;

/// Progress of one callback request.
///
/// `AwaitingCode → TokenExchanged → ProfileFetched → ConnectionsFetched →
/// ChangesComputed → SessionStored → Redirected`. Only the token exchange can
/// end the request early.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum CallbackStage {
    AwaitingCode,
    TokenExchanged,
    ProfileFetched,
    ConnectionsFetched,
    ChangesComputed,
    SessionStored,
    Redirected,
}

/// Run the outbound part of the callback and assemble the session record.
///
/// # Errors
///
/// Returns [`AuthError::TokenExchange`] if the code cannot be exchanged; the
/// profile and connections endpoints are not contacted in that case.
pub async fn collect_session_record(
    client: &LinkedInClient,
    code: &AuthorizationCode,
    now: OffsetDateTime,
) -> Result<SessionRecord, AuthError> {
    let access_token = client.exchange_code(code).await.map_err(|e| {
        tracing::error!(
            stage = %CallbackStage::TokenExchanged,
            failed = true,
            error = %e,
            "Token exchange failed"
        );
        AuthError::from(e)
    })?;
    tracing::debug!(stage = %CallbackStage::TokenExchanged);

    let profile = client.profile_or_empty(&access_token).await;
    tracing::debug!(stage = %CallbackStage::ProfileFetched);

    let connections = client.connections_or_empty(&access_token).await;
    tracing::debug!(stage = %CallbackStage::ConnectionsFetched);

    let connection_changes = recent_changes(&connections, now);
    tracing::debug!(
        stage = %CallbackStage::ChangesComputed,
        changes = connection_changes.len()
    );

    Ok(SessionRecord {
        profile,
        connections,
        connection_changes,
    })
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use tracing_subscriber::fmt::MakeWriter;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::oauth::LinkedInConfig;

    /// Collects formatted log output so assertions can inspect it.
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl LogBuffer {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for LogBuffer {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn client_for(linkedin: &MockServer) -> LinkedInClient {
        let base = linkedin.uri();
        let config = LinkedInConfig::new(
            "cid",
            "secret",
            "http://localhost:5000/auth/linkedin/callback".parse().unwrap(),
        )
        .with_token_url(format!("{base}/oauth/v2/accessToken").parse().unwrap())
        .with_profile_url(format!("{base}/v2/me").parse().unwrap())
        .with_connections_url(format!("{base}/v2/connections").parse().unwrap());
        LinkedInClient::new(config).unwrap()
    }

    #[test]
    fn stage_names_render_as_variants() {
        assert_eq!(CallbackStage::AwaitingCode.to_string(), "AwaitingCode");
        assert_eq!(CallbackStage::Redirected.to_string(), "Redirected");
    }

    #[tokio::test]
    async fn failed_exchange_is_logged_at_the_exchange_stage() {
        let linkedin = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/v2/accessToken"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid_grant"))
            .expect(1)
            .mount(&linkedin)
            .await;
        let client = client_for(&linkedin);

        let logs = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let result = collect_session_record(
            &client,
            &AuthorizationCode::from("abc123".to_string()),
            OffsetDateTime::now_utc(),
        )
        .await;

        assert!(matches!(result, Err(AuthError::TokenExchange(_))));
        let output = logs.contents();
        let line = output
            .lines()
            .find(|l| l.contains("Token exchange failed"))
            .expect("token exchange failure is logged");
        assert!(line.contains("stage=TokenExchanged"));
        assert!(line.contains("failed=true"));
        assert!(!line.contains("stage=AwaitingCode"));
    }

    #[tokio::test]
    async fn failed_exchange_skips_profile_and_connections() {
        let linkedin = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/v2/accessToken"))
            .respond_with(ResponseTemplate::new(400))
            .expect(1)
            .mount(&linkedin)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&linkedin)
            .await;
        let client = client_for(&linkedin);

        let result = collect_session_record(
            &client,
            &AuthorizationCode::from("abc123".to_string()),
            OffsetDateTime::now_utc(),
        )
        .await;

        assert!(matches!(result, Err(AuthError::TokenExchange(_))));
    }
}
