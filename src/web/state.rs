use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::PrivateCookieJar;
use axum_extra::extract::cookie::{Cookie, Key};

use super::config::{AppConfig, AppSettings};
use super::cookies;
use super::error::AuthError;
use super::traits::SessionStore;
use super::types::SessionRecord;
use crate::oauth::LinkedInClient;
use crate::types::SessionId;

/// Runtime state behind every route: the LinkedIn client, the session store
/// and the cookie settings they share.
pub(super) struct AppState<S> {
    pub(super) client: Arc<LinkedInClient>,
    session_store: Arc<S>,
    pub(super) settings: AppSettings,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            session_store: Arc::clone(&self.session_store),
            settings: self.settings.clone(),
        }
    }
}

impl<S: SessionStore> AppState<S> {
    pub(super) fn new(config: AppConfig, session_store: S) -> Self {
        Self {
            client: Arc::new(config.client),
            session_store: Arc::new(session_store),
            settings: config.settings,
        }
    }

    /// Session id carried by the browser, if its cookie decrypts.
    pub(super) fn session_id(&self, jar: &PrivateCookieJar) -> Option<SessionId> {
        cookies::get_session_id(jar, &self.settings.session_cookie_name)
    }

    /// Session cookie for `session_id`, living as long as the stored record.
    pub(super) fn session_cookie(&self, session_id: &SessionId) -> Cookie<'static> {
        cookies::session_cookie(
            &self.settings.session_cookie_name,
            session_id,
            self.settings.session_ttl,
            self.settings.secure_cookies,
        )
    }

    pub(super) async fn load_record(
        &self,
        session_id: &SessionId,
    ) -> Result<Option<SessionRecord>, AuthError> {
        self.session_store
            .get(session_id)
            .await
            .map_err(|e| AuthError::Store(e.to_string()))
    }

    pub(super) async fn save_record(
        &self,
        session_id: SessionId,
        record: SessionRecord,
    ) -> Result<(), AuthError> {
        self.session_store
            .put(session_id, record)
            .await
            .map_err(|e| AuthError::Store(e.to_string()))
    }
}

impl<S: SessionStore> FromRef<AppState<S>> for Key {
    fn from_ref(state: &AppState<S>) -> Self {
        state.settings.cookie_key.clone()
    }
}
