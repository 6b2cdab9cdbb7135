use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::PrivateCookieJar;
use axum_extra::extract::cookie::Key;

use super::error::AuthError;
use super::state::AppState;
use super::traits::SessionStore;
use super::types::SessionRecord;
use crate::types::SessionId;

/// Session record of an authenticated browser.
///
/// Rejects with [`AuthError::Unauthenticated`] (a redirect to `/`) when the
/// browser has no session cookie or the store has no record for it.
#[derive(Debug, Clone)]
pub struct CurrentSession {
    pub session_id: SessionId,
    pub record: SessionRecord,
}

impl<S: SessionStore> FromRequestParts<AppState<S>> for CurrentSession {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<S>,
    ) -> Result<Self, Self::Rejection> {
        let jar: PrivateCookieJar<Key> = PrivateCookieJar::from_request_parts(parts, state)
            .await
            .map_err(|_| AuthError::Unauthenticated)?;

        let session_id = state.session_id(&jar).ok_or(AuthError::Unauthenticated)?;

        let record = state
            .load_record(&session_id)
            .await?
            .ok_or(AuthError::Unauthenticated)?;

        Ok(Self { session_id, record })
    }
}
