use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::http::header::LOCATION;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use axum_extra::extract::PrivateCookieJar;
use serde::Deserialize;
use time::OffsetDateTime;

use super::config::AppConfig;
use super::error::AuthError;
use super::extractor::CurrentSession;
use super::flow::{CallbackStage, collect_session_record};
use super::state::AppState;
use super::traits::SessionStore;
use super::types::ResponseMode;
use crate::types::{AuthorizationCode, SessionId};

pub const ROOT_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/auth/linkedin";
pub const CALLBACK_PATH: &str = "/auth/linkedin/callback";
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Create the application router.
pub fn app_routes<S>(config: AppConfig, session_store: S) -> Router
where
    S: SessionStore,
{
    let state = AppState::new(config, session_store);

    Router::new()
        .route(ROOT_PATH, get(index))
        .route(LOGIN_PATH, get(login::<S>))
        .route(CALLBACK_PATH, get(callback::<S>))
        .route(DASHBOARD_PATH, get(dashboard))
        .with_state(state)
}

// ── Index ──────────────────────────────────────────────────────────

async fn index() -> &'static str {
    "Not signed in. Visit /auth/linkedin to connect your LinkedIn account.\n"
}

// ── Login ──────────────────────────────────────────────────────────

async fn login<S: SessionStore>(State(state): State<AppState<S>>) -> Response {
    found(&state.client.authorization_url())
}

// ── Callback ───────────────────────────────────────────────────────

#[derive(Deserialize)]
struct CallbackParams {
    code: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

async fn callback<S: SessionStore>(
    State(state): State<AppState<S>>,
    jar: PrivateCookieJar,
    Query(params): Query<CallbackParams>,
) -> Result<Response, AuthError> {
    let Some(code) = params.code.filter(|c| !c.is_empty()) else {
        if let Some(error) = &params.error {
            let desc = params.error_description.as_deref().unwrap_or("Unknown error");
            tracing::warn!(error = %error, description = %desc, "OAuth2 error from LinkedIn");
        } else {
            tracing::warn!(stage = %CallbackStage::AwaitingCode, "Callback without authorization code");
        }
        return Err(AuthError::MissingCode);
    };
    let code = AuthorizationCode::from(code);

    let record = collect_session_record(&state.client, &code, OffsetDateTime::now_utc()).await?;

    let session_id = state.session_id(&jar).unwrap_or_else(SessionId::generate);
    state.save_record(session_id.clone(), record.clone()).await?;
    tracing::debug!(stage = %CallbackStage::SessionStored);

    let jar = jar.add(state.session_cookie(&session_id));

    let connection_count = record
        .connections
        .get("elements")
        .and_then(|e| e.as_array())
        .map_or(0, Vec::len);
    tracing::info!(
        connections = connection_count,
        changes = record.connection_changes.len(),
        "LinkedIn login successful"
    );

    match state.settings.response_mode {
        ResponseMode::Redirect => {
            tracing::debug!(stage = %CallbackStage::Redirected);
            Ok((jar, found(DASHBOARD_PATH)).into_response())
        }
        ResponseMode::Json => Ok((jar, Json(record)).into_response()),
    }
}

// ── Dashboard ──────────────────────────────────────────────────────

async fn dashboard(session: CurrentSession) -> Response {
    Json(session.record).into_response()
}

// ── Helpers ────────────────────────────────────────────────────────

/// `302 Found` to `location`.
pub(super) fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(LOCATION, location.to_string())]).into_response()
}
