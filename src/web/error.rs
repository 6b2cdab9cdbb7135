use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use super::routes::{ROOT_PATH, found};

/// Errors surfaced by the route layer.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Callback reached without a `code` query parameter.
    #[error("No authorization code found")]
    MissingCode,

    /// Token endpoint refused the code, or answered without a token.
    #[error("Failed to obtain access token: {0}")]
    TokenExchange(String),

    /// No session record for this browser.
    #[error("Not authenticated")]
    Unauthenticated,

    /// Session store operation failed.
    #[error("Session store error: {0}")]
    Store(String),

    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            Self::MissingCode => error_body(StatusCode::BAD_REQUEST, "No authorization code found"),
            Self::TokenExchange(_) => error_body(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to obtain access token",
            ),
            Self::Unauthenticated => found(ROOT_PATH),
            Self::Store(_) | Self::Config(_) => {
                tracing::error!(error = %self, "Internal error");
                error_body(StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
            }
        }
    }
}

impl From<crate::error::Error> for AuthError {
    fn from(e: crate::error::Error) -> Self {
        Self::TokenExchange(e.to_string())
    }
}

fn error_body(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
