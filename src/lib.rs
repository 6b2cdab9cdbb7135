#![doc = include_str!("../README.md")]

pub mod api;
pub mod changes;
pub mod error;
pub mod oauth;
pub mod types;
pub mod web;

// Re-exports for convenient access
pub use changes::{CHANGE_WINDOW, ConnectionChange, recent_changes};
pub use error::Error;
pub use oauth::{LinkedInClient, LinkedInConfig, TokenResponse};
pub use types::{AccessToken, AuthorizationCode, SessionId};
pub use web::{AppConfig, MemorySessionStore, ResponseMode, SessionRecord, SessionStore, app_routes};
