//! Axum routes for the LinkedIn login flow.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use linkedin_connections::web::{AppConfig, MemorySessionStore, app_routes};
//!
//! // 1. Configure from environment (fails fast on missing credentials)
//! let config = AppConfig::from_env()?;
//!
//! // 2. Pick a session store
//! let store = MemorySessionStore::new(config.session_ttl());
//!
//! // 3. Serve
//! let app = app_routes(config, store);
//! axum::serve(listener, app).await?;
//! ```

mod config;
mod cookies;
mod error;
mod extractor;
mod flow;
mod memory;
mod routes;
mod state;
mod traits;
mod types;

pub use config::AppConfig;
pub use error::AuthError;
pub use extractor::CurrentSession;
pub use flow::{CallbackStage, collect_session_record};
pub use memory::MemorySessionStore;
pub use routes::{CALLBACK_PATH, DASHBOARD_PATH, LOGIN_PATH, ROOT_PATH, app_routes};
pub use traits::SessionStore;
pub use types::{ResponseMode, SessionRecord};

/// Re-export cookie key type for builder API.
pub use axum_extra::extract::cookie::Key as CookieKey;
