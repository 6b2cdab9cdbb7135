use std::future::Future;

use super::types::SessionRecord;
use crate::types::SessionId;

/// Server-side session persistence, keyed by the browser's session id.
///
/// Last write wins per key. Records may expire; an expired record reads as
/// `None`, exactly like one that was never written.
///
/// # Example
///
/// ```rust,ignore
/// impl SessionStore for RedisSessions {
///     async fn get(&self, session_id: &SessionId) -> Result<Option<SessionRecord>, ...> {
///         let raw: Option<String> = self.conn().get(session_id.as_str()).await?;
///         Ok(raw.map(|r| serde_json::from_str(&r)).transpose()?)
///     }
///
///     async fn put(&self, session_id: SessionId, record: SessionRecord) -> Result<(), ...> {
///         self.conn().set_ex(session_id.as_str(), serde_json::to_string(&record)?, TTL).await?;
///         Ok(())
///     }
/// }
/// ```
pub trait SessionStore: Send + Sync + 'static {
    /// Look up the record for a session. `None` means not authenticated.
    fn get(
        &self,
        session_id: &SessionId,
    ) -> impl Future<Output = Result<Option<SessionRecord>, Box<dyn std::error::Error + Send + Sync>>>
           + Send;

    /// Store (or overwrite) the record for a session.
    fn put(
        &self,
        session_id: SessionId,
        record: SessionRecord,
    ) -> impl Future<Output = Result<(), Box<dyn std::error::Error + Send + Sync>>> + Send;
}
