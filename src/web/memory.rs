use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use super::traits::SessionStore;
use super::types::SessionRecord;
use crate::types::SessionId;

#[derive(Debug)]
struct Entry {
    record: SessionRecord,
    stored_at: Instant,
}

/// In-process [`SessionStore`] with a fixed time-to-live.
///
/// Cloning is cheap and clones share the same map, so a test (or the binary)
/// can keep a handle after passing one to the router.
#[derive(Debug, Clone)]
pub struct MemorySessionStore {
    entries: Arc<DashMap<SessionId, Entry>>,
    ttl: Duration,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            ttl,
        }
    }

    /// Number of stored records, expired ones included until the next `get` or `put` sweeps them.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SessionStore for MemorySessionStore {
    async fn get(
        &self,
        session_id: &SessionId,
    ) -> Result<Option<SessionRecord>, Box<dyn std::error::Error + Send + Sync>> {
        let now = Instant::now();
        let ttl = self.ttl;
        if self
            .entries
            .remove_if(session_id, |_, entry| now.duration_since(entry.stored_at) >= ttl)
            .is_some()
        {
            tracing::debug!(session_id = %session_id, "Session record expired");
        }

        Ok(self.entries.get(session_id).map(|e| e.record.clone()))
    }

    async fn put(
        &self,
        session_id: SessionId,
        record: SessionRecord,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let now = Instant::now();
        let ttl = self.ttl;
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| now.duration_since(entry.stored_at) < ttl);
        let expired = before.saturating_sub(self.entries.len());
        if expired > 0 {
            tracing::debug!(expired, "Dropped expired session records");
        }

        self.entries.insert(
            session_id,
            Entry {
                record,
                stored_at: now,
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record(id: &str) -> SessionRecord {
        SessionRecord {
            profile: json!({ "id": id }),
            connections: json!({ "elements": [] }),
            connection_changes: Vec::new(),
        }
    }

    #[tokio::test]
    async fn get_unknown_session_is_none() {
        let store = MemorySessionStore::new(Duration::from_secs(60));
        let found = store.get(&SessionId::from("nope".to_string())).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn put_then_get_returns_record() {
        let store = MemorySessionStore::new(Duration::from_secs(60));
        let id = SessionId::from("s1".to_string());

        store.put(id.clone(), record("u1")).await.unwrap();

        assert_eq!(store.get(&id).await.unwrap(), Some(record("u1")));
    }

    #[tokio::test]
    async fn put_overwrites_previous_login() {
        let store = MemorySessionStore::new(Duration::from_secs(60));
        let id = SessionId::from("s1".to_string());

        store.put(id.clone(), record("u1")).await.unwrap();
        store.put(id.clone(), record("u2")).await.unwrap();

        assert_eq!(store.get(&id).await.unwrap(), Some(record("u2")));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn expired_record_reads_as_none_and_is_dropped() {
        let store = MemorySessionStore::new(Duration::ZERO);
        let id = SessionId::from("s1".to_string());

        store.put(id.clone(), record("u1")).await.unwrap();

        assert!(store.get(&id).await.unwrap().is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn put_drops_records_of_abandoned_sessions() {
        let store = MemorySessionStore::new(Duration::from_millis(1));

        for i in 0..100 {
            store
                .put(SessionId::from(format!("abandoned-{i}")), record("old"))
                .await
                .unwrap();
        }
        tokio::time::sleep(Duration::from_millis(20)).await;

        let fresh = SessionId::from("fresh".to_string());
        store.put(fresh.clone(), record("new")).await.unwrap();

        assert_eq!(store.len(), 1);
        assert!(store.entries.contains_key(&fresh));
    }

    #[tokio::test]
    async fn put_keeps_live_records_of_other_sessions() {
        let store = MemorySessionStore::new(Duration::from_secs(60));
        let first = SessionId::from("s1".to_string());

        store.put(first.clone(), record("u1")).await.unwrap();
        store
            .put(SessionId::from("s2".to_string()), record("u2"))
            .await
            .unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.get(&first).await.unwrap(), Some(record("u1")));
    }

    #[tokio::test]
    async fn clones_share_state() {
        let store = MemorySessionStore::new(Duration::from_secs(60));
        let handle = store.clone();
        let id = SessionId::from("s1".to_string());

        store.put(id.clone(), record("u1")).await.unwrap();

        assert!(handle.get(&id).await.unwrap().is_some());
    }
}
