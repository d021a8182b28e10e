//! `PendingSession` table (spec §3/§4.7/§5): `sessionToken → (ServerAuthState,
//! createdAt)`, TTL `SESSION_TTL`, at-most-once consumption via an atomic
//! remove-or-fail `take`, plus a periodic reaper task scheduled at
//! `SESSION_TTL / 4` that evicts anything a client never came back to finish.

use crate::error::{Result, StoreError};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration as StdDuration;

#[derive(Debug, Clone)]
pub struct ServerAuthState {
    pub expected_client_mac: Vec<u8>,
    pub session_key: Vec<u8>,
    pub credential_identifier: String,
}

struct Entry {
    state: ServerAuthState,
    created_at: DateTime<Utc>,
}

pub struct PendingSessionTable {
    sessions: RwLock<HashMap<String, Entry>>,
    ttl: ChronoDuration,
    capacity: usize,
}

impl PendingSessionTable {
    pub fn new(ttl: ChronoDuration, capacity: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
            capacity,
        }
    }

    /// `authStart`: mints a fresh `sessionToken` and stores the server's
    /// auth state under it.
    pub fn insert(&self, state: ServerAuthState, now: DateTime<Utc>) -> Result<String> {
        let mut sessions = self.sessions.write();
        if sessions.len() >= self.capacity {
            return Err(StoreError::CapacityExceeded(self.capacity));
        }
        let token = uuid::Uuid::new_v4().to_string();
        sessions.insert(
            token.clone(),
            Entry {
                state,
                created_at: now,
            },
        );
        Ok(token)
    }

    /// `authFinish`: atomically removes the entry before the caller does
    /// any MAC verification, so a retried `authFinish` with the same token
    /// can never succeed twice (spec §3 invariant, §8 property 8).
    pub fn take(&self, token: &str, now: DateTime<Utc>) -> Result<ServerAuthState> {
        let entry = self
            .sessions
            .write()
            .remove(token)
            .ok_or_else(|| StoreError::SessionNotFound(token.to_string()))?;
        if now - entry.created_at > self.ttl {
            return Err(StoreError::SessionNotFound(token.to_string()));
        }
        Ok(entry.state)
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Evicts every entry older than `ttl`. Called by the reaper task and
    /// directly by tests; amortized O(1) per entry over the table's lifetime.
    pub fn reap(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, entry| now - entry.created_at <= self.ttl);
        before - sessions.len()
    }
}

/// Spawns the periodic reaper at `ttl / 4`. Returns a `JoinHandle` the
/// caller aborts on shutdown — the orchestrator lifecycle hook spec §5
/// requires reaper threads to be stoppable.
pub fn spawn_reaper(table: Arc<PendingSessionTable>, ttl: ChronoDuration) -> tokio::task::JoinHandle<()> {
    let period = (ttl / 4).to_std().unwrap_or(StdDuration::from_secs(30));
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            let evicted = table.reap(Utc::now());
            if evicted > 0 {
                tracing::debug!(evicted, "pending session reaper swept expired entries");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(cred: &str) -> ServerAuthState {
        ServerAuthState {
            expected_client_mac: vec![1u8; 32],
            session_key: vec![2u8; 32],
            credential_identifier: cred.to_string(),
        }
    }

    #[test]
    fn take_is_single_use() {
        let table = PendingSessionTable::new(ChronoDuration::seconds(120), 10_000);
        let now = Utc::now();
        let token = table.insert(state("alice"), now).unwrap();

        assert!(table.take(&token, now).is_ok());
        assert!(matches!(
            table.take(&token, now),
            Err(StoreError::SessionNotFound(_))
        ));
    }

    #[test]
    fn take_rejects_expired_entries() {
        let table = PendingSessionTable::new(ChronoDuration::seconds(120), 10_000);
        let now = Utc::now();
        let token = table.insert(state("alice"), now).unwrap();

        let later = now + ChronoDuration::seconds(121);
        assert!(matches!(
            table.take(&token, later),
            Err(StoreError::SessionNotFound(_))
        ));
    }

    #[test]
    fn capacity_limit_is_enforced() {
        let table = PendingSessionTable::new(ChronoDuration::seconds(120), 1);
        let now = Utc::now();
        table.insert(state("alice"), now).unwrap();
        assert!(matches!(
            table.insert(state("bob"), now),
            Err(StoreError::CapacityExceeded(1))
        ));
    }

    #[test]
    fn reap_evicts_only_expired_entries() {
        let table = PendingSessionTable::new(ChronoDuration::seconds(120), 10_000);
        let now = Utc::now();
        table.insert(state("alice"), now).unwrap();
        table.insert(state("bob"), now).unwrap();

        let evicted = table.reap(now + ChronoDuration::seconds(200));
        assert_eq!(evicted, 2);
        assert!(table.is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn spawned_reaper_can_be_aborted() {
        let table = Arc::new(PendingSessionTable::new(ChronoDuration::milliseconds(50), 10_000));
        table.insert(state("alice"), Utc::now()).unwrap();

        let handle = spawn_reaper(Arc::clone(&table), ChronoDuration::milliseconds(50));
        tokio::time::sleep(StdDuration::from_millis(200)).await;
        handle.abort();

        assert!(table.is_empty());
    }
}
