//! `SessionStore`: `(jti) → SessionData`, with a `credId → {jti}` secondary
//! index so `revokeByCredentialIdentifier` never has to scan every row
//! (spec §9 calls a naive scan "not acceptable").

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionData {
    pub credential_identifier: String,
    pub session_key: Vec<u8>,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Default)]
pub struct SessionStore {
    rows: RwLock<HashMap<String, SessionData>>,
    by_credential: RwLock<HashMap<String, HashSet<String>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, jti: &str, data: SessionData) {
        self.by_credential
            .write()
            .entry(data.credential_identifier.clone())
            .or_default()
            .insert(jti.to_string());
        self.rows.write().insert(jti.to_string(), data);
    }

    pub fn get(&self, jti: &str) -> Option<SessionData> {
        self.rows.read().get(jti).cloned()
    }

    /// Returns `true` if a live row existed and was removed.
    pub fn revoke(&self, jti: &str) -> bool {
        let removed = self.rows.write().remove(jti);
        match removed {
            Some(data) => {
                if let Some(set) = self.by_credential.write().get_mut(&data.credential_identifier) {
                    set.remove(jti);
                }
                true
            }
            None => false,
        }
    }

    /// Removes every live session for `credential_identifier`, returning
    /// the number of rows revoked. Used by `registrationDelete` (spec §4.7).
    pub fn revoke_by_credential_identifier(&self, credential_identifier: &str) -> usize {
        let jtis = self
            .by_credential
            .write()
            .remove(credential_identifier)
            .unwrap_or_default();
        let mut rows = self.rows.write();
        let mut revoked = 0;
        for jti in jtis {
            if rows.remove(&jti).is_some() {
                revoked += 1;
            }
        }
        revoked
    }

    pub fn is_live(&self, jti: &str, now: DateTime<Utc>) -> bool {
        match self.get(jti) {
            Some(data) => data.expires_at > now,
            None => false,
        }
    }
}
