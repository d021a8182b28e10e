//! Spec §6 "Persisted state layout": `CredentialStore` rows are
//! `(credId) → (clientPubKey, maskingKey, envelope)`, stored verbatim —
//! this crate doesn't interpret the bytes, it just keeps them safe for
//! concurrent single-writer-per-key access.

use crate::error::{Result, StoreError};
use opaque_crypto::envelope::Envelope;
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRecord {
    pub client_public_key: Vec<u8>,
    pub masking_key: Vec<u8>,
    pub envelope: Envelope,
}

/// Concurrent single-writer-per-key map, keyed by credential identifier.
#[derive(Default)]
pub struct CredentialStore {
    rows: RwLock<HashMap<String, RegistrationRecord>>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(&self, credential_identifier: &str, record: RegistrationRecord) {
        self.rows
            .write()
            .insert(credential_identifier.to_string(), record);
    }

    pub fn get(&self, credential_identifier: &str) -> Option<RegistrationRecord> {
        self.rows.read().get(credential_identifier).cloned()
    }

    pub fn delete(&self, credential_identifier: &str) -> Result<()> {
        self.rows
            .write()
            .remove(credential_identifier)
            .map(|_| ())
            .ok_or_else(|| StoreError::CredentialNotFound(credential_identifier.to_string()))
    }

    pub fn contains(&self, credential_identifier: &str) -> bool {
        self.rows.read().contains_key(credential_identifier)
    }
}
