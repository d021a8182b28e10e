//! Spec §7 error taxonomy. Every orchestrator entry point returns one of
//! these; `status_bucket` is the only place the HTTP status mapping lives,
//! so the table in spec §6 has exactly one implementation.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("pending session table at capacity")]
    CapacityExceeded,

    #[error("internal error: {0}")]
    Internal(String),
}

/// The three externally visible buckets from spec §6/§7. `Internal`
/// never crosses the wire as itself — callers should treat it as a 500
/// and alert, not retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusBucket {
    InvalidRequest,
    Unauthorized,
    CapacityExceeded,
    Internal,
}

impl OrchestratorError {
    pub fn status_bucket(&self) -> StatusBucket {
        match self {
            OrchestratorError::InvalidRequest(_) => StatusBucket::InvalidRequest,
            OrchestratorError::Unauthorized => StatusBucket::Unauthorized,
            OrchestratorError::CapacityExceeded => StatusBucket::CapacityExceeded,
            OrchestratorError::Internal(_) => StatusBucket::Internal,
        }
    }

    pub fn http_status(&self) -> u16 {
        match self.status_bucket() {
            StatusBucket::InvalidRequest => 400,
            StatusBucket::Unauthorized => 401,
            StatusBucket::CapacityExceeded => 503,
            StatusBucket::Internal => 500,
        }
    }
}

impl From<opaque_crypto::CryptoError> for OrchestratorError {
    fn from(e: opaque_crypto::CryptoError) -> Self {
        use opaque_crypto::CryptoError;
        match e {
            CryptoError::AuthenticationFailed => OrchestratorError::Unauthorized,
            CryptoError::InvalidPoint
            | CryptoError::InvalidScalar
            | CryptoError::WrongLength { .. }
            | CryptoError::HashToCurve => OrchestratorError::InvalidRequest(e.to_string()),
            CryptoError::HkdfLengthExceeded | CryptoError::DeriveKeyPairExhausted => {
                OrchestratorError::Internal(e.to_string())
            }
        }
    }
}

impl From<opaque_store::StoreError> for OrchestratorError {
    fn from(e: opaque_store::StoreError) -> Self {
        use opaque_store::StoreError;
        match e {
            StoreError::CredentialNotFound(_) | StoreError::SessionNotFound(_) => {
                OrchestratorError::Unauthorized
            }
            StoreError::CapacityExceeded(_) => OrchestratorError::CapacityExceeded,
        }
    }
}

pub type Result<T> = std::result::Result<T, OrchestratorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_spec_table() {
        assert_eq!(
            OrchestratorError::InvalidRequest("x".into()).http_status(),
            400
        );
        assert_eq!(OrchestratorError::Unauthorized.http_status(), 401);
        assert_eq!(OrchestratorError::CapacityExceeded.http_status(), 503);
    }
}
