use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no credential record for identifier {0}")]
    CredentialNotFound(String),

    #[error("pending session {0} not found or already consumed")]
    SessionNotFound(String),

    #[error("pending session table is at capacity ({0})")]
    CapacityExceeded(usize),
}

pub type Result<T> = std::result::Result<T, StoreError>;
