use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtoError {
    #[error("malformed base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("malformed hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("unknown cipher suite {0}")]
    UnknownCipherSuite(String),
}

pub type Result<T> = std::result::Result<T, ProtoError>;
