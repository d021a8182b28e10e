use thiserror::Error;

/// Cryptographic-layer failures.
///
/// Every variant here is a protocol-fatal condition: a deserialized field
/// that does not round-trip, a point that fails on-curve validation, or a
/// MAC/tag that does not match. None of these are retried by callers —
/// `opaque-server` maps them straight onto `InvalidRequest` or
/// `AuthenticationFailed`, per spec §7.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("point is not a valid compressed element of the prime-order subgroup")]
    InvalidPoint,

    #[error("scalar is out of range or malformed")]
    InvalidScalar,

    #[error("byte string has length {actual}, expected {expected}")]
    WrongLength { expected: usize, actual: usize },

    #[error("HKDF output length exceeds 255 * hash length")]
    HkdfLengthExceeded,

    #[error("DeriveKeyPair exhausted its retry budget without finding a non-zero scalar")]
    DeriveKeyPairExhausted,

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("hash-to-curve mapping failed")]
    HashToCurve,
}

pub type Result<T> = std::result::Result<T, CryptoError>;
