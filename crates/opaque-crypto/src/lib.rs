//! RFC 9497 OPRF (mode 0) and RFC 9807 OPAQUE-3DH primitives.
//!
//! This crate is pure cryptography: no sockets, no storage, no JWTs. It
//! knows nothing about "sessions" or "credential identifiers" as server
//! concepts — those live in `opaque-store`/`opaque-server`, which call
//! into here with plain byte strings and a chosen [`CipherSuite`].

pub mod ake;
pub mod envelope;
pub mod error;
pub mod group;
pub mod ksf;
pub mod masking;
pub mod oprf;
pub mod primenc;
pub mod random;
pub mod suite;

pub use error::{CryptoError, Result};
pub use ksf::Ksf;
pub use random::{OsRandom, RandomSource};
pub use suite::CipherSuite;
