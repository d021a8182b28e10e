//! Wire types for the OPAQUE and OPRF HTTP endpoints (spec §6). No crypto
//! happens here — this crate only knows how to turn protocol messages
//! into bytes and back.

pub mod encoding;
pub mod error;
pub mod messages;
pub mod suite;
pub mod wire;

pub use error::{ProtoError, Result};
pub use suite::WireCipherSuite;
