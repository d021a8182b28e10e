//! OPAQUE-3DH protocol driver (spec §4.6), server orchestrator (§4.7),
//! and JWT session issuance (§4.8) — the layer that turns `opaque-crypto`
//! primitives into the five HTTP endpoints plus registration delete.

pub mod client;
pub mod config;
pub mod error;
pub mod jwt;
pub mod orchestrator;
pub mod server;
pub mod types;

pub use config::OpaqueConfig;
pub use error::{OrchestratorError, Result};
pub use jwt::JwtManager;
pub use orchestrator::{ServerOrchestrator, ServerSecrets};
