//! In-memory stores backing the OPAQUE server orchestrator: registration
//! records, issued-session rows, and the pending-authentication table
//! that bridges `auth/start` and `auth/finish`.

pub mod credential_store;
pub mod error;
pub mod pending;
pub mod session_store;

pub use credential_store::{CredentialStore, RegistrationRecord};
pub use error::{Result, StoreError};
pub use pending::{spawn_reaper, PendingSessionTable, ServerAuthState};
pub use session_store::{SessionData, SessionStore};
