//! Spec §4.7 `ServerOrchestrator`: the five protocol endpoints plus
//! `registrationDelete`, wired to `opaque-store`'s stateful tables. Each
//! method maps one-to-one onto a row of the spec §6 endpoint table and
//! speaks `opaque-proto` message types at its boundary.

use crate::config::OpaqueConfig;
use crate::error::{OrchestratorError, Result};
use crate::jwt::JwtManager;
use crate::server;
use crate::types::{CredentialRequest, Ke1, Ke3, RegistrationRequest};
use chrono::{Duration, Utc};
use opaque_crypto::envelope::Envelope;
use opaque_proto::messages::{
    AuthFinishRequest, AuthFinishResponse, AuthStartRequest, AuthStartResponse, OpaqueConfigResponse,
    OprfConfigResponse, OprfEvaluateRequest, OprfEvaluateResponse, RegistrationDeleteRequest,
    RegistrationFinishRequest, RegistrationStartRequest, RegistrationStartResponse,
};
use opaque_proto::suite::WireCipherSuite;
use opaque_store::{CredentialStore, PendingSessionTable, RegistrationRecord, SessionStore};
use std::sync::Arc;

pub const SESSION_TTL_SECONDS: i64 = 120;
pub const DEFAULT_PENDING_CAPACITY: usize = 10_000;

/// The byte-string secrets spec §6 says the core consumes verbatim:
/// `oprfSeed` (per-credential OPRF key derivation), the server's static
/// AKE key pair, a separate `oprfMasterKey` for the legacy single-key
/// `/oprf` endpoint, and the JWT signing secret.
pub struct ServerSecrets {
    pub oprf_seed: Vec<u8>,
    pub server_private_key: Vec<u8>,
    pub server_public_key: Vec<u8>,
    pub oprf_master_key: Vec<u8>,
    pub jwt_secret: Vec<u8>,
}

pub struct ServerOrchestrator {
    config: OpaqueConfig,
    secrets: ServerSecrets,
    credentials: Arc<CredentialStore>,
    pending: Arc<PendingSessionTable>,
    sessions: Arc<SessionStore>,
    jwt: JwtManager,
}

impl ServerOrchestrator {
    pub fn new(config: OpaqueConfig, secrets: ServerSecrets, issuer: impl Into<String>, jwt_ttl: Duration) -> Self {
        let sessions = Arc::new(SessionStore::new());
        let jwt = JwtManager::new(issuer, &secrets.jwt_secret, jwt_ttl, Arc::clone(&sessions));
        Self {
            config,
            secrets,
            credentials: Arc::new(CredentialStore::new()),
            pending: Arc::new(PendingSessionTable::new(
                Duration::seconds(SESSION_TTL_SECONDS),
                DEFAULT_PENDING_CAPACITY,
            )),
            sessions,
            jwt,
        }
    }

    pub fn pending_sessions(&self) -> Arc<PendingSessionTable> {
        Arc::clone(&self.pending)
    }

    pub fn opaque_config(&self) -> OpaqueConfigResponse {
        let (memory_kib, iterations, parallelism) = self.config.argon2_params();
        OpaqueConfigResponse {
            cipher_suite: WireCipherSuite(self.config.cipher_suite),
            context: self.config.context.clone(),
            argon2_memory_kib: memory_kib,
            argon2_iterations: iterations,
            argon2_parallelism: parallelism,
        }
    }

    pub fn oprf_config(&self) -> OprfConfigResponse {
        OprfConfigResponse {
            cipher_suite: WireCipherSuite(self.config.cipher_suite),
        }
    }

    pub fn registration_start(&self, req: RegistrationStartRequest) -> Result<RegistrationStartResponse> {
        let request = RegistrationRequest {
            blinded_element: req.blinded_element,
        };
        let response = server::create_registration_response(
            &self.config,
            &request,
            &req.credential_identifier,
            &self.secrets.oprf_seed,
            &self.secrets.server_public_key,
        )?;
        Ok(RegistrationStartResponse {
            evaluated_element: response.evaluated_element,
            server_public_key: response.server_public_key,
        })
    }

    pub fn registration_finish(&self, req: RegistrationFinishRequest) -> Result<()> {
        if req.envelope_nonce.len() != self.config.cipher_suite.nn() {
            return Err(OrchestratorError::InvalidRequest("bad envelope nonce length".into()));
        }
        let record = RegistrationRecord {
            client_public_key: req.client_public_key,
            masking_key: req.masking_key,
            envelope: Envelope {
                nonce: req.envelope_nonce,
                auth_tag: req.auth_tag,
            },
        };
        self.credentials.upsert(&req.credential_identifier, record);
        tracing::info!(credential_identifier = %req.credential_identifier, "registration finished");
        Ok(())
    }

    /// Requires a bearer JWT whose `sub` matches `credential_identifier`;
    /// deletes the stored record and revokes every live session for it.
    pub fn registration_delete(&self, req: RegistrationDeleteRequest, bearer: &str) -> Result<()> {
        let claims = self.jwt.verify(bearer)?;
        if claims.sub != req.credential_identifier {
            return Err(OrchestratorError::Unauthorized);
        }
        self.credentials.delete(&req.credential_identifier)?;
        let revoked = self
            .sessions
            .revoke_by_credential_identifier(&req.credential_identifier);
        tracing::info!(
            credential_identifier = %req.credential_identifier,
            revoked_sessions = revoked,
            "registration deleted"
        );
        Ok(())
    }

    pub fn auth_start(&self, req: AuthStartRequest) -> Result<AuthStartResponse> {
        let ke1 = Ke1 {
            credential_request: CredentialRequest {
                blinded_element: req.blinded_element,
            },
            client_nonce: req.client_nonce,
            client_ake_public_key: req.client_ake_public_key,
        };

        let (state, ke2) = match self.credentials.get(&req.credential_identifier) {
            Some(record) => server::generate_ke2(
                &self.config,
                &self.secrets.server_public_key,
                &record.client_public_key,
                &record,
                &req.credential_identifier,
                &self.secrets.oprf_seed,
                &self.secrets.server_private_key,
                &self.secrets.server_public_key,
                &ke1,
            )?,
            None => {
                tracing::debug!(
                    credential_identifier = %req.credential_identifier,
                    "auth/start for unknown credential, returning fake KE2"
                );
                server::generate_fake_ke2(
                    &self.config,
                    &self.secrets.server_public_key,
                    &req.credential_identifier,
                    &self.secrets.oprf_seed,
                    &self.secrets.server_private_key,
                    &self.secrets.server_public_key,
                    &ke1,
                )?
            }
        };

        let session_token = self.pending.insert(state, Utc::now())?;

        Ok(AuthStartResponse {
            session_token,
            evaluated_element: ke2.credential_response.evaluated_element,
            masking_nonce: ke2.credential_response.masking_nonce,
            masked_response: ke2.credential_response.masked_response,
            server_nonce: ke2.server_nonce,
            server_ake_public_key: ke2.server_ake_public_key,
            server_mac: ke2.server_mac,
        })
    }

    /// Atomically consumes the pending session before any MAC check, so a
    /// replayed `sessionToken` can never succeed twice (spec §3/§8 property 8).
    pub fn auth_finish(&self, req: AuthFinishRequest) -> Result<AuthFinishResponse> {
        let state = self.pending.take(&req.session_token, Utc::now())?;
        let credential_identifier = state.credential_identifier.clone();
        let ke3 = Ke3 {
            client_mac: req.client_mac,
        };
        let session_key = match server::server_finish(&state, &ke3) {
            Ok(key) => key,
            Err(e) => {
                tracing::warn!(credential_identifier = %credential_identifier, "auth/finish MAC verification failed");
                return Err(e);
            }
        };
        let token = self.jwt.issue_token(&credential_identifier, &session_key)?;
        tracing::info!(credential_identifier = %credential_identifier, "authentication finished");
        Ok(AuthFinishResponse { session_key, token })
    }

    /// Legacy `/oprf` hex endpoint: a single-shot `BlindEvaluate` under
    /// the server-wide `oprfMasterKey`, unrelated to per-credential
    /// OPAQUE registration (spec §9 design notes).
    pub fn oprf_evaluate(&self, req: OprfEvaluateRequest) -> Result<OprfEvaluateResponse> {
        let evaluated = opaque_crypto::oprf::blind_evaluate(
            self.config.cipher_suite,
            &self.secrets.oprf_master_key,
            &req.ec_point,
        )
        .map_err(OrchestratorError::from)?;
        Ok(OprfEvaluateResponse {
            ec_point: evaluated,
            process_identifier: req.request_id,
        })
    }
}

/// Client-side convenience re-exports so integration tests (and, in a
/// full deployment, a client SDK) don't need to reach into `client.rs`
/// directly for the handful of functions that make up the other half of
/// each handshake.
pub use crate::client::{create_registration_request, finalize_registration, generate_ke1, generate_ke3};
