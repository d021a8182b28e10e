//! Spec §4.8 `JwtManager`: HS256 bearer tokens whose validity is always
//! double-checked against `SessionStore` — a syntactically valid,
//! unexpired, correctly-signed JWT for a revoked session must still fail.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use opaque_store::{SessionData, SessionStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{OrchestratorError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

pub struct JwtManager {
    issuer: String,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl: Duration,
    sessions: Arc<SessionStore>,
}

impl JwtManager {
    pub fn new(issuer: impl Into<String>, secret: &[u8], token_ttl: Duration, sessions: Arc<SessionStore>) -> Self {
        Self {
            issuer: issuer.into(),
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            token_ttl,
            sessions,
        }
    }

    /// Mints a fresh `jti`, writes the `SessionData` row, and returns the
    /// signed token.
    pub fn issue_token(&self, credential_identifier: &str, session_key: &[u8]) -> Result<String> {
        let jti = uuid::Uuid::new_v4().to_string();
        let now = Utc::now();
        let expires_at = now + self.token_ttl;

        self.sessions.insert(
            &jti,
            SessionData {
                credential_identifier: credential_identifier.to_string(),
                session_key: session_key.to_vec(),
                issued_at: now,
                expires_at,
            },
        );

        let claims = Claims {
            iss: self.issuer.clone(),
            sub: credential_identifier.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti,
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| OrchestratorError::Internal(e.to_string()))
    }

    /// Signature, issuer, and expiration check, then a live-row lookup in
    /// `SessionStore` — a revoked `jti` fails here even with a perfectly
    /// valid signature (spec §4.8/§8 property 9).
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
        validation.set_issuer(&[self.issuer.clone()]);
        let data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|_| OrchestratorError::Unauthorized)?;

        if self.sessions.get(&data.claims.jti).is_none() {
            return Err(OrchestratorError::Unauthorized);
        }
        Ok(data.claims)
    }

    pub fn revoke(&self, jti: &str) -> bool {
        self.sessions.revoke(jti)
    }
}
