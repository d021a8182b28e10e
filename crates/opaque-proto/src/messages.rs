//! Spec §6 wire messages, one struct per endpoint request/response. Field
//! names match the table exactly so the JSON contract is self-documenting;
//! every byte field is base64 except the legacy `/oprf` pair, which is hex.

use crate::encoding::{b64_bytes, hex_bytes};
use crate::suite::WireCipherSuite;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpaqueConfigResponse {
    pub cipher_suite: WireCipherSuite,
    #[serde(with = "b64_bytes")]
    pub context: Vec<u8>,
    pub argon2_memory_kib: u32,
    pub argon2_iterations: u32,
    pub argon2_parallelism: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OprfConfigResponse {
    pub cipher_suite: WireCipherSuite,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationStartRequest {
    pub credential_identifier: String,
    #[serde(with = "b64_bytes")]
    pub blinded_element: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationStartResponse {
    #[serde(with = "b64_bytes")]
    pub evaluated_element: Vec<u8>,
    #[serde(with = "b64_bytes")]
    pub server_public_key: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationFinishRequest {
    pub credential_identifier: String,
    #[serde(with = "b64_bytes")]
    pub client_public_key: Vec<u8>,
    #[serde(with = "b64_bytes")]
    pub masking_key: Vec<u8>,
    #[serde(with = "b64_bytes")]
    pub envelope_nonce: Vec<u8>,
    #[serde(with = "b64_bytes")]
    pub auth_tag: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationDeleteRequest {
    pub credential_identifier: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthStartRequest {
    pub credential_identifier: String,
    #[serde(with = "b64_bytes")]
    pub blinded_element: Vec<u8>,
    #[serde(with = "b64_bytes")]
    pub client_nonce: Vec<u8>,
    #[serde(with = "b64_bytes")]
    pub client_ake_public_key: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthStartResponse {
    pub session_token: String,
    #[serde(with = "b64_bytes")]
    pub evaluated_element: Vec<u8>,
    #[serde(with = "b64_bytes")]
    pub masking_nonce: Vec<u8>,
    #[serde(with = "b64_bytes")]
    pub masked_response: Vec<u8>,
    #[serde(with = "b64_bytes")]
    pub server_nonce: Vec<u8>,
    #[serde(with = "b64_bytes")]
    pub server_ake_public_key: Vec<u8>,
    #[serde(with = "b64_bytes")]
    pub server_mac: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthFinishRequest {
    pub session_token: String,
    #[serde(with = "b64_bytes")]
    pub client_mac: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthFinishResponse {
    #[serde(with = "b64_bytes")]
    pub session_key: Vec<u8>,
    pub token: String,
}

/// Legacy `/oprf` endpoint: a single-shot blind-evaluate call over hex,
/// predating the full OPAQUE rollout. `processIdentifier` echoes back
/// whatever the client's `requestId` was, letting an async caller match
/// requests to responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OprfEvaluateRequest {
    #[serde(with = "hex_bytes")]
    pub ec_point: Vec<u8>,
    pub request_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OprfEvaluateResponse {
    #[serde(with = "hex_bytes")]
    pub ec_point: Vec<u8>,
    pub process_identifier: String,
}
