//! Protocol value types shared by the client driver, server driver, and
//! orchestrator (spec §3/§4.6). These are the in-process representations;
//! `opaque-proto` owns turning them into/from the base64 JSON on the wire.

#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    pub blinded_element: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct RegistrationResponse {
    pub evaluated_element: Vec<u8>,
    pub server_public_key: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct CredentialRequest {
    pub blinded_element: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct CredentialResponse {
    pub evaluated_element: Vec<u8>,
    pub masking_nonce: Vec<u8>,
    pub masked_response: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct Ke1 {
    pub credential_request: CredentialRequest,
    pub client_nonce: Vec<u8>,
    pub client_ake_public_key: Vec<u8>,
}

impl Ke1 {
    pub fn to_wire_bytes(&self) -> opaque_proto::wire::Ke1Bytes {
        opaque_proto::wire::Ke1Bytes {
            blinded_element: self.credential_request.blinded_element.clone(),
            client_nonce: self.client_nonce.clone(),
            client_ake_public_key: self.client_ake_public_key.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Ke2 {
    pub credential_response: CredentialResponse,
    pub server_nonce: Vec<u8>,
    pub server_ake_public_key: Vec<u8>,
    pub server_mac: Vec<u8>,
}

impl Ke2 {
    pub fn credential_response_wire_bytes(&self) -> opaque_proto::wire::CredentialResponseBytes {
        opaque_proto::wire::CredentialResponseBytes {
            evaluated_element: self.credential_response.evaluated_element.clone(),
            masking_nonce: self.credential_response.masking_nonce.clone(),
            masked_response: self.credential_response.masked_response.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Ke3 {
    pub client_mac: Vec<u8>,
}

/// What gets returned after a successful registration finish: the record
/// the server should store, plus the `exportKey` handed back to the
/// caller (never transmitted, never stored).
#[derive(Debug, Clone)]
pub struct FinalizedRegistration {
    pub record: opaque_store::RegistrationRecord,
    pub export_key: zeroize::Zeroizing<Vec<u8>>,
}
