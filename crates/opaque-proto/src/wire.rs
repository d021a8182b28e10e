//! Canonical fixed-width byte encodings of `KE1` and `CredentialResponse`,
//! distinct from the JSON wire format in `messages.rs` — these feed the
//! 3DH preamble (spec §4.5's `serialize(KE1)` / `serialize(credentialResponse)`),
//! which must hash identically on client and server regardless of how the
//! HTTP layer happens to marshal the same fields.

#[derive(Debug, Clone)]
pub struct Ke1Bytes {
    pub blinded_element: Vec<u8>,
    pub client_nonce: Vec<u8>,
    pub client_ake_public_key: Vec<u8>,
}

impl Ke1Bytes {
    pub fn serialize(&self) -> Vec<u8> {
        [
            self.blinded_element.as_slice(),
            &self.client_nonce,
            &self.client_ake_public_key,
        ]
        .concat()
    }
}

#[derive(Debug, Clone)]
pub struct CredentialResponseBytes {
    pub evaluated_element: Vec<u8>,
    pub masking_nonce: Vec<u8>,
    pub masked_response: Vec<u8>,
}

impl CredentialResponseBytes {
    pub fn serialize(&self) -> Vec<u8> {
        [
            self.evaluated_element.as_slice(),
            &self.masking_nonce,
            &self.masked_response,
        ]
        .concat()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ke1_serialization_is_just_concatenation() {
        let ke1 = Ke1Bytes {
            blinded_element: vec![1; 33],
            client_nonce: vec![2; 32],
            client_ake_public_key: vec![3; 33],
        };
        let bytes = ke1.serialize();
        assert_eq!(bytes.len(), 33 + 32 + 33);
        assert_eq!(&bytes[..33], &[1u8; 33][..]);
    }
}
