//! Spec §4.4 — the masked credential response. The server XORs the
//! registration record's `serverPublicKey || envelope` against a stream
//! derived from the record's `maskingKey`, so a passive observer of the
//! wire cannot mount an offline dictionary attack against the stored
//! record before the client has even proven it knows the password.

use crate::envelope::Envelope;
use crate::error::{CryptoError, Result};
use crate::oprf::{blind_evaluate, finalize_from_unblinded};
use crate::primenc::xor;
use crate::suite::CipherSuite;

pub struct MaskedResponse {
    pub evaluated_element: Vec<u8>,
    pub masking_nonce: Vec<u8>,
    pub masked_response: Vec<u8>,
}

fn pad_len(suite: CipherSuite) -> usize {
    suite.npk() + suite.nn() + suite.nh()
}

/// Server side: `CreateCredentialResponse`.
pub fn create_credential_response(
    suite: CipherSuite,
    oprf_key: &[u8],
    blinded_element: &[u8],
    masking_key: &[u8],
    server_public_key: &[u8],
    envelope: &Envelope,
    masking_nonce: Vec<u8>,
) -> Result<MaskedResponse> {
    if masking_nonce.len() != suite.nn() {
        return Err(CryptoError::WrongLength {
            expected: suite.nn(),
            actual: masking_nonce.len(),
        });
    }
    let evaluated_element = blind_evaluate(suite, oprf_key, blinded_element)?;

    let pad = suite.hkdf_expand(
        masking_key,
        &[masking_nonce.as_slice(), b"CredentialResponsePad"].concat(),
        pad_len(suite),
    )?;
    let plaintext = [server_public_key, &envelope.nonce, &envelope.auth_tag].concat();
    let masked_response = xor(&pad, &plaintext);

    Ok(MaskedResponse {
        evaluated_element,
        masking_nonce,
        masked_response,
    })
}

pub struct UnmaskedCredentials {
    pub server_public_key: Vec<u8>,
    pub envelope: Envelope,
}

/// `N = r⁻¹ · Z` then `Finalize`, split out so a caller that still needs
/// `randomizedPwd` (and therefore `maskingKey`) from this value doesn't
/// have to unblind twice.
pub fn compute_oprf_output(suite: CipherSuite, input: &[u8], blind: &[u8], evaluated_element: &[u8]) -> Result<Vec<u8>> {
    suite.validate_point(evaluated_element)?;
    let r_inv = suite.invert_scalar(blind)?;
    let n = suite.scalar_mul(&r_inv, evaluated_element)?;
    finalize_from_unblinded(suite, input, &n)
}

/// Client side: unmask `maskedResponse` given a `maskingKey` already
/// derived from `randomizedPwd` (see [`compute_oprf_output`]).
pub fn unmask(
    suite: CipherSuite,
    masking_key: &[u8],
    masking_nonce: &[u8],
    masked_response: &[u8],
) -> Result<UnmaskedCredentials> {
    let expected_len = pad_len(suite);
    if masked_response.len() != expected_len {
        return Err(CryptoError::WrongLength {
            expected: expected_len,
            actual: masked_response.len(),
        });
    }
    let pad = suite.hkdf_expand(
        masking_key,
        &[masking_nonce, b"CredentialResponsePad"].concat(),
        expected_len,
    )?;
    let unmasked = xor(&pad, masked_response);

    let npk = suite.npk();
    let nn = suite.nn();
    let server_public_key = unmasked[..npk].to_vec();
    let nonce = unmasked[npk..npk + nn].to_vec();
    let auth_tag = unmasked[npk + nn..].to_vec();

    Ok(UnmaskedCredentials {
        server_public_key,
        envelope: Envelope { nonce, auth_tag },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::derive_ake_key_pair;
    use crate::oprf::{blind, derive_key_pair};
    use crate::random::OsRandom;

    #[test]
    fn mask_then_unmask_recovers_the_plaintext() {
        let suite = CipherSuite::P256Sha256;
        let (oprf_key, _oprf_pk) = derive_key_pair(suite, b"oprf-seed", b"k").unwrap();
        let (_server_sk, server_pk) = derive_ake_key_pair(suite, b"server-ake-seed-0000000000000000").unwrap();
        let masking_key = vec![9u8; suite.nh()];
        let envelope = Envelope {
            nonce: vec![1u8; suite.nn()],
            auth_tag: vec![2u8; suite.nh()],
        };

        let password = b"correct horse battery staple";
        let blinded = blind(suite, password, &OsRandom, None).unwrap();

        let response = create_credential_response(
            suite,
            &oprf_key,
            &blinded.blinded_element,
            &masking_key,
            &server_pk,
            &envelope,
            vec![5u8; suite.nn()],
        )
        .unwrap();

        let oprf_output =
            compute_oprf_output(suite, password, &blinded.blind, &response.evaluated_element).unwrap();
        assert_eq!(oprf_output.len(), suite.nh());

        let unmasked = unmask(
            suite,
            &masking_key,
            &response.masking_nonce,
            &response.masked_response,
        )
        .unwrap();

        assert_eq!(unmasked.server_public_key, server_pk);
        assert_eq!(unmasked.envelope, envelope);
    }
}
