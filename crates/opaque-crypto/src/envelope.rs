//! Spec §4.3 — the client's static AKE key pair is never stored; it is
//! reconstructed on every login from the password-derived
//! `randomizedPwd` plus a small authenticated envelope the server does
//! store. `RecoverEnvelope`'s tag check is the password-verification
//! step of the whole protocol.

use crate::error::{CryptoError, Result};
use crate::oprf::derive_key_pair;
use crate::primenc::{ct_eq, len_prefixed};
use crate::suite::CipherSuite;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Envelope {
    pub nonce: Vec<u8>,
    pub auth_tag: Vec<u8>,
}

pub struct SealedEnvelope {
    pub envelope: Envelope,
    pub client_public_key: Vec<u8>,
    pub masking_key: Vec<u8>,
    pub export_key: Vec<u8>,
}

#[derive(Debug)]
pub struct RecoveredEnvelope {
    pub client_private_key: Vec<u8>,
    pub client_public_key: Vec<u8>,
    pub export_key: Vec<u8>,
}

/// `DeriveAkeKeyPair(seed)`.
pub fn derive_ake_key_pair(suite: CipherSuite, seed: &[u8]) -> Result<(Vec<u8>, Vec<u8>)> {
    derive_key_pair(suite, seed, b"OPAQUE-DeriveDiffieHellmanKeyPair")
}

fn cleartext_credentials(server_public_key: &[u8], server_id: &[u8], client_id: &[u8]) -> Vec<u8> {
    [
        server_public_key,
        &len_prefixed(server_id),
        &len_prefixed(client_id),
    ]
    .concat()
}

struct DerivedMaterial {
    masking_key: Vec<u8>,
    auth_key: Vec<u8>,
    export_key: Vec<u8>,
    client_private_key: Vec<u8>,
    client_public_key: Vec<u8>,
}

fn derive_material(suite: CipherSuite, randomized_pwd: &[u8], nonce: &[u8]) -> Result<DerivedMaterial> {
    let nh = suite.nh();
    let masking_key = suite.hkdf_expand(randomized_pwd, b"MaskingKey", nh)?;
    let auth_key = suite.hkdf_expand(
        randomized_pwd,
        &[nonce, b"AuthKey"].concat(),
        nh,
    )?;
    let export_key = suite.hkdf_expand(
        randomized_pwd,
        &[nonce, b"ExportKey"].concat(),
        nh,
    )?;
    let seed = suite.hkdf_expand(
        randomized_pwd,
        &[nonce, b"PrivateKey"].concat(),
        suite.nsk(),
    )?;
    let (client_private_key, client_public_key) = derive_ake_key_pair(suite, &seed)?;
    Ok(DerivedMaterial {
        masking_key,
        auth_key,
        export_key,
        client_private_key,
        client_public_key,
    })
}

/// `StoreEnvelope`. `server_id`/`client_id` default to `server_public_key`
/// / the derived `client_public_key` respectively when absent, per spec §4.3.
pub fn store_envelope(
    suite: CipherSuite,
    randomized_pwd: &[u8],
    server_public_key: &[u8],
    server_id: Option<&[u8]>,
    client_id: Option<&[u8]>,
    nonce: Vec<u8>,
) -> Result<SealedEnvelope> {
    if nonce.len() != suite.nn() {
        return Err(CryptoError::WrongLength {
            expected: suite.nn(),
            actual: nonce.len(),
        });
    }
    let material = derive_material(suite, randomized_pwd, &nonce)?;
    let server_id = server_id.unwrap_or(server_public_key);
    let client_id = client_id.unwrap_or(&material.client_public_key);

    let cleartext = cleartext_credentials(server_public_key, server_id, client_id);
    let auth_tag = suite.hmac(&material.auth_key, &[nonce.as_slice(), &cleartext].concat());

    Ok(SealedEnvelope {
        envelope: Envelope { nonce, auth_tag },
        client_public_key: material.client_public_key,
        masking_key: material.masking_key,
        export_key: material.export_key,
    })
}

/// `RecoverEnvelope`. The tag comparison is the single point where an
/// incorrect password is detected — everything up to here runs identically
/// for a right or wrong guess, which is what makes the masked-response and
/// fake-KE2 machinery in `opaque-server` effective against enumeration.
pub fn recover_envelope(
    suite: CipherSuite,
    randomized_pwd: &[u8],
    envelope: &Envelope,
    server_public_key: &[u8],
    server_id: Option<&[u8]>,
    client_id: Option<&[u8]>,
) -> Result<RecoveredEnvelope> {
    let material = derive_material(suite, randomized_pwd, &envelope.nonce)?;
    let server_id = server_id.unwrap_or(server_public_key);
    let client_id = client_id.unwrap_or(&material.client_public_key);

    let cleartext = cleartext_credentials(server_public_key, server_id, client_id);
    let expected_tag = suite.hmac(
        &material.auth_key,
        &[envelope.nonce.as_slice(), &cleartext].concat(),
    );

    if !ct_eq(&expected_tag, &envelope.auth_tag) {
        return Err(CryptoError::AuthenticationFailed);
    }

    Ok(RecoveredEnvelope {
        client_private_key: material.client_private_key,
        client_public_key: material.client_public_key,
        export_key: material.export_key,
    })
}
