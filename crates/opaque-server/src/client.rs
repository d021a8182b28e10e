//! Spec §4.6 "Client registration" / "Client authentication": the client
//! half of the protocol driver. Every function here is pure given its
//! state object — no I/O, no shared mutable state — the caller owns
//! moving bytes across the wire between calls.

use crate::config::OpaqueConfig;
use crate::error::{OrchestratorError, Result};
use crate::types::{CredentialRequest, FinalizedRegistration, Ke1, Ke2, Ke3, RegistrationRequest, RegistrationResponse};
use opaque_crypto::ake::{self, Transcript};
use opaque_crypto::envelope;
use opaque_crypto::masking;
use opaque_crypto::oprf;
use opaque_store::RegistrationRecord;
use zeroize::Zeroizing;

/// Destroyed (password zeroed) once `FinalizeRegistration` consumes it.
pub struct ClientRegistrationState {
    blind: Zeroizing<Vec<u8>>,
    password: Zeroizing<Vec<u8>>,
}

/// Destroyed once `GenerateKE3` emits `KE3`.
pub struct ClientAuthState {
    blind: Zeroizing<Vec<u8>>,
    password: Zeroizing<Vec<u8>>,
    ke1: Ke1,
    client_ake_sk: Zeroizing<Vec<u8>>,
}

pub fn create_registration_request(
    config: &OpaqueConfig,
    password: &[u8],
) -> Result<(ClientRegistrationState, RegistrationRequest)> {
    let blinded = oprf::blind(config.cipher_suite, password, config.random_source.as_ref(), None)
        .map_err(OrchestratorError::from)?;
    let state = ClientRegistrationState {
        blind: blinded.blind,
        password: Zeroizing::new(password.to_vec()),
    };
    let request = RegistrationRequest {
        blinded_element: blinded.blinded_element,
    };
    Ok((state, request))
}

pub fn finalize_registration(
    config: &OpaqueConfig,
    state: ClientRegistrationState,
    response: RegistrationResponse,
    server_id: Option<&[u8]>,
    client_id: Option<&[u8]>,
) -> Result<FinalizedRegistration> {
    let suite = config.cipher_suite;
    let oprf_output = oprf::finalize(suite, &state.password, &state.blind, &response.evaluated_element)
        .map_err(OrchestratorError::from)?;
    let stretched = config
        .ksf
        .stretch(&oprf_output)
        .map_err(OrchestratorError::from)?;
    let randomized_pwd = suite.hkdf_extract(b"", &[oprf_output, stretched].concat());

    let nonce = random_bytes(config, suite.nn());
    let sealed = envelope::store_envelope(
        suite,
        &randomized_pwd,
        &response.server_public_key,
        server_id,
        client_id,
        nonce,
    )
    .map_err(OrchestratorError::from)?;

    Ok(FinalizedRegistration {
        record: RegistrationRecord {
            client_public_key: sealed.client_public_key,
            masking_key: sealed.masking_key,
            envelope: sealed.envelope,
        },
        export_key: Zeroizing::new(sealed.export_key),
    })
}

pub fn generate_ke1(config: &OpaqueConfig, password: &[u8]) -> Result<(ClientAuthState, Ke1)> {
    let suite = config.cipher_suite;
    let blinded = oprf::blind(suite, password, config.random_source.as_ref(), None)
        .map_err(OrchestratorError::from)?;
    let client_nonce = random_bytes(config, suite.nn());
    let seed = random_bytes(config, suite.nsk());
    let (client_ake_sk, client_ake_pub) =
        envelope::derive_ake_key_pair(suite, &seed).map_err(OrchestratorError::from)?;

    let ke1 = Ke1 {
        credential_request: CredentialRequest {
            blinded_element: blinded.blinded_element,
        },
        client_nonce,
        client_ake_public_key: client_ake_pub,
    };
    let state = ClientAuthState {
        blind: blinded.blind,
        password: Zeroizing::new(password.to_vec()),
        ke1: ke1.clone(),
        client_ake_sk: Zeroizing::new(client_ake_sk),
    };
    Ok((state, ke1))
}

/// `AuthenticationFailed` here always comes from envelope recovery
/// (wrong password) or a mismatched `serverMac` — the caller never learns
/// which, by design (spec §7/§8 property 4).
pub fn generate_ke3(
    config: &OpaqueConfig,
    state: ClientAuthState,
    client_id: Option<&[u8]>,
    server_id: Option<&[u8]>,
    ke2: Ke2,
) -> Result<(Ke3, Zeroizing<Vec<u8>>, Zeroizing<Vec<u8>>)> {
    let suite = config.cipher_suite;

    // RecoverCredentials.
    let oprf_output = masking::compute_oprf_output(
        suite,
        &state.password,
        &state.blind,
        &ke2.credential_response.evaluated_element,
    )
    .map_err(OrchestratorError::from)?;
    let stretched = config.ksf.stretch(&oprf_output).map_err(OrchestratorError::from)?;
    let randomized_pwd = suite.hkdf_extract(b"", &[oprf_output, stretched].concat());
    let masking_key = suite
        .hkdf_expand(&randomized_pwd, b"MaskingKey", suite.nh())
        .map_err(OrchestratorError::from)?;

    let unmasked = masking::unmask(
        suite,
        &masking_key,
        &ke2.credential_response.masking_nonce,
        &ke2.credential_response.masked_response,
    )
    .map_err(OrchestratorError::from)?;

    let recovered = envelope::recover_envelope(
        suite,
        &randomized_pwd,
        &unmasked.envelope,
        &unmasked.server_public_key,
        server_id,
        client_id,
    )
    .map_err(OrchestratorError::from)?;

    // 3DH.
    let context = config.context.clone();
    let client_id = client_id.unwrap_or(&recovered.client_public_key).to_vec();
    let server_id = server_id.unwrap_or(&unmasked.server_public_key).to_vec();
    let t = Transcript {
        context: &context,
        client_id: &client_id,
        ke1: &state.ke1.to_wire_bytes().serialize(),
        server_id: &server_id,
        credential_response: &ke2.credential_response_wire_bytes().serialize(),
        server_nonce: &ke2.server_nonce,
        server_ake_pub: &ke2.server_ake_public_key,
    };
    let preamble = ake::preamble(&t);

    let dh1 = suite
        .scalar_mul(&state.client_ake_sk, &ke2.server_ake_public_key)
        .map_err(OrchestratorError::from)?;
    let dh2 = suite
        .scalar_mul(&state.client_ake_sk, &unmasked.server_public_key)
        .map_err(OrchestratorError::from)?;
    let dh3 = suite
        .scalar_mul(&recovered.client_private_key, &ke2.server_ake_public_key)
        .map_err(OrchestratorError::from)?;

    let schedule =
        ake::derive_key_schedule(suite, &dh1, &dh2, &dh3, &preamble).map_err(OrchestratorError::from)?;

    if !ake::verify_server_mac(&schedule.server_mac, &ke2.server_mac) {
        return Err(OrchestratorError::Unauthorized);
    }

    let client_mac = ake::client_mac(suite, &schedule.km3, &preamble, &schedule.server_mac);

    Ok((
        Ke3 { client_mac },
        Zeroizing::new(schedule.session_key),
        Zeroizing::new(recovered.export_key),
    ))
}

fn random_bytes(config: &OpaqueConfig, len: usize) -> Vec<u8> {
    let mut buf = vec![0u8; len];
    config.random_source.fill(&mut buf);
    buf
}
