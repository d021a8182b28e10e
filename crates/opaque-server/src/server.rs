//! Spec §4.6 "Server": the server half of the protocol driver. These
//! functions are pure given their inputs — the orchestrator (`orchestrator.rs`)
//! is what threads them through `CredentialStore`/`PendingSessionTable`.

use crate::config::OpaqueConfig;
use crate::error::{OrchestratorError, Result};
use crate::types::{CredentialResponse, Ke1, Ke2, RegistrationRequest, RegistrationResponse};
use opaque_crypto::ake::{self, Transcript};
use opaque_crypto::envelope;
use opaque_crypto::masking;
use opaque_crypto::oprf;
use opaque_store::{RegistrationRecord, ServerAuthState};

/// `CreateRegistrationResponse`.
pub fn create_registration_response(
    config: &OpaqueConfig,
    request: &RegistrationRequest,
    credential_identifier: &str,
    oprf_seed: &[u8],
    server_public_key: &[u8],
) -> Result<RegistrationResponse> {
    let suite = config.cipher_suite;
    let oprf_sk = oprf::derive_oprf_key(suite, oprf_seed, credential_identifier.as_bytes())
        .map_err(OrchestratorError::from)?;
    let evaluated_element = oprf::blind_evaluate(suite, &oprf_sk, &request.blinded_element)
        .map_err(OrchestratorError::from)?;
    Ok(RegistrationResponse {
        evaluated_element,
        server_public_key: server_public_key.to_vec(),
    })
}

struct PreparedKe2 {
    ke2: Ke2,
    schedule: ake::KeySchedule,
    preamble: Vec<u8>,
}

/// Runs the full KE2 construction given a record (real or fake) — the
/// one code path both `generate_ke2` and `generate_fake_ke2` funnel
/// through, so a real and a fake response are byte-shape-identical by
/// construction rather than by careful duplication.
fn build_ke2(
    config: &OpaqueConfig,
    server_id: &[u8],
    client_id: &[u8],
    record: &RegistrationRecord,
    credential_identifier: &str,
    oprf_seed: &[u8],
    server_static_sk: &[u8],
    server_static_pk: &[u8],
    ke1: &Ke1,
) -> Result<PreparedKe2> {
    let suite = config.cipher_suite;

    let oprf_sk = oprf::derive_oprf_key(suite, oprf_seed, credential_identifier.as_bytes())
        .map_err(OrchestratorError::from)?;
    let masking_nonce = random_bytes(config, suite.nn());
    let response = masking::create_credential_response(
        suite,
        &oprf_sk,
        &ke1.credential_request.blinded_element,
        &record.masking_key,
        server_static_pk,
        &record.envelope,
        masking_nonce,
    )
    .map_err(OrchestratorError::from)?;

    let server_nonce = random_bytes(config, suite.nn());
    let seed = random_bytes(config, suite.nsk());
    let (server_ake_sk, server_ake_pub) =
        envelope::derive_ake_key_pair(suite, &seed).map_err(OrchestratorError::from)?;

    let credential_response = CredentialResponse {
        evaluated_element: response.evaluated_element,
        masking_nonce: response.masking_nonce,
        masked_response: response.masked_response,
    };

    let context = config.context.clone();
    let t = Transcript {
        context: &context,
        client_id,
        ke1: &ke1.to_wire_bytes().serialize(),
        server_id,
        credential_response: &opaque_proto::wire::CredentialResponseBytes {
            evaluated_element: credential_response.evaluated_element.clone(),
            masking_nonce: credential_response.masking_nonce.clone(),
            masked_response: credential_response.masked_response.clone(),
        }
        .serialize(),
        server_nonce: &server_nonce,
        server_ake_pub: &server_ake_pub,
    };
    let preamble = ake::preamble(&t);

    let dh1 = suite
        .scalar_mul(&server_ake_sk, &ke1.client_ake_public_key)
        .map_err(OrchestratorError::from)?;
    let dh2 = suite
        .scalar_mul(server_static_sk, &ke1.client_ake_public_key)
        .map_err(OrchestratorError::from)?;
    let dh3 = suite
        .scalar_mul(&server_ake_sk, &record.client_public_key)
        .map_err(OrchestratorError::from)?;

    let schedule =
        ake::derive_key_schedule(suite, &dh1, &dh2, &dh3, &preamble).map_err(OrchestratorError::from)?;

    Ok(PreparedKe2 {
        ke2: Ke2 {
            credential_response,
            server_nonce,
            server_ake_public_key: server_ake_pub,
            server_mac: schedule.server_mac.clone(),
        },
        schedule,
        preamble,
    })
}

/// Returns `(ServerAuthState, KE2)` per spec §4.6. The caller
/// (`orchestrator.rs`) is responsible for computing `km3`-derived
/// `clientMac` verification material and storing the pending session —
/// this function only needs to hand back `sessionKey` and the client's
/// expected MAC, which it recomputes here since both sides derive the
/// same schedule from the same transcript.
pub fn generate_ke2(
    config: &OpaqueConfig,
    server_id: &[u8],
    client_id: &[u8],
    record: &RegistrationRecord,
    credential_identifier: &str,
    oprf_seed: &[u8],
    server_static_sk: &[u8],
    server_static_pk: &[u8],
    ke1: &Ke1,
) -> Result<(ServerAuthState, Ke2)> {
    let suite = config.cipher_suite;
    let prepared = build_ke2(
        config,
        server_id,
        client_id,
        record,
        credential_identifier,
        oprf_seed,
        server_static_sk,
        server_static_pk,
        ke1,
    )?;

    let expected_client_mac = ake::client_mac(
        suite,
        &prepared.schedule.km3,
        &prepared.preamble,
        &prepared.schedule.server_mac,
    );

    Ok((
        ServerAuthState {
            expected_client_mac,
            session_key: prepared.schedule.session_key,
            credential_identifier: credential_identifier.to_string(),
        },
        prepared.ke2,
    ))
}

/// `GenerateFakeKE2`: deterministically derive a plausible record from
/// `oprfSeed` and run it through the identical `build_ke2` path. An
/// attacker probing an unknown identifier gets a well-formed KE2 whose
/// size and shape matches a real one (spec §4.6/§8 property 5).
pub fn generate_fake_ke2(
    config: &OpaqueConfig,
    server_id: &[u8],
    credential_identifier: &str,
    oprf_seed: &[u8],
    server_static_sk: &[u8],
    server_static_pk: &[u8],
    ke1: &Ke1,
) -> Result<(ServerAuthState, Ke2)> {
    let suite = config.cipher_suite;
    let cred_id_bytes = credential_identifier.as_bytes();

    let fake_client_sk_seed = suite
        .hkdf_expand(
            oprf_seed,
            &[cred_id_bytes, b"FakeClientKey"].concat(),
            suite.nsk(),
        )
        .map_err(OrchestratorError::from)?;
    let (_fake_client_sk, fake_client_pk) =
        envelope::derive_ake_key_pair(suite, &fake_client_sk_seed).map_err(OrchestratorError::from)?;
    let fake_masking_key = suite
        .hkdf_expand(
            oprf_seed,
            &[cred_id_bytes, b"FakeMaskingKey"].concat(),
            suite.nh(),
        )
        .map_err(OrchestratorError::from)?;
    let fake_record = RegistrationRecord {
        client_public_key: fake_client_pk,
        masking_key: fake_masking_key,
        envelope: opaque_crypto::envelope::Envelope {
            nonce: vec![0u8; suite.nn()],
            auth_tag: vec![0u8; suite.nh()],
        },
    };

    let client_id = fake_record.client_public_key.clone();
    generate_ke2(
        config,
        server_id,
        &client_id,
        &fake_record,
        credential_identifier,
        oprf_seed,
        server_static_sk,
        server_static_pk,
        ke1,
    )
}

/// `ServerFinish`: constant-time compare, nothing else — the pending-session
/// table removal that makes this at-most-once already happened in the
/// orchestrator before this is called.
pub fn server_finish(state: &ServerAuthState, ke3: &crate::types::Ke3) -> Result<Vec<u8>> {
    if ake::verify_client_mac(&state.expected_client_mac, &ke3.client_mac) {
        Ok(state.session_key.clone())
    } else {
        Err(OrchestratorError::Unauthorized)
    }
}

fn random_bytes(config: &OpaqueConfig, len: usize) -> Vec<u8> {
    let mut buf = vec![0u8; len];
    config.random_source.fill(&mut buf);
    buf
}
