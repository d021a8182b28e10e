//! Spec §4.5 — the 3DH key schedule that turns a matching static key pair
//! plus two fresh ephemeral key pairs into a shared `sessionKey` and a pair
//! of MACs that let each side authenticate the other. Runs identically on
//! client and server; which three scalars go into which `dh` term is what
//! ties the key to "this particular client talking to this particular
//! server", not the order they're listed in.

use crate::primenc::{ct_eq, len_prefixed};
use crate::suite::CipherSuite;

/// The three static/ephemeral key pairs a full 3DH computation needs,
/// named from whichever side is calling (caller passes its own keys as
/// `own_*` and the peer's as `peer_*`).
pub struct Transcript<'a> {
    pub context: &'a [u8],
    pub client_id: &'a [u8],
    pub ke1: &'a [u8],
    pub server_id: &'a [u8],
    pub credential_response: &'a [u8],
    pub server_nonce: &'a [u8],
    pub server_ake_pub: &'a [u8],
}

/// Builds the preamble both sides hash, byte-for-byte.
pub fn preamble(t: &Transcript<'_>) -> Vec<u8> {
    [
        b"OPAQUEv1-".as_slice(),
        &len_prefixed(t.context),
        &len_prefixed(t.client_id),
        t.ke1,
        &len_prefixed(t.server_id),
        t.credential_response,
        t.server_nonce,
        t.server_ake_pub,
    ]
    .concat()
}

pub struct KeySchedule {
    pub handshake_secret: Vec<u8>,
    pub session_key: Vec<u8>,
    pub km2: Vec<u8>,
    pub km3: Vec<u8>,
    pub server_mac: Vec<u8>,
}

/// `HKDF-Expand-Label(secret, label, ctx, L)`.
fn expand_label(
    suite: CipherSuite,
    secret: &[u8],
    label: &[u8],
    ctx: &[u8],
    len: usize,
) -> crate::error::Result<Vec<u8>> {
    let full_label = [b"OPAQUE-".as_slice(), label].concat();
    let info = [
        (len as u16).to_be_bytes().as_slice(),
        &[full_label.len() as u8],
        &full_label,
        &[ctx.len() as u8],
        ctx,
    ]
    .concat();
    suite.hkdf_expand(secret, &info, len)
}

/// `ikm = dh1 || dh2 || dh3`, then the full key schedule through
/// `serverMac`. `clientMac` is computed separately once the caller has
/// `serverMac` in hand (it hashes the preamble concatenated with it).
pub fn derive_key_schedule(
    suite: CipherSuite,
    dh1: &[u8],
    dh2: &[u8],
    dh3: &[u8],
    preamble: &[u8],
) -> crate::error::Result<KeySchedule> {
    let ikm = [dh1, dh2, dh3].concat();
    let prk = suite.hkdf_extract(b"", &ikm);
    let preamble_hash = suite.hash(preamble);
    let nh = suite.nh();

    let handshake_secret = expand_label(suite, &prk, b"HandshakeSecret", &preamble_hash, nh)?;
    let session_key = expand_label(suite, &prk, b"SessionKey", &preamble_hash, nh)?;
    let km2 = expand_label(suite, &handshake_secret, b"ServerMAC", b"", nh)?;
    let km3 = expand_label(suite, &handshake_secret, b"ClientMAC", b"", nh)?;
    let server_mac = suite.hmac(&km2, &preamble_hash);

    Ok(KeySchedule {
        handshake_secret,
        session_key,
        km2,
        km3,
        server_mac,
    })
}

/// `clientMac = HMAC(km3, Hash(preamble || serverMac))` — a hash of the
/// concatenation, not a concatenation of hashes; mixing this up silently
/// breaks interop with any spec-compliant peer without failing loudly.
pub fn client_mac(suite: CipherSuite, km3: &[u8], preamble: &[u8], server_mac: &[u8]) -> Vec<u8> {
    let hashed = suite.hash(&[preamble, server_mac].concat());
    suite.hmac(km3, &hashed)
}

pub fn verify_server_mac(expected: &[u8], received: &[u8]) -> bool {
    ct_eq(expected, received)
}

pub fn verify_client_mac(expected: &[u8], received: &[u8]) -> bool {
    ct_eq(expected, received)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::derive_ake_key_pair;

    fn dh(suite: CipherSuite, sk: &[u8], pk: &[u8]) -> Vec<u8> {
        suite.scalar_mul(sk, pk).unwrap()
    }

    #[test]
    fn client_and_server_derive_matching_session_keys() {
        let suite = CipherSuite::P256Sha256;

        let (server_static_sk, server_static_pk) =
            derive_ake_key_pair(suite, b"server-static-seed-0000000000000").unwrap();
        let (client_static_sk, client_static_pk) =
            derive_ake_key_pair(suite, b"client-static-seed-0000000000000").unwrap();
        let (server_ake_sk, server_ake_pk) =
            derive_ake_key_pair(suite, b"server-ephemeral-seed-00000000000").unwrap();
        let (client_ake_sk, client_ake_pk) =
            derive_ake_key_pair(suite, b"client-ephemeral-seed-00000000000").unwrap();

        let t = Transcript {
            context: b"OPAQUE-Test",
            client_id: b"alice",
            ke1: b"serialized-ke1-bytes",
            server_id: b"example.org",
            credential_response: b"serialized-credential-response",
            server_nonce: &[9u8; 32],
            server_ake_pub: &server_ake_pk,
        };
        let p = preamble(&t);

        // Server perspective.
        let server_dh1 = dh(suite, &server_ake_sk, &client_ake_pk);
        let server_dh2 = dh(suite, &server_static_sk, &client_ake_pk);
        let server_dh3 = dh(suite, &server_ake_sk, &client_static_pk);
        let server_schedule =
            derive_key_schedule(suite, &server_dh1, &server_dh2, &server_dh3, &p).unwrap();

        // Client perspective: same three DH values, computed from the other side.
        let client_dh1 = dh(suite, &client_ake_sk, &server_ake_pk);
        let client_dh2 = dh(suite, &client_ake_sk, &server_static_pk);
        let client_dh3 = dh(suite, &client_static_sk, &server_ake_pk);
        let client_schedule =
            derive_key_schedule(suite, &client_dh1, &client_dh2, &client_dh3, &p).unwrap();

        assert_eq!(server_schedule.session_key, client_schedule.session_key);
        assert_eq!(server_schedule.server_mac, client_schedule.server_mac);

        let c_mac = client_mac(suite, &client_schedule.km3, &p, &client_schedule.server_mac);
        let s_expected_c_mac = client_mac(suite, &server_schedule.km3, &p, &server_schedule.server_mac);
        assert!(verify_client_mac(&s_expected_c_mac, &c_mac));
    }

    #[test]
    fn client_mac_hashes_the_concatenation_not_the_parts() {
        let suite = CipherSuite::P256Sha256;
        let km3 = vec![1u8; suite.nh()];
        let preamble = b"some-preamble";
        let server_mac = vec![2u8; suite.nh()];

        let via_concat_then_hash = client_mac(suite, &km3, preamble, &server_mac);
        let wrong_concat_of_hashes = suite.hmac(
            &km3,
            &[suite.hash(preamble), suite.hash(&server_mac)].concat(),
        );
        assert_ne!(via_concat_then_hash, wrong_concat_of_hashes);
    }
}
