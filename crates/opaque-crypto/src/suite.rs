//! `CipherSuite` — the immutable (curve, hash) bundle threaded through every
//! higher-level operation, plus the RFC 9497 §3.1 domain-separation tags
//! derived from it.

use crate::error::Result;
use crate::group::{p256_ops, p384_ops, p521_ops};
use serde::{Deserialize, Serialize};

/// One of the three NIST-prime suites this system supports. Per spec §1
/// Non-goals, there is no secp256k1 / VOPRF / POPRF variant and no
/// pluggable-curve extension point — these three are exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CipherSuite {
    P256Sha256,
    P384Sha384,
    P521Sha512,
}

impl CipherSuite {
    /// `Nh`: hash output length, also used for `Nm` (MAC length) and `Nx`
    /// (HKDF-Expand-Label's extracted secret length).
    pub const fn nh(self) -> usize {
        match self {
            CipherSuite::P256Sha256 => p256_ops::NH,
            CipherSuite::P384Sha384 => p384_ops::NH,
            CipherSuite::P521Sha512 => p521_ops::NH,
        }
    }

    /// `Npk`/`Noe`: compressed point length.
    pub const fn npk(self) -> usize {
        match self {
            CipherSuite::P256Sha256 => p256_ops::NPK,
            CipherSuite::P384Sha384 => p384_ops::NPK,
            CipherSuite::P521Sha512 => p521_ops::NPK,
        }
    }

    /// `Nsk`/`Nok`: scalar length.
    pub const fn nsk(self) -> usize {
        match self {
            CipherSuite::P256Sha256 => p256_ops::NSK,
            CipherSuite::P384Sha384 => p384_ops::NSK,
            CipherSuite::P521Sha512 => p521_ops::NSK,
        }
    }

    /// `Nn`: nonce length, fixed at 32 bytes for every suite.
    pub const fn nn(self) -> usize {
        32
    }

    pub const fn oprf_suite_name(self) -> &'static str {
        match self {
            CipherSuite::P256Sha256 => "P256-SHA256",
            CipherSuite::P384Sha384 => "P384-SHA384",
            CipherSuite::P521Sha512 => "P521-SHA512",
        }
    }

    /// `"OPRFV1-" || I2OSP(0, 1) || "-" || <SuiteName>` — the `0x00` byte is
    /// the OPRF mode tag (mode 0, base mode, the only one this system
    /// implements).
    pub fn context_string(self) -> Vec<u8> {
        let mut out = Vec::from(&b"OPRFV1-"[..]);
        out.push(0x00);
        out.push(b'-');
        out.extend_from_slice(self.oprf_suite_name().as_bytes());
        out
    }

    pub fn hash_to_group_dst(self) -> Vec<u8> {
        [&b"HashToGroup-"[..], &self.context_string()].concat()
    }

    pub fn hash_to_scalar_dst(self) -> Vec<u8> {
        [&b"HashToScalar-"[..], &self.context_string()].concat()
    }

    pub fn derive_key_pair_dst(self) -> Vec<u8> {
        [&b"DeriveKeyPair"[..], &self.context_string()].concat()
    }

    pub fn hash_to_group(self, msg: &[u8], dst: &[u8]) -> Result<Vec<u8>> {
        match self {
            CipherSuite::P256Sha256 => p256_ops::hash_to_group(msg, dst),
            CipherSuite::P384Sha384 => p384_ops::hash_to_group(msg, dst),
            CipherSuite::P521Sha512 => p521_ops::hash_to_group(msg, dst),
        }
    }

    pub fn hash_to_scalar(self, msg: &[u8], dst: &[u8]) -> Result<Vec<u8>> {
        match self {
            CipherSuite::P256Sha256 => p256_ops::hash_to_scalar(msg, dst),
            CipherSuite::P384Sha384 => p384_ops::hash_to_scalar(msg, dst),
            CipherSuite::P521Sha512 => p521_ops::hash_to_scalar(msg, dst),
        }
    }

    pub fn scalar_mul(self, scalar: &[u8], point: &[u8]) -> Result<Vec<u8>> {
        match self {
            CipherSuite::P256Sha256 => p256_ops::scalar_mul(scalar, point),
            CipherSuite::P384Sha384 => p384_ops::scalar_mul(scalar, point),
            CipherSuite::P521Sha512 => p521_ops::scalar_mul(scalar, point),
        }
    }

    pub fn scalar_mul_generator(self, scalar: &[u8]) -> Result<Vec<u8>> {
        match self {
            CipherSuite::P256Sha256 => p256_ops::scalar_mul_generator(scalar),
            CipherSuite::P384Sha384 => p384_ops::scalar_mul_generator(scalar),
            CipherSuite::P521Sha512 => p521_ops::scalar_mul_generator(scalar),
        }
    }

    pub fn invert_scalar(self, scalar: &[u8]) -> Result<Vec<u8>> {
        match self {
            CipherSuite::P256Sha256 => p256_ops::invert_scalar(scalar),
            CipherSuite::P384Sha384 => p384_ops::invert_scalar(scalar),
            CipherSuite::P521Sha512 => p521_ops::invert_scalar(scalar),
        }
    }

    pub fn random_scalar(self, rng: &mut (impl rand_core::CryptoRng + rand_core::RngCore)) -> Vec<u8> {
        match self {
            CipherSuite::P256Sha256 => p256_ops::random_scalar(rng),
            CipherSuite::P384Sha384 => p384_ops::random_scalar(rng),
            CipherSuite::P521Sha512 => p521_ops::random_scalar(rng),
        }
    }

    pub fn validate_point(self, point: &[u8]) -> Result<()> {
        match self {
            CipherSuite::P256Sha256 => p256_ops::validate_point(point),
            CipherSuite::P384Sha384 => p384_ops::validate_point(point),
            CipherSuite::P521Sha512 => p521_ops::validate_point(point),
        }
    }

    pub fn validate_scalar(self, scalar: &[u8]) -> Result<()> {
        match self {
            CipherSuite::P256Sha256 => p256_ops::validate_scalar(scalar),
            CipherSuite::P384Sha384 => p384_ops::validate_scalar(scalar),
            CipherSuite::P521Sha512 => p521_ops::validate_scalar(scalar),
        }
    }

    /// `Hash` — the suite's digest function, used directly by `Finalize`,
    /// the preamble hash, and `clientMac`'s `Hash(preamble || serverMac)`.
    pub fn hash(self, data: &[u8]) -> Vec<u8> {
        use sha2::{Digest, Sha256, Sha384, Sha512};
        match self {
            CipherSuite::P256Sha256 => Sha256::digest(data).to_vec(),
            CipherSuite::P384Sha384 => Sha384::digest(data).to_vec(),
            CipherSuite::P521Sha512 => Sha512::digest(data).to_vec(),
        }
    }

    pub fn hmac(self, key: &[u8], data: &[u8]) -> Vec<u8> {
        use hmac::{Hmac, Mac};
        use sha2::{Sha256, Sha384, Sha512};
        match self {
            CipherSuite::P256Sha256 => Hmac::<Sha256>::new_from_slice(key)
                .expect("HMAC accepts keys of any length")
                .chain_update(data)
                .finalize()
                .into_bytes()
                .to_vec(),
            CipherSuite::P384Sha384 => Hmac::<Sha384>::new_from_slice(key)
                .expect("HMAC accepts keys of any length")
                .chain_update(data)
                .finalize()
                .into_bytes()
                .to_vec(),
            CipherSuite::P521Sha512 => Hmac::<Sha512>::new_from_slice(key)
                .expect("HMAC accepts keys of any length")
                .chain_update(data)
                .finalize()
                .into_bytes()
                .to_vec(),
        }
    }

    /// `HKDF-Extract(salt, ikm) -> prk`.
    pub fn hkdf_extract(self, salt: &[u8], ikm: &[u8]) -> Vec<u8> {
        use hkdf::Hkdf;
        use sha2::{Sha256, Sha384, Sha512};
        let salt = if salt.is_empty() { None } else { Some(salt) };
        match self {
            CipherSuite::P256Sha256 => Hkdf::<Sha256>::extract(salt, ikm).0.to_vec(),
            CipherSuite::P384Sha384 => Hkdf::<Sha384>::extract(salt, ikm).0.to_vec(),
            CipherSuite::P521Sha512 => Hkdf::<Sha512>::extract(salt, ikm).0.to_vec(),
        }
    }

    /// `HKDF-Expand(prk, info, len) -> okm`.
    pub fn hkdf_expand(self, prk: &[u8], info: &[u8], len: usize) -> Result<Vec<u8>> {
        use crate::error::CryptoError;
        use hkdf::Hkdf;
        use sha2::{Sha256, Sha384, Sha512};
        let mut out = vec![0u8; len];
        let ok = match self {
            CipherSuite::P256Sha256 => Hkdf::<Sha256>::from_prk(prk)
                .map_err(|_| CryptoError::InvalidScalar)?
                .expand(info, &mut out),
            CipherSuite::P384Sha384 => Hkdf::<Sha384>::from_prk(prk)
                .map_err(|_| CryptoError::InvalidScalar)?
                .expand(info, &mut out),
            CipherSuite::P521Sha512 => Hkdf::<Sha512>::from_prk(prk)
                .map_err(|_| CryptoError::InvalidScalar)?
                .expand(info, &mut out),
        };
        ok.map_err(|_| CryptoError::HkdfLengthExceeded)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_string_encodes_mode_zero() {
        let ctx = CipherSuite::P256Sha256.context_string();
        assert_eq!(ctx, b"OPRFV1-\x00-P256-SHA256");
    }

    #[test]
    fn dsts_are_distinct_per_suite() {
        let a = CipherSuite::P256Sha256.hash_to_group_dst();
        let b = CipherSuite::P384Sha384.hash_to_group_dst();
        assert_ne!(a, b);
    }

    #[test]
    fn p521_suite_is_not_secretly_p256() {
        // Spec §9: one historical copy of OpaqueCipherSuite.P521_SHA512 was
        // built from the P-256 OPRF suite by mistake. Guard against ever
        // reintroducing that bug: the three suites must map to three
        // genuinely different field widths.
        let sizes: std::collections::HashSet<usize> = [
            CipherSuite::P256Sha256,
            CipherSuite::P384Sha384,
            CipherSuite::P521Sha512,
        ]
        .iter()
        .map(|s| s.npk())
        .collect();
        assert_eq!(sizes.len(), 3);
        assert_eq!(CipherSuite::P521Sha512.npk(), 67);
        assert_eq!(CipherSuite::P521Sha512.nh(), 64);
    }

    #[test]
    fn parameter_lengths_match_rfc_9497_section_4_table() {
        // (Nh, Npk, Nsk) per suite, RFC 9497 §4.
        let cases = [
            (CipherSuite::P256Sha256, 32, 33, 32),
            (CipherSuite::P384Sha384, 48, 49, 48),
            (CipherSuite::P521Sha512, 64, 67, 66),
        ];
        for (suite, nh, npk, nsk) in cases {
            assert_eq!(suite.nh(), nh, "Nh mismatch for {:?}", suite);
            assert_eq!(suite.npk(), npk, "Npk mismatch for {:?}", suite);
            assert_eq!(suite.nsk(), nsk, "Nsk mismatch for {:?}", suite);
        }
    }

    #[test]
    fn hkdf_extract_then_expand_matches_sizes() {
        let suite = CipherSuite::P256Sha256;
        let prk = suite.hkdf_extract(b"", b"ikm");
        assert_eq!(prk.len(), suite.nh());
        let okm = suite.hkdf_expand(&prk, b"info", 64).unwrap();
        assert_eq!(okm.len(), 64);
    }
}
