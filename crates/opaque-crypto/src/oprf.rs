//! RFC 9497 §3 OPRF operations, mode 0 (base mode, no verifiability).

use crate::error::{CryptoError, Result};
use crate::primenc::{concat, len_prefixed};
use crate::random::{RandomSource, RandomSourceRng};
use crate::suite::CipherSuite;

/// Output of `Blind`: the blinding scalar `r` the client must retain, and
/// the blinded element `R` to send to the server. `r` is zeroized on drop.
#[derive(Clone)]
pub struct Blinded {
    pub blind: zeroize::Zeroizing<Vec<u8>>,
    pub blinded_element: Vec<u8>,
}

/// `Blind(input)`: draw a fresh blind unless `fixed_blind` is given (test
/// vectors only — spec §9 threads a `RandomSource`, not a literal scalar,
/// through production code paths).
pub fn blind(
    suite: CipherSuite,
    input: &[u8],
    rng: &dyn RandomSource,
    fixed_blind: Option<&[u8]>,
) -> Result<Blinded> {
    let r = match fixed_blind {
        Some(r) => {
            suite.validate_scalar(r)?;
            r.to_vec()
        }
        None => suite.random_scalar(&mut RandomSourceRng(rng)),
    };
    let h = suite.hash_to_group(input, &suite.hash_to_group_dst())?;
    let blinded_element = suite.scalar_mul(&r, &h)?;
    Ok(Blinded {
        blind: zeroize::Zeroizing::new(r),
        blinded_element,
    })
}

/// `BlindEvaluate(sk, R)`.
pub fn blind_evaluate(suite: CipherSuite, sk: &[u8], blinded_element: &[u8]) -> Result<Vec<u8>> {
    suite.validate_point(blinded_element)?;
    suite.scalar_mul(sk, blinded_element)
}

/// `Finalize(input, r, Z)`.
pub fn finalize(suite: CipherSuite, input: &[u8], blind: &[u8], evaluated_element: &[u8]) -> Result<Vec<u8>> {
    suite.validate_point(evaluated_element)?;
    let r_inv = suite.invert_scalar(blind)?;
    let n = suite.scalar_mul(&r_inv, evaluated_element)?;
    finalize_from_unblinded(suite, input, &n)
}

/// Shared tail of `Finalize`, split out so `RecoverCredentials` (which
/// already has `N = r^-1 . Z` from the masked-response flow) does not
/// recompute the inversion.
pub fn finalize_from_unblinded(suite: CipherSuite, input: &[u8], unblinded_element: &[u8]) -> Result<Vec<u8>> {
    let hash_input = concat(&[
        &len_prefixed(input),
        &len_prefixed(unblinded_element),
        b"Finalize",
    ]);
    Ok(suite.hash(&hash_input))
}

/// `DeriveKeyPair(seed, info)`: deterministic scalar derivation with a
/// bounded retry loop for the (astronomically unlikely) `sk == 0` case.
pub fn derive_key_pair(suite: CipherSuite, seed: &[u8], info: &[u8]) -> Result<(Vec<u8>, Vec<u8>)> {
    let derive_input = concat(&[seed, &len_prefixed(info)]);
    let dst = suite.derive_key_pair_dst();
    for counter in 0u8..=255 {
        if counter > 0 {
            tracing::trace!(counter, "DeriveKeyPair retrying after a zero scalar");
        }
        let input = concat(&[&derive_input, &[counter]]);
        let sk = suite.hash_to_scalar(&input, &dst)?;
        if sk.iter().any(|&b| b != 0) {
            let pk = suite.scalar_mul_generator(&sk)?;
            return Ok((sk, pk));
        }
    }
    Err(CryptoError::DeriveKeyPairExhausted)
}

/// `deriveOprfKey(oprfSeed, credId)`: per-credential OPRF secret key,
/// deterministic given the server-wide `oprfSeed` — this is what lets the
/// server re-derive the same key on every login without storing it.
pub fn derive_oprf_key(suite: CipherSuite, oprf_seed: &[u8], credential_identifier: &[u8]) -> Result<Vec<u8>> {
    let info = concat(&[credential_identifier, b"OprfKey"]);
    let seed = suite.hkdf_expand(oprf_seed, &info, suite.nsk())?;
    let (sk, _pk) = derive_key_pair(suite, &seed, b"OPAQUE-DeriveKeyPair")?;
    Ok(sk)
}
