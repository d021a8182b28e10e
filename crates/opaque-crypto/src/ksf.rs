//! Key-stretching function applied to the raw OPRF output before it is fed
//! into `randomizedPwd`. `Identity` is for tests and RFC vectors only —
//! production deployments must use `Argon2id`.

use crate::error::{CryptoError, Result};
use argon2::{Algorithm, Argon2, Params, Version};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Ksf {
    /// `stretch(x) = x`. Dev-only; spec §6 flags `argon2MemoryKib == 0` on
    /// the wire as the signal for this mode.
    Identity,
    Argon2id {
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    },
}

impl Ksf {
    pub fn stretch(self, input: &[u8]) -> Result<Vec<u8>> {
        match self {
            Ksf::Identity => Ok(input.to_vec()),
            Ksf::Argon2id {
                memory_kib,
                iterations,
                parallelism,
            } => {
                let params = Params::new(memory_kib, iterations, parallelism, None)
                    .map_err(|_| CryptoError::InvalidScalar)?;
                let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
                // OPAQUE's KSF has no salt of its own: the OPRF output is
                // already a high-entropy, per-(password, credId) pseudorandom
                // value, so Argon2id is run with a fixed, public salt here —
                // the stretching cost is the point, not a fresh salt.
                let mut out = vec![0u8; input.len().max(32)];
                argon2
                    .hash_password_into(input, b"opaque-ksf-salt", &mut out)
                    .map_err(|_| CryptoError::InvalidScalar)?;
                Ok(out)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_a_no_op() {
        let out = Ksf::Identity.stretch(b"oprf-output").unwrap();
        assert_eq!(out, b"oprf-output");
    }

    #[test]
    fn argon2id_changes_the_bytes() {
        let ksf = Ksf::Argon2id {
            memory_kib: 8 * 1024,
            iterations: 1,
            parallelism: 1,
        };
        let out = ksf.stretch(b"oprf-output-32-bytes-long-xxxxx").unwrap();
        assert_ne!(out, b"oprf-output-32-bytes-long-xxxxx");
    }
}
