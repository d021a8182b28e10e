//! `RandomSource` — threaded through every call site that needs entropy
//! instead of reaching for a process-global RNG, per spec §9 ("Random
//! source injection"). This is what lets RFC 9497 Appendix A test vectors
//! (which fix `r` and the envelope nonce) replace randomness deterministically.

use rand_core::{CryptoRng, RngCore};

pub trait RandomSource: Send + Sync {
    fn fill(&self, buf: &mut [u8]);
}

/// Default production source: the OS CSPRNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill(&self, buf: &mut [u8]) {
        rand::rngs::OsRng.fill_bytes(buf);
    }
}

/// Adapts any `RandomSource` to the `CryptoRng + RngCore` traits the curve
/// crates expect, so `opaque-crypto`'s internals don't need to know about
/// this abstraction at all.
pub struct RandomSourceRng<'a>(pub &'a dyn RandomSource);

impl RngCore for RandomSourceRng<'_> {
    fn next_u32(&mut self) -> u32 {
        let mut buf = [0u8; 4];
        self.0.fill(&mut buf);
        u32::from_le_bytes(buf)
    }

    fn next_u64(&mut self) -> u64 {
        let mut buf = [0u8; 8];
        self.0.fill(&mut buf);
        u64::from_le_bytes(buf)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.0.fill(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand_core::Error> {
        self.0.fill(dest);
        Ok(())
    }
}

impl CryptoRng for RandomSourceRng<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn os_random_fills_the_whole_buffer() {
        let mut buf = [0u8; 32];
        OsRandom.fill(&mut buf);
        assert!(buf.iter().any(|&b| b != 0));
    }
}
