//! `OpaqueConfig` — immutable bundle of cipher suite, context bytes, KSF
//! choice, and the injected `RandomSource` (spec §9: threaded through
//! config rather than read from a process-global, so test vectors can
//! swap in deterministic randomness).

use opaque_crypto::{CipherSuite, Ksf, RandomSource};
use std::sync::Arc;

#[derive(Clone)]
pub struct OpaqueConfig {
    pub cipher_suite: CipherSuite,
    pub context: Vec<u8>,
    pub ksf: Ksf,
    pub random_source: Arc<dyn RandomSource>,
}

impl OpaqueConfig {
    pub fn new(cipher_suite: CipherSuite, context: impl Into<Vec<u8>>, ksf: Ksf) -> Self {
        Self {
            cipher_suite,
            context: context.into(),
            ksf,
            random_source: Arc::new(opaque_crypto::OsRandom),
        }
    }

    pub fn with_random_source(mut self, random_source: Arc<dyn RandomSource>) -> Self {
        self.random_source = random_source;
        self
    }

    /// `argon2MemoryKib == 0` on the wire denotes identity KSF (spec §6).
    pub fn argon2_params(&self) -> (u32, u32, u32) {
        match self.ksf {
            Ksf::Identity => (0, 0, 0),
            Ksf::Argon2id {
                memory_kib,
                iterations,
                parallelism,
            } => (memory_kib, iterations, parallelism),
        }
    }
}
