//! Access to the secure random source.
//!
//! Everything that needs randomness (key generation, KDF salts, cipher IVs,
//! container check integers) draws it from an [`EntropySource`]. Production code
//! binds [`OsEntropy`]; tests may bind seeded sources for reproducible vectors.

use rand::rngs::OsRng;
use rand_core::{CryptoRngCore, RngCore};
use tracing::error;

use crate::error::{Error, Result};

/// Hands out a cryptographically secure generator for one operation.
///
/// Implementations must only ever return CSPRNGs; there is no fallback path.
pub trait EntropySource: Send + Sync {
    type Rng: CryptoRngCore;

    fn rng(&self) -> Result<Self::Rng>;
}

/// The operating system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    type Rng = OsRng;

    /// Probes the OS source first so an unavailable source surfaces as an error
    /// here rather than as a panic deep inside key generation.
    fn rng(&self) -> Result<OsRng> {
        let mut probe = [0u8; 32];
        OsRng.try_fill_bytes(&mut probe).map_err(|e| {
            error!("operating system entropy source unavailable");
            Error::CryptoBackend(format!("entropy source unavailable: {}", e))
        })?;
        Ok(OsRng)
    }
}

impl<E: EntropySource> EntropySource for &E {
    type Rng = E::Rng;

    fn rng(&self) -> Result<Self::Rng> {
        (**self).rng()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use rand_chacha::{rand_core::SeedableRng, ChaCha20Rng};

    use super::*;

    /// Seeded ChaCha source that counts how often it was drawn from.
    #[derive(Debug, Default)]
    pub struct CountingEntropy {
        seed: u64,
        draws: AtomicUsize,
    }

    impl CountingEntropy {
        pub fn seeded(seed: u64) -> Self {
            Self {
                seed,
                draws: AtomicUsize::new(0),
            }
        }

        pub fn draws(&self) -> usize {
            self.draws.load(Ordering::SeqCst)
        }
    }

    impl EntropySource for CountingEntropy {
        type Rng = ChaCha20Rng;

        fn rng(&self) -> Result<ChaCha20Rng> {
            self.draws.fetch_add(1, Ordering::SeqCst);
            Ok(ChaCha20Rng::seed_from_u64(self.seed))
        }
    }

    /// Source whose backend is always unavailable.
    #[derive(Debug, Default)]
    pub struct FailingEntropy;

    impl EntropySource for FailingEntropy {
        type Rng = ChaCha20Rng;

        fn rng(&self) -> Result<ChaCha20Rng> {
            Err(Error::CryptoBackend("entropy source unavailable".to_string()))
        }
    }
}
