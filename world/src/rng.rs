use std::ops::Range;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use wumpus_core::RandomSource;

/// Random source used to lay out caves and scatter bat victims.
#[derive(Clone, Debug)]
pub struct CaveRng {
    inner: ChaCha8Rng,
}

impl CaveRng {
    /// Creates a reproducible source from a fixed seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Creates a source seeded from operating system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            inner: ChaCha8Rng::from_entropy(),
        }
    }
}

impl RandomSource for CaveRng {
    fn range(&mut self, range: Range<u8>) -> u8 {
        self.inner.gen_range(range)
    }
}
