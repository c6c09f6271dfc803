//! Random number generator abstraction.
//!
//! The generator draws from a single sequential stream behind the
//! [`GrammarRng`] trait, so the source can be swapped (for example a scripted
//! sequence in tests) without touching the selection logic.
//!
//! # Example
//!
//! ```ignore
//! use grammar_core::rng::{GrammarRng, StdRandom};
//!
//! let mut rng = StdRandom::from_seed(42);
//! let float = rng.next_double(); // 0.0..1.0
//! let index = rng.next_usize_max(10); // 0..10
//! ```

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random source used by the generator.
///
/// Reusing the same seed and the same sequence of draws must reproduce the
/// same values.
pub trait GrammarRng: Send + Sync {
    /// Returns a random double in [0.0, 1.0).
    fn next_double(&mut self) -> f64;

    /// Reseed the stream in place.
    fn reseed(&mut self, seed: u64);

    /// Returns a random usize in [0, max).
    fn next_usize_max(&mut self, max: usize) -> usize {
        if max == 0 {
            return 0;
        }
        ((self.next_double() * max as f64) as usize).min(max - 1)
    }
}

/// Standard RNG wrapper using `rand::rngs::StdRng`.
#[derive(Clone)]
pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seed from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl GrammarRng for StdRandom {
    fn next_double(&mut self) -> f64 {
        self.rng.gen()
    }

    fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }
}
