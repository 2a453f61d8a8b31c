//! Deterministic random number generation.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical hands and waves
//! - **Sampling without replacement**: `rand::seq::index::sample` per pass
//! - **Serializable**: O(1) stream position for reports
//!
//! ## Sampling Policy
//!
//! `sample_indices(len, count)` returns `count` indices into a collection of
//! `len` items. Within one pass every index appears at most once. When `count`
//! exceeds `len`, a fresh pass starts, so an index repeats only after every
//! index has been returned once.
//!
//! ```
//! use insurance_defense::core::GameRng;
//!
//! let mut rng = GameRng::new(42);
//! let picks = rng.sample_indices(8, 3);
//! assert_eq!(picks.len(), 3);
//! assert!(picks.iter().all(|&i| i < 8));
//! ```

use rand::seq::{index, SliceRandom};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Deterministic RNG for card draws and risk spawns.
///
/// Uses ChaCha8 for speed while keeping a reproducible, seedable stream.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// The seed this RNG was created with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Choose a random element from a slice, uniformly, with replacement.
    #[must_use]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        slice.choose(&mut self.inner)
    }

    /// Sample `count` indices from `0..len`, one pass of at most `len` at a time.
    ///
    /// Indices are distinct within each pass; see the module docs for the
    /// wrap-around policy. Returns an empty vec when `len == 0`.
    pub fn sample_indices(&mut self, len: usize, count: usize) -> Vec<usize> {
        let mut out = Vec::with_capacity(count);
        if len == 0 {
            return out;
        }

        while out.len() < count {
            let pass = (count - out.len()).min(len);
            out.extend(index::sample(&mut self.inner, len, pass));
        }

        out
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }
}

/// Serializable RNG state.
///
/// Uses ChaCha8 word position for O(1) serialization regardless of
/// how many random numbers have been generated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    /// Original seed
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
}
