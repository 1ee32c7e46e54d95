//! Deterministic random number generation for shuffling and id minting.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical sequence
//! - **Forkable**: Each session gets an independent stream from the registry
//! - **Injectable**: Shuffles take any `ShuffleSource`, so tests can script
//!   the exact swap indices
//!
//! ## Usage
//!
//! ```
//! use uno_engine::core::GameRng;
//!
//! let mut root = GameRng::new(42);
//!
//! // Fork a stream for a new session
//! let mut session_rng = root.fork();
//!
//! // Forks are deterministic - same root seed = same fork sequence
//! let mut root2 = GameRng::new(42);
//! let mut session_rng2 = root2.fork();
//! assert_eq!(session_rng.gen_range_usize(0..100), session_rng2.gen_range_usize(0..100));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of shuffle indices.
///
/// The Fisher–Yates shuffle in `cards::shuffle` asks for one index per
/// position. Production code uses `GameRng`; tests may implement this with
/// a fixed script.
pub trait ShuffleSource {
    /// Return an index uniformly distributed over `0..=upper`.
    fn index_up_to(&mut self, upper: usize) -> usize;
}

/// Deterministic RNG backed by ChaCha8.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
    fork_counter: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            fork_counter: 0,
        }
    }

    /// Create an RNG seeded from OS entropy.
    ///
    /// The chosen seed is still recorded, see `seed()`.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// The seed this RNG was created with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Fork this RNG to create an independent stream.
    ///
    /// Each fork produces a different but deterministic sequence.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.fork_counter += 1;
        let fork_seed = self.seed.wrapping_add(self.fork_counter.wrapping_mul(0x9E3779B97F4A7C15));
        Self::new(fork_seed)
    }

    /// Generate a random usize in the given range.
    pub fn gen_range_usize(&mut self, range: std::ops::Range<usize>) -> usize {
        self.inner.gen_range(range)
    }

    /// Generate 16 random bytes (used for v4 UUIDs).
    pub fn bytes16(&mut self) -> [u8; 16] {
        self.inner.gen()
    }
}

impl ShuffleSource for GameRng {
    fn index_up_to(&mut self, upper: usize) -> usize {
        self.inner.gen_range(0..=upper)
    }
}
