//! Deterministic seeding: shuffle generators, the permutation table, and seed sources.
//!
//! The permutation table is the only place randomness enters the noise pipeline.
//! Shuffle draws go through [`DeterministicRng`] so the reference sine hash can be
//! swapped for another generator without touching call sites.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// ---------------------------------------------------------------------------
// Deterministic generators
// ---------------------------------------------------------------------------

/// A source of reproducible draws for the Fisher-Yates shuffle.
pub trait DeterministicRng {
    /// Returns a value in `[0.0, 1.0)` for shuffle step `step`.
    fn next_unit(&mut self, step: usize) -> f64;
}

/// The reference generator: `frac(sin(seed + step) * 10000)`.
///
/// Uses `libm` rather than the platform libc so the same seed gives the same
/// table on every target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SineRng {
    seed: f64,
}

impl SineRng {
    /// Create a generator. Non-finite seeds are replaced with `0.0`.
    pub fn new(seed: f64) -> Self {
        let seed = if seed.is_finite() {
            seed
        } else {
            tracing::debug!(seed, "non-finite seed replaced with 0");
            0.0
        };
        Self { seed }
    }

    /// The sanitized seed.
    pub fn seed(&self) -> f64 {
        self.seed
    }
}

impl DeterministicRng for SineRng {
    #[inline]
    fn next_unit(&mut self, step: usize) -> f64 {
        let x = libm::sin(self.seed + step as f64) * 10_000.0;
        let frac = x - libm::floor(x);
        // `frac` can round up to exactly 1.0 for tiny negative inputs.
        if frac.is_finite() && frac < 1.0 {
            frac
        } else {
            0.0
        }
    }
}

/// ChaCha8-backed generator. Ignores `step`; draws are sequential.
#[derive(Clone, Debug)]
pub struct ChaChaRng {
    rng: ChaCha8Rng,
}

impl ChaChaRng {
    /// Create a generator from a 64-bit seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl DeterministicRng for ChaChaRng {
    fn next_unit(&mut self, _step: usize) -> f64 {
        self.rng.random::<f64>()
    }
}

// ---------------------------------------------------------------------------
// Permutation table
// ---------------------------------------------------------------------------

/// Number of distinct entries in the permutation.
pub const PERMUTATION_SIZE: usize = 256;

/// A shuffled permutation of `0..256`, stored twice so lookups of `p[i + 1]`
/// never need to wrap.
#[derive(Clone, PartialEq, Eq)]
pub struct PermutationTable {
    values: [u8; PERMUTATION_SIZE * 2],
}

impl PermutationTable {
    /// Build the table for `seed` using the reference [`SineRng`].
    pub fn build(seed: f64) -> Self {
        Self::with_rng(&mut SineRng::new(seed))
    }

    /// Build the table with an arbitrary shuffle generator.
    pub fn with_rng(rng: &mut impl DeterministicRng) -> Self {
        let mut perm = [0u8; PERMUTATION_SIZE];
        for (i, v) in perm.iter_mut().enumerate() {
            *v = i as u8;
        }

        for i in (1..PERMUTATION_SIZE).rev() {
            let r = rng.next_unit(i).clamp(0.0, 1.0);
            let j = ((r * (i + 1) as f64).floor() as usize).min(i);
            perm.swap(i, j);
        }

        let mut values = [0u8; PERMUTATION_SIZE * 2];
        values[..PERMUTATION_SIZE].copy_from_slice(&perm);
        values[PERMUTATION_SIZE..].copy_from_slice(&perm);
        Self { values }
    }

    /// Look up entry `i`, wrapping at the doubled length.
    #[inline]
    pub fn get(&self, i: usize) -> usize {
        self.values[i % (PERMUTATION_SIZE * 2)] as usize
    }

    /// All 512 entries.
    pub fn as_slice(&self) -> &[u8] {
        &self.values
    }

    /// Returns `true` if the first 256 entries are a permutation of `0..256`
    /// and the second half mirrors the first.
    pub fn is_valid_permutation(&self) -> bool {
        let mut seen = [false; PERMUTATION_SIZE];
        for &v in &self.values[..PERMUTATION_SIZE] {
            if std::mem::replace(&mut seen[v as usize], true) {
                return false;
            }
        }
        self.values[..PERMUTATION_SIZE] == self.values[PERMUTATION_SIZE..]
    }
}

impl std::fmt::Debug for PermutationTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermutationTable")
            .field("head", &&self.values[..8])
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Seed sources
// ---------------------------------------------------------------------------

/// Supplies the world seed. The only non-deterministic step of generation.
pub trait SeedSource {
    /// Draw a seed.
    fn draw_seed(&mut self) -> f64;
}

/// Always returns the same seed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedSeed(pub f64);

impl SeedSource for FixedSeed {
    fn draw_seed(&mut self) -> f64 {
        self.0
    }
}

/// Draws a seed in `[0, 10000)` from the thread-local RNG.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomSeed;

impl SeedSource for RandomSeed {
    fn draw_seed(&mut self) -> f64 {
        rand::rng().random_range(0.0..10_000.0)
    }
}
