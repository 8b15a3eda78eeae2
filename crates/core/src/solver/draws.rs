//! Random draw sources for the update rule
//!
//! The rule never calls a global RNG. Every random decision goes through a
//! [`DrawSource`], which receives the row-major index of the cell asking for
//! the draw. Stream-based sources ignore the index and hand out values in call
//! order; positional sources derive the value from the index so the result is
//! the same whatever order cells are visited in.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// `ChaCha` stream reserved for the engine's draws when sharing a seed with the
/// setup RNG (which uses stream 0)
pub const ENGINE_STREAM: u64 = 1;

/// `ChaCha` 32-bit words reserved per cell by [`PositionalDraws`]: two for the
/// uniform draw and two for the coin flip
const WORDS_PER_CELL: u128 = 4;

/// Source of the random values consumed by the transition rule
pub trait DrawSource {
    /// Called once before each step's scan with the 1-based step number
    fn begin_step(&mut self, _step: u64) {}

    /// Uniform value in `[0, 1)` for the cell at row-major index `cell`
    fn uniform(&mut self, cell: usize) -> f64;

    /// Fair coin flip for the cell at row-major index `cell`
    fn coin(&mut self, cell: usize) -> bool;
}

/// Draws taken from a single RNG stream in call order
///
/// With the row-major sequential engine this reproduces the classic draw
/// pattern: one uniform per tree with a burning neighbour, one uniform per
/// empty cell, and one coin flip per growth. Results depend on scan order.
#[derive(Debug, Clone)]
pub struct StreamDraws<R> {
    rng: R,
}

impl<R: Rng> StreamDraws<R> {
    /// Wrap an existing RNG
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Borrow the underlying RNG
    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }
}

impl StreamDraws<ChaCha8Rng> {
    /// Seeded `ChaCha8` stream, portable across platforms
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(ENGINE_STREAM);
        Self { rng }
    }
}

impl<R: Rng> DrawSource for StreamDraws<R> {
    #[inline]
    fn uniform(&mut self, _cell: usize) -> f64 {
        self.rng.random::<f64>()
    }

    #[inline]
    fn coin(&mut self, _cell: usize) -> bool {
        self.rng.random_bool(0.5)
    }
}

/// Draws keyed by `(seed, step, cell)`
///
/// Each step selects a `ChaCha` stream and each cell owns a fixed slice of that
/// stream, so a cell receives the same values regardless of traversal order
/// or which worker thread scans it. Cloning is cheap and every clone yields
/// identical values.
#[derive(Debug, Clone)]
pub struct PositionalDraws {
    rng: ChaCha8Rng,
}

impl PositionalDraws {
    /// Create a positional source for the given seed
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    #[inline]
    fn seek(&mut self, cell: usize, word: u128) {
        self.rng.set_word_pos(cell as u128 * WORDS_PER_CELL + word);
    }
}

impl DrawSource for PositionalDraws {
    fn begin_step(&mut self, step: u64) {
        self.rng.set_stream(step);
    }

    #[inline]
    fn uniform(&mut self, cell: usize) -> f64 {
        self.seek(cell, 0);
        self.rng.random::<f64>()
    }

    #[inline]
    fn coin(&mut self, cell: usize) -> bool {
        self.seek(cell, 2);
        self.rng.random_bool(0.5)
    }
}

/// Constant draws, for exploring the deterministic limits of the rule
///
/// With `uniform = 0.0` every tree next to a fire ignites whenever the spread
/// chance is positive, and every empty cell regrows whenever the growth rate
/// is positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedDraws {
    pub uniform: f64,
    pub coin: bool,
}

impl DrawSource for FixedDraws {
    #[inline]
    fn uniform(&mut self, _cell: usize) -> f64 {
        self.uniform
    }

    #[inline]
    fn coin(&mut self, _cell: usize) -> bool {
        self.coin
    }
}
