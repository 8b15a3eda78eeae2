//! Rayon-parallel update engine
//!
//! Rows of the output buffer are handed to the rayon pool as disjoint
//! mutable chunks; every worker reads only from the shared pre-step grid.
//! Draws come from [`PositionalDraws`], so the output matches the sequential
//! engine driven by the same positional source, independent of scheduling.

use super::draws::{DrawSource, PositionalDraws};
use super::rule::{scan_row, RuleParams, Tally};
use super::{StepOutcome, UpdateEngine};
use crate::core_types::CellState;
use crate::grid::ForestGrid;
use rayon::prelude::*;

/// Row-parallel engine with order-independent draws
#[derive(Debug, Clone)]
pub struct ParallelEngine {
    params: RuleParams,
    draws: PositionalDraws,
    step: u64,
}

impl ParallelEngine {
    /// Create a new parallel engine
    ///
    /// # Arguments
    ///
    /// * `params` - Growth and spread probabilities
    /// * `seed` - Seed for the position-keyed draws
    #[must_use]
    pub fn new(params: RuleParams, seed: u64) -> Self {
        Self {
            params,
            draws: PositionalDraws::new(seed),
            step: 0,
        }
    }
}

impl UpdateEngine for ParallelEngine {
    fn step(&mut self, grid: &ForestGrid) -> StepOutcome {
        self.step += 1;
        self.draws.begin_step(self.step);

        let size = grid.size();
        let params = self.params;
        let draws = &self.draws;
        let mut next = vec![CellState::Empty; grid.len()];

        let tally = next
            .par_chunks_exact_mut(size)
            .enumerate()
            .map(|(row, out)| {
                let mut row_draws = draws.clone();
                scan_row(grid, row, &params, &mut row_draws, out)
            })
            .reduce(Tally::default, |mut acc, t| {
                acc += t;
                acc
            });

        StepOutcome {
            grid: ForestGrid::from_buffer(size, next),
            fire_spread: tally.ignitions > 0,
            ignitions: tally.ignitions,
            growths: tally.growths,
        }
    }

    fn params(&self) -> RuleParams {
        self.params
    }

    fn steps_taken(&self) -> u64 {
        self.step
    }

    fn is_parallel(&self) -> bool {
        true
    }
}
