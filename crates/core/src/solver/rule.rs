//! Per-cell transition rule
//!
//! | Current        | Condition                          | Next               |
//! |----------------|------------------------------------|--------------------|
//! | tree (A or B)  | burning neighbour and draw < spread | `Burning`          |
//! | tree (A or B)  | otherwise                          | unchanged          |
//! | `Empty`        | draw < growth                      | tree (coin picks variant) |
//! | `Empty`        | otherwise                          | `Empty`            |
//! | `Burning`      | always                             | `Burned`           |
//! | `Burned`       | always                             | `Empty`            |
//!
//! A tree only consumes a draw when it has a burning neighbour; an empty cell
//! always consumes one, plus a coin flip when it grows.

use super::draws::DrawSource;
use crate::core_types::CellState;
use crate::grid::ForestGrid;
use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

/// Probabilities driving the stochastic transitions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RuleParams {
    /// Chance an empty cell grows a tree in one step
    pub growth_rate: f64,
    /// Chance a tree next to a burning cell catches fire in one step
    pub spread_chance: f64,
}

/// Transition counts for a scanned region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tally {
    /// Trees that caught fire
    pub ignitions: usize,
    /// Empty cells that grew a tree
    pub growths: usize,
}

impl AddAssign for Tally {
    fn add_assign(&mut self, rhs: Self) {
        self.ignitions += rhs.ignitions;
        self.growths += rhs.growths;
    }
}

/// Next state of `(row, col)`, read only from the pre-step `grid`
#[inline]
pub fn next_state<D: DrawSource + ?Sized>(
    grid: &ForestGrid,
    row: usize,
    col: usize,
    params: &RuleParams,
    draws: &mut D,
) -> CellState {
    let cell = grid.index(row, col);
    match grid.get(row, col) {
        tree @ (CellState::TreeA | CellState::TreeB) => {
            // Short-circuit keeps the draw off trees with no fire nearby
            if grid.has_burning_neighbor(row, col) && draws.uniform(cell) < params.spread_chance {
                CellState::Burning
            } else {
                tree
            }
        }
        CellState::Empty => {
            if draws.uniform(cell) < params.growth_rate {
                CellState::tree_from_coin(draws.coin(cell))
            } else {
                CellState::Empty
            }
        }
        CellState::Burning => CellState::Burned,
        CellState::Burned => CellState::Empty,
    }
}

/// Compute one output row into `out`, left to right
///
/// `out` must be exactly one grid row wide. Returns the transitions seen.
pub(crate) fn scan_row<D: DrawSource + ?Sized>(
    grid: &ForestGrid,
    row: usize,
    params: &RuleParams,
    draws: &mut D,
    out: &mut [CellState],
) -> Tally {
    debug_assert_eq!(out.len(), grid.size());
    let mut tally = Tally::default();
    for (col, slot) in out.iter_mut().enumerate() {
        let current = grid.get(row, col);
        let next = next_state(grid, row, col, params, draws);
        if current.is_tree() && next == CellState::Burning {
            tally.ignitions += 1;
        } else if current == CellState::Empty && next.is_tree() {
            tally.growths += 1;
        }
        *slot = next;
    }
    tally
}
