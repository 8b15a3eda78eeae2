//! Single-threaded update engine
//!
//! Scans the grid row by row, left to right, writing into a fresh output
//! buffer. With a [`StreamDraws`](super::StreamDraws) source this fixes the
//! exact sequence of random draws, so a seeded run is bit-reproducible.

use super::draws::DrawSource;
use super::rule::{scan_row, RuleParams, Tally};
use super::{StepOutcome, UpdateEngine};
use crate::core_types::CellState;
use crate::grid::ForestGrid;

/// Row-major sequential engine over any draw source
#[derive(Debug, Clone)]
pub struct SequentialEngine<D> {
    params: RuleParams,
    draws: D,
    step: u64,
}

impl<D: DrawSource> SequentialEngine<D> {
    /// Create a new sequential engine
    ///
    /// # Arguments
    ///
    /// * `params` - Growth and spread probabilities
    /// * `draws` - Random source consumed in row-major order
    #[must_use]
    pub fn new(params: RuleParams, draws: D) -> Self {
        Self {
            params,
            draws,
            step: 0,
        }
    }

    /// Borrow the draw source
    pub fn draws_mut(&mut self) -> &mut D {
        &mut self.draws
    }
}

impl<D: DrawSource + Send> UpdateEngine for SequentialEngine<D> {
    fn step(&mut self, grid: &ForestGrid) -> StepOutcome {
        self.step += 1;
        self.draws.begin_step(self.step);

        let size = grid.size();
        let mut next = vec![CellState::Empty; grid.len()];
        let mut tally = Tally::default();
        for (row, out) in next.chunks_exact_mut(size).enumerate() {
            tally += scan_row(grid, row, &self.params, &mut self.draws, out);
        }

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
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::draws::{FixedDraws, PositionalDraws, StreamDraws};
    use crate::solver::rule::next_state;

    fn certain_spread() -> RuleParams {
        RuleParams {
            growth_rate: 0.0,
            spread_chance: 1.0,
        }
    }

    #[test]
    fn test_center_fire_spreads_to_orthogonal_neighbors() {
        let grid = ForestGrid::parse(
            "
            ttt
            t*t
            ttt
            ",
        )
        .unwrap();
        let mut engine = SequentialEngine::new(certain_spread(), StreamDraws::seeded(1));
        let outcome = engine.step(&grid);

        let expected = ForestGrid::parse(
            "
            t*t
            *#*
            t*t
            ",
        )
        .unwrap();
        assert_eq!(outcome.grid, expected);
        assert!(outcome.fire_spread);
        assert_eq!(outcome.ignitions, 4);
        assert_eq!(outcome.growths, 0);
    }

    #[test]
    fn test_input_grid_is_not_modified() {
        let grid = ForestGrid::parse(
            "
            *tt
            ttt
            ttt
            ",
        )
        .unwrap();
        let snapshot = grid.clone();
        let mut engine = SequentialEngine::new(certain_spread(), StreamDraws::seeded(2));
        let outcome = engine.step(&grid);
        assert_eq!(grid, snapshot);

        // Simultaneous update: fire moves exactly one cell per step, even
        // though (0, 1) is scanned before (0, 2)
        assert_eq!(outcome.grid.get(0, 1), CellState::Burning);
        assert_eq!(outcome.grid.get(0, 2), CellState::TreeA);
        assert_eq!(outcome.grid.get(1, 1), CellState::TreeA);
    }

    #[test]
    fn test_decay_alone_does_not_set_spread_flag() {
        let grid = ForestGrid::parse(
            "
            *#
            ..
            ",
        )
        .unwrap();
        let mut engine = SequentialEngine::new(certain_spread(), StreamDraws::seeded(3));
        let outcome = engine.step(&grid);
        assert_eq!(outcome.grid, ForestGrid::parse("#.\n..").unwrap());
        assert!(!outcome.fire_spread);
        assert_eq!(outcome.ignitions, 0);
    }

    #[test]
    fn test_growth_does_not_set_spread_flag() {
        let grid = ForestGrid::new(4);
        let params = RuleParams {
            growth_rate: 1.0,
            spread_chance: 1.0,
        };
        let mut engine = SequentialEngine::new(
            params,
            FixedDraws {
                uniform: 0.5,
                coin: true,
            },
        );
        let outcome = engine.step(&grid);
        assert_eq!(outcome.growths, 16);
        assert_eq!(outcome.grid.counts().tree_a, 16);
        assert!(!outcome.fire_spread);
    }

    #[test]
    fn test_step_counter_advances() {
        let grid = ForestGrid::new(2);
        let mut engine = SequentialEngine::new(certain_spread(), StreamDraws::seeded(4));
        assert_eq!(engine.steps_taken(), 0);
        let _ = engine.step(&grid);
        let _ = engine.step(&grid);
        assert_eq!(engine.steps_taken(), 2);
        assert!(!engine.is_parallel());
        assert_eq!(engine.params(), certain_spread());
    }

    #[test]
    fn test_same_seed_same_output() {
        let grid = ForestGrid::parse(
            "
            t.tT.
            .t*t.
            T.t.t
            ..T*t
            t.t..
            ",
        )
        .unwrap();
        let params = RuleParams {
            growth_rate: 0.4,
            spread_chance: 0.5,
        };
        let mut a = SequentialEngine::new(params, StreamDraws::seeded(77));
        let mut b = SequentialEngine::new(params, StreamDraws::seeded(77));
        let mut ga = grid.clone();
        let mut gb = grid;
        for _ in 0..10 {
            let oa = a.step(&ga);
            let ob = b.step(&gb);
            assert_eq!(oa, ob);
            ga = oa.grid;
            gb = ob.grid;
        }
    }

    #[test]
    fn test_result_independent_of_traversal_order() {
        // With position-keyed draws, a reverse scan gives the same grid as
        // the engine's forward scan
        let grid = ForestGrid::parse(
            "
            tt.tT.
            .t*tt.
            T.ttt*
            .tT*t.
            t.tt..
            *T..tt
            ",
        )
        .unwrap();
        let params = RuleParams {
            growth_rate: 0.3,
            spread_chance: 0.6,
        };

        let mut engine = SequentialEngine::new(params, PositionalDraws::new(2024));
        let forward = engine.step(&grid).grid;

        let mut draws = PositionalDraws::new(2024);
        draws.begin_step(1);
        let size = grid.size();
        let mut cells = vec![CellState::Empty; grid.len()];
        for row in (0..size).rev() {
            for col in (0..size).rev() {
                cells[grid.index(row, col)] = next_state(&grid, row, col, &params, &mut draws);
            }
        }
        let backward = ForestGrid::from_cells(size, cells).unwrap();

        assert_eq!(forward, backward);
    }
}
