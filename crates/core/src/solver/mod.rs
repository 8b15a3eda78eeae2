//! Forest update engine module
//!
//! This module computes the next grid from the current one under
//! simultaneous-update semantics: each step reads one immutable snapshot and
//! writes a fresh buffer. The core abstraction is the `UpdateEngine` trait,
//! which has a sequential and a rayon-parallel implementation.
//!
//! # Engine Selection
//!
//! - [`ScanMode::Sequential`]: row-major scan over one seeded RNG stream. The
//!   draw sequence is fixed, so a seed reproduces a run bit for bit.
//! - [`ScanMode::Parallel`]: rows are split across the rayon pool and draws
//!   are keyed by cell position, so results do not depend on scheduling.
//!   Runs are reproducible per seed, but differ from sequential runs with
//!   the same seed.
//!
//! # Example
//!
//! ```rust
//! use forest_fire_core::config::SimulationConfig;
//! use forest_fire_core::grid::ForestGrid;
//! use forest_fire_core::solver::create_update_engine;
//!
//! let config = SimulationConfig::default().with_seed(7);
//! let mut engine = create_update_engine(&config, 7);
//! let grid = ForestGrid::parse("t*\n..").unwrap();
//! let outcome = engine.step(&grid);
//! assert_eq!(outcome.grid.size(), 2);
//! ```

pub mod cpu;
pub mod draws;
pub mod parallel;
pub mod rule;
#[allow(clippy::module_name_repetitions)]
mod r#trait;

// Re-exports
pub use cpu::SequentialEngine;
pub use draws::{DrawSource, FixedDraws, PositionalDraws, StreamDraws, ENGINE_STREAM};
pub use parallel::ParallelEngine;
pub use r#trait::{StepOutcome, UpdateEngine};
pub use rule::{next_state, RuleParams, Tally};

use crate::config::{ScanMode, SimulationConfig};
use tracing::info;

/// Create an update engine for the configured scan mode
///
/// # Arguments
///
/// * `config` - Simulation parameters (probabilities and scan mode)
/// * `seed` - Seed for the engine's random draws
///
/// # Returns
///
/// A boxed `UpdateEngine` trait object
pub fn create_update_engine(config: &SimulationConfig, seed: u64) -> Box<dyn UpdateEngine> {
    let params = config.rule_params();
    match config.scan_mode {
        ScanMode::Sequential => {
            info!("Using sequential engine ({0}x{0} grid)", config.grid_size);
            Box::new(SequentialEngine::new(params, StreamDraws::seeded(seed)))
        }
        ScanMode::Parallel => {
            info!(
                "Using parallel engine on {0} threads ({1}x{1} grid)",
                rayon::current_num_threads(),
                config.grid_size
            );
            Box::new(ParallelEngine::new(params, seed))
        }
    }
}
