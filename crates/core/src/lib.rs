//! Forest Fire Simulation Core Library
//!
//! A stochastic cellular automaton for exploring how wildfire spread depends on
//! tree density, regrowth rate and ignition probability. The forest is a square
//! grid of cells that are empty, hold one of two tree variants, are burning, or
//! have just burned out.
//!
//! ## Update Rule
//!
//! Every step computes a completely new grid from the previous one:
//! - a tree next to a burning cell (orthogonally, with clamped edges) catches
//!   fire with the configured spread chance
//! - an empty cell grows a tree with the configured growth rate
//! - a burning cell burns out, and a burned cell becomes empty
//!
//! ## Running a Simulation
//!
//! ```rust
//! use forest_fire_core::{RunOutcome, Simulation, SimulationConfig};
//!
//! let config = SimulationConfig::default()
//!     .with_grid_size(40)
//!     .with_steps(60)
//!     .with_seed(42);
//! let summary = Simulation::from_config(config).unwrap().run(&mut ());
//! match summary.outcome {
//!     RunOutcome::ExtinguishedEarly { step } => assert!(step >= 2),
//!     RunOutcome::CompletedFull { steps } => assert_eq!(steps, 60),
//! }
//! ```

// Cell states
pub mod core_types;

// Grid, engine and simulation loop
pub mod config;
pub mod grid;
pub mod simulation;
pub mod solver;

// Re-export core types
pub use core_types::CellState;

// Re-export grid and configuration types
pub use config::{ConfigError, ScanMode, ScenarioPreset, SimulationConfig};
pub use grid::{CellCounts, ForestGrid, GridError};

// Re-export engine and simulation types
pub use simulation::{
    PeakBurning, RunOutcome, RunPhase, RunSummary, RunningStats, Simulation, StepObserver,
    StepReport, StepStatistics,
};
pub use solver::{
    create_update_engine, DrawSource, ParallelEngine, PositionalDraws, RuleParams,
    SequentialEngine, StepOutcome, StreamDraws, UpdateEngine,
};
