//! Simulation loop driving the forest automaton
//!
//! `Simulation` owns the grid, the update engine and the running statistics.
//! A run moves through:
//!
//! ```text
//! Initialized -> (step 1: forced ignition + update) -> Stepping (2..T)
//!             -> ExtinguishedEarly(step) | CompletedFull(T)
//! ```
//!
//! Both terminal outcomes are normal results. The loop can be driven one step
//! at a time with [`Simulation::advance`] (stopping between calls is safe) or
//! to completion with [`Simulation::run`].

pub mod stats;

pub use stats::{percent, RunningStats, StepStatistics};

use crate::config::{ConfigError, SimulationConfig};
use crate::grid::ForestGrid;
use crate::solver::{create_update_engine, UpdateEngine};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::fmt;
use tracing::{debug, info, trace};

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunOutcome {
    /// No tree caught fire during `step`; the fire has died out
    ExtinguishedEarly { step: u32 },
    /// The step budget ran out with the fire still spreading
    CompletedFull { steps: u32 },
}

impl RunOutcome {
    /// Last step executed
    #[must_use]
    pub const fn final_step(self) -> u32 {
        match self {
            RunOutcome::ExtinguishedEarly { step } => step,
            RunOutcome::CompletedFull { steps } => steps,
        }
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::ExtinguishedEarly { step } => {
                write!(f, "fire extinguished at step {step}")
            }
            RunOutcome::CompletedFull { steps } => {
                write!(f, "completed all {steps} steps with fire still spreading")
            }
        }
    }
}

/// Lifecycle phase of a [`Simulation`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// Grid generated, no step taken yet
    Initialized,
    /// At least one step taken, fire still spreading
    Stepping,
    /// Run over
    Finished(RunOutcome),
}

impl RunPhase {
    /// Terminal outcome, once finished
    #[must_use]
    pub const fn outcome(self) -> Option<RunOutcome> {
        match self {
            RunPhase::Finished(outcome) => Some(outcome),
            RunPhase::Initialized | RunPhase::Stepping => None,
        }
    }
}

/// Result of a single [`Simulation::advance`] call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport {
    /// 1-based step number
    pub step: u32,
    /// Statistics of the grid this step produced
    pub stats: StepStatistics,
    /// Whether fire spread this step (always true on step 1, where the
    /// forced ignition counts as the spread event)
    pub fire_spread: bool,
    /// Trees the engine ignited this step
    pub ignitions: usize,
    /// Trees the engine grew this step
    pub growths: usize,
    /// Set when this step ended the run
    pub halted: Option<RunOutcome>,
}

/// Step with the most burning cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PeakBurning {
    pub step: u32,
    pub trees_burning: u64,
}

/// Everything a finished run reports
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// Seed the run used
    pub seed: u64,
    /// Terminal outcome
    pub outcome: RunOutcome,
    /// Statistics of every executed step, in order
    pub history: Vec<StepStatistics>,
    /// Largest fire seen
    pub peak_burning: PeakBurning,
}

impl RunSummary {
    /// Statistics of the last executed step
    #[must_use]
    pub fn final_stats(&self) -> Option<&StepStatistics> {
        self.history.last()
    }
}

/// Consumer of per-step output (renderers, loggers, exporters)
///
/// Both methods default to doing nothing.
pub trait StepObserver {
    /// Called after every step that does not end the run
    fn on_step(&mut self, _step: u32, _grid: &ForestGrid, _stats: &StepStatistics) {}

    /// Called once when the run ends
    fn on_finish(
        &mut self,
        _outcome: RunOutcome,
        _grid: &ForestGrid,
        _stats: Option<&StepStatistics>,
    ) {
    }
}

impl StepObserver for () {}

/// Forest fire simulation
pub struct Simulation {
    config: SimulationConfig,
    seed: u64,
    grid: ForestGrid,
    engine: Box<dyn UpdateEngine>,
    /// Setup RNG: initial forest and ignition point
    rng: ChaCha8Rng,
    ignition: Option<(usize, usize)>,
    stats: RunningStats,
    step: u32,
    phase: RunPhase,
    history: Vec<StepStatistics>,
}

impl Simulation {
    /// Validate `config` and create a simulation from it
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when any parameter is out of range.
    pub fn from_config(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Create a simulation with a randomly generated forest
    ///
    /// The configuration is assumed valid (see [`SimulationConfig::validate`]).
    /// When `config.seed` is `None` a seed is drawn from the thread RNG and
    /// logged so the run can be repeated.
    #[must_use]
    pub fn new(config: SimulationConfig) -> Self {
        let seed = resolve_seed(config.seed);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let grid = ForestGrid::random(config.grid_size, config.initial_density, &mut rng);
        Self::assemble(config, seed, grid, rng)
    }

    /// Create a simulation starting from a prepared grid
    ///
    /// `config.grid_size` is replaced by the grid's size; `initial_density`
    /// is ignored.
    #[must_use]
    pub fn with_grid(config: SimulationConfig, grid: ForestGrid) -> Self {
        let config = config.with_grid_size(grid.size());
        let seed = resolve_seed(config.seed);
        let rng = ChaCha8Rng::seed_from_u64(seed);
        Self::assemble(config, seed, grid, rng)
    }

    fn assemble(config: SimulationConfig, seed: u64, grid: ForestGrid, rng: ChaCha8Rng) -> Self {
        let counts = grid.counts();
        let engine = create_update_engine(&config, seed);
        info!(
            "Simulation created: {0}x{0} grid, {1} trees, seed {2}",
            grid.size(),
            counts.live_trees(),
            seed
        );
        Self {
            config,
            seed,
            grid,
            engine,
            rng,
            ignition: None,
            stats: RunningStats::new(&counts),
            step: 0,
            phase: RunPhase::Initialized,
            history: Vec::new(),
        }
    }

    /// Replace the update engine (before the first step)
    ///
    /// Lets callers inject an engine with their own draw source.
    pub fn with_engine(mut self, engine: Box<dyn UpdateEngine>) -> Self {
        debug_assert_eq!(self.step, 0, "engine swapped mid-run");
        self.engine = engine;
        self
    }

    /// Fix the step-1 ignition point instead of picking one at random
    ///
    /// # Panics
    ///
    /// Panics if the position is outside the grid
    pub fn with_ignition_at(mut self, row: usize, col: usize) -> Self {
        assert!(
            row < self.grid.size() && col < self.grid.size(),
            "ignition point ({row}, {col}) outside the grid"
        );
        self.ignition = Some((row, col));
        self
    }

    /// Execute one step
    ///
    /// Step 1 first sets one cell to `Burning`. Returns `None` once the run
    /// has finished.
    pub fn advance(&mut self) -> Option<StepReport> {
        match self.phase {
            RunPhase::Finished(_) => return None,
            RunPhase::Initialized => {
                self.ignite();
                self.phase = RunPhase::Stepping;
            }
            RunPhase::Stepping => {}
        }
        self.step += 1;

        let before = self.grid.counts();
        let outcome = self.engine.step(&self.grid);
        let after = outcome.grid.counts();
        let stats = self.stats.record(self.step, &before, &after);
        self.grid = outcome.grid;
        self.history.push(stats);

        let fire_spread = outcome.fire_spread || self.step == 1;
        let halted = if !fire_spread {
            Some(RunOutcome::ExtinguishedEarly { step: self.step })
        } else if self.step >= self.config.steps {
            Some(RunOutcome::CompletedFull { steps: self.step })
        } else {
            None
        };

        debug!(
            step = self.step,
            ignitions = outcome.ignitions,
            growths = outcome.growths,
            burning = stats.trees_burning,
            remaining = stats.trees_remaining,
            "step complete"
        );
        if let Some(result) = halted {
            info!("Simulation finished: {}", result);
            self.phase = RunPhase::Finished(result);
        }

        Some(StepReport {
            step: self.step,
            stats,
            fire_spread,
            ignitions: outcome.ignitions,
            growths: outcome.growths,
            halted,
        })
    }

    /// Run to completion, reporting each step to `observer`
    pub fn run<O: StepObserver + ?Sized>(mut self, observer: &mut O) -> RunSummary {
        let outcome = loop {
            if let Some(outcome) = self.phase.outcome() {
                break outcome;
            }
            if let Some(report) = self.advance() {
                if report.halted.is_none() {
                    observer.on_step(report.step, &self.grid, &report.stats);
                }
            }
        };
        observer.on_finish(outcome, &self.grid, self.history.last());

        let peak_burning = self
            .history
            .iter()
            .fold(PeakBurning::default(), |peak, s| {
                if s.trees_burning > peak.trees_burning {
                    PeakBurning {
                        step: s.step,
                        trees_burning: s.trees_burning,
                    }
                } else {
                    peak
                }
            });

        RunSummary {
            seed: self.seed,
            outcome,
            history: self.history,
            peak_burning,
        }
    }

    fn ignite(&mut self) {
        let size = self.grid.size();
        let (row, col) = self
            .ignition
            .unwrap_or_else(|| (self.rng.random_range(0..size), self.rng.random_range(0..size)));
        trace!(row, col, previous = %self.grid.get(row, col), "forced ignition");
        self.grid.ignite(row, col);
    }

    /// Current grid
    pub fn grid(&self) -> &ForestGrid {
        &self.grid
    }

    /// Steps executed so far
    pub fn step(&self) -> u32 {
        self.step
    }

    /// Lifecycle phase
    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Seed in use
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Parameters of this run
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Cumulative counters
    pub fn running_stats(&self) -> &RunningStats {
        &self.stats
    }

    /// Statistics of every executed step
    pub fn history(&self) -> &[StepStatistics] {
        &self.history
    }

    /// Check if the engine scans in parallel
    pub fn is_parallel(&self) -> bool {
        self.engine.is_parallel()
    }
}

fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        let seed: u64 = rand::rng().random();
        info!("No seed configured, using {}", seed);
        seed
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScanMode;
    use crate::core_types::CellState;
    use crate::solver::{FixedDraws, SequentialEngine};

    fn small_config() -> SimulationConfig {
        SimulationConfig::default()
            .with_grid_size(20)
            .with_steps(50)
            .with_seed(17)
    }

    #[test]
    fn test_simulation_creation() {
        let sim = Simulation::new(small_config());
        assert_eq!(sim.grid().size(), 20);
        assert_eq!(sim.step(), 0);
        assert_eq!(sim.phase(), RunPhase::Initialized);
        assert_eq!(sim.seed(), 17);
        assert_eq!(sim.grid().counts().burning, 0);
        assert_eq!(sim.grid().counts().burned, 0);
        assert_eq!(
            sim.running_stats().initial_trees(),
            sim.grid().counts().live_trees() as u64
        );
    }

    #[test]
    fn test_from_config_rejects_invalid() {
        let config = small_config().with_spread_chance(2.0);
        assert!(matches!(
            Simulation::from_config(config),
            Err(ConfigError::ProbabilityOutOfRange { .. })
        ));
    }

    #[test]
    fn test_first_step_forces_one_ignition() {
        // Bare ground, no growth: the forced cell burns and nothing else happens
        let config = small_config().with_initial_density(0.0).with_growth_rate(0.0);
        let mut sim = Simulation::new(config);
        let report = sim.advance().unwrap();
        assert_eq!(report.step, 1);
        assert!(report.fire_spread);
        assert_eq!(report.ignitions, 0);
        assert!(report.halted.is_none());
        // The ignited cell has already burned out
        assert_eq!(sim.grid().counts().burned, 1);

        let report = sim.advance().unwrap();
        assert_eq!(
            report.halted,
            Some(RunOutcome::ExtinguishedEarly { step: 2 })
        );
        assert!(sim.advance().is_none());
    }

    #[test]
    fn test_ignition_at_fixed_point() {
        let grid = ForestGrid::filled(5, CellState::TreeA);
        let config = small_config().with_spread_chance(1.0).with_growth_rate(0.0);
        let mut sim = Simulation::with_grid(config, grid).with_ignition_at(0, 0);
        let report = sim.advance().unwrap();
        assert_eq!(sim.grid().get(0, 0), CellState::Burned);
        assert_eq!(sim.grid().get(0, 1), CellState::Burning);
        assert_eq!(sim.grid().get(1, 0), CellState::Burning);
        assert_eq!(report.ignitions, 2);
        assert_eq!(report.stats.trees_burning, 2);
        assert_eq!(report.stats.trees_burned, 1);
    }

    #[test]
    fn test_completes_full_budget() {
        // Guaranteed regrowth next to a fire keeps the front alive
        let grid = ForestGrid::filled(30, CellState::TreeA);
        let config = small_config()
            .with_spread_chance(1.0)
            .with_growth_rate(1.0)
            .with_steps(10);
        let engine = SequentialEngine::new(
            config.rule_params(),
            FixedDraws {
                uniform: 0.0,
                coin: true,
            },
        );
        let sim = Simulation::with_grid(config, grid)
            .with_engine(Box::new(engine))
            .with_ignition_at(15, 15);
        let summary = sim.run(&mut ());
        assert_eq!(summary.outcome, RunOutcome::CompletedFull { steps: 10 });
        assert_eq!(summary.history.len(), 10);
    }

    #[test]
    fn test_advance_after_finish_is_none() {
        let config = small_config().with_steps(1);
        let mut sim = Simulation::new(config);
        let report = sim.advance().unwrap();
        assert_eq!(report.halted, Some(RunOutcome::CompletedFull { steps: 1 }));
        assert_eq!(
            sim.phase(),
            RunPhase::Finished(RunOutcome::CompletedFull { steps: 1 })
        );
        assert!(sim.advance().is_none());
        assert_eq!(sim.step(), 1);
    }

    #[derive(Default)]
    struct Recorder {
        steps: Vec<u32>,
        finished: Option<(RunOutcome, Option<u32>)>,
    }

    impl StepObserver for Recorder {
        fn on_step(&mut self, step: u32, grid: &ForestGrid, stats: &StepStatistics) {
            assert_eq!(grid.counts().burning as u64, stats.trees_burning);
            self.steps.push(step);
        }

        fn on_finish(
            &mut self,
            outcome: RunOutcome,
            _grid: &ForestGrid,
            stats: Option<&StepStatistics>,
        ) {
            self.finished = Some((outcome, stats.map(|s| s.step)));
        }
    }

    #[test]
    fn test_observer_sees_non_halting_steps_only() {
        let config = small_config().with_spread_chance(0.0);
        let sim = Simulation::new(config);
        let mut recorder = Recorder::default();
        let summary = sim.run(&mut recorder);

        assert_eq!(summary.outcome, RunOutcome::ExtinguishedEarly { step: 2 });
        assert_eq!(recorder.steps, vec![1]);
        assert_eq!(
            recorder.finished,
            Some((RunOutcome::ExtinguishedEarly { step: 2 }, Some(2)))
        );
        assert_eq!(summary.final_stats().map(|s| s.step), Some(2));
    }

    #[test]
    fn test_peak_burning_tracks_maximum() {
        let sim = Simulation::new(small_config().with_spread_chance(0.9).with_initial_density(0.8));
        let summary = sim.run(&mut ());
        let max = summary
            .history
            .iter()
            .map(|s| s.trees_burning)
            .max()
            .unwrap_or(0);
        assert_eq!(summary.peak_burning.trees_burning, max);
        assert!(summary.peak_burning.step >= 1);
    }

    #[test]
    fn test_parallel_scan_mode_runs() {
        let config = small_config().with_scan_mode(ScanMode::Parallel);
        let sim = Simulation::new(config);
        assert!(sim.is_parallel());
        let summary = sim.run(&mut ());
        assert!(summary.outcome.final_step() >= 1);
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(
            RunOutcome::ExtinguishedEarly { step: 12 }.to_string(),
            "fire extinguished at step 12"
        );
        assert_eq!(
            RunOutcome::CompletedFull { steps: 3 }.final_step(),
            3
        );
    }
}
