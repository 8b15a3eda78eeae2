//! Simulation parameters
//!
//! A [`SimulationConfig`] is fixed for the duration of a run. It is plain data
//! (serde-serialisable, so callers can load it from any format they like) and
//! is validated once at the boundary; the engine itself assumes valid input.

use crate::solver::RuleParams;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Invalid simulation parameters
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A probability was NaN or outside `[0, 1]`
    #[error("{name} must be within [0, 1], got {value}")]
    ProbabilityOutOfRange { name: &'static str, value: f64 },
    /// Grid side length was zero
    #[error("grid_size must be greater than zero")]
    ZeroGridSize,
    /// Step budget was zero
    #[error("steps must be greater than zero")]
    ZeroSteps,
    /// Unrecognised preset name
    #[error("unknown scenario preset '{0}' (expected sparse, dense or regrowing)")]
    UnknownPreset(String),
}

/// How the engine scans the grid each step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanMode {
    /// Single-threaded row-major scan over one RNG stream (bit-reproducible
    /// draw sequence)
    #[default]
    Sequential,
    /// Rows scanned on the rayon pool with position-keyed draws
    Parallel,
}

/// Parameters of one simulation run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Grid side length N (the grid is N×N)
    pub grid_size: usize,
    /// Chance an empty cell grows a tree each step
    pub growth_rate: f64,
    /// Chance a tree next to a burning cell catches fire each step
    pub spread_chance: f64,
    /// Fraction of cells holding a tree at the start
    pub initial_density: f64,
    /// Step budget T
    pub steps: u32,
    /// RNG seed; `None` picks one at random
    pub seed: Option<u64>,
    /// Engine scan strategy
    pub scan_mode: ScanMode,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            grid_size: 100,
            growth_rate: 0.005,
            spread_chance: 0.7,
            initial_density: 0.6,
            steps: 200,
            seed: None,
            scan_mode: ScanMode::Sequential,
        }
    }
}

impl SimulationConfig {
    /// Check every parameter is within its documented range
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size == 0 {
            return Err(ConfigError::ZeroGridSize);
        }
        if self.steps == 0 {
            return Err(ConfigError::ZeroSteps);
        }
        check_probability("growth_rate", self.growth_rate)?;
        check_probability("spread_chance", self.spread_chance)?;
        check_probability("initial_density", self.initial_density)?;
        Ok(())
    }

    /// Probabilities handed to the update engine
    #[must_use]
    pub const fn rule_params(&self) -> RuleParams {
        RuleParams {
            growth_rate: self.growth_rate,
            spread_chance: self.spread_chance,
        }
    }

    pub fn with_grid_size(mut self, grid_size: usize) -> Self {
        self.grid_size = grid_size;
        self
    }

    pub fn with_growth_rate(mut self, growth_rate: f64) -> Self {
        self.growth_rate = growth_rate;
        self
    }

    pub fn with_spread_chance(mut self, spread_chance: f64) -> Self {
        self.spread_chance = spread_chance;
        self
    }

    pub fn with_initial_density(mut self, initial_density: f64) -> Self {
        self.initial_density = initial_density;
        self
    }

    pub fn with_steps(mut self, steps: u32) -> Self {
        self.steps = steps;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_scan_mode(mut self, scan_mode: ScanMode) -> Self {
        self.scan_mode = scan_mode;
        self
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ProbabilityOutOfRange { name, value })
    }
}

/// Named parameter sets for exploring density, regrowth and spread
/// sensitivity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScenarioPreset {
    /// Thin forest near the percolation threshold: fires tend to die out
    Sparse,
    /// Dense forest with a high spread chance: fires sweep the grid
    Dense,
    /// Moderate forest with fast regrowth: fire fronts can persist
    Regrowing,
}

impl ScenarioPreset {
    /// All presets
    pub const ALL: [ScenarioPreset; 3] = [
        ScenarioPreset::Sparse,
        ScenarioPreset::Dense,
        ScenarioPreset::Regrowing,
    ];

    /// Parameters for this preset, on top of the defaults
    #[must_use]
    pub fn config(self) -> SimulationConfig {
        let base = SimulationConfig::default();
        match self {
            ScenarioPreset::Sparse => base
                .with_initial_density(0.4)
                .with_spread_chance(0.6)
                .with_growth_rate(0.0),
            ScenarioPreset::Dense => base
                .with_initial_density(0.85)
                .with_spread_chance(0.9)
                .with_growth_rate(0.001),
            ScenarioPreset::Regrowing => base
                .with_initial_density(0.6)
                .with_spread_chance(0.75)
                .with_growth_rate(0.05)
                .with_steps(500),
        }
    }

    /// Lowercase preset name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            ScenarioPreset::Sparse => "sparse",
            ScenarioPreset::Dense => "dense",
            ScenarioPreset::Regrowing => "regrowing",
        }
    }
}

impl fmt::Display for ScenarioPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScenarioPreset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sparse" => Ok(ScenarioPreset::Sparse),
            "dense" => Ok(ScenarioPreset::Dense),
            "regrowing" | "regrowth" => Ok(ScenarioPreset::Regrowing),
            _ => Err(ConfigError::UnknownPreset(s.to_string())),
        }
    }
}
