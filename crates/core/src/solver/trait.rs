//! Update engine trait definition
//!
//! This module defines the `UpdateEngine` trait, the interface shared by the
//! sequential and parallel implementations of the forest transition step.

use super::rule::RuleParams;
use crate::grid::ForestGrid;

/// Result of one engine step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    /// Full replacement grid
    pub grid: ForestGrid,
    /// True iff at least one tree caught fire this step
    pub fire_spread: bool,
    /// Trees that became `Burning` this step
    pub ignitions: usize,
    /// Empty cells that grew a tree this step
    pub growths: usize,
}

/// Backend-agnostic interface for the forest update step
///
/// Implementations read only from the grid they are given and return a new
/// grid of the same size. The input is never modified, so every cell's next
/// state depends solely on the pre-step snapshot.
pub trait UpdateEngine: Send {
    /// Compute the next grid from `grid`
    ///
    /// # Arguments
    ///
    /// * `grid` - Pre-step snapshot
    ///
    /// # Returns
    ///
    /// Replacement grid with the spread flag and transition counts
    fn step(&mut self, grid: &ForestGrid) -> StepOutcome;

    /// Probabilities this engine applies
    fn params(&self) -> RuleParams;

    /// Number of steps computed so far
    fn steps_taken(&self) -> u64;

    /// Check if this engine scans rows in parallel
    ///
    /// # Returns
    ///
    /// `true` if rows are processed on the rayon pool, `false` for a
    /// single-threaded row-major scan
    fn is_parallel(&self) -> bool;
}
