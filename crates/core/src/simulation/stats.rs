//! Running statistics over a simulation
//!
//! Counts are exact integers. Percentages in [`StepStatistics`] are rounded to
//! two decimals when the record is built; the accumulators in
//! [`RunningStats`] are never rounded.

use crate::grid::CellCounts;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-step statistics record handed to observers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepStatistics {
    /// 1-based step number
    pub step: u32,
    /// Cells currently burning
    pub trees_burning: u64,
    /// Cells that burned out this step (currently `Burned`)
    pub trees_burned: u64,
    /// Live plus burning trees
    pub trees_remaining: u64,
    /// Net new live trees this step, floored at zero
    pub trees_grown: u64,
    /// Live trees in the initial forest
    pub initial_trees: u64,
    /// Cumulative burned-out trees
    pub trees_burned_total: u64,
    /// Cumulative grown trees
    pub trees_grown_total: u64,
    /// `trees_burning / trees_remaining`, as a rounded percentage
    pub burning_percent: f64,
    /// `trees_burned_total / (initial_trees + trees_grown_total)`, as a
    /// rounded percentage
    pub burned_percent: f64,
}

impl fmt::Display for StepStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "step {:>4} | burning {:>6} ({:>6.2}%) | burned {:>6} | remaining {:>7} | grown {:>5} | burned overall {:>6.2}%",
            self.step,
            self.trees_burning,
            self.burning_percent,
            self.trees_burned,
            self.trees_remaining,
            self.trees_grown,
            self.burned_percent
        )
    }
}

/// Cumulative counters owned by the simulation loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RunningStats {
    initial_trees: u64,
    trees_burned_total: u64,
    trees_grown_total: u64,
}

impl RunningStats {
    /// Start accumulating from the initial forest
    #[must_use]
    pub fn new(initial: &CellCounts) -> Self {
        Self {
            initial_trees: initial.live_trees() as u64,
            trees_burned_total: 0,
            trees_grown_total: 0,
        }
    }

    /// Fold one step into the accumulators
    ///
    /// # Arguments
    ///
    /// * `step` - 1-based step number
    /// * `before` - Counts of the grid the step started from
    /// * `after` - Counts of the grid the step produced
    ///
    /// # Returns
    ///
    /// The statistics record for this step
    pub fn record(&mut self, step: u32, before: &CellCounts, after: &CellCounts) -> StepStatistics {
        let trees_burning = after.burning as u64;
        let trees_burned = after.burned as u64;
        let trees_remaining = after.remaining() as u64;

        // Net change in live trees; cells that were burning have already
        // left the live pool, so only live-to-live is compared. Same-step
        // ignitions are not added back, hence the floor.
        let live_now = after.live_trees() as u64;
        let live_prev = before.live_trees() as u64;
        let trees_grown = live_now.saturating_sub(live_prev);

        // Burned lasts exactly one step, so every Burned cell is new
        self.trees_burned_total += trees_burned;
        self.trees_grown_total += trees_grown;

        StepStatistics {
            step,
            trees_burning,
            trees_burned,
            trees_remaining,
            trees_grown,
            initial_trees: self.initial_trees,
            trees_burned_total: self.trees_burned_total,
            trees_grown_total: self.trees_grown_total,
            burning_percent: percent(trees_burning, trees_remaining),
            burned_percent: percent(
                self.trees_burned_total,
                self.initial_trees + self.trees_grown_total,
            ),
        }
    }

    /// Live trees in the initial forest
    pub const fn initial_trees(&self) -> u64 {
        self.initial_trees
    }

    /// Cumulative burned-out trees
    pub const fn trees_burned_total(&self) -> u64 {
        self.trees_burned_total
    }

    /// Cumulative grown trees
    pub const fn trees_grown_total(&self) -> u64 {
        self.trees_grown_total
    }
}

/// `part / whole * 100` rounded to two decimals, or 0 for an empty whole
#[must_use]
pub fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round2(part as f64 / whole as f64 * 100.0)
}

#[inline]
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn counts(tree_a: usize, tree_b: usize, burning: usize, burned: usize) -> CellCounts {
        CellCounts {
            empty: 0,
            tree_a,
            tree_b,
            burning,
            burned,
        }
    }

    #[test]
    fn test_percent_guards_zero_denominator() {
        assert_eq!(percent(0, 0), 0.0);
        assert_eq!(percent(5, 0), 0.0);
    }

    #[test]
    fn test_percent_rounds_to_two_decimals() {
        assert_relative_eq!(percent(1, 3), 33.33);
        assert_relative_eq!(percent(2, 3), 66.67);
        assert_relative_eq!(percent(1, 8), 12.5);
        assert_relative_eq!(percent(4, 4), 100.0);
    }

    #[test]
    fn test_initial_trees_counts_only_live() {
        let stats = RunningStats::new(&counts(30, 20, 1, 4));
        assert_eq!(stats.initial_trees(), 50);
        assert_eq!(stats.trees_burned_total(), 0);
        assert_eq!(stats.trees_grown_total(), 0);
    }

    #[test]
    fn test_record_basic_counts() {
        let mut stats = RunningStats::new(&counts(50, 50, 0, 0));
        let before = counts(50, 49, 1, 0);
        let after = counts(48, 48, 3, 1);
        let record = stats.record(1, &before, &after);

        assert_eq!(record.step, 1);
        assert_eq!(record.trees_burning, 3);
        assert_eq!(record.trees_burned, 1);
        assert_eq!(record.trees_remaining, 99);
        assert_eq!(record.trees_grown, 0);
        assert_eq!(record.trees_burned_total, 1);
        assert_relative_eq!(record.burning_percent, 3.03);
        assert_relative_eq!(record.burned_percent, 1.0);
    }

    #[test]
    fn test_grown_is_floored_at_zero() {
        // Three ignitions and one growth: net live change is -2, reported as 0
        let mut stats = RunningStats::new(&counts(10, 10, 0, 0));
        let record = stats.record(1, &counts(10, 10, 0, 0), &counts(9, 8, 3, 0));
        assert_eq!(record.trees_grown, 0);
        assert_eq!(stats.trees_grown_total(), 0);
    }

    #[test]
    fn test_grown_counts_net_live_increase() {
        let mut stats = RunningStats::new(&counts(5, 5, 0, 0));
        let record = stats.record(4, &counts(5, 5, 0, 0), &counts(7, 6, 0, 0));
        assert_eq!(record.trees_grown, 3);
        assert_eq!(record.trees_grown_total, 3);
        // Denominator for burned% includes grown trees
        let record = stats.record(5, &counts(7, 6, 0, 0), &counts(7, 6, 0, 13));
        assert_relative_eq!(record.burned_percent, 100.0);
    }

    #[test]
    fn test_cumulative_counters_never_decrease() {
        let mut stats = RunningStats::new(&counts(40, 40, 0, 0));
        let sequence = [
            counts(40, 39, 1, 0),
            counts(38, 38, 3, 1),
            counts(37, 36, 2, 3),
            counts(38, 36, 0, 2),
            counts(39, 37, 0, 0),
        ];
        let mut last_burned = 0;
        let mut last_grown = 0;
        for (i, pair) in sequence.windows(2).enumerate() {
            let record = stats.record(i as u32 + 1, &pair[0], &pair[1]);
            assert!(record.trees_burned_total >= last_burned);
            assert!(record.trees_grown_total >= last_grown);
            last_burned = record.trees_burned_total;
            last_grown = record.trees_grown_total;
        }
        assert_eq!(last_burned, 6);
        assert_eq!(last_grown, 3);
    }

    #[test]
    fn test_empty_forest_reports_zero_percentages() {
        let mut stats = RunningStats::new(&CellCounts::default());
        let record = stats.record(1, &CellCounts::default(), &CellCounts::default());
        assert_eq!(record.burning_percent, 0.0);
        assert_eq!(record.burned_percent, 0.0);
    }

    #[test]
    fn test_display_contains_counts() {
        let mut stats = RunningStats::new(&counts(2, 2, 0, 0));
        let record = stats.record(7, &counts(2, 1, 1, 0), &counts(1, 1, 1, 1));
        let line = record.to_string();
        assert!(line.contains("step    7"));
        assert!(line.contains("burning      1"));
    }
}
