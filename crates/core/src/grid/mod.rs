//! Grid state for the forest automaton

pub mod forest_grid;

// Re-export main types
pub use forest_grid::{CellCounts, ForestGrid, GridError};
