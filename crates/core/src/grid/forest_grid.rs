//! Square forest grid with clamped-boundary neighbour lookup
//!
//! The grid is a dense `N×N` matrix of [`CellState`] stored in row-major order
//! (`row * size + col`). It is replaced wholesale every simulation step; the
//! only in-place write is the one-off forced ignition done by the simulation
//! loop before its first update.

use crate::core_types::CellState;
use rand::Rng;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Errors raised when building a grid from external data
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// Grid side length was zero
    #[error("grid size must be greater than zero")]
    ZeroSize,
    /// Cell buffer does not hold `size * size` entries
    #[error("expected {expected} cells for a {size}x{size} grid, got {actual}")]
    LengthMismatch {
        size: usize,
        expected: usize,
        actual: usize,
    },
    /// A text row has a different width than the number of rows
    #[error("row {row} has {width} cells but the grid has {size} rows")]
    NotSquare { row: usize, width: usize, size: usize },
    /// Unrecognised character in a text grid
    #[error("unknown cell glyph {glyph:?} at row {row}, column {col}")]
    UnknownGlyph { glyph: char, row: usize, col: usize },
}

/// Per-state cell counts for one grid snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CellCounts {
    pub empty: usize,
    pub tree_a: usize,
    pub tree_b: usize,
    pub burning: usize,
    pub burned: usize,
}

impl CellCounts {
    /// Live (not burning) trees of either variant
    #[inline]
    #[must_use]
    pub const fn live_trees(&self) -> usize {
        self.tree_a + self.tree_b
    }

    /// Trees still standing: live trees plus burning ones
    #[inline]
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.tree_a + self.tree_b + self.burning
    }

    /// Total number of cells counted
    #[must_use]
    pub const fn total(&self) -> usize {
        self.empty + self.tree_a + self.tree_b + self.burning + self.burned
    }

    fn add(&mut self, state: CellState) {
        match state {
            CellState::Empty => self.empty += 1,
            CellState::TreeA => self.tree_a += 1,
            CellState::TreeB => self.tree_b += 1,
            CellState::Burning => self.burning += 1,
            CellState::Burned => self.burned += 1,
        }
    }
}

/// Square matrix of cell states
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForestGrid {
    /// Side length in cells
    size: usize,
    /// Cells in row-major order: `row * size + col`
    cells: Vec<CellState>,
}

impl ForestGrid {
    /// Create an all-empty grid
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero
    #[must_use]
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "grid size must be greater than zero");
        Self {
            size,
            cells: vec![CellState::Empty; size * size],
        }
    }

    /// Create a grid filled with a single state
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero
    #[must_use]
    pub fn filled(size: usize, state: CellState) -> Self {
        assert!(size > 0, "grid size must be greater than zero");
        Self {
            size,
            cells: vec![state; size * size],
        }
    }

    /// Build a grid from row-major cells
    ///
    /// # Errors
    ///
    /// Returns [`GridError::ZeroSize`] for a zero side length and
    /// [`GridError::LengthMismatch`] when `cells.len() != size * size`.
    pub fn from_cells(size: usize, cells: Vec<CellState>) -> Result<Self, GridError> {
        if size == 0 {
            return Err(GridError::ZeroSize);
        }
        let expected = size * size;
        if cells.len() != expected {
            return Err(GridError::LengthMismatch {
                size,
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self { size, cells })
    }

    /// Parse a grid from a glyph map, one row per line
    ///
    /// Glyphs follow [`CellState::glyph`]: `.` empty, `t`/`T` trees,
    /// `*` burning, `#` burned. Surrounding whitespace and blank lines are
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns [`GridError`] when the text is empty, not square, or contains
    /// an unknown glyph.
    pub fn parse(text: &str) -> Result<Self, GridError> {
        let rows: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let size = rows.len();
        if size == 0 {
            return Err(GridError::ZeroSize);
        }

        let mut cells = Vec::with_capacity(size * size);
        for (row, line) in rows.iter().enumerate() {
            let width = line.chars().count();
            if width != size {
                return Err(GridError::NotSquare { row, width, size });
            }
            for (col, glyph) in line.chars().enumerate() {
                let state = CellState::from_glyph(glyph)
                    .ok_or(GridError::UnknownGlyph { glyph, row, col })?;
                cells.push(state);
            }
        }

        Ok(Self { size, cells })
    }

    /// Generate the initial forest
    ///
    /// Each cell becomes a tree with probability `density`; the variant is
    /// picked by an independent fair coin. No cell starts burning or burned.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero
    pub fn random<R: Rng + ?Sized>(size: usize, density: f64, rng: &mut R) -> Self {
        assert!(size > 0, "grid size must be greater than zero");
        let cells = (0..size * size)
            .map(|_| {
                if rng.random::<f64>() < density {
                    CellState::tree_from_coin(rng.random_bool(0.5))
                } else {
                    CellState::Empty
                }
            })
            .collect();
        Self { size, cells }
    }

    /// Wrap an engine output buffer
    pub(crate) fn from_buffer(size: usize, cells: Vec<CellState>) -> Self {
        debug_assert_eq!(cells.len(), size * size, "engine buffer has wrong size");
        Self { size, cells }
    }

    /// Side length in cells
    #[inline]
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Total number of cells (`size²`)
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false: grids have at least one cell
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Row-major index of `(row, col)`
    #[inline]
    #[must_use]
    pub const fn index(&self, row: usize, col: usize) -> usize {
        row * self.size + col
    }

    /// `(row, col)` of a row-major index
    #[inline]
    #[must_use]
    pub const fn position(&self, index: usize) -> (usize, usize) {
        (index / self.size, index % self.size)
    }

    /// State at `(row, col)`
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds
    #[inline]
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> CellState {
        assert!(
            row < self.size && col < self.size,
            "Coordinates ({row}, {col}) out of bounds for {0}x{0} grid",
            self.size
        );
        self.cells[self.index(row, col)]
    }

    /// State at `(row, col)`, or `None` when out of bounds
    #[must_use]
    pub fn try_get(&self, row: usize, col: usize) -> Option<CellState> {
        (row < self.size && col < self.size).then(|| self.cells[self.index(row, col)])
    }

    /// The four orthogonal neighbours in order up, down, left, right
    ///
    /// Indices are clamped to the grid, not wrapped: on an edge the missing
    /// neighbour is the cell itself.
    #[inline]
    #[must_use]
    pub fn neighbors(&self, row: usize, col: usize) -> [CellState; 4] {
        let last = self.size - 1;
        let up = row.saturating_sub(1);
        let down = (row + 1).min(last);
        let left = col.saturating_sub(1);
        let right = (col + 1).min(last);
        [
            self.get(up, col),
            self.get(down, col),
            self.get(row, left),
            self.get(row, right),
        ]
    }

    /// Whether any clamped orthogonal neighbour is burning
    #[inline]
    #[must_use]
    pub fn has_burning_neighbor(&self, row: usize, col: usize) -> bool {
        self.neighbors(row, col).contains(&CellState::Burning)
    }

    /// Count cells per state
    #[must_use]
    pub fn counts(&self) -> CellCounts {
        let mut counts = CellCounts::default();
        for &state in &self.cells {
            counts.add(state);
        }
        counts
    }

    /// Row-major view of all cells
    #[must_use]
    pub fn cells(&self) -> &[CellState] {
        &self.cells
    }

    /// Iterate over rows, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[CellState]> {
        self.cells.chunks_exact(self.size)
    }

    /// Force a cell into the burning state
    pub(crate) fn ignite(&mut self, row: usize, col: usize) {
        let idx = self.index(row, col);
        self.cells[idx] = CellState::Burning;
    }
}

impl fmt::Display for ForestGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for state in row {
                write!(f, "{}", state.glyph())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
