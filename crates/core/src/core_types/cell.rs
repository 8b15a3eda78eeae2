use serde::{Deserialize, Serialize};
use std::fmt;

/// State of a single forest cell
///
/// Every grid position holds exactly one of these five states. The two tree
/// variants only differ in how they are drawn; the transition rule treats
/// them identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum CellState {
    /// No vegetation
    #[default]
    Empty,
    /// Live tree, first variant
    TreeA,
    /// Live tree, second variant
    TreeB,
    /// Actively on fire
    Burning,
    /// Consumed by fire, decays to `Empty` on the next step
    Burned,
}

impl CellState {
    /// All states, in declaration order
    pub const ALL: [CellState; 5] = [
        CellState::Empty,
        CellState::TreeA,
        CellState::TreeB,
        CellState::Burning,
        CellState::Burned,
    ];

    /// Whether the cell holds a live (not burning) tree
    #[inline]
    #[must_use]
    pub const fn is_tree(self) -> bool {
        matches!(self, CellState::TreeA | CellState::TreeB)
    }

    /// Whether the cell counts towards the remaining tree population
    ///
    /// Burning cells are still counted; burned ones are not.
    #[inline]
    #[must_use]
    pub const fn is_remaining(self) -> bool {
        matches!(
            self,
            CellState::TreeA | CellState::TreeB | CellState::Burning
        )
    }

    /// Pick a tree variant from a fair coin flip
    #[inline]
    #[must_use]
    pub const fn tree_from_coin(heads: bool) -> Self {
        if heads {
            CellState::TreeA
        } else {
            CellState::TreeB
        }
    }

    /// Display colour as `[r, g, b]`
    ///
    /// Empty is white, the tree variants are green and dark green, burning
    /// cells are red and burned cells black.
    #[must_use]
    pub const fn rgb(self) -> [u8; 3] {
        match self {
            CellState::Empty => [255, 255, 255],
            CellState::TreeA => [34, 139, 34],
            CellState::TreeB => [0, 100, 0],
            CellState::Burning => [220, 20, 20],
            CellState::Burned => [0, 0, 0],
        }
    }

    /// Single-character text representation
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            CellState::Empty => '.',
            CellState::TreeA => 't',
            CellState::TreeB => 'T',
            CellState::Burning => '*',
            CellState::Burned => '#',
        }
    }

    /// Inverse of [`CellState::glyph`]
    #[must_use]
    pub const fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '.' => Some(CellState::Empty),
            't' => Some(CellState::TreeA),
            'T' => Some(CellState::TreeB),
            '*' => Some(CellState::Burning),
            '#' => Some(CellState::Burned),
            _ => None,
        }
    }
}

impl fmt::Display for CellState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CellState::Empty => "empty",
            CellState::TreeA => "tree-a",
            CellState::TreeB => "tree-b",
            CellState::Burning => "burning",
            CellState::Burned => "burned",
        };
        f.write_str(name)
    }
}
