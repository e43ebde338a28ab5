//! Proposed exchanges of two neighbouring tiles.

use crate::tile::Tile;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// An unordered pair of tiles the player wants to exchange.
///
/// Like [`Tile`], a swap is identified by coordinates only, and
/// `Swap::new(a, b) == Swap::new(b, a)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Swap {
    pub tile_a: Tile,
    pub tile_b: Tile,
}

impl Swap {
    pub fn new(tile_a: Tile, tile_b: Tile) -> Self {
        Self { tile_a, tile_b }
    }

    /// Whether the two tiles are orthogonal neighbours (Manhattan distance 1)
    pub fn is_adjacent(&self) -> bool {
        self.tile_a.is_adjacent_to(&self.tile_b)
    }

    /// The two cells involved, ordered so that equal swaps yield equal keys
    pub fn cells(&self) -> ((usize, usize), (usize, usize)) {
        let a = self.tile_a.position();
        let b = self.tile_b.position();
        if (a.1, a.0) <= (b.1, b.0) {
            (a, b)
        } else {
            (b, a)
        }
    }

    /// Whether `tile` is one of the two swapped tiles
    pub fn involves(&self, tile: &Tile) -> bool {
        self.tile_a == *tile || self.tile_b == *tile
    }
}

impl PartialEq for Swap {
    fn eq(&self, other: &Self) -> bool {
        self.cells() == other.cells()
    }
}

impl Eq for Swap {}

impl Hash for Swap {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.cells().hash(state);
    }
}

impl fmt::Display for Swap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "swap {} with {}", self.tile_a, self.tile_b)
    }
}
