//! Detected runs of three or more same-typed tiles.

use crate::tile::{Tile, TileType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum run length that counts as a chain
pub const MIN_CHAIN_LENGTH: usize = 3;

/// Axis a chain runs along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChainKind {
    /// Left to right along a row
    Horizontal,
    /// Bottom to top along a column
    Vertical,
}

/// A maximal run of same-typed tiles along one axis.
///
/// Tiles are ordered left to right (horizontal) or bottom to top
/// (vertical). Two chains crossing in an L or T shape both hold the
/// shared tile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chain {
    kind: ChainKind,
    tiles: Vec<Tile>,
    /// Points awarded for this chain, filled in when it is removed
    pub score: u32,
}

impl Chain {
    pub fn new(kind: ChainKind) -> Self {
        Self {
            kind,
            tiles: Vec::new(),
            score: 0,
        }
    }

    pub fn add_tile(&mut self, tile: Tile) {
        self.tiles.push(tile);
    }

    pub fn kind(&self) -> ChainKind {
        self.kind
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn first_tile(&self) -> Option<&Tile> {
        self.tiles.first()
    }

    pub fn last_tile(&self) -> Option<&Tile> {
        self.tiles.last()
    }

    /// The shared type of the chain's tiles
    pub fn tile_type(&self) -> Option<TileType> {
        self.tiles.first().map(|t| t.tile_type())
    }

    pub fn contains(&self, tile: &Tile) -> bool {
        self.tiles.contains(tile)
    }
}

/// Chains compare by axis and member cells; the score is not part of identity.
impl PartialEq for Chain {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.tiles == other.tiles
    }
}

impl Eq for Chain {}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type:{:?} tiles:[", self.kind)?;
        for (i, tile) in self.tiles.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", tile)?;
        }
        f.write_str("]")
    }
}
