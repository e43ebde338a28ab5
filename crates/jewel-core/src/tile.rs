//! Tile types and the tiles that occupy grid cells.
//!
//! This module contains:
//! - The planet-themed tile catalog and its uniform random distribution
//! - `Tile`, a typed piece whose identity is its grid cell
//! - `PresentationHandle`, an opaque slot the renderer fills in

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Tile kinds - planet themed!
///
/// `Unknown` is a reserved sentinel. It is never drawn by the random
/// distribution and never sits on a live tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TileType {
    Unknown = 0,
    Earth = 1,
    Ceres = 2,
    Mars = 3,
    Moon = 4,
    Sun = 5,
    Uranus = 6,
    Saturn = 7,
}

impl TileType {
    /// Every type the random distribution can produce
    pub const ALL: [TileType; 7] = [
        TileType::Earth,
        TileType::Ceres,
        TileType::Mars,
        TileType::Moon,
        TileType::Sun,
        TileType::Uranus,
        TileType::Saturn,
    ];

    /// Look up a type by its descriptor value (1-7). 0 and anything above 7 yield `None`.
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            1..=7 => Some(Self::ALL[(index - 1) as usize]),
            _ => None,
        }
    }

    /// Descriptor value of this type
    pub fn index(&self) -> u8 {
        *self as u8
    }

    /// Draw a type uniformly from the distribution
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    /// Sprite identifier for the rendering layer
    pub fn sprite_name(&self) -> &'static str {
        match self {
            TileType::Unknown => "Unknown",
            TileType::Earth => "Earth",
            TileType::Ceres => "Ceres",
            TileType::Mars => "Mars",
            TileType::Moon => "Moon",
            TileType::Sun => "Sun",
            TileType::Uranus => "Uranus",
            TileType::Saturn => "Saturn",
        }
    }

    /// Sprite identifier used while the tile is selected
    pub fn highlighted_sprite_name(&self) -> String {
        format!("{}-Highlighted", self.sprite_name())
    }

    /// Whether this type may appear on a live tile
    pub fn is_live(&self) -> bool {
        *self != TileType::Unknown
    }
}

impl fmt::Display for TileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sprite_name())
    }
}

/// Opaque reference the rendering collaborator attaches to a tile.
///
/// The engine carries it along when a tile falls and never looks inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresentationHandle(pub u64);

/// A typed piece on the grid.
///
/// Equality and hashing use only `(column, row)`: two tiles on the same
/// cell are the same tile regardless of type. Chains rely on this to
/// deduplicate shared tiles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tile {
    /// Column, increasing left to right
    pub column: usize,
    /// Row, increasing bottom to top
    pub row: usize,
    tile_type: TileType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    handle: Option<PresentationHandle>,
}

impl Tile {
    pub fn new(column: usize, row: usize, tile_type: TileType) -> Self {
        Self {
            column,
            row,
            tile_type,
            handle: None,
        }
    }

    pub fn tile_type(&self) -> TileType {
        self.tile_type
    }

    pub fn handle(&self) -> Option<PresentationHandle> {
        self.handle
    }

    pub fn set_handle(&mut self, handle: Option<PresentationHandle>) {
        self.handle = handle;
    }

    /// The cell this tile occupies
    pub fn position(&self) -> (usize, usize) {
        (self.column, self.row)
    }

    /// Whether `other` sits on an orthogonally neighbouring cell
    pub fn is_adjacent_to(&self, other: &Tile) -> bool {
        self.column.abs_diff(other.column) + self.row.abs_diff(other.row) == 1
    }
}

impl PartialEq for Tile {
    fn eq(&self, other: &Self) -> bool {
        self.column == other.column && self.row == other.row
    }
}

impl Eq for Tile {}

impl Hash for Tile {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.column.hash(state);
        self.row.hash(state);
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type:{} square:({},{})", self.tile_type, self.column, self.row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_random_never_yields_unknown() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = HashSet::new();
        for _ in 0..2000 {
            let t = TileType::random(&mut rng);
            assert!(t.is_live());
            seen.insert(t);
        }
        // Uniform draw over 7 kinds should hit every one of them
        assert_eq!(seen.len(), TileType::ALL.len());
    }

    #[test]
    fn test_from_index() {
        assert_eq!(TileType::from_index(0), None);
        assert_eq!(TileType::from_index(3), Some(TileType::Mars));
        assert_eq!(TileType::from_index(7), Some(TileType::Saturn));
        assert_eq!(TileType::from_index(8), None);
        for t in TileType::ALL {
            assert_eq!(TileType::from_index(t.index()), Some(t));
        }
    }

    #[test]
    fn test_sprite_names() {
        assert_eq!(TileType::Mars.sprite_name(), "Mars");
        assert_eq!(TileType::Sun.highlighted_sprite_name(), "Sun-Highlighted");
    }

    #[test]
    fn test_identity_is_position_only() {
        let a = Tile::new(2, 3, TileType::Mars);
        let b = Tile::new(2, 3, TileType::Moon);
        let c = Tile::new(3, 2, TileType::Mars);
        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<Tile> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_adjacency() {
        let t = Tile::new(4, 4, TileType::Earth);
        assert!(t.is_adjacent_to(&Tile::new(5, 4, TileType::Earth)));
        assert!(t.is_adjacent_to(&Tile::new(4, 3, TileType::Earth)));
        assert!(!t.is_adjacent_to(&Tile::new(5, 5, TileType::Earth)));
        assert!(!t.is_adjacent_to(&Tile::new(4, 4, TileType::Earth)));
        assert!(!t.is_adjacent_to(&Tile::new(6, 4, TileType::Earth)));
    }
}
