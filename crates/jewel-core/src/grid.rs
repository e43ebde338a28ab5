//! Fixed-size tile lattice.
//!
//! The grid stores a playability flag per cell plus an optional occupant.
//! Columns grow left to right, rows grow bottom to top; gravity pulls
//! toward row 0. Holes (unplayable cells) never hold a tile.

use crate::level::InvariantViolation;
use crate::tile::Tile;
use serde::{Deserialize, Serialize};

/// Default board width used by the stock levels
pub const DEFAULT_COLUMNS: usize = 9;
/// Default board height used by the stock levels
pub const DEFAULT_ROWS: usize = 9;

/// Storage and raw manipulation of the tile lattice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    columns: usize,
    rows: usize,
    /// Row-major playability flags
    playable: Vec<bool>,
    /// Row-major occupants
    tiles: Vec<Option<Tile>>,
}

impl Grid {
    /// Create an empty grid with the given playability layout (row-major, row 0 first).
    ///
    /// Panics if `playable` does not hold exactly `columns * rows` flags.
    pub fn with_layout(columns: usize, rows: usize, playable: Vec<bool>) -> Self {
        assert_eq!(
            playable.len(),
            columns * rows,
            "layout must have one flag per cell"
        );
        Self {
            columns,
            rows,
            playable,
            tiles: vec![None; columns * rows],
        }
    }

    /// Create an empty grid where every cell is playable
    pub fn rectangular(columns: usize, rows: usize) -> Self {
        Self::with_layout(columns, rows, vec![true; columns * rows])
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    fn idx(&self, column: usize, row: usize) -> usize {
        row * self.columns + column
    }

    pub fn in_bounds(&self, column: usize, row: usize) -> bool {
        column < self.columns && row < self.rows
    }

    /// Whether a cell may hold a tile. Out-of-range cells are never playable.
    pub fn is_playable(&self, column: usize, row: usize) -> bool {
        self.in_bounds(column, row) && self.playable[self.idx(column, row)]
    }

    /// The occupant of a cell, `None` for empty, hole or out-of-range cells
    pub fn tile_at(&self, column: usize, row: usize) -> Option<&Tile> {
        if self.in_bounds(column, row) {
            self.tiles[self.idx(column, row)].as_ref()
        } else {
            None
        }
    }

    pub(crate) fn tile_at_mut(&mut self, column: usize, row: usize) -> Option<&mut Tile> {
        if self.in_bounds(column, row) {
            let i = self.idx(column, row);
            self.tiles[i].as_mut()
        } else {
            None
        }
    }

    /// Store a tile at its own coordinates, returning whatever was there.
    ///
    /// Overwrites silently. Tiles outside the grid are dropped.
    pub fn place_tile(&mut self, tile: Tile) -> Option<Tile> {
        if !self.in_bounds(tile.column, tile.row) {
            return None;
        }
        let i = self.idx(tile.column, tile.row);
        self.tiles[i].replace(tile)
    }

    /// Clear a cell, returning its previous occupant
    pub fn remove_tile(&mut self, column: usize, row: usize) -> Option<Tile> {
        if !self.in_bounds(column, row) {
            return None;
        }
        let i = self.idx(column, row);
        self.tiles[i].take()
    }

    /// Remove every tile, keeping the layout
    pub fn clear(&mut self) {
        self.tiles.iter_mut().for_each(|t| *t = None);
    }

    /// Exchange the occupants of two cells, updating their coordinates
    pub(crate) fn swap_cells(&mut self, a: (usize, usize), b: (usize, usize)) {
        let mut tile_a = self.remove_tile(a.0, a.1);
        let mut tile_b = self.remove_tile(b.0, b.1);
        if let Some(t) = tile_a.as_mut() {
            t.column = b.0;
            t.row = b.1;
        }
        if let Some(t) = tile_b.as_mut() {
            t.column = a.0;
            t.row = a.1;
        }
        if let Some(t) = tile_a {
            self.place_tile(t);
        }
        if let Some(t) = tile_b {
            self.place_tile(t);
        }
    }

    /// All tiles, rows bottom to top, columns left to right within a row
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().filter_map(|t| t.as_ref())
    }

    /// All playable cells in scan order
    pub fn playable_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.rows)
            .flat_map(move |row| (0..self.columns).map(move |column| (column, row)))
            .filter(move |&(column, row)| self.is_playable(column, row))
    }

    /// Number of tiles currently on the grid
    pub fn tile_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_some()).count()
    }

    /// Rows of playable, unoccupied cells in one column, bottom to top
    pub fn empty_cells_in_column(&self, column: usize) -> Vec<usize> {
        (0..self.rows)
            .filter(|&row| self.is_playable(column, row) && self.tile_at(column, row).is_none())
            .collect()
    }

    /// Let the tiles of one column fall toward row 0.
    ///
    /// Surviving tiles keep their relative order and are packed into the
    /// lowest playable cells. Holes are skipped: they never receive a tile
    /// and do not stop tiles above them from falling past. Returns the tiles
    /// that changed row, bottom to top.
    pub fn compact_column(&mut self, column: usize) -> Vec<Tile> {
        if column >= self.columns {
            return Vec::new();
        }

        let slots: Vec<usize> = (0..self.rows)
            .filter(|&row| self.is_playable(column, row))
            .collect();

        let survivors: Vec<Tile> = slots
            .iter()
            .filter_map(|&row| self.remove_tile(column, row))
            .collect();

        let mut moved = Vec::new();
        for (mut tile, &row) in survivors.into_iter().zip(slots.iter()) {
            let fell = tile.row != row;
            tile.row = row;
            if fell {
                moved.push(tile.clone());
            }
            self.place_tile(tile);
        }
        moved
    }

    /// Check that storage agrees with the playability layout and that
    /// every tile knows where it lives.
    pub fn verify(&self) -> Result<(), InvariantViolation> {
        for row in 0..self.rows {
            for column in 0..self.columns {
                let Some(tile) = self.tile_at(column, row) else {
                    continue;
                };
                if !self.is_playable(column, row) {
                    return Err(InvariantViolation::TileOnHole { column, row });
                }
                if tile.position() != (column, row) {
                    return Err(InvariantViolation::MisplacedTile { column, row });
                }
                if !tile.tile_type().is_live() {
                    return Err(InvariantViolation::UnknownTile { column, row });
                }
            }
        }
        Ok(())
    }

    /// Like [`Grid::verify`], additionally requiring every playable cell to be occupied
    pub fn verify_full(&self) -> Result<(), InvariantViolation> {
        self.verify()?;
        match self
            .playable_cells()
            .find(|&(column, row)| self.tile_at(column, row).is_none())
        {
            Some((column, row)) => Err(InvariantViolation::UnfilledCell { column, row }),
            None => Ok(()),
        }
    }
}
