//! Level descriptors: the static layout a level starts from.
//!
//! Descriptors are JSON documents of the form
//!
//! ```json
//! {
//!   "tiles": [[0, 1, 1], [1, 1, 1], [1, 1, 0]],
//!   "targetScore": 1000,
//!   "moves": 15,
//!   "cookies": [[0, 3, 0], [0, 0, 0], [0, 0, 0]]
//! }
//! ```
//!
//! Lines are listed top row first. In `tiles`, 1 marks a playable cell and
//! 0 a hole. The optional `cookies` array pre-places tiles: 0 leaves the cell
//! to the random generator, 1-7 picks a [`TileType`].

use crate::chain::MIN_CHAIN_LENGTH;
use crate::tile::TileType;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use thiserror::Error;

/// Errors found while loading or validating a descriptor
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum DescriptorError {
    #[error("Could not read level file: {0}")]
    Io(String),

    #[error("Level file is not valid JSON: {0}")]
    Json(String),

    #[error("Level layout is empty")]
    EmptyLayout,

    #[error("Layout line {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Cell ({column}, {row}) has flag {value}, expected 0 or 1")]
    InvalidCellFlag { column: usize, row: usize, value: u8 },

    #[error("Cell ({column}, {row}) has unknown tile type {value}")]
    InvalidTileType { column: usize, row: usize, value: u8 },

    #[error("Cell ({column}, {row}) is a hole but has a pre-placed tile")]
    PresetOnHole { column: usize, row: usize },

    #[error("Pre-placed tiles do not match the layout dimensions")]
    PresetShape,

    #[error("Level has no playable cells")]
    NoPlayableCells,

    #[error("Pre-placed tiles already form a chain starting at ({column}, {row})")]
    PresetChain { column: usize, row: usize },

    #[error("Level must allow at least one move")]
    ZeroMoves,
}

impl From<serde_json::Error> for DescriptorError {
    fn from(e: serde_json::Error) -> Self {
        DescriptorError::Json(e.to_string())
    }
}

impl From<std::io::Error> for DescriptorError {
    fn from(e: std::io::Error) -> Self {
        DescriptorError::Io(e.to_string())
    }
}

/// Raw level description as found in a level file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelDescriptor {
    /// Playability flags, top line first
    pub tiles: Vec<Vec<u8>>,
    /// Score needed to win
    pub target_score: u32,
    /// Number of swaps the player gets
    pub moves: u32,
    /// Optional pre-placed tile types, top line first
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookies: Option<Vec<Vec<u8>>>,
}

/// Validated layout, in grid coordinates (row 0 at the bottom)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelLayout {
    pub columns: usize,
    pub rows: usize,
    /// Row-major, row 0 first
    pub playable: Vec<bool>,
    /// Row-major, row 0 first
    pub presets: Vec<Option<TileType>>,
    pub target_score: u32,
    pub moves: u32,
}

impl LevelLayout {
    pub fn preset_at(&self, column: usize, row: usize) -> Option<TileType> {
        self.presets.get(row * self.columns + column).copied().flatten()
    }
}

impl LevelDescriptor {
    /// A fully playable rectangle with no pre-placed tiles
    pub fn rectangular(columns: usize, rows: usize, target_score: u32, moves: u32) -> Self {
        Self {
            tiles: vec![vec![1; columns]; rows],
            target_score,
            moves,
            cookies: None,
        }
    }

    /// Parse a descriptor from JSON text
    pub fn from_json(json: &str) -> Result<Self, DescriptorError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a descriptor from any reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DescriptorError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Read and parse a level file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DescriptorError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn columns(&self) -> usize {
        self.tiles.first().map_or(0, |line| line.len())
    }

    pub fn rows(&self) -> usize {
        self.tiles.len()
    }

    /// Descriptor line holding grid row `row`, if the cell is inside the layout
    fn line_for_cell(&self, column: usize, row: usize) -> Option<usize> {
        if column < self.columns() && row < self.rows() {
            Some(self.rows() - 1 - row)
        } else {
            None
        }
    }

    /// Mark a cell as a hole. Cells outside the layout are ignored.
    pub fn with_hole(mut self, column: usize, row: usize) -> Self {
        if let Some(line) = self.line_for_cell(column, row) {
            if let Some(flag) = self.tiles[line].get_mut(column) {
                *flag = 0;
            }
        }
        self
    }

    /// Pre-place a tile type at a cell (grid coordinates). Cells outside the
    /// layout are ignored.
    pub fn with_preset(mut self, column: usize, row: usize, tile_type: TileType) -> Self {
        let (columns, rows) = (self.columns(), self.rows());
        let Some(line) = self.line_for_cell(column, row) else {
            return self;
        };
        let cookies = self
            .cookies
            .get_or_insert_with(|| vec![vec![0; columns]; rows]);
        if let Some(cell) = cookies.get_mut(line).and_then(|l| l.get_mut(column)) {
            *cell = tile_type.index();
        }
        self
    }

    /// Check the descriptor and convert it to grid coordinates
    pub fn validate(&self) -> Result<LevelLayout, DescriptorError> {
        let rows = self.rows();
        let columns = self.columns();
        if rows == 0 || columns == 0 {
            return Err(DescriptorError::EmptyLayout);
        }
        if self.moves == 0 {
            return Err(DescriptorError::ZeroMoves);
        }

        let mut playable = vec![false; columns * rows];
        for (line_idx, line) in self.tiles.iter().enumerate() {
            if line.len() != columns {
                return Err(DescriptorError::RaggedRow {
                    row: line_idx,
                    expected: columns,
                    found: line.len(),
                });
            }
            let row = rows - 1 - line_idx;
            for (column, &value) in line.iter().enumerate() {
                playable[row * columns + column] = match value {
                    0 => false,
                    1 => true,
                    _ => return Err(DescriptorError::InvalidCellFlag { column, row, value }),
                };
            }
        }

        if !playable.iter().any(|&p| p) {
            return Err(DescriptorError::NoPlayableCells);
        }

        let mut presets = vec![None; columns * rows];
        if let Some(cookies) = &self.cookies {
            if cookies.len() != rows || cookies.iter().any(|line| line.len() != columns) {
                return Err(DescriptorError::PresetShape);
            }
            for (line_idx, line) in cookies.iter().enumerate() {
                let row = rows - 1 - line_idx;
                for (column, &value) in line.iter().enumerate() {
                    if value == 0 {
                        continue;
                    }
                    let tile_type = TileType::from_index(value)
                        .ok_or(DescriptorError::InvalidTileType { column, row, value })?;
                    if !playable[row * columns + column] {
                        return Err(DescriptorError::PresetOnHole { column, row });
                    }
                    presets[row * columns + column] = Some(tile_type);
                }
            }
        }

        let layout = LevelLayout {
            columns,
            rows,
            playable,
            presets,
            target_score: self.target_score,
            moves: self.moves,
        };
        check_preset_runs(&layout)?;
        Ok(layout)
    }
}

/// Reject pre-placed tiles that already line up three in a row
fn check_preset_runs(layout: &LevelLayout) -> Result<(), DescriptorError> {
    let at = |column: usize, row: usize| layout.preset_at(column, row);

    for row in 0..layout.rows {
        for column in 0..layout.columns {
            let Some(t) = at(column, row) else { continue };
            let horizontal = column + MIN_CHAIN_LENGTH <= layout.columns
                && (1..MIN_CHAIN_LENGTH).all(|i| at(column + i, row) == Some(t));
            let vertical = row + MIN_CHAIN_LENGTH <= layout.rows
                && (1..MIN_CHAIN_LENGTH).all(|i| at(column, row + i) == Some(t));
            if horizontal || vertical {
                return Err(DescriptorError::PresetChain { column, row });
            }
        }
    }
    Ok(())
}
