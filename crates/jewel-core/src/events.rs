//! What a move produced, step by step.
//!
//! The engine resolves a move synchronously and hands the whole trace to
//! the rendering layer, which animates it at its own pace.

use crate::chain::Chain;
use crate::level::LevelStatus;
use crate::swap::Swap;
use crate::tile::Tile;
use serde::{Deserialize, Serialize};

/// Tiles of a single column, bottom to top
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnTiles {
    pub column: usize,
    pub tiles: Vec<Tile>,
}

/// One remove, fall and refill pass of a cascade
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeStep {
    /// 0 for the pass triggered directly by the swap
    pub depth: u32,
    /// Chains removed in this pass, horizontal ones first
    pub chains: Vec<Chain>,
    /// Tiles that fell, at their new positions
    pub fallen: Vec<ColumnTiles>,
    /// Tiles spawned into vacated cells
    pub spawned: Vec<ColumnTiles>,
    /// Points earned by this pass
    pub score: u32,
}

impl CascadeStep {
    /// Distinct tiles removed in this pass
    pub fn removed_tiles(&self) -> Vec<Tile> {
        let mut removed: Vec<Tile> = Vec::new();
        for tile in self.chains.iter().flat_map(|c| c.tiles()) {
            if !removed.contains(tile) {
                removed.push(tile.clone());
            }
        }
        removed
    }
}

/// Full result of an accepted swap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOutcome {
    pub swap: Swap,
    /// Cascade passes in order; never empty for an accepted swap
    pub steps: Vec<CascadeStep>,
    /// Points earned by this move
    pub score_gained: u32,
    /// Level score after the move
    pub score: u32,
    pub moves_left: u32,
    pub status: LevelStatus,
    /// New board, if the move left no possible swap and the engine reshuffled
    pub reshuffled: Option<Vec<Tile>>,
}

impl MoveOutcome {
    /// Number of chains removed across all passes
    pub fn chain_count(&self) -> usize {
        self.steps.iter().map(|s| s.chains.len()).sum()
    }

    /// Deepest cascade pass reached
    pub fn cascade_depth(&self) -> u32 {
        self.steps.last().map_or(0, |s| s.depth)
    }
}
