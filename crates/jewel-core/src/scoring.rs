//! Scoring rules and engine tuning knobs.

use crate::chain::{Chain, MIN_CHAIN_LENGTH};
use serde::{Deserialize, Serialize};

/// How chains turn into points.
///
/// A chain is worth `points_per_tile * (length - 2) * multiplier`, where the
/// multiplier starts at 1 for the first removal pass of a move and grows by
/// `combo_step` with every cascade pass after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub points_per_tile: u32,
    pub combo_step: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            points_per_tile: 60,
            combo_step: 1,
        }
    }
}

impl ScoringConfig {
    /// Multiplier for a removal pass (0 = the pass triggered by the swap itself)
    pub fn multiplier(&self, depth: u32) -> u32 {
        1u32.saturating_add(depth.saturating_mul(self.combo_step))
    }

    /// Points for a chain of `length` tiles removed at cascade `depth`
    pub fn chain_score(&self, length: usize, depth: u32) -> u32 {
        let extra = length.saturating_sub(MIN_CHAIN_LENGTH - 1) as u32;
        self.points_per_tile
            .saturating_mul(extra)
            .saturating_mul(self.multiplier(depth))
    }

    /// Fill in `score` on every chain and return the pass total.
    ///
    /// A tile shared by two chains counts toward both.
    pub fn score_chains(&self, chains: &mut [Chain], depth: u32) -> u32 {
        chains.iter_mut().fold(0u32, |total, chain| {
            chain.score = self.chain_score(chain.len(), depth);
            total.saturating_add(chain.score)
        })
    }
}

/// Engine limits and behaviour switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Removal passes allowed per move before the engine gives up
    pub max_cascade_depth: u32,
    /// Redraws per cell while generating a board without chains
    pub max_redraws_per_cell: u32,
    /// Whole-board regenerations while looking for a board with a possible swap
    pub max_shuffle_attempts: u32,
    /// Regenerate the board when a move leaves no possible swap
    pub reshuffle_when_stuck: bool,
    pub scoring: ScoringConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_cascade_depth: 32,
            max_redraws_per_cell: 16,
            max_shuffle_attempts: 100,
            reshuffle_when_stuck: true,
            scoring: ScoringConfig::default(),
        }
    }
}
