//! Automatic players for Jewelry.
//!
//! Bots pick among the swaps the level reports as possible:
//! - Easy: a random possible swap
//! - Greedy: the swap whose immediate chains score the most
//!
//! The same machinery backs hint requests.

use crate::level::Level;
use crate::swap::Swap;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

/// Bot difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BotDifficulty {
    Easy,
    Greedy,
}

/// A bot player that can decide on swaps
pub struct Bot {
    pub difficulty: BotDifficulty,
    rng: StdRng,
}

impl Bot {
    pub fn new(difficulty: BotDifficulty) -> Self {
        Self {
            difficulty,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(difficulty: BotDifficulty, seed: u64) -> Self {
        Self {
            difficulty,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Choose a swap, or `None` if the board offers none
    pub fn choose_swap<R: Rng>(&mut self, level: &Level<R>) -> Option<Swap> {
        let swaps = level.detect_possible_swaps();
        if swaps.is_empty() {
            return None;
        }

        match self.difficulty {
            BotDifficulty::Easy => swaps.choose(&mut self.rng).cloned(),
            BotDifficulty::Greedy => best_swap(level, swaps),
        }
    }
}

/// The possible swap with the highest first-pass score; earliest in scan order on ties
pub fn best_swap<R: Rng>(level: &Level<R>, swaps: Vec<Swap>) -> Option<Swap> {
    let mut best: Option<(u32, Swap)> = None;
    for swap in swaps {
        let score: u32 = match level.preview_swap(&swap) {
            Ok(chains) => chains.iter().map(|c| c.score).sum(),
            Err(_) => continue,
        };
        if best.as_ref().map_or(true, |(s, _)| score > *s) {
            best = Some((score, swap));
        }
    }
    best.map(|(_, swap)| swap)
}

/// Suggest a swap to the player
pub fn hint<R: Rng>(level: &Level<R>) -> Option<Swap> {
    best_swap(level, level.detect_possible_swaps())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::LevelDescriptor;
    use crate::tile::TileType::*;

    #[test]
    fn test_bots_pick_possible_swaps() {
        let level = Level::with_seed(&LevelDescriptor::rectangular(9, 9, 1000, 20), 21).unwrap();
        for difficulty in [BotDifficulty::Easy, BotDifficulty::Greedy] {
            let mut bot = Bot::with_seed(difficulty, 1);
            let swap = bot.choose_swap(&level).expect("fresh board has a move");
            assert!(level.is_possible_swap(&swap));
        }
    }

    #[test]
    fn test_greedy_prefers_longer_chain() {
        // Row 0: Sun Sun Moon Sun Sun -> swapping the Moon up with a Sun
        // above makes five in a row, worth more than any three.
        let descriptor = LevelDescriptor::rectangular(5, 3, 1000, 20)
            .with_preset(0, 0, Sun)
            .with_preset(1, 0, Sun)
            .with_preset(2, 0, Moon)
            .with_preset(3, 0, Sun)
            .with_preset(4, 0, Sun)
            .with_preset(0, 1, Earth)
            .with_preset(1, 1, Mars)
            .with_preset(2, 1, Sun)
            .with_preset(3, 1, Mars)
            .with_preset(4, 1, Earth)
            .with_preset(0, 2, Ceres)
            .with_preset(1, 2, Uranus)
            .with_preset(2, 2, Saturn)
            .with_preset(3, 2, Uranus)
            .with_preset(4, 2, Ceres);
        let level = Level::with_seed(&descriptor, 0).unwrap();

        let swap = hint(&level).unwrap();
        assert_eq!(swap.cells(), ((2, 0), (2, 1)));
        let chains = level.preview_swap(&swap).unwrap();
        assert_eq!(chains[0].len(), 5);
    }
}
