//! Integration tests for the Jewelry engine.
//!
//! These tests exercise whole boards and whole levels: generation,
//! swap legality, chain detection, gravity and cascades.

use jewel_core::TileType::*;
use jewel_core::*;
use pretty_assertions::assert_eq;
use std::collections::HashSet;

const LEVELS_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../levels");

fn load_level(number: u32) -> LevelDescriptor {
    LevelDescriptor::load(format!("{}/level_{}.json", LEVELS_DIR, number))
        .expect("stock level should load")
}

/// Build a fully pre-placed descriptor. `lines` are given top row first.
fn preset_level(lines: &[&[TileType]]) -> LevelDescriptor {
    let rows = lines.len();
    let columns = lines[0].len();
    let mut descriptor = LevelDescriptor::rectangular(columns, rows, 100_000, 30);
    for (line_idx, line) in lines.iter().enumerate() {
        for (column, &t) in line.iter().enumerate() {
            descriptor = descriptor.with_preset(column, rows - 1 - line_idx, t);
        }
    }
    descriptor
}

/// Every right/up neighbour pair on the board
fn neighbour_swaps(level: &Level) -> Vec<Swap> {
    let mut swaps = Vec::new();
    for tile in level.tiles() {
        let (c, r) = tile.position();
        for (nc, nr) in [(c + 1, r), (c, r + 1)] {
            if let Some(other) = level.tile_at(nc, nr) {
                swaps.push(Swap::new(tile.clone(), other.clone()));
            }
        }
    }
    swaps
}

/// Handles of a column's tiles, bottom to top
fn column_handles(level: &Level, column: usize) -> Vec<u64> {
    (0..level.rows())
        .filter_map(|row| level.tile_at(column, row))
        .filter_map(|t| t.handle().map(|h| h.0))
        .collect()
}

fn tag_untagged_tiles(level: &mut Level, next_id: &mut u64) {
    for tile in level.tiles() {
        if tile.handle().is_none() {
            level.attach_handle(tile.column, tile.row, PresentationHandle(*next_id));
            *next_id += 1;
        }
    }
}

#[test]
fn test_stock_levels_load() {
    for number in 0..3 {
        let descriptor = load_level(number);
        let level = Level::with_seed(&descriptor, number as u64).unwrap();
        assert_eq!(level.columns(), 9);
        assert_eq!(level.rows(), 9);
        assert!(level.grid().verify_full().is_ok());
    }

    // Level 2 pre-places two Suns in its middle row
    let level = Level::with_seed(&load_level(2), 0).unwrap();
    assert_eq!(level.tile_at(2, 4).map(|t| t.tile_type()), Some(Sun));
    assert_eq!(level.tile_at(6, 4).map(|t| t.tile_type()), Some(Sun));
}

#[test]
fn test_initial_boards_never_contain_chains() {
    for number in 0..3 {
        let descriptor = load_level(number);
        for seed in 0..40 {
            let level = Level::with_seed(&descriptor, seed).unwrap();
            assert!(
                level.detect_chains().is_empty(),
                "level {} seed {} starts with a chain",
                number,
                seed
            );
            assert!(level.has_possible_swaps());
        }
    }
}

#[test]
fn test_non_adjacent_swaps_are_never_possible() {
    let level = Level::with_seed(&load_level(0), 5).unwrap();
    let tiles = level.tiles();
    for a in tiles.iter().step_by(7) {
        for b in &tiles {
            let distance = a.column.abs_diff(b.column) + a.row.abs_diff(b.row);
            if distance != 1 {
                assert!(!level.is_possible_swap(&Swap::new(a.clone(), b.clone())));
            }
        }
    }
}

#[test]
fn test_possible_swaps_are_sound_and_complete() {
    for seed in 0..20 {
        let level = Level::with_seed(&load_level(1), seed).unwrap();
        let detected: HashSet<Swap> = level.detect_possible_swaps().into_iter().collect();

        for swap in neighbour_swaps(&level) {
            let possible = level.is_possible_swap(&swap);
            let chains = level.preview_swap(&swap).unwrap();
            assert_eq!(possible, detected.contains(&swap));

            if possible {
                assert!(
                    chains
                        .iter()
                        .any(|c| c.contains(&swap.tile_a) || c.contains(&swap.tile_b)),
                    "{} was accepted but makes no chain through its tiles",
                    swap
                );
            } else {
                assert!(chains.is_empty(), "{} was rejected but makes a chain", swap);
            }
        }
    }
}

#[test]
fn test_detected_chains_are_maximal() {
    for seed in 0..20 {
        let mut level = Level::with_seed(&load_level(0), seed).unwrap();
        let swap = level.detect_possible_swaps().remove(0);
        level.perform_swap(&swap).unwrap();

        let type_at = |c: usize, r: usize| level.tile_at(c, r).map(|t| t.tile_type());
        let chains = level.detect_chains();
        assert!(!chains.is_empty());

        for chain in &chains {
            assert!(chain.len() >= 3);
            let t = chain.tile_type();
            assert!(chain.tiles().iter().all(|tile| Some(tile.tile_type()) == t));

            let first = chain.first_tile().unwrap();
            let last = chain.last_tile().unwrap();
            match chain.kind() {
                ChainKind::Horizontal => {
                    assert!(first.column == 0 || type_at(first.column - 1, first.row) != t);
                    assert_ne!(type_at(last.column + 1, last.row), t);
                }
                ChainKind::Vertical => {
                    assert!(first.row == 0 || type_at(first.column, first.row - 1) != t);
                    assert_ne!(type_at(last.column, last.row + 1), t);
                }
            }
        }
    }
}

#[test]
fn test_detection_is_deterministic() {
    let mut a = Level::with_seed(&load_level(1), 77).unwrap();
    let mut b = Level::with_seed(&load_level(1), 77).unwrap();
    assert_eq!(a.snapshot(), b.snapshot());

    let swap = a.detect_possible_swaps().remove(0);
    let outcome_a = a.apply_swap(&swap).unwrap();
    let outcome_b = b.apply_swap(&swap).unwrap();
    assert_eq!(outcome_a, outcome_b);
}

#[test]
fn test_mars_run_of_three() {
    let descriptor = preset_level(&[
        &[Moon, Sun, Earth, Ceres, Uranus, Saturn],
        &[Sun, Moon, Ceres, Earth, Mars, Uranus],
        &[Earth, Ceres, Mars, Mars, Sun, Earth],
    ]);
    let mut level = Level::with_seed(&descriptor, 0).unwrap();
    let swap = level.swap_between((4, 0), (4, 1)).unwrap();
    assert!(level.is_possible_swap(&swap));

    level.perform_swap(&swap).unwrap();
    let chains = level.remove_matches().unwrap();
    assert_eq!(chains.len(), 1);
    assert_eq!(chains[0].len(), 3);
    assert_eq!(chains[0].tile_type(), Some(Mars));
    let columns: Vec<_> = chains[0].tiles().iter().map(|t| t.column).collect();
    assert_eq!(columns, vec![2, 3, 4]);

    let before_refill = level.grid().tile_count();
    assert_eq!(before_refill, 18 - 3);
    for column in 0..6 {
        let count = (0..3).filter(|&r| level.tile_at(column, r).is_some()).count();
        let expected = if (2..=4).contains(&column) { 2 } else { 3 };
        assert_eq!(count, expected, "column {}", column);
    }

    let fallen = level.fill_holes().unwrap();
    let fallen_columns: Vec<_> = fallen.iter().map(|c| c.column).collect();
    assert_eq!(fallen_columns, vec![2, 3, 4]);
}

#[test]
fn test_mars_run_extended_to_four() {
    let descriptor = preset_level(&[
        &[Moon, Sun, Earth, Ceres, Uranus, Saturn],
        &[Sun, Moon, Ceres, Earth, Mars, Uranus],
        &[Earth, Ceres, Mars, Mars, Sun, Mars],
    ]);
    let mut level = Level::with_seed(&descriptor, 0).unwrap();
    let swap = level.swap_between((4, 0), (4, 1)).unwrap();

    let outcome = level.apply_swap(&swap).unwrap();
    let first = &outcome.steps[0];
    assert_eq!(first.chains.len(), 1);
    assert_eq!(first.chains[0].len(), 4);
    assert_eq!(first.chains[0].score, 120);
    assert_eq!(first.removed_tiles().len(), 4);

    let spawned_columns: Vec<_> = first.spawned.iter().map(|c| c.column).collect();
    assert_eq!(spawned_columns, vec![2, 3, 4, 5]);
    assert!(first.spawned.iter().all(|c| c.tiles.len() == 1));
}

#[test]
fn test_same_type_swap_rejected_as_invalid_swap() {
    let descriptor = preset_level(&[
        &[Moon, Sun, Earth],
        &[Sun, Moon, Ceres],
        &[Earth, Earth, Mars],
    ]);
    let mut level = Level::with_seed(&descriptor, 0).unwrap();
    let swap = level.swap_between((0, 0), (1, 0)).unwrap();
    let err = level.apply_swap(&swap).unwrap_err();
    assert_eq!(err, LevelError::InvalidSwap);
    assert_eq!(err.class(), ErrorClass::InvalidSwap);
    assert_eq!(level.moves_left(), 30);
}

#[test]
fn test_gravity_preserves_order_and_packs_columns() {
    let mut level = Level::with_seed(&load_level(1), 3).unwrap();
    let mut next_id = 0;
    tag_untagged_tiles(&mut level, &mut next_id);

    for _ in 0..10 {
        let Some(swap) = jewel_core::bot::hint(&level) else {
            break;
        };
        level.validate_swap(&swap).unwrap();
        level.perform_swap(&swap).unwrap();

        loop {
            let chains = level.remove_matches().unwrap();
            if chains.is_empty() {
                break;
            }
            let survivors: Vec<Vec<u64>> = (0..level.columns())
                .map(|c| column_handles(&level, c))
                .collect();

            level.fill_holes().unwrap();

            for column in 0..level.columns() {
                assert_eq!(column_handles(&level, column), survivors[column]);

                // Once an empty playable cell shows up, nothing sits above it
                let mut seen_empty = false;
                for row in 0..level.rows() {
                    if !level.is_playable(column, row) {
                        continue;
                    }
                    let occupied = level.tile_at(column, row).is_some();
                    assert!(!(seen_empty && occupied), "gap below ({}, {})", column, row);
                    seen_empty |= !occupied;
                }
            }

            level.add_new_tiles().unwrap();
            assert!(level.grid().verify_full().is_ok());
            tag_untagged_tiles(&mut level, &mut next_id);
        }

        if level.end_turn().unwrap().is_some() {
            tag_untagged_tiles(&mut level, &mut next_id);
        }
        if level.status() != LevelStatus::InProgress {
            break;
        }
    }
}

#[test]
fn test_full_levels_terminate() {
    for number in 0..3 {
        for seed in 0..5 {
            let mut level = Level::with_seed(&load_level(number), seed).unwrap();
            let cap = level.config().max_cascade_depth as usize;
            let mut bot = Bot::with_seed(BotDifficulty::Easy, seed);
            let mut moves = 0;

            while level.status() == LevelStatus::InProgress {
                let swap = bot.choose_swap(&level).expect("engine keeps the board playable");
                let outcome = level.apply_swap(&swap).unwrap();
                moves += 1;

                assert!(!outcome.steps.is_empty());
                assert!(outcome.steps.len() <= cap);
                assert_eq!(outcome.moves_left, level.maximum_moves() - moves);
                assert!(level.detect_chains().is_empty());
                assert!(level.grid().verify_full().is_ok());
            }

            assert!(moves <= level.maximum_moves());
            match level.status() {
                LevelStatus::Won => assert!(level.score() >= level.target_score()),
                LevelStatus::Lost => {
                    assert!(level.score() < level.target_score());
                    assert_eq!(level.moves_left(), 0);
                }
                LevelStatus::InProgress => unreachable!(),
            }
        }
    }
}

#[test]
fn test_greedy_bot_scores_every_move() {
    let mut level = Level::with_seed(&load_level(0), 12).unwrap();
    let mut bot = Bot::with_seed(BotDifficulty::Greedy, 0);
    let swap = bot.choose_swap(&level).unwrap();
    let outcome = level.apply_swap(&swap).unwrap();
    assert!(outcome.score_gained >= 60);
    assert!(outcome.cascade_depth() < level.config().max_cascade_depth);
    assert!(outcome.chain_count() >= 1);
}

#[test]
fn test_independent_levels_do_not_interfere() {
    let descriptor = load_level(0);
    let mut a = Level::with_seed(&descriptor, 1).unwrap();
    let b = Level::with_seed(&descriptor, 1).unwrap();
    let before = b.snapshot();

    let swap = a.detect_possible_swaps().remove(0);
    a.apply_swap(&swap).unwrap();

    assert_eq!(b.snapshot(), before);
    assert_ne!(a.snapshot(), before);
}

#[test]
fn test_descriptor_errors_are_configuration_class() {
    let err = LevelDescriptor::from_json(r#"{"tiles": [], "targetScore": 1, "moves": 1}"#)
        .and_then(|d| Level::new(&d).map(|_| ()))
        .unwrap_err();
    assert_eq!(err, DescriptorError::EmptyLayout);
    assert_eq!(err.class(), ErrorClass::Configuration);
}

#[test]
fn test_outcome_serializes_for_renderers() {
    let mut level = Level::with_seed(&load_level(0), 4).unwrap();
    let swap = level.detect_possible_swaps().remove(0);
    let outcome = level.apply_swap(&swap).unwrap();

    let json = serde_json::to_value(&outcome).unwrap();
    assert!(json["steps"].is_array());
    assert_eq!(json["moves_left"], 14);
    assert!(json["steps"][0]["chains"][0]["tiles"].is_array());
}
