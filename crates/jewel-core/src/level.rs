//! The level engine.
//!
//! This module contains the main `Level` struct and all board rules:
//! - Board generation without pre-existing chains
//! - Swap validation and possible-swap detection
//! - Chain detection, removal, gravity and refill
//! - Scoring, move budget and win/loss tracking
//!
//! Every public operation runs to completion before returning. A level
//! owns its grid and random source exclusively; independent levels share
//! nothing.

use crate::chain::{Chain, ChainKind, MIN_CHAIN_LENGTH};
use crate::descriptor::{DescriptorError, LevelDescriptor, LevelLayout};
use crate::events::{CascadeStep, ColumnTiles, MoveOutcome};
use crate::grid::Grid;
use crate::scoring::EngineConfig;
use crate::swap::Swap;
use crate::tile::{PresentationHandle, Tile, TileType};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, warn};

/// Broken engine invariants. Any of these faults the level.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum InvariantViolation {
    #[error("Cascade did not settle within {cap} passes")]
    CascadeLimitExceeded { cap: u32 },

    #[error("Tile found on hole ({column}, {row})")]
    TileOnHole { column: usize, row: usize },

    #[error("Tile with unknown type at ({column}, {row})")]
    UnknownTile { column: usize, row: usize },

    #[error("Tile stored at ({column}, {row}) believes it lives elsewhere")]
    MisplacedTile { column: usize, row: usize },

    #[error("Playable cell ({column}, {row}) left empty after refill")]
    UnfilledCell { column: usize, row: usize },
}

/// Errors that can occur when proposing or applying a swap
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum LevelError {
    #[error("Cell ({column}, {row}) is outside the grid")]
    OutOfBounds { column: usize, row: usize },

    #[error("Cell ({column}, {row}) is not playable")]
    Unplayable { column: usize, row: usize },

    #[error("Cell ({column}, {row}) is empty")]
    EmptyCell { column: usize, row: usize },

    #[error("Swap does not match the tile at ({column}, {row})")]
    StaleSwap { column: usize, row: usize },

    #[error("Tiles are not adjacent")]
    NotAdjacent,

    #[error("Swap does not create a chain")]
    InvalidSwap,

    #[error("Level is over")]
    LevelOver,

    #[error("Level is faulted and must be reset")]
    Faulted,

    #[error("Internal error: {0}")]
    Internal(#[from] InvariantViolation),
}

/// Coarse classification of failures, for choosing feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorClass {
    /// Bad level descriptor
    Configuration,
    /// Malformed swap: bad coordinates, holes, non-neighbours, finished level
    InvalidRequest,
    /// Well-formed swap that makes no chain
    InvalidSwap,
    /// Engine fault; the level must be reset
    Internal,
}

impl LevelError {
    pub fn class(&self) -> ErrorClass {
        match self {
            LevelError::InvalidSwap => ErrorClass::InvalidSwap,
            LevelError::Faulted | LevelError::Internal(_) => ErrorClass::Internal,
            _ => ErrorClass::InvalidRequest,
        }
    }
}

impl DescriptorError {
    pub fn class(&self) -> ErrorClass {
        ErrorClass::Configuration
    }
}

/// Outcome of the level so far
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelStatus {
    InProgress,
    Won,
    Lost,
}

/// Engine phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelPhase {
    /// Waiting for the next swap
    Idle,
    /// Target score reached
    Won,
    /// Out of moves below the target
    Lost,
    /// An invariant broke; only `reset` leaves this phase
    Faulted(InvariantViolation),
}

/// Serializable view of a level for JSON consumers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSnapshot {
    pub columns: usize,
    pub rows: usize,
    /// `[row][column]`, row 0 first
    pub playable: Vec<Vec<bool>>,
    /// `[row][column]`, row 0 first
    pub tiles: Vec<Vec<Option<TileType>>>,
    pub score: u32,
    pub target_score: u32,
    pub moves_left: u32,
    pub maximum_moves: u32,
    pub status: LevelStatus,
}

/// State restored when a move faults halfway
struct Checkpoint {
    grid: Grid,
    score: u32,
    moves_left: u32,
    combo_depth: u32,
}

/// A puzzle level: the grid, its rules and the player's progress
#[derive(Debug, Clone)]
pub struct Level<R = StdRng> {
    grid: Grid,
    layout: LevelLayout,
    config: EngineConfig,
    score: u32,
    moves_left: u32,
    /// Removal passes so far in the current move
    combo_depth: u32,
    phase: LevelPhase,
    rng: R,
}

impl Level<StdRng> {
    /// Create a level with default settings and an entropy-seeded random source
    pub fn new(descriptor: &LevelDescriptor) -> Result<Self, DescriptorError> {
        Self::with_rng(descriptor, EngineConfig::default(), StdRng::from_entropy())
    }

    /// Create a level whose board generation and refills are reproducible
    pub fn with_seed(descriptor: &LevelDescriptor, seed: u64) -> Result<Self, DescriptorError> {
        Self::with_rng(descriptor, EngineConfig::default(), StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Level<R> {
    /// Create a level with a provided random source and fill its board.
    ///
    /// The descriptor is validated first; an invalid descriptor never
    /// produces a level.
    pub fn with_rng(
        descriptor: &LevelDescriptor,
        config: EngineConfig,
        rng: R,
    ) -> Result<Self, DescriptorError> {
        Self::initialize(descriptor, config, rng).map(|(level, _)| level)
    }

    /// Like [`Level::with_rng`], also returning the initially placed tiles
    pub fn initialize(
        descriptor: &LevelDescriptor,
        config: EngineConfig,
        rng: R,
    ) -> Result<(Self, Vec<Tile>), DescriptorError> {
        let layout = descriptor.validate()?;
        let grid = Grid::with_layout(layout.columns, layout.rows, layout.playable.clone());
        let mut level = Self {
            grid,
            moves_left: layout.moves,
            layout,
            config,
            score: 0,
            combo_depth: 0,
            phase: LevelPhase::Idle,
            rng,
        };
        let tiles = level.generate_board(true);
        Ok((level, tiles))
    }

    // ==================== Queries ====================

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn columns(&self) -> usize {
        self.grid.columns()
    }

    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    pub fn tile_at(&self, column: usize, row: usize) -> Option<&Tile> {
        self.grid.tile_at(column, row)
    }

    pub fn is_playable(&self, column: usize, row: usize) -> bool {
        self.grid.is_playable(column, row)
    }

    /// All tiles currently on the board, in scan order
    pub fn tiles(&self) -> Vec<Tile> {
        self.grid.tiles().cloned().collect()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn target_score(&self) -> u32 {
        self.layout.target_score
    }

    pub fn moves_left(&self) -> u32 {
        self.moves_left
    }

    pub fn maximum_moves(&self) -> u32 {
        self.layout.moves
    }

    pub fn phase(&self) -> &LevelPhase {
        &self.phase
    }

    pub fn status(&self) -> LevelStatus {
        match self.phase {
            LevelPhase::Won => LevelStatus::Won,
            LevelPhase::Lost => LevelStatus::Lost,
            LevelPhase::Idle | LevelPhase::Faulted(_) => LevelStatus::InProgress,
        }
    }

    pub fn is_faulted(&self) -> bool {
        matches!(self.phase, LevelPhase::Faulted(_))
    }

    /// Build a swap between two occupied cells
    pub fn swap_between(&self, from: (usize, usize), to: (usize, usize)) -> Result<Swap, LevelError> {
        let a = self.occupied_tile(from.0, from.1)?;
        let b = self.occupied_tile(to.0, to.1)?;
        Ok(Swap::new(a.clone(), b.clone()))
    }

    /// Let the rendering layer tag a tile with its own handle
    pub fn attach_handle(&mut self, column: usize, row: usize, handle: PresentationHandle) -> bool {
        match self.grid.tile_at_mut(column, row) {
            Some(tile) => {
                tile.set_handle(Some(handle));
                true
            }
            None => false,
        }
    }

    pub fn snapshot(&self) -> LevelSnapshot {
        let rows = self.rows();
        let columns = self.columns();
        LevelSnapshot {
            columns,
            rows,
            playable: (0..rows)
                .map(|r| (0..columns).map(|c| self.is_playable(c, r)).collect())
                .collect(),
            tiles: (0..rows)
                .map(|r| {
                    (0..columns)
                        .map(|c| self.tile_at(c, r).map(|t| t.tile_type()))
                        .collect()
                })
                .collect(),
            score: self.score,
            target_score: self.target_score(),
            moves_left: self.moves_left,
            maximum_moves: self.maximum_moves(),
            status: self.status(),
        }
    }

    // ==================== Board generation ====================

    /// Fill the board from scratch, honouring pre-placed tiles.
    ///
    /// The new board contains no chain and, when the layout allows it,
    /// at least one possible swap. Refused once the level is over or faulted.
    pub fn shuffle(&mut self) -> Result<Vec<Tile>, LevelError> {
        self.check_phase()?;
        Ok(self.generate_board(true))
    }

    /// Start the level over: fresh board, zero score, full move budget.
    /// This is the only way out of a fault.
    pub fn reset(&mut self) -> Vec<Tile> {
        self.score = 0;
        self.combo_depth = 0;
        self.moves_left = self.layout.moves;
        self.phase = LevelPhase::Idle;
        self.generate_board(true)
    }

    fn generate_board(&mut self, use_presets: bool) -> Vec<Tile> {
        let attempts = self.config.max_shuffle_attempts.max(1);
        for attempt in 1..=attempts {
            self.fill_without_chains(use_presets);
            if self.has_possible_swaps() {
                debug!(attempt, "generated board with possible swaps");
                return self.tiles();
            }
        }
        warn!(
            attempts,
            "no board with a possible swap found, keeping the last one"
        );
        self.tiles()
    }

    /// Fill every playable cell so that no run of three exists.
    ///
    /// Cells are visited in scan order. A drawn type that would complete a
    /// run with tiles already placed is redrawn a bounded number of times,
    /// then replaced by the first type that fits.
    fn fill_without_chains(&mut self, use_presets: bool) {
        self.grid.clear();

        if use_presets {
            let presets: Vec<(usize, usize, TileType)> = self
                .grid
                .playable_cells()
                .filter_map(|(c, r)| self.layout.preset_at(c, r).map(|t| (c, r, t)))
                .collect();
            for (column, row, tile_type) in presets {
                self.grid.place_tile(Tile::new(column, row, tile_type));
            }
        }

        let cells: Vec<(usize, usize)> = self.grid.playable_cells().collect();
        for (column, row) in cells {
            if self.grid.tile_at(column, row).is_some() {
                continue;
            }

            let grid = &self.grid;
            let type_at = |c: usize, r: usize| grid.tile_at(c, r).map(|t| t.tile_type());

            let mut tile_type = TileType::random(&mut self.rng);
            let mut redraws = 0;
            while forms_chain(&type_at, column, row, tile_type)
                && redraws < self.config.max_redraws_per_cell
            {
                tile_type = TileType::random(&mut self.rng);
                redraws += 1;
            }
            if forms_chain(&type_at, column, row, tile_type) {
                tile_type = TileType::ALL
                    .into_iter()
                    .find(|&t| !forms_chain(&type_at, column, row, t))
                    .unwrap_or(tile_type);
            }

            self.grid.place_tile(Tile::new(column, row, tile_type));
        }
    }

    // ==================== Swap validation ====================

    fn occupied_tile(&self, column: usize, row: usize) -> Result<&Tile, LevelError> {
        if !self.grid.in_bounds(column, row) {
            return Err(LevelError::OutOfBounds { column, row });
        }
        if !self.grid.is_playable(column, row) {
            return Err(LevelError::Unplayable { column, row });
        }
        self.grid
            .tile_at(column, row)
            .ok_or(LevelError::EmptyCell { column, row })
    }

    /// Check that a swap names two live, neighbouring tiles as they are now
    fn check_request(&self, swap: &Swap) -> Result<(), LevelError> {
        for tile in [&swap.tile_a, &swap.tile_b] {
            let (column, row) = tile.position();
            let current = self.occupied_tile(column, row)?;
            if current.tile_type() != tile.tile_type() {
                return Err(LevelError::StaleSwap { column, row });
            }
        }
        if !swap.is_adjacent() {
            return Err(LevelError::NotAdjacent);
        }
        Ok(())
    }

    fn check_phase(&self) -> Result<(), LevelError> {
        match self.phase {
            LevelPhase::Idle => Ok(()),
            LevelPhase::Won | LevelPhase::Lost => Err(LevelError::LevelOver),
            LevelPhase::Faulted(_) => Err(LevelError::Faulted),
        }
    }

    /// Whether exchanging the two tiles would line up three or more
    /// through either of them
    fn creates_chain(&self, swap: &Swap) -> bool {
        let a = swap.tile_a.position();
        let b = swap.tile_b.position();
        let (Some(type_a), Some(type_b)) = (self.type_at(a.0, a.1), self.type_at(b.0, b.1)) else {
            return false;
        };
        if type_a == type_b {
            return false;
        }

        let swapped = |c: usize, r: usize| {
            if (c, r) == a {
                Some(type_b)
            } else if (c, r) == b {
                Some(type_a)
            } else {
                self.type_at(c, r)
            }
        };
        forms_chain(&swapped, a.0, a.1, type_b) || forms_chain(&swapped, b.0, b.1, type_a)
    }

    fn type_at(&self, column: usize, row: usize) -> Option<TileType> {
        self.grid.tile_at(column, row).map(|t| t.tile_type())
    }

    /// Full validation of a proposed swap.
    ///
    /// Malformed requests report their own error; a well-formed swap that
    /// makes no chain reports [`LevelError::InvalidSwap`].
    pub fn validate_swap(&self, swap: &Swap) -> Result<(), LevelError> {
        self.check_phase()?;
        self.check_request(swap)?;
        if self.creates_chain(swap) {
            Ok(())
        } else {
            Err(LevelError::InvalidSwap)
        }
    }

    /// Whether performing this swap would produce at least one chain
    /// touching one of the two moved tiles
    pub fn is_possible_swap(&self, swap: &Swap) -> bool {
        self.check_request(swap).is_ok() && self.creates_chain(swap)
    }

    /// Every swap that would produce a chain, in scan order.
    ///
    /// Each cell is paired with its right and upper neighbour.
    pub fn detect_possible_swaps(&self) -> Vec<Swap> {
        let mut swaps = Vec::new();
        for tile in self.grid.tiles() {
            let (column, row) = tile.position();
            for (c, r) in [(column + 1, row), (column, row + 1)] {
                if let Some(other) = self.grid.tile_at(c, r) {
                    let swap = Swap::new(tile.clone(), other.clone());
                    if self.creates_chain(&swap) {
                        swaps.push(swap);
                    }
                }
            }
        }
        swaps
    }

    pub fn has_possible_swaps(&self) -> bool {
        !self.detect_possible_swaps().is_empty()
    }

    /// Chains the swap would clear immediately, scored as a first pass.
    /// The board is left untouched.
    pub fn preview_swap(&self, swap: &Swap) -> Result<Vec<Chain>, LevelError> {
        self.check_request(swap)?;
        let mut grid = self.grid.clone();
        grid.swap_cells(swap.tile_a.position(), swap.tile_b.position());
        let mut chains = detect_chains(&grid);
        self.config.scoring.score_chains(&mut chains, 0);
        Ok(chains)
    }

    // ==================== Move primitives ====================
    //
    // The public stepwise calls are refused once the level is won, lost or
    // faulted. `apply_swap` uses the unchecked helpers directly.

    /// Exchange two tiles and start a new move.
    ///
    /// Only the shape of the request is checked; the caller is expected to
    /// have validated the swap. Resets the combo multiplier and spends a move.
    pub fn perform_swap(&mut self, swap: &Swap) -> Result<(), LevelError> {
        self.check_phase()?;
        self.check_request(swap)?;
        self.commit_swap(swap);
        Ok(())
    }

    fn commit_swap(&mut self, swap: &Swap) {
        self.grid
            .swap_cells(swap.tile_a.position(), swap.tile_b.position());
        self.combo_depth = 0;
        self.moves_left = self.moves_left.saturating_sub(1);
    }

    /// All chains on the board, without touching it.
    ///
    /// Horizontal chains come first (rows top to bottom, left to right),
    /// then vertical ones (columns left to right, bottom to top).
    pub fn detect_chains(&self) -> Vec<Chain> {
        detect_chains(&self.grid)
    }

    /// Detect, score and remove every chain on the board.
    ///
    /// A tile shared by two chains is removed once but scores for both.
    /// Advances the combo multiplier when anything was removed.
    pub fn remove_matches(&mut self) -> Result<Vec<Chain>, LevelError> {
        self.check_phase()?;
        Ok(self.remove_chains())
    }

    fn remove_chains(&mut self) -> Vec<Chain> {
        let mut chains = detect_chains(&self.grid);
        if chains.is_empty() {
            return chains;
        }

        let gained = self
            .config
            .scoring
            .score_chains(&mut chains, self.combo_depth);
        self.score = self.score.saturating_add(gained);

        for tile in chains.iter().flat_map(|c| c.tiles()) {
            self.grid.remove_tile(tile.column, tile.row);
        }

        debug!(
            depth = self.combo_depth,
            chains = chains.len(),
            gained,
            "removed matches"
        );
        self.combo_depth += 1;
        chains
    }

    /// Let tiles fall into the cells emptied by removal.
    ///
    /// Returns, per affected column (left to right), the tiles that moved,
    /// bottom to top, at their new positions.
    pub fn fill_holes(&mut self) -> Result<Vec<ColumnTiles>, LevelError> {
        self.check_phase()?;
        Ok(self.settle_columns())
    }

    fn settle_columns(&mut self) -> Vec<ColumnTiles> {
        (0..self.columns())
            .filter_map(|column| {
                let tiles = self.grid.compact_column(column);
                (!tiles.is_empty()).then_some(ColumnTiles { column, tiles })
            })
            .collect()
    }

    /// Spawn random tiles into every empty playable cell.
    ///
    /// No chain avoidance applies here: refills may line up and cascade.
    /// Returns, per affected column (left to right), the new tiles bottom to top.
    pub fn add_new_tiles(&mut self) -> Result<Vec<ColumnTiles>, LevelError> {
        self.check_phase()?;
        Ok(self.spawn_tiles())
    }

    fn spawn_tiles(&mut self) -> Vec<ColumnTiles> {
        let mut columns = Vec::new();
        for column in 0..self.columns() {
            let mut tiles = Vec::new();
            for row in self.grid.empty_cells_in_column(column) {
                let tile = Tile::new(column, row, TileType::random(&mut self.rng));
                self.grid.place_tile(tile.clone());
                tiles.push(tile);
            }
            if !tiles.is_empty() {
                columns.push(ColumnTiles { column, tiles });
            }
        }
        columns
    }

    /// Close a move: settle win or loss, and reshuffle a stuck board.
    ///
    /// Returns the new tiles if the board was regenerated.
    pub fn end_turn(&mut self) -> Result<Option<Vec<Tile>>, LevelError> {
        self.check_phase()?;
        Ok(self.settle_turn())
    }

    fn settle_turn(&mut self) -> Option<Vec<Tile>> {
        if self.phase == LevelPhase::Idle {
            if self.score >= self.layout.target_score {
                self.phase = LevelPhase::Won;
            } else if self.moves_left == 0 {
                self.phase = LevelPhase::Lost;
            }
        }

        if self.phase == LevelPhase::Idle
            && self.config.reshuffle_when_stuck
            && !self.has_possible_swaps()
        {
            debug!("no possible swaps left, reshuffling");
            return Some(self.generate_board(false));
        }
        None
    }

    // ==================== Full move ====================

    /// Validate and resolve a swap including its whole cascade.
    ///
    /// Rejected swaps leave the level untouched. If an invariant breaks
    /// mid-move, the level is rolled back to its state before the swap and
    /// faulted until [`Level::reset`].
    pub fn apply_swap(&mut self, swap: &Swap) -> Result<MoveOutcome, LevelError> {
        self.validate_swap(swap)?;

        let checkpoint = Checkpoint {
            grid: self.grid.clone(),
            score: self.score,
            moves_left: self.moves_left,
            combo_depth: self.combo_depth,
        };

        match self.resolve_move(swap) {
            Ok(outcome) => Ok(outcome),
            Err(violation) => {
                error!(%violation, "invariant violated while resolving move, faulting level");
                self.grid = checkpoint.grid;
                self.score = checkpoint.score;
                self.moves_left = checkpoint.moves_left;
                self.combo_depth = checkpoint.combo_depth;
                self.phase = LevelPhase::Faulted(violation.clone());
                Err(LevelError::Internal(violation))
            }
        }
    }

    fn resolve_move(&mut self, swap: &Swap) -> Result<MoveOutcome, InvariantViolation> {
        let score_before = self.score;
        self.commit_swap(swap);

        let cap = self.config.max_cascade_depth;
        let mut steps = Vec::new();
        loop {
            let depth = self.combo_depth;
            let chains = self.remove_chains();
            if chains.is_empty() {
                break;
            }
            if depth >= cap {
                return Err(InvariantViolation::CascadeLimitExceeded { cap });
            }

            let score: u32 = chains.iter().map(|c| c.score).sum();
            let fallen = self.settle_columns();
            let spawned = self.spawn_tiles();
            steps.push(CascadeStep {
                depth,
                chains,
                fallen,
                spawned,
                score,
            });
        }

        self.grid.verify_full()?;
        let reshuffled = self.settle_turn();

        Ok(MoveOutcome {
            swap: swap.clone(),
            steps,
            score_gained: self.score - score_before,
            score: self.score,
            moves_left: self.moves_left,
            status: self.status(),
            reshuffled,
        })
    }
}

/// Whether a tile of `tile_type` at `(column, row)` would sit in a run of
/// three or more, given the types reported by `type_at`
fn forms_chain<F>(type_at: &F, column: usize, row: usize, tile_type: TileType) -> bool
where
    F: Fn(usize, usize) -> Option<TileType>,
{
    let horizontal = 1
        + count_matching(type_at, column, row, -1, 0, tile_type)
        + count_matching(type_at, column, row, 1, 0, tile_type);
    let vertical = 1
        + count_matching(type_at, column, row, 0, -1, tile_type)
        + count_matching(type_at, column, row, 0, 1, tile_type);
    horizontal >= MIN_CHAIN_LENGTH || vertical >= MIN_CHAIN_LENGTH
}

/// Contiguous cells of `tile_type` walking from `(column, row)` in one direction
fn count_matching<F>(
    type_at: &F,
    column: usize,
    row: usize,
    dc: isize,
    dr: isize,
    tile_type: TileType,
) -> usize
where
    F: Fn(usize, usize) -> Option<TileType>,
{
    let mut count = 0;
    let (mut c, mut r) = (column, row);
    while let (Some(nc), Some(nr)) = (c.checked_add_signed(dc), r.checked_add_signed(dr)) {
        if type_at(nc, nr) != Some(tile_type) {
            break;
        }
        count += 1;
        c = nc;
        r = nr;
    }
    count
}

/// Scan a grid for maximal runs of three or more.
///
/// Horizontal chains first (rows top to bottom, left to right), then
/// vertical chains (columns left to right, bottom to top).
pub fn detect_chains(grid: &Grid) -> Vec<Chain> {
    let mut chains = Vec::new();

    for row in (0..grid.rows()).rev() {
        collect_runs(grid, ChainKind::Horizontal, grid.columns(), |i| (i, row), &mut chains);
    }
    for column in 0..grid.columns() {
        collect_runs(grid, ChainKind::Vertical, grid.rows(), |i| (column, i), &mut chains);
    }

    chains
}

/// Find runs along one line of `len` cells; `cell` maps a line index to grid coordinates
fn collect_runs<F>(grid: &Grid, kind: ChainKind, len: usize, cell: F, chains: &mut Vec<Chain>)
where
    F: Fn(usize) -> (usize, usize),
{
    let type_at = |i: usize| {
        let (c, r) = cell(i);
        grid.tile_at(c, r).map(|t| t.tile_type())
    };

    let mut start = 0;
    while start < len {
        let Some(tile_type) = type_at(start) else {
            start += 1;
            continue;
        };

        let mut end = start + 1;
        while end < len && type_at(end) == Some(tile_type) {
            end += 1;
        }

        if end - start >= MIN_CHAIN_LENGTH {
            let mut chain = Chain::new(kind);
            for i in start..end {
                let (c, r) = cell(i);
                if let Some(tile) = grid.tile_at(c, r) {
                    chain.add_tile(tile.clone());
                }
            }
            chains.push(chain);
        }
        start = end;
    }
}
