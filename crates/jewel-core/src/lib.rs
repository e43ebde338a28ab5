//! Jewelry - a planet-themed match-3 rules engine
//!
//! This crate provides the core game logic for Jewelry, including:
//! - Tile catalog and the tiles that occupy the board
//! - Grid storage with playable cells and holes
//! - Level engine: chain-free generation, swap validation, chain
//!   detection, cascades, scoring and win/loss tracking
//! - Level descriptor loading
//!
//! # Architecture
//!
//! The engine is synchronous and performs no I/O beyond optional level
//! file loading. It can be compiled to:
//! - Native Rust for server-side session hosting
//! - WebAssembly for a browser renderer
//!
//! # Modules
//!
//! - [`tile`]: Tile types and tiles
//! - [`grid`]: Fixed-size tile lattice
//! - [`swap`] / [`chain`]: Transient value types
//! - [`descriptor`]: Level files
//! - [`level`]: The engine
//! - [`events`]: Move outcomes for renderers
//! - [`scoring`]: Scoring and engine configuration
//! - [`bot`]: Automatic players and hints

pub mod bot;
pub mod chain;
pub mod descriptor;
pub mod events;
pub mod grid;
pub mod level;
pub mod scoring;
pub mod swap;
pub mod tile;
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use bot::{Bot, BotDifficulty};
pub use chain::{Chain, ChainKind};
pub use descriptor::{DescriptorError, LevelDescriptor};
pub use events::{CascadeStep, ColumnTiles, MoveOutcome};
pub use grid::Grid;
pub use level::{
    ErrorClass, InvariantViolation, Level, LevelError, LevelPhase, LevelSnapshot, LevelStatus,
};
pub use scoring::{EngineConfig, ScoringConfig};
pub use swap::Swap;
pub use tile::{PresentationHandle, Tile, TileType};
