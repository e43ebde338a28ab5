//! WebSocket protocol messages for Jewelry sessions.

use jewel_core::{ErrorClass, LevelDescriptor, LevelSnapshot, MoveOutcome, Swap, Tile};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Messages sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ClientMessage {
    /// Start a level, either inline or by number from the levels directory.
    /// An omitted seed is drawn at random and reported back.
    StartLevel {
        #[serde(default)]
        level: Option<LevelDescriptor>,
        #[serde(default)]
        level_number: Option<u32>,
        #[serde(default)]
        seed: Option<u64>,
    },

    /// Swap the tiles at two cells, as `(column, row)`
    Swap {
        from: (usize, usize),
        to: (usize, usize),
    },

    /// Ask for a suggested swap
    Hint,

    /// Restart the current level
    Reset,

    /// Request the current board
    Snapshot,

    /// Ping for keepalive
    Ping,
}

/// Messages sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ServerMessage {
    /// Welcome message with assigned session ID
    Welcome { session_id: Uuid },

    /// A fresh board, with every tile placed on it
    LevelStarted {
        seed: u64,
        snapshot: LevelSnapshot,
        tiles: Vec<Tile>,
    },

    /// Swap accepted and fully resolved
    MoveApplied {
        outcome: MoveOutcome,
        snapshot: LevelSnapshot,
    },

    /// Swap refused; the board is unchanged unless `class` is `Internal`
    SwapRejected { class: ErrorClass, reason: String },

    /// Suggested swap, or none if the board offers nothing
    Hint { swap: Option<Swap> },

    /// Current board
    LevelSnapshot { snapshot: LevelSnapshot },

    /// Error occurred
    Error { message: String },

    /// Pong response
    Pong,
}
