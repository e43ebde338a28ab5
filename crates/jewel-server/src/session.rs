//! Single-player game sessions.

use jewel_core::{
    bot, DescriptorError, ErrorClass, Level, LevelDescriptor, LevelError, LevelSnapshot,
    MoveOutcome, Swap, Tile,
};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No level has been started")]
    NoLevel,

    #[error("StartLevel needs either a level or a level number")]
    NoLevelGiven,

    #[error("Level {0} not found")]
    LevelNotFound(u32),

    #[error("Invalid level: {0}")]
    Descriptor(#[from] DescriptorError),

    #[error(transparent)]
    Level(#[from] LevelError),
}

impl SessionError {
    pub fn class(&self) -> ErrorClass {
        match self {
            SessionError::Level(e) => e.class(),
            SessionError::Descriptor(e) => e.class(),
            SessionError::LevelNotFound(_) => ErrorClass::Configuration,
            SessionError::NoLevel | SessionError::NoLevelGiven => ErrorClass::InvalidRequest,
        }
    }
}

/// Where numbered levels are looked up
#[derive(Debug, Clone)]
pub struct LevelLibrary {
    dir: PathBuf,
}

impl LevelLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load `level_<number>.json` from the library directory
    pub fn load(&self, number: u32) -> Result<LevelDescriptor, SessionError> {
        let path = self.dir.join(format!("level_{}.json", number));
        if !path.is_file() {
            warn!(path = %path.display(), "level file missing");
            return Err(SessionError::LevelNotFound(number));
        }
        Ok(LevelDescriptor::load(&path)?)
    }
}

/// Freshly started board
#[derive(Debug, Clone)]
pub struct StartedLevel {
    pub seed: u64,
    pub snapshot: LevelSnapshot,
    pub tiles: Vec<Tile>,
}

/// One player's connection to the engine.
pub struct Session {
    pub id: Uuid,
    /// The level being played (once started)
    pub level: Option<Level>,
    /// Descriptor and seed the current level was built from
    origin: Option<(LevelDescriptor, u64)>,
    moves_played: u32,
}

impl Session {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            level: None,
            origin: None,
            moves_played: 0,
        }
    }

    /// Resolve the requested descriptor and start playing it
    pub fn start_level(
        &mut self,
        level: Option<LevelDescriptor>,
        level_number: Option<u32>,
        seed: Option<u64>,
        library: &LevelLibrary,
    ) -> Result<StartedLevel, SessionError> {
        let descriptor = match (level, level_number) {
            (Some(descriptor), _) => descriptor,
            (None, Some(number)) => library.load(number)?,
            (None, None) => return Err(SessionError::NoLevelGiven),
        };

        let seed = seed.unwrap_or_else(rand::random);
        let level = Level::with_seed(&descriptor, seed)?;
        let started = StartedLevel {
            seed,
            snapshot: level.snapshot(),
            tiles: level.tiles(),
        };

        info!(
            session = %self.id,
            seed,
            columns = level.columns(),
            rows = level.rows(),
            "level started"
        );
        self.level = Some(level);
        self.origin = Some((descriptor, seed));
        self.moves_played = 0;
        Ok(started)
    }

    fn level_mut(&mut self) -> Result<&mut Level, SessionError> {
        self.level.as_mut().ok_or(SessionError::NoLevel)
    }

    fn level_ref(&self) -> Result<&Level, SessionError> {
        self.level.as_ref().ok_or(SessionError::NoLevel)
    }

    /// Swap the tiles at two cells and resolve the whole move
    pub fn swap(
        &mut self,
        from: (usize, usize),
        to: (usize, usize),
    ) -> Result<(MoveOutcome, LevelSnapshot), SessionError> {
        let id = self.id;
        let level = self.level_mut()?;
        let swap = level.swap_between(from, to)?;
        let outcome = level.apply_swap(&swap)?;
        let snapshot = level.snapshot();

        self.moves_played += 1;
        debug!(
            session = %id,
            %swap,
            moves = self.moves_played,
            gained = outcome.score_gained,
            depth = outcome.cascade_depth(),
            "move applied"
        );
        Ok((outcome, snapshot))
    }

    pub fn hint(&self) -> Result<Option<Swap>, SessionError> {
        Ok(bot::hint(self.level_ref()?))
    }

    /// Restart the current level from its original seed.
    ///
    /// The board is rebuilt from scratch, so the reported seed reproduces it.
    pub fn reset(&mut self) -> Result<StartedLevel, SessionError> {
        let (descriptor, seed) = self.origin.as_ref().ok_or(SessionError::NoLevel)?;
        let seed = *seed;
        let level = Level::with_seed(descriptor, seed)?;
        let started = StartedLevel {
            seed,
            snapshot: level.snapshot(),
            tiles: level.tiles(),
        };

        info!(session = %self.id, seed, "level reset");
        self.level = Some(level);
        self.moves_played = 0;
        Ok(started)
    }

    pub fn snapshot(&self) -> Result<LevelSnapshot, SessionError> {
        Ok(self.level_ref()?.snapshot())
    }

    pub fn moves_played(&self) -> u32 {
        self.moves_played
    }
}
