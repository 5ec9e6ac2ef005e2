//! Score persistence
//!
//! The simulation never touches storage. The host hands finished sessions to
//! a `ScoreStore` and reads leaderboards back through a `LeaderboardCache`,
//! which is filled asynchronously and read synchronously.

pub mod cache;
pub mod storage;

use std::fmt;

use crate::highscores::{HighScores, ScoreEntry};

pub use cache::{LeaderboardCache, LeaderboardSender};

/// LocalStorage key for the local leaderboard
pub const SCORES_KEY: &str = "space_invaders_scores";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreError {
    /// Backend missing (no window, storage disabled, native build)
    Unavailable,
    Serialize(String),
    Deserialize(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "storage unavailable"),
            Self::Serialize(msg) => write!(f, "could not encode data: {msg}"),
            Self::Deserialize(msg) => write!(f, "could not decode stored data: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Append-only score sink with a top-N read
pub trait ScoreStore {
    /// Record a finished session. Returns the local rank when it made the board.
    fn save_score(&mut self, entry: ScoreEntry) -> Result<Option<usize>, StoreError>;

    /// Best entries, score descending then time ascending
    fn load_top_scores(&self, limit: usize) -> Result<Vec<ScoreEntry>, StoreError>;
}

/// In-process store (native runs and tests)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    board: HighScores,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryStore {
    fn save_score(&mut self, entry: ScoreEntry) -> Result<Option<usize>, StoreError> {
        if !self.board.qualifies(entry.score) {
            return Ok(None);
        }
        Ok(self.board.add(entry))
    }

    fn load_top_scores(&self, limit: usize) -> Result<Vec<ScoreEntry>, StoreError> {
        Ok(self.board.top(limit).to_vec())
    }
}

/// Leaderboard kept as one JSON blob in LocalStorage
#[derive(Debug, Clone)]
pub struct LocalStore {
    key: String,
}

impl Default for LocalStore {
    fn default() -> Self {
        Self::new(SCORES_KEY)
    }
}

impl LocalStore {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
        }
    }

    fn load_board(&self) -> Result<HighScores, StoreError> {
        Ok(storage::read_json(&self.key)?.unwrap_or_default())
    }
}

impl ScoreStore for LocalStore {
    fn save_score(&mut self, entry: ScoreEntry) -> Result<Option<usize>, StoreError> {
        let mut board = self.load_board()?;
        if !board.qualifies(entry.score) {
            log::debug!("Score {} below the local board", entry.score);
            return Ok(None);
        }
        let rank = board.add(entry);
        storage::write_json(&self.key, &board)?;
        log::info!("Score saved ({} entries)", board.len());
        Ok(rank)
    }

    fn load_top_scores(&self, limit: usize) -> Result<Vec<ScoreEntry>, StoreError> {
        Ok(self.load_board()?.top(limit).to_vec())
    }
}
