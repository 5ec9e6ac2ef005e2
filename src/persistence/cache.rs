//! Non-blocking leaderboard cache
//!
//! A fetch is started with `request`, which hands back a sender for the
//! async side. The result sits in a shared slot until the next `poll` from
//! the frame loop moves it into the cache. Reads never wait: before the first
//! successful fetch (or after a failed one) they return nothing.

use std::cell::RefCell;
use std::rc::Rc;

use super::{ScoreStore, StoreError};
use crate::highscores::{ScoreEntry, unique_nicks};

type Slot = Rc<RefCell<Option<Result<Vec<ScoreEntry>, StoreError>>>>;

/// Completion handle for an in-flight leaderboard fetch
#[derive(Debug, Clone)]
pub struct LeaderboardSender {
    slot: Slot,
}

impl LeaderboardSender {
    pub fn deliver(self, result: Result<Vec<ScoreEntry>, StoreError>) {
        *self.slot.borrow_mut() = Some(result);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Empty,
    Pending,
    Ready,
    Failed,
}

#[derive(Debug, Default)]
pub struct LeaderboardCache {
    /// Best entry per nick, ranked
    entries: Vec<ScoreEntry>,
    pending: Option<Slot>,
    failed: bool,
}

impl LeaderboardCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> CacheStatus {
        if self.pending.is_some() {
            CacheStatus::Pending
        } else if self.failed {
            CacheStatus::Failed
        } else if self.entries.is_empty() {
            CacheStatus::Empty
        } else {
            CacheStatus::Ready
        }
    }

    /// Start a fetch. Any earlier in-flight result is dropped.
    pub fn request(&mut self) -> LeaderboardSender {
        let slot: Slot = Rc::new(RefCell::new(None));
        self.pending = Some(slot.clone());
        LeaderboardSender { slot }
    }

    /// Consume a delivered result, if any. Returns true when the cache changed.
    pub fn poll(&mut self) -> bool {
        let Some(slot) = &self.pending else {
            return false;
        };
        let Some(result) = slot.borrow_mut().take() else {
            return false;
        };
        self.pending = None;

        match result {
            Ok(scores) => {
                self.entries = unique_nicks(&scores);
                self.failed = false;
                log::debug!("Leaderboard cache: {} players", self.entries.len());
            }
            Err(e) => {
                log::warn!("Leaderboard fetch failed: {}", e);
                self.failed = true;
            }
        }
        true
    }

    /// Fetch from a synchronous store; the result lands on the next `poll`
    pub fn refresh_from<S: ScoreStore + ?Sized>(&mut self, store: &S, limit: usize) {
        self.request().deliver(store.load_top_scores(limit));
    }

    /// Saved scores make the cached ranking stale
    pub fn invalidate(&mut self) {
        self.entries.clear();
        self.failed = false;
    }

    /// Top `limit` players (empty when nothing is cached)
    pub fn top(&self, limit: usize) -> &[ScoreEntry] {
        &self.entries[..limit.min(self.entries.len())]
    }

    /// 1-based rank of `nick` in the cached board
    pub fn find_rank(&self, nick: &str) -> Option<(usize, &ScoreEntry)> {
        self.entries
            .iter()
            .enumerate()
            .find(|(_, e)| e.nick == nick)
            .map(|(i, e)| (i + 1, e))
    }
}
