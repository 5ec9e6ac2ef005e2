//! High score leaderboard
//!
//! Ranked by score (descending), ties broken by session time (ascending,
//! faster is better). The local board keeps the top 100.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::settings::PlayerProfile;
use crate::sim::SessionSummary;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 100;

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub nick: String,
    #[serde(default)]
    pub email: String,
    pub score: u64,
    /// Wave reached
    pub wave: u32,
    /// Session length in seconds
    pub time: f64,
    /// Unix timestamp (ms) when achieved
    #[serde(default)]
    pub timestamp: f64,
}

impl ScoreEntry {
    pub fn from_session(profile: &PlayerProfile, summary: &SessionSummary, timestamp: f64) -> Self {
        Self {
            nick: profile.nick.clone(),
            email: profile.email.clone(),
            score: summary.score,
            wave: summary.wave,
            time: summary.elapsed_secs,
            timestamp,
        }
    }
}

/// Leaderboard order: higher score first, then the faster run
pub fn rank_order(a: &ScoreEntry, b: &ScoreEntry) -> Ordering {
    b.score.cmp(&a.score).then(a.time.total_cmp(&b.time))
}

/// Best entry per nick, ranked. Zero scores are dropped.
pub fn unique_nicks(entries: &[ScoreEntry]) -> Vec<ScoreEntry> {
    let mut best: HashMap<&str, &ScoreEntry> = HashMap::new();
    for entry in entries.iter().filter(|e| e.score > 0) {
        let better = best
            .get(entry.nick.as_str())
            .is_none_or(|existing| rank_order(entry, existing) == Ordering::Less);
        if better {
            best.insert(entry.nick.as_str(), entry);
        }
    }
    let mut unique: Vec<ScoreEntry> = best.into_values().cloned().collect();
    unique.sort_by(|a, b| rank_order(a, b).then_with(|| a.nick.cmp(&b.nick)));
    unique
}

/// Local leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct HighScores {
    entries: Vec<ScoreEntry>,
}

impl HighScores {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a score can still make the board (ties resolve in `add`)
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().is_none_or(|e| score >= e.score)
    }

    /// Insert in rank order. Returns the 1-based rank, or None if the entry
    /// was rejected (zero score, empty nick) or fell off the end.
    pub fn add(&mut self, entry: ScoreEntry) -> Option<usize> {
        if entry.score == 0 || entry.nick.trim().is_empty() {
            return None;
        }
        let pos = self
            .entries
            .iter()
            .position(|e| rank_order(&entry, e) == Ordering::Less)
            .unwrap_or(self.entries.len());
        if pos >= MAX_HIGH_SCORES {
            return None;
        }
        self.entries.insert(pos, entry);
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(pos + 1)
    }

    pub fn top(&self, limit: usize) -> &[ScoreEntry] {
        &self.entries[..limit.min(self.entries.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn entry(nick: &str, score: u64, time: f64) -> ScoreEntry {
        ScoreEntry {
            nick: nick.to_string(),
            email: String::new(),
            score,
            wave: 1,
            time,
            timestamp: 0.0,
        }
    }

    #[test]
    fn test_ties_broken_by_time() {
        let mut board = HighScores::new();
        board.add(entry("slow", 100, 90.0));
        assert_eq!(board.add(entry("fast", 100, 45.0)), Some(1));
        assert_eq!(board.entries()[1].nick, "slow");
    }

    #[test]
    fn test_rejects_empty_nick_and_zero() {
        let mut board = HighScores::new();
        assert_eq!(board.add(entry("  ", 10, 1.0)), None);
        assert_eq!(board.add(entry("a", 0, 1.0)), None);
        assert!(board.is_empty());
        assert!(!board.qualifies(0));
    }

    #[test]
    fn test_board_capped() {
        let mut board = HighScores::new();
        for i in 0..150u64 {
            board.add(entry("p", i + 1, 1.0));
        }
        assert_eq!(board.len(), MAX_HIGH_SCORES);
        assert_eq!(board.entries()[0].score, 150);
        assert!(!board.qualifies(10));
        assert_eq!(board.add(entry("late", 5, 1.0)), None);
    }

    #[test]
    fn test_unique_nicks_keeps_best() {
        let all = vec![
            entry("a", 10, 5.0),
            entry("b", 20, 5.0),
            entry("a", 30, 5.0),
            entry("c", 0, 1.0),
        ];
        let unique = unique_nicks(&all);
        let view: Vec<(&str, u64)> = unique.iter().map(|e| (e.nick.as_str(), e.score)).collect();
        assert_eq!(view, vec![("a", 30), ("b", 20)]);
    }

    #[test]
    fn test_entry_json_shape() {
        let json = r#"[{"nick":"ace","score":12,"wave":2,"time":33.5}]"#;
        let board: HighScores = serde_json::from_str(json).unwrap_or_default();
        assert_eq!(board.len(), 1);
        assert_eq!(board.entries()[0].email, "");
    }

    proptest! {
        #[test]
        fn prop_board_stays_sorted(
            scores in prop::collection::vec((1u64..500, 0.0f64..100.0), 0..200),
        ) {
            let mut board = HighScores::new();
            for (i, (score, time)) in scores.iter().enumerate() {
                board.add(entry(&format!("p{i}"), *score, *time));
            }
            prop_assert!(board.len() <= MAX_HIGH_SCORES);
            for pair in board.entries().windows(2) {
                prop_assert!(rank_order(&pair[0], &pair[1]) != Ordering::Greater);
            }
        }
    }
}
