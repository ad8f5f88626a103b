use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::debug;

use crate::difficulty::Difficulty;

/// Maximum number of entries kept across all players and difficulties
pub const RANKING_CAPACITY: usize = 10;

/// Number of entries shown in the ranking panel
pub const RANKING_DISPLAY: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreEntry {
    pub player: String,
    pub best_ms: u64,
    pub difficulty: Difficulty,
    pub last_updated: DateTime<Local>,
}

impl ScoreEntry {
    fn belongs_to(&self, player: &str, difficulty: Difficulty) -> bool {
        self.difficulty == difficulty && same_player(&self.player, player)
    }
}

/// Player names compare case-insensitively
pub fn same_player(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// In-memory best times, one per (player, difficulty), globally ordered
#[derive(Debug, Default, Clone)]
pub struct RankingStore {
    entries: Vec<ScoreEntry>,
}

impl RankingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a hit and report whether it is a new personal best.
    ///
    /// The first time for a pair always counts as a personal best, even if
    /// it is too slow to survive the truncation to [`RANKING_CAPACITY`].
    pub fn record_attempt(&mut self, player: &str, difficulty: Difficulty, reaction_ms: u64) -> bool {
        let now = Local::now();

        let improved = match self
            .entries
            .iter_mut()
            .find(|e| e.belongs_to(player, difficulty))
        {
            Some(existing) if reaction_ms < existing.best_ms => {
                existing.best_ms = reaction_ms;
                existing.last_updated = now;
                true
            }
            Some(_) => false,
            None => {
                self.entries.push(ScoreEntry {
                    player: player.to_string(),
                    best_ms: reaction_ms,
                    difficulty,
                    last_updated: now,
                });
                true
            }
        };

        if improved {
            // stable: equal times keep the earlier entry ahead
            self.entries.sort_by_key(|e| e.best_ms);
            if self.entries.len() > RANKING_CAPACITY {
                for evicted in &self.entries[RANKING_CAPACITY..] {
                    debug!(
                        player = %evicted.player,
                        difficulty = %evicted.difficulty,
                        best_ms = evicted.best_ms,
                        "evicted from ranking"
                    );
                }
                self.entries.truncate(RANKING_CAPACITY);
            }
        }

        improved
    }

    pub fn best_time_for(&self, player: &str, difficulty: Difficulty) -> Option<u64> {
        self.entries
            .iter()
            .find(|e| e.belongs_to(player, difficulty))
            .map(|e| e.best_ms)
    }

    /// The `n` fastest entries, fastest first
    pub fn top(&self, n: usize) -> &[ScoreEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Marker shown next to a ranking position (0-based)
pub fn medal(index: usize) -> &'static str {
    match index {
        0 => "🥇",
        1 => "🥈",
        2 => "🥉",
        _ => "🔸",
    }
}
