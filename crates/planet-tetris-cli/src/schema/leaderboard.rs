use chrono::{DateTime, Utc};
use planet_tetris_engine::GameOverRecord;
use serde::{Deserialize, Serialize};

/// One finished side on the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub player_name: String,
    pub score: usize,
    pub level: usize,
    pub rows: usize,
    /// Number of sides of the planet the side belonged to
    pub side_count: usize,
    /// Timestamp when the side ended (ISO 8601 format)
    pub recorded_at: DateTime<Utc>,
}

impl LeaderboardEntry {
    pub fn from_record(player_name: &str, record: &GameOverRecord, recorded_at: DateTime<Utc>) -> Self {
        Self {
            player_name: player_name.to_owned(),
            score: record.score,
            level: record.level,
            rows: record.rows_cleared,
            side_count: record.side_count,
            recorded_at,
        }
    }
}

/// Entries sorted by descending score.
///
/// Entries with equal scores keep the order in which they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<LeaderboardEntry>", into = "Vec<LeaderboardEntry>")]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl From<Vec<LeaderboardEntry>> for Leaderboard {
    fn from(mut entries: Vec<LeaderboardEntry>) -> Self {
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        Self { entries }
    }
}

impl From<Leaderboard> for Vec<LeaderboardEntry> {
    fn from(leaderboard: Leaderboard) -> Self {
        leaderboard.entries
    }
}

impl Leaderboard {
    pub fn insert(&mut self, entry: LeaderboardEntry) {
        let index = self
            .entries
            .partition_point(|existing| existing.score >= entry.score);
        self.entries.insert(index, entry);
    }

    /// Returns the best `limit` entries.
    pub fn top(&self, limit: usize) -> &[LeaderboardEntry] {
        &self.entries[..limit.min(self.entries.len())]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
