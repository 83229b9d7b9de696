use core::cmp::Ordering;
use std::time::Duration;

use chrono::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Record of one won game, handed to the high-score store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStat {
    pub id: Uuid,
    pub name: String,
    pub score: u64,
    #[serde(with = "crate::serde_duration")]
    pub game_duration: Duration,
    pub date: DateTime<Utc>,
}

impl GameStat {
    pub fn new(
        name: impl Into<String>,
        score: u64,
        game_duration: Duration,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            score,
            game_duration,
            date,
        }
    }

    /// Leaderboard order: higher score first, then faster game, then most recent.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .cmp(&self.score)
            .then_with(|| self.game_duration.cmp(&other.game_duration))
            .then_with(|| other.date.cmp(&self.date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stat(score: u64, secs: u64, day: u32) -> GameStat {
        let date = Utc.with_ymd_and_hms(2024, 5, day, 12, 0, 0).unwrap();
        GameStat::new("p", score, Duration::from_secs(secs), date)
    }

    #[test]
    fn rank_prefers_score_then_speed_then_recency() {
        let mut stats = vec![
            stat(100, 30, 1),
            stat(200, 90, 1),
            stat(100, 20, 1),
            stat(100, 20, 2),
        ];

        stats.sort_by(GameStat::rank_cmp);

        let keys: Vec<_> = stats
            .iter()
            .map(|s| (s.score, s.game_duration.as_secs(), s.date.day()))
            .collect();
        assert_eq!(keys, vec![(200, 90, 1), (100, 20, 2), (100, 20, 1), (100, 30, 1)]);
    }

    #[test]
    fn new_stats_get_distinct_ids() {
        assert_ne!(stat(1, 1, 1).id, stat(1, 1, 1).id);
    }

    #[test]
    fn duration_serializes_as_millis() {
        let json = serde_json::to_value(stat(5, 42, 3)).unwrap();

        assert_eq!(json["game_duration"], 42_000);
        assert_eq!(json["score"], 5);
    }
}
