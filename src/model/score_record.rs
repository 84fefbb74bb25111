use super::Difficulty;
use serde::{Deserialize, Serialize};

/// One finished game as the scoreboard stores it. Read-only once built.
#[readonly::make]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub player_name: String,
    pub score: i64,
    pub difficulty: Difficulty,
    #[serde(rename = "time_taken")]
    pub time_taken_seconds: u64,
}

impl ScoreRecord {
    pub fn new(
        player_name: impl Into<String>,
        score: i64,
        difficulty: Difficulty,
        time_taken_seconds: u64,
    ) -> Self {
        Self {
            player_name: player_name.into(),
            score,
            difficulty,
            time_taken_seconds,
        }
    }
}
