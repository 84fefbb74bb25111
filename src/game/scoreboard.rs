use std::cell::RefCell;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use log::{info, trace};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ScoreRecord;

pub const DEFAULT_LEADERBOARD_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreboardError {
    #[error("score submission failed: {0}")]
    Submission(String),
    #[error("leaderboard fetch failed: {0}")]
    Fetch(String),
}

/// Remote score store. Calls happen after a session has already finished, so
/// an error here never changes game state.
pub trait ScoreboardApi {
    fn submit(&mut self, record: &ScoreRecord) -> Result<(), ScoreboardError>;

    fn fetch(&self) -> Result<Vec<ScoreRecord>, ScoreboardError>;
}

/// Body of `POST /api/scores`.
pub fn encode_submission(record: &ScoreRecord) -> Result<String, ScoreboardError> {
    serde_json::to_string(record).map_err(|err| ScoreboardError::Submission(err.to_string()))
}

/// Body of `GET /api/scores`.
pub fn decode_leaderboard(body: &str) -> Result<Vec<ScoreRecord>, ScoreboardError> {
    serde_json::from_str(body).map_err(|err| ScoreboardError::Fetch(err.to_string()))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredScore {
    #[serde(flatten)]
    pub record: ScoreRecord,
    pub created_at: DateTime<Utc>,
}

/// Scoreboard kept in memory, returning the best `limit` scores. Clones share
/// the same storage.
#[derive(Debug, Clone)]
pub struct InMemoryScoreboard {
    scores: Rc<RefCell<Vec<StoredScore>>>,
    limit: usize,
}

impl Default for InMemoryScoreboard {
    fn default() -> Self {
        Self::new(DEFAULT_LEADERBOARD_LIMIT)
    }
}

impl InMemoryScoreboard {
    pub fn new(limit: usize) -> Self {
        Self {
            scores: Rc::new(RefCell::new(Vec::new())),
            limit,
        }
    }

    pub fn stored(&self) -> Vec<StoredScore> {
        self.scores.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.scores.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.borrow().is_empty()
    }
}

impl ScoreboardApi for InMemoryScoreboard {
    fn submit(&mut self, record: &ScoreRecord) -> Result<(), ScoreboardError> {
        info!(
            target: "scoreboard",
            "Saving score {} for {} ({})",
            record.score,
            record.player_name,
            record.difficulty
        );
        self.scores.borrow_mut().push(StoredScore {
            record: record.clone(),
            created_at: Utc::now(),
        });
        Ok(())
    }

    fn fetch(&self) -> Result<Vec<ScoreRecord>, ScoreboardError> {
        let mut scores: Vec<ScoreRecord> = self
            .scores
            .borrow()
            .iter()
            .map(|stored| stored.record.clone())
            .collect();
        scores.sort_by(|a, b| b.score.cmp(&a.score));
        scores.truncate(self.limit);
        trace!(target: "scoreboard", "Fetched {} scores", scores.len());
        Ok(scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Difficulty;

    #[test]
    fn test_fetch_returns_top_scores() {
        let mut scoreboard = InMemoryScoreboard::new(3);
        for (name, score) in [("a", 10), ("b", 90), ("c", 50), ("d", 70)] {
            scoreboard
                .submit(&ScoreRecord::new(name, score, Difficulty::Easy, 30))
                .unwrap();
        }
        let fetched = scoreboard.fetch().unwrap();
        let names: Vec<&str> = fetched.iter().map(|r| r.player_name.as_str()).collect();
        assert_eq!(names, vec!["b", "d", "c"]);
        assert_eq!(scoreboard.len(), 4);
    }

    #[test]
    fn test_clones_share_storage() {
        let scoreboard = InMemoryScoreboard::default();
        let mut writer = scoreboard.clone();
        writer
            .submit(&ScoreRecord::new("kim", 42, Difficulty::Hard, 12))
            .unwrap();
        assert_eq!(scoreboard.stored()[0].record.player_name, "kim");
        assert!(scoreboard.stored()[0].created_at <= Utc::now());
    }

    #[test]
    fn test_wire_round_trip_of_api_body() {
        let body = r#"[
            {"player_name": "lee", "score": 141, "difficulty": "normal", "time_taken": 30},
            {"player_name": "park", "score": 0, "difficulty": "hard", "time_taken": 60}
        ]"#;
        let records = decode_leaderboard(body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].difficulty, Difficulty::Normal);
        assert_eq!(records[1].time_taken_seconds, 60);

        let encoded = encode_submission(&records[0]).unwrap();
        assert_eq!(
            encoded,
            r#"{"player_name":"lee","score":141,"difficulty":"normal","time_taken":30}"#
        );
    }

    #[test]
    fn test_decode_error_is_fetch_error() {
        assert!(matches!(
            decode_leaderboard("<html>500</html>"),
            Err(ScoreboardError::Fetch(_))
        ));
    }
}
