use crate::model::Difficulty;

const BASE_SCORE: f64 = 100.0;
const PENALTY_PER_SECOND: f64 = 0.2;

/// Unrounded score; the multiplier is applied before any rounding.
pub fn raw_score(success: bool, time_taken_seconds: u64, difficulty: Difficulty) -> f64 {
    if !success {
        return 0.0;
    }
    (BASE_SCORE - PENALTY_PER_SECOND * time_taken_seconds as f64) * difficulty.multiplier()
}

/// Final score, rounded half up. Slow wins are not floored at zero.
pub fn score(success: bool, time_taken_seconds: u64, difficulty: Difficulty) -> i64 {
    (raw_score(success, time_taken_seconds, difficulty) + 0.5).floor() as i64
}
