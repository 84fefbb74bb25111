use serde::{Deserialize, Serialize};

use super::{Card, Difficulty, Phase, TimerState};

/// Everything a view needs to redraw the game from scratch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub difficulty: Difficulty,
    pub player_name: Option<String>,
    pub cards: Vec<Card>,
    pub grid_columns: usize,
    pub selection: Vec<usize>,
    pub matched: Vec<usize>,
    pub remaining_seconds: u32,
    pub timer_state: Option<TimerState>,
}

impl SessionSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
