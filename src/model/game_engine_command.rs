use super::Difficulty;

/// Intents sent by the UI into the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEngineCommand {
    StartGame {
        player_name: String,
        difficulty: Difficulty,
    },
    ChangeDifficulty(Difficulty),
    Flip(usize),
    Reset,
    ShowLeaderboard,
}
