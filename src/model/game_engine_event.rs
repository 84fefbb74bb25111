use super::{Board, Card, Difficulty, Phase, ScoreRecord, SymbolId};
use crate::game::leaderboard::RankedEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Won,
    TimedOut,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameResult {
    pub outcome: GameOutcome,
    pub record: ScoreRecord,
}

/// Non-fatal problems shown to the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    InvalidPlayerName,
    SetupFailed(String),
    AssetFallback(SymbolId),
    SubmissionFailed(String),
    FetchFailed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum GameEngineEvent {
    PhaseChanged(Phase),
    DifficultyChanged(Difficulty),
    BoardReplaced(Board),
    CardsChanged(Vec<Card>),
    TimerChanged { remaining_seconds: u32 },
    GameFinished(GameResult),
    LeaderboardUpdated(Vec<RankedEntry>),
    Notice(Notice),
}
