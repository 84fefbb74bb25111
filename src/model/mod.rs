mod board;
mod card;
mod difficulty;
mod game_engine_command;
mod game_engine_event;
mod phase;
mod score_record;
mod session_snapshot;
mod session_task;
mod timer_state;

pub use board::Board;
pub use card::{Card, SymbolId};
pub use difficulty::{Difficulty, DifficultyConfig};
pub use game_engine_command::GameEngineCommand;
pub use game_engine_event::{GameEngineEvent, GameOutcome, GameResult, Notice};
pub use phase::Phase;
pub use score_record::ScoreRecord;
pub use session_snapshot::SessionSnapshot;
pub use session_task::{GameTask, SessionTask};
pub use timer_state::TimerState;
