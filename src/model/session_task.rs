use uuid::Uuid;

/// Deferred work of a running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameTask {
    RevealEnd,
    MatchCheck(usize, usize),
    FlipBack(usize, usize),
    CountdownTick,
}

/// A task tagged with the session that scheduled it, so work left over from a
/// previous session can be recognised and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTask {
    pub session_id: Uuid,
    pub task: GameTask,
}

impl SessionTask {
    pub fn new(session_id: Uuid, task: GameTask) -> Self {
        Self { session_id, task }
    }
}
