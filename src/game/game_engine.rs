use log::{debug, error, info, trace, warn};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;
use thiserror::Error;

use super::asset_resolver::{resolve_all, AssetResolver, DirectoryAssetResolver, ResolvedAsset};
use super::countdown::{Countdown, CountdownStatus};
use super::deck_builder::{self, DeckError};
use super::leaderboard::{rank, RankedEntry};
use super::scheduler::{Scheduler, TaskPriority};
use super::scoreboard::{InMemoryScoreboard, ScoreboardApi, ScoreboardError};
use super::scorer;
use super::session::{FlipOutcome, FlipRejection, MatchOutcome, Session};
use super::settings::Settings;
use crate::destroyable::Destroyable;
use crate::events::{EventEmitter, EventHandler, EventObserver, Unsubscriber};
use crate::model::{
    Board, Difficulty, GameEngineCommand, GameEngineEvent, GameOutcome, GameResult, GameTask,
    Notice, Phase, ScoreRecord, SessionSnapshot, SessionTask, SymbolId,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("player name must not be empty")]
    Validation,
    #[error("game setup failed: {0}")]
    Setup(#[from] DeckError),
    #[error("a game is already in progress ({0:?})")]
    AlreadyInProgress(Phase),
}

/// Owns one player's game: the session, its clock and everything scheduled on it.
///
/// Time only moves when the host calls [`GameEngine::advance`]; reveal end,
/// match checks, flip-backs and countdown ticks all run from there, one at a
/// time, in due order. When a match check and a countdown tick fall due at the
/// same instant the match check runs first, so a pair completed on the last
/// tick still wins.
pub struct GameEngine {
    settings: Settings,
    session: Session,
    countdown: Countdown,
    scheduler: Scheduler<SessionTask>,
    rng: StdRng,
    symbol_pool: Vec<SymbolId>,
    asset_resolver: Box<dyn AssetResolver>,
    assets: HashMap<SymbolId, ResolvedAsset>,
    scoreboard: Box<dyn ScoreboardApi>,
    leaderboard: Vec<RankedEntry>,
    last_result: Option<GameResult>,
    debug_mode: bool,
    subscription: Option<Unsubscriber<GameEngineCommand>>,
    game_engine_event_emitter: EventEmitter<GameEngineEvent>,
}

impl Destroyable for GameEngine {
    fn destroy(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        self.scheduler.cancel_all();
    }
}

impl EventHandler<GameEngineCommand> for GameEngine {
    fn handle_event(&mut self, event: &GameEngineCommand) {
        self.handle_command(event.clone());
    }
}

impl GameEngine {
    /// Builds an engine and subscribes it to `game_engine_command_observer`.
    /// Call [`Destroyable::destroy`] to break the subscription cycle.
    pub fn new(
        game_engine_command_observer: EventObserver<GameEngineCommand>,
        game_engine_event_emitter: EventEmitter<GameEngineEvent>,
        settings: Settings,
        asset_resolver: Box<dyn AssetResolver>,
        scoreboard: Box<dyn ScoreboardApi>,
    ) -> Rc<RefCell<Self>> {
        let engine = Rc::new(RefCell::new(Self::detached(
            game_engine_event_emitter,
            settings,
            asset_resolver,
            scoreboard,
        )));
        GameEngine::wire_subscription(engine.clone(), game_engine_command_observer);
        engine
    }

    /// Builds an engine driven by direct method calls only.
    pub fn detached(
        game_engine_event_emitter: EventEmitter<GameEngineEvent>,
        settings: Settings,
        asset_resolver: Box<dyn AssetResolver>,
        scoreboard: Box<dyn ScoreboardApi>,
    ) -> Self {
        let seed = settings.seed.unwrap_or_else(|| rand::rng().next_u64());
        info!(target: "game_engine", "Deck seed: {}", seed);
        let mut engine = Self {
            session: Session::new(settings.difficulty),
            countdown: Countdown::new(settings.time_limit_secs),
            scheduler: Scheduler::new(),
            rng: StdRng::seed_from_u64(seed),
            symbol_pool: SymbolId::pool(settings.symbol_pool_size),
            asset_resolver,
            assets: HashMap::new(),
            scoreboard,
            leaderboard: Vec::new(),
            last_result: None,
            debug_mode: Settings::is_debug_mode(),
            subscription: None,
            game_engine_event_emitter,
            settings,
        };
        if let Err(err) = engine.deal_preview_board() {
            warn!(target: "game_engine", "No preview board: {}", err);
        }
        engine
    }

    /// Engine backed by images under `settings.asset_root` and an in-memory scoreboard.
    pub fn local(
        game_engine_command_observer: EventObserver<GameEngineCommand>,
        game_engine_event_emitter: EventEmitter<GameEngineEvent>,
        settings: Settings,
    ) -> Rc<RefCell<Self>> {
        let asset_resolver = DirectoryAssetResolver::new(settings.asset_root.clone());
        let scoreboard = InMemoryScoreboard::new(settings.leaderboard_limit);
        Self::new(
            game_engine_command_observer,
            game_engine_event_emitter,
            settings,
            Box::new(asset_resolver),
            Box::new(scoreboard),
        )
    }

    fn wire_subscription(
        engine: Rc<RefCell<Self>>,
        game_engine_command_observer: EventObserver<GameEngineCommand>,
    ) {
        let engine_handler = engine.clone();
        let subscription = game_engine_command_observer.subscribe(move |command| {
            match engine_handler.try_borrow_mut() {
                Ok(mut engine) => engine.handle_event(command),
                Err(_) => error!(
                    target: "game_engine",
                    "Dropping {:?}: sent while the engine was handling another command",
                    command
                ),
            }
        });
        engine.borrow_mut().subscription = Some(subscription);
    }

    fn handle_command(&mut self, command: GameEngineCommand) {
        trace!(target: "game_engine", "Handling command: {:?}", command);
        match command {
            GameEngineCommand::StartGame {
                player_name,
                difficulty,
            } => {
                if let Err(err) = self.start_game(&player_name, difficulty) {
                    warn!(target: "game_engine", "Could not start game: {}", err);
                }
            }
            GameEngineCommand::ChangeDifficulty(difficulty) => {
                if let Err(err) = self.change_difficulty(difficulty) {
                    warn!(target: "game_engine", "Could not change difficulty: {}", err);
                }
            }
            GameEngineCommand::Flip(index) => {
                if let Err(rejection) = self.flip(index) {
                    trace!(target: "game_engine", "Flip ignored: {}", rejection);
                }
            }
            GameEngineCommand::Reset => self.reset(),
            GameEngineCommand::ShowLeaderboard => {
                if let Err(err) = self.refresh_leaderboard() {
                    trace!(target: "game_engine", "Showing stale leaderboard: {}", err);
                }
            }
        }
    }

    fn emit(&self, event: GameEngineEvent) {
        self.game_engine_event_emitter.emit(event);
    }

    fn notify(&self, notice: Notice) {
        self.emit(GameEngineEvent::Notice(notice));
    }

    fn set_phase(&mut self, phase: Phase) {
        if self.session.phase() != phase {
            debug!(target: "game_engine", "{:?} -> {:?}", self.session.phase(), phase);
            self.session.set_phase(phase);
            self.emit(GameEngineEvent::PhaseChanged(phase));
        }
    }

    /// Starts over with an idle session under a new id.
    fn renew_session(&mut self, difficulty: Difficulty) {
        let previous = self.session.phase();
        self.session = Session::new(difficulty);
        if previous != Phase::Idle {
            debug!(target: "game_engine", "{:?} -> {:?}", previous, Phase::Idle);
            self.emit(GameEngineEvent::PhaseChanged(Phase::Idle));
        }
    }

    /// Drops everything still scheduled for the current session.
    fn cancel_pending(&mut self) {
        self.countdown.reset(&mut self.scheduler);
        let cancelled = self.scheduler.cancel_all();
        if cancelled > 0 {
            debug!(target: "game_engine", "Cancelled {} pending tasks", cancelled);
        }
        self.emit(GameEngineEvent::TimerChanged {
            remaining_seconds: self.countdown.remaining_seconds(),
        });
    }

    fn deal(&mut self, difficulty: Difficulty) -> Result<Board, DeckError> {
        let board = deck_builder::build(difficulty, &self.symbol_pool, &mut self.rng)?;
        if self.debug_mode {
            info!(target: "game_engine", "Board layout: {:?}", board);
        }
        Ok(board)
    }

    /// Face-down board shown while idle so the grid can be laid out.
    fn deal_preview_board(&mut self) -> Result<(), GameError> {
        let difficulty = self.session.difficulty();
        match self.deal(difficulty) {
            Ok(board) => {
                self.session.replace_board(Some(board.clone()));
                self.emit(GameEngineEvent::BoardReplaced(board));
                Ok(())
            }
            Err(err) => {
                error!(target: "game_engine", "Could not deal {} board: {}", difficulty, err);
                self.session.replace_board(None);
                self.notify(Notice::SetupFailed(err.to_string()));
                Err(err.into())
            }
        }
    }

    pub fn start_game(&mut self, player_name: &str, difficulty: Difficulty) -> Result<(), GameError> {
        let player_name = player_name.trim();
        if player_name.is_empty() {
            self.notify(Notice::InvalidPlayerName);
            return Err(GameError::Validation);
        }
        if self.session.phase() != Phase::Idle {
            return Err(GameError::AlreadyInProgress(self.session.phase()));
        }

        self.cancel_pending();
        self.session = Session::new(difficulty);
        self.session.set_player_name(player_name.to_string());
        self.emit(GameEngineEvent::DifficultyChanged(difficulty));
        self.set_phase(Phase::Loading);
        info!(
            target: "game_engine",
            "Starting {} game for {} (session {})",
            difficulty,
            player_name,
            self.session.id()
        );

        let board = match self.deal(difficulty) {
            Ok(board) => board,
            Err(err) => {
                error!(target: "game_engine", "Game setup failed: {}", err);
                self.notify(Notice::SetupFailed(err.to_string()));
                self.set_phase(Phase::Idle);
                return Err(err.into());
            }
        };

        self.assets = resolve_all(self.asset_resolver.as_ref(), &board.symbols());
        let mut fallbacks: Vec<SymbolId> = self
            .assets
            .iter()
            .filter(|(_, asset)| asset.is_fallback())
            .map(|(symbol, _)| *symbol)
            .collect();
        fallbacks.sort();
        for symbol in fallbacks {
            self.notify(Notice::AssetFallback(symbol));
        }

        self.session.replace_board(Some(board.clone()));
        self.emit(GameEngineEvent::BoardReplaced(board));

        self.session.reveal_all();
        self.set_phase(Phase::Revealing);
        if let Some(board) = self.session.board() {
            self.emit(GameEngineEvent::CardsChanged(board.cards().to_vec()));
        }
        self.schedule(self.settings.reveal_duration(), GameTask::RevealEnd);
        Ok(())
    }

    pub fn change_difficulty(&mut self, difficulty: Difficulty) -> Result<(), GameError> {
        info!(target: "game_engine", "Difficulty changed to {}", difficulty);
        self.cancel_pending();
        self.renew_session(difficulty);
        self.emit(GameEngineEvent::DifficultyChanged(difficulty));
        self.deal_preview_board()
    }

    /// Back to a fresh idle normal-difficulty board, as if the page had just loaded.
    pub fn reset(&mut self) {
        info!(target: "game_engine", "Resetting session {}", self.session.id());
        self.cancel_pending();
        self.assets.clear();
        self.last_result = None;
        self.renew_session(Difficulty::default());
        self.emit(GameEngineEvent::DifficultyChanged(self.session.difficulty()));
        if let Err(err) = self.deal_preview_board() {
            warn!(target: "game_engine", "Reset left no board: {}", err);
        }
    }

    pub fn flip(&mut self, index: usize) -> Result<(), FlipRejection> {
        let (card, outcome) = self.session.flip(index)?;
        self.emit(GameEngineEvent::CardsChanged(vec![card]));
        if let FlipOutcome::PairReady(first, second) = outcome {
            self.schedule(
                self.settings.match_check_delay(),
                GameTask::MatchCheck(first, second),
            );
        }
        Ok(())
    }

    fn schedule(&mut self, delay: Duration, task: GameTask) {
        self.scheduler.schedule(
            delay,
            TaskPriority::Callback,
            SessionTask::new(self.session.id(), task),
        );
    }

    /// Moves the session clock forward, running every task that falls due.
    pub fn advance(&mut self, elapsed: Duration) {
        let until = self.scheduler.now() + elapsed;
        while let Some(due) = self.scheduler.pop_due(until) {
            trace!(
                target: "game_engine",
                "Running {:?} ({:?} due at {:?})",
                due.payload.task,
                due.handle,
                due.due
            );
            self.run_task(due.payload);
        }
        self.scheduler.advance_to(until);
    }

    fn run_task(&mut self, task: SessionTask) {
        if task.session_id != self.session.id() {
            trace!(target: "game_engine", "Dropping task of old session: {:?}", task);
            return;
        }
        match task.task {
            GameTask::RevealEnd => self.end_reveal(),
            GameTask::MatchCheck(first, second) => self.run_match_check(first, second),
            GameTask::FlipBack(first, second) => {
                let cards = self.session.flip_back(first, second);
                if !cards.is_empty() {
                    self.emit(GameEngineEvent::CardsChanged(cards));
                }
            }
            GameTask::CountdownTick => self.run_countdown_tick(),
        }
    }

    fn end_reveal(&mut self) {
        if self.session.phase() != Phase::Revealing {
            return;
        }
        let hidden = self.session.begin_play(self.scheduler.now());
        self.emit(GameEngineEvent::CardsChanged(hidden));
        self.set_phase(Phase::Playing);
        self.countdown.start(&mut self.scheduler, self.session.id());
        self.emit(GameEngineEvent::TimerChanged {
            remaining_seconds: self.countdown.remaining_seconds(),
        });
    }

    fn run_match_check(&mut self, first: usize, second: usize) {
        match self.session.check_match(first, second) {
            MatchOutcome::Matched {
                cards,
                board_complete,
            } => {
                debug!(target: "game_engine", "Matched {} and {}", first, second);
                self.emit(GameEngineEvent::CardsChanged(cards.to_vec()));
                if board_complete {
                    self.finish(GameOutcome::Won);
                }
            }
            MatchOutcome::Mismatched(first, second) => {
                self.schedule(
                    self.settings.mismatch_delay(),
                    GameTask::FlipBack(first, second),
                );
            }
            MatchOutcome::Stale => {
                trace!(target: "game_engine", "Match check of {} and {} came too late", first, second);
            }
        }
    }

    fn run_countdown_tick(&mut self) {
        if self.session.phase() != Phase::Playing {
            self.countdown.stop(&mut self.scheduler);
            return;
        }
        match self.countdown.on_tick(&mut self.scheduler, self.session.id()) {
            CountdownStatus::Running(remaining_seconds) => {
                self.emit(GameEngineEvent::TimerChanged { remaining_seconds });
            }
            CountdownStatus::Expired => {
                self.emit(GameEngineEvent::TimerChanged {
                    remaining_seconds: 0,
                });
                self.finish(GameOutcome::TimedOut);
            }
        }
    }

    /// Commits the terminal phase, then scores and submits exactly once.
    fn finish(&mut self, outcome: GameOutcome) {
        if self.session.phase() != Phase::Playing {
            return;
        }
        self.countdown.stop(&mut self.scheduler);
        let time_taken_seconds = self.session.end_timer(self.scheduler.now());
        let success = outcome == GameOutcome::Won;
        self.set_phase(if success { Phase::Won } else { Phase::TimedOut });

        let difficulty = self.session.difficulty();
        let score = scorer::score(success, time_taken_seconds, difficulty);
        let record = ScoreRecord::new(
            self.session.player_name().unwrap_or_default(),
            score,
            difficulty,
            time_taken_seconds,
        );
        info!(
            target: "game_engine",
            "Game over ({:?}) after {}s, score {}",
            outcome,
            time_taken_seconds,
            score
        );
        let result = GameResult {
            outcome,
            record: record.clone(),
        };
        self.last_result = Some(result.clone());
        self.emit(GameEngineEvent::GameFinished(result));
        self.submit_score(&record);
    }

    fn submit_score(&mut self, record: &ScoreRecord) {
        match self.scoreboard.submit(record) {
            Ok(()) => {
                if let Err(err) = self.refresh_leaderboard() {
                    trace!(target: "game_engine", "Leaderboard not refreshed: {}", err);
                }
            }
            Err(err) => {
                error!(target: "game_engine", "Error saving score: {}", err);
                self.notify(Notice::SubmissionFailed(err.to_string()));
                self.emit(GameEngineEvent::LeaderboardUpdated(self.leaderboard.clone()));
            }
        }
    }

    /// Fetches and ranks the scoreboard. On failure the last known ranking is
    /// shown again.
    pub fn refresh_leaderboard(&mut self) -> Result<(), ScoreboardError> {
        let result = self.scoreboard.fetch();
        let outcome = match result {
            Ok(records) => {
                self.leaderboard = rank(&records);
                Ok(())
            }
            Err(err) => {
                error!(target: "game_engine", "Error updating leaderboard: {}", err);
                self.notify(Notice::FetchFailed(err.to_string()));
                Err(err)
            }
        };
        self.emit(GameEngineEvent::LeaderboardUpdated(self.leaderboard.clone()));
        outcome
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    pub fn board(&self) -> Option<&Board> {
        self.session.board()
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.countdown.remaining_seconds()
    }

    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    pub fn pending_tasks(&self) -> usize {
        self.scheduler.pending()
    }

    pub fn leaderboard(&self) -> &[RankedEntry] {
        &self.leaderboard
    }

    pub fn last_result(&self) -> Option<&GameResult> {
        self.last_result.as_ref()
    }

    pub fn asset_for(&self, symbol: SymbolId) -> Option<&ResolvedAsset> {
        self.assets.get(&symbol)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot(self.countdown.remaining_seconds())
    }
}
