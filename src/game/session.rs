use std::collections::BTreeSet;

use thiserror::Error;
use uuid::Uuid;

use crate::model::{Board, Card, Difficulty, Phase, SessionSnapshot, TimerState};

pub const MAX_SELECTION: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FlipRejection {
    #[error("cards can only be flipped while playing (phase is {0:?})")]
    NotPlaying(Phase),
    #[error("card {0} does not exist")]
    OutOfRange(usize),
    #[error("card {0} is already selected")]
    AlreadySelected(usize),
    #[error("card {0} is already matched")]
    AlreadyMatched(usize),
    #[error("two cards are already selected")]
    SelectionFull,
}

/// Whether `index` may be flipped. Depends only on its arguments.
pub fn check_flip(
    phase: Phase,
    selection: &[usize],
    matched: &BTreeSet<usize>,
    card_count: usize,
    index: usize,
) -> Result<(), FlipRejection> {
    if phase != Phase::Playing {
        return Err(FlipRejection::NotPlaying(phase));
    }
    if index >= card_count {
        return Err(FlipRejection::OutOfRange(index));
    }
    if selection.contains(&index) {
        return Err(FlipRejection::AlreadySelected(index));
    }
    if matched.contains(&index) {
        return Err(FlipRejection::AlreadyMatched(index));
    }
    if selection.len() >= MAX_SELECTION {
        return Err(FlipRejection::SelectionFull);
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipOutcome {
    /// First card of a pair is up.
    Selected,
    /// Second card is up; the pair should be checked.
    PairReady(usize, usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    Matched { cards: [Card; 2], board_complete: bool },
    Mismatched(usize, usize),
    /// The check no longer applies to this session (phase moved on).
    Stale,
}

/// State of one game: the board, what is selected, what is matched, and where
/// in the lifecycle it stands.
#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    phase: Phase,
    difficulty: Difficulty,
    player_name: Option<String>,
    board: Option<Board>,
    selection: Vec<usize>,
    matched: BTreeSet<usize>,
    timer_state: Option<TimerState>,
}

impl Session {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            id: Uuid::new_v4(),
            phase: Phase::Idle,
            difficulty,
            player_name: None,
            board: None,
            selection: Vec::new(),
            matched: BTreeSet::new(),
            timer_state: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn player_name(&self) -> Option<&str> {
        self.player_name.as_deref()
    }

    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    pub fn selection(&self) -> &[usize] {
        &self.selection
    }

    pub fn matched(&self) -> &BTreeSet<usize> {
        &self.matched
    }

    pub fn timer_state(&self) -> Option<&TimerState> {
        self.timer_state.as_ref()
    }

    pub fn card_count(&self) -> usize {
        self.board.as_ref().map(Board::len).unwrap_or(0)
    }

    pub fn is_won(&self) -> bool {
        self.card_count() > 0 && self.matched.len() == self.card_count()
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub(crate) fn set_player_name(&mut self, player_name: String) {
        self.player_name = Some(player_name);
    }

    /// Swaps in a freshly dealt board and forgets all per-board progress.
    pub(crate) fn replace_board(&mut self, board: Option<Board>) {
        if let Some(board) = &board {
            self.difficulty = board.difficulty();
        }
        self.board = board;
        self.selection.clear();
        self.matched.clear();
        self.timer_state = None;
    }

    pub(crate) fn reveal_all(&mut self) {
        if let Some(board) = self.board.as_mut() {
            board.reveal_all();
        }
    }

    /// Ends the reveal: unmatched cards go face down and the play timer starts.
    /// The caller moves the phase to `Playing`.
    pub(crate) fn begin_play(&mut self, now: std::time::Duration) -> Vec<Card> {
        self.timer_state = Some(TimerState::started(now));
        self.board
            .as_mut()
            .map(Board::hide_unmatched)
            .unwrap_or_default()
    }

    pub(crate) fn end_timer(&mut self, now: std::time::Duration) -> u64 {
        match self.timer_state.take() {
            Some(timer_state) => {
                let ended = timer_state.ended(now);
                let elapsed = ended.elapsed_seconds(now);
                self.timer_state = Some(ended);
                elapsed
            }
            None => 0,
        }
    }

    pub fn can_flip(&self, index: usize) -> Result<(), FlipRejection> {
        check_flip(
            self.phase,
            &self.selection,
            &self.matched,
            self.card_count(),
            index,
        )
    }

    pub(crate) fn flip(&mut self, index: usize) -> Result<(Card, FlipOutcome), FlipRejection> {
        self.can_flip(index)?;
        let card = self
            .board
            .as_mut()
            .and_then(|board| board.set_face_up(index, true))
            .ok_or(FlipRejection::OutOfRange(index))?;
        self.selection.push(index);
        let outcome = match self.selection.as_slice() {
            [first, second] => FlipOutcome::PairReady(*first, *second),
            _ => FlipOutcome::Selected,
        };
        Ok((card, outcome))
    }

    /// Compares the two cards of a pair. The selection is cleared whatever the
    /// result, so the next pair can start while a mismatch is still showing.
    pub(crate) fn check_match(&mut self, first: usize, second: usize) -> MatchOutcome {
        if self.phase != Phase::Playing {
            return MatchOutcome::Stale;
        }
        self.selection.retain(|index| *index != first && *index != second);

        let Some(board) = self.board.as_mut() else {
            return MatchOutcome::Stale;
        };
        let (Some(a), Some(b)) = (board.card(first).copied(), board.card(second).copied()) else {
            return MatchOutcome::Stale;
        };
        if !a.pairs_with(&b) {
            return MatchOutcome::Mismatched(first, second);
        }

        let (Some(a), Some(b)) = (board.mark_matched(first), board.mark_matched(second)) else {
            return MatchOutcome::Stale;
        };
        self.matched.insert(first);
        self.matched.insert(second);
        MatchOutcome::Matched {
            cards: [a, b],
            board_complete: self.is_won(),
        }
    }

    /// Turns a mismatched pair back over, skipping any card picked again or
    /// matched since the check ran.
    pub(crate) fn flip_back(&mut self, first: usize, second: usize) -> Vec<Card> {
        let selection = self.selection.clone();
        let matched = self.matched.clone();
        let Some(board) = self.board.as_mut() else {
            return Vec::new();
        };
        [first, second]
            .into_iter()
            .filter(|index| !selection.contains(index) && !matched.contains(index))
            .filter_map(|index| board.set_face_up(index, false))
            .collect()
    }

    pub fn snapshot(&self, remaining_seconds: u32) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            difficulty: self.difficulty,
            player_name: self.player_name.clone(),
            cards: self
                .board
                .as_ref()
                .map(|board| board.cards().to_vec())
                .unwrap_or_default(),
            grid_columns: self.difficulty.grid_columns(),
            selection: self.selection.clone(),
            matched: self.matched.iter().copied().collect(),
            remaining_seconds,
            timer_state: self.timer_state.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::model::SymbolId;

    /// Easy board laid out as 1 1 2 2 3 3 4 4 5 5 6 6.
    fn playing_session() -> Session {
        let symbols: Vec<SymbolId> = (1..=6).flat_map(|n| [SymbolId(n), SymbolId(n)]).collect();
        let mut session = Session::new(Difficulty::Easy);
        session.replace_board(Some(Board::from_symbols(Difficulty::Easy, &symbols)));
        session.reveal_all();
        session.begin_play(Duration::ZERO);
        session.set_phase(Phase::Playing);
        session
    }

    #[test]
    fn test_check_flip_rules() {
        let matched: BTreeSet<usize> = [4, 5].into_iter().collect();
        assert_eq!(check_flip(Phase::Playing, &[], &matched, 12, 0), Ok(()));
        assert_eq!(check_flip(Phase::Playing, &[0], &matched, 12, 1), Ok(()));
        assert_eq!(
            check_flip(Phase::Playing, &[0, 1], &matched, 12, 2),
            Err(FlipRejection::SelectionFull)
        );
        assert_eq!(
            check_flip(Phase::Playing, &[0], &matched, 12, 0),
            Err(FlipRejection::AlreadySelected(0))
        );
        assert_eq!(
            check_flip(Phase::Playing, &[], &matched, 12, 4),
            Err(FlipRejection::AlreadyMatched(4))
        );
        assert_eq!(
            check_flip(Phase::Playing, &[], &matched, 12, 12),
            Err(FlipRejection::OutOfRange(12))
        );
        for phase in [
            Phase::Idle,
            Phase::Loading,
            Phase::Revealing,
            Phase::Won,
            Phase::TimedOut,
        ] {
            assert_eq!(
                check_flip(phase, &[], &matched, 12, 0),
                Err(FlipRejection::NotPlaying(phase))
            );
        }
    }

    #[test]
    fn test_begin_play_hides_cards() {
        let symbols: Vec<SymbolId> = (1..=6).flat_map(|n| [SymbolId(n), SymbolId(n)]).collect();
        let mut session = Session::new(Difficulty::Easy);
        session.replace_board(Some(Board::from_symbols(Difficulty::Easy, &symbols)));
        session.reveal_all();
        session.set_phase(Phase::Revealing);

        let hidden = session.begin_play(Duration::from_secs(10));
        assert_eq!(hidden.len(), 12);
        assert_eq!(session.phase(), Phase::Revealing);
        let board = session.board().unwrap();
        assert!(board.cards().iter().all(|card| !card.face_up));
        assert_eq!(
            session.timer_state().map(|timer| timer.started_at),
            Some(Duration::from_secs(10))
        );
    }

    #[test]
    fn test_flip_builds_pair() {
        let mut session = playing_session();
        let (card, outcome) = session.flip(3).unwrap();
        assert!(card.face_up);
        assert_eq!(outcome, FlipOutcome::Selected);
        let (_, outcome) = session.flip(7).unwrap();
        assert_eq!(outcome, FlipOutcome::PairReady(3, 7));
        assert_eq!(session.flip(8), Err(FlipRejection::SelectionFull));
    }

    #[test]
    fn test_match_is_symmetric() {
        for (a, b) in [(0, 1), (1, 0)] {
            let mut session = playing_session();
            session.flip(a).unwrap();
            session.flip(b).unwrap();
            let outcome = session.check_match(a, b);
            assert!(matches!(
                outcome,
                MatchOutcome::Matched {
                    board_complete: false,
                    ..
                }
            ));
            assert_eq!(session.matched().len(), 2);
            assert!(session.selection().is_empty());
        }
        for (a, b) in [(0, 2), (2, 0)] {
            let mut session = playing_session();
            session.flip(a).unwrap();
            session.flip(b).unwrap();
            assert_eq!(session.check_match(a, b), MatchOutcome::Mismatched(a, b));
            assert!(session.matched().is_empty());
            assert!(session.selection().is_empty());
        }
    }

    #[test]
    fn test_third_flip_allowed_while_mismatch_showing() {
        let mut session = playing_session();
        session.flip(0).unwrap();
        session.flip(2).unwrap();
        session.check_match(0, 2);
        // both still face up until the flip-back runs
        assert!(session.board().unwrap().card(2).unwrap().face_up);
        session.flip(4).unwrap();
        session.flip(0).unwrap();

        let flipped = session.flip_back(0, 2);
        assert_eq!(flipped.len(), 1);
        assert_eq!(flipped[0].index, 2);
        assert!(session.board().unwrap().card(0).unwrap().face_up);
    }

    #[test]
    fn test_completing_board() {
        let mut session = playing_session();
        for pair in 0..6 {
            let (a, b) = (pair * 2, pair * 2 + 1);
            session.flip(a).unwrap();
            session.flip(b).unwrap();
            let outcome = session.check_match(a, b);
            let complete = pair == 5;
            assert!(matches!(
                outcome,
                MatchOutcome::Matched { board_complete, .. } if board_complete == complete
            ));
        }
        assert!(session.is_won());
        assert_eq!(session.matched().len() % 2, 0);
    }

    #[test]
    fn test_check_after_phase_change_is_stale() {
        let mut session = playing_session();
        session.flip(0).unwrap();
        session.flip(1).unwrap();
        session.set_phase(Phase::TimedOut);
        assert_eq!(session.check_match(0, 1), MatchOutcome::Stale);
        assert!(session.matched().is_empty());
    }

    #[test]
    fn test_end_timer_floors_seconds() {
        let mut session = playing_session();
        assert_eq!(session.end_timer(Duration::from_millis(12_900)), 12);
        assert!(session.timer_state().unwrap().is_ended());
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut session = playing_session();
        session.flip(5).unwrap();
        let snapshot = session.snapshot(42);
        let json: serde_json::Value = serde_json::from_str(&snapshot.to_json().unwrap()).unwrap();
        assert_eq!(json["phase"], "playing");
        assert_eq!(json["difficulty"], "easy");
        assert_eq!(json["selection"], serde_json::json!([5]));
        assert_eq!(json["remaining_seconds"], 42);
        assert_eq!(json["cards"].as_array().unwrap().len(), 12);
        assert_eq!(json["timer_state"]["started_at"], 0);
    }
}
