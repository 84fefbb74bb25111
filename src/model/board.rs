use super::{Card, Difficulty, SymbolId};
use serde::{Deserialize, Serialize};

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    difficulty: Difficulty,
    cards: Vec<Card>,
}

impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let columns = self.difficulty.grid_columns();
        let mut output = String::new();
        output.push('\n');
        for row in self.cards.chunks(columns) {
            output.push('|');
            for card in row {
                let marker = if card.matched {
                    '*'
                } else if card.face_up {
                    '^'
                } else {
                    ' '
                };
                output.push_str(&format!("{:>3}{}|", card.symbol.0, marker));
            }
            output.push('\n');
        }
        write!(f, "{}", output)
    }
}

impl Board {
    /// Lays out `symbols` in order; position in the slice becomes the card index.
    pub fn from_symbols(difficulty: Difficulty, symbols: &[SymbolId]) -> Self {
        let cards = symbols
            .iter()
            .enumerate()
            .map(|(index, symbol)| Card::new(index, *symbol))
            .collect();
        Self { difficulty, cards }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    pub fn columns(&self) -> usize {
        self.difficulty.grid_columns()
    }

    pub fn rows(&self) -> usize {
        self.cards.len().div_ceil(self.columns())
    }

    /// Distinct symbols on the board, in first-appearance order.
    pub fn symbols(&self) -> Vec<SymbolId> {
        let mut seen = Vec::new();
        for card in &self.cards {
            if !seen.contains(&card.symbol) {
                seen.push(card.symbol);
            }
        }
        seen
    }

    pub fn set_face_up(&mut self, index: usize, face_up: bool) -> Option<Card> {
        let card = self.cards.get_mut(index)?;
        if card.matched && !face_up {
            return None;
        }
        card.face_up = face_up;
        Some(*card)
    }

    pub fn mark_matched(&mut self, index: usize) -> Option<Card> {
        let card = self.cards.get_mut(index)?;
        card.matched = true;
        card.face_up = true;
        Some(*card)
    }

    pub fn reveal_all(&mut self) {
        for card in self.cards.iter_mut() {
            card.face_up = true;
        }
    }

    /// Turns every card that is not matched face down, returning the ones that changed.
    pub fn hide_unmatched(&mut self) -> Vec<Card> {
        self.cards
            .iter_mut()
            .filter(|card| !card.matched && card.face_up)
            .map(|card| {
                card.face_up = false;
                *card
            })
            .collect()
    }

    pub fn matched_count(&self) -> usize {
        self.cards.iter().filter(|card| card.matched).count()
    }

    pub fn is_complete(&self) -> bool {
        !self.cards.is_empty() && self.matched_count() == self.cards.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn easy_board() -> Board {
        let symbols: Vec<SymbolId> = (1..=6).flat_map(|n| [SymbolId(n), SymbolId(n)]).collect();
        Board::from_symbols(Difficulty::Easy, &symbols)
    }

    #[test]
    fn test_layout() {
        let board = easy_board();
        assert_eq!(board.len(), 12);
        assert_eq!(board.columns(), 4);
        assert_eq!(board.rows(), 3);
        assert_eq!(board.symbols().len(), 6);
        for (position, card) in board.cards().iter().enumerate() {
            assert_eq!(card.index, position);
            assert!(!card.face_up);
        }
    }

    #[test]
    fn test_matched_card_stays_face_up() {
        let mut board = easy_board();
        board.mark_matched(0);
        assert!(board.set_face_up(0, false).is_none());
        assert!(board.card(0).unwrap().face_up);
    }

    #[test]
    fn test_hide_unmatched_leaves_matches() {
        let mut board = easy_board();
        board.reveal_all();
        board.mark_matched(0);
        board.mark_matched(1);
        let hidden = board.hide_unmatched();
        assert_eq!(hidden.len(), 10);
        assert!(board.card(0).unwrap().face_up);
        assert!(!board.card(2).unwrap().face_up);
        assert_eq!(board.matched_count(), 2);
        assert!(!board.is_complete());
    }
}
