use serde::{Deserialize, Serialize};

/// Identity shared by the two cards of a pair, independent of the image drawn for it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(transparent)]
pub struct SymbolId(pub u32);

impl SymbolId {
    /// Pool of `size` symbols numbered from 1, matching the image file names.
    pub fn pool(size: u32) -> Vec<SymbolId> {
        (1..=size).map(SymbolId).collect()
    }
}

impl std::fmt::Display for SymbolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl std::fmt::Debug for SymbolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Card {
    pub index: usize,
    pub symbol: SymbolId,
    pub face_up: bool,
    pub matched: bool,
}

impl Card {
    pub fn new(index: usize, symbol: SymbolId) -> Self {
        Self {
            index,
            symbol,
            face_up: false,
            matched: false,
        }
    }

    pub fn pairs_with(&self, other: &Card) -> bool {
        self.index != other.index && self.symbol == other.symbol
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_starts_at_one() {
        let pool = SymbolId::pool(3);
        assert_eq!(pool, vec![SymbolId(1), SymbolId(2), SymbolId(3)]);
    }

    #[test]
    fn test_card_never_pairs_with_itself() {
        let card = Card::new(4, SymbolId(7));
        assert!(!card.pairs_with(&card));
        assert!(card.pairs_with(&Card::new(9, SymbolId(7))));
        assert!(!card.pairs_with(&Card::new(9, SymbolId(8))));
    }
}
