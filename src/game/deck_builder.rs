use log::trace;
use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use crate::model::{Board, Difficulty, SymbolId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeckError {
    #[error("{difficulty} needs {needed} distinct symbols but the pool only has {available}")]
    InsufficientSymbols {
        difficulty: Difficulty,
        needed: usize,
        available: usize,
    },
}

/// Deals a fresh board: `pair_count` distinct symbols drawn uniformly from
/// `symbol_pool`, each placed twice, the whole layout shuffled.
pub fn build<R: Rng + ?Sized>(
    difficulty: Difficulty,
    symbol_pool: &[SymbolId],
    rng: &mut R,
) -> Result<Board, DeckError> {
    let needed = difficulty.pair_count();

    let mut pool: Vec<SymbolId> = Vec::with_capacity(symbol_pool.len());
    for symbol in symbol_pool {
        if !pool.contains(symbol) {
            pool.push(*symbol);
        }
    }
    if pool.len() < needed {
        return Err(DeckError::InsufficientSymbols {
            difficulty,
            needed,
            available: pool.len(),
        });
    }

    pool.shuffle(rng);
    pool.truncate(needed);

    let mut layout: Vec<SymbolId> = pool.iter().flat_map(|symbol| [*symbol, *symbol]).collect();
    layout.shuffle(rng);

    let board = Board::from_symbols(difficulty, &layout);
    trace!(target: "deck_builder", "Dealt board: {:?}", board);
    Ok(board)
}
