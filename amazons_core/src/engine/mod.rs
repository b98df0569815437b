use crate::logic::board::{Board, Color, Coord};
use crate::logic::rules::MoveError;
use serde::{Deserialize, Serialize};

pub mod config;
pub mod eval;
pub mod search;

/// A complete turn: queen move plus the arrow fired from its new cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FullMove {
    pub from: Coord,
    pub to: Coord,
    pub arrow: Coord,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Queen moves enumerated before beam truncation.
    pub candidates: u32,
    /// Full evaluations run on move + arrow pairs.
    pub evaluations: u32,
    pub time_ms: u64,
}

pub trait Evaluator {
    /// Score of `board` from `player`'s point of view; higher is better.
    fn evaluate(&self, board: &Board, player: Color) -> f64;
}

/// Picks a full move for `player`. Implementations must leave `board`
/// untouched and simulate on their own copies.
pub trait Searcher {
    fn search(&self, board: &Board, player: Color) -> Result<(FullMove, SearchStats), MoveError>;
}

/// One-shot search with the default engine configuration.
pub fn get_best_move(board: &Board, player: Color) -> Result<FullMove, MoveError> {
    let engine = search::BeamSearchEngine::new(std::sync::Arc::new(config::EngineConfig::default()));
    engine.search(board, player).map(|(mv, _)| mv)
}
