use crate::engine::config::EngineConfig;
use crate::engine::Evaluator;
use crate::logic::board::{Board, Color, Coord, MAX_BOARD_SIZE};
use crate::logic::generator::count_reachable;
use crate::logic::rules::in_bounds;
use std::sync::{Arc, OnceLock};

/// Rounded Euclidean distance from every cell to the geometric center of an
/// N x N board, indexed `row * N + col`.
pub struct CenterTable {
    size: usize,
    distances: Vec<i32>,
}

impl CenterTable {
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    fn new(size: usize) -> Self {
        let center = (size as f64 - 1.0) / 2.0;
        let mut distances = Vec::with_capacity(size * size);
        for row in 0..size {
            for col in 0..size {
                let dr = row as f64 - center;
                let dc = col as f64 - center;
                distances.push(dr.hypot(dc).round() as i32);
            }
        }
        Self { size, distances }
    }

    /// Tables for every supported size are built once per process.
    pub fn get(size: usize) -> Option<&'static Self> {
        static INSTANCE: OnceLock<Vec<CenterTable>> = OnceLock::new();
        INSTANCE
            .get_or_init(|| (0..=MAX_BOARD_SIZE).map(CenterTable::new).collect())
            .get(size)
    }

    pub fn distance(&self, pos: Coord) -> Option<i32> {
        if !in_bounds(self.size, pos) {
            return None;
        }
        self.distances
            .get(pos.row as usize * self.size + pos.col as usize)
            .copied()
    }

    /// `base - distance`; zero outside the board.
    pub fn weight(&self, pos: Coord, base: i32) -> i32 {
        self.distance(pos).map_or(0, |d| base - d)
    }
}

/// Mobility differential plus a center-control term.
pub struct MobilityEvaluator {
    config: Arc<EngineConfig>,
}

impl MobilityEvaluator {
    pub const fn new(config: Arc<EngineConfig>) -> Self {
        Self { config }
    }

    pub fn center_weight(&self, size: usize, pos: Coord) -> i32 {
        CenterTable::get(size).map_or(0, |table| table.weight(pos, self.config.center_base))
    }
}

impl Evaluator for MobilityEvaluator {
    #[allow(clippy::cast_precision_loss)]
    fn evaluate(&self, board: &Board, player: Color) -> f64 {
        let occ = board.occupancy();
        let table = CenterTable::get(board.size);
        let base = self.config.center_base;

        let mut own_mobility = 0i64;
        let mut opp_mobility = 0i64;
        let mut positional = 0i64;

        for piece in &board.pieces {
            let reach = count_reachable(&occ, piece.pos) as i64;
            let weight = i64::from(table.map_or(0, |t| t.weight(piece.pos, base)));
            if piece.color == player {
                own_mobility += reach;
                positional += weight;
            } else {
                opp_mobility += reach;
                positional -= weight;
            }
        }

        self.config.mobility_weight * (own_mobility - opp_mobility) as f64
            + self.config.positional_weight * positional as f64
    }
}
