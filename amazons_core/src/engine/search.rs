use crate::engine::config::EngineConfig;
use crate::engine::eval::MobilityEvaluator;
use crate::engine::{Evaluator, FullMove, SearchStats, Searcher};
use crate::logic::board::{Board, Color, Coord};
use crate::logic::game::now_ms;
use crate::logic::generator::{legal_destinations, reachable_cells};
use crate::logic::rules::MoveError;
use std::sync::Arc;

#[derive(Debug, Clone, Copy)]
struct Candidate {
    from: Coord,
    to: Coord,
    score: i32,
}

/// Two-phase beam search: rank every queen move by the center weight of its
/// destination, keep the best `beam_width`, then fully evaluate every arrow
/// from each survivor.
pub struct BeamSearchEngine {
    config: Arc<EngineConfig>,
    evaluator: MobilityEvaluator,
}

impl BeamSearchEngine {
    pub fn new(config: Arc<EngineConfig>) -> Self {
        Self {
            evaluator: MobilityEvaluator::new(config.clone()),
            config,
        }
    }

    pub fn update_config(&mut self, config: Arc<EngineConfig>) {
        self.evaluator = MobilityEvaluator::new(config.clone());
        self.config = config;
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Phase 1. The sort is stable, so equal weights keep enumeration order.
    fn ranked_candidates(&self, board: &Board, player: Color) -> (Vec<Candidate>, usize) {
        let mut candidates: Vec<Candidate> = legal_destinations(board, player)
            .into_iter()
            .map(|(from, to)| Candidate {
                from,
                to,
                score: self.evaluator.center_weight(board.size, to),
            })
            .collect();
        let total = candidates.len();

        candidates.sort_by(|a, b| b.score.cmp(&a.score));
        candidates.truncate(self.config.beam_width);
        (candidates, total)
    }

    /// Used when no pair produced a finite score: the top candidate with any
    /// arrow it can fire.
    fn fallback(&self, board: &Board, candidates: &[Candidate], player: Color) -> Result<FullMove, MoveError> {
        let first = candidates.first().ok_or(MoveError::NoLegalMove)?;
        let mut sim = board.clone();
        sim.move_piece_quiet(first.from, first.to);
        let arrow = reachable_cells(&sim, first.to)
            .first()
            .copied()
            .ok_or(MoveError::NoLegalMove)?;
        sim.add_block(arrow);

        log::warn!("no finite evaluation for {player}, falling back to first candidate");
        Ok(FullMove {
            from: first.from,
            to: first.to,
            arrow,
            score: self.evaluator.evaluate(&sim, player),
        })
    }
}

impl Searcher for BeamSearchEngine {
    fn search(&self, board: &Board, player: Color) -> Result<(FullMove, SearchStats), MoveError> {
        if !board.has_supported_size() {
            log::warn!("refusing to search a {0}x{0} board", board.size);
            return Err(MoveError::OutOfBounds);
        }
        let start_time = now_ms();
        let (candidates, total) = self.ranked_candidates(board, player);

        let mut best: Option<FullMove> = None;
        let mut evaluations = 0u32;

        // Phase 2
        for cand in &candidates {
            let mut sim = board.clone();
            sim.move_piece_quiet(cand.from, cand.to);

            for arrow in reachable_cells(&sim, cand.to) {
                sim.blocks.push(arrow);
                let score = self.evaluator.evaluate(&sim, player);
                sim.blocks.pop();
                evaluations += 1;

                if !score.is_finite() {
                    continue;
                }
                if best.map_or(true, |b| score > b.score) {
                    best = Some(FullMove {
                        from: cand.from,
                        to: cand.to,
                        arrow,
                        score,
                    });
                }
            }
        }

        let mv = match best {
            Some(mv) => mv,
            None => self.fallback(board, &candidates, player)?,
        };

        let stats = SearchStats {
            candidates: u32::try_from(total).unwrap_or(u32::MAX),
            evaluations,
            time_ms: now_ms().saturating_sub(start_time),
        };
        log::debug!(
            "{player}: {} -> {} arrow {} score {:.1} ({} candidates, {} evals, {} ms)",
            mv.from,
            mv.to,
            mv.arrow,
            mv.score,
            stats.candidates,
            stats.evaluations,
            stats.time_ms
        );
        Ok((mv, stats))
    }
}
