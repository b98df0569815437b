//! Click-driven turn flow for a board UI: pick a queen, pick its destination,
//! then pick the arrow target. Also drives the engine's side in PvE matches.

use crate::engine::Searcher;
use crate::logic::board::{Color, Coord};
use crate::logic::game::{GameMode, GameState, RecordKind};
use crate::logic::rules::{self, MoveError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    SelectingSource,
    Moving { from: Coord },
    Shooting { shooter: Coord },
    Finished,
}

/// Outcome of one user or engine action, with text ready for a status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionReport {
    pub success: bool,
    pub message: String,
    pub winner: Option<Color>,
}

impl ActionReport {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            winner: None,
        }
    }

    fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            winner: None,
        }
    }

    fn won(winner: Color, message: &str) -> Self {
        Self {
            success: true,
            message: format!("{message}. {winner} wins!"),
            winner: Some(winner),
        }
    }
}

impl From<MoveError> for ActionReport {
    fn from(err: MoveError) -> Self {
        Self::rejected(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnController {
    phase: Phase,
}

impl Default for TurnController {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnController {
    pub const fn new() -> Self {
        Self {
            phase: Phase::SelectingSource,
        }
    }

    /// Controller positioned where `game` currently stands, including a
    /// turn whose queen has moved but whose arrow is still pending.
    pub fn for_game(game: &GameState) -> Self {
        Self {
            phase: Self::resume_phase(game),
        }
    }

    fn resume_phase(game: &GameState) -> Phase {
        if game.is_finished() {
            return Phase::Finished;
        }
        match game.moves().last() {
            Some(last) if last.kind == RecordKind::Move => Phase::Shooting { shooter: last.to },
            _ => Phase::SelectingSource,
        }
    }

    pub const fn phase(&self) -> Phase {
        self.phase
    }

    pub const fn selected(&self) -> Option<Coord> {
        match self.phase {
            Phase::Moving { from } => Some(from),
            Phase::Shooting { shooter } => Some(shooter),
            Phase::SelectingSource | Phase::Finished => None,
        }
    }

    fn is_ai_turn(game: &GameState) -> bool {
        matches!(game.mode(), GameMode::Pve { ai } if ai == game.turn())
    }

    /// Feeds one clicked cell into the turn. Returns `None` when the click
    /// only changed the selection or was ignored.
    pub fn click(&mut self, game: &mut GameState, cell: Coord) -> Option<ActionReport> {
        if game.is_finished() {
            self.phase = Phase::Finished;
            return Some(MoveError::GameFinished.into());
        }
        if Self::is_ai_turn(game) {
            return None;
        }

        match self.phase {
            Phase::SelectingSource => self.select(game, cell),
            Phase::Moving { from } => {
                if cell == from {
                    self.phase = Phase::SelectingSource;
                    return None;
                }
                if game.board().piece_at(cell).is_some_and(|p| p.color == game.turn()) {
                    self.phase = Phase::Moving { from: cell };
                    return None;
                }
                match game.move_piece(from, cell) {
                    Ok(()) => {
                        self.phase = Phase::Shooting { shooter: cell };
                        Some(ActionReport::ok(format!(
                            "moved {from} -> {cell}, now shoot an arrow"
                        )))
                    }
                    Err(err) => Some(err.into()),
                }
            }
            Phase::Shooting { shooter } => Some(self.shoot(game, shooter, cell)),
            Phase::Finished => Some(MoveError::GameFinished.into()),
        }
    }

    fn select(&mut self, game: &GameState, cell: Coord) -> Option<ActionReport> {
        let piece = game.board().piece_at(cell)?;
        if piece.color != game.turn() {
            return Some(ActionReport::rejected("select your own piece"));
        }
        self.phase = Phase::Moving { from: cell };
        None
    }

    fn shoot(&mut self, game: &mut GameState, shooter: Coord, target: Coord) -> ActionReport {
        if let Err(err) = rules::validate_shot(game.board(), shooter, target) {
            return err.into();
        }
        match game.place_arrow(target) {
            Ok(outcome) => {
                let message = format!("arrow placed at {target}");
                match outcome.winner {
                    Some(winner) => {
                        self.phase = Phase::Finished;
                        ActionReport::won(winner, &message)
                    }
                    None => {
                        self.phase = Phase::SelectingSource;
                        ActionReport::ok(message)
                    }
                }
            }
            Err(err) => err.into(),
        }
    }

    /// Reverts one action. Undoing an arrow goes back to shooting with the
    /// queen that already moved.
    pub fn undo(&mut self, game: &mut GameState) -> ActionReport {
        match game.undo() {
            Ok(()) => {
                self.phase = Self::resume_phase(game);
                ActionReport::ok(format!("undone, {} to play", game.turn()))
            }
            Err(err) => err.into(),
        }
    }

    pub fn prompt(&self, game: &GameState) -> String {
        let turn = game.turn();
        match (self.phase, game.winner()) {
            (_, Some(winner)) => format!("Game over: {winner} wins"),
            (Phase::SelectingSource | Phase::Finished, None) => {
                format!("{turn}'s turn: select a queen")
            }
            (Phase::Moving { from }, None) => {
                format!("{turn}'s turn: choose where the queen on {from} goes")
            }
            (Phase::Shooting { shooter }, None) => {
                format!("{turn}'s turn: shoot an arrow from {shooter}")
            }
        }
    }

    /// Plays a whole turn for the engine side of a PvE match. Returns `None`
    /// when it is not the engine's turn.
    pub fn play_ai_turn<S: Searcher>(
        &mut self,
        game: &mut GameState,
        engine: &S,
    ) -> Option<ActionReport> {
        if game.is_finished() || !Self::is_ai_turn(game) {
            return None;
        }
        let player = game.turn();

        // The engine plays whole turns, so a pending half turn is taken back.
        if matches!(Self::resume_phase(game), Phase::Shooting { .. }) {
            if let Err(err) = game.undo() {
                return Some(ActionReport::rejected(format!("AI error: {err}")));
            }
        }

        let (mv, stats) = match engine.search(game.board(), player) {
            Ok(found) => found,
            Err(err) => {
                log::warn!("engine found nothing for {player}: {err}");
                return Some(ActionReport::rejected(format!("AI error: {err}")));
            }
        };

        if let Err(err) = game.move_piece(mv.from, mv.to) {
            log::error!("engine move {} -> {} rejected: {err}", mv.from, mv.to);
            return Some(ActionReport::rejected(format!("AI error: {err}")));
        }
        let outcome = match game.place_arrow(mv.arrow) {
            Ok(outcome) => outcome,
            Err(err) => {
                log::error!("engine arrow {} rejected: {err}", mv.arrow);
                // Keep turns whole: take the queen move back.
                if let Err(undo_err) = game.undo() {
                    log::error!("could not revert engine move: {undo_err}");
                }
                return Some(ActionReport::rejected(format!("AI error: {err}")));
            }
        };

        log::info!(
            "{player} (AI) played {} -> {} arrow {} in {} ms",
            mv.from,
            mv.to,
            mv.arrow,
            stats.time_ms
        );
        let message = format!("{player} moved {} -> {}, arrow at {}", mv.from, mv.to, mv.arrow);
        Some(match outcome.winner {
            Some(winner) => {
                self.phase = Phase::Finished;
                ActionReport::won(winner, &message)
            }
            None => {
                self.phase = Phase::SelectingSource;
                ActionReport::ok(message)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::EngineConfig;
    use crate::engine::search::BeamSearchEngine;
    use crate::engine::{FullMove, SearchStats};
    use crate::logic::board::{Board, BoardPreset};
    use std::sync::Arc;

    fn c(col: i32, row: i32) -> Coord {
        Coord::new(col, row)
    }

    struct FixedMove(FullMove);

    impl Searcher for FixedMove {
        fn search(&self, _: &Board, _: Color) -> Result<(FullMove, SearchStats), MoveError> {
            Ok((self.0, SearchStats::default()))
        }
    }

    #[test]
    fn test_full_turn_by_clicks() {
        let mut game = GameState::new(BoardPreset::Small8);
        let mut ctl = TurnController::new();

        assert_eq!(ctl.click(&mut game, c(2, 0)), None);
        assert_eq!(ctl.phase(), Phase::Moving { from: c(2, 0) });
        assert_eq!(ctl.prompt(&game), "Red's turn: choose where the queen on (2, 0) goes");

        let report = ctl.click(&mut game, c(2, 3)).unwrap();
        assert!(report.success);
        assert_eq!(ctl.phase(), Phase::Shooting { shooter: c(2, 3) });

        let report = ctl.click(&mut game, c(2, 0)).unwrap();
        assert!(report.success);
        assert_eq!(report.winner, None);
        assert_eq!(ctl.phase(), Phase::SelectingSource);
        assert_eq!(game.turn(), Color::Blue);
        assert_eq!(ctl.prompt(&game), "Blue's turn: select a queen");
    }

    #[test]
    fn test_selection_rules() {
        let mut game = GameState::new(BoardPreset::Small8);
        let mut ctl = TurnController::new();

        let report = ctl.click(&mut game, c(2, 7)).unwrap();
        assert!(!report.success);
        assert_eq!(report.message, "select your own piece");
        assert_eq!(ctl.click(&mut game, c(3, 3)), None);
        assert_eq!(ctl.phase(), Phase::SelectingSource);

        ctl.click(&mut game, c(2, 0));
        ctl.click(&mut game, c(5, 0));
        assert_eq!(ctl.selected(), Some(c(5, 0)));
        ctl.click(&mut game, c(5, 0));
        assert_eq!(ctl.phase(), Phase::SelectingSource);
        assert!(game.history().is_empty());
    }

    #[test]
    fn test_bad_destination_keeps_selection() {
        let mut game = GameState::new(BoardPreset::Small8);
        let mut ctl = TurnController::new();
        ctl.click(&mut game, c(2, 0));

        let report = ctl.click(&mut game, c(3, 2)).unwrap();
        assert_eq!(report, ActionReport::from(MoveError::NotAStraightLine));
        assert_eq!(ctl.phase(), Phase::Moving { from: c(2, 0) });
    }

    #[test]
    fn test_arrow_needs_line_of_sight() {
        let mut game = GameState::new(BoardPreset::Small8);
        let mut ctl = TurnController::new();
        ctl.click(&mut game, c(2, 0));
        ctl.click(&mut game, c(2, 3));

        let report = ctl.click(&mut game, c(6, 6)).unwrap();
        assert_eq!(report.message, MoveError::NotAStraightLine.to_string());
        // The Blue queen on (2, 7) is behind (2, 6); (2, 7) itself is taken.
        let report = ctl.click(&mut game, c(2, 7)).unwrap();
        assert!(!report.success);
        assert_eq!(ctl.phase(), Phase::Shooting { shooter: c(2, 3) });
        assert!(game.board().blocks.is_empty());
    }

    #[test]
    fn test_undo_mid_turn_resets_phase() {
        let mut game = GameState::new(BoardPreset::Small8);
        let mut ctl = TurnController::new();
        ctl.click(&mut game, c(2, 0));
        ctl.click(&mut game, c(2, 3));

        assert!(ctl.undo(&mut game).success);
        assert_eq!(ctl.phase(), Phase::SelectingSource);
        assert!(game.board().piece_at(c(2, 0)).is_some());

        let report = ctl.undo(&mut game);
        assert!(!report.success);
        assert_eq!(report.message, "there is nothing to undo");
    }

    #[test]
    fn test_undone_arrow_keeps_the_moved_queen() {
        let mut game = GameState::new(BoardPreset::Small8);
        let mut ctl = TurnController::new();
        ctl.click(&mut game, c(2, 0));
        ctl.click(&mut game, c(2, 3));
        ctl.click(&mut game, c(2, 0));

        assert!(ctl.undo(&mut game).success);
        assert_eq!(game.turn(), Color::Red);
        assert_eq!(ctl.phase(), Phase::Shooting { shooter: c(2, 3) });
        assert_eq!(ctl.prompt(&game), "Red's turn: shoot an arrow from (2, 3)");

        // A second queen cannot be picked up; the click is read as an arrow.
        let report = ctl.click(&mut game, c(5, 0)).unwrap();
        assert_eq!(report, ActionReport::from(MoveError::PositionOccupied));
        assert!(game.board().piece_at(c(5, 0)).is_some());

        assert!(ctl.click(&mut game, c(2, 5)).unwrap().success);
        assert_eq!(game.turn(), Color::Blue);
        let moved: Vec<_> = game
            .moves()
            .iter()
            .filter(|m| m.kind == RecordKind::Move)
            .collect();
        assert_eq!(moved.len(), 1);

        // Undoing the queen move as well returns to selection.
        ctl.undo(&mut game);
        ctl.undo(&mut game);
        assert_eq!(ctl.phase(), Phase::SelectingSource);
    }

    #[test]
    fn test_restored_half_turn_resumes_shooting() {
        let mut game = GameState::new(BoardPreset::Small8);
        game.move_piece(c(5, 0), c(5, 4)).unwrap();
        let restored = GameState::from_json(&game.to_json().unwrap()).unwrap();

        let ctl = TurnController::for_game(&restored);
        assert_eq!(ctl.phase(), Phase::Shooting { shooter: c(5, 4) });
        assert_eq!(TurnController::for_game(&GameState::new(BoardPreset::Small8)).phase(), Phase::SelectingSource);
    }

    #[test]
    fn test_ai_retakes_pending_half_turn() {
        let mut game =
            GameState::new(BoardPreset::Small8).with_mode(GameMode::Pve { ai: Color::Red });
        game.move_piece(c(2, 0), c(2, 3)).unwrap();
        let mut ctl = TurnController::for_game(&game);
        let engine = BeamSearchEngine::new(Arc::new(EngineConfig::default()));

        let report = ctl.play_ai_turn(&mut game, &engine).unwrap();
        assert!(report.success, "{}", report.message);
        assert_eq!(game.turn(), Color::Blue);
        assert_eq!(game.moves().len(), 2);
        assert_eq!(game.board().blocks.len(), 1);
    }

    #[test]
    fn test_winning_click_finishes() {
        let mut board = Board::empty(6);
        board.add_piece(c(0, 0), Color::Blue);
        board.add_block(c(1, 0));
        board.add_block(c(0, 1));
        board.add_piece(c(3, 3), Color::Red);
        let mut game = GameState::from_position(board, Color::Red);
        let mut ctl = TurnController::for_game(&game);

        ctl.click(&mut game, c(3, 3));
        ctl.click(&mut game, c(2, 2));
        let report = ctl.click(&mut game, c(1, 1)).unwrap();

        assert_eq!(report.winner, Some(Color::Red));
        assert_eq!(ctl.phase(), Phase::Finished);
        assert_eq!(ctl.prompt(&game), "Game over: Red wins");
        assert_eq!(
            ctl.click(&mut game, c(2, 2)),
            Some(ActionReport::from(MoveError::GameFinished))
        );
    }

    #[test]
    fn test_ai_turn_in_pve() {
        let mut game =
            GameState::new(BoardPreset::Small8).with_mode(GameMode::Pve { ai: Color::Blue });
        let mut ctl = TurnController::for_game(&game);
        let engine = BeamSearchEngine::new(Arc::new(EngineConfig::default()));

        assert_eq!(ctl.play_ai_turn(&mut game, &engine), None);

        ctl.click(&mut game, c(2, 0));
        ctl.click(&mut game, c(2, 3));
        ctl.click(&mut game, c(2, 0));
        assert_eq!(game.turn(), Color::Blue);
        // Human clicks are ignored while the engine is to move.
        assert_eq!(ctl.click(&mut game, c(2, 7)), None);

        let report = ctl.play_ai_turn(&mut game, &engine).unwrap();
        assert!(report.success, "{}", report.message);
        assert_eq!(game.turn(), Color::Red);
        assert_eq!(game.board().blocks.len(), 2);
        assert_eq!(game.moves().len(), 4);
    }

    #[test]
    fn test_rejected_engine_arrow_is_rolled_back() {
        let mut game =
            GameState::new(BoardPreset::Small8).with_mode(GameMode::Pve { ai: Color::Red });
        let before = game.snapshot();
        let mut ctl = TurnController::for_game(&game);
        let bad = FixedMove(FullMove {
            from: c(2, 0),
            to: c(2, 3),
            arrow: c(5, 0),
            score: 0.0,
        });

        let report = ctl.play_ai_turn(&mut game, &bad).unwrap();
        assert!(!report.success);
        assert!(report.message.starts_with("AI error"));
        assert_eq!(game.snapshot(), before);
        assert_eq!(game.turn(), Color::Red);
        assert!(game.history().is_empty());
    }
}
