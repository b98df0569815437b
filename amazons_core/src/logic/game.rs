use crate::logic::board::{Board, BoardPreset, Color, Coord};
use crate::logic::rules::{self, MoveError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Playing,
    Finished { winner: Color },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    Pvp,
    /// One side is played by the search engine.
    Pve { ai: Color },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Move,
    Block,
}

/// Display/highlighting entry. Game logic never reads these back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    #[serde(rename = "type")]
    pub kind: RecordKind,
    pub from: Coord,
    pub to: Coord,
    pub ts: u64,
}

/// Full state taken right before a mutating action; undo pops one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub board: Board,
    pub turn: Color,
    pub status: GameStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrowOutcome {
    /// Set when the arrow left the opponent without a legal move.
    pub winner: Option<Color>,
}

#[derive(Debug, Clone)]
pub struct GameState {
    pub(crate) id: String,
    pub(crate) mode: GameMode,
    pub(crate) board: Board,
    pub(crate) turn: Color,
    pub(crate) status: GameStatus,
    pub(crate) moves: Vec<MoveRecord>,
    pub(crate) history: Vec<Snapshot>,
}

impl GameState {
    #[must_use]
    pub fn new(preset: BoardPreset) -> Self {
        Self::from_position(Board::new(preset), Color::Red)
    }

    /// Starts a match from an arbitrary position. The status is derived from
    /// `turn`'s mobility, so a position where the side to move is already
    /// walled in starts finished.
    #[must_use]
    pub fn from_position(board: Board, turn: Color) -> Self {
        let status = if rules::can_player_move(&board, turn) {
            GameStatus::Playing
        } else {
            GameStatus::Finished {
                winner: turn.opposite(),
            }
        };
        Self {
            id: String::new(),
            mode: GameMode::Pvp,
            board,
            turn,
            status,
            moves: Vec::new(),
            history: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    #[must_use]
    pub fn with_mode(mut self, mode: GameMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub const fn mode(&self) -> GameMode {
        self.mode
    }

    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Owned copy for the search engine or a renderer.
    pub fn snapshot(&self) -> Board {
        self.board.clone()
    }

    pub const fn turn(&self) -> Color {
        self.turn
    }

    pub const fn status(&self) -> GameStatus {
        self.status
    }

    pub const fn winner(&self) -> Option<Color> {
        match self.status {
            GameStatus::Playing => None,
            GameStatus::Finished { winner } => Some(winner),
        }
    }

    pub const fn is_finished(&self) -> bool {
        matches!(self.status, GameStatus::Finished { .. })
    }

    pub fn moves(&self) -> &[MoveRecord] {
        &self.moves
    }

    pub fn history(&self) -> &[Snapshot] {
        &self.history
    }

    /// First half of a turn. The side to move does not change until the
    /// arrow is placed.
    pub fn move_piece(&mut self, from: Coord, to: Coord) -> Result<(), MoveError> {
        rules::ensure_in_bounds(&self.board, &[from, to])?;
        self.ensure_playing()?;
        let idx = rules::validate_move(&self.board, from, to, self.turn)?;

        self.push_snapshot();
        if let Some(piece) = self.board.pieces.get_mut(idx) {
            piece.pos = to;
        }
        self.record(RecordKind::Move, from, to);

        log::debug!("{} moved {} -> {}", self.turn, from, to);
        Ok(())
    }

    /// Second half of a turn: blocks `target`, hands the move to the
    /// opponent, and ends the game if the opponent is walled in.
    pub fn place_arrow(&mut self, target: Coord) -> Result<ArrowOutcome, MoveError> {
        rules::ensure_in_bounds(&self.board, &[target])?;
        self.ensure_playing()?;
        rules::validate_arrow(&self.board, target)?;

        self.push_snapshot();
        let shooter = self.shooter_cell(target);
        self.board.add_block(target);
        self.record(RecordKind::Block, shooter, target);

        let mover = self.turn;
        self.turn = mover.opposite();
        log::debug!("{} shot an arrow at {}", mover, target);

        if rules::can_player_move(&self.board, self.turn) {
            return Ok(ArrowOutcome { winner: None });
        }

        self.status = GameStatus::Finished { winner: mover };
        log::info!(
            "game {:?} over: {} cannot move, {} wins after {} actions",
            self.id,
            self.turn,
            mover,
            self.moves.len()
        );
        Ok(ArrowOutcome {
            winner: Some(mover),
        })
    }

    /// Reverts the most recent single action (a move or an arrow).
    pub fn undo(&mut self) -> Result<(), MoveError> {
        let snapshot = self.history.pop().ok_or(MoveError::NothingToUndo)?;
        self.board = snapshot.board;
        self.turn = snapshot.turn;
        self.status = snapshot.status;
        self.moves.pop();

        log::debug!("undo: {} to play, {} actions left", self.turn, self.history.len());
        Ok(())
    }

    const fn ensure_playing(&self) -> Result<(), MoveError> {
        match self.status {
            GameStatus::Playing => Ok(()),
            GameStatus::Finished { .. } => Err(MoveError::GameFinished),
        }
    }

    fn push_snapshot(&mut self) {
        self.history.push(Snapshot {
            board: self.board.clone(),
            turn: self.turn,
            status: self.status,
        });
    }

    /// The arrow's origin for the move log: the queen moved in this turn, if
    /// the previous action was that move.
    fn shooter_cell(&self, target: Coord) -> Coord {
        match self.moves.last() {
            Some(last) if last.kind == RecordKind::Move => last.to,
            _ => target,
        }
    }

    fn record(&mut self, kind: RecordKind, from: Coord, to: Coord) {
        self.moves.push(MoveRecord {
            kind,
            from,
            to,
            ts: now_ms(),
        });
    }
}

pub(crate) fn now_ms() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let ms = js_sys::Date::now() as u64;
        ms
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        use std::time::{SystemTime, UNIX_EPOCH};
        let since_the_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        u64::try_from(since_the_epoch.as_millis()).unwrap_or(u64::MAX)
    }
}
