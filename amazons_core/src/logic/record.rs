//! Serialisable form of a whole match: the layout an external save/load layer
//! writes to disk. Field names follow the save-file JSON object (`id, mode,
//! currentPlayer, status, winner, pieces, blocks, moves, history`).

use crate::logic::board::{Board, Color, Coord, Occupancy, Piece, MAX_BOARD_SIZE};
use crate::logic::game::{GameMode, GameState, GameStatus, MoveRecord, Snapshot};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("malformed game record: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid game record: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusTag {
    Playing,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotRecord {
    pub pieces: Vec<Piece>,
    pub blocks: Vec<Coord>,
    pub current_player: Color,
    pub status: StatusTag,
    /// `null` while the game is running.
    pub winner: Option<Color>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    pub id: String,
    pub mode: GameMode,
    pub board_size: usize,
    pub current_player: Color,
    pub status: StatusTag,
    pub winner: Option<Color>,
    pub pieces: Vec<Piece>,
    pub blocks: Vec<Coord>,
    pub moves: Vec<MoveRecord>,
    pub history: Vec<SnapshotRecord>,
}

impl GameRecord {
    pub fn to_json(&self) -> Result<String, RecordError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, RecordError> {
        Ok(serde_json::from_str(json)?)
    }
}

const fn split_status(status: GameStatus) -> (StatusTag, Option<Color>) {
    match status {
        GameStatus::Playing => (StatusTag::Playing, None),
        GameStatus::Finished { winner } => (StatusTag::Finished, Some(winner)),
    }
}

fn join_status(tag: StatusTag, winner: Option<Color>) -> Result<GameStatus, RecordError> {
    match (tag, winner) {
        (StatusTag::Playing, None) => Ok(GameStatus::Playing),
        (StatusTag::Finished, Some(winner)) => Ok(GameStatus::Finished { winner }),
        (StatusTag::Playing, Some(w)) => Err(RecordError::Invalid(format!(
            "game in progress but {w} is recorded as winner"
        ))),
        (StatusTag::Finished, None) => Err(RecordError::Invalid(
            "finished game without a winner".to_string(),
        )),
    }
}

/// Positions must fit the board and never stack two things on one cell. Queen
/// counts are free so custom positions load back as they were saved.
fn validate_position(size: usize, pieces: &[Piece], blocks: &[Coord]) -> Result<Board, RecordError> {
    let board = Board {
        size,
        pieces: pieces.to_vec(),
        blocks: blocks.to_vec(),
    };

    let mut occ = Occupancy::empty(size);
    let cells = board.pieces.iter().map(|p| p.pos).chain(board.blocks.iter().copied());
    for cell in cells {
        if !board.in_bounds(cell) {
            return Err(RecordError::Invalid(format!("{cell} is off the board")));
        }
        if occ.contains(cell) {
            return Err(RecordError::Invalid(format!("{cell} is occupied twice")));
        }
        occ.insert(cell);
    }
    Ok(board)
}

impl GameState {
    pub fn to_record(&self) -> GameRecord {
        let (status, winner) = split_status(self.status);
        GameRecord {
            id: self.id.clone(),
            mode: self.mode,
            board_size: self.board.size,
            current_player: self.turn,
            status,
            winner,
            pieces: self.board.pieces.clone(),
            blocks: self.board.blocks.clone(),
            moves: self.moves.clone(),
            history: self
                .history
                .iter()
                .map(|snap| {
                    let (status, winner) = split_status(snap.status);
                    SnapshotRecord {
                        pieces: snap.board.pieces.clone(),
                        blocks: snap.board.blocks.clone(),
                        current_player: snap.turn,
                        status,
                        winner,
                    }
                })
                .collect(),
        }
    }

    pub fn from_record(record: GameRecord) -> Result<Self, RecordError> {
        let size = record.board_size;
        if !(1..=MAX_BOARD_SIZE).contains(&size) {
            return Err(RecordError::Invalid(format!(
                "board size {size} is not supported"
            )));
        }

        let board = validate_position(size, &record.pieces, &record.blocks)?;
        let status = join_status(record.status, record.winner)?;

        let mut history = Vec::with_capacity(record.history.len());
        for snap in &record.history {
            history.push(Snapshot {
                board: validate_position(size, &snap.pieces, &snap.blocks)?,
                turn: snap.current_player,
                status: join_status(snap.status, snap.winner)?,
            });
        }

        log::debug!(
            "restored game {:?}: {} to play, {} undo steps",
            record.id,
            record.current_player,
            history.len()
        );

        Ok(Self {
            id: record.id,
            mode: record.mode,
            board,
            turn: record.current_player,
            status,
            moves: record.moves,
            history,
        })
    }

    pub fn to_json(&self) -> Result<String, RecordError> {
        self.to_record().to_json()
    }

    pub fn from_json(json: &str) -> Result<Self, RecordError> {
        Self::from_record(GameRecord::from_json(json)?)
    }
}

impl TryFrom<GameRecord> for GameState {
    type Error = RecordError;

    fn try_from(record: GameRecord) -> Result<Self, Self::Error> {
        Self::from_record(record)
    }
}
