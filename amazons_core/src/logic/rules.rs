use crate::logic::board::{Board, Color, Coord, Occupancy};
use thiserror::Error;

/// Every rejection a turn action or a search request can produce. The
/// `Display` text is meant to be shown to the player as is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("coordinates are outside the board")]
    OutOfBounds,
    #[error("the game is already over")]
    GameFinished,
    #[error("there is no piece on that cell")]
    NoPieceAtSource,
    #[error("that cell is already taken")]
    PositionOccupied,
    #[error("it is not that piece's turn")]
    WrongTurn,
    #[error("pieces and arrows travel in straight lines only")]
    NotAStraightLine,
    #[error("the path is blocked")]
    PathBlocked,
    #[error("there is nothing to undo")]
    NothingToUndo,
    #[error("no legal move is available")]
    NoLegalMove,
}

/// Queen directions as `(dcol, drow)`. Enumeration order matters for
/// deterministic search tie-breaks.
pub const DIRECTIONS: [(i32, i32); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

#[must_use]
pub const fn in_bounds(size: usize, pos: Coord) -> bool {
    let n = size as i32;
    pos.col >= 0 && pos.col < n && pos.row >= 0 && pos.row < n
}

/// Same row, same column or same diagonal, and not a zero-length move.
#[must_use]
pub const fn is_queen_line(from: Coord, to: Coord) -> bool {
    let dc = (to.col - from.col).abs();
    let dr = (to.row - from.row).abs();
    if dc == 0 && dr == 0 {
        return false;
    }
    dc == 0 || dr == 0 || dc == dr
}

/// Unit step from `from` toward `to`, if they share a queen line.
#[must_use]
pub const fn step_toward(from: Coord, to: Coord) -> Option<(i32, i32)> {
    if !is_queen_line(from, to) {
        return None;
    }
    Some(((to.col - from.col).signum(), (to.row - from.row).signum()))
}

/// Walks from `from` (exclusive) to `to` (inclusive) and fails on the first
/// occupied cell. `from` itself is never probed, so a queen does not block its
/// own move and does not block an arrow fired from its cell, while it still
/// blocks any line passing through it.
pub fn is_path_clear(board: &Board, from: Coord, to: Coord) -> bool {
    trace_path(&board.occupancy(), from, to)
}

pub(crate) fn trace_path(occ: &Occupancy, from: Coord, to: Coord) -> bool {
    if !in_bounds(occ.size(), to) {
        return false;
    }
    let Some((dc, dr)) = step_toward(from, to) else {
        return false;
    };

    let mut pos = from.offset(dc, dr);
    loop {
        if !occ.is_free(pos) {
            return false;
        }
        if pos == to {
            return true;
        }
        pos = pos.offset(dc, dr);
    }
}

/// One-step mobility probe: a queen can move at all iff some adjacent cell
/// is free.
pub fn can_player_move(board: &Board, color: Color) -> bool {
    let occ = board.occupancy();
    board.pieces_of(color).any(|piece| {
        DIRECTIONS
            .iter()
            .any(|&(dc, dr)| occ.is_free(piece.pos.offset(dc, dr)))
    })
}

/// Also fails for every cell of a board larger than the supported maximum.
pub fn ensure_in_bounds(board: &Board, cells: &[Coord]) -> Result<(), MoveError> {
    if board.has_supported_size() && cells.iter().all(|&c| board.in_bounds(c)) {
        Ok(())
    } else {
        Err(MoveError::OutOfBounds)
    }
}

/// Checks a queen move for `turn` and returns the index of the moving piece.
/// Bounds are expected to have been checked already.
pub fn validate_move(
    board: &Board,
    from: Coord,
    to: Coord,
    turn: Color,
) -> Result<usize, MoveError> {
    let idx = board
        .piece_index_at(from)
        .ok_or(MoveError::NoPieceAtSource)?;
    if board.pieces.get(idx).map(|p| p.color) != Some(turn) {
        return Err(MoveError::WrongTurn);
    }
    if !is_queen_line(from, to) {
        return Err(MoveError::NotAStraightLine);
    }
    if !is_path_clear(board, from, to) {
        return Err(MoveError::PathBlocked);
    }
    Ok(idx)
}

/// Arrow placement only needs an empty in-bounds target.
pub fn validate_arrow(board: &Board, target: Coord) -> Result<(), MoveError> {
    ensure_in_bounds(board, &[target])?;
    if board.is_occupied(target) {
        return Err(MoveError::PositionOccupied);
    }
    Ok(())
}

/// Arrow fired by the queen standing on `shooter`: the target must also lie
/// on a clear queen line from it.
pub fn validate_shot(board: &Board, shooter: Coord, target: Coord) -> Result<(), MoveError> {
    validate_arrow(board, target)?;
    if !is_queen_line(shooter, target) {
        return Err(MoveError::NotAStraightLine);
    }
    if !is_path_clear(board, shooter, target) {
        return Err(MoveError::PathBlocked);
    }
    Ok(())
}
