use crate::logic::board::{Board, Color, Coord, Occupancy};
use crate::logic::rules::DIRECTIONS;

/// Every cell a queen on `from` can slide to: in each direction, keep going
/// until the edge or the first occupied cell.
pub fn reachable_from(occ: &Occupancy, from: Coord) -> Vec<Coord> {
    let mut cells = Vec::with_capacity(4 * occ.size());
    for &(dc, dr) in &DIRECTIONS {
        let mut pos = from.offset(dc, dr);
        while occ.is_free(pos) {
            cells.push(pos);
            pos = pos.offset(dc, dr);
        }
    }
    cells
}

/// Allocation-free variant of [`reachable_from`] for evaluation.
pub fn count_reachable(occ: &Occupancy, from: Coord) -> usize {
    let mut count = 0;
    for &(dc, dr) in &DIRECTIONS {
        let mut pos = from.offset(dc, dr);
        while occ.is_free(pos) {
            count += 1;
            pos = pos.offset(dc, dr);
        }
    }
    count
}

pub fn reachable_cells(board: &Board, from: Coord) -> Vec<Coord> {
    reachable_from(&board.occupancy(), from)
}

/// All `(from, to)` queen moves for `color`, in piece order then direction
/// order.
pub fn legal_destinations(board: &Board, color: Color) -> Vec<(Coord, Coord)> {
    let occ = board.occupancy();
    board
        .pieces_of(color)
        .flat_map(|piece| {
            reachable_from(&occ, piece.pos)
                .into_iter()
                .map(move |to| (piece.pos, to))
        })
        .collect()
}
