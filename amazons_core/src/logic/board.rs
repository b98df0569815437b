use crate::logic::rules::in_bounds;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest supported board edge. Every cell key (`row * N + col`) must fit
/// in the 128-bit occupancy set.
pub const MAX_BOARD_SIZE: usize = 11;
pub const PIECES_PER_SIDE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    /// Moves first.
    Red,
    Blue,
}

impl Color {
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Red => Self::Blue,
            Self::Blue => Self::Red,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Red => "Red",
            Self::Blue => "Blue",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Zero-indexed cell address. Signed so that out-of-range requests can be
/// expressed and rejected instead of failing to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub col: i32,
    pub row: i32,
}

impl Coord {
    #[must_use]
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    #[must_use]
    pub const fn offset(self, dc: i32, dr: i32) -> Self {
        Self {
            col: self.col + dc,
            row: self.row + dr,
        }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    #[serde(flatten)]
    pub pos: Coord,
    pub color: Color,
}

/// Starting layouts. The two observed variants disagree on board size, so
/// both are offered and the choice belongs to the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardPreset {
    /// 8x8, queens inset two cells from the corners.
    Small8,
    /// 10x10, the classic tournament layout.
    Standard10,
}

impl BoardPreset {
    pub const fn size(self) -> usize {
        match self {
            Self::Small8 => 8,
            Self::Standard10 => 10,
        }
    }

    /// Red occupies row 0 and the flanks near it; Blue mirrors it vertically.
    pub fn start_pieces(self) -> Vec<Piece> {
        let n = self.size() as i32;
        let inset = match self {
            Self::Small8 => 2,
            Self::Standard10 => 3,
        };
        let far = n - 1;
        let red = [
            Coord::new(inset, 0),
            Coord::new(far - inset, 0),
            Coord::new(0, inset),
            Coord::new(far, inset),
        ];

        let mut pieces = Vec::with_capacity(PIECES_PER_SIDE * 2);
        for pos in red {
            pieces.push(Piece {
                pos,
                color: Color::Red,
            });
        }
        for pos in red {
            pieces.push(Piece {
                pos: Coord::new(pos.col, far - pos.row),
                color: Color::Blue,
            });
        }
        pieces
    }
}

/// Set of occupied cells keyed by `row * N + col`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occupancy {
    bits: u128,
    size: usize,
}

impl Occupancy {
    pub const fn empty(size: usize) -> Self {
        Self { bits: 0, size }
    }

    /// `None` off the board, and everywhere on a board too large for the set.
    const fn key(&self, pos: Coord) -> Option<usize> {
        if self.size <= MAX_BOARD_SIZE && in_bounds(self.size, pos) {
            Some(pos.row as usize * self.size + pos.col as usize)
        } else {
            None
        }
    }

    pub fn insert(&mut self, pos: Coord) {
        if let Some(key) = self.key(pos) {
            self.bits |= 1u128 << key;
        }
    }

    /// Out-of-bounds cells are never members.
    pub fn contains(&self, pos: Coord) -> bool {
        self.key(pos)
            .is_some_and(|key| self.bits & (1u128 << key) != 0)
    }

    /// In bounds and unoccupied.
    pub fn is_free(&self, pos: Coord) -> bool {
        self.key(pos)
            .is_some_and(|key| self.bits & (1u128 << key) == 0)
    }

    pub const fn size(&self) -> usize {
        self.size
    }

    pub const fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }
}

/// Plain board value: size plus ordered piece and arrow lists. This is the
/// snapshot handed between the game engine, the search engine and any
/// renderer; copies never alias each other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub size: usize,
    pub pieces: Vec<Piece>,
    pub blocks: Vec<Coord>,
}

impl Board {
    #[must_use]
    pub fn new(preset: BoardPreset) -> Self {
        Self {
            size: preset.size(),
            pieces: preset.start_pieces(),
            blocks: Vec::new(),
        }
    }

    #[must_use]
    pub const fn empty(size: usize) -> Self {
        Self {
            size,
            pieces: Vec::new(),
            blocks: Vec::new(),
        }
    }

    pub fn add_piece(&mut self, pos: Coord, color: Color) {
        self.pieces.push(Piece { pos, color });
    }

    pub fn add_block(&mut self, pos: Coord) {
        self.blocks.push(pos);
    }

    pub const fn in_bounds(&self, pos: Coord) -> bool {
        in_bounds(self.size, pos)
    }

    /// Sizes the occupancy set can key: 1 ..= `MAX_BOARD_SIZE`.
    pub const fn has_supported_size(&self) -> bool {
        self.size >= 1 && self.size <= MAX_BOARD_SIZE
    }

    pub fn piece_index_at(&self, pos: Coord) -> Option<usize> {
        self.pieces.iter().position(|p| p.pos == pos)
    }

    pub fn piece_at(&self, pos: Coord) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.pos == pos)
    }

    pub fn has_block_at(&self, pos: Coord) -> bool {
        self.blocks.contains(&pos)
    }

    pub fn is_occupied(&self, pos: Coord) -> bool {
        self.piece_at(pos).is_some() || self.has_block_at(pos)
    }

    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = &Piece> + '_ {
        self.pieces.iter().filter(move |p| p.color == color)
    }

    /// Rebuilt on every call; boards are at most 121 cells.
    pub fn occupancy(&self) -> Occupancy {
        let mut occ = Occupancy::empty(self.size);
        for piece in &self.pieces {
            occ.insert(piece.pos);
        }
        for &block in &self.blocks {
            occ.insert(block);
        }
        occ
    }

    /// Relocates whatever piece stands on `from` without any rule checks.
    /// Returns the owner of the moved piece, or `None` if `from` was empty.
    pub fn move_piece_quiet(&mut self, from: Coord, to: Coord) -> Option<Color> {
        let piece = self.pieces.iter_mut().find(|p| p.pos == from)?;
        piece.pos = to;
        Some(piece.color)
    }

    /// Text rendering, row 0 first: `R`/`B` queens, `#` arrows, `.` empty.
    pub fn to_diagram(&self) -> String {
        let mut out = String::with_capacity(self.size * (self.size * 2 + 1));
        for row in 0..self.size as i32 {
            for col in 0..self.size as i32 {
                let pos = Coord::new(col, row);
                let ch = match self.piece_at(pos) {
                    Some(p) if p.color == Color::Red => 'R',
                    Some(_) => 'B',
                    None if self.has_block_at(pos) => '#',
                    None => '.',
                };
                if col > 0 {
                    out.push(' ');
                }
                out.push(ch);
            }
            out.push('\n');
        }
        out
    }
}
