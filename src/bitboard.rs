use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, Not, Sub, SubAssign};

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, FromRepr};

use crate::position::BoardError;

#[rustfmt::skip]
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, EnumString, FromRepr, Display, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub enum Square {
    A1, B1, C1, D1, E1, F1, G1, H1,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A8, B8, C8, D8, E8, F8, G8, H8,
}

impl Square {
    /// Builds a square from zero based file (a = 0) and rank (1 = 0) coordinates.
    pub fn new(file: i8, rank: i8) -> Result<Square, BoardError> {
        if !(0..8).contains(&file) || !(0..8).contains(&rank) {
            return Err(BoardError::InvalidSquare { file, rank });
        }
        Ok(Square::from_u8((rank * 8 + file) as u8))
    }

    pub const fn file(self) -> u8 {
        self as u8 % 8
    }

    pub const fn rank(self) -> u8 {
        self as u8 / 8
    }

    /// The square `file_delta` files and `rank_delta` ranks away, if it is still on the board.
    pub fn offset(self, file_delta: i8, rank_delta: i8) -> Option<Square> {
        Square::new(self.file() as i8 + file_delta, self.rank() as i8 + rank_delta).ok()
    }

    pub(crate) const fn from_u8(idx: u8) -> Square {
        match Square::from_repr(idx) {
            Some(sq) => sq,
            None => panic!("square out of bounds"),
        }
    }

    /// Lowercase coordinate notation, e.g. `e4`.
    pub fn to_algebraic(self) -> String {
        self.to_string().to_ascii_lowercase()
    }

    #[rustfmt::skip]
    pub const fn list_white_perspective() -> [Square; 64] {
        [
            Square::A8, Square::B8, Square::C8, Square::D8, Square::E8, Square::F8, Square::G8, Square::H8,
            Square::A7, Square::B7, Square::C7, Square::D7, Square::E7, Square::F7, Square::G7, Square::H7,
            Square::A6, Square::B6, Square::C6, Square::D6, Square::E6, Square::F6, Square::G6, Square::H6,
            Square::A5, Square::B5, Square::C5, Square::D5, Square::E5, Square::F5, Square::G5, Square::H5,
            Square::A4, Square::B4, Square::C4, Square::D4, Square::E4, Square::F4, Square::G4, Square::H4,
            Square::A3, Square::B3, Square::C3, Square::D3, Square::E3, Square::F3, Square::G3, Square::H3,
            Square::A2, Square::B2, Square::C2, Square::D2, Square::E2, Square::F2, Square::G2, Square::H2,
            Square::A1, Square::B1, Square::C1, Square::D1, Square::E1, Square::F1, Square::G1, Square::H1,
        ]
    }
}

#[repr(i8)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Direction {
    IncRank = 8,
    IncFile = 1,
    DecRank = -8,
    DecFile = -1,
}

/// A set of squares, one bit per square with A1 as the least significant bit.
///
/// Iteration always runs from A1 towards H8 (file first, then rank), so anything collected
/// from a `BitBoard` has a stable order for a given board.
#[derive(PartialEq, Eq, Clone, Copy, Hash, Default, Deserialize, Serialize)]
pub struct BitBoard(u64);

impl BitBoard {
    pub const fn empty() -> Self {
        BitBoard(0)
    }

    pub const fn from_square(square: Square) -> Self {
        BitBoard(1 << (square as u8))
    }

    pub const fn from_squares(squares: &[Square]) -> Self {
        let mut val = 0;
        let mut idx = 0;
        while idx < squares.len() {
            val |= 1 << (squares[idx] as u8);
            idx += 1;
        }
        BitBoard(val)
    }

    pub(crate) const fn from_val(val: u64) -> Self {
        BitBoard(val)
    }

    pub(crate) const fn to_val(self) -> u64 {
        self.0
    }

    pub fn to_squares(self) -> Vec<Square> {
        self.into_iter().collect()
    }

    pub(crate) fn move_piece(&mut self, src: Square, dest: Square) {
        self.clear_square(src);
        self.set_square(dest);
    }

    pub(crate) fn set_square(&mut self, square: Square) {
        self.0 |= 1 << square as u64
    }

    pub(crate) fn clear_square(&mut self, square: Square) {
        self.0 &= !(1 << square as u64)
    }

    pub fn contains(&self, square: Square) -> bool {
        self.0 & 1 << (square as u64) != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }

    pub(crate) const fn shift(mut self, dir: Direction) -> BitBoard {
        const EAST_SHIFT_MASK: u64 = 0x7F7F7F7F7F7F7F7F;
        const WEST_SHIFT_MASK: u64 = 0xFEFEFEFEFEFEFEFE;
        match dir {
            Direction::IncFile => self.0 &= EAST_SHIFT_MASK,
            Direction::DecFile => self.0 &= WEST_SHIFT_MASK,
            _ => (),
        }
        let shift_amt = dir as i8;
        if shift_amt >= 0 {
            self.0 <<= shift_amt
        } else {
            self.0 >>= -shift_amt
        }
        self
    }

    pub(crate) fn pop_lsb(&mut self) -> Option<Square> {
        if self.0 == 0 {
            return None;
        }
        let lsb = Square::from_u8(self.0.trailing_zeros() as u8);
        self.0 &= self.0 - 1;
        Some(lsb)
    }

    pub(crate) const fn swap_bytes(self) -> BitBoard {
        BitBoard(self.0.swap_bytes())
    }
}

/// Squares of a `BitBoard`, lowest square first.
pub struct BitBoardIter(BitBoard);

impl Iterator for BitBoardIter {
    type Item = Square;

    fn next(&mut self) -> Option<Square> {
        self.0.pop_lsb()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.0.len() as usize;
        (len, Some(len))
    }
}

impl IntoIterator for BitBoard {
    type Item = Square;
    type IntoIter = BitBoardIter;

    fn into_iter(self) -> BitBoardIter {
        BitBoardIter(self)
    }
}

impl FromIterator<Square> for BitBoard {
    fn from_iter<I: IntoIterator<Item = Square>>(iter: I) -> Self {
        let mut bb = BitBoard::empty();
        for sq in iter {
            bb.set_square(sq);
        }
        bb
    }
}

impl BitOr for BitBoard {
    type Output = BitBoard;

    fn bitor(self, other: BitBoard) -> BitBoard {
        BitBoard(self.0 | other.0)
    }
}

impl BitOrAssign for BitBoard {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0
    }
}

impl BitAnd for BitBoard {
    type Output = BitBoard;

    fn bitand(self, other: BitBoard) -> BitBoard {
        BitBoard(self.0 & other.0)
    }
}

impl BitAndAssign for BitBoard {
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0
    }
}

impl BitXor for BitBoard {
    type Output = BitBoard;

    fn bitxor(self, other: BitBoard) -> BitBoard {
        BitBoard(self.0 ^ other.0)
    }
}

impl Not for BitBoard {
    type Output = BitBoard;

    fn not(self) -> Self::Output {
        BitBoard(!self.0)
    }
}

impl Sub for BitBoard {
    type Output = BitBoard;

    fn sub(self, other: BitBoard) -> Self::Output {
        Self(self.0.wrapping_sub(other.0))
    }
}

impl SubAssign for BitBoard {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 = self.0.wrapping_sub(rhs.0)
    }
}

impl fmt::Debug for BitBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut board_str = String::with_capacity(64 + 7);

        for (idx, square) in Square::list_white_perspective().into_iter().enumerate() {
            board_str.push(if self.contains(square) { 'X' } else { '.' });
            if (idx + 1) % 8 == 0 && idx != 63 {
                board_str.push('\n');
            }
        }

        write!(f, "{}", board_str)
    }
}
