use std::fmt;

use arrayvec::ArrayVec;
use log::debug;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

use crate::bitboard::Square::*;
use crate::bitboard::{BitBoard, Square};
use crate::move_gen;

pub mod fen;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("square out of bounds: file {file}, rank {rank}")]
    InvalidSquare { file: i8, rank: i8 },

    #[error("no piece at {0}")]
    NoPieceAtSquare(Square),

    #[error("illegal move: {src} -> {dest}")]
    IllegalMove { src: Square, dest: Square },
}

#[derive(Debug, PartialEq, Eq, EnumIter, Clone, Copy, Display, Hash, Deserialize, Serialize)]
pub enum Side {
    White,
    Black,
}

impl Side {
    pub fn opposite_side(self) -> Side {
        if self == Side::White {
            Side::Black
        } else {
            Side::White
        }
    }

    /// Rank step a pawn of this side advances by.
    pub(crate) const fn forward(self) -> i8 {
        match self {
            Side::White => 1,
            Side::Black => -1,
        }
    }

    pub(crate) const fn back_rank(self) -> u8 {
        match self {
            Side::White => 0,
            Side::Black => 7,
        }
    }

    pub(crate) const fn pawn_start_rank(self) -> u8 {
        match self {
            Side::White => 1,
            Side::Black => 6,
        }
    }

    /// +1 for White, -1 for Black. Scores are always White minus Black.
    pub(crate) const fn sign(self) -> i32 {
        match self {
            Side::White => 1,
            Side::Black => -1,
        }
    }
}

#[derive(Debug, PartialEq, Eq, EnumIter, Clone, Copy, Display, Hash, Deserialize, Serialize)]
pub enum Piece {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl Piece {
    pub fn is_slider(self) -> bool {
        match self {
            Piece::Pawn | Piece::Knight | Piece::King => false,
            Piece::Bishop | Piece::Rook | Piece::Queen => true,
        }
    }

    /// Material value in centipawns. The king has no material value and counts as 0.
    pub const fn value(self) -> i32 {
        match self {
            Piece::Pawn => 100,
            Piece::Knight => 300,
            Piece::Bishop => 300,
            Piece::Rook => 500,
            Piece::Queen => 900,
            Piece::King => 0,
        }
    }
}

impl From<Piece> for char {
    fn from(piece: Piece) -> char {
        match piece {
            Piece::Pawn => 'p',
            Piece::Knight => 'n',
            Piece::Bishop => 'b',
            Piece::Rook => 'r',
            Piece::Queen => 'q',
            Piece::King => 'k',
        }
    }
}

impl TryFrom<char> for Piece {
    type Error = char;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            'p' => Ok(Piece::Pawn),
            'n' => Ok(Piece::Knight),
            'b' => Ok(Piece::Bishop),
            'r' => Ok(Piece::Rook),
            'q' => Ok(Piece::Queen),
            'k' => Ok(Piece::King),
            _ => Err(value),
        }
    }
}

/// A piece as it stands on a board. Only the board stores pieces, everything else passes
/// these around by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct BoardPiece {
    pub piece: Piece,
    pub side: Side,
    pub square: Square,
}

impl BoardPiece {
    pub fn new(piece: Piece, side: Side, square: Square) -> Self {
        Self {
            piece,
            side,
            square,
        }
    }

    pub fn to_char(self) -> char {
        let ch: char = self.piece.into();
        match self.side {
            Side::White => ch.to_ascii_uppercase(),
            Side::Black => ch,
        }
    }
}

/// A move produced from a specific board. It carries the moving piece and whatever it
/// captures, so it goes stale as soon as that board changes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Move {
    pub src: Square,
    pub dest: Square,
    pub piece: Piece,
    pub side: Side,
    pub captured: Option<Piece>,
}

impl Move {
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    /// Short algebraic form without check markers, e.g. `Nf3`, `exd5`, `Bxf7`.
    pub fn to_algebraic(&self) -> String {
        let mut notation = String::with_capacity(5);
        match self.piece {
            Piece::Pawn => {
                if self.is_capture() {
                    notation.push((b'a' + self.src.file()) as char);
                }
            }
            piece => notation.push(char::from(piece).to_ascii_uppercase()),
        }
        if self.is_capture() {
            notation.push('x');
        }
        notation += &self.dest.to_algebraic();
        notation
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} -> {}", self.side, self.piece, self.src, self.dest)?;
        if let Some(captured) = self.captured {
            write!(f, " (x{})", captured)?;
        }
        Ok(())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.src.to_algebraic(), self.dest.to_algebraic())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Sides {
    white: BitBoard,
    black: BitBoard,
}

impl Sides {
    const fn new() -> Self {
        Self {
            white: BitBoard::empty(),
            black: BitBoard::empty(),
        }
    }

    const fn mirrored(white: &[Square], black: &[Square]) -> Self {
        Self {
            white: BitBoard::from_squares(white),
            black: BitBoard::from_squares(black),
        }
    }

    pub(crate) fn get(&self, side: Side) -> BitBoard {
        match side {
            Side::White => self.white,
            Side::Black => self.black,
        }
    }

    fn get_mut(&mut self, side: Side) -> &mut BitBoard {
        match side {
            Side::White => &mut self.white,
            Side::Black => &mut self.black,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Pieces {
    pawns: Sides,
    knights: Sides,
    bishops: Sides,
    rooks: Sides,
    queens: Sides,
    kings: Sides,
}

impl Pieces {
    const fn new() -> Self {
        Self {
            pawns: Sides::new(),
            knights: Sides::new(),
            bishops: Sides::new(),
            rooks: Sides::new(),
            queens: Sides::new(),
            kings: Sides::new(),
        }
    }

    const fn start() -> Self {
        Self {
            pawns: Sides::mirrored(
                &[A2, B2, C2, D2, E2, F2, G2, H2],
                &[A7, B7, C7, D7, E7, F7, G7, H7],
            ),
            knights: Sides::mirrored(&[B1, G1], &[B8, G8]),
            bishops: Sides::mirrored(&[C1, F1], &[C8, F8]),
            rooks: Sides::mirrored(&[A1, H1], &[A8, H8]),
            queens: Sides::mirrored(&[D1], &[D8]),
            kings: Sides::mirrored(&[E1], &[E8]),
        }
    }

    pub(crate) fn get(&self, piece: Piece) -> &Sides {
        match piece {
            Piece::Pawn => &self.pawns,
            Piece::Knight => &self.knights,
            Piece::Bishop => &self.bishops,
            Piece::Rook => &self.rooks,
            Piece::Queen => &self.queens,
            Piece::King => &self.kings,
        }
    }

    fn get_mut(&mut self, piece: Piece) -> &mut Sides {
        match piece {
            Piece::Pawn => &mut self.pawns,
            Piece::Knight => &mut self.knights,
            Piece::Bishop => &mut self.bishops,
            Piece::Rook => &mut self.rooks,
            Piece::Queen => &mut self.queens,
            Piece::King => &mut self.kings,
        }
    }

    fn sides(&self) -> Sides {
        Piece::iter().fold(Sides::new(), |mut acc, piece| {
            let sides = self.get(piece);
            acc.white |= sides.white;
            acc.black |= sides.black;
            acc
        })
    }
}

/// The 8x8 board: which piece, if any, stands on each square, plus whose turn it is.
///
/// Rank index 0 is White's back rank and White pawns move towards higher ranks.
///
/// A `Board` is plain owned data. Every query takes `&Board` and the only mutators take
/// `&mut Board`, so reading while another thread applies a move is ruled out by the borrow
/// checker rather than by a lock. Concurrent analyses should each work on their own clone.
///
/// Serializes as a FEN string; deserializing goes through [`Board::from_fen`].
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Board {
    pub to_move: Side,
    pub(crate) sides: Sides,
    pub(crate) pieces: Pieces,
}

impl Board {
    pub fn start() -> Self {
        let pieces = Pieces::start();
        Self {
            to_move: Side::White,
            sides: pieces.sides(),
            pieces,
        }
    }

    /// A board with no pieces on it, for setting up positions piece by piece.
    pub(crate) fn empty(to_move: Side) -> Self {
        Self {
            to_move,
            sides: Sides::new(),
            pieces: Pieces::new(),
        }
    }

    pub fn reset(&mut self) {
        *self = Board::start();
    }

    pub fn piece_at(&self, square: Square) -> Option<BoardPiece> {
        let side = if self.sides.white.contains(square) {
            Side::White
        } else if self.sides.black.contains(square) {
            Side::Black
        } else {
            return None;
        };

        Piece::iter()
            .find(|&piece| self.pieces.get(piece).get(side).contains(square))
            .map(|piece| BoardPiece::new(piece, side, square))
    }

    /// Pieces of `side`, optionally only those of one type, grouped by type and then ordered
    /// from A1 towards H8.
    pub fn pieces_of(&self, side: Side, piece: Option<Piece>) -> ArrayVec<BoardPiece, 64> {
        let mut piece_locs = ArrayVec::new();
        for piece_type in Piece::iter().filter(|&p| piece.map_or(true, |want| want == p)) {
            for square in self.pieces.get(piece_type).get(side) {
                piece_locs.push(BoardPiece::new(piece_type, side, square));
            }
        }
        piece_locs
    }

    pub fn all_pieces(&self) -> ArrayVec<BoardPiece, 64> {
        let mut piece_locs = self.pieces_of(Side::White, None);
        piece_locs.extend(self.pieces_of(Side::Black, None));
        piece_locs
    }

    pub fn occupancy(&self) -> BitBoard {
        self.sides.white | self.sides.black
    }

    pub fn side_occupancy(&self, side: Side) -> BitBoard {
        self.sides.get(side)
    }

    pub fn piece_squares(&self, piece: Piece, side: Side) -> BitBoard {
        self.pieces.get(piece).get(side)
    }

    pub fn king_square(&self, side: Side) -> Option<Square> {
        self.piece_squares(Piece::King, side).into_iter().next()
    }

    /// Sum of piece values for `side`, in centipawns.
    pub fn material(&self, side: Side) -> i32 {
        Piece::iter()
            .map(|piece| self.piece_squares(piece, side).len() as i32 * piece.value())
            .sum()
    }

    /// Puts a piece on `square`, returning whatever stood there before.
    pub(crate) fn place_piece(&mut self, piece: Piece, side: Side, square: Square) -> Option<BoardPiece> {
        let replaced = self.take_piece(square);
        self.sides.get_mut(side).set_square(square);
        self.pieces.get_mut(piece).get_mut(side).set_square(square);
        replaced
    }

    fn take_piece(&mut self, square: Square) -> Option<BoardPiece> {
        let removed = self.piece_at(square)?;
        self.sides.get_mut(removed.side).clear_square(square);
        self.pieces
            .get_mut(removed.piece)
            .get_mut(removed.side)
            .clear_square(square);
        Some(removed)
    }

    /// Checks `src -> dest` against the moving piece's destination set and describes it as a
    /// `Move` for this board.
    pub fn prepare_move(&self, src: Square, dest: Square) -> Result<Move, BoardError> {
        let moving = self.piece_at(src).ok_or(BoardError::NoPieceAtSquare(src))?;

        if !move_gen::legal_moves_for(&moving, self).contains(dest) {
            return Err(BoardError::IllegalMove { src, dest });
        }

        Ok(Move {
            src,
            dest,
            piece: moving.piece,
            side: moving.side,
            captured: self.piece_at(dest).map(|captured| captured.piece),
        })
    }

    /// Applies a move generated from this board. A move generated from some other state of
    /// the board is rejected as illegal.
    pub fn apply_move(&mut self, mve: &Move) -> Result<Option<BoardPiece>, BoardError> {
        let checked = self.prepare_move(mve.src, mve.dest)?;
        if checked != *mve {
            return Err(BoardError::IllegalMove {
                src: mve.src,
                dest: mve.dest,
            });
        }
        Ok(self.apply_checked(&checked))
    }

    /// Validates and applies `src -> dest` in one go.
    pub fn make_move(&mut self, src: Square, dest: Square) -> Result<Option<BoardPiece>, BoardError> {
        let mve = self.prepare_move(src, dest)?;
        Ok(self.apply_checked(&mve))
    }

    fn apply_checked(&mut self, mve: &Move) -> Option<BoardPiece> {
        let captured = self.take_piece(mve.dest);

        self.sides.get_mut(mve.side).move_piece(mve.src, mve.dest);
        self.pieces
            .get_mut(mve.piece)
            .get_mut(mve.side)
            .move_piece(mve.src, mve.dest);

        self.to_move = mve.side.opposite_side();

        debug!("applied {:?}, {} to move", mve, self.to_move);
        captured
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::start()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut board_str = String::with_capacity(64 + 7);
        for (idx, square) in Square::list_white_perspective().into_iter().enumerate() {
            let ch = self.piece_at(square).map_or('.', BoardPiece::to_char);
            board_str.push(ch);
            if (idx + 1) % 8 == 0 && idx != 63 {
                board_str.push('\n');
            }
        }
        write!(f, "{}", board_str)
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;
    use testresult::TestResult;

    #[test]
    fn test_display() {
        let got = Board::start();
        let want = "rnbqkbnr\npppppppp\n........\n........\n........\n........\nPPPPPPPP\nRNBQKBNR";

        assert_eq!(format!("{}", got), want);
    }

    #[test_case(E1, Some(BoardPiece::new(Piece::King, Side::White, E1)) ; "white king")]
    #[test_case(D8, Some(BoardPiece::new(Piece::Queen, Side::Black, D8)) ; "black queen")]
    #[test_case(E4, None ; "empty")]
    fn test_piece_at(square: Square, want: Option<BoardPiece>) {
        assert_eq!(Board::start().piece_at(square), want);
    }

    #[test]
    fn test_pieces_of() {
        let board = Board::start();

        assert_eq!(board.pieces_of(Side::White, None).len(), 16);
        assert_eq!(board.pieces_of(Side::Black, Some(Piece::Pawn)).len(), 8);

        let knights: Vec<Square> = board
            .pieces_of(Side::White, Some(Piece::Knight))
            .iter()
            .map(|p| p.square)
            .collect();
        assert_eq!(knights, vec![B1, G1]);
    }

    #[test]
    fn test_place_piece_replaces_occupant() {
        let mut board = Board::start();

        let replaced = board.place_piece(Piece::Knight, Side::Black, E2);

        assert_eq!(replaced, Some(BoardPiece::new(Piece::Pawn, Side::White, E2)));
        assert_eq!(board.piece_at(E2), Some(BoardPiece::new(Piece::Knight, Side::Black, E2)));
        assert!(!board.side_occupancy(Side::White).contains(E2));
        assert!(!board.piece_squares(Piece::Pawn, Side::White).contains(E2));
        assert_eq!(board.pieces_of(Side::White, None).len(), 15);
        assert_eq!(board.pieces_of(Side::Black, None).len(), 17);
    }

    #[test]
    fn test_make_move() -> TestResult {
        let mut board = Board::start();

        let captured = board.make_move(D2, D4)?;

        assert_eq!(captured, None);
        assert!(board.piece_at(D2).is_none());
        assert_eq!(
            board.piece_at(D4),
            Some(BoardPiece::new(Piece::Pawn, Side::White, D4))
        );
        assert_eq!(board.to_move, Side::Black);
        Ok(())
    }

    #[test]
    fn test_make_move_capture() -> TestResult {
        let mut board = Board::start();
        board.make_move(E2, E4)?;
        board.make_move(D7, D5)?;

        let captured = board.make_move(E4, D5)?;

        assert_eq!(captured, Some(BoardPiece::new(Piece::Pawn, Side::Black, D5)));
        assert_eq!(board.pieces_of(Side::Black, Some(Piece::Pawn)).len(), 7);
        Ok(())
    }

    #[test_case(E4, E5, BoardError::NoPieceAtSquare(E4) ; "empty source")]
    #[test_case(D1, D3, BoardError::IllegalMove { src: D1, dest: D3 } ; "slide through own pawn")]
    #[test_case(A1, A2, BoardError::IllegalMove { src: A1, dest: A2 } ; "capture own piece")]
    #[test_case(E2, E5, BoardError::IllegalMove { src: E2, dest: E5 } ; "pawn too far")]
    fn test_make_move_err(src: Square, dest: Square, want: BoardError) {
        let mut board = Board::start();

        let got = board.make_move(src, dest);

        assert_eq!(got, Err(want));
        assert_eq!(board, Board::start());
    }

    #[test]
    fn test_apply_stale_move() -> TestResult {
        let mut board = Board::start();
        let mve = board.prepare_move(E2, E4)?;
        board.make_move(E2, E3)?;

        let got = board.apply_move(&mve);

        assert_eq!(got, Err(BoardError::NoPieceAtSquare(E2)));
        Ok(())
    }

    #[test]
    fn test_reset() -> TestResult {
        let mut board = Board::start();
        board.make_move(G1, F3)?;
        board.reset();
        assert_eq!(board, Board::start());
        Ok(())
    }

    #[test]
    fn test_material() {
        let board = Board::start();
        assert_eq!(board.material(Side::White), 3900);
        assert_eq!(board.material(Side::Black), 3900);
    }

    #[test_case(Move { src: G1, dest: F3, piece: Piece::Knight, side: Side::White, captured: None }, "Nf3" ; "knight")]
    #[test_case(Move { src: E4, dest: D5, piece: Piece::Pawn, side: Side::White, captured: Some(Piece::Pawn) }, "exd5" ; "pawn capture")]
    #[test_case(Move { src: C4, dest: F7, piece: Piece::Bishop, side: Side::White, captured: Some(Piece::Pawn) }, "Bxf7" ; "bishop capture")]
    #[test_case(Move { src: E7, dest: E5, piece: Piece::Pawn, side: Side::Black, captured: None }, "e5" ; "pawn push")]
    fn test_move_algebraic(mve: Move, want: &str) {
        assert_eq!(mve.to_algebraic(), want);
    }
}
