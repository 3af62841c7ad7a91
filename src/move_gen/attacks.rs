use strum::IntoEnumIterator;

use crate::bitboard::{BitBoard, Direction, Square};
use crate::move_gen::attacks_from;
use crate::position::{Board, Piece, Side};

/// Every square at least one of `side`'s pieces attacks.
pub fn attacked_squares(board: &Board, side: Side) -> BitBoard {
    let occupancy = board.occupancy();

    let pieces_atks = board
        .pieces_of(side, None)
        .iter()
        .filter(|board_piece| board_piece.piece != Piece::Pawn)
        .fold(BitBoard::empty(), |attacked, board_piece| {
            attacked | attacks_from(board_piece.piece, side, board_piece.square, occupancy)
        });

    pieces_atks | pawn_atks_setwise(board.piece_squares(Piece::Pawn, side), side)
}

fn pawn_atks_setwise(pawns: BitBoard, side: Side) -> BitBoard {
    let forward = match side {
        Side::White => pawns.shift(Direction::IncRank),
        Side::Black => pawns.shift(Direction::DecRank),
    };
    forward.shift(Direction::IncFile) | forward.shift(Direction::DecFile)
}

/// Squares of `side`'s pieces that attack `square`.
///
/// Works backwards from the target: a piece of type P attacks `square` exactly when a P of the
/// other colour standing on `square` would attack it. That symmetry only breaks for pawns,
/// which is why the pawn lookup uses the opposite side's diagonals.
pub fn attackers_of(board: &Board, square: Square, side: Side) -> BitBoard {
    let occupancy = board.occupancy();

    Piece::iter().fold(BitBoard::empty(), |attackers, piece| {
        let pattern = attacks_from(piece, side.opposite_side(), square, occupancy);
        attackers | (pattern & board.piece_squares(piece, side))
    })
}

/// Whether any of `by`'s pieces attacks `square`. A square held by one of `by`'s own pieces
/// counts as attacked when another of its pieces defends it.
pub fn is_attacked(board: &Board, square: Square, by: Side) -> bool {
    !attackers_of(board, square, by).is_empty()
}
