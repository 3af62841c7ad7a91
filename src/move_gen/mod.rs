//! Pseudo-legal move generation. Moves follow each piece's movement rule only: nothing here
//! checks whether the mover's own king is left in check, and there is no castling or en
//! passant.

pub mod attacks;
mod hyperbola_quintessence;
mod leaping_pieces;

use crate::bitboard::{BitBoard, Square};
use crate::position::{Board, BoardPiece, Move, Piece, Side};

use self::hyperbola_quintessence::sliding_atks;
use self::leaping_pieces::{king_atks, knight_atks, pawn_atks, pawn_pushes};

/// Squares a piece of this type and side on `square` attacks, given the board's occupancy.
///
/// This is a capture pattern, not a move set: squares held by friendly pieces are included,
/// and a pawn's pattern is its two forward diagonals whether or not anything stands there.
pub fn attacks_from(piece: Piece, side: Side, square: Square, occupancy: BitBoard) -> BitBoard {
    match piece {
        Piece::Pawn => pawn_atks(square, side),
        Piece::Knight => knight_atks(square),
        Piece::King => king_atks(square),
        Piece::Bishop | Piece::Rook | Piece::Queen => sliding_atks(piece, square, occupancy),
    }
}

/// Destination squares reachable by `board_piece` under its movement rule.
///
/// Never contains a square held by a friendly piece. The result is a `BitBoard`, so
/// iterating it always yields squares in the same order for the same input.
pub fn legal_moves_for(board_piece: &BoardPiece, board: &Board) -> BitBoard {
    let BoardPiece {
        piece,
        side,
        square,
    } = *board_piece;

    let friendly_pieces = board.side_occupancy(side);
    let opp_pieces = board.side_occupancy(side.opposite_side());
    let occupancy = friendly_pieces | opp_pieces;

    match piece {
        Piece::Pawn => pawn_pushes(square, side, occupancy) | (pawn_atks(square, side) & opp_pieces),
        _ => attacks_from(piece, side, square, occupancy) & !friendly_pieces,
    }
}

/// Every pseudo-legal move for `side`, grouped by piece type, then by source square, then by
/// destination square.
pub fn all_moves(board: &Board, side: Side) -> Vec<Move> {
    let mut moves = Vec::with_capacity(64);

    for board_piece in board.pieces_of(side, None) {
        for dest in legal_moves_for(&board_piece, board) {
            moves.push(Move {
                src: board_piece.square,
                dest,
                piece: board_piece.piece,
                side,
                captured: board.piece_at(dest).map(|captured| captured.piece),
            });
        }
    }

    moves
}

/// Number of destinations summed over all of `side`'s pieces.
pub fn mobility(board: &Board, side: Side) -> u32 {
    board
        .pieces_of(side, None)
        .iter()
        .map(|board_piece| legal_moves_for(board_piece, board).len())
        .sum()
}
