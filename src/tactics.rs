//! Tactical motifs read straight off the move and attack data of a single board.
//!
//! Defender counting is plain: a piece counts every friendly piece whose
//! attack pattern covers its square, with no exchange evaluation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::bitboard::{BitBoard, Square};
use crate::move_gen::attacks::attackers_of;
use crate::move_gen::legal_moves_for;
use crate::position::{Board, BoardPiece, Piece, Side};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub enum TacticalFinding {
    HangingPiece {
        square: Square,
        piece: BoardPiece,
        attackers: Vec<Square>,
    },
    Fork {
        attacking_square: Square,
        attacked_squares: Vec<Square>,
        attacking_piece: BoardPiece,
    },
    WeakSquare {
        square: Square,
        side: Side,
    },
}

impl fmt::Display for TacticalFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TacticalFinding::HangingPiece {
                square,
                piece,
                attackers,
            } => write!(
                f,
                "{} {} on {} hangs to {} attacker(s)",
                piece.side,
                piece.piece,
                square.to_algebraic(),
                attackers.len()
            ),
            TacticalFinding::Fork {
                attacking_square,
                attacked_squares,
                attacking_piece,
            } => {
                let targets: Vec<String> = attacked_squares.iter().map(|sq| sq.to_algebraic()).collect();
                write!(
                    f,
                    "{} {} on {} forks {}",
                    attacking_piece.side,
                    attacking_piece.piece,
                    attacking_square.to_algebraic(),
                    targets.join(", ")
                )
            }
            TacticalFinding::WeakSquare { square, side } => {
                write!(f, "{} is weak for {}", square.to_algebraic(), side)
            }
        }
    }
}

/// Pieces of `side` attacked by more enemy pieces than friendly pieces defend them. Kings are
/// never reported.
pub fn hanging_pieces(board: &Board, side: Side) -> Vec<TacticalFinding> {
    let opp_side = side.opposite_side();

    board
        .pieces_of(side, None)
        .into_iter()
        .filter(|board_piece| board_piece.piece != Piece::King)
        .filter_map(|board_piece| {
            let attackers = attackers_of(board, board_piece.square, opp_side);
            if attackers.is_empty() {
                return None;
            }
            let defenders = attackers_of(board, board_piece.square, side);
            if defenders.len() >= attackers.len() {
                return None;
            }
            Some(TacticalFinding::HangingPiece {
                square: board_piece.square,
                piece: board_piece,
                attackers: attackers.to_squares(),
            })
        })
        .collect()
}

/// Pieces of `side` whose destination set already holds two or more enemy pieces.
pub fn forks(board: &Board, side: Side) -> Vec<TacticalFinding> {
    let opp_pieces = board.side_occupancy(side.opposite_side());

    board
        .pieces_of(side, None)
        .into_iter()
        .filter_map(|board_piece| {
            let targets = legal_moves_for(&board_piece, board) & opp_pieces;
            if targets.len() < 2 {
                return None;
            }
            Some(TacticalFinding::Fork {
                attacking_square: board_piece.square,
                attacked_squares: targets.to_squares(),
                attacking_piece: board_piece,
            })
        })
        .collect()
}

/// Squares ahead of `side`'s pawns that no pawn of `side` can ever guard: no friendly pawn
/// stands on an adjacent file behind the square's rank. Ordered by file, then rank.
pub fn weak_squares(board: &Board, side: Side) -> Vec<TacticalFinding> {
    let pawns = board.piece_squares(Piece::Pawn, side);

    let mut weak: Vec<Square> = ahead_of_pawns(pawns, side)
        .into_iter()
        .filter(|&square| !can_be_guarded_by_pawn(pawns, side, square))
        .collect();
    weak.sort_by_key(|sq| (sq.file(), sq.rank()));

    weak.into_iter()
        .map(|square| TacticalFinding::WeakSquare { square, side })
        .collect()
}

fn ahead_of_pawns(pawns: BitBoard, side: Side) -> BitBoard {
    let mut ahead = BitBoard::empty();
    for pawn in pawns {
        let mut square = pawn;
        while let Some(next) = square.offset(0, side.forward()) {
            ahead.set_square(next);
            square = next;
        }
    }
    ahead
}

fn can_be_guarded_by_pawn(pawns: BitBoard, side: Side, square: Square) -> bool {
    pawns.into_iter().any(|pawn| {
        let behind = match side {
            Side::White => pawn.rank() < square.rank(),
            Side::Black => pawn.rank() > square.rank(),
        };
        pawn.file().abs_diff(square.file()) == 1 && behind
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitboard::Square::*;
    use test_case::test_case;
    use testresult::TestResult;

    fn hanging_squares(findings: &[TacticalFinding]) -> Vec<Square> {
        findings
            .iter()
            .filter_map(|finding| match finding {
                TacticalFinding::HangingPiece { square, .. } => Some(*square),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_start_has_no_tactics() {
        let board = Board::start();
        for side in [Side::White, Side::Black] {
            assert!(hanging_pieces(&board, side).is_empty());
            assert!(forks(&board, side).is_empty());
            assert!(weak_squares(&board, side).is_empty());
        }
    }

    #[test]
    fn test_undefended_rook_attacked_by_knight() -> TestResult {
        let board = Board::from_fen("4k3/8/8/8/8/2n5/8/3R2K1 w - - 0 1")?;

        let got = hanging_pieces(&board, Side::White);

        assert_eq!(
            got,
            vec![TacticalFinding::HangingPiece {
                square: D1,
                piece: BoardPiece::new(Piece::Rook, Side::White, D1),
                attackers: vec![C3],
            }]
        );
        Ok(())
    }

    #[test_case("4k3/8/8/8/8/2n5/8/3RK3 w - - 0 1", &[] ; "defended by king")]
    #[test_case("4k3/8/8/8/8/2n5/4b3/3RK3 w - - 0 1", &[D1] ; "two attackers one defender")]
    #[test_case("4k3/8/8/8/8/8/8/3RK2r w - - 0 1", &[] ; "king is never hanging")]
    #[test_case("4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1", &[E4] ; "pawn attacked by pawn")]
    #[test_case("4k3/8/8/3p4/4P3/5P2/8/4K3 w - - 0 1", &[] ; "pawn chain")]
    fn test_hanging_pieces(fen: &str, want: &[Square]) -> TestResult {
        let board = Board::from_fen(fen)?;
        assert_eq!(hanging_squares(&hanging_pieces(&board, Side::White)), want);
        Ok(())
    }

    #[test]
    fn test_knight_fork() -> TestResult {
        let board = Board::from_fen("4k3/2q1r3/8/3N4/8/8/8/4K3 w - - 0 1")?;

        let got = forks(&board, Side::White);

        assert_eq!(
            got,
            vec![TacticalFinding::Fork {
                attacking_square: D5,
                attacked_squares: vec![C7, E7],
                attacking_piece: BoardPiece::new(Piece::Knight, Side::White, D5),
            }]
        );
        Ok(())
    }

    #[test_case("4k3/8/8/2r1b3/3P4/8/8/4K3 w - - 0 1", &[D4] ; "pawn fork")]
    #[test_case("4k3/8/8/2r5/3P4/8/8/4K3 w - - 0 1", &[] ; "single target")]
    #[test_case("4k3/8/8/3b4/3P4/8/8/4K3 w - - 0 1", &[] ; "blocked pawn cant fork")]
    #[test_case("r3k3/8/8/8/8/8/8/Q3K3 w - - 0 1", &[] ; "slider stops at first target")]
    #[test_case("r3k3/8/8/8/Q7/8/8/4K3 w - - 0 1", &[A4] ; "queen forks rook and king")]
    fn test_forks(fen: &str, want: &[Square]) -> TestResult {
        let board = Board::from_fen(fen)?;

        let got: Vec<Square> = forks(&board, Side::White)
            .iter()
            .filter_map(|finding| match finding {
                TacticalFinding::Fork {
                    attacking_square, ..
                } => Some(*attacking_square),
                _ => None,
            })
            .collect();

        assert_eq!(got, want);
        Ok(())
    }

    #[test_case("4k3/8/8/8/8/8/PP6/4K3 w - - 0 1", Side::White, &[] ; "neighbouring pawns cover each other")]
    #[test_case("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1", Side::White, &[E3, E4, E5, E6, E7, E8] ; "isolated pawn")]
    #[test_case("4k3/8/8/8/3P4/8/4P3/4K3 w - - 0 1", Side::White, &[E3, E4] ; "advanced pawn leaves holes")]
    #[test_case("4k3/4p3/8/8/8/8/8/4K3 w - - 0 1", Side::Black, &[E1, E2, E3, E4, E5, E6] ; "black isolated pawn")]
    fn test_weak_squares(fen: &str, side: Side, want: &[Square]) -> TestResult {
        let board = Board::from_fen(fen)?;

        let got: Vec<Square> = weak_squares(&board, side)
            .iter()
            .filter_map(|finding| match finding {
                TacticalFinding::WeakSquare { square, .. } => Some(*square),
                _ => None,
            })
            .collect();

        assert_eq!(got, want);
        Ok(())
    }

    #[test]
    fn test_display() {
        let finding = TacticalFinding::Fork {
            attacking_square: D5,
            attacked_squares: vec![C7, E7],
            attacking_piece: BoardPiece::new(Piece::Knight, Side::White, D5),
        };
        assert_eq!(finding.to_string(), "White Knight on d5 forks c7, e7");
    }
}
