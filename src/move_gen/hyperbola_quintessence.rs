use crate::bitboard::{BitBoard, Square};
use crate::position::Piece;

// Sliding attacks along files and diagonals use the hyperbola quintessence trick
// (o - 2r) ^ reverse(o' - 2r'), where byte swapping reverses a line with one square per rank.
// Ranks have all their squares in one byte, so they get a lookup table instead.

#[derive(Debug, Clone, Copy)]
struct SquareMasks {
    bit: BitBoard,
    file: BitBoard,
    diag: BitBoard,
    anti_diag: BitBoard,
}

static MASKS_LIST: [SquareMasks; 64] = calc_masks_list();

/// Indexed by `8 * inner_occupancy + file`, where `inner_occupancy` is the six bits of the
/// rank between its two edge squares.
static RANK_ATKS: [u8; 64 * 8] = calc_rank_atks();

/// Squares a slider of type `piece` on `square` attacks. Each ray runs up to and including
/// the first occupied square, whatever its colour.
pub(super) fn sliding_atks(piece: Piece, square: Square, occupancy: BitBoard) -> BitBoard {
    let masks = &MASKS_LIST[square as usize];

    let orthogonal = || line_atks(occupancy, masks.file, masks.bit) | rank_atks(occupancy, square);
    let diagonal = || {
        line_atks(occupancy, masks.diag, masks.bit) | line_atks(occupancy, masks.anti_diag, masks.bit)
    };

    match piece {
        Piece::Bishop => diagonal(),
        Piece::Rook => orthogonal(),
        Piece::Queen => orthogonal() | diagonal(),
        Piece::Pawn | Piece::Knight | Piece::King => BitBoard::empty(),
    }
}

fn line_atks(occupancy: BitBoard, mask: BitBoard, bit_mask: BitBoard) -> BitBoard {
    let mut forward = occupancy & mask;
    let mut reverse = forward.swap_bytes();
    forward -= bit_mask;
    reverse -= bit_mask.swap_bytes();
    (forward ^ reverse.swap_bytes()) & mask
}

fn rank_atks(occupancy: BitBoard, square: Square) -> BitBoard {
    let rank_shift = square.rank() * 8;
    let inner_occupancy = ((occupancy.to_val() >> (rank_shift + 1)) & 63) as usize;
    let atks = RANK_ATKS[inner_occupancy * 8 + square.file() as usize] as u64;

    BitBoard::from_val(atks << rank_shift)
}

const fn line_mask(square_idx: usize, file_step: i8, rank_step: i8) -> BitBoard {
    let mut mask = 0u64;

    let mut sign = -1;
    while sign <= 1 {
        let mut file = (square_idx % 8) as i8 + sign * file_step;
        let mut rank = (square_idx / 8) as i8 + sign * rank_step;
        while file >= 0 && file < 8 && rank >= 0 && rank < 8 {
            mask |= 1 << (rank * 8 + file);
            file += sign * file_step;
            rank += sign * rank_step;
        }
        sign += 2;
    }

    BitBoard::from_val(mask)
}

const fn calc_masks_list() -> [SquareMasks; 64] {
    let mut masks_list = [SquareMasks {
        bit: BitBoard::empty(),
        file: BitBoard::empty(),
        diag: BitBoard::empty(),
        anti_diag: BitBoard::empty(),
    }; 64];

    let mut idx = 0;
    while idx < 64 {
        masks_list[idx] = SquareMasks {
            bit: BitBoard::from_val(1 << idx),
            file: line_mask(idx, 0, 1),
            diag: line_mask(idx, 1, 1),
            anti_diag: line_mask(idx, 1, -1),
        };
        idx += 1;
    }
    masks_list
}

const fn calc_rank_atks() -> [u8; 64 * 8] {
    let mut rank_atks_list = [0u8; 64 * 8];

    let mut inner = 0;
    while inner < 64 {
        let occupancy = (inner as u8) << 1;

        let mut file = 0;
        while file < 8 {
            let mut atks = 0u8;

            let mut east = file + 1;
            while east < 8 {
                atks |= 1 << east;
                if occupancy & (1 << east) != 0 {
                    break;
                }
                east += 1;
            }

            let mut west = file;
            while west > 0 {
                west -= 1;
                atks |= 1 << west;
                if occupancy & (1 << west) != 0 {
                    break;
                }
            }

            rank_atks_list[inner * 8 + file] = atks;
            file += 1;
        }
        inner += 1;
    }
    rank_atks_list
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitboard::Square::*;
    use test_case::test_case;

    #[test_case(A8, BitBoard::from_squares(&[A7, A6, A5, A4, A3, A2, A1]) ; "file corner")]
    #[test_case(D4, BitBoard::from_squares(&[D8, D7, D6, D5, D3, D2, D1]) ; "file middle")]
    fn test_file_mask(square: Square, want: BitBoard) {
        assert_eq!(MASKS_LIST[square as usize].file, want);
    }

    #[test_case(D4, BitBoard::from_squares(&[A1, B2, C3, E5, F6, G7, H8]) ; "main diagonal")]
    #[test_case(A8, BitBoard::empty() ; "corner")]
    fn test_diag_mask(square: Square, want: BitBoard) {
        assert_eq!(MASKS_LIST[square as usize].diag, want);
    }

    #[test_case(D5, BitBoard::from_squares(&[G8, F7, E6, C4, B3, A2]) ; "off main")]
    #[test_case(A1, BitBoard::empty() ; "corner")]
    fn test_anti_diag_mask(square: Square, want: BitBoard) {
        assert_eq!(MASKS_LIST[square as usize].anti_diag, want);
    }

    #[test_case(H4, BitBoard::empty(), BitBoard::from_squares(&[A4, B4, C4, D4, E4, F4, G4]) ; "empty")]
    #[test_case(D4, BitBoard::from_squares(&[B4]), BitBoard::from_squares(&[B4, C4, E4, F4, G4, H4]) ; "one side")]
    #[test_case(D4, BitBoard::from_squares(&[A4, B4]), BitBoard::from_squares(&[B4, C4, E4, F4, G4, H4]) ; "irrelevant blocker")]
    #[test_case(D4, BitBoard::from_squares(&[A4, F4]), BitBoard::from_squares(&[A4, B4, C4, E4, F4]) ; "both sides")]
    #[test_case(D4, BitBoard::from_squares(&[C4, D4, E4]), BitBoard::from_squares(&[C4, E4]) ; "both sides close")]
    fn test_rank_atks(square: Square, occupancy: BitBoard, want: BitBoard) {
        assert_eq!(rank_atks(occupancy, square), want);
    }

    #[test_case(Piece::Bishop, D4, BitBoard::empty(), BitBoard::from_squares(&[A1, B2, C3, E5, F6, G7, H8, C5, B6, A7, E3, F2, G1]) ; "bishop no blockers")]
    #[test_case(Piece::Bishop, D4, BitBoard::from_squares(&[B2, A7, E5]), BitBoard::from_squares(&[B2, C3, E5, C5, B6, A7, E3, F2, G1]) ; "bishop blockers")]
    #[test_case(Piece::Rook, D4, BitBoard::from_squares(&[A4, D7, D8, F4, D3, D2, D1]), BitBoard::from_squares(&[D3, D5, D6, D7, A4, B4, C4, E4, F4]) ; "rook irrelevant blockers")]
    #[test_case(Piece::Rook, E3, BitBoard::from_squares(&[E3]), BitBoard::from_squares(&[E1, E2, E4, E5, E6, E7, E8, A3, B3, C3, D3, F3, G3, H3]) ; "rook own square occupied")]
    #[test_case(Piece::Queen, D4, BitBoard::from_squares(&[D5, B2, H4]), BitBoard::from_squares(&[B2, C3, E5, F6, G7, H8, C5, B6, A7, E3, F2, G1, D1, D2, D3, D5, A4, B4, C4, E4, F4, G4, H4]) ; "queen blockers")]
    #[test_case(Piece::Knight, D4, BitBoard::empty(), BitBoard::empty() ; "not a slider")]
    fn test_sliding_atks(piece: Piece, square: Square, occupancy: BitBoard, want: BitBoard) {
        assert_eq!(sliding_atks(piece, square, occupancy), want);
    }
}
