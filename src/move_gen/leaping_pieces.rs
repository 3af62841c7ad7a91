use crate::bitboard::{BitBoard, Square};
use crate::position::Side;

struct SquareToMoveDatabase([BitBoard; 64]);

impl SquareToMoveDatabase {
    const fn get_bitboard(&self, square: Square) -> BitBoard {
        self.0[square as usize]
    }
}

struct ColoredSquareToMoveDatabase {
    white: SquareToMoveDatabase,
    black: SquareToMoveDatabase,
}

impl ColoredSquareToMoveDatabase {
    const fn get_square_db(&self, side: Side) -> &SquareToMoveDatabase {
        match side {
            Side::White => &self.white,
            Side::Black => &self.black,
        }
    }
}

pub(super) fn knight_atks(square: Square) -> BitBoard {
    KNIGHT_ATKS.get_bitboard(square)
}

pub(super) fn king_atks(square: Square) -> BitBoard {
    KING_ATKS.get_bitboard(square)
}

/// The two forward diagonals, whether or not anything stands there.
pub(super) fn pawn_atks(square: Square, side: Side) -> BitBoard {
    PAWN_ATKS.get_square_db(side).get_bitboard(square)
}

/// Squares a pawn can move to without capturing: one step forward, or two from its
/// starting rank, never onto or through an occupied square.
pub(super) fn pawn_pushes(square: Square, side: Side, occupancy: BitBoard) -> BitBoard {
    let mut pushes = BitBoard::empty();

    let Some(single) = square.offset(0, side.forward()) else {
        return pushes;
    };
    if occupancy.contains(single) {
        return pushes;
    }
    pushes.set_square(single);

    if square.rank() == side.pawn_start_rank() {
        if let Some(double) = single.offset(0, side.forward()) {
            if !occupancy.contains(double) {
                pushes.set_square(double);
            }
        }
    }
    pushes
}

// Each offset is (file delta, rank delta). Offsets that leave the board are skipped.
const fn calc_square_to_move_database(offsets: &[(i8, i8)]) -> SquareToMoveDatabase {
    let mut bbs = [BitBoard::empty(); 64];

    let mut bb_idx = 0;
    while bb_idx < bbs.len() {
        let file = (bb_idx % 8) as i8;
        let rank = (bb_idx / 8) as i8;

        let mut sq_bb = 0u64;
        let mut offset_idx = 0;
        while offset_idx < offsets.len() {
            let (file_delta, rank_delta) = offsets[offset_idx];
            let dest_file = file + file_delta;
            let dest_rank = rank + rank_delta;
            if dest_file >= 0 && dest_file < 8 && dest_rank >= 0 && dest_rank < 8 {
                sq_bb |= 1 << (dest_rank * 8 + dest_file);
            }
            offset_idx += 1;
        }
        bbs[bb_idx] = BitBoard::from_val(sq_bb);
        bb_idx += 1;
    }

    SquareToMoveDatabase(bbs)
}

static PAWN_ATKS: ColoredSquareToMoveDatabase = ColoredSquareToMoveDatabase {
    white: calc_square_to_move_database(&[(1, 1), (-1, 1)]),
    black: calc_square_to_move_database(&[(1, -1), (-1, -1)]),
};

static KNIGHT_ATKS: SquareToMoveDatabase = calc_square_to_move_database(&[
    (1, 2),
    (-1, 2),
    (1, -2),
    (-1, -2),
    (2, 1),
    (-2, 1),
    (2, -1),
    (-2, -1),
]);

static KING_ATKS: SquareToMoveDatabase = calc_square_to_move_database(&[
    (0, 1),
    (1, 0),
    (-1, 0),
    (0, -1),
    (1, 1),
    (-1, 1),
    (1, -1),
    (-1, -1),
]);
