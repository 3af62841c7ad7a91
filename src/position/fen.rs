use crate::bitboard::Square;
use crate::position::{Board, Piece, Side};

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum FenParseError {
    #[error("num fields: want 1..=6 got {0}")]
    NumFields(usize),

    #[error("piece placement: got {0}, err at {1}")]
    PiecePlacement(String, usize),

    #[error("side to move: want 'w'|'b' got {0}")]
    SideToMove(String),
}

impl Board {
    /// Reads the piece placement and side to move of a FEN string. Castling, en passant and
    /// the move counters are not modelled, so those fields are accepted and ignored.
    pub fn from_fen(fen: &str) -> Result<Self, FenParseError> {
        let fields = fen.split_whitespace().collect::<Vec<&str>>();

        if fields.is_empty() || fields.len() > 6 {
            Err(FenParseError::NumFields(fields.len()))?
        }

        let to_move = match fields.get(1).copied().unwrap_or("w") {
            "w" => Side::White,
            "b" => Side::Black,
            other => Err(FenParseError::SideToMove(other.to_string()))?,
        };

        let mut board = Board::empty(to_move);
        place_pieces_from_fen(&mut board, fields[0])?;
        Ok(board)
    }

    pub fn to_fen(&self) -> String {
        let mut pieces = String::with_capacity(64);
        let mut curr_empty_count = 0;

        for (idx, sq) in Square::list_white_perspective().into_iter().enumerate() {
            if let Some(board_piece) = self.piece_at(sq) {
                if curr_empty_count != 0 {
                    pieces += &curr_empty_count.to_string();
                    curr_empty_count = 0;
                }
                pieces.push(board_piece.to_char());
            } else {
                curr_empty_count += 1;
            }
            if (idx + 1) % 8 == 0 {
                if curr_empty_count != 0 {
                    pieces += &curr_empty_count.to_string();
                    curr_empty_count = 0;
                }
                if idx != 63 {
                    pieces += "/";
                }
            }
        }

        let side_to_move_char = if self.to_move == Side::White {
            'w'
        } else {
            'b'
        };

        format!("{} {} - - 0 1", pieces, side_to_move_char)
    }
}

impl TryFrom<String> for Board {
    type Error = FenParseError;

    fn try_from(fen: String) -> Result<Self, Self::Error> {
        Board::from_fen(&fen)
    }
}

impl From<Board> for String {
    fn from(board: Board) -> Self {
        board.to_fen()
    }
}

fn place_pieces_from_fen(board: &mut Board, pieces_str: &str) -> Result<(), FenParseError> {
    let err = |ch_idx| FenParseError::PiecePlacement(pieces_str.to_string(), ch_idx);
    let fen_square_order = Square::list_white_perspective();
    let mut sq_idx = 0;

    for (ch_idx, ch) in pieces_str.chars().enumerate() {
        if let Ok(piece) = Piece::try_from(ch.to_ascii_lowercase()) {
            let square = *fen_square_order.get(sq_idx).ok_or_else(|| err(ch_idx))?;
            let side = if ch.is_ascii_uppercase() {
                Side::White
            } else {
                Side::Black
            };
            board.place_piece(piece, side, square);
            sq_idx += 1;
        } else if let Some(digit) = ch.to_digit(10).filter(|d| (1..=8).contains(d)) {
            sq_idx += digit as usize;
        } else if ch == '/' {
            if sq_idx % 8 != 0 {
                Err(err(ch_idx))?
            }
        } else {
            Err(err(ch_idx))?
        }
    }

    if sq_idx != 64 {
        Err(err(pieces_str.len()))?
    }

    Ok(())
}
