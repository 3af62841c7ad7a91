pub mod bitboard;
pub mod evaluation;
pub mod move_gen;
pub mod position;
pub mod tactics;

pub use bitboard::{BitBoard, Square};
pub use evaluation::{
    Assessment, EvaluatePosition, EvaluationBreakdown, EvaluationConfig, EvaluationError, Phase,
    PositionEvaluator, Weights, POSITION_EVALUATOR,
};
pub use move_gen::attacks::{attacked_squares, attackers_of, is_attacked};
pub use move_gen::{all_moves, attacks_from, legal_moves_for, mobility};
pub use position::fen::FenParseError;
pub use position::{Board, BoardError, BoardPiece, Move, Piece, Side};
pub use tactics::{forks, hanging_pieces, weak_squares, TacticalFinding};
