//! Static, single-ply position evaluation.
//!
//! Every score is in centipawns and White-positive: each sub-score is White's term minus
//! Black's. The total is the weighted sum of the four sub-scores, with each weighted term
//! rounded on its own before summing, clamped to `±score_clamp`.

mod tables;

use std::fmt;

use log::{debug, trace};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

use crate::move_gen;
use crate::position::{Board, BoardError, Move, Piece, Side};

use self::tables::piece_square_value;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EvaluationError {
    #[error("{0} has no king")]
    MissingKing(Side),

    #[error("{0} has more than one king")]
    MultipleKings(Side),

    #[error("can't evaluate move: {0}")]
    Board(#[from] BoardError),
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Weights {
    pub material: f64,
    pub activity: f64,
    pub pawn_structure: f64,
    pub king_safety: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct EvaluationConfig {
    pub weights: Weights,
    /// Per reachable destination square.
    pub mobility_bonus: i32,
    /// Per pawn beyond the first on a file.
    pub doubled_pawn_penalty: i32,
    pub isolated_pawn_penalty: i32,
    pub passed_pawn_bonus: i32,
    /// King on its home rank on the d, e or f file.
    pub king_center_penalty: i32,
    /// Per friendly pawn up to three ranks ahead of the king on its own or a neighbouring file.
    pub king_shelter_bonus: i32,
    /// King on the a, b, c, g or h file.
    pub king_flank_bonus: i32,
    /// Non-king, non-pawn material on the board above which the game is still in the opening:
    /// more than a queen's worth per side.
    pub opening_material: i32,
    /// Non-king, non-pawn material on the board at or below which the game is an endgame.
    pub endgame_material: i32,
    /// Upper bounds of |total| for equal, slight, clear and much-better assessments.
    pub assessment_bands: [i32; 4],
    pub score_clamp: i32,
}

impl EvaluationConfig {
    pub const DEFAULT: EvaluationConfig = EvaluationConfig {
        weights: Weights {
            material: 0.40,
            activity: 0.30,
            pawn_structure: 0.20,
            king_safety: 0.10,
        },
        mobility_bonus: 2,
        doubled_pawn_penalty: 20,
        isolated_pawn_penalty: 15,
        passed_pawn_bonus: 20,
        king_center_penalty: 30,
        king_shelter_bonus: 10,
        king_flank_bonus: 20,
        opening_material: 1800,
        endgame_material: 600,
        assessment_bands: [25, 100, 300, 600],
        score_clamp: 1000,
    };
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        EvaluationConfig::DEFAULT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, Display, Hash, Deserialize, Serialize)]
pub enum Phase {
    Opening,
    Middlegame,
    Endgame,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Assessment {
    Equal,
    SlightAdvantage(Side),
    ClearAdvantage(Side),
    MuchBetter(Side),
    Winning(Side),
}

impl Assessment {
    fn from_total(total: i32, bands: &[i32; 4]) -> Assessment {
        let leader = if total > 0 { Side::White } else { Side::Black };
        let margin = total.abs();

        if margin < bands[0] {
            Assessment::Equal
        } else if margin < bands[1] {
            Assessment::SlightAdvantage(leader)
        } else if margin < bands[2] {
            Assessment::ClearAdvantage(leader)
        } else if margin < bands[3] {
            Assessment::MuchBetter(leader)
        } else {
            Assessment::Winning(leader)
        }
    }
}

impl fmt::Display for Assessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Assessment::Equal => write!(f, "Equal position"),
            Assessment::SlightAdvantage(side) => write!(f, "{} has slight advantage", side),
            Assessment::ClearAdvantage(side) => write!(f, "{} has clear advantage", side),
            Assessment::MuchBetter(side) => write!(f, "{} is much better", side),
            Assessment::Winning(side) => write!(f, "{} is winning", side),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct EvaluationBreakdown {
    pub material: i32,
    pub activity: i32,
    pub pawn_structure: i32,
    pub king_safety: i32,
    pub total: i32,
    pub phase: Phase,
    pub assessment: Assessment,
    pub to_move: Side,
}

impl EvaluationBreakdown {
    /// `total` from the point of view of the side to move.
    pub fn relative_total(&self) -> i32 {
        self.total * self.to_move.sign()
    }
}

pub trait EvaluatePosition {
    fn evaluate(&self, board: &Board, side_to_move: Side) -> Result<EvaluationBreakdown, EvaluationError>;

    /// Evaluates the position after `mve` on a copy of `board`. Returns the change in total
    /// along with the new breakdown; `board` itself is never touched.
    fn move_evaluation(
        &self,
        board: &Board,
        mve: &Move,
    ) -> Result<(i32, EvaluationBreakdown), EvaluationError>;
}

#[derive(Debug, Clone, Copy)]
pub struct PositionEvaluator {
    config: EvaluationConfig,
}

impl PositionEvaluator {
    pub const fn new(config: EvaluationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    fn weighted(&self, material: i32, activity: i32, pawn_structure: i32, king_safety: i32) -> i32 {
        let weights = &self.config.weights;
        let apply = |score: i32, weight: f64| (f64::from(score) * weight).round() as i32;

        let sum = apply(material, weights.material)
            + apply(activity, weights.activity)
            + apply(pawn_structure, weights.pawn_structure)
            + apply(king_safety, weights.king_safety);

        sum.clamp(-self.config.score_clamp, self.config.score_clamp)
    }
}

impl Default for PositionEvaluator {
    fn default() -> Self {
        PositionEvaluator::new(EvaluationConfig::DEFAULT)
    }
}

impl EvaluatePosition for PositionEvaluator {
    fn evaluate(&self, board: &Board, side_to_move: Side) -> Result<EvaluationBreakdown, EvaluationError> {
        validate_kings(board)?;

        let material = board.material(Side::White) - board.material(Side::Black);
        let activity = net(|side| activity_for(board, side, &self.config));
        let pawn_structure = net(|side| pawn_structure_for(board, side, &self.config));
        let king_safety = net(|side| king_safety_for(board, side, &self.config));
        trace!(
            "material {}, activity {}, pawn structure {}, king safety {}",
            material,
            activity,
            pawn_structure,
            king_safety
        );

        let total = self.weighted(material, activity, pawn_structure, king_safety);

        let breakdown = EvaluationBreakdown {
            material,
            activity,
            pawn_structure,
            king_safety,
            total,
            phase: phase(board, &self.config),
            assessment: Assessment::from_total(total, &self.config.assessment_bands),
            to_move: side_to_move,
        };
        debug!(
            "evaluated {}: {} ({}, {})",
            board.to_fen(),
            breakdown.total,
            breakdown.assessment,
            breakdown.phase
        );
        Ok(breakdown)
    }

    fn move_evaluation(
        &self,
        board: &Board,
        mve: &Move,
    ) -> Result<(i32, EvaluationBreakdown), EvaluationError> {
        let before = self.evaluate(board, mve.side)?;

        let mut after_board = board.clone();
        after_board.apply_move(mve)?;
        let after = self.evaluate(&after_board, mve.side.opposite_side())?;

        let delta = after.total - before.total;
        debug!("{} changes the evaluation by {}", mve.to_algebraic(), delta);
        Ok((delta, after))
    }
}

pub static POSITION_EVALUATOR: PositionEvaluator = PositionEvaluator::new(EvaluationConfig::DEFAULT);

fn validate_kings(board: &Board) -> Result<(), EvaluationError> {
    for side in Side::iter() {
        match board.piece_squares(Piece::King, side).len() {
            0 => return Err(EvaluationError::MissingKing(side)),
            1 => {}
            _ => return Err(EvaluationError::MultipleKings(side)),
        }
    }
    Ok(())
}

fn net(score_for: impl Fn(Side) -> i32) -> i32 {
    score_for(Side::White) - score_for(Side::Black)
}

fn activity_for(board: &Board, side: Side, config: &EvaluationConfig) -> i32 {
    let mobility = move_gen::mobility(board, side) as i32 * config.mobility_bonus;
    let placement: i32 = board
        .pieces_of(side, None)
        .iter()
        .map(|board_piece| piece_square_value(board_piece.piece, side, board_piece.square))
        .sum();
    mobility + placement
}

fn pawn_structure_for(board: &Board, side: Side, config: &EvaluationConfig) -> i32 {
    let pawns = board.piece_squares(Piece::Pawn, side);
    let opp_pawns = board.piece_squares(Piece::Pawn, side.opposite_side());

    let mut per_file = [0i32; 8];
    for pawn in pawns {
        per_file[pawn.file() as usize] += 1;
    }

    let doubled: i32 = per_file.iter().map(|&count| (count - 1).max(0)).sum();

    let isolated = pawns
        .into_iter()
        .filter(|pawn| {
            let file = pawn.file() as usize;
            let left = file.checked_sub(1).map_or(0, |f| per_file[f]);
            let right = per_file.get(file + 1).copied().unwrap_or(0);
            left == 0 && right == 0
        })
        .count() as i32;

    let passed = pawns
        .into_iter()
        .filter(|pawn| {
            !opp_pawns.into_iter().any(|opp| {
                let ahead = match side {
                    Side::White => opp.rank() > pawn.rank(),
                    Side::Black => opp.rank() < pawn.rank(),
                };
                opp.file().abs_diff(pawn.file()) <= 1 && ahead
            })
        })
        .count() as i32;

    passed * config.passed_pawn_bonus
        - doubled * config.doubled_pawn_penalty
        - isolated * config.isolated_pawn_penalty
}

fn king_safety_for(board: &Board, side: Side, config: &EvaluationConfig) -> i32 {
    let Some(king) = board.king_square(side) else {
        return 0;
    };

    let mut safety = 0;

    match king.file() {
        3..=5 if king.rank() == side.back_rank() => safety -= config.king_center_penalty,
        0..=2 | 6..=7 => safety += config.king_flank_bonus,
        _ => {}
    }

    let shelter = board
        .piece_squares(Piece::Pawn, side)
        .into_iter()
        .filter(|pawn| {
            let ranks_ahead = (pawn.rank() as i8 - king.rank() as i8) * side.forward();
            pawn.file().abs_diff(king.file()) <= 1 && (1..=3).contains(&ranks_ahead)
        })
        .count() as i32;

    safety + shelter * config.king_shelter_bonus
}

fn phase(board: &Board, config: &EvaluationConfig) -> Phase {
    let pieces_material: i32 = Side::iter()
        .flat_map(|side| {
            [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen]
                .into_iter()
                .map(move |piece| board.piece_squares(piece, side).len() as i32 * piece.value())
        })
        .sum();

    if pieces_material > config.opening_material {
        Phase::Opening
    } else if pieces_material <= config.endgame_material {
        Phase::Endgame
    } else {
        Phase::Middlegame
    }
}
