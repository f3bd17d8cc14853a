//! Evaluator seam.
//!
//! The real evaluation function is an external collaborator: anything
//! that maps a position to a mover-relative score in disc-equivalent
//! units can drive the midgame search. [`MobilityEval`] is a small
//! built-in so the engine works standalone; serious play plugs in a
//! trained evaluator through the trait.

use crate::board::{corner_mask, Board};

/// Score range for any position, in discs.
pub const SCORE_MAX: i32 = 64;
pub const SCORE_MIN: i32 = -64;
/// Sentinel strictly outside every valid score or bound.
pub const SCORE_INF: i32 = 127;

pub trait Evaluate: Send + Sync {
    /// Heuristic value of the position for the side to move, in
    /// disc-count-equivalent units, strictly inside
    /// (`SCORE_MIN`, `SCORE_MAX`).
    fn score(&self, board: &Board) -> i32;
}

const W_MOBILITY: i32 = 1;
const W_CORNER: i32 = 8;

/// Mobility and corner evaluation. Deliberately symmetric: the four
/// canonical opening replies all score zero.
#[derive(Debug, Default, Clone, Copy)]
pub struct MobilityEval;

impl Evaluate for MobilityEval {
    fn score(&self, board: &Board) -> i32 {
        let own_moves = board.legal_moves().count_ones() as i32;
        let opp_moves = board.pass().legal_moves().count_ones() as i32;
        let corners = corner_mask(board.mask);
        let own_corners = (board.own & corners).count_ones() as i32;
        let opp_corners = (board.opp & corners).count_ones() as i32;
        let score =
            W_MOBILITY * (own_moves - opp_moves) + W_CORNER * (own_corners - opp_corners);
        score.clamp(SCORE_MIN + 1, SCORE_MAX - 1)
    }
}
