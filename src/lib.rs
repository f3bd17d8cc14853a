//! Othello/Reversi engine core: bitboard move generation, stability
//! analysis, a three-table transposition family, iterative-deepening
//! negascout with selectivity, an exact endgame solver and a parallel
//! root-split scheduler.

pub mod board;
pub mod count;
pub mod problem;
pub mod search;
pub mod stability;

pub use board::{Board, BoardSize, Move, Square};
pub use search::{SearchParams, SearchResult, Searcher};
