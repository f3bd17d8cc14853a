//! Exact endgame solving.
//!
//! Once the empty-square count falls to the configured threshold the
//! heuristic evaluator is out of the picture: every leaf is a finished
//! game scored by the final disc differential (empties to the winner),
//! and selectivity is forced to exact. Hash entries written here carry
//! `depth == empties`, which certifies them for the whole remaining
//! game tree of that position. Stability pruning fires earlier than in
//! the midgame since a proven bound is pure profit when exactness is
//! the goal.

use crate::board::Board;
use crate::search::eval::{SCORE_INF, SCORE_MAX, SCORE_MIN};
use crate::search::negascout::{store_data, PvLine, Searcher};
use crate::stability;

/// Below this many empties, table traffic costs more than it saves.
const TABLE_MIN_EMPTIES: u32 = 3;

pub(crate) fn solve_node(
    searcher: &mut Searcher,
    board: &Board,
    mut alpha: i32,
    mut beta: i32,
    ply: u32,
    pv: &mut PvLine,
) -> Option<i32> {
    if searcher.check_abort() {
        return None;
    }
    searcher.count_node();
    pv.clear();

    if !board.has_moves() {
        let passed = board.pass();
        if !passed.has_moves() {
            return Some(board.final_score());
        }
        let mut child_pv = PvLine::default();
        let score = -solve_node(searcher, &passed, -beta, -alpha, ply + 1, &mut child_pv)?;
        pv.copy_from(&child_pv);
        return Some(score);
    }

    let empties = board.n_empties();

    if alpha >= 0 {
        let upper = stability::stability_bound(board);
        if upper <= alpha {
            return Some(upper);
        }
        beta = beta.min(upper);
    }

    let use_table = empties >= TABLE_MIN_EMPTIES;
    let key = board.key();
    let mut hash_best = None;
    if use_table {
        if let Some(entry) = searcher.main_table().probe(key) {
            hash_best = entry.best;
            if entry.depth as u32 >= empties && entry.selectivity == 0 {
                let (lower, upper) = (entry.lower as i32, entry.upper as i32);
                if lower >= beta {
                    return Some(lower);
                }
                if upper <= alpha {
                    return Some(upper);
                }
                if lower == upper {
                    return Some(lower);
                }
                alpha = alpha.max(lower);
                beta = beta.min(upper);
            }
        }
    }

    let mut moves = board.moves();
    if empties >= TABLE_MIN_EMPTIES {
        searcher.order_moves(board, &mut moves, None, hash_best);
    }

    let search_alpha = alpha;
    let search_beta = beta;
    let mut best = -SCORE_INF;
    let mut best_move = None;
    let mut child_pv = PvLine::default();
    for (i, &mv) in moves.iter().enumerate() {
        let mut child = *board;
        child.make(mv);
        let score = if i == 0 {
            -solve_node(searcher, &child, -beta, -alpha, ply + 1, &mut child_pv)?
        } else {
            let mut s = -solve_node(searcher, &child, -alpha - 1, -alpha, ply + 1, &mut child_pv)?;
            if s > alpha && s < beta {
                s = -solve_node(searcher, &child, -beta, -alpha, ply + 1, &mut child_pv)?;
            }
            s
        };
        if score > best {
            best = score;
            best_move = Some(mv.sq);
            pv.load(mv.sq, &child_pv);
        }
        if best > alpha {
            alpha = best;
            if alpha >= beta {
                break;
            }
        }
    }
    debug_assert!((SCORE_MIN..=SCORE_MAX).contains(&best));

    if use_table {
        let data = store_data(empties, 0, best, search_alpha, search_beta, best_move);
        searcher.main_table().store(key, data);
        if search_beta - search_alpha > 1 && best > search_alpha && best < search_beta {
            searcher.pv_table().store(key, data);
        }
    }
    Some(best)
}
