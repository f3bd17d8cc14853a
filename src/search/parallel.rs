//! Root-split task scheduling.
//!
//! The ordered root move list is dealt round-robin into one group per
//! worker; each worker searches its group against the same aspiration
//! window with the shared hash-table family and abort flag. Workers do
//! not share a live alpha: group results depend only on the move order
//! and the window, which keeps the chosen move and score reproducible
//! for any fixed worker count, and equal to the single-threaded
//! result. The rayon join is the per-depth barrier: a depth's outcome
//! is adopted only once every group has returned, and any aborted group
//! discards the whole depth.

use crate::board::{Board, Move, Square};
use crate::search::eval::SCORE_INF;
use crate::search::negascout::{PvLine, Searcher};
use rayon::prelude::*;

#[derive(Debug, Clone)]
pub(crate) struct RootOutcome {
    pub score: i32,
    pub best: Option<Square>,
    pub pv: Vec<Square>,
}

struct GroupOutcome {
    score: i32,
    /// Index into the ordered root move list; the deterministic
    /// tiebreak between equal scores.
    order_index: usize,
    best: Square,
    pv: PvLine,
}

pub(crate) fn root_split(
    searcher: &mut Searcher,
    board: &Board,
    depth: u32,
    selectivity: u8,
    alpha: i32,
    beta: i32,
    prev_best: Option<Square>,
) -> Option<RootOutcome> {
    let mut moves = board.moves();
    // Root ordering must not depend on shared-table contents, or the
    // equal-score tiebreak could drift between runs; the previous
    // iteration's best move is deterministic and leads.
    searcher.order_moves(board, &mut moves, prev_best, None);

    let n_workers = if searcher.params.threads == 0 {
        rayon::current_num_threads()
    } else {
        searcher.params.threads
    };
    let n_groups = n_workers.max(1).min(moves.len());
    let groups: Vec<Vec<(usize, Move)>> = (0..n_groups)
        .map(|g| {
            moves
                .iter()
                .copied()
                .enumerate()
                .skip(g)
                .step_by(n_groups)
                .collect()
        })
        .collect();

    let outcomes: Vec<Option<GroupOutcome>> = if n_groups == 1 {
        vec![search_group(searcher, board, depth, selectivity, alpha, beta, &groups[0])]
    } else {
        groups
            .par_iter()
            .map(|group| {
                let mut worker = searcher.worker();
                search_group(&mut worker, board, depth, selectivity, alpha, beta, group)
            })
            .collect()
    };

    let mut best: Option<GroupOutcome> = None;
    for out in outcomes {
        let out = out?;
        let better = match &best {
            None => true,
            Some(cur) => {
                out.score > cur.score
                    || (out.score == cur.score && out.order_index < cur.order_index)
            }
        };
        if better {
            best = Some(out);
        }
    }
    best.map(|g| RootOutcome {
        score: g.score,
        best: Some(g.best),
        pv: g.pv.as_slice().to_vec(),
    })
}

/// Negascout over one group of root moves. Fail-soft; `None` when the
/// shared abort flag fired before the group finished.
#[allow(clippy::too_many_arguments)]
fn search_group(
    searcher: &mut Searcher,
    board: &Board,
    depth: u32,
    selectivity: u8,
    mut alpha: i32,
    beta: i32,
    group: &[(usize, Move)],
) -> Option<GroupOutcome> {
    let mut best: Option<GroupOutcome> = None;
    let mut best_score = -SCORE_INF;
    let mut child_pv = PvLine::default();
    for (k, &(order_index, mv)) in group.iter().enumerate() {
        let mut child = *board;
        child.make(mv);
        let score = if k == 0 {
            -searcher.node(&child, depth - 1, -beta, -alpha, selectivity, 1, &mut child_pv)?
        } else {
            let mut s =
                -searcher.node(&child, depth - 1, -alpha - 1, -alpha, selectivity, 1, &mut child_pv)?;
            if s > alpha && s < beta {
                s = -searcher.node(&child, depth - 1, -beta, -alpha, selectivity, 1, &mut child_pv)?;
            }
            s
        };
        if score > best_score {
            best_score = score;
            let mut pv = PvLine::default();
            pv.load(mv.sq, &child_pv);
            best = Some(GroupOutcome { score, order_index, best: mv.sq, pv });
        }
        if best_score > alpha {
            alpha = best_score;
            if alpha >= beta {
                break;
            }
        }
    }
    best
}
