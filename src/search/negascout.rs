//! Iterative-deepening principal-variation search.
//!
//! Each deepening iteration runs a negascout (PVS) search: the first
//! move at every node gets the full window, later moves a null-window
//! probe with a re-search only when the probe suggests an improvement.
//! Aspiration windows seed each iteration near the previous score.
//! Cancellation unwinds through `Option`: `None` means "aborted, commit
//! nothing", so interrupted depths never pollute the hash tables or the
//! reported result.

use crate::board::{corner_mask, Board, Move, Square};
use crate::search::endgame;
use crate::search::eval::{Evaluate, MobilityEval, SCORE_INF, SCORE_MAX, SCORE_MIN};
use crate::search::parallel::{self, RootOutcome};
use crate::search::tt::{AllocationError, HashFamily, HashTable, StoreData, SHALLOW_DEPTH};
use crate::search::{DepthRow, SearchParams};
use crate::stability;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Principal variation under construction, replaced wholesale at each
/// depth.
#[derive(Debug, Clone)]
pub struct PvLine {
    moves: [Square; 64],
    len: usize,
}

impl Default for PvLine {
    fn default() -> Self {
        PvLine { moves: [0; 64], len: 0 }
    }
}

impl PvLine {
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// `mv` followed by the child's line.
    pub fn load(&mut self, mv: Square, child: &PvLine) {
        self.moves[0] = mv;
        let n = child.len.min(self.moves.len() - 1);
        self.moves[1..=n].copy_from_slice(&child.moves[..n]);
        self.len = n + 1;
    }

    pub fn copy_from(&mut self, other: &PvLine) {
        self.moves = other.moves;
        self.len = other.len;
    }

    pub fn as_slice(&self) -> &[Square] {
        &self.moves[..self.len]
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    /// Best move, `None` when the side to move must pass (or the game
    /// is over).
    pub best_move: Option<Square>,
    pub score: i32,
    pub pv: Vec<Square>,
    pub nodes: u64,
    /// Deepest fully completed iteration.
    pub depth: u32,
    /// One row per completed iteration, in order.
    pub rows: Vec<DepthRow>,
}

pub struct Searcher {
    pub(crate) params: SearchParams,
    tables: Arc<HashFamily>,
    evaluator: Arc<dyn Evaluate>,
    abort: Arc<AtomicBool>,
    /// Shared across all workers so the node budget binds globally.
    nodes: Arc<AtomicU64>,
    node_limit: u64,
    deadline: Option<Instant>,
}

impl Searcher {
    pub fn new(params: SearchParams) -> Result<Self, AllocationError> {
        Self::with_evaluator(params, Arc::new(MobilityEval))
    }

    pub fn with_evaluator(
        params: SearchParams,
        evaluator: Arc<dyn Evaluate>,
    ) -> Result<Self, AllocationError> {
        let tables = Arc::new(HashFamily::new(params.table_sizes, params.count_table_stats)?);
        Ok(Searcher {
            params,
            tables,
            evaluator,
            abort: Arc::new(AtomicBool::new(false)),
            nodes: Arc::new(AtomicU64::new(0)),
            node_limit: u64::MAX,
            deadline: None,
        })
    }

    /// Shared flag that cancels the search from another thread. The
    /// result falls back to the last fully completed depth.
    pub fn abort_handle(&self) -> Arc<AtomicBool> {
        self.abort.clone()
    }

    pub fn tables(&self) -> &HashFamily {
        &self.tables
    }

    /// A worker sharing this searcher's tables, evaluator, abort flag,
    /// node counter and budget.
    pub(crate) fn worker(&self) -> Searcher {
        Searcher {
            params: self.params,
            tables: self.tables.clone(),
            evaluator: self.evaluator.clone(),
            abort: self.abort.clone(),
            nodes: self.nodes.clone(),
            node_limit: self.node_limit,
            deadline: self.deadline,
        }
    }

    #[inline]
    pub(crate) fn count_node(&self) {
        self.nodes.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    fn node_count(&self) -> u64 {
        self.nodes.load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn check_abort(&mut self) -> bool {
        if self.abort.load(Ordering::Relaxed) {
            return true;
        }
        let nodes = self.node_count();
        if nodes >= self.node_limit {
            self.abort.store(true, Ordering::Relaxed);
            return true;
        }
        if nodes & 0x3FF == 0 {
            if let Some(deadline) = self.deadline {
                if Instant::now() >= deadline {
                    self.abort.store(true, Ordering::Relaxed);
                    return true;
                }
            }
        }
        false
    }

    /// Iterative-deepening driver. Returns the result of the deepest
    /// depth that completed on every task; an aborted iteration is
    /// discarded.
    pub fn search(&mut self, board: &Board) -> SearchResult {
        let start = Instant::now();
        self.nodes.store(0, Ordering::Relaxed);
        self.abort.store(false, Ordering::Relaxed);
        self.node_limit = self.params.max_nodes.unwrap_or(u64::MAX);
        self.deadline = self.params.movetime.map(|d| Instant::now() + d);

        if board.is_game_over() {
            return SearchResult {
                best_move: None,
                score: board.final_score(),
                ..SearchResult::default()
            };
        }
        if !board.has_moves() {
            // Forced pass: solve the opponent's position and negate
            // every reported score back to the mover's perspective.
            let mut passed = self.search(&board.pass());
            passed.score = -passed.score;
            for row in &mut passed.rows {
                row.score = -row.score;
            }
            passed.best_move = None;
            return passed;
        }

        let empties = board.n_empties();
        let max_depth = self.params.depth.min(empties);
        // Inside solving range there is nothing to deepen iteratively:
        // go straight to the exact solve.
        let depths: Vec<u32> = if empties <= self.params.endgame_threshold {
            vec![empties]
        } else {
            (1..=max_depth).collect()
        };

        let mut result = SearchResult::default();
        let mut prev_score: Option<i32> = None;
        let mut prev_best: Option<Square> = None;
        for depth in depths {
            if self.check_abort() {
                break;
            }
            self.tables.bump_generation();
            let selectivity = if depth >= empties { 0 } else { self.params.selectivity };
            let Some(out) = self.root_aspiration(board, depth, selectivity, prev_score, prev_best)
            else {
                break;
            };
            prev_best = out.best;
            prev_score = Some(out.score);
            let row = DepthRow {
                depth,
                score: out.score,
                elapsed: start.elapsed(),
                nodes: self.node_count(),
                pv: out.pv.clone(),
            };
            log::debug!(
                "depth {} score {:+} nodes {} pv {}",
                row.depth,
                row.score,
                row.nodes,
                row.pv_string()
            );
            result.best_move = out.best;
            result.score = out.score;
            result.pv = out.pv;
            result.depth = depth;
            result.rows.push(row);
        }
        result.nodes = self.node_count();
        result
    }

    /// Entry point for the problem/benchmark harnesses.
    pub fn solve(&mut self, board: &Board) -> SearchResult {
        self.search(board)
    }

    /// Aspiration loop: start with a narrow window around the previous
    /// iteration's score, widen geometrically on failure until the
    /// result is interior or the window is maximal.
    fn root_aspiration(
        &mut self,
        board: &Board,
        depth: u32,
        selectivity: u8,
        prev_score: Option<i32>,
        prev_best: Option<Square>,
    ) -> Option<RootOutcome> {
        let mut width = self.params.aspiration_window.max(1);
        let (mut alpha, mut beta) = match prev_score {
            Some(s) => ((s - width).max(SCORE_MIN), (s + width).min(SCORE_MAX)),
            None => (SCORE_MIN, SCORE_MAX),
        };
        loop {
            let out =
                parallel::root_split(self, board, depth, selectivity, alpha, beta, prev_best)?;
            if out.score <= alpha && alpha > SCORE_MIN {
                alpha = (alpha - width).max(SCORE_MIN);
                width = width.saturating_mul(2);
            } else if out.score >= beta && beta < SCORE_MAX {
                beta = (beta + width).min(SCORE_MAX);
                width = width.saturating_mul(2);
            } else {
                return Some(out);
            }
        }
    }

    /// One negascout node. `None` unwinds an aborted search without
    /// committing anything to the tables.
    pub(crate) fn node(
        &mut self,
        board: &Board,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
        selectivity: u8,
        ply: u32,
        pv: &mut PvLine,
    ) -> Option<i32> {
        if self.check_abort() {
            return None;
        }
        if board.n_empties() <= self.params.endgame_threshold {
            return endgame::solve_node(self, board, alpha, beta, ply, pv);
        }
        self.count_node();
        pv.clear();

        if !board.has_moves() {
            let passed = board.pass();
            if !passed.has_moves() {
                return Some(board.final_score());
            }
            let mut child_pv = PvLine::default();
            let score =
                -self.node(&passed, depth, -beta, -alpha, selectivity, ply + 1, &mut child_pv)?;
            pv.copy_from(&child_pv);
            return Some(score);
        }

        if depth == 0 {
            return Some(self.evaluator.score(board).clamp(SCORE_MIN + 1, SCORE_MAX - 1));
        }

        // Stability cutoff: the opponent's stable discs cap what the
        // mover can still win.
        let n_squares = board.mask.count_ones() as i32;
        if alpha >= n_squares / 4 {
            let upper = stability::stability_bound(board);
            if upper <= alpha {
                return Some(upper);
            }
            beta = beta.min(upper);
        }

        let key = board.key();
        let mut hash_best = None;
        let mut pv_best = None;
        for (table, is_pv, enabled) in [
            (&self.tables.pv, true, true),
            (&self.tables.main, false, true),
            (&self.tables.shallow, false, depth <= SHALLOW_DEPTH as u32),
        ] {
            if !enabled {
                continue;
            }
            let Some(entry) = table.probe(key) else { continue };
            if is_pv {
                pv_best = entry.best;
            } else if hash_best.is_none() {
                hash_best = entry.best;
            }
            if entry.depth as u32 >= depth && entry.selectivity <= selectivity {
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

        // ProbCut-style selective cutoff: a reduced-depth exact probe
        // far outside the window cuts at the configured confidence.
        if selectivity > 0 && depth >= 5 {
            let probe_depth = 2 * (depth / 4);
            let margin = probcut_margin(selectivity, depth);
            let mut scratch = PvLine::default();
            if beta + margin <= SCORE_MAX {
                let bound = beta + margin;
                let v = self.node(board, probe_depth, bound - 1, bound, 0, ply, &mut scratch)?;
                if v >= bound {
                    return Some(beta);
                }
            }
            if alpha - margin >= SCORE_MIN {
                let bound = alpha - margin;
                let v = self.node(board, probe_depth, bound, bound + 1, 0, ply, &mut scratch)?;
                if v <= bound {
                    return Some(alpha);
                }
            }
        }

        let mut moves = board.moves();
        self.order_moves(board, &mut moves, pv_best, hash_best);

        let search_alpha = alpha;
        let search_beta = beta;
        let mut best = -SCORE_INF;
        let mut best_move = None;
        let mut child_pv = PvLine::default();
        for (i, &mv) in moves.iter().enumerate() {
            let mut child = *board;
            child.make(mv);
            let score = if i == 0 {
                -self.node(&child, depth - 1, -beta, -alpha, selectivity, ply + 1, &mut child_pv)?
            } else {
                let mut s = -self.node(
                    &child,
                    depth - 1,
                    -alpha - 1,
                    -alpha,
                    selectivity,
                    ply + 1,
                    &mut child_pv,
                )?;
                if s > alpha && s < beta {
                    s = -self.node(
                        &child,
                        depth - 1,
                        -beta,
                        -alpha,
                        selectivity,
                        ply + 1,
                        &mut child_pv,
                    )?;
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

        let data = store_data(depth, selectivity, best, search_alpha, search_beta, best_move);
        self.tables.main.store(key, data);
        if depth <= SHALLOW_DEPTH as u32 {
            self.tables.shallow.store(key, data);
        }
        if search_beta - search_alpha > 1 && best > search_alpha && best < search_beta {
            self.tables.pv.store(key, data);
        }
        Some(best)
    }

    /// Move ordering: PV-table move, then main-table move, then a cheap
    /// heuristic (few opponent replies, corner grabs, stability gains),
    /// with the square index as a deterministic tiebreak.
    pub(crate) fn order_moves(
        &self,
        board: &Board,
        moves: &mut [Move],
        pv_best: Option<Square>,
        hash_best: Option<Square>,
    ) {
        if moves.len() < 2 {
            return;
        }
        let corners = corner_mask(board.mask);
        let border = border_mask(board.mask);
        let mut scored: Vec<(i32, Move)> = moves
            .iter()
            .map(|&mv| {
                let score = if pv_best == Some(mv.sq) {
                    1 << 20
                } else if hash_best == Some(mv.sq) {
                    1 << 19
                } else {
                    let bit = 1u64 << mv.sq;
                    let mut child = *board;
                    child.make(mv);
                    let opp_mobility = child.legal_moves().count_ones() as i32;
                    let mut s = -32 * opp_mobility;
                    if bit & corners != 0 {
                        s += 1 << 10;
                    }
                    if bit & border != 0 {
                        // child.opp is the mover's color after make.
                        let stable =
                            (stability::stable_discs(&child) & child.opp).count_ones() as i32;
                        s += 4 * stable;
                    }
                    s
                };
                (score, mv)
            })
            .collect();
        scored.sort_by_key(|&(score, mv)| (std::cmp::Reverse(score), mv.sq));
        for (slot, (_, mv)) in moves.iter_mut().zip(scored) {
            *slot = mv;
        }
    }

    pub(crate) fn main_table(&self) -> &HashTable {
        &self.tables.main
    }

    pub(crate) fn pv_table(&self) -> &HashTable {
        &self.tables.pv
    }
}

/// Fail-soft bound pair for a completed node.
pub(crate) fn store_data(
    depth: u32,
    selectivity: u8,
    best: i32,
    alpha: i32,
    beta: i32,
    best_move: Option<Square>,
) -> StoreData {
    let (lower, upper) = if best >= beta {
        (best, SCORE_MAX)
    } else if best <= alpha {
        (SCORE_MIN, best)
    } else {
        (best, best)
    };
    StoreData {
        depth: depth.min(u8::MAX as u32) as u8,
        selectivity,
        lower: lower as i16,
        upper: upper as i16,
        best: best_move,
    }
}

/// Squares on the rim of the playing area.
fn border_mask(mask: u64) -> u64 {
    use crate::board::flips::shift_dir;
    let mut interior = mask;
    for dir in 0..8 {
        interior &= shift_dir(mask, dir);
    }
    mask & !interior
}

/// Confidence thresholds per selectivity level, t * 10.
const T_X10: [i32; 6] = [0, 33, 26, 20, 15, 11];

fn probcut_margin(selectivity: u8, depth: u32) -> i32 {
    // sigma grows with the depth gap the probe has to predict.
    let sigma_x10 = 10 + 2 * depth as i32;
    (T_X10[selectivity as usize] * sigma_x10 + 99) / 100
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardSize;

    #[test]
    fn pv_line_load_prepends() {
        let mut child = PvLine::default();
        child.load(7, &PvLine::default());
        let mut parent = PvLine::default();
        parent.load(3, &child);
        assert_eq!(parent.as_slice(), &[3, 7]);
    }

    #[test]
    fn margin_grows_with_risk() {
        assert!(probcut_margin(1, 8) > probcut_margin(5, 8));
        assert!(probcut_margin(1, 12) > probcut_margin(1, 6));
    }

    #[test]
    fn ordering_prefers_hash_move() {
        let params = SearchParams::default();
        let s = Searcher::new(params).unwrap();
        let b = Board::new(BoardSize::Standard);
        let mut moves = b.moves();
        let last = moves.last().unwrap().sq;
        s.order_moves(&b, &mut moves, None, Some(last));
        assert_eq!(moves[0].sq, last);
    }
}
