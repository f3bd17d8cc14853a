//! Iterative-deepening negascout search with selective pruning, an
//! exact endgame solver and a root-split task scheduler.

pub mod endgame;
pub mod eval;
pub mod negascout;
pub mod parallel;
pub mod tt;

pub use negascout::{SearchResult, Searcher};

use crate::board::{square_name, Square};
use std::fmt;
use std::time::Duration;

use tt::TableSizes;

/// Number of selectivity levels; 0 is exact, higher levels prune more
/// aggressively at lower statistical confidence.
pub const MAX_SELECTIVITY: u8 = 5;

/// Run configuration, built once and passed to [`Searcher::new`].
/// There is no ambient global state.
#[derive(Debug, Clone, Copy)]
pub struct SearchParams {
    /// Maximum search depth in plies; clamped to the number of empty
    /// squares.
    pub depth: u32,
    /// 0 = exact, 1..=5 increasingly aggressive probabilistic cutoffs.
    pub selectivity: u8,
    /// Empty-square count at or below which the exact endgame solver
    /// takes over. Tunable; see `SearchParams::default`.
    pub endgame_threshold: u32,
    /// Root-split worker count; 0 means rayon's current pool size.
    pub threads: usize,
    /// Abort once this many nodes have been searched.
    pub max_nodes: Option<u64>,
    /// Abort after this much wall time.
    pub movetime: Option<Duration>,
    /// Sizing of the hash-table family.
    pub table_sizes: TableSizes,
    /// Accumulate store/probe/hit counters on the tables.
    pub count_table_stats: bool,
    /// Initial half-width of the aspiration window, in discs.
    pub aspiration_window: i32,
}

impl Default for SearchParams {
    fn default() -> Self {
        SearchParams {
            depth: 60,
            selectivity: 0,
            endgame_threshold: 12,
            threads: 1,
            max_nodes: None,
            movetime: None,
            table_sizes: TableSizes::default(),
            count_table_stats: false,
            aspiration_window: 2,
        }
    }
}

/// One completed deepening iteration.
#[derive(Debug, Clone)]
pub struct DepthRow {
    pub depth: u32,
    /// Exact selectivity-0 depth==empties scores are game values in
    /// discs; otherwise heuristic units.
    pub score: i32,
    pub elapsed: Duration,
    pub nodes: u64,
    pub pv: Vec<Square>,
}

impl DepthRow {
    pub fn nodes_per_second(&self) -> u64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            (self.nodes as f64 / secs) as u64
        } else {
            0
        }
    }

    pub fn pv_string(&self) -> String {
        self.pv
            .iter()
            .map(|&sq| square_name(sq))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Fixed column order: depth, score, time, nodes, nodes/second,
/// principal variation.
impl fmt::Display for DepthRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>6}|{:>+5}|{:>13.3}|{:>13}|{:>10}| {}",
            self.depth,
            self.score,
            self.elapsed.as_secs_f64(),
            self.nodes,
            self.nodes_per_second(),
            self.pv_string(),
        )
    }
}

/// Header matching [`DepthRow`]'s Display columns.
pub const ROW_HEADER: &str =
    " depth|score|       time   |  nodes (N)  |   N/s    | principal variation";
pub const ROW_SEPARATOR: &str =
    "------+-----+--------------+-------------+----------+---------------------";
