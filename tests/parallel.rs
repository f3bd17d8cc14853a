use flipbot::board::{Board, BoardSize, MASK_8X8};
use flipbot::search::{SearchParams, SearchResult, Searcher};

fn run(params: SearchParams, board: &Board) -> SearchResult {
    let mut searcher = Searcher::new(params).unwrap();
    searcher.search(board)
}

#[test]
fn worker_count_does_not_change_the_answer() {
    let board = Board::new(BoardSize::Standard);
    let base = SearchParams { depth: 6, ..SearchParams::default() };
    let single = run(SearchParams { threads: 1, ..base }, &board);
    let quad = run(SearchParams { threads: 4, ..base }, &board);
    assert_eq!(single.best_move, quad.best_move);
    assert_eq!(single.score, quad.score);
    assert_eq!(single.depth, quad.depth);
}

#[test]
fn parallel_endgame_solve_is_exact() {
    let board = Board::from_parts(0x400070E070534FD0, 0x22FF0F1F8E2CB025, MASK_8X8);
    for threads in [1usize, 2, 4] {
        let params = SearchParams { threads, ..SearchParams::default() };
        let res = run(params, &board);
        assert_eq!(res.score, 10, "threads={threads}");
    }
}

#[test]
fn single_threaded_node_counts_are_reproducible() {
    let board = Board::new(BoardSize::Standard);
    let params = SearchParams { depth: 6, threads: 1, ..SearchParams::default() };
    let a = run(params, &board);
    let b = run(params, &board);
    assert_eq!(a.nodes, b.nodes, "fresh single-threaded runs must match exactly");
    assert_eq!(a.best_move, b.best_move);
    assert_eq!(a.score, b.score);
}

#[test]
fn repeated_parallel_runs_agree_on_the_result() {
    let board = Board::new(BoardSize::Standard);
    let params = SearchParams { depth: 5, threads: 4, ..SearchParams::default() };
    let first = run(params, &board);
    for _ in 0..3 {
        let again = run(params, &board);
        assert_eq!(first.best_move, again.best_move);
        assert_eq!(first.score, again.score);
    }
}

#[test]
fn node_budget_binds_parallel_workers() {
    // The counter is shared, so the budget must stop an exact solve
    // mid-depth even when the work is split across workers.
    let board = Board::from_parts(0x400070E070534FD0, 0x22FF0F1F8E2CB025, MASK_8X8);
    let params = SearchParams {
        threads: 2,
        max_nodes: Some(100),
        ..SearchParams::default()
    };
    let res = run(params, &board);
    assert!(res.nodes <= 110, "budget exceeded: {} nodes", res.nodes);
    assert!(res.rows.is_empty(), "the solve cannot finish within 100 nodes");
}

#[test]
fn abort_flag_cancels_from_another_thread() {
    use std::sync::atomic::Ordering;

    let board = Board::new(BoardSize::Standard);
    let params = SearchParams { depth: 40, ..SearchParams::default() };
    let mut searcher = Searcher::new(params).unwrap();
    let handle = searcher.abort_handle();
    let stopper = std::thread::spawn(move || {
        std::thread::sleep(std::time::Duration::from_millis(50));
        handle.store(true, Ordering::Relaxed);
    });
    let res = searcher.search(&board);
    stopper.join().unwrap();
    // Whatever depth completed in 50ms is reported, nothing deeper.
    assert!(res.depth < 40);
    assert_eq!(res.rows.len(), res.depth as usize);
}

#[test]
fn movetime_deadline_is_honored() {
    let board = Board::new(BoardSize::Standard);
    let params = SearchParams {
        depth: 40,
        movetime: Some(std::time::Duration::from_millis(100)),
        ..SearchParams::default()
    };
    let mut searcher = Searcher::new(params).unwrap();
    let start = std::time::Instant::now();
    let res = searcher.search(&board);
    assert!(start.elapsed() < std::time::Duration::from_secs(10));
    assert!(res.depth < 40);
}
