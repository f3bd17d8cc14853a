use flipbot::board::{Board, MASK_8X8};
use flipbot::search::{SearchParams, Searcher};

fn solve(own: u64, opp: u64) -> i32 {
    solve_with(own, opp, SearchParams::default())
}

fn solve_with(own: u64, opp: u64, params: SearchParams) -> i32 {
    let b = Board::from_parts(own, opp, MASK_8X8);
    let mut searcher = Searcher::new(params).unwrap();
    searcher.solve(&b).score
}

#[test]
fn two_empties_exact() {
    assert_eq!(solve(0x02001C7A667C2E0E, 0xFCFFE3859983C1F1), -30);
}

#[test]
fn six_empties_exact() {
    assert_eq!(solve(0x00040D2940A0FCE2, 0xFFFBF256BF5F0010), -4);
}

#[test]
fn ten_empties_exact() {
    assert_eq!(solve(0x400070E070534FD0, 0x22FF0F1F8E2CB025), 10);
}

#[test]
fn solve_is_mover_antisymmetric() {
    let own = 0x00040D2940A0FCE2u64;
    let opp = 0xFFFBF256BF5F0010u64;
    assert_eq!(solve(own, opp), -solve(opp, own));
}

#[test]
fn selectivity_is_ignored_when_solving() {
    // Inside the endgame range only exact scores are acceptable,
    // whatever pruning level was requested.
    let params = SearchParams { selectivity: 5, ..SearchParams::default() };
    assert_eq!(solve_with(0x00040D2940A0FCE2, 0xFFFBF256BF5F0010, params), -4);
    assert_eq!(solve_with(0x400070E070534FD0, 0x22FF0F1F8E2CB025, params), 10);
}

#[test]
fn threshold_zero_still_finishes_exactly() {
    // With the handoff disabled the deepening loop runs to
    // depth == empties and forces selectivity 0 on the last iteration.
    let params = SearchParams { endgame_threshold: 0, ..SearchParams::default() };
    assert_eq!(solve_with(0x00040D2940A0FCE2, 0xFFFBF256BF5F0010, params), -4);
}

#[test]
fn solved_depth_equals_empties() {
    let b = Board::from_parts(0x400070E070534FD0, 0x22FF0F1F8E2CB025, MASK_8X8);
    assert_eq!(b.n_empties(), 10);
    let mut searcher = Searcher::new(SearchParams::default()).unwrap();
    let res = searcher.solve(&b);
    assert_eq!(res.depth, 10);
    assert_eq!(res.rows.len(), 1, "inside the solve range there is one iteration");
}
