use flipbot::board::{Board, MASK_8X8};
use flipbot::problem::{load_problems, parse_line, verify};
use flipbot::search::{SearchParams, Searcher};

fn board_text(own: u64, opp: u64) -> String {
    (0..64)
        .map(|i| {
            if own & (1 << i) != 0 {
                'X'
            } else if opp & (1 << i) != 0 {
                'O'
            } else {
                '-'
            }
        })
        .collect()
}

const SIX_OWN: u64 = 0x00040D2940A0FCE2;
const SIX_OPP: u64 = 0xFFFBF256BF5F0010;

#[test]
fn line_round_trips_through_the_board() {
    let line = format!("{} X % -4", board_text(SIX_OWN, SIX_OPP));
    let p = parse_line(&line).unwrap().unwrap();
    assert_eq!(p.board, Board::from_parts(SIX_OWN, SIX_OPP, MASK_8X8));
    assert_eq!(p.expected, Some(-4));
}

#[test]
fn white_to_move_swaps_the_sides() {
    let line = format!("{} O", board_text(SIX_OWN, SIX_OPP));
    let p = parse_line(&line).unwrap().unwrap();
    assert_eq!(p.board.own, SIX_OPP);
    assert_eq!(p.board.opp, SIX_OWN);
}

#[test]
fn verify_checks_stored_scores() {
    let text = format!(
        "# six-empty fixture\n{} X % -4\n\n{} X % +63\n",
        board_text(SIX_OWN, SIX_OPP),
        board_text(SIX_OWN, SIX_OPP),
    );
    let problems = load_problems(&text).unwrap();
    assert_eq!(problems.len(), 2);

    let mut searcher = Searcher::new(SearchParams::default()).unwrap();
    let outcomes = verify(&mut searcher, &problems);
    assert!(outcomes[0].passed(), "exact solve must match the stored score");
    assert!(!outcomes[1].passed(), "a wrong stored score must be flagged");
    assert_eq!(outcomes[0].result.score, -4);
}

#[test]
fn problems_without_scores_always_pass() {
    let text = format!("{} X\n", board_text(SIX_OWN, SIX_OPP));
    let problems = load_problems(&text).unwrap();
    let mut searcher = Searcher::new(SearchParams::default()).unwrap();
    let outcomes = verify(&mut searcher, &problems);
    assert!(outcomes[0].passed());
}
