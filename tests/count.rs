use flipbot::board::{Board, BoardSize};
use flipbot::count::{count_games, count_positions, count_shapes};

#[test]
fn standard_game_counts_match_published_values() {
    let b = Board::new(BoardSize::Standard);
    let expected = [1u64, 4, 12, 56, 244, 1396, 8200, 55092];
    for (ply, &want) in expected.iter().enumerate() {
        assert_eq!(count_games(&b, ply as u32), want, "games at ply {ply}");
    }
}

#[test]
fn small_board_game_counts() {
    let b = Board::new(BoardSize::Small);
    let expected = [1u64, 4, 12, 56, 244, 1364, 7604, 47740, 308716];
    for (ply, &want) in expected.iter().enumerate() {
        assert_eq!(count_games(&b, ply as u32), want, "games at ply {ply}");
    }
}

#[test]
fn small_board_position_counts() {
    let b = Board::new(BoardSize::Small);
    assert_eq!(count_positions(&b, 4), 236);
    assert_eq!(count_positions(&b, 5), 1256);
}

#[test]
fn small_board_shape_counts() {
    // Shapes collapse color information, so they undercount positions.
    let b = Board::new(BoardSize::Small);
    assert_eq!(count_shapes(&b, 4), 220);
    assert!(count_shapes(&b, 4) <= count_positions(&b, 4));
}

#[test]
fn positions_never_exceed_games() {
    for size in [BoardSize::Standard, BoardSize::Small] {
        let b = Board::new(size);
        for ply in 0..=5 {
            let games = count_games(&b, ply);
            let positions = count_positions(&b, ply);
            assert!(positions <= games, "{size:?} ply {ply}");
        }
    }
}
