//! Stable-disc analysis.
//!
//! A disc is stable when no sequence of legal moves can flip it. The
//! analyzer combines an exact per-line table for the four border lines
//! of the 8x8 board with a conservative interior propagation: a disc is
//! safe along an axis when the whole line is occupied, the ray leaves
//! the board next to it, or an adjacent same-color stable disc blocks
//! any bracket through it. The result never overclaims: every reported
//! disc is provably unflippable.

use crate::board::flips::shift_dir;
use crate::board::{Board, MASK_8X8};
use once_cell::sync::Lazy;

/// Direction index pairs forming the four flip axes (see
/// `board::flips::DIRS` ordering: E, W, N, S, NE, NW, SE, SW).
const AXES: [(usize, usize); 4] = [(0, 1), (2, 3), (4, 7), (5, 6)];

/// `EDGE_STABLE[(p << 8) | o]` is the subset of `p` discs on an 8-cell
/// line that survive every way either player can fill the remaining
/// squares. Placements that flip nothing on the line are allowed (they
/// model captures through a perpendicular line).
static EDGE_STABLE: Lazy<Box<[u8; 65536]>> = Lazy::new(build_edge_table);

/// Force construction of the edge-line table. Idempotent; building is a
/// pure function of board geometry.
pub fn edge_stability_init() {
    Lazy::force(&EDGE_STABLE);
}

fn line_flips(x: u32, p: u8, o: u8) -> u8 {
    let mut flipped = 0u8;
    // Walk left then right from the played square.
    for (range, step_back) in [(x + 1..8, false), (0..x, true)] {
        let mut run = 0u8;
        let cells: Vec<u32> = if step_back {
            range.rev().collect()
        } else {
            range.collect()
        };
        for c in cells {
            let bit = 1u8 << c;
            if o & bit != 0 {
                run |= bit;
            } else if p & bit != 0 {
                flipped |= run;
                break;
            } else {
                break;
            }
        }
    }
    flipped
}

fn find_stable(p: u8, o: u8, memo: &mut [Option<u8>]) -> u8 {
    let idx = ((p as usize) << 8) | o as usize;
    if let Some(s) = memo[idx] {
        return s;
    }
    let occupied = p | o;
    let mut stable = p;
    if occupied != 0xFF {
        for x in 0..8 {
            let bit = 1u8 << x;
            if occupied & bit != 0 {
                continue;
            }
            // p fills the square.
            let f = line_flips(x, p, o);
            stable &= find_stable(p | bit | f, o & !f, memo) & !f;
            if stable == 0 {
                break;
            }
            // o fills the square.
            let f = line_flips(x, o, p);
            stable &= find_stable(p & !f, o | bit | f, memo);
            if stable == 0 {
                break;
            }
        }
    }
    memo[idx] = Some(stable);
    stable
}

fn build_edge_table() -> Box<[u8; 65536]> {
    let mut memo: Vec<Option<u8>> = vec![None; 65536];
    let mut table = vec![0u8; 65536].into_boxed_slice();
    for p in 0..256u16 {
        for o in 0..256u16 {
            if p & o != 0 {
                continue;
            }
            let idx = ((p as usize) << 8) | o as usize;
            table[idx] = find_stable(p as u8, o as u8, &mut memo);
        }
    }
    table.try_into().unwrap_or_else(|_| unreachable!())
}

fn gather(bb: u64, squares: &[u8; 8]) -> u8 {
    let mut byte = 0u8;
    for (i, &sq) in squares.iter().enumerate() {
        if bb & (1u64 << sq) != 0 {
            byte |= 1 << i;
        }
    }
    byte
}

fn scatter(byte: u8, squares: &[u8; 8]) -> u64 {
    let mut bb = 0u64;
    for (i, &sq) in squares.iter().enumerate() {
        if byte & (1 << i) != 0 {
            bb |= 1u64 << sq;
        }
    }
    bb
}

const EDGE_LINES: [[u8; 8]; 4] = [
    [0, 1, 2, 3, 4, 5, 6, 7],         // rank 1
    [56, 57, 58, 59, 60, 61, 62, 63], // rank 8
    [0, 8, 16, 24, 32, 40, 48, 56],   // file a
    [7, 15, 23, 31, 39, 47, 55, 63],  // file h
];

/// Exact stable discs on the four border lines of the standard board.
fn edge_stable(own: u64, opp: u64) -> u64 {
    let table = &*EDGE_STABLE;
    let mut stable = 0u64;
    for line in &EDGE_LINES {
        let p = gather(own, line);
        let o = gather(opp, line);
        stable |= scatter(table[((p as usize) << 8) | o as usize], line);
        stable |= scatter(table[((o as usize) << 8) | p as usize], line);
    }
    stable
}

/// Squares whose whole line along `axis` contains no empty square of
/// the playing area.
fn full_line(axis: usize, empties: u64, mask: u64) -> u64 {
    let (dp, dm) = AXES[axis];
    let mut sees = 0u64;
    for dir in [dp, dm] {
        let mut t = shift_dir(empties & mask, dir) & mask;
        for _ in 0..6 {
            sees |= t;
            t = shift_dir(t, dir) & mask;
        }
        sees |= t;
    }
    mask & !sees
}

/// All provably stable discs of both colors.
pub fn stable_discs(board: &Board) -> u64 {
    let occupied = board.own | board.opp;
    if occupied == 0 {
        return 0;
    }
    let mask = board.mask;
    let empties = mask & !occupied;

    let mut full = [0u64; 4];
    let mut boundary = [0u64; 4];
    for axis in 0..4 {
        let (dp, dm) = AXES[axis];
        full[axis] = full_line(axis, empties, mask);
        // No on-board neighbor on one side of the axis: a bracket
        // through the square cannot close there.
        boundary[axis] = mask & (!shift_dir(mask, dp) | !shift_dir(mask, dm));
    }

    let mut stable = if mask == MASK_8X8 {
        edge_stable(board.own, board.opp) & occupied
    } else {
        0
    };

    loop {
        let mut added = 0u64;
        for color in [board.own, board.opp] {
            let anchors = stable & color;
            let mut safe = mask;
            for axis in 0..4 {
                let (dp, dm) = AXES[axis];
                safe &= full[axis]
                    | boundary[axis]
                    | shift_dir(anchors, dp)
                    | shift_dir(anchors, dm);
            }
            added |= color & safe & !stable;
        }
        if added == 0 {
            break;
        }
        stable |= added;
    }
    stable
}

/// Upper bound on the mover's final score given the opponent's stable
/// discs: those can never be recaptured, so at best everything else
/// ends up with the mover.
pub fn stability_bound(board: &Board) -> i32 {
    let n = board.mask.count_ones() as i32;
    let opp_stable = (stable_discs(board) & board.opp).count_ones() as i32;
    n - 2 * opp_stable
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, BoardSize, MASK_6X6};

    #[test]
    fn opening_has_no_stable_discs() {
        let b = Board::new(BoardSize::Standard);
        assert_eq!(stable_discs(&b), 0);
    }

    #[test]
    fn full_board_is_all_stable() {
        let own = 0xAAAA_AAAA_AAAA_AAAA;
        let b = Board::from_parts(own, !own, MASK_8X8);
        assert_eq!(stable_discs(&b), u64::MAX);
    }

    #[test]
    fn lone_corner_is_stable() {
        let b = Board::from_parts(1, (1 << 27) | (1 << 36), MASK_8X8);
        assert_eq!(stable_discs(&b) & 1, 1);
    }

    #[test]
    fn corner_anchored_edge_run_is_stable() {
        // a1..d1 own, rest of rank 1 empty: anchored run is stable.
        let own = 0b1111u64;
        let b = Board::from_parts(own, (1 << 27) | (1 << 36), MASK_8X8);
        let s = stable_discs(&b);
        assert_eq!(s & 0xFF, own, "run anchored at a1 should be stable");
    }

    #[test]
    fn unanchored_edge_run_is_not_stable() {
        // c1..f1 own with both rank-1 ends open: flippable later.
        let own = 0b0011_1100u64;
        let b = Board::from_parts(own, (1 << 27) | (1 << 36), MASK_8X8);
        assert_eq!(stable_discs(&b) & 0xFF, 0);
    }

    #[test]
    fn small_board_corner_is_stable() {
        // b2 is a corner of the 6x6 playing area.
        let own = 1u64 << 9;
        let b = Board::from_parts(own, (1 << 27) | (1 << 36), MASK_6X6);
        assert_eq!(stable_discs(&b) & own, own);
    }

    #[test]
    fn bound_reflects_opponent_stability() {
        let b = Board::new(BoardSize::Standard);
        assert_eq!(stability_bound(&b), 64);
        // Opponent owns the a1 corner: bound drops by two.
        let b = Board::from_parts((1 << 27) | (1 << 36), 1, MASK_8X8);
        assert_eq!(stability_bound(&b), 62);
    }
}
