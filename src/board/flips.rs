//! Bit-parallel move generation primitives.
//!
//! Bit 0 is a1, bit 7 is h1, bit 56 is a8 (row-major). The eight
//! directional shifts mask off the wrapping file before shifting so a
//! ray never crosses the a/h file boundary.

/// Everything except the a-file.
const NOT_FILE_A: u64 = 0xFEFE_FEFE_FEFE_FEFE;
/// Everything except the h-file.
const NOT_FILE_H: u64 = 0x7F7F_7F7F_7F7F_7F7F;
const FULL: u64 = u64::MAX;

/// (shift amount, pre-shift mask, left-shift?) per direction:
/// E, W, N, S, NE, NW, SE, SW.
const DIRS: [(u32, u64, bool); 8] = [
    (1, NOT_FILE_H, true),
    (1, NOT_FILE_A, false),
    (8, FULL, true),
    (8, FULL, false),
    (9, NOT_FILE_H, true),
    (7, NOT_FILE_A, true),
    (7, NOT_FILE_H, false),
    (9, NOT_FILE_A, false),
];

#[inline(always)]
fn shift(bb: u64, dir: usize) -> u64 {
    let (amt, mask, left) = DIRS[dir];
    if left {
        (bb & mask) << amt
    } else {
        (bb & mask) >> amt
    }
}

/// Legal landing squares for the mover, as a bitmask.
///
/// Classic dumb7fill: smear the mover's discs over contiguous opponent
/// discs in each direction, then step once more onto an empty square.
#[inline]
pub fn move_mask(own: u64, opp: u64, valid: u64) -> u64 {
    let empty = valid & !(own | opp);
    let mut moves = 0u64;
    for dir in 0..8 {
        let mut t = shift(own, dir) & opp;
        // Board is 8 wide: at most 6 interior opponent discs per ray.
        for _ in 0..5 {
            t |= shift(t, dir) & opp;
        }
        moves |= shift(t, dir) & empty;
    }
    moves
}

/// Discs flipped when the mover plays on `sq`.
///
/// Walks each of the eight rays over opponent discs; a run is captured
/// only when it is closed by one of the mover's discs.
#[inline]
pub fn flips(sq: u8, own: u64, opp: u64) -> u64 {
    let bit = 1u64 << sq;
    let mut flipped = 0u64;
    for dir in 0..8 {
        let mut run = 0u64;
        let mut cur = shift(bit, dir);
        while cur & opp != 0 {
            run |= cur;
            cur = shift(cur, dir);
        }
        if cur & own != 0 {
            flipped |= run;
        }
    }
    flipped
}

/// One directional step, exposed for the stability analyzer.
#[inline(always)]
pub(crate) fn shift_dir(bb: u64, dir: usize) -> u64 {
    shift(bb, dir)
}
