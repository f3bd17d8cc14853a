//! 64-bit position fingerprints.
//!
//! Boards are mover-relative, so the side to move is already encoded in
//! which bitboard is `own`; no separate side key is needed.

use once_cell::sync::Lazy;

fn splitmix64(x: &mut u64) -> u64 {
    *x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

static TABLE: Lazy<[[u64; 64]; 2]> = Lazy::new(|| {
    let mut t = [[0u64; 64]; 2];
    let mut seed = 0xF00D_F00D_DEAD_BEEF_u64;
    for side in &mut t {
        for v in side.iter_mut() {
            *v = splitmix64(&mut seed);
        }
    }
    t
});

/// Fingerprint of a mover-relative position.
#[inline]
pub fn key(own: u64, opp: u64) -> u64 {
    let mut k = 0u64;
    let mut bb = own;
    while bb != 0 {
        k ^= TABLE[0][bb.trailing_zeros() as usize];
        bb &= bb - 1;
    }
    let mut bb = opp;
    while bb != 0 {
        k ^= TABLE[1][bb.trailing_zeros() as usize];
        bb &= bb - 1;
    }
    k
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_distinguishes_side_to_move() {
        let a = key(0x18_0000_0000, 0x24_0000_0000);
        let b = key(0x24_0000_0000, 0x18_0000_0000);
        assert_ne!(a, b);
    }

    #[test]
    fn key_is_deterministic() {
        assert_eq!(key(1, 2), key(1, 2));
        assert_ne!(key(1, 2), key(1, 4));
    }
}
