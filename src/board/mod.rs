//! Bitboard position representation and move application.
//!
//! Boards are mover-relative: `own` always belongs to the side to move,
//! and applying a move (or a pass) swaps the roles. The 6x6 variant
//! shares the 8x8 bit layout and restricts play to a centered
//! valid-square mask.

pub mod flips;
pub mod zobrist;

use std::fmt;
use thiserror::Error;

/// Valid-square mask for the standard board.
pub const MASK_8X8: u64 = u64::MAX;
/// Centered 6x6 region (files b-g, ranks 2-7) of the 8x8 layout.
pub const MASK_6X6: u64 = 0x007E_7E7E_7E7E_7E00;

/// Square index, bit 0 = a1, row-major to h8.
pub type Square = u8;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("illegal move {0} for this position")]
pub struct InvalidMoveError(pub String);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("board text needs 64 squares, found {0}")]
    BadLength(usize),
    #[error("unrecognized square character {0:?}")]
    BadSquare(char),
    #[error("unrecognized color {0:?} (expected B/X or W/O)")]
    BadColor(char),
    #[error("bad square coordinate {0:?}")]
    BadCoordinate(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardSize {
    Standard,
    Small,
}

impl BoardSize {
    pub fn valid_mask(self) -> u64 {
        match self {
            BoardSize::Standard => MASK_8X8,
            BoardSize::Small => MASK_6X6,
        }
    }

    pub fn n_squares(self) -> u32 {
        self.valid_mask().count_ones()
    }
}

/// A move: landing square plus the discs it flips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub sq: Square,
    pub flips: u64,
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&square_name(self.sq))
    }
}

/// Coordinate notation for a square index ("a1".."h8").
pub fn square_name(sq: Square) -> String {
    let file = (b'a' + (sq % 8)) as char;
    let rank = (b'1' + (sq / 8)) as char;
    format!("{file}{rank}")
}

/// Parse coordinate notation back to a square index.
pub fn parse_square(s: &str) -> Result<Square, ParseError> {
    let b = s.as_bytes();
    if b.len() == 2
        && (b'a'..=b'h').contains(&b[0].to_ascii_lowercase())
        && (b'1'..=b'8').contains(&b[1])
    {
        Ok((b[0].to_ascii_lowercase() - b'a') + (b[1] - b'1') * 8)
    } else {
        Err(ParseError::BadCoordinate(s.to_string()))
    }
}

/// Corner squares of the playing area described by `mask`.
pub fn corner_mask(mask: u64) -> u64 {
    if mask == MASK_6X6 {
        (1 << 9) | (1 << 14) | (1 << 49) | (1 << 54)
    } else {
        1 | (1 << 7) | (1 << 56) | (1 << 63)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    /// Discs of the side to move.
    pub own: u64,
    /// Discs of the opponent.
    pub opp: u64,
    /// Playable squares (8x8 or centered 6x6).
    pub mask: u64,
}

impl Board {
    /// Starting position; same four center discs for both sizes,
    /// black to move.
    pub fn new(size: BoardSize) -> Self {
        Board {
            own: (1 << 28) | (1 << 35),
            opp: (1 << 27) | (1 << 36),
            mask: size.valid_mask(),
        }
    }

    pub fn from_parts(own: u64, opp: u64, mask: u64) -> Self {
        debug_assert_eq!(own & opp, 0);
        debug_assert_eq!((own | opp) & !mask, 0);
        Board { own, opp, mask }
    }

    /// Bitmask of legal landing squares for the side to move.
    #[inline]
    pub fn legal_moves(&self) -> u64 {
        flips::move_mask(self.own, self.opp, self.mask)
    }

    #[inline]
    pub fn has_moves(&self) -> bool {
        self.legal_moves() != 0
    }

    /// Legal moves with flip masks, ascending square order.
    pub fn moves(&self) -> Vec<Move> {
        let mut out = Vec::with_capacity(32);
        let mut m = self.legal_moves();
        while m != 0 {
            let sq = m.trailing_zeros() as Square;
            m &= m - 1;
            out.push(Move { sq, flips: flips::flips(sq, self.own, self.opp) });
        }
        out
    }

    /// Flip mask for a landing square, zero if the square captures
    /// nothing.
    #[inline]
    pub fn flips_for(&self, sq: Square) -> u64 {
        flips::flips(sq, self.own, self.opp)
    }

    /// Checked move application returning the successor position.
    pub fn apply(&self, mv: Move) -> Result<Board, InvalidMoveError> {
        let bit = 1u64 << mv.sq;
        if self.legal_moves() & bit == 0 || self.flips_for(mv.sq) != mv.flips {
            return Err(InvalidMoveError(square_name(mv.sq)));
        }
        let mut next = *self;
        next.make(mv);
        Ok(next)
    }

    /// Unchecked in-place move application (hot path). The caller must
    /// hold a legal `Move` for this position.
    #[inline]
    pub fn make(&mut self, mv: Move) {
        let bit = 1u64 << mv.sq;
        let own = self.own | mv.flips | bit;
        self.own = self.opp ^ mv.flips;
        self.opp = own;
    }

    /// Inverse of [`Board::make`], restoring the position bit-exact.
    #[inline]
    pub fn undo(&mut self, mv: Move) {
        let bit = 1u64 << mv.sq;
        let opp = self.own | mv.flips;
        self.own = self.opp ^ (mv.flips | bit);
        self.opp = opp;
    }

    /// Swap sides without playing a disc.
    #[inline]
    pub fn pass(&self) -> Board {
        Board { own: self.opp, opp: self.own, mask: self.mask }
    }

    /// The game ends when neither side has a move (includes full board).
    pub fn is_game_over(&self) -> bool {
        !self.has_moves() && !self.pass().has_moves()
    }

    #[inline]
    pub fn n_empties(&self) -> u32 {
        (self.mask & !(self.own | self.opp)).count_ones()
    }

    #[inline]
    pub fn n_discs(&self) -> u32 {
        (self.own | self.opp).count_ones()
    }

    /// Mover-relative disc difference.
    #[inline]
    pub fn disc_diff(&self) -> i32 {
        self.own.count_ones() as i32 - self.opp.count_ones() as i32
    }

    /// Final score with empty squares awarded to the winner.
    pub fn final_score(&self) -> i32 {
        let d = self.disc_diff();
        let e = self.n_empties() as i32;
        match d.cmp(&0) {
            std::cmp::Ordering::Greater => d + e,
            std::cmp::Ordering::Less => d - e,
            std::cmp::Ordering::Equal => 0,
        }
    }

    /// 64-bit position fingerprint (side to move is implicit).
    #[inline]
    pub fn key(&self) -> u64 {
        zobrist::key(self.own, self.opp)
    }

    /// Parse a 64-character board (black discs `X`/`*`/`B`, white
    /// `O`/`W`, empty `-`/`.`), whitespace ignored, a1 first, and a
    /// side-to-move color. The result is mover-relative.
    pub fn parse(text: &str, to_move: char) -> Result<Board, ParseError> {
        let mut black = 0u64;
        let mut white = 0u64;
        let mut n = 0usize;
        for c in text.chars() {
            if c.is_whitespace() {
                continue;
            }
            if n >= 64 {
                n += 1;
                continue;
            }
            match c {
                'X' | 'x' | 'B' | 'b' | '*' => black |= 1 << n,
                'O' | 'o' | 'W' | 'w' => white |= 1 << n,
                '-' | '.' => {}
                other => return Err(ParseError::BadSquare(other)),
            }
            n += 1;
        }
        if n != 64 {
            return Err(ParseError::BadLength(n));
        }
        let (own, opp) = match to_move {
            'X' | 'x' | 'B' | 'b' | '*' => (black, white),
            'O' | 'o' | 'W' | 'w' => (white, black),
            other => return Err(ParseError::BadColor(other)),
        };
        Ok(Board { own, opp, mask: MASK_8X8 })
    }
}

impl fmt::Display for Board {
    /// Mover discs as `*`, opponent as `O`, rank 1 first.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  a b c d e f g h")?;
        for row in 0..8 {
            write!(f, "{} ", row + 1)?;
            for col in 0..8 {
                let bit = 1u64 << (row * 8 + col);
                let c = if self.own & bit != 0 {
                    '*'
                } else if self.opp & bit != 0 {
                    'O'
                } else if self.mask & bit != 0 {
                    '-'
                } else {
                    ' '
                };
                write!(f, "{c} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
