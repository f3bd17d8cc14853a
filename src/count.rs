//! Combinatorial counting of reachable games, positions and shapes.
//!
//! A forced pass consumes a ply, matching the published perft sequence
//! for Othello (4, 12, 56, 244, 1396, 8200, ...). A finished game
//! counts as a single line regardless of remaining plies.

use crate::board::Board;
use std::collections::HashSet;

/// Number of distinct game lines of exactly `ply` plies.
pub fn count_games(board: &Board, ply: u32) -> u64 {
    let mut b = *board;
    games(&mut b, ply)
}

fn games(board: &mut Board, ply: u32) -> u64 {
    if ply == 0 {
        return 1;
    }
    if !board.has_moves() {
        if board.is_game_over() {
            return 1;
        }
        let mut passed = board.pass();
        return games(&mut passed, ply - 1);
    }
    let mut total = 0;
    for mv in board.moves() {
        board.make(mv);
        total += games(board, ply - 1);
        board.undo(mv);
    }
    total
}

/// Number of distinct mover-relative positions reached at exactly
/// `ply` plies (early-finished games count where they stop).
pub fn count_positions(board: &Board, ply: u32) -> u64 {
    let mut seen = HashSet::new();
    let mut b = *board;
    collect(&mut b, ply, &mut |b: &Board| (b.own, b.opp), &mut seen);
    seen.len() as u64
}

/// Number of distinct occupancy shapes at exactly `ply` plies.
pub fn count_shapes(board: &Board, ply: u32) -> u64 {
    let mut seen = HashSet::new();
    let mut b = *board;
    collect(&mut b, ply, &mut |b: &Board| (b.own | b.opp, 0), &mut seen);
    seen.len() as u64
}

fn collect<F>(board: &mut Board, ply: u32, project: &mut F, seen: &mut HashSet<(u64, u64)>)
where
    F: FnMut(&Board) -> (u64, u64),
{
    if ply == 0 {
        seen.insert(project(board));
        return;
    }
    if !board.has_moves() {
        if board.is_game_over() {
            seen.insert(project(board));
            return;
        }
        let mut passed = board.pass();
        collect(&mut passed, ply - 1, project, seen);
        return;
    }
    for mv in board.moves() {
        board.make(mv);
        collect(board, ply - 1, project, seen);
        board.undo(mv);
    }
}
