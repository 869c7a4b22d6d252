// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Move generation for checkers men. All routines here are pure functions of the board: they work on
//! SquareSets shifted along the diagonals, so squares that would fall off an edge of the board simply drop
//! out of the sets and no bounds checks are needed on the hot path.
//!
//! Capturing is mandatory per piece: a piece that has a jump available may not make a simple advance. Chains
//! of jumps are realized by the executor re-invoking [`jump_moves`] after each landing, never by lookahead
//! here.

use crate::board::Board;
use crate::core::{self, Color, Direction, Move, Piece, SquareSet};

fn forward_directions(us: Color) -> [Direction; 2] {
    // Men advance strictly toward the far rank; only jumps may go backward.
    match us {
        Color::White => [Direction::NorthWest, Direction::NorthEast],
        Color::Black => [Direction::SouthWest, Direction::SouthEast],
    }
}

/// The set of squares the given piece may reach by a simple advance: the two forward diagonals, when empty.
pub fn simple_moves(board: &Board, piece: Piece) -> SquareSet {
    let empty = !board.occupied();
    let from = SquareSet::single(piece.square);
    let mut targets = SquareSet::empty();
    for dir in forward_directions(piece.color) {
        targets = targets.or(from.shift(dir).and(empty));
    }

    targets
}

/// The set of squares the given piece may reach by a single jump: in each of the four diagonal directions,
/// the adjacent square must hold an enemy man and the square beyond it must be empty.
pub fn jump_moves(board: &Board, piece: Piece) -> SquareSet {
    let empty = !board.occupied();
    let enemy = board.pieces(piece.color.toggle());
    let from = SquareSet::single(piece.square);
    let mut targets = SquareSet::empty();
    for dir in core::directions() {
        let over = from.shift(dir).and(enemy);
        targets = targets.or(over.shift(dir).and(empty));
    }

    targets
}

/// The destinations a piece may legally be moved to right now: its jumps if it has any, otherwise its simple
/// advances.
pub fn legal_destinations(board: &Board, piece: Piece) -> SquareSet {
    let jumps = jump_moves(board, piece);
    if jumps.is_empty() {
        simple_moves(board, piece)
    } else {
        jumps
    }
}

/// Generates every move available to the given side, honoring per-piece mandatory capture: pieces with jumps
/// contribute only their jumps, while pieces without jumps contribute their simple advances.
pub fn generate_moves(us: Color, board: &Board, moves: &mut Vec<Move>) {
    let empty = !board.occupied();
    let enemy = board.pieces(us.toggle());
    let ours = board.pieces(us);

    let mut jumpers = SquareSet::empty();
    for dir in core::directions() {
        let over = ours.shift(dir).and(enemy);
        for target in over.shift(dir).and(empty) {
            let source = target.towards(dir.reverse()).towards(dir.reverse());
            jumpers.insert(source);
            moves.push(Move::jump(source, target));
        }
    }

    let quiet_movers = ours.and(jumpers.not());
    for dir in forward_directions(us) {
        for target in quiet_movers.shift(dir).and(empty) {
            moves.push(Move::advance(target.towards(dir.reverse()), target));
        }
    }
}
