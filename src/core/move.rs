// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::core::Square;
use std::fmt;

const SOURCE_MASK: u16 = 0xFC00;
const DESTINATION_MASK: u16 = 0x03F0;
const JUMP_BIT: u16 = 0x0004;

/// A move, recognized by the shashki engine. It is designed to be as compact as possible.
///
/// ## Encoding
/// The encoding of a move is done via this breakdown:
///
///  * 6 bits - source square
///  * 6 bits - destination square
///  * 1 bit  - jump bit
///
/// Checkers has only two kinds of moves: a simple diagonal advance onto an adjacent empty square, and a jump
/// over an adjacent enemy onto the empty square beyond it. The jump bit distinguishes the two; a jump implies
/// a capture of the piece standing on the midpoint square.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Move(u16);

impl Move {
    /// Constructs a new simple advance from the source square to the destination square.
    pub fn advance(source: Square, dest: Square) -> Move {
        let source_bits = (source.0 as u16) << 10;
        let dest_bits = (dest.0 as u16) << 4;
        Move(source_bits | dest_bits)
    }

    /// Constructs a new jump from the source square to the destination square, capturing the piece between
    /// them.
    pub fn jump(source: Square, dest: Square) -> Move {
        let mut mov = Move::advance(source, dest);
        mov.0 |= JUMP_BIT;
        mov
    }

    /// Returns the source square of this move.
    pub fn source(self) -> Square {
        Square(((self.0 & SOURCE_MASK) >> 10) as u8)
    }

    /// Returns the destination square of this move.
    pub fn destination(self) -> Square {
        Square(((self.0 & DESTINATION_MASK) >> 4) as u8)
    }

    /// Returns whether or not this move is a jump.
    pub fn is_jump(self) -> bool {
        (self.0 & JUMP_BIT) != 0
    }

    /// Returns the square of the piece captured by this jump: the arithmetic midpoint of the source and
    /// destination squares. The endpoints of a jump always differ by an even square index, so the midpoint is
    /// exact.
    pub fn captured_square(self) -> Square {
        debug_assert!(self.is_jump());
        Square((self.source().0 + self.destination().0) / 2)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        let sep = if self.is_jump() { 'x' } else { '-' };
        write!(f, "{}{}{}", self.source(), sep, self.destination())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{} (0x{:x})", self, self.0)
    }
}
