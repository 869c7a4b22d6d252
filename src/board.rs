// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::{
    convert::TryFrom,
    fmt::{self, Write},
};

use thiserror::Error;

use crate::core::{self, Color, File, Piece, Square, SquareSet, SS_DARK_SQUARES};

/// Possible errors that can arise when parsing a board diagram into a `Board`.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum DiagramParseError {
    #[error("unexpected char: {0}")]
    UnexpectedChar(char),
    #[error("unexpected EOF while reading")]
    UnexpectedEnd,
    #[error("invalid digit")]
    InvalidDigit,
    #[error("file does not sum to 8")]
    FileDoesNotSumToEight,
    #[error("unknown piece: {0}")]
    UnknownPiece(char),
    #[error("piece on light square: {0}")]
    LightSquare(Square),
    #[error("invalid side to move")]
    InvalidSideToMove,
}

/// The board: an 8x8 grid of squares, each empty or holding one man. Occupancy is stored as one SquareSet per
/// color; the two sets are disjoint by construction, and every occupied square is dark.
///
/// The board is the single source of truth for occupancy. The only mutators are `add_piece` and
/// `remove_piece`, which the move executor drives; a failure from either indicates a defect in move
/// generation, not a user error, and the executor treats it as fatal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    sets_by_color: [SquareSet; 2],
}

impl Board {
    pub fn empty() -> Board {
        Board {
            sets_by_color: [SquareSet::empty(); 2],
        }
    }

    /// The set of squares occupied by men of the given color.
    pub fn pieces(&self, color: Color) -> SquareSet {
        self.sets_by_color[color as usize]
    }

    /// The set of all occupied squares.
    pub fn occupied(&self) -> SquareSet {
        self.pieces(Color::White) | self.pieces(Color::Black)
    }

    /// The number of men of the given color remaining on the board. Counts only ever decrease over the life
    /// of a game.
    pub fn count(&self, color: Color) -> u32 {
        self.pieces(color).len()
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        for color in core::colors() {
            if self.sets_by_color[color as usize].contains(square) {
                return Some(Piece { color, square });
            }
        }

        None
    }

    pub fn is_empty(&self, square: Square) -> bool {
        !self.occupied().contains(square)
    }

    /// Places a piece on the board. It is an error to place a piece on an occupied square or on a light
    /// square.
    pub fn add_piece(&mut self, piece: Piece) -> Result<(), ()> {
        if self.piece_at(piece.square).is_some() {
            return Err(());
        }
        if !SS_DARK_SQUARES.contains(piece.square) {
            return Err(());
        }

        self.sets_by_color[piece.color as usize].insert(piece.square);
        Ok(())
    }

    /// Removes the piece standing on the given square and returns it. It is an error to remove from an empty
    /// square.
    pub fn remove_piece(&mut self, square: Square) -> Result<Piece, ()> {
        let piece = if let Some(piece) = self.piece_at(square) {
            piece
        } else {
            return Err(());
        };

        self.sets_by_color[piece.color as usize].remove(square);
        Ok(piece)
    }
}

//
// Diagram parsing and generation.
//
// A diagram is a FEN-shaped notation for checkers boards: eight rank strings from rank 8 down to rank 1,
// separated by slashes, where `w` and `b` are men and digits are runs of empty squares. `Board::from_diagram`
// reads the placement field only; the session-level diagram appends the side to move.
//

impl Board {
    /// Constructs a new board from the placement field of a diagram.
    pub fn from_diagram(diagram: impl AsRef<str>) -> Result<Board, DiagramParseError> {
        use std::{iter::Peekable, str::Chars};

        type Stream<'a> = Peekable<Chars<'a>>;

        fn eat(iter: &mut Stream<'_>, expected: char) -> Result<(), DiagramParseError> {
            match iter.next() {
                Some(c) if c == expected => Ok(()),
                Some(c) => Err(DiagramParseError::UnexpectedChar(c)),
                None => Err(DiagramParseError::UnexpectedEnd),
            }
        }

        fn advance(iter: &mut Stream<'_>) -> Result<(), DiagramParseError> {
            let _ = iter.next();
            Ok(())
        }

        fn peek(iter: &mut Stream<'_>) -> Result<char, DiagramParseError> {
            if let Some(c) = iter.peek() {
                Ok(*c)
            } else {
                Err(DiagramParseError::UnexpectedEnd)
            }
        }

        let mut board = Board::empty();
        let str_ref = diagram.as_ref();
        let iter = &mut str_ref.chars().peekable();
        for rank in core::ranks().rev() {
            let mut file = 0;
            while file <= 7 {
                let c = peek(iter)?;
                // digits 1 through 8 indicate empty squares.
                if c.is_digit(10) {
                    if c < '1' || c > '8' {
                        return Err(DiagramParseError::InvalidDigit);
                    }

                    let value = c as usize - 48;
                    file += value;
                    if file > 8 {
                        return Err(DiagramParseError::FileDoesNotSumToEight);
                    }

                    advance(iter)?;
                    continue;
                }

                // if it's not a digit, it represents a man.
                let color = if let Ok(color) = Color::try_from(c) {
                    color
                } else {
                    return Err(DiagramParseError::UnknownPiece(c));
                };

                let square = Square::of(rank, File::try_from(file as u8).unwrap());
                if !SS_DARK_SQUARES.contains(square) {
                    return Err(DiagramParseError::LightSquare(square));
                }

                board
                    .add_piece(Piece { color, square })
                    .expect("diagram double-add piece?");
                advance(iter)?;
                file += 1;
            }

            if rank != core::RANK_1 {
                eat(iter, '/')?;
            }
        }

        Ok(board)
    }

    /// Produces the placement field of a diagram for this board.
    pub fn as_diagram(&self) -> String {
        let mut buf = String::new();
        for rank in core::ranks().rev() {
            let mut empty_squares = 0;
            for file in core::files() {
                let square = Square::of(rank, file);
                if let Some(piece) = self.piece_at(square) {
                    if empty_squares != 0 {
                        write!(&mut buf, "{}", empty_squares).unwrap();
                    }
                    write!(&mut buf, "{}", piece).unwrap();
                    empty_squares = 0;
                } else {
                    empty_squares += 1;
                }
            }

            if empty_squares != 0 {
                write!(&mut buf, "{}", empty_squares).unwrap();
            }

            if rank != core::RANK_1 {
                buf.push('/');
            }
        }

        buf
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for rank in core::ranks().rev() {
            for file in core::files() {
                let sq = Square::of(rank, file);
                if let Some(piece) = self.piece_at(sq) {
                    write!(f, " {} ", piece)?;
                } else {
                    write!(f, " . ")?;
                }
            }

            writeln!(f, "| {}", rank)?;
        }

        for _ in core::files() {
            write!(f, "---")?;
        }

        writeln!(f)?;
        for file in core::files() {
            write!(f, " {} ", file)?;
        }

        writeln!(f)?;
        Ok(())
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::empty()
    }
}

#[cfg(test)]
mod tests {
    mod diagram {
        use crate::{
            board::{Board, DiagramParseError},
            core::*,
        };

        #[test]
        fn diagram_smoke() {
            let board = Board::from_diagram("8/8/8/8/8/8/8/8").unwrap();
            assert_eq!(0, board.count(Color::White));
            assert_eq!(0, board.count(Color::Black));
        }

        #[test]
        fn single_piece() {
            let board = Board::from_diagram("8/8/8/8/8/2w5/8/8").unwrap();
            let piece = board.piece_at(C3).unwrap();
            assert_eq!(Color::White, piece.color);
            assert_eq!(C3, piece.square);
            assert_eq!(1, board.count(Color::White));
        }

        #[test]
        fn empty() {
            let err = Board::from_diagram("").unwrap_err();
            assert_eq!(DiagramParseError::UnexpectedEnd, err);
        }

        #[test]
        fn unknown_piece() {
            let err = Board::from_diagram("1z6/8/8/8/8/8/8/8").unwrap_err();
            assert_eq!(DiagramParseError::UnknownPiece('z'), err);
        }

        #[test]
        fn invalid_digit() {
            let err = Board::from_diagram("9/8/8/8/8/8/8/8").unwrap_err();
            assert_eq!(DiagramParseError::InvalidDigit, err);
        }

        #[test]
        fn not_sum_to_8() {
            let err = Board::from_diagram("45/8/8/8/8/8/8/8").unwrap_err();
            assert_eq!(DiagramParseError::FileDoesNotSumToEight, err);
        }

        #[test]
        fn light_square() {
            // a8 has rank + file odd; no man may stand there.
            let err = Board::from_diagram("w7/8/8/8/8/8/8/8").unwrap_err();
            assert_eq!(DiagramParseError::LightSquare(A8), err);
        }

        #[test]
        fn placement_roundtrip() {
            let str = "1b1b1b1b/b1b1b1b1/1b1b1b1b/8/8/w1w1w1w1/1w1w1w1w/w1w1w1w1";
            let board = Board::from_diagram(str).unwrap();
            assert_eq!(board.as_diagram(), str);
        }
    }

    mod mutation {
        use crate::{board::Board, core::*};

        #[test]
        fn add_remove() {
            let mut board = Board::empty();
            board
                .add_piece(Piece {
                    color: Color::White,
                    square: C3,
                })
                .unwrap();
            assert!(!board.is_empty(C3));

            let piece = board.remove_piece(C3).unwrap();
            assert_eq!(Color::White, piece.color);
            assert!(board.is_empty(C3));
        }

        #[test]
        fn add_occupied() {
            let mut board = Board::empty();
            board
                .add_piece(Piece {
                    color: Color::White,
                    square: C3,
                })
                .unwrap();
            let result = board.add_piece(Piece {
                color: Color::Black,
                square: C3,
            });
            assert!(result.is_err());
        }

        #[test]
        fn add_light_square() {
            let mut board = Board::empty();
            let result = board.add_piece(Piece {
                color: Color::White,
                square: D3,
            });
            assert!(result.is_err());
        }

        #[test]
        fn remove_empty() {
            let mut board = Board::empty();
            assert!(board.remove_piece(C3).is_err());
        }
    }
}
