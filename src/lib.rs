// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The `shashki` checkers engine and library, at your service!
//!
//! `shashki` implements the rules of two-player checkers (draughts) on an 8x8 board: move generation with
//! mandatory captures and multi-jump chains, turn and selection tracking, and win detection. As a library,
//! `shashki` manipulates boards and game sessions directly; as an executable, it serves a line-oriented
//! protocol that a rendering front-end can drive with coordinate-level intents.

pub mod board;
pub mod core;
pub mod game;
pub mod movegen;
pub mod protocol;

pub use board::{Board, DiagramParseError};
pub use game::{GameSession, MoveOutcome, SelectOutcome, Snapshot, START_DIAGRAM};
