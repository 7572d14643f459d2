//! Tic-tac-toe rules engine for agent-to-agent matches.
//!
//! - [`Game`]: board, turn and result bookkeeping; the only mutator is
//!   [`Game::apply_move`].
//! - [`rules`]: pure win and draw detection.
//! - [`MoveExtractor`]: reads a position out of a free-text reply, falling
//!   back to a random empty cell.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod extract;
mod game;
mod position;
pub mod rules;
mod types;

pub use action::{Applied, Move, MoveError};
pub use extract::{Extraction, ExtractionSource, MoveExtractor};
pub use game::Game;
pub use position::Position;
pub use types::{Board, BoardState, Cell, Mark, Outcome};
