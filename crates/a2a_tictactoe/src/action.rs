//! Move types for tic-tac-toe.
//!
//! A move records which mark was placed where. Rejections carry enough
//! detail for the caller to log why a turn was lost.

use super::{Mark, Position};
use serde::{Deserialize, Serialize};

/// An accepted move: a mark placed at a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// The mark that was placed.
    pub mark: Mark,
    /// Where it was placed.
    pub position: Position,
}

impl Move {
    /// Creates a new move.
    pub fn new(mark: Mark, position: Position) -> Self {
        Self { mark, position }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.mark, self.position)
    }
}

/// Result of a successful `apply_move`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Applied {
    /// The move that was applied.
    pub mv: Move,
    /// Whether this move ended the game.
    pub is_over: bool,
    /// Winner, if this move completed a line.
    pub winner: Option<Mark>,
}

/// Reason a move was rejected. A rejected move never mutates the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum MoveError {
    /// The game is already over.
    #[display("Game is already over")]
    GameOver,

    /// Index outside 0-8.
    #[display("Position {} is out of range (must be 0-8)", _0)]
    OutOfRange(#[error(not(source))] usize),

    /// The cell at the position is already marked.
    #[display("Cell {} is already occupied", _0)]
    Occupied(#[error(not(source))] Position),
}
