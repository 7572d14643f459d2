//! Game engine for tic-tac-toe.

use super::action::{Applied, Move, MoveError};
use super::position::Position;
use super::rules;
use super::types::{Board, BoardState, Cell, Mark, Outcome};
use tracing::{debug, info, instrument};

/// Tic-tac-toe game: the grid plus turn and result bookkeeping.
///
/// [`Game::apply_move`] is the only mutator: a rejected move leaves the
/// game untouched, and once the game is over every move is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    board: Board,
    current_player: Mark,
    winner: Option<Mark>,
    is_over: bool,
    history: Vec<Position>,
}

impl Game {
    /// Creates a new game: empty board, X to move.
    #[instrument]
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            current_player: Mark::X,
            winner: None,
            is_over: false,
            history: Vec::new(),
        }
    }

    /// Creates a game from an arbitrary grid.
    ///
    /// Lines are not evaluated until [`Game::check_winner`] is called.
    pub fn from_cells(cells: [Cell; 9], current_player: Mark) -> Self {
        Self {
            board: Board::from_cells(cells),
            current_player,
            winner: None,
            is_over: false,
            history: Vec::new(),
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the mark whose turn it is.
    pub fn current_player(&self) -> Mark {
        self.current_player
    }

    /// Returns the winner, if any.
    pub fn winner(&self) -> Option<Mark> {
        self.winner
    }

    /// Whether a win or a draw has been detected.
    pub fn is_over(&self) -> bool {
        self.is_over
    }

    /// Positions of accepted moves, in play order.
    pub fn history(&self) -> &[Position] {
        &self.history
    }

    /// Result of a finished game, `None` while in progress.
    pub fn outcome(&self) -> Option<Outcome> {
        if !self.is_over {
            return None;
        }
        Some(match self.winner {
            Some(mark) => Outcome::Winner(mark),
            None => Outcome::Draw,
        })
    }

    /// Read-only snapshot of the game.
    pub fn board_state(&self) -> BoardState {
        BoardState {
            cells: *self.board.cells(),
            current_player: self.current_player,
            is_over: self.is_over,
            winner: self.winner,
        }
    }

    /// Places the current player's mark at `position` (0-8).
    ///
    /// The turn passes to the opponent only if the move did not end the
    /// game, so a finished game reports the last mover as `current_player`.
    ///
    /// # Errors
    ///
    /// Rejects the move, leaving the game untouched, when the game is over,
    /// the index is out of range, or the cell is occupied.
    #[instrument(skip(self), fields(player = %self.current_player))]
    pub fn apply_move(&mut self, position: usize) -> Result<Applied, MoveError> {
        if self.is_over {
            return Err(MoveError::GameOver);
        }

        let pos = Position::from_index(position).ok_or(MoveError::OutOfRange(position))?;

        if !self.board.is_empty(pos) {
            return Err(MoveError::Occupied(pos));
        }

        let mark = self.current_player;
        self.board.set(pos, Cell::Marked(mark));
        self.history.push(pos);
        self.check_winner();

        if !self.is_over {
            self.current_player = mark.opponent();
        }

        debug!(position = pos.to_index(), is_over = self.is_over, "Move applied");

        Ok(Applied {
            mv: Move::new(mark, pos),
            is_over: self.is_over,
            winner: self.winner,
        })
    }

    /// Scans the winning lines and records a win or a draw.
    ///
    /// Rows are checked first, then columns, then the two diagonals; the
    /// first complete line decides the winner. A full board with no line
    /// is a draw. Returns the winner, if any.
    #[instrument(skip(self))]
    pub fn check_winner(&mut self) -> Option<Mark> {
        if let Some(winner) = rules::check_winner(&self.board) {
            info!(%winner, "Line completed");
            self.winner = Some(winner);
            self.is_over = true;
        } else if rules::is_full(&self.board) {
            info!("Board full with no line, draw");
            self.is_over = true;
        }
        self.winner
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
