//! Rule-based personas: a careful strategist and an all-out attacker.

use super::{Proposer, TurnRequest};
use crate::error::ProposerError;
use a2a_tictactoe::rules::LINES;
use a2a_tictactoe::{Board, Cell, Mark, Position};
use tracing::{debug, instrument};

/// Empty cell that would complete a line for `mark`, first in line order.
fn completing_move(board: &Board, mark: Mark) -> Option<Position> {
    LINES.iter().find_map(|line| {
        let own = line.iter().filter(|p| board.get(**p) == Cell::Marked(mark)).count();
        let empty: Vec<_> = line.iter().copied().filter(|p| board.is_empty(*p)).collect();
        (own == 2 && empty.len() == 1).then(|| empty[0])
    })
}

/// Empty cell in a line that `mark` has started and the opponent has not touched.
fn building_move(board: &Board, mark: Mark) -> Option<Position> {
    LINES.iter().find_map(|line| {
        let blocked = line
            .iter()
            .any(|p| board.get(*p) == Cell::Marked(mark.opponent()));
        let started = line.iter().any(|p| board.get(*p) == Cell::Marked(mark));
        if blocked || !started {
            return None;
        }
        line.iter().copied().find(|p| board.is_empty(*p))
    })
}

fn center(board: &Board) -> Option<Position> {
    board.is_empty(Position::Center).then_some(Position::Center)
}

fn corner(board: &Board) -> Option<Position> {
    Position::CORNERS.iter().copied().find(|p| board.is_empty(*p))
}

fn any_empty(board: &Board) -> Option<Position> {
    Position::empty_cells(board).first().copied()
}

/// Careful persona: win, block, centre, corners, anything.
pub struct Strategist {
    name: String,
}

impl Strategist {
    /// Creates a strategist.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Chooses a move for `mark` on `board`.
    pub fn choose(board: &Board, mark: Mark) -> Option<Position> {
        completing_move(board, mark)
            .or_else(|| completing_move(board, mark.opponent()))
            .or_else(|| center(board))
            .or_else(|| corner(board))
            .or_else(|| any_empty(board))
    }
}

#[async_trait::async_trait]
impl Proposer for Strategist {
    #[instrument(skip(self, request), fields(proposer = %self.name, mark = %request.mark))]
    async fn propose_move(&mut self, request: &TurnRequest) -> Result<String, ProposerError> {
        let pos = Self::choose(&request.board.board(), request.mark)
            .ok_or_else(|| ProposerError::new("No empty cell to propose"))?;
        debug!(position = pos.to_index(), "Strategist chose");
        Ok(pos.to_index().to_string())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Attacking persona: win, centre, corners, extend own lines. Never blocks.
pub struct Aggressive {
    name: String,
}

impl Aggressive {
    /// Creates an aggressive persona.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Chooses a move for `mark` on `board`.
    pub fn choose(board: &Board, mark: Mark) -> Option<Position> {
        completing_move(board, mark)
            .or_else(|| center(board))
            .or_else(|| corner(board))
            .or_else(|| building_move(board, mark))
            .or_else(|| any_empty(board))
    }
}

#[async_trait::async_trait]
impl Proposer for Aggressive {
    #[instrument(skip(self, request), fields(proposer = %self.name, mark = %request.mark))]
    async fn propose_move(&mut self, request: &TurnRequest) -> Result<String, ProposerError> {
        let pos = Self::choose(&request.board.board(), request.mark)
            .ok_or_else(|| ProposerError::new("No empty cell to propose"))?;
        debug!(position = pos.to_index(), "Aggressive chose");
        Ok(format!("I'll take position {}!", pos.to_index()))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
