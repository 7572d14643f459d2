//! Deterministic proposers for demos and tests.

use super::{Proposer, TurnRequest};
use crate::error::ProposerError;
use a2a_tictactoe::Position;
use std::collections::VecDeque;
use tracing::{debug, instrument};

/// Picks the first empty cell, scanning from 0.
pub struct LowestEmpty {
    name: String,
}

impl LowestEmpty {
    /// Creates a lowest-empty proposer.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait::async_trait]
impl Proposer for LowestEmpty {
    #[instrument(skip(self, request), fields(proposer = %self.name))]
    async fn propose_move(&mut self, request: &TurnRequest) -> Result<String, ProposerError> {
        let pos = Position::empty_cells(&request.board.board())
            .first()
            .copied()
            .ok_or_else(|| ProposerError::new("No empty cell to propose"))?;
        debug!(position = pos.to_index(), "Lowest empty cell");
        Ok(pos.to_index().to_string())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Picks the last empty cell, scanning from 8.
pub struct HighestEmpty {
    name: String,
}

impl HighestEmpty {
    /// Creates a highest-empty proposer.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait::async_trait]
impl Proposer for HighestEmpty {
    #[instrument(skip(self, request), fields(proposer = %self.name))]
    async fn propose_move(&mut self, request: &TurnRequest) -> Result<String, ProposerError> {
        let pos = Position::empty_cells(&request.board.board())
            .last()
            .copied()
            .ok_or_else(|| ProposerError::new("No empty cell to propose"))?;
        debug!(position = pos.to_index(), "Highest empty cell");
        Ok(pos.to_index().to_string())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Replays a fixed list of replies, then fails.
pub struct Scripted {
    name: String,
    replies: VecDeque<String>,
}

impl Scripted {
    /// Creates a proposer that answers with `replies` in order.
    pub fn new(name: impl Into<String>, replies: impl IntoIterator<Item = String>) -> Self {
        Self {
            name: name.into(),
            replies: replies.into_iter().collect(),
        }
    }
}

#[async_trait::async_trait]
impl Proposer for Scripted {
    #[instrument(
        skip(self, _request),
        fields(proposer = %self.name, remaining = self.replies.len())
    )]
    async fn propose_move(&mut self, _request: &TurnRequest) -> Result<String, ProposerError> {
        self.replies
            .pop_front()
            .ok_or_else(|| ProposerError::new(format!("{} has no replies left", self.name)))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionId;
    use a2a_tictactoe::{Game, Mark};

    fn request(game: &Game) -> TurnRequest {
        TurnRequest {
            session_id: SessionId::new("test"),
            mark: game.current_player(),
            board: game.board_state(),
            message: String::new(),
        }
    }

    #[tokio::test]
    async fn test_lowest_and_highest() {
        let mut game = Game::new();
        game.apply_move(0).unwrap();
        game.apply_move(8).unwrap();

        let mut low = LowestEmpty::new("low");
        let mut high = HighestEmpty::new("high");
        assert_eq!(low.propose_move(&request(&game)).await.unwrap(), "1");
        assert_eq!(high.propose_move(&request(&game)).await.unwrap(), "7");
    }

    #[tokio::test]
    async fn test_full_board_is_an_error() {
        use a2a_tictactoe::Cell;
        let game = Game::from_cells([Cell::Marked(Mark::X); 9], Mark::O);
        let mut low = LowestEmpty::new("low");
        assert!(low.propose_move(&request(&game)).await.is_err());
    }

    #[tokio::test]
    async fn test_scripted_replays_then_fails() {
        let game = Game::new();
        let mut scripted = Scripted::new("s", vec!["first".to_string(), "second".to_string()]);
        assert_eq!(scripted.propose_move(&request(&game)).await.unwrap(), "first");
        assert_eq!(scripted.propose_move(&request(&game)).await.unwrap(), "second");
        assert!(scripted.propose_move(&request(&game)).await.is_err());
    }
}
