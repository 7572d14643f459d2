//! An unreliable proposer that names cells without looking at the board.

use super::{Proposer, TurnRequest};
use crate::error::ProposerError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, instrument};

/// Names a random cell 0-8, and now and then nothing at all.
///
/// Useful for exercising forfeits and the extractor's fallback.
pub struct Noisy {
    name: String,
    rng: StdRng,
}

impl Noisy {
    /// Creates a noisy proposer with a fixed seed.
    pub fn seeded(name: impl Into<String>, seed: u64) -> Self {
        Self {
            name: name.into(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Creates a noisy proposer seeded from the operating system.
    pub fn from_entropy(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rng: StdRng::from_os_rng(),
        }
    }
}

#[async_trait::async_trait]
impl Proposer for Noisy {
    #[instrument(skip(self, _request), fields(proposer = %self.name))]
    async fn propose_move(&mut self, _request: &TurnRequest) -> Result<String, ProposerError> {
        if self.rng.random_bool(0.2) {
            debug!("Rambling instead of answering");
            return Ok("Hard to say, every square looks good to me.".to_string());
        }
        let cell: usize = self.rng.random_range(0..9);
        debug!(cell, "Blurting a cell");
        Ok(format!("Maybe {cell}?"))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionId;
    use a2a_tictactoe::Game;

    #[tokio::test]
    async fn test_same_seed_same_replies() {
        let game = Game::new();
        let request = TurnRequest {
            session_id: SessionId::new("test"),
            mark: game.current_player(),
            board: game.board_state(),
            message: String::new(),
        };
        let mut a = Noisy::seeded("a", 3);
        let mut b = Noisy::seeded("b", 3);
        for _ in 0..10 {
            assert_eq!(
                a.propose_move(&request).await.unwrap(),
                b.propose_move(&request).await.unwrap()
            );
        }
    }
}
