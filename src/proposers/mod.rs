//! Move proposers and the trait the orchestrator drives them through.
//!
//! A proposer only ever returns free text; turning that text into a
//! position is the extractor's job. None of the built-in proposers talk to
//! a model provider: they stand in for one with fixed rules.

mod noisy;
mod persona;
mod scripted;

pub use noisy::Noisy;
pub use persona::{Aggressive, Strategist};
pub use scripted::{HighestEmpty, LowestEmpty, Scripted};

use crate::error::ProposerError;
use crate::session::SessionId;
use a2a_tictactoe::{BoardState, Mark};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Everything a proposer is told when asked for a move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRequest {
    /// Session of the running match.
    pub session_id: SessionId,
    /// Mark the proposer plays this turn.
    pub mark: Mark,
    /// Snapshot of the game.
    pub board: BoardState,
    /// Rendered prompt: the board drawing plus the turn obligation.
    pub message: String,
}

/// Something that can propose moves as free text.
#[async_trait::async_trait]
pub trait Proposer: Send {
    /// Returns a reply naming the next move, in whatever words the proposer likes.
    async fn propose_move(&mut self, request: &TurnRequest) -> Result<String, ProposerError>;

    /// Returns the proposer's display name.
    fn name(&self) -> &str;
}

/// Built-in proposer kinds selectable from the CLI or a config file.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ProposerKind {
    /// Always the lowest-index empty cell.
    Lowest,
    /// Always the highest-index empty cell.
    Highest,
    /// Wins, blocks, then prefers centre and corners.
    Strategist,
    /// Wins and attacks; never blocks.
    Aggressive,
    /// Random cell, occupied or not.
    Noisy,
    /// Replays configured replies.
    Scripted,
}

impl ProposerKind {
    /// One-line description for listings.
    pub fn description(self) -> &'static str {
        match self {
            ProposerKind::Lowest => "replies with the lowest-index empty cell",
            ProposerKind::Highest => "replies with the highest-index empty cell",
            ProposerKind::Strategist => "wins if it can, blocks, then takes centre and corners",
            ProposerKind::Aggressive => "wins if it can, builds its own lines, never blocks",
            ProposerKind::Noisy => "names a random cell without checking if it is free",
            ProposerKind::Scripted => "replays the configured replies in order",
        }
    }

    /// Builds a proposer of this kind.
    ///
    /// `replies` is used only by [`ProposerKind::Scripted`]; `seed` only by
    /// [`ProposerKind::Noisy`].
    #[instrument(skip(name, replies), fields(proposer = %name))]
    pub fn build(self, name: String, replies: Vec<String>, seed: Option<u64>) -> Box<dyn Proposer> {
        match self {
            ProposerKind::Lowest => Box::new(LowestEmpty::new(name)),
            ProposerKind::Highest => Box::new(HighestEmpty::new(name)),
            ProposerKind::Strategist => Box::new(Strategist::new(name)),
            ProposerKind::Aggressive => Box::new(Aggressive::new(name)),
            ProposerKind::Noisy => Box::new(match seed {
                Some(seed) => Noisy::seeded(name, seed),
                None => Noisy::from_entropy(name),
            }),
            ProposerKind::Scripted => Box::new(Scripted::new(name, replies)),
        }
    }
}
