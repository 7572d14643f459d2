//! Error types for match orchestration.

use a2a_tictactoe::MoveError;
use derive_more::{Display, Error};
use tracing::instrument;

/// Failure of a move proposer: it raised, disconnected, or had nothing to say.
#[derive(Debug, Clone, Display, Error)]
#[display("Proposer error: {} at {}:{}", message, file, line)]
pub struct ProposerError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ProposerError {
    /// Creates a new proposer error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Errors that end a match early. The process survives and may start another.
#[derive(Debug, Clone, Display, Error)]
pub enum MatchError {
    /// A proposer failed; not retried.
    #[display("Proposer '{}' failed: {}", proposer, source)]
    Proposer {
        /// Name of the failing proposer.
        proposer: String,
        /// Underlying failure.
        source: ProposerError,
    },

    /// Too many turns without the game finishing.
    #[display("Match exceeded {} turns without finishing", _0)]
    TurnLimit(#[error(not(source))] usize),

    /// The rules engine rejected an operation the orchestrator considered legal.
    #[display("Rules engine rejected turn bookkeeping: {}", _0)]
    Rules(MoveError),
}

impl From<MoveError> for MatchError {
    fn from(err: MoveError) -> Self {
        Self::Rules(err)
    }
}
