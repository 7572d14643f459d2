//! a2a_arena - agent-to-agent tic-tac-toe
//!
//! Two move proposers take turns on a shared board. Proposers answer in
//! free text; the arena extracts a position, lets the rules engine decide,
//! and forfeits the turn when the answer is unusable.
//!
//! # Architecture
//!
//! - **Engine** (`a2a_tictactoe`): board, rules, move extraction
//! - **Proposers**: pluggable move sources behind the [`Proposer`] trait
//! - **Orchestrator**: the turn loop, events and the closing notification
//! - **Config**: TOML file plus command-line overrides
//!
//! # Example
//!
//! ```no_run
//! use a2a_arena::{LowestEmpty, HighestEmpty, MoveExtractor, Notifier, Orchestrator, SessionId};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let (notifier, _inbox) = Notifier::channel();
//! let mut orchestrator = Orchestrator::new(
//!     Box::new(LowestEmpty::new("low")),
//!     Box::new(HighestEmpty::new("high")),
//!     MoveExtractor::seeded(7),
//!     notifier,
//! );
//! let report = orchestrator.run_match(SessionId::now()).await?;
//! println!("{}", report.outcome);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
pub mod console;
mod error;
mod notify;
mod orchestrator;
mod prompt;
mod proposers;
mod session;

// Crate-level exports - Configuration
pub use config::{ArenaConfig, MatchConfig, Overrides, PlayerConfig};

// Crate-level exports - Errors
pub use error::{ConfigError, MatchError, ProposerError};

// Crate-level exports - Notifications
pub use notify::{Notification, Notifier};

// Crate-level exports - Orchestration
pub use orchestrator::{
    DEFAULT_MAX_TURNS, ForfeitReason, MatchEvent, MatchReport, MatchSettings, Orchestrator,
    TurnRecord, TurnResult,
};

// Crate-level exports - Prompts
pub use prompt::{closing_message, turn_message};

// Crate-level exports - Proposers
pub use proposers::{
    Aggressive, HighestEmpty, LowestEmpty, Noisy, Proposer, ProposerKind, Scripted, Strategist,
    TurnRequest,
};

// Crate-level exports - Sessions
pub use session::SessionId;

// Crate-level exports - Game types
pub use a2a_tictactoe::{
    Board, BoardState, Cell, Extraction, ExtractionSource, Game, Mark, MoveError, MoveExtractor,
    Outcome, Position,
};
