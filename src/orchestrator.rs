//! Turn-taking between two proposers.
//!
//! Each turn the active proposer gets a rendered board and its mark, the
//! reply goes through the [`MoveExtractor`], and the rules engine either
//! applies the move or the turn is forfeited. Proposers alternate on a
//! local turn counter whether or not a move was applied. A forfeit leaves
//! the game untouched, so the engine's `current_player` does not advance
//! with the seats, and the next applied move places the engine's mark,
//! whichever seat proposed it. The match ends
//! when the game is over; the winner (or X, on a draw) then sends one
//! closing notification to the other proposer.

use crate::error::{MatchError, ProposerError};
use crate::notify::{Notification, Notifier};
use crate::prompt;
use crate::proposers::{Proposer, TurnRequest};
use crate::session::SessionId;
use a2a_tictactoe::{
    BoardState, ExtractionSource, Game, Mark, MoveError, MoveExtractor, Outcome, Position,
};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// Marks in seat order: seat 0 plays X, seat 1 plays O.
const SEATS: [Mark; 2] = [Mark::X, Mark::O];

/// Default cap on turns, forfeits included.
pub const DEFAULT_MAX_TURNS: usize = 64;

/// Why a turn was consumed without a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
pub enum ForfeitReason {
    /// The reply named a cell that is already marked.
    #[display("cell {} is occupied", _0)]
    Occupied(Position),
    /// No empty cell was left to play.
    #[display("no legal move available")]
    NoLegalMove,
    /// The proposer did not answer in time.
    #[display("proposer timed out")]
    TimedOut,
}

/// What happened on one turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnResult {
    /// A mark was placed.
    Applied {
        /// Where the mark went.
        position: Position,
        /// Mark the engine placed; differs from the seat's after a forfeit.
        mark: Mark,
        /// How the position was read from the reply.
        source: ExtractionSource,
    },
    /// The turn passed without a move.
    Forfeited(ForfeitReason),
}

/// One entry of the match transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    /// 1-based turn number.
    pub turn: usize,
    /// Name of the proposer that played.
    pub proposer: String,
    /// Mark of the seat that was asked.
    pub mark: Mark,
    /// Raw reply, absent on timeout.
    pub reply: Option<String>,
    /// What the engine did with it.
    pub result: TurnResult,
}

/// Summary of a finished match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchReport {
    /// Correlation id of the match.
    pub session_id: SessionId,
    /// Name of the proposer playing X.
    pub player_x: String,
    /// Name of the proposer playing O.
    pub player_o: String,
    /// Win or draw.
    pub outcome: Outcome,
    /// Final game snapshot.
    pub final_state: BoardState,
    /// Every turn, forfeits included.
    pub turns: Vec<TurnRecord>,
}

impl MatchReport {
    /// Name of the winning proposer, if any.
    pub fn winner_name(&self) -> Option<&str> {
        match self.outcome {
            Outcome::Winner(Mark::X) => Some(&self.player_x),
            Outcome::Winner(Mark::O) => Some(&self.player_o),
            Outcome::Draw => None,
        }
    }

    /// Number of turns that ended in a forfeit.
    pub fn forfeits(&self) -> usize {
        self.turns
            .iter()
            .filter(|t| matches!(t.result, TurnResult::Forfeited(_)))
            .count()
    }
}

/// Progress events for whoever renders the match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchEvent {
    /// A match began.
    MatchStarted {
        /// Correlation id.
        session_id: SessionId,
        /// Proposer playing X.
        player_x: String,
        /// Proposer playing O.
        player_o: String,
    },
    /// A proposer is about to be asked for a move.
    TurnStarted {
        /// 1-based turn number.
        turn: usize,
        /// Active proposer.
        proposer: String,
        /// Its mark.
        mark: Mark,
        /// Rendered board before the move.
        board: String,
    },
    /// A mark was placed.
    MoveApplied {
        /// 1-based turn number.
        turn: usize,
        /// Active proposer.
        proposer: String,
        /// Mark the engine placed.
        mark: Mark,
        /// Where it went.
        position: Position,
    },
    /// A turn passed without a move.
    TurnForfeited {
        /// 1-based turn number.
        turn: usize,
        /// Active proposer.
        proposer: String,
        /// Its mark.
        mark: Mark,
        /// Why.
        reason: ForfeitReason,
    },
    /// The game is over.
    MatchFinished {
        /// Win or draw.
        outcome: Outcome,
        /// Winning proposer, if any.
        winner: Option<String>,
        /// Rendered final board.
        board: String,
    },
}

/// Limits applied to every match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSettings {
    /// Abort the match after this many turns.
    pub max_turns: usize,
    /// Forfeit a turn whose proposer takes longer than this.
    pub turn_timeout: Option<Duration>,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            max_turns: DEFAULT_MAX_TURNS,
            turn_timeout: None,
        }
    }
}

/// Runs matches between two proposers.
pub struct Orchestrator<R = StdRng> {
    seats: [Box<dyn Proposer>; 2],
    extractor: MoveExtractor<R>,
    notifier: Notifier,
    events: Option<mpsc::UnboundedSender<MatchEvent>>,
    settings: MatchSettings,
}

impl<R: rand::Rng + Send> Orchestrator<R> {
    /// Creates an orchestrator; `player_x` moves first.
    pub fn new(
        player_x: Box<dyn Proposer>,
        player_o: Box<dyn Proposer>,
        extractor: MoveExtractor<R>,
        notifier: Notifier,
    ) -> Self {
        info!(player_x = player_x.name(), player_o = player_o.name(), "Creating orchestrator");
        Self {
            seats: [player_x, player_o],
            extractor,
            notifier,
            events: None,
            settings: MatchSettings::default(),
        }
    }

    /// Sends progress events to `tx`.
    pub fn with_events(mut self, tx: mpsc::UnboundedSender<MatchEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    /// Replaces the match limits.
    pub fn with_settings(mut self, settings: MatchSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Plays one match to completion on a fresh board.
    ///
    /// # Errors
    ///
    /// A failing proposer ends the match with [`MatchError::Proposer`]; it is
    /// not retried. Running past `max_turns` yields [`MatchError::TurnLimit`].
    #[instrument(skip(self, session_id), fields(session_id = %session_id))]
    pub async fn run_match(&mut self, session_id: SessionId) -> Result<MatchReport, MatchError> {
        info!("Starting match");
        let mut game = Game::new();
        let mut turns = Vec::new();
        let mut seat = 0;

        self.emit(MatchEvent::MatchStarted {
            session_id: session_id.clone(),
            player_x: self.seats[0].name().to_string(),
            player_o: self.seats[1].name().to_string(),
        });

        let outcome = loop {
            if let Some(outcome) = game.outcome() {
                break outcome;
            }
            if turns.len() >= self.settings.max_turns {
                warn!(max_turns = self.settings.max_turns, "Turn limit reached");
                return Err(MatchError::TurnLimit(self.settings.max_turns));
            }

            let turn = turns.len() + 1;
            let mark = SEATS[seat];
            let proposer = self.seats[seat].name().to_string();

            self.emit(MatchEvent::TurnStarted {
                turn,
                proposer: proposer.clone(),
                mark,
                board: game.board().to_string(),
            });

            let request = TurnRequest {
                session_id: session_id.clone(),
                mark,
                board: game.board_state(),
                message: prompt::turn_message(game.board(), mark),
            };

            let reply = self.ask(seat, &request).await.map_err(|source| {
                warn!(%proposer, error = %source, "Proposer failed, aborting match");
                MatchError::Proposer {
                    proposer: proposer.clone(),
                    source,
                }
            })?;

            let result = match &reply {
                None => TurnResult::Forfeited(ForfeitReason::TimedOut),
                Some(raw) => self.play_reply(&mut game, raw)?,
            };

            match result {
                TurnResult::Applied {
                    position,
                    mark: placed,
                    source,
                } => {
                    info!(
                        turn,
                        %proposer,
                        seat_mark = %mark,
                        %placed,
                        position = position.to_index(),
                        %source,
                        "Move applied"
                    );
                    self.emit(MatchEvent::MoveApplied {
                        turn,
                        proposer: proposer.clone(),
                        mark: placed,
                        position,
                    });
                }
                TurnResult::Forfeited(reason) => {
                    info!(
                        turn,
                        %proposer,
                        %mark,
                        %reason,
                        engine_turn = %game.current_player(),
                        "Turn forfeited"
                    );
                    self.emit(MatchEvent::TurnForfeited {
                        turn,
                        proposer: proposer.clone(),
                        mark,
                        reason,
                    });
                }
            }

            turns.push(TurnRecord {
                turn,
                proposer,
                mark,
                reply,
                result,
            });
            seat ^= 1;
        };

        let report = MatchReport {
            session_id,
            player_x: self.seats[0].name().to_string(),
            player_o: self.seats[1].name().to_string(),
            outcome,
            final_state: game.board_state(),
            turns,
        };
        info!(%outcome, turns = report.turns.len(), forfeits = report.forfeits(), "Match finished");

        self.emit(MatchEvent::MatchFinished {
            outcome,
            winner: report.winner_name().map(str::to_string),
            board: game.board().to_string(),
        });
        self.notify_outcome(&report);

        Ok(report)
    }

    /// Asks the proposer in `seat`; `Ok(None)` means it timed out.
    async fn ask(
        &mut self,
        seat: usize,
        request: &TurnRequest,
    ) -> Result<Option<String>, ProposerError> {
        let proposer = &mut self.seats[seat];
        let Some(limit) = self.settings.turn_timeout else {
            return proposer.propose_move(request).await.map(Some);
        };
        let answered = tokio::time::timeout(limit, proposer.propose_move(request)).await;
        match answered {
            Ok(reply) => reply.map(Some),
            Err(_) => {
                warn!(proposer = proposer.name(), ?limit, "Proposer timed out");
                Ok(None)
            }
        }
    }

    /// Extracts a position from `raw` and applies it if legal.
    ///
    /// The extractor only yields positions on the board, so an out-of-range
    /// rejection, like a move on a finished game, is a bookkeeping fault.
    fn play_reply(&mut self, game: &mut Game, raw: &str) -> Result<TurnResult, MatchError> {
        let Some(extraction) = self.extractor.extract(raw, game.board()) else {
            return Ok(TurnResult::Forfeited(ForfeitReason::NoLegalMove));
        };

        match game.apply_move(extraction.position.to_index()) {
            Ok(applied) => Ok(TurnResult::Applied {
                position: applied.mv.position,
                mark: applied.mv.mark,
                source: extraction.source,
            }),
            Err(MoveError::Occupied(pos)) => {
                Ok(TurnResult::Forfeited(ForfeitReason::Occupied(pos)))
            }
            Err(e @ (MoveError::GameOver | MoveError::OutOfRange(_))) => Err(e.into()),
        }
    }

    /// Sends the one closing notification: winner to loser, or X to O on a draw.
    fn notify_outcome(&self, report: &MatchReport) {
        let from = match report.outcome {
            Outcome::Winner(Mark::O) => 1,
            Outcome::Winner(Mark::X) | Outcome::Draw => 0,
        };
        self.notifier.send(Notification::new(
            report.session_id.clone(),
            self.seats[from].name().to_string(),
            self.seats[from ^ 1].name().to_string(),
            prompt::closing_message(report.outcome),
        ));
    }

    fn emit(&self, event: MatchEvent) {
        if let Some(tx) = &self.events
            && tx.send(event).is_err()
        {
            debug!("Event receiver dropped");
        }
    }
}
