//! End-to-end matches between stub proposers.

use a2a_arena::{
    Cell, ExtractionSource, ForfeitReason, HighestEmpty, LowestEmpty, Mark, MatchError, MatchEvent,
    MatchReport, MatchSettings, MoveExtractor, Noisy, Notification, Notifier, Orchestrator,
    Outcome, Position, Proposer, ProposerError, Scripted, SessionId, TurnRequest, TurnResult,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

/// Always names the same cell.
struct Stubborn {
    name: String,
    reply: String,
}

#[async_trait::async_trait]
impl Proposer for Stubborn {
    async fn propose_move(&mut self, _request: &TurnRequest) -> Result<String, ProposerError> {
        Ok(self.reply.clone())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Never answers.
struct Silent;

#[async_trait::async_trait]
impl Proposer for Silent {
    async fn propose_move(&mut self, _request: &TurnRequest) -> Result<String, ProposerError> {
        std::future::pending().await
    }

    fn name(&self) -> &str {
        "silent"
    }
}

/// Plays the lowest empty cell and records `(seat mark, engine turn)` per request.
struct Recorder {
    seen: Arc<Mutex<Vec<(Mark, Mark)>>>,
}

#[async_trait::async_trait]
impl Proposer for Recorder {
    async fn propose_move(&mut self, request: &TurnRequest) -> Result<String, ProposerError> {
        self.seen
            .lock()
            .unwrap()
            .push((request.mark, request.board.current_player));
        let index = request
            .board
            .cells
            .iter()
            .position(|c| *c == Cell::Empty)
            .ok_or_else(|| ProposerError::new("board is full"))?;
        Ok(index.to_string())
    }

    fn name(&self) -> &str {
        "recorder"
    }
}

fn scripted(name: &str, replies: &[&str]) -> Box<dyn Proposer> {
    Box::new(Scripted::new(name, replies.iter().map(|r| r.to_string())))
}

async fn play(
    x: Box<dyn Proposer>,
    o: Box<dyn Proposer>,
    settings: MatchSettings,
) -> (Result<MatchReport, MatchError>, Vec<Notification>) {
    let (notifier, mut inbox) = Notifier::channel();
    let mut orchestrator =
        Orchestrator::new(x, o, MoveExtractor::seeded(17), notifier).with_settings(settings);
    let result = orchestrator.run_match(SessionId::new("test-session")).await;
    drop(orchestrator);

    let mut notifications = Vec::new();
    while let Some(n) = inbox.recv().await {
        notifications.push(n);
    }
    (result, notifications)
}

#[tokio::test]
async fn test_lowest_vs_highest_is_deterministic() {
    let mut finals = Vec::new();
    for _ in 0..2 {
        let (result, notifications) = play(
            Box::new(LowestEmpty::new("low")),
            Box::new(HighestEmpty::new("high")),
            MatchSettings::default(),
        )
        .await;
        let report = result.unwrap();

        assert!(report.turns.len() <= 9);
        assert_eq!(report.turns.len(), 5);
        assert_eq!(report.outcome, Outcome::Winner(Mark::X));
        assert_eq!(report.winner_name(), Some("low"));
        assert_eq!(report.forfeits(), 0);

        let x = Cell::Marked(Mark::X);
        let o = Cell::Marked(Mark::O);
        let e = Cell::Empty;
        assert_eq!(report.final_state.cells, [x, x, x, e, e, e, e, o, o]);
        assert!(report.final_state.is_over);

        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].from, "low");
        assert_eq!(notifications[0].to, "high");
        assert_eq!(notifications[0].message, "I won the game! Final result: X");
        assert_eq!(notifications[0].session_id, SessionId::new("test-session"));

        finals.push(report.final_state);
    }
    assert_eq!(finals[0], finals[1]);
}

#[tokio::test]
async fn test_forfeit_leaves_engine_turn_alone() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let (result, notifications) = play(
        scripted("repeater", &["4", "4", "7", "6", "8"]),
        Box::new(Recorder {
            seen: Arc::clone(&seen),
        }),
        MatchSettings::default(),
    )
    .await;
    let report = result.unwrap();

    // X: 4, O: 0, X: 4 (lost), then the engine still expects X, so the O
    // seat's 1 places an X and the marks stay one step out of phase.
    assert_eq!(report.turns.len(), 9);
    assert_eq!(report.forfeits(), 1);
    assert_eq!(
        report.turns[2].result,
        TurnResult::Forfeited(ForfeitReason::Occupied(Position::Center))
    );
    assert_eq!(report.turns[3].mark, Mark::O);
    assert_eq!(
        report.turns[3].result,
        TurnResult::Applied {
            position: Position::TopCenter,
            mark: Mark::X,
            source: ExtractionSource::Token,
        }
    );

    let requests = seen.lock().unwrap().clone();
    assert_eq!(
        requests,
        [
            (Mark::O, Mark::O),
            (Mark::O, Mark::X),
            (Mark::O, Mark::X),
            (Mark::O, Mark::X),
        ]
    );

    let x = Cell::Marked(Mark::X);
    let o = Cell::Marked(Mark::O);
    let e = Cell::Empty;
    assert_eq!(report.final_state.cells, [o, x, x, x, x, e, o, o, o]);
    assert_eq!(report.outcome, Outcome::Winner(Mark::O));
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].from, "recorder");
    assert_eq!(notifications[0].to, "repeater");
}

#[tokio::test]
async fn test_proposers_alternate_even_after_forfeits() {
    let repeater = Box::new(Stubborn {
        name: "repeater".to_string(),
        reply: "4".to_string(),
    });
    let (result, _) = play(
        repeater,
        Box::new(LowestEmpty::new("low")),
        MatchSettings::default(),
    )
    .await;
    let report = result.unwrap();

    assert_eq!(report.turns.len(), 16);
    assert_eq!(report.forfeits(), 7);
    assert_eq!(report.outcome, Outcome::Draw);
    for record in &report.turns {
        let expected = if record.turn % 2 == 1 { Mark::X } else { Mark::O };
        assert_eq!(record.mark, expected);
        let expected_name = if expected == Mark::X { "repeater" } else { "low" };
        assert_eq!(record.proposer, expected_name);
    }
}

#[tokio::test]
async fn test_timeout_forfeits_turn() {
    let settings = MatchSettings {
        turn_timeout: Some(Duration::from_millis(20)),
        ..MatchSettings::default()
    };
    let (result, _) = play(Box::new(Silent), Box::new(LowestEmpty::new("low")), settings).await;
    let report = result.unwrap();

    // Every X turn times out, so the engine never leaves X and the O seat
    // fills 0..=6 with Xs until the 2-4-6 diagonal closes.
    assert_eq!(report.outcome, Outcome::Winner(Mark::X));
    assert_eq!(report.turns.len(), 14);
    assert_eq!(report.final_state.current_player, Mark::X);
    for record in report.turns.iter().filter(|t| t.mark == Mark::X) {
        assert_eq!(record.reply, None);
        assert_eq!(record.result, TurnResult::Forfeited(ForfeitReason::TimedOut));
    }
}

#[tokio::test]
async fn test_proposer_failure_aborts_match() {
    let (result, notifications) = play(
        scripted("mute", &[]),
        Box::new(LowestEmpty::new("low")),
        MatchSettings::default(),
    )
    .await;

    match result {
        Err(MatchError::Proposer { proposer, .. }) => assert_eq!(proposer, "mute"),
        other => panic!("expected proposer failure, got {other:?}"),
    }
    assert!(notifications.is_empty());
}

#[tokio::test]
async fn test_turn_limit_stops_endless_forfeits() {
    let stubborn = |name: &str| {
        Box::new(Stubborn {
            name: name.to_string(),
            reply: "4".to_string(),
        }) as Box<dyn Proposer>
    };
    let settings = MatchSettings {
        max_turns: 10,
        ..MatchSettings::default()
    };
    let (result, _) = play(stubborn("a"), stubborn("b"), settings).await;
    assert!(matches!(result, Err(MatchError::TurnLimit(10))));
}

#[tokio::test]
async fn test_draw_notifies_from_x_to_o() {
    let (result, notifications) = play(
        scripted("ex", &["0", "2", "3", "7", "8"]),
        scripted("oh", &["1", "4", "5", "6"]),
        MatchSettings::default(),
    )
    .await;
    let report = result.unwrap();

    assert_eq!(report.outcome, Outcome::Draw);
    assert_eq!(report.winner_name(), None);
    assert_eq!(report.turns.len(), 9);
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].from, "ex");
    assert_eq!(notifications[0].to, "oh");
    assert_eq!(notifications[0].message, "The game ended in a draw.");
}

#[tokio::test]
async fn test_events_trace_the_match() {
    let (notifier, _inbox) = Notifier::channel();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut orchestrator = Orchestrator::new(
        Box::new(LowestEmpty::new("low")),
        Box::new(HighestEmpty::new("high")),
        MoveExtractor::seeded(1),
        notifier,
    )
    .with_events(tx);
    orchestrator
        .run_match(SessionId::new("events"))
        .await
        .unwrap();
    drop(orchestrator);

    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }

    assert!(matches!(events.first(), Some(MatchEvent::MatchStarted { .. })));
    assert!(matches!(
        events.last(),
        Some(MatchEvent::MatchFinished {
            outcome: Outcome::Winner(Mark::X),
            ..
        })
    ));
    let applied = events
        .iter()
        .filter(|e| matches!(e, MatchEvent::MoveApplied { .. }))
        .count();
    let started = events
        .iter()
        .filter(|e| matches!(e, MatchEvent::TurnStarted { .. }))
        .count();
    assert_eq!(applied, 5);
    assert_eq!(started, 5);
}

#[tokio::test]
async fn test_noisy_match_keeps_board_consistent() {
    let settings = MatchSettings {
        max_turns: 500,
        ..MatchSettings::default()
    };
    let (result, notifications) = play(
        Box::new(Noisy::seeded("n1", 1)),
        Box::new(Noisy::seeded("n2", 2)),
        settings,
    )
    .await;
    let report = result.unwrap();

    let applied: Vec<_> = report
        .turns
        .iter()
        .filter_map(|t| match t.result {
            TurnResult::Applied { position, mark, .. } => Some((position, mark)),
            TurnResult::Forfeited(_) => None,
        })
        .collect();
    let marked = report
        .final_state
        .cells
        .iter()
        .filter(|c| **c != Cell::Empty)
        .count();
    assert_eq!(applied.len(), marked);
    for (position, mark) in applied {
        assert_eq!(
            report.final_state.cells[position.to_index()],
            Cell::Marked(mark)
        );
    }
    assert_eq!(notifications.len(), 1);
}
