//! Console rendering for the arena binary.

use crate::notify::Notification;
use crate::orchestrator::{MatchEvent, MatchReport};
use a2a_tictactoe::Outcome;
use std::io::BufRead;
use tokio::sync::mpsc;
use tracing::warn;

/// Formats a match event for the terminal.
pub fn render_event(event: &MatchEvent) -> String {
    match event {
        MatchEvent::MatchStarted {
            session_id,
            player_x,
            player_o,
        } => format!(
            "🎮 Tic-tac-toe, agent vs agent\nX: {player_x}\nO: {player_o}\nSession: {session_id}\n"
        ),
        MatchEvent::TurnStarted {
            turn,
            proposer,
            mark,
            board,
        } => format!("\nTurn {turn}: {proposer} ({mark})\n{board}"),
        MatchEvent::MoveApplied {
            proposer,
            mark,
            position,
            ..
        } => format!("{proposer} ({mark}) chose position {}", position.to_index()),
        MatchEvent::TurnForfeited {
            proposer, reason, ..
        } => format!("Invalid move from {proposer}: {reason}. Turn lost."),
        MatchEvent::MatchFinished {
            outcome,
            winner,
            board,
        } => {
            let verdict = match (outcome, winner) {
                (Outcome::Winner(mark), Some(name)) => format!("Winner: {name} ({mark})"),
                (Outcome::Winner(mark), None) => format!("Winner: {mark}"),
                (Outcome::Draw, _) => "Draw!".to_string(),
            };
            format!("\nGame over!\n{board}\n\n{verdict}")
        }
    }
}

/// Formats a delivered notification.
pub fn render_notification(notification: &Notification) -> String {
    format!(
        "📨 {} -> {}: {}",
        notification.from, notification.to, notification.message
    )
}

/// Closing summary printed after a match.
pub fn render_summary(report: &MatchReport) -> String {
    format!(
        "Turns: {} (forfeits: {})\nSession: {}",
        report.turns.len(),
        report.forfeits(),
        report.session_id
    )
}

/// Whether an answer to "play again?" asks for another match.
///
/// Only an explicit yes counts; anything else, "sair" and "quit"
/// included, ends the session.
pub fn wants_rematch(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "s" | "sim" | "y" | "yes"
    )
}

/// Reads lines from `reader` on a dedicated thread.
///
/// The thread blocks on the reader instead of the runtime's blocking pool,
/// so a caller can stop waiting on the receiver at any time and the runtime
/// still shuts down promptly. The channel closes at end of input.
pub fn spawn_line_reader<R>(reader: R) -> std::io::Result<mpsc::UnboundedReceiver<String>>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::Builder::new()
        .name("line-reader".to_string())
        .spawn(move || {
            for line in reader.lines() {
                match line {
                    Ok(line) => {
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "Stopped reading input");
                        break;
                    }
                }
            }
        })?;
    Ok(rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::ForfeitReason;
    use a2a_tictactoe::{Mark, Position};

    #[test]
    fn test_rematch_answers() {
        assert!(wants_rematch("s"));
        assert!(wants_rematch(" YES \n"));
        assert!(!wants_rematch("n"));
        assert!(!wants_rematch("SAIR"));
        assert!(!wants_rematch("quit"));
        assert!(!wants_rematch(""));
    }

    /// Blocks every read until the test process exits.
    struct NeverReady;

    impl std::io::Read for NeverReady {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            loop {
                std::thread::park();
            }
        }
    }

    #[tokio::test]
    async fn test_line_reader_delivers_lines_then_closes() {
        let input = std::io::Cursor::new("s\nsair\n");
        let mut lines = spawn_line_reader(input).unwrap();
        assert_eq!(lines.recv().await.as_deref(), Some("s"));
        assert_eq!(lines.recv().await.as_deref(), Some("sair"));
        assert_eq!(lines.recv().await, None);
    }

    #[tokio::test]
    async fn test_waiting_for_an_answer_can_be_abandoned() {
        let mut lines = spawn_line_reader(std::io::BufReader::new(NeverReady)).unwrap();
        let answer = tokio::select! {
            line = lines.recv() => line,
            _ = tokio::time::sleep(std::time::Duration::from_millis(20)) => None,
        };
        assert_eq!(answer, None);
        drop(lines);
    }

    #[test]
    fn test_render_forfeit() {
        let line = render_event(&MatchEvent::TurnForfeited {
            turn: 3,
            proposer: "Bot".to_string(),
            mark: Mark::O,
            reason: ForfeitReason::Occupied(Position::Center),
        });
        assert!(line.contains("Bot"));
        assert!(line.contains("Turn lost"));
    }

    #[test]
    fn test_render_draw() {
        let line = render_event(&MatchEvent::MatchFinished {
            outcome: Outcome::Draw,
            winner: None,
            board: String::new(),
        });
        assert!(line.ends_with("Draw!"));
    }
}
