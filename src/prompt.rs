//! Turn prompts and closing messages sent to proposers.

use a2a_tictactoe::{Board, Mark, Outcome};

/// Renders the message that asks `mark` for a move on `board`.
pub fn turn_message(board: &Board, mark: Mark) -> String {
    format!(
        "Current board:\n{board}\n\n\
         You are player '{mark}'.\n\
         It is your turn.\n\n\
         Choose an empty position (0-8) for your move.\n\
         Reply with the position number only."
    )
}

/// Closing message carrying the final outcome.
pub fn closing_message(outcome: Outcome) -> String {
    match outcome {
        Outcome::Winner(mark) => format!("I won the game! Final result: {mark}"),
        Outcome::Draw => "The game ended in a draw.".to_string(),
    }
}
