//! Turns a free-text proposer reply into a board position.
//!
//! Replies come from unstructured text generators, so extraction degrades
//! in steps instead of failing:
//!
//! 1. the first whitespace-separated token made only of digits whose value
//!    is 0-8;
//! 2. otherwise the first character that is a digit 0-8;
//! 3. otherwise a uniformly random empty cell.
//!
//! A full board yields `None` whatever the text says.

use super::position::Position;
use super::types::Board;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Which extraction step produced a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum ExtractionSource {
    /// A whole numeric token.
    Token,
    /// A lone digit found inside the text.
    Digit,
    /// Nothing usable in the text; a random empty cell was chosen.
    RandomFallback,
}

/// A position read from a reply, with how it was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    /// The extracted position. Steps 1 and 2 may name an occupied cell.
    pub position: Position,
    /// The step that produced it.
    pub source: ExtractionSource,
}

/// Extracts positions from replies using an injected random source.
#[derive(Debug, Clone)]
pub struct MoveExtractor<R = StdRng> {
    rng: R,
}

impl MoveExtractor<StdRng> {
    /// Extractor seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_os_rng())
    }

    /// Extractor with a fixed seed, for reproducible fallbacks.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: rand::Rng> MoveExtractor<R> {
    /// Creates an extractor around a random source.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Extracts a position from `raw` for the given board.
    ///
    /// Returns `None` only when the board has no empty cell.
    #[instrument(skip(self, board), fields(raw_len = raw.len()))]
    pub fn extract(&mut self, raw: &str, board: &Board) -> Option<Extraction> {
        let empty = Position::empty_cells(board);
        if empty.is_empty() {
            debug!("Board full, no legal move");
            return None;
        }

        let text = raw.trim();
        let extraction = numeric_token(text)
            .map(|position| Extraction {
                position,
                source: ExtractionSource::Token,
            })
            .or_else(|| {
                first_digit(text).map(|position| Extraction {
                    position,
                    source: ExtractionSource::Digit,
                })
            });

        if let Some(extraction) = extraction {
            debug!(
                position = extraction.position.to_index(),
                source = %extraction.source,
                "Position extracted"
            );
            return Some(extraction);
        }

        let position = *empty.choose(&mut self.rng)?;
        debug!(position = position.to_index(), "No position in reply, random fallback");
        Some(Extraction {
            position,
            source: ExtractionSource::RandomFallback,
        })
    }
}

fn numeric_token(text: &str) -> Option<Position> {
    text.split_whitespace()
        .filter(|token| token.bytes().all(|b| b.is_ascii_digit()))
        .filter_map(|token| token.parse::<usize>().ok())
        .find_map(Position::from_index)
}

fn first_digit(text: &str) -> Option<Position> {
    text.chars()
        .filter_map(|c| c.to_digit(10))
        .find_map(|d| Position::from_index(d as usize))
}
