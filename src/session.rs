//! Match session identifiers.
//!
//! A session id threads every event and notification of one match. It is
//! used only for correlation and never affects game logic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Opaque correlation token for one match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Session id stamped with the given start time: `tic-tac-toe-<unix seconds>`.
    #[instrument]
    pub fn at(started: DateTime<Utc>) -> Self {
        Self(format!("tic-tac-toe-{}", started.timestamp()))
    }

    /// Session id stamped with the current time.
    pub fn now() -> Self {
        Self::at(Utc::now())
    }

    /// Wraps an existing id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
