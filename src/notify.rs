//! One-way messages between proposers.
//!
//! Notifications are fire-and-forget: the sender never waits for a reply
//! and a dropped receiver only produces a log line.

use crate::session::SessionId;
use chrono::{DateTime, Utc};
use derive_new::new;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument};

/// A message from one proposer to another within a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct Notification {
    /// Session the message belongs to.
    pub session_id: SessionId,
    /// Name of the sending proposer.
    pub from: String,
    /// Name of the receiving proposer.
    pub to: String,
    /// Message body.
    pub message: String,
    /// When the message was sent.
    #[new(value = "Utc::now()")]
    pub sent_at: DateTime<Utc>,
}

/// Sending half of a notification channel.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl Notifier {
    /// Creates a notifier and the receiver that drains it.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Sends without waiting; a closed channel is logged and ignored.
    #[instrument(
        skip(self, notification),
        fields(
            session_id = %notification.session_id,
            from = %notification.from,
            to = %notification.to
        )
    )]
    pub fn send(&self, notification: Notification) {
        match self.tx.send(notification) {
            Ok(()) => info!("Notification sent"),
            Err(_) => debug!("Notification receiver dropped, message discarded"),
        }
    }
}
