//! Transient feedback
//!
//! Short-lived status messages ("added to cart", "log in first") that revert
//! to idle on their own once their display window has passed.

use std::time::Duration;

use tokio::{sync::watch, time::Instant};

/// Feedback tone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    Success,
    Error,
}

/// A message shown until `expires_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub kind: FeedbackKind,
    pub message: String,
    expires_at: Instant,
}

impl Feedback {
    /// Whether the message should still be displayed.
    pub fn is_visible(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

/// Slot holding at most one transient message.
#[derive(Debug)]
pub struct TransientFeedback {
    slot: watch::Sender<Option<Feedback>>,
}

impl Default for TransientFeedback {
    fn default() -> Self {
        Self {
            slot: watch::Sender::new(None),
        }
    }
}

impl TransientFeedback {
    /// Show `message` for `ttl`, replacing whatever was shown before.
    pub fn show(&self, kind: FeedbackKind, message: impl Into<String>, ttl: Duration) {
        self.slot.send_replace(Some(Feedback {
            kind,
            message: message.into(),
            expires_at: Instant::now() + ttl,
        }));
    }

    /// Visible message, if any.
    pub fn current(&self) -> Option<Feedback> {
        self.slot
            .borrow()
            .as_ref()
            .filter(|feedback| feedback.is_visible())
            .cloned()
    }

    /// Drop the message early.
    pub fn clear(&self) {
        self.slot.send_replace(None);
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Feedback>> {
        self.slot.subscribe()
    }
}
