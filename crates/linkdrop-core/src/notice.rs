//! User-visible notification events.
//!
//! State operations never talk to the UI directly. Anything the user should
//! see as a transient toast-style message is emitted as a [`Notice`] over an
//! unbounded channel; the embedding UI drains the receiver and renders
//! however it likes. Sends to a dropped receiver are silently discarded, so
//! a stale completion after the user navigated away is benign.

use tokio::sync::mpsc;

/// A transient, user-visible notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A device was added to favorites
    FavoriteAdded {
        /// Alias if one was given, fingerprint otherwise
        label: String,
    },
    /// A device was removed from favorites
    FavoriteRemoved,
    /// The share link was copied to the clipboard
    LinkCopied,
    /// The user ended the active share
    ShareEnded,
    /// The active share reached its time-to-live
    ShareExpired,
    /// A remote call failed; message shown to the user
    Error(String),
}

/// Sending half of the notice channel, cheap to clone into background tasks.
#[derive(Debug, Clone)]
pub struct NoticeSender {
    tx: mpsc::UnboundedSender<Notice>,
}

impl NoticeSender {
    /// Create a connected sender/receiver pair.
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Emit a notice. A closed receiver drops the notice on the floor.
    pub fn send(&self, notice: Notice) {
        let _ = self.tx.send(notice);
    }
}
