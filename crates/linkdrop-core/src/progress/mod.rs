//! Transfer progress projection.
//!
//! The transfer engine owns the per-item status list; this module only
//! derives a display view from it. [`project`] is a pure function with no
//! state of its own, recomputed on every update to its input. Inbound and
//! outbound transfers are two independent call sites of the same projection
//! and share nothing.

use serde::{Deserialize, Serialize};

/// Status of a single item in a transfer, as reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferStatus {
    /// Waiting to start
    Queued,
    /// Currently transferring
    Active,
    /// Finished successfully
    Done,
    /// Finished with an error
    Error,
}

impl TransferStatus {
    /// Whether this item counts toward the completed total.
    ///
    /// Errors are terminal and count as completed: the bar measures how much
    /// of the batch is settled, not how much succeeded.
    #[must_use]
    pub const fn is_settled(self) -> bool {
        matches!(self, Self::Done | Self::Error)
    }
}

/// Per-item status entry supplied by the transfer engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferStatusEntry {
    /// Name of the item being transferred
    #[serde(rename = "fileName")]
    pub file_name: String,
    /// Current status
    pub status: TransferStatus,
}

/// Derived view of a transfer's overall progress.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressView {
    /// Number of entries in the batch
    pub total: usize,
    /// Entries that finished, successfully or not
    pub completed: usize,
    /// Completion percentage, always within 0..=100
    pub percent: u8,
    /// Name of the first currently-active entry, if any
    pub current_label: Option<String>,
}

/// Project a status list down to its display view.
///
/// Total over all inputs: an empty list yields zero percent and no current
/// label.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn project(entries: &[TransferStatusEntry]) -> ProgressView {
    let total = entries.len();
    let completed = entries.iter().filter(|e| e.status.is_settled()).count();
    let percent = if total == 0 {
        0
    } else {
        // Rounded to the nearest point, clamped so the bar never overshoots.
        ((completed * 100 + total / 2) / total).min(100) as u8
    };
    let current_label = entries
        .iter()
        .find(|e| e.status == TransferStatus::Active)
        .map(|e| e.file_name.clone());

    ProgressView {
        total,
        completed,
        percent,
        current_label,
    }
}
