//! Contracts for UI-boundary collaborators.
//!
//! Clipboard access, modal prompts, and the folder picker belong to the
//! embedding UI. This crate only consumes them, through the narrowest
//! interface that covers the flows in [`crate::selection`] and
//! [`crate::session`]. Implementations live outside the core.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::Result;

/// Clipboard write access.
pub trait ClipboardSink: Send + Sync {
    /// Copy `text` to the system clipboard. Returns whether the copy took.
    fn copy(&self, text: &str) -> bool;
}

/// A blocking-style modal prompt for an access PIN.
#[async_trait]
pub trait PinPrompt: Send + Sync {
    /// Present the prompt and resolve with the entered PIN, or `None` when
    /// the user cancelled.
    async fn request_pin(&self) -> Option<String>;
}

/// Result of a folder pick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedFolder {
    /// The chosen folder
    pub path: PathBuf,
    /// Number of files found under it, recursively
    pub file_count: usize,
}

/// Native folder chooser.
#[async_trait]
pub trait FolderPicker: Send + Sync {
    /// Open the chooser rooted at `start`. Resolves with the chosen folder,
    /// or `None` when the user cancelled.
    async fn pick_folder(&self, start: &Path) -> Result<Option<PickedFolder>>;
}
