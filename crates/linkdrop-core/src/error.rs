//! Error types for Linkdrop.
//!
//! This module provides a unified error type for all Linkdrop operations,
//! with specific error variants for different failure modes.

use std::io;

use thiserror::Error;

/// A specialized `Result` type for Linkdrop operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Linkdrop.
#[derive(Error, Debug)]
pub enum Error {
    /// No items are staged for sharing
    #[error("no items staged for sharing")]
    NothingStaged,

    /// The companion backend is not running
    #[error("backend is not running")]
    BackendNotRunning,

    /// A share-link session is already active
    #[error("a share link session is already active")]
    ShareAlreadyActive,

    /// No pending share to create a session from
    #[error("no pending share to create a session from")]
    NoPendingShare,

    /// No active share-link session
    #[error("no active share link session")]
    NoActiveSession,

    /// The backend rejected the request; message is the server's, verbatim
    #[error("{message}")]
    Backend {
        /// Error string returned by the backend
        message: String,
    },

    /// Request never produced a response (connection refused, timeout, ...)
    #[error("transport error: {0}")]
    Transport(String),

    /// The configured backend base URL cannot be parsed
    #[error("invalid backend base URL: {0}")]
    InvalidBaseUrl(String),

    /// Configuration file error
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Returns whether this error is a synchronous validation rejection.
    ///
    /// Validation errors are raised before any remote call is attempted;
    /// everything else surfaced from an operation is a remote-call failure.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::NothingStaged
                | Self::BackendNotRunning
                | Self::ShareAlreadyActive
                | Self::NoPendingShare
                | Self::NoActiveSession
        )
    }
}
