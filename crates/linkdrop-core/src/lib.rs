//! # Linkdrop Core Library
//!
//! `linkdrop-core` provides the client-side state management for Linkdrop,
//! a companion for LAN file sharing: which remote device is targeted, which
//! local items are staged for transfer, the lifecycle of a link-based share
//! session, and a locally cached list of favorite devices.
//!
//! The crate holds state and policy only. Discovery, the transfer engine,
//! and all rendering live in external collaborators that this crate consumes
//! through narrow contracts ([`api`], [`host`]).
//!
//! ## Modules
//!
//! - [`api`] - HTTP client for the companion backend (favorites, sessions, status)
//! - [`clock`] - Injectable wall-clock seam for session expiry
//! - [`config`] - Configuration management
//! - [`device`] - Discovered device records and fingerprint identity
//! - [`favorites`] - Favorite devices cache, reconciled against the backend
//! - [`host`] - Contracts for UI-boundary collaborators (clipboard, prompts, pickers)
//! - [`notice`] - User-visible notification events
//! - [`progress`] - Transfer progress projection
//! - [`selection`] - Device selection and staged-item set
//! - [`session`] - Share-link session lifecycle and expiry
//!
//! ## Example
//!
//! ```rust,ignore
//! use linkdrop_core::selection::{SelectionStore, StagedItem};
//! use linkdrop_core::session::ShareSessionManager;
//!
//! let mut store = SelectionStore::new();
//! store.add_item(StagedItem::file("/home/deck/photo.png"));
//!
//! manager.stage_pending(store.staged().to_vec()).await?;
//! let session = manager.create_session(None, true).await?;
//! println!("Share link: {}", session.download_url);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::must_use_candidate)]

pub mod api;
pub mod clock;
pub mod config;
pub mod device;
pub mod error;
pub mod favorites;
pub mod host;
pub mod notice;
pub mod progress;
pub mod selection;
pub mod session;

pub use error::{Error, Result};

use std::time::Duration;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Fixed time-to-live of a share-link session, in milliseconds (one hour).
///
/// Immutable after session creation; only the creation timestamp varies.
pub const SESSION_TTL_MS: i64 = 60 * 60 * 1000;

/// Cadence of the share-session expiry monitor.
pub const EXPIRY_TICK: Duration = Duration::from_secs(1);

/// Default base URL of the companion backend API.
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:53317";

/// Default timeout for backend API requests, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
