//! Favorite devices cache.
//!
//! The cache is a local read model of the backend's favorites store. It is
//! only ever written by replacing its contents wholesale from a fetch; a
//! mutation (add/remove) goes to the backend first and, on success, triggers
//! a mandatory refetch instead of splicing the entry in locally. The extra
//! round trip is the consistency guarantee: the cache always reflects the
//! server's canonical state, including any normalization the server applied.
//!
//! ## Interleaving
//!
//! Mutation-plus-refetch is not sequenced against concurrent independent
//! mutations. A rapid add-then-remove can race such that the last refetch to
//! *complete* (not the last mutation issued) determines the final cache
//! content. This is accepted behavior, not a bug to fix here.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::BackendProbe;
use crate::error::Result;
use crate::notice::{Notice, NoticeSender};

/// A remembered remote peer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteDevice {
    /// Identity key of the device
    pub favorite_fingerprint: String,
    /// User-chosen display alias
    pub favorite_alias: String,
}

/// Remote favorites store operations.
#[async_trait]
pub trait FavoritesApi: Send + Sync {
    /// Fetch the favorites list. A response without usable data yields an
    /// empty list; a transport failure is an error.
    async fn list(&self) -> Result<Vec<FavoriteDevice>>;

    /// Create a favorite. Errors carry the backend's message verbatim.
    async fn add(&self, fingerprint: &str, alias: &str) -> Result<()>;

    /// Delete a favorite by fingerprint.
    async fn remove(&self, fingerprint: &str) -> Result<()>;
}

/// Local read model of favorite devices, keyed by fingerprint.
pub struct FavoritesCache {
    entries: Vec<FavoriteDevice>,
    api: Arc<dyn FavoritesApi>,
    probe: Arc<dyn BackendProbe>,
    notices: NoticeSender,
}

impl std::fmt::Debug for FavoritesCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoritesCache")
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

impl FavoritesCache {
    /// Create an empty cache over the given API and backend probe.
    #[must_use]
    pub fn new(
        api: Arc<dyn FavoritesApi>,
        probe: Arc<dyn BackendProbe>,
        notices: NoticeSender,
    ) -> Self {
        Self {
            entries: Vec::new(),
            api,
            probe,
            notices,
        }
    }

    /// Current cache contents, order irrelevant.
    #[must_use]
    pub fn entries(&self) -> &[FavoriteDevice] {
        &self.entries
    }

    /// Whether a fingerprint is currently favorited.
    #[must_use]
    pub fn is_favorite(&self, fingerprint: &str) -> bool {
        self.entries
            .iter()
            .any(|f| f.favorite_fingerprint == fingerprint)
    }

    /// Refresh the cache from the backend.
    ///
    /// While the backend is reported not running this is a no-op that keeps
    /// the existing contents, so a populated list doesn't flash empty while
    /// connectivity is still being probed. Otherwise the cache is replaced
    /// wholesale with whatever the fetch yields.
    pub async fn refresh(&mut self) {
        if !self.probe.is_running().await {
            return;
        }
        self.refetch().await;
    }

    /// Add a device to favorites.
    ///
    /// On success the cache is reconciled with a mandatory refetch; on
    /// failure it is left untouched and the error is surfaced as a notice.
    /// Never retried automatically.
    pub async fn add(&mut self, fingerprint: &str, alias: &str) -> Result<()> {
        match self.api.add(fingerprint, alias).await {
            Ok(()) => {
                let label = if alias.is_empty() { fingerprint } else { alias };
                self.notices.send(Notice::FavoriteAdded {
                    label: label.to_string(),
                });
                self.refetch().await;
                Ok(())
            }
            Err(err) => {
                self.notices.send(Notice::Error(err.to_string()));
                Err(err)
            }
        }
    }

    /// Remove a device from favorites. Same success/failure contract as
    /// [`FavoritesCache::add`].
    pub async fn remove(&mut self, fingerprint: &str) -> Result<()> {
        match self.api.remove(fingerprint).await {
            Ok(()) => {
                self.notices.send(Notice::FavoriteRemoved);
                self.refetch().await;
                Ok(())
            }
            Err(err) => {
                self.notices.send(Notice::Error(err.to_string()));
                Err(err)
            }
        }
    }

    // Post-mutation fetch skips the probe: the mutation just succeeded, so
    // the backend is demonstrably up even if the probe state is stale.
    async fn refetch(&mut self) {
        self.entries = match self.api.list().await {
            Ok(list) => list,
            Err(err) => {
                tracing::warn!("favorites fetch failed: {err}");
                Vec::new()
            }
        };
    }
}
