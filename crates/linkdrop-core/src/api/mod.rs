//! HTTP client for the companion backend API.
//!
//! All remote state this crate reconciles against lives behind one small
//! HTTP surface on the backend: the favorites store, share-session
//! creation/closure, and a status endpoint reporting whether the backend is
//! up at all. [`BackendClient`] implements the corresponding traits
//! ([`crate::favorites::FavoritesApi`], [`crate::session::SessionApi`],
//! [`BackendProbe`]) over `reqwest`.
//!
//! ## Response conventions
//!
//! - `GET /favorites` answers `200 { "data": [...] }`; any other status, or
//!   an unparseable body, is treated as "no data", not an error.
//! - Mutations answer `200 { "status": "ok" }` on success and carry
//!   `{ "error": "..." }` otherwise; the error string is surfaced to the
//!   user verbatim.
//! - The status probe maps any transport failure to "not running".

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};

use crate::config::BackendConfig;
use crate::error::{Error, Result};
use crate::favorites::{FavoriteDevice, FavoritesApi};
use crate::selection::StagedItem;
use crate::session::{SessionApi, SessionGrant};

/// Liveness probe for the companion backend.
///
/// Consulted before staging a share or refreshing favorites, so those
/// operations can reject or no-op without issuing doomed requests.
#[async_trait]
pub trait BackendProbe: Send + Sync {
    /// Whether the backend is reachable and reports itself running.
    async fn is_running(&self) -> bool;
}

/// HTTP client over the backend's `/api/self/v1` surface.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: Client,
    base: Url,
    timeout: Duration,
}

impl BackendClient {
    /// Create a client against `base_url` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not a usable HTTP base.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base = Url::parse(base_url).map_err(|e| {
            Error::InvalidBaseUrl(format!("{base_url}: {e}"))
        })?;
        if base.cannot_be_a_base() {
            return Err(Error::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self {
            http: Client::new(),
            base,
            timeout,
        })
    }

    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured base URL is invalid.
    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        Self::new(
            &config.base_url,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    // Build an endpoint URL, pushing each segment with percent-escaping so
    // identifiers like fingerprints survive the path.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| Error::InvalidBaseUrl(self.base.to_string()))?;
            path.pop_if_empty();
            path.extend(["api", "self", "v1"]);
            path.extend(segments);
        }
        Ok(url)
    }
}

fn transport(err: reqwest::Error) -> Error {
    Error::Transport(err.to_string())
}

// Mutation responses either succeed with 200 or carry `{ "error": ... }`.
async fn ensure_ok(resp: reqwest::Response, fallback: &str) -> Result<()> {
    if resp.status() == StatusCode::OK {
        return Ok(());
    }
    let message = resp
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|b| b.error)
        .unwrap_or_else(|| fallback.to_string());
    Err(Error::Backend { message })
}

#[derive(Debug, Deserialize)]
struct FavoritesListResponse {
    #[serde(default)]
    data: Vec<FavoriteDevice>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct FavoriteUpsert<'a> {
    favorite_fingerprint: &'a str,
    favorite_alias: &'a str,
}

#[derive(Debug, Serialize)]
struct CreateSessionRequest<'a> {
    files: &'a [StagedItem],
    #[serde(skip_serializing_if = "Option::is_none")]
    pin: Option<&'a str>,
    auto_accept: bool,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    #[serde(default)]
    running: bool,
}

#[async_trait]
impl FavoritesApi for BackendClient {
    async fn list(&self) -> Result<Vec<FavoriteDevice>> {
        let url = self.endpoint(&["favorites"])?;
        let resp = self
            .http
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(transport)?;
        if resp.status() != StatusCode::OK {
            tracing::debug!(status = %resp.status(), "favorites list: no data");
            return Ok(Vec::new());
        }
        match resp.json::<FavoritesListResponse>().await {
            Ok(body) => Ok(body.data),
            Err(err) => {
                tracing::debug!("favorites list body unusable: {err}");
                Ok(Vec::new())
            }
        }
    }

    async fn add(&self, fingerprint: &str, alias: &str) -> Result<()> {
        let url = self.endpoint(&["favorites"])?;
        let resp = self
            .http
            .post(url)
            .json(&FavoriteUpsert {
                favorite_fingerprint: fingerprint,
                favorite_alias: alias,
            })
            .timeout(self.timeout)
            .send()
            .await
            .map_err(transport)?;
        ensure_ok(resp, "failed to add favorite").await
    }

    async fn remove(&self, fingerprint: &str) -> Result<()> {
        let url = self.endpoint(&["favorites", fingerprint])?;
        let resp = self
            .http
            .delete(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(transport)?;
        ensure_ok(resp, "failed to remove favorite").await
    }
}

#[async_trait]
impl SessionApi for BackendClient {
    async fn create(
        &self,
        items: &[StagedItem],
        pin: Option<&str>,
        auto_accept: bool,
    ) -> Result<SessionGrant> {
        let url = self.endpoint(&["share-session"])?;
        let resp = self
            .http
            .post(url)
            .json(&CreateSessionRequest {
                files: items,
                pin,
                auto_accept,
            })
            .timeout(self.timeout)
            .send()
            .await
            .map_err(transport)?;
        if resp.status() != StatusCode::OK {
            let message = resp
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|b| b.error)
                .unwrap_or_else(|| "failed to create share session".to_string());
            return Err(Error::Backend { message });
        }
        resp.json::<SessionGrant>().await.map_err(|err| Error::Backend {
            message: format!("malformed session response: {err}"),
        })
    }

    async fn close(&self, session_id: &str) -> Result<()> {
        let url = self.endpoint(&["share-session", session_id])?;
        let resp = self
            .http
            .delete(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(transport)?;
        ensure_ok(resp, "failed to close share session").await
    }
}

#[async_trait]
impl BackendProbe for BackendClient {
    async fn is_running(&self) -> bool {
        let Ok(url) = self.endpoint(&["status"]) else {
            return false;
        };
        match self.http.get(url).timeout(self.timeout).send().await {
            Ok(resp) if resp.status() == StatusCode::OK => resp
                .json::<StatusResponse>()
                .await
                .map_or(false, |s| s.running),
            Ok(_) | Err(_) => false,
        }
    }
}
