//! Shared test collaborators: a logical clock and in-memory backends.

use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use linkdrop_core::api::BackendProbe;
use linkdrop_core::clock::Clock;
use linkdrop_core::error::{Error, Result};
use linkdrop_core::favorites::{FavoriteDevice, FavoritesApi};
use linkdrop_core::selection::StagedItem;
use linkdrop_core::session::{SessionApi, SessionGrant};

/// Logical wall clock, advanced by hand.
pub struct ManualClock(AtomicI64);

impl ManualClock {
    pub fn at(ms: i64) -> Arc<Self> {
        Arc::new(Self(AtomicI64::new(ms)))
    }

    pub fn advance(&self, ms: i64) {
        self.0.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// Probe with a switchable answer.
pub struct SwitchProbe(pub AtomicBool);

impl SwitchProbe {
    pub fn running(initial: bool) -> Arc<Self> {
        Arc::new(Self(AtomicBool::new(initial)))
    }

    pub fn set(&self, running: bool) {
        self.0.store(running, Ordering::SeqCst);
    }
}

#[async_trait]
impl BackendProbe for SwitchProbe {
    async fn is_running(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// In-memory favorites backend.
#[derive(Default)]
pub struct MemoryFavorites {
    pub remote: Mutex<Vec<FavoriteDevice>>,
    pub list_calls: AtomicUsize,
}

#[async_trait]
impl FavoritesApi for MemoryFavorites {
    async fn list(&self) -> Result<Vec<FavoriteDevice>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.remote.lock().unwrap().clone())
    }

    async fn add(&self, fingerprint: &str, alias: &str) -> Result<()> {
        let mut remote = self.remote.lock().unwrap();
        if remote.iter().any(|f| f.favorite_fingerprint == fingerprint) {
            return Err(Error::Backend {
                message: "already a favorite".to_string(),
            });
        }
        remote.push(FavoriteDevice {
            favorite_fingerprint: fingerprint.to_string(),
            favorite_alias: alias.to_string(),
        });
        Ok(())
    }

    async fn remove(&self, fingerprint: &str) -> Result<()> {
        let mut remote = self.remote.lock().unwrap();
        let before = remote.len();
        remote.retain(|f| f.favorite_fingerprint != fingerprint);
        if remote.len() == before {
            return Err(Error::Backend {
                message: "not a favorite".to_string(),
            });
        }
        Ok(())
    }
}

/// In-memory session backend issuing sequential ids.
#[derive(Default)]
pub struct MemorySessions {
    pub open: Mutex<Vec<String>>,
    pub created: AtomicUsize,
    pub close_calls: AtomicUsize,
}

#[async_trait]
impl SessionApi for MemorySessions {
    async fn create(
        &self,
        _items: &[StagedItem],
        _pin: Option<&str>,
        _auto_accept: bool,
    ) -> Result<SessionGrant> {
        let n = self.created.fetch_add(1, Ordering::SeqCst) + 1;
        let session_id = format!("sess-{n}");
        self.open.lock().unwrap().push(session_id.clone());
        Ok(SessionGrant {
            download_url: format!("http://192.168.1.2:53317/share/{session_id}"),
            session_id,
        })
    }

    async fn close(&self, session_id: &str) -> Result<()> {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        self.open.lock().unwrap().retain(|id| id != session_id);
        Ok(())
    }
}
