//! Share-link session lifecycle.
//!
//! A link share moves through two stages with very different costs:
//!
//! - **Pending**: a local-only snapshot of the staged items, held while the
//!   user picks a PIN and auto-accept settings. Cancelling is free; nothing
//!   exists on the backend yet.
//! - **Active**: a server-side session with a download URL and a fixed
//!   one-hour time-to-live measured from its creation timestamp.
//!
//! While a session is active, a 1 Hz monitor task watches for expiry. On
//! crossing the TTL it closes the session on the backend (best effort),
//! clears the local state, and notifies the user. The monitor is held as an
//! explicit handle and aborted on closure or teardown; dropping the manager
//! never leaves a timer running against stale state.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use crate::api::BackendProbe;
use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::host::{ClipboardSink, PinPrompt};
use crate::notice::{Notice, NoticeSender};
use crate::selection::StagedItem;
use crate::{EXPIRY_TICK, SESSION_TTL_MS};

/// Staged items snapshotted for an upcoming session, before anything exists
/// on the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingShare {
    /// Snapshot of the staged items at staging time
    pub items: Vec<StagedItem>,
}

/// What the backend hands out for a created session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionGrant {
    /// Backend identifier for the session
    pub session_id: String,
    /// URL a receiver downloads the shared items from
    pub download_url: String,
}

/// An active server-side share session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLinkSession {
    /// Backend identifier for the session
    pub session_id: String,
    /// URL a receiver downloads the shared items from
    pub download_url: String,
    /// Creation time, epoch milliseconds; the TTL is measured from here
    pub created_at: i64,
}

impl ShareLinkSession {
    /// Whether the session has crossed its time-to-live at `now_ms`.
    #[must_use]
    pub fn is_expired(&self, now_ms: i64) -> bool {
        now_ms.saturating_sub(self.created_at) >= SESSION_TTL_MS
    }

    /// Milliseconds of life left at `now_ms`; zero once expired. Always
    /// derived, never stored.
    #[must_use]
    pub fn remaining_ms(&self, now_ms: i64) -> i64 {
        (SESSION_TTL_MS - now_ms.saturating_sub(self.created_at)).max(0)
    }
}

/// Remote session operations.
#[async_trait]
pub trait SessionApi: Send + Sync {
    /// Create a session exposing `items`, optionally protected by `pin`.
    async fn create(
        &self,
        items: &[StagedItem],
        pin: Option<&str>,
        auto_accept: bool,
    ) -> Result<SessionGrant>;

    /// Close a session by id.
    async fn close(&self, session_id: &str) -> Result<()>;
}

/// Observable phase of the share workflow.
///
/// `Expired` and `Closed` are transient: once their cleanup has run the
/// manager is back at `Idle`, and the distinction is surfaced through
/// [`Notice::ShareExpired`] and [`Notice::ShareEnded`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SharePhase {
    /// No pending share and no session
    #[default]
    Idle,
    /// Items snapshotted, nothing created on the backend yet
    Pending,
    /// A server-side session exists and is within its TTL
    Active,
}

/// Handle for the expiry monitor task; aborting it is the release half of
/// the only scoped resource this module owns.
#[derive(Debug)]
struct ExpiryMonitor {
    handle: JoinHandle<()>,
}

impl Drop for ExpiryMonitor {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Drives a share from staged items to an expiring server-side session.
pub struct ShareSessionManager {
    pending: Option<PendingShare>,
    // Shared with the monitor task, which clears it on expiry.
    active: Arc<Mutex<Option<ShareLinkSession>>>,
    monitor: Option<ExpiryMonitor>,
    api: Arc<dyn SessionApi>,
    probe: Arc<dyn BackendProbe>,
    clock: Arc<dyn Clock>,
    notices: NoticeSender,
}

impl std::fmt::Debug for ShareSessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShareSessionManager")
            .field("phase", &self.phase())
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

fn lock_active(
    active: &Mutex<Option<ShareLinkSession>>,
) -> MutexGuard<'_, Option<ShareLinkSession>> {
    active.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ShareSessionManager {
    /// Create an idle manager over the given API, probe, and clock.
    #[must_use]
    pub fn new(
        api: Arc<dyn SessionApi>,
        probe: Arc<dyn BackendProbe>,
        clock: Arc<dyn Clock>,
        notices: NoticeSender,
    ) -> Self {
        Self {
            pending: None,
            active: Arc::new(Mutex::new(None)),
            monitor: None,
            api,
            probe,
            clock,
            notices,
        }
    }

    /// Current phase of the share workflow.
    #[must_use]
    pub fn phase(&self) -> SharePhase {
        if lock_active(&self.active).is_some() {
            SharePhase::Active
        } else if self.pending.is_some() {
            SharePhase::Pending
        } else {
            SharePhase::Idle
        }
    }

    /// The pending snapshot, if staging is in progress.
    #[must_use]
    pub fn pending(&self) -> Option<&PendingShare> {
        self.pending.as_ref()
    }

    /// The active session, if one exists.
    #[must_use]
    pub fn session(&self) -> Option<ShareLinkSession> {
        lock_active(&self.active).clone()
    }

    /// Milliseconds left on the active session, if one exists.
    #[must_use]
    pub fn remaining_ms(&self) -> Option<i64> {
        let now = self.clock.now_millis();
        lock_active(&self.active).as_ref().map(|s| s.remaining_ms(now))
    }

    /// Snapshot `items` as the pending share.
    ///
    /// Valid from `Idle`, or re-entrant from `Pending` (replaces the
    /// snapshot). Rejects an empty item set, a non-running backend, and an
    /// already-active session without touching any state.
    pub async fn stage_pending(&mut self, items: Vec<StagedItem>) -> Result<()> {
        if lock_active(&self.active).is_some() {
            return Err(Error::ShareAlreadyActive);
        }
        if items.is_empty() {
            return Err(Error::NothingStaged);
        }
        if !self.probe.is_running().await {
            return Err(Error::BackendNotRunning);
        }
        self.pending = Some(PendingShare { items });
        Ok(())
    }

    /// Discard the pending snapshot without any remote call.
    pub fn cancel_pending(&mut self) -> Result<()> {
        self.pending.take().map(|_| ()).ok_or(Error::NoPendingShare)
    }

    /// Create the server-side session from the pending snapshot.
    ///
    /// An empty `pin` counts as no PIN. On success the pending share is
    /// consumed, the creation time is stamped from the clock, and the expiry
    /// monitor starts. On failure the manager stays `Pending` with no side
    /// effects beyond an error notice.
    pub async fn create_session(
        &mut self,
        pin: Option<&str>,
        auto_accept: bool,
    ) -> Result<ShareLinkSession> {
        let pending = self.pending.as_ref().ok_or(Error::NoPendingShare)?;
        if !self.probe.is_running().await {
            return Err(Error::BackendNotRunning);
        }

        let pin = pin.filter(|p| !p.is_empty());
        match self.api.create(&pending.items, pin, auto_accept).await {
            Ok(grant) => {
                let session = ShareLinkSession {
                    session_id: grant.session_id,
                    download_url: grant.download_url,
                    created_at: self.clock.now_millis(),
                };
                tracing::info!(session_id = %session.session_id, "share session created");
                *lock_active(&self.active) = Some(session.clone());
                self.pending = None;
                self.monitor = Some(self.spawn_monitor());
                Ok(session)
            }
            Err(err) => {
                self.notices.send(Notice::Error(err.to_string()));
                Err(err)
            }
        }
    }

    /// Prompt for a PIN, then create the session.
    ///
    /// Resolves to `Ok(None)` when the user cancels the prompt; the pending
    /// share is kept so the flow can be re-entered.
    pub async fn create_session_with_prompt(
        &mut self,
        prompt: &dyn PinPrompt,
        auto_accept: bool,
    ) -> Result<Option<ShareLinkSession>> {
        if self.pending.is_none() {
            return Err(Error::NoPendingShare);
        }
        let Some(pin) = prompt.request_pin().await else {
            return Ok(None);
        };
        self.create_session(Some(&pin), auto_accept).await.map(Some)
    }

    /// End the active session.
    ///
    /// Local state is cleared unconditionally once the close is issued, so
    /// the UI never keeps showing a share the user asked to end. A failing
    /// remote close still surfaces as an error notice.
    pub async fn close_session(&mut self) -> Result<()> {
        let session = lock_active(&self.active)
            .take()
            .ok_or(Error::NoActiveSession)?;
        self.monitor = None;

        match self.api.close(&session.session_id).await {
            Ok(()) => {
                tracing::info!(session_id = %session.session_id, "share session closed");
                self.notices.send(Notice::ShareEnded);
                Ok(())
            }
            Err(err) => {
                self.notices.send(Notice::Error(err.to_string()));
                Err(err)
            }
        }
    }

    /// Copy the active session's download URL via the clipboard contract.
    ///
    /// Returns whether the copy took; emits [`Notice::LinkCopied`] only when
    /// it did.
    pub fn copy_link(&self, clipboard: &dyn ClipboardSink) -> Result<bool> {
        let url = lock_active(&self.active)
            .as_ref()
            .map(|s| s.download_url.clone())
            .ok_or(Error::NoActiveSession)?;
        let copied = clipboard.copy(&url);
        if copied {
            self.notices.send(Notice::LinkCopied);
        }
        Ok(copied)
    }

    fn spawn_monitor(&self) -> ExpiryMonitor {
        let active = Arc::clone(&self.active);
        let api = Arc::clone(&self.api);
        let clock = Arc::clone(&self.clock);
        let notices = self.notices.clone();

        let handle = tokio::spawn(async move {
            let mut tick = tokio::time::interval(EXPIRY_TICK);
            loop {
                tick.tick().await;
                let expired = {
                    let mut guard = lock_active(&active);
                    let hit_ttl = match guard.as_ref() {
                        // Session was closed from elsewhere; nothing to watch.
                        None => break,
                        Some(s) => s.is_expired(clock.now_millis()),
                    };
                    if hit_ttl {
                        guard.take()
                    } else {
                        None
                    }
                };
                if let Some(session) = expired {
                    // Cleanup, not a user action: a failed close is logged
                    // and swallowed.
                    if let Err(err) = api.close(&session.session_id).await {
                        tracing::debug!(
                            session_id = %session.session_id,
                            "close of expired session failed: {err}"
                        );
                    }
                    tracing::info!(session_id = %session.session_id, "share session expired");
                    notices.send(Notice::ShareExpired);
                    break;
                }
            }
        });

        ExpiryMonitor { handle }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
    use std::time::Duration;

    struct ManualClock(AtomicI64);

    impl ManualClock {
        fn at(ms: i64) -> Arc<Self> {
            Arc::new(Self(AtomicI64::new(ms)))
        }

        fn advance(&self, ms: i64) {
            self.0.fetch_add(ms, Ordering::SeqCst);
        }
    }

    impl Clock for ManualClock {
        fn now_millis(&self) -> i64 {
            self.0.load(Ordering::SeqCst)
        }
    }

    struct FakeProbe(AtomicBool);

    #[async_trait]
    impl BackendProbe for FakeProbe {
        async fn is_running(&self) -> bool {
            self.0.load(Ordering::SeqCst)
        }
    }

    #[derive(Default)]
    struct FakeSessionApi {
        fail_create: AtomicBool,
        fail_close: AtomicBool,
        create_calls: AtomicUsize,
        close_calls: AtomicUsize,
        last_create: std::sync::Mutex<Option<(usize, Option<String>, bool)>>,
    }

    #[async_trait]
    impl SessionApi for FakeSessionApi {
        async fn create(
            &self,
            items: &[StagedItem],
            pin: Option<&str>,
            auto_accept: bool,
        ) -> Result<SessionGrant> {
            self.create_calls.fetch_add(1, Ordering::SeqCst);
            *self.last_create.lock().unwrap() =
                Some((items.len(), pin.map(String::from), auto_accept));
            if self.fail_create.load(Ordering::SeqCst) {
                return Err(Error::Backend {
                    message: "session limit reached".to_string(),
                });
            }
            Ok(SessionGrant {
                session_id: "sess-1".to_string(),
                download_url: "http://192.168.1.2:53317/share/sess-1".to_string(),
            })
        }

        async fn close(&self, _session_id: &str) -> Result<()> {
            self.close_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_close.load(Ordering::SeqCst) {
                return Err(Error::Transport("connection refused".to_string()));
            }
            Ok(())
        }
    }

    struct Fixture {
        manager: ShareSessionManager,
        api: Arc<FakeSessionApi>,
        probe: Arc<FakeProbe>,
        clock: Arc<ManualClock>,
        rx: tokio::sync::mpsc::UnboundedReceiver<Notice>,
    }

    fn fixture() -> Fixture {
        let api = Arc::new(FakeSessionApi::default());
        let probe = Arc::new(FakeProbe(AtomicBool::new(true)));
        let clock = ManualClock::at(1_700_000_000_000);
        let (notices, rx) = NoticeSender::channel();
        let manager = ShareSessionManager::new(
            Arc::clone(&api) as Arc<dyn SessionApi>,
            Arc::clone(&probe) as Arc<dyn BackendProbe>,
            Arc::clone(&clock) as Arc<dyn Clock>,
            notices,
        );
        Fixture {
            manager,
            api,
            probe,
            clock,
            rx,
        }
    }

    fn items(n: usize) -> Vec<StagedItem> {
        (0..n)
            .map(|i| StagedItem::file(format!("/tmp/file-{i}.txt")))
            .collect()
    }

    #[test]
    fn test_expiry_boundary() {
        let session = ShareLinkSession {
            session_id: "s".to_string(),
            download_url: "u".to_string(),
            created_at: 1_000,
        };
        assert!(!session.is_expired(1_000 + SESSION_TTL_MS - 1));
        assert!(session.is_expired(1_000 + SESSION_TTL_MS));
        assert!(session.is_expired(1_000 + SESSION_TTL_MS + 1));

        assert_eq!(session.remaining_ms(1_000), SESSION_TTL_MS);
        assert_eq!(session.remaining_ms(1_000 + SESSION_TTL_MS + 500), 0);
        // A clock stepping backwards never inflates the remaining time
        assert_eq!(session.remaining_ms(0), SESSION_TTL_MS);
    }

    #[tokio::test]
    async fn test_stage_pending_rejects_empty_set() {
        let mut fx = fixture();
        let err = fx.manager.stage_pending(Vec::new()).await.unwrap_err();
        assert!(matches!(err, Error::NothingStaged));
        assert_eq!(fx.manager.phase(), SharePhase::Idle);
    }

    #[tokio::test]
    async fn test_stage_pending_rejects_backend_down() {
        let mut fx = fixture();
        fx.probe.0.store(false, Ordering::SeqCst);
        let err = fx.manager.stage_pending(items(2)).await.unwrap_err();
        assert!(matches!(err, Error::BackendNotRunning));
        assert_eq!(fx.manager.phase(), SharePhase::Idle);
        assert_eq!(fx.api.create_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_stage_pending_reentrant_replaces_snapshot() {
        let mut fx = fixture();
        fx.manager.stage_pending(items(2)).await.unwrap();
        assert_eq!(fx.manager.pending().unwrap().items.len(), 2);

        fx.manager.stage_pending(items(5)).await.unwrap();
        assert_eq!(fx.manager.pending().unwrap().items.len(), 5);
        assert_eq!(fx.manager.phase(), SharePhase::Pending);
    }

    #[tokio::test]
    async fn test_create_session_requires_pending() {
        let mut fx = fixture();
        let err = fx.manager.create_session(None, true).await.unwrap_err();
        assert!(matches!(err, Error::NoPendingShare));
        assert_eq!(fx.api.create_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_create_session_success_consumes_pending() {
        let mut fx = fixture();
        fx.manager.stage_pending(items(3)).await.unwrap();
        let session = fx.manager.create_session(Some("1234"), false).await.unwrap();

        assert_eq!(fx.manager.phase(), SharePhase::Active);
        assert!(fx.manager.pending().is_none(), "pending must be consumed");
        assert_eq!(session.created_at, fx.clock.now_millis());
        assert_eq!(
            *fx.api.last_create.lock().unwrap(),
            Some((3, Some("1234".to_string()), false))
        );
    }

    #[tokio::test]
    async fn test_create_session_empty_pin_means_no_pin() {
        let mut fx = fixture();
        fx.manager.stage_pending(items(1)).await.unwrap();
        fx.manager.create_session(Some(""), true).await.unwrap();
        assert_eq!(*fx.api.last_create.lock().unwrap(), Some((1, None, true)));
    }

    #[tokio::test]
    async fn test_create_session_failure_stays_pending() {
        let mut fx = fixture();
        fx.manager.stage_pending(items(2)).await.unwrap();
        fx.api.fail_create.store(true, Ordering::SeqCst);

        let err = fx.manager.create_session(None, true).await.unwrap_err();
        assert_eq!(err.to_string(), "session limit reached");
        assert_eq!(fx.manager.phase(), SharePhase::Pending);
        assert!(fx.manager.session().is_none());
        assert_eq!(
            fx.rx.try_recv().unwrap(),
            Notice::Error("session limit reached".to_string())
        );
    }

    #[tokio::test]
    async fn test_stage_while_active_rejected() {
        let mut fx = fixture();
        fx.manager.stage_pending(items(1)).await.unwrap();
        fx.manager.create_session(None, true).await.unwrap();

        let err = fx.manager.stage_pending(items(1)).await.unwrap_err();
        assert!(matches!(err, Error::ShareAlreadyActive));
    }

    #[tokio::test]
    async fn test_cancel_pending() {
        let mut fx = fixture();
        assert!(matches!(
            fx.manager.cancel_pending().unwrap_err(),
            Error::NoPendingShare
        ));

        fx.manager.stage_pending(items(1)).await.unwrap();
        fx.manager.cancel_pending().unwrap();
        assert_eq!(fx.manager.phase(), SharePhase::Idle);
        assert_eq!(fx.api.create_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_close_session_clears_even_on_remote_failure() {
        let mut fx = fixture();
        fx.manager.stage_pending(items(1)).await.unwrap();
        fx.manager.create_session(None, true).await.unwrap();
        fx.api.fail_close.store(true, Ordering::SeqCst);

        let err = fx.manager.close_session().await.unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
        assert_eq!(
            fx.manager.phase(),
            SharePhase::Idle,
            "local state is gone regardless of the remote outcome"
        );
        assert!(matches!(fx.rx.try_recv().unwrap(), Notice::Error(_)));

        // Second close has nothing to act on
        assert!(matches!(
            fx.manager.close_session().await.unwrap_err(),
            Error::NoActiveSession
        ));
    }

    #[tokio::test]
    async fn test_close_session_success_notifies() {
        let mut fx = fixture();
        fx.manager.stage_pending(items(1)).await.unwrap();
        fx.manager.create_session(None, true).await.unwrap();

        fx.manager.close_session().await.unwrap();
        assert_eq!(fx.rx.try_recv().unwrap(), Notice::ShareEnded);
        assert_eq!(fx.api.close_calls.load(Ordering::SeqCst), 1);
    }

    struct FixedPin(Option<&'static str>);

    #[async_trait]
    impl PinPrompt for FixedPin {
        async fn request_pin(&self) -> Option<String> {
            self.0.map(String::from)
        }
    }

    #[tokio::test]
    async fn test_create_with_prompt_cancel_keeps_pending() {
        let mut fx = fixture();
        fx.manager.stage_pending(items(1)).await.unwrap();

        let out = fx
            .manager
            .create_session_with_prompt(&FixedPin(None), true)
            .await
            .unwrap();
        assert!(out.is_none());
        assert_eq!(fx.manager.phase(), SharePhase::Pending);
        assert_eq!(fx.api.create_calls.load(Ordering::SeqCst), 0);

        let out = fx
            .manager
            .create_session_with_prompt(&FixedPin(Some("9876")), true)
            .await
            .unwrap();
        assert!(out.is_some());
        assert_eq!(
            *fx.api.last_create.lock().unwrap(),
            Some((1, Some("9876".to_string()), true))
        );
    }

    struct RecordingClipboard {
        ok: bool,
        copied: std::sync::Mutex<Option<String>>,
    }

    impl ClipboardSink for RecordingClipboard {
        fn copy(&self, text: &str) -> bool {
            *self.copied.lock().unwrap() = Some(text.to_string());
            self.ok
        }
    }

    #[tokio::test]
    async fn test_copy_link() {
        let mut fx = fixture();
        let clipboard = RecordingClipboard {
            ok: true,
            copied: std::sync::Mutex::new(None),
        };
        assert!(matches!(
            fx.manager.copy_link(&clipboard).unwrap_err(),
            Error::NoActiveSession
        ));

        fx.manager.stage_pending(items(1)).await.unwrap();
        let session = fx.manager.create_session(None, true).await.unwrap();

        assert!(fx.manager.copy_link(&clipboard).unwrap());
        assert_eq!(
            clipboard.copied.lock().unwrap().as_deref(),
            Some(session.download_url.as_str())
        );
        assert_eq!(fx.rx.try_recv().unwrap(), Notice::LinkCopied);

        let failing = RecordingClipboard {
            ok: false,
            copied: std::sync::Mutex::new(None),
        };
        assert!(!fx.manager.copy_link(&failing).unwrap());
        assert!(fx.rx.try_recv().is_err(), "no notice on a failed copy");
    }

    #[tokio::test(start_paused = true)]
    async fn test_monitor_expires_session() {
        let mut fx = fixture();
        fx.manager.stage_pending(items(1)).await.unwrap();
        fx.manager.create_session(None, true).await.unwrap();

        // Well inside the TTL: several ticks pass, nothing happens.
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(fx.manager.phase(), SharePhase::Active);
        assert_eq!(fx.api.close_calls.load(Ordering::SeqCst), 0);

        // Cross the TTL on the logical clock; the next tick notices.
        fx.clock.advance(SESSION_TTL_MS + 1);
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert_eq!(fx.manager.phase(), SharePhase::Idle);
        assert_eq!(fx.api.close_calls.load(Ordering::SeqCst), 1);
        assert_eq!(fx.rx.try_recv().unwrap(), Notice::ShareExpired);
    }

    #[tokio::test(start_paused = true)]
    async fn test_monitor_swallows_close_failure() {
        let mut fx = fixture();
        fx.manager.stage_pending(items(1)).await.unwrap();
        fx.manager.create_session(None, true).await.unwrap();
        fx.api.fail_close.store(true, Ordering::SeqCst);

        fx.clock.advance(SESSION_TTL_MS + 1);
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert_eq!(fx.manager.phase(), SharePhase::Idle);
        // The only notice is the expiry itself; the failed cleanup is silent.
        assert_eq!(fx.rx.try_recv().unwrap(), Notice::ShareExpired);
        assert!(fx.rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_monitor_stops_after_user_close() {
        let mut fx = fixture();
        fx.manager.stage_pending(items(1)).await.unwrap();
        fx.manager.create_session(None, true).await.unwrap();
        fx.manager.close_session().await.unwrap();
        assert_eq!(fx.rx.try_recv().unwrap(), Notice::ShareEnded);

        // Long past the TTL: the aborted monitor must not fire again.
        fx.clock.advance(SESSION_TTL_MS * 2);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(fx.api.close_calls.load(Ordering::SeqCst), 1);
        assert!(fx.rx.try_recv().is_err());
    }
}
