//! Process-wide session cache.
//!
//! The cache owns the only mutable session state in the client: the latest
//! [`Session`] value and the in-flight fetch bookkeeping. Overlapping fetches
//! are resolved by epoch stamping, not locking: every fetch is stamped with
//! the epoch it was started in, and a result whose stamp no longer matches
//! the current epoch is dropped on arrival.

use std::sync::{Arc, Mutex};

use thiserror::Error;
use tokio::sync::watch;

use prestige_core::Session;

use crate::source::{FetchError, FetchOutcome, ProfileSource};

/// Failure surfaced by [`SessionCache::ensure_loaded`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The underlying fetch failed; the session stays `Unknown` and the
    /// caller may retry.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The cache was invalidated while this call was waiting; the awaited
    /// fetch belongs to a dead epoch.
    #[error("session cache invalidated while a fetch was pending")]
    Superseded,
}

#[derive(Debug)]
struct CacheState {
    /// Bumped on every invalidation; stamps fetches and their results.
    epoch: u64,
    /// Whether the current epoch has a definite outcome.
    resolved: bool,
    /// Whether a fetch is currently running for the current epoch.
    inflight: bool,
}

/// Latest fetch resolution, stamped with its epoch. `result: None` marks an
/// epoch (or fetch attempt) with no outcome yet. Used to wake
/// `ensure_loaded` waiters.
#[derive(Debug, Clone)]
struct FetchSlot {
    epoch: u64,
    result: Option<Result<Session, SessionError>>,
}

/// Shared cache of the current session.
///
/// One instance per running client; create it lazily on first use and clone
/// the handle everywhere (clones share state). Consumers subscribe via
/// [`observe`](Self::observe); gates and account flows drive resolution via
/// [`ensure_loaded`](Self::ensure_loaded) and [`invalidate`](Self::invalidate).
#[derive(Clone)]
pub struct SessionCache {
    inner: Arc<Inner>,
}

struct Inner {
    source: Arc<dyn ProfileSource>,
    state: Mutex<CacheState>,
    /// Replay-of-one stream of session values for consumers.
    sessions: watch::Sender<Session>,
    /// Completion signal for `ensure_loaded` waiters.
    slots: watch::Sender<FetchSlot>,
}

impl SessionCache {
    pub fn new(source: Arc<dyn ProfileSource>) -> Self {
        let (sessions, _) = watch::channel(Session::Unknown);
        let (slots, _) = watch::channel(FetchSlot {
            epoch: 0,
            result: None,
        });
        Self {
            inner: Arc::new(Inner {
                source,
                state: Mutex::new(CacheState {
                    epoch: 0,
                    resolved: false,
                    inflight: false,
                }),
                sessions,
                slots,
            }),
        }
    }

    /// Synchronous snapshot of the last known session.
    ///
    /// Never blocks and never triggers a fetch; may return `Unknown`.
    pub fn current_session(&self) -> Session {
        self.inner.sessions.borrow().clone()
    }

    /// Subscribe to the session stream.
    ///
    /// The receiver immediately holds the latest known value and then sees
    /// every subsequent change; dropping it has no other side effect. The
    /// first subscription in an unresolved epoch starts the shared fetch;
    /// further subscribers attach to it.
    pub fn observe(&self) -> watch::Receiver<Session> {
        let rx = self.inner.sessions.subscribe();
        self.start_fetch_if_idle();
        rx
    }

    /// Resolve the current epoch's session.
    ///
    /// Starts the fetch if none is running, joins it if one is, and returns
    /// immediately if the epoch is already resolved. Never starts a second
    /// concurrent fetch. A transient or malformed fetch failure is returned
    /// as [`SessionError::Fetch`] and leaves the session `Unknown`; "no
    /// session" resolves normally to `Unauthenticated`.
    pub async fn ensure_loaded(&self) -> Result<Session, SessionError> {
        let epoch = {
            let state = self.inner.state.lock().unwrap();
            if state.resolved {
                return Ok(self.inner.sessions.borrow().clone());
            }
            state.epoch
        };

        self.start_fetch_if_idle();

        let mut slots = self.inner.slots.subscribe();
        loop {
            {
                let slot = slots.borrow_and_update();
                if slot.epoch > epoch {
                    return Err(SessionError::Superseded);
                }
                if slot.epoch == epoch {
                    if let Some(result) = slot.result.clone() {
                        return result;
                    }
                }
            }
            if slots.changed().await.is_err() {
                return Err(SessionError::Superseded);
            }
        }
    }

    /// Begin a new epoch.
    ///
    /// Resets the session to `Unknown` (published to all subscribers) and
    /// discards the in-flight fetch: its result, when it eventually arrives,
    /// carries the old epoch stamp and is dropped. The underlying network
    /// request is not cancelled. Called after login, logout or an explicit
    /// refresh; the next `observe`/`ensure_loaded` starts the new fetch.
    pub fn invalidate(&self) {
        let epoch = {
            let mut state = self.inner.state.lock().unwrap();
            state.epoch += 1;
            state.resolved = false;
            state.inflight = false;
            let epoch = state.epoch;
            self.inner.sessions.send_replace(Session::Unknown);
            self.inner.slots.send_replace(FetchSlot {
                epoch,
                result: None,
            });
            epoch
        };
        tracing::debug!(epoch, "session cache invalidated");
    }

    /// Start a fetch for the current epoch unless it is resolved or one is
    /// already running.
    fn start_fetch_if_idle(&self) {
        let epoch = {
            let mut state = self.inner.state.lock().unwrap();
            if state.resolved || state.inflight {
                return;
            }
            state.inflight = true;
            // A stale error from a previous attempt in this epoch must not
            // satisfy waiters of the new attempt.
            self.inner.slots.send_replace(FetchSlot {
                epoch: state.epoch,
                result: None,
            });
            state.epoch
        };

        tracing::debug!(epoch, "starting profile fetch");
        let inner = Arc::clone(&self.inner);
        // Spawned so that a caller dropping out of `ensure_loaded` never
        // cancels the fetch other subscribers are waiting on.
        tokio::spawn(async move {
            let outcome = inner.source.fetch_profile().await;
            inner.apply_outcome(epoch, outcome);
        });
    }
}

impl Inner {
    /// Apply a fetch result stamped with `epoch`, dropping it if the epoch
    /// has moved on.
    fn apply_outcome(&self, epoch: u64, outcome: Result<FetchOutcome, FetchError>) {
        let mut state = self.state.lock().unwrap();
        if state.epoch != epoch {
            tracing::debug!(
                stale_epoch = epoch,
                current_epoch = state.epoch,
                "discarding profile fetch result from a dead epoch"
            );
            return;
        }
        state.inflight = false;

        let result = match outcome {
            Ok(FetchOutcome::Profile(profile)) => {
                state.resolved = true;
                let session = Session::Authenticated(profile);
                self.sessions.send_replace(session.clone());
                Ok(session)
            }
            Ok(FetchOutcome::NoSession) => {
                state.resolved = true;
                self.sessions.send_replace(Session::Unauthenticated);
                Ok(Session::Unauthenticated)
            }
            Err(err) => {
                match &err {
                    FetchError::Transient(reason) => {
                        tracing::warn!(%reason, "profile fetch failed; session stays unresolved");
                    }
                    FetchError::Malformed(reason) => {
                        tracing::error!(%reason, "profile payload could not be interpreted");
                    }
                }
                Err(SessionError::Fetch(err))
            }
        };

        self.slots.send_replace(FetchSlot {
            epoch,
            result: Some(result),
        });
    }
}

impl std::fmt::Debug for SessionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.lock().unwrap();
        f.debug_struct("SessionCache")
            .field("epoch", &state.epoch)
            .field("resolved", &state.resolved)
            .field("inflight", &state.inflight)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tokio::sync::oneshot;

    use prestige_core::{Profile, Role, UserId};

    use super::*;

    /// Profile source whose calls resolve only when the test says so.
    ///
    /// Each expected call gets a oneshot; the test resolves them in any
    /// order, which is how late stale-epoch arrivals are simulated.
    struct ManualSource {
        calls: AtomicUsize,
        pending: Mutex<VecDeque<oneshot::Receiver<Result<FetchOutcome, FetchError>>>>,
    }

    impl ManualSource {
        fn with_calls(
            n: usize,
        ) -> (
            Arc<Self>,
            Vec<oneshot::Sender<Result<FetchOutcome, FetchError>>>,
        ) {
            let mut senders = Vec::with_capacity(n);
            let mut receivers = VecDeque::with_capacity(n);
            for _ in 0..n {
                let (tx, rx) = oneshot::channel();
                senders.push(tx);
                receivers.push_back(rx);
            }
            (
                Arc::new(Self {
                    calls: AtomicUsize::new(0),
                    pending: Mutex::new(receivers),
                }),
                senders,
            )
        }

        /// Source whose scripted outcomes resolve as soon as they are fetched.
        fn ready(outcomes: Vec<Result<FetchOutcome, FetchError>>) -> Arc<Self> {
            let (source, senders) = Self::with_calls(outcomes.len());
            for (tx, outcome) in senders.into_iter().zip(outcomes) {
                tx.send(outcome).unwrap();
            }
            source
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ProfileSource for ManualSource {
        async fn fetch_profile(&self) -> Result<FetchOutcome, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let rx = self
                .pending
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected profile fetch");
            rx.await.expect("test dropped the fetch script")
        }
    }

    fn ana() -> Profile {
        Profile::new(UserId::new(), "Ana", Role::User)
    }

    async fn settle() {
        for _ in 0..16 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn current_session_never_triggers_a_fetch() {
        let (source, _senders) = ManualSource::with_calls(0);
        let cache = SessionCache::new(source.clone());

        assert_eq!(cache.current_session(), Session::Unknown);
        settle().await;
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn concurrent_ensure_loaded_calls_share_one_fetch() {
        let profile = ana();
        let source = ManualSource::ready(vec![Ok(FetchOutcome::Profile(profile.clone()))]);
        let cache = SessionCache::new(source.clone());

        let (a, b, c, d) = tokio::join!(
            cache.ensure_loaded(),
            cache.ensure_loaded(),
            cache.ensure_loaded(),
            cache.ensure_loaded(),
        );
        let expected = Session::Authenticated(profile);
        assert_eq!(a.unwrap(), expected);
        assert_eq!(b.unwrap(), expected);
        assert_eq!(c.unwrap(), expected);
        assert_eq!(d.unwrap(), expected);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn late_subscriber_replays_the_resolved_value() {
        let profile = ana();
        let source = ManualSource::ready(vec![Ok(FetchOutcome::Profile(profile.clone()))]);
        let cache = SessionCache::new(source.clone());

        cache.ensure_loaded().await.unwrap();

        // Subscribes after resolution; must see the value immediately.
        let rx = cache.observe();
        assert_eq!(*rx.borrow(), Session::Authenticated(profile));
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn observers_see_unknown_then_the_resolved_value() {
        let profile = ana();
        let (source, mut senders) = ManualSource::with_calls(1);
        let cache = SessionCache::new(source.clone());

        let mut rx1 = cache.observe();
        let mut rx2 = cache.observe();
        assert_eq!(*rx1.borrow(), Session::Unknown);
        assert_eq!(*rx2.borrow(), Session::Unknown);

        senders
            .remove(0)
            .send(Ok(FetchOutcome::Profile(profile.clone())))
            .unwrap();

        rx1.changed().await.unwrap();
        rx2.changed().await.unwrap();
        assert_eq!(*rx1.borrow(), Session::Authenticated(profile.clone()));
        assert_eq!(*rx2.borrow(), Session::Authenticated(profile));
        assert_eq!(source.calls(), 1, "observers must share one fetch");
    }

    #[tokio::test]
    async fn stale_epoch_result_is_discarded() {
        let old = Profile::new(UserId::new(), "Old", Role::Admin);
        let new = Profile::new(UserId::new(), "New", Role::User);
        let (source, mut senders) = ManualSource::with_calls(2);
        let cache = SessionCache::new(source.clone());

        // Fetch A starts in epoch 0.
        let waiter = {
            let cache = cache.clone();
            tokio::spawn(async move { cache.ensure_loaded().await })
        };
        settle().await;
        assert_eq!(source.calls(), 1);

        // Invalidate, then fetch B starts in epoch 1 and resolves first.
        cache.invalidate();
        let tx_a = senders.remove(0);
        let tx_b = senders.remove(0);

        let loaded = {
            let cache = cache.clone();
            tokio::spawn(async move { cache.ensure_loaded().await })
        };
        settle().await;
        assert_eq!(source.calls(), 2);

        tx_b.send(Ok(FetchOutcome::Profile(new.clone()))).unwrap();
        assert_eq!(
            loaded.await.unwrap().unwrap(),
            Session::Authenticated(new.clone())
        );

        // A resolves late, stamped with the dead epoch: dropped on arrival.
        tx_a.send(Ok(FetchOutcome::Profile(old))).unwrap();
        settle().await;
        assert_eq!(cache.current_session(), Session::Authenticated(new));

        // The epoch-0 waiter was superseded, not fed the stale value.
        assert_eq!(waiter.await.unwrap(), Err(SessionError::Superseded));
    }

    #[tokio::test]
    async fn no_session_resolves_to_unauthenticated_not_an_error() {
        let source = ManualSource::ready(vec![Ok(FetchOutcome::NoSession)]);
        let cache = SessionCache::new(source);

        assert_eq!(cache.ensure_loaded().await.unwrap(), Session::Unauthenticated);
        assert_eq!(cache.current_session(), Session::Unauthenticated);
    }

    #[tokio::test]
    async fn transient_failure_is_surfaced_but_never_cached() {
        let profile = ana();
        let source = ManualSource::ready(vec![
            Err(FetchError::Transient("connection reset".into())),
            Ok(FetchOutcome::Profile(profile.clone())),
        ]);
        let cache = SessionCache::new(source.clone());

        let err = cache.ensure_loaded().await.unwrap_err();
        assert!(matches!(err, SessionError::Fetch(FetchError::Transient(_))));
        // A failure must not masquerade as "no session".
        assert_eq!(cache.current_session(), Session::Unknown);

        // Plain retry within the same epoch succeeds.
        assert_eq!(
            cache.ensure_loaded().await.unwrap(),
            Session::Authenticated(profile)
        );
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn malformed_payload_behaves_like_a_transient_failure() {
        let source = ManualSource::ready(vec![Err(FetchError::Malformed(
            "missing field `role`".into(),
        ))]);
        let cache = SessionCache::new(source);

        let err = cache.ensure_loaded().await.unwrap_err();
        assert!(matches!(err, SessionError::Fetch(FetchError::Malformed(_))));
        assert_eq!(cache.current_session(), Session::Unknown);
    }

    #[tokio::test]
    async fn invalidate_resets_subscribers_to_unknown() {
        let profile = ana();
        let source = ManualSource::ready(vec![Ok(FetchOutcome::Profile(profile.clone()))]);
        let cache = SessionCache::new(source);

        cache.ensure_loaded().await.unwrap();
        let mut rx = cache.observe();
        assert_eq!(*rx.borrow(), Session::Authenticated(profile));

        cache.invalidate();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), Session::Unknown);
    }

    #[tokio::test]
    async fn resolved_epoch_serves_snapshots_without_refetching() {
        let source = ManualSource::ready(vec![Ok(FetchOutcome::NoSession)]);
        let cache = SessionCache::new(source.clone());

        cache.ensure_loaded().await.unwrap();
        cache.ensure_loaded().await.unwrap();
        let _ = cache.observe();
        settle().await;
        assert_eq!(source.calls(), 1);
    }
}
