// SPDX-FileCopyrightText: © 2026 PrivKey LLC
// SPDX-License-Identifier: AGPL-3.0-or-later
#![forbid(unsafe_code)]

//! Shared, push-invalidated cache of the background's session state.
//!
//! The store keeps at most one snapshot and at most one fetch in flight.
//! Readers block only until the first snapshot exists; afterwards they always
//! get the resident one immediately. Revalidation is driven solely by
//! [`Notification::StateUpdated`] pushes (through [`SessionStore::listen`])
//! or by an explicit [`SessionStore::invalidate`].
//!
//! Invalidations that arrive while a fetch is running are folded into that
//! fetch. Whatever it resolves to becomes the snapshot, so a push that lands
//! after a slow fetch was already issued can be answered with the older state
//! until the next push.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::channel::{MessageChannel, Transport};
use crate::error::{Result, ThanosError};
use crate::protocol::{Mnemonic, Notification, Password, Request, Response, SessionState};

#[derive(Debug, Clone)]
enum Entry {
    Empty,
    Ready(Arc<SessionState>),
    Failed(Arc<ThanosError>),
}

struct Inner<T> {
    channel: MessageChannel<T>,
    entry: watch::Sender<Entry>,
    fetching: Mutex<bool>,
}

pub struct SessionStore<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for SessionStore<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Transport> SessionStore<T> {
    pub fn new(channel: MessageChannel<T>) -> Self {
        let (entry, _) = watch::channel(Entry::Empty);
        Self {
            inner: Arc::new(Inner {
                channel,
                entry,
                fetching: Mutex::new(false),
            }),
        }
    }

    pub fn channel(&self) -> &MessageChannel<T> {
        &self.inner.channel
    }

    /// The resident snapshot, without waiting for a fetch.
    pub fn snapshot(&self) -> Option<Arc<SessionState>> {
        match &*self.inner.entry.borrow() {
            Entry::Ready(state) => Some(Arc::clone(state)),
            Entry::Empty | Entry::Failed(_) => None,
        }
    }

    pub fn is_fetching(&self) -> bool {
        *self.inner.fetching.lock()
    }

    /// Returns the current snapshot, suspending until the first fetch
    /// resolves if none exists yet. Callers that wait on the same fetch all
    /// receive the same `Arc`.
    ///
    /// A failed first fetch reaches every waiter wrapped in
    /// [`ThanosError::Shared`]; match on [`ThanosError::root`] or use
    /// [`ThanosError::is_protocol_violation`] rather than the outer variant.
    /// Fails with [`ThanosError::Runtime`] when no fetch is running and none
    /// can be started outside a tokio runtime.
    pub async fn get_state(&self) -> Result<Arc<SessionState>> {
        let mut rx = self.inner.entry.subscribe();
        if let Entry::Ready(state) = &*rx.borrow_and_update() {
            return Ok(Arc::clone(state));
        }

        self.revalidate()?;

        loop {
            rx.changed()
                .await
                .map_err(|_| ThanosError::Runtime("Session store closed".into()))?;
            let outcome = match &*rx.borrow_and_update() {
                Entry::Ready(state) => Some(Ok(Arc::clone(state))),
                Entry::Failed(err) => Some(Err(ThanosError::Shared(Arc::clone(err)))),
                Entry::Empty => None,
            };
            if let Some(outcome) = outcome {
                return outcome;
            }
        }
    }

    /// Marks the snapshot stale and schedules a refetch, unless one is
    /// already running.
    pub fn invalidate(&self) {
        debug!("Session state invalidated");
        if let Err(e) = self.revalidate() {
            warn!(error = %e, "Cannot revalidate session state");
        }
    }

    /// Starts revalidating on every `StateUpdated` push until the returned
    /// guard is dropped. The push subscription is taken before this returns.
    pub fn listen(&self) -> Result<PushListener> {
        let handle = Handle::try_current()
            .map_err(|e| ThanosError::Runtime(format!("No async runtime for push listener: {e}")))?;

        let mut pushes = self.inner.channel.subscribe();
        let store = self.clone();
        let task = handle.spawn(async move {
            loop {
                match pushes.recv().await {
                    Ok(Notification::StateUpdated) => store.invalidate(),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Push listener lagged behind, revalidating");
                        store.invalidate();
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        debug!("Push channel closed");
                        break;
                    }
                }
            }
        });

        debug!("Push listener registered");
        Ok(PushListener { task })
    }

    fn revalidate(&self) -> Result<()> {
        let mut fetching = self.inner.fetching.lock();
        if *fetching {
            debug!("Revalidation already in flight, coalescing");
            return Ok(());
        }

        let handle = Handle::try_current().map_err(|e| {
            ThanosError::Runtime(format!("No async runtime for session state fetch: {e}"))
        })?;

        *fetching = true;
        drop(fetching);

        let guard = FetchGuard {
            inner: Some(Arc::clone(&self.inner)),
        };
        handle.spawn(async move {
            let result = match &guard.inner {
                Some(inner) => inner.fetch_state().await,
                None => return,
            };
            guard.finish(result);
        });
        Ok(())
    }

    pub async fn register_wallet(
        &self,
        password: impl Into<Password>,
        mnemonic: Option<Mnemonic>,
    ) -> Result<()> {
        let imported = mnemonic.is_some();
        let request = Request::NewWallet {
            password: password.into(),
            mnemonic,
        };
        match self.inner.channel.send(request).await? {
            Response::NewWallet => {
                info!(imported, "Wallet registered");
                Ok(())
            }
            _ => Err(ThanosError::ProtocolViolation),
        }
    }

    pub async fn unlock(&self, password: impl Into<Password>) -> Result<()> {
        let request = Request::Unlock {
            password: password.into(),
        };
        match self.inner.channel.send(request).await? {
            Response::Unlock => Ok(()),
            _ => Err(ThanosError::ProtocolViolation),
        }
    }

    pub async fn lock(&self) -> Result<()> {
        match self.inner.channel.send(Request::Lock).await? {
            Response::Lock => Ok(()),
            _ => Err(ThanosError::ProtocolViolation),
        }
    }

    pub async fn create_account(&self) -> Result<()> {
        match self.inner.channel.send(Request::CreateAccount).await? {
            Response::CreateAccount => Ok(()),
            _ => Err(ThanosError::ProtocolViolation),
        }
    }

    /// The mnemonic goes straight back to the caller and is never cached.
    pub async fn reveal_mnemonic(&self, password: impl Into<Password>) -> Result<Mnemonic> {
        let request = Request::RevealMnemonic {
            password: password.into(),
        };
        match self.inner.channel.send(request).await? {
            Response::RevealMnemonic { mnemonic } => Ok(mnemonic),
            _ => Err(ThanosError::ProtocolViolation),
        }
    }

    pub async fn edit_account_name(
        &self,
        account_index: usize,
        name: impl Into<String>,
    ) -> Result<()> {
        let request = Request::EditAccount {
            account_index,
            name: name.into(),
        };
        match self.inner.channel.send(request).await? {
            Response::EditAccount => Ok(()),
            _ => Err(ThanosError::ProtocolViolation),
        }
    }
}

impl<T: Transport> Inner<T> {
    async fn fetch_state(&self) -> Result<SessionState> {
        match self.channel.send(Request::GetState).await? {
            Response::GetState { state } => Ok(state),
            _ => Err(ThanosError::ProtocolViolation),
        }
    }

    fn install(&self, result: Result<SessionState>) {
        let mut fetching = self.fetching.lock();
        *fetching = false;

        match result {
            Ok(state) => {
                debug!(
                    status = ?state.status(),
                    accounts = state.accounts().len(),
                    "Session state refreshed"
                );
                self.entry.send_replace(Entry::Ready(Arc::new(state)));
            }
            Err(e) => {
                let has_snapshot = matches!(&*self.entry.borrow(), Entry::Ready(_));
                if has_snapshot {
                    warn!(error = %e, "Revalidation failed, keeping previous session state");
                } else {
                    warn!(error = %e, "Initial session state fetch failed");
                    self.entry.send_replace(Entry::Failed(Arc::new(e)));
                }
            }
        }
    }
}

/// Clears the in-flight flag even when the fetch task panics or is
/// cancelled, so later readers start a new fetch instead of waiting on a
/// dead one.
struct FetchGuard<T: Transport> {
    inner: Option<Arc<Inner<T>>>,
}

impl<T: Transport> FetchGuard<T> {
    fn finish(mut self, result: Result<SessionState>) {
        if let Some(inner) = self.inner.take() {
            inner.install(result);
        }
    }
}

impl<T: Transport> Drop for FetchGuard<T> {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.take() {
            warn!("Session state fetch ended without a result");
            inner.install(Err(ThanosError::Runtime(
                "Session state fetch aborted".into(),
            )));
        }
    }
}

/// Keeps a push subscription alive. Dropping it deregisters the listener.
pub struct PushListener {
    task: JoinHandle<()>,
}

impl PushListener {
    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }

    pub fn stop(self) {}
}

impl Drop for PushListener {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::pin::pin;
    use std::task::{Context, Poll, Wake, Waker};

    use crate::mock::MockBackground;

    struct NoopWaker;

    impl Wake for NoopWaker {
        fn wake(self: Arc<Self>) {}
    }

    #[test]
    fn test_get_state_without_runtime_fails() {
        let mock = Arc::new(MockBackground::with_unlocked_wallet("secret", 1));
        let store = SessionStore::new(MessageChannel::new(Arc::clone(&mock)));

        let waker = Waker::from(Arc::new(NoopWaker));
        let mut cx = Context::from_waker(&waker);
        let mut fut = pin!(store.get_state());

        match fut.as_mut().poll(&mut cx) {
            Poll::Ready(Err(ThanosError::Runtime(_))) => {}
            other => panic!("expected runtime error, got {other:?}"),
        }
        assert!(!store.is_fetching());
        assert_eq!(mock.state_requests(), 0);
    }

    #[test]
    fn test_invalidate_without_runtime_is_harmless() {
        let mock = Arc::new(MockBackground::new());
        let store = SessionStore::new(MessageChannel::new(mock));
        store.invalidate();
        assert!(!store.is_fetching());
        assert!(store.snapshot().is_none());
    }
}
