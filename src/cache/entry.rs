use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::{debug, warn};

use super::poller::{Poller, TickFuture};
use crate::api::ApiError;

/// Logical names of the polled resources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKey {
    AccountProfile,
    TransactionHistory,
}

impl ResourceKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKey::AccountProfile => "account-profile",
            ResourceKey::TransactionHistory => "transaction-history",
        }
    }
}

/// One authenticated read backing a cache entry
#[async_trait]
pub trait Fetcher<T>: Send + Sync {
    async fn fetch(&self) -> Result<T, ApiError>;
}

struct EntryState<T> {
    snapshot: Option<Arc<T>>,
    loading: bool,
    stale: bool,
    last_error: Option<String>,
    in_flight: bool,
    refetch_requested: bool,
    /// Bumped on every unmount; results from an older epoch are dropped
    mount_epoch: u64,
    subscribers: usize,
    poller: Option<Poller>,
}

struct EntryInner<T> {
    key: ResourceKey,
    interval: Duration,
    fetcher: Arc<dyn Fetcher<T>>,
    state: Mutex<EntryState<T>>,
    version: watch::Sender<u64>,
}

impl<T> EntryInner<T> {
    fn lock(&self) -> MutexGuard<'_, EntryState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Polled snapshot of one remote resource.
///
/// Cheap to clone; clones share the same snapshot. A failed fetch keeps the
/// previous snapshot in place. Fetches for one entry never overlap: a fetch
/// requested while another is running is folded into a single follow-up.
pub struct CacheEntry<T> {
    inner: Arc<EntryInner<T>>,
}

impl<T> Clone for CacheEntry<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Send + Sync + 'static> CacheEntry<T> {
    pub fn new(key: ResourceKey, interval: Duration, fetcher: Arc<dyn Fetcher<T>>) -> Self {
        let (version, _) = watch::channel(0);
        Self {
            inner: Arc::new(EntryInner {
                key,
                interval,
                fetcher,
                state: Mutex::new(EntryState {
                    snapshot: None,
                    loading: false,
                    stale: false,
                    last_error: None,
                    in_flight: false,
                    refetch_requested: false,
                    mount_epoch: 0,
                    subscribers: 0,
                    poller: None,
                }),
                version,
            }),
        }
    }

    pub fn key(&self) -> ResourceKey {
        self.inner.key
    }

    pub fn snapshot(&self) -> Option<Arc<T>> {
        self.inner.lock().snapshot.clone()
    }

    /// True only while the first fetch is pending and there is nothing to show
    pub fn is_loading(&self) -> bool {
        self.inner.lock().loading
    }

    pub fn is_stale(&self) -> bool {
        self.inner.lock().stale
    }

    pub fn last_error(&self) -> Option<String> {
        self.inner.lock().last_error.clone()
    }

    #[cfg(test)]
    pub fn is_mounted(&self) -> bool {
        self.inner.lock().subscribers > 0
    }

    /// Receiver that changes whenever a new snapshot is stored
    pub fn updates(&self) -> watch::Receiver<u64> {
        self.inner.version.subscribe()
    }

    pub async fn fetch(&self) {
        let mut epoch = {
            let mut state = self.inner.lock();
            if state.in_flight {
                state.refetch_requested = true;
                debug!("{}: fetch already in flight, queued a follow-up", self.inner.key.as_str());
                return;
            }
            state.in_flight = true;
            if state.snapshot.is_none() {
                state.loading = true;
            }
            state.mount_epoch
        };

        loop {
            let outcome = self.inner.fetcher.fetch().await;

            let again = {
                let mut state = self.inner.lock();
                if state.mount_epoch == epoch {
                    self.apply(&mut state, outcome);
                } else {
                    debug!("{}: discarding result fetched before unmount", self.inner.key.as_str());
                }

                if state.refetch_requested {
                    state.refetch_requested = false;
                    epoch = state.mount_epoch;
                    true
                } else {
                    state.in_flight = false;
                    state.loading = false;
                    false
                }
            };

            if !again {
                break;
            }
        }
    }

    fn apply(&self, state: &mut EntryState<T>, outcome: Result<T, ApiError>) {
        match outcome {
            Ok(value) => {
                state.snapshot = Some(Arc::new(value));
                state.stale = false;
                state.last_error = None;
                state.loading = false;
                self.inner.version.send_modify(|v| *v += 1);
            }
            Err(e) => {
                warn!("{}: fetch failed, keeping previous snapshot: {}", self.inner.key.as_str(), e);
                state.last_error = Some(e.to_string());
            }
        }
    }

    /// Marks the snapshot stale and starts a fetch right away, outside the
    /// polling schedule. Does not wait for the fetch.
    pub fn invalidate(&self) {
        self.inner.lock().stale = true;
        debug!("{}: invalidated", self.inner.key.as_str());

        let entry = self.clone();
        tokio::spawn(async move { entry.fetch().await });
    }

    /// Forgets the snapshot and any error, as on a fresh start. A fetch still
    /// on the wire is discarded when it lands.
    pub fn reset(&self) {
        let mut state = self.inner.lock();
        state.snapshot = None;
        state.last_error = None;
        state.stale = false;
        state.mount_epoch += 1;
        debug!("{}: cleared", self.inner.key.as_str());
    }

    /// Registers a consumer. The first consumer starts polling, dropping the
    /// last one stops it.
    pub fn subscribe(&self) -> Subscription<T> {
        let mut state = self.inner.lock();
        state.subscribers += 1;

        if state.subscribers == 1 {
            let entry = self.clone();
            state.poller = Some(Poller::start(
                self.inner.key.as_str(),
                self.inner.interval,
                move || {
                    let entry = entry.clone();
                    let tick: TickFuture = Box::pin(async move {
                        // Spawned so that stopping the poller never cancels a
                        // request that is already on the wire
                        let _ = tokio::spawn(async move { entry.fetch().await }).await;
                    });
                    tick
                },
            ));
        }

        Subscription {
            entry: self.clone(),
        }
    }

    fn unsubscribe(&self) {
        let poller = {
            let mut state = self.inner.lock();
            state.subscribers = state.subscribers.saturating_sub(1);
            if state.subscribers == 0 {
                state.mount_epoch += 1;
                state.poller.take()
            } else {
                None
            }
        };

        if poller.is_some() {
            debug!("{}: last consumer left, polling stopped", self.inner.key.as_str());
        }
        drop(poller);
    }
}

/// Keeps an entry mounted for as long as it lives
pub struct Subscription<T: Send + Sync + 'static> {
    entry: CacheEntry<T>,
}

impl<T: Send + Sync + 'static> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.entry.unsubscribe();
    }
}
