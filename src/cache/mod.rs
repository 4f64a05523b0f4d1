//! Polled client-side copies of the account profile and wallet history.

pub mod entry;
pub mod poller;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::api::vaultpay::{AccountSnapshot, HistoryPage};
use crate::api::{ApiError, HttpTransport, VaultPayClient};

pub use entry::{CacheEntry, Fetcher, ResourceKey, Subscription};

/// Anything that can be told a cached resource is out of date
pub trait Invalidate: Send + Sync {
    fn invalidate(&self, key: ResourceKey);
}

struct ProfileFetcher<T> {
    client: Arc<VaultPayClient<T>>,
}

#[async_trait]
impl<T: HttpTransport> Fetcher<AccountSnapshot> for ProfileFetcher<T> {
    async fn fetch(&self) -> Result<AccountSnapshot, ApiError> {
        self.client.profile().await
    }
}

struct HistoryFetcher<T> {
    client: Arc<VaultPayClient<T>>,
}

#[async_trait]
impl<T: HttpTransport> Fetcher<HistoryPage> for HistoryFetcher<T> {
    async fn fetch(&self) -> Result<HistoryPage, ApiError> {
        self.client.history().await
    }
}

/// The two entries the dashboard reads from
pub struct DataCache {
    pub profile: CacheEntry<AccountSnapshot>,
    pub history: CacheEntry<HistoryPage>,
}

/// Both entries mounted; dropping it stops both pollers
pub struct DashboardMount {
    _profile: Subscription<AccountSnapshot>,
    _history: Subscription<HistoryPage>,
}

impl DataCache {
    pub fn new<T: HttpTransport + 'static>(client: Arc<VaultPayClient<T>>, interval: Duration) -> Self {
        Self {
            profile: CacheEntry::new(
                ResourceKey::AccountProfile,
                interval,
                Arc::new(ProfileFetcher {
                    client: client.clone(),
                }),
            ),
            history: CacheEntry::new(
                ResourceKey::TransactionHistory,
                interval,
                Arc::new(HistoryFetcher { client }),
            ),
        }
    }

    /// Drops both snapshots; nothing from an ended session may be shown to
    /// the next one
    pub fn reset(&self) {
        self.profile.reset();
        self.history.reset();
    }

    pub fn mount(&self) -> DashboardMount {
        DashboardMount {
            _profile: self.profile.subscribe(),
            _history: self.history.subscribe(),
        }
    }
}

impl Invalidate for DataCache {
    fn invalidate(&self, key: ResourceKey) {
        match key {
            ResourceKey::AccountProfile => self.profile.invalidate(),
            ResourceKey::TransactionHistory => self.history.invalidate(),
        }
    }
}
