use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::api::vaultpay::{AccountSnapshot, HistoryPage};
use crate::api::{HttpTransport, ReqwestTransport, VaultPayClient};
use crate::cache::{CacheEntry, DashboardMount, DataCache};
use crate::config::Config;
use crate::services::auth_service::AuthService;
use crate::services::balance_service::{format_balance, BalanceTracker};
use crate::services::transfer_service::TransferController;
use crate::session::{FileSessionStore, Route, Router, SessionGuard, SessionStore};

pub type Transport = SessionGuard<Arc<dyn HttpTransport>>;

const STILL_LOADING: &str = "Account details are still loading. Please try again.";

/// Everything the console needs, wired once at startup
pub struct App {
    pub config: Config,
    pub router: Arc<Router>,
    pub cache: Arc<DataCache>,
    pub auth: AuthService<Transport>,
    pub transfers: TransferController<Transport>,
    dashboard: Mutex<Option<DashboardMount>>,
    watcher: Mutex<Option<JoinHandle<()>>>,
}

impl App {
    pub fn new(config: Config) -> Arc<Self> {
        let store = Arc::new(FileSessionStore::new(&config.session_file));
        let transport = Arc::new(ReqwestTransport::new(&config.api_url));
        Self::with_parts(config, store, transport)
    }

    pub fn with_parts(
        config: Config,
        store: Arc<dyn SessionStore>,
        transport: Arc<dyn HttpTransport>,
    ) -> Arc<Self> {
        let initial = if store.get().is_some() {
            Route::Dashboard
        } else {
            Route::Login
        };
        let router = Arc::new(Router::new(initial));

        let guard = SessionGuard::new(transport, store.clone(), router.clone());
        let client = Arc::new(VaultPayClient::new(guard));
        let cache = Arc::new(DataCache::new(client.clone(), config.poll_interval));

        Arc::new(App {
            auth: AuthService::new(client.clone(), store, router.clone()),
            transfers: TransferController::new(client, cache.clone()),
            config,
            router,
            cache,
            dashboard: Mutex::new(None),
            watcher: Mutex::new(None),
        })
    }

    /// Mounts the dashboard pollers whenever the dashboard is the current view
    /// and unmounts them as soon as it is left
    pub fn start(self: &Arc<Self>) {
        let app = self.clone();
        let mut routes = self.router.subscribe();

        tokio::spawn(async move {
            let route = *routes.borrow_and_update();
            app.apply_route(route).await;

            while routes.changed().await.is_ok() {
                let route = *routes.borrow_and_update();
                app.apply_route(route).await;
            }
        });
    }

    async fn apply_route(&self, route: Route) {
        let mut dashboard = self.dashboard.lock().await;
        match route {
            Route::Dashboard => {
                if dashboard.is_none() {
                    debug!("Mounting dashboard");
                    *dashboard = Some(self.cache.mount());
                }
            }
            Route::Login | Route::Register => {
                if dashboard.take().is_some() {
                    debug!("Unmounting dashboard");
                    self.cache.reset();
                    self.transfers.close();
                    self.stop_watch().await;
                    println!("🔒 Signed out. Use `login <email> <password>` to continue.");
                }
            }
        }
    }

    pub fn require_dashboard(&self) -> Result<(), String> {
        if self.router.current() == Route::Dashboard {
            Ok(())
        } else {
            Err("Please log in first: `login <email> <password>`".to_string())
        }
    }

    async fn latest<T: Send + Sync + 'static>(entry: &CacheEntry<T>) -> Result<Arc<T>, String> {
        if let Some(snapshot) = entry.snapshot() {
            return Ok(snapshot);
        }
        entry.fetch().await;
        entry.snapshot().ok_or_else(|| match entry.last_error() {
            Some(e) if !entry.is_loading() => {
                format!("Could not load {}: {}", entry.key().as_str(), e)
            }
            _ => STILL_LOADING.to_string(),
        })
    }

    pub async fn profile(&self) -> Result<Arc<AccountSnapshot>, String> {
        Self::latest(&self.cache.profile).await
    }

    pub async fn history(&self) -> Result<Arc<HistoryPage>, String> {
        Self::latest(&self.cache.history).await
    }

    pub async fn known_balance(&self) -> Result<Decimal, String> {
        Ok(self.profile().await?.wallet_balance)
    }

    /// Prints balance moves and new transactions as the pollers bring them in
    pub async fn start_watch(&self) -> bool {
        let mut watcher = self.watcher.lock().await;
        if watcher.as_ref().is_some_and(|h| !h.is_finished()) {
            return false;
        }

        let profile = self.cache.profile.clone();
        let history = self.cache.history.clone();
        let mut profile_updates = profile.updates();
        let mut history_updates = history.updates();

        *watcher = Some(tokio::spawn(async move {
            let mut tracker = BalanceTracker::new();
            let mut seen_transactions: Option<usize> = None;

            loop {
                tokio::select! {
                    changed = profile_updates.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        if let Some(snapshot) = profile.snapshot() {
                            let trend = tracker.observe(snapshot.wallet_balance);
                            println!("💰 {}", format_balance(snapshot.wallet_balance, trend));
                        }
                    }
                    changed = history_updates.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        if let Some(page) = history.snapshot() {
                            let count = page.results.len();
                            if let Some(previous) = seen_transactions {
                                if count > previous {
                                    println!("📋 {} new transaction(s), see `history`", count - previous);
                                }
                            }
                            seen_transactions = Some(count);
                        }
                    }
                }
            }
        }));

        info!("Live updates on");
        true
    }

    pub async fn stop_watch(&self) -> bool {
        match self.watcher.lock().await.take() {
            Some(handle) => {
                handle.abort();
                info!("Live updates off");
                true
            }
            None => false,
        }
    }
}
