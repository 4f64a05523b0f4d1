use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

pub type TickFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Fixed-interval background task. The first tick fires immediately.
///
/// Ticks run one at a time: a slow tick delays the next one instead of
/// stacking up behind it. Stopping (or dropping) the poller prevents further
/// ticks.
pub struct Poller {
    name: &'static str,
    handle: Option<JoinHandle<()>>,
}

impl Poller {
    pub fn start<F>(name: &'static str, interval: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() -> TickFuture + Send + 'static,
    {
        debug!("Starting poller {} every {}ms", name, interval.as_millis());

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                on_tick().await;
            }
        });

        Self {
            name,
            handle: Some(handle),
        }
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!("Stopped poller {}", self.name);
        }
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}
