//! Timer-driven notification refresh.

use crate::api_client::ApiClient;
use gpms::notifications::NotificationStore;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Default poll cadence.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5_000);

/// Default page size for each fetch.
pub const DEFAULT_FETCH_LIMIT: usize = 50;

/// Notification poller.
///
/// Fetches once immediately on spawn, then on every interval tick.
/// Ticks that find no stored credential skip the network call; fetch
/// failures are logged and the next tick retries, with no backoff.
/// Ticks are serialized within one poller, so a slow fetch delays the
/// next one instead of racing it — a stale response can never
/// overwrite a newer one.
pub struct NotificationPoller {
    api: ApiClient,
    store: NotificationStore,
    interval: Duration,
    limit: usize,
}

impl NotificationPoller {
    pub fn new(api: ApiClient, store: NotificationStore) -> Self {
        Self {
            api,
            store,
            interval: DEFAULT_POLL_INTERVAL,
            limit: DEFAULT_FETCH_LIMIT,
        }
    }

    /// Override the tick interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Override the fetch page size.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Start polling.
    ///
    /// Each call owns an independent task; stopping one handle never
    /// affects another poller.
    pub fn spawn(self) -> PollerHandle {
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;

                if self.api.credentials().token().is_none() {
                    log::debug!("no credential present, skipping poll tick");
                    continue;
                }

                match self.api.fetch_notifications(self.limit).await {
                    Ok(batch) => self.store.replace_all(batch),
                    Err(e) => {
                        log::warn!("notification poll failed, retrying next tick: {e:#}");
                    }
                }
            }
        });
        PollerHandle { task }
    }
}

/// Stop handle for a running poller.
pub struct PollerHandle {
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Stop the poller. The timer ends and any in-flight fetch is
    /// dropped without touching the store.
    pub fn stop(&self) {
        self.task.abort();
    }

    /// Whether the poller task has ended.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
