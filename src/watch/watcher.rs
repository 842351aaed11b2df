// src/watch/watcher.rs

//! Per-subscriber poll scheduling and the poll cycle itself.
//!
//! Each subscriber gets exactly one recurring timer task. A task awaits
//! its own cycle before the next tick, so cycles for one subscriber never
//! overlap; a slow fetch for one subscriber never stalls another's timer.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::error::{AppError, Result};
use crate::models::{Config, Listing, SubscriberId};
use crate::notify::NotificationSink;
use crate::services::{ListingParser, PageFetcher};
use crate::store::SubscriptionStore;

use super::diff::diff;

/// Summary of one poll cycle.
#[derive(Debug, Clone)]
pub struct PollOutcome {
    /// When the page was fetched
    pub fetched_at: DateTime<Utc>,
    /// How many listings the page parsed into
    pub parsed: usize,
    /// Newly appeared listings, most-recent-first
    pub new_listings: Vec<Listing>,
}

/// Watches listing pages for a set of subscribers.
pub struct ListingWatcher {
    inner: Arc<Inner>,
}

impl Clone for ListingWatcher {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct Inner {
    poll_interval: Duration,
    parser: ListingParser,
    fetcher: Arc<dyn PageFetcher>,
    store: Arc<dyn SubscriptionStore>,
    sink: Arc<dyn NotificationSink>,
    /// One timer handle per scheduled subscriber
    timers: Mutex<HashMap<SubscriberId, JoinHandle<()>>>,
}

impl ListingWatcher {
    /// Create a watcher over the given fetch/store/notify collaborators.
    pub fn new(
        config: &Config,
        fetcher: Arc<dyn PageFetcher>,
        store: Arc<dyn SubscriptionStore>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                poll_interval: Duration::from_secs(config.watch.poll_interval_minutes * 60),
                parser: ListingParser::new(config.site.base_url.as_str()),
                fetcher,
                store,
                sink,
                timers: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Register (or re-target) a subscription and run one cycle right away.
    ///
    /// The recurring timer is started only when the subscriber was unknown;
    /// re-subscribing with a new URL re-targets the existing timer. The
    /// immediate first cycle for a brand-new subscription reports nothing —
    /// it establishes the baseline.
    pub async fn subscribe(&self, id: SubscriberId, target_url: &str) -> Result<PollOutcome> {
        let created = self.inner.store.subscribe(&id, target_url).await;
        if created {
            log::info!(
                "Scheduled {id} for {target_url} every {} s",
                self.inner.poll_interval.as_secs()
            );
            let handle = self.spawn_timer(id.clone());
            self.inner.timers.lock().await.insert(id.clone(), handle);
        } else {
            log::info!("Re-targeted {id} to {target_url}");
        }

        self.poll_once(&id).await
    }

    /// Run one poll cycle for a subscriber: fetch, parse, diff, notify,
    /// advance the baseline.
    ///
    /// Fetch failures abort the cycle with no state mutation. An empty
    /// parse ends the cycle without touching the baseline either, so a
    /// transient empty page cannot erase it.
    pub async fn poll_once(&self, id: &SubscriberId) -> Result<PollOutcome> {
        let inner = &self.inner;
        let subscription = inner
            .store
            .get(id)
            .await
            .ok_or_else(|| AppError::watch(id.to_string(), "unknown subscriber"))?;

        let html = inner.fetcher.fetch(&subscription.target_url).await?;
        let fetched_at = Utc::now();

        let listings = inner.parser.parse(&html);
        if listings.is_empty() {
            log::debug!("No listings parsed for {id}, keeping baseline");
            return Ok(PollOutcome {
                fetched_at,
                parsed: 0,
                new_listings: Vec::new(),
            });
        }

        let result = diff(&listings, subscription.last_seen_url.as_deref());
        for listing in &result.new_listings {
            inner.sink.notify(id, listing).await;
        }
        if let Some(next) = result.next_last_seen {
            inner.store.set_last_seen(id, next).await;
        }

        log::info!(
            "{id}: {} new of {} parsed",
            result.new_listings.len(),
            listings.len()
        );

        Ok(PollOutcome {
            fetched_at,
            parsed: listings.len(),
            new_listings: result.new_listings,
        })
    }

    /// Whether a recurring timer exists for this subscriber.
    pub async fn is_scheduled(&self, id: &SubscriberId) -> bool {
        self.inner.timers.lock().await.contains_key(id)
    }

    /// Number of scheduled subscribers.
    pub async fn scheduled_count(&self) -> usize {
        self.inner.timers.lock().await.len()
    }

    /// Abort all recurring poll tasks.
    ///
    /// The CLI lets timers live until process shutdown; this exists for
    /// embedders that tear the watcher down earlier.
    pub async fn shutdown(&self) {
        for (_, handle) in self.inner.timers.lock().await.drain() {
            handle.abort();
        }
    }

    fn spawn_timer(&self, id: SubscriberId) -> JoinHandle<()> {
        let watcher = self.clone();
        let period = self.inner.poll_interval;
        tokio::spawn(async move {
            // The subscribe call runs the first cycle inline; start the
            // recurring ticks one full period later.
            let mut ticker = time::interval_at(time::Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if let Err(error) = watcher.poll_once(&id).await {
                    log::warn!("Poll cycle for {id} failed: {error}");
                    watcher.inner.sink.cycle_failed(&id, &error).await;
                }
            }
        })
    }
}
