//! Keyed query cache with subscriptions and selective invalidation.
//!
//! Entries are created on first read, refreshed through their registered
//! fetcher, marked stale by invalidation, and reclaimed only once they have
//! no subscribers and have idled past the gc window. Concurrent readers of
//! the same key share one in-flight fetch.
//!
//! Staleness policy: invalidation never clears `data`. Subscribed readers
//! keep seeing the previous value while the background refetch runs, so
//! filtered list views do not flicker through an empty state. The same
//! applies when a refetch fails - the previous data stays alongside the
//! error.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use futures::future::BoxFuture;
use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::api::ApiError;

use super::key::{InvalidationTarget, QueryKey};

pub type FetchResult = Result<Value, ApiError>;

/// Type-erased async producer of a remote value, stored per entry so
/// invalidation can refetch without the original caller.
pub type Fetcher = Arc<dyn Fn() -> BoxFuture<'static, FetchResult> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    Idle,
    Loading,
    Success,
    Error,
}

/// What a subscriber sees of an entry at one point in time.
#[derive(Debug, Clone)]
pub struct QuerySnapshot {
    pub status: QueryStatus,
    pub data: Option<Arc<Value>>,
    pub error: Option<ApiError>,
    pub last_updated: Option<DateTime<Utc>>,
    pub is_stale: bool,
}

impl QuerySnapshot {
    fn idle() -> Self {
        Self {
            status: QueryStatus::Idle,
            data: None,
            error: None,
            last_updated: None,
            is_stale: true,
        }
    }

    /// A terminal result for the entry's current staleness epoch.
    pub fn is_settled(&self) -> bool {
        !self.is_stale && matches!(self.status, QueryStatus::Success | QueryStatus::Error)
    }
}

/// Cache tuning knobs.
#[derive(Debug, Clone, Copy)]
pub struct CacheConfig {
    /// Age past which a successful entry is refetched on the next read.
    pub stale_after: Duration,
    /// How long a subscriber-less entry may idle before `gc` reclaims it.
    pub gc_idle: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            stale_after: Duration::minutes(60),
            gc_idle: Duration::minutes(5),
        }
    }
}

struct Entry {
    fetcher: Option<Fetcher>,
    status: QueryStatus,
    data: Option<Arc<Value>>,
    error: Option<ApiError>,
    last_updated: Option<DateTime<Utc>>,
    /// Bumped on every invalidation; identifies a staleness transition.
    epoch: u64,
    /// Epoch the in-flight fetch was started for, if one is running.
    fetching_epoch: Option<u64>,
    stale: bool,
    subscribers: usize,
    /// Set when the subscriber count drops to zero.
    released_at: Option<DateTime<Utc>>,
    tx: watch::Sender<QuerySnapshot>,
}

impl Entry {
    fn new() -> Self {
        let (tx, _rx) = watch::channel(QuerySnapshot::idle());
        Self {
            fetcher: None,
            status: QueryStatus::Idle,
            data: None,
            error: None,
            last_updated: None,
            epoch: 0,
            fetching_epoch: None,
            stale: true,
            subscribers: 0,
            released_at: None,
            tx,
        }
    }

    fn snapshot(&self) -> QuerySnapshot {
        QuerySnapshot {
            status: self.status,
            data: self.data.clone(),
            error: self.error.clone(),
            last_updated: self.last_updated,
            is_stale: self.stale,
        }
    }

    fn publish(&self) {
        self.tx.send_replace(self.snapshot());
    }

    fn is_fresh(&self, stale_after: Duration) -> bool {
        if self.stale || self.status != QueryStatus::Success {
            return false;
        }
        match self.last_updated {
            Some(at) => Utc::now() - at <= stale_after,
            None => false,
        }
    }
}

/// The query cache. Clone shares the same entry table; construct one at
/// application start and hand it to whatever needs it - there is no
/// implicit global instance.
#[derive(Clone)]
pub struct QueryCache {
    inner: Arc<CacheInner>,
}

struct CacheInner {
    entries: Mutex<HashMap<QueryKey, Entry>>,
    config: CacheConfig,
}

impl QueryCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                entries: Mutex::new(HashMap::new()),
                config,
            }),
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<QueryKey, Entry>> {
        // Entry state is plain data; a poisoned lock means a panic already
        // unwound mid-update elsewhere, and the table is still usable.
        self.inner
            .entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }

    /// Register a subscriber for `key`, keeping `fetcher` as the entry's
    /// refetch source, and kick off a fetch if the entry needs one.
    ///
    /// De-duplication: if a fetch for the entry's current staleness epoch
    /// is already in flight, the subscription attaches to it instead of
    /// starting another.
    pub fn subscribe(&self, key: QueryKey, fetcher: Fetcher) -> QuerySubscription {
        let rx = {
            let mut entries = self.entries();
            let entry = entries.entry(key.clone()).or_insert_with(Entry::new);
            entry.fetcher = Some(fetcher);
            entry.subscribers += 1;
            entry.released_at = None;
            self.ensure_fetch(&key, entry);
            entry.tx.subscribe()
        };
        QuerySubscription {
            key,
            cache: self.clone(),
            rx,
        }
    }

    /// Subscribe, await the settled result, unsubscribe.
    pub async fn read(&self, key: QueryKey, fetcher: Fetcher) -> Result<Arc<Value>, ApiError> {
        let mut subscription = self.subscribe(key, fetcher);
        subscription.ready().await
    }

    /// Current snapshot of a key without subscribing.
    pub fn peek(&self, key: &QueryKey) -> Option<QuerySnapshot> {
        self.entries().get(key).map(Entry::snapshot)
    }

    /// Mark every entry whose key matches `predicate` stale.
    ///
    /// Entries with active subscribers refetch immediately in the
    /// background, retaining their previous data meanwhile; entries
    /// without subscribers go lazily stale and refetch on next read.
    pub fn invalidate<P>(&self, predicate: P)
    where
        P: Fn(&QueryKey) -> bool,
    {
        let mut entries = self.entries();
        for (key, entry) in entries.iter_mut() {
            if !predicate(key) {
                continue;
            }
            debug!(key = %key, subscribers = entry.subscribers, "invalidating entry");
            entry.epoch += 1;
            entry.stale = true;
            if entry.subscribers > 0 {
                self.ensure_fetch(key, entry);
            }
            entry.publish();
        }
    }

    /// Invalidate everything a mutation declared it affects.
    pub fn invalidate_targets(&self, targets: &[InvalidationTarget]) {
        self.invalidate(|key| targets.iter().any(|t| t.matches(key)));
    }

    /// Reclaim entries that have had no subscribers for the configured
    /// idle window. Never touches entries with a fetch in flight.
    pub fn gc(&self) {
        let idle = self.inner.config.gc_idle;
        let now = Utc::now();
        let mut entries = self.entries();
        entries.retain(|key, entry| {
            let expired = entry.subscribers == 0
                && entry.fetching_epoch.is_none()
                && entry
                    .released_at
                    .map(|at| now - at >= idle)
                    .unwrap_or(false);
            if expired {
                debug!(key = %key, "evicting idle entry");
            }
            !expired
        });
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    fn unsubscribe(&self, key: &QueryKey) {
        let mut entries = self.entries();
        if let Some(entry) = entries.get_mut(key) {
            entry.subscribers = entry.subscribers.saturating_sub(1);
            if entry.subscribers == 0 {
                entry.released_at = Some(Utc::now());
            }
        }
    }

    /// Start a fetch for the entry's current epoch unless one is already
    /// in flight or the entry is still fresh.
    fn ensure_fetch(&self, key: &QueryKey, entry: &mut Entry) {
        if entry.fetching_epoch.is_some() || entry.is_fresh(self.inner.config.stale_after) {
            return;
        }
        let Some(fetcher) = entry.fetcher.clone() else {
            return;
        };
        let epoch = entry.epoch;
        entry.fetching_epoch = Some(epoch);
        entry.status = QueryStatus::Loading;
        entry.publish();
        debug!(key = %key, epoch, "starting fetch");

        let cache = self.clone();
        let key = key.clone();
        tokio::spawn(async move {
            let result = fetcher().await;
            cache.apply_result(&key, epoch, result);
        });
    }

    /// Store a completed fetch. If the entry was invalidated while the
    /// fetch was in flight, the result is kept but marked stale and, for
    /// subscribed entries, a fresh fetch starts immediately so readers are
    /// never left on doubly-stale data.
    fn apply_result(&self, key: &QueryKey, started_epoch: u64, result: FetchResult) {
        let mut entries = self.entries();
        let Some(entry) = entries.get_mut(key) else {
            // Evicted while fetching should not happen (gc skips in-flight
            // entries); drop the result if it somehow does.
            warn!(key = %key, "fetch completed for evicted entry");
            return;
        };

        entry.fetching_epoch = None;
        entry.last_updated = Some(Utc::now());
        match result {
            Ok(value) => {
                entry.status = QueryStatus::Success;
                entry.data = Some(Arc::new(value));
                entry.error = None;
            }
            Err(err) => {
                warn!(key = %key, error = %err, "fetch failed");
                entry.status = QueryStatus::Error;
                entry.error = Some(err);
                // Previous data retained: stale-while-error.
            }
        }

        if entry.epoch == started_epoch {
            entry.stale = false;
            entry.publish();
        } else {
            entry.stale = true;
            entry.publish();
            if entry.subscribers > 0 {
                self.ensure_fetch(key, entry);
            }
        }
    }
}

/// A live subscription to one cache entry.
///
/// Dropping the subscription decrements the entry's subscriber count; the
/// entry itself stays cached until gc reclaims it.
pub struct QuerySubscription {
    key: QueryKey,
    cache: QueryCache,
    rx: watch::Receiver<QuerySnapshot>,
}

impl QuerySubscription {
    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    /// The entry as of now.
    pub fn snapshot(&self) -> QuerySnapshot {
        self.rx.borrow().clone()
    }

    /// Wait for the next published change and return it.
    pub async fn changed(&mut self) -> Result<QuerySnapshot, ApiError> {
        self.rx
            .changed()
            .await
            .map_err(|_| ApiError::Network("cache entry dropped".to_string()))?;
        Ok(self.rx.borrow_and_update().clone())
    }

    /// Resolve with the settled result for the entry's current staleness
    /// epoch: fresh data on success, the typed failure on error.
    pub async fn ready(&mut self) -> Result<Arc<Value>, ApiError> {
        loop {
            let snapshot = self.rx.borrow_and_update().clone();
            if snapshot.is_settled() {
                match snapshot.status {
                    QueryStatus::Success => {
                        if let Some(data) = snapshot.data {
                            return Ok(data);
                        }
                    }
                    QueryStatus::Error => {
                        if let Some(error) = snapshot.error {
                            return Err(error);
                        }
                    }
                    _ => {}
                }
            }
            if self.rx.changed().await.is_err() {
                return Err(ApiError::Network("cache entry dropped".to_string()));
            }
        }
    }
}

impl Drop for QuerySubscription {
    fn drop(&mut self) {
        self.cache.unsubscribe(&self.key);
    }
}
