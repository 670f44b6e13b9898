//! Process-wide query cache.
//!
//! Maps a [`QueryKey`] to cached data, staleness metadata and the single
//! in-flight fetch for that key. Concurrent reads of one key share one
//! fetch.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use futures_util::FutureExt;
use lru::LruCache;
use planhaus_core::cache::{any_filter_matches, QueryFilter, QueryKey};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::entry::{AnyData, Entry, InFlight, QueryState, QueryStatus, SharedFetch};
use super::retry::{run_with_retry, RetryPolicy};
use crate::error::{ClientError, Result};
use crate::http::with_cancel;

const EVENT_CAPACITY: usize = 256;

/// Per-query settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    /// How long fetched data is served without refetching.
    pub stale_time: Duration,
    /// How long an unobserved entry survives `gc_expired`.
    pub gc_time: Duration,
    pub retry: RetryPolicy,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            stale_time: Duration::ZERO,
            gc_time: Duration::from_secs(300),
            retry: RetryPolicy::default(),
        }
    }
}

impl QueryOptions {
    pub fn with_stale_time(mut self, stale_time: Duration) -> Self {
        self.stale_time = stale_time;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

/// What `invalidate` does with matching entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InvalidateMode {
    /// Keep the data but refetch on the next read.
    #[default]
    MarkStale,
    /// Drop the entries entirely.
    Remove,
}

/// Change notifications for observers of the cache.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheEvent {
    Updated(QueryKey),
    Failed(QueryKey, ClientError),
    Invalidated(QueryKey),
    Removed(QueryKey),
}

/// Shared handle to the query cache. Clones refer to the same cache.
#[derive(Clone)]
pub struct QueryCache {
    inner: Arc<CacheInner>,
}

struct CacheInner {
    entries: Mutex<LruCache<QueryKey, Entry>>,
    max_entries: usize,
    defaults: QueryOptions,
    events: broadcast::Sender<CacheEvent>,
    next_fetch_id: AtomicU64,
}

impl CacheInner {
    fn entries(&self) -> MutexGuard<'_, LruCache<QueryKey, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: CacheEvent) {
        // No receivers is fine.
        let _ = self.events.send(event);
    }

    /// Evicts least recently used entries beyond the capacity, skipping
    /// observed or fetching ones.
    fn enforce_capacity(&self, entries: &mut LruCache<QueryKey, Entry>) {
        while entries.len() > self.max_entries {
            let victim = entries
                .iter()
                .rev()
                .find(|(_, entry)| !entry.is_pinned())
                .map(|(key, _)| key.clone());
            let Some(key) = victim else {
                warn!(len = entries.len(), "Query cache over capacity, every entry is in use");
                return;
            };
            entries.pop(&key);
            debug!(%key, "Evicted query");
            self.emit(CacheEvent::Removed(key));
        }
    }

    /// Stores the result of fetch `id`, unless the entry moved on to another
    /// fetch or was removed meanwhile.
    fn settle(&self, key: &QueryKey, id: u64, result: Result<AnyData>) {
        let mut entries = self.entries();
        let Some(entry) = entries.peek_mut(key) else {
            return;
        };
        if entry.in_flight.as_ref().map(|f| f.id) != Some(id) {
            debug!(%key, "Discarding result of a detached fetch");
            return;
        }
        let event = match &result {
            Ok(_) => CacheEvent::Updated(key.clone()),
            Err(e) => CacheEvent::Failed(key.clone(), e.clone()),
        };
        entry.settle(result);
        drop(entries);
        self.emit(event);
    }

    fn set_retry_count(&self, key: &QueryKey, id: u64, retries: u32) {
        let mut entries = self.entries();
        if let Some(entry) = entries.peek_mut(key) {
            if entry.in_flight.as_ref().map(|f| f.id) == Some(id) {
                entry.retry_count = retries;
            }
        }
    }
}

/// One caller's claim on an in-flight fetch. When the last claim is dropped
/// before the fetch finishes, the fetch is abandoned.
struct Waiter {
    cache: Weak<CacheInner>,
    key: QueryKey,
    id: u64,
}

impl Drop for Waiter {
    fn drop(&mut self) {
        let Some(inner) = self.cache.upgrade() else {
            return;
        };
        let mut entries = inner.entries();
        let Some(entry) = entries.peek_mut(&self.key) else {
            return;
        };
        let Some(in_flight) = entry.in_flight.as_mut().filter(|f| f.id == self.id) else {
            return;
        };
        in_flight.waiters = in_flight.waiters.saturating_sub(1);
        if in_flight.waiters > 0 {
            return;
        }
        debug!(key = %self.key, "Last waiter left, abandoning fetch");
        let abandoned = entry.detach_fetch();
        // The fetch may own cache handles of its own; drop it unlocked.
        drop(entries);
        drop(abandoned);
    }
}

impl QueryCache {
    /// Creates a cache holding at most `max_entries` queries.
    pub fn new(max_entries: usize, defaults: QueryOptions) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(CacheInner {
                entries: Mutex::new(LruCache::unbounded()),
                max_entries: max_entries.max(1),
                defaults,
                events,
                next_fetch_id: AtomicU64::new(1),
            }),
        }
    }

    /// Default options for queries that do not bring their own.
    pub fn defaults(&self) -> QueryOptions {
        self.inner.defaults
    }

    /// Returns cached data for `key`, fetching it when absent or stale.
    ///
    /// Fresh data is returned without calling `fetcher`. When a fetch for the
    /// key is already running, the caller joins it instead of starting a
    /// second one. Failed fetches are retried per the options' policy; the
    /// final error is stored on the entry and returned.
    pub async fn fetch_query<T, F, Fut>(
        &self,
        key: QueryKey,
        fetcher: F,
        options: Option<QueryOptions>,
    ) -> Result<Arc<T>>
    where
        T: Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let options = options.unwrap_or(self.inner.defaults);
        let (fetch, id) = {
            let mut entries = self.inner.entries();
            let now = Instant::now();
            let entry = entries.get_or_insert_mut(key.clone(), || {
                Entry::new(options.stale_time, options.gc_time)
            });
            entry.stale_time = options.stale_time;
            entry.gc_time = options.gc_time;

            if let (false, Some(data)) = (entry.is_stale(now), entry.data.clone()) {
                debug!(%key, "Cache hit");
                return downcast(&key, data);
            }

            let claim = match entry.in_flight.as_mut() {
                Some(in_flight) => {
                    debug!(%key, "Joining in-flight fetch");
                    in_flight.waiters += 1;
                    (in_flight.fetch.clone(), in_flight.id)
                }
                None => {
                    debug!(%key, "Cache miss, fetching");
                    let id = self.inner.next_fetch_id.fetch_add(1, Ordering::Relaxed);
                    let fetch = self.shared_fetch(key.clone(), id, fetcher, options.retry);
                    entry.in_flight = Some(InFlight {
                        id,
                        fetch: fetch.clone(),
                        waiters: 1,
                    });
                    entry.status = QueryStatus::Fetching;
                    (fetch, id)
                }
            };
            self.inner.enforce_capacity(&mut entries);
            claim
        };

        let _waiter = Waiter {
            cache: Arc::downgrade(&self.inner),
            key: key.clone(),
            id,
        };
        let data = fetch.await?;
        downcast(&key, data)
    }

    /// Like [`fetch_query`](Self::fetch_query), but gives up with
    /// [`ClientError::Cancelled`] when `cancel` fires. The shared fetch keeps
    /// running for other callers and is dropped once nobody waits on it.
    pub async fn fetch_query_with_cancel<T, F, Fut>(
        &self,
        key: QueryKey,
        fetcher: F,
        options: Option<QueryOptions>,
        cancel: &CancellationToken,
    ) -> Result<Arc<T>>
    where
        T: Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        with_cancel(Some(cancel), self.fetch_query(key, fetcher, options)).await
    }

    /// Builds the shared fetch future. Settling happens inside it, so the
    /// entry is updated no matter which waiter drives it to completion.
    fn shared_fetch<T, F, Fut>(
        &self,
        key: QueryKey,
        id: u64,
        fetcher: F,
        retry: RetryPolicy,
    ) -> SharedFetch
    where
        T: Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let cache = Arc::downgrade(&self.inner);
        async move {
            let on_retry = |retries: u32| {
                if let Some(inner) = cache.upgrade() {
                    inner.set_retry_count(&key, id, retries);
                }
            };
            let result = run_with_retry(&fetcher, &retry, on_retry)
                .await
                .map(|value| Arc::new(value) as AnyData);
            if let Some(inner) = cache.upgrade() {
                inner.settle(&key, id, result.clone());
            }
            result
        }
        .boxed()
        .shared()
    }

    /// Warms the cache for `key` without blocking. Errors are logged and
    /// kept on the entry, never returned.
    pub fn prefetch<T, F, Fut>(
        &self,
        key: QueryKey,
        fetcher: F,
        options: Option<QueryOptions>,
    ) -> JoinHandle<()>
    where
        T: Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let cache = self.clone();
        tokio::spawn(async move {
            let label = key.to_string();
            if let Err(e) = cache.fetch_query(key, fetcher, options).await {
                debug!(key = %label, error = %e, "Prefetch failed");
            }
        })
    }

    /// Cached data for `key`, if present and of type `T`.
    pub fn get_query_data<T: Send + Sync + 'static>(&self, key: &QueryKey) -> Option<Arc<T>> {
        let data = self.inner.entries().peek(key)?.data.clone()?;
        data.downcast::<T>().ok()
    }

    /// Snapshot of the entry for `key`.
    pub fn query_state(&self, key: &QueryKey) -> Option<QueryState> {
        let entries = self.inner.entries();
        entries.peek(key).map(|e| e.state(Instant::now()))
    }

    /// Stores `value` under `key` as freshly fetched data.
    pub fn set_query_data<T: Send + Sync + 'static>(&self, key: QueryKey, value: T) {
        let defaults = self.inner.defaults;
        let mut entries = self.inner.entries();
        let entry = entries.get_or_insert_mut(key.clone(), || {
            Entry::new(defaults.stale_time, defaults.gc_time)
        });
        let now = Instant::now();
        entry.data = Some(Arc::new(value));
        entry.updated_at = Some(now);
        entry.touched_at = now;
        entry.error = None;
        entry.invalidated = false;
        if entry.in_flight.is_none() {
            entry.status = QueryStatus::Success;
        }
        self.inner.enforce_capacity(&mut entries);
        drop(entries);
        self.inner.emit(CacheEvent::Updated(key));
    }

    /// Marks stale, or removes, every entry matching any of `filters`.
    /// Returns how many entries were touched.
    ///
    /// A fetch running for a stale-marked entry is detached: its current
    /// waiters still get its result, but the next read starts a new fetch.
    pub fn invalidate(&self, filters: &[QueryFilter], mode: InvalidateMode) -> usize {
        let mut entries = self.inner.entries();
        let keys: Vec<QueryKey> = entries
            .iter()
            .filter(|(key, _)| any_filter_matches(filters, key))
            .map(|(key, _)| key.clone())
            .collect();

        let mut detached = Vec::new();
        for key in &keys {
            match mode {
                InvalidateMode::MarkStale => {
                    if let Some(entry) = entries.peek_mut(key) {
                        entry.invalidated = true;
                        detached.extend(entry.detach_fetch());
                    }
                }
                InvalidateMode::Remove => {
                    detached.extend(entries.pop(key).and_then(|e| e.in_flight));
                }
            }
        }
        drop(entries);
        drop(detached);

        for key in &keys {
            debug!(%key, ?mode, "Invalidated query");
            self.inner.emit(match mode {
                InvalidateMode::MarkStale => CacheEvent::Invalidated(key.clone()),
                InvalidateMode::Remove => CacheEvent::Removed(key.clone()),
            });
        }
        keys.len()
    }

    /// Removes entries last settled more than `max_age` ago that nobody
    /// observes and nothing is fetching. Returns how many were removed.
    pub fn gc(&self, max_age: Duration) -> usize {
        self.collect(|_| max_age)
    }

    /// Like [`gc`](Self::gc), using each entry's own `gc_time`.
    pub fn gc_expired(&self) -> usize {
        self.collect(|entry| entry.gc_time)
    }

    fn collect(&self, max_age: impl Fn(&Entry) -> Duration) -> usize {
        let now = Instant::now();
        let mut entries = self.inner.entries();
        let expired: Vec<QueryKey> = entries
            .iter()
            .filter(|(_, e)| {
                !e.is_pinned() && now.saturating_duration_since(e.touched_at) >= max_age(e)
            })
            .map(|(key, _)| key.clone())
            .collect();
        for key in &expired {
            entries.pop(key);
        }
        drop(entries);

        for key in &expired {
            debug!(%key, "Garbage collected query");
            self.inner.emit(CacheEvent::Removed(key.clone()));
        }
        expired.len()
    }

    /// Runs [`gc_expired`](Self::gc_expired) every `interval` until the cache
    /// is dropped.
    pub fn spawn_gc(&self, interval: Duration) -> JoinHandle<()> {
        let cache = Arc::downgrade(&self.inner);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(inner) = cache.upgrade() else {
                    break;
                };
                let removed = QueryCache { inner }.gc_expired();
                if removed > 0 {
                    debug!(removed, "Periodic query gc");
                }
            }
        })
    }

    /// Registers an observer of `key`. Observed entries survive garbage
    /// collection and eviction until the subscription is dropped.
    pub fn subscribe(&self, key: QueryKey) -> Subscription {
        let defaults = self.inner.defaults;
        let mut entries = self.inner.entries();
        entries
            .get_or_insert_mut(key.clone(), || {
                Entry::new(defaults.stale_time, defaults.gc_time)
            })
            .observers += 1;
        self.inner.enforce_capacity(&mut entries);
        Subscription {
            cache: Arc::downgrade(&self.inner),
            key,
        }
    }

    /// Receiver of every change made to the cache from now on.
    pub fn events(&self) -> broadcast::Receiver<CacheEvent> {
        self.inner.events.subscribe()
    }

    /// Drops every entry, abandoning in-flight fetches.
    pub fn clear(&self) {
        let old = std::mem::replace(&mut *self.inner.entries(), LruCache::unbounded());
        let keys: Vec<QueryKey> = old.iter().map(|(k, _)| k.clone()).collect();
        drop(old);
        for key in keys {
            self.inner.emit(CacheEvent::Removed(key));
        }
    }

    pub fn len(&self) -> usize {
        self.inner.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.inner.entries().contains(key)
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(1_000, QueryOptions::default())
    }
}

impl std::fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCache")
            .field("entries", &self.len())
            .field("max_entries", &self.inner.max_entries)
            .finish()
    }
}

/// Keeps one cache entry observed while alive.
#[derive(Debug)]
pub struct Subscription {
    cache: Weak<CacheInner>,
    key: QueryKey,
}

impl Subscription {
    pub fn key(&self) -> &QueryKey {
        &self.key
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.cache.upgrade() {
            if let Some(entry) = inner.entries().peek_mut(&self.key) {
                entry.observers = entry.observers.saturating_sub(1);
                entry.touched_at = entry.touched_at.max(Instant::now());
            }
        }
    }
}

fn downcast<T: Send + Sync + 'static>(key: &QueryKey, data: AnyData) -> Result<Arc<T>> {
    data.downcast::<T>().map_err(|_| {
        ClientError::InvalidResponse(format!("cached data for {} has a different type", key))
    })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicU32;

    use planhaus_core::cache::{budget_key, dashboard_key, project_key, projects_key};
    use uuid::Uuid;

    use super::*;
    
    fn pid() -> Uuid {
        Uuid::parse_str("00000000-0000-0000-0000-000000000001").unwrap()
    }

    fn counting_fetcher(
        calls: Arc<AtomicU32>,
        delay: Duration,
    ) -> impl Fn() -> futures_util::future::BoxFuture<'static, Result<u32>> + Send + Sync + 'static
    {
        move || {
            let calls = calls.clone();
            async move {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                tokio::time::sleep(delay).await;
                Ok(n)
            }
            .boxed()
        }
    }

    fn fresh_for(secs: u64) -> Option<QueryOptions> {
        Some(QueryOptions::default().with_stale_time(Duration::from_secs(secs)))
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_reads_share_one_fetch() {
        let cache = QueryCache::default();
        let calls = Arc::new(AtomicU32::new(0));
        let key = budget_key(pid());

        let (a, b, c) = tokio::join!(
            cache.fetch_query(key.clone(), counting_fetcher(calls.clone(), Duration::from_millis(50)), None),
            cache.fetch_query(key.clone(), counting_fetcher(calls.clone(), Duration::from_millis(50)), None),
            cache.fetch_query(key.clone(), counting_fetcher(calls.clone(), Duration::from_millis(50)), None),
        );

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(*a.unwrap(), 1);
        assert_eq!(*b.unwrap(), 1);
        assert_eq!(*c.unwrap(), 1);
        let state = cache.query_state(&key).unwrap();
        assert_eq!(state.status, QueryStatus::Success);
        assert!(!state.is_fetching);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fresh_data_skips_fetcher() {
        let cache = QueryCache::default();
        let calls = Arc::new(AtomicU32::new(0));
        let key = projects_key();

        let first = cache
            .fetch_query(key.clone(), counting_fetcher(calls.clone(), Duration::ZERO), fresh_for(60))
            .await
            .unwrap();
        let second = cache
            .fetch_query(key.clone(), counting_fetcher(calls.clone(), Duration::ZERO), fresh_for(60))
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));

        tokio::time::advance(Duration::from_secs(61)).await;
        let third = cache
            .fetch_query(key, counting_fetcher(calls.clone(), Duration::ZERO), fresh_for(60))
            .await
            .unwrap();
        assert_eq!(*third, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_prefix_invalidation_forces_refetch() {
        let cache = QueryCache::default();
        let calls = Arc::new(AtomicU32::new(0));
        let budget = budget_key(pid());
        let other = budget_key(Uuid::new_v4());

        for key in [&budget, &other] {
            cache
                .fetch_query(key.clone(), counting_fetcher(calls.clone(), Duration::ZERO), fresh_for(60))
                .await
                .unwrap();
        }

        let touched = cache.invalidate(&[QueryFilter::prefix(project_key(pid()))], InvalidateMode::MarkStale);
        assert_eq!(touched, 1);
        assert!(cache.query_state(&budget).unwrap().is_stale);
        assert!(!cache.query_state(&other).unwrap().is_stale);
        // Stale data stays readable until the refetch lands.
        assert!(cache.get_query_data::<u32>(&budget).is_some());

        let refreshed = cache
            .fetch_query(budget.clone(), counting_fetcher(calls.clone(), Duration::ZERO), fresh_for(60))
            .await
            .unwrap();
        assert_eq!(*refreshed, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalidate_remove() {
        let cache = QueryCache::default();
        cache.set_query_data(dashboard_key(pid()), 5u32);
        cache.set_query_data(budget_key(pid()), 6u32);

        let removed = cache.invalidate(&[QueryFilter::exact(dashboard_key(pid()))], InvalidateMode::Remove);
        assert_eq!(removed, 1);
        assert!(!cache.contains(&dashboard_key(pid())));
        assert!(cache.contains(&budget_key(pid())));
        assert_eq!(cache.invalidate(&[QueryFilter::exact(dashboard_key(pid()))], InvalidateMode::Remove), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_is_kept_on_entry() {
        let cache = QueryCache::default();
        let key = projects_key();
        let options = QueryOptions::default().with_retry(RetryPolicy::none());

        let result = cache
            .fetch_query(
                key.clone(),
                || async { Err::<u32, _>(ClientError::Api { status: 404, message: "gone".into() }) },
                Some(options),
            )
            .await;
        assert!(result.is_err());
        let state = cache.query_state(&key).unwrap();
        assert_eq!(state.status, QueryStatus::Error);
        assert!(!state.has_data);
        assert_eq!(state.error.unwrap().status(), Some(404));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_count_recorded_then_cleared() {
        let cache = QueryCache::default();
        let key = projects_key();
        let calls = Arc::new(AtomicU32::new(0));
        let seen = calls.clone();
        let flaky = move || {
            let seen = seen.clone();
            async move {
                if seen.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(ClientError::Network("offline".into()))
                } else {
                    Ok(1u32)
                }
            }
        };

        let task = {
            let cache = cache.clone();
            let key = key.clone();
            tokio::spawn(async move { cache.fetch_query(key, flaky, None).await })
        };
        // First attempt fails, the retry waits one second.
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(cache.query_state(&key).unwrap().retry_count, 1);

        assert_eq!(*task.await.unwrap().unwrap(), 1);
        assert_eq!(cache.query_state(&key).unwrap().retry_count, 0);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_last_waiter_abandons_fetch() {
        let cache = QueryCache::default();
        let key = projects_key();
        let calls = Arc::new(AtomicU32::new(0));
        let token = CancellationToken::new();

        let task = {
            let cache = cache.clone();
            let key = key.clone();
            let token = token.clone();
            let fetcher = counting_fetcher(calls.clone(), Duration::from_secs(5));
            tokio::spawn(async move {
                cache.fetch_query_with_cancel(key, fetcher, None, &token).await
            })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(cache.query_state(&key).unwrap().is_fetching);

        token.cancel();
        assert_eq!(task.await.unwrap(), Err(ClientError::Cancelled));
        let state = cache.query_state(&key).unwrap();
        assert!(!state.is_fetching);
        assert_eq!(state.status, QueryStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_one_waiter_keeps_shared_fetch() {
        let cache = QueryCache::default();
        let key = projects_key();
        let calls = Arc::new(AtomicU32::new(0));
        let token = CancellationToken::new();

        let cancelled = {
            let cache = cache.clone();
            let key = key.clone();
            let token = token.clone();
            let fetcher = counting_fetcher(calls.clone(), Duration::from_secs(1));
            tokio::spawn(async move { cache.fetch_query_with_cancel(key, fetcher, None, &token).await })
        };
        let patient = {
            let cache = cache.clone();
            let key = key.clone();
            let fetcher = counting_fetcher(calls.clone(), Duration::from_secs(1));
            tokio::spawn(async move { cache.fetch_query(key, fetcher, None).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        token.cancel();

        assert_eq!(cancelled.await.unwrap(), Err(ClientError::Cancelled));
        assert_eq!(*patient.await.unwrap().unwrap(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.query_state(&key).unwrap().status, QueryStatus::Success);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gc_spares_observed_entries() {
        let cache = QueryCache::default();
        cache.set_query_data(projects_key(), 1u32);
        cache.set_query_data(budget_key(pid()), 2u32);
        let sub = cache.subscribe(budget_key(pid()));

        tokio::time::advance(Duration::from_secs(10)).await;
        assert_eq!(cache.gc(Duration::from_secs(60)), 0);
        assert_eq!(cache.gc(Duration::from_secs(5)), 1);
        assert!(!cache.contains(&projects_key()));
        assert!(cache.contains(&budget_key(pid())));

        drop(sub);
        assert_eq!(cache.gc(Duration::ZERO), 1);
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_gc_expired_uses_entry_gc_time() {
        let cache = QueryCache::new(
            10,
            QueryOptions {
                gc_time: Duration::from_secs(30),
                ..QueryOptions::default()
            },
        );
        cache.set_query_data(projects_key(), 1u32);
        tokio::time::advance(Duration::from_secs(29)).await;
        assert_eq!(cache.gc_expired(), 0);
        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(cache.gc_expired(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawned_gc_runs_periodically() {
        let cache = QueryCache::new(
            10,
            QueryOptions {
                gc_time: Duration::from_secs(1),
                ..QueryOptions::default()
            },
        );
        cache.set_query_data(projects_key(), 1u32);
        let handle = cache.spawn_gc(Duration::from_secs(5));
        tokio::time::sleep(Duration::from_secs(6)).await;
        assert!(cache.is_empty());
        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_capacity_evicts_least_recent_unobserved() {
        let cache = QueryCache::new(2, QueryOptions::default());
        let _sub = cache.subscribe(projects_key());
        cache.set_query_data(budget_key(pid()), 1u32);
        cache.set_query_data(dashboard_key(pid()), 2u32);

        assert_eq!(cache.len(), 2);
        assert!(cache.contains(&projects_key()));
        assert!(!cache.contains(&budget_key(pid())));
        assert!(cache.contains(&dashboard_key(pid())));
    }

    #[tokio::test(start_paused = true)]
    async fn test_events_are_broadcast() {
        let cache = QueryCache::default();
        let mut events = cache.events();
        cache.set_query_data(projects_key(), 1u32);
        cache.invalidate(&[QueryFilter::exact(projects_key())], InvalidateMode::MarkStale);

        assert_eq!(events.recv().await.unwrap(), CacheEvent::Updated(projects_key()));
        assert_eq!(events.recv().await.unwrap(), CacheEvent::Invalidated(projects_key()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_prefetch_warms_cache() {
        let cache = QueryCache::default();
        let calls = Arc::new(AtomicU32::new(0));
        cache
            .prefetch(projects_key(), counting_fetcher(calls.clone(), Duration::from_millis(5)), None)
            .await
            .unwrap();
        assert_eq!(cache.get_query_data::<u32>(&projects_key()).as_deref(), Some(&1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_prefetch_swallows_errors() {
        let cache = QueryCache::default();
        let options = QueryOptions::default().with_retry(RetryPolicy::none());
        cache
            .prefetch(
                projects_key(),
                || async { Err::<u32, _>(ClientError::Network("offline".into())) },
                Some(options),
            )
            .await
            .unwrap();
        assert_eq!(cache.query_state(&projects_key()).unwrap().status, QueryStatus::Error);
    }

    #[tokio::test(start_paused = true)]
    async fn test_type_mismatch_is_an_error() {
        let cache = QueryCache::default();
        cache.set_query_data(projects_key(), "text".to_string());
        assert!(cache.get_query_data::<u32>(&projects_key()).is_none());
        let result = cache
            .fetch_query(projects_key(), || async { Ok(1u32) }, fresh_for(60))
            .await;
        assert!(matches!(result, Err(ClientError::InvalidResponse(_))));
    }
}
