//! Keyed query cache with subscriptions
//!
//! Each query identity owns one entry holding the last successful value, the
//! last error and an in-flight flag. Consumers subscribe with a callback and
//! receive an immutable [`Snapshot`] immediately and after every change.
//!
//! Fetch policy per identity:
//! - at most one fetch is started by `subscribe`/`invalidate`; callers that
//!   arrive mid-flight join it
//! - an invalidation that lands mid-flight schedules exactly one follow-up
//!   fetch once the current one completes
//! - every fetch start takes a fresh generation from a cache-wide counter,
//!   and a completion is only applied if its generation is still current
//!
//! Generations never repeat, even after `remove_unused` drops an entry whose
//! superseded fetch is still running.
//!
//! Callbacks run outside the cache lock, so they may call back into the cache.
//! All methods that can start a fetch must run inside a Tokio runtime.

use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::BoxFuture;
use tokio::sync::mpsc;
use tokio::time::Instant;

use super::CacheOptions;
use crate::error::{Error, Result};

/// Identity of a cacheable result set
pub trait QueryKey: Clone + Eq + Hash + Debug + Send + Sync + 'static {
    /// Disabled identities never fetch; their snapshot stays idle.
    fn is_enabled(&self) -> bool {
        true
    }
}

/// Point-in-time view of a cache entry
#[derive(Debug, Clone)]
pub struct Snapshot<V> {
    /// Last successful value
    pub value: Option<V>,
    /// Whether a fetch is in flight
    pub is_loading: bool,
    /// Error of the last completed fetch, cleared by the next success
    pub error: Option<Arc<Error>>,
}

impl<V> Snapshot<V> {
    fn idle() -> Self {
        Self {
            value: None,
            is_loading: false,
            error: None,
        }
    }

    /// Get the value if one has been fetched.
    pub fn data(&self) -> Option<&V> {
        self.value.as_ref()
    }

    /// True once no fetch is in flight
    pub fn is_settled(&self) -> bool {
        !self.is_loading
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Collapse a settled snapshot into its outcome.
    ///
    /// A recorded error wins over a previously cached value.
    pub fn into_result(self) -> Result<Option<V>> {
        match self.error {
            Some(err) => Err(Error::Fetch(err)),
            None => Ok(self.value),
        }
    }
}

/// Handle returned by [`QueryCache::subscribe`]
#[derive(Debug)]
pub struct Subscription<K> {
    id: u64,
    key: K,
}

impl<K> Subscription<K> {
    /// Identity this subscription observes
    pub fn key(&self) -> &K {
        &self.key
    }
}

type FetchFn<K, V> = Arc<dyn Fn(K) -> BoxFuture<'static, Result<V>> + Send + Sync>;
type Callback<V> = Arc<dyn Fn(&Snapshot<V>) + Send + Sync>;

struct Entry<V> {
    value: Option<V>,
    error: Option<Arc<Error>>,
    in_flight: bool,
    stale: bool,
    generation: u64,
    fetches: u64,
    fetched_at: Option<Instant>,
    subscribers: HashMap<u64, Callback<V>>,
}

impl<V: Clone> Entry<V> {
    fn new() -> Self {
        Self {
            value: None,
            error: None,
            in_flight: false,
            stale: true,
            generation: 0,
            fetches: 0,
            fetched_at: None,
            subscribers: HashMap::new(),
        }
    }

    fn snapshot(&self) -> Snapshot<V> {
        Snapshot {
            value: self.value.clone(),
            is_loading: self.in_flight,
            error: self.error.clone(),
        }
    }

    fn callbacks(&self) -> Vec<Callback<V>> {
        self.subscribers.values().cloned().collect()
    }

    fn is_expired(&self, options: &CacheOptions) -> bool {
        match (options.stale_time, self.fetched_at) {
            (Some(stale_time), Some(fetched_at)) => fetched_at.elapsed() >= stale_time,
            _ => false,
        }
    }

    /// Mark a fetch with `generation` as the current one
    fn begin_fetch(&mut self, generation: u64) -> u64 {
        self.generation = generation;
        self.fetches += 1;
        self.in_flight = true;
        self.stale = false;
        generation
    }
}

/// Work decided under the lock and carried out after releasing it
struct Effects<K, V> {
    fetch: Option<(K, u64)>,
    snapshot: Snapshot<V>,
    notify: Vec<Callback<V>>,
}

struct Inner<K, V> {
    entries: Mutex<HashMap<K, Entry<V>>>,
    fetcher: FetchFn<K, V>,
    options: CacheOptions,
    next_subscription: AtomicU64,
    next_generation: AtomicU64,
}

/// Shared, cloneable query cache
pub struct QueryCache<K, V> {
    inner: Arc<Inner<K, V>>,
}

impl<K, V> Clone for QueryCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K: QueryKey, V: Clone + Send + Sync + 'static> QueryCache<K, V> {
    /// Create a cache that loads entries with `fetcher`.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let client = client.clone();
    /// let cache = QueryCache::new(move |query| {
    ///     let client = client.clone();
    ///     async move { client.load(query).await }
    /// });
    /// ```
    pub fn new<F, Fut>(fetcher: F) -> Self
    where
        F: Fn(K) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<V>> + Send + 'static,
    {
        Self::with_options(fetcher, CacheOptions::default())
    }

    /// Create a cache with explicit options.
    pub fn with_options<F, Fut>(fetcher: F, options: CacheOptions) -> Self
    where
        F: Fn(K) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<V>> + Send + 'static,
    {
        Self {
            inner: Arc::new(Inner {
                entries: Mutex::new(HashMap::new()),
                fetcher: Arc::new(move |key| Box::pin(fetcher(key))),
                options,
                next_subscription: AtomicU64::new(1),
                next_generation: AtomicU64::new(1),
            }),
        }
    }

    fn next_generation(&self) -> u64 {
        self.inner.next_generation.fetch_add(1, Ordering::Relaxed)
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<K, Entry<V>>> {
        self.inner
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Observe `key`.
    ///
    /// `callback` runs immediately with the current snapshot and again after
    /// every change to the entry. Creates the entry and fetches it when it is
    /// absent or stale, unless a fetch is already in flight.
    pub fn subscribe<F>(&self, key: K, callback: F) -> Subscription<K>
    where
        F: Fn(&Snapshot<V>) + Send + Sync + 'static,
    {
        let id = self.inner.next_subscription.fetch_add(1, Ordering::Relaxed);
        let callback: Callback<V> = Arc::new(callback);

        let effects = {
            let mut entries = self.entries();
            let entry = entries.entry(key.clone()).or_insert_with(Entry::new);
            entry.subscribers.insert(id, Arc::clone(&callback));

            let wants_fetch = entry.stale || entry.is_expired(&self.inner.options);
            if key.is_enabled() && wants_fetch && !entry.in_flight {
                let generation = entry.begin_fetch(self.next_generation());
                Effects {
                    fetch: Some((key.clone(), generation)),
                    snapshot: entry.snapshot(),
                    notify: entry.callbacks(),
                }
            } else {
                if entry.value.is_some() {
                    log::debug!("Cache hit: {:?}", key);
                }
                Effects {
                    fetch: None,
                    snapshot: entry.snapshot(),
                    notify: vec![callback],
                }
            }
        };

        self.apply(effects);
        Subscription { id, key }
    }

    /// Observe `key` through a channel instead of a callback.
    pub fn subscribe_channel(
        &self,
        key: K,
    ) -> (Subscription<K>, mpsc::UnboundedReceiver<Snapshot<V>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let subscription = self.subscribe(key, move |snapshot| {
            // Receiver may have been dropped
            let _ = tx.send(snapshot.clone());
        });
        (subscription, rx)
    }

    /// Remove a subscription. Its callback is never invoked again.
    ///
    /// Any in-flight fetch keeps running and still updates the entry.
    pub fn unsubscribe(&self, subscription: Subscription<K>) -> bool {
        let mut entries = self.entries();
        entries
            .get_mut(&subscription.key)
            .map(|entry| entry.subscribers.remove(&subscription.id).is_some())
            .unwrap_or(false)
    }

    /// Wait until `key` has no fetch in flight and return that snapshot.
    ///
    /// Subscribes for the duration of the wait, so an absent entry is fetched.
    pub async fn settle(&self, key: K) -> Snapshot<V> {
        let (subscription, mut rx) = self.subscribe_channel(key);
        let mut last = Snapshot::idle();
        while let Some(snapshot) = rx.recv().await {
            let settled = snapshot.is_settled();
            last = snapshot;
            if settled {
                break;
            }
        }
        self.unsubscribe(subscription);
        last
    }

    /// Mark `key` stale.
    ///
    /// With at least one subscriber the entry refetches now, or right after
    /// the fetch already in flight. Without subscribers the fetch waits for
    /// the next subscription. Returns false for unknown identities.
    pub fn invalidate(&self, key: &K) -> bool {
        let effects = {
            let mut entries = self.entries();
            let Some(entry) = entries.get_mut(key) else {
                return false;
            };
            entry.stale = true;

            if entry.subscribers.is_empty() || entry.in_flight || !key.is_enabled() {
                log::debug!("Marked stale: {:?}", key);
                return true;
            }
            let generation = entry.begin_fetch(self.next_generation());
            Effects {
                fetch: Some((key.clone(), generation)),
                snapshot: entry.snapshot(),
                notify: entry.callbacks(),
            }
        };

        self.apply(effects);
        true
    }

    /// Invalidate every known identity matching `predicate`.
    pub fn invalidate_where<P>(&self, predicate: P) -> Vec<K>
    where
        P: Fn(&K) -> bool,
    {
        let keys: Vec<K> = self
            .entries()
            .keys()
            .filter(|key| predicate(key))
            .cloned()
            .collect();
        for key in &keys {
            self.invalidate(key);
        }
        keys
    }

    /// Start a new fetch for `key` even if one is in flight.
    ///
    /// The older fetch is superseded: its response is discarded when it lands.
    pub fn refetch(&self, key: &K) {
        if !key.is_enabled() {
            return;
        }
        let effects = {
            let mut entries = self.entries();
            let entry = entries.entry(key.clone()).or_insert_with(Entry::new);
            let generation = entry.begin_fetch(self.next_generation());
            Effects {
                fetch: Some((key.clone(), generation)),
                snapshot: entry.snapshot(),
                notify: entry.callbacks(),
            }
        };
        self.apply(effects);
    }

    /// Synchronous read of the current state without subscribing.
    pub fn snapshot(&self, key: &K) -> Snapshot<V> {
        self.entries()
            .get(key)
            .map(Entry::snapshot)
            .unwrap_or_else(Snapshot::idle)
    }

    /// Number of fetches started for `key` since its entry was created
    pub fn fetch_count(&self, key: &K) -> Option<u64> {
        self.entries().get(key).map(|entry| entry.fetches)
    }

    /// Number of active subscriptions on `key`
    pub fn subscriber_count(&self, key: &K) -> usize {
        self.entries()
            .get(key)
            .map(|entry| entry.subscribers.len())
            .unwrap_or(0)
    }

    /// All identities the cache currently holds
    pub fn keys(&self) -> Vec<K> {
        self.entries().keys().cloned().collect()
    }

    /// Drop entries with no subscribers and no fetch in flight.
    pub fn remove_unused(&self) -> usize {
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|_, entry| !entry.subscribers.is_empty() || entry.in_flight);
        before - entries.len()
    }

    /// Subscribers see the loading snapshot before the fetch is spawned.
    fn apply(&self, effects: Effects<K, V>) {
        for callback in effects.notify {
            callback(&effects.snapshot);
        }
        if let Some((key, generation)) = effects.fetch {
            self.spawn_fetch(key, generation);
        }
    }

    fn spawn_fetch(&self, key: K, generation: u64) {
        log::debug!("Fetching {:?} (generation {})", key, generation);
        let future = (self.inner.fetcher)(key.clone());
        let cache = self.clone();
        tokio::spawn(async move {
            let result = future.await;
            cache.complete(key, generation, result);
        });
    }

    fn complete(&self, key: K, generation: u64, result: Result<V>) {
        let effects = {
            let mut entries = self.entries();
            let Some(entry) = entries.get_mut(&key) else {
                return;
            };
            if entry.generation != generation {
                log::debug!(
                    "Discarding superseded response for {:?} (generation {}, current {})",
                    key,
                    generation,
                    entry.generation
                );
                return;
            }

            entry.in_flight = false;
            match result {
                Ok(value) => {
                    entry.value = Some(value);
                    entry.error = None;
                    entry.fetched_at = Some(Instant::now());
                }
                Err(err) => {
                    log::debug!("Fetch failed for {:?}: {}", key, err);
                    entry.error = Some(Arc::new(err));
                }
            }

            let follow_up = if entry.stale && !entry.subscribers.is_empty() {
                Some((key.clone(), entry.begin_fetch(self.next_generation())))
            } else {
                None
            };
            Effects {
                fetch: follow_up,
                snapshot: entry.snapshot(),
                notify: entry.callbacks(),
            }
        };
        self.apply(effects);
    }
}
