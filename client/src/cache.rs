//! Tag-invalidated [`Cache`] of query results.
//!
//! Every successful query result is kept under a [`Key`] derived from the
//! wire call, together with the tags the query declares. Mutations
//! invalidate by tag, marking affected entries stale so the next read of
//! them goes back to the wire, and identical concurrent fetches are
//! collapsed into a single wire call.

use std::{
    collections::HashMap,
    fmt,
    future::Future,
    sync::{Arc, Mutex, PoisonError},
    time::{Duration, Instant},
};

use serde_json::Value;
use tokio::sync::broadcast;
use xxhash_rust::xxh3::xxh3_64;

use crate::transport::Call;

/// [`Cache`] configuration.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// How long an entry is served without being refetched.
    pub retention: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            retention: Duration::from_secs(300),
        }
    }
}

/// Key of a cached query result.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Key {
    /// Path of the wire call.
    path: String,

    /// Hash of the call parameters.
    params: u64,
}

impl Key {
    /// Derives the [`Key`] of the provided [`Call`].
    ///
    /// [`Call`]s with the same path and equal parameters always derive
    /// equal [`Key`]s: object keys are ordered before hashing.
    #[must_use]
    pub fn of(call: &Call) -> Self {
        let params = call
            .body
            .as_ref()
            .and_then(|body| serde_json::to_vec(body).ok())
            .map_or(0, |raw| xxh3_64(&raw));
        Self {
            path: call.path.clone(),
            params,
        }
    }
}

/// Single entry of a [`Cache`].
#[derive(Debug)]
struct Entry<T> {
    /// Cached query result.
    value: Value,

    /// Tags this entry is invalidated by.
    tags: Vec<T>,

    /// Instant this entry was stored or last served at.
    last_used: Instant,

    /// Indicator whether this entry has been invalidated.
    stale: bool,
}

/// Tag-invalidated cache of query results.
pub struct Cache<T> {
    /// Configuration of this [`Cache`].
    config: Config,

    /// Cached entries by their [`Key`].
    entries: Mutex<HashMap<Key, Entry<T>>>,

    /// Per-[`Key`] gates collapsing identical concurrent fetches.
    gates: Mutex<HashMap<Key, Arc<tokio::sync::Mutex<()>>>>,

    /// Channel notifying subscribers about invalidated tags.
    invalidations: broadcast::Sender<T>,
}

impl<T> fmt::Debug for Cache<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<T: Copy + Eq + Send + 'static> Cache<T> {
    /// Creates a new empty [`Cache`] with the provided [`Config`].
    #[must_use]
    pub fn new(config: Config) -> Self {
        let (invalidations, _) = broadcast::channel(16);
        Self {
            config,
            entries: Mutex::default(),
            gates: Mutex::default(),
            invalidations,
        }
    }

    /// Returns the cached result under the provided [`Key`], or runs the
    /// provided `fetch` to produce, store and return it.
    ///
    /// Concurrent calls with the same [`Key`] share a single `fetch` run:
    /// late callers wait for the first one and are served from the
    /// [`Cache`]. Failed fetches are not cached.
    ///
    /// # Errors
    ///
    /// Propagates the error of the provided `fetch`.
    pub async fn fetch<F, E>(
        &self,
        key: Key,
        tags: &[T],
        fetch: F,
    ) -> Result<Value, E>
    where
        F: Future<Output = Result<Value, E>>,
    {
        if let Some(value) = self.lookup(&key) {
            return Ok(value);
        }

        let gate = self.gate(&key);
        let _running = gate.lock().await;

        // Either the first caller has filled the entry while this one was
        // waiting on the gate, or the fetch is ours to run.
        if let Some(value) = self.lookup(&key) {
            self.drop_gate(&key);
            return Ok(value);
        }

        let result = fetch.await;
        if let Ok(value) = &result {
            self.store(key.clone(), value.clone(), tags);
        }
        self.drop_gate(&key);

        result
    }

    /// Marks every entry carrying any of the provided tags as stale and
    /// notifies subscribers.
    pub fn invalidate(&self, tags: &[T]) {
        {
            let mut entries = self.entries();
            for entry in entries.values_mut() {
                if entry.tags.iter().any(|tag| tags.contains(tag)) {
                    entry.stale = true;
                }
            }
        }

        for tag in tags {
            // No subscribers is fine.
            drop(self.invalidations.send(*tag));
        }
    }

    /// Marks every entry as stale.
    ///
    /// Intended for the moment network connectivity returns, when
    /// anything cached may have been outrun by the platform.
    pub fn on_reconnect(&self) {
        for entry in self.entries().values_mut() {
            entry.stale = true;
        }
    }

    /// Drops every cached entry.
    pub fn clear(&self) {
        self.entries().clear();
    }

    /// Subscribes to invalidation notifications.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<T> {
        self.invalidations.subscribe()
    }

    /// Returns the fresh value under the provided [`Key`], if any,
    /// bumping its retention.
    ///
    /// Entries unused for longer than the configured retention are
    /// evicted on the spot.
    fn lookup(&self, key: &Key) -> Option<Value> {
        let mut entries = self.entries();

        let expired = entries
            .get(key)
            .is_some_and(|e| e.last_used.elapsed() > self.config.retention);
        if expired {
            drop(entries.remove(key));
            return None;
        }

        let entry = entries.get_mut(key)?;
        if entry.stale {
            return None;
        }

        entry.last_used = Instant::now();
        Some(entry.value.clone())
    }

    /// Stores the provided value under the provided [`Key`], sweeping
    /// expired entries out on the way, so keys that are never looked up
    /// again do not accumulate.
    fn store(&self, key: Key, value: Value, tags: &[T]) {
        let mut entries = self.entries();
        entries
            .retain(|_, e| e.last_used.elapsed() <= self.config.retention);
        drop(entries.insert(
            key,
            Entry {
                value,
                tags: tags.to_vec(),
                last_used: Instant::now(),
                stale: false,
            },
        ));
    }

    /// Returns the fetch gate of the provided [`Key`], creating one if
    /// none exists yet.
    fn gate(&self, key: &Key) -> Arc<tokio::sync::Mutex<()>> {
        Arc::clone(self.gates().entry(key.clone()).or_default())
    }

    /// Removes the fetch gate of the provided [`Key`].
    ///
    /// Late callers still holding the [`Arc`] are unaffected.
    fn drop_gate(&self, key: &Key) {
        drop(self.gates().remove(key));
    }

    /// Locks the entries.
    fn entries(
        &self,
    ) -> std::sync::MutexGuard<'_, HashMap<Key, Entry<T>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Locks the gates.
    fn gates(
        &self,
    ) -> std::sync::MutexGuard<'_, HashMap<Key, Arc<tokio::sync::Mutex<()>>>>
    {
        self.gates.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod spec {
    use std::{
        convert::Infallible,
        sync::{
            atomic::{AtomicU32, Ordering},
            Arc,
        },
        time::Duration,
    };

    use serde_json::{json, Value};

    use crate::transport::Call;

    use super::{Cache, Config, Key};

    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    enum Tag {
        Left,
        Right,
    }

    fn key(path: &str) -> Key {
        Key::of(&Call {
            method: reqwest::Method::POST,
            path: path.to_owned(),
            body: None,
        })
    }

    async fn fetch_counting(
        cache: &Cache<Tag>,
        key: Key,
        tags: &[Tag],
        hits: &AtomicU32,
    ) -> Value {
        cache
            .fetch(key, tags, async {
                let _ = hits.fetch_add(1, Ordering::SeqCst);
                Ok::<_, Infallible>(json!({"n": 1}))
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn serves_repeated_reads_from_cache() {
        let cache = Cache::new(Config::default());
        let hits = AtomicU32::new(0);

        let first =
            fetch_counting(&cache, key("a"), &[Tag::Left], &hits).await;
        let second =
            fetch_counting(&cache, key("a"), &[Tag::Left], &hits).await;

        assert_eq!(first, second);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn keys_differ_by_parameters() {
        let with_body = |page: u32| {
            Key::of(&Call {
                method: reqwest::Method::POST,
                path: "list".to_owned(),
                body: Some(json!({"page": page})),
            })
        };

        assert_eq!(with_body(1), with_body(1));
        assert_ne!(with_body(1), with_body(2));
        assert_ne!(with_body(1), key("list"));
    }

    #[tokio::test]
    async fn invalidation_forces_refetch_of_tagged_entries_only() {
        let cache = Cache::new(Config::default());
        let hits = AtomicU32::new(0);

        let _ = fetch_counting(&cache, key("l"), &[Tag::Left], &hits).await;
        let _ = fetch_counting(&cache, key("r"), &[Tag::Right], &hits).await;
        assert_eq!(hits.load(Ordering::SeqCst), 2);

        cache.invalidate(&[Tag::Left]);

        let _ = fetch_counting(&cache, key("l"), &[Tag::Left], &hits).await;
        let _ = fetch_counting(&cache, key("r"), &[Tag::Right], &hits).await;
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn invalidation_notifies_subscribers() {
        let cache = Cache::<Tag>::new(Config::default());
        let mut invalidations = cache.subscribe();

        cache.invalidate(&[Tag::Right]);

        assert_eq!(invalidations.try_recv().unwrap(), Tag::Right);
    }

    #[tokio::test]
    async fn retention_expires_unused_entries() {
        let cache = Cache::new(Config {
            retention: Duration::from_millis(20),
        });
        let hits = AtomicU32::new(0);

        let _ = fetch_counting(&cache, key("a"), &[Tag::Left], &hits).await;
        tokio::time::sleep(Duration::from_millis(40)).await;
        let _ = fetch_counting(&cache, key("a"), &[Tag::Left], &hits).await;

        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn storing_sweeps_expired_entries() {
        let cache = Cache::new(Config {
            retention: Duration::from_millis(20),
        });
        let hits = AtomicU32::new(0);

        let _ = fetch_counting(&cache, key("a"), &[Tag::Left], &hits).await;
        tokio::time::sleep(Duration::from_millis(40)).await;
        let _ = fetch_counting(&cache, key("b"), &[Tag::Right], &hits).await;

        assert_eq!(cache.entries().len(), 1);
        assert!(cache.entries().contains_key(&key("b")));
    }

    #[tokio::test]
    async fn reconnect_marks_everything_stale() {
        let cache = Cache::new(Config::default());
        let hits = AtomicU32::new(0);

        let _ = fetch_counting(&cache, key("a"), &[Tag::Left], &hits).await;
        cache.on_reconnect();
        let _ = fetch_counting(&cache, key("a"), &[Tag::Left], &hits).await;

        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn concurrent_identical_fetches_collapse_into_one() {
        let cache = Arc::new(Cache::new(Config::default()));
        let hits = Arc::new(AtomicU32::new(0));

        let tasks = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let hits = Arc::clone(&hits);
                tokio::spawn(async move {
                    cache
                        .fetch(key("a"), &[Tag::Left], async {
                            let _ = hits.fetch_add(1, Ordering::SeqCst);
                            tokio::time::sleep(Duration::from_millis(10))
                                .await;
                            Ok::<_, Infallible>(json!({"n": 1}))
                        })
                        .await
                        .unwrap()
                })
            })
            .collect::<Vec<_>>();
        for task in tasks {
            let _ = task.await.unwrap();
        }

        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_fetches_are_not_cached() {
        let cache = Cache::<Tag>::new(Config::default());
        let hits = AtomicU32::new(0);

        let failed = cache
            .fetch(key("a"), &[Tag::Left], async {
                let _ = hits.fetch_add(1, Ordering::SeqCst);
                Err::<Value, _>("boom")
            })
            .await;
        assert_eq!(failed, Err("boom"));

        let _ = fetch_counting(&cache, key("a"), &[Tag::Left], &hits).await;
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn clear_drops_everything() {
        let cache = Cache::new(Config::default());
        let hits = AtomicU32::new(0);

        let _ = fetch_counting(&cache, key("a"), &[Tag::Left], &hits).await;
        cache.clear();
        let _ = fetch_counting(&cache, key("a"), &[Tag::Left], &hits).await;

        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }
}
