use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::error::Result;

/// Root key segment for every note-listing query.
pub const NOTES_QUERY_KEY: &str = "notes";

const INVALIDATION_CHANNEL_CAPACITY: usize = 16;

/// Ordered key segments identifying a cached query, e.g. `["notes", "Work", "", "1"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// The key every note listing lives under.
    pub fn notes() -> Self {
        Self::new([NOTES_QUERY_KEY])
    }

    /// Extend this key with more segments.
    pub fn child<I, S>(&self, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut all = self.0.clone();
        all.extend(segments.into_iter().map(Into::into));
        Self(all)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

/// Broadcast to subscribers when cached queries under `prefix` go stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invalidation {
    pub prefix: QueryKey,
}

#[derive(Debug)]
struct Entry<T> {
    value: T,
    stale: bool,
}

#[derive(Debug)]
struct Entries<T> {
    map: HashMap<QueryKey, Entry<T>>,
    // bumped by every invalidation
    generation: u64,
}

/// Keyed cache of fetched collections with prefix invalidation.
///
/// Cloning shares the same entries and the same invalidation channel.
#[derive(Debug, Clone)]
pub struct QueryCache<T> {
    entries: Arc<Mutex<Entries<T>>>,
    events: broadcast::Sender<Invalidation>,
}

impl<T: Clone> Default for QueryCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> QueryCache<T> {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(INVALIDATION_CHANNEL_CAPACITY);
        Self {
            entries: Arc::new(Mutex::new(Entries {
                map: HashMap::new(),
                generation: 0,
            })),
            events,
        }
    }

    /// Fresh cached value for `key`, if any.
    pub fn get(&self, key: &QueryKey) -> Option<T> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries
            .map
            .get(key)
            .filter(|entry| !entry.stale)
            .map(|entry| entry.value.clone())
    }

    pub fn insert(&self, key: QueryKey, value: T) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.map.insert(key, Entry { value, stale: false });
    }

    pub fn is_stale(&self, key: &QueryKey) -> bool {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.map.get(key).map(|entry| entry.stale).unwrap_or(true)
    }

    /// Return the fresh value for `key` or run `loader` and cache its result.
    /// Loader errors are returned and nothing is cached.
    ///
    /// A result whose load overlapped an invalidation is returned but cached
    /// as stale, so the next read loads again.
    pub async fn fetch<F, Fut>(&self, key: QueryKey, loader: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if let Some(value) = self.get(&key) {
            debug!(key = %key, "query cache hit");
            return Ok(value);
        }

        debug!(key = %key, "query cache miss");
        let started_at = self.generation();
        let value = loader().await?;

        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let stale = entries.generation != started_at;
        if stale {
            debug!(key = %key, "invalidated during load, caching as stale");
        }
        entries.map.insert(
            key,
            Entry {
                value: value.clone(),
                stale,
            },
        );
        Ok(value)
    }

    fn generation(&self) -> u64 {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .generation
    }

    /// Mark every entry under `prefix` stale and notify subscribers.
    /// Returns the number of entries affected.
    pub fn invalidate(&self, prefix: &QueryKey) -> usize {
        let count = {
            let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
            entries.generation += 1;
            let mut count = 0;
            for (key, entry) in entries.map.iter_mut() {
                if key.starts_with(prefix) {
                    entry.stale = true;
                    count += 1;
                }
            }
            count
        };

        info!(prefix = %prefix, entries = count, "invalidated queries");
        // No subscribers is not an error
        let _ = self.events.send(Invalidation {
            prefix: prefix.clone(),
        });
        count
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Invalidation> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NotehubError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::oneshot;

    #[test]
    fn test_prefix_matching() {
        let key = QueryKey::notes().child(["Work", "", "1"]);
        assert!(key.starts_with(&QueryKey::notes()));
        assert!(key.starts_with(&key));
        assert!(!QueryKey::notes().starts_with(&key));
        assert!(!QueryKey::new(["note"]).starts_with(&QueryKey::notes()));
        assert_eq!(key.to_string(), "[notes, Work, , 1]");
    }

    #[test]
    fn test_invalidate_marks_only_matching_entries() {
        let cache: QueryCache<u32> = QueryCache::new();
        let work = QueryKey::notes().child(["Work"]);
        let todo = QueryKey::notes().child(["Todo"]);
        let other = QueryKey::new(["profile"]);
        cache.insert(work.clone(), 1);
        cache.insert(todo.clone(), 2);
        cache.insert(other.clone(), 3);

        assert_eq!(cache.invalidate(&QueryKey::notes()), 2);

        assert_eq!(cache.get(&work), None);
        assert_eq!(cache.get(&todo), None);
        assert_eq!(cache.get(&other), Some(3));
        assert!(cache.is_stale(&work));
        assert!(!cache.is_stale(&other));
    }

    #[tokio::test]
    async fn test_fetch_uses_fresh_entry_and_refetches_stale() {
        let cache: QueryCache<usize> = QueryCache::new();
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let key = QueryKey::notes().child(["all"]);

        let load = move || async move {
            Ok::<usize, NotehubError>(calls.fetch_add(1, Ordering::SeqCst) + 1)
        };

        assert_eq!(cache.fetch(key.clone(), load).await.unwrap(), 1);
        assert_eq!(cache.fetch(key.clone(), load).await.unwrap(), 1);
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        cache.invalidate(&QueryKey::notes());
        assert_eq!(cache.fetch(key.clone(), load).await.unwrap(), 2);
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_load_overlapping_invalidation_is_cached_stale() {
        let cache: QueryCache<u32> = QueryCache::new();
        let key = QueryKey::notes().child(["all"]);
        let (started_tx, started_rx) = oneshot::channel();
        let (release_tx, release_rx) = oneshot::channel::<u32>();

        let pending = tokio::spawn({
            let cache = cache.clone();
            let key = key.clone();
            async move {
                cache
                    .fetch(key, || async move {
                        let _ = started_tx.send(());
                        Ok(release_rx.await.unwrap_or_default())
                    })
                    .await
            }
        });

        started_rx.await.unwrap();
        cache.invalidate(&QueryKey::notes());
        release_tx.send(1).unwrap();

        // the caller still gets its response, but it must not count as fresh
        assert_eq!(pending.await.unwrap().unwrap(), 1);
        assert_eq!(cache.get(&key), None);
        assert!(cache.is_stale(&key));

        let reloaded = cache
            .fetch(key.clone(), || async { Ok(2) })
            .await
            .unwrap();
        assert_eq!(reloaded, 2);
        assert_eq!(cache.get(&key), Some(2));
    }

    #[tokio::test]
    async fn test_fetch_error_is_not_cached() {
        let cache: QueryCache<u32> = QueryCache::new();
        let key = QueryKey::notes();

        let result = cache
            .fetch(key.clone(), || async {
                Err(NotehubError::Server {
                    status: 500,
                    body: "boom".to_string(),
                })
            })
            .await;
        assert!(result.is_err());
        assert!(cache.get(&key).is_none());
    }

    #[tokio::test]
    async fn test_subscribers_receive_invalidation() {
        let cache: QueryCache<u32> = QueryCache::new();
        let mut rx = cache.subscribe();

        cache.invalidate(&QueryKey::notes());

        let event = rx.recv().await.unwrap();
        assert_eq!(event.prefix, QueryKey::notes());
    }

    #[test]
    fn test_clones_share_entries() {
        let cache: QueryCache<u32> = QueryCache::new();
        let shared = cache.clone();
        cache.insert(QueryKey::notes(), 7);
        assert_eq!(shared.get(&QueryKey::notes()), Some(7));
    }
}
