//! Read-through LRU cache shared by the knowledge base and search
//! backends.
//!
//! Lookups either hit a cached value or run the caller's compute
//! closure and store the result. Compute errors propagate to the
//! caller and are never cached, so a transient failure does not
//! poison later lookups for the same key.

use std::collections::HashMap;
use std::sync::Mutex;

/// Point-in-time cache counters, surfaced by the `status` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub size: usize,
    pub capacity: usize,
}

struct Entry<V> {
    value: V,
    last_used: u64,
}

struct Inner<V> {
    entries: HashMap<String, Entry<V>>,
    /// Monotonic counter; bumped on every insert and hit.
    clock: u64,
    hits: u64,
    misses: u64,
}

/// A bounded least-recently-used cache keyed by string.
///
/// The mutex is only held for map bookkeeping; compute closures run
/// outside the lock. Two concurrent misses for the same key may both
/// compute, and the later insert wins.
pub struct LruCache<V> {
    capacity: usize,
    inner: Mutex<Inner<V>>,
}

impl<V: Clone> LruCache<V> {
    /// Create a cache holding at most `capacity` entries. A capacity
    /// of zero is bumped to one so the cache is never a no-op.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                clock: 0,
                hits: 0,
                misses: 0,
            }),
        }
    }

    /// Return the cached value for `key`, bumping its recency. Counts
    /// as a hit or miss.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.clock += 1;
        let clock = inner.clock;
        if let Some(entry) = inner.entries.get_mut(key) {
            entry.last_used = clock;
            let value = entry.value.clone();
            inner.hits += 1;
            Some(value)
        } else {
            inner.misses += 1;
            None
        }
    }

    /// Store a value, evicting the least recently used entry if full.
    pub fn put(&self, key: String, value: V) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.clock += 1;
        let clock = inner.clock;
        if inner.entries.len() >= self.capacity && !inner.entries.contains_key(&key) {
            if let Some(oldest) = inner
                .entries
                .iter()
                .min_by_key(|(_, e)| e.last_used)
                .map(|(k, _)| k.clone())
            {
                tracing::debug!(key = %oldest, "Evicting least recently used cache entry");
                inner.entries.remove(&oldest);
            }
        }
        inner.entries.insert(
            key,
            Entry {
                value,
                last_used: clock,
            },
        );
    }

    /// Return the cached value for `key`, or run `compute` and cache
    /// its output. `compute` runs without the cache lock held.
    pub fn get_or_compute<E>(
        &self,
        key: &str,
        compute: impl FnOnce() -> std::result::Result<V, E>,
    ) -> std::result::Result<V, E> {
        if let Some(value) = self.get(key) {
            tracing::debug!(key = %key, "Cache hit");
            return Ok(value);
        }
        tracing::debug!(key = %key, "Cache miss");
        let value = compute()?;
        self.put(key.to_string(), value.clone());
        Ok(value)
    }

    /// Async variant of [`get_or_compute`](Self::get_or_compute) for
    /// compute paths that await I/O. The lock is released before the
    /// future is polled.
    pub async fn get_or_compute_async<E, F>(
        &self,
        key: &str,
        compute: impl FnOnce() -> F,
    ) -> std::result::Result<V, E>
    where
        F: std::future::Future<Output = std::result::Result<V, E>>,
    {
        if let Some(value) = self.get(key) {
            tracing::debug!(key = %key, "Cache hit");
            return Ok(value);
        }
        tracing::debug!(key = %key, "Cache miss");
        let value = compute().await?;
        self.put(key.to_string(), value.clone());
        Ok(value)
    }

    /// Drop all cached entries. Counters keep accumulating.
    pub fn clear(&self) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.entries.clear();
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        CacheStats {
            hits: inner.hits,
            misses: inner.misses,
            size: inner.entries.len(),
            capacity: self.capacity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn computes_once_then_serves_cached() {
        let cache: LruCache<String> = LruCache::new(4);
        let calls = AtomicUsize::new(0);

        let compute = || {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, std::io::Error>("value".to_string())
        };

        assert_eq!(cache.get_or_compute("k", compute).unwrap(), "value");
        assert_eq!(
            cache
                .get_or_compute("k", || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, std::io::Error>("other".to_string())
                })
                .unwrap(),
            "value"
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn evicts_least_recently_used() {
        let cache: LruCache<u32> = LruCache::new(2);
        cache
            .get_or_compute("a", || Ok::<_, std::io::Error>(1))
            .unwrap();
        cache
            .get_or_compute("b", || Ok::<_, std::io::Error>(2))
            .unwrap();
        // Touch "a" so "b" becomes the eviction candidate.
        cache
            .get_or_compute("a", || Ok::<_, std::io::Error>(99))
            .unwrap();
        cache
            .get_or_compute("c", || Ok::<_, std::io::Error>(3))
            .unwrap();

        let recomputed = AtomicUsize::new(0);
        cache
            .get_or_compute("a", || {
                recomputed.fetch_add(1, Ordering::SeqCst);
                Ok::<_, std::io::Error>(1)
            })
            .unwrap();
        assert_eq!(recomputed.load(Ordering::SeqCst), 0, "a should survive");

        cache
            .get_or_compute("b", || {
                recomputed.fetch_add(1, Ordering::SeqCst);
                Ok::<_, std::io::Error>(2)
            })
            .unwrap();
        assert_eq!(recomputed.load(Ordering::SeqCst), 1, "b was evicted");
    }

    #[test]
    fn errors_are_not_cached() {
        let cache: LruCache<String> = LruCache::new(4);
        let err: std::result::Result<String, String> =
            cache.get_or_compute("k", || Err("boom".to_string()));
        assert_eq!(err.unwrap_err(), "boom");

        // Next lookup still computes, and a success now sticks.
        let ok = cache.get_or_compute("k", || Ok::<_, String>("fine".to_string()));
        assert_eq!(ok.unwrap(), "fine");
        let stats = cache.stats();
        assert_eq!(stats.size, 1);
    }

    #[test]
    fn stats_track_hits_and_misses() {
        let cache: LruCache<u32> = LruCache::new(4);
        cache
            .get_or_compute("a", || Ok::<_, std::io::Error>(1))
            .unwrap();
        cache
            .get_or_compute("a", || Ok::<_, std::io::Error>(1))
            .unwrap();
        cache
            .get_or_compute("b", || Ok::<_, std::io::Error>(2))
            .unwrap();

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.size, 2);
        assert_eq!(stats.capacity, 4);
    }

    #[test]
    fn clear_empties_entries_but_keeps_counters() {
        let cache: LruCache<u32> = LruCache::new(4);
        cache
            .get_or_compute("a", || Ok::<_, std::io::Error>(1))
            .unwrap();
        cache.clear();
        let stats = cache.stats();
        assert_eq!(stats.size, 0);
        assert_eq!(stats.misses, 1);

        // The value must be recomputed after clear.
        let calls = AtomicUsize::new(0);
        cache
            .get_or_compute("a", || {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, std::io::Error>(1)
            })
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn poisoned_lock_recovers() {
        use std::panic::{AssertUnwindSafe, catch_unwind};
        use std::sync::Arc;

        // Clone panics on first use, inside the lock, poisoning it.
        #[derive(Debug)]
        struct ExplodesOnce(Arc<AtomicUsize>);
        impl Clone for ExplodesOnce {
            fn clone(&self) -> Self {
                if self.0.fetch_add(1, Ordering::SeqCst) == 0 {
                    panic!("clone failed");
                }
                ExplodesOnce(Arc::clone(&self.0))
            }
        }

        let cache: LruCache<ExplodesOnce> = LruCache::new(4);
        let clones = Arc::new(AtomicUsize::new(0));
        cache.put("k".into(), ExplodesOnce(Arc::clone(&clones)));

        let panicked = catch_unwind(AssertUnwindSafe(|| cache.get("k")));
        assert!(panicked.is_err());

        // Later calls still serve the entry instead of panicking on
        // the poisoned mutex.
        assert!(cache.get("k").is_some());
        assert_eq!(cache.stats().size, 1);
    }

    #[tokio::test]
    async fn async_compute_path_caches() {
        let cache: LruCache<String> = LruCache::new(4);
        let calls = AtomicUsize::new(0);

        let first = cache
            .get_or_compute_async("k", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, std::io::Error>("async value".to_string())
            })
            .await
            .unwrap();
        assert_eq!(first, "async value");

        let second = cache
            .get_or_compute_async("k", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, std::io::Error>("unused".to_string())
            })
            .await
            .unwrap();
        assert_eq!(second, "async value");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
