use std::hash::Hash;
use std::num::NonZeroUsize;

/// Default number of entries retained by a composition cache.
pub const DEFAULT_CACHE_CAPACITY: usize = 128;

/// Hit/miss/eviction counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub inserts: u64,
    pub evictions: u64,
}

/// Bounded map with least-recently-used eviction and hit/miss accounting.
///
/// Not synchronized: each [`Composition`](crate::Composition) owns exactly one of these and
/// render calls are serialized through `&mut`.
pub struct LruCache<K, V> {
    // None when caching is disabled (capacity 0)
    inner: Option<lru::LruCache<K, V>>,
    stats: CacheStats,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash,
{
    /// A cache holding at most `capacity` entries. Capacity 0 disables caching.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: NonZeroUsize::new(capacity).map(lru::LruCache::new),
            stats: CacheStats::default(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.inner.as_ref().map_or(0, |c| c.cap().get())
    }

    pub fn len(&self) -> usize {
        self.inner.as_ref().map_or(0, lru::LruCache::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Membership test that does not change recency.
    pub fn contains(&self, key: &K) -> bool {
        self.inner.as_ref().is_some_and(|c| c.contains(key))
    }

    /// Look up `key`, marking it most recently used on a hit.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let hit = self.inner.as_mut().and_then(|c| c.get(key));
        if hit.is_some() {
            self.stats.hits += 1;
        } else {
            self.stats.misses += 1;
        }
        hit
    }

    /// Insert or replace `key`, evicting the least-recently-used entry beyond capacity.
    pub fn insert(&mut self, key: K, value: V) {
        let Some(inner) = self.inner.as_mut() else {
            return;
        };
        let replacing = inner.contains(&key);
        let displaced = inner.push(key, value);
        self.stats.inserts += 1;
        if displaced.is_some() && !replacing {
            self.stats.evictions += 1;
            tracing::trace!(len = inner.len(), "evicted least-recently-used entry");
        }
    }

    pub fn clear(&mut self) {
        if let Some(inner) = self.inner.as_mut() {
            inner.clear();
        }
    }
}

impl<K, V> Default for LruCache<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl<K, V> std::fmt::Debug for LruCache<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LruCache")
            .field("enabled", &self.inner.is_some())
            .field("stats", &self.stats)
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cache/lru.rs"]
mod tests;
