//! Kernel value cache
//!
//! LRU cache over kernel matrix entries, used to avoid recomputation across
//! SMO iterations. The matrix is symmetric, so keys are normalized to i <= j.
//! One cache is private to one binary training run and discarded with it.

use lru::LruCache;
use std::num::NonZeroUsize;

/// Cache key for kernel values, normalized so that i <= j
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    i: usize,
    j: usize,
}

impl CacheKey {
    fn new(i: usize, j: usize) -> Self {
        if i <= j {
            Self { i, j }
        } else {
            Self { i: j, j: i }
        }
    }
}

/// LRU cache for kernel matrix entries
pub struct KernelCache {
    cache: LruCache<CacheKey, f64>,
    hits: u64,
    misses: u64,
}

impl KernelCache {
    /// Create a cache holding at most `capacity` entries
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).expect("capacity is at least 1");
        Self {
            cache: LruCache::new(capacity),
            hits: 0,
            misses: 0,
        }
    }

    /// Create a cache sized from a memory budget in bytes
    pub fn with_memory_limit(memory_bytes: usize) -> Self {
        // ~16 bytes per entry: key pair + value, ignoring map overhead
        Self::new((memory_bytes / 16).max(1))
    }

    /// Fetch K(i, j), computing and storing it on a miss
    pub fn get_or_compute<F: FnOnce() -> f64>(&mut self, i: usize, j: usize, compute: F) -> f64 {
        let key = CacheKey::new(i, j);
        if let Some(&value) = self.cache.get(&key) {
            self.hits += 1;
            return value;
        }
        self.misses += 1;
        let value = compute();
        self.cache.put(key, value);
        value
    }

    /// Fraction of lookups served from the cache
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_normalization() {
        assert_eq!(CacheKey::new(1, 5), CacheKey::new(5, 1));
    }

    #[test]
    fn test_symmetric_access_hits() {
        let mut cache = KernelCache::new(4);
        let a = cache.get_or_compute(0, 1, || 5.0);
        let b = cache.get_or_compute(1, 0, || unreachable!("must be cached"));
        assert_eq!(a, 5.0);
        assert_eq!(b, 5.0);
        assert_eq!(cache.hit_rate(), 0.5);
    }

    #[test]
    fn test_lru_eviction() {
        let mut cache = KernelCache::new(2);
        cache.get_or_compute(0, 1, || 1.0);
        cache.get_or_compute(1, 2, || 2.0);
        cache.get_or_compute(2, 3, || 3.0); // evicts (0,1)

        let mut recomputed = false;
        cache.get_or_compute(0, 1, || {
            recomputed = true;
            1.0
        });
        assert!(recomputed);
    }

    #[test]
    fn test_memory_limit_sizing() {
        let cache = KernelCache::with_memory_limit(1600);
        assert_eq!(cache.cache.cap().get(), 100);

        // Tiny budgets still yield a usable cache
        let tiny = KernelCache::with_memory_limit(1);
        assert_eq!(tiny.cache.cap().get(), 1);
    }
}
