//! Range-sum cache with point invalidation
//!
//! Maps a closed index range `[left, right]` to a precomputed sum. Lookup and
//! computation are separate: `get` never computes, the caller computes on a
//! miss and hands the result to `put`.

use tracing::{debug, trace};

use crate::lru::LruCache;
use crate::stats::CacheStats;

/// Aggregate stored for a range
pub type Aggregate = i64;

/// Closed index range `[left, right]`
pub type RangeKey = (usize, usize);

/// Fixed-capacity LRU cache of range aggregates
///
/// Every write to the underlying array must be followed by
/// [`RangeCache::invalidate`] at the written index; nothing else ties the
/// cache to the array.
pub struct RangeCache {
    entries: LruCache<RangeKey, Aggregate>,
    stats: CacheStats,
}

impl RangeCache {
    /// Create a cache holding at most `capacity` ranges
    ///
    /// `capacity == 0` gives a cache that never retains anything.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: LruCache::new(capacity),
            stats: CacheStats::new(),
        }
    }

    /// Look up the aggregate for `[left, right]`, promoting it on a hit
    pub fn get(&mut self, left: usize, right: usize) -> Option<Aggregate> {
        match self.entries.get(&(left, right)) {
            Some(&sum) => {
                self.stats.record_hit();
                Some(sum)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// Insert or refresh `[left, right] -> aggregate`
    ///
    /// At capacity, the least recently used range is evicted first.
    pub fn put(&mut self, left: usize, right: usize, aggregate: Aggregate) {
        self.stats.record_insert();
        if let Some(((l, r), _)) = self.entries.put((left, right), aggregate) {
            trace!(left = l, right = r, "evicted range");
            self.stats.record_eviction();
        }
    }

    /// Remove every cached range containing `index`
    ///
    /// Scans all resident entries: O(capacity) per call. Returns the number of
    /// ranges removed.
    pub fn invalidate(&mut self, index: usize) -> usize {
        let removed = self
            .entries
            .retain(|&(left, right), _| index < left || index > right);

        if removed > 0 {
            debug!(index, removed, "invalidated ranges");
            self.stats.record_invalidations(removed as u64);
        }
        removed
    }

    /// Check residency without touching recency or stats
    pub fn contains(&self, left: usize, right: usize) -> bool {
        self.entries.contains(&(left, right))
    }

    /// Resident ranges, most recently used first
    pub fn keys(&self) -> impl Iterator<Item = RangeKey> + '_ {
        self.entries.iter().map(|(key, _)| *key)
    }

    /// Number of resident ranges
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no range is resident
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of resident ranges
    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    /// Drop all entries and reset statistics
    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats.reset();
    }

    /// Get cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }
}
