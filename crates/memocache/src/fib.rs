//! Memoized Fibonacci over interchangeable memo stores
//!
//! The recursion checks the store, computes on a miss, then stores. Because
//! both recursive calls run before the store, smaller arguments are memoized
//! first.

use std::collections::HashMap;

use ahash::RandomState;
use num_bigint::BigUint;
use tracing::trace;

use crate::error::{Error, Result};
use crate::lru::LruCache;
use crate::splay::SplayMemo;
use crate::stats::CacheStats;

/// Largest argument [`fibonacci`] accepts
///
/// Each argument above 1 costs one stack frame on the first, uncached call.
pub const MAX_FIBONACCI_ARG: u64 = 2048;

/// Backend for memoized recursion keyed by a single integer argument
pub trait MemoStore {
    /// Look up a memoized result
    fn lookup(&mut self, n: u64) -> Option<BigUint>;

    /// Record the result for `n`
    fn store(&mut self, n: u64, value: BigUint);

    /// Hit/miss counters of this store
    fn stats(&self) -> &CacheStats;
}

impl MemoStore for SplayMemo {
    fn lookup(&mut self, n: u64) -> Option<BigUint> {
        self.search(&n).cloned()
    }

    fn store(&mut self, n: u64, value: BigUint) {
        self.insert(n, value);
    }

    fn stats(&self) -> &CacheStats {
        SplayMemo::stats(self)
    }
}

/// Memo table that never evicts
#[derive(Default)]
pub struct UnboundedMemo {
    table: HashMap<u64, BigUint, RandomState>,
    stats: CacheStats,
}

impl UnboundedMemo {
    /// Create an empty memo table
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of memoized arguments
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Check if nothing is memoized
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Forget everything and reset statistics
    pub fn clear(&mut self) {
        self.table.clear();
        self.stats.reset();
    }
}

impl MemoStore for UnboundedMemo {
    fn lookup(&mut self, n: u64) -> Option<BigUint> {
        let found = self.table.get(&n).cloned();
        if found.is_some() {
            self.stats.record_hit();
        } else {
            self.stats.record_miss();
        }
        found
    }

    fn store(&mut self, n: u64, value: BigUint) {
        self.stats.record_insert();
        self.table.insert(n, value);
    }

    fn stats(&self) -> &CacheStats {
        &self.stats
    }
}

/// Memo table bounded to a fixed number of arguments, evicting LRU
pub struct LruMemo {
    entries: LruCache<u64, BigUint>,
    stats: CacheStats,
}

impl LruMemo {
    /// Create a memo holding at most `capacity` results
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: LruCache::new(capacity),
            stats: CacheStats::new(),
        }
    }

    /// Number of memoized arguments
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing is memoized
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of memoized arguments
    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }
}

impl MemoStore for LruMemo {
    fn lookup(&mut self, n: u64) -> Option<BigUint> {
        let found = self.entries.get(&n).cloned();
        if found.is_some() {
            self.stats.record_hit();
        } else {
            self.stats.record_miss();
        }
        found
    }

    fn store(&mut self, n: u64, value: BigUint) {
        self.stats.record_insert();
        if let Some((evicted, _)) = self.entries.put(n, value) {
            trace!(n = evicted, "evicted memoized result");
            self.stats.record_eviction();
        }
    }

    fn stats(&self) -> &CacheStats {
        &self.stats
    }
}

/// Compute `F(n)` using `memo` for every argument `>= 2`
///
/// Arguments `0` and `1` are returned directly and never reach the store.
pub fn fibonacci<M: MemoStore + ?Sized>(n: u64, memo: &mut M) -> Result<BigUint> {
    if n > MAX_FIBONACCI_ARG {
        return Err(Error::ArgumentTooLarge {
            n,
            max: MAX_FIBONACCI_ARG,
        });
    }
    Ok(memoized(n, memo))
}

fn memoized<M: MemoStore + ?Sized>(n: u64, memo: &mut M) -> BigUint {
    if n < 2 {
        return BigUint::from(n);
    }

    if let Some(value) = memo.lookup(n) {
        return value;
    }

    let value = memoized(n - 1, memo) + memoized(n - 2, memo);
    memo.store(n, value.clone());
    value
}

/// Compute `F(n)` iteratively without any cache
pub fn fibonacci_iterative(n: u64) -> BigUint {
    let mut a = BigUint::from(0u32);
    let mut b = BigUint::from(1u32);
    for _ in 0..n {
        let next = &a + &b;
        a = std::mem::replace(&mut b, next);
    }
    a
}
