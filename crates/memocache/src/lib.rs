//! # memocache
//!
//! Caches for recomputation-heavy workloads.
//!
//! ## Architecture
//! - **LruCache**: HashMap (AHash) index over an arena doubly-linked list, O(1) get/put/evict
//! - **RangeCache**: LRU of `[left, right] -> sum`, invalidated by point writes
//! - **SplayTree**: self-adjusting BST used as an unbounded memo store
//! - **fibonacci**: memoized recursion over any [`MemoStore`] backend
//!
//! Caches are plain single-owner values with no internal locking.
//!
//! ## Known limitation
//! [`RangeCache::invalidate`] scans every resident range. An interval index
//! over range endpoints would make it sublinear.

#![warn(missing_docs)]

mod error;
mod fib;
mod lru;
mod range;
mod range_sum;
mod splay;
mod stats;

pub use error::{Error, Result};
pub use fib::{
    fibonacci, fibonacci_iterative, LruMemo, MemoStore, UnboundedMemo, MAX_FIBONACCI_ARG,
};
pub use lru::{Iter as LruIter, LruCache};
pub use num_bigint::BigUint;
pub use range::{Aggregate, RangeCache, RangeKey};
pub use range_sum::{range_sum, range_sum_cached, update, update_cached};
pub use splay::{Iter as SplayIter, SplayMemo, SplayTree};
pub use stats::CacheStats;
