//! Timed experiment runs

use std::time::Instant;

use anyhow::{bail, Context, Result};
use memocache::{
    fibonacci, fibonacci_iterative, range_sum, range_sum_cached, update, update_cached, BigUint,
    LruMemo, MemoStore, RangeCache, SplayMemo, UnboundedMemo, MAX_FIBONACCI_ARG,
};
use tracing::{debug, info};

use crate::report::{FibReport, FibRow, RangeReport};
use crate::workload::{Query, Workload, WorkloadSpec};

/// Replay the query stream once without and once with a [`RangeCache`]
pub fn run_range(spec: &WorkloadSpec, capacity: usize) -> Result<RangeReport> {
    if spec.len == 0 {
        bail!("array length must be positive");
    }
    if !(0.0..=1.0).contains(&spec.update_ratio) {
        bail!("update ratio must be within [0, 1], got {}", spec.update_ratio);
    }
    if spec.max_value < 1 {
        bail!("max value must be at least 1");
    }

    let workload = Workload::generate(spec);
    info!(
        len = spec.len,
        queries = workload.queries.len(),
        updates = workload.update_count(),
        "generated workload"
    );

    let mut array = workload.array.clone();
    let start = Instant::now();
    let mut uncached_checksum = 0i64;
    for query in &workload.queries {
        match *query {
            Query::Range { left, right } => {
                let sum = range_sum(&array, left, right).context("uncached range query")?;
                uncached_checksum = uncached_checksum.wrapping_add(sum);
            }
            Query::Update { index, value } => {
                update(&mut array, index, value).context("uncached update")?
            }
        }
    }
    let uncached = start.elapsed();
    info!("uncached run: {:.3}s", uncached.as_secs_f64());

    let mut array = workload.array.clone();
    let mut cache = RangeCache::new(capacity);
    let start = Instant::now();
    let mut cached_checksum = 0i64;
    for query in &workload.queries {
        match *query {
            Query::Range { left, right } => {
                let sum = range_sum_cached(&mut cache, &array, left, right)
                    .context("cached range query")?;
                cached_checksum = cached_checksum.wrapping_add(sum);
            }
            Query::Update { index, value } => update_cached(&mut cache, &mut array, index, value)
                .context("cached update")?,
        }
    }
    let cached = start.elapsed();
    info!("cached run: {:.3}s", cached.as_secs_f64());

    if uncached_checksum != cached_checksum {
        bail!(
            "cached results diverged: checksum {} vs {}",
            cached_checksum,
            uncached_checksum
        );
    }

    let stats = cache.stats();
    Ok(RangeReport {
        len: spec.len,
        queries: workload.queries.len(),
        updates: workload.update_count(),
        capacity,
        uncached_secs: uncached.as_secs_f64(),
        cached_secs: cached.as_secs_f64(),
        speedup: ratio(uncached.as_secs_f64(), cached.as_secs_f64()),
        hits: stats.hits(),
        misses: stats.misses(),
        hit_ratio: stats.hit_ratio(),
        evictions: stats.evictions(),
        invalidations: stats.invalidations(),
        checksum: cached_checksum,
    })
}

/// Parameters of the Fibonacci sweep
#[derive(Debug, Clone)]
pub struct FibParams {
    pub max_n: u64,
    pub step: u64,
    pub repeats: u32,
    pub lru_capacity: usize,
}

/// Time memoized Fibonacci for each `n` in the sweep on every backend
///
/// The unbounded memo lives for the whole sweep; the splay and LRU memos are
/// fresh for each `n` and shared by that `n`'s repeats.
pub fn run_fib(params: &FibParams) -> Result<FibReport> {
    if params.step == 0 {
        bail!("step must be positive");
    }
    if params.repeats == 0 {
        bail!("repeats must be positive");
    }
    if params.max_n > MAX_FIBONACCI_ARG {
        bail!("max n {} exceeds the limit of {}", params.max_n, MAX_FIBONACCI_ARG);
    }

    let mut unbounded = UnboundedMemo::new();
    let mut rows = Vec::new();

    for n in (0..=params.max_n).step_by(params.step as usize) {
        let expected = fibonacci_iterative(n);

        let unbounded_secs = time_repeats(n, params.repeats, &expected, &mut unbounded)?;

        let mut splay = SplayMemo::new();
        let splay_secs = time_repeats(n, params.repeats, &expected, &mut splay)?;

        let mut lru = LruMemo::new(params.lru_capacity);
        let lru_secs = time_repeats(n, params.repeats, &expected, &mut lru)?;

        debug!(n, splay_height = splay.height(), lru_len = lru.len(), "sweep point done");
        rows.push(FibRow {
            n,
            value: expected.to_string(),
            unbounded_secs,
            splay_secs,
            lru_secs,
        });
    }

    info!(points = rows.len(), "fibonacci sweep finished");
    Ok(FibReport {
        repeats: params.repeats,
        lru_capacity: params.lru_capacity,
        rows,
    })
}

/// Mean seconds per call over `repeats` calls sharing one memo
fn time_repeats<M: MemoStore>(
    n: u64,
    repeats: u32,
    expected: &BigUint,
    memo: &mut M,
) -> Result<f64> {
    let start = Instant::now();
    for _ in 0..repeats {
        let value = fibonacci(n, memo)?;
        if value != *expected {
            bail!("memoized F({}) = {}, expected {}", n, value, expected);
        }
    }
    Ok(start.elapsed().as_secs_f64() / f64::from(repeats))
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}
