//! Range-sum queries and point updates over a caller-owned array
//!
//! The cached variants pair every lookup with the recomputation on a miss and
//! every write with exactly one invalidation, so callers going through these
//! functions cannot observe a stale sum.

use crate::error::{Error, Result};
use crate::range::{Aggregate, RangeCache};

fn check_range(array: &[i64], left: usize, right: usize) -> Result<()> {
    if left > right || right >= array.len() {
        return Err(Error::InvalidRange {
            left,
            right,
            len: array.len(),
        });
    }
    Ok(())
}

/// Sum `array[left..=right]` directly
pub fn range_sum(array: &[i64], left: usize, right: usize) -> Result<Aggregate> {
    check_range(array, left, right)?;
    Ok(array[left..=right].iter().sum())
}

/// Sum `array[left..=right]`, serving from `cache` when possible
pub fn range_sum_cached(
    cache: &mut RangeCache,
    array: &[i64],
    left: usize,
    right: usize,
) -> Result<Aggregate> {
    check_range(array, left, right)?;

    if let Some(sum) = cache.get(left, right) {
        return Ok(sum);
    }

    let sum = array[left..=right].iter().sum();
    cache.put(left, right, sum);
    Ok(sum)
}

/// Write `value` at `index`
pub fn update(array: &mut [i64], index: usize, value: i64) -> Result<()> {
    let len = array.len();
    let slot = array
        .get_mut(index)
        .ok_or(Error::IndexOutOfBounds { index, len })?;
    *slot = value;
    Ok(())
}

/// Write `value` at `index` and drop every cached range covering it
pub fn update_cached(
    cache: &mut RangeCache,
    array: &mut [i64],
    index: usize,
    value: i64,
) -> Result<()> {
    update(array, index, value)?;
    cache.invalidate(index);
    Ok(())
}
