//! Synthetic array and query stream generation

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// One operation against the array
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query {
    /// Sum over `[left, right]`
    Range { left: usize, right: usize },
    /// Write `value` at `index`
    Update { index: usize, value: i64 },
}

/// Parameters of the range-sum workload
#[derive(Debug, Clone)]
pub struct WorkloadSpec {
    pub len: usize,
    pub queries: usize,
    pub update_ratio: f64,
    pub max_value: i64,
    pub seed: Option<u64>,
}

pub struct Workload {
    pub array: Vec<i64>,
    pub queries: Vec<Query>,
}

impl Workload {
    /// Build the array and query stream
    ///
    /// A range query picks `left` uniformly, then `right` uniformly in
    /// `[left, len)`, so short ranges near the end of the array dominate.
    pub fn generate(spec: &WorkloadSpec) -> Self {
        let mut rng = match spec.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let array = (0..spec.len)
            .map(|_| rng.gen_range(1..=spec.max_value))
            .collect();

        let queries = (0..spec.queries)
            .map(|_| {
                if rng.gen_bool(spec.update_ratio) {
                    Query::Update {
                        index: rng.gen_range(0..spec.len),
                        value: rng.gen_range(1..=spec.max_value),
                    }
                } else {
                    let left = rng.gen_range(0..spec.len);
                    Query::Range {
                        left,
                        right: rng.gen_range(left..spec.len),
                    }
                }
            })
            .collect();

        Self { array, queries }
    }

    pub fn update_count(&self) -> usize {
        self.queries
            .iter()
            .filter(|q| matches!(q, Query::Update { .. }))
            .count()
    }
}
