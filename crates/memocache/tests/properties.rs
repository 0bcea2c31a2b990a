use std::collections::BTreeMap;

use memocache::{
    fibonacci, fibonacci_iterative, range_sum, range_sum_cached, update_cached, BigUint, LruCache,
    LruMemo, MemoStore, RangeCache, SplayMemo, SplayTree, UnboundedMemo,
};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Query {
    Range(usize, usize),
    Update(usize, i64),
}

fn query(len: usize) -> impl Strategy<Value = Query> {
    prop_oneof![
        7 => (0..len, 0..len).prop_map(|(a, b)| Query::Range(a.min(b), a.max(b))),
        3 => (0..len, 1i64..1000).prop_map(|(i, v)| Query::Update(i, v)),
    ]
}

fn workload() -> impl Strategy<Value = (Vec<i64>, usize, Vec<Query>)> {
    (1usize..40).prop_flat_map(|len| {
        (
            prop::collection::vec(1i64..1000, len),
            0usize..12,
            prop::collection::vec(query(len), 0..200),
        )
    })
}

fn check_splay_order(tree: &SplayTree<u32, u32>) -> Result<(), TestCaseError> {
    let keys: Vec<u32> = tree.keys().copied().collect();
    prop_assert!(keys.windows(2).all(|w| w[0] < w[1]));
    prop_assert_eq!(keys.len(), tree.len());
    Ok(())
}

proptest! {
    /// Cached sums always match a direct recomputation on the current array.
    #[test]
    fn prop_cached_sums_never_stale((array, capacity, queries) in workload()) {
        let mut array = array;
        let mut cache = RangeCache::new(capacity);

        for q in queries {
            match q {
                Query::Range(l, r) => {
                    let cached = range_sum_cached(&mut cache, &array, l, r).unwrap();
                    prop_assert_eq!(cached, range_sum(&array, l, r).unwrap());
                }
                Query::Update(i, v) => update_cached(&mut cache, &mut array, i, v).unwrap(),
            }
            prop_assert!(cache.len() <= cache.capacity());
        }
    }

    /// A range survives invalidation exactly when it does not cover the index.
    #[test]
    fn prop_invalidate_removes_exactly_overlaps(
        ranges in prop::collection::vec((0usize..50, 0usize..50), 0..30),
        index in 0usize..50,
    ) {
        let mut cache = RangeCache::new(64);
        for &(a, b) in &ranges {
            cache.put(a.min(b), a.max(b), 0);
        }
        let before: Vec<_> = cache.keys().collect();

        cache.invalidate(index);

        for (l, r) in before {
            prop_assert_eq!(cache.contains(l, r), index < l || index > r);
        }
    }

    /// LRU order matches a simple vector model.
    #[test]
    fn prop_lru_matches_model(
        capacity in 0usize..8,
        ops in prop::collection::vec((any::<bool>(), 0u8..16), 0..200),
    ) {
        let mut cache = LruCache::new(capacity);
        let mut model: Vec<u8> = Vec::new(); // MRU first

        for (is_put, key) in ops {
            if is_put {
                cache.put(key, key);
                if capacity == 0 {
                    continue;
                }
                if let Some(pos) = model.iter().position(|&k| k == key) {
                    model.remove(pos);
                } else if model.len() == capacity {
                    model.pop();
                }
                model.insert(0, key);
            } else {
                let hit = cache.get(&key).is_some();
                let pos = model.iter().position(|&k| k == key);
                prop_assert_eq!(hit, pos.is_some());
                if let Some(pos) = pos {
                    model.remove(pos);
                    model.insert(0, key);
                }
            }

            let keys: Vec<u8> = cache.iter().map(|(k, _)| *k).collect();
            prop_assert_eq!(&keys, &model);
        }
    }

    /// The tree stays ordered, the touched key surfaces, and stored values never change.
    #[test]
    fn prop_splay_matches_model(
        ops in prop::collection::vec((any::<bool>(), 0u32..64, any::<u32>()), 0..300),
    ) {
        let mut tree = SplayTree::new();
        let mut model = BTreeMap::new();

        for (is_insert, key, value) in ops {
            if is_insert {
                let added = tree.insert(key, value);
                prop_assert_eq!(added, !model.contains_key(&key));
                model.entry(key).or_insert(value);
                prop_assert_eq!(tree.root_key(), Some(&key));
            } else {
                let found = tree.search(&key).copied();
                prop_assert_eq!(found, model.get(&key).copied());
                if found.is_some() {
                    prop_assert_eq!(tree.root_key(), Some(&key));
                }
            }
            check_splay_order(&tree)?;
        }

        let contents: Vec<(u32, u32)> = tree.iter().map(|(k, v)| (*k, *v)).collect();
        let expected: Vec<(u32, u32)> = model.into_iter().collect();
        prop_assert_eq!(contents, expected);
    }
}

#[test]
fn test_fibonacci_agrees_across_backends() {
    let mut unbounded = UnboundedMemo::new();
    let mut lru = LruMemo::new(16);

    for n in [0u64, 1, 2, 10, 30, 50, 200, 950] {
        let mut splay = SplayMemo::new();
        let want = fibonacci_iterative(n);

        assert_eq!(fibonacci(n, &mut splay).unwrap(), want);
        assert_eq!(fibonacci(n, &mut unbounded).unwrap(), want);
        assert_eq!(fibonacci(n, &mut lru).unwrap(), want);
    }

    assert_eq!(fibonacci_iterative(50), BigUint::from(12_586_269_025u64));
}

#[test]
fn test_fibonacci_through_trait_object() {
    let mut backends: Vec<Box<dyn MemoStore>> = vec![
        Box::new(SplayMemo::new()),
        Box::new(UnboundedMemo::new()),
        Box::new(LruMemo::new(4)),
    ];

    for memo in backends.iter_mut() {
        assert_eq!(
            fibonacci(90, memo.as_mut()).unwrap(),
            BigUint::from(2_880_067_194_370_816_120u64)
        );
        assert!(memo.stats().misses() > 0);
    }
}

#[test]
fn test_shared_splay_memo_reused_across_runs() {
    let mut memo = SplayMemo::new();

    for _ in 0..10 {
        assert_eq!(fibonacci(100, &mut memo).unwrap(), fibonacci_iterative(100));
    }
    assert_eq!(memo.len(), 99);
    assert_eq!(memo.stats().inserts(), 99);
}
