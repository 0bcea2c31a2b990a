//! Splay tree used as a self-adjusting memoization store
//!
//! Every `search` and `insert` splays the tree toward the requested key, so the
//! key (or the last node visited on a miss) ends up at the root. Children are
//! exclusively owned boxes; a rotation hands ownership of subtrees around and
//! returns the new local root. Splaying keeps its pending ancestors on an
//! explicit stack, so deep paths do not consume call stack.
//!
//! The tree never evicts. Balance comes only from move-to-root, not from
//! height bookkeeping.

use std::cmp::Ordering;

use num_bigint::BigUint;

use crate::stats::CacheStats;

type Link<K, V> = Option<Box<Node<K, V>>>;

struct Node<K, V> {
    key: K,
    value: V,
    left: Link<K, V>,
    right: Link<K, V>,
}

impl<K, V> Node<K, V> {
    fn new(key: K, value: V) -> Box<Self> {
        Box::new(Self {
            key,
            value,
            left: None,
            right: None,
        })
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

impl Side {
    fn toward<K: Ord>(key: &K, node_key: &K) -> Option<Side> {
        match key.cmp(node_key) {
            Ordering::Less => Some(Side::Left),
            Ordering::Greater => Some(Side::Right),
            Ordering::Equal => None,
        }
    }
}

impl<K, V> Node<K, V> {
    fn child(&mut self, side: Side) -> &mut Link<K, V> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

fn rotate_right<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    match node.left.take() {
        Some(mut pivot) => {
            node.left = pivot.right.take();
            pivot.right = Some(node);
            pivot
        }
        None => node,
    }
}

fn rotate_left<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    match node.right.take() {
        Some(mut pivot) => {
            node.right = pivot.left.take();
            pivot.left = Some(node);
            pivot
        }
        None => node,
    }
}

/// Rotate so the child on `side` becomes the local root
fn lift<K, V>(node: Box<Node<K, V>>, side: Side) -> Box<Node<K, V>> {
    match side {
        Side::Left => rotate_right(node),
        Side::Right => rotate_left(node),
    }
}

/// A node and its child detached on the way down, waiting for the splayed
/// grandchild subtree to come back up.
struct Frame<K, V> {
    node: Box<Node<K, V>>,
    child: Box<Node<K, V>>,
    outer: Side,
    inner: Side,
}

/// Bring `key`, or the last node on its search path, to the top of `root`.
///
/// Top-down zig / zig-zig / zig-zag splaying. The descent consumes two levels
/// per step and parks them in an explicit stack, so path length is bounded by
/// heap, not by the call stack.
fn splay<K: Ord, V>(root: Link<K, V>, key: &K) -> Link<K, V> {
    let mut frames: Vec<Frame<K, V>> = Vec::new();
    let mut current = root;

    let mut result = loop {
        let Some(mut node) = current else {
            break None;
        };
        let Some(outer) = Side::toward(key, &node.key) else {
            break Some(node);
        };
        let Some(mut child) = node.child(outer).take() else {
            break Some(node);
        };
        let Some(inner) = Side::toward(key, &child.key) else {
            // zig
            *node.child(outer) = Some(child);
            break Some(lift(node, outer));
        };

        current = child.child(inner).take();
        frames.push(Frame {
            node,
            child,
            outer,
            inner,
        });
    };

    while let Some(Frame {
        mut node,
        mut child,
        outer,
        inner,
    }) = frames.pop()
    {
        *child.child(inner) = result;

        let top = if outer == inner {
            // zig-zig
            *node.child(outer) = Some(child);
            let mut top = lift(node, outer);
            if top.child(outer).is_some() {
                top = lift(top, outer);
            }
            top
        } else {
            // zig-zag
            if child.child(inner).is_some() {
                child = lift(child, inner);
            }
            *node.child(outer) = Some(child);
            lift(node, outer)
        };
        result = Some(top);
    }

    result
}

/// Self-adjusting binary search tree
pub struct SplayTree<K, V> {
    root: Link<K, V>,
    len: usize,
    stats: CacheStats,
}

/// Splay tree keyed by function argument, holding memoized results
pub type SplayMemo = SplayTree<u64, BigUint>;

impl<K: Ord, V> SplayTree<K, V> {
    /// Create an empty tree
    pub fn new() -> Self {
        Self {
            root: None,
            len: 0,
            stats: CacheStats::new(),
        }
    }

    /// Splay toward `key` and return its value if present
    ///
    /// The tree is restructured on hits and misses alike.
    pub fn search(&mut self, key: &K) -> Option<&V> {
        self.root = splay(self.root.take(), key);

        match &self.root {
            Some(node) if node.key == *key => {
                self.stats.record_hit();
                Some(&node.value)
            }
            _ => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// Insert `key -> value` unless `key` is already present
    ///
    /// An existing key keeps its stored value: a memoized result for an
    /// argument never changes. Either way `key` ends up at the root.
    /// Returns whether a node was added.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        let Some(mut root) = splay(self.root.take(), &key) else {
            self.root = Some(Node::new(key, value));
            self.len += 1;
            self.stats.record_insert();
            return true;
        };

        let ordering = key.cmp(&root.key);
        if ordering == Ordering::Equal {
            self.root = Some(root);
            return false;
        }

        let mut node = Node::new(key, value);
        if ordering == Ordering::Less {
            node.left = root.left.take();
            node.right = Some(root);
        } else {
            node.right = root.right.take();
            node.left = Some(root);
        }

        self.root = Some(node);
        self.len += 1;
        self.stats.record_insert();
        true
    }

    /// Key currently at the root
    pub fn root_key(&self) -> Option<&K> {
        self.root.as_ref().map(|node| &node.key)
    }

    /// In-order traversal; does not splay
    pub fn iter(&self) -> Iter<'_, K, V> {
        let mut iter = Iter { stack: Vec::new() };
        iter.push_left(self.root.as_deref());
        iter
    }

    /// Keys in ascending order; does not splay
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(key, _)| key)
    }

    /// Number of nodes on the longest root-to-leaf path
    pub fn height(&self) -> usize {
        let mut deepest = 0;
        let mut stack: Vec<(&Node<K, V>, usize)> = Vec::new();
        if let Some(root) = self.root.as_deref() {
            stack.push((root, 1));
        }

        while let Some((node, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            if let Some(left) = node.left.as_deref() {
                stack.push((left, depth + 1));
            }
            if let Some(right) = node.right.as_deref() {
                stack.push((right, depth + 1));
            }
        }

        deepest
    }
}

impl<K, V> SplayTree<K, V> {
    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the tree is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Discard every node and reset statistics
    pub fn clear(&mut self) {
        self.release();
        self.stats.reset();
    }

    /// Get lookup statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    // Tear down without recursion; sequential inserts build a spine as deep
    // as the tree is large.
    fn release(&mut self) {
        let mut stack: Vec<Box<Node<K, V>>> = self.root.take().into_iter().collect();
        while let Some(mut node) = stack.pop() {
            if let Some(left) = node.left.take() {
                stack.push(left);
            }
            if let Some(right) = node.right.take() {
                stack.push(right);
            }
        }
        self.len = 0;
    }
}

impl<K: Ord, V> Default for SplayTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Drop for SplayTree<K, V> {
    fn drop(&mut self) {
        self.release();
    }
}

/// In-order iterator over a [`SplayTree`]
pub struct Iter<'a, K, V> {
    stack: Vec<&'a Node<K, V>>,
}

impl<'a, K, V> Iter<'a, K, V> {
    fn push_left(&mut self, mut link: Option<&'a Node<K, V>>) {
        while let Some(node) = link {
            self.stack.push(node);
            link = node.left.as_deref();
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left(node.right.as_deref());
        Some((&node.key, &node.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_ordered(tree: &SplayTree<u64, u64>) {
        let keys: Vec<u64> = tree.keys().copied().collect();
        assert!(keys.windows(2).all(|w| w[0] < w[1]), "keys out of order: {:?}", keys);
        assert_eq!(keys.len(), tree.len());
    }

    #[test]
    fn test_splay_insert_and_search() {
        let mut tree = SplayTree::new();

        for key in [50, 30, 70, 20, 40, 60, 80] {
            assert!(tree.insert(key, key * 2));
            assert_eq!(tree.root_key(), Some(&key));
            assert_ordered(&tree);
        }

        assert_eq!(tree.search(&40), Some(&80));
        assert_eq!(tree.root_key(), Some(&40));
        assert_eq!(tree.search(&20), Some(&40));
        assert_eq!(tree.root_key(), Some(&20));
        assert_ordered(&tree);
    }

    #[test]
    fn test_splay_miss_still_restructures() {
        let mut tree = SplayTree::new();

        for key in [10, 20, 30, 40, 50] {
            tree.insert(key, key);
        }
        assert_eq!(tree.root_key(), Some(&50));

        assert_eq!(tree.search(&25), None);
        let root = *tree.root_key().unwrap();
        assert!(root == 20 || root == 30, "root {} not adjacent to 25", root);
        assert_ordered(&tree);
        assert_eq!(tree.stats().misses(), 1);
    }

    #[test]
    fn test_splay_insert_if_absent() {
        let mut tree = SplayTree::new();

        assert!(tree.insert(7, 1));
        assert!(tree.insert(3, 2));
        assert!(!tree.insert(7, 99));

        assert_eq!(tree.root_key(), Some(&7));
        assert_eq!(tree.search(&7), Some(&1));
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_splay_search_empty() {
        let mut tree: SplayTree<u64, u64> = SplayTree::new();

        assert_eq!(tree.search(&1), None);
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 0);
    }

    #[test]
    fn test_splay_sequential_inserts_form_spine() {
        let mut tree = SplayTree::new();

        for key in 0..100u64 {
            tree.insert(key, key);
        }
        assert_eq!(tree.height(), 100);

        // Splaying the deepest key roughly halves the spine
        assert_eq!(tree.search(&0), Some(&0));
        assert_eq!(tree.root_key(), Some(&0));
        assert!(tree.height() < 100);
        assert_ordered(&tree);
    }

    #[test]
    fn test_splay_zig_zag_paths() {
        let mut tree = SplayTree::new();

        for key in [50, 10, 90, 30, 70, 20, 80, 40, 60] {
            tree.insert(key, key);
        }

        for key in [35, 65, 15, 85, 45] {
            assert_eq!(tree.search(&key), None);
            assert_ordered(&tree);
        }
        for key in [30, 70, 20, 80, 40, 60] {
            assert_eq!(tree.search(&key), Some(&key));
            assert_eq!(tree.root_key(), Some(&key));
            assert_ordered(&tree);
        }
    }

    #[test]
    fn test_splay_repeated_search_is_stable() {
        let mut tree = SplayTree::new();

        for key in [5, 1, 9, 3] {
            tree.insert(key, key + 100);
        }

        for _ in 0..3 {
            assert_eq!(tree.search(&3), Some(&103));
            assert_eq!(tree.search(&9), Some(&109));
        }
        let values: Vec<u64> = tree.iter().map(|(_, v)| *v).collect();
        assert_eq!(values, vec![101, 103, 105, 109]);
    }

    #[test]
    fn test_splay_search_bottom_of_deep_spine() {
        let mut tree = SplayTree::new();

        for key in 0..200_000u64 {
            tree.insert(key, key);
        }

        assert_eq!(tree.search(&0), Some(&0));
        assert_eq!(tree.root_key(), Some(&0));
        assert_eq!(tree.search(&199_999), Some(&199_999));
        assert_eq!(tree.search(&100_000), Some(&100_000));
        assert_eq!(tree.len(), 200_000);
    }

    /// Recursive splay, used only to check that the stack-based one yields
    /// the same shapes.
    fn splay_recursive<K: Ord, V>(mut root: Box<Node<K, V>>, key: &K) -> Box<Node<K, V>> {
        match key.cmp(&root.key) {
            Ordering::Equal => root,
            Ordering::Less => {
                let Some(mut left) = root.left.take() else {
                    return root;
                };
                match key.cmp(&left.key) {
                    Ordering::Less => {
                        left.left = left.left.take().map(|sub| splay_recursive(sub, key));
                        root.left = Some(left);
                        root = rotate_right(root);
                    }
                    Ordering::Greater => {
                        left.right = left.right.take().map(|sub| splay_recursive(sub, key));
                        if left.right.is_some() {
                            left = rotate_left(left);
                        }
                        root.left = Some(left);
                    }
                    Ordering::Equal => root.left = Some(left),
                }
                if root.left.is_some() {
                    rotate_right(root)
                } else {
                    root
                }
            }
            Ordering::Greater => {
                let Some(mut right) = root.right.take() else {
                    return root;
                };
                match key.cmp(&right.key) {
                    Ordering::Greater => {
                        right.right = right.right.take().map(|sub| splay_recursive(sub, key));
                        root.right = Some(right);
                        root = rotate_left(root);
                    }
                    Ordering::Less => {
                        right.left = right.left.take().map(|sub| splay_recursive(sub, key));
                        if right.left.is_some() {
                            right = rotate_right(right);
                        }
                        root.right = Some(right);
                    }
                    Ordering::Equal => root.right = Some(right),
                }
                if root.right.is_some() {
                    rotate_left(root)
                } else {
                    root
                }
            }
        }
    }

    fn preorder(link: &Link<u64, u64>, out: &mut Vec<Option<u64>>) {
        match link {
            Some(node) => {
                out.push(Some(node.key));
                preorder(&node.left, out);
                preorder(&node.right, out);
            }
            None => out.push(None),
        }
    }

    fn shape(link: &Link<u64, u64>) -> Vec<Option<u64>> {
        let mut out = Vec::new();
        preorder(link, &mut out);
        out
    }

    #[test]
    fn test_splay_matches_recursive_shapes() {
        let keys: Vec<u64> = (0..300u64).map(|i| (i * 7919) % 1000).collect();
        let mut a = SplayTree::new();
        let mut b = SplayTree::new();
        for &key in &keys {
            a.insert(key, key);
            b.insert(key, key);
        }
        assert_eq!(shape(&a.root), shape(&b.root));

        // Hits, misses between keys, and misses past both ends
        let lookups = (0..400u64).map(|i| (i * 389 + 17) % 1100);
        for key in lookups {
            a.root = splay(a.root.take(), &key);
            b.root = b.root.take().map(|root| splay_recursive(root, &key));
            assert_eq!(shape(&a.root), shape(&b.root), "diverged splaying {}", key);
        }
    }

    #[test]
    fn test_splay_clear_and_deep_drop() {
        let mut tree = SplayTree::new();

        for key in 0..200_000u64 {
            tree.insert(key, key);
        }
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.root_key(), None);
        assert_eq!(tree.stats().inserts(), 0);

        let mut tree = SplayTree::new();
        for key in 0..200_000u64 {
            tree.insert(key, key);
        }
        drop(tree);
    }
}
