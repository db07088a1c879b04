//! An order-statistics index: an AVL tree augmented with subtree sizes.

/// A self-balancing search tree that can count keys in a range in
/// O(log n) via rank arithmetic, and list them in O(log n + k).
///
/// Keys must be distinct under `Ord`; inserting an already-present key is
/// a no-op. The sweep guarantees distinctness by building keys with a
/// per-wire tie-break (see [`crate::WireKey`]).
#[derive(Clone, Debug)]
pub struct RangeIndex<K> {
    root: Option<Box<Node<K>>>,
}

impl<K> Default for RangeIndex<K> {
    fn default() -> Self {
        RangeIndex { root: None }
    }
}

#[derive(Clone, Debug)]
struct Node<K> {
    key: K,
    // Height of the subtree rooted here; a leaf has height 1.
    height: u32,
    // Number of keys in the subtree rooted here, this one included.
    size: usize,
    left: Option<Box<Node<K>>>,
    right: Option<Box<Node<K>>>,
}

fn height<K>(node: &Option<Box<Node<K>>>) -> u32 {
    node.as_ref().map_or(0, |n| n.height)
}

fn size<K>(node: &Option<Box<Node<K>>>) -> usize {
    node.as_ref().map_or(0, |n| n.size)
}

impl<K> Node<K> {
    fn new(key: K) -> Box<Self> {
        Box::new(Node {
            key,
            height: 1,
            size: 1,
            left: None,
            right: None,
        })
    }

    // Recompute height and size from the children. Must be called after
    // every structural change, bottom-up.
    fn update(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
        self.size = 1 + size(&self.left) + size(&self.right);
    }

    // Positive when left-heavy, negative when right-heavy.
    fn balance(&self) -> i64 {
        height(&self.left) as i64 - height(&self.right) as i64
    }
}

fn rotate_left<K>(mut node: Box<Node<K>>) -> Box<Node<K>> {
    // unwrap: callers only rotate left when a right child exists
    let mut pivot = node.right.take().unwrap();
    node.right = pivot.left.take();
    node.update();
    pivot.left = Some(node);
    pivot.update();
    pivot
}

fn rotate_right<K>(mut node: Box<Node<K>>) -> Box<Node<K>> {
    // unwrap: callers only rotate right when a left child exists
    let mut pivot = node.left.take().unwrap();
    node.left = pivot.right.take();
    node.update();
    pivot.right = Some(node);
    pivot.update();
    pivot
}

// Restore the AVL bound at `node`, assuming both subtrees already satisfy
// it and differ in height by at most 2. The double-rotation cases are
// picked by the taller child's own balance.
fn rebalance<K>(mut node: Box<Node<K>>) -> Box<Node<K>> {
    node.update();
    let balance = node.balance();
    if balance > 1 {
        // unwrap: left-heavy by 2 implies a left child
        if node.left.as_ref().unwrap().balance() < 0 {
            node.left = Some(rotate_left(node.left.take().unwrap()));
        }
        rotate_right(node)
    } else if balance < -1 {
        // unwrap: right-heavy by 2 implies a right child
        if node.right.as_ref().unwrap().balance() > 0 {
            node.right = Some(rotate_right(node.right.take().unwrap()));
        }
        rotate_left(node)
    } else {
        node
    }
}

fn insert_at<K: Ord>(node: Option<Box<Node<K>>>, key: K) -> Box<Node<K>> {
    let Some(mut node) = node else {
        return Node::new(key);
    };
    match key.cmp(&node.key) {
        std::cmp::Ordering::Less => node.left = Some(insert_at(node.left.take(), key)),
        std::cmp::Ordering::Greater => node.right = Some(insert_at(node.right.take(), key)),
        // The key is already present; the tree holds no duplicates.
        std::cmp::Ordering::Equal => return node,
    }
    rebalance(node)
}

fn remove_at<K: Ord>(node: Option<Box<Node<K>>>, key: &K) -> Option<Box<Node<K>>> {
    let mut node = node?;
    match key.cmp(&node.key) {
        std::cmp::Ordering::Less => node.left = remove_at(node.left.take(), key),
        std::cmp::Ordering::Greater => node.right = remove_at(node.right.take(), key),
        std::cmp::Ordering::Equal => match (node.left.take(), node.right.take()) {
            (None, None) => return None,
            (Some(child), None) | (None, Some(child)) => return Some(child),
            (left, Some(right)) => {
                // Two children: the in-order successor replaces this key,
                // and its extraction path gets rebalanced on the way out.
                let (right, successor) = take_min(right);
                node.key = successor;
                node.left = left;
                node.right = right;
            }
        },
    }
    Some(rebalance(node))
}

// Detach the smallest key of the subtree, returning what remains of it.
fn take_min<K>(mut node: Box<Node<K>>) -> (Option<Box<Node<K>>>, K) {
    match node.left.take() {
        None => (node.right.take(), node.key),
        Some(left) => {
            let (left, min) = take_min(left);
            node.left = left;
            (Some(rebalance(node)), min)
        }
    }
}

// The number of keys ordering at or before `key`: accumulate the left
// subtree (plus the node itself) every time the descent turns right or
// matches.
fn rank<K: Ord>(node: &Option<Box<Node<K>>>, key: &K) -> usize {
    let Some(node) = node else {
        return 0;
    };
    match key.cmp(&node.key) {
        std::cmp::Ordering::Less => rank(&node.left, key),
        std::cmp::Ordering::Equal => size(&node.left) + 1,
        std::cmp::Ordering::Greater => size(&node.left) + 1 + rank(&node.right, key),
    }
}

// In-order collection pruned to [lo, hi]: skip a subtree only when the
// current key already bounds it out of the interval.
fn collect_range<K: Ord + Clone>(node: &Node<K>, lo: &K, hi: &K, out: &mut Vec<K>) {
    if *lo <= node.key {
        if let Some(left) = &node.left {
            collect_range(left, lo, hi, out);
        }
    }
    if *lo <= node.key && node.key <= *hi {
        out.push(node.key.clone());
    }
    if node.key <= *hi {
        if let Some(right) = &node.right {
            collect_range(right, lo, hi, out);
        }
    }
}

impl<K: Ord> RangeIndex<K> {
    /// Creates an empty index.
    pub fn new() -> Self {
        RangeIndex { root: None }
    }

    /// The number of stored keys.
    pub fn len(&self) -> usize {
        size(&self.root)
    }

    /// Are we empty?
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Inserts a key, rebalancing every touched ancestor.
    ///
    /// Inserting a key that is already present does nothing.
    pub fn insert(&mut self, key: K) {
        self.root = Some(insert_at(self.root.take(), key));
    }

    /// Removes a key.
    ///
    /// The sweep only ever removes keys it previously inserted; removing
    /// an absent key does nothing.
    pub fn remove(&mut self, key: &K) {
        self.root = remove_at(self.root.take(), key);
    }

    /// The number of stored keys in the closed interval `[lo, hi]`,
    /// computed as a rank difference.
    ///
    /// Callers pass sentinel bounds (keys that sort strictly before/after
    /// every stored key sharing their value) so that the difference counts
    /// the interval endpoints inclusively.
    pub fn count(&self, lo: &K, hi: &K) -> usize {
        rank(&self.root, hi) - rank(&self.root, lo)
    }

    /// All stored keys in the closed interval `[lo, hi]`, ascending.
    pub fn list(&self, lo: &K, hi: &K) -> Vec<K>
    where
        K: Clone,
    {
        // Walk down to the first node inside the interval. Above that
        // point the search paths of the two bounds coincide, so no key
        // off the shared path can land between them.
        let mut node = self.root.as_deref();
        while let Some(n) = node {
            if *lo <= n.key && n.key <= *hi {
                break;
            }
            node = if *lo < n.key {
                n.left.as_deref()
            } else {
                n.right.as_deref()
            };
        }

        let mut out = Vec::new();
        if let Some(n) = node {
            collect_range(n, lo, hi, &mut out);
        }
        out
    }

    /// Checks the search-order, balance, and size invariants of the whole
    /// tree, panicking on any violation.
    ///
    /// For tests and debugging only; the operations above maintain the
    /// invariants unconditionally.
    pub fn check_invariants(&self) {
        check_node(&self.root, None, None);
    }
}

fn check_node<K: Ord>(node: &Option<Box<Node<K>>>, lo: Option<&K>, hi: Option<&K>) -> (u32, usize) {
    let Some(node) = node else {
        return (0, 0);
    };
    if let Some(lo) = lo {
        assert!(*lo < node.key, "search order violated");
    }
    if let Some(hi) = hi {
        assert!(node.key < *hi, "search order violated");
    }
    let (left_height, left_size) = check_node(&node.left, lo, Some(&node.key));
    let (right_height, right_size) = check_node(&node.right, Some(&node.key), hi);
    assert!(left_height.abs_diff(right_height) <= 1, "balance violated");
    assert_eq!(node.height, 1 + left_height.max(right_height));
    assert_eq!(node.size, 1 + left_size + right_size);
    (node.height, node.size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // Keys in the style the sweep stores: a value plus a tie-break, with
    // query bounds built so that `low` sorts before every stored key at
    // its value and `high` after. Stored keys use tie-break 0.
    fn stored(value: i32, id: i32) -> (i32, i32, i32) {
        (value, 0, id)
    }

    fn low(value: i32) -> (i32, i32, i32) {
        (value, -1, 0)
    }

    fn high(value: i32) -> (i32, i32, i32) {
        (value, 1, 0)
    }

    fn naive_count(values: &[i32], lo: i32, hi: i32) -> usize {
        values.iter().filter(|&&v| lo <= v && v <= hi).count()
    }

    #[test]
    fn insert_count_list() {
        let mut index = RangeIndex::new();
        for v in [5, 1, 9, 3, 7] {
            index.insert(stored(v, 0));
            index.check_invariants();
        }
        assert_eq!(index.len(), 5);
        assert_eq!(index.count(&low(3), &high(7)), 3);
        assert_eq!(
            index.list(&low(3), &high(7)),
            vec![stored(3, 0), stored(5, 0), stored(7, 0)]
        );
        assert_eq!(index.list(&low(-10), &high(0)), vec![]);
    }

    #[test]
    fn count_includes_both_endpoints() {
        // The sentinel bounds are what makes the rank difference count
        // the closed interval; these are the off-by-one traps.
        let mut index = RangeIndex::new();
        for v in 0..10 {
            index.insert(stored(v, 0));
        }
        assert_eq!(index.count(&low(2), &high(2)), 1);
        assert_eq!(index.count(&low(0), &high(9)), 10);
        assert_eq!(index.count(&low(9), &high(9)), 1);
        assert_eq!(index.count(&low(10), &high(20)), 0);
        assert_eq!(index.count(&low(-5), &high(0)), 1);
    }

    #[test]
    fn equal_values_are_distinct_keys() {
        let mut index = RangeIndex::new();
        for id in 0..4 {
            index.insert(stored(7, id));
            index.check_invariants();
        }
        assert_eq!(index.len(), 4);
        assert_eq!(index.count(&low(7), &high(7)), 4);
        index.remove(&stored(7, 2));
        index.check_invariants();
        assert_eq!(index.count(&low(7), &high(7)), 3);
    }

    #[test]
    fn remove_all_three_shapes() {
        let mut index = RangeIndex::new();
        for k in [4, 2, 6, 1, 3, 5, 7] {
            index.insert(k);
        }
        // leaf
        index.remove(&1);
        index.check_invariants();
        // one child
        index.remove(&2);
        index.check_invariants();
        // two children (the root)
        index.remove(&4);
        index.check_invariants();
        assert_eq!(index.list(&0, &10), vec![3, 5, 6, 7]);
    }

    #[test]
    fn stays_balanced_under_sorted_inserts() {
        let mut index = RangeIndex::new();
        for k in 0..100 {
            index.insert(k);
            index.check_invariants();
        }
        for k in 0..50 {
            index.remove(&k);
            index.check_invariants();
        }
        assert_eq!(index.len(), 50);
    }

    #[test]
    fn duplicate_insert_is_a_no_op() {
        let mut index = RangeIndex::new();
        index.insert(3);
        index.insert(3);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn remove_absent_is_a_no_op() {
        let mut index = RangeIndex::new();
        index.insert(3);
        index.remove(&4);
        assert_eq!(index.len(), 1);
        index.check_invariants();
    }

    proptest! {
        #[test]
        fn invariants_hold_under_mixed_ops(ops: Vec<(bool, i8)>) {
            let mut index = RangeIndex::new();
            let mut model: Vec<i8> = Vec::new();
            for (is_insert, key) in ops {
                if is_insert {
                    if !model.contains(&key) {
                        model.push(key);
                    }
                    index.insert(key);
                } else {
                    model.retain(|&k| k != key);
                    index.remove(&key);
                }
                index.check_invariants();
                prop_assert_eq!(index.len(), model.len());
            }
        }

        #[test]
        fn count_matches_naive_filter(values: Vec<i32>, lo: i32, hi: i32) {
            // Values may repeat; the tie-break keeps the keys distinct,
            // which is exactly how the sweep stores equal y-coordinates.
            let mut index = RangeIndex::new();
            for (id, &v) in values.iter().enumerate() {
                index.insert(stored(v, id as i32));
            }
            let (lo, hi) = (lo.min(hi), lo.max(hi));
            prop_assert_eq!(
                index.count(&low(lo), &high(hi)),
                naive_count(&values, lo, hi)
            );
        }

        #[test]
        fn list_agrees_with_count(values: Vec<i32>, lo: i32, hi: i32) {
            let mut index = RangeIndex::new();
            for (id, &v) in values.iter().enumerate() {
                index.insert(stored(v, id as i32));
            }
            let (lo, hi) = (lo.min(hi), lo.max(hi));
            let listed = index.list(&low(lo), &high(hi));
            prop_assert_eq!(listed.len(), index.count(&low(lo), &high(hi)));
            let mut sorted = listed.clone();
            sorted.sort_unstable();
            prop_assert_eq!(listed, sorted);
        }

        #[test]
        fn count_is_insertion_order_independent(values: Vec<i32>, lo: i32, hi: i32) {
            let mut forward = RangeIndex::new();
            let mut backward = RangeIndex::new();
            let keys: Vec<_> = values
                .iter()
                .enumerate()
                .map(|(id, &v)| stored(v, id as i32))
                .collect();
            for &k in &keys {
                forward.insert(k);
            }
            for &k in keys.iter().rev() {
                backward.insert(k);
            }
            let (lo, hi) = (lo.min(hi), lo.max(hi));
            prop_assert_eq!(
                forward.count(&low(lo), &high(hi)),
                backward.count(&low(lo), &high(hi))
            );
            prop_assert_eq!(
                forward.list(&low(lo), &high(hi)),
                backward.list(&low(lo), &high(hi))
            );
        }
    }
}
