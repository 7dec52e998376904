//! One dimensional range tree.
//!
//! A balanced binary search tree over distinct values where every node also stores the sorted
//! values of its whole subtree. A query only walks down to the split node, then cuts the answer
//! out of that node's sorted values with two binary searches.

use crate::PARALLEL_BUILD_THRESHOLD;
use std::iter::FromIterator;
use std::mem::size_of;
use tracing::debug;

type Child<T> = Option<Box<Node<T>>>;

#[derive(Debug, Clone)]
struct Node<T> {
    value: T,
    left: Child<T>,
    right: Child<T>,
    // sorted, distinct; includes `value`
    subtree: Vec<T>,
}

#[derive(Debug, Clone)]
pub struct OrderedRangeIndex<T> {
    root: Child<T>,
    len: usize,
}

impl<T> Default for OrderedRangeIndex<T> {
    fn default() -> Self {
        Self { root: None, len: 0 }
    }
}

impl<T> OrderedRangeIndex<T>
where
    T: Ord + Copy + Send + Sync,
{
    /// Build the index over the distinct items of `values`.
    pub fn build<It>(values: It) -> Self
    where
        It: IntoIterator<Item = T>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        let input = values.len();
        values.sort_unstable();
        values.dedup();

        let res = Self::from_sorted_distinct(values);
        debug!(
            input,
            distinct = res.len,
            height = res.height(),
            "built ordered range index"
        );
        res
    }

    /// `values` must be sorted and must not contain duplicates.
    pub(crate) fn from_sorted_distinct(values: Vec<T>) -> Self {
        debug_assert!(
            values.windows(2).all(|w| w[0] < w[1]),
            "values must be sorted and distinct"
        );
        Self {
            len: values.len(),
            root: build_node(&values),
        }
    }
}

fn build_node<T>(values: &[T]) -> Child<T>
where
    T: Ord + Copy + Send + Sync,
{
    if values.is_empty() {
        return None;
    }
    let median = values.len() / 2;
    let (lo, hi) = (&values[..median], &values[median + 1..]);
    let (left, right) = if values.len() >= PARALLEL_BUILD_THRESHOLD {
        rayon::join(|| build_node(lo), || build_node(hi))
    } else {
        (build_node(lo), build_node(hi))
    };
    // left.subtree ++ [value] ++ right.subtree is exactly the input slice
    Some(Box::new(Node {
        value: values[median],
        left,
        right,
        subtree: values.to_vec(),
    }))
}

impl<T> OrderedRangeIndex<T>
where
    T: Ord + Copy,
{
    /// Return the values in `[lo, hi]`, sorted ascending.
    pub fn range(&self, lo: &T, hi: &T) -> &[T] {
        self.range_by_key(lo, hi, |v| *v)
    }

    pub fn range_query(&self, lo: T, hi: T) -> Vec<T> {
        self.range(&lo, &hi).to_vec()
    }

    /// Query on a projection of the values.
    ///
    /// `key` must be monotone in the ordering of `T`: `a <= b` implies `key(a) <= key(b)`.
    /// Several values may map to the same key, all of them are reported.
    pub(crate) fn range_by_key<K, F>(&self, lo: &K, hi: &K, key: F) -> &[T]
    where
        K: Ord,
        F: Fn(&T) -> K,
    {
        let mut node = self.root.as_deref();
        while let Some(n) = node {
            let k = key(&n.value);
            if k < *lo {
                node = n.right.as_deref();
            } else if k > *hi {
                node = n.left.as_deref();
            } else {
                // split node; its subtree holds every candidate
                let begin = n.subtree.partition_point(|v| key(v) < *lo);
                let end = n.subtree.partition_point(|v| key(v) <= *hi);
                debug_assert!(begin < end);
                return &n.subtree[begin..end];
            }
        }
        &[]
    }

    /// Number of distinct values
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// All distinct values, sorted ascending.
    pub fn values(&self) -> &[T] {
        self.root
            .as_ref()
            .map(|n| n.subtree.as_slice())
            .unwrap_or(&[])
    }

    /// Number of levels. 0 for an empty index.
    pub fn height(&self) -> usize {
        fn height<T>(node: &Child<T>) -> usize {
            node.as_ref()
                .map(|n| 1 + height(&n.left).max(height(&n.right)))
                .unwrap_or(0)
        }
        height(&self.root)
    }

    /// Approximate number of bytes allocated by the index.
    pub fn heap_size(&self) -> usize {
        fn heap_size<T>(node: &Child<T>) -> usize {
            node.as_ref()
                .map(|n| {
                    size_of::<Node<T>>()
                        + n.subtree.capacity() * size_of::<T>()
                        + heap_size(&n.left)
                        + heap_size(&n.right)
                })
                .unwrap_or(0)
        }
        heap_size(&self.root)
    }
}

impl<T> FromIterator<T> for OrderedRangeIndex<T>
where
    T: Ord + Copy + Send + Sync,
{
    fn from_iter<It: IntoIterator<Item = T>>(it: It) -> Self {
        Self::build(it)
    }
}
