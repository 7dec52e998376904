//! Two dimensional range tree.
//!
//! The primary tree is a balanced binary search tree over the points ordered by `x`. Every node
//! owns an [`OrderedRangeIndex`] over its canonical subset (the points of its subtree) ordered
//! by `y`. A query walks the two search paths for `x_min` and `x_max` below the split node and
//! answers every subtree hanging between them with a single y query on that subtree's index.
mod merge;

use crate::{OrderedRangeIndex, Point, PARALLEL_BUILD_THRESHOLD};
use merge::merge;
use std::cmp::Ordering;
use std::iter::FromIterator;
use std::mem::size_of;
use tracing::{debug, trace};

/// Orders points by `y`, then `x`.
///
/// Distinct points stay distinct under this ordering, so the y index of a node holds every
/// point of the subtree, even if several of them share their `y`.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub(crate) struct YOrdered<C>(Point<C>);

impl<C: Ord + Copy> Ord for YOrdered<C> {
    fn cmp(&self, rhs: &Self) -> Ordering {
        let [x1, y1] = (self.0).0;
        let [x2, y2] = (rhs.0).0;
        y1.cmp(&y2).then(x1.cmp(&x2))
    }
}

impl<C: Ord + Copy> PartialOrd for YOrdered<C> {
    fn partial_cmp(&self, rhs: &Self) -> Option<Ordering> {
        Some(self.cmp(rhs))
    }
}

type Child<C> = Option<Box<Node<C>>>;

#[derive(Debug, Clone)]
struct Node<C> {
    point: Point<C>,
    left: Child<C>,
    right: Child<C>,
    by_y: OrderedRangeIndex<YOrdered<C>>,
}

#[derive(Debug, Clone)]
pub struct PlanarRangeIndex<C = i32> {
    root: Child<C>,
    len: usize,
}

impl<C> Default for PlanarRangeIndex<C> {
    fn default() -> Self {
        Self { root: None, len: 0 }
    }
}

impl<C> PlanarRangeIndex<C>
where
    C: Ord + Copy + Send + Sync,
{
    /// Build the index over the distinct items of `points`.
    pub fn build<It>(points: It) -> Self
    where
        It: IntoIterator<Item = Point<C>>,
    {
        let mut points = points.into_iter().collect::<Vec<_>>();
        let input = points.len();
        points.sort_unstable();
        points.dedup();

        let res = Self {
            len: points.len(),
            root: build_node(&points),
        };
        debug!(
            input,
            distinct = res.len,
            height = res.height(),
            "built planar range index"
        );
        res
    }
}

/// `points` must be sorted by x and distinct.
fn build_node<C>(points: &[Point<C>]) -> Child<C>
where
    C: Ord + Copy + Send + Sync,
{
    if points.is_empty() {
        return None;
    }
    let median = points.len() / 2;
    let (lo, hi) = (&points[..median], &points[median + 1..]);
    let (left, right) = if points.len() >= PARALLEL_BUILD_THRESHOLD {
        rayon::join(|| build_node(lo), || build_node(hi))
    } else {
        (build_node(lo), build_node(hi))
    };

    let point = points[median];
    let canonical = merge(y_sorted(&left), YOrdered(point), y_sorted(&right));
    trace!(len = canonical.len(), "built planar node");

    Some(Box::new(Node {
        point,
        left,
        right,
        by_y: OrderedRangeIndex::from_sorted_distinct(canonical),
    }))
}

fn y_sorted<C: Ord + Copy>(node: &Child<C>) -> &[YOrdered<C>] {
    node.as_ref().map(|n| n.by_y.values()).unwrap_or(&[])
}

impl<C> PlanarRangeIndex<C>
where
    C: Ord + Copy,
{
    /// Return the points of the closed rectangle `[x_min, x_max] x [y_min, y_max]`.
    ///
    /// The points are in traversal order, not sorted.
    pub fn range_query(&self, x_min: C, x_max: C, y_min: C, y_max: C) -> Vec<Point<C>> {
        let mut out = Vec::new();
        self.find_in_range(
            &Point::new(x_min, y_min),
            &Point::new(x_max, y_max),
            &mut out,
        );
        out
    }

    /// Append the points of the closed AABB spanned by `from` and `to` to `out`.
    pub fn find_in_range(&self, from: &Point<C>, to: &Point<C>, out: &mut Vec<Point<C>>) {
        let [x_min, y_min] = from.0;
        let [x_max, y_max] = to.0;

        let mut split = self.root.as_deref();
        while let Some(n) = split {
            let x = n.point.x();
            if x < x_min {
                split = n.right.as_deref();
            } else if x > x_max {
                split = n.left.as_deref();
            } else {
                break;
            }
        }
        let split = match split {
            Some(n) => n,
            None => return,
        };

        let report = |n: &Node<C>, out: &mut Vec<Point<C>>| {
            if n.point.intersects_aabb(from, to) {
                out.push(n.point);
            }
        };
        // every point of `subtree` is known to be within [x_min, x_max]
        let report_subtree = |subtree: &Child<C>, out: &mut Vec<Point<C>>| {
            if let Some(n) = subtree {
                let ys = n.by_y.range_by_key(&y_min, &y_max, |p| p.0.y());
                out.extend(ys.iter().map(|p| p.0));
            }
        };

        report(split, out);

        // x_min path: everything right of it is inside the band
        let mut node = split.left.as_deref();
        while let Some(n) = node {
            if n.point.x() >= x_min {
                report(n, out);
                report_subtree(&n.right, out);
                node = n.left.as_deref();
            } else {
                node = n.right.as_deref();
            }
        }

        // x_max path: everything left of it is inside the band
        let mut node = split.right.as_deref();
        while let Some(n) = node {
            if n.point.x() <= x_max {
                report(n, out);
                report_subtree(&n.left, out);
                node = n.right.as_deref();
            } else {
                node = n.left.as_deref();
            }
        }
    }

    /// Same result set as [`range_query`](Self::range_query), but found by visiting every node
    /// whose `x` is inside `[x_min, x_max]` and checking its `y` directly.
    ///
    /// Linear in the number of points inside the x band.
    pub fn scan_range_query(&self, x_min: C, x_max: C, y_min: C, y_max: C) -> Vec<Point<C>> {
        fn scan<C: Ord + Copy>(
            node: &Child<C>,
            from: &Point<C>,
            to: &Point<C>,
            out: &mut Vec<Point<C>>,
        ) {
            let n = match node {
                Some(n) => n,
                None => return,
            };
            let x = n.point.x();
            if from[0] <= x && x <= to[0] {
                if n.point.intersects_aabb(from, to) {
                    out.push(n.point);
                }
                scan(&n.left, from, to, out);
                scan(&n.right, from, to, out);
            } else if x < from[0] {
                scan(&n.right, from, to, out);
            } else {
                scan(&n.left, from, to, out);
            }
        }

        let mut out = Vec::new();
        scan(
            &self.root,
            &Point::new(x_min, y_min),
            &Point::new(x_max, y_max),
            &mut out,
        );
        out
    }

    /// Number of distinct points
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of levels of the x-tree. 0 for an empty index.
    pub fn height(&self) -> usize {
        fn height<C>(node: &Child<C>) -> usize {
            node.as_ref()
                .map(|n| 1 + height(&n.left).max(height(&n.right)))
                .unwrap_or(0)
        }
        height(&self.root)
    }

    /// Approximate number of bytes allocated by the index, nested y indices included.
    pub fn heap_size(&self) -> usize {
        fn heap_size<C: Ord + Copy>(node: &Child<C>) -> usize {
            node.as_ref()
                .map(|n| {
                    size_of::<Node<C>>()
                        + n.by_y.heap_size()
                        + heap_size(&n.left)
                        + heap_size(&n.right)
                })
                .unwrap_or(0)
        }
        heap_size(&self.root)
    }
}

impl<C> FromIterator<Point<C>> for PlanarRangeIndex<C>
where
    C: Ord + Copy + Send + Sync,
{
    fn from_iter<It: IntoIterator<Item = Point<C>>>(it: It) -> Self {
        Self::build(it)
    }
}
