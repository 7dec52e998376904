//! Static multi-level range trees.
//!
//! - [`OrderedRangeIndex`] answers `[lo, hi]` queries over a set of ordered values.
//! - [`PlanarRangeIndex`] answers `[x_min, x_max] x [y_min, y_max]` queries over a set of
//! points. Every node of its x-tree owns an [`OrderedRangeIndex`] of its subtree ordered by y.
//!
//! # Contracts:
//! - Both indices are built once and are never mutated afterwards
//! - Duplicate inputs are collapsed, the indices hold sets
//! - All bounds are inclusive
//!
pub mod ordered;
pub mod planar;

pub use ordered::OrderedRangeIndex;
pub use planar::PlanarRangeIndex;

use std::ops::Deref;

/// Input sizes at or above this are split across threads while building.
pub const PARALLEL_BUILD_THRESHOLD: usize = 1 << 12;

/// Points order by `x` first, then `y`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct Point<C = i32>(pub [C; 2]);

impl<C> Deref for Point<C> {
    type Target = [C; 2];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<C> From<(C, C)> for Point<C> {
    fn from((x, y): (C, C)) -> Self {
        Self([x, y])
    }
}

impl<C: Copy> Point<C> {
    pub fn new(x: C, y: C) -> Self {
        Self([x, y])
    }

    pub fn x(&self) -> C {
        self.0[0]
    }

    pub fn y(&self) -> C {
        self.0[1]
    }
}

impl<C: Ord + Copy> Point<C> {
    /// Return whether the point is within the closed AABB spanned by `from` and `to`
    pub fn intersects_aabb(&self, from: &Self, to: &Self) -> bool {
        let [x, y] = self.0;
        from[0] <= x && from[1] <= y && x <= to[0] && y <= to[1]
    }
}
