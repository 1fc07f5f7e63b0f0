// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec;
use alloc::vec::Vec;

use kurbo::{Point, Rect};

use crate::node::{Node, quadrant_bounds};
use crate::tree::QuadTree;

/// A query shape for [`QuadTree::find_by_tester`].
///
/// `test_area` must return `true` for every rectangle that contains a point
/// accepted by `test`; it is the pruning pre-filter. `covers_area` may return
/// `true` only when every point of the rectangle is accepted by `test`.
pub trait Tester {
    /// Exact test for a single position.
    fn test(&self, point: Point) -> bool;

    /// Returns `true` if `area` may contain accepted points.
    fn test_area(&self, area: Rect) -> bool;

    /// Returns `true` if every point of `area` is accepted.
    ///
    /// Subtrees whose bounds are covered are collected without per-record
    /// tests. The default never claims coverage.
    fn covers_area(&self, area: Rect) -> bool {
        let _ = area;
        false
    }
}

impl<X: Tester + ?Sized> Tester for &X {
    fn test(&self, point: Point) -> bool {
        (**self).test(point)
    }

    fn test_area(&self, area: Rect) -> bool {
        (**self).test_area(area)
    }

    fn covers_area(&self, area: Rect) -> bool {
        (**self).covers_area(area)
    }
}

/// Accepts positions within a closed disk.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CircleTester {
    center: Point,
    radius: f64,
}

impl CircleTester {
    /// Create a tester for the disk at `center` with `radius`.
    ///
    /// A negative or NaN radius accepts nothing.
    #[must_use]
    pub fn new(center: Point, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Center of the disk.
    #[must_use]
    pub fn center(&self) -> Point {
        self.center
    }

    /// Radius of the disk.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    fn is_empty(&self) -> bool {
        self.radius.is_nan() || self.radius < 0.0
    }
}

impl Tester for CircleTester {
    fn test(&self, point: Point) -> bool {
        !self.is_empty() && (point - self.center).hypot2() <= self.radius * self.radius
    }

    fn test_area(&self, area: Rect) -> bool {
        if self.is_empty() {
            return false;
        }
        let square = Rect::new(
            self.center.x - self.radius,
            self.center.y - self.radius,
            self.center.x + self.radius,
            self.center.y + self.radius,
        );
        overlaps(square, area)
    }

    fn covers_area(&self, area: Rect) -> bool {
        [
            Point::new(area.x0, area.y0),
            Point::new(area.x1, area.y0),
            Point::new(area.x0, area.y1),
            Point::new(area.x1, area.y1),
        ]
        .into_iter()
        .all(|corner| self.test(corner))
    }
}

/// Returns `true` if two closed rectangles share at least one point.
///
/// Both rectangles are expected to be normalized (`x0 <= x1`, `y0 <= y1`).
#[must_use]
pub fn overlaps(a: Rect, b: Rect) -> bool {
    a.x0 <= b.x1 && b.x0 <= a.x1 && a.y0 <= b.y1 && b.y0 <= a.y1
}

/// A bounds predicate: does a rectangle overlap `region`?
///
/// `region` may be given with its corners in any order.
pub fn has_overlap(region: Rect) -> impl Fn(Rect) -> bool + Copy {
    let region = region.abs();
    move |area| overlaps(region, area)
}

impl<T> QuadTree<T> {
    /// Every record within `radius` of `(x, y)`, boundary included.
    ///
    /// A negative or NaN radius returns nothing; an infinite radius returns
    /// every record.
    #[must_use]
    pub fn find_all(&self, x: f64, y: f64, radius: f64) -> Vec<&T> {
        self.find_by_tester(&CircleTester::new(Point::new(x, y), radius))
    }

    /// Every record whose position is accepted by `tester`.
    ///
    /// Subtrees failing [`Tester::test_area`] are pruned, subtrees passing
    /// [`Tester::covers_area`] are collected wholesale, and the remaining
    /// leaves are tested one position at a time.
    #[must_use]
    pub fn find_by_tester<X: Tester + ?Sized>(&self, tester: &X) -> Vec<&T> {
        let mut out = Vec::new();
        let (Some(root), Some(bounds)) = (self.root(), self.extent()) else {
            return out;
        };
        let mut stack = vec![(root, bounds)];
        while let Some((node, bounds)) = stack.pop() {
            if !tester.test_area(bounds) {
                continue;
            }
            match node {
                Node::Leaf(leaf) => {
                    if tester.test(leaf.point()) {
                        out.extend(leaf.records());
                    }
                }
                Node::Internal(_) if tester.covers_area(bounds) => node.collect_into(&mut out),
                Node::Internal(children) => stack.extend(
                    children
                        .iter()
                        .enumerate()
                        .rev()
                        .filter_map(|(i, c)| c.as_ref().map(|c| (c, quadrant_bounds(bounds, i)))),
                ),
            }
        }
        out
    }
}
