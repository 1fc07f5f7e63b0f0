// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use kurbo::{Point, Rect};
use understory_quadtree::{Tester, overlaps};

/// Convex hull of `points`, counter-clockwise, starting from the lowest `x`.
///
/// Duplicate and collinear points are dropped. Fewer than three distinct
/// points, or points on a single line, yield a hull of one or two vertices.
#[must_use]
pub fn convex_hull(points: &[Point]) -> Vec<Point> {
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    sorted.dedup();
    if sorted.len() < 3 {
        return sorted;
    }

    let mut lower: Vec<Point> = Vec::with_capacity(sorted.len());
    for &p in &sorted {
        push_turning_left(&mut lower, p);
    }
    let mut upper: Vec<Point> = Vec::with_capacity(sorted.len());
    for &p in sorted.iter().rev() {
        push_turning_left(&mut upper, p);
    }
    // Each chain ends where the other begins.
    lower.pop();
    upper.pop();
    lower.append(&mut upper);
    lower
}

fn push_turning_left(chain: &mut Vec<Point>, p: Point) {
    while let [.., a, b] = chain[..] {
        if cross(a, b, p) > 0.0 {
            break;
        }
        chain.pop();
    }
    chain.push(p);
}

/// Z component of `(a - o) × (b - o)`; positive for a left turn.
fn cross(o: Point, a: Point, b: Point) -> f64 {
    (a - o).cross(b - o)
}

/// A [`Tester`] accepting points inside a convex hull, boundary included.
#[derive(Clone, Debug, PartialEq)]
pub struct HullTester {
    hull: Vec<Point>,
    bounds: Rect,
}

impl HullTester {
    /// Build a tester for the convex hull of `points`.
    ///
    /// Returns `None` when `points` is empty.
    #[must_use]
    pub fn new(points: &[Point]) -> Option<Self> {
        let hull = convex_hull(points);
        let (&first, rest) = hull.split_first()?;
        let bounds = rest
            .iter()
            .fold(Rect::from_points(first, first), |b, &p| b.union_pt(p));
        Some(Self { hull, bounds })
    }

    /// Hull vertices, counter-clockwise.
    #[must_use]
    pub fn hull(&self) -> &[Point] {
        &self.hull
    }

    /// Bounding box of the hull.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }
}

impl Tester for HullTester {
    fn test(&self, point: Point) -> bool {
        match self.hull[..] {
            [] => false,
            [a] => a == point,
            [a, b] => {
                cross(a, b, point) == 0.0
                    && overlaps(Rect::from_points(a, b), Rect::from_points(point, point))
            }
            _ => {
                let n = self.hull.len();
                (0..n).all(|i| cross(self.hull[i], self.hull[(i + 1) % n], point) >= 0.0)
            }
        }
    }

    fn test_area(&self, area: Rect) -> bool {
        overlaps(self.bounds, area)
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
