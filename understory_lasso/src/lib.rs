// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Lasso: freehand lasso selection.
//!
//! A [`Lasso`] collects the pixel positions reported during a drag gesture.
//! At any point during the gesture it can produce a [`HullTester`]: the convex
//! hull of the path, mapped into the coordinate space of a point index, which
//! plugs directly into [`understory_quadtree::QuadTree::find_by_tester`].
//!
//! The hull is used instead of the raw path so that the tester stays convex:
//! a bounding box pre-filter and whole-subtree coverage tests are then exact.
//! Concave parts of the drawn path are therefore filled in.
//!
//! ```rust
//! use kurbo::Point;
//! use understory_lasso::Lasso;
//! use understory_quadtree::Tester;
//!
//! let mut lasso = Lasso::new();
//! lasso.start(Point::new(0.0, 0.0));
//! lasso.drag(Point::new(100.0, 0.0));
//! lasso.drag(Point::new(100.0, 100.0));
//! lasso.drag(Point::new(0.0, 100.0));
//!
//! // Pixels map to a 0..10 space here.
//! let tester = lasso.tester(|x| x / 10.0, |y| y / 10.0).unwrap();
//! assert!(tester.test(Point::new(5.0, 5.0)));
//! assert!(!tester.test(Point::new(11.0, 5.0)));
//!
//! // The path is dropped as soon as the gesture ends.
//! lasso.end();
//! assert!(lasso.points().is_empty());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod hull;

use alloc::vec::Vec;

use kurbo::{BezPath, Circle, Point};

pub use hull::{HullTester, convex_hull};

/// Radius of the start and end markers of a [`LassoOutline`], in pixels.
pub const MARKER_RADIUS: f64 = 3.0;

/// Gesture state of a [`Lasso`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LassoState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Between `start` and `end`.
    Drawing,
}

/// Pixel-space geometry for drawing an active lasso.
#[derive(Clone, Debug)]
pub struct LassoOutline {
    /// Closed path through every collected point.
    pub path: BezPath,
    /// Marker at the first point.
    pub start: Circle,
    /// Marker at the most recent point.
    pub end: Circle,
}

/// A freehand lasso gesture.
#[derive(Clone, Debug, Default)]
pub struct Lasso {
    points: Vec<Point>,
    state: LassoState,
}

impl Lasso {
    /// Create an idle lasso.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a new path at `at`, dropping any previous one.
    pub fn start(&mut self, at: Point) {
        self.points.clear();
        self.points.push(at);
        self.state = LassoState::Drawing;
    }

    /// Append `at` to the path. Returns `false` (and does nothing) when idle.
    ///
    /// Every reported point is kept; the path is not resampled.
    pub fn drag(&mut self, at: Point) -> bool {
        if self.state == LassoState::Idle {
            return false;
        }
        self.points.push(at);
        true
    }

    /// Finish the gesture. The path is discarded immediately.
    pub fn end(&mut self) {
        self.clear();
    }

    /// Drop the path and return to idle.
    pub fn clear(&mut self) {
        self.points.clear();
        self.state = LassoState::Idle;
    }

    /// Current gesture state.
    #[must_use]
    pub fn state(&self) -> LassoState {
        self.state
    }

    /// Returns `true` between `start` and `end`.
    #[must_use]
    pub fn is_drawing(&self) -> bool {
        self.state == LassoState::Drawing
    }

    /// Collected pixel-space points, in gesture order.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// A tester for the hull of the path, mapped through `p2n_x` / `p2n_y`.
    ///
    /// Returns `None` while fewer than three points have been collected.
    pub fn tester(
        &self,
        p2n_x: impl Fn(f64) -> f64,
        p2n_y: impl Fn(f64) -> f64,
    ) -> Option<HullTester> {
        if self.points.len() < 3 {
            return None;
        }
        let mapped: Vec<Point> = self
            .points
            .iter()
            .map(|p| Point::new(p2n_x(p.x), p2n_y(p.y)))
            .collect();
        HullTester::new(&mapped)
    }

    /// Overlay geometry for the current path, or `None` when it is empty.
    #[must_use]
    pub fn outline(&self) -> Option<LassoOutline> {
        let (&first, rest) = self.points.split_first()?;
        let last = rest.last().copied().unwrap_or(first);
        let mut path = BezPath::new();
        path.move_to(first);
        for &p in rest {
            path.line_to(p);
        }
        path.close_path();
        Some(LassoOutline {
            path,
            start: Circle::new(first, MARKER_RADIUS),
            end: Circle::new(last, MARKER_RADIUS),
        })
    }
}
