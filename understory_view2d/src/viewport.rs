// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Rect};

use crate::scale::LinearScale;
use crate::transform::{TransformChange, TransformDelta, ZoomTransform};

/// The fixed coordinate interval used on both axes of normalized space.
pub const NORMALIZED_RANGE: (f64, f64) = (0.0, 100.0);

/// Default `(min, max)` zoom factors.
pub const DEFAULT_SCALE_EXTENT: (f64, f64) = (0.5, 4.0);

/// Pan/zoom state of a plot over normalized space.
///
/// A `Viewport` owns the mapping between normalized coordinates (see
/// [`NORMALIZED_RANGE`]) and device pixels inside a rectangular plot area.
/// The vertical axis is flipped: normalized `y = 0` sits at the bottom of the
/// plot bounds. The current [`ZoomTransform`] is applied on top of that base
/// mapping, so indexes built in normalized space never need rebuilding while
/// the user pans or zooms.
///
/// Besides coordinate conversion, the viewport derives the two predicates a
/// level-of-detail traversal needs: a visibility test and an aggregation
/// test over normalized rectangles.
#[derive(Clone, Debug)]
pub struct Viewport {
    plot_bounds: Rect,
    n2p_x: LinearScale,
    n2p_y: LinearScale,
    transform: ZoomTransform,
    gesture_start: Option<ZoomTransform>,
    scale_extent: (f64, f64),
}

impl Viewport {
    /// Creates a viewport over `plot_bounds` with the identity transform.
    #[must_use]
    pub fn new(plot_bounds: Rect) -> Self {
        let mut vp = Self {
            plot_bounds: Rect::ZERO,
            n2p_x: LinearScale::new(NORMALIZED_RANGE, (0.0, 1.0)),
            n2p_y: LinearScale::new(NORMALIZED_RANGE, (1.0, 0.0)),
            transform: ZoomTransform::IDENTITY,
            gesture_start: None,
            scale_extent: DEFAULT_SCALE_EXTENT,
        };
        vp.set_plot_bounds(plot_bounds);
        vp
    }

    /// Returns the plot area in device pixels.
    #[must_use]
    pub fn plot_bounds(&self) -> Rect {
        self.plot_bounds
    }

    /// Moves or resizes the plot area and recomputes the base pixel ranges.
    ///
    /// The transform is left untouched.
    pub fn set_plot_bounds(&mut self, bounds: Rect) {
        self.plot_bounds = bounds;
        self.n2p_x = self.n2p_x.with_range((bounds.x0, bounds.x1));
        self.n2p_y = self.n2p_y.with_range((bounds.y1, bounds.y0));
    }

    /// Returns the `(min, max)` zoom factors.
    #[must_use]
    pub fn scale_extent(&self) -> (f64, f64) {
        self.scale_extent
    }

    /// Sets the zoom limits, normalizing their order, and clamps the current transform.
    ///
    /// A transform outside the new limits is rescaled about the center of the
    /// plot bounds. Limits that are non-finite or not positive are ignored.
    pub fn set_scale_extent(&mut self, min: f64, max: f64) {
        if !(min.is_finite() && max.is_finite() && min > 0.0 && max > 0.0) {
            return;
        }
        self.scale_extent = if min <= max { (min, max) } else { (max, min) };
        let (min, max) = self.scale_extent;
        let t = self.transform;
        let k = t.k.clamp(min, max);
        if k != t.k {
            self.transform = t.scaled_about(self.plot_bounds.center(), k / t.k);
        }
    }

    /// Returns the current transform.
    #[must_use]
    pub fn transform(&self) -> ZoomTransform {
        self.transform
    }

    /// Replaces the current transform, clamping its scale into the zoom limits.
    ///
    /// A zoom past a limit stops at the limit while keeping the point it zooms
    /// about fixed on screen; see [`ZoomTransform::clamped_from`].
    ///
    /// Returns what changed and the step from the previous transform.
    pub fn set_transform(&mut self, transform: ZoomTransform) -> (TransformChange, TransformDelta) {
        let old = self.transform;
        let (min, max) = self.scale_extent;
        let new = transform.clamped_from(&old, min, max);
        self.transform = new;
        (
            TransformChange::classify(&old, &new),
            TransformDelta::between(&old, &new),
        )
    }

    /// Remembers the current transform as the start of a gesture.
    pub fn begin_gesture(&mut self) {
        self.gesture_start = Some(self.transform);
    }

    /// Returns the transform recorded by [`Viewport::begin_gesture`], if a gesture is active.
    #[must_use]
    pub fn gesture_start(&self) -> Option<ZoomTransform> {
        self.gesture_start
    }

    /// Ends the current gesture and classifies its net effect.
    ///
    /// Without a matching [`Viewport::begin_gesture`] this reports
    /// [`TransformChange::None`].
    pub fn end_gesture(&mut self) -> TransformChange {
        self.gesture_start
            .take()
            .map_or(TransformChange::None, |start| {
                TransformChange::classify(&start, &self.transform)
            })
    }

    /// Applies the current transform to a horizontal domain scale.
    #[must_use]
    pub fn rescale_x(&self, scale: &LinearScale) -> LinearScale {
        self.transform.rescale_x(scale)
    }

    /// Applies the current transform to a vertical domain scale.
    #[must_use]
    pub fn rescale_y(&self, scale: &LinearScale) -> LinearScale {
        self.transform.rescale_y(scale)
    }

    /// Normalized → pixel scales without the current transform.
    #[must_use]
    pub fn base_scales(&self) -> (LinearScale, LinearScale) {
        (self.n2p_x, self.n2p_y)
    }

    /// Normalized → pixel scales under the current transform.
    #[must_use]
    pub fn scales(&self) -> (LinearScale, LinearScale) {
        (self.rescale_x(&self.n2p_x), self.rescale_y(&self.n2p_y))
    }

    /// Converts a device pixel position into normalized space.
    #[must_use]
    pub fn pixel_to_normalized(&self, p: Point) -> Point {
        let (sx, sy) = self.scales();
        Point::new(sx.invert(p.x), sy.invert(p.y))
    }

    /// Converts a normalized position into device pixels.
    #[must_use]
    pub fn normalized_to_pixel(&self, p: Point) -> Point {
        let (sx, sy) = self.scales();
        Point::new(sx.map(p.x), sy.map(p.y))
    }

    /// The normalized rectangle currently visible through the plot bounds.
    #[must_use]
    pub fn visible_normalized_rect(&self) -> Rect {
        let b = self.plot_bounds;
        Rect::from_points(
            self.pixel_to_normalized(Point::new(b.x0, b.y1)),
            self.pixel_to_normalized(Point::new(b.x1, b.y0)),
        )
    }

    /// A predicate telling whether a normalized rectangle overlaps the visible region.
    ///
    /// Edges touching the visible region count as overlapping.
    pub fn visible_bounds_predicate(&self) -> impl Fn(Rect) -> bool + Copy + use<> {
        let visible = self.visible_normalized_rect();
        move |r: Rect| {
            let r = r.abs();
            !(r.x1 < visible.x0 || r.x0 > visible.x1 || r.y1 < visible.y0 || r.y0 > visible.y1)
        }
    }

    /// A predicate telling whether a normalized rectangle is smaller than
    /// `threshold_px` on screen, measured along its larger side.
    ///
    /// The transform is axis-aligned, so mapping two opposite corners gives
    /// the same pixel extent as mapping all four.
    pub fn aggregation_predicate(&self, threshold_px: f64) -> impl Fn(Rect) -> bool + Copy + use<> {
        let (sx, sy) = self.scales();
        move |r: Rect| {
            let w = (sx.map(r.x0) - sx.map(r.x1)).abs();
            let h = (sy.map(r.y0) - sy.map(r.y1)).abs();
            w.max(h) < threshold_px
        }
    }

    /// Converts a radius in pixels into normalized units at the current zoom.
    ///
    /// The shorter plot side is used, so the radius never exceeds the pixel
    /// radius along either axis. An empty plot area yields `0.0`.
    #[must_use]
    pub fn normalized_radius(&self, pixel_radius: f64) -> f64 {
        let view = self.transform.k
            * self
                .n2p_x
                .range_span()
                .abs()
                .min(self.n2p_y.range_span().abs());
        if view > 0.0 {
            pixel_radius / view * (NORMALIZED_RANGE.1 - NORMALIZED_RANGE.0)
        } else {
            0.0
        }
    }

    /// Snapshot of the current viewport state for debugging and inspection.
    #[must_use]
    pub fn debug_info(&self) -> ViewportDebugInfo {
        ViewportDebugInfo {
            plot_bounds: self.plot_bounds,
            transform: self.transform,
            gesture_start: self.gesture_start,
            scale_extent: self.scale_extent,
            visible_normalized_rect: self.visible_normalized_rect(),
        }
    }
}

/// Debug snapshot of a [`Viewport`] state.
#[derive(Clone, Copy, Debug)]
pub struct ViewportDebugInfo {
    /// Plot area in device pixels.
    pub plot_bounds: Rect,
    /// Current transform.
    pub transform: ZoomTransform,
    /// Transform at the start of the active gesture, if any.
    pub gesture_start: Option<ZoomTransform>,
    /// Zoom limits.
    pub scale_extent: (f64, f64),
    /// Normalized rectangle visible through the plot bounds.
    pub visible_normalized_rect: Rect,
}
