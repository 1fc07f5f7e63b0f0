// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Point, Vec2};

use crate::scale::LinearScale;

/// A pan/zoom transform: uniform scale `k` followed by translation `(x, y)`.
///
/// Applied to a view-space point `p`, the result is `p * k + (x, y)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomTransform {
    /// Horizontal translation in pixels.
    pub x: f64,
    /// Vertical translation in pixels.
    pub y: f64,
    /// Uniform scale factor.
    pub k: f64,
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ZoomTransform {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        k: 1.0,
    };

    /// Creates a transform from a translation and a scale factor.
    #[must_use]
    pub const fn new(x: f64, y: f64, k: f64) -> Self {
        Self { x, y, k }
    }

    /// Applies the transform to a point.
    #[must_use]
    pub fn apply(&self, p: Point) -> Point {
        Point::new(self.apply_x(p.x), self.apply_y(p.y))
    }

    /// Applies the inverse transform to a point.
    #[must_use]
    pub fn invert(&self, p: Point) -> Point {
        Point::new(self.invert_x(p.x), self.invert_y(p.y))
    }

    /// Applies the transform to an `x` coordinate.
    #[must_use]
    pub fn apply_x(&self, x: f64) -> f64 {
        x * self.k + self.x
    }

    /// Applies the transform to a `y` coordinate.
    #[must_use]
    pub fn apply_y(&self, y: f64) -> f64 {
        y * self.k + self.y
    }

    /// Applies the inverse transform to an `x` coordinate.
    #[must_use]
    pub fn invert_x(&self, x: f64) -> f64 {
        (x - self.x) / self.k
    }

    /// Applies the inverse transform to a `y` coordinate.
    #[must_use]
    pub fn invert_y(&self, y: f64) -> f64 {
        (y - self.y) / self.k
    }

    /// Returns `scale` with its domain narrowed (or widened) to what is now
    /// visible across its range along the horizontal axis.
    #[must_use]
    pub fn rescale_x(&self, scale: &LinearScale) -> LinearScale {
        let (r0, r1) = scale.range();
        scale.with_domain((
            scale.invert(self.invert_x(r0)),
            scale.invert(self.invert_x(r1)),
        ))
    }

    /// Vertical counterpart of [`ZoomTransform::rescale_x`].
    #[must_use]
    pub fn rescale_y(&self, scale: &LinearScale) -> LinearScale {
        let (r0, r1) = scale.range();
        scale.with_domain((
            scale.invert(self.invert_y(r0)),
            scale.invert(self.invert_y(r1)),
        ))
    }

    /// Returns this transform moved by `delta` pixels.
    #[must_use]
    pub fn translated_by(&self, delta: Vec2) -> Self {
        Self::new(self.x + delta.x, self.y + delta.y, self.k)
    }

    /// Returns this transform zoomed by `factor`, keeping `anchor` fixed on screen.
    ///
    /// Non-positive factors return the transform unchanged.
    #[must_use]
    pub fn scaled_about(&self, anchor: Point, factor: f64) -> Self {
        if factor <= 0.0 {
            return *self;
        }
        let fixed = self.invert(anchor);
        let k = self.k * factor;
        Self::new(anchor.x - fixed.x * k, anchor.y - fixed.y * k, k)
    }

    /// Clamps the step from `from` to this transform so `k` stays in `[min, max]`.
    ///
    /// A zoom step keeps its fixed screen point: the result is `from` zoomed
    /// about the same point to the clamped scale. A step that cannot change the
    /// scale any further returns `from` unchanged. `from.k` is expected to lie
    /// within the limits.
    #[must_use]
    pub fn clamped_from(&self, from: &Self, min: f64, max: f64) -> Self {
        let k = self.k.clamp(min, max);
        if k == self.k {
            return *self;
        }
        if k == from.k {
            return *from;
        }
        let ratio = self.k / from.k;
        if ratio == 1.0 || !ratio.is_finite() {
            return Self::new(self.x, self.y, k);
        }
        let anchor = Point::new(
            (self.x - from.x * ratio) / (1.0 - ratio),
            (self.y - from.y * ratio) / (1.0 - ratio),
        );
        from.scaled_about(anchor, k / from.k)
    }

    /// The transform as a Kurbo [`Affine`].
    #[must_use]
    pub fn to_affine(&self) -> Affine {
        Affine::new([self.k, 0.0, 0.0, self.k, self.x, self.y])
    }
}

/// The step between two consecutive transforms of a gesture.
///
/// `x` / `y` are pixel offsets (`new - old`), `k` is the scale ratio
/// (`new / old`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformDelta {
    /// Horizontal offset in pixels.
    pub x: f64,
    /// Vertical offset in pixels.
    pub y: f64,
    /// Scale ratio.
    pub k: f64,
}

impl Default for TransformDelta {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl TransformDelta {
    /// No movement.
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        k: 1.0,
    };

    /// The step from `old` to `new`.
    #[must_use]
    pub fn between(old: &ZoomTransform, new: &ZoomTransform) -> Self {
        Self {
            x: new.x - old.x,
            y: new.y - old.y,
            k: new.k / old.k,
        }
    }

    /// Pixel offset as a vector.
    #[must_use]
    pub fn offset(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// What changed between two transforms.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TransformChange {
    /// Nothing changed.
    #[default]
    None,
    /// Only the translation changed.
    Translate,
    /// Only the scale changed.
    Scale,
    /// Both the translation and the scale changed.
    ScaleAndTranslate,
}

impl TransformChange {
    /// Compares two transforms exactly.
    #[must_use]
    pub fn classify(old: &ZoomTransform, new: &ZoomTransform) -> Self {
        let translated = old.x != new.x || old.y != new.y;
        let scaled = old.k != new.k;
        match (translated, scaled) {
            (false, false) => Self::None,
            (true, false) => Self::Translate,
            (false, true) => Self::Scale,
            (true, true) => Self::ScaleAndTranslate,
        }
    }

    /// Returns `true` if the scale changed.
    #[must_use]
    pub fn is_scale(self) -> bool {
        matches!(self, Self::Scale | Self::ScaleAndTranslate)
    }
}
