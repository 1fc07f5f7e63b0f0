// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory View 2D: scales, zoom transforms and plot viewports.
//!
//! This crate provides small, headless models of a zoomable 2D plot. It
//! focuses on:
//! - Linear scales between a data domain and a pixel range.
//! - Pan/zoom transforms and how they change during a gesture.
//! - Coordinate conversion between a fixed normalized space and device pixels.
//! - Culling and level-of-detail predicates over normalized rectangles.
//!
//! It does **not** own any data index or rendering backend. Callers are
//! expected to:
//! - Keep their data in normalized coordinates (see [`NORMALIZED_RANGE`]),
//!   typically in a spatial index that never needs rebuilding on zoom.
//! - Feed zoom transforms from their input layer into [`Viewport::set_transform`].
//! - Use the predicates from [`Viewport`] while walking their index.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use understory_view2d::{TransformChange, Viewport};
//!
//! // Plot area inside an 800x600 canvas with margins.
//! let mut view = Viewport::new(Rect::new(40.0, 10.0, 790.0, 580.0));
//!
//! view.begin_gesture();
//! let anchor = Point::new(400.0, 300.0);
//! let (change, _delta) = view.set_transform(view.transform().scaled_about(anchor, 2.0));
//! assert_eq!(change, TransformChange::ScaleAndTranslate);
//! assert_eq!(view.end_gesture(), TransformChange::ScaleAndTranslate);
//!
//! // Convert a pointer position into normalized space (for hit testing, etc.).
//! let normalized = view.pixel_to_normalized(anchor);
//! assert!(normalized.x > 0.0 && normalized.x < 100.0);
//! ```
//!
//! ## Culling example
//!
//! ```rust
//! use kurbo::Rect;
//! use understory_view2d::{Viewport, ZoomTransform};
//!
//! let mut view = Viewport::new(Rect::new(0.0, 0.0, 400.0, 400.0));
//! view.set_transform(ZoomTransform::new(-400.0, -400.0, 2.0));
//!
//! let visible = view.visible_bounds_predicate();
//! let tiny = view.aggregation_predicate(5.0);
//!
//! // Only the lower-right quarter of normalized space is still in view.
//! assert!(!visible(Rect::new(0.0, 0.0, 20.0, 20.0)));
//! assert!(!visible(Rect::new(60.0, 60.0, 70.0, 70.0)));
//! assert!(visible(Rect::new(60.0, 10.0, 70.0, 20.0)));
//! // A 0.5 unit square is 4 px wide at this zoom.
//! assert!(tiny(Rect::new(60.0, 10.0, 60.5, 10.5)));
//! ```
//!
//! This crate is `no_std`.

#![no_std]

mod scale;
mod transform;
mod viewport;

pub use scale::LinearScale;
pub use transform::{TransformChange, TransformDelta, ZoomTransform};
pub use viewport::{DEFAULT_SCALE_EXTENT, NORMALIZED_RANGE, Viewport, ViewportDebugInfo};
