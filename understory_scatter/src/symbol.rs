// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Point symbols.

use alloc::boxed::Box;
use core::f64::consts::PI;

use kurbo::{BezPath, Circle, Point, Shape};
use peniko::Color;

use crate::surface::Surface;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// How a batch of points is being drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RenderMode {
    /// Regular data points.
    #[default]
    Normal,
    /// Points in the current selection.
    Selected,
    /// A point under the pointer.
    Hover,
}

/// Draws one batch of points.
///
/// A renderer is created per layer pass; [`SymbolRenderer::done`] is called
/// exactly once after the last [`SymbolRenderer::render`] so batching
/// implementations can flush.
pub trait SymbolRenderer<T> {
    /// Draws `record` centered at pixel position `at`.
    fn render(&mut self, surface: &mut dyn Surface, at: Point, record: &T);

    /// Flushes any batched geometry.
    fn done(&mut self, surface: &mut dyn Surface);
}

/// A factory for [`SymbolRenderer`]s.
pub trait Symbol<T> {
    /// Starts a batch drawn in `mode`.
    fn renderer(&self, mode: RenderMode) -> Box<dyn SymbolRenderer<T> + '_>;
}

/// Filled circles with a fixed area per mode color.
///
/// `size` is the symbol area in square pixels, so the drawn radius is
/// `sqrt(size / π)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CircleSymbol {
    /// Area in square pixels.
    pub size: f64,
    /// Fill for [`RenderMode::Normal`].
    pub normal: Color,
    /// Fill for [`RenderMode::Selected`].
    pub selected: Color,
    /// Fill for [`RenderMode::Hover`].
    pub hover: Color,
}

impl Default for CircleSymbol {
    fn default() -> Self {
        Self {
            size: 20.0,
            // steelblue
            normal: Color::from_rgba8(70, 130, 180, 255),
            // red
            selected: Color::from_rgba8(255, 0, 0, 255),
            // orange
            hover: Color::from_rgba8(255, 165, 0, 255),
        }
    }
}

impl CircleSymbol {
    /// Radius of the drawn circle in pixels.
    #[must_use]
    pub fn radius(&self) -> f64 {
        (self.size.max(0.0) / PI).sqrt()
    }

    /// Fill color used for `mode`.
    #[must_use]
    pub fn color(&self, mode: RenderMode) -> Color {
        match mode {
            RenderMode::Normal => self.normal,
            RenderMode::Selected => self.selected,
            RenderMode::Hover => self.hover,
        }
    }
}

impl<T> Symbol<T> for CircleSymbol {
    fn renderer(&self, mode: RenderMode) -> Box<dyn SymbolRenderer<T> + '_> {
        Box::new(CircleBatch {
            path: BezPath::new(),
            radius: self.radius(),
            color: self.color(mode),
        })
    }
}

/// Accumulates every circle of a pass into one path and fills it once.
#[derive(Debug)]
struct CircleBatch {
    path: BezPath,
    radius: f64,
    color: Color,
}

impl<T> SymbolRenderer<T> for CircleBatch {
    fn render(&mut self, _surface: &mut dyn Surface, at: Point, _record: &T) {
        self.path
            .extend(Circle::new(at, self.radius).path_elements(0.1));
    }

    fn done(&mut self, surface: &mut dyn Surface) {
        if self.path.elements().is_empty() {
            return;
        }
        let path = core::mem::take(&mut self.path);
        surface.fill_path(&path, self.color);
    }
}
