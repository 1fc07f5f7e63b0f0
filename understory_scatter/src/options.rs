// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scatterplot configuration.

use kurbo::{Rect, Size};
use understory_view2d::{DEFAULT_SCALE_EXTENT, LinearScale};

use crate::error::{Axis, ScatterError};

/// Space between the surface edges and the plot area, in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Margin {
    /// Left inset; room for the y axis.
    pub left: f64,
    /// Top inset.
    pub top: f64,
    /// Right inset.
    pub right: f64,
    /// Bottom inset; room for the x axis.
    pub bottom: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            left: 40.0,
            top: 10.0,
            right: 10.0,
            bottom: 20.0,
        }
    }
}

impl Margin {
    /// The plot area inside a surface of `size`.
    ///
    /// Collapses to an empty rectangle when the margins do not fit.
    #[must_use]
    pub fn inset(&self, size: Size) -> Rect {
        let x0 = self.left;
        let y0 = self.top;
        Rect::new(
            x0,
            y0,
            (size.width - self.right).max(x0),
            (size.height - self.bottom).max(y0),
        )
    }
}

bitflags::bitflags! {
    /// Keyboard modifiers held during a pointer event.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Shift.
        const SHIFT = 1 << 0;
        /// Control.
        const CTRL = 1 << 1;
        /// Alt / Option.
        const ALT = 1 << 2;
        /// Meta / Command / Windows.
        const META = 1 << 3;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::empty()
    }
}

/// Scatterplot configuration.
///
/// Times are in the same unit as the timestamps passed to the event
/// handlers, milliseconds by convention.
#[derive(Clone, Debug, PartialEq)]
pub struct ScatterplotOptions {
    /// Insets of the plot area.
    pub margin: Margin,
    /// `(min, max)` zoom factors.
    pub scale_extent: (f64, f64),
    /// Maps record x values into the plot. Its range is ignored.
    pub x_scale: LinearScale,
    /// Maps record y values into the plot. Its range is ignored.
    pub y_scale: LinearScale,
    /// Pick radius for clicks and tooltips, in pixels.
    pub click_radius: f64,
    /// Pointer rest time before the tooltip is shown.
    pub tooltip_delay: u64,
    /// Quiet time after the last pan step before the full-quality redraw.
    pub zoom_delay: u64,
    /// Subtrees smaller than this many pixels are drawn as one point.
    pub aggregation_threshold: f64,
    /// Modifiers that turn a primary-button drag into a lasso selection.
    pub select_modifiers: Modifiers,
    /// Count hidden and aggregated records on every full redraw.
    pub collect_stats: bool,
}

impl Default for ScatterplotOptions {
    fn default() -> Self {
        let domain = LinearScale::new((0.0, 100.0), (0.0, 1.0));
        Self {
            margin: Margin::default(),
            scale_extent: DEFAULT_SCALE_EXTENT,
            x_scale: domain,
            y_scale: domain,
            click_radius: 10.0,
            tooltip_delay: 500,
            zoom_delay: 300,
            aggregation_threshold: 5.0,
            select_modifiers: Modifiers::CTRL | Modifiers::ALT,
            collect_stats: false,
        }
    }
}

impl ScatterplotOptions {
    /// Checks the options for values that would produce non-finite coordinates.
    pub fn validate(&self) -> Result<(), ScatterError> {
        let (min, max) = self.scale_extent;
        if !(min.is_finite() && max.is_finite() && min > 0.0 && min <= max) {
            return Err(ScatterError::InvalidScaleExtent { min, max });
        }
        for (axis, scale) in [(Axis::X, &self.x_scale), (Axis::Y, &self.y_scale)] {
            let (start, end) = scale.domain();
            if !(start.is_finite() && end.is_finite()) || start == end {
                return Err(ScatterError::InvalidDomain { axis, start, end });
            }
        }
        if !(self.click_radius.is_finite() && self.click_radius >= 0.0) {
            return Err(ScatterError::InvalidClickRadius(self.click_radius));
        }
        if !(self.aggregation_threshold.is_finite() && self.aggregation_threshold >= 0.0) {
            return Err(ScatterError::InvalidAggregationThreshold(
                self.aggregation_threshold,
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(ScatterplotOptions::default().validate(), Ok(()));
    }

    #[test]
    fn margin_inset_collapses() {
        let m = Margin::default();
        assert_eq!(m.inset(Size::new(200.0, 100.0)), Rect::new(40.0, 10.0, 190.0, 80.0));
        assert_eq!(m.inset(Size::new(20.0, 20.0)), Rect::new(40.0, 10.0, 40.0, 10.0));
    }

    #[test]
    fn rejects_bad_values() {
        let opts = ScatterplotOptions {
            scale_extent: (4.0, 0.5),
            ..ScatterplotOptions::default()
        };
        assert_eq!(
            opts.validate(),
            Err(ScatterError::InvalidScaleExtent { min: 4.0, max: 0.5 })
        );

        let opts = ScatterplotOptions {
            y_scale: LinearScale::new((3.0, 3.0), (0.0, 1.0)),
            ..ScatterplotOptions::default()
        };
        assert!(matches!(
            opts.validate(),
            Err(ScatterError::InvalidDomain { axis: Axis::Y, .. })
        ));

        let opts = ScatterplotOptions {
            click_radius: f64::NAN,
            ..ScatterplotOptions::default()
        };
        assert!(matches!(opts.validate(), Err(ScatterError::InvalidClickRadius(_))));

        let opts = ScatterplotOptions {
            aggregation_threshold: -1.0,
            ..ScatterplotOptions::default()
        };
        assert_eq!(
            opts.validate(),
            Err(ScatterError::InvalidAggregationThreshold(-1.0))
        );
    }

    #[test]
    fn modifiers_combine() {
        let m = ScatterplotOptions::default().select_modifiers;
        assert!(m.contains(Modifiers::CTRL));
        assert!(m.intersects(Modifiers::ALT | Modifiers::SHIFT));
        assert!(!m.intersects(Modifiers::SHIFT));
    }
}
