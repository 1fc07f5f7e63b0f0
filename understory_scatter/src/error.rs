// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use understory_quadtree::QuadTreeError;

/// A plot axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal.
    X,
    /// Vertical.
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::X => "x",
            Self::Y => "y",
        })
    }
}

/// Errors reported when constructing or reconfiguring a scatterplot.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum ScatterError {
    /// A record could not be indexed.
    #[error(transparent)]
    Index(#[from] QuadTreeError),
    /// Zoom limits must be finite, positive and ordered.
    #[error("invalid scale extent [{min}, {max}]")]
    InvalidScaleExtent {
        /// Lower zoom limit.
        min: f64,
        /// Upper zoom limit.
        max: f64,
    },
    /// A domain scale has an empty or non-finite domain.
    #[error("invalid {axis} domain [{start}, {end}]")]
    InvalidDomain {
        /// Axis of the offending scale.
        axis: Axis,
        /// Domain start.
        start: f64,
        /// Domain end.
        end: f64,
    },
    /// Click radius must be finite and non-negative.
    #[error("invalid click radius {0}")]
    InvalidClickRadius(f64),
    /// Aggregation threshold must be finite and non-negative.
    #[error("invalid aggregation threshold {0}")]
    InvalidAggregationThreshold(f64),
}
