// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::rc::Rc;
use core::fmt;

use kurbo::Point;

/// Errors produced while indexing records.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum QuadTreeError {
    /// An accessor produced a NaN or infinite coordinate.
    #[error("accessor produced a non-finite coordinate ({x}, {y})")]
    NonFinite {
        /// The `x` value that was read.
        x: f64,
        /// The `y` value that was read.
        y: f64,
    },
    /// A position too far from the origin for the tree's extent to cover.
    ///
    /// Coordinates are accepted up to half of `f64::MAX` in magnitude; the
    /// exact limit depends on where the extent was anchored.
    #[error("position ({x}, {y}) is outside the range the index can cover")]
    OutOfRange {
        /// The `x` value that was read.
        x: f64,
        /// The `y` value that was read.
        y: f64,
    },
    /// A record in a bulk insertion produced a non-finite coordinate.
    ///
    /// Bulk insertions are atomic: when this is returned, nothing was added.
    #[error("record {index} produced a non-finite coordinate ({x}, {y})")]
    InvalidRecord {
        /// Position of the offending record in the input sequence.
        index: usize,
        /// The `x` value that was read.
        x: f64,
        /// The `y` value that was read.
        y: f64,
    },
}

/// Reads the `(x, y)` position of a record.
///
/// Accessors are cheap to clone and shared between a primary index and any
/// derived indexes (for example, a selection tree over the same records).
pub struct Accessor<T> {
    x: Rc<dyn Fn(&T) -> f64>,
    y: Rc<dyn Fn(&T) -> f64>,
}

impl<T> Accessor<T> {
    /// Create an accessor from separate `x` and `y` readers.
    pub fn new(x: impl Fn(&T) -> f64 + 'static, y: impl Fn(&T) -> f64 + 'static) -> Self {
        Self {
            x: Rc::new(x),
            y: Rc::new(y),
        }
    }

    /// Read the `x` coordinate of `record`.
    #[must_use]
    pub fn x(&self, record: &T) -> f64 {
        (self.x)(record)
    }

    /// Read the `y` coordinate of `record`.
    #[must_use]
    pub fn y(&self, record: &T) -> f64 {
        (self.y)(record)
    }

    /// Read the position of `record`, rejecting non-finite coordinates.
    pub fn point(&self, record: &T) -> Result<Point, QuadTreeError> {
        let (x, y) = (self.x(record), self.y(record));
        if x.is_finite() && y.is_finite() {
            Ok(Point::new(x, y))
        } else {
            Err(QuadTreeError::NonFinite { x, y })
        }
    }
}

impl<T> Clone for Accessor<T> {
    fn clone(&self) -> Self {
        Self {
            x: Rc::clone(&self.x),
            y: Rc::clone(&self.y),
        }
    }
}

impl<T> fmt::Debug for Accessor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor").finish_non_exhaustive()
    }
}
