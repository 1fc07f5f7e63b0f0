// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// A continuous linear mapping from a domain interval to a range interval.
///
/// Either interval may be reversed (for example a pixel range running from
/// the bottom of a plot to its top). Scales are small `Copy` values; derive a
/// new one with [`LinearScale::with_domain`] / [`LinearScale::with_range`]
/// rather than mutating a shared instance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl Default for LinearScale {
    /// The identity scale over `[0, 1]`.
    fn default() -> Self {
        Self::new((0.0, 1.0), (0.0, 1.0))
    }
}

impl LinearScale {
    /// Creates a scale mapping `domain` onto `range`.
    #[must_use]
    pub const fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Returns the domain interval.
    #[must_use]
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Returns the range interval.
    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Returns a copy of this scale with a different domain.
    #[must_use]
    pub fn with_domain(self, domain: (f64, f64)) -> Self {
        Self { domain, ..self }
    }

    /// Returns a copy of this scale with a different range.
    #[must_use]
    pub fn with_range(self, range: (f64, f64)) -> Self {
        Self { range, ..self }
    }

    /// Signed length of the range, `range.1 - range.0`.
    #[must_use]
    pub fn range_span(&self) -> f64 {
        self.range.1 - self.range.0
    }

    /// Signed length of the domain, `domain.1 - domain.0`.
    #[must_use]
    pub fn domain_span(&self) -> f64 {
        self.domain.1 - self.domain.0
    }

    /// Returns `true` if the domain is finite and not degenerate.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.domain.0.is_finite() && self.domain.1.is_finite() && self.domain_span() != 0.0
    }

    /// Maps a domain value into the range.
    ///
    /// A degenerate domain maps everything to the middle of the range.
    #[must_use]
    pub fn map(&self, value: f64) -> f64 {
        let span = self.domain_span();
        let t = if span == 0.0 {
            0.5
        } else {
            (value - self.domain.0) / span
        };
        self.range.0 + t * self.range_span()
    }

    /// Maps a range value back into the domain.
    ///
    /// A degenerate range maps everything to the middle of the domain.
    #[must_use]
    pub fn invert(&self, value: f64) -> f64 {
        let span = self.range_span();
        let t = if span == 0.0 {
            0.5
        } else {
            (value - self.range.0) / span
        };
        self.domain.0 + t * self.domain_span()
    }
}
