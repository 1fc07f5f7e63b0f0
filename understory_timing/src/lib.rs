// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Timing: host-agnostic timer queue primitives.
//!
//! UI kernels often need "do this later" behavior: debounce a tooltip, redraw
//! at full quality once a drag settles. This crate does not own a clock or
//! an event loop. The host supplies monotonic millisecond timestamps, asks
//! when the next deadline is, and polls for due timers.
//!
//! [`TimerSlots`] keeps at most one outstanding deadline per *purpose*.
//! Scheduling a purpose that is already pending replaces its deadline
//! (last write wins), which is exactly the cancel-and-reschedule behavior of
//! a debounce.
//!
//! ```rust
//! use understory_timing::TimerSlots;
//!
//! #[derive(Clone, Copy, Debug, PartialEq, Eq)]
//! enum Purpose {
//!     Tooltip,
//!     Redraw,
//! }
//!
//! let mut timers = TimerSlots::new();
//! timers.schedule_after(Purpose::Redraw, 1_000, 300);
//! timers.schedule_after(Purpose::Tooltip, 1_000, 500);
//!
//! // Another pointer move at t=1100 pushes the redraw back.
//! assert_eq!(timers.schedule_after(Purpose::Redraw, 1_100, 300), Some(1_300));
//! assert_eq!(timers.next_deadline(), Some(1_400));
//!
//! assert_eq!(timers.pop_due(1_399), None);
//! assert_eq!(timers.pop_due(1_500), Some((Purpose::Redraw, 1_400)));
//! assert_eq!(timers.pop_due(1_500), Some((Purpose::Tooltip, 1_500)));
//! assert!(timers.is_empty());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;

/// At most one pending deadline per purpose.
///
/// Deadlines are absolute millisecond timestamps on the host's monotonic
/// clock. Purposes are small `Copy` keys, typically a fieldless enum.
#[derive(Clone, Debug)]
pub struct TimerSlots<P> {
    slots: Vec<(P, u64)>,
}

impl<P> Default for TimerSlots<P> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<P: Copy + Eq> TimerSlots<P> {
    /// Creates an empty set of timers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `purpose` to fire at `deadline`.
    ///
    /// Returns the deadline it replaced, if `purpose` was already pending.
    pub fn schedule_at(&mut self, purpose: P, deadline: u64) -> Option<u64> {
        match self.slot_mut(purpose) {
            Some(slot) => Some(core::mem::replace(slot, deadline)),
            None => {
                self.slots.push((purpose, deadline));
                None
            }
        }
    }

    /// Schedules `purpose` to fire `delay` milliseconds after `now`.
    ///
    /// Returns the deadline it replaced, if `purpose` was already pending.
    pub fn schedule_after(&mut self, purpose: P, now: u64, delay: u64) -> Option<u64> {
        self.schedule_at(purpose, now.saturating_add(delay))
    }

    /// Cancels `purpose`, returning its deadline if it was pending.
    pub fn cancel(&mut self, purpose: P) -> Option<u64> {
        let i = self.slots.iter().position(|(p, _)| *p == purpose)?;
        Some(self.slots.remove(i).1)
    }

    /// The pending deadline for `purpose`.
    #[must_use]
    pub fn deadline(&self, purpose: P) -> Option<u64> {
        self.slots
            .iter()
            .find_map(|&(p, d)| (p == purpose).then_some(d))
    }

    /// Returns `true` if `purpose` is pending.
    #[must_use]
    pub fn is_pending(&self, purpose: P) -> bool {
        self.deadline(purpose).is_some()
    }

    /// The earliest pending deadline, if any.
    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        self.slots.iter().map(|&(_, d)| d).min()
    }

    /// Removes and returns the earliest timer due at `now`.
    ///
    /// Timers with equal deadlines fire in the order they were first scheduled.
    pub fn pop_due(&mut self, now: u64) -> Option<(P, u64)> {
        let (i, _) = self
            .slots
            .iter()
            .enumerate()
            .filter(|(_, (_, d))| *d <= now)
            .min_by_key(|(i, (_, d))| (*d, *i))?;
        Some(self.slots.remove(i))
    }

    /// Cancels every timer.
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Number of pending timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if no timer is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Pending timers, in the order they were first scheduled.
    pub fn iter(&self) -> impl Iterator<Item = (P, u64)> + '_ {
        self.slots.iter().copied()
    }

    fn slot_mut(&mut self, purpose: P) -> Option<&mut u64> {
        self.slots
            .iter_mut()
            .find_map(|(p, d)| (*p == purpose).then_some(d))
    }
}
