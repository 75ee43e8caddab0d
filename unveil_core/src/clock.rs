// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Manually advanced clock for tests and simulations.
//!
//! Reveal timing is driven by whatever [`HostTime`] the caller passes in, so
//! a deterministic run only needs a clock that moves when told to.

use crate::time::{Duration, HostTime, Timebase};

/// A virtual clock that only advances when asked.
#[derive(Clone, Copy, Debug)]
pub struct ManualClock {
    now: HostTime,
    timebase: Timebase,
}

impl ManualClock {
    /// Creates a clock reading `start` in the given timebase.
    #[must_use]
    pub const fn new(start: HostTime, timebase: Timebase) -> Self {
        Self {
            now: start,
            timebase,
        }
    }

    /// Current reading.
    #[must_use]
    pub const fn now(&self) -> HostTime {
        self.now
    }

    /// The clock's timebase.
    #[must_use]
    pub const fn timebase(&self) -> Timebase {
        self.timebase
    }

    /// Moves the clock forward and returns the new reading.
    pub fn advance(&mut self, by: Duration) -> HostTime {
        self.now = self.now.saturating_add(by);
        self.now
    }

    /// Moves the clock forward by whole milliseconds.
    pub fn advance_ms(&mut self, millis: u32) -> HostTime {
        self.advance(Duration::from_millis(millis, self.timebase))
    }

    /// Jumps to `t` if it is later than the current reading.
    pub fn advance_to(&mut self, t: HostTime) -> HostTime {
        if t > self.now {
            self.now = t;
        }
        self.now
    }
}
