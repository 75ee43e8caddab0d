// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Monotonic host time and timebase conversion.
//!
//! [`HostTime`] is a point on the backend's monotonic clock, expressed in
//! backend ticks (microseconds from `performance.now()` on the web,
//! nanoseconds in simulations). [`Timebase`] converts ticks to nanoseconds
//! and back. [`Duration`] is a span in the same tick units.
//!
//! Stagger delays are configured in milliseconds and converted once with
//! [`Duration::from_millis`]. All conversions use `u128` intermediates.

use core::fmt;
use core::ops::{Add, Sub};

const NANOS_PER_MILLI: u64 = 1_000_000;

/// A point in time expressed as backend ticks.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct HostTime(pub u64);

impl HostTime {
    /// Returns the raw tick value.
    #[inline]
    #[must_use]
    pub const fn ticks(self) -> u64 {
        self.0
    }

    /// Converts this host time to nanoseconds using the given timebase.
    #[inline]
    #[must_use]
    pub const fn to_nanos(self, timebase: Timebase) -> u64 {
        timebase.ticks_to_nanos(self.0)
    }

    /// Returns the duration between `self` and an earlier time, or zero if
    /// `earlier` is after `self`.
    #[inline]
    #[must_use]
    pub const fn saturating_duration_since(self, earlier: Self) -> Duration {
        Duration(self.0.saturating_sub(earlier.0))
    }

    /// Adds a duration, clamping at the end of the representable range.
    #[inline]
    #[must_use]
    pub const fn saturating_add(self, duration: Duration) -> Self {
        Self(self.0.saturating_add(duration.0))
    }
}

impl Add<Duration> for HostTime {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Duration) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for HostTime {
    type Output = Duration;

    #[inline]
    fn sub(self, rhs: Self) -> Duration {
        Duration(self.0 - rhs.0)
    }
}

impl fmt::Debug for HostTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostTime({})", self.0)
    }
}

/// Rational conversion factor from ticks to nanoseconds.
///
/// `nanoseconds = ticks * numer / denom`
///
/// Backends provide the instance matching their clock (e.g.
/// `unveil_backend_web::timebase()` for microsecond ticks).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timebase {
    /// Numerator of the ticks-to-nanoseconds ratio.
    pub numer: u32,
    /// Denominator of the ticks-to-nanoseconds ratio.
    pub denom: u32,
}

impl Timebase {
    /// A timebase where ticks are already nanoseconds (1:1).
    pub const NANOS: Self = Self { numer: 1, denom: 1 };

    /// A timebase where one tick is one microsecond.
    pub const MICROS: Self = Self {
        numer: 1000,
        denom: 1,
    };

    /// Creates a new timebase with the given numerator and denominator.
    ///
    /// # Panics
    ///
    /// Panics if `numer` or `denom` is zero.
    #[inline]
    #[must_use]
    pub const fn new(numer: u32, denom: u32) -> Self {
        assert!(denom != 0, "timebase denominator must not be zero");
        assert!(numer != 0, "timebase numerator must not be zero");
        Self { numer, denom }
    }

    /// Converts a tick count to nanoseconds.
    #[inline]
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "u128 intermediate avoids overflow; truncation back to u64 is intentional"
    )]
    pub const fn ticks_to_nanos(self, ticks: u64) -> u64 {
        let wide = ticks as u128 * self.numer as u128 / self.denom as u128;
        wide as u64
    }

    /// Converts nanoseconds to a tick count.
    #[inline]
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "u128 intermediate avoids overflow; truncation back to u64 is intentional"
    )]
    pub const fn nanos_to_ticks(self, nanos: u64) -> u64 {
        let wide = nanos as u128 * self.denom as u128 / self.numer as u128;
        wide as u64
    }
}

impl fmt::Debug for Timebase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timebase({}/{})", self.numer, self.denom)
    }
}

/// A duration in backend ticks.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Duration(pub u64);

impl Duration {
    /// A zero-length duration.
    pub const ZERO: Self = Self(0);

    /// Returns the raw tick value.
    #[inline]
    #[must_use]
    pub const fn ticks(self) -> u64 {
        self.0
    }

    /// Creates a duration from whole milliseconds.
    #[inline]
    #[must_use]
    pub const fn from_millis(millis: u32, timebase: Timebase) -> Self {
        Self(timebase.nanos_to_ticks(millis as u64 * NANOS_PER_MILLI))
    }

    /// Converts this duration to nanoseconds.
    #[inline]
    #[must_use]
    pub const fn to_nanos(self, timebase: Timebase) -> u64 {
        timebase.ticks_to_nanos(self.0)
    }

    /// Converts this duration to whole milliseconds, rounding up so a timer
    /// armed with the result never fires early.
    #[inline]
    #[must_use]
    pub const fn to_millis_ceil(self, timebase: Timebase) -> u64 {
        self.to_nanos(timebase).div_ceil(NANOS_PER_MILLI)
    }

    /// Multiplies by an element index, clamping on overflow.
    #[inline]
    #[must_use]
    pub const fn saturating_mul(self, factor: u32) -> Self {
        Self(self.0.saturating_mul(factor as u64))
    }
}

impl Add for Duration {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl fmt::Debug for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Duration({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn millis_in_microsecond_ticks() {
        let d = Duration::from_millis(150, Timebase::MICROS);
        assert_eq!(d.ticks(), 150_000, "150ms is 150k µs ticks");
        assert_eq!(d.to_nanos(Timebase::MICROS), 150_000_000);
    }

    #[test]
    fn millis_in_nanosecond_ticks() {
        let d = Duration::from_millis(100, Timebase::NANOS);
        assert_eq!(d.ticks(), 100_000_000);
    }

    #[test]
    fn to_millis_rounds_up() {
        let tb = Timebase::MICROS;
        assert_eq!(Duration(1).to_millis_ceil(tb), 1, "1µs still needs a 1ms timer");
        assert_eq!(Duration(2_000).to_millis_ceil(tb), 2);
        assert_eq!(Duration(2_001).to_millis_ceil(tb), 3);
        assert_eq!(Duration::ZERO.to_millis_ceil(tb), 0);
    }

    #[test]
    fn saturating_ops_clamp() {
        assert_eq!(Duration(u64::MAX / 2).saturating_mul(3), Duration(u64::MAX));
        assert_eq!(
            HostTime(u64::MAX - 1).saturating_add(Duration(10)),
            HostTime(u64::MAX)
        );
        assert_eq!(
            HostTime(100).saturating_duration_since(HostTime(500)),
            Duration::ZERO
        );
    }

    #[test]
    fn host_time_arithmetic() {
        let t = HostTime(1_000);
        assert_eq!(t + Duration(200), HostTime(1_200));
        assert_eq!(HostTime(1_200) - t, Duration(200));
    }
}
