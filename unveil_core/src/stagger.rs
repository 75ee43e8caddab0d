// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Staggered reveal planning.
//!
//! A [`Stagger`] turns one intersecting [`VisibilityEvent`] into a reveal
//! time per element: element `i` in document order is due at
//! `start + i * unit`. Due times therefore never decrease with the index.
//!
//! [`VisibilityEvent`]: crate::observer::VisibilityEvent

use crate::section::ElementId;
use crate::time::{Duration, HostTime, Timebase};

/// A single planned reveal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScheduledReveal {
    /// The element to reveal.
    pub element: ElementId,
    /// Document-order index within the section.
    pub index: u32,
    /// When the reveal is due.
    pub due: HostTime,
}

/// Per-section stagger parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Stagger {
    unit: Duration,
}

impl Stagger {
    /// Creates a stagger with the given per-index delay.
    #[must_use]
    pub const fn new(unit: Duration) -> Self {
        Self { unit }
    }

    /// Creates a stagger from a millisecond delay unit.
    #[must_use]
    pub const fn from_millis(millis: u32, timebase: Timebase) -> Self {
        Self::new(Duration::from_millis(millis, timebase))
    }

    /// Returns the per-index delay.
    #[must_use]
    pub const fn unit(&self) -> Duration {
        self.unit
    }

    /// Due time of the element at `index` for a batch starting at `start`.
    #[must_use]
    pub const fn due(&self, start: HostTime, index: u32) -> HostTime {
        start.saturating_add(self.unit.saturating_mul(index))
    }

    /// Plans reveals for `elements`, given in document order.
    pub fn plan<'a>(
        &self,
        start: HostTime,
        elements: &'a [ElementId],
    ) -> impl ExactSizeIterator<Item = ScheduledReveal> + 'a {
        let this = *self;
        elements.iter().enumerate().map(move |(i, &element)| {
            let index = u32::try_from(i).unwrap_or(u32::MAX);
            ScheduledReveal {
                element,
                index,
                due: this.due(start, index),
            }
        })
    }
}
