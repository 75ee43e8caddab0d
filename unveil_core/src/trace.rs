// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the reveal engine.
//!
//! This module provides a [`TraceSink`] trait with one method per engine
//! event. All method bodies default to no-ops, so implementing only the
//! events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).

use crate::observer::VisibilityEvent;
use crate::section::{ElementId, SectionId};
use crate::time::HostTime;

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a section root was absent at attach time and the observer
/// was not registered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegistrationSkippedEvent {
    /// The section that could not be observed.
    pub section: SectionId,
}

/// Emitted for every reveal queued by a stagger batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StaggerEvent {
    /// Owning section.
    pub section: SectionId,
    /// Element to reveal.
    pub element: ElementId,
    /// Document-order index within the section.
    pub index: u32,
    /// Time of the triggering visibility event.
    pub planned_at: HostTime,
    /// When the reveal is due.
    pub due: HostTime,
}

/// Emitted when a queued reveal flips an element to revealed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RevealEvent {
    /// Owning section.
    pub section: SectionId,
    /// Revealed element.
    pub element: ElementId,
    /// When the reveal was due.
    pub due: HostTime,
    /// When the queue was actually drained.
    pub fired_at: HostTime,
}

/// Emitted when a queued reveal fires for an element whose section is gone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StaleTimerEvent {
    /// The stale element handle.
    pub element: ElementId,
    /// When the reveal was due.
    pub due: HostTime,
    /// When the queue was drained.
    pub fired_at: HostTime,
}

/// Emitted when a section is torn down.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnmountEvent {
    /// The destroyed section.
    pub section: SectionId,
    /// Number of elements destroyed with it.
    pub elements: u32,
    /// Whether an observer registration was released.
    pub was_observed: bool,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the reveal engine.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called for every visibility crossing the observer reports.
    fn on_visibility(&mut self, e: &VisibilityEvent) {
        _ = e;
    }

    /// Called when a section root was absent at attach time.
    fn on_registration_skipped(&mut self, e: &RegistrationSkippedEvent) {
        _ = e;
    }

    /// Called for each reveal queued by a stagger batch.
    fn on_stagger(&mut self, e: &StaggerEvent) {
        _ = e;
    }

    /// Called when an element is revealed.
    fn on_reveal(&mut self, e: &RevealEvent) {
        _ = e;
    }

    /// Called when a queued reveal outlived its element.
    fn on_stale_timer(&mut self, e: &StaleTimerEvent) {
        _ = e;
    }

    /// Called when a section is torn down.
    fn on_unmount(&mut self, e: &UnmountEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`VisibilityEvent`].
    #[inline]
    pub fn visibility(&mut self, e: &VisibilityEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_visibility(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`RegistrationSkippedEvent`].
    #[inline]
    pub fn registration_skipped(&mut self, e: &RegistrationSkippedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_registration_skipped(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`StaggerEvent`].
    #[inline]
    pub fn stagger(&mut self, e: &StaggerEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_stagger(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`RevealEvent`].
    #[inline]
    pub fn reveal(&mut self, e: &RevealEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_reveal(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`StaleTimerEvent`].
    #[inline]
    pub fn stale_timer(&mut self, e: &StaleTimerEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_stale_timer(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`UnmountEvent`].
    #[inline]
    pub fn unmount(&mut self, e: &UnmountEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_unmount(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_visibility() -> VisibilityEvent {
        VisibilityEvent {
            section: SectionId {
                idx: 3,
                generation: 0,
            },
            is_intersecting: true,
            ratio: 0.25,
            time: HostTime(1_000),
        }
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_visibility(&sample_visibility());
        sink.on_unmount(&UnmountEvent {
            section: SectionId {
                idx: 0,
                generation: 0,
            },
            elements: 2,
            was_observed: true,
        });
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.visibility(&sample_visibility());
        tracer.registration_skipped(&RegistrationSkippedEvent {
            section: SectionId {
                idx: 0,
                generation: 0,
            },
        });
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct RecordingSink {
            ratios: Vec<f64>,
        }
        impl TraceSink for RecordingSink {
            fn on_visibility(&mut self, e: &VisibilityEvent) {
                self.ratios.push(e.ratio);
            }
        }

        let mut sink = RecordingSink { ratios: Vec::new() };
        let mut tracer = Tracer::new(&mut sink);
        tracer.visibility(&sample_visibility());
        // Access sink after tracer is dropped.
        drop(tracer);
        assert_eq!(sink.ratios, &[0.25]);
    }
}
