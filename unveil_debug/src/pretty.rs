// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Timestamps
//! are converted to milliseconds using a [`Timebase`].

use std::io::Write;

use unveil_core::observer::VisibilityEvent;
use unveil_core::time::{HostTime, Timebase};
use unveil_core::trace::{
    RegistrationSkippedEvent, RevealEvent, StaggerEvent, StaleTimerEvent, TraceSink,
    UnmountEvent,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    timebase: Timebase,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("timebase", &self.timebase)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr(timebase: Timebase) -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
            timebase,
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>, timebase: Timebase) -> Self {
        Self { writer, timebase }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W, timebase: Timebase) -> Self {
        Self { writer, timebase }
    }

    /// Consumes the sink, returning the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn ms(&self, t: HostTime) -> f64 {
        t.to_nanos(self.timebase) as f64 / 1e6
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_visibility(&mut self, e: &VisibilityEvent) {
        let _ = writeln!(
            self.writer,
            "[{:>9.1}ms] {:<7} {:?} ratio={:.3}",
            self.ms(e.time),
            if e.is_intersecting { "enter" } else { "exit" },
            e.section,
            e.ratio,
        );
    }

    fn on_registration_skipped(&mut self, e: &RegistrationSkippedEvent) {
        let _ = writeln!(self.writer, "[{:>11}] {:<7} {:?} (no root)", "", "skip", e.section);
    }

    fn on_stagger(&mut self, e: &StaggerEvent) {
        let _ = writeln!(
            self.writer,
            "[{:>9.1}ms] {:<7} {:?} #{} in {:?} due {:.1}ms",
            self.ms(e.planned_at),
            "queue",
            e.element,
            e.index,
            e.section,
            self.ms(e.due),
        );
    }

    fn on_reveal(&mut self, e: &RevealEvent) {
        let late = e.fired_at.saturating_duration_since(e.due);
        let _ = writeln!(
            self.writer,
            "[{:>9.1}ms] {:<7} {:?} in {:?} late={:.1}ms",
            self.ms(e.fired_at),
            "reveal",
            e.element,
            e.section,
            late.to_nanos(self.timebase) as f64 / 1e6,
        );
    }

    fn on_stale_timer(&mut self, e: &StaleTimerEvent) {
        let _ = writeln!(
            self.writer,
            "[{:>9.1}ms] {:<7} {:?} (section gone)",
            self.ms(e.fired_at),
            "stale",
            e.element,
        );
    }

    fn on_unmount(&mut self, e: &UnmountEvent) {
        let observed = if e.was_observed { "observed" } else { "unobserved" };
        let _ = writeln!(
            self.writer,
            "[{:>11}] {:<7} {:?} elements={} {observed}",
            "", "unmount", e.section, e.elements,
        );
    }
}
