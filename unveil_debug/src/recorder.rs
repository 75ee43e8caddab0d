// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory event recording.
//!
//! [`RecorderSink`] implements [`TraceSink`] and appends every event to a
//! `Vec<RecordedEvent>` in arrival order.

use unveil_core::observer::VisibilityEvent;
use unveil_core::time::HostTime;
use unveil_core::trace::{
    RegistrationSkippedEvent, RevealEvent, StaggerEvent, StaleTimerEvent, TraceSink,
    UnmountEvent,
};

/// A single recorded trace event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RecordedEvent {
    /// See [`TraceSink::on_visibility`].
    Visibility(VisibilityEvent),
    /// See [`TraceSink::on_registration_skipped`].
    RegistrationSkipped(RegistrationSkippedEvent),
    /// See [`TraceSink::on_stagger`].
    Stagger(StaggerEvent),
    /// See [`TraceSink::on_reveal`].
    Reveal(RevealEvent),
    /// See [`TraceSink::on_stale_timer`].
    StaleTimer(StaleTimerEvent),
    /// See [`TraceSink::on_unmount`].
    Unmount(UnmountEvent),
}

impl RecordedEvent {
    /// Host time the event happened at, for events that carry one.
    #[must_use]
    pub fn time(&self) -> Option<HostTime> {
        match self {
            Self::Visibility(e) => Some(e.time),
            Self::Stagger(e) => Some(e.planned_at),
            Self::Reveal(e) => Some(e.fired_at),
            Self::StaleTimer(e) => Some(e.fired_at),
            Self::RegistrationSkipped(_) | Self::Unmount(_) => None,
        }
    }
}

/// A [`TraceSink`] that keeps every event in memory.
#[derive(Clone, Debug, Default)]
pub struct RecorderSink {
    events: Vec<RecordedEvent>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded events in arrival order.
    #[must_use]
    pub fn events(&self) -> &[RecordedEvent] {
        &self.events
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns `true` if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Consumes the recorder, returning the events.
    #[must_use]
    pub fn into_events(self) -> Vec<RecordedEvent> {
        self.events
    }

    /// Discards all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl TraceSink for RecorderSink {
    fn on_visibility(&mut self, e: &VisibilityEvent) {
        self.events.push(RecordedEvent::Visibility(*e));
    }

    fn on_registration_skipped(&mut self, e: &RegistrationSkippedEvent) {
        self.events.push(RecordedEvent::RegistrationSkipped(*e));
    }

    fn on_stagger(&mut self, e: &StaggerEvent) {
        self.events.push(RecordedEvent::Stagger(*e));
    }

    fn on_reveal(&mut self, e: &RevealEvent) {
        self.events.push(RecordedEvent::Reveal(*e));
    }

    fn on_stale_timer(&mut self, e: &StaleTimerEvent) {
        self.events.push(RecordedEvent::StaleTimer(*e));
    }

    fn on_unmount(&mut self, e: &UnmountEvent) {
        self.events.push(RecordedEvent::Unmount(*e));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unveil_core::config::SectionConfig;
    use unveil_core::engine::RevealEngine;
    use unveil_core::section::Intent;
    use unveil_core::time::Timebase;
    use unveil_core::trace::Tracer;

    use kurbo::Rect;

    #[test]
    fn records_engine_session_in_order() {
        let mut rec = RecorderSink::new();
        let mut engine = RevealEngine::new(Timebase::MICROS);
        {
            let mut t = Tracer::new(&mut rec);
            let about = engine.mount_section("about", SectionConfig::about());
            engine.register_element(about, Intent::Fade);
            engine.register_element(about, Intent::SlideLeft);
            engine.attach_root(about, Some(Rect::new(0.0, 100.0, 800.0, 700.0)), &mut t);
            engine.scroll(Rect::new(0.0, 0.0, 800.0, 600.0), HostTime(0), &mut t);
            engine.advance(HostTime(100_000), &mut t);
        }

        let kinds: Vec<_> = rec
            .events()
            .iter()
            .map(|e| match e {
                RecordedEvent::Visibility(_) => "visibility",
                RecordedEvent::Stagger(_) => "stagger",
                RecordedEvent::Reveal(_) => "reveal",
                RecordedEvent::RegistrationSkipped(_) => "skipped",
                RecordedEvent::StaleTimer(_) => "stale",
                RecordedEvent::Unmount(_) => "unmount",
            })
            .collect();
        assert_eq!(
            kinds,
            ["visibility", "stagger", "stagger", "reveal", "reveal"],
            "events arrive in engine order"
        );
        assert_eq!(rec.events()[2].time(), Some(HostTime(0)));
    }

    #[test]
    fn clear_empties_the_log() {
        let mut rec = RecorderSink::new();
        let section =
            RevealEngine::new(Timebase::MICROS).mount_section("contact", SectionConfig::contact());
        rec.on_registration_skipped(&RegistrationSkippedEvent { section });
        assert_eq!(rec.len(), 1);
        rec.clear();
        assert!(rec.is_empty());
    }
}
