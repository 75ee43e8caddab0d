// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The reveal engine: observation, staggering, and deferred reveals.
//!
//! [`RevealEngine`] owns the [`RevealStore`], the [`ViewportObserver`] and
//! the [`TaskQueue`] of pending reveals. Backends feed it geometry and time;
//! it never reads a clock itself, so the same code runs under a browser
//! timer and under a [`ManualClock`](crate::clock::ManualClock) in tests.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Rect;

use crate::config::SectionConfig;
use crate::observer::{ViewportObserver, VisibilityEvent};
use crate::queue::TaskQueue;
use crate::section::{ElementId, Intent, RevealState, SectionId};
use crate::stagger::{ScheduledReveal, Stagger};
use crate::store::{RevealChanges, RevealStore};
use crate::time::{HostTime, Timebase};
use crate::trace::{
    RegistrationSkippedEvent, RevealEvent, StaggerEvent, StaleTimerEvent, Tracer, UnmountEvent,
};

/// Coordinates reveal-on-scroll for every mounted section.
///
/// # Usage
///
/// ```rust,ignore
/// let about = engine.mount_section("about", SectionConfig::about());
/// let heading = engine.register_element(about, Intent::Fade);
/// engine.attach_root(about, Some(root_rect), &mut tracer);
///
/// // On scroll:
/// engine.scroll(viewport, now, &mut tracer);
/// // On timer:
/// engine.advance(now, &mut tracer);
/// presenter.apply(&engine, &engine.drain_changes());
/// ```
#[derive(Debug)]
pub struct RevealEngine {
    store: RevealStore,
    observer: ViewportObserver,
    queue: TaskQueue<ElementId>,
    timebase: Timebase,
    scratch: Vec<VisibilityEvent>,
}

impl RevealEngine {
    /// Creates an engine whose host times use `timebase`.
    #[must_use]
    pub fn new(timebase: Timebase) -> Self {
        Self {
            store: RevealStore::new(),
            observer: ViewportObserver::new(),
            queue: TaskQueue::new(),
            timebase,
            scratch: Vec::new(),
        }
    }

    // -- Lifecycle --

    /// Creates a section. It is not observed until
    /// [`attach_root`](Self::attach_root) succeeds.
    pub fn mount_section(&mut self, anchor: impl Into<String>, config: SectionConfig) -> SectionId {
        self.store.create_section(anchor.into(), config)
    }

    /// Registers the next animatable element of `section` in document order.
    ///
    /// Returns `None` if the section has been unmounted.
    pub fn register_element(&mut self, section: SectionId, intent: Intent) -> Option<ElementId> {
        self.store.create_element(section, intent)
    }

    /// Starts observing a section's root.
    ///
    /// An absent root (not laid out yet) leaves the section unobserved and
    /// returns `false`; nothing else happens. Calling again with a root
    /// attaches it.
    pub fn attach_root(
        &mut self,
        section: SectionId,
        root: Option<Rect>,
        tracer: &mut Tracer<'_>,
    ) -> bool {
        let Some(config) = self.store.config(section).copied() else {
            return false;
        };
        if self.observer.observe(section, root, &config) {
            true
        } else {
            tracer.registration_skipped(&RegistrationSkippedEvent { section });
            false
        }
    }

    /// Updates the root geometry of an observed section.
    pub fn set_root(&mut self, section: SectionId, root: Rect) -> bool {
        self.observer.set_root(section, root)
    }

    /// Tears a section down.
    ///
    /// The observer registration is released and the section's elements are
    /// destroyed. Reveals already queued for them stay in the queue and are
    /// discarded when they come due. Returns `false` for a stale handle.
    pub fn unmount_section(&mut self, section: SectionId, tracer: &mut Tracer<'_>) -> bool {
        let elements = u32::try_from(self.store.elements(section).len()).unwrap_or(u32::MAX);
        if !self.store.destroy_section(section) {
            return false;
        }
        let was_observed = self.observer.disconnect(section);
        tracer.unmount(&UnmountEvent {
            section,
            elements,
            was_observed,
        });
        true
    }

    // -- Driving --

    /// Measures every observed root against `viewport` and staggers reveals
    /// for sections that became intersecting.
    ///
    /// Returns the number of visibility events processed.
    pub fn scroll(&mut self, viewport: Rect, now: HostTime, tracer: &mut Tracer<'_>) -> usize {
        let mut events = core::mem::take(&mut self.scratch);
        self.observer.update(viewport, now, &mut events);
        let count = events.len();
        for event in &events {
            self.handle_visibility(event, tracer);
        }
        events.clear();
        self.scratch = events;
        count
    }

    /// Handles one visibility event, e.g. from a native observer.
    ///
    /// Intersecting events queue one reveal per element of the section at
    /// `event.time + index * delay_unit`. Elements already revealed or
    /// already queued are skipped, so repeated crossings are harmless.
    /// Returns the number of reveals queued.
    pub fn handle_visibility(&mut self, event: &VisibilityEvent, tracer: &mut Tracer<'_>) -> usize {
        tracer.visibility(event);
        if !event.is_intersecting {
            return 0;
        }
        let Some(config) = self.store.config(event.section) else {
            return 0;
        };
        let stagger = Stagger::from_millis(config.delay_unit_ms, self.timebase);
        let plan: Vec<ScheduledReveal> = stagger
            .plan(event.time, self.store.elements(event.section))
            .collect();

        let mut queued = 0;
        for planned in plan {
            let element = planned.element;
            if self.store.is_pending(element)
                || self.store.state(element) != Some(RevealState::Hidden)
            {
                continue;
            }
            self.store.set_pending(element, true);
            self.queue.schedule(planned.due, element);
            queued += 1;
            tracer.stagger(&StaggerEvent {
                section: event.section,
                element,
                index: planned.index,
                planned_at: event.time,
                due: planned.due,
            });
        }
        queued
    }

    /// Fires every queued reveal due at or before `now`.
    ///
    /// Returns the number of elements that actually changed state; reveals
    /// for unmounted elements are dropped.
    pub fn advance(&mut self, now: HostTime, tracer: &mut Tracer<'_>) -> usize {
        let mut revealed = 0;
        while let Some((due, element)) = self.queue.pop_due(now) {
            let Some(section) = self.store.section_of(element) else {
                tracer.stale_timer(&StaleTimerEvent {
                    element,
                    due,
                    fired_at: now,
                });
                continue;
            };
            self.store.set_pending(element, false);
            if self.store.reveal(element) {
                revealed += 1;
                tracer.reveal(&RevealEvent {
                    section,
                    element,
                    due,
                    fired_at: now,
                });
            }
        }
        revealed
    }

    /// Earliest queued reveal, for arming a platform timer.
    #[must_use]
    pub fn next_due(&self) -> Option<HostTime> {
        self.queue.next_due()
    }

    /// Number of queued reveals, stale ones included.
    #[must_use]
    pub fn pending_reveals(&self) -> usize {
        self.queue.len()
    }

    /// Takes the transitions and removals recorded since the last drain.
    pub fn drain_changes(&mut self) -> RevealChanges {
        self.store.drain_changes()
    }

    // -- Queries --

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &RevealStore {
        &self.store
    }

    /// The underlying observer.
    #[must_use]
    pub fn observer(&self) -> &ViewportObserver {
        &self.observer
    }

    /// Timebase of the host times this engine is driven with.
    #[must_use]
    pub fn timebase(&self) -> Timebase {
        self.timebase
    }

    /// Reveal state of a live element.
    #[must_use]
    pub fn state(&self, element: ElementId) -> Option<RevealState> {
        self.store.state(element)
    }

    /// Whether a live element has been revealed. Stale handles report `false`.
    #[must_use]
    pub fn is_revealed(&self, element: ElementId) -> bool {
        self.store.state(element).is_some_and(RevealState::is_revealed)
    }

    /// Intent of a live element.
    #[must_use]
    pub fn intent(&self, element: ElementId) -> Option<Intent> {
        self.store.intent(element)
    }

    /// Owning section of a live element.
    #[must_use]
    pub fn section_of(&self, element: ElementId) -> Option<SectionId> {
        self.store.section_of(element)
    }

    /// Elements of a live section in document order.
    #[must_use]
    pub fn elements(&self, section: SectionId) -> &[ElementId] {
        self.store.elements(section)
    }

    /// Anchor name of a live section.
    #[must_use]
    pub fn anchor(&self, section: SectionId) -> Option<&str> {
        self.store.anchor(section)
    }

    /// Whether the section handle is live.
    #[must_use]
    pub fn is_mounted(&self, section: SectionId) -> bool {
        self.store.is_section_alive(section)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    const VIEWPORT: Rect = Rect::new(0.0, 0.0, 1280.0, 800.0);
    const BELOW_FOLD: Rect = Rect::new(0.0, 1200.0, 1280.0, 2000.0);
    const ON_SCREEN: Rect = Rect::new(0.0, 200.0, 1280.0, 1000.0);

    fn setup(
        children: usize,
        delay_ms: u32,
    ) -> (RevealEngine, ManualClock, SectionId, Vec<ElementId>) {
        let clock = ManualClock::new(HostTime(10_000_000), Timebase::MICROS);
        let mut engine = RevealEngine::new(clock.timebase());
        let section = engine.mount_section("about", SectionConfig::with_delay_ms(delay_ms));
        let elements = (0..children)
            .map(|_| engine.register_element(section, Intent::Fade).unwrap())
            .collect();
        assert!(engine.attach_root(section, Some(BELOW_FOLD), &mut Tracer::none()));
        (engine, clock, section, elements)
    }

    fn revealed(engine: &RevealEngine, elements: &[ElementId]) -> Vec<bool> {
        elements.iter().map(|&e| engine.is_revealed(e)).collect()
    }

    #[test]
    fn staggered_reveal_with_virtual_clock() {
        let (mut engine, mut clock, section, els) = setup(3, 100);
        let t = &mut Tracer::none();

        engine.scroll(VIEWPORT, clock.now(), t);
        assert_eq!(engine.pending_reveals(), 0, "below the fold: nothing queued");

        engine.set_root(section, ON_SCREEN);
        engine.scroll(VIEWPORT, clock.now(), t);
        assert_eq!(engine.pending_reveals(), 3);

        // T+0
        assert_eq!(engine.advance(clock.now(), t), 1);
        assert_eq!(revealed(&engine, &els), [true, false, false]);

        // Just before T+100.
        clock.advance_ms(99);
        assert_eq!(engine.advance(clock.now(), t), 0);
        assert_eq!(revealed(&engine, &els), [true, false, false]);

        // T+100
        clock.advance_ms(1);
        engine.advance(clock.now(), t);
        assert_eq!(revealed(&engine, &els), [true, true, false]);

        // Just before T+200, then at it.
        clock.advance_ms(99);
        engine.advance(clock.now(), t);
        assert_eq!(revealed(&engine, &els), [true, true, false]);
        clock.advance_ms(1);
        engine.advance(clock.now(), t);
        assert_eq!(revealed(&engine, &els), [true, true, true]);

        assert_eq!(engine.next_due(), None);
        let changes = engine.drain_changes();
        assert_eq!(changes.revealed, els, "revealed in document order");
    }

    #[test]
    fn late_advance_reveals_in_order() {
        let (mut engine, mut clock, section, els) = setup(4, 150);
        let t = &mut Tracer::none();
        engine.set_root(section, ON_SCREEN);
        engine.scroll(VIEWPORT, clock.now(), t);

        // A long stall: everything is due by the time the timer runs.
        clock.advance_ms(1_000);
        assert_eq!(engine.advance(clock.now(), t), 4);
        assert_eq!(engine.drain_changes().revealed, els);
    }

    #[test]
    fn repeated_intersection_is_idempotent() {
        let (mut engine, mut clock, section, els) = setup(3, 100);
        let t = &mut Tracer::none();

        engine.set_root(section, ON_SCREEN);
        engine.scroll(VIEWPORT, clock.now(), t);
        clock.advance_ms(250);
        engine.advance(clock.now(), t);
        assert_eq!(engine.drain_changes().revealed.len(), 3);

        // Scroll away and back: exit then enter again.
        engine.set_root(section, BELOW_FOLD);
        engine.scroll(VIEWPORT, clock.now(), t);
        engine.set_root(section, ON_SCREEN);
        assert_eq!(engine.scroll(VIEWPORT, clock.now(), t), 1, "re-entry is reported");
        assert_eq!(engine.pending_reveals(), 0, "revealed elements are not re-queued");

        clock.advance_ms(500);
        assert_eq!(engine.advance(clock.now(), t), 0);
        assert!(engine.drain_changes().is_empty(), "no re-animation");
        assert_eq!(revealed(&engine, &els), [true, true, true]);
    }

    #[test]
    fn re_entry_mid_stagger_does_not_double_queue() {
        let (mut engine, mut clock, section, els) = setup(3, 100);
        let t = &mut Tracer::none();

        engine.set_root(section, ON_SCREEN);
        engine.scroll(VIEWPORT, clock.now(), t);
        engine.advance(clock.now(), t);

        let event = VisibilityEvent {
            section,
            is_intersecting: true,
            ratio: 1.0,
            time: clock.advance_ms(10),
        };
        assert_eq!(engine.handle_visibility(&event, t), 0, "children 1 and 2 already queued");
        assert_eq!(engine.pending_reveals(), 2);

        clock.advance_ms(300);
        assert_eq!(engine.advance(clock.now(), t), 2);
        assert_eq!(revealed(&engine, &els), [true, true, true]);
    }

    #[test]
    fn unmount_before_observer_fires() {
        let (mut engine, clock, section, els) = setup(2, 100);
        let t = &mut Tracer::none();

        assert!(engine.unmount_section(section, t));
        assert!(!engine.observer().is_observing(section), "registration released");
        assert!(!engine.unmount_section(section, t), "second unmount is a no-op");

        assert_eq!(engine.scroll(VIEWPORT, clock.now(), t), 0, "no callbacks after teardown");
        assert!(!engine.set_root(section, ON_SCREEN));
        assert_eq!(engine.state(els[0]), None);
        assert_eq!(engine.drain_changes().removed, els);
    }

    #[test]
    fn stale_timers_after_unmount_are_harmless() {
        let (mut engine, mut clock, about, about_els) = setup(3, 100);
        let t = &mut Tracer::none();

        let skills = engine.mount_section("skills", SectionConfig::skills());
        let skills_el = engine.register_element(skills, Intent::Scale).unwrap();
        engine.attach_root(skills, Some(BELOW_FOLD), t);

        engine.set_root(about, ON_SCREEN);
        engine.scroll(VIEWPORT, clock.now(), t);
        engine.advance(clock.now(), t);
        assert!(engine.unmount_section(about, t));

        // A new section reuses the freed element slots.
        let contact = engine.mount_section("contact", SectionConfig::contact());
        let contact_els: Vec<_> = (0..3)
            .map(|_| engine.register_element(contact, Intent::SlideLeft).unwrap())
            .collect();

        clock.advance_ms(500);
        assert_eq!(engine.advance(clock.now(), t), 0, "stale reveals do nothing");
        assert_eq!(engine.pending_reveals(), 0);
        assert!(contact_els.iter().all(|&e| !engine.is_revealed(e)));
        assert!(!engine.is_revealed(skills_el), "other sections untouched");
        assert!(about_els.iter().all(|&e| engine.state(e).is_none()));
    }

    #[test]
    fn absent_root_is_skipped_then_attached() {
        let clock = ManualClock::new(HostTime(0), Timebase::MICROS);
        let mut engine = RevealEngine::new(clock.timebase());
        let t = &mut Tracer::none();
        let section = engine.mount_section("portfolio", SectionConfig::portfolio());
        let el = engine.register_element(section, Intent::Scale).unwrap();

        assert!(!engine.attach_root(section, None, t));
        assert_eq!(engine.scroll(VIEWPORT, clock.now(), t), 0);
        assert!(!engine.is_revealed(el));

        assert!(engine.attach_root(section, Some(ON_SCREEN), t));
        assert_eq!(engine.scroll(VIEWPORT, clock.now(), t), 1);
        assert_eq!(engine.advance(clock.now(), t), 1);
        assert!(engine.is_revealed(el));
    }

    #[test]
    fn sections_stagger_independently() {
        let mut clock = ManualClock::new(HostTime(0), Timebase::MICROS);
        let mut engine = RevealEngine::new(clock.timebase());
        let t = &mut Tracer::none();

        let skills = engine.mount_section("skills", SectionConfig::skills());
        let achievements = engine.mount_section("achievements", SectionConfig::achievements());
        let s: Vec<_> = (0..2)
            .map(|_| engine.register_element(skills, Intent::Fade).unwrap())
            .collect();
        let a: Vec<_> = (0..2)
            .map(|_| engine.register_element(achievements, Intent::Scale).unwrap())
            .collect();
        engine.attach_root(skills, Some(ON_SCREEN), t);
        engine.attach_root(achievements, Some(Rect::new(0.0, 600.0, 1280.0, 1400.0)), t);

        engine.scroll(VIEWPORT, clock.now(), t);
        assert_eq!(engine.pending_reveals(), 4);

        engine.advance(clock.advance_ms(150), t);
        assert!(engine.is_revealed(s[1]), "skills uses 150ms");
        assert!(!engine.is_revealed(a[1]), "achievements uses 200ms");
        engine.advance(clock.advance_ms(50), t);
        assert!(engine.is_revealed(a[1]));
    }

    #[test]
    fn register_after_unmount_fails() {
        let (mut engine, _, section, els) = setup(1, 100);
        assert_eq!(engine.section_of(els[0]), Some(section));
        assert_eq!(engine.intent(els[0]), Some(Intent::Fade));
        assert_eq!(engine.anchor(section), Some("about"));
        engine.unmount_section(section, &mut Tracer::none());
        assert!(engine.register_element(section, Intent::Fade).is_none());
        assert!(!engine.attach_root(section, Some(ON_SCREEN), &mut Tracer::none()));
        assert!(!engine.is_mounted(section));
        assert_eq!(engine.anchor(section), None);
        assert_eq!(engine.section_of(els[0]), None);
    }

    #[cfg(feature = "trace")]
    #[test]
    fn traces_the_whole_lifecycle() {
        use crate::trace::TraceSink;

        #[derive(Default)]
        struct Counts {
            visibility: usize,
            skipped: usize,
            stagger: usize,
            reveal: usize,
            stale: usize,
            unmount: usize,
        }
        impl TraceSink for Counts {
            fn on_visibility(&mut self, _: &VisibilityEvent) {
                self.visibility += 1;
            }
            fn on_registration_skipped(&mut self, _: &RegistrationSkippedEvent) {
                self.skipped += 1;
            }
            fn on_stagger(&mut self, _: &StaggerEvent) {
                self.stagger += 1;
            }
            fn on_reveal(&mut self, _: &RevealEvent) {
                self.reveal += 1;
            }
            fn on_stale_timer(&mut self, _: &StaleTimerEvent) {
                self.stale += 1;
            }
            fn on_unmount(&mut self, _: &UnmountEvent) {
                self.unmount += 1;
            }
        }

        let mut counts = Counts::default();
        let mut engine = RevealEngine::new(Timebase::MICROS);
        {
            let t = &mut Tracer::new(&mut counts);
            let s = engine.mount_section("about", SectionConfig::about());
            for _ in 0..3 {
                engine.register_element(s, Intent::Fade);
            }
            engine.attach_root(s, None, t);
            engine.attach_root(s, Some(ON_SCREEN), t);
            engine.scroll(VIEWPORT, HostTime(0), t);
            engine.advance(HostTime(0), t);
            engine.unmount_section(s, t);
            engine.advance(HostTime(1_000_000), t);
        }
        assert_eq!(counts.visibility, 1);
        assert_eq!(counts.skipped, 1);
        assert_eq!(counts.stagger, 3);
        assert_eq!(counts.reveal, 1);
        assert_eq!(counts.stale, 2);
        assert_eq!(counts.unmount, 1);
    }
}
