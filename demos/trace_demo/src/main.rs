// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated scroll session that exercises the tracing and diagnostics
//! pipeline.
//!
//! Lays the portfolio sections out as a stacked page, scrolls through it at a
//! steady pace on a [`ManualClock`], and records every engine event to both a
//! [`PrettyPrintSink`] and a [`RecorderSink`]. Halfway down, the portfolio
//! section is torn down mid-stagger to show stale reveals being dropped. The
//! recording is then exported as a Chrome trace JSON file.

use std::fs::File;
use std::io::BufWriter;

use kurbo::Rect;
use unveil_core::clock::ManualClock;
use unveil_core::config::{NAV_ANCHORS, REVEAL_SECTIONS};
use unveil_core::engine::RevealEngine;
use unveil_core::observer::VisibilityEvent;
use unveil_core::section::{Intent, SectionId};
use unveil_core::spy::ScrollSpy;
use unveil_core::time::{HostTime, Timebase};
use unveil_core::trace::{
    RegistrationSkippedEvent, RevealEvent, StaggerEvent, StaleTimerEvent, TraceSink, Tracer,
    UnmountEvent,
};

use unveil_debug::pretty::PrettyPrintSink;
use unveil_debug::recorder::RecorderSink;

const VIEWPORT_W: f64 = 1280.0;
const VIEWPORT_H: f64 = 800.0;
const SECTION_H: f64 = 900.0;
/// Scroll distance per simulated frame.
const SCROLL_STEP: f64 = 40.0;
const FRAME_MS: u32 = 16;
/// Animatable children per section.
const CHILDREN: usize = 4;

/// Forwards every event to two sinks.
struct Tee<'a> {
    a: &'a mut dyn TraceSink,
    b: &'a mut dyn TraceSink,
}

impl TraceSink for Tee<'_> {
    fn on_visibility(&mut self, e: &VisibilityEvent) {
        self.a.on_visibility(e);
        self.b.on_visibility(e);
    }
    fn on_registration_skipped(&mut self, e: &RegistrationSkippedEvent) {
        self.a.on_registration_skipped(e);
        self.b.on_registration_skipped(e);
    }
    fn on_stagger(&mut self, e: &StaggerEvent) {
        self.a.on_stagger(e);
        self.b.on_stagger(e);
    }
    fn on_reveal(&mut self, e: &RevealEvent) {
        self.a.on_reveal(e);
        self.b.on_reveal(e);
    }
    fn on_stale_timer(&mut self, e: &StaleTimerEvent) {
        self.a.on_stale_timer(e);
        self.b.on_stale_timer(e);
    }
    fn on_unmount(&mut self, e: &UnmountEvent) {
        self.a.on_unmount(e);
        self.b.on_unmount(e);
    }
}

/// Document-space rect of the section at `slot` in the stacked page.
fn page_rect(slot: usize) -> Rect {
    let top = SECTION_H * slot as f64;
    Rect::new(0.0, top, VIEWPORT_W, top + SECTION_H)
}

fn slot_of(anchor: &str) -> Option<usize> {
    NAV_ANCHORS.iter().position(|a| *a == anchor)
}

fn main() {
    let timebase = Timebase::MICROS;
    let mut clock = ManualClock::new(HostTime(1_000_000), timebase);

    // -- sinks -------------------------------------------------------------
    let mut pretty = PrettyPrintSink::new(Box::new(std::io::stdout()), timebase);
    let mut recorder = RecorderSink::new();

    // -- page --------------------------------------------------------------
    let mut engine = RevealEngine::new(timebase);
    let mut spy = ScrollSpy::new(NAV_ANCHORS);
    let mut sections: Vec<(SectionId, usize)> = Vec::new();
    let mut portfolio = None;

    {
        let mut tee = Tee {
            a: &mut pretty,
            b: &mut recorder,
        };
        let mut tracer = Tracer::new(&mut tee);
        for (anchor, config) in REVEAL_SECTIONS {
            let Some(slot) = slot_of(anchor) else {
                continue;
            };
            let section = engine.mount_section(anchor, config);
            for i in 0..CHILDREN {
                engine.register_element(section, Intent::ALL[i % Intent::ALL.len()]);
            }
            // Contact has not been laid out yet when first mounted.
            let root = (anchor != "contact").then(|| page_rect(slot));
            engine.attach_root(section, root, &mut tracer);
            if anchor == "portfolio" {
                portfolio = Some(section);
            }
            sections.push((section, slot));
        }
    }

    // -- simulated scroll --------------------------------------------------
    let page_h = page_rect(NAV_ANCHORS.len()).y0;
    let mut scroll_y = 0.0;
    let mut frames = 0_u32;

    while scroll_y + VIEWPORT_H < page_h || engine.next_due().is_some() {
        let at_bottom = scroll_y + VIEWPORT_H >= page_h;
        let now = match engine.next_due() {
            // Scrolling has stopped; sleep until the next queued reveal.
            Some(due) if at_bottom => clock.advance_to(due),
            _ => clock.advance_ms(FRAME_MS),
        };
        let mut tee = Tee {
            a: &mut pretty,
            b: &mut recorder,
        };
        let mut tracer = Tracer::new(&mut tee);

        // Late layout: contact gets its root once the user is near it.
        if let Some(&(contact, slot)) = sections.last()
            && scroll_y > page_h / 2.0
            && !engine.observer().is_observing(contact)
        {
            engine.attach_root(contact, Some(page_rect(slot)), &mut tracer);
        }

        for &(section, slot) in &sections {
            engine.set_root(section, page_rect(slot) - kurbo::Vec2::new(0.0, scroll_y));
        }
        engine.scroll(Rect::new(0.0, 0.0, VIEWPORT_W, VIEWPORT_H), now, &mut tracer);
        engine.advance(now, &mut tracer);
        engine.drain_changes();

        if let Some(section) = portfolio
            && engine
                .elements(section)
                .first()
                .is_some_and(|&e| engine.is_revealed(e))
        {
            engine.unmount_section(section, &mut tracer);
            sections.retain(|&(s, _)| s != section);
            portfolio = None;
        }

        if spy.update(|anchor| {
            slot_of(anchor).map(|slot| page_rect(slot) - kurbo::Vec2::new(0.0, scroll_y))
        }) {
            println!("[nav] active={}", spy.active().unwrap_or("-"));
        }

        scroll_y = (scroll_y + SCROLL_STEP).min(page_h - VIEWPORT_H);
        frames += 1;
    }

    // -- export Chrome trace -----------------------------------------------
    let path = "unveil_trace.json";
    let file = File::create(path).expect("failed to create unveil_trace.json");
    let mut writer = BufWriter::new(file);
    unveil_debug::chrome::export(recorder.events(), timebase, &mut writer)
        .expect("failed to write Chrome trace");

    println!("Wrote {path} ({frames} frames, {} events)", recorder.len());
}
