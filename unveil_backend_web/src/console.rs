// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser console trace sink.

use alloc::format;

use unveil_core::observer::VisibilityEvent;
use unveil_core::time::{HostTime, Timebase};
use unveil_core::trace::{
    RegistrationSkippedEvent, RevealEvent, StaggerEvent, StaleTimerEvent, TraceSink,
    UnmountEvent,
};
use wasm_bindgen::JsValue;
use web_sys::console;

/// A [`TraceSink`] that logs one line per event with `console.debug`.
///
/// Only receives events when `unveil_core`'s `trace` feature is enabled
/// (forwarded by this crate's `trace` feature).
#[derive(Clone, Copy, Debug)]
pub struct ConsoleSink {
    timebase: Timebase,
}

impl ConsoleSink {
    /// Creates a sink that formats host times in `timebase`.
    #[must_use]
    pub fn new(timebase: Timebase) -> Self {
        Self { timebase }
    }

    fn ms(&self, t: HostTime) -> f64 {
        #[allow(
            clippy::cast_precision_loss,
            reason = "page-lifetime microsecond counts stay well inside f64's exact range"
        )]
        let us = (t.to_nanos(self.timebase) / 1_000) as f64;
        us / 1e3
    }
}

fn log(line: &str) {
    console::debug_1(&JsValue::from_str(line));
}

impl TraceSink for ConsoleSink {
    fn on_visibility(&mut self, e: &VisibilityEvent) {
        log(&format!(
            "[unveil {:.1}ms] {:?} {} ratio={:.3}",
            self.ms(e.time),
            e.section,
            if e.is_intersecting { "enter" } else { "exit" },
            e.ratio,
        ));
    }

    fn on_registration_skipped(&mut self, e: &RegistrationSkippedEvent) {
        log(&format!("[unveil] {:?} has no root; not observed", e.section));
    }

    fn on_stagger(&mut self, e: &StaggerEvent) {
        log(&format!(
            "[unveil {:.1}ms] {:?} #{} queued for {:.1}ms",
            self.ms(e.planned_at),
            e.element,
            e.index,
            self.ms(e.due),
        ));
    }

    fn on_reveal(&mut self, e: &RevealEvent) {
        log(&format!(
            "[unveil {:.1}ms] {:?} revealed (due {:.1}ms)",
            self.ms(e.fired_at),
            e.element,
            self.ms(e.due),
        ));
    }

    fn on_stale_timer(&mut self, e: &StaleTimerEvent) {
        log(&format!(
            "[unveil {:.1}ms] {:?} dropped stale reveal",
            self.ms(e.fired_at),
            e.element,
        ));
    }

    fn on_unmount(&mut self, e: &UnmountEvent) {
        log(&format!(
            "[unveil] {:?} unmounted ({} elements)",
            e.section, e.elements,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_times_print_in_millis() {
        let sink = ConsoleSink::new(Timebase::MICROS);
        assert_eq!(sink.ms(HostTime(1_500)), 1.5);
        // Sub-microsecond ticks are dropped before the float conversion.
        let sink = ConsoleSink::new(Timebase::NANOS);
        assert_eq!(sink.ms(HostTime(2_000_999)), 2.0);
    }
}
