// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Threshold-based viewport observation.
//!
//! [`ViewportObserver`] holds one registration per observed section root.
//! Each [`update`](ViewportObserver::update) measures what fraction of every
//! root lies inside the (margin-adjusted) viewport and emits a
//! [`VisibilityEvent`] whenever a registration's intersecting state differs
//! from the previous update. The first update after registration always
//! reports, so a section that is already on screen at mount time reveals.

use alloc::vec::Vec;

use kurbo::{Insets, Rect};

use crate::config::SectionConfig;
use crate::section::SectionId;
use crate::time::HostTime;

/// A visibility crossing for one observed section.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisibilityEvent {
    /// The observed section.
    pub section: SectionId,
    /// Whether the visible fraction is at or above the threshold.
    pub is_intersecting: bool,
    /// Visible fraction of the root's area, `0.0..=1.0`.
    pub ratio: f64,
    /// Host time of the measurement.
    pub time: HostTime,
}

#[derive(Clone, Copy, Debug)]
struct Registration {
    section: SectionId,
    root: Rect,
    threshold: f64,
    root_margin: Insets,
    last: Option<bool>,
}

/// Watches section roots against a viewport rectangle.
#[derive(Debug, Default)]
pub struct ViewportObserver {
    registrations: Vec<Registration>,
}

impl ViewportObserver {
    /// Creates an observer with no registrations.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts observing a section root.
    ///
    /// A `None` root means the section has not been laid out yet; the
    /// observer is simply not attached and `false` is returned. Observing an
    /// already observed section replaces its root and configuration and
    /// re-arms the initial report.
    pub fn observe(&mut self, section: SectionId, root: Option<Rect>, config: &SectionConfig) -> bool {
        let Some(root) = root else {
            return false;
        };
        let registration = Registration {
            section,
            root,
            threshold: config.clamped_threshold(),
            root_margin: config.root_margin,
            last: None,
        };
        match self.find(section) {
            Some(i) => self.registrations[i] = registration,
            None => self.registrations.push(registration),
        }
        true
    }

    /// Updates the root geometry of an observed section (e.g. after layout).
    ///
    /// Returns `false` if the section is not observed.
    pub fn set_root(&mut self, section: SectionId, root: Rect) -> bool {
        match self.find(section) {
            Some(i) => {
                self.registrations[i].root = root;
                true
            }
            None => false,
        }
    }

    /// Stops observing a section. No further events are emitted for it.
    ///
    /// Returns `false` if the section was not observed.
    pub fn disconnect(&mut self, section: SectionId) -> bool {
        match self.find(section) {
            Some(i) => {
                self.registrations.swap_remove(i);
                true
            }
            None => false,
        }
    }

    /// Returns whether the section is currently observed.
    #[must_use]
    pub fn is_observing(&self, section: SectionId) -> bool {
        self.find(section).is_some()
    }

    /// Number of active registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// Returns `true` if nothing is observed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Measures every registration against `viewport` and appends crossing
    /// events to `out`.
    pub fn update(&mut self, viewport: Rect, time: HostTime, out: &mut Vec<VisibilityEvent>) {
        for reg in &mut self.registrations {
            let bounds = viewport.inset(reg.root_margin).abs();
            let ratio = visible_ratio(reg.root, bounds);
            // A zero threshold means "any contact", not "always".
            let is_intersecting = if reg.threshold > 0.0 {
                ratio >= reg.threshold
            } else {
                touches(reg.root.abs(), bounds)
            };
            if reg.last != Some(is_intersecting) {
                reg.last = Some(is_intersecting);
                out.push(VisibilityEvent {
                    section: reg.section,
                    is_intersecting,
                    ratio,
                    time,
                });
            }
        }
    }

    fn find(&self, section: SectionId) -> Option<usize> {
        self.registrations.iter().position(|r| r.section == section)
    }
}

/// Fraction of `target`'s area that lies inside `viewport`.
///
/// A zero-area target counts as fully visible (1.0) when it lies inside the
/// viewport, edges included, and as invisible (0.0) otherwise.
#[must_use]
pub fn visible_ratio(target: Rect, viewport: Rect) -> f64 {
    let target = target.abs();
    let viewport = viewport.abs();
    let area = target.area();
    if area <= 0.0 {
        return if touches(target, viewport) { 1.0 } else { 0.0 };
    }
    let overlap = target.intersect(viewport);
    (overlap.area() / area).clamp(0.0, 1.0)
}

/// Whether two rectangles overlap or share an edge.
fn touches(a: Rect, b: Rect) -> bool {
    a.x0 <= b.x1 && b.x0 <= a.x1 && a.y0 <= b.y1 && b.y0 <= a.y1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(idx: u32) -> SectionId {
        SectionId { idx, generation: 0 }
    }

    const VIEWPORT: Rect = Rect::new(0.0, 0.0, 1000.0, 800.0);

    /// A 1000×1000 root whose top edge sits at `top` in viewport space.
    fn root_at(top: f64) -> Rect {
        Rect::new(0.0, top, 1000.0, top + 1000.0)
    }

    #[test]
    fn ratio_of_partial_overlap() {
        // Top 100px of a 1000px tall root visible → 10%.
        let r = visible_ratio(root_at(700.0), VIEWPORT);
        assert!((r - 0.1).abs() < 1e-9, "got {r}");
        assert_eq!(visible_ratio(root_at(900.0), VIEWPORT), 0.0);
        assert_eq!(visible_ratio(Rect::new(10.0, 10.0, 20.0, 20.0), VIEWPORT), 1.0);
    }

    #[test]
    fn zero_area_target() {
        assert_eq!(visible_ratio(Rect::new(5.0, 5.0, 5.0, 50.0), VIEWPORT), 1.0);
        assert_eq!(visible_ratio(Rect::new(5.0, 900.0, 5.0, 950.0), VIEWPORT), 0.0);
    }

    #[test]
    fn fires_iff_ratio_reaches_threshold() {
        let mut obs = ViewportObserver::new();
        let config = SectionConfig::default();
        let mut out = Vec::new();

        // 5% visible: below threshold.
        assert!(obs.observe(section(0), Some(root_at(750.0)), &config));
        obs.update(VIEWPORT, HostTime(0), &mut out);
        assert_eq!(out.len(), 1, "initial report");
        assert!(!out[0].is_intersecting);

        // Exactly 10% visible: at threshold.
        out.clear();
        obs.set_root(section(0), root_at(700.0));
        obs.update(VIEWPORT, HostTime(1), &mut out);
        assert_eq!(out.len(), 1);
        assert!(out[0].is_intersecting, "ratio == threshold intersects");
        assert_eq!(out[0].time, HostTime(1));

        // Further scrolling without crossing back: no event.
        out.clear();
        obs.set_root(section(0), root_at(200.0));
        obs.update(VIEWPORT, HostTime(2), &mut out);
        assert!(out.is_empty(), "no crossing, no event");

        // Scrolled out again: exit event.
        obs.set_root(section(0), root_at(-995.0));
        obs.update(VIEWPORT, HostTime(3), &mut out);
        assert_eq!(out.len(), 1);
        assert!(!out[0].is_intersecting);
    }

    #[test]
    fn absent_root_is_not_attached() {
        let mut obs = ViewportObserver::new();
        assert!(!obs.observe(section(0), None, &SectionConfig::default()));
        assert!(!obs.is_observing(section(0)));
        assert!(!obs.set_root(section(0), root_at(0.0)));

        let mut out = Vec::new();
        obs.update(VIEWPORT, HostTime(0), &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn disconnect_stops_events() {
        let mut obs = ViewportObserver::new();
        let mut out = Vec::new();
        obs.observe(section(0), Some(root_at(900.0)), &SectionConfig::default());
        obs.observe(section(1), Some(root_at(900.0)), &SectionConfig::default());
        assert!(obs.disconnect(section(0)));
        assert!(!obs.disconnect(section(0)), "second disconnect is a no-op");

        obs.update(VIEWPORT, HostTime(0), &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].section, section(1));
    }

    #[test]
    fn root_margin_expands_viewport() {
        let mut obs = ViewportObserver::new();
        let mut config = SectionConfig::default();
        config.root_margin = Insets::new(0.0, 0.0, 0.0, 200.0);
        let mut out = Vec::new();

        // Root starts 100px below the fold; the margin pulls it in.
        obs.observe(section(0), Some(root_at(900.0)), &config);
        obs.update(VIEWPORT, HostTime(0), &mut out);
        assert!(out[0].is_intersecting, "ratio {} with margin", out[0].ratio);
    }

    #[test]
    fn zero_threshold_fires_on_edge_contact() {
        let mut obs = ViewportObserver::new();
        let mut config = SectionConfig::default();
        config.threshold = 0.0;
        let mut out = Vec::new();

        obs.observe(section(0), Some(root_at(800.0)), &config);
        obs.update(VIEWPORT, HostTime(0), &mut out);
        assert!(out[0].is_intersecting, "edge contact counts at threshold 0");

        out.clear();
        obs.set_root(section(0), root_at(801.0));
        obs.update(VIEWPORT, HostTime(1), &mut out);
        assert!(!out[0].is_intersecting);
    }
}
