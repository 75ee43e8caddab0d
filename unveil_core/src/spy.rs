// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Active-section tracking for page navigation.
//!
//! The header highlights whichever section currently straddles a probe line
//! a fixed distance below the top of the viewport, and switches to its
//! compact style once the page has scrolled past a small offset.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Rect;

/// Tracks which section the navigation should mark as active.
#[derive(Clone, Debug)]
pub struct ScrollSpy {
    anchors: Vec<String>,
    active: Option<usize>,
    probe_y: f64,
    scrolled_offset: f64,
}

impl ScrollSpy {
    /// Distance of the probe line below the viewport top, in CSS pixels.
    pub const DEFAULT_PROBE_Y: f64 = 100.0;

    /// Scroll offset past which the page counts as scrolled, in CSS pixels.
    pub const DEFAULT_SCROLLED_OFFSET: f64 = 50.0;

    /// Creates a spy over `anchors` in page order. The first anchor starts
    /// active.
    #[must_use]
    pub fn new<I, S>(anchors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let anchors: Vec<String> = anchors.into_iter().map(Into::into).collect();
        let active = (!anchors.is_empty()).then_some(0);
        Self {
            anchors,
            active,
            probe_y: Self::DEFAULT_PROBE_Y,
            scrolled_offset: Self::DEFAULT_SCROLLED_OFFSET,
        }
    }

    /// Anchors in page order.
    #[must_use]
    pub fn anchors(&self) -> &[String] {
        &self.anchors
    }

    /// Currently active anchor.
    #[must_use]
    pub fn active(&self) -> Option<&str> {
        self.active.map(|i| self.anchors[i].as_str())
    }

    /// Whether the page has scrolled past the compact-header offset.
    #[must_use]
    pub fn is_scrolled(&self, scroll_y: f64) -> bool {
        scroll_y > self.scrolled_offset
    }

    /// Re-evaluates the active section from viewport-relative section rects.
    ///
    /// `rect_of` returns the rect for an anchor, or `None` if the section is
    /// not in the page. The first section in page order whose rect straddles
    /// the probe line wins; if none does, the previous active section stays.
    /// Returns `true` if the active section changed.
    pub fn update(&mut self, mut rect_of: impl FnMut(&str) -> Option<Rect>) -> bool {
        let hit = self.anchors.iter().position(|anchor| {
            rect_of(anchor).is_some_and(|r| r.y0 <= self.probe_y && r.y1 >= self.probe_y)
        });
        match hit {
            Some(i) if self.active != Some(i) => {
                self.active = Some(i);
                true
            }
            _ => false,
        }
    }
}
