// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-section reveal configuration and the portfolio page presets.

use kurbo::Insets;

/// Configuration for one section's observer and stagger.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SectionConfig {
    /// Fraction of the section root's area that must be inside the viewport
    /// for it to count as intersecting. Clamped to `0.0..=1.0` on use.
    pub threshold: f64,
    /// Amount the viewport is grown (positive) or shrunk (negative) by before
    /// intersecting, per edge.
    pub root_margin: Insets,
    /// Delay between consecutive element reveals, in milliseconds.
    pub delay_unit_ms: u32,
}

impl Default for SectionConfig {
    fn default() -> Self {
        Self::with_delay_ms(100)
    }
}

impl SectionConfig {
    /// Default visibility threshold: 10% of the root visible.
    pub const DEFAULT_THRESHOLD: f64 = 0.1;

    /// A 10% threshold with no root margin and the given delay unit.
    #[must_use]
    pub const fn with_delay_ms(delay_unit_ms: u32) -> Self {
        Self {
            threshold: Self::DEFAULT_THRESHOLD,
            root_margin: Insets::ZERO,
            delay_unit_ms,
        }
    }

    /// Returns the threshold clamped to `0.0..=1.0` (NaN becomes 0.0).
    #[must_use]
    pub fn clamped_threshold(&self) -> f64 {
        if self.threshold.is_nan() {
            0.0
        } else {
            self.threshold.clamp(0.0, 1.0)
        }
    }

    /// Biography section.
    #[must_use]
    pub const fn about() -> Self {
        Self::with_delay_ms(100)
    }

    /// Education history.
    #[must_use]
    pub const fn education() -> Self {
        Self::with_delay_ms(150)
    }

    /// Work experience.
    #[must_use]
    pub const fn experience() -> Self {
        Self::with_delay_ms(100)
    }

    /// Skills list.
    #[must_use]
    pub const fn skills() -> Self {
        Self::with_delay_ms(150)
    }

    /// Achievements.
    #[must_use]
    pub const fn achievements() -> Self {
        Self::with_delay_ms(200)
    }

    /// Project gallery.
    #[must_use]
    pub const fn portfolio() -> Self {
        Self::with_delay_ms(100)
    }

    /// Contact form.
    #[must_use]
    pub const fn contact() -> Self {
        Self::with_delay_ms(100)
    }

    /// Looks up the preset for a page anchor.
    #[must_use]
    pub fn preset(anchor: &str) -> Option<Self> {
        REVEAL_SECTIONS
            .iter()
            .find(|(a, _)| *a == anchor)
            .map(|&(_, config)| config)
    }
}

/// Anchors of every page section in page order, including the hero banner,
/// which animates with CSS keyframes and has no reveal observer.
pub const NAV_ANCHORS: [&str; 8] = [
    "hero",
    "about",
    "education",
    "experience",
    "skills",
    "achievements",
    "portfolio",
    "contact",
];

/// Sections that reveal on scroll, in page order, with their presets.
pub const REVEAL_SECTIONS: [(&str, SectionConfig); 7] = [
    ("about", SectionConfig::about()),
    ("education", SectionConfig::education()),
    ("experience", SectionConfig::experience()),
    ("skills", SectionConfig::skills()),
    ("achievements", SectionConfig::achievements()),
    ("portfolio", SectionConfig::portfolio()),
    ("contact", SectionConfig::contact()),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_match_page_delays() {
        assert_eq!(SectionConfig::preset("about").map(|c| c.delay_unit_ms), Some(100));
        assert_eq!(SectionConfig::preset("skills").map(|c| c.delay_unit_ms), Some(150));
        assert_eq!(
            SectionConfig::preset("achievements").map(|c| c.delay_unit_ms),
            Some(200)
        );
        assert_eq!(SectionConfig::preset("hero"), None, "hero has no observer");
    }

    #[test]
    fn reveal_sections_follow_nav_order() {
        let mut nav = NAV_ANCHORS.iter().skip(1);
        for (anchor, _) in REVEAL_SECTIONS {
            assert_eq!(nav.next(), Some(&anchor));
        }
    }

    #[test]
    fn threshold_is_clamped() {
        let mut c = SectionConfig::default();
        c.threshold = 1.5;
        assert_eq!(c.clamped_threshold(), 1.0);
        c.threshold = -0.2;
        assert_eq!(c.clamped_threshold(), 0.0);
        c.threshold = f64::NAN;
        assert_eq!(c.clamped_threshold(), 0.0);
        assert_eq!(SectionConfig::default().clamped_threshold(), 0.1);
    }
}
