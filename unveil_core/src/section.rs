// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Section and element identity, intents, and reveal state.

use core::fmt;

/// A handle to a section in a [`RevealStore`](crate::store::RevealStore).
///
/// Carries a slot index and a generation counter so handles held past
/// [`unmount`](crate::engine::RevealEngine::unmount_section) are detected as
/// stale once the slot is reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SectionId {
    pub(crate) idx: u32,
    pub(crate) generation: u32,
}

impl SectionId {
    /// Returns the raw slot index (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Returns the generation counter.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SectionId({}@gen{})", self.idx, self.generation)
    }
}

/// A handle to an animatable element registered with a section.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId {
    pub(crate) idx: u32,
    pub(crate) generation: u32,
}

impl ElementId {
    /// Returns the raw slot index (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Returns the generation counter.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ElementId({}@gen{})", self.idx, self.generation)
    }
}

/// Which entrance transition the styling layer plays for an element.
///
/// The engine never interprets the intent; it is carried so presenters can
/// attach the matching transition recipe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Intent {
    /// Opacity fade.
    Fade,
    /// Grow from slightly smaller.
    Scale,
    /// Slide in from the left edge.
    SlideLeft,
    /// Slide in from the right edge.
    SlideRight,
}

impl Intent {
    /// All intents, in declaration order.
    pub const ALL: [Self; 4] = [Self::Fade, Self::Scale, Self::SlideLeft, Self::SlideRight];

    /// CSS class carrying the hidden state and transition for this intent.
    #[must_use]
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::Fade => "fade-in-on-scroll",
            Self::Scale => "scale-in-on-scroll",
            Self::SlideLeft => "slide-in-left-on-scroll",
            Self::SlideRight => "slide-in-right-on-scroll",
        }
    }

    /// Inverse of [`class_name`](Self::class_name).
    #[must_use]
    pub fn from_class_name(class: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|i| i.class_name() == class)
    }
}

/// Marker class that flips an element from its hidden to its revealed look.
pub const REVEALED_CLASS: &str = "visible";

/// One-shot entrance state of an element.
///
/// `Hidden → Revealed` is the only transition; `Revealed` is terminal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RevealState {
    /// Entrance transition has not fired yet.
    #[default]
    Hidden,
    /// Entrance transition has fired.
    Revealed,
}

impl RevealState {
    /// Returns `true` for [`RevealState::Revealed`].
    #[inline]
    #[must_use]
    pub const fn is_revealed(self) -> bool {
        matches!(self, Self::Revealed)
    }
}
