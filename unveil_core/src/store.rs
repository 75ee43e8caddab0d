// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays storage for sections and their animatable elements.
//!
//! Sections and elements live in parallel arrays addressed by generational
//! handles. Destroyed slots are recycled through free lists; bumping the
//! generation on destroy makes every outstanding handle stale, which is what
//! turns late timers into no-ops.

use alloc::string::String;
use alloc::vec::Vec;

use crate::config::SectionConfig;
use crate::section::{ElementId, Intent, RevealState, SectionId};

/// Reveal transitions and removals accumulated since the last drain.
///
/// Produced by [`RevealStore::drain_changes`] and consumed by
/// [`RevealPresenter::apply`](crate::backend::RevealPresenter::apply).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RevealChanges {
    /// Elements that went from hidden to revealed, in firing order.
    pub revealed: Vec<ElementId>,
    /// Elements destroyed with their section.
    pub removed: Vec<ElementId>,
}

impl RevealChanges {
    /// Returns `true` if there is nothing to present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.revealed.is_empty() && self.removed.is_empty()
    }
}

/// Storage for all sections and elements.
#[derive(Debug, Default)]
pub struct RevealStore {
    // -- Sections --
    section_anchor: Vec<String>,
    section_config: Vec<SectionConfig>,
    section_elements: Vec<Vec<ElementId>>,
    section_generation: Vec<u32>,
    section_alive: Vec<bool>,
    section_free: Vec<u32>,

    // -- Elements --
    element_intent: Vec<Intent>,
    element_state: Vec<RevealState>,
    element_section: Vec<SectionId>,
    element_order: Vec<u32>,
    element_pending: Vec<bool>,
    element_generation: Vec<u32>,
    element_alive: Vec<bool>,
    element_free: Vec<u32>,

    // -- Change tracking --
    pending_revealed: Vec<ElementId>,
    pending_removed: Vec<ElementId>,
}

impl RevealStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -- Sections --

    /// Creates a section and returns its handle.
    pub fn create_section(&mut self, anchor: String, config: SectionConfig) -> SectionId {
        let idx = if let Some(idx) = self.section_free.pop() {
            let slot = idx as usize;
            self.section_generation[slot] += 1;
            self.section_anchor[slot] = anchor;
            self.section_config[slot] = config;
            self.section_elements[slot].clear();
            self.section_alive[slot] = true;
            idx
        } else {
            let idx = slot_index(self.section_alive.len());
            self.section_anchor.push(anchor);
            self.section_config.push(config);
            self.section_elements.push(Vec::new());
            self.section_generation.push(0);
            self.section_alive.push(true);
            idx
        };

        SectionId {
            idx,
            generation: self.section_generation[idx as usize],
        }
    }

    /// Destroys a section and every element registered with it.
    ///
    /// Returns `false` (and does nothing) for a stale handle.
    pub fn destroy_section(&mut self, id: SectionId) -> bool {
        if !self.is_section_alive(id) {
            return false;
        }
        let slot = id.idx as usize;
        let elements = core::mem::take(&mut self.section_elements[slot]);
        for element in &elements {
            self.destroy_element(*element);
        }
        self.section_generation[slot] += 1;
        self.section_alive[slot] = false;
        self.section_free.push(id.idx);
        true
    }

    /// Returns whether the handle refers to a live section.
    #[must_use]
    pub fn is_section_alive(&self, id: SectionId) -> bool {
        let slot = id.idx as usize;
        slot < self.section_alive.len()
            && self.section_alive[slot]
            && self.section_generation[slot] == id.generation
    }

    /// Returns the anchor name of a live section.
    #[must_use]
    pub fn anchor(&self, id: SectionId) -> Option<&str> {
        self.is_section_alive(id)
            .then(|| self.section_anchor[id.idx as usize].as_str())
    }

    /// Returns the configuration of a live section.
    #[must_use]
    pub fn config(&self, id: SectionId) -> Option<&SectionConfig> {
        self.is_section_alive(id)
            .then(|| &self.section_config[id.idx as usize])
    }

    /// Returns a live section's elements in document order.
    ///
    /// Stale handles yield an empty slice.
    #[must_use]
    pub fn elements(&self, id: SectionId) -> &[ElementId] {
        if self.is_section_alive(id) {
            &self.section_elements[id.idx as usize]
        } else {
            &[]
        }
    }

    /// Iterates over every live section.
    pub fn sections(&self) -> impl Iterator<Item = SectionId> + '_ {
        self.section_alive
            .iter()
            .enumerate()
            .filter(|&(_, alive)| *alive)
            .map(|(slot, _)| SectionId {
                idx: slot_index(slot),
                generation: self.section_generation[slot],
            })
    }

    // -- Elements --

    /// Registers an element as the next child of `section` in document
    /// order. Returns `None` if the section handle is stale.
    pub fn create_element(&mut self, section: SectionId, intent: Intent) -> Option<ElementId> {
        if !self.is_section_alive(section) {
            return None;
        }
        let order = slot_index(self.section_elements[section.idx as usize].len());

        let idx = if let Some(idx) = self.element_free.pop() {
            let slot = idx as usize;
            self.element_generation[slot] += 1;
            self.element_intent[slot] = intent;
            self.element_state[slot] = RevealState::Hidden;
            self.element_section[slot] = section;
            self.element_order[slot] = order;
            self.element_pending[slot] = false;
            self.element_alive[slot] = true;
            idx
        } else {
            let idx = slot_index(self.element_alive.len());
            self.element_intent.push(intent);
            self.element_state.push(RevealState::Hidden);
            self.element_section.push(section);
            self.element_order.push(order);
            self.element_pending.push(false);
            self.element_generation.push(0);
            self.element_alive.push(true);
            idx
        };

        let id = ElementId {
            idx,
            generation: self.element_generation[idx as usize],
        };
        self.section_elements[section.idx as usize].push(id);
        Some(id)
    }

    fn destroy_element(&mut self, id: ElementId) {
        if !self.is_element_alive(id) {
            return;
        }
        let slot = id.idx as usize;
        self.element_generation[slot] += 1;
        self.element_alive[slot] = false;
        self.element_pending[slot] = false;
        self.element_free.push(id.idx);
        self.pending_removed.push(id);
    }

    /// Returns whether the handle refers to a live element.
    #[must_use]
    pub fn is_element_alive(&self, id: ElementId) -> bool {
        let slot = id.idx as usize;
        slot < self.element_alive.len()
            && self.element_alive[slot]
            && self.element_generation[slot] == id.generation
    }

    /// Returns the reveal state of a live element.
    #[must_use]
    pub fn state(&self, id: ElementId) -> Option<RevealState> {
        self.is_element_alive(id)
            .then(|| self.element_state[id.idx as usize])
    }

    /// Returns the intent of a live element.
    #[must_use]
    pub fn intent(&self, id: ElementId) -> Option<Intent> {
        self.is_element_alive(id)
            .then(|| self.element_intent[id.idx as usize])
    }

    /// Returns the owning section of a live element.
    #[must_use]
    pub fn section_of(&self, id: ElementId) -> Option<SectionId> {
        self.is_element_alive(id)
            .then(|| self.element_section[id.idx as usize])
    }

    /// Returns the document-order index of a live element within its section.
    #[must_use]
    pub fn order(&self, id: ElementId) -> Option<u32> {
        self.is_element_alive(id)
            .then(|| self.element_order[id.idx as usize])
    }

    /// Returns whether a reveal task is queued for a live element.
    #[must_use]
    pub fn is_pending(&self, id: ElementId) -> bool {
        self.is_element_alive(id) && self.element_pending[id.idx as usize]
    }

    /// Records whether a reveal task is queued for the element. Ignored for
    /// stale handles.
    pub fn set_pending(&mut self, id: ElementId, pending: bool) {
        if self.is_element_alive(id) {
            self.element_pending[id.idx as usize] = pending;
        }
    }

    /// Flips a live, hidden element to revealed.
    ///
    /// Returns `true` only when the state actually changed. Revealed elements
    /// and stale handles are left untouched.
    pub fn reveal(&mut self, id: ElementId) -> bool {
        if !self.is_element_alive(id) {
            return false;
        }
        let state = &mut self.element_state[id.idx as usize];
        if state.is_revealed() {
            return false;
        }
        *state = RevealState::Revealed;
        self.pending_revealed.push(id);
        true
    }

    /// Takes every transition and removal recorded since the last drain.
    pub fn drain_changes(&mut self) -> RevealChanges {
        RevealChanges {
            revealed: core::mem::take(&mut self.pending_revealed),
            removed: core::mem::take(&mut self.pending_removed),
        }
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "a page never holds anywhere near u32::MAX sections or elements"
)]
fn slot_index(len: usize) -> u32 {
    len as u32
}
