// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM class-list presentation.
//!
//! Translates drained [`RevealChanges`] into `classList` updates on the
//! registered DOM elements.
//!
//! [`RevealChanges`]: unveil_core::store::RevealChanges

use alloc::vec::Vec;

use unveil_core::backend::RevealPresenter;
use unveil_core::engine::RevealEngine;
use unveil_core::section::{ElementId, REVEALED_CLASS};
use unveil_core::store::RevealChanges;
use web_sys::Element;

/// Maps [`ElementId`]s to live DOM elements and adds the revealed marker
/// class when the engine reports a reveal.
///
/// Elements that have been detached from the document by the time their
/// reveal fires are skipped.
#[derive(Default)]
pub struct ClassListPresenter {
    elements: Vec<Option<(u32, Element)>>,
}

impl core::fmt::Debug for ClassListPresenter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ClassListPresenter")
            .field("elements_len", &self.elements.iter().flatten().count())
            .finish()
    }
}

impl ClassListPresenter {
    /// Creates an empty presenter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Associates a DOM element with an engine handle.
    pub fn insert(&mut self, id: ElementId, el: Element) {
        let slot = id.index() as usize;
        if self.elements.len() <= slot {
            self.elements.resize_with(slot + 1, || None);
        }
        self.elements[slot] = Some((id.generation(), el));
    }

    /// Returns the DOM element for a handle, if still mapped.
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        match self.elements.get(id.index() as usize)? {
            Some((generation, el)) if *generation == id.generation() => Some(el),
            _ => None,
        }
    }

    /// Forgets the DOM element for a handle.
    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        let slot = self.elements.get_mut(id.index() as usize)?;
        match slot {
            Some((generation, _)) if *generation == id.generation() => {
                slot.take().map(|(_, el)| el)
            }
            _ => None,
        }
    }
}

impl RevealPresenter for ClassListPresenter {
    fn apply(&mut self, _engine: &RevealEngine, changes: &RevealChanges) {
        for &id in &changes.removed {
            self.remove(id);
        }
        for &id in &changes.revealed {
            if let Some(el) = self.get(id)
                && el.is_connected()
            {
                let _ = el.class_list().add_1(REVEALED_CLASS);
            }
        }
    }
}
