// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend contract for platform integrations.
//!
//! A backend supplies the pieces the core deliberately leaves out:
//!
//! - **Time**: `now() -> HostTime` and `timebase() -> Timebase` free
//!   functions reading the platform's monotonic clock.
//!
//! - **Geometry**: section root rectangles and the viewport rectangle, in
//!   the same coordinate space, fed to
//!   [`RevealEngine::set_root`](crate::engine::RevealEngine::set_root) and
//!   [`RevealEngine::scroll`](crate::engine::RevealEngine::scroll) on scroll
//!   and resize.
//!
//! - **Wake-ups**: one platform timer armed for
//!   [`RevealEngine::next_due`](crate::engine::RevealEngine::next_due), which
//!   calls [`RevealEngine::advance`](crate::engine::RevealEngine::advance)
//!   when it fires.
//!
//! - **Presenter**: Implements [`RevealPresenter`] to reflect drained
//!   [`RevealChanges`] in the native tree (e.g. a marker class on DOM
//!   elements).
//!
//! # Crate boundaries
//!
//! `unveil_core` owns the data model, observation, scheduling, and this
//! contract module. Backend crates depend on `unveil_core` and provide
//! platform glue.

use crate::engine::RevealEngine;
use crate::store::RevealChanges;

/// Applies drained reveal changes to a platform-native presentation tree.
///
/// # Event loop pseudocode
///
/// ```rust,ignore
/// fn on_scroll_or_timer() {
///     let now = now();
///     for (section, el) in &roots {
///         engine.set_root(*section, bounding_rect(el));
///     }
///     engine.scroll(viewport_rect(), now, &mut tracer);
///     engine.advance(now, &mut tracer);
///
///     let changes = engine.drain_changes();
///     presenter.apply(&engine, &changes);
///
///     if let Some(due) = engine.next_due() {
///         arm_timer(due - now);
///     }
/// }
/// ```
pub trait RevealPresenter {
    /// Applies the given [`RevealChanges`], reading element details from
    /// `engine` as needed.
    fn apply(&mut self, engine: &RevealEngine, changes: &RevealChanges);
}
