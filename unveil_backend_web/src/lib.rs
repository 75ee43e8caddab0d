// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web backend for unveil.
//!
//! This crate provides integration with browser APIs:
//!
//! - [`RevealPage`]: scroll/resize listeners and section mounting
//! - [`TimeoutTimer`]: `setTimeout` wake-ups for queued reveals
//! - [`ClassListPresenter`]: marker-class updates on DOM elements
//! - [`ConsoleSink`]: trace events to the browser console

#![no_std]

extern crate alloc;

mod console;
mod page;
mod presenter;
mod timer;

pub use console::ConsoleSink;
pub use page::{NavState, RevealPage, SectionMount};
pub use presenter::ClassListPresenter;
pub use timer::{TimeoutTimer, timeout_millis};
pub use unveil_core::backend::RevealPresenter;

use unveil_core::time::{HostTime, Timebase};

/// Returns the current host time from `performance.now()`.
///
/// The returned [`HostTime`] is in microsecond ticks. Use [`timebase`] to
/// convert to nanoseconds.
#[must_use]
pub fn now() -> HostTime {
    let ms = timer::performance_now();
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "performance.now() returns small positive f64; µs fits in u64"
    )]
    let us = (ms * 1000.0) as u64;
    HostTime(us)
}

/// Returns the web [`Timebase`]: 1 tick = 1 µs = 1000 ns.
#[must_use]
pub fn timebase() -> Timebase {
    Timebase::MICROS
}
