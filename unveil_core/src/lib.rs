// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll-triggered, staggered reveal scheduling for page sections.
//!
//! `unveil_core` owns the decision logic behind "fade in as you scroll"
//! page sections. It is `no_std` compatible (with `alloc`) and never touches
//! a DOM: sections and their animatable children are registered explicitly,
//! geometry is passed in as [`kurbo::Rect`] values, and reveal results are
//! drained as plain data for a presenter to apply.
//!
//! # Architecture
//!
//! ```text
//!   Backend (scroll / resize / timer callbacks)
//!       │
//!       ▼
//!   RevealEngine::scroll() ──► ViewportObserver ──► VisibilityEvent
//!                                                        │
//!                 ┌──────────────────────────────────────┘
//!                 ▼
//!   Stagger::plan() ──► TaskQueue (one deferred reveal per element)
//!                                │
//!                 ┌──────────────┘
//!                 ▼
//!   RevealEngine::advance() ──► RevealChanges ──► RevealPresenter::apply()
//! ```
//!
//! **[`section`]**: Generational handles, intents and the one-shot
//! [`RevealState`](section::RevealState).
//!
//! **[`store`]**: Struct-of-arrays storage for sections and elements.
//!
//! **[`observer`]**: Threshold-based viewport observer.
//!
//! **[`stagger`]**: Per-index delay planning.
//!
//! **[`queue`]**: Single-threaded deferred task queue keyed by host time.
//!
//! **[`engine`]**: [`RevealEngine`](engine::RevealEngine), the entry point
//! backends and tests drive.
//!
//! **[`spy`]**: Active-section tracking for page navigation.
//!
//! **[`config`]**: Per-section configuration and page presets.
//!
//! **[`backend`]**: The [`RevealPresenter`](backend::RevealPresenter) trait.
//!
//! **[`clock`]**: A manually advanced clock for tests and simulations.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types with
//! a zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod backend;
pub mod clock;
pub mod config;
pub mod engine;
pub mod observer;
pub mod queue;
pub mod section;
pub mod spy;
pub mod stagger;
pub mod store;
pub mod time;
pub mod trace;
