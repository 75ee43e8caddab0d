// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `setTimeout` wake-up source.
//!
//! [`TimeoutTimer`] owns one JS closure and keeps at most one timeout
//! outstanding. Re-arming replaces the previous timeout, so a page only ever
//! waits for the earliest queued reveal.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::{Cell, RefCell};

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

use unveil_core::time::{HostTime, Timebase};

// Direct global bindings instead of `web_sys::Window` methods, so arming a
// timer does not need to fetch (and unwrap) the Window object.
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = performance, js_name = "now")]
    pub(crate) fn performance_now() -> f64;

    #[wasm_bindgen(js_name = "setTimeout")]
    fn set_timeout(callback: &JsValue, millis: i32) -> i32;

    #[wasm_bindgen(js_name = "clearTimeout")]
    fn clear_timeout(id: i32);
}

/// Delay to pass to `setTimeout` so the callback runs no earlier than `due`.
///
/// Rounds up to whole milliseconds and clamps to the `i32` range browsers
/// accept. A `due` in the past yields zero.
#[must_use]
pub fn timeout_millis(due: HostTime, now: HostTime, timebase: Timebase) -> i32 {
    let ms = due.saturating_duration_since(now).to_millis_ceil(timebase);
    i32::try_from(ms).unwrap_or(i32::MAX)
}

/// A re-armable one-shot timer backed by `setTimeout`.
///
/// Create with [`TimeoutTimer::new`], then call [`arm`](Self::arm) whenever
/// the next deadline changes. The callback receives the host time at which
/// it fired.
pub struct TimeoutTimer {
    inner: Rc<TimerInner>,
}

type TimerClosure = Closure<dyn FnMut()>;

struct TimerInner {
    /// The JS closure handed to `setTimeout`. Created once and reused.
    closure: RefCell<Option<TimerClosure>>,

    /// The user-supplied callback.
    callback: RefCell<Box<dyn FnMut(HostTime)>>,

    /// The ID of the outstanding timeout, if any.
    timeout_id: Cell<Option<i32>>,

    /// The deadline the outstanding timeout was armed for.
    due: Cell<Option<HostTime>>,
}

impl TimeoutTimer {
    /// Creates a timer that is **not yet armed**.
    pub fn new(callback: impl FnMut(HostTime) + 'static) -> Self {
        let inner = Rc::new(TimerInner {
            closure: RefCell::new(None),
            callback: RefCell::new(Box::new(callback)),
            timeout_id: Cell::new(None),
            due: Cell::new(None),
        });

        let weak = Rc::downgrade(&inner);
        let closure = Closure::wrap(Box::new(move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            inner.timeout_id.set(None);
            inner.due.set(None);
            let now = crate::now();
            // The callback may re-arm; `arm` only touches `closure` and the
            // cells, never `callback`.
            inner.callback.borrow_mut()(now);
        }) as Box<dyn FnMut()>);
        *inner.closure.borrow_mut() = Some(closure);

        Self { inner }
    }

    /// Arms the timer to fire at `due`, replacing any outstanding timeout.
    ///
    /// Re-arming for the deadline already pending is a no-op.
    pub fn arm(&self, due: HostTime, now: HostTime, timebase: Timebase) {
        if self.inner.due.get() == Some(due) && self.inner.timeout_id.get().is_some() {
            return;
        }
        self.cancel();
        if let Some(ref closure) = *self.inner.closure.borrow() {
            let id = set_timeout(
                closure.as_ref().unchecked_ref(),
                timeout_millis(due, now, timebase),
            );
            self.inner.timeout_id.set(Some(id));
            self.inner.due.set(Some(due));
        }
    }

    /// Cancels the outstanding timeout, if any.
    pub fn cancel(&self) {
        if let Some(id) = self.inner.timeout_id.take() {
            clear_timeout(id);
        }
        self.inner.due.set(None);
    }

    /// Returns `true` if a timeout is outstanding.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.inner.timeout_id.get().is_some()
    }
}

impl Drop for TimeoutTimer {
    fn drop(&mut self) {
        self.cancel();
        // Drop the JS closure so it doesn't leak.
        self.inner.closure.borrow_mut().take();
    }
}

impl core::fmt::Debug for TimeoutTimer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TimeoutTimer")
            .field("armed", &self.is_armed())
            .field("due", &self.inner.due.get())
            .finish()
    }
}
