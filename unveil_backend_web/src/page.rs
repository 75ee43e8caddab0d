// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Page-level wiring of the reveal engine to the browser.
//!
//! [`RevealPage`] owns a [`RevealEngine`], a [`ClassListPresenter`] and a
//! [`TimeoutTimer`]. Window `scroll` and `resize` events (and the timer)
//! re-measure every observed section root with `getBoundingClientRect()`,
//! run the engine, and push the resulting class changes into the DOM.

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;

use kurbo::Rect;
use unveil_core::backend::RevealPresenter as _;
use unveil_core::config::SectionConfig;
use unveil_core::engine::RevealEngine;
use unveil_core::section::{ElementId, Intent, SectionId};
use unveil_core::spy::ScrollSpy;
use unveil_core::trace::{TraceSink, Tracer};
use wasm_bindgen::JsCast as _;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_sys::{Element, Window};

use crate::presenter::ClassListPresenter;
use crate::timer::TimeoutTimer;

/// Window events that can move section roots relative to the viewport.
const GEOMETRY_EVENTS: [&str; 2] = ["scroll", "resize"];

/// Header navigation state derived from the scroll position.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NavState {
    /// Anchor of the section under the probe line.
    pub active: Option<String>,
    /// Whether the page has scrolled past the compact-header offset.
    pub scrolled: bool,
}

/// Scroll-triggered reveals for one document.
///
/// ```rust,ignore
/// let page = RevealPage::new()?;
/// for (anchor, config) in REVEAL_SECTIONS {
///     mounts.push(page.mount_marked(anchor, config)?);
/// }
/// page.start()?;
/// ```
pub struct RevealPage {
    inner: Rc<PageInner>,
}

type Listener = Closure<dyn FnMut()>;
type NavCallback = Box<dyn FnMut(&NavState)>;

struct PageInner {
    window: Window,
    state: RefCell<PageState>,
    timer: RefCell<Option<TimeoutTimer>>,
    listener: RefCell<Option<Listener>>,
    on_nav: RefCell<Option<NavCallback>>,
    deferred: DeferredUnmounts,
}

struct PageState {
    engine: RevealEngine,
    presenter: ClassListPresenter,
    /// Observed section roots, re-measured on every pump.
    roots: Vec<(SectionId, Element)>,
    spy: Option<ScrollSpy>,
    nav: NavState,
    sink: Option<Box<dyn TraceSink>>,
}

impl PageState {
    fn teardown(&mut self, section: SectionId) {
        self.engine.unmount_section(section, &mut tracer(&mut self.sink));
        self.roots.retain(|(s, _)| *s != section);
        let changes = self.engine.drain_changes();
        self.presenter.apply(&self.engine, &changes);
    }
}

/// Sections whose mount guard was dropped while the page state was borrowed,
/// e.g. from inside a trace sink.
#[derive(Debug, Default)]
struct DeferredUnmounts(RefCell<Vec<SectionId>>);

impl DeferredUnmounts {
    fn defer(&self, section: SectionId) {
        self.0.borrow_mut().push(section);
    }

    /// Tears down every deferred section, including ones deferred by
    /// `teardown` itself.
    fn flush(&self, mut teardown: impl FnMut(SectionId)) {
        loop {
            let queued = self.0.take();
            if queued.is_empty() {
                return;
            }
            for section in queued {
                teardown(section);
            }
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.0.borrow().len()
    }
}

/// Unmounts `section` now, or defers it to the next pump if the state is
/// already borrowed.
fn release(state: &RefCell<PageState>, deferred: &DeferredUnmounts, section: SectionId) {
    match state.try_borrow_mut() {
        Ok(mut state) => {
            state.teardown(section);
            deferred.flush(|s| state.teardown(s));
        }
        Err(_) => deferred.defer(section),
    }
}

fn tracer(sink: &mut Option<Box<dyn TraceSink>>) -> Tracer<'_> {
    match sink.as_deref_mut() {
        Some(sink) => Tracer::new(sink),
        None => Tracer::none(),
    }
}

/// Keeps a mounted section alive. Dropping it unmounts the section.
#[derive(Debug)]
pub struct SectionMount {
    page: Weak<PageInner>,
    section: SectionId,
}

impl SectionMount {
    /// Engine handle of the section.
    #[must_use]
    pub fn id(&self) -> SectionId {
        self.section
    }
}

impl Drop for SectionMount {
    fn drop(&mut self) {
        if let Some(inner) = self.page.upgrade() {
            inner.unmount(self.section);
        }
    }
}

impl RevealPage {
    /// Creates a page bound to the global window. Nothing is observed until
    /// sections are mounted and [`start`](Self::start) is called.
    pub fn new() -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
        let inner = Rc::new(PageInner {
            window,
            state: RefCell::new(PageState {
                engine: RevealEngine::new(crate::timebase()),
                presenter: ClassListPresenter::new(),
                roots: Vec::new(),
                spy: None,
                nav: NavState::default(),
                sink: None,
            }),
            timer: RefCell::new(None),
            listener: RefCell::new(None),
            on_nav: RefCell::new(None),
            deferred: DeferredUnmounts::default(),
        });

        let weak = Rc::downgrade(&inner);
        let timer = TimeoutTimer::new(move |_| {
            if let Some(inner) = weak.upgrade() {
                inner.pump_or_log();
            }
        });
        *inner.timer.borrow_mut() = Some(timer);

        Ok(Self { inner })
    }

    /// Routes engine trace events to `sink`.
    pub fn set_trace_sink(&self, sink: impl TraceSink + 'static) {
        self.inner.state.borrow_mut().sink = Some(Box::new(sink));
    }

    /// Enables active-section tracking for the header.
    pub fn set_scroll_spy(&self, spy: ScrollSpy) {
        self.inner.state.borrow_mut().spy = Some(spy);
    }

    /// Calls `f` whenever the [`NavState`] changes.
    ///
    /// `f` must not call `on_nav` itself.
    pub fn on_nav(&self, f: impl FnMut(&NavState) + 'static) {
        *self.inner.on_nav.borrow_mut() = Some(Box::new(f));
    }

    /// Current navigation state.
    #[must_use]
    pub fn nav(&self) -> NavState {
        self.inner.state.borrow().nav.clone()
    }

    /// Mounts a section and starts observing `root` if it is present.
    ///
    /// An absent root leaves the section unobserved; see
    /// [`attach_root`](Self::attach_root).
    pub fn mount_section(
        &self,
        anchor: &str,
        root: Option<Element>,
        config: SectionConfig,
    ) -> SectionMount {
        let section = {
            let mut state = self.inner.state.borrow_mut();
            state.engine.mount_section(anchor, config)
        };
        if let Some(root) = root {
            self.inner.attach(section, root);
        } else {
            let mut guard = self.inner.state.borrow_mut();
            let state = &mut *guard;
            state
                .engine
                .attach_root(section, None, &mut tracer(&mut state.sink));
        }
        SectionMount {
            page: Rc::downgrade(&self.inner),
            section,
        }
    }

    /// Starts observing `root` for a section mounted without one.
    pub fn attach_root(&self, mount: &SectionMount, root: Element) -> bool {
        self.inner.attach(mount.section, root)
    }

    /// Registers `element` as the next animatable child of the section and
    /// gives it the class for `intent`.
    ///
    /// Returns `Ok(None)` if the section has been unmounted.
    pub fn register(
        &self,
        mount: &SectionMount,
        element: Element,
        intent: Intent,
    ) -> Result<Option<ElementId>, JsValue> {
        let mut guard = self.inner.state.borrow_mut();
        let state = &mut *guard;
        let Some(id) = state.engine.register_element(mount.section, intent) else {
            return Ok(None);
        };
        element.class_list().add_1(intent.class_name())?;
        state.presenter.insert(id, element);
        Ok(Some(id))
    }

    /// Registers every descendant of `root` carrying one of the intent
    /// classes, in document order. Returns how many were registered.
    pub fn register_marked(&self, mount: &SectionMount, root: &Element) -> Result<usize, JsValue> {
        let nodes = root.query_selector_all(&marked_selector())?;
        let mut registered = 0;
        for i in 0..nodes.length() {
            let Some(element) = nodes.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            let classes = element.class_list();
            let Some(intent) = (0..classes.length())
                .filter_map(|i| classes.item(i))
                .find_map(|class| Intent::from_class_name(&class))
            else {
                continue;
            };
            if self.register(mount, element, intent)?.is_some() {
                registered += 1;
            }
        }
        Ok(registered)
    }

    /// Looks up the section root by id, mounts it and registers its marked
    /// descendants.
    pub fn mount_marked(
        &self,
        anchor: &str,
        config: SectionConfig,
    ) -> Result<SectionMount, JsValue> {
        let root = self
            .inner
            .window
            .document()
            .and_then(|doc| doc.get_element_by_id(anchor));
        let mount = self.mount_section(anchor, root.clone(), config);
        if let Some(root) = root {
            self.register_marked(&mount, &root)?;
        }
        Ok(mount)
    }

    /// Installs the window listeners and runs one pass so sections already
    /// on screen reveal without waiting for a scroll.
    ///
    /// Calling it again only re-runs the pass.
    pub fn start(&self) -> Result<(), JsValue> {
        if self.inner.listener.borrow().is_none() {
            let weak = Rc::downgrade(&self.inner);
            let listener = Closure::wrap(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.pump_or_log();
                }
            }) as Box<dyn FnMut()>);
            for event in GEOMETRY_EVENTS {
                self.inner
                    .window
                    .add_event_listener_with_callback(event, listener.as_ref().unchecked_ref())?;
            }
            *self.inner.listener.borrow_mut() = Some(listener);
        }
        self.refresh()
    }

    /// Re-measures every section and applies due reveals now.
    pub fn refresh(&self) -> Result<(), JsValue> {
        self.inner.pump()
    }

    /// Whether an element has been revealed.
    #[must_use]
    pub fn is_revealed(&self, id: ElementId) -> bool {
        self.inner.state.borrow().engine.is_revealed(id)
    }
}

impl Drop for RevealPage {
    fn drop(&mut self) {
        if let Some(listener) = self.inner.listener.borrow_mut().take() {
            for event in GEOMETRY_EVENTS {
                let _ = self
                    .inner
                    .window
                    .remove_event_listener_with_callback(event, listener.as_ref().unchecked_ref());
            }
        }
        self.inner.timer.borrow_mut().take();
    }
}

impl core::fmt::Debug for RevealPage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("RevealPage")
            .field("sections", &state.roots.len())
            .field("pending_reveals", &state.engine.pending_reveals())
            .field("nav", &state.nav)
            .finish_non_exhaustive()
    }
}

impl PageInner {
    fn attach(&self, section: SectionId, root: Element) -> bool {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        let rect = client_rect(&root);
        let attached =
            state
                .engine
                .attach_root(section, Some(rect), &mut tracer(&mut state.sink));
        if attached {
            state.roots.retain(|(s, _)| *s != section);
            state.roots.push((section, root));
        }
        attached
    }

    fn unmount(&self, section: SectionId) {
        release(&self.state, &self.deferred, section);
    }

    fn pump_or_log(&self) {
        if let Err(err) = self.pump() {
            web_sys::console::error_1(&err);
        }
    }

    /// One pass: measure, observe, fire due reveals, present, re-arm.
    fn pump(&self) -> Result<(), JsValue> {
        let viewport = viewport_rect(&self.window)?;
        let scroll_y = self.window.scroll_y()?;
        let now = crate::now();

        let (next_due, nav) = {
            let mut guard = self.state.borrow_mut();
            self.deferred.flush(|s| guard.teardown(s));
            let state = &mut *guard;
            let mut tracer = tracer(&mut state.sink);

            for (section, root) in &state.roots {
                state.engine.set_root(*section, client_rect(root));
            }
            state.engine.scroll(viewport, now, &mut tracer);
            state.engine.advance(now, &mut tracer);
            let changes = state.engine.drain_changes();
            state.presenter.apply(&state.engine, &changes);

            let nav = state.spy.as_mut().and_then(|spy| {
                let document = self.window.document();
                spy.update(|anchor| {
                    let el = document.as_ref()?.get_element_by_id(anchor)?;
                    Some(client_rect(&el))
                });
                let next = NavState {
                    active: spy.active().map(String::from),
                    scrolled: spy.is_scrolled(scroll_y),
                };
                (next != state.nav).then(|| {
                    state.nav = next.clone();
                    next
                })
            });
            self.deferred.flush(|s| state.teardown(s));
            (state.engine.next_due(), nav)
        };

        if let Some(timer) = self.timer.borrow().as_ref() {
            match next_due {
                Some(due) => timer.arm(due, now, crate::timebase()),
                None => timer.cancel(),
            }
        }

        if let Some(nav) = nav
            && let Some(callback) = self.on_nav.borrow_mut().as_mut()
        {
            callback(&nav);
        }
        Ok(())
    }
}

/// `.fade-in-on-scroll, .scale-in-on-scroll, ...`
fn marked_selector() -> String {
    let mut selector = String::new();
    for (i, intent) in Intent::ALL.into_iter().enumerate() {
        if i > 0 {
            selector.push_str(", ");
        }
        selector.push('.');
        selector.push_str(intent.class_name());
    }
    selector
}

/// Viewport-relative border box of an element.
fn client_rect(el: &Element) -> Rect {
    let r = el.get_bounding_client_rect();
    Rect::new(r.left(), r.top(), r.right(), r.bottom())
}

/// The layout viewport in the same coordinate space as [`client_rect`].
fn viewport_rect(window: &Window) -> Result<Rect, JsValue> {
    let width = window.inner_width()?.as_f64().unwrap_or(0.0);
    let height = window.inner_height()?.as_f64().unwrap_or(0.0);
    Ok(Rect::new(0.0, 0.0, width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use unveil_core::time::Timebase;

    fn page_state() -> PageState {
        PageState {
            engine: RevealEngine::new(Timebase::MICROS),
            presenter: ClassListPresenter::new(),
            roots: Vec::new(),
            spy: None,
            nav: NavState::default(),
            sink: None,
        }
    }

    fn observed_section(state: &RefCell<PageState>) -> SectionId {
        let mut guard = state.borrow_mut();
        let engine = &mut guard.engine;
        let section = engine.mount_section("about", SectionConfig::about());
        engine.register_element(section, Intent::Fade);
        engine.attach_root(
            section,
            Some(Rect::new(0.0, 0.0, 800.0, 400.0)),
            &mut Tracer::none(),
        );
        section
    }

    #[test]
    fn release_tears_down_immediately_when_idle() {
        let state = RefCell::new(page_state());
        let deferred = DeferredUnmounts::default();
        let section = observed_section(&state);

        release(&state, &deferred, section);

        let state = state.borrow();
        assert!(!state.engine.is_mounted(section));
        assert!(!state.engine.observer().is_observing(section));
        assert_eq!(deferred.len(), 0);
    }

    #[test]
    fn release_while_borrowed_is_deferred_until_flush() {
        let state = RefCell::new(page_state());
        let deferred = DeferredUnmounts::default();
        let section = observed_section(&state);

        {
            let _busy = state.borrow_mut();
            release(&state, &deferred, section);
        }
        assert_eq!(deferred.len(), 1);
        assert!(state.borrow().engine.observer().is_observing(section));

        let mut guard = state.borrow_mut();
        deferred.flush(|s| guard.teardown(s));
        assert!(!guard.engine.is_mounted(section));
        assert!(!guard.engine.observer().is_observing(section));
        assert_eq!(deferred.len(), 0);
    }

    #[test]
    fn selector_lists_every_intent_class() {
        let selector = marked_selector();
        assert_eq!(
            selector,
            ".fade-in-on-scroll, .scale-in-on-scroll, \
             .slide-in-left-on-scroll, .slide-in-right-on-scroll"
        );
    }
}
