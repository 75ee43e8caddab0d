// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web demo: a single-page portfolio whose sections fade in as you scroll.
//!
//! Builds a header and one `<section>` per navigation anchor, marks each
//! section's children with an intent class, and hands the page to
//! [`RevealPage`]. The header highlights the section under the probe line and
//! switches to its compact style once the page scrolls.
//!
//! Build with: `wasm-pack build --target web demos/web_portfolio`
//!
//! Then serve `demos/web_portfolio/` and open `index.html` in a browser.
//!
//! [`RevealPage`]: unveil_backend_web::RevealPage

// This crate only runs in the browser; suppress dead-code warnings when
// cargo-checking on a native host target.
#![no_std]
#![cfg_attr(
    not(target_arch = "wasm32"),
    allow(dead_code, reason = "this crate only runs in the browser")
)]

extern crate alloc;

use alloc::format;
use alloc::vec::Vec;

use wasm_bindgen::prelude::*;
use web_sys::{Document, Element};

use unveil_backend_web::{NavState, RevealPage};
use unveil_core::config::{NAV_ANCHORS, REVEAL_SECTIONS};
use unveil_core::section::Intent;
use unveil_core::spy::ScrollSpy;

/// Styling layer: hidden look per intent, revealed look under `.visible`.
const STYLE: &str = "
body { margin: 0; font-family: system-ui, sans-serif; background: #0f172a; color: #e2e8f0; }
header { position: fixed; inset: 0 0 auto 0; display: flex; gap: 1rem; padding: 1.5rem 2rem;
  transition: padding 0.3s, background 0.3s; z-index: 10; }
header.scrolled { padding: 0.75rem 2rem; background: rgba(15, 23, 42, 0.9); }
header a { color: #94a3b8; text-decoration: none; }
header a.active { color: #38bdf8; }
section { min-height: 90vh; padding: 6rem 2rem 2rem; box-sizing: border-box; }
.card { margin: 1rem 0; padding: 1.5rem; border-radius: 0.75rem; background: #1e293b; }
.fade-in-on-scroll { opacity: 0; transform: translateY(30px);
  transition: opacity 0.6s ease-out, transform 0.6s ease-out; }
.scale-in-on-scroll { opacity: 0; transform: scale(0.9);
  transition: opacity 0.6s ease-out, transform 0.6s ease-out; }
.slide-in-left-on-scroll { opacity: 0; transform: translateX(-50px);
  transition: opacity 0.6s ease-out, transform 0.6s ease-out; }
.slide-in-right-on-scroll { opacity: 0; transform: translateX(50px);
  transition: opacity 0.6s ease-out, transform 0.6s ease-out; }
.fade-in-on-scroll.visible, .scale-in-on-scroll.visible,
.slide-in-left-on-scroll.visible, .slide-in-right-on-scroll.visible {
  opacity: 1; transform: none; }
";

/// Number of cards per revealed section.
const CARDS: usize = 4;

/// Runs on module load via `wasm_bindgen(start)`.
#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("no body"))?;

    let style = document.create_element("style")?;
    style.set_text_content(Some(STYLE));
    if let Some(head) = document.head() {
        head.append_child(&style)?;
    }

    let (header, links) = build_header(&document)?;
    body.append_child(&header)?;
    for anchor in NAV_ANCHORS {
        let section = build_section(&document, anchor)?;
        body.append_child(&section)?;
    }

    let page = RevealPage::new()?;
    #[cfg(feature = "trace")]
    page.set_trace_sink(unveil_backend_web::ConsoleSink::new(unveil_backend_web::timebase()));
    page.set_scroll_spy(ScrollSpy::new(NAV_ANCHORS));
    page.on_nav(move |nav| update_header(&header, &links, nav));

    let mut mounts = Vec::new();
    for (anchor, config) in REVEAL_SECTIONS {
        mounts.push(page.mount_marked(anchor, config)?);
    }
    page.start()?;

    // The page lives as long as the document.
    core::mem::forget(mounts);
    core::mem::forget(page);
    Ok(())
}

fn build_header(doc: &Document) -> Result<(Element, Vec<(&'static str, Element)>), JsValue> {
    let header = doc.create_element("header")?;
    let mut links = Vec::new();
    for anchor in NAV_ANCHORS {
        let link = doc.create_element("a")?;
        link.set_attribute("href", &format!("#{anchor}"))?;
        link.set_text_content(Some(anchor));
        header.append_child(&link)?;
        links.push((anchor, link));
    }
    Ok((header, links))
}

/// Intent of the `i`-th card in a section.
fn card_intent(anchor: &str, i: usize) -> Intent {
    match anchor {
        "education" | "experience" if i % 2 == 0 => Intent::SlideLeft,
        "education" | "experience" => Intent::SlideRight,
        "skills" | "achievements" | "portfolio" => Intent::Scale,
        _ => Intent::Fade,
    }
}

fn build_section(doc: &Document, anchor: &str) -> Result<Element, JsValue> {
    let section = doc.create_element("section")?;
    section.set_id(anchor);

    let heading = doc.create_element("h2")?;
    heading.set_text_content(Some(anchor));
    section.append_child(&heading)?;

    // The hero is on screen from the start and never animates.
    if anchor == NAV_ANCHORS[0] {
        return Ok(section);
    }
    heading.class_list().add_1(Intent::Fade.class_name())?;

    for i in 0..CARDS {
        let card = doc.create_element("div")?;
        card.class_list()
            .add_2("card", card_intent(anchor, i).class_name())?;
        card.set_text_content(Some(&format!("{anchor} item {}", i + 1)));
        section.append_child(&card)?;
    }
    Ok(section)
}

fn update_header(header: &Element, links: &[(&'static str, Element)], nav: &NavState) {
    let _ = header.class_list().toggle_with_force("scrolled", nav.scrolled);
    for (anchor, link) in links {
        let active = nav.active.as_deref() == Some(*anchor);
        let _ = link.class_list().toggle_with_force("active", active);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unveil_core::section::REVEALED_CLASS;

    #[test]
    fn timeline_sections_alternate_sides() {
        assert_eq!(card_intent("experience", 0), Intent::SlideLeft);
        assert_eq!(card_intent("experience", 1), Intent::SlideRight);
        assert_eq!(card_intent("skills", 3), Intent::Scale);
        assert_eq!(card_intent("contact", 0), Intent::Fade);
    }

    #[test]
    fn styles_cover_every_intent() {
        for intent in Intent::ALL {
            assert!(
                STYLE.contains(&format!(".{}.{REVEALED_CLASS}", intent.class_name())),
                "missing revealed rule for {intent:?}"
            );
        }
    }
}
