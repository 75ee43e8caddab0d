// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads events recorded by a
//! [`RecorderSink`](super::recorder::RecorderSink) and writes
//! [Chrome Trace Event Format][format] JSON to the given writer. Each section
//! gets its own track (`tid` = section index); stagger waits show up as
//! duration slices ending at the reveal's due time.
//!
//! [format]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::collections::BTreeSet;
use std::io::{self, Write};

use serde_json::{Value, json};

use unveil_core::time::{HostTime, Timebase};

use crate::recorder::RecordedEvent;

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
///
/// Timestamps are converted to microseconds using the provided [`Timebase`].
/// Events without a timestamp of their own are placed at the time of the
/// previous event.
pub fn export(
    recorded: &[RecordedEvent],
    timebase: Timebase,
    writer: &mut dyn Write,
) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();
    let mut tracks = BTreeSet::new();
    let mut last_ts = 0.0;

    for event in recorded {
        let ts = event.time().map_or(last_ts, |t| host_us(t, timebase));
        last_ts = ts;

        match *event {
            RecordedEvent::Visibility(e) => {
                tracks.insert(e.section.index());
                events.push(json!({
                    "ph": "i",
                    "name": if e.is_intersecting { "Enter" } else { "Exit" },
                    "cat": "Observer",
                    "ts": ts,
                    "pid": 0,
                    "tid": e.section.index(),
                    "s": "t",
                    "args": {
                        "section": format!("{:?}", e.section),
                        "ratio": e.ratio,
                    }
                }));
            }
            RecordedEvent::RegistrationSkipped(e) => {
                tracks.insert(e.section.index());
                events.push(json!({
                    "ph": "i",
                    "name": "RegistrationSkipped",
                    "cat": "Observer",
                    "ts": ts,
                    "pid": 0,
                    "tid": e.section.index(),
                    "s": "t",
                    "args": {
                        "section": format!("{:?}", e.section),
                    }
                }));
            }
            RecordedEvent::Stagger(e) => {
                tracks.insert(e.section.index());
                events.push(json!({
                    "ph": "X",
                    "name": format!("Stagger #{}", e.index),
                    "cat": "Stagger",
                    "ts": ts,
                    "dur": host_us(e.due, timebase) - ts,
                    "pid": 0,
                    "tid": e.section.index(),
                    "args": {
                        "element": format!("{:?}", e.element),
                        "index": e.index,
                    }
                }));
            }
            RecordedEvent::Reveal(e) => {
                tracks.insert(e.section.index());
                events.push(json!({
                    "ph": "i",
                    "name": "Reveal",
                    "cat": "Reveal",
                    "ts": ts,
                    "pid": 0,
                    "tid": e.section.index(),
                    "s": "t",
                    "args": {
                        "element": format!("{:?}", e.element),
                        "late_us": ts - host_us(e.due, timebase),
                    }
                }));
            }
            RecordedEvent::StaleTimer(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "StaleTimer",
                    "cat": "Reveal",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "p",
                    "args": {
                        "element": format!("{:?}", e.element),
                    }
                }));
            }
            RecordedEvent::Unmount(e) => {
                tracks.insert(e.section.index());
                events.push(json!({
                    "ph": "i",
                    "name": "Unmount",
                    "cat": "Lifecycle",
                    "ts": ts,
                    "pid": 0,
                    "tid": e.section.index(),
                    "s": "t",
                    "args": {
                        "section": format!("{:?}", e.section),
                        "elements": e.elements,
                        "was_observed": e.was_observed,
                    }
                }));
            }
        }
    }

    for tid in tracks {
        events.push(json!({
            "ph": "M",
            "name": "thread_name",
            "pid": 0,
            "tid": tid,
            "args": { "name": format!("section {tid}") }
        }));
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn host_us(t: HostTime, timebase: Timebase) -> f64 {
    t.to_nanos(timebase) as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use kurbo::Rect;
    use unveil_core::config::SectionConfig;
    use unveil_core::engine::RevealEngine;
    use unveil_core::section::Intent;
    use unveil_core::trace::Tracer;

    fn session() -> RecorderSink {
        let mut rec = RecorderSink::new();
        let mut engine = RevealEngine::new(Timebase::MICROS);
        {
            let mut t = Tracer::new(&mut rec);
            let about = engine.mount_section("about", SectionConfig::about());
            for _ in 0..3 {
                engine.register_element(about, Intent::Fade);
            }
            engine.attach_root(about, Some(Rect::new(0.0, 0.0, 800.0, 400.0)), &mut t);
            engine.scroll(Rect::new(0.0, 0.0, 800.0, 600.0), HostTime(1_000), &mut t);
            engine.advance(HostTime(1_000), &mut t);
            engine.unmount_section(about, &mut t);
            engine.advance(HostTime(500_000), &mut t);
        }
        rec
    }

    #[test]
    fn export_produces_valid_json() {
        let rec = session();
        let mut buf = Vec::new();
        export(rec.events(), Timebase::MICROS, &mut buf).unwrap();

        let parsed: Value = serde_json::from_slice(&buf).unwrap();
        let arr = parsed.as_array().expect("top-level array");
        // enter + 3 stagger + 1 reveal + unmount + 2 stale + 1 track name
        assert_eq!(arr.len(), 9, "got: {parsed:#}");

        let second = arr
            .iter()
            .find(|e| e["name"] == "Stagger #1")
            .expect("second stagger slice");
        assert_eq!(second["ph"], "X");
        assert_eq!(second["ts"], 1_000.0);
        assert_eq!(second["dur"], 100_000.0, "100ms wait for index 1");
    }

    #[test]
    fn untimed_events_reuse_previous_timestamp() {
        let rec = session();
        let mut buf = Vec::new();
        export(rec.events(), Timebase::MICROS, &mut buf).unwrap();
        let parsed: Value = serde_json::from_slice(&buf).unwrap();
        let unmount = parsed
            .as_array()
            .unwrap()
            .iter()
            .find(|e| e["name"] == "Unmount")
            .expect("unmount event");
        assert_eq!(unmount["ts"], 1_000.0);
        assert_eq!(unmount["args"]["elements"], 3);
    }

    #[test]
    fn empty_recording_is_empty_array() {
        let mut buf = Vec::new();
        export(&[], Timebase::NANOS, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "[]");
    }
}
