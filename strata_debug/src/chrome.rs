// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][spec] JSON to the given writer.
//!
//! The engine has no clock, so each event's timestamp is its position in the
//! recording. Paints are drawn as one-unit slices on a track per target
//! buffer; everything else is an instant on track 0.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use strata_core::rect::Rect;

use crate::flag_names;
use crate::pretty::lifecycle_name;
use crate::recorder::{RecordedEvent, RecordedTarget, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();

    for (ts, recorded) in decode(bytes).enumerate() {
        let event = match recorded {
            RecordedEvent::Lifecycle { node, kind } => instant(
                ts,
                lifecycle_name(kind),
                "Lifecycle",
                json!({ "node": node.to_string() }),
            ),
            RecordedEvent::Geometry {
                node,
                old,
                new,
                moved,
                resized,
            } => instant(
                ts,
                "Geometry",
                "Layout",
                json!({
                    "node": node.to_string(),
                    "old": rect_json(old),
                    "new": rect_json(new),
                    "moved": moved,
                    "resized": resized,
                }),
            ),
            RecordedEvent::Visibility {
                node,
                fragments,
                area,
            } => instant(
                ts,
                "Visibility",
                "Layout",
                json!({
                    "node": node.to_string(),
                    "fragments": fragments,
                    "area": area,
                }),
            ),
            RecordedEvent::DamagePass {
                start,
                flags,
                rects_in,
                rects_left,
            } => instant(
                ts,
                "DamagePass",
                "Damage",
                json!({
                    "start": start.to_string(),
                    "flags": flag_names(flags.iter_names()),
                    "rects_in": rects_in,
                    "rects_left": rects_left,
                }),
            ),
            RecordedEvent::ZShift {
                node,
                requested,
                moved,
            } => instant(
                ts,
                "ZShift",
                "Layout",
                json!({
                    "node": node.to_string(),
                    "requested": requested,
                    "moved": moved,
                }),
            ),
            RecordedEvent::SpyRefresh { spy, full, rects } => instant(
                ts,
                "SpyRefresh",
                "Spy",
                json!({
                    "spy": spy.to_string(),
                    "full": full,
                    "rects": rects,
                }),
            ),
            RecordedEvent::Flush { nodes } => {
                let mut e = instant(ts, "Flush", "Damage", json!({ "nodes": nodes }));
                e["s"] = json!("g");
                e
            }
            RecordedEvent::Paint {
                node,
                target,
                fragment,
            } => {
                let (kind, buffer) = match target {
                    RecordedTarget::Master(m) => ("master", m),
                    RecordedTarget::Spy(s) => ("spy", s),
                };
                json!({
                    "ph": "X",
                    "name": format!("paint {node}"),
                    "cat": "Paint",
                    "ts": ts,
                    "dur": 1,
                    "pid": 0,
                    "tid": buffer.index,
                    "args": {
                        "target": format!("{kind} {buffer}"),
                        "fragment": rect_json(fragment),
                    }
                })
            }
        };
        events.push(event);
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn instant(ts: usize, name: &str, cat: &str, args: Value) -> Value {
    json!({
        "ph": "i",
        "name": name,
        "cat": cat,
        "ts": ts,
        "pid": 0,
        "tid": 0,
        "s": "t",
        "args": args,
    })
}

fn rect_json(r: Rect) -> Value {
    json!([r.left, r.top, r.right, r.bottom])
}

#[cfg(test)]
mod tests {
    use strata_core::trace::{
        FlushEvent, LifecycleEvent, LifecycleKind, PaintEvent, PaintTarget, TraceSink,
    };
    use strata_core::tree::SurfaceTree;

    use super::*;
    use crate::recorder::RecorderSink;

    #[test]
    fn export_produces_valid_json() {
        let mut tree = SurfaceTree::new();
        let node = tree.create_node(Rect::new(0, 0, 1, 1));
        let mut rec = RecorderSink::new();
        rec.on_lifecycle(&LifecycleEvent {
            node,
            kind: LifecycleKind::Loaded,
        });
        rec.on_paint(&PaintEvent {
            node,
            target: PaintTarget::Spy(node),
            fragment: Rect::new(1, 2, 3, 4),
        });
        rec.on_flush(&FlushEvent { nodes: 1 });

        let mut out = Vec::new();
        export(rec.as_bytes(), &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();

        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert_eq!(parsed.len(), 3);

        assert_eq!(parsed[0]["ph"], "i");
        assert_eq!(parsed[0]["name"], "loaded");
        assert_eq!(parsed[0]["args"]["node"], "#0");

        assert_eq!(parsed[1]["ph"], "X");
        assert_eq!(parsed[1]["ts"], 1);
        assert_eq!(parsed[1]["args"]["target"], "spy #0");
        assert_eq!(parsed[1]["args"]["fragment"], json!([1, 2, 3, 4]));

        assert_eq!(parsed[2]["name"], "Flush");
        assert_eq!(parsed[2]["s"], "g");
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert!(parsed.is_empty());
    }
}
