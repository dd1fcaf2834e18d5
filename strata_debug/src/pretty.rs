// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Nodes print
//! as `#index`.

use std::io::Write;

use strata_core::trace::{
    DamagePassEvent, FlushEvent, GeometryEvent, LifecycleEvent, LifecycleKind, PaintEvent,
    PaintTarget, SpyRefreshEvent, TraceSink, VisibilityEvent, ZShiftEvent,
};

use crate::flag_names;

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    paints: bool,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("paints", &self.paints)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::with_writer(Box::new(std::io::stderr()))
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self::with_writer(writer)
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            paints: false,
        }
    }

    /// Also print one line per painted fragment. Off by default; a single
    /// flush can paint hundreds.
    #[must_use]
    pub fn with_paints(mut self, paints: bool) -> Self {
        self.paints = paints;
        self
    }

    /// Returns the destination.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

pub(crate) fn lifecycle_name(kind: LifecycleKind) -> &'static str {
    match kind {
        LifecycleKind::Attached => "attached",
        LifecycleKind::Loaded => "loaded",
        LifecycleKind::Unloaded => "unloaded",
        LifecycleKind::Removed => "removed",
        LifecycleKind::Hidden => "hidden",
        LifecycleKind::Shown => "shown",
        LifecycleKind::Destroyed => "destroyed",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_lifecycle(&mut self, e: &LifecycleEvent) {
        let _ = writeln!(
            self.writer,
            "[lifecycle] {} {}",
            e.node,
            lifecycle_name(e.kind),
        );
    }

    fn on_geometry(&mut self, e: &GeometryEvent) {
        let what = match (e.moved, e.resized) {
            (true, true) => "move+resize",
            (true, false) => "move",
            (false, true) => "resize",
            (false, false) => "same",
        };
        let _ = writeln!(
            self.writer,
            "[geometry] {} {what} {:?} -> {:?}",
            e.node, e.old, e.new,
        );
    }

    fn on_visibility(&mut self, e: &VisibilityEvent) {
        let _ = writeln!(
            self.writer,
            "[visibility] {} fragments={} area={}",
            e.node, e.fragments, e.area,
        );
    }

    fn on_damage_pass(&mut self, e: &DamagePassEvent) {
        let _ = writeln!(
            self.writer,
            "[damage] start={} flags={} in={} left={}",
            e.start,
            flag_names(e.flags.iter_names()),
            e.rects_in,
            e.rects_left,
        );
    }

    fn on_z_shift(&mut self, e: &ZShiftEvent) {
        let _ = writeln!(
            self.writer,
            "[zshift] {} requested={} moved={}",
            e.node, e.requested, e.moved,
        );
    }

    fn on_spy_refresh(&mut self, e: &SpyRefreshEvent) {
        let kind = if e.full { "full" } else { "partial" };
        let _ = writeln!(
            self.writer,
            "[spy] {} {kind} rects={}",
            e.spy, e.rects,
        );
    }

    fn on_flush(&mut self, e: &FlushEvent) {
        let _ = writeln!(self.writer, "[flush] nodes={}", e.nodes);
    }

    fn on_paint(&mut self, e: &PaintEvent) {
        if !self.paints {
            return;
        }
        let target = match e.target {
            PaintTarget::Master(m) => format!("master {m}"),
            PaintTarget::Spy(s) => format!("spy {s}"),
        };
        let _ = writeln!(
            self.writer,
            "[paint] {} -> {target} {:?}",
            e.node, e.fragment,
        );
    }
}
