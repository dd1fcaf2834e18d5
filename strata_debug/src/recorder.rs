// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`].
//!
//! Node handles are stored as index and generation and come back as
//! [`NodeRef`]s, which can be compared against live handles with
//! [`NodeRef::matches`].

use strata_core::rect::Rect;
use strata_core::trace::{
    DamagePassEvent, FlushEvent, GeometryEvent, LifecycleEvent, LifecycleKind, PaintEvent,
    PaintTarget, SpyRefreshEvent, TraceSink, VisibilityEvent, ZShiftEvent,
};
use strata_core::tree::{DamageFlags, NodeId};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_LIFECYCLE: u8 = 1;
const TAG_GEOMETRY: u8 = 2;
const TAG_VISIBILITY: u8 = 3;
const TAG_DAMAGE_PASS: u8 = 4;
const TAG_Z_SHIFT: u8 = 5;
const TAG_SPY_REFRESH: u8 = 6;
const TAG_FLUSH: u8 = 7;
const TAG_PAINT: u8 = 8;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_i32(&mut self, v: i32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_i64(&mut self, v: i64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_node(&mut self, id: NodeId) {
        self.write_u32(id.index());
        self.write_u32(id.generation());
    }

    fn write_rect(&mut self, r: Rect) {
        self.write_i32(r.left);
        self.write_i32(r.top);
        self.write_i32(r.right);
        self.write_i32(r.bottom);
    }

    fn write_lifecycle(&mut self, kind: LifecycleKind) {
        self.write_u8(match kind {
            LifecycleKind::Attached => 0,
            LifecycleKind::Loaded => 1,
            LifecycleKind::Unloaded => 2,
            LifecycleKind::Removed => 3,
            LifecycleKind::Hidden => 4,
            LifecycleKind::Shown => 5,
            LifecycleKind::Destroyed => 6,
        });
    }
}

impl TraceSink for RecorderSink {
    fn on_lifecycle(&mut self, e: &LifecycleEvent) {
        self.write_u8(TAG_LIFECYCLE);
        self.write_node(e.node);
        self.write_lifecycle(e.kind);
    }

    fn on_geometry(&mut self, e: &GeometryEvent) {
        self.write_u8(TAG_GEOMETRY);
        self.write_node(e.node);
        self.write_rect(e.old);
        self.write_rect(e.new);
        self.write_u8(u8::from(e.moved) | u8::from(e.resized) << 1);
    }

    fn on_visibility(&mut self, e: &VisibilityEvent) {
        self.write_u8(TAG_VISIBILITY);
        self.write_node(e.node);
        self.write_u32(e.fragments);
        self.write_i64(e.area);
    }

    fn on_damage_pass(&mut self, e: &DamagePassEvent) {
        self.write_u8(TAG_DAMAGE_PASS);
        self.write_node(e.start);
        self.write_u8(e.flags.bits());
        self.write_u32(e.rects_in);
        self.write_u32(e.rects_left);
    }

    fn on_z_shift(&mut self, e: &ZShiftEvent) {
        self.write_u8(TAG_Z_SHIFT);
        self.write_node(e.node);
        self.write_i32(e.requested);
        self.write_i32(e.moved);
    }

    fn on_spy_refresh(&mut self, e: &SpyRefreshEvent) {
        self.write_u8(TAG_SPY_REFRESH);
        self.write_node(e.spy);
        self.write_u8(u8::from(e.full));
        self.write_u32(e.rects);
    }

    fn on_flush(&mut self, e: &FlushEvent) {
        self.write_u8(TAG_FLUSH);
        self.write_u32(e.nodes);
    }

    fn on_paint(&mut self, e: &PaintEvent) {
        self.write_u8(TAG_PAINT);
        self.write_node(e.node);
        let (kind, target) = match e.target {
            PaintTarget::Master(m) => (0, m),
            PaintTarget::Spy(s) => (1, s),
        };
        self.write_u8(kind);
        self.write_node(target);
        self.write_rect(e.fragment);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A node handle read back from a recording.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeRef {
    /// Slot index.
    pub index: u32,
    /// Generation of the slot when the event was recorded.
    pub generation: u32,
}

impl NodeRef {
    /// Returns `true` if `id` is the handle this was recorded from.
    #[must_use]
    pub fn matches(self, id: NodeId) -> bool {
        self.index == id.index() && self.generation == id.generation()
    }
}

impl From<NodeId> for NodeRef {
    fn from(id: NodeId) -> Self {
        Self {
            index: id.index(),
            generation: id.generation(),
        }
    }
}

impl std::fmt::Display for NodeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.index)
    }
}

/// Where a recorded fragment was painted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordedTarget {
    /// The buffer of the given master.
    Master(NodeRef),
    /// The sub-buffer of the given spy surface.
    Spy(NodeRef),
}

/// A decoded event from a binary recording.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedEvent {
    /// A [`LifecycleEvent`].
    Lifecycle {
        /// The node concerned.
        node: NodeRef,
        /// What happened.
        kind: LifecycleKind,
    },
    /// A [`GeometryEvent`].
    Geometry {
        /// The node concerned.
        node: NodeRef,
        /// Logical rectangle before the change.
        old: Rect,
        /// Logical rectangle after the change.
        new: Rect,
        /// Whether the origin changed.
        moved: bool,
        /// Whether the size changed.
        resized: bool,
    },
    /// A [`VisibilityEvent`].
    Visibility {
        /// The node concerned.
        node: NodeRef,
        /// Number of fragments.
        fragments: u32,
        /// Visible area in pixels.
        area: i64,
    },
    /// A [`DamagePassEvent`].
    DamagePass {
        /// Node the pass started at.
        start: NodeRef,
        /// Flags the pass started with.
        flags: DamageFlags,
        /// Dirty rectangles handed in.
        rects_in: u32,
        /// Dirty rectangles nobody consumed.
        rects_left: u32,
    },
    /// A [`ZShiftEvent`].
    ZShift {
        /// The node that moved.
        node: NodeRef,
        /// Requested shift.
        requested: i32,
        /// Positions actually moved.
        moved: i32,
    },
    /// A [`SpyRefreshEvent`].
    SpyRefresh {
        /// The spy surface.
        spy: NodeRef,
        /// Full recompute or incremental update.
        full: bool,
        /// Rectangles drawn into the sub-buffer.
        rects: u32,
    },
    /// A [`FlushEvent`].
    Flush {
        /// Distinct nodes painted.
        nodes: u32,
    },
    /// A [`PaintEvent`].
    Paint {
        /// The node painted.
        node: NodeRef,
        /// Which buffer received the pixels.
        target: RecordedTarget,
        /// Fragment in target-buffer coordinates.
        fragment: Rect,
    },
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.data.get(self.pos..self.pos + N)?;
        self.pos += N;
        bytes.try_into().ok()
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.take::<1>().map(|[v]| v)
    }

    fn read_u32(&mut self) -> Option<u32> {
        self.take().map(u32::from_le_bytes)
    }

    fn read_i32(&mut self) -> Option<i32> {
        self.take().map(i32::from_le_bytes)
    }

    fn read_i64(&mut self) -> Option<i64> {
        self.take().map(i64::from_le_bytes)
    }

    fn read_node(&mut self) -> Option<NodeRef> {
        Some(NodeRef {
            index: self.read_u32()?,
            generation: self.read_u32()?,
        })
    }

    fn read_rect(&mut self) -> Option<Rect> {
        Some(Rect::new(
            self.read_i32()?,
            self.read_i32()?,
            self.read_i32()?,
            self.read_i32()?,
        ))
    }

    fn read_lifecycle(&mut self) -> Option<LifecycleKind> {
        Some(match self.read_u8()? {
            0 => LifecycleKind::Attached,
            1 => LifecycleKind::Loaded,
            2 => LifecycleKind::Unloaded,
            3 => LifecycleKind::Removed,
            4 => LifecycleKind::Hidden,
            5 => LifecycleKind::Shown,
            _ => LifecycleKind::Destroyed,
        })
    }

    fn decode_lifecycle(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Lifecycle {
            node: self.read_node()?,
            kind: self.read_lifecycle()?,
        })
    }

    fn decode_geometry(&mut self) -> Option<RecordedEvent> {
        let node = self.read_node()?;
        let old = self.read_rect()?;
        let new = self.read_rect()?;
        let bits = self.read_u8()?;
        Some(RecordedEvent::Geometry {
            node,
            old,
            new,
            moved: bits & 1 != 0,
            resized: bits & 2 != 0,
        })
    }

    fn decode_visibility(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Visibility {
            node: self.read_node()?,
            fragments: self.read_u32()?,
            area: self.read_i64()?,
        })
    }

    fn decode_damage_pass(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::DamagePass {
            start: self.read_node()?,
            flags: DamageFlags::from_bits_truncate(self.read_u8()?),
            rects_in: self.read_u32()?,
            rects_left: self.read_u32()?,
        })
    }

    fn decode_z_shift(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::ZShift {
            node: self.read_node()?,
            requested: self.read_i32()?,
            moved: self.read_i32()?,
        })
    }

    fn decode_spy_refresh(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::SpyRefresh {
            spy: self.read_node()?,
            full: self.read_u8()? != 0,
            rects: self.read_u32()?,
        })
    }

    fn decode_paint(&mut self) -> Option<RecordedEvent> {
        let node = self.read_node()?;
        let kind = self.read_u8()?;
        let target = self.read_node()?;
        let target = if kind == 0 {
            RecordedTarget::Master(target)
        } else {
            RecordedTarget::Spy(target)
        };
        Some(RecordedEvent::Paint {
            node,
            target,
            fragment: self.read_rect()?,
        })
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_LIFECYCLE => self.decode_lifecycle(),
            TAG_GEOMETRY => self.decode_geometry(),
            TAG_VISIBILITY => self.decode_visibility(),
            TAG_DAMAGE_PASS => self.decode_damage_pass(),
            TAG_Z_SHIFT => self.decode_z_shift(),
            TAG_SPY_REFRESH => self.decode_spy_refresh(),
            TAG_FLUSH => Some(RecordedEvent::Flush {
                nodes: self.read_u32()?,
            }),
            TAG_PAINT => self.decode_paint(),
            _ => None, // unknown tag: stop
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
