// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the compositing engine.
//!
//! This module provides a [`TraceSink`] trait with one method per engine
//! event. All method bodies default to no-ops, so implementing only the
//! events you care about is fine.
//!
//! A [`SurfaceTree`](crate::tree::SurfaceTree) owns a [`Tracer`], which wraps
//! an optional boxed sink. When the `trace` feature is **off**, every
//! `Tracer` method compiles to nothing. When **on**, each method performs a
//! single `Option` branch before dispatching.
//!
//! To read a sink back after installing it, share it through
//! `Rc<RefCell<_>>`, which implements [`TraceSink`] itself.
//!
//! # Crate features
//!
//! - `trace` enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`) gates per-fragment [`PaintEvent`]s and
//!   the corresponding `TraceSink` method.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::RefCell;

use crate::rect::Rect;
use crate::tree::{DamageFlags, NodeId};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which lifecycle transition a node went through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifecycleKind {
    /// Linked under a new parent.
    Attached,
    /// Finished the two-phase load pass and became active.
    Loaded,
    /// Finished the unload pass.
    Unloaded,
    /// Detached from its parent (and unloaded, if it was loaded).
    Removed,
    /// Hidden by the caller.
    Hidden,
    /// Shown by the caller.
    Shown,
    /// Slot freed.
    Destroyed,
}

/// Where a fragment was painted.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PaintTarget {
    /// The buffer of the given master.
    Master(NodeId),
    /// The sub-buffer of the given spy surface.
    Spy(NodeId),
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted on attach, load, unload, removal, hide, show and destroy.
#[derive(Clone, Copy, Debug)]
pub struct LifecycleEvent {
    /// The node concerned.
    pub node: NodeId,
    /// What happened.
    pub kind: LifecycleKind,
}

/// Emitted when an active node's logical rectangle changes.
#[derive(Clone, Copy, Debug)]
pub struct GeometryEvent {
    /// The node concerned.
    pub node: NodeId,
    /// Logical rectangle before the change.
    pub old: Rect,
    /// Logical rectangle after the change.
    pub new: Rect,
    /// Whether the origin changed.
    pub moved: bool,
    /// Whether the size changed.
    pub resized: bool,
}

/// Emitted after a node's visible region is recomputed.
#[derive(Clone, Copy, Debug)]
pub struct VisibilityEvent {
    /// The node concerned.
    pub node: NodeId,
    /// Number of fragments in the new region.
    pub fragments: u32,
    /// Total visible area in pixels.
    pub area: i64,
}

/// Emitted at the end of each top-level damage propagation.
#[derive(Clone, Copy, Debug)]
pub struct DamagePassEvent {
    /// Node the pass started at.
    pub start: NodeId,
    /// Flags the pass started with.
    pub flags: DamageFlags,
    /// Dirty rectangles handed in.
    pub rects_in: u32,
    /// Dirty rectangles nobody consumed.
    pub rects_left: u32,
}

/// Emitted after a z-order shift.
#[derive(Clone, Copy, Debug)]
pub struct ZShiftEvent {
    /// The node that moved.
    pub node: NodeId,
    /// Requested number of positions (positive is toward the front).
    pub requested: i32,
    /// Positions actually moved after stopping at fixed siblings or list ends.
    pub moved: i32,
}

/// Emitted when a spy surface's sub-buffer changes.
#[derive(Clone, Copy, Debug)]
pub struct SpyRefreshEvent {
    /// The spy surface.
    pub spy: NodeId,
    /// `true` for a full recompute, `false` for an incremental update.
    pub full: bool,
    /// Rectangles drawn into the sub-buffer.
    pub rects: u32,
}

/// Emitted when the outermost delegation span closes.
#[derive(Clone, Copy, Debug)]
pub struct FlushEvent {
    /// Distinct nodes painted by the flush.
    pub nodes: u32,
}

/// Emitted for every fragment handed to a paint callback.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug)]
pub struct PaintEvent {
    /// The node painted.
    pub node: NodeId,
    /// Which buffer received the pixels.
    pub target: PaintTarget,
    /// Fragment in target-buffer coordinates.
    pub fragment: Rect,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the engine.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called on lifecycle transitions.
    fn on_lifecycle(&mut self, e: &LifecycleEvent) {
        _ = e;
    }

    /// Called when an active node moves or resizes.
    fn on_geometry(&mut self, e: &GeometryEvent) {
        _ = e;
    }

    /// Called after a visible region is recomputed.
    fn on_visibility(&mut self, e: &VisibilityEvent) {
        _ = e;
    }

    /// Called after a top-level damage pass.
    fn on_damage_pass(&mut self, e: &DamagePassEvent) {
        _ = e;
    }

    /// Called after a z-order shift.
    fn on_z_shift(&mut self, e: &ZShiftEvent) {
        _ = e;
    }

    /// Called after a spy sub-buffer changes.
    fn on_spy_refresh(&mut self, e: &SpyRefreshEvent) {
        _ = e;
    }

    /// Called when a delegation span flushes its worklist.
    fn on_flush(&mut self, e: &FlushEvent) {
        _ = e;
    }

    /// Called per painted fragment (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_paint(&mut self, e: &PaintEvent) {
        _ = e;
    }
}

impl<S: TraceSink + ?Sized> TraceSink for Rc<RefCell<S>> {
    fn on_lifecycle(&mut self, e: &LifecycleEvent) {
        self.borrow_mut().on_lifecycle(e);
    }

    fn on_geometry(&mut self, e: &GeometryEvent) {
        self.borrow_mut().on_geometry(e);
    }

    fn on_visibility(&mut self, e: &VisibilityEvent) {
        self.borrow_mut().on_visibility(e);
    }

    fn on_damage_pass(&mut self, e: &DamagePassEvent) {
        self.borrow_mut().on_damage_pass(e);
    }

    fn on_z_shift(&mut self, e: &ZShiftEvent) {
        self.borrow_mut().on_z_shift(e);
    }

    fn on_spy_refresh(&mut self, e: &SpyRefreshEvent) {
        self.borrow_mut().on_spy_refresh(e);
    }

    fn on_flush(&mut self, e: &FlushEvent) {
        self.borrow_mut().on_flush(e);
    }

    #[cfg(feature = "trace-rich")]
    fn on_paint(&mut self, e: &PaintEvent) {
        self.borrow_mut().on_paint(e);
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Owning wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing and
/// installed sinks are dropped immediately. When **on**, each method checks
/// the inner `Option` (one branch) before dispatching to the sink.
#[derive(Default)]
pub struct Tracer {
    #[cfg(feature = "trace")]
    sink: Option<Box<dyn TraceSink>>,
}

impl core::fmt::Debug for Tracer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

macro_rules! dispatch {
    ($self:ident, $method:ident, $e:ident) => {{
        #[cfg(feature = "trace")]
        if let Some(s) = &mut $self.sink {
            s.$method($e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = $e;
        }
    }};
}

impl Tracer {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: Box<dyn TraceSink>) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {}
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Returns `true` if events are being delivered somewhere.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        #[cfg(feature = "trace")]
        {
            self.sink.is_some()
        }
        #[cfg(not(feature = "trace"))]
        {
            false
        }
    }

    /// Removes and returns the installed sink.
    pub fn take(&mut self) -> Option<Box<dyn TraceSink>> {
        #[cfg(feature = "trace")]
        {
            self.sink.take()
        }
        #[cfg(not(feature = "trace"))]
        {
            None
        }
    }

    /// Emits a [`LifecycleEvent`].
    #[inline]
    pub fn lifecycle(&mut self, e: &LifecycleEvent) {
        dispatch!(self, on_lifecycle, e);
    }

    /// Emits a [`GeometryEvent`].
    #[inline]
    pub fn geometry(&mut self, e: &GeometryEvent) {
        dispatch!(self, on_geometry, e);
    }

    /// Emits a [`VisibilityEvent`].
    #[inline]
    pub fn visibility(&mut self, e: &VisibilityEvent) {
        dispatch!(self, on_visibility, e);
    }

    /// Emits a [`DamagePassEvent`].
    #[inline]
    pub fn damage_pass(&mut self, e: &DamagePassEvent) {
        dispatch!(self, on_damage_pass, e);
    }

    /// Emits a [`ZShiftEvent`].
    #[inline]
    pub fn z_shift(&mut self, e: &ZShiftEvent) {
        dispatch!(self, on_z_shift, e);
    }

    /// Emits a [`SpyRefreshEvent`].
    #[inline]
    pub fn spy_refresh(&mut self, e: &SpyRefreshEvent) {
        dispatch!(self, on_spy_refresh, e);
    }

    /// Emits a [`FlushEvent`].
    #[inline]
    pub fn flush(&mut self, e: &FlushEvent) {
        dispatch!(self, on_flush, e);
    }

    /// Emits a [`PaintEvent`] (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn paint(&mut self, e: &PaintEvent) {
        if let Some(s) = &mut self.sink {
            s.on_paint(e);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
