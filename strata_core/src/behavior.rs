// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collaborator interfaces: paint behaviors and layout managers.
//!
//! A node's [`Behavior`] is the only place pixels are produced. The engine
//! calls [`Behavior::draw`] once per visible fragment with the clip already
//! set. A node without a behavior paints nothing and keeps every default
//! hook.
//!
//! A [`Layout`] assigns rectangles to a container's children. It is invoked
//! by [`SurfaceTree::pack`](crate::tree::SurfaceTree::pack) and calls back
//! into the tree through [`SurfaceTree::set_bounds`](crate::tree::SurfaceTree::set_bounds).

use crate::rect::Rect;
use crate::region::Region;
use crate::surface::{GraphicsContext, Pixmap};
use crate::tree::{NodeId, SurfaceTree};

/// What a paint callback may know about the node it is drawing.
#[derive(Clone, Copy, Debug)]
pub struct SurfaceInfo<'a> {
    /// The node being painted.
    pub id: NodeId,
    /// Width of the node.
    pub width: i32,
    /// Height of the node.
    pub height: i32,
    /// The node's own sub-buffer when it is a spy surface.
    pub sub_buffer: Option<&'a Pixmap>,
}

impl SurfaceInfo<'_> {
    /// The node's bounds in local coordinates.
    #[inline]
    #[must_use]
    pub const fn local_bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }
}

/// Paint callback and lifecycle hooks for one node.
///
/// Only [`draw`](Self::draw) is required.
pub trait Behavior {
    /// Paints one fragment. Local `(0, 0)` is the node's top-left corner.
    fn draw(&self, gc: &mut GraphicsContext<'_>, surface: &SurfaceInfo<'_>);

    /// Size a zero-sized node takes when loaded, and the size restored by
    /// [`SurfaceTree::resize_to_normal`](crate::tree::SurfaceTree::resize_to_normal).
    fn normal_size(&self) -> (i32, i32) {
        (0, 0)
    }

    /// Whether local `(x, y)` belongs to the node for hit testing.
    fn is_opaque_at(&self, x: i32, y: i32, surface: &SurfaceInfo<'_>) -> bool {
        _ = (x, y, surface);
        true
    }

    /// Called on spy surfaces after `changed` (sub-buffer coordinates) of the
    /// sub-buffer was redrawn. Effects such as tints are applied here.
    fn sub_changed(&mut self, sub_buffer: &mut Pixmap, changed: &Region) {
        _ = (sub_buffer, changed);
    }

    /// First load phase, parents before children.
    fn pre_load(&mut self, id: NodeId) {
        _ = id;
    }

    /// Second load phase, children before parents; the node is active.
    fn post_load(&mut self, id: NodeId) {
        _ = id;
    }

    /// First unload phase; the node is already inactive.
    fn pre_unload(&mut self, id: NodeId) {
        _ = id;
    }

    /// Second unload phase.
    fn post_unload(&mut self, id: NodeId) {
        _ = id;
    }

    /// Called when an active node's logical rectangle changed.
    fn moved_resized(&mut self, id: NodeId, old: Rect, moved: bool, resized: bool) {
        _ = (id, old, moved, resized);
    }
}

/// Size request a child publishes to its parent's layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LayoutHints {
    /// Preferred width.
    pub width: i32,
    /// Preferred height.
    pub height: i32,
    /// Share of leftover space, for layouts that distribute it.
    pub weight: u32,
}

/// Assigns rectangles to the children of a container.
pub trait Layout {
    /// Positions every child of `container`.
    ///
    /// Re-entrant packs of the same container (for example through a child
    /// resize issued from here) are deferred and cause one more call once
    /// this one returns.
    fn pack(&mut self, tree: &mut SurfaceTree, container: NodeId);
}
