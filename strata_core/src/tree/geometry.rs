// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coordinates, clipping, move/resize, and layout packing.
//!
//! Every node has three rectangles:
//!
//! - **logical**: relative to the parent's estate (content area) origin, or
//!   to the parent's full rectangle with [`NodeFlags::IGNORE_ESTATE`].
//! - **physical**: in the coordinates of the master buffer the node draws
//!   into. Children of a master start from the buffer origin.
//! - **clipped**: physical, intersected with every ancestor's clip envelope
//!   up to the master. Empty (and [`NodeState::COMPLETE_CLIP`]) when nothing
//!   is left.

use crate::behavior::LayoutHints;
use crate::rect::Rect;
use crate::region::Region;
use crate::trace::GeometryEvent;

use super::flags::{NodeFlags, NodeState};
use super::id::{INVALID, NodeId};
use super::store::SurfaceTree;

/// Upper bound on layout passes for one [`SurfaceTree::pack`] call.
const MAX_REPACK_PASSES: u32 = 4;

/// Border widths separating a node's rectangle from its estate, the area
/// its children are positioned in and clipped to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Insets {
    /// Left border.
    pub left: i32,
    /// Top border.
    pub top: i32,
    /// Right border.
    pub right: i32,
    /// Bottom border.
    pub bottom: i32,
}

impl Insets {
    /// No border.
    pub const ZERO: Self = Self::uniform(0);

    /// Creates insets from four border widths.
    #[inline]
    #[must_use]
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// The same border on every side.
    #[inline]
    #[must_use]
    pub const fn uniform(width: i32) -> Self {
        Self::new(width, width, width, width)
    }

    /// The estate of a `width` × `height` node, in its local coordinates.
    #[inline]
    #[must_use]
    pub const fn apply(self, width: i32, height: i32) -> Rect {
        Rect::new(
            self.left,
            self.top,
            width - self.right,
            height - self.bottom,
        )
        .clamped()
    }
}

/// Nine-point placement of a node inside its parent's estate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Anchor {
    /// Top-left corner.
    TopLeft,
    /// Centered along the top edge.
    Top,
    /// Top-right corner.
    TopRight,
    /// Centered along the left edge.
    Left,
    /// Centered.
    Center,
    /// Centered along the right edge.
    Right,
    /// Bottom-left corner.
    BottomLeft,
    /// Centered along the bottom edge.
    Bottom,
    /// Bottom-right corner.
    BottomRight,
}

impl Anchor {
    /// Horizontal and vertical alignment, each 0 (start), 1 (center) or
    /// 2 (end).
    const fn alignment(self) -> (i32, i32) {
        match self {
            Self::TopLeft => (0, 0),
            Self::Top => (1, 0),
            Self::TopRight => (2, 0),
            Self::Left => (0, 1),
            Self::Center => (1, 1),
            Self::Right => (2, 1),
            Self::BottomLeft => (0, 2),
            Self::Bottom => (1, 2),
            Self::BottomRight => (2, 2),
        }
    }
}

// ---------------------------------------------------------------------------
// Public geometry API
// ---------------------------------------------------------------------------

impl SurfaceTree {
    /// Rectangle relative to the parent's estate.
    #[must_use]
    pub fn logical(&self, id: NodeId) -> Rect {
        self.validate(id);
        self.logical[id.idx as usize]
    }

    /// Rectangle in master-buffer coordinates.
    #[must_use]
    pub fn physical(&self, id: NodeId) -> Rect {
        self.validate(id);
        self.physical[id.idx as usize]
    }

    /// Physical rectangle clipped by every ancestor, or `None` when the node
    /// is clipped away entirely.
    #[must_use]
    pub fn clipped(&self, id: NodeId) -> Option<Rect> {
        self.validate(id);
        let idx = id.idx;
        (!self.has_state(idx, NodeState::COMPLETE_CLIP)).then(|| self.clipped[idx as usize])
    }

    /// Width and height.
    #[must_use]
    pub fn size(&self, id: NodeId) -> (i32, i32) {
        self.validate(id);
        let r = self.logical[id.idx as usize];
        (r.width(), r.height())
    }

    /// The estate (content area) in local coordinates.
    #[must_use]
    pub fn estate(&self, id: NodeId) -> Rect {
        self.validate(id);
        self.local_estate(id.idx)
    }

    /// Replaces the borders around the node's estate, repositioning and
    /// repainting its children.
    pub fn set_estate(&mut self, id: NodeId, insets: Insets) {
        self.validate(id);
        let idx = id.idx;
        if self.estate[idx as usize] == insets {
            return;
        }
        self.estate[idx as usize] = insets;
        self.tree_altered = true;
        self.update_coords(idx);
        if !self.has_state(idx, NodeState::ACTIVE) {
            return;
        }
        self.begin_delegation();
        self.update_family_vislist(idx);
        self.pack(id);
        if self.has_state(idx, NodeState::SENSITIVE) {
            self.display_all(id);
        }
        self.end_delegation();
    }

    /// Converts master-buffer coordinates to coordinates local to the node.
    #[must_use]
    pub fn local_point(&self, id: NodeId, x: i32, y: i32) -> (i32, i32) {
        self.validate(id);
        let (ox, oy) = self.paint_origin(id.idx);
        (x - ox, y - oy)
    }

    /// Moves the node so its top-left corner is at `(x, y)` in the parent's
    /// estate.
    ///
    /// Ignored for nodes positioned by their parent's layout.
    pub fn move_to(&mut self, id: NodeId, x: i32, y: i32) {
        self.validate(id);
        let r = self.logical[id.idx as usize];
        self.place(id, Rect::from_origin_size(x, y, r.width(), r.height()));
    }

    /// Moves the node by `(dx, dy)`.
    pub fn relative_move(&mut self, id: NodeId, dx: i32, dy: i32) {
        self.validate(id);
        let r = self.logical[id.idx as usize];
        self.place(id, r.offset(dx, dy));
    }

    /// Sets position and size at once.
    ///
    /// Ignored for nodes positioned by their parent's layout.
    pub fn place(&mut self, id: NodeId, rect: Rect) {
        self.validate(id);
        if self.is_laid_out(id.idx) {
            return;
        }
        self.move_resize(id.idx, rect);
    }

    /// Positions the node at one of nine points of its parent's estate.
    ///
    /// Does nothing for roots and for nodes positioned by a layout.
    pub fn anchor(&mut self, id: NodeId, anchor: Anchor) {
        self.validate(id);
        let idx = id.idx;
        let p = self.parent[idx as usize];
        if p == INVALID {
            return;
        }
        let area = if self.flags[idx as usize].contains(NodeFlags::IGNORE_ESTATE) {
            let r = self.logical[p as usize];
            Rect::new(0, 0, r.width(), r.height())
        } else {
            self.local_estate(p)
        };
        let r = self.logical[idx as usize];
        let (ax, ay) = anchor.alignment();
        let x = (area.width() - r.width()) * ax / 2;
        let y = (area.height() - r.height()) * ay / 2;
        self.place(id, Rect::from_origin_size(x, y, r.width(), r.height()));
    }

    /// Changes the node's size, keeping its origin.
    ///
    /// For nodes positioned by a layout, the size is recorded in the layout
    /// hints and the parent is repacked instead.
    pub fn resize(&mut self, id: NodeId, width: i32, height: i32) {
        self.validate(id);
        let idx = id.idx;
        if self.is_laid_out(idx) {
            let hints = self.hints[idx as usize].get_or_insert_with(LayoutHints::default);
            hints.width = width.max(0);
            hints.height = height.max(0);
            let p = self.parent[idx as usize];
            self.pack(self.id_at(p));
            return;
        }
        let r = self.logical[idx as usize];
        self.move_resize(idx, Rect::from_origin_size(r.left, r.top, width, height));
    }

    /// Resizes the node to its behavior's normal size.
    pub fn resize_to_normal(&mut self, id: NodeId) {
        self.validate(id);
        let (w, h) = self.normal_size(id.idx);
        self.resize(id, w, h);
    }

    /// Sets the logical rectangle unconditionally.
    ///
    /// This is the entry point for [`Layout`](crate::behavior::Layout)
    /// implementations, which position children the public move and resize
    /// operations refuse to touch.
    pub fn set_bounds(&mut self, id: NodeId, rect: Rect) {
        self.validate(id);
        self.move_resize(id.idx, rect);
    }

    /// Runs the node's layout until it stops requesting more passes.
    ///
    /// Requires the node to be loaded. Calls that arrive while the layout is
    /// already running are folded into one more pass, up to a fixed bound.
    pub fn pack(&mut self, id: NodeId) {
        self.validate(id);
        let idx = id.idx;
        if !self.has_state(idx, NodeState::LOADED) {
            return;
        }
        if self.has_state(idx, NodeState::PACKING) {
            self.set_state(idx, NodeState::REPACK, true);
            return;
        }
        let Some(mut layout) = self.layout[idx as usize].take() else {
            return;
        };
        self.set_state(idx, NodeState::PACKING, true);
        for _ in 0..MAX_REPACK_PASSES {
            self.set_state(idx, NodeState::REPACK, false);
            layout.pack(self, id);
            if !self.is_alive(id) || !self.has_state(idx, NodeState::REPACK) {
                break;
            }
        }
        if !self.is_alive(id) {
            return;
        }
        self.set_state(idx, NodeState::PACKING | NodeState::REPACK, false);
        // A layout installed while packing wins.
        if self.layout[idx as usize].is_none() {
            self.layout[idx as usize] = Some(layout);
        }
    }
}

// ---------------------------------------------------------------------------
// Internals
// ---------------------------------------------------------------------------

impl SurfaceTree {
    pub(crate) fn local_estate(&self, idx: u32) -> Rect {
        let r = self.logical[idx as usize];
        self.estate[idx as usize].apply(r.width(), r.height())
    }

    /// Where local `(0, 0)` of the node lands in the buffer it paints into.
    ///
    /// A master paints its own backdrop at the buffer origin.
    pub(crate) fn paint_origin(&self, idx: u32) -> (i32, i32) {
        if self.is_master(idx) {
            (0, 0)
        } else {
            let p = self.physical[idx as usize];
            (p.left, p.top)
        }
    }

    /// Area the node may paint, in the coordinates of the buffer it paints
    /// into. Empty when fully clipped.
    pub(crate) fn paint_bounds(&self, idx: u32) -> Rect {
        if self.has_state(idx, NodeState::COMPLETE_CLIP) {
            return Rect::EMPTY;
        }
        if self.is_master(idx) {
            let r = self.logical[idx as usize];
            Rect::new(0, 0, r.width(), r.height())
        } else {
            self.clipped[idx as usize]
        }
    }

    pub(crate) fn normal_size(&self, idx: u32) -> (i32, i32) {
        self.behavior[idx as usize]
            .as_ref()
            .map_or((0, 0), |b| b.normal_size())
    }

    /// Positioned by the parent's layout rather than by callers.
    pub(crate) fn is_laid_out(&self, idx: u32) -> bool {
        let p = self.parent[idx as usize];
        self.hints[idx as usize].is_some()
            && p != INVALID
            && (self.layout[p as usize].is_some() || self.has_state(p, NodeState::PACKING))
    }

    /// Recomputes the physical and clipped rectangles of `idx` and its
    /// descendants.
    pub(crate) fn update_coords(&mut self, idx: u32) {
        let p = self.parent[idx as usize];
        let mut phys = self.logical[idx as usize];
        if p != INVALID {
            let (mut ox, mut oy) = self.paint_origin(p);
            if !self.flags[idx as usize].contains(NodeFlags::IGNORE_ESTATE) {
                let e = self.estate[p as usize];
                ox += e.left;
                oy += e.top;
            }
            phys = phys.offset(ox, oy);
        }
        self.physical[idx as usize] = phys;
        self.clip_coords(idx);

        let mut child = self.first_child[idx as usize];
        while child != INVALID {
            self.update_coords(child);
            child = self.next_sibling[child as usize];
        }
    }

    fn clip_coords(&mut self, idx: u32) {
        let phys = self.physical[idx as usize];
        let p = self.parent[idx as usize];
        let envelope = if p == INVALID {
            Some(phys)
        } else if self.has_state(p, NodeState::COMPLETE_CLIP) {
            None
        } else {
            let ignore = self.flags[idx as usize].contains(NodeFlags::IGNORE_ESTATE);
            let (ox, oy) = self.paint_origin(p);
            let outer = self.paint_bounds(p);
            if ignore {
                Some(outer)
            } else {
                outer.intersection(self.local_estate(p).offset(ox, oy))
            }
        };

        let state = &mut self.state[idx as usize];
        state.remove(NodeState::PARTIAL_CLIP);
        match envelope.and_then(|env| env.intersect(phys)) {
            None => {
                self.clipped[idx as usize] = Rect::EMPTY;
                state.insert(NodeState::COMPLETE_CLIP);
            }
            Some((r, _)) => {
                self.clipped[idx as usize] = r;
                state.remove(NodeState::COMPLETE_CLIP);
                state.set(
                    NodeState::POSITIVE_CLIP,
                    r.right < phys.right || r.bottom < phys.bottom,
                );
                state.set(
                    NodeState::NEGATIVE_CLIP,
                    r.left > phys.left || r.top > phys.top,
                );
            }
        }
    }

    /// Applies a new logical rectangle, keeping visibility, buffers and
    /// pixels consistent.
    pub(crate) fn move_resize(&mut self, idx: u32, rect: Rect) {
        let rect = rect.clamped();
        let old = self.logical[idx as usize];
        let moved = (old.left, old.top) != (rect.left, rect.top);
        let resized = (old.width(), old.height()) != (rect.width(), rect.height());

        if !self.has_state(idx, NodeState::ACTIVE) {
            self.logical[idx as usize] = rect;
            self.update_coords(idx);
            if resized && self.has_state(idx, NodeState::LOADED) {
                self.realloc_master_buffer(idx);
            }
            return;
        }
        let always = self.flags[idx as usize].contains(NodeFlags::ALWAYS_RESIZE);
        if !moved && !resized && !always {
            return;
        }

        let gap_rect = if self.is_shown(idx) {
            self.clipped[idx as usize]
        } else {
            Rect::EMPTY
        };
        self.tree_altered = true;
        self.logical[idx as usize] = rect;
        self.update_coords(idx);
        if self.has_state(idx, NodeState::VISIBLE) {
            self.update_vislist_behind(idx);
        }

        self.begin_delegation();
        if resized {
            self.realloc_master_buffer(idx);
        }
        if self.is_spy(idx) {
            self.spy_geometry_changed(idx, resized);
        }
        let id = self.id_at(idx);
        if let Some(mut behavior) = self.behavior[idx as usize].take() {
            behavior.moved_resized(id, old, moved, resized);
            if self.behavior[idx as usize].is_none() {
                self.behavior[idx as usize] = Some(behavior);
            }
        }
        self.tracer.geometry(&GeometryEvent {
            node: id,
            old,
            new: rect,
            moved,
            resized,
        });

        let mut gap = Region::from_rect(gap_rect);
        if self.is_shown(idx) {
            gap.occlude_rect(self.clipped[idx as usize]);
        }
        if resized {
            let sensitive = self.has_state(idx, NodeState::SENSITIVE);
            self.cascade_state(idx, NodeState::SENSITIVE, false);
            self.pack(id);
            self.cascade_state(idx, NodeState::SENSITIVE, sensitive);
        }
        if self.has_state(idx, NodeState::SENSITIVE) && self.has_state(idx, NodeState::VISIBLE) {
            let p = self.parent[idx as usize];
            if p != INVALID {
                self.fill_gap(p, &mut gap, idx);
            }
            self.display_all(id);
        }
        self.end_delegation();
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;

    use crate::behavior::Layout;
    use crate::surface::Theme;
    use crate::tree::Placement;

    use super::*;

    fn rect(l: i32, t: i32, r: i32, b: i32) -> Rect {
        Rect::new(l, t, r, b)
    }

    #[test]
    fn insets_shrink_the_estate() {
        assert_eq!(Insets::uniform(2).apply(10, 8), rect(2, 2, 8, 6));
        assert_eq!(Insets::new(1, 2, 3, 4).apply(10, 10), rect(1, 2, 7, 6));
        // Borders wider than the node collapse the estate.
        assert!(Insets::uniform(6).apply(10, 10).is_empty());
    }

    #[test]
    fn physical_accumulates_parent_origin_and_estate() {
        let mut tree = SurfaceTree::new();
        let m = tree.create_master(rect(0, 0, 200, 200), Theme::CLASSIC);
        let outer = tree.create_node(rect(10, 10, 110, 110));
        let inner = tree.create_node(rect(5, 5, 25, 25));
        tree.add_child(m, outer, Placement::Front);
        tree.add_child(outer, inner, Placement::Front);
        tree.set_estate(outer, Insets::uniform(3));

        assert_eq!(tree.physical(outer), rect(10, 10, 110, 110));
        assert_eq!(tree.physical(inner), rect(18, 18, 38, 38));

        tree.set_flag(inner, NodeFlags::IGNORE_ESTATE, true);
        tree.set_bounds(inner, rect(5, 5, 25, 25));
        assert_eq!(tree.physical(inner), rect(15, 15, 35, 35));
    }

    #[test]
    fn children_are_clipped_to_the_estate() {
        let mut tree = SurfaceTree::new();
        let m = tree.create_master(rect(0, 0, 100, 100), Theme::CLASSIC);
        let panel = tree.create_node(rect(10, 10, 60, 60));
        let child = tree.create_node(rect(30, -5, 80, 20));
        tree.add_child(m, panel, Placement::Front);
        tree.add_child(panel, child, Placement::Front);
        tree.set_estate(panel, Insets::uniform(5));

        // Physical (45,10)-(95,35); estate (15,15)-(55,55).
        assert_eq!(tree.clipped(child), Some(rect(45, 15, 55, 35)));
        let state = tree.state(child);
        assert!(state.contains(NodeState::POSITIVE_CLIP));
        assert!(state.contains(NodeState::NEGATIVE_CLIP));
    }

    #[test]
    fn nodes_outside_the_parent_are_completely_clipped() {
        let mut tree = SurfaceTree::new();
        let m = tree.create_master(rect(0, 0, 50, 50), Theme::CLASSIC);
        let far = tree.create_node(rect(60, 60, 70, 70));
        let child = tree.create_node(rect(0, 0, 5, 5));
        tree.add_child(m, far, Placement::Front);
        tree.add_child(far, child, Placement::Front);

        assert_eq!(tree.clipped(far), None);
        assert!(tree.state(far).contains(NodeState::COMPLETE_CLIP));
        // Descendants of a fully clipped node are fully clipped too.
        assert_eq!(tree.clipped(child), None);

        tree.move_to(far, 10, 10);
        assert_eq!(tree.clipped(far), Some(rect(10, 10, 20, 20)));
        assert_eq!(tree.clipped(child), Some(rect(10, 10, 15, 15)));
    }

    #[test]
    fn anchor_positions_within_estate() {
        let mut tree = SurfaceTree::new();
        let parent = tree.create_node(rect(0, 0, 100, 60));
        let child = tree.create_node(rect(0, 0, 20, 10));
        tree.add_child(parent, child, Placement::Front);
        tree.set_estate(parent, Insets::uniform(10));

        tree.anchor(child, Anchor::Center);
        assert_eq!(tree.logical(child), rect(30, 15, 50, 25));
        tree.anchor(child, Anchor::BottomRight);
        assert_eq!(tree.logical(child), rect(60, 30, 80, 40));
        tree.anchor(child, Anchor::TopLeft);
        assert_eq!(tree.logical(child), rect(0, 0, 20, 10));
    }

    #[test]
    fn local_point_subtracts_origin() {
        let mut tree = SurfaceTree::new();
        let m = tree.create_master(rect(0, 0, 100, 100), Theme::CLASSIC);
        let a = tree.create_node(rect(20, 30, 40, 50));
        tree.add_child(m, a, Placement::Front);
        assert_eq!(tree.local_point(a, 25, 35), (5, 5));
        assert_eq!(tree.local_point(m, 25, 35), (25, 35));
    }

    #[test]
    fn sizes_are_clamped() {
        let mut tree = SurfaceTree::new();
        let a = tree.create_node(rect(0, 0, 10, 10));
        tree.resize(a, -4, 7);
        assert_eq!(tree.size(a), (0, 7));
    }

    struct Column;

    impl Layout for Column {
        fn pack(&mut self, tree: &mut SurfaceTree, container: NodeId) {
            let width = tree.estate(container).width();
            let kids: alloc::vec::Vec<_> = tree.children(container).collect();
            let mut y = 0;
            for kid in kids {
                let h = tree.layout_hints(kid).map_or(0, |h| h.height);
                tree.set_bounds(kid, Rect::from_origin_size(0, y, width, h));
                y += h;
            }
        }
    }

    /// Resizes its first child from inside the pack, which would recurse
    /// forever without the repack guard.
    struct Greedy {
        calls: u32,
    }

    impl Layout for Greedy {
        fn pack(&mut self, tree: &mut SurfaceTree, container: NodeId) {
            self.calls += 1;
            if let Some(kid) = tree.first_child(container) {
                let (w, h) = tree.size(kid);
                tree.resize(kid, w + 1, h);
                // Ask for another pass of this very container.
                tree.pack(container);
            }
            assert!(self.calls <= MAX_REPACK_PASSES);
        }
    }

    #[test]
    fn layout_positions_children_and_blocks_direct_moves() {
        let mut tree = SurfaceTree::new();
        let m = tree.create_master(rect(0, 0, 100, 100), Theme::CLASSIC);
        let a = tree.create_node(rect(0, 0, 0, 0));
        let b = tree.create_node(rect(0, 0, 0, 0));
        tree.add_child(m, a, Placement::Front);
        tree.add_child(m, b, Placement::Front);
        tree.set_layout_hints(a, Some(LayoutHints { width: 0, height: 20, weight: 1 }));
        tree.set_layout_hints(b, Some(LayoutHints { width: 0, height: 30, weight: 1 }));
        tree.load(m);
        tree.set_layout(m, Some(Box::new(Column)));

        assert_eq!(tree.logical(a), rect(0, 0, 100, 20));
        assert_eq!(tree.logical(b), rect(0, 20, 100, 50));

        // Direct moves are refused for laid-out nodes.
        tree.move_to(b, 50, 50);
        assert_eq!(tree.logical(b), rect(0, 20, 100, 50));

        // Resizing goes through the hints and repacks.
        tree.resize(a, 0, 5);
        assert_eq!(tree.logical(a), rect(0, 0, 100, 5));
        assert_eq!(tree.logical(b), rect(0, 5, 100, 35));
    }

    #[test]
    fn reentrant_pack_is_bounded() {
        let mut tree = SurfaceTree::new();
        let m = tree.create_master(rect(0, 0, 100, 100), Theme::CLASSIC);
        let kid = tree.create_node(rect(0, 0, 10, 10));
        tree.add_child(m, kid, Placement::Front);
        tree.load(m);
        tree.set_layout(m, Some(Box::new(Greedy { calls: 0 })));

        // One extra pixel per pass, four passes.
        assert_eq!(tree.size(kid), (14, 10));
        let state = tree.state(m);
        assert!(!state.contains(NodeState::PACKING));
        assert!(!state.contains(NodeState::REPACK));
    }

    #[test]
    fn pack_requires_loaded() {
        let mut tree = SurfaceTree::new();
        let m = tree.create_master(rect(0, 0, 100, 100), Theme::CLASSIC);
        let kid = tree.create_node(rect(0, 0, 10, 10));
        tree.add_child(m, kid, Placement::Front);
        tree.set_layout_hints(kid, Some(LayoutHints { width: 0, height: 20, weight: 1 }));
        tree.set_layout(m, Some(Box::new(Column)));
        // Not loaded: nothing was packed yet.
        assert_eq!(tree.logical(kid), rect(0, 0, 10, 10));
        tree.load(m);
        assert_eq!(tree.logical(kid), rect(0, 0, 100, 20));
    }
}
