// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays node storage with allocation, topology, and flag
//! management.

use alloc::boxed::Box;
use alloc::vec::Vec;

use understory_dirty::{CycleHandling, DirtyTracker};

use crate::behavior::{Behavior, Layout, LayoutHints};
use crate::config::EngineConfig;
use crate::diag::Diagnostics;
use crate::rect::Rect;
use crate::region::Region;
use crate::surface::{Pixmap, Theme};
use crate::trace::{LifecycleEvent, LifecycleKind, TraceSink, Tracer};

use super::flags::{NodeFlags, NodeState};
use super::geometry::Insets;
use super::id::{INVALID, NodeId};
use super::kind::{MasterData, NodeKind, Placement, SpyData, SpyMode};
use super::traverse::Children;

/// Struct-of-arrays storage for every surface, plus the engine state that
/// operates on them.
///
/// Nodes are addressed by [`NodeId`] handles. Internally, each node occupies
/// a slot in parallel arrays. Destroyed nodes are recycled via a free list,
/// and generation counters prevent stale handle access.
///
/// Siblings are linked back to front: a parent's first child is painted
/// first (furthest back) and each `next_sibling` is painted over its
/// predecessor.
pub struct SurfaceTree {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) first_child: Vec<u32>,
    pub(crate) next_sibling: Vec<u32>,
    pub(crate) prev_sibling: Vec<u32>,
    pub(crate) master: Vec<u32>,

    // -- Geometry --
    pub(crate) logical: Vec<Rect>,
    pub(crate) physical: Vec<Rect>,
    pub(crate) clipped: Vec<Rect>,
    pub(crate) estate: Vec<Insets>,
    pub(crate) visible: Vec<Region>,

    // -- Flags --
    pub(crate) flags: Vec<NodeFlags>,
    pub(crate) state: Vec<NodeState>,
    pub(crate) kind: Vec<NodeKind>,

    // -- Collaborators --
    pub(crate) behavior: Vec<Option<Box<dyn Behavior>>>,
    pub(crate) layout: Vec<Option<Box<dyn Layout>>>,
    pub(crate) hints: Vec<Option<LayoutHints>>,
    pub(crate) masters: Vec<Option<MasterData>>,
    pub(crate) spies: Vec<Option<SpyData>>,
    pub(crate) display_count: Vec<u32>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Paint order cache --
    pub(crate) paint_order: Vec<u32>,
    pub(crate) order_pos: Vec<u32>,
    pub(crate) next_spy: Vec<u32>,
    pub(crate) spy_chain: Vec<u32>,
    pub(crate) order_dirty: bool,

    // -- Display delegation --
    pub(crate) dirty: DirtyTracker<u32>,
    pub(crate) delegation_depth: u32,

    // -- Bookkeeping --
    pub(crate) tree_altered: bool,
    pub(crate) config: EngineConfig,
    pub(crate) diagnostics: Diagnostics,
    pub(crate) tracer: Tracer,
}

impl core::fmt::Debug for SurfaceTree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SurfaceTree")
            .field("len", &self.len)
            .field("free", &self.free_list.len())
            .field("delegation_depth", &self.delegation_depth)
            .field("config", &self.config)
            .field("diagnostics", &self.diagnostics)
            .finish_non_exhaustive()
    }
}

impl Default for SurfaceTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SurfaceTree {
    /// Creates an empty tree with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EngineConfig::new())
    }

    /// Creates an empty tree with the given configuration.
    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            parent: Vec::new(),
            first_child: Vec::new(),
            next_sibling: Vec::new(),
            prev_sibling: Vec::new(),
            master: Vec::new(),
            logical: Vec::new(),
            physical: Vec::new(),
            clipped: Vec::new(),
            estate: Vec::new(),
            visible: Vec::new(),
            flags: Vec::new(),
            state: Vec::new(),
            kind: Vec::new(),
            behavior: Vec::new(),
            layout: Vec::new(),
            hints: Vec::new(),
            masters: Vec::new(),
            spies: Vec::new(),
            display_count: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            paint_order: Vec::new(),
            order_pos: Vec::new(),
            next_spy: Vec::new(),
            spy_chain: Vec::new(),
            order_dirty: true,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            delegation_depth: 0,
            tree_altered: false,
            config,
            diagnostics: Diagnostics::default(),
            tracer: Tracer::none(),
        }
    }

    // -- Configuration and instrumentation --

    /// Returns the engine configuration.
    #[must_use]
    pub fn config(&self) -> EngineConfig {
        self.config
    }

    /// Replaces the engine configuration.
    pub fn set_config(&mut self, config: EngineConfig) {
        self.config = config;
    }

    /// Installs a trace sink, replacing any previous one.
    ///
    /// Without the `trace` feature the sink is dropped.
    pub fn set_trace_sink(&mut self, sink: Box<dyn TraceSink>) {
        self.tracer = Tracer::new(sink);
    }

    /// Removes and returns the installed trace sink.
    pub fn take_trace_sink(&mut self) -> Option<Box<dyn TraceSink>> {
        self.tracer.take()
    }

    /// Returns the engine counters.
    #[must_use]
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Zeroes the engine counters and every per-node display count.
    pub fn reset_diagnostics(&mut self) {
        self.diagnostics.reset();
        self.display_count.fill(0);
    }

    /// Number of times the node has been painted through a display since
    /// creation or the last [`reset_diagnostics`](Self::reset_diagnostics).
    #[must_use]
    pub fn display_count(&self, id: NodeId) -> u32 {
        self.validate(id);
        self.display_count[id.idx as usize]
    }

    /// Returns and clears the "tree altered" marker.
    ///
    /// Set by every structural or geometric mutation, so an input dispatcher
    /// iterating the tree can tell that its walk may be invalid.
    pub fn take_tree_altered(&mut self) -> bool {
        core::mem::take(&mut self.tree_altered)
    }

    // -- Allocation API --

    /// Creates a detached plain node with the given logical rectangle.
    ///
    /// Negative sizes are clamped to zero.
    pub fn create_node(&mut self, rect: Rect) -> NodeId {
        self.alloc(rect, NodeKind::Plain)
    }

    /// Creates a detached master owning a buffer of its own size, drawn with
    /// `theme`.
    pub fn create_master(&mut self, rect: Rect, theme: Theme) -> NodeId {
        let id = self.alloc(rect, NodeKind::Master);
        self.masters[id.idx as usize] = Some(MasterData {
            buffer: None,
            theme,
        });
        id
    }

    /// Creates a detached spy surface.
    pub fn create_spy(&mut self, rect: Rect, mode: SpyMode) -> NodeId {
        let id = self.alloc(rect, NodeKind::Spy);
        self.spies[id.idx as usize] = Some(SpyData { buffer: None, mode });
        id
    }

    /// Destroys a detached, unloaded node together with its whole subtree.
    ///
    /// Returns `false` (and does nothing) if the node still has a parent or
    /// is loaded.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn destroy(&mut self, id: NodeId) -> bool {
        self.validate(id);
        let idx = id.idx;
        if self.parent[idx as usize] != INVALID
            || self.state[idx as usize].contains(NodeState::LOADED)
        {
            return false;
        }

        let mut stack = alloc::vec![idx];
        while let Some(n) = stack.pop() {
            let mut child = self.first_child[n as usize];
            while child != INVALID {
                stack.push(child);
                child = self.next_sibling[child as usize];
            }
            self.tracer.lifecycle(&LifecycleEvent {
                node: self.id_at(n),
                kind: LifecycleKind::Destroyed,
            });
            self.release_slot(n);
        }
        self.order_dirty = true;
        self.tree_altered = true;
        true
    }

    /// Returns whether the given handle refers to a live node.
    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        id.idx < self.len && self.generation[id.idx as usize] == id.generation
    }

    // -- Collaborators --

    /// Installs the node's paint behavior, replacing any previous one.
    pub fn set_behavior(&mut self, id: NodeId, behavior: Box<dyn Behavior>) {
        self.validate(id);
        self.behavior[id.idx as usize] = Some(behavior);
    }

    /// Removes and returns the node's paint behavior.
    pub fn take_behavior(&mut self, id: NodeId) -> Option<Box<dyn Behavior>> {
        self.validate(id);
        self.behavior[id.idx as usize].take()
    }

    /// Returns the node's paint behavior.
    #[must_use]
    pub fn behavior(&self, id: NodeId) -> Option<&dyn Behavior> {
        self.validate(id);
        self.behavior[id.idx as usize].as_deref()
    }

    /// Installs the layout that positions the node's children and packs.
    pub fn set_layout(&mut self, id: NodeId, layout: Option<Box<dyn Layout>>) {
        self.validate(id);
        self.layout[id.idx as usize] = layout;
        self.pack(id);
    }

    /// Returns the node's layout hints.
    #[must_use]
    pub fn layout_hints(&self, id: NodeId) -> Option<LayoutHints> {
        self.validate(id);
        self.hints[id.idx as usize]
    }

    /// Replaces the node's layout hints and repacks its parent.
    pub fn set_layout_hints(&mut self, id: NodeId, hints: Option<LayoutHints>) {
        self.validate(id);
        self.hints[id.idx as usize] = hints;
        let p = self.parent[id.idx as usize];
        if p != INVALID {
            self.pack(self.id_at(p));
        }
    }

    /// Returns the theme of the node's master (or its own, for a master).
    #[must_use]
    pub fn theme(&self, id: NodeId) -> Option<&Theme> {
        self.validate(id);
        let idx = id.idx;
        let m = if self.kind[idx as usize] == NodeKind::Master {
            idx
        } else {
            self.master[idx as usize]
        };
        self.master_data(m).map(|d| &d.theme)
    }

    /// Returns a master's pixel buffer, once loaded.
    #[must_use]
    pub fn master_buffer(&self, id: NodeId) -> Option<&Pixmap> {
        self.validate(id);
        self.master_data(id.idx).and_then(|d| d.buffer.as_ref())
    }

    /// Returns a spy surface's sub-buffer, once loaded.
    #[must_use]
    pub fn sub_buffer(&self, id: NodeId) -> Option<&Pixmap> {
        self.validate(id);
        self.spy_data(id.idx).and_then(|d| d.buffer.as_ref())
    }

    // -- Navigation API --

    /// Returns the role of a node.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.validate(id);
        self.kind[id.idx as usize]
    }

    /// Returns the parent of a node, if any.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.validate(id);
        self.opt_id(self.parent[id.idx as usize])
    }

    /// Returns the back-most child.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.validate(id);
        self.opt_id(self.first_child[id.idx as usize])
    }

    /// Returns the front-most child.
    #[must_use]
    pub fn front_child(&self, id: NodeId) -> Option<NodeId> {
        self.validate(id);
        self.opt_id(self.front_child_idx(id.idx))
    }

    /// Returns the sibling painted immediately over this node.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.validate(id);
        self.opt_id(self.next_sibling[id.idx as usize])
    }

    /// Returns the sibling painted immediately under this node.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.validate(id);
        self.opt_id(self.prev_sibling[id.idx as usize])
    }

    /// Returns an iterator over the direct children, back to front.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Children<'_> {
        self.validate(id);
        Children::new(self, self.first_child[id.idx as usize])
    }

    /// Returns the next node in paint order within the same master: the
    /// first child, else the next sibling, else the nearest ancestor's next
    /// sibling.
    #[must_use]
    pub fn paint_successor(&self, id: NodeId) -> Option<NodeId> {
        self.validate(id);
        self.opt_id(self.superior(id.idx))
    }

    /// Returns `true` if `ancestor` is `node` or one of its ancestors.
    #[must_use]
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.validate(ancestor);
        self.validate(node);
        self.contains(ancestor.idx, node.idx)
    }

    /// Returns the nearest master above the node.
    #[must_use]
    pub fn master_of(&self, id: NodeId) -> Option<NodeId> {
        self.validate(id);
        self.opt_id(self.master[id.idx as usize])
    }

    /// Returns every live node without a parent, in slot order.
    #[must_use]
    pub fn roots(&self) -> Vec<NodeId> {
        (0..self.len)
            .filter(|&idx| {
                self.parent[idx as usize] == INVALID && !self.free_list.contains(&idx)
            })
            .map(|idx| self.id_at(idx))
            .collect()
    }

    /// Zero-based position among siblings, counted from the back.
    #[must_use]
    pub fn z_index(&self, id: NodeId) -> u32 {
        self.validate(id);
        let mut count = 0;
        let mut n = self.prev_sibling[id.idx as usize];
        while n != INVALID {
            count += 1;
            n = self.prev_sibling[n as usize];
        }
        count
    }

    // -- Flags API --

    /// Returns the caller-controlled flags.
    #[must_use]
    pub fn flags(&self, id: NodeId) -> NodeFlags {
        self.validate(id);
        self.flags[id.idx as usize]
    }

    /// Sets or clears caller-controlled flags on one node.
    ///
    /// Setting [`NodeFlags::INVISIBLE`] hides the node.
    pub fn set_flag(&mut self, id: NodeId, flag: NodeFlags, on: bool) {
        self.validate(id);
        self.flags[id.idx as usize].set(flag, on);
        if on && flag.contains(NodeFlags::INVISIBLE) {
            self.hide(id);
        }
    }

    /// Sets or clears caller-controlled flags on a node and all descendants.
    pub fn set_flag_cascade(&mut self, id: NodeId, flag: NodeFlags, on: bool) {
        self.validate(id);
        self.for_each_in_subtree(id.idx, |tree, n| tree.flags[n as usize].set(flag, on));
    }

    /// Returns the engine-maintained state.
    #[must_use]
    pub fn state(&self, id: NodeId) -> NodeState {
        self.validate(id);
        self.state[id.idx as usize]
    }

    /// Returns `true` if the node is visible and not clipped away.
    #[must_use]
    pub fn is_visible(&self, id: NodeId) -> bool {
        self.validate(id);
        self.is_shown(id.idx)
    }

    /// Returns `true` once the node has finished loading.
    #[must_use]
    pub fn is_active(&self, id: NodeId) -> bool {
        self.validate(id);
        self.has_state(id.idx, NodeState::ACTIVE)
    }

    // -- Internal helpers --

    /// Panics if the handle is stale.
    pub(crate) fn validate(&self, id: NodeId) {
        assert!(
            id.idx < self.len && self.generation[id.idx as usize] == id.generation,
            "stale NodeId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }

    #[inline]
    pub(crate) fn id_at(&self, idx: u32) -> NodeId {
        NodeId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    #[inline]
    pub(crate) fn opt_id(&self, idx: u32) -> Option<NodeId> {
        (idx != INVALID).then(|| self.id_at(idx))
    }

    #[inline]
    pub(crate) fn has_state(&self, idx: u32, state: NodeState) -> bool {
        self.state[idx as usize].contains(state)
    }

    #[inline]
    pub(crate) fn set_state(&mut self, idx: u32, state: NodeState, on: bool) {
        self.state[idx as usize].set(state, on);
    }

    /// Sets or clears `state` on `idx` and every descendant.
    pub(crate) fn cascade_state(&mut self, idx: u32, state: NodeState, on: bool) {
        self.for_each_in_subtree(idx, |tree, n| tree.state[n as usize].set(state, on));
    }

    /// Visible and not clipped away.
    #[inline]
    pub(crate) fn is_shown(&self, idx: u32) -> bool {
        let s = self.state[idx as usize];
        s.contains(NodeState::VISIBLE) && !s.contains(NodeState::COMPLETE_CLIP)
    }

    #[inline]
    pub(crate) fn is_master(&self, idx: u32) -> bool {
        self.kind[idx as usize] == NodeKind::Master
    }

    #[inline]
    pub(crate) fn is_spy(&self, idx: u32) -> bool {
        self.kind[idx as usize] == NodeKind::Spy
    }

    pub(crate) fn master_data(&self, idx: u32) -> Option<&MasterData> {
        if idx == INVALID {
            return None;
        }
        self.masters[idx as usize].as_ref()
    }

    pub(crate) fn spy_data(&self, idx: u32) -> Option<&SpyData> {
        if idx == INVALID {
            return None;
        }
        self.spies[idx as usize].as_ref()
    }

    /// The front-most child, or [`INVALID`].
    pub(crate) fn front_child_idx(&self, idx: u32) -> u32 {
        let mut n = self.first_child[idx as usize];
        if n == INVALID {
            return INVALID;
        }
        while self.next_sibling[n as usize] != INVALID {
            n = self.next_sibling[n as usize];
        }
        n
    }

    /// Next sibling, else the nearest ancestor's next sibling, without
    /// leaving the current master.
    pub(crate) fn next_or_uncle(&self, mut idx: u32) -> u32 {
        loop {
            let next = self.next_sibling[idx as usize];
            if next != INVALID {
                return next;
            }
            let p = self.parent[idx as usize];
            if p == INVALID || self.is_master(p) {
                return INVALID;
            }
            idx = p;
        }
    }

    /// Paint-order successor: first child (unless `idx` is a master, whose
    /// children live in another buffer), else [`next_or_uncle`](Self::next_or_uncle).
    pub(crate) fn superior(&self, idx: u32) -> u32 {
        let child = self.first_child[idx as usize];
        if child != INVALID && !self.is_master(idx) {
            return child;
        }
        self.next_or_uncle(idx)
    }

    /// `true` if `ancestor == idx` or `ancestor` is above `idx`.
    pub(crate) fn contains(&self, ancestor: u32, mut idx: u32) -> bool {
        while idx != INVALID {
            if idx == ancestor {
                return true;
            }
            idx = self.parent[idx as usize];
        }
        false
    }

    /// Calls `f` for `root` and every descendant, parents first.
    pub(crate) fn for_each_in_subtree(&mut self, root: u32, mut f: impl FnMut(&mut Self, u32)) {
        let mut stack = alloc::vec![root];
        while let Some(n) = stack.pop() {
            f(self, n);
            let mut child = self.first_child[n as usize];
            while child != INVALID {
                stack.push(child);
                child = self.next_sibling[child as usize];
            }
        }
    }

    /// The master children of `parent` draw into.
    pub(crate) fn master_for_children(&self, parent: u32) -> u32 {
        if self.is_master(parent) {
            parent
        } else {
            self.master[parent as usize]
        }
    }

    /// Points `idx` and its descendants (down to nested masters) at `m`.
    pub(crate) fn set_master_family(&mut self, idx: u32, m: u32) {
        self.master[idx as usize] = m;
        if self.is_master(idx) {
            return;
        }
        let mut child = self.first_child[idx as usize];
        while child != INVALID {
            self.set_master_family(child, m);
            child = self.next_sibling[child as usize];
        }
    }

    /// Links a detached `child` under `parent`.
    pub(crate) fn link(&mut self, parent: u32, child: u32, placement: Placement) {
        self.parent[child as usize] = parent;
        self.prev_sibling[child as usize] = INVALID;
        self.next_sibling[child as usize] = INVALID;
        let first = self.first_child[parent as usize];
        match placement {
            Placement::Back => {
                self.next_sibling[child as usize] = first;
                if first != INVALID {
                    self.prev_sibling[first as usize] = child;
                }
                self.first_child[parent as usize] = child;
            }
            Placement::Front => {
                let last = self.front_child_idx(parent);
                if last == INVALID {
                    self.first_child[parent as usize] = child;
                } else {
                    self.next_sibling[last as usize] = child;
                    self.prev_sibling[child as usize] = last;
                }
            }
        }
        self.set_master_family(child, self.master_for_children(parent));
        self.order_dirty = true;
    }

    /// Links a detached `idx` between `after` and `before` under `parent`.
    pub(crate) fn link_between(&mut self, parent: u32, idx: u32, after: u32, before: u32) {
        self.parent[idx as usize] = parent;
        self.prev_sibling[idx as usize] = after;
        self.next_sibling[idx as usize] = before;
        if before != INVALID {
            self.prev_sibling[before as usize] = idx;
        }
        if after != INVALID {
            self.next_sibling[after as usize] = idx;
        } else {
            self.first_child[parent as usize] = idx;
        }
        self.set_master_family(idx, self.master_for_children(parent));
        self.order_dirty = true;
    }

    /// Removes `idx` from its parent's child list and clears its master.
    pub(crate) fn extract(&mut self, idx: u32) {
        let p = self.parent[idx as usize];
        if p == INVALID {
            return;
        }
        let prev = self.prev_sibling[idx as usize];
        let next = self.next_sibling[idx as usize];

        if prev != INVALID {
            self.next_sibling[prev as usize] = next;
        } else {
            self.first_child[p as usize] = next;
        }
        if next != INVALID {
            self.prev_sibling[next as usize] = prev;
        }

        self.parent[idx as usize] = INVALID;
        self.prev_sibling[idx as usize] = INVALID;
        self.next_sibling[idx as usize] = INVALID;
        self.set_master_family(idx, INVALID);
        self.order_dirty = true;
    }

    fn alloc(&mut self, rect: Rect, kind: NodeKind) -> NodeId {
        let rect = rect.clamped();
        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot; the generation was bumped on release.
            let i = idx as usize;
            self.parent[i] = INVALID;
            self.first_child[i] = INVALID;
            self.next_sibling[i] = INVALID;
            self.prev_sibling[i] = INVALID;
            self.master[i] = INVALID;
            self.logical[i] = rect;
            self.physical[i] = rect;
            self.clipped[i] = rect;
            self.estate[i] = Insets::ZERO;
            self.visible[i] = Region::new();
            self.flags[i] = NodeFlags::empty();
            self.state[i] = NodeState::CREATED;
            self.kind[i] = kind;
            self.display_count[i] = 0;
            idx
        } else {
            let idx = self.len;
            self.len += 1;
            self.parent.push(INVALID);
            self.first_child.push(INVALID);
            self.next_sibling.push(INVALID);
            self.prev_sibling.push(INVALID);
            self.master.push(INVALID);
            self.logical.push(rect);
            self.physical.push(rect);
            self.clipped.push(rect);
            self.estate.push(Insets::ZERO);
            self.visible.push(Region::new());
            self.flags.push(NodeFlags::empty());
            self.state.push(NodeState::CREATED);
            self.kind.push(kind);
            self.behavior.push(None);
            self.layout.push(None);
            self.hints.push(None);
            self.masters.push(None);
            self.spies.push(None);
            self.display_count.push(0);
            self.generation.push(0);
            self.order_pos.push(INVALID);
            self.next_spy.push(INVALID);
            self.spy_chain.push(INVALID);
            idx
        };
        if rect.is_empty() {
            self.clipped[idx as usize] = Rect::EMPTY;
            self.set_state(idx, NodeState::COMPLETE_CLIP, true);
        }

        self.order_dirty = true;
        self.diagnostics.nodes_created += 1;
        self.diagnostics.live_nodes += 1;
        self.id_at(idx)
    }

    fn release_slot(&mut self, idx: u32) {
        let i = idx as usize;
        self.behavior[i] = None;
        self.layout[i] = None;
        self.hints[i] = None;
        self.masters[i] = None;
        self.spies[i] = None;
        self.visible[i] = Region::new();
        self.parent[i] = INVALID;
        self.first_child[i] = INVALID;
        self.next_sibling[i] = INVALID;
        self.prev_sibling[i] = INVALID;
        self.master[i] = INVALID;
        self.dirty.remove_key(idx);

        // Bump generation so old handles immediately fail validation.
        self.generation[i] += 1;
        self.free_list.push(idx);
        self.diagnostics.live_nodes -= 1;
    }
}
