// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Attaching, loading, unloading, removing, hiding and showing nodes.
//!
//! Loading runs in two passes over a subtree. The first goes parents before
//! children: sizes are settled, buffers allocated and layouts packed. The
//! second goes children before parents and makes each node active. Unloading
//! mirrors both passes.

use crate::rect::Rect;
use crate::region::Region;
use crate::surface::Pixmap;
use crate::trace::{LifecycleEvent, LifecycleKind};

use super::flags::{NodeFlags, NodeState};
use super::id::{INVALID, NodeId};
use super::kind::Placement;
use super::store::SurfaceTree;

impl SurfaceTree {
    /// Links a detached `child` under `parent`.
    ///
    /// Returns `false` (and does nothing) if `child` already has a parent,
    /// is loaded on its own, or is `parent` or one of its ancestors. When
    /// `parent` is active the child is loaded and painted right away.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId, placement: Placement) -> bool {
        self.validate(parent);
        self.validate(child);
        let (p, c) = (parent.idx, child.idx);
        if self.parent[c as usize] != INVALID
            || self.has_state(c, NodeState::LOADED)
            || self.contains(c, p)
        {
            return false;
        }

        self.tree_altered = true;
        self.link(p, c, placement);
        self.update_coords(c);
        self.tracer.lifecycle(&LifecycleEvent {
            node: child,
            kind: LifecycleKind::Attached,
        });
        if !self.has_state(p, NodeState::VISIBLE) {
            self.cascade_state(c, NodeState::VISIBLE, false);
        }

        if self.has_state(p, NodeState::ACTIVE) {
            self.begin_delegation();
            self.load_subtree(c);
            self.update_vislist_behind(c);
            self.display_family(c);
            self.end_delegation();
        }
        true
    }

    /// Loads a root and its whole subtree, then paints it.
    ///
    /// Returns `false` for attached nodes (they load with their parent) and
    /// for nodes that are already loaded.
    pub fn load(&mut self, id: NodeId) -> bool {
        self.validate(id);
        let idx = id.idx;
        if self.parent[idx as usize] != INVALID || self.has_state(idx, NodeState::LOADED) {
            return false;
        }
        self.begin_delegation();
        self.load_subtree(idx);
        self.display_family(idx);
        self.end_delegation();
        true
    }

    /// Unloads a root and its whole subtree, freeing every buffer.
    ///
    /// Returns `false` for attached nodes (use [`remove`](Self::remove)) and
    /// for nodes that are not loaded.
    pub fn unload(&mut self, id: NodeId) -> bool {
        self.validate(id);
        let idx = id.idx;
        if self.parent[idx as usize] != INVALID || !self.has_state(idx, NodeState::LOADED) {
            return false;
        }
        self.unload_subtree(idx);
        true
    }

    /// Detaches the node from its parent, unloading it if needed, and
    /// repaints what it used to cover.
    ///
    /// Returns `false` for roots.
    pub fn remove(&mut self, id: NodeId) -> bool {
        self.validate(id);
        let idx = id.idx;
        let p = self.parent[idx as usize];
        if p == INVALID {
            return false;
        }
        let gap_rect = if self.is_shown(idx) {
            self.clipped[idx as usize]
        } else {
            Rect::EMPTY
        };
        let old_prev = self.prev_sibling[idx as usize];
        let old_next = self.next_sibling[idx as usize];

        self.begin_delegation();
        self.tree_altered = true;
        self.extract(idx);
        if self.has_state(idx, NodeState::LOADED) {
            self.unload_subtree(idx);
        }
        self.update_coords(idx);

        if self.has_state(p, NodeState::ACTIVE) && !gap_rect.is_empty() {
            if old_prev != INVALID {
                self.update_vislist_behind(old_prev);
            } else {
                self.update_vislist(p);
            }
            let mut gap = Region::from_rect(gap_rect);
            self.fill_gap(p, &mut gap, old_next);
        }
        self.tracer.lifecycle(&LifecycleEvent {
            node: id,
            kind: LifecycleKind::Removed,
        });
        self.end_delegation();
        true
    }

    /// Hides the node and its descendants, repainting what they covered.
    ///
    /// A node already hidden through an ancestor stays hidden when that
    /// ancestor is shown again.
    pub fn hide(&mut self, id: NodeId) {
        self.validate(id);
        let idx = id.idx;
        if !self.has_state(idx, NodeState::VISIBLE) {
            self.set_state(idx, NodeState::SHOULD_BE_VISIBLE, false);
            return;
        }
        let gap_rect = if self.is_shown(idx) {
            self.clipped[idx as usize]
        } else {
            Rect::EMPTY
        };
        self.tree_altered = true;
        self.cascade_state(idx, NodeState::VISIBLE, false);
        self.set_state(idx, NodeState::SHOULD_BE_VISIBLE, false);
        self.tracer.lifecycle(&LifecycleEvent {
            node: id,
            kind: LifecycleKind::Hidden,
        });
        if !self.has_state(idx, NodeState::ACTIVE) {
            return;
        }

        self.begin_delegation();
        self.update_vislist_behind(idx);
        if self.is_spy(idx) {
            self.update_sub(idx);
        }
        let p = self.parent[idx as usize];
        if p != INVALID {
            let mut gap = Region::from_rect(gap_rect);
            self.fill_gap(p, &mut gap, idx);
        }
        self.end_delegation();
    }

    /// Shows the node again, restoring descendants to the visibility they
    /// had before being hidden.
    ///
    /// Nodes flagged [`NodeFlags::INVISIBLE`] stay hidden. Under a hidden
    /// parent, the node is only marked to be shown together with it.
    pub fn show(&mut self, id: NodeId) {
        self.validate(id);
        let idx = id.idx;
        if self.flags[idx as usize].contains(NodeFlags::INVISIBLE)
            || self.has_state(idx, NodeState::VISIBLE)
        {
            return;
        }
        self.set_state(idx, NodeState::SHOULD_BE_VISIBLE, true);
        let p = self.parent[idx as usize];
        if p != INVALID && !self.has_state(p, NodeState::VISIBLE) {
            return;
        }
        self.tree_altered = true;
        self.restore_visibility(idx);
        self.tracer.lifecycle(&LifecycleEvent {
            node: id,
            kind: LifecycleKind::Shown,
        });
        if !self.has_state(idx, NodeState::ACTIVE) {
            return;
        }

        self.begin_delegation();
        self.update_vislist_behind(idx);
        self.refresh_family_spies(idx);
        self.display_family(idx);
        self.end_delegation();
    }

    // -- Internals --

    /// Reallocates a loaded master's buffer to its current size.
    pub(crate) fn realloc_master_buffer(&mut self, idx: u32) {
        if !self.has_state(idx, NodeState::LOADED) {
            return;
        }
        let r = self.logical[idx as usize];
        if let Some(data) = self.masters[idx as usize].as_mut() {
            data.buffer = Some(Pixmap::new(r.width(), r.height()));
        }
    }

    pub(crate) fn load_subtree(&mut self, idx: u32) {
        self.pre_load_all(idx);
        self.post_load_all(idx);
    }

    fn pre_load_all(&mut self, idx: u32) {
        self.set_state(idx, NodeState::LOADING, true);
        let r = self.logical[idx as usize];
        if r.is_empty() {
            let (w, h) = self.normal_size(idx);
            if w > 0 && h > 0 {
                self.logical[idx as usize] = Rect::from_origin_size(r.left, r.top, w, h);
            }
        }
        let id = self.id_at(idx);
        if let Some(mut behavior) = self.behavior[idx as usize].take() {
            behavior.pre_load(id);
            if self.behavior[idx as usize].is_none() {
                self.behavior[idx as usize] = Some(behavior);
            }
        }
        self.set_state(idx, NodeState::LOADED, true);
        self.realloc_master_buffer(idx);
        self.update_coords(idx);
        self.pack(id);

        let mut child = self.first_child[idx as usize];
        while child != INVALID {
            let next = self.next_sibling[child as usize];
            self.pre_load_all(child);
            child = next;
        }
    }

    fn post_load_all(&mut self, idx: u32) {
        let mut child = self.first_child[idx as usize];
        while child != INVALID {
            let next = self.next_sibling[child as usize];
            self.post_load_all(child);
            child = next;
        }

        self.set_state(idx, NodeState::ACTIVE, true);
        if self.is_spy(idx) {
            self.alloc_sub_buffer(idx);
        }
        let id = self.id_at(idx);
        if let Some(mut behavior) = self.behavior[idx as usize].take() {
            behavior.post_load(id);
            if self.behavior[idx as usize].is_none() {
                self.behavior[idx as usize] = Some(behavior);
            }
        }
        self.set_state(idx, NodeState::LOADING | NodeState::FIRST_LOAD, false);
        self.update_vislist(idx);
        self.tracer.lifecycle(&LifecycleEvent {
            node: id,
            kind: LifecycleKind::Loaded,
        });
    }

    fn unload_subtree(&mut self, idx: u32) {
        self.pre_unload_all(idx);
        self.post_unload_all(idx);
    }

    fn pre_unload_all(&mut self, idx: u32) {
        self.set_state(idx, NodeState::ACTIVE, false);
        let id = self.id_at(idx);
        if let Some(mut behavior) = self.behavior[idx as usize].take() {
            behavior.pre_unload(id);
            if self.behavior[idx as usize].is_none() {
                self.behavior[idx as usize] = Some(behavior);
            }
        }
        if self.is_spy(idx) {
            self.free_sub_buffer(idx);
        }
        self.visible[idx as usize] = Region::new();

        let mut child = self.first_child[idx as usize];
        while child != INVALID {
            let next = self.next_sibling[child as usize];
            self.pre_unload_all(child);
            child = next;
        }
    }

    fn post_unload_all(&mut self, idx: u32) {
        let mut child = self.first_child[idx as usize];
        while child != INVALID {
            let next = self.next_sibling[child as usize];
            self.post_unload_all(child);
            child = next;
        }

        let id = self.id_at(idx);
        if let Some(mut behavior) = self.behavior[idx as usize].take() {
            behavior.post_unload(id);
            if self.behavior[idx as usize].is_none() {
                self.behavior[idx as usize] = Some(behavior);
            }
        }
        if let Some(data) = self.masters[idx as usize].as_mut() {
            data.buffer = None;
        }
        self.set_state(idx, NodeState::LOADED, false);
        self.tracer.lifecycle(&LifecycleEvent {
            node: id,
            kind: LifecycleKind::Unloaded,
        });
    }

    /// Makes `idx` visible, then each descendant that was visible before its
    /// ancestors were hidden.
    fn restore_visibility(&mut self, idx: u32) {
        let mut stack = alloc::vec![idx];
        while let Some(n) = stack.pop() {
            let wanted = self.has_state(n, NodeState::SHOULD_BE_VISIBLE)
                && !self.flags[n as usize].contains(NodeFlags::INVISIBLE);
            if !wanted {
                continue;
            }
            self.set_state(n, NodeState::VISIBLE, true);
            let mut child = self.first_child[n as usize];
            while child != INVALID {
                stack.push(child);
                child = self.next_sibling[child as usize];
            }
        }
    }

    /// Recomputes the sub-buffer of every spy in the family.
    fn refresh_family_spies(&mut self, idx: u32) {
        let mut stack = alloc::vec![idx];
        while let Some(n) = stack.pop() {
            if self.is_spy(n) {
                self.update_sub(n);
            }
            let mut child = self.first_child[n as usize];
            while child != INVALID {
                stack.push(child);
                child = self.next_sibling[child as usize];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use crate::behavior::{Behavior, SurfaceInfo};
    use crate::surface::{GraphicsContext, Theme, rgb};

    use super::*;

    type Log = Rc<RefCell<Vec<(&'static str, NodeId)>>>;

    struct Recorder {
        log: Log,
        size: (i32, i32),
    }

    impl Behavior for Recorder {
        fn draw(&self, gc: &mut GraphicsContext<'_>, surface: &SurfaceInfo<'_>) {
            gc.fill_rect(surface.local_bounds(), RED);
        }

        fn normal_size(&self) -> (i32, i32) {
            self.size
        }

        fn pre_load(&mut self, id: NodeId) {
            self.log.borrow_mut().push(("pre_load", id));
        }

        fn post_load(&mut self, id: NodeId) {
            self.log.borrow_mut().push(("post_load", id));
        }

        fn pre_unload(&mut self, id: NodeId) {
            self.log.borrow_mut().push(("pre_unload", id));
        }

        fn post_unload(&mut self, id: NodeId) {
            self.log.borrow_mut().push(("post_unload", id));
        }
    }

    const RED: u32 = rgb(255, 0, 0);

    fn rect(l: i32, t: i32, r: i32, b: i32) -> Rect {
        Rect::new(l, t, r, b)
    }

    fn recorded(tree: &mut SurfaceTree, id: NodeId, log: &Log) {
        tree.set_behavior(
            id,
            Box::new(Recorder {
                log: log.clone(),
                size: (0, 0),
            }),
        );
    }

    #[test]
    fn load_runs_both_phases_in_order() {
        let log = Log::default();
        let mut tree = SurfaceTree::new();
        let m = tree.create_master(rect(0, 0, 50, 50), Theme::CLASSIC);
        let a = tree.create_node(rect(0, 0, 10, 10));
        let a1 = tree.create_node(rect(0, 0, 5, 5));
        recorded(&mut tree, m, &log);
        recorded(&mut tree, a, &log);
        recorded(&mut tree, a1, &log);
        tree.add_child(m, a, Placement::Front);
        tree.add_child(a, a1, Placement::Front);

        assert!(tree.load(m));
        assert!(!tree.load(m));
        let order: Vec<_> = log.borrow().clone();
        assert_eq!(
            order,
            [
                ("pre_load", m),
                ("pre_load", a),
                ("pre_load", a1),
                ("post_load", a1),
                ("post_load", a),
                ("post_load", m),
            ]
        );
        assert!(tree.is_active(a1));
        assert!(!tree.state(m).contains(NodeState::FIRST_LOAD));
        assert_eq!(tree.master_buffer(m).map(|b| b.width()), Some(50));
    }

    #[test]
    fn unload_mirrors_load_and_frees_buffers() {
        let log = Log::default();
        let mut tree = SurfaceTree::new();
        let m = tree.create_master(rect(0, 0, 50, 50), Theme::CLASSIC);
        let a = tree.create_node(rect(0, 0, 10, 10));
        recorded(&mut tree, m, &log);
        recorded(&mut tree, a, &log);
        tree.add_child(m, a, Placement::Front);
        tree.load(m);
        log.borrow_mut().clear();

        assert!(!tree.unload(a));
        assert!(tree.unload(m));
        let order: Vec<_> = log.borrow().clone();
        assert_eq!(
            order,
            [
                ("pre_unload", m),
                ("pre_unload", a),
                ("post_unload", a),
                ("post_unload", m),
            ]
        );
        assert!(tree.master_buffer(m).is_none());
        assert!(!tree.is_active(a));
        assert!(tree.visible_region(a).is_empty());
        assert!(tree.destroy(m));
    }

    #[test]
    fn zero_sized_nodes_take_their_normal_size() {
        let mut tree = SurfaceTree::new();
        let m = tree.create_master(rect(0, 0, 50, 50), Theme::CLASSIC);
        let a = tree.create_node(rect(5, 5, 5, 5));
        tree.set_behavior(
            a,
            Box::new(Recorder {
                log: Log::default(),
                size: (12, 8),
            }),
        );
        tree.add_child(m, a, Placement::Front);
        tree.load(m);
        assert_eq!(tree.logical(a), rect(5, 5, 17, 13));
        assert!(tree.is_visible(a));
    }

    #[test]
    fn adding_to_an_active_parent_loads_and_paints() {
        let mut tree = SurfaceTree::new();
        let m = tree.create_master(rect(0, 0, 50, 50), Theme::CLASSIC);
        tree.load(m);
        let a = tree.create_node(rect(10, 10, 20, 20));
        recorded(&mut tree, a, &Log::default());
        assert!(tree.add_child(m, a, Placement::Front));
        assert!(tree.is_active(a));
        assert_eq!(tree.master_buffer(m).unwrap().pixel(15, 15), Some(RED));
        assert_eq!(tree.visible_region(m).area(), 2_500 - 100);
    }

    #[test]
    fn remove_repaints_the_gap() {
        let mut tree = SurfaceTree::new();
        let m = tree.create_master(rect(0, 0, 50, 50), Theme::CLASSIC);
        let a = tree.create_node(rect(10, 10, 20, 20));
        recorded(&mut tree, a, &Log::default());
        tree.add_child(m, a, Placement::Front);
        tree.load(m);
        assert_eq!(tree.master_buffer(m).unwrap().pixel(15, 15), Some(RED));

        assert!(tree.remove(a));
        assert!(!tree.remove(a));
        assert!(!tree.is_active(a));
        assert_eq!(tree.parent(a), None);
        assert_eq!(tree.visible_region(m).area(), 2_500);
        // The master has no behavior, so nothing repaints the gap.
        assert_eq!(tree.master_buffer(m).unwrap().pixel(15, 15), Some(RED));
        assert!(tree.destroy(a));
    }

    #[test]
    fn hide_and_show_restore_descendant_visibility() {
        let mut tree = SurfaceTree::new();
        let m = tree.create_master(rect(0, 0, 50, 50), Theme::CLASSIC);
        let panel = tree.create_node(rect(0, 0, 40, 40));
        let shown = tree.create_node(rect(0, 0, 10, 10));
        let hidden = tree.create_node(rect(10, 10, 20, 20));
        tree.add_child(m, panel, Placement::Front);
        tree.add_child(panel, shown, Placement::Front);
        tree.add_child(panel, hidden, Placement::Front);
        tree.load(m);

        tree.hide(hidden);
        tree.hide(panel);
        assert!(!tree.is_visible(shown));
        assert_eq!(tree.visible_region(m).area(), 2_500);

        tree.show(panel);
        assert!(tree.is_visible(panel));
        assert!(tree.is_visible(shown));
        assert!(!tree.is_visible(hidden));
        assert_eq!(tree.visible_region(panel).area(), 1_600 - 100);
    }

    #[test]
    fn children_of_hidden_parents_start_hidden() {
        let mut tree = SurfaceTree::new();
        let m = tree.create_master(rect(0, 0, 50, 50), Theme::CLASSIC);
        let panel = tree.create_node(rect(0, 0, 40, 40));
        tree.add_child(m, panel, Placement::Front);
        tree.load(m);
        tree.hide(panel);

        let late = tree.create_node(rect(0, 0, 10, 10));
        tree.add_child(panel, late, Placement::Front);
        assert!(!tree.is_visible(late));
        tree.show(late);
        assert!(!tree.is_visible(late));
        tree.show(panel);
        assert!(tree.is_visible(late));
    }

    #[test]
    fn invisible_flag_hides_and_blocks_show() {
        let mut tree = SurfaceTree::new();
        let m = tree.create_master(rect(0, 0, 50, 50), Theme::CLASSIC);
        let a = tree.create_node(rect(0, 0, 10, 10));
        tree.add_child(m, a, Placement::Front);
        tree.load(m);
        tree.set_flag(a, NodeFlags::INVISIBLE, true);
        assert!(!tree.is_visible(a));
        tree.show(a);
        assert!(!tree.is_visible(a));
        tree.set_flag(a, NodeFlags::INVISIBLE, false);
        tree.show(a);
        assert!(tree.is_visible(a));
    }
}
