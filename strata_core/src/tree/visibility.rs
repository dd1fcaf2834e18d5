// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visible-region computation.
//!
//! A node's visible region is its clipped rectangle minus every shown node
//! painted after it within the same master: its own descendants, later
//! siblings, and later siblings of its ancestors. Walks never leave the
//! master; a master's own region lives in buffer coordinates and is only
//! occluded by its children.

use crate::region::Region;
use crate::trace::VisibilityEvent;

use super::id::{INVALID, NodeId};
use super::store::SurfaceTree;

impl SurfaceTree {
    /// The node's current visible region, in the coordinates of the buffer
    /// it paints into.
    #[must_use]
    pub fn visible_region(&self, id: NodeId) -> &Region {
        self.validate(id);
        &self.visible[id.idx as usize]
    }

    /// Recomputes the visible regions of `id` and all of its descendants.
    ///
    /// The engine keeps regions current on its own; this exists for callers
    /// that toggle [`EngineConfig`](crate::config::EngineConfig) switches
    /// and want a clean slate.
    pub fn refresh_visibility(&mut self, id: NodeId) {
        self.validate(id);
        self.update_family_vislist(id.idx);
    }

    /// The part of `idx` (or of `start`, when given) not covered by shown
    /// nodes painted after it, stopping early at `stop`.
    ///
    /// With a valid `stop`, ancestors of `stop` are descended into instead of
    /// skipped, so only nodes strictly between `idx` and `stop` occlude.
    pub(crate) fn create_occluded_region(
        &self,
        idx: u32,
        stop: u32,
        start: Option<Region>,
    ) -> Region {
        let mut region = start.unwrap_or_else(|| Region::from_rect(self.paint_bounds(idx)));
        let mut cur = if self.is_master(idx) {
            self.first_child[idx as usize]
        } else {
            self.superior(idx)
        };
        while cur != INVALID && cur != stop && !region.is_empty() {
            if self.is_shown(cur) {
                region.occlude_rect(self.clipped[cur as usize]);
            }
            cur = if stop != INVALID && self.contains(cur, stop) {
                self.superior(cur)
            } else {
                self.next_or_uncle(cur)
            };
        }
        region
    }

    /// Recomputes one node's visible region.
    pub(crate) fn update_vislist(&mut self, idx: u32) {
        let mut region = if self.is_shown(idx) {
            self.create_occluded_region(idx, INVALID, None)
        } else {
            Region::new()
        };
        if self.config.sort_fragments {
            region.sort_by_top();
        }
        self.tracer.visibility(&VisibilityEvent {
            node: self.id_at(idx),
            fragments: u32::try_from(region.len()).unwrap_or(u32::MAX),
            area: region.area(),
        });
        self.visible[idx as usize] = region;
    }

    /// Recomputes the visible regions of `idx` and all of its descendants.
    pub(crate) fn update_family_vislist(&mut self, idx: u32) {
        self.update_vislist(idx);
        let mut child = self.first_child[idx as usize];
        while child != INVALID {
            self.update_family_vislist(child);
            child = self.next_sibling[child as usize];
        }
    }

    /// Recomputes every region that `idx` can occlude: its own family, the
    /// families of the siblings behind it, and its parent.
    pub(crate) fn update_vislist_behind(&mut self, idx: u32) {
        self.update_family_vislist(idx);
        let mut prev = self.prev_sibling[idx as usize];
        while prev != INVALID {
            self.update_family_vislist(prev);
            prev = self.prev_sibling[prev as usize];
        }
        let p = self.parent[idx as usize];
        if p != INVALID {
            self.update_vislist(p);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::rect::Rect;
    use crate::surface::Theme;
    use crate::tree::{NodeFlags, Placement};

    use super::*;

    fn rect(l: i32, t: i32, r: i32, b: i32) -> Rect {
        Rect::new(l, t, r, b)
    }

    fn loaded_master() -> (SurfaceTree, NodeId) {
        let mut tree = SurfaceTree::new();
        let m = tree.create_master(rect(0, 0, 200, 200), Theme::CLASSIC);
        tree.load(m);
        (tree, m)
    }

    #[test]
    fn later_siblings_occlude_earlier_ones() {
        let (mut tree, m) = loaded_master();
        let back = tree.create_node(rect(0, 0, 100, 100));
        let front = tree.create_node(rect(50, 50, 150, 150));
        tree.add_child(m, back, Placement::Front);
        tree.add_child(m, front, Placement::Front);

        assert_eq!(tree.visible_region(front).area(), 10_000);
        assert_eq!(tree.visible_region(back).area(), 10_000 - 2_500);
        assert!(!tree.visible_region(back).contains(75, 75));
        assert!(tree.visible_region(back).contains(25, 75));
    }

    #[test]
    fn children_occlude_their_parent() {
        let (mut tree, m) = loaded_master();
        let panel = tree.create_node(rect(0, 0, 100, 100));
        let button = tree.create_node(rect(10, 10, 30, 30));
        tree.add_child(m, panel, Placement::Front);
        tree.add_child(panel, button, Placement::Front);

        assert_eq!(tree.visible_region(panel).area(), 10_000 - 400);
        assert_eq!(tree.visible_region(button).area(), 400);
        // The master's backdrop is covered by the panel.
        assert_eq!(tree.visible_region(m).area(), 40_000 - 10_000);
    }

    #[test]
    fn uncles_occlude_nephews() {
        let (mut tree, m) = loaded_master();
        let a = tree.create_node(rect(0, 0, 100, 100));
        let a1 = tree.create_node(rect(0, 0, 100, 100));
        let b = tree.create_node(rect(50, 0, 150, 100));
        tree.add_child(m, a, Placement::Front);
        tree.add_child(a, a1, Placement::Front);
        tree.add_child(m, b, Placement::Front);

        assert_eq!(tree.visible_region(a1).area(), 5_000);
        assert_eq!(tree.visible_region(a).area(), 0);
    }

    #[test]
    fn hidden_nodes_have_empty_regions_and_do_not_occlude() {
        let (mut tree, m) = loaded_master();
        let back = tree.create_node(rect(0, 0, 100, 100));
        let front = tree.create_node(rect(0, 0, 100, 100));
        tree.add_child(m, back, Placement::Front);
        tree.add_child(m, front, Placement::Front);
        assert!(tree.visible_region(back).is_empty());

        tree.hide(front);
        assert!(tree.visible_region(front).is_empty());
        assert_eq!(tree.visible_region(back).area(), 10_000);

        tree.set_flag(front, NodeFlags::INVISIBLE, true);
        tree.show(front);
        assert!(tree.visible_region(front).is_empty());
    }

    #[test]
    fn fragments_are_sorted_by_top() {
        let (mut tree, m) = loaded_master();
        let back = tree.create_node(rect(0, 0, 90, 90));
        let hole = tree.create_node(rect(30, 30, 60, 60));
        tree.add_child(m, back, Placement::Front);
        tree.add_child(m, hole, Placement::Front);

        let tops: alloc::vec::Vec<i32> = tree.visible_region(back).iter().map(|r| r.top).collect();
        assert!(tops.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(tree.visible_region(back).area(), 8_100 - 900);
    }

    #[test]
    fn stop_limits_the_walk() {
        let (mut tree, m) = loaded_master();
        let a = tree.create_node(rect(0, 0, 100, 100));
        let b = tree.create_node(rect(0, 0, 50, 100));
        let c = tree.create_node(rect(50, 0, 100, 100));
        tree.add_child(m, a, Placement::Front);
        tree.add_child(m, b, Placement::Front);
        tree.add_child(m, c, Placement::Front);

        let between = tree.create_occluded_region(a.idx, c.idx, None);
        assert_eq!(between.area(), 5_000);
        let all = tree.create_occluded_region(a.idx, INVALID, None);
        assert!(all.is_empty());
    }
}
