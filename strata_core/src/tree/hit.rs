// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Point hit testing.

use crate::behavior::SurfaceInfo;

use super::id::{INVALID, NodeId};
use super::store::SurfaceTree;

impl SurfaceTree {
    /// The front-most shown node under `(x, y)` within `root`.
    ///
    /// For a master root the point is in its buffer coordinates, otherwise
    /// in the root's own parent frame. Children are tried front to back
    /// before their parent, and a node's behavior may declare parts of
    /// itself transparent to hits.
    #[must_use]
    pub fn node_at(&self, root: NodeId, x: i32, y: i32) -> Option<NodeId> {
        self.validate(root);
        let idx = root.idx;
        if !self.is_shown(idx) || !self.paint_bounds(idx).contains(x, y) {
            return None;
        }
        self.hit(idx, x, y).map(|n| self.id_at(n))
    }

    /// `(x, y)` is in the frame `idx` paints in, which is also the frame of
    /// its children unless `idx` is a master.
    fn hit(&self, idx: u32, x: i32, y: i32) -> Option<u32> {
        let mut child = self.front_child_idx(idx);
        while child != INVALID {
            if self.is_shown(child) && self.clipped[child as usize].contains(x, y) {
                let found = if self.is_master(child) {
                    let p = self.physical[child as usize];
                    self.hit(child, x - p.left, y - p.top)
                } else {
                    self.hit(child, x, y)
                };
                if found.is_some() {
                    return found;
                }
            }
            child = self.prev_sibling[child as usize];
        }

        let Some(behavior) = self.behavior[idx as usize].as_deref() else {
            return Some(idx);
        };
        let (ox, oy) = self.paint_origin(idx);
        let r = self.logical[idx as usize];
        let info = SurfaceInfo {
            id: self.id_at(idx),
            width: r.width(),
            height: r.height(),
            sub_buffer: self.spy_data(idx).and_then(|d| d.buffer.as_ref()),
        };
        behavior
            .is_opaque_at(x - ox, y - oy, &info)
            .then_some(idx)
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;

    use crate::behavior::Behavior;
    use crate::rect::Rect;
    use crate::surface::{GraphicsContext, Theme};
    use crate::tree::Placement;

    use super::*;

    /// Only the left half catches hits.
    struct LeftHalf;

    impl Behavior for LeftHalf {
        fn draw(&self, _gc: &mut GraphicsContext<'_>, _surface: &SurfaceInfo<'_>) {}

        fn is_opaque_at(&self, x: i32, _y: i32, surface: &SurfaceInfo<'_>) -> bool {
            x < surface.width / 2
        }
    }

    fn rect(l: i32, t: i32, r: i32, b: i32) -> Rect {
        Rect::new(l, t, r, b)
    }

    #[test]
    fn front_most_child_wins() {
        let mut tree = SurfaceTree::new();
        let m = tree.create_master(rect(0, 0, 100, 100), Theme::CLASSIC);
        let back = tree.create_node(rect(0, 0, 60, 60));
        let front = tree.create_node(rect(40, 40, 100, 100));
        let inner = tree.create_node(rect(5, 5, 15, 15));
        tree.add_child(m, back, Placement::Front);
        tree.add_child(m, front, Placement::Front);
        tree.add_child(back, inner, Placement::Front);
        tree.load(m);

        assert_eq!(tree.node_at(m, 50, 50), Some(front));
        assert_eq!(tree.node_at(m, 10, 10), Some(inner));
        assert_eq!(tree.node_at(m, 30, 30), Some(back));
        assert_eq!(tree.node_at(m, 90, 5), Some(m));
        assert_eq!(tree.node_at(m, 150, 5), None);

        tree.hide(front);
        assert_eq!(tree.node_at(m, 50, 50), Some(back));
    }

    #[test]
    fn transparent_parts_fall_through() {
        let mut tree = SurfaceTree::new();
        let m = tree.create_master(rect(0, 0, 100, 100), Theme::CLASSIC);
        let back = tree.create_node(rect(0, 0, 100, 100));
        let glass = tree.create_node(rect(0, 0, 40, 40));
        tree.set_behavior(glass, Box::new(LeftHalf));
        tree.add_child(m, back, Placement::Front);
        tree.add_child(m, glass, Placement::Front);
        tree.load(m);

        assert_eq!(tree.node_at(m, 10, 10), Some(glass));
        assert_eq!(tree.node_at(m, 30, 10), Some(back));
    }

    #[test]
    fn nested_masters_translate_the_point() {
        let mut tree = SurfaceTree::new();
        let outer = tree.create_master(rect(0, 0, 100, 100), Theme::CLASSIC);
        let inner = tree.create_master(rect(50, 50, 90, 90), Theme::CLASSIC);
        let leaf = tree.create_node(rect(0, 0, 10, 10));
        tree.add_child(outer, inner, Placement::Front);
        tree.add_child(inner, leaf, Placement::Front);
        tree.load(outer);

        assert_eq!(tree.node_at(outer, 55, 55), Some(leaf));
        assert_eq!(tree.node_at(outer, 70, 70), Some(inner));
    }
}
