// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The damage propagator.
//!
//! [`SurfaceTree::draw_damage`] repaints whatever lies under a list of dirty
//! rectangles. Starting at one node it paints the overlap of each dirty
//! rectangle with the node's visible region, then walks toward the back of
//! the paint order (children, older siblings, parents) until the list is
//! consumed. The same primitive fills the gap left by a move, a removal, a
//! hide, or a lowered node.

use bitflags::bitflags;

use crate::rect::Overlap;
use crate::region::Region;
use crate::trace::DamagePassEvent;

use super::flags::NodeState;
use super::id::{INVALID, NodeId};
use super::store::SurfaceTree;

bitflags! {
    /// Options steering a damage pass.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct DamageFlags: u8 {
        /// Recurse into the front-most child.
        const CHILDREN = 1 << 0;
        /// Recurse into the previous (older) sibling.
        const PREVIOUS = 1 << 1;
        /// Climb to the parent once the sibling chain is exhausted.
        const PARENT = 1 << 2;
        /// Skip recursion that a bounding test proves useless.
        const OPTIMIZE = 1 << 4;
        /// Drop a dirty rectangle once one fragment contains it entirely.
        const CULL = 1 << 5;
        /// Subtract the node's clipped rectangle after its children ran.
        const OCCLUDE = 1 << 6;
        /// Offer the repainted area to spies in front of the node.
        const SPY_NOTIFY = 1 << 7;
    }
}

impl DamageFlags {
    /// Every option; used to fill gaps.
    pub const FULL: Self = Self::all();
}

impl SurfaceTree {
    /// Repaints the parts of `dirty` (buffer coordinates) visible at `id`
    /// or behind it, consuming rectangles as they are satisfied.
    ///
    /// On return `dirty` holds whatever nobody could paint.
    pub fn draw_damage(&mut self, id: NodeId, dirty: &mut Region, flags: DamageFlags) {
        self.validate(id);
        let rects_in = u32::try_from(dirty.len()).unwrap_or(u32::MAX);
        self.damage_node(id.idx, dirty, flags);
        self.diagnostics.damage_passes += 1;
        self.tracer.damage_pass(&DamagePassEvent {
            start: id,
            flags,
            rects_in,
            rects_left: u32::try_from(dirty.len()).unwrap_or(u32::MAX),
        });
    }

    /// Repaints `gap` under the children of `parent`.
    ///
    /// With `mid`, the fill starts at the sibling just behind `mid`;
    /// otherwise at the front-most child. With no such sibling only the
    /// parent is repainted.
    pub fn display_gap(&mut self, parent: NodeId, gap: &mut Region, mid: Option<NodeId>) {
        self.validate(parent);
        if let Some(mid) = mid {
            self.validate(mid);
        }
        self.fill_gap(parent.idx, gap, mid.map_or(INVALID, |m| m.idx));
    }

    pub(crate) fn fill_gap(&mut self, parent: u32, gap: &mut Region, mid: u32) {
        if gap.is_empty() {
            return;
        }
        let start = if mid == INVALID {
            self.front_child_idx(parent)
        } else {
            self.prev_sibling[mid as usize]
        };
        if start == INVALID {
            self.draw_damage(self.id_at(parent), gap, DamageFlags::SPY_NOTIFY);
        } else {
            self.draw_damage(self.id_at(start), gap, DamageFlags::FULL);
        }
    }

    fn damage_node(&mut self, idx: u32, dirty: &mut Region, flags: DamageFlags) {
        if dirty.is_empty() {
            return;
        }
        // A nested master lives in another buffer; to this pass it is only
        // an opaque rectangle.
        if self.is_master(idx) && self.parent[idx as usize] != INVALID {
            self.damage_nested_master(idx, dirty, flags);
            return;
        }

        let optimize = flags.contains(DamageFlags::OPTIMIZE) && self.config.optimize_damage;
        let mut recurse_child = !optimize;
        let mut recurse_prev = !optimize;
        let mut matched = !optimize;

        if !self.visible[idx as usize].is_empty() && self.can_paint(idx) {
            let bounds = self.paint_bounds(idx);
            let mut painted_any = false;
            let mut i = 0;
            while i < dirty.len() {
                let arb = dirty.as_slice()[i];
                if optimize {
                    match bounds.check_intersect(arb) {
                        Overlap::Disjoint => {
                            recurse_prev = true;
                            i += 1;
                            continue;
                        }
                        Overlap::Contained => {}
                        Overlap::Clipped(_) => recurse_prev = true,
                    }
                    recurse_child = true;
                    matched = true;
                }

                let mut culled = false;
                for v in 0..self.visible[idx as usize].len() {
                    let vis = self.visible[idx as usize].as_slice()[v];
                    let Some((shared, overlap)) = vis.intersect(arb) else {
                        continue;
                    };
                    self.paint_fragment(idx, shared);
                    painted_any = true;
                    if overlap == Overlap::Contained && flags.contains(DamageFlags::CULL) {
                        dirty.remove(i);
                        culled = true;
                        break;
                    }
                }
                if !culled {
                    i += 1;
                }
            }
            if painted_any {
                self.display_count[idx as usize] += 1;
            }
        } else {
            recurse_child = true;
            recurse_prev = true;
            matched = true;
        }

        if self.is_shown(idx) && !dirty.is_empty() {
            if recurse_child && flags.contains(DamageFlags::CHILDREN) && !self.is_master(idx) {
                let front = self.front_child_idx(idx);
                if front != INVALID {
                    let child_flags = (flags - DamageFlags::PARENT) | DamageFlags::PREVIOUS;
                    self.damage_node(front, dirty, child_flags);
                }
            }
            if flags.contains(DamageFlags::SPY_NOTIFY)
                && matched
                && self.has_state(idx, NodeState::SENSITIVE)
            {
                self.inform_sub(idx, dirty);
            }
            if flags.contains(DamageFlags::OCCLUDE) && matched {
                dirty.occlude_rect(self.paint_bounds(idx));
            }
        }

        if recurse_prev && !dirty.is_empty() {
            self.damage_previous(idx, dirty, flags);
        }
    }

    fn damage_previous(&mut self, idx: u32, dirty: &mut Region, flags: DamageFlags) {
        if !flags.contains(DamageFlags::PREVIOUS) {
            return;
        }
        let prev = self.prev_sibling[idx as usize];
        if prev != INVALID {
            self.damage_node(prev, dirty, flags);
            return;
        }
        let p = self.parent[idx as usize];
        if flags.contains(DamageFlags::PARENT) && p != INVALID {
            let parent_flags =
                flags - (DamageFlags::CHILDREN | DamageFlags::PREVIOUS | DamageFlags::PARENT);
            self.damage_node(p, dirty, parent_flags);
        }
    }

    fn damage_nested_master(&mut self, idx: u32, dirty: &mut Region, flags: DamageFlags) {
        let clipped = self.clipped[idx as usize];
        let shown = self.is_shown(idx);
        if shown && flags.contains(DamageFlags::OCCLUDE) {
            dirty.occlude_rect(clipped);
        }
        if !dirty.is_empty() {
            self.damage_previous(idx, dirty, flags);
        }
    }
}
