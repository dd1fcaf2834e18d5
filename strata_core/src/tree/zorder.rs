// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Z-order changes among siblings.

use crate::rect::Rect;
use crate::region::Region;
use crate::trace::ZShiftEvent;

use super::damage::DamageFlags;
use super::flags::{NodeFlags, NodeState};
use super::id::{INVALID, NodeId};
use super::store::SurfaceTree;

impl SurfaceTree {
    /// Moves the node `n` positions toward the front (`n > 0`) or the back
    /// (`n < 0`) of its sibling list.
    ///
    /// The shift stops early at a [`NodeFlags::Z_FIXED`] sibling or at the
    /// end of the list. Returns the number of positions actually moved.
    pub fn z_shift(&mut self, id: NodeId, n: i32) -> i32 {
        self.validate(id);
        let idx = id.idx;
        let under = self.parent[idx as usize];
        if n == 0 || under == INVALID {
            return 0;
        }

        let mut before = self.next_sibling[idx as usize];
        let mut after = self.prev_sibling[idx as usize];
        let last = after;
        let shown = self.is_shown(idx);
        let vacated = if shown {
            self.clipped[idx as usize]
        } else {
            Rect::EMPTY
        };
        self.tree_altered = true;
        self.begin_delegation();
        self.extract(idx);

        let mut moved = 0_i32;
        if n > 0 {
            while moved < n
                && before != INVALID
                && !self.flags[before as usize].contains(NodeFlags::Z_FIXED)
            {
                after = before;
                before = self.next_sibling[before as usize];
                moved += 1;

                if !(shown && self.is_shown(after) && self.physical[after as usize].overlaps(vacated))
                {
                    continue;
                }
                self.update_family_vislist(after);
                // Still detached, so the passed family is not occluded by the
                // moving node yet.
                let stop = if before != INVALID {
                    before
                } else {
                    self.next_or_uncle(under)
                };
                let mut cur = after;
                while cur != INVALID && cur != stop {
                    self.visible[cur as usize].occlude_rect(vacated);
                    cur = self.superior(cur);
                }
                if self.is_spy(after) {
                    self.update_sub(after);
                    self.display_node(after);
                }
            }
        } else {
            while moved > n
                && after != INVALID
                && !self.flags[after as usize].contains(NodeFlags::Z_FIXED)
            {
                if shown && self.is_shown(after) && self.physical[after as usize].overlaps(vacated) {
                    self.update_family_vislist(after);
                }
                before = after;
                after = self.prev_sibling[after as usize];
                moved -= 1;
            }
        }

        self.link_between(under, idx, after, before);
        self.ensure_paint_order();
        if self.is_spy(idx) {
            self.update_sub(idx);
        }
        self.update_coords(idx);
        self.update_family_vislist(idx);

        self.pack(self.id_at(under));
        if shown {
            if moved >= 0 {
                self.display_family(idx);
            } else {
                let vacated_region = Region::from_rect(vacated);
                self.inform_sub_family(idx, &vacated_region);
                if self.is_spy(idx) {
                    self.display_node(idx);
                }
                if last != INVALID {
                    let sensitive = self.has_state(idx, NodeState::SENSITIVE);
                    self.cascade_state(idx, NodeState::SENSITIVE, false);
                    let mut gap = vacated_region;
                    self.draw_damage(
                        self.id_at(last),
                        &mut gap,
                        DamageFlags::CHILDREN | DamageFlags::PREVIOUS | DamageFlags::SPY_NOTIFY,
                    );
                    self.cascade_state(idx, NodeState::SENSITIVE, sensitive);
                }
            }
        }
        self.end_delegation();

        self.tracer.z_shift(&ZShiftEvent {
            node: id,
            requested: n,
            moved,
        });
        moved
    }

    /// Moves the node in front of all its siblings, up to the first
    /// [`NodeFlags::Z_FIXED`] one.
    pub fn raise(&mut self, id: NodeId) -> i32 {
        self.z_shift(id, i32::MAX)
    }

    /// Moves the node behind all its siblings, down to the first
    /// [`NodeFlags::Z_FIXED`] one.
    pub fn lower(&mut self, id: NodeId) -> i32 {
        self.z_shift(id, i32::MIN)
    }
}
