// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The spy compositor.
//!
//! A spy surface keeps a sub-buffer holding everything painted behind it in
//! its master: the master's backdrop, its own ancestors, and every older
//! node whose pixels reach its rectangle. Effects such as tints or
//! magnifiers draw from that sub-buffer instead of reading the master buffer,
//! which would already contain the spy itself.
//!
//! Full refreshes ([`SurfaceTree::refresh_sub`]) redraw the sub-buffer from
//! scratch. Incremental updates happen whenever a node behind a spy paints:
//! the node also draws the freshly painted area into every spy in front of
//! it, occluded by whatever lies between the two.

use crate::behavior::SurfaceInfo;
use crate::region::Region;
use crate::surface::{GraphicsContext, Pixmap, Theme};
use crate::trace::SpyRefreshEvent;

use super::damage::DamageFlags;
use super::flags::NodeState;
use super::id::{INVALID, NodeId};
use super::kind::SpyMode;
use super::store::SurfaceTree;

impl SurfaceTree {
    /// Redraws a spy's sub-buffer from scratch and repaints the spy.
    pub fn refresh_sub(&mut self, id: NodeId) {
        self.validate(id);
        if !self.is_spy(id.idx) {
            return;
        }
        self.begin_delegation();
        self.update_sub(id.idx);
        self.display_node(id.idx);
        self.end_delegation();
    }

    /// The first spy in front of the node that its painting feeds.
    #[must_use]
    pub fn next_spy(&mut self, id: NodeId) -> Option<NodeId> {
        self.validate(id);
        self.ensure_paint_order();
        self.opt_id(self.next_spy[id.idx as usize])
    }

    /// Redraws the sub-buffer of spy `s` from everything behind it.
    ///
    /// The sub-buffer is always cleared first, so pixels from a previous
    /// position or clip never survive.
    pub(crate) fn update_sub(&mut self, s: u32) {
        if !self.config.update_spies {
            return;
        }
        let Some(buffer) = self.spies[s as usize]
            .as_mut()
            .and_then(|d| d.buffer.as_mut())
        else {
            return;
        };
        buffer.fill(0);
        let full = buffer.bounds();

        let m = self.master[s as usize];
        let mut drawn = 0_u32;
        if m != INVALID && self.has_state(s, NodeState::ACTIVE) && self.is_shown(s) {
            self.ensure_paint_order();
            if self.is_shown(m) && self.has_state(m, NodeState::ACTIVE) {
                let area = Region::from_rect(self.paint_bounds(m));
                self.draw_to_sub(m, s, &area, false);
                drawn += 1;
            }
            for n in self.painted_before(m, s) {
                if self.is_master(n) || !self.is_shown(n) || !self.has_state(n, NodeState::ACTIVE) {
                    continue;
                }
                let area = Region::from_rect(self.clipped[n as usize]);
                self.draw_to_sub(n, s, &area, false);
                drawn += 1;
            }
        }

        self.sub_changed_hook(s, &Region::from_rect(full));
        self.diagnostics.spy_refreshes += 1;
        self.tracer.spy_refresh(&SpyRefreshEvent {
            spy: self.id_at(s),
            full: true,
            rects: drawn,
        });
    }

    /// Offers `region` (buffer coordinates) just painted by `idx` to every
    /// spy in front of it.
    pub(crate) fn inform_sub(&mut self, idx: u32, region: &Region) {
        if !self.config.update_spies
            || region.is_empty()
            || !self.is_shown(idx)
            || !self.has_state(idx, NodeState::ACTIVE)
            || !(self.is_master(idx) || self.master[idx as usize] != INVALID)
        {
            return;
        }
        self.ensure_paint_order();
        let mut s = self.next_spy[idx as usize];
        if s == INVALID {
            return;
        }
        self.begin_delegation();
        while s != INVALID {
            let has_buffer = self.spies[s as usize]
                .as_ref()
                .is_some_and(|d| d.buffer.is_some());
            if self.is_shown(s) && has_buffer {
                self.draw_to_sub(idx, s, region, true);
            }
            s = self.spy_chain[s as usize];
        }
        self.end_delegation();
    }

    /// [`inform_sub`](Self::inform_sub) for a node and all its descendants.
    pub(crate) fn inform_sub_family(&mut self, idx: u32, region: &Region) {
        let mut stack = alloc::vec![idx];
        while let Some(n) = stack.pop() {
            self.inform_sub(n, region);
            if self.is_master(n) {
                continue;
            }
            let mut child = self.first_child[n as usize];
            while child != INVALID {
                stack.push(child);
                child = self.next_sibling[child as usize];
            }
        }
    }

    /// Draws the part of `list` painted by `idx` into spy `s`'s sub-buffer,
    /// occluded by every node between the two.
    fn draw_to_sub(&mut self, idx: u32, s: u32, list: &Region, notify: bool) {
        if self.has_state(s, NodeState::COMPLETE_CLIP) {
            return;
        }
        let own = self.paint_bounds(idx);
        let spy_rect = self.clipped[s as usize];
        let mut area = Region::new();
        for r in list {
            if let Some(shared) = r.intersection(own).and_then(|r| r.intersection(spy_rect)) {
                area.add_rect(shared);
            }
        }
        if area.is_empty() {
            return;
        }
        let mut area = self.create_occluded_region(idx, s, Some(area));
        if area.is_empty() {
            return;
        }
        let phys = self.physical[s as usize];
        area.offset(-phys.left, -phys.top);
        self.paint_into_sub(idx, s, &area);
        if notify {
            self.sub_buffer_updated(s, &area);
        }
    }

    fn paint_into_sub(&mut self, idx: u32, s: u32, area: &Region) {
        if !self.config.paint {
            return;
        }
        let Some(mut buffer) = self.spies[s as usize]
            .as_mut()
            .and_then(|d| d.buffer.take())
        else {
            return;
        };
        let m = if self.is_master(idx) {
            idx
        } else {
            self.master[idx as usize]
        };
        let theme = self.master_data(m).map_or(Theme::CLASSIC, |d| d.theme);
        let (ox, oy) = self.paint_origin(idx);
        let phys = self.physical[s as usize];
        let (ox, oy) = (ox - phys.left, oy - phys.top);
        let logical = self.logical[idx as usize];
        let id = self.id_at(idx);
        #[cfg(feature = "trace-rich")]
        let spy_id = self.id_at(s);

        if let Some(b) = self.behavior[idx as usize].as_deref() {
            let info = SurfaceInfo {
                id,
                width: logical.width(),
                height: logical.height(),
                sub_buffer: self.spies[idx as usize]
                    .as_ref()
                    .and_then(|d| d.buffer.as_ref()),
            };
            for frag in area {
                let mut gc = GraphicsContext::new(&mut buffer, ox, oy, *frag, &theme);
                b.draw(&mut gc, &info);
                #[cfg(feature = "trace-rich")]
                self.tracer.paint(&crate::trace::PaintEvent {
                    node: id,
                    target: crate::trace::PaintTarget::Spy(spy_id),
                    fragment: *frag,
                });
            }
        }

        if let Some(d) = self.spies[s as usize].as_mut() {
            d.buffer = Some(buffer);
        }
    }

    /// Reacts to an incremental change of `area` (sub-buffer coordinates).
    fn sub_buffer_updated(&mut self, s: u32, area: &Region) {
        self.sub_changed_hook(s, area);
        self.tracer.spy_refresh(&SpyRefreshEvent {
            spy: self.id_at(s),
            full: false,
            rects: u32::try_from(area.len()).unwrap_or(u32::MAX),
        });
        if !self.has_state(s, NodeState::SENSITIVE) {
            return;
        }
        let mode = self.spies[s as usize]
            .as_ref()
            .map_or(SpyMode::Linear, |d| d.mode);
        match mode {
            SpyMode::Linear => {
                let phys = self.physical[s as usize];
                let mut dirty = area.clone();
                dirty.offset(phys.left, phys.top);
                self.draw_damage(self.id_at(s), &mut dirty, DamageFlags::SPY_NOTIFY);
            }
            SpyMode::Whole => self.display_node(s),
        }
    }

    fn sub_changed_hook(&mut self, s: u32, area: &Region) {
        let Some(mut behavior) = self.behavior[s as usize].take() else {
            return;
        };
        if let Some(buffer) = self.spies[s as usize]
            .as_mut()
            .and_then(|d| d.buffer.as_mut())
        {
            behavior.sub_changed(buffer, area);
        }
        if self.behavior[s as usize].is_none() {
            self.behavior[s as usize] = Some(behavior);
        }
    }

    /// Allocates a loaded spy's sub-buffer and fills it.
    pub(crate) fn alloc_sub_buffer(&mut self, s: u32) {
        let r = self.logical[s as usize];
        if let Some(d) = self.spies[s as usize].as_mut() {
            d.buffer = Some(Pixmap::new(r.width(), r.height()));
        }
        self.update_sub(s);
    }

    pub(crate) fn free_sub_buffer(&mut self, s: u32) {
        if let Some(d) = self.spies[s as usize].as_mut() {
            d.buffer = None;
        }
    }

    /// Keeps the sub-buffer in step with a move or resize.
    pub(crate) fn spy_geometry_changed(&mut self, s: u32, resized: bool) {
        if resized {
            let r = self.logical[s as usize];
            match self.spies[s as usize].as_mut() {
                Some(d) if d.buffer.is_some() => {
                    d.buffer = Some(Pixmap::new(r.width(), r.height()));
                }
                _ => return,
            }
        }
        self.update_sub(s);
    }
}
