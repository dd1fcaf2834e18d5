// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Painting and display delegation.
//!
//! A display paints a node's visible region into its master's buffer. While
//! a delegation span is open, displays are only recorded on the
//! [`DISPLAY`](crate::dirty::DISPLAY) channel; when the outermost span
//! closes, each recorded node is painted once, in deterministic order.

use alloc::vec::Vec;

use crate::behavior::SurfaceInfo;
use crate::dirty;
use crate::rect::Rect;
use crate::region::Region;
use crate::surface::GraphicsContext;
use crate::trace::FlushEvent;

use super::flags::NodeState;
use super::id::{INVALID, NodeId};
use super::kind::MasterData;
use super::store::SurfaceTree;

impl SurfaceTree {
    /// Paints the node's visible region, or schedules it when a delegation
    /// span is open. Spies in front of the node are told about the change
    /// first.
    pub fn display(&mut self, id: NodeId) {
        self.validate(id);
        self.display_node(id.idx);
    }

    /// Displays the node and every descendant.
    pub fn display_all(&mut self, id: NodeId) {
        self.validate(id);
        self.display_family(id.idx);
    }

    /// Opens a delegation span. Spans nest.
    pub fn begin_delegation(&mut self) {
        self.delegation_depth += 1;
    }

    /// Closes a delegation span, flushing deferred displays when it was the
    /// outermost one.
    ///
    /// # Panics
    ///
    /// Panics if no span is open.
    pub fn end_delegation(&mut self) {
        assert!(
            self.delegation_depth > 0,
            "delegation span closed without being opened"
        );
        self.delegation_depth -= 1;
        if self.delegation_depth == 0 {
            self.flush_displays();
        }
    }

    /// Runs `f` inside a delegation span, so every node it displays is
    /// painted at most once, after `f` returns.
    pub fn batch<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.begin_delegation();
        let result = f(self);
        self.end_delegation();
        result
    }

    /// Whether a delegation span is open.
    #[must_use]
    pub fn is_delegating(&self) -> bool {
        self.delegation_depth > 0
    }

    // -- Internals --

    /// Active, sensitive, shown, and attached to a buffer.
    pub(crate) fn can_paint(&self, idx: u32) -> bool {
        let s = self.state[idx as usize];
        s.contains(NodeState::ACTIVE | NodeState::SENSITIVE)
            && self.is_shown(idx)
            && (self.is_master(idx) || self.master[idx as usize] != INVALID)
    }

    pub(crate) fn display_node(&mut self, idx: u32) {
        if !self.can_paint(idx) {
            return;
        }
        let area = Region::from_rect(self.paint_bounds(idx));
        self.inform_sub(idx, &area);
        if self.delegation_depth > 0 && self.config.delegate_displays {
            self.dirty.mark(idx, dirty::DISPLAY);
            return;
        }
        self.paint_visible(idx);
    }

    /// Children back to front, then the node itself.
    pub(crate) fn display_family(&mut self, idx: u32) {
        if !self.is_shown(idx) {
            return;
        }
        let mut child = self.first_child[idx as usize];
        while child != INVALID {
            let next = self.next_sibling[child as usize];
            self.display_family(child);
            child = next;
        }
        self.display_node(idx);
    }

    fn flush_displays(&mut self) {
        let nodes: Vec<u32> = self
            .dirty
            .drain(dirty::DISPLAY)
            .affected()
            .deterministic()
            .run()
            .collect();
        if nodes.is_empty() {
            return;
        }
        let mut painted = 0_u32;
        for idx in nodes {
            if self.can_paint(idx) {
                self.paint_visible(idx);
                painted += 1;
            }
        }
        self.diagnostics.flushes += 1;
        self.tracer.flush(&FlushEvent { nodes: painted });
    }

    fn paint_visible(&mut self, idx: u32) {
        self.display_count[idx as usize] += 1;
        self.diagnostics.displays += 1;
        for i in 0..self.visible[idx as usize].len() {
            let frag = self.visible[idx as usize].as_slice()[i];
            self.paint_fragment(idx, frag);
        }
    }

    /// Hands one fragment (buffer coordinates) to the node's behavior.
    pub(crate) fn paint_fragment(&mut self, idx: u32, frag: Rect) {
        self.diagnostics.fragments_painted += 1;
        if !self.config.paint {
            return;
        }
        let m = if self.is_master(idx) {
            idx
        } else {
            self.master[idx as usize]
        };
        if m == INVALID {
            return;
        }
        let id = self.id_at(idx);
        let (ox, oy) = self.paint_origin(idx);
        let logical = self.logical[idx as usize];

        let Self {
            behavior,
            masters,
            spies,
            ..
        } = self;
        let Some(b) = behavior[idx as usize].as_deref() else {
            return;
        };
        let Some(MasterData {
            buffer: Some(buffer),
            theme,
        }) = masters[m as usize].as_mut()
        else {
            return;
        };
        let info = SurfaceInfo {
            id,
            width: logical.width(),
            height: logical.height(),
            sub_buffer: spies[idx as usize].as_ref().and_then(|s| s.buffer.as_ref()),
        };
        let mut gc = GraphicsContext::new(buffer, ox, oy, frag, theme);
        b.draw(&mut gc, &info);

        #[cfg(feature = "trace-rich")]
        self.tracer.paint(&crate::trace::PaintEvent {
            node: id,
            target: crate::trace::PaintTarget::Master(self.id_at(m)),
            fragment: frag,
        });
    }
}
