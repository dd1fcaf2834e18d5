// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree traversal utilities and the cached paint order.

use alloc::collections::BTreeMap;
use alloc::vec;
use alloc::vec::Vec;

use super::id::{INVALID, NodeId};
use super::store::SurfaceTree;

/// An iterator over the direct children of a node, back to front.
///
/// Created by [`SurfaceTree::children`].
#[derive(Debug)]
pub struct Children<'a> {
    tree: &'a SurfaceTree,
    current: u32,
}

impl<'a> Children<'a> {
    pub(crate) fn new(tree: &'a SurfaceTree, first: u32) -> Self {
        Self {
            tree,
            current: first,
        }
    }
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.current == INVALID {
            return None;
        }
        let idx = self.current;
        self.current = self.tree.next_sibling[idx as usize];
        Some(self.tree.id_at(idx))
    }
}

/// A pre-order iterator over a node and its descendants, in paint order.
///
/// Created by [`SurfaceTree::descendants`]. Unlike
/// [`paint_successor`](SurfaceTree::paint_successor) it descends into the
/// children of nested masters.
#[derive(Debug)]
pub struct Descendants<'a> {
    tree: &'a SurfaceTree,
    stack: Vec<u32>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let idx = self.stack.pop()?;
        // Push children front to back so the back-most pops first.
        let mut child = self.tree.front_child_idx(idx);
        while child != INVALID {
            self.stack.push(child);
            child = self.tree.prev_sibling[child as usize];
        }
        Some(self.tree.id_at(idx))
    }
}

impl SurfaceTree {
    /// Returns a pre-order iterator over `id` and all of its descendants.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        self.validate(id);
        Descendants {
            tree: self,
            stack: vec![id.idx],
        }
    }

    /// Every node drawing into `master`'s buffer, in paint order.
    #[must_use]
    pub fn paint_order(&mut self, master: NodeId) -> Vec<NodeId> {
        self.validate(master);
        self.ensure_paint_order();
        self.paint_order
            .iter()
            .copied()
            .filter(|&n| self.master[n as usize] == master.idx)
            .map(|n| self.id_at(n))
            .collect()
    }

    /// Rebuilds the paint-order cache and the spy chain if the topology
    /// changed since the last call.
    ///
    /// Within one master, the next spy of a node is the first spy painted
    /// after the node's whole subtree; spies among its own descendants are
    /// skipped so a node never feeds a sub-buffer drawn over itself. The
    /// chain link of a spy is simply the next spy in paint order. A master
    /// points at the first spy drawing into its buffer.
    pub(crate) fn ensure_paint_order(&mut self) {
        if !self.order_dirty {
            return;
        }

        let len = self.len as usize;
        self.paint_order.clear();
        self.order_pos.clear();
        self.order_pos.resize(len, INVALID);
        self.next_spy.clear();
        self.next_spy.resize(len, INVALID);
        self.spy_chain.clear();
        self.spy_chain.resize(len, INVALID);

        let mut free = vec![false; len];
        for &f in &self.free_list {
            free[f as usize] = true;
        }
        for root in 0..self.len {
            if self.parent[root as usize] == INVALID && !free[root as usize] {
                self.dfs_collect(root);
            }
        }

        // Subtree sizes; reverse pre-order visits children before parents.
        let mut subtree = vec![0_u32; len];
        for &n in self.paint_order.iter().rev() {
            subtree[n as usize] += 1;
            let p = self.parent[n as usize];
            if p != INVALID {
                subtree[p as usize] += subtree[n as usize];
            }
        }

        let mut groups: BTreeMap<u32, Vec<u32>> = BTreeMap::new();
        for &n in &self.paint_order {
            let m = self.master[n as usize];
            if m != INVALID {
                groups.entry(m).or_default().push(n);
            }
        }

        let mut heads = Vec::with_capacity(groups.len());
        for (&m, members) in &groups {
            // upcoming[i]: first spy at member index >= i.
            let mut upcoming = vec![INVALID; members.len() + 1];
            for (i, &n) in members.iter().enumerate().rev() {
                upcoming[i] = if self.is_spy(n) { n } else { upcoming[i + 1] };
            }
            for (i, &n) in members.iter().enumerate() {
                let end = self.order_pos[n as usize] + subtree[n as usize];
                let after = i + members[i..].partition_point(|&x| self.order_pos[x as usize] < end);
                self.next_spy[n as usize] = if self.is_master(n) {
                    INVALID
                } else {
                    upcoming[after]
                };
                if self.is_spy(n) {
                    self.spy_chain[n as usize] = upcoming[i + 1];
                }
            }
            heads.push((m, upcoming[0]));
        }
        // A master's backdrop is behind every member of its own group. It
        // never paints into an outer group's buffer, so a childless nested
        // master keeps no spy at all.
        for (m, head) in heads {
            self.next_spy[m as usize] = head;
        }

        self.order_dirty = false;
    }

    fn dfs_collect(&mut self, root: u32) {
        let mut stack = vec![root];
        while let Some(idx) = stack.pop() {
            self.order_pos[idx as usize] =
                u32::try_from(self.paint_order.len()).unwrap_or(INVALID);
            self.paint_order.push(idx);
            let mut child = self.front_child_idx(idx);
            while child != INVALID {
                stack.push(child);
                child = self.prev_sibling[child as usize];
            }
        }
    }

    /// Nodes of master `m` painted before `limit`, in paint order.
    pub(crate) fn painted_before(&self, m: u32, limit: u32) -> Vec<u32> {
        let end = self.order_pos[limit as usize];
        self.paint_order
            .iter()
            .copied()
            .take_while(|&n| self.order_pos[n as usize] < end)
            .filter(|&n| self.master[n as usize] == m)
            .collect()
    }
}
