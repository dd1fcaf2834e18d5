// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-master damage accumulation.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use strata_core::rect::Rect;
use strata_core::trace::{GeometryEvent, TraceSink};
use strata_core::tree::NodeId;

use crate::damage::DamageRegion;

/// Accumulates the damage of each master buffer between presentations.
///
/// Install it as the tree's trace sink (shared through `Rc<RefCell<_>>`) to
/// collect damage automatically. With the `trace-rich` feature every painted
/// fragment is recorded; without it, callers report damage through
/// [`add`](Self::add). Resizing a watched master always damages all of it.
#[derive(Clone, Debug, Default)]
pub struct DamageCollector {
    damage: BTreeMap<NodeId, DamageRegion>,
}

impl DamageCollector {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts tracking `master`; its first presentation is a full one.
    pub fn watch(&mut self, master: NodeId) {
        self.damage.insert(master, DamageRegion::Full);
    }

    /// Stops tracking `master`.
    pub fn unwatch(&mut self, master: NodeId) {
        self.damage.remove(&master);
    }

    /// Records `rect` (in buffer pixels) as damaged in `master`.
    pub fn add(&mut self, master: NodeId, rect: Rect) {
        self.damage
            .entry(master)
            .or_insert(DamageRegion::None)
            .add_rect(rect);
    }

    /// Marks all of `master` as damaged.
    pub fn mark_full(&mut self, master: NodeId) {
        self.damage.insert(master, DamageRegion::Full);
    }

    /// Returns the damage accumulated for `master` and starts over.
    #[must_use]
    pub fn take(&mut self, master: NodeId) -> DamageRegion {
        self.damage
            .get_mut(&master)
            .map_or(DamageRegion::None, |d| core::mem::replace(d, DamageRegion::None))
    }

    /// Masters with pending damage.
    #[must_use]
    pub fn damaged(&self) -> Vec<NodeId> {
        self.damage
            .iter()
            .filter(|(_, d)| !d.is_empty())
            .map(|(&m, _)| m)
            .collect()
    }
}

impl TraceSink for DamageCollector {
    fn on_geometry(&mut self, e: &GeometryEvent) {
        if e.resized && self.damage.contains_key(&e.node) {
            self.mark_full(e.node);
        }
    }

    #[cfg(feature = "trace-rich")]
    fn on_paint(&mut self, e: &strata_core::trace::PaintEvent) {
        if let strata_core::trace::PaintTarget::Master(m) = e.target {
            self.add(m, e.fragment);
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::vec;

    use strata_core::surface::Theme;
    use strata_core::tree::SurfaceTree;

    use super::*;

    fn two_masters() -> (NodeId, NodeId) {
        let mut tree = SurfaceTree::new();
        let a = tree.create_master(Rect::new(0, 0, 10, 10), Theme::CLASSIC);
        let b = tree.create_master(Rect::new(0, 0, 10, 10), Theme::CLASSIC);
        (a, b)
    }

    #[test]
    fn watched_masters_start_fully_damaged() {
        let (a, b) = two_masters();
        let mut c = DamageCollector::new();
        c.watch(a);
        assert_eq!(c.damaged(), vec![a]);
        assert_eq!(c.take(a), DamageRegion::Full);
        assert_eq!(c.take(a), DamageRegion::None);
        assert_eq!(c.take(b), DamageRegion::None);
    }

    #[test]
    fn damage_is_kept_per_master() {
        let (a, b) = two_masters();
        let mut c = DamageCollector::new();
        c.add(a, Rect::new(0, 0, 2, 2));
        c.add(b, Rect::new(5, 5, 6, 6));
        c.add(a, Rect::new(1, 1, 2, 2));
        assert_eq!(c.take(a), DamageRegion::Rects(vec![Rect::new(0, 0, 2, 2)]));
        assert_eq!(c.damaged(), vec![b]);
        c.unwatch(b);
        assert!(c.damaged().is_empty());
    }

    #[test]
    fn resizing_a_watched_master_damages_all_of_it() {
        let (a, b) = two_masters();
        let mut c = DamageCollector::new();
        c.watch(a);
        let _ = c.take(a);
        let event = |node| GeometryEvent {
            node,
            old: Rect::new(0, 0, 10, 10),
            new: Rect::new(0, 0, 20, 10),
            moved: false,
            resized: true,
        };
        c.on_geometry(&event(a));
        c.on_geometry(&event(b));
        assert_eq!(c.take(a), DamageRegion::Full);
        assert_eq!(c.take(b), DamageRegion::None);
    }

    #[cfg(feature = "trace-rich")]
    #[test]
    fn painted_fragments_become_damage() {
        use alloc::rc::Rc;
        use core::cell::RefCell;

        use strata_core::surface::rgb;
        use strata_core::tree::Placement;

        use crate::Solid;

        let mut tree = SurfaceTree::new();
        let m = tree.create_master(Rect::new(0, 0, 100, 100), Theme::CLASSIC);
        tree.set_behavior(m, Box::new(Solid::themed()));
        let a = tree.create_node(Rect::new(0, 0, 20, 20));
        tree.set_behavior(a, Box::new(Solid::new(rgb(255, 0, 0))));
        tree.add_child(m, a, Placement::Front);

        let collector = Rc::new(RefCell::new(DamageCollector::new()));
        tree.set_trace_sink(Box::new(collector.clone()));
        tree.load(m);
        let _ = collector.borrow_mut().take(m);

        tree.move_to(a, 50, 50);
        let damage = collector.borrow_mut().take(m);
        assert_eq!(damage.bounding_box(100, 100), Some(Rect::new(0, 0, 70, 70)));
        let DamageRegion::Rects(rects) = damage else {
            panic!("expected rectangles, got {damage:?}");
        };
        assert!(rects.contains(&Rect::new(50, 50, 70, 70)));
    }
}
