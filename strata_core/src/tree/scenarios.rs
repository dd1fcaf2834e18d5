// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end behavior of the engine on small scenes.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::behavior::{Behavior, SurfaceInfo};
use crate::rect::Rect;
use crate::region::Region;
use crate::region::tests::Lcg;
use crate::surface::{GraphicsContext, Pixmap, Theme, rgb};

use super::{NodeId, Placement, SpyMode, SurfaceTree};

struct Fill(u32);

impl Behavior for Fill {
    fn draw(&self, gc: &mut GraphicsContext<'_>, surface: &SurfaceInfo<'_>) {
        gc.fill_rect(surface.local_bounds(), self.0);
    }
}

const RED: u32 = rgb(255, 0, 0);
const BLUE: u32 = rgb(0, 0, 255);
const GREY: u32 = rgb(128, 128, 128);

fn rect(l: i32, t: i32, r: i32, b: i32) -> Rect {
    Rect::new(l, t, r, b)
}

fn master(tree: &mut SurfaceTree, w: i32, h: i32) -> NodeId {
    let m = tree.create_master(rect(0, 0, w, h), Theme::CLASSIC);
    tree.set_behavior(m, Box::new(Fill(GREY)));
    m
}

fn filled(tree: &mut SurfaceTree, parent: NodeId, r: Rect, color: u32) -> NodeId {
    let id = tree.create_node(r);
    tree.set_behavior(id, Box::new(Fill(color)));
    tree.add_child(parent, id, Placement::Front);
    id
}

/// Two overlapping siblings, `a` behind `b`.
fn overlapping_pair() -> (SurfaceTree, NodeId, NodeId, NodeId) {
    let mut tree = SurfaceTree::new();
    let m = master(&mut tree, 200, 200);
    let a = filled(&mut tree, m, rect(0, 0, 100, 100), RED);
    let b = filled(&mut tree, m, rect(50, 50, 150, 150), BLUE);
    tree.load(m);
    (tree, m, a, b)
}

#[test]
fn back_sibling_loses_the_overlap() {
    let (tree, _, a, b) = overlapping_pair();
    let va = tree.visible_region(a);
    assert_eq!(va.area(), 10_000 - 2_500);
    assert!(va.len() >= 2);
    assert!(va.contains(25, 25));
    assert!(va.contains(75, 25));
    assert!(va.contains(25, 75));
    assert!(!va.contains(75, 75));
    assert_eq!(tree.visible_region(b).area(), 10_000);
}

#[test]
fn raising_the_back_sibling_swaps_the_occlusion() {
    let (mut tree, m, a, b) = overlapping_pair();
    assert_eq!(tree.z_shift(a, 1), 1);
    assert_eq!(tree.visible_region(a).area(), 10_000);
    assert_eq!(tree.visible_region(b).area(), 10_000 - 2_500);
    assert!(!tree.visible_region(b).contains(75, 75));
    assert_eq!(tree.master_buffer(m).unwrap().pixel(75, 75), Some(RED));
}

#[test]
fn hiding_exposes_exactly_the_former_clip() {
    let mut tree = SurfaceTree::new();
    let m = master(&mut tree, 200, 200);
    let panel = filled(&mut tree, m, rect(0, 0, 150, 150), RED);
    let child = filled(&mut tree, panel, rect(10, 10, 70, 50), BLUE);
    tree.load(m);

    let before = tree.visible_region(panel).area();
    let former = tree.clipped(child).unwrap().area();
    tree.hide(child);
    assert_eq!(tree.visible_region(panel).area(), before + former);
    assert_eq!(tree.master_buffer(m).unwrap().pixel(20, 20), Some(RED));
}

/// Composites `layers` (back to front) and samples the area under `window`.
fn composite(layers: &[(Rect, u32)], window: Rect) -> Pixmap {
    let mut out = Pixmap::new(window.width(), window.height());
    for &(r, color) in layers {
        out.fill_rect(r.offset(-window.left, -window.top), color);
    }
    out
}

#[test]
fn spy_sees_the_composite_of_what_is_behind() {
    let mut tree = SurfaceTree::new();
    let m = tree.create_master(rect(0, 0, 100, 100), Theme::CLASSIC);
    let r1 = rect(0, 0, 60, 60);
    let r2 = rect(40, 40, 100, 100);
    filled(&mut tree, m, r1, RED);
    filled(&mut tree, m, r2, BLUE);
    let window = rect(20, 20, 80, 80);
    let spy = tree.create_spy(window, SpyMode::Linear);
    tree.add_child(m, spy, Placement::Front);
    tree.load(m);
    tree.refresh_sub(spy);

    let expected = composite(&[(r1, RED), (r2, BLUE)], window);
    let sub = tree.sub_buffer(spy).unwrap();
    assert_eq!(sub.data(), expected.data());
}

#[test]
fn spy_stays_in_sync_through_incremental_updates() {
    let mut tree = SurfaceTree::new();
    let m = tree.create_master(rect(0, 0, 100, 100), Theme::CLASSIC);
    let r1 = rect(0, 0, 60, 60);
    let r2 = rect(40, 40, 100, 100);
    let back = filled(&mut tree, m, r1, RED);
    filled(&mut tree, m, r2, BLUE);
    let window = rect(20, 20, 80, 80);
    let spy = tree.create_spy(window, SpyMode::Linear);
    tree.add_child(m, spy, Placement::Front);
    tree.load(m);

    tree.set_behavior(back, Box::new(Fill(GREY)));
    tree.display(back);
    let expected = composite(&[(r1, GREY), (r2, BLUE)], window);
    assert_eq!(tree.sub_buffer(spy).unwrap().data(), expected.data());

    let scratch = tree.sub_buffer(spy).unwrap().data().to_vec();
    tree.refresh_sub(spy);
    assert_eq!(tree.sub_buffer(spy).unwrap().data(), &scratch[..]);
}

#[test]
fn move_and_move_back_restores_regions_and_pixels() {
    let mut tree = SurfaceTree::new();
    let m = master(&mut tree, 120, 120);
    let mut lcg = Lcg::new(7);
    let nodes: Vec<NodeId> = (0..6)
        .map(|i| {
            let color = rgb(40 * i, 255 - 40 * i, 90);
            filled(&mut tree, m, lcg.rect(120), color)
        })
        .collect();
    tree.load(m);

    let snapshot = |tree: &SurfaceTree| -> Vec<Region> {
        nodes
            .iter()
            .map(|&n| tree.visible_region(n).clone())
            .chain([tree.visible_region(m).clone()])
            .collect()
    };
    let regions = snapshot(&tree);
    let pixels = tree.master_buffer(m).unwrap().data().to_vec();

    let target = nodes[2];
    let home = tree.logical(target);
    tree.move_to(target, 3, 61);
    tree.move_to(target, home.left, home.top);

    assert_eq!(snapshot(&tree), regions);
    assert_eq!(tree.master_buffer(m).unwrap().data(), &pixels[..]);
}

#[test]
fn moving_a_disjoint_sibling_leaves_the_other_alone() {
    let mut tree = SurfaceTree::new();
    let m = master(&mut tree, 200, 100);
    let left = filled(&mut tree, m, rect(0, 0, 50, 50), RED);
    let right = filled(&mut tree, m, rect(100, 0, 150, 50), BLUE);
    tree.load(m);

    let before = tree.visible_region(left).clone();
    tree.reset_diagnostics();
    tree.move_to(right, 120, 30);
    assert_eq!(*tree.visible_region(left), before);
    assert_eq!(tree.display_count(left), 0);
    assert_eq!(tree.visible_region(right).area(), 2_500);
}

#[test]
fn regions_match_brute_force_after_random_moves() {
    let mut tree = SurfaceTree::new();
    let m = master(&mut tree, 64, 64);
    let mut lcg = Lcg::new(42);
    let nodes: Vec<NodeId> = (0..8)
        .map(|_| filled(&mut tree, m, lcg.rect(64), RED))
        .collect();
    tree.load(m);

    for step in 0..40 {
        let n = nodes[lcg.below(8) as usize];
        match step % 3 {
            0 => tree.move_to(n, lcg.below(60), lcg.below(60)),
            1 => tree.resize(n, 1 + lcg.below(40), 1 + lcg.below(40)),
            _ => {
                tree.z_shift(n, lcg.below(5) - 2);
            }
        }

        let order: Vec<NodeId> = tree.children(m).collect();
        for (i, &node) in order.iter().enumerate() {
            let mut expected = Region::from_rect(tree.clipped(node).unwrap_or(Rect::EMPTY));
            for &later in &order[i + 1..] {
                if let Some(r) = tree.clipped(later) {
                    expected.occlude_rect(r);
                }
            }
            let actual = tree.visible_region(node);
            assert_eq!(actual.area(), expected.area(), "step {step}, node {i}");
            for y in (0..64).step_by(3) {
                for x in (0..64).step_by(3) {
                    assert_eq!(actual.contains(x, y), expected.contains(x, y));
                }
            }
        }
    }
}

#[test]
fn batched_moves_display_each_node_once() {
    let (mut tree, _, a, b) = overlapping_pair();
    tree.reset_diagnostics();
    tree.batch(|t| {
        t.move_to(b, 60, 60);
        t.move_to(b, 70, 70);
        t.move_to(b, 80, 80);
    });
    assert_eq!(tree.display_count(b), 1);
    assert_eq!(tree.diagnostics().flushes, 1);
    assert_eq!(tree.visible_region(a).area(), 10_000 - 400);
}

#[test]
fn removing_a_middle_node_repaints_what_it_covered() {
    let mut tree = SurfaceTree::new();
    let m = master(&mut tree, 100, 100);
    filled(&mut tree, m, rect(0, 0, 60, 60), RED);
    let mid = filled(&mut tree, m, rect(20, 20, 80, 80), BLUE);
    tree.load(m);
    assert_eq!(tree.master_buffer(m).unwrap().pixel(30, 30), Some(BLUE));

    tree.remove(mid);
    let buf = tree.master_buffer(m).unwrap();
    assert_eq!(buf.pixel(30, 30), Some(RED));
    assert_eq!(buf.pixel(70, 70), Some(GREY));
}

#[test]
#[should_panic(expected = "stale NodeId")]
fn destroyed_handles_are_rejected_everywhere() {
    let mut tree = SurfaceTree::new();
    let m = master(&mut tree, 10, 10);
    let a = filled(&mut tree, m, rect(0, 0, 5, 5), RED);
    tree.remove(a);
    tree.destroy(a);
    tree.z_shift(a, 1);
}

#[test]
fn tiled_siblings_each_see_their_whole_clip() {
    let mut tree = SurfaceTree::new();
    let m = master(&mut tree, 100, 100);
    let tiles: Vec<NodeId> = [
        rect(0, 0, 50, 50),
        rect(50, 0, 100, 50),
        rect(0, 50, 50, 100),
        rect(50, 50, 100, 100),
    ]
    .into_iter()
    .map(|r| filled(&mut tree, m, r, BLUE))
    .collect();
    tree.load(m);

    for &tile in &tiles {
        let clip = tree.clipped(tile).unwrap();
        assert_eq!(tree.visible_region(tile).as_slice(), &[clip]);
    }
    assert!(tree.visible_region(m).is_empty());
}

#[test]
fn childless_nested_master_does_not_feed_the_outer_spy() {
    let mut tree = SurfaceTree::new();
    let m = tree.create_master(rect(0, 0, 100, 100), Theme::CLASSIC);
    filled(&mut tree, m, rect(0, 0, 100, 100), RED);
    let nested = tree.create_master(rect(40, 40, 80, 80), Theme::CLASSIC);
    tree.set_behavior(nested, Box::new(Fill(GREY)));
    tree.add_child(m, nested, Placement::Front);
    let spy = tree.create_spy(rect(20, 20, 90, 90), SpyMode::Linear);
    tree.add_child(m, spy, Placement::Front);
    tree.load(m);
    assert_eq!(tree.next_spy(nested), None);

    tree.display(nested);
    let after_display = tree.sub_buffer(spy).unwrap().data().to_vec();
    assert_eq!(tree.sub_buffer(spy).unwrap().pixel(0, 0), Some(RED));
    tree.refresh_sub(spy);
    assert_eq!(tree.sub_buffer(spy).unwrap().data(), &after_display[..]);
}
