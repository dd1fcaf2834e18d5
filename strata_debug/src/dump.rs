// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Snapshots of a surface tree.
//!
//! [`dump_tree`] renders a subtree as indented text, one node per line, back
//! to front. [`dump_json`] produces the same information as a JSON value.

use std::fmt::Write as _;

use serde_json::{Value, json};

use strata_core::tree::{NodeId, NodeKind, SurfaceTree};

use crate::flag_names;

fn kind_name(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Plain => "plain",
        NodeKind::Master => "master",
        NodeKind::Spy => "spy",
    }
}

/// Renders `root` and its descendants as indented text.
///
/// Each line shows the node, its kind, logical and clipped rectangles, the
/// size of its visible region, and its flags and state.
#[must_use]
pub fn dump_tree(tree: &SurfaceTree, root: NodeId) -> String {
    let mut out = String::new();
    dump_node(tree, root, 0, &mut out);
    out
}

fn dump_node(tree: &SurfaceTree, id: NodeId, depth: usize, out: &mut String) {
    let visible = tree.visible_region(id);
    let clipped = tree
        .clipped(id)
        .map_or_else(|| "none".to_owned(), |r| format!("{r:?}"));
    let _ = write!(
        out,
        "{:indent$}{id} {} logical={:?} clipped={clipped} visible={}/{}",
        "",
        kind_name(tree.kind(id)),
        tree.logical(id),
        visible.len(),
        visible.area(),
        indent = depth * 2,
    );
    let flags = tree.flags(id);
    if !flags.is_empty() {
        let _ = write!(out, " flags={}", flag_names(flags.iter_names()));
    }
    let _ = writeln!(out, " state={}", flag_names(tree.state(id).iter_names()));
    for child in tree.children(id) {
        dump_node(tree, child, depth + 1, out);
    }
}

/// Describes `root` and its descendants as nested JSON objects.
#[must_use]
pub fn dump_json(tree: &SurfaceTree, root: NodeId) -> Value {
    let rect = |r: strata_core::rect::Rect| json!([r.left, r.top, r.right, r.bottom]);
    let visible = tree.visible_region(root);
    let children: Vec<Value> = tree
        .children(root)
        .map(|child| dump_json(tree, child))
        .collect();
    json!({
        "id": root.to_string(),
        "kind": kind_name(tree.kind(root)),
        "logical": rect(tree.logical(root)),
        "clipped": tree.clipped(root).map(rect),
        "visible": visible.iter().map(|r| rect(*r)).collect::<Vec<_>>(),
        "flags": tree.flags(root).iter_names().map(|(n, _)| n).collect::<Vec<_>>(),
        "state": tree.state(root).iter_names().map(|(n, _)| n).collect::<Vec<_>>(),
        "children": children,
    })
}

#[cfg(test)]
mod tests {
    use strata_core::rect::Rect;
    use strata_core::surface::Theme;
    use strata_core::tree::{NodeFlags, Placement};

    use super::*;

    fn scene() -> (SurfaceTree, NodeId) {
        let mut tree = SurfaceTree::new();
        let m = tree.create_master(Rect::new(0, 0, 100, 100), Theme::CLASSIC);
        let panel = tree.create_node(Rect::new(10, 10, 60, 60));
        let button = tree.create_node(Rect::new(5, 5, 25, 15));
        tree.add_child(m, panel, Placement::Front);
        tree.add_child(panel, button, Placement::Front);
        tree.set_flag(button, NodeFlags::Z_FIXED, true);
        tree.load(m);
        (tree, m)
    }

    #[test]
    fn text_dump_indents_children() {
        let (tree, m) = scene();
        let text = dump_tree(&tree, m);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("#0 master logical=[0,0|100,100]"), "got: {text}");
        assert!(lines[1].starts_with("  #1 plain logical=[10,10|60,60]"), "got: {text}");
        assert!(lines[2].starts_with("    #2 plain"), "got: {text}");
        assert!(lines[2].contains("flags=Z_FIXED"), "got: {text}");
        assert!(lines[2].contains("visible=1/200"), "got: {text}");
        assert!(lines[0].contains("ACTIVE"), "got: {text}");
    }

    #[test]
    fn json_dump_nests_children() {
        let (tree, m) = scene();
        let value = dump_json(&tree, m);
        assert_eq!(value["kind"], "master");
        let panel = &value["children"][0];
        assert_eq!(panel["logical"], json!([10, 10, 60, 60]));
        assert_eq!(panel["visible"].as_array().map(Vec::len), Some(4));
        let button = &panel["children"][0];
        assert_eq!(button["flags"], json!(["Z_FIXED"]));
        assert_eq!(button["clipped"], json!([15, 15, 35, 25]));
    }
}
