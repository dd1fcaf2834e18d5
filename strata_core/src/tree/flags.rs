// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node flag sets.
//!
//! [`NodeFlags`] are chosen by callers. [`NodeState`] is owned by the engine:
//! it can be read through [`SurfaceTree::state`](super::SurfaceTree::state)
//! but only changes as a side effect of tree operations.

use bitflags::bitflags;

bitflags! {
    /// Behavior switches set by callers.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u16 {
        /// Siblings cannot be z-shifted past this node.
        const Z_FIXED = 1 << 0;
        /// Position relative to the parent's full rectangle instead of its
        /// content area, and clip against it too.
        const IGNORE_ESTATE = 1 << 1;
        /// Run the move/resize hooks even when the rectangle is unchanged.
        const ALWAYS_RESIZE = 1 << 2;
        /// Never shown, whatever the caller asks.
        const INVISIBLE = 1 << 3;
    }
}

bitflags! {
    /// Engine-maintained state.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct NodeState: u16 {
        /// Currently visible (every ancestor is visible too).
        const VISIBLE = 1 << 0;
        /// Visibility to restore when an ancestor is shown again.
        const SHOULD_BE_VISIBLE = 1 << 1;
        /// Loaded and past the whole load pass; eligible for painting.
        const ACTIVE = 1 << 2;
        /// Between pre-load and unload.
        const LOADED = 1 << 3;
        /// Inside the load pass.
        const LOADING = 1 << 4;
        /// Paint requests are honored.
        const SENSITIVE = 1 << 5;
        /// Has never been loaded.
        const FIRST_LOAD = 1 << 6;
        /// Clipped away entirely by an ancestor.
        const COMPLETE_CLIP = 1 << 7;
        /// Right or bottom edge trimmed by an ancestor.
        const POSITIVE_CLIP = 1 << 8;
        /// Left or top edge trimmed by an ancestor.
        const NEGATIVE_CLIP = 1 << 9;
        /// The node's layout is running.
        const PACKING = 1 << 10;
        /// A pack was requested while [`PACKING`](Self::PACKING).
        const REPACK = 1 << 11;
    }
}

impl NodeState {
    /// Initial state of a freshly created node.
    pub(crate) const CREATED: Self = Self::VISIBLE
        .union(Self::SHOULD_BE_VISIBLE)
        .union(Self::SENSITIVE)
        .union(Self::FIRST_LOAD);

    /// Any of the partial-clip markers.
    pub(crate) const PARTIAL_CLIP: Self = Self::POSITIVE_CLIP.union(Self::NEGATIVE_CLIP);
}
