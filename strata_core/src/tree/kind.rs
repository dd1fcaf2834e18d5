// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node roles and the data only some roles carry.

use crate::surface::{Pixmap, Theme};

/// The role of a node, fixed at creation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// An ordinary surface drawing into its master's buffer.
    #[default]
    Plain,
    /// Root of compositing: owns the buffer and theme its subtree draws into.
    Master,
    /// Keeps a sub-buffer with everything behind it.
    Spy,
}

/// How a spy surface reacts to incremental sub-buffer updates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SpyMode {
    /// Pixels map one-to-one onto the screen; repaint only what changed.
    #[default]
    Linear,
    /// The image may move or distort; repaint the whole surface.
    Whole,
}

/// Where [`add_child`](super::SurfaceTree::add_child) links the new child.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Placement {
    /// In front of every existing sibling.
    #[default]
    Front,
    /// Behind every existing sibling.
    Back,
}

#[derive(Debug)]
pub(crate) struct MasterData {
    pub(crate) buffer: Option<Pixmap>,
    pub(crate) theme: Theme,
}

#[derive(Debug)]
pub(crate) struct SpyData {
    pub(crate) buffer: Option<Pixmap>,
    pub(crate) mode: SpyMode,
}
