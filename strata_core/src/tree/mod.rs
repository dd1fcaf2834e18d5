// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The surface tree and the engine operating on it.
//!
//! A *surface* is a rectangular node in a tree. Each surface has:
//!
//! - An identity ([`NodeId`]), a generational handle that becomes stale when
//!   the node is destroyed.
//! - Topology: parent, first child and sibling links. Siblings are ordered
//!   back to front.
//! - Geometry: a logical rectangle set by the caller, plus physical and
//!   clipped rectangles maintained by the engine (see [`Insets`]).
//! - A visible [`Region`](crate::region::Region): its clipped rectangle
//!   minus everything painted after it.
//!
//! Three kinds of node exist ([`NodeKind`]). Masters own the pixel buffer
//! their subtree paints into. Spy surfaces keep a sub-buffer with everything
//! behind them, for translucent and magnifying effects. Plain nodes do
//! neither.
//!
//! # Painting
//!
//! Painting never happens wholesale. [`SurfaceTree::display`] paints a
//! node's visible region, [`SurfaceTree::draw_damage`] repaints a dirty
//! area through every node that shows it, and structural operations (move,
//! resize, z-shift, hide, remove) fill exactly the gap they leave. Inside a
//! delegation span ([`SurfaceTree::batch`]) repeated displays of the same
//! node collapse into one.

mod damage;
mod display;
mod flags;
mod geometry;
mod hit;
mod id;
mod kind;
mod lifecycle;
#[cfg(test)]
mod scenarios;
mod spy;
mod store;
mod traverse;
mod visibility;
mod zorder;

pub use damage::DamageFlags;
pub use flags::{NodeFlags, NodeState};
pub use geometry::{Anchor, Insets};
pub use id::NodeId;
pub use kind::{NodeKind, Placement, SpyMode};
pub use store::SurfaceTree;
pub use traverse::{Children, Descendants};
