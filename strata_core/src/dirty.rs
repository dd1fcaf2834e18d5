// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! Strata uses [`understory_dirty`] as the worklist behind display
//! delegation. Channels are independent, local-only categories: a node
//! marked on one channel is never propagated to its descendants.
//!
//! # Consumption
//!
//! [`DISPLAY`] is marked by [`SurfaceTree::display`](crate::tree::SurfaceTree::display)
//! while a delegation span is open and drained, deduplicated and in
//! deterministic order, when the outermost span closes. Callers never query
//! it directly.

use understory_dirty::Channel;

/// Node needs repainting once the current delegation span closes.
pub const DISPLAY: Channel = Channel::new(0);
