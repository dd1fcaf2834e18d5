// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Occlusion, damage and compositing engine for retained-mode surface trees.
//!
//! `strata_core` keeps a tree of rectangular surfaces and repaints only what
//! changes. It is `no_std` compatible (with `alloc`) and stores nodes in
//! struct-of-arrays form behind generational handles.
//!
//! # Architecture
//!
//! ```text
//!   caller ──► SurfaceTree (move / resize / z_shift / hide / remove)
//!                  │
//!                  ├─► visible regions   (rect / region algebra)
//!                  ├─► damage passes     (fill the gap left behind)
//!                  └─► spy sub-buffers   (what lies behind a surface)
//!                  │
//!                  ▼
//!   Behavior::draw ──► GraphicsContext ──► master Pixmap
//! ```
//!
//! **[`rect`]** and **[`region`]**: integer rectangles and disjoint
//! rectangle lists with occlusion.
//!
//! **[`tree`]**: the [`SurfaceTree`](tree::SurfaceTree), covering topology,
//! geometry, visibility, damage, z-order, spy compositing and lifecycle.
//!
//! **[`behavior`]**: the [`Behavior`](behavior::Behavior) paint callback and
//! the [`Layout`](behavior::Layout) collaborator.
//!
//! **[`surface`]**: pixel buffers, themes and the clipped
//! [`GraphicsContext`](surface::GraphicsContext) handed to behaviors.
//!
//! **[`dirty`]**: the `understory_dirty` channel behind display delegation.
//!
//! **[`config`]**, **[`diag`]**: engine switches and resettable counters.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types,
//! with a zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-fragment
//!   paint events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod behavior;
pub mod config;
pub mod diag;
pub mod dirty;
pub mod rect;
pub mod region;
pub mod surface;
pub mod trace;
pub mod tree;
