// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, tree dumps, and Chrome trace export for strata
//! diagnostics.
//!
//! This crate provides [`TraceSink`](strata_core::trace::TraceSink)
//! implementations and inspection helpers for development and post-mortem
//! analysis:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`]: compact binary recording with
//!   [`recorder::decode`] for playback.
//! - [`chrome::export`]: writes Chrome Trace Event Format JSON from recorded
//!   bytes.
//! - [`dump::dump_tree`] and [`dump::dump_json`]: snapshots of a subtree's
//!   geometry, visible regions and state.

pub mod chrome;
pub mod dump;
pub mod pretty;
pub mod recorder;

/// Joins bitflag names with `|`, or `-` when none are set.
pub(crate) fn flag_names<T>(names: impl Iterator<Item = (&'static str, T)>) -> String {
    let joined: Vec<&str> = names.map(|(name, _)| name).collect();
    if joined.is_empty() {
        "-".to_owned()
    } else {
        joined.join("|")
    }
}
