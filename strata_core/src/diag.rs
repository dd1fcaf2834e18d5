// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resettable engine counters.

/// Running totals maintained by a [`SurfaceTree`](crate::tree::SurfaceTree).
///
/// Counters only grow until [`reset`](Self::reset) is called, except
/// `live_nodes`, which tracks the current population and survives resets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Diagnostics {
    /// Nodes created since the last reset.
    pub nodes_created: u64,
    /// Nodes currently allocated.
    pub live_nodes: u32,
    /// Nodes painted through a display (immediate or flushed).
    pub displays: u64,
    /// Fragments handed to paint callbacks.
    pub fragments_painted: u64,
    /// Top-level damage passes.
    pub damage_passes: u64,
    /// Full spy sub-buffer recomputes.
    pub spy_refreshes: u64,
    /// Delegation flushes.
    pub flushes: u64,
}

impl Diagnostics {
    /// Zeroes every counter except `live_nodes`.
    pub fn reset(&mut self) {
        *self = Self {
            live_nodes: self.live_nodes,
            ..Self::default()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_keeps_population() {
        let mut d = Diagnostics {
            nodes_created: 5,
            live_nodes: 3,
            displays: 9,
            ..Diagnostics::default()
        };
        d.reset();
        assert_eq!(d.live_nodes, 3);
        assert_eq!(d.nodes_created, 0);
        assert_eq!(d.displays, 0);
    }
}
