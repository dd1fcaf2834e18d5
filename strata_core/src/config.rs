// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Engine configuration.
//!
//! [`EngineConfig`] switches individual stages of the engine on or off. The
//! defaults run everything; the presets exist for tests and for isolating a
//! stage while debugging flicker or stale pixels.

/// Switches for the optional stages of the compositing engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Sort visible fragments by top edge after each recompute.
    pub sort_fragments: bool,
    /// Honor [`DamageFlags::OPTIMIZE`](crate::tree::DamageFlags::OPTIMIZE).
    ///
    /// When off, every damage pass recurses as if each dirty rectangle
    /// overlapped every node.
    pub optimize_damage: bool,
    /// Batch displays requested inside a delegation span.
    ///
    /// When off, [`display`](crate::tree::SurfaceTree::display) paints
    /// immediately even inside a span.
    pub delegate_displays: bool,
    /// Keep spy sub-buffers up to date.
    pub update_spies: bool,
    /// Invoke paint callbacks at all.
    pub paint: bool,
}

impl EngineConfig {
    /// Everything enabled.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            sort_fragments: true,
            optimize_damage: true,
            delegate_displays: true,
            update_spies: true,
            paint: true,
        }
    }

    /// Displays are painted as soon as they are requested.
    #[must_use]
    pub const fn unbatched() -> Self {
        Self {
            delegate_displays: false,
            ..Self::new()
        }
    }

    /// Geometry and visibility only; no pixels are produced.
    #[must_use]
    pub const fn headless() -> Self {
        Self {
            update_spies: false,
            paint: false,
            ..Self::new()
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
