// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paint behaviors, spy effects and damage collection for strata.
//!
//! This crate provides ready-made [`Behavior`](strata_core::behavior::Behavior)
//! implementations and the glue between the engine and a presenter:
//!
//! - [`Solid`] and [`Bevel`]: opaque fills and raised or sunken frames in
//!   the master's theme colors.
//! - [`Tint`], [`MaskedImage`] and [`Magnifier`]: spy surface effects that
//!   draw from the composite behind them.
//! - [`DamageRegion`]: what part of a master buffer must be presented again.
//! - [`DamageCollector`]: a trace sink that turns painted fragments into a
//!   [`DamageRegion`] per master.

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

mod collector;
mod damage;
mod effects;
mod paint;

pub use collector::DamageCollector;
pub use damage::DamageRegion;
pub use effects::{Magnifier, MaskedImage, Tint};
pub use paint::{Bevel, Solid};
