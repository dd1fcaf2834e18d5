// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spy surface effects.
//!
//! Each behavior here is meant for a spy surface: it draws from the
//! sub-buffer holding everything behind the node rather than from the master
//! buffer.

use kurbo::{Affine, Point, Vec2};

use strata_core::behavior::{Behavior, SurfaceInfo};
use strata_core::rect::Rect;
use strata_core::region::Region;
use strata_core::surface::{Color, GraphicsContext, Pixmap, Theme};

/// Blends a color over whatever lies behind the node.
///
/// Use with [`SpyMode::Linear`](strata_core::tree::SpyMode::Linear). The tint
/// is applied to the sub-buffer as it changes, so drawing is a plain copy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tint {
    /// Color laid over the background.
    pub color: Color,
    /// Coverage of the tint, 0 (clear) to 255 (opaque).
    pub alpha: u8,
}

impl Tint {
    /// Creates a tint.
    #[must_use]
    pub const fn new(color: Color, alpha: u8) -> Self {
        Self { color, alpha }
    }
}

impl Behavior for Tint {
    fn draw(&self, gc: &mut GraphicsContext<'_>, surface: &SurfaceInfo<'_>) {
        match surface.sub_buffer {
            Some(sub) => gc.blit(sub, 0, 0),
            None => gc.fill_rect(surface.local_bounds(), self.color),
        }
    }

    fn sub_changed(&mut self, sub_buffer: &mut Pixmap, changed: &Region) {
        let theme = Theme::CLASSIC;
        for r in changed {
            let mut gc = GraphicsContext::new(sub_buffer, 0, 0, *r, &theme);
            gc.blend_rect(*r, self.color, self.alpha);
        }
    }
}

/// An irregular window: an image whose key-colored pixels show what lies
/// behind, and ignore hits.
///
/// Use with [`SpyMode::Linear`](strata_core::tree::SpyMode::Linear).
#[derive(Clone, Debug)]
pub struct MaskedImage {
    image: Pixmap,
    key: Color,
}

impl MaskedImage {
    /// Creates a masked image; pixels equal to `key` are see-through.
    #[must_use]
    pub fn new(image: Pixmap, key: Color) -> Self {
        Self { image, key }
    }

    /// The image.
    #[must_use]
    pub fn image(&self) -> &Pixmap {
        &self.image
    }
}

impl Behavior for MaskedImage {
    fn draw(&self, gc: &mut GraphicsContext<'_>, surface: &SurfaceInfo<'_>) {
        if let Some(sub) = surface.sub_buffer {
            gc.blit(sub, 0, 0);
        }
        gc.blit_keyed(&self.image, 0, 0, Some(self.key));
    }

    fn normal_size(&self) -> (i32, i32) {
        (self.image.width(), self.image.height())
    }

    fn is_opaque_at(&self, x: i32, y: i32, _surface: &SurfaceInfo<'_>) -> bool {
        self.image.pixel(x, y).is_some_and(|c| c != self.key)
    }
}

/// Shows what lies behind the node, enlarged around its center.
///
/// Use with [`SpyMode::Whole`](strata_core::tree::SpyMode::Whole): any change
/// behind the lens moves pixels everywhere in it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Magnifier {
    /// Scale factor; values below 1 shrink.
    pub zoom: f64,
}

impl Magnifier {
    /// Creates a magnifier.
    #[must_use]
    pub const fn new(zoom: f64) -> Self {
        Self { zoom }
    }

    /// Maps sub-buffer coordinates to lens coordinates for a lens of the
    /// given size.
    #[must_use]
    pub fn transform(&self, width: i32, height: i32) -> Affine {
        let center = Vec2::new(f64::from(width) / 2.0, f64::from(height) / 2.0);
        Affine::translate(center) * Affine::scale(self.zoom) * Affine::translate(-center)
    }

    /// The part of the sub-buffer visible through a lens of the given size.
    #[must_use]
    pub fn source_rect(&self, width: i32, height: i32) -> Rect {
        let lens = Rect::new(0, 0, width, height);
        let inverse = self.transform(width, height).inverse();
        Rect::from_kurbo(inverse.transform_rect_bbox(lens.to_kurbo()))
    }
}

impl Behavior for Magnifier {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "sample positions are checked to lie inside the sub-buffer"
    )]
    fn draw(&self, gc: &mut GraphicsContext<'_>, surface: &SurfaceInfo<'_>) {
        let Some(sub) = surface.sub_buffer else {
            return;
        };
        if self.zoom <= 0.0 {
            return;
        }
        let inverse = self.transform(surface.width, surface.height).inverse();
        let (w, h) = (f64::from(sub.width()), f64::from(sub.height()));
        gc.shade_rect(surface.local_bounds(), |x, y| {
            let p = inverse * Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
            if p.x < 0.0 || p.y < 0.0 || p.x >= w || p.y >= h {
                return 0;
            }
            sub.pixel(p.x as i32, p.y as i32).unwrap_or(0)
        });
    }
}
