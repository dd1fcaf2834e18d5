// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pixel buffers and the clipped drawing context handed to paint callbacks.
//!
//! [`Pixmap`] is a plain `0xAARRGGBB` buffer. Masters own one for their whole
//! subtree and spy surfaces own one for the composite behind them.
//!
//! [`GraphicsContext`] is what a [`Behavior`](crate::behavior::Behavior)
//! draws through: coordinates are local to the painted node, and every
//! primitive is clipped to the fragment being painted and to the target's
//! bounds.

use alloc::vec;
use alloc::vec::Vec;

use crate::rect::Rect;

/// A packed `0xAARRGGBB` color.
pub type Color = u32;

/// Builds an opaque color from its channels.
#[inline]
#[must_use]
pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
    0xFF00_0000 | (r as u32) << 16 | (g as u32) << 8 | b as u32
}

/// Blends `src` over `dst` with coverage `alpha` (0 to 255).
#[must_use]
pub const fn blend(dst: Color, src: Color, alpha: u8) -> Color {
    let a = alpha as u32;
    let inv = 255 - a;
    let mut out = 0xFF00_0000;
    let mut shift = 0;
    while shift < 24 {
        let d = (dst >> shift) & 0xFF;
        let s = (src >> shift) & 0xFF;
        out |= ((s * a + d * inv + 127) / 255) << shift;
        shift += 8;
    }
    out
}

/// Shared palette that every node under a master draws with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Theme {
    /// Default fill for containers.
    pub background: Color,
    /// Face color of raised elements.
    pub face: Color,
    /// Highlight edge of bevels.
    pub light: Color,
    /// Shadow edge of bevels.
    pub shadow: Color,
    /// Foreground for text and glyphs.
    pub text: Color,
}

impl Theme {
    /// A neutral grey palette.
    pub const CLASSIC: Self = Self {
        background: rgb(0x00, 0x80, 0x80),
        face: rgb(0xC0, 0xC0, 0xC0),
        light: rgb(0xFF, 0xFF, 0xFF),
        shadow: rgb(0x80, 0x80, 0x80),
        text: rgb(0x00, 0x00, 0x00),
    };
}

impl Default for Theme {
    fn default() -> Self {
        Self::CLASSIC
    }
}

/// An owned pixel buffer.
#[derive(Clone, PartialEq, Eq)]
pub struct Pixmap {
    width: i32,
    height: i32,
    data: Vec<Color>,
}

impl core::fmt::Debug for Pixmap {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Pixmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl Pixmap {
    /// Allocates a zeroed (fully transparent) buffer. Negative sizes clamp to
    /// zero.
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize],
        }
    }

    /// Width in pixels.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// The buffer's own bounds.
    #[inline]
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    /// Raw row-major pixel data.
    #[inline]
    #[must_use]
    pub fn data(&self) -> &[Color] {
        &self.data
    }

    /// Returns the pixel at `(x, y)`, or `None` outside the buffer.
    #[must_use]
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.index(x, y).map(|i| self.data[i])
    }

    /// Writes the pixel at `(x, y)`; out-of-bounds writes are dropped.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if let Some(i) = self.index(x, y) {
            self.data[i] = color;
        }
    }

    /// Fills the whole buffer.
    pub fn fill(&mut self, color: Color) {
        self.data.fill(color);
    }

    /// Fills `rect` (buffer coordinates), clipped to the buffer.
    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        let Some(r) = self.bounds().intersection(rect) else {
            return;
        };
        for y in r.top..r.bottom {
            let row = (y * self.width) as usize;
            self.data[row + r.left as usize..row + r.right as usize].fill(color);
        }
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        (x >= 0 && y >= 0 && x < self.width && y < self.height)
            .then(|| (y * self.width + x) as usize)
    }
}

/// A clipped, translated view onto a [`Pixmap`].
///
/// All coordinates passed to drawing methods are local to the node being
/// painted; the context adds the node's origin and discards anything outside
/// the current clip.
#[derive(Debug)]
pub struct GraphicsContext<'a> {
    target: &'a mut Pixmap,
    origin_x: i32,
    origin_y: i32,
    clip: Rect,
    theme: &'a Theme,
}

impl<'a> GraphicsContext<'a> {
    /// Creates a context drawing into `target` with local `(0, 0)` at
    /// `(origin_x, origin_y)`, clipped to `clip` (target coordinates).
    #[must_use]
    pub fn new(
        target: &'a mut Pixmap,
        origin_x: i32,
        origin_y: i32,
        clip: Rect,
        theme: &'a Theme,
    ) -> Self {
        let clip = target.bounds().intersection(clip).unwrap_or(Rect::EMPTY);
        Self {
            target,
            origin_x,
            origin_y,
            clip,
            theme,
        }
    }

    /// The palette of the master being drawn into.
    #[inline]
    #[must_use]
    pub fn theme(&self) -> &Theme {
        self.theme
    }

    /// The current clip in local coordinates.
    #[inline]
    #[must_use]
    pub fn clip(&self) -> Rect {
        if self.clip.is_empty() {
            return Rect::EMPTY;
        }
        self.clip.offset(-self.origin_x, -self.origin_y)
    }

    /// The local origin in target coordinates.
    #[inline]
    #[must_use]
    pub fn origin(&self) -> (i32, i32) {
        (self.origin_x, self.origin_y)
    }

    /// Reads back a pixel at local `(x, y)` if it lies inside the clip.
    #[must_use]
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        let (tx, ty) = (x + self.origin_x, y + self.origin_y);
        if self.clip.contains(tx, ty) {
            self.target.pixel(tx, ty)
        } else {
            None
        }
    }

    /// Writes a pixel at local `(x, y)`.
    pub fn put_pixel(&mut self, x: i32, y: i32, color: Color) {
        let (tx, ty) = (x + self.origin_x, y + self.origin_y);
        if self.clip.contains(tx, ty) {
            self.target.set_pixel(tx, ty, color);
        }
    }

    /// Fills a local rectangle.
    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        if let Some(r) = self
            .clip
            .intersection(rect.offset(self.origin_x, self.origin_y))
        {
            self.target.fill_rect(r, color);
        }
    }

    /// Blends `color` over a local rectangle with coverage `alpha`.
    pub fn blend_rect(&mut self, rect: Rect, color: Color, alpha: u8) {
        let Some(r) = self
            .clip
            .intersection(rect.offset(self.origin_x, self.origin_y))
        else {
            return;
        };
        for y in r.top..r.bottom {
            for x in r.left..r.right {
                if let Some(dst) = self.target.pixel(x, y) {
                    self.target.set_pixel(x, y, blend(dst, color, alpha));
                }
            }
        }
    }

    /// Draws a one-pixel horizontal line from `x0` to `x1` (exclusive).
    pub fn hline(&mut self, x0: i32, x1: i32, y: i32, color: Color) {
        self.fill_rect(Rect::new(x0, y, x1, y + 1), color);
    }

    /// Draws a one-pixel vertical line from `y0` to `y1` (exclusive).
    pub fn vline(&mut self, x: i32, y0: i32, y1: i32, color: Color) {
        self.fill_rect(Rect::new(x, y0, x + 1, y1), color);
    }

    /// Copies `src` so that its `(0, 0)` lands on local `(x, y)`.
    pub fn blit(&mut self, src: &Pixmap, x: i32, y: i32) {
        self.blit_keyed(src, x, y, None);
    }

    /// Like [`blit`](Self::blit) but skips pixels equal to `key`.
    pub fn blit_keyed(&mut self, src: &Pixmap, x: i32, y: i32, key: Option<Color>) {
        let dest = src.bounds().offset(x + self.origin_x, y + self.origin_y);
        let Some(r) = self.clip.intersection(dest) else {
            return;
        };
        for ty in r.top..r.bottom {
            for tx in r.left..r.right {
                let Some(color) = src.pixel(tx - dest.left, ty - dest.top) else {
                    continue;
                };
                if key != Some(color) {
                    self.target.set_pixel(tx, ty, color);
                }
            }
        }
    }

    /// Runs `shade` for every clipped pixel of a local rectangle, passing
    /// local coordinates, and stores the returned color.
    pub fn shade_rect(&mut self, rect: Rect, mut shade: impl FnMut(i32, i32) -> Color) {
        let Some(r) = self
            .clip
            .intersection(rect.offset(self.origin_x, self.origin_y))
        else {
            return;
        };
        for ty in r.top..r.bottom {
            for tx in r.left..r.right {
                let color = shade(tx - self.origin_x, ty - self.origin_y);
                self.target.set_pixel(tx, ty, color);
            }
        }
    }
}
