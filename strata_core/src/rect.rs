// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer rectangles and overlap classification.
//!
//! Rectangles are half-open: `right` and `bottom` are exclusive, so a
//! rectangle with `right == left` covers no pixels. [`Rect::EMPTY`] is the
//! sentinel used for "fully clipped" and is never stored inside a
//! [`Region`](crate::region::Region).

use core::fmt;

/// An axis-aligned integer rectangle.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Left edge (inclusive).
    pub left: i32,
    /// Top edge (inclusive).
    pub top: i32,
    /// Right edge (exclusive).
    pub right: i32,
    /// Bottom edge (exclusive).
    pub bottom: i32,
}

/// How one rectangle overlaps another.
///
/// Produced by [`Rect::check_intersect`] and [`Rect::intersect`]. The
/// classification is always about the *second* rectangle relative to the
/// first: `a.check_intersect(b)` reports how much of `b` had to be trimmed to
/// fit inside `a`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Overlap {
    /// No shared pixels.
    Disjoint,
    /// `b` lies entirely inside `a` (a perfect fit).
    Contained,
    /// `b` overlaps `a` but extends past `n` of its sides (1..=4).
    Clipped(u8),
}

impl Overlap {
    /// Returns the classic clip count: `-1` for disjoint, `0` for contained,
    /// otherwise the number of trimmed sides.
    #[inline]
    #[must_use]
    pub const fn clip_count(self) -> i8 {
        match self {
            Self::Disjoint => -1,
            Self::Contained => 0,
            Self::Clipped(n) => n as i8,
        }
    }

    /// Returns `true` if the rectangles share at least one pixel.
    #[inline]
    #[must_use]
    pub const fn overlaps(self) -> bool {
        !matches!(self, Self::Disjoint)
    }
}

impl Rect {
    /// The "no rectangle" sentinel.
    pub const EMPTY: Self = Self {
        left: -1,
        top: -1,
        right: -1,
        bottom: -1,
    };

    /// Creates a rectangle from its four edges.
    #[inline]
    #[must_use]
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Creates a rectangle from an origin and a size.
    #[inline]
    #[must_use]
    pub const fn from_origin_size(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::new(x, y, x.saturating_add(width), y.saturating_add(height))
    }

    /// Width in pixels (may be negative for malformed input).
    #[inline]
    #[must_use]
    pub const fn width(self) -> i32 {
        self.right - self.left
    }

    /// Height in pixels (may be negative for malformed input).
    #[inline]
    #[must_use]
    pub const fn height(self) -> i32 {
        self.bottom - self.top
    }

    /// Returns `true` if the rectangle covers no pixels.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.right <= self.left || self.bottom <= self.top
    }

    /// Number of covered pixels; zero for empty rectangles.
    #[inline]
    #[must_use]
    pub const fn area(self) -> i64 {
        if self.is_empty() {
            0
        } else {
            self.width() as i64 * self.height() as i64
        }
    }

    /// Returns the rectangle translated by `(dx, dy)`.
    #[inline]
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(
            self.left.saturating_add(dx),
            self.top.saturating_add(dy),
            self.right.saturating_add(dx),
            self.bottom.saturating_add(dy),
        )
    }

    /// Returns the rectangle with `right >= left` and `bottom >= top`.
    ///
    /// Negative sizes collapse to zero at the original origin.
    #[inline]
    #[must_use]
    pub const fn clamped(self) -> Self {
        let right = if self.right < self.left {
            self.left
        } else {
            self.right
        };
        let bottom = if self.bottom < self.top {
            self.top
        } else {
            self.bottom
        };
        Self::new(self.left, self.top, right, bottom)
    }

    /// Returns `true` if `(x, y)` is inside the rectangle.
    #[inline]
    #[must_use]
    pub const fn contains(self, x: i32, y: i32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }

    /// Returns `true` if `other` lies entirely inside `self`.
    #[inline]
    #[must_use]
    pub fn contains_rect(self, other: Self) -> bool {
        !other.is_empty()
            && other.left >= self.left
            && other.top >= self.top
            && other.right <= self.right
            && other.bottom <= self.bottom
    }

    /// Returns `true` if the two rectangles share at least one pixel.
    #[inline]
    #[must_use]
    pub fn overlaps(self, other: Self) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && other.left < self.right
            && other.right > self.left
            && other.top < self.bottom
            && other.bottom > self.top
    }

    /// Classifies how `other` overlaps `self` without building the result.
    #[must_use]
    pub fn check_intersect(self, other: Self) -> Overlap {
        if !self.overlaps(other) {
            return Overlap::Disjoint;
        }
        let clipped = u8::from(other.left < self.left)
            + u8::from(other.top < self.top)
            + u8::from(other.right > self.right)
            + u8::from(other.bottom > self.bottom);
        if clipped == 0 {
            Overlap::Contained
        } else {
            Overlap::Clipped(clipped)
        }
    }

    /// Clips `other` to `self`.
    ///
    /// Returns `None` when the rectangles are disjoint; otherwise the shared
    /// rectangle and the same classification as
    /// [`check_intersect`](Self::check_intersect).
    #[must_use]
    pub fn intersect(self, other: Self) -> Option<(Self, Overlap)> {
        let overlap = self.check_intersect(other);
        if overlap == Overlap::Disjoint {
            return None;
        }
        let shared = Self::new(
            self.left.max(other.left),
            self.top.max(other.top),
            self.right.min(other.right),
            self.bottom.min(other.bottom),
        );
        Some((shared, overlap))
    }

    /// Returns the shared rectangle, if any.
    #[inline]
    #[must_use]
    pub fn intersection(self, other: Self) -> Option<Self> {
        self.intersect(other).map(|(shared, _)| shared)
    }

    /// Returns the smallest rectangle covering both inputs.
    ///
    /// Empty inputs are ignored.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return self;
        }
        Self::new(
            self.left.min(other.left),
            self.top.min(other.top),
            self.right.max(other.right),
            self.bottom.max(other.bottom),
        )
    }

    /// Converts to a `kurbo` rectangle.
    #[inline]
    #[must_use]
    pub fn to_kurbo(self) -> kurbo::Rect {
        kurbo::Rect::new(
            f64::from(self.left),
            f64::from(self.top),
            f64::from(self.right),
            f64::from(self.bottom),
        )
    }

    /// Converts from a `kurbo` rectangle, rounding outward to whole pixels.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "pixel coordinates are well inside i32 range after rounding"
    )]
    pub fn from_kurbo(rect: kurbo::Rect) -> Self {
        let r = rect.abs().expand();
        Self::new(r.x0 as i32, r.y0 as i32, r.x1 as i32, r.y1 as i32)
    }
}

impl Default for Rect {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Debug for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{},{}|{},{}]",
            self.left, self.top, self.right, self.bottom
        )
    }
}
