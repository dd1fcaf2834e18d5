// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rectangle lists and the occlusion algorithm.
//!
//! A [`Region`] is an ordered list of pairwise non-overlapping, non-empty
//! rectangles. The central operation is [`Region::occlude_rect`], which
//! subtracts a mask rectangle by splitting every overlapping member into at
//! most four strips:
//!
//! ```text
//!   +-----------------+
//!   |       top       |
//!   +----+-----+------+
//!   |left| mask|right |
//!   +----+-----+------+
//!   |     bottom      |
//!   +-----------------+
//! ```
//!
//! Top and bottom strips span the full width of the member; left and right
//! strips only span the rows shared with the mask.

use alloc::vec::Vec;
use core::fmt;

use crate::rect::Rect;

/// A set of disjoint rectangles describing an arbitrary planar area.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Region {
    rects: Vec<Rect>,
}

impl Region {
    /// Creates an empty region.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { rects: Vec::new() }
    }

    /// Creates a region holding a single rectangle (or nothing, if `rect` is
    /// empty).
    #[must_use]
    pub fn from_rect(rect: Rect) -> Self {
        let mut region = Self::new();
        if !rect.is_empty() {
            region.rects.push(rect);
        }
        region
    }

    /// Returns `true` if the region covers no pixels.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Number of rectangles.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rects.len()
    }

    /// The rectangles, in list order.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[Rect] {
        &self.rects
    }

    /// Iterates over the rectangles in list order.
    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, Rect> {
        self.rects.iter()
    }

    /// Removes every rectangle.
    #[inline]
    pub fn clear(&mut self) {
        self.rects.clear();
    }

    /// Removes and returns the rectangle at `index`, keeping list order.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn remove(&mut self, index: usize) -> Rect {
        self.rects.remove(index)
    }

    /// Total number of covered pixels.
    #[must_use]
    pub fn area(&self) -> i64 {
        self.rects.iter().map(|r| r.area()).sum()
    }

    /// Smallest rectangle covering the whole region.
    #[must_use]
    pub fn bounding_box(&self) -> Option<Rect> {
        let mut iter = self.rects.iter();
        let first = *iter.next()?;
        Some(iter.fold(first, |acc, r| acc.union(*r)))
    }

    /// Returns `true` if any rectangle contains `(x, y)`.
    #[must_use]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.rects.iter().any(|r| r.contains(x, y))
    }

    /// Returns `true` if any rectangle overlaps `rect`.
    #[must_use]
    pub fn overlaps(&self, rect: Rect) -> bool {
        self.rects.iter().any(|r| r.overlaps(rect))
    }

    /// Translates every rectangle by `(dx, dy)`.
    pub fn offset(&mut self, dx: i32, dy: i32) {
        for r in &mut self.rects {
            *r = r.offset(dx, dy);
        }
    }

    /// Adds `rect`, keeping the rectangles disjoint.
    ///
    /// Parts of `rect` already covered by the region are not added twice.
    pub fn add_rect(&mut self, rect: Rect) {
        let mut piece = Self::from_rect(rect);
        for existing in &self.rects {
            if piece.is_empty() {
                return;
            }
            piece.occlude_rect(*existing);
        }
        self.rects.append(&mut piece.rects);
    }

    /// Returns the part of the region inside `clip`.
    #[must_use]
    pub fn intersect_rect(&self, clip: Rect) -> Self {
        Self {
            rects: self
                .rects
                .iter()
                .filter_map(|r| r.intersection(clip))
                .collect(),
        }
    }

    /// Subtracts `mask` from the region.
    ///
    /// Every member overlapping `mask` is replaced by up to four strips (top,
    /// bottom, left, right) covering the member minus the mask. Members that
    /// do not overlap are kept in place. An empty mask is a no-op.
    pub fn occlude_rect(&mut self, mask: Rect) {
        if mask.is_empty() || !self.overlaps(mask) {
            return;
        }
        let old = core::mem::take(&mut self.rects);
        self.rects.reserve(old.len() + 3);
        for vis in old {
            if !vis.overlaps(mask) {
                self.rects.push(vis);
                continue;
            }
            let top = mask.top.max(vis.top);
            let bottom = mask.bottom.min(vis.bottom);
            if mask.top > vis.top {
                self.rects
                    .push(Rect::new(vis.left, vis.top, vis.right, mask.top));
            }
            if mask.bottom < vis.bottom {
                self.rects
                    .push(Rect::new(vis.left, mask.bottom, vis.right, vis.bottom));
            }
            if mask.left > vis.left {
                self.rects.push(Rect::new(vis.left, top, mask.left, bottom));
            }
            if mask.right < vis.right {
                self.rects.push(Rect::new(mask.right, top, vis.right, bottom));
            }
        }
    }

    /// Subtracts every rectangle of `mask`, one after another.
    pub fn occlude(&mut self, mask: &Self) {
        for m in &mask.rects {
            if self.is_empty() {
                return;
            }
            self.occlude_rect(*m);
        }
    }

    /// Sorts rectangles by top edge, keeping the relative order of equal
    /// tops. Painting in this order reduces visible tearing.
    pub fn sort_by_top(&mut self) {
        self.rects.sort_by_key(|r| r.top);
    }
}

impl From<Rect> for Region {
    fn from(rect: Rect) -> Self {
        Self::from_rect(rect)
    }
}

impl<'a> IntoIterator for &'a Region {
    type Item = &'a Rect;
    type IntoIter = core::slice::Iter<'a, Rect>;

    fn into_iter(self) -> Self::IntoIter {
        self.rects.iter()
    }
}

impl Extend<Rect> for Region {
    fn extend<T: IntoIterator<Item = Rect>>(&mut self, iter: T) {
        for r in iter {
            self.add_rect(r);
        }
    }
}

impl FromIterator<Rect> for Region {
    fn from_iter<T: IntoIterator<Item = Rect>>(iter: T) -> Self {
        let mut region = Self::new();
        region.extend(iter);
        region
    }
}

impl fmt::Debug for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.rects.iter()).finish()
    }
}
