// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Damage tracking for partial presentation of master buffers.

use alloc::vec::Vec;

use strata_core::rect::Rect;
use strata_core::region::Region;

/// The part of a master buffer that must be presented again.
///
/// A presenter can use this to copy only the pixels the engine touched since
/// the last frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum DamageRegion {
    /// The whole buffer needs presenting.
    #[default]
    Full,
    /// Rectangles in buffer pixels that need presenting.
    ///
    /// The rectangles may overlap; none is contained in another.
    Rects(Vec<Rect>),
    /// Nothing changed; the previous frame can be reused.
    None,
}

impl DamageRegion {
    /// Creates damage covering `region`.
    #[must_use]
    pub fn from_region(region: &Region) -> Self {
        if region.is_empty() {
            Self::None
        } else {
            Self::Rects(region.as_slice().to_vec())
        }
    }

    /// Returns `true` if nothing needs presenting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Adds a damaged rectangle.
    ///
    /// Empty rectangles and rectangles already covered by a single existing
    /// one are ignored; existing rectangles covered by `rect` are dropped.
    pub fn add_rect(&mut self, rect: Rect) {
        if rect.is_empty() {
            return;
        }
        match self {
            Self::Full => {}
            Self::None => *self = Self::Rects(alloc::vec![rect]),
            Self::Rects(rects) => {
                if rects.iter().any(|r| r.contains_rect(rect)) {
                    return;
                }
                rects.retain(|r| !rect.contains_rect(*r));
                rects.push(rect);
            }
        }
    }

    /// Merges another damage region into this one.
    pub fn merge(&mut self, other: &Self) {
        match (&*self, other) {
            (Self::Full, _) | (_, Self::Full) => *self = Self::Full,
            (Self::None, _) => *self = other.clone(),
            (_, Self::None) => {}
            (Self::Rects(_), Self::Rects(b)) => {
                for r in b {
                    self.add_rect(*r);
                }
            }
        }
    }

    /// Smallest rectangle covering the damage, clipped to a buffer of the
    /// given size.
    #[must_use]
    pub fn bounding_box(&self, width: i32, height: i32) -> Option<Rect> {
        let buffer = Rect::new(0, 0, width, height);
        match self {
            Self::Full => (!buffer.is_empty()).then_some(buffer),
            Self::None => None,
            Self::Rects(rects) => rects
                .iter()
                .fold(Rect::EMPTY, |acc, r| acc.union(*r))
                .intersection(buffer),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    #[test]
    fn default_is_full() {
        assert_eq!(DamageRegion::default(), DamageRegion::Full);
        assert!(!DamageRegion::Full.is_empty());
        assert!(DamageRegion::None.is_empty());
    }

    #[test]
    fn add_rect_drops_covered_rectangles() {
        let mut d = DamageRegion::None;
        d.add_rect(Rect::new(0, 0, 10, 10));
        d.add_rect(Rect::new(2, 2, 5, 5));
        d.add_rect(Rect::EMPTY);
        assert_eq!(d, DamageRegion::Rects(vec![Rect::new(0, 0, 10, 10)]));

        d.add_rect(Rect::new(20, 0, 30, 10));
        d.add_rect(Rect::new(0, 0, 40, 10));
        assert_eq!(d, DamageRegion::Rects(vec![Rect::new(0, 0, 40, 10)]));
    }

    #[test]
    fn full_absorbs_everything() {
        let mut d = DamageRegion::Full;
        d.add_rect(Rect::new(0, 0, 10, 10));
        assert_eq!(d, DamageRegion::Full);

        let mut r = DamageRegion::Rects(vec![Rect::new(0, 0, 1, 1)]);
        r.merge(&DamageRegion::Full);
        assert_eq!(r, DamageRegion::Full);
    }

    #[test]
    fn merge_with_none_keeps_the_other_side() {
        let rects = DamageRegion::Rects(vec![Rect::new(0, 0, 4, 4)]);
        let mut d = DamageRegion::None;
        d.merge(&rects);
        assert_eq!(d, rects);
        d.merge(&DamageRegion::None);
        assert_eq!(d, rects);
    }

    #[test]
    fn bounding_box_is_clipped_to_the_buffer() {
        let d = DamageRegion::Rects(vec![Rect::new(-5, 2, 4, 4), Rect::new(8, 8, 30, 9)]);
        assert_eq!(d.bounding_box(20, 20), Some(Rect::new(0, 2, 20, 9)));
        assert_eq!(DamageRegion::Full.bounding_box(3, 4), Some(Rect::new(0, 0, 3, 4)));
        assert_eq!(DamageRegion::None.bounding_box(3, 4), None);
    }

    #[test]
    fn from_region_of_nothing_is_none() {
        assert_eq!(DamageRegion::from_region(&Region::new()), DamageRegion::None);
        let region = Region::from_rect(Rect::new(1, 1, 3, 3));
        assert_eq!(
            DamageRegion::from_region(&region),
            DamageRegion::Rects(vec![Rect::new(1, 1, 3, 3)])
        );
    }
}
