// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Opaque paint behaviors.

use strata_core::behavior::{Behavior, SurfaceInfo};
use strata_core::surface::{Color, GraphicsContext};
use strata_core::tree::Insets;

/// Fills the whole node with one color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Solid {
    color: Option<Color>,
}

impl Solid {
    /// A fixed color.
    #[must_use]
    pub const fn new(color: Color) -> Self {
        Self { color: Some(color) }
    }

    /// The master theme's background color.
    #[must_use]
    pub const fn themed() -> Self {
        Self { color: None }
    }
}

impl Behavior for Solid {
    fn draw(&self, gc: &mut GraphicsContext<'_>, surface: &SurfaceInfo<'_>) {
        let color = self.color.unwrap_or(gc.theme().background);
        gc.fill_rect(surface.local_bounds(), color);
    }
}

/// A face-colored panel with a beveled edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bevel {
    /// Light edge on top and left when `true`, shadow there when `false`.
    pub raised: bool,
    /// Edge thickness in pixels.
    pub width: i32,
    /// Preferred size for nodes created without one.
    pub normal_size: (i32, i32),
}

impl Bevel {
    /// A raised bevel one pixel wide.
    #[must_use]
    pub const fn raised() -> Self {
        Self {
            raised: true,
            width: 1,
            normal_size: (0, 0),
        }
    }

    /// A sunken bevel one pixel wide.
    #[must_use]
    pub const fn sunken() -> Self {
        Self {
            raised: false,
            width: 1,
            normal_size: (0, 0),
        }
    }

    /// Borders that keep children off the beveled edge, for
    /// [`SurfaceTree::set_estate`](strata_core::tree::SurfaceTree::set_estate).
    #[must_use]
    pub const fn estate(&self) -> Insets {
        Insets::uniform(if self.width > 0 { self.width } else { 0 })
    }
}

impl Behavior for Bevel {
    fn draw(&self, gc: &mut GraphicsContext<'_>, surface: &SurfaceInfo<'_>) {
        let theme = *gc.theme();
        let (w, h) = (surface.width, surface.height);
        let (top_left, bottom_right) = if self.raised {
            (theme.light, theme.shadow)
        } else {
            (theme.shadow, theme.light)
        };
        gc.fill_rect(surface.local_bounds(), theme.face);
        for i in 0..self.width.min(w / 2).min(h / 2) {
            gc.hline(i, w - i, i, top_left);
            gc.vline(i, i, h - i, top_left);
            gc.hline(i + 1, w - i, h - 1 - i, bottom_right);
            gc.vline(w - 1 - i, i + 1, h - i, bottom_right);
        }
    }

    fn normal_size(&self) -> (i32, i32) {
        self.normal_size
    }
}


#[cfg(test)]
mod tests {
    use strata_core::rect::Rect;
    use strata_core::surface::{Pixmap, Theme, rgb};
    use strata_core::tree::{Placement, SurfaceTree};

    use super::*;

    fn render(behavior: impl Behavior + 'static, w: i32, h: i32) -> Pixmap {
        let mut tree = SurfaceTree::new();
        let m = tree.create_master(Rect::new(0, 0, w, h), Theme::CLASSIC);
        let node = tree.create_node(Rect::new(0, 0, w, h));
        tree.set_behavior(node, alloc::boxed::Box::new(behavior));
        tree.add_child(m, node, Placement::Front);
        tree.load(m);
        tree.master_buffer(m).cloned().unwrap()
    }

    #[test]
    fn solid_fills_with_its_color_or_the_theme() {
        let red = rgb(255, 0, 0);
        assert_eq!(render(Solid::new(red), 4, 4).pixel(2, 2), Some(red));
        assert_eq!(
            render(Solid::themed(), 4, 4).pixel(2, 2),
            Some(Theme::CLASSIC.background)
        );
    }

    #[test]
    fn raised_bevel_lights_the_top_left() {
        let theme = Theme::CLASSIC;
        let buf = render(Bevel::raised(), 10, 10);
        assert_eq!(buf.pixel(0, 0), Some(theme.light));
        assert_eq!(buf.pixel(0, 5), Some(theme.light));
        assert_eq!(buf.pixel(9, 9), Some(theme.shadow));
        assert_eq!(buf.pixel(5, 9), Some(theme.shadow));
        assert_eq!(buf.pixel(5, 5), Some(theme.face));
    }

    #[test]
    fn sunken_bevel_swaps_the_edges() {
        let theme = Theme::CLASSIC;
        let buf = render(Bevel::sunken(), 10, 10);
        assert_eq!(buf.pixel(0, 0), Some(theme.shadow));
        assert_eq!(buf.pixel(9, 9), Some(theme.light));
    }

    #[test]
    fn estate_keeps_children_off_the_edge() {
        let bevel = Bevel {
            width: 2,
            ..Bevel::raised()
        };
        let mut tree = SurfaceTree::new();
        let m = tree.create_master(Rect::new(0, 0, 20, 20), Theme::CLASSIC);
        let frame = tree.create_node(Rect::new(0, 0, 10, 8));
        let content = tree.create_node(Rect::new(0, 0, 20, 20));
        tree.add_child(m, frame, Placement::Front);
        tree.add_child(frame, content, Placement::Front);
        tree.set_estate(frame, bevel.estate());
        assert_eq!(tree.clipped(content), Some(Rect::new(2, 2, 8, 6)));
    }
}
