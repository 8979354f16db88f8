//! Placement of the two console screens inside one presented framebuffer.

use serde::{Deserialize, Serialize};

use crate::settings::LayoutOption;

pub const TOP_SCREEN_WIDTH: u32 = 400;
pub const TOP_SCREEN_HEIGHT: u32 = 240;
pub const BOTTOM_SCREEN_WIDTH: u32 = 320;
pub const BOTTOM_SCREEN_HEIGHT: u32 = 240;

/// Largest supported resolution factor.
pub const MAX_RESOLUTION_FACTOR: u32 = 4;

/// Axis-aligned rectangle in framebuffer pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(left: u32, top: u32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> u32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.top + self.height
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.left as f32 && x < self.right() as f32 && y >= self.top as f32 && y < self.bottom() as f32
    }

    fn scaled(self, factor: u32) -> Self {
        Self::new(
            self.left * factor,
            self.top * factor,
            self.width * factor,
            self.height * factor,
        )
    }
}

/// Framebuffer size plus where each screen lands in it.
///
/// A screen that is not shown by the layout has no rect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FramebufferLayout {
    pub width: u32,
    pub height: u32,
    pub top: Option<Rect>,
    pub bottom: Option<Rect>,
    pub factor: u32,
}

impl FramebufferLayout {
    /// Unscaled framebuffer size for a layout option.
    pub fn base_size(option: LayoutOption) -> (u32, u32) {
        match option {
            LayoutOption::Default => (TOP_SCREEN_WIDTH, TOP_SCREEN_HEIGHT + BOTTOM_SCREEN_HEIGHT),
            LayoutOption::SingleScreen => (TOP_SCREEN_WIDTH, TOP_SCREEN_HEIGHT),
            LayoutOption::SideScreen => (TOP_SCREEN_WIDTH + BOTTOM_SCREEN_WIDTH, TOP_SCREEN_HEIGHT),
        }
    }

    /// Compute the layout for an option, swap flag and resolution factor.
    ///
    /// The factor is clamped to `1..=MAX_RESOLUTION_FACTOR`; every dimension
    /// is the base dimension multiplied by the clamped factor.
    pub fn compute(option: LayoutOption, swap: bool, factor: u32) -> Self {
        let factor = factor.clamp(1, MAX_RESOLUTION_FACTOR);
        let (base_w, base_h) = Self::base_size(option);
        // Bottom screen is narrower; centre it under/over the top screen.
        let bottom_inset = (TOP_SCREEN_WIDTH - BOTTOM_SCREEN_WIDTH) / 2;

        let (top, bottom) = match (option, swap) {
            (LayoutOption::Default, false) => (
                Some(Rect::new(0, 0, TOP_SCREEN_WIDTH, TOP_SCREEN_HEIGHT)),
                Some(Rect::new(bottom_inset, TOP_SCREEN_HEIGHT, BOTTOM_SCREEN_WIDTH, BOTTOM_SCREEN_HEIGHT)),
            ),
            (LayoutOption::Default, true) => (
                Some(Rect::new(0, BOTTOM_SCREEN_HEIGHT, TOP_SCREEN_WIDTH, TOP_SCREEN_HEIGHT)),
                Some(Rect::new(bottom_inset, 0, BOTTOM_SCREEN_WIDTH, BOTTOM_SCREEN_HEIGHT)),
            ),
            (LayoutOption::SideScreen, false) => (
                Some(Rect::new(0, 0, TOP_SCREEN_WIDTH, TOP_SCREEN_HEIGHT)),
                Some(Rect::new(TOP_SCREEN_WIDTH, 0, BOTTOM_SCREEN_WIDTH, BOTTOM_SCREEN_HEIGHT)),
            ),
            (LayoutOption::SideScreen, true) => (
                Some(Rect::new(BOTTOM_SCREEN_WIDTH, 0, TOP_SCREEN_WIDTH, TOP_SCREEN_HEIGHT)),
                Some(Rect::new(0, 0, BOTTOM_SCREEN_WIDTH, BOTTOM_SCREEN_HEIGHT)),
            ),
            (LayoutOption::SingleScreen, false) => {
                (Some(Rect::new(0, 0, TOP_SCREEN_WIDTH, TOP_SCREEN_HEIGHT)), None)
            }
            (LayoutOption::SingleScreen, true) => (
                None,
                Some(Rect::new(bottom_inset, 0, BOTTOM_SCREEN_WIDTH, BOTTOM_SCREEN_HEIGHT)),
            ),
        };

        Self {
            width: base_w * factor,
            height: base_h * factor,
            top: top.map(|r| r.scaled(factor)),
            bottom: bottom.map(|r| r.scaled(factor)),
            factor,
        }
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}
