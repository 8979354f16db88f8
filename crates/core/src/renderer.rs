//! Renderer abstraction as seen from a frontend
//!
//! The emulator owns its renderer; a frontend only needs to know what kind of
//! renderer is active and, for CPU-based renderers, how to read the finished
//! screens back.
//!
//! ```text
//! System -> Renderer trait -> {Software, Hardware} implementations
//!                  |
//!                  +-- screen_readback() -> Some(&dyn ScreenReadback)   (software only)
//! ```
//!
//! Frontends never inspect the concrete renderer type. They ask for the
//! readback capability and fall back to the hardware path when it is absent.

use serde::{Deserialize, Serialize};

/// Logical screens produced by the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScreenId {
    /// Upper screen, left eye (the only one shown without 3D)
    TopLeft,
    /// Upper screen, right eye
    TopRight,
    /// Lower (touch) screen
    Bottom,
}

/// RGBA8 pixels of one logical screen as the renderer stores them.
///
/// `width` and `height` are the presented (landscape) size. The LCDs are
/// mounted rotated, so storage is column-major and bottom-to-top: presented
/// pixel `(x, y)` starts at byte `(x * height + (height - 1 - y)) * 4`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScreenSurface {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl ScreenSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; (width * height * 4) as usize],
        }
    }

    /// Byte offset of presented pixel `(x, y)` in `pixels`.
    pub fn byte_index(&self, x: u32, y: u32) -> usize {
        (x as usize * self.height as usize + (self.height - 1 - y) as usize) * 4
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}

/// Readable screen buffers exposed by CPU-based renderers.
pub trait ScreenReadback {
    fn screen(&self, id: ScreenId) -> &ScreenSurface;
}

/// Common renderer trait for the emulator's video backends
pub trait Renderer: Send {
    /// Get the name of this renderer (for debugging/UI)
    ///
    /// Examples: "Software", "Vulkan"
    fn name(&self) -> &str;

    /// Check if this renderer uses hardware acceleration
    ///
    /// Returns `true` for GPU-accelerated renderers (Vulkan, OpenGL)
    /// and `false` for CPU-based software renderers.
    fn is_hardware_accelerated(&self) -> bool {
        false
    }

    /// Readable screen buffers, when the renderer keeps them in host memory.
    fn screen_readback(&self) -> Option<&dyn ScreenReadback> {
        None
    }
}
