//! Software composition of the console screens into the presented frame.

use cytrus_core::framebuffer_layout::{FramebufferLayout, Rect};
use cytrus_core::renderer::{ScreenId, ScreenReadback, ScreenSurface};
use cytrus_core::types::Frame;

/// Pack one RGBA8 source pixel as ARGB8888.
#[inline]
fn argb(px: &[u8]) -> u32 {
    let (r, g, b, a) = (px[0] as u32, px[1] as u32, px[2] as u32, px[3] as u32);
    (a << 24) | (r << 16) | (g << 8) | b
}

/// Copy `surface` into `rect` of `frame`, nearest-neighbour scaled.
///
/// Source pixels whose storage lies outside the surface buffer are skipped
/// and leave the destination untouched, as do destination pixels outside the
/// frame.
pub fn blit_screen(frame: &mut Frame, rect: Rect, surface: &ScreenSurface) {
    if surface.width == 0 || surface.height == 0 || rect.width == 0 || rect.height == 0 {
        return;
    }
    let len = surface.pixels.len();
    let frame_width = frame.width as usize;
    let max_x = rect.right().min(frame.width);
    let max_y = rect.bottom().min(frame.height);

    for dy in rect.top..max_y {
        let sy = ((dy - rect.top) as u64 * surface.height as u64 / rect.height as u64) as u32;
        let row = dy as usize * frame_width;
        for dx in rect.left..max_x {
            let sx = ((dx - rect.left) as u64 * surface.width as u64 / rect.width as u64) as u32;
            let idx = surface.byte_index(sx, sy);
            if idx + 3 >= len {
                continue;
            }
            frame.pixels[row + dx as usize] = argb(&surface.pixels[idx..idx + 4]);
        }
    }
}

/// Compose whichever screens the layout shows. The top screen is the left eye.
pub fn compose_screens(frame: &mut Frame, layout: &FramebufferLayout, readback: &dyn ScreenReadback) {
    if let Some(rect) = layout.top {
        blit_screen(frame, rect, readback.screen(ScreenId::TopLeft));
    }
    if let Some(rect) = layout.bottom {
        blit_screen(frame, rect, readback.screen(ScreenId::Bottom));
    }
}
