//! Window and graphics-context seam
//!
//! The emulator presents through an [`EmuWindow`] supplied by the frontend.
//! Frontends that do not own a real window (plugin hosts, headless runners)
//! implement the event and context hooks as no-ops.

use std::ffi::c_void;
use std::ptr::NonNull;

use crate::framebuffer_layout::FramebufferLayout;
use crate::renderer::Renderer;

/// A secondary rendering context shared with the window's main one.
pub trait GraphicsContext: Send {
    fn make_current(&self);
    fn done_current(&self);
}

/// Opaque handle to a host-provided hardware render interface.
///
/// The pointee is owned by the host and only valid between the host's
/// context-reset and context-destroy notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HwRenderHandle(NonNull<c_void>);

impl HwRenderHandle {
    pub fn new(ptr: *const c_void) -> Option<Self> {
        NonNull::new(ptr as *mut c_void).map(Self)
    }

    pub fn as_ptr(&self) -> *const c_void {
        self.0.as_ptr()
    }
}

// SAFETY: the handle is never dereferenced on this side; it is passed back to
// the renderer, which uses it on the thread the host calls us from.
unsafe impl Send for HwRenderHandle {}
unsafe impl Sync for HwRenderHandle {}

/// Window interface the emulator presents through.
pub trait EmuWindow: Send + Sync {
    /// Pump pending window events
    fn poll_events(&self);

    fn make_current(&self);

    fn done_current(&self);

    /// Finish the frame. CPU renderers hand over their screens here.
    fn swap_buffers(&self, renderer: &dyn Renderer);

    fn create_shared_context(&self) -> Option<Box<dyn GraphicsContext>>;

    /// Current framebuffer arrangement the emulator should render for.
    fn framebuffer_layout(&self) -> FramebufferLayout;

    /// Host render interface for hardware renderers, if one is live.
    fn render_interface(&self) -> Option<HwRenderHandle> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_handle_is_rejected() {
        assert!(HwRenderHandle::new(std::ptr::null()).is_none());
    }

    #[test]
    fn test_handle_roundtrips_pointer() {
        let value = 7u32;
        let ptr = &value as *const u32 as *const c_void;
        let handle = HwRenderHandle::new(ptr).expect("non-null");
        assert_eq!(handle.as_ptr(), ptr);
    }
}
