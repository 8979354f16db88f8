//! Window shim the emulator presents through.
//!
//! There is no real window inside a libretro host. The shim owns the frame
//! the host is shown each run, tracks the screen layout the emulator renders
//! for, and, for hardware rendering, the host's render interface handle.

use std::sync::{Arc, Mutex, PoisonError};

use cytrus_core::framebuffer_layout::FramebufferLayout;
use cytrus_core::logging::{log, LogCategory, LogLevel};
use cytrus_core::renderer::Renderer;
use cytrus_core::settings::{LayoutOption, Settings};
use cytrus_core::types::Frame;
use cytrus_core::window::{EmuWindow, GraphicsContext, HwRenderHandle};

use crate::compose::compose_screens;

/// Initial fill of a freshly sized frame: opaque black.
pub const CLEAR_COLOR: u32 = 0xFF00_0000;

/// How finished frames reach the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PresentationBackend {
    /// Screens are read back and composed into a CPU frame
    #[default]
    Software,
    /// The renderer draws straight into the host's framebuffer
    Hardware,
}

/// Host render interface handle, live between context reset and destroy.
///
/// Lives apart from the adapter's main lock so the host's context
/// notifications never contend with a running frame.
#[derive(Default)]
pub struct HwRenderSlot {
    handle: Mutex<Option<HwRenderHandle>>,
}

impl HwRenderSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, handle: Option<HwRenderHandle>) {
        *self.handle.lock().unwrap_or_else(PoisonError::into_inner) = handle;
    }

    pub fn clear(&self) {
        self.set(None);
    }

    pub fn get(&self) -> Option<HwRenderHandle> {
        *self.handle.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub struct LibretroEmuWindow {
    backend: Mutex<PresentationBackend>,
    layout: Mutex<FramebufferLayout>,
    frame: Mutex<Frame>,
    hw_render: Arc<HwRenderSlot>,
}

impl LibretroEmuWindow {
    /// Create the shim. The layout starts stacked with swap off.
    pub fn new(settings: &mut Settings, hw_render: Arc<HwRenderSlot>) -> Self {
        settings.layout_option = LayoutOption::Default;
        settings.swap_screen = false;
        let layout = FramebufferLayout::compute(
            settings.layout_option,
            settings.swap_screen,
            settings.resolution_factor,
        );
        Self {
            backend: Mutex::new(PresentationBackend::Software),
            frame: Mutex::new(Frame::filled(layout.width, layout.height, CLEAR_COLOR)),
            layout: Mutex::new(layout),
            hw_render,
        }
    }

    pub fn backend(&self) -> PresentationBackend {
        *self.backend.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_backend(&self, backend: PresentationBackend) {
        *self.backend.lock().unwrap_or_else(PoisonError::into_inner) = backend;
    }

    pub fn layout(&self) -> FramebufferLayout {
        *self.layout.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Recompute the layout from `settings`, resizing the frame when its
    /// dimensions change. Returns the new layout.
    pub fn on_framebuffer_size_changed(&self, settings: &Settings) -> FramebufferLayout {
        let layout = FramebufferLayout::compute(
            settings.layout_option,
            settings.swap_screen,
            settings.resolution_factor,
        );
        {
            let mut frame = self.frame.lock().unwrap_or_else(PoisonError::into_inner);
            if frame.width != layout.width || frame.height != layout.height {
                *frame = Frame::filled(layout.width, layout.height, CLEAR_COLOR);
                log(LogCategory::Video, LogLevel::Info, || {
                    format!("Framebuffer resized to {}x{}", layout.width, layout.height)
                });
            }
        }
        *self.layout.lock().unwrap_or_else(PoisonError::into_inner) = layout;
        layout
    }

    /// Replace the frame contents from a render thread. Ignored unless the
    /// dimensions match the current frame.
    pub fn set_video_buffer(&self, pixels: &[u32], width: u32, height: u32) -> bool {
        let mut frame = self.frame.lock().unwrap_or_else(PoisonError::into_inner);
        if frame.width != width || frame.height != height || pixels.len() != frame.pixels.len() {
            return false;
        }
        frame.pixels.copy_from_slice(pixels);
        true
    }

    /// Copy the current frame into `out`, reusing its allocation.
    pub fn copy_frame_into(&self, out: &mut Frame) {
        let frame = self.frame.lock().unwrap_or_else(PoisonError::into_inner);
        out.width = frame.width;
        out.height = frame.height;
        out.pixels.clear();
        out.pixels.extend_from_slice(&frame.pixels);
    }
}

impl EmuWindow for LibretroEmuWindow {
    fn poll_events(&self) {}

    fn make_current(&self) {}

    fn done_current(&self) {}

    fn swap_buffers(&self, renderer: &dyn Renderer) {
        if self.backend() == PresentationBackend::Hardware {
            return;
        }
        let Some(readback) = renderer.screen_readback() else {
            return;
        };
        let layout = self.layout();
        let mut frame = self.frame.lock().unwrap_or_else(PoisonError::into_inner);
        compose_screens(&mut frame, &layout, readback);
    }

    fn create_shared_context(&self) -> Option<Box<dyn GraphicsContext>> {
        None
    }

    fn framebuffer_layout(&self) -> FramebufferLayout {
        self.layout()
    }

    fn render_interface(&self) -> Option<HwRenderHandle> {
        match self.backend() {
            PresentationBackend::Hardware => self.hw_render.get(),
            PresentationBackend::Software => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cytrus_core::renderer::{ScreenId, ScreenReadback, ScreenSurface};

    struct Solid {
        top: ScreenSurface,
        bottom: ScreenSurface,
        hardware: bool,
    }

    impl Solid {
        fn new(hardware: bool) -> Self {
            let mut top = ScreenSurface::new(400, 240);
            top.pixels.fill(0xFF);
            Self {
                top,
                bottom: ScreenSurface::new(320, 240),
                hardware,
            }
        }
    }

    impl ScreenReadback for Solid {
        fn screen(&self, id: ScreenId) -> &ScreenSurface {
            match id {
                ScreenId::Bottom => &self.bottom,
                _ => &self.top,
            }
        }
    }

    impl Renderer for Solid {
        fn name(&self) -> &str {
            "Solid"
        }

        fn is_hardware_accelerated(&self) -> bool {
            self.hardware
        }

        fn screen_readback(&self) -> Option<&dyn ScreenReadback> {
            if self.hardware {
                None
            } else {
                Some(self)
            }
        }
    }

    fn window() -> (LibretroEmuWindow, Settings) {
        let mut settings = Settings {
            layout_option: LayoutOption::SideScreen,
            swap_screen: true,
            ..Default::default()
        };
        let window = LibretroEmuWindow::new(&mut settings, Arc::new(HwRenderSlot::new()));
        (window, settings)
    }

    #[test]
    fn test_construction_forces_stacked_layout() {
        let (window, settings) = window();
        assert_eq!(settings.layout_option, LayoutOption::Default);
        assert!(!settings.swap_screen);
        let layout = window.framebuffer_layout();
        assert_eq!((layout.width, layout.height), (400, 480));

        let mut frame = Frame::new(0, 0);
        window.copy_frame_into(&mut frame);
        assert_eq!(frame.pixels.len(), 400 * 480);
        assert!(frame.pixels.iter().all(|&p| p == CLEAR_COLOR));
    }

    #[test]
    fn test_resize_follows_settings() {
        let (window, mut settings) = window();
        settings.layout_option = LayoutOption::SideScreen;
        settings.resolution_factor = 2;
        let layout = window.on_framebuffer_size_changed(&settings);
        assert_eq!((layout.width, layout.height), (1440, 480));

        let mut frame = Frame::new(0, 0);
        window.copy_frame_into(&mut frame);
        assert_eq!((frame.width, frame.height), (1440, 480));
        assert_eq!(window.framebuffer_layout(), layout);
    }

    #[test]
    fn test_software_swap_composes_screens() {
        let (window, _) = window();
        window.swap_buffers(&Solid::new(false));
        let mut frame = Frame::new(0, 0);
        window.copy_frame_into(&mut frame);
        assert_eq!(frame.pixels[0], 0xFFFF_FFFF);
        assert_eq!(frame.pixels[(240 * 400 + 40) as usize], 0);
    }

    #[test]
    fn test_hardware_swap_copies_nothing() {
        let (window, _) = window();
        window.set_backend(PresentationBackend::Hardware);
        window.swap_buffers(&Solid::new(false));
        let mut frame = Frame::new(0, 0);
        window.copy_frame_into(&mut frame);
        assert!(frame.pixels.iter().all(|&p| p == CLEAR_COLOR));
    }

    #[test]
    fn test_render_interface_only_for_hardware() {
        let slot = Arc::new(HwRenderSlot::new());
        let mut settings = Settings::default();
        let window = LibretroEmuWindow::new(&mut settings, slot.clone());
        let value = 1u8;
        slot.set(HwRenderHandle::new(&value as *const u8 as *const _));
        assert!(window.render_interface().is_none());

        window.set_backend(PresentationBackend::Hardware);
        assert!(window.render_interface().is_some());
        slot.clear();
        assert!(window.render_interface().is_none());
    }

    #[test]
    fn test_set_video_buffer_requires_matching_size() {
        let (window, _) = window();
        assert!(!window.set_video_buffer(&[1, 2, 3], 3, 1));
        let pixels = vec![0xFF12_3456; 400 * 480];
        assert!(window.set_video_buffer(&pixels, 400, 480));
        let mut frame = Frame::new(0, 0);
        window.copy_frame_into(&mut frame);
        assert_eq!(frame.pixels, pixels);
    }
}
