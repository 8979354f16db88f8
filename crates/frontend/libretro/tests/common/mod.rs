//! Scripted stand-in for the emulator, shared by the integration tests.
//!
//! Titles whose file name contains `fail` report a load error and titles
//! containing `panic` panic inside `load`. Everything the adapter does to the
//! emulator is recorded in the statics below.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use cytrus_core::audio::Sink;
use cytrus_core::input::{ButtonDevice, InputRegistry, NativeButton};
use cytrus_core::paths::UserPaths;
use cytrus_core::renderer::{Renderer, ScreenId, ScreenReadback, ScreenSurface};
use cytrus_core::settings::{Settings, SharedSettings};
use cytrus_core::types::AudioSample;
use cytrus_core::window::EmuWindow;
use cytrus_core::System;

pub static LOAD_CALLS: AtomicUsize = AtomicUsize::new(0);
pub static RUN_CALLS: AtomicUsize = AtomicUsize::new(0);
pub static SHUTDOWN_CALLS: AtomicUsize = AtomicUsize::new(0);
pub static A_PRESSED: AtomicBool = AtomicBool::new(false);
pub static LOADED_SETTINGS: Mutex<Option<Settings>> = Mutex::new(None);
pub static LOADED_PATHS: Mutex<Option<UserPaths>> = Mutex::new(None);

pub const TOP_RGBA: [u8; 4] = [0xFF, 0x00, 0x00, 0xFF];
pub const BOTTOM_RGBA: [u8; 4] = [0x00, 0x00, 0xFF, 0xFF];
pub const LEFT_SAMPLE: AudioSample = 1000;
pub const RIGHT_SAMPLE: AudioSample = -1000;

pub fn loaded_settings() -> Option<Settings> {
    LOADED_SETTINGS.lock().unwrap_or_else(PoisonError::into_inner).clone()
}

#[derive(thiserror::Error, Debug)]
#[error("mock: {0}")]
pub struct MockError(String);

pub struct MockRenderer {
    top: ScreenSurface,
    bottom: ScreenSurface,
}

fn solid(width: u32, height: u32, rgba: [u8; 4]) -> ScreenSurface {
    let mut surface = ScreenSurface::new(width, height);
    for px in surface.pixels.chunks_exact_mut(4) {
        px.copy_from_slice(&rgba);
    }
    surface
}

impl MockRenderer {
    fn new() -> Self {
        Self {
            top: solid(400, 240, TOP_RGBA),
            bottom: solid(320, 240, BOTTOM_RGBA),
        }
    }
}

impl ScreenReadback for MockRenderer {
    fn screen(&self, id: ScreenId) -> &ScreenSurface {
        match id {
            ScreenId::TopLeft | ScreenId::TopRight => &self.top,
            ScreenId::Bottom => &self.bottom,
        }
    }
}

impl Renderer for MockRenderer {
    fn name(&self) -> &str {
        "Mock Software"
    }

    fn screen_readback(&self) -> Option<&dyn ScreenReadback> {
        Some(self)
    }
}

pub struct MockSystem {
    settings: SharedSettings,
    registry: InputRegistry,
    window: Option<Arc<dyn EmuWindow>>,
    renderer: Option<MockRenderer>,
    button_a: Option<Box<dyn ButtonDevice>>,
    frames: u64,
}

impl System for MockSystem {
    type Error = MockError;

    fn create(settings: SharedSettings) -> Self {
        Self {
            settings,
            registry: InputRegistry::new(),
            window: None,
            renderer: None,
            button_a: None,
            frames: 0,
        }
    }

    fn load(&mut self, window: Arc<dyn EmuWindow>, path: &Path) -> Result<(), MockError> {
        LOAD_CALLS.fetch_add(1, Ordering::SeqCst);
        let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        if name.contains("panic") {
            panic!("mock emulator exploded on {}", name);
        }
        if name.contains("fail") {
            return Err(MockError(format!("cannot boot {}", name)));
        }

        let settings = self.settings.read().unwrap_or_else(PoisonError::into_inner).clone();
        self.button_a = Some(self.registry.create_button(&settings.input.buttons[NativeButton::A as usize]));
        *LOADED_SETTINGS.lock().unwrap_or_else(PoisonError::into_inner) = Some(settings);

        self.window = Some(window);
        self.renderer = Some(MockRenderer::new());
        self.frames = 0;
        Ok(())
    }

    fn reset(&mut self) {
        self.frames = 0;
    }

    fn shutdown(&mut self) {
        SHUTDOWN_CALLS.fetch_add(1, Ordering::SeqCst);
        self.window = None;
        self.renderer = None;
        self.button_a = None;
    }

    fn run_loop(&mut self) -> Result<(), MockError> {
        RUN_CALLS.fetch_add(1, Ordering::SeqCst);
        self.frames += 1;
        if let Some(button) = &self.button_a {
            A_PRESSED.store(button.status(), Ordering::SeqCst);
        }
        Ok(())
    }

    fn is_powered_on(&self) -> bool {
        self.renderer.is_some()
    }

    fn renderer(&self) -> Option<&dyn Renderer> {
        self.renderer.as_ref().map(|r| r as &dyn Renderer)
    }

    fn set_audio_sink(&mut self, sink: Option<Arc<dyn Sink>>) {
        if let Some(sink) = sink {
            sink.set_callback(Box::new(|out: &mut [AudioSample]| {
                for frame in out.chunks_exact_mut(2) {
                    frame[0] = LEFT_SAMPLE;
                    frame[1] = RIGHT_SAMPLE;
                }
            }));
        }
    }

    fn set_user_paths(&mut self, paths: &UserPaths) {
        *LOADED_PATHS.lock().unwrap_or_else(PoisonError::into_inner) = Some(paths.clone());
    }

    fn service_modules(&self) -> Vec<String> {
        ["cfg", "fs", "hid", "mic"].iter().map(|s| s.to_string()).collect()
    }

    fn input_registry(&mut self) -> &mut InputRegistry {
        &mut self.registry
    }

    fn save_state(&self, out: &mut dyn Write) -> Result<(), MockError> {
        out.write_all(b"MOCK").map_err(|e| MockError(e.to_string()))?;
        out.write_all(&self.frames.to_le_bytes())
            .map_err(|e| MockError(e.to_string()))
    }

    fn load_state(&mut self, input: &mut dyn Read) -> Result<(), MockError> {
        let mut tag = [0u8; 4];
        let mut frames = [0u8; 8];
        input.read_exact(&mut tag).map_err(|e| MockError(e.to_string()))?;
        if &tag != b"MOCK" {
            return Err(MockError("foreign state".to_string()));
        }
        input.read_exact(&mut frames).map_err(|e| MockError(e.to_string()))?;
        self.frames = u64::from_le_bytes(frames);
        Ok(())
    }

    fn supports_save_states(&self) -> bool {
        true
    }
}
