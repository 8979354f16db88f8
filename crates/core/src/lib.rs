//! Interfaces shared between the wrapped 3DS emulator and its frontends.
//!
//! Nothing in this crate emulates hardware. It describes the seams a frontend
//! drives (`System`, `Renderer`, `Sink`, input factories) and the ones it
//! provides back to the emulator (`EmuWindow`, input devices), plus the
//! settings snapshot and layout math both sides agree on.

pub mod audio;
pub mod framebuffer_layout;
pub mod input;
pub mod logging;
pub mod paths;
pub mod renderer;
pub mod settings;
pub mod window;

pub mod types {
    use serde::{Deserialize, Serialize};

    /// Presentable image, packed ARGB8888 (0xAARRGGBB), row-major.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Frame {
        pub width: u32,
        pub height: u32,
        pub pixels: Vec<u32>,
    }

    impl Frame {
        pub fn new(width: u32, height: u32) -> Self {
            Self::filled(width, height, 0)
        }

        pub fn filled(width: u32, height: u32, color: u32) -> Self {
            Self {
                width,
                height,
                pixels: vec![color; (width * height) as usize],
            }
        }

        /// Bytes per row when handed to a host as a raw pixel pointer.
        pub fn pitch(&self) -> usize {
            self.width as usize * std::mem::size_of::<u32>()
        }
    }

    /// Interleaved signed 16-bit PCM sample.
    pub type AudioSample = i16;
}

use std::io::{Read, Write};
use std::path::Path;
use std::sync::Arc;

use audio::Sink;
use input::InputRegistry;
use paths::UserPaths;
use renderer::Renderer;
use settings::SharedSettings;
use window::EmuWindow;

/// The wrapped emulator as seen by a frontend.
///
/// One instance exists per process. A frontend constructs it once with the
/// settings snapshot it shares with the emulator, then drives it through
/// load, per-frame `run_loop`, and shutdown.
pub trait System: Send {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Construct the emulator around a shared settings snapshot.
    fn create(settings: SharedSettings) -> Self
    where
        Self: Sized;

    /// Boot the title at `path`, presenting through `window`.
    fn load(&mut self, window: Arc<dyn EmuWindow>, path: &Path) -> Result<(), Self::Error>;

    /// Reset to the power-on state of the loaded title
    fn reset(&mut self);

    /// Stop emulation and release everything tied to the loaded title.
    /// Must be harmless when nothing is loaded.
    fn shutdown(&mut self);

    /// Emulate one frame's worth of work.
    fn run_loop(&mut self) -> Result<(), Self::Error>;

    fn is_powered_on(&self) -> bool;

    /// Active renderer, if video has been initialised.
    fn renderer(&self) -> Option<&dyn Renderer>;

    /// Install (or detach with `None`) the audio output the DSP pulls into.
    fn set_audio_sink(&mut self, sink: Option<Arc<dyn Sink>>);

    /// Point NAND/SDMC/system-data roots at frontend-chosen directories.
    fn set_user_paths(&mut self, paths: &UserPaths);

    /// Names of every service module the emulator knows how to run.
    fn service_modules(&self) -> Vec<String>;

    /// Registry through which the emulator's input layer creates devices.
    fn input_registry(&mut self) -> &mut InputRegistry;

    /// Write the serializable emulator state.
    /// Note: the loaded title itself is not part of the state.
    fn save_state(&self, out: &mut dyn Write) -> Result<(), Self::Error>;

    /// Restore state previously produced by [`System::save_state`].
    fn load_state(&mut self, input: &mut dyn Read) -> Result<(), Self::Error>;

    /// Check if this system supports save/load state functionality
    fn supports_save_states(&self) -> bool {
        false
    }
}
