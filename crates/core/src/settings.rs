//! Emulator settings snapshot
//!
//! One `Settings` value is shared between the emulator and its frontend.
//! Frontends read and write individual fields; persistence is plain JSON.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, RwLock};

use crate::audio::SinkType;
use crate::framebuffer_layout::MAX_RESOLUTION_FACTOR;
use crate::input::InputProfile;
use crate::logging::{log, LogCategory, LogLevel};

/// Settings shared between the emulator and a frontend.
pub type SharedSettings = Arc<RwLock<Settings>>;

/// Console region, stored as the value the emulator's config block expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Region {
    #[default]
    Auto,
    Japan,
    Usa,
    Europe,
    Australia,
    China,
    Korea,
    Taiwan,
}

impl Region {
    /// -1 selects automatically from the title; 0..=6 force a region.
    pub fn value(self) -> i32 {
        match self {
            Region::Auto => -1,
            Region::Japan => 0,
            Region::Usa => 1,
            Region::Europe => 2,
            Region::Australia => 3,
            Region::China => 4,
            Region::Korea => 5,
            Region::Taiwan => 6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AudioEmulation {
    #[default]
    Hle,
    Lle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GraphicsApi {
    #[default]
    Software,
    Vulkan,
}

/// Arrangement of the two screens in the presented frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LayoutOption {
    /// Top screen stacked over the bottom screen
    #[default]
    Default,
    /// Only one screen, chosen by the swap flag
    SingleScreen,
    /// Screens side by side
    SideScreen,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub region: Region,
    pub is_new_3ds: bool,
    pub audio_emulation: AudioEmulation,
    pub output_type: SinkType,
    pub graphics_api: GraphicsApi,
    pub use_cpu_jit: bool,
    pub use_shader_jit: bool,
    pub layout_option: LayoutOption,
    pub swap_screen: bool,
    pub resolution_factor: u32,
    pub cpu_clock_percentage: u32,
    #[serde(default = "default_direct_boot")]
    pub direct_boot: bool,
    #[serde(default)]
    pub lle_modules: BTreeMap<String, bool>, // module name -> run low-level
    #[serde(default)]
    pub input: InputProfile,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_direct_boot() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            region: Region::Auto,
            is_new_3ds: true,
            audio_emulation: AudioEmulation::Hle,
            output_type: SinkType::Auto,
            graphics_api: GraphicsApi::Software,
            use_cpu_jit: false,
            use_shader_jit: false,
            layout_option: LayoutOption::Default,
            swap_screen: false,
            resolution_factor: 1,
            cpu_clock_percentage: 100,
            direct_boot: default_direct_boot(),
            lle_modules: BTreeMap::new(),
            input: InputProfile::default(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    pub fn shared(self) -> SharedSettings {
        Arc::new(RwLock::new(self))
    }

    /// Load settings from `path`, falling back to defaults on error
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<Settings>(&contents) {
                Ok(mut settings) => {
                    settings.sanitize();
                    settings
                }
                Err(e) => {
                    log(LogCategory::Frontend, LogLevel::Warn, || {
                        format!("Failed to parse {}: {}. Using defaults.", path.display(), e)
                    });
                    Self::default()
                }
            },
            Err(_) => {
                // File doesn't exist or can't be read, use defaults
                Self::default()
            }
        }
    }

    /// Pull hand-edited values back into their supported ranges.
    pub fn sanitize(&mut self) {
        let factor = self.resolution_factor.clamp(1, MAX_RESOLUTION_FACTOR);
        if factor != self.resolution_factor {
            log(LogCategory::Frontend, LogLevel::Warn, || {
                format!("Resolution factor {} out of range, using {}", self.resolution_factor, factor)
            });
            self.resolution_factor = factor;
        }
        if self.cpu_clock_percentage == 0 {
            self.cpu_clock_percentage = 100;
        }
    }

    /// Save settings to `path`, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }
}
