//! Audio output seam between the emulator's DSP and a frontend.
//!
//! The DSP does not push samples. It registers a pull callback on the active
//! [`Sink`] and the sink decides when to call it.

use serde::{Deserialize, Serialize};

use crate::types::AudioSample;

/// Native output rate of the console's DSP in Hz.
pub const NATIVE_SAMPLE_RATE: u32 = 32768;

/// Channels per frame; all sinks are interleaved stereo.
pub const CHANNELS: usize = 2;

/// Pull callback registered by the DSP.
///
/// Fills the whole slice with interleaved stereo samples; the slice length is
/// always `frames * CHANNELS`.
pub type SinkCallback = Box<dyn FnMut(&mut [AudioSample]) + Send>;

/// Selectable audio outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SinkType {
    #[default]
    Auto,
    Null,
    Libretro,
}

/// Audio output the DSP feeds.
pub trait Sink: Send + Sync {
    fn name(&self) -> &str;

    /// Rate the sink expects samples at. Sinks that match the DSP rate need
    /// no resampling.
    fn native_sample_rate(&self) -> u32;

    /// Register the pull callback, replacing any previous one.
    fn set_callback(&self, callback: SinkCallback);
}
