//! Audio sink that hands the DSP's output to the host once per frame.
//!
//! The DSP registers a pull callback; [`LibretroSink::drain`] pulls a fixed
//! block of frames through it and forwards them to the host's batch callback.
//! Both sides run at the DSP's native rate, so there is no resampling.

use std::sync::{Mutex, PoisonError};

use cytrus_core::audio::{Sink, SinkCallback, CHANNELS, NATIVE_SAMPLE_RATE};
use cytrus_core::logging::{log, LogCategory, LogLevel};
use cytrus_core::types::AudioSample;

/// Stereo frames pulled per drain.
pub const FRAMES_PER_DRAIN: usize = 512;

/// Capacity of the stack buffer a drain pulls into, in samples.
pub const DRAIN_BUFFER_SAMPLES: usize = 2048;

const _: () = assert!(DRAIN_BUFFER_SAMPLES >= CHANNELS * FRAMES_PER_DRAIN);

pub const SINK_NAME: &str = "Libretro";

/// Output devices this sink exposes to the emulator's device picker.
pub fn list_devices() -> Vec<String> {
    vec![SINK_NAME.to_string()]
}

#[derive(Default)]
pub struct LibretroSink {
    callback: Mutex<Option<SinkCallback>>,
}

impl LibretroSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_callback(&self) -> bool {
        self.callback
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Detach the DSP's callback, silencing further drains.
    pub fn clear_callback(&self) {
        *self.callback.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Pull one block from the DSP and forward it through `push`.
    ///
    /// `push` receives interleaved samples plus the frame count. Nothing is
    /// pulled or pushed while no callback is registered.
    pub fn drain<P>(&self, push: P)
    where
        P: FnOnce(&[AudioSample], usize),
    {
        let mut buffer = [0 as AudioSample; DRAIN_BUFFER_SAMPLES];
        let samples = CHANNELS * FRAMES_PER_DRAIN;
        {
            let mut callback = self.callback.lock().unwrap_or_else(PoisonError::into_inner);
            let Some(callback) = callback.as_mut() else {
                return;
            };
            callback(&mut buffer[..samples]);
        }
        push(&buffer[..samples], FRAMES_PER_DRAIN);
    }
}

impl Sink for LibretroSink {
    fn name(&self) -> &str {
        SINK_NAME
    }

    fn native_sample_rate(&self) -> u32 {
        NATIVE_SAMPLE_RATE
    }

    fn set_callback(&self, callback: SinkCallback) {
        let mut slot = self.callback.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            log(LogCategory::Audio, LogLevel::Debug, || "Replacing audio pull callback".to_string());
        }
        *slot = Some(callback);
    }
}
