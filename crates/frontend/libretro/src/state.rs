//! Process-wide adapter context behind the exported `retro_*` symbols.
//!
//! # Locking
//!
//! - Host callbacks sit in an `RwLock` and are copied out before any call.
//! - The hardware render slot has its own lock so context reset/destroy
//!   notifications never wait on a running frame.
//! - Everything else (lifecycle, emulator, window, sink) lives behind one
//!   mutex taken per entry point.
//! - No lock is held while a host callback runs. Host queries happen before
//!   the mutex is taken and presentation happens after it is released, so a
//!   callback may re-enter any `retro_*` function.
//! - The settings write guard is always dropped before the emulator is
//!   called, since the emulator reads the same settings.

use std::ffi::{c_char, c_void, CStr};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockWriteGuard};

use cytrus_core::audio::{Sink, NATIVE_SAMPLE_RATE};
use cytrus_core::framebuffer_layout::FramebufferLayout;
use cytrus_core::logging::{log, LogCategory, LogLevel};
use cytrus_core::paths::UserPaths;
use cytrus_core::settings::{GraphicsApi, Settings, SharedSettings};
use cytrus_core::types::{AudioSample, Frame};
use cytrus_core::window::{EmuWindow, HwRenderHandle};
use cytrus_core::System;

use crate::audio_sink::LibretroSink;
use crate::emu_window::{HwRenderSlot, LibretroEmuWindow, PresentationBackend};
use crate::environment::Environment;
use crate::error::{LoadError, StateError};
use crate::ffi;
use crate::host_log;
use crate::input::{self, InputBridge};
use crate::input_mapper;
use crate::options::{self, MAX_RESOLUTION_FACTOR};
use crate::save_state::{self, CountingWriter};

pub const LIBRARY_NAME: &CStr = c"Cytrus";
const VERSION_NUL: &str = concat!(env!("CARGO_PKG_VERSION"), "\0");
pub const LIBRARY_VERSION: &CStr = match CStr::from_bytes_with_nul(VERSION_NUL.as_bytes()) {
    Ok(version) => version,
    Err(_) => c"0.0.0",
};
pub const VALID_EXTENSIONS: &CStr = c"3ds|3dsx|cia|cci|cxi|app|elf|axf";

pub const FPS: f64 = 60.0;

/// Adapter lifecycle, in the order a host walks through it.
///
/// `Running` means the loaded title has produced a frame at the current
/// geometry. A reset or a geometry change drops back to `GameLoaded` until
/// the next frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Lifecycle {
    #[default]
    Uninitialized,
    Initialized,
    GameLoaded,
    Running,
}

/// Callbacks the host installs through the `retro_set_*` functions.
#[derive(Clone, Copy, Default)]
pub struct HostCallbacks {
    pub environment: Environment,
    pub video_refresh: ffi::retro_video_refresh_t,
    pub audio_sample: ffi::retro_audio_sample_t,
    pub audio_sample_batch: ffi::retro_audio_sample_batch_t,
    pub input_poll: ffi::retro_input_poll_t,
    pub input_state: ffi::retro_input_state_t,
}

/// Context notifications handed to the host with a hardware render request.
#[derive(Clone, Copy)]
pub struct HwContextHooks {
    pub context_reset: unsafe extern "C" fn(),
    pub context_destroy: unsafe extern "C" fn(),
}

struct Inner<S> {
    lifecycle: Lifecycle,
    settings: SharedSettings,
    system: Option<S>,
    window: Option<Arc<LibretroEmuWindow>>,
    sink: Arc<LibretroSink>,
    present: Frame,
    user_paths: Option<UserPaths>,
    state_scratch: Vec<u8>,
}

pub struct CoreInstance<S: System> {
    callbacks: RwLock<HostCallbacks>,
    hw_hooks: HwContextHooks,
    hw_render: Arc<HwRenderSlot>,
    bridge: Arc<InputBridge>,
    inner: Mutex<Inner<S>>,
}

fn write_settings(settings: &SharedSettings) -> RwLockWriteGuard<'_, Settings> {
    settings.write().unwrap_or_else(PoisonError::into_inner)
}

fn read_settings(settings: &SharedSettings) -> Settings {
    settings.read().unwrap_or_else(PoisonError::into_inner).clone()
}

/// Fields the adapter owns regardless of what the settings file or options say.
fn force_adapter_settings(settings: &mut Settings) {
    settings.use_cpu_jit = false;
    settings.use_shader_jit = false;
    settings.output_type = cytrus_core::audio::SinkType::Libretro;
    settings.input = input::default_input_profile();
}

/// Geometry and timing for the layout `settings` describes.
pub fn system_av_info(settings: &Settings) -> ffi::retro_system_av_info {
    let base = FramebufferLayout::compute(
        settings.layout_option,
        settings.swap_screen,
        settings.resolution_factor,
    );
    let max = FramebufferLayout::compute(settings.layout_option, settings.swap_screen, MAX_RESOLUTION_FACTOR);
    ffi::retro_system_av_info {
        geometry: ffi::retro_game_geometry {
            base_width: base.width,
            base_height: base.height,
            max_width: max.width,
            max_height: max.height,
            aspect_ratio: base.aspect_ratio(),
        },
        timing: ffi::retro_system_timing {
            fps: FPS,
            sample_rate: NATIVE_SAMPLE_RATE as f64,
        },
    }
}

/// Hand interleaved stereo samples to the host, preferring the batch callback.
///
/// Batch pushes repeat until every frame is consumed or the host takes none.
pub fn push_audio(callbacks: &HostCallbacks, samples: &[AudioSample], frames: usize) {
    if let Some(batch) = callbacks.audio_sample_batch {
        let mut offset = 0;
        while offset < frames {
            let remaining = frames - offset;
            let taken = unsafe { batch(samples[offset * 2..].as_ptr(), remaining) };
            if taken == 0 {
                log(LogCategory::Audio, LogLevel::Debug, || {
                    format!("Host accepted no audio, dropping {} frames", remaining)
                });
                break;
            }
            offset += taken.min(remaining);
        }
    } else if let Some(sample) = callbacks.audio_sample {
        for frame in samples.chunks_exact(2).take(frames) {
            unsafe { sample(frame[0], frame[1]) };
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

impl<S: System> CoreInstance<S> {
    pub fn new(hw_hooks: HwContextHooks) -> Self {
        Self {
            callbacks: RwLock::new(HostCallbacks::default()),
            hw_hooks,
            hw_render: Arc::new(HwRenderSlot::new()),
            bridge: Arc::new(InputBridge::new()),
            inner: Mutex::new(Inner {
                lifecycle: Lifecycle::Uninitialized,
                settings: Settings::default().shared(),
                system: None,
                window: None,
                sink: Arc::new(LibretroSink::new()),
                present: Frame::new(0, 0),
                user_paths: None,
                state_scratch: Vec::new(),
            }),
        }
    }

    fn callbacks(&self) -> HostCallbacks {
        *self.callbacks.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn update_callbacks(&self, f: impl FnOnce(&mut HostCallbacks)) {
        f(&mut self.callbacks.write().unwrap_or_else(PoisonError::into_inner));
    }

    fn lock_inner(&self) -> MutexGuard<'_, Inner<S>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lock_inner().lifecycle
    }

    pub fn settings(&self) -> Settings {
        read_settings(&self.lock_inner().settings)
    }

    pub fn bridge(&self) -> &Arc<InputBridge> {
        &self.bridge
    }

    pub fn set_environment(&self, cb: ffi::retro_environment_t) {
        let env = Environment::new(cb);
        self.update_callbacks(|c| c.environment = env);
        host_log::install(env.log_interface());

        if !env.set_variables(&options::definitions()) {
            log(LogCategory::Frontend, LogLevel::Debug, || "Host did not accept core options".to_string());
        }
        env.set_input_descriptors(&input_mapper::input_descriptors());
        env.set_controller_info("RetroPad", ffi::RETRO_DEVICE_JOYPAD);
    }

    pub fn set_video_refresh(&self, cb: ffi::retro_video_refresh_t) {
        self.update_callbacks(|c| c.video_refresh = cb);
    }

    pub fn set_audio_sample(&self, cb: ffi::retro_audio_sample_t) {
        self.update_callbacks(|c| c.audio_sample = cb);
    }

    pub fn set_audio_sample_batch(&self, cb: ffi::retro_audio_sample_batch_t) {
        self.update_callbacks(|c| c.audio_sample_batch = cb);
    }

    pub fn set_input_poll(&self, cb: ffi::retro_input_poll_t) {
        self.update_callbacks(|c| c.input_poll = cb);
    }

    pub fn set_input_state(&self, cb: ffi::retro_input_state_t) {
        self.update_callbacks(|c| c.input_state = cb);
    }

    pub fn init(&self) {
        let log_interface = self.callbacks().environment.log_interface();
        let mut inner = self.lock_inner();
        self.init_locked(&mut inner, log_interface);
    }

    fn init_locked(&self, inner: &mut Inner<S>, log_interface: ffi::retro_log_printf_t) {
        if inner.lifecycle != Lifecycle::Uninitialized {
            return;
        }
        host_log::init_log_bridge();
        host_log::install(log_interface);

        {
            let mut settings = write_settings(&inner.settings);
            force_adapter_settings(&mut settings);
            if let Some(renderer) = options::CORE_OPTIONS.iter().find(|o| o.key == options::RENDERER) {
                options::apply_value(&mut settings, renderer.key, renderer.default_value());
            }
        }

        let settings = inner.settings.clone();
        let system = inner.system.get_or_insert_with(|| S::create(settings));
        input::register_factories(system.input_registry(), &self.bridge);

        inner.lifecycle = Lifecycle::Initialized;
        log(LogCategory::Frontend, LogLevel::Info, || "Core initialized".to_string());
    }

    pub fn deinit(&self) {
        let mut inner = self.lock_inner();
        if inner.lifecycle == Lifecycle::Uninitialized {
            return;
        }
        self.unload_locked(&mut inner);
        if let Some(system) = inner.system.as_mut() {
            input::unregister_factories(system.input_registry());
        }
        inner.system = None;
        inner.present = Frame::new(0, 0);
        inner.lifecycle = Lifecycle::Uninitialized;
        log(LogCategory::Frontend, LogLevel::Info, || "Core deinitialized".to_string());
        host_log::uninstall();
    }

    /// # Safety
    /// `info` must be null or valid for writes.
    pub unsafe fn get_system_info(&self, info: *mut ffi::retro_system_info) {
        let Some(info) = info.as_mut() else {
            return;
        };
        *info = ffi::retro_system_info {
            library_name: LIBRARY_NAME.as_ptr(),
            library_version: LIBRARY_VERSION.as_ptr(),
            valid_extensions: VALID_EXTENSIONS.as_ptr(),
            need_fullpath: true,
            block_extract: false,
        };
    }

    /// # Safety
    /// `info` must be null or valid for writes.
    pub unsafe fn get_system_av_info(&self, info: *mut ffi::retro_system_av_info) {
        let Some(info) = info.as_mut() else {
            return;
        };
        *info = system_av_info(&self.settings());
    }

    /// # Safety
    /// `game` must be null or point to a valid `retro_game_info`.
    pub unsafe fn load_game(&self, game: *const ffi::retro_game_info) -> bool {
        let result = match catch_unwind(AssertUnwindSafe(|| self.try_load_game(game))) {
            Ok(result) => result,
            Err(payload) => {
                log(LogCategory::Frontend, LogLevel::Error, || {
                    format!("Load panicked: {}", panic_message(payload.as_ref()))
                });
                let mut inner = self.lock_inner();
                self.unload_locked(&mut inner);
                Err(LoadError::Panicked)
            }
        };
        match result {
            Ok(()) => true,
            Err(e) => {
                log(LogCategory::Frontend, LogLevel::Error, || format!("Load failed: {}", e));
                false
            }
        }
    }

    unsafe fn try_load_game(&self, game: *const ffi::retro_game_info) -> Result<(), LoadError> {
        let game = game.as_ref().ok_or(LoadError::NoGame)?;
        if game.path.is_null() {
            return Err(LoadError::MissingPath);
        }
        let path = PathBuf::from(CStr::from_ptr(game.path).to_string_lossy().into_owned());

        let env = self.callbacks().environment;
        if !env.set_pixel_format(ffi::RETRO_PIXEL_FORMAT_XRGB8888) {
            return Err(LoadError::PixelFormatRejected);
        }

        let base = env
            .system_directory()
            .or_else(|| env.save_directory())
            .unwrap_or_else(|| PathBuf::from("."));
        let user_paths = UserPaths::under(&base);
        if let Err(e) = user_paths.create_all() {
            log(LogCategory::Frontend, LogLevel::Warn, || {
                format!("Could not create {}: {}", user_paths.user.display(), e)
            });
        }
        let variables = options::read_variables(&env);
        let log_interface = env.log_interface();

        let mut settings = Settings::load(&user_paths.config_file());
        let window = LibretroEmuWindow::new(&mut settings, self.hw_render.clone());
        options::apply_variables(&mut settings, &variables);
        force_adapter_settings(&mut settings);

        let backend = if settings.graphics_api != GraphicsApi::Vulkan {
            PresentationBackend::Software
        } else if self.request_hw_render(&env) {
            PresentationBackend::Hardware
        } else {
            log(LogCategory::Video, LogLevel::Warn, || {
                "Host refused a Vulkan context, falling back to software rendering".to_string()
            });
            settings.graphics_api = GraphicsApi::Software;
            PresentationBackend::Software
        };
        window.set_backend(backend);

        let mut guard = self.lock_inner();
        self.init_locked(&mut guard, log_interface);
        if guard.lifecycle >= Lifecycle::GameLoaded {
            self.unload_locked(&mut guard);
        }
        let inner = &mut *guard;
        let Some(system) = inner.system.as_mut() else {
            return Err(LoadError::Core("emulator was not created".to_string()));
        };

        for module in system.service_modules() {
            settings.lle_modules.insert(module, false);
        }
        host_log::configure_level(&settings.log_level);
        window.on_framebuffer_size_changed(&settings);
        *write_settings(&inner.settings) = settings;
        let window = Arc::new(window);

        system.set_user_paths(&user_paths);
        let loaded = catch_unwind(AssertUnwindSafe(|| system.load(window.clone(), &path)));
        match loaded {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                system.shutdown();
                return Err(LoadError::Core(e.to_string()));
            }
            Err(payload) => {
                log(LogCategory::Core, LogLevel::Error, || panic_message(payload.as_ref()));
                if catch_unwind(AssertUnwindSafe(|| system.shutdown())).is_err() {
                    log(LogCategory::Core, LogLevel::Error, || {
                        "Emulator panicked again while shutting down".to_string()
                    });
                }
                return Err(LoadError::Panicked);
            }
        }

        system.set_audio_sink(Some(inner.sink.clone() as Arc<dyn Sink>));
        inner.window = Some(window);
        inner.user_paths = Some(user_paths);
        inner.lifecycle = Lifecycle::GameLoaded;
        log(LogCategory::Frontend, LogLevel::Info, || {
            format!("Loaded {} ({:?} presentation)", path.display(), backend)
        });
        Ok(())
    }

    fn request_hw_render(&self, env: &Environment) -> bool {
        let mut callback = ffi::retro_hw_render_callback {
            context_type: ffi::RETRO_HW_CONTEXT_VULKAN,
            context_reset: Some(self.hw_hooks.context_reset),
            get_current_framebuffer: None,
            get_proc_address: None,
            depth: false,
            stencil: false,
            bottom_left_origin: false,
            version_major: 1,
            version_minor: 1,
            cache_context: true,
            context_destroy: Some(self.hw_hooks.context_destroy),
            debug_context: false,
        };
        env.set_hw_render(&mut callback)
    }

    /// Host created (or recreated) the hardware context.
    pub fn context_reset(&self) {
        let env = self.callbacks().environment;
        let handle = HwRenderHandle::new(env.hw_render_interface());
        if handle.is_none() {
            log(LogCategory::Video, LogLevel::Warn, || "Host provided no render interface".to_string());
        }
        self.hw_render.set(handle);
    }

    /// Host is about to destroy the hardware context.
    pub fn context_destroy(&self) {
        self.hw_render.clear();
    }

    /// Copy a finished frame in from a render thread. See
    /// [`LibretroEmuWindow::set_video_buffer`].
    pub fn set_video_buffer(&self, pixels: &[u32], width: u32, height: u32) -> bool {
        let window = self.lock_inner().window.clone();
        window.is_some_and(|w| w.set_video_buffer(pixels, width, height))
    }

    pub fn run(&self) {
        let callbacks = self.callbacks();
        let env = callbacks.environment;
        let (window, sink, mut present) = {
            let mut inner = self.lock_inner();
            let Some(window) = inner.window.clone() else {
                return;
            };
            let present = std::mem::replace(&mut inner.present, Frame::new(0, 0));
            (window, inner.sink.clone(), present)
        };

        if env.variables_updated() {
            let variables = options::read_variables(&env);
            if let Some(av_info) = self.apply_option_changes(&window, &variables) {
                env.set_system_av_info(&av_info);
            }
        }

        if let Some(poll) = callbacks.input_poll {
            unsafe { poll() };
        }
        if let Some(state) = callbacks.input_state {
            input_mapper::update(&self.bridge, &window.layout(), |port, device, index, id| unsafe {
                state(port, device, index, id)
            });
        }

        self.emulate_frame(&window);
        self.present(&callbacks, &window, &mut present);
        sink.drain(|samples, frames| push_audio(&callbacks, samples, frames));

        self.lock_inner().present = present;
    }

    /// Returns the new AV info when the geometry changed.
    fn apply_option_changes(
        &self,
        window: &LibretroEmuWindow,
        variables: &[(&str, String)],
    ) -> Option<ffi::retro_system_av_info> {
        let mut inner = self.lock_inner();
        let resized = {
            let mut settings = write_settings(&inner.settings);
            let change = options::apply_variables(&mut settings, variables);
            force_adapter_settings(&mut settings);
            change.layout_changed.then(|| {
                window.on_framebuffer_size_changed(&settings);
                system_av_info(&settings)
            })
        };
        if resized.is_some() && inner.lifecycle == Lifecycle::Running {
            inner.lifecycle = Lifecycle::GameLoaded;
        }
        resized
    }

    fn emulate_frame(&self, window: &LibretroEmuWindow) {
        let mut guard = self.lock_inner();
        let inner = &mut *guard;
        if inner.lifecycle < Lifecycle::GameLoaded {
            return;
        }
        let Some(system) = inner.system.as_mut() else {
            return;
        };

        if system.is_powered_on() {
            match catch_unwind(AssertUnwindSafe(|| system.run_loop())) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => log(LogCategory::Core, LogLevel::Error, || format!("Frame failed: {}", e)),
                Err(payload) => log(LogCategory::Core, LogLevel::Error, || {
                    format!("Emulator panicked: {}", panic_message(payload.as_ref()))
                }),
            }
        }

        if let Some(renderer) = system.renderer() {
            window.swap_buffers(renderer);
        }
        inner.lifecycle = Lifecycle::Running;
    }

    fn present(&self, callbacks: &HostCallbacks, window: &LibretroEmuWindow, present: &mut Frame) {
        let Some(video) = callbacks.video_refresh else {
            return;
        };
        match window.backend() {
            PresentationBackend::Software => {
                window.copy_frame_into(present);
                unsafe {
                    video(
                        present.pixels.as_ptr() as *const c_void,
                        present.width,
                        present.height,
                        present.pitch(),
                    )
                };
            }
            PresentationBackend::Hardware => {
                let layout = window.layout();
                let data = if self.hw_render.get().is_some() {
                    ffi::RETRO_HW_FRAME_BUFFER_VALID
                } else {
                    std::ptr::null()
                };
                unsafe { video(data, layout.width, layout.height, 0) };
            }
        }
    }

    pub fn reset(&self) {
        let mut guard = self.lock_inner();
        let inner = &mut *guard;
        let Some(system) = inner.system.as_mut() else {
            return;
        };
        if system.is_powered_on() {
            system.reset();
            if inner.lifecycle == Lifecycle::Running {
                inner.lifecycle = Lifecycle::GameLoaded;
            }
        }
    }

    fn state_system(inner: &mut Inner<S>) -> Result<&mut S, StateError> {
        let window = inner.window.as_ref().ok_or(StateError::NotLoaded)?;
        if window.backend() == PresentationBackend::Hardware {
            return Err(StateError::Unsupported);
        }
        let system = inner.system.as_mut().ok_or(StateError::NotLoaded)?;
        if !system.is_powered_on() {
            return Err(StateError::NotLoaded);
        }
        if !system.supports_save_states() {
            return Err(StateError::Unsupported);
        }
        Ok(system)
    }

    fn try_serialize_size(&self) -> Result<usize, StateError> {
        let mut inner = self.lock_inner();
        let system = Self::state_system(&mut inner)?;
        let mut counter = CountingWriter::new();
        match catch_unwind(AssertUnwindSafe(|| system.save_state(&mut counter))) {
            Ok(Ok(())) => Ok(save_state::framed_len(counter.count())),
            Ok(Err(e)) => Err(StateError::Core(e.to_string())),
            Err(_) => Err(StateError::Panicked),
        }
    }

    pub fn serialize_size(&self) -> usize {
        self.try_serialize_size().unwrap_or_else(|e| {
            log(LogCategory::State, LogLevel::Debug, || format!("No state size: {}", e));
            0
        })
    }

    fn try_serialize(&self, buf: &mut [u8]) -> Result<usize, StateError> {
        let mut guard = self.lock_inner();
        let inner = &mut *guard;
        let mut scratch = std::mem::take(&mut inner.state_scratch);
        scratch.clear();
        let system = Self::state_system(inner)?;
        let saved = catch_unwind(AssertUnwindSafe(|| system.save_state(&mut scratch)));
        let result = match saved {
            Ok(Ok(())) => save_state::write_frame(buf, &scratch),
            Ok(Err(e)) => Err(StateError::Core(e.to_string())),
            Err(_) => Err(StateError::Panicked),
        };
        inner.state_scratch = scratch;
        result
    }

    /// # Safety
    /// `data` must be null or valid for `len` bytes of writes.
    pub unsafe fn serialize(&self, data: *mut c_void, len: usize) -> bool {
        if data.is_null() {
            return false;
        }
        let buf = std::slice::from_raw_parts_mut(data as *mut u8, len);
        match self.try_serialize(buf) {
            Ok(written) => {
                log(LogCategory::State, LogLevel::Debug, || format!("Saved state ({} bytes)", written));
                true
            }
            Err(e) => {
                log(LogCategory::State, LogLevel::Error, || format!("Save state failed: {}", e));
                false
            }
        }
    }

    fn try_unserialize(&self, data: &[u8]) -> Result<(), StateError> {
        let mut payload = save_state::read_frame(data)?;
        let mut inner = self.lock_inner();
        let system = Self::state_system(&mut inner)?;
        match catch_unwind(AssertUnwindSafe(|| system.load_state(&mut payload))) {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(StateError::Core(e.to_string())),
            Err(_) => Err(StateError::Panicked),
        }
    }

    /// # Safety
    /// `data` must be null or valid for `len` bytes of reads.
    pub unsafe fn unserialize(&self, data: *const c_void, len: usize) -> bool {
        if data.is_null() {
            return false;
        }
        let buf = std::slice::from_raw_parts(data as *const u8, len);
        match self.try_unserialize(buf) {
            Ok(()) => true,
            Err(e) => {
                log(LogCategory::State, LogLevel::Error, || format!("Load state failed: {}", e));
                false
            }
        }
    }

    pub fn unload_game(&self) {
        let mut inner = self.lock_inner();
        self.unload_locked(&mut inner);
    }

    fn unload_locked(&self, inner: &mut Inner<S>) {
        if inner.lifecycle >= Lifecycle::GameLoaded {
            if let Some(system) = inner.system.as_mut() {
                system.set_audio_sink(None);
                system.shutdown();
            }
            inner.lifecycle = Lifecycle::Initialized;
            log(LogCategory::Frontend, LogLevel::Info, || "Game unloaded".to_string());
        }
        inner.sink.clear_callback();
        inner.window = None;

        if let Some(paths) = inner.user_paths.take() {
            let snapshot = read_settings(&inner.settings);
            if let Err(e) = snapshot.save(&paths.config_file()) {
                log(LogCategory::Frontend, LogLevel::Warn, || {
                    format!("Failed to save {}: {}", paths.config_file().display(), e)
                });
            }
        }
    }

    pub fn region(&self) -> u32 {
        ffi::RETRO_REGION_NTSC
    }

    pub fn set_controller_port_device(&self, port: u32, device: u32) {
        log(LogCategory::Input, LogLevel::Debug, || {
            format!("Ignoring device {} on port {}", device, port)
        });
    }

    pub fn cheat_reset(&self) {
        log(LogCategory::Frontend, LogLevel::Debug, || "Cheats are not supported".to_string());
    }

    /// # Safety
    /// `code` must be null or a valid C string.
    pub unsafe fn cheat_set(&self, index: u32, enabled: bool, code: *const c_char) {
        let code = if code.is_null() {
            String::new()
        } else {
            CStr::from_ptr(code).to_string_lossy().into_owned()
        };
        log(LogCategory::Frontend, LogLevel::Debug, || {
            format!("Ignoring cheat {} ({}): {}", index, enabled, code)
        });
    }

    pub fn memory_data(&self, _id: u32) -> *mut c_void {
        std::ptr::null_mut()
    }

    pub fn memory_size(&self, _id: u32) -> usize {
        0
    }
}
