//! libretro frontend for the Cytrus 3DS emulator.
//!
//! The adapter owns no emulation. It drives a [`cytrus_core::System`] from the
//! host's frame pump and translates between the libretro ABI and the
//! emulator's window, input, audio and renderer seams.
//!
//! The crate that implements `System` builds the actual plugin:
//!
//! ```ignore
//! // crate-type = ["cdylib"]
//! cytrus_libretro::export_libretro_core!(my_emulator::Cytrus);
//! ```

pub mod audio_sink;
pub mod compose;
pub mod emu_window;
pub mod environment;
pub mod error;
pub mod ffi;
pub mod host_log;
pub mod input;
pub mod input_mapper;
pub mod options;
pub mod save_state;
mod state;

pub use error::{LoadError, StateError};
pub use state::{push_audio, system_av_info, HostCallbacks, Lifecycle};

#[doc(hidden)]
pub mod __private {
    pub use crate::state::{CoreInstance, HwContextHooks};
}

/// Emit the full `retro_*` entry point table for a [`cytrus_core::System`].
///
/// Invoke once per `cdylib`. The adapter context is created on first use and
/// lives for the rest of the process.
#[macro_export]
macro_rules! export_libretro_core {
    ($system:ty) => {
        const _: () = {
            fn __cytrus_state() -> &'static $crate::__private::CoreInstance<$system> {
                static STATE: ::std::sync::OnceLock<$crate::__private::CoreInstance<$system>> =
                    ::std::sync::OnceLock::new();
                STATE.get_or_init(|| {
                    $crate::__private::CoreInstance::new($crate::__private::HwContextHooks {
                        context_reset: __cytrus_context_reset,
                        context_destroy: __cytrus_context_destroy,
                    })
                })
            }

            unsafe extern "C" fn __cytrus_context_reset() {
                __cytrus_state().context_reset();
            }

            unsafe extern "C" fn __cytrus_context_destroy() {
                __cytrus_state().context_destroy();
            }

            #[no_mangle]
            pub unsafe extern "C" fn retro_set_environment(cb: $crate::ffi::retro_environment_t) {
                __cytrus_state().set_environment(cb);
            }

            #[no_mangle]
            pub unsafe extern "C" fn retro_set_video_refresh(cb: $crate::ffi::retro_video_refresh_t) {
                __cytrus_state().set_video_refresh(cb);
            }

            #[no_mangle]
            pub unsafe extern "C" fn retro_set_audio_sample(cb: $crate::ffi::retro_audio_sample_t) {
                __cytrus_state().set_audio_sample(cb);
            }

            #[no_mangle]
            pub unsafe extern "C" fn retro_set_audio_sample_batch(cb: $crate::ffi::retro_audio_sample_batch_t) {
                __cytrus_state().set_audio_sample_batch(cb);
            }

            #[no_mangle]
            pub unsafe extern "C" fn retro_set_input_poll(cb: $crate::ffi::retro_input_poll_t) {
                __cytrus_state().set_input_poll(cb);
            }

            #[no_mangle]
            pub unsafe extern "C" fn retro_set_input_state(cb: $crate::ffi::retro_input_state_t) {
                __cytrus_state().set_input_state(cb);
            }

            #[no_mangle]
            pub unsafe extern "C" fn retro_init() {
                __cytrus_state().init();
            }

            #[no_mangle]
            pub unsafe extern "C" fn retro_deinit() {
                __cytrus_state().deinit();
            }

            #[no_mangle]
            pub unsafe extern "C" fn retro_api_version() -> ::std::ffi::c_uint {
                $crate::ffi::RETRO_API_VERSION
            }

            #[no_mangle]
            pub unsafe extern "C" fn retro_get_system_info(info: *mut $crate::ffi::retro_system_info) {
                __cytrus_state().get_system_info(info);
            }

            #[no_mangle]
            pub unsafe extern "C" fn retro_get_system_av_info(info: *mut $crate::ffi::retro_system_av_info) {
                __cytrus_state().get_system_av_info(info);
            }

            #[no_mangle]
            pub unsafe extern "C" fn retro_set_controller_port_device(
                port: ::std::ffi::c_uint,
                device: ::std::ffi::c_uint,
            ) {
                __cytrus_state().set_controller_port_device(port, device);
            }

            #[no_mangle]
            pub unsafe extern "C" fn retro_reset() {
                __cytrus_state().reset();
            }

            #[no_mangle]
            pub unsafe extern "C" fn retro_run() {
                __cytrus_state().run();
            }

            #[no_mangle]
            pub unsafe extern "C" fn retro_serialize_size() -> usize {
                __cytrus_state().serialize_size()
            }

            #[no_mangle]
            pub unsafe extern "C" fn retro_serialize(data: *mut ::std::ffi::c_void, len: usize) -> bool {
                __cytrus_state().serialize(data, len)
            }

            #[no_mangle]
            pub unsafe extern "C" fn retro_unserialize(data: *const ::std::ffi::c_void, len: usize) -> bool {
                __cytrus_state().unserialize(data, len)
            }

            #[no_mangle]
            pub unsafe extern "C" fn retro_cheat_reset() {
                __cytrus_state().cheat_reset();
            }

            #[no_mangle]
            pub unsafe extern "C" fn retro_cheat_set(
                index: ::std::ffi::c_uint,
                enabled: bool,
                code: *const ::std::ffi::c_char,
            ) {
                __cytrus_state().cheat_set(index, enabled, code);
            }

            #[no_mangle]
            pub unsafe extern "C" fn retro_load_game(game: *const $crate::ffi::retro_game_info) -> bool {
                __cytrus_state().load_game(game)
            }

            #[no_mangle]
            pub unsafe extern "C" fn retro_load_game_special(
                _game_type: ::std::ffi::c_uint,
                _info: *const $crate::ffi::retro_game_info,
                _num_info: usize,
            ) -> bool {
                false
            }

            #[no_mangle]
            pub unsafe extern "C" fn retro_unload_game() {
                __cytrus_state().unload_game();
            }

            #[no_mangle]
            pub unsafe extern "C" fn retro_get_region() -> ::std::ffi::c_uint {
                __cytrus_state().region()
            }

            #[no_mangle]
            pub unsafe extern "C" fn retro_get_memory_data(id: ::std::ffi::c_uint) -> *mut ::std::ffi::c_void {
                __cytrus_state().memory_data(id)
            }

            #[no_mangle]
            pub unsafe extern "C" fn retro_get_memory_size(id: ::std::ffi::c_uint) -> usize {
                __cytrus_state().memory_size(id)
            }
        };
    };
}
