//! Typed wrapper over the host's environment callback.

use std::ffi::{c_char, c_void, CStr, CString};
use std::path::PathBuf;

use crate::ffi::{self, retro_environment_t};

/// Copyable handle to the host environment callback.
///
/// Every query degrades to "unsupported" when no callback is installed.
#[derive(Clone, Copy, Default)]
pub struct Environment {
    cb: retro_environment_t,
}

impl Environment {
    pub fn new(cb: retro_environment_t) -> Self {
        Self { cb }
    }

    pub fn is_set(&self) -> bool {
        self.cb.is_some()
    }

    /// Raw environment call. `data` must match what the host expects for `cmd`.
    ///
    /// # Safety
    /// The pointee type and lifetime must follow the libretro contract for `cmd`.
    pub unsafe fn call(&self, cmd: u32, data: *mut c_void) -> bool {
        match self.cb {
            Some(cb) => cb(cmd, data),
            None => false,
        }
    }

    pub fn set_pixel_format(&self, format: ffi::retro_pixel_format) -> bool {
        let mut format = format;
        unsafe { self.call(ffi::RETRO_ENVIRONMENT_SET_PIXEL_FORMAT, &mut format as *mut _ as *mut c_void) }
    }

    fn directory(&self, cmd: u32) -> Option<PathBuf> {
        let mut dir: *const c_char = std::ptr::null();
        let ok = unsafe { self.call(cmd, &mut dir as *mut _ as *mut c_void) };
        if !ok || dir.is_null() {
            return None;
        }
        let dir = unsafe { CStr::from_ptr(dir) }.to_string_lossy().into_owned();
        if dir.is_empty() {
            None
        } else {
            Some(PathBuf::from(dir))
        }
    }

    pub fn system_directory(&self) -> Option<PathBuf> {
        self.directory(ffi::RETRO_ENVIRONMENT_GET_SYSTEM_DIRECTORY)
    }

    pub fn save_directory(&self) -> Option<PathBuf> {
        self.directory(ffi::RETRO_ENVIRONMENT_GET_SAVE_DIRECTORY)
    }

    /// Current value of a core option, if the host knows the key.
    pub fn variable(&self, key: &str) -> Option<String> {
        let key = CString::new(key).ok()?;
        let mut var = ffi::retro_variable {
            key: key.as_ptr(),
            value: std::ptr::null(),
        };
        let ok = unsafe { self.call(ffi::RETRO_ENVIRONMENT_GET_VARIABLE, &mut var as *mut _ as *mut c_void) };
        if !ok || var.value.is_null() {
            return None;
        }
        Some(unsafe { CStr::from_ptr(var.value) }.to_string_lossy().into_owned())
    }

    /// True when the user changed an option since the last query.
    pub fn variables_updated(&self) -> bool {
        let mut updated = false;
        let ok = unsafe {
            self.call(
                ffi::RETRO_ENVIRONMENT_GET_VARIABLE_UPDATE,
                &mut updated as *mut _ as *mut c_void,
            )
        };
        ok && updated
    }

    /// Declare core options as `(key, "Label; default|other|...")` pairs.
    pub fn set_variables(&self, definitions: &[(&str, String)]) -> bool {
        let owned: Vec<(CString, CString)> = definitions
            .iter()
            .filter_map(|(k, v)| Some((CString::new(*k).ok()?, CString::new(v.as_str()).ok()?)))
            .collect();
        let mut vars: Vec<ffi::retro_variable> = owned
            .iter()
            .map(|(k, v)| ffi::retro_variable {
                key: k.as_ptr(),
                value: v.as_ptr(),
            })
            .collect();
        vars.push(ffi::retro_variable {
            key: std::ptr::null(),
            value: std::ptr::null(),
        });
        unsafe { self.call(ffi::RETRO_ENVIRONMENT_SET_VARIABLES, vars.as_mut_ptr() as *mut c_void) }
    }

    /// Declare input descriptors as `(port, device, index, id, description)`.
    pub fn set_input_descriptors(&self, descriptors: &[(u32, u32, u32, u32, &str)]) -> bool {
        let names: Vec<CString> = descriptors
            .iter()
            .map(|d| CString::new(d.4).unwrap_or_default())
            .collect();
        let mut raw: Vec<ffi::retro_input_descriptor> = descriptors
            .iter()
            .zip(&names)
            .map(|(d, name)| ffi::retro_input_descriptor {
                port: d.0,
                device: d.1,
                index: d.2,
                id: d.3,
                description: name.as_ptr(),
            })
            .collect();
        raw.push(ffi::retro_input_descriptor {
            port: 0,
            device: 0,
            index: 0,
            id: 0,
            description: std::ptr::null(),
        });
        unsafe { self.call(ffi::RETRO_ENVIRONMENT_SET_INPUT_DESCRIPTORS, raw.as_mut_ptr() as *mut c_void) }
    }

    /// Declare a single controller type on port 0.
    pub fn set_controller_info(&self, description: &str, device: u32) -> bool {
        let Ok(desc) = CString::new(description) else {
            return false;
        };
        let types = [ffi::retro_controller_description {
            desc: desc.as_ptr(),
            id: device,
        }];
        let mut info = [
            ffi::retro_controller_info {
                types: types.as_ptr(),
                num_types: types.len() as u32,
            },
            ffi::retro_controller_info {
                types: std::ptr::null(),
                num_types: 0,
            },
        ];
        unsafe { self.call(ffi::RETRO_ENVIRONMENT_SET_CONTROLLER_INFO, info.as_mut_ptr() as *mut c_void) }
    }

    pub fn log_interface(&self) -> ffi::retro_log_printf_t {
        let mut cb = ffi::retro_log_callback { log: None };
        let ok = unsafe { self.call(ffi::RETRO_ENVIRONMENT_GET_LOG_INTERFACE, &mut cb as *mut _ as *mut c_void) };
        if ok {
            cb.log
        } else {
            None
        }
    }

    pub fn set_system_av_info(&self, info: &ffi::retro_system_av_info) -> bool {
        let mut info = *info;
        unsafe { self.call(ffi::RETRO_ENVIRONMENT_SET_SYSTEM_AV_INFO, &mut info as *mut _ as *mut c_void) }
    }

    /// Ask the host for a hardware context. The host may fill in callbacks.
    pub fn set_hw_render(&self, callback: &mut ffi::retro_hw_render_callback) -> bool {
        unsafe { self.call(ffi::RETRO_ENVIRONMENT_SET_HW_RENDER, callback as *mut _ as *mut c_void) }
    }

    /// Host render interface pointer, valid until the next context destroy.
    pub fn hw_render_interface(&self) -> *const c_void {
        let mut iface: *const c_void = std::ptr::null();
        let ok = unsafe {
            self.call(
                ffi::RETRO_ENVIRONMENT_GET_HW_RENDER_INTERFACE,
                &mut iface as *mut _ as *mut c_void,
            )
        };
        if ok {
            iface
        } else {
            std::ptr::null()
        }
    }
}
