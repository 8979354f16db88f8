//! Generic input devices and the factories that create them
//!
//! The emulator never talks to a controller directly. Each logical control
//! (a button, the circle pad, the touch screen) is bound in the settings to a
//! parameter string such as `engine:libretro,id:3`. At boot the emulator asks
//! the [`InputRegistry`] to build a device from that string; the `engine`
//! key picks which registered factory does the work.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Digital button
pub trait ButtonDevice: Send + Sync {
    fn status(&self) -> bool;
}

/// Two-axis stick, each axis in [-1.0, 1.0]
pub trait AnalogDevice: Send + Sync {
    fn status(&self) -> (f32, f32);
}

/// Touch panel: normalized (x, y) in [0.0, 1.0] and pressed flag
pub trait TouchDevice: Send + Sync {
    fn status(&self) -> (f32, f32, bool);
}

/// Creates devices of one kind from a parameter package.
pub trait Factory<T: ?Sized>: Send + Sync {
    fn create(&self, params: &ParamPackage) -> Box<T>;
}

/// Parsed `key:value,key:value` parameter string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamPackage {
    values: BTreeMap<String, String>,
}

impl ParamPackage {
    /// Parse a serialized package. Malformed pairs are skipped.
    pub fn parse(serialized: &str) -> Self {
        let values = serialized
            .split(',')
            .filter_map(|pair| {
                let (key, value) = pair.split_once(':')?;
                let key = key.trim();
                if key.is_empty() {
                    return None;
                }
                Some((key.to_string(), value.trim().to_string()))
            })
            .collect();
        Self { values }
    }

    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Integer value for `key`, or `default` when missing or unparsable.
    pub fn get_int(&self, key: &str, default: i32) -> i32 {
        self.get_str(key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    pub fn serialize(&self) -> String {
        self.values
            .iter()
            .map(|(k, v)| format!("{k}:{v}"))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Buttons of the console, in the order the emulator indexes them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum NativeButton {
    A = 0,
    B,
    X,
    Y,
    Up,
    Down,
    Left,
    Right,
    L,
    R,
    Start,
    Select,
    Debug,
    Gpio14,
    ZL,
    ZR,
    Home,
}

impl NativeButton {
    pub const COUNT: usize = 17;

    pub const ALL: [NativeButton; Self::COUNT] = [
        NativeButton::A,
        NativeButton::B,
        NativeButton::X,
        NativeButton::Y,
        NativeButton::Up,
        NativeButton::Down,
        NativeButton::Left,
        NativeButton::Right,
        NativeButton::L,
        NativeButton::R,
        NativeButton::Start,
        NativeButton::Select,
        NativeButton::Debug,
        NativeButton::Gpio14,
        NativeButton::ZL,
        NativeButton::ZR,
        NativeButton::Home,
    ];

    pub fn id(self) -> i32 {
        self as i32
    }
}

/// Analog sticks of the console
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum NativeAnalog {
    CirclePad = 0,
    CStick,
}

impl NativeAnalog {
    pub const COUNT: usize = 2;

    pub fn id(self) -> i32 {
        self as i32
    }
}

/// Parameter strings binding each logical control to a device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputProfile {
    pub buttons: Vec<String>,
    pub analogs: Vec<String>,
    pub touch_device: String,
}

impl Default for InputProfile {
    fn default() -> Self {
        Self {
            buttons: vec![String::new(); NativeButton::COUNT],
            analogs: vec![String::new(); NativeAnalog::COUNT],
            touch_device: String::new(),
        }
    }
}

impl InputProfile {
    /// Profile binding every control to `engine` by native id.
    pub fn for_engine(engine: &str) -> Self {
        let param = |id: i32| ParamPackage::default().with("engine", engine).with("id", id).serialize();
        Self {
            buttons: NativeButton::ALL.iter().map(|b| param(b.id())).collect(),
            analogs: (0..NativeAnalog::COUNT as i32).map(param).collect(),
            touch_device: ParamPackage::default().with("engine", engine).serialize(),
        }
    }
}

struct NullDevice;

impl ButtonDevice for NullDevice {
    fn status(&self) -> bool {
        false
    }
}

impl AnalogDevice for NullDevice {
    fn status(&self) -> (f32, f32) {
        (0.0, 0.0)
    }
}

impl TouchDevice for NullDevice {
    fn status(&self) -> (f32, f32, bool) {
        (0.0, 0.0, false)
    }
}

/// Named factories for each device kind.
///
/// Creating a device for an unknown engine yields an inert device that
/// reports the idle state, so a stale binding never aborts a boot.
#[derive(Default)]
pub struct InputRegistry {
    buttons: HashMap<String, Arc<dyn Factory<dyn ButtonDevice>>>,
    analogs: HashMap<String, Arc<dyn Factory<dyn AnalogDevice>>>,
    touch: HashMap<String, Arc<dyn Factory<dyn TouchDevice>>>,
}

impl InputRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_button_factory(&mut self, engine: &str, factory: Arc<dyn Factory<dyn ButtonDevice>>) {
        self.buttons.insert(engine.to_string(), factory);
    }

    pub fn register_analog_factory(&mut self, engine: &str, factory: Arc<dyn Factory<dyn AnalogDevice>>) {
        self.analogs.insert(engine.to_string(), factory);
    }

    pub fn register_touch_factory(&mut self, engine: &str, factory: Arc<dyn Factory<dyn TouchDevice>>) {
        self.touch.insert(engine.to_string(), factory);
    }

    /// Drop every factory registered under `engine`.
    pub fn unregister(&mut self, engine: &str) {
        self.buttons.remove(engine);
        self.analogs.remove(engine);
        self.touch.remove(engine);
    }

    pub fn is_registered(&self, engine: &str) -> bool {
        self.buttons.contains_key(engine) || self.analogs.contains_key(engine) || self.touch.contains_key(engine)
    }

    pub fn create_button(&self, params: &str) -> Box<dyn ButtonDevice> {
        let params = ParamPackage::parse(params);
        match params.get_str("engine").and_then(|e| self.buttons.get(e)) {
            Some(factory) => factory.create(&params),
            None => Box::new(NullDevice),
        }
    }

    pub fn create_analog(&self, params: &str) -> Box<dyn AnalogDevice> {
        let params = ParamPackage::parse(params);
        match params.get_str("engine").and_then(|e| self.analogs.get(e)) {
            Some(factory) => factory.create(&params),
            None => Box::new(NullDevice),
        }
    }

    pub fn create_touch(&self, params: &str) -> Box<dyn TouchDevice> {
        let params = ParamPackage::parse(params);
        match params.get_str("engine").and_then(|e| self.touch.get(e)) {
            Some(factory) => factory.create(&params),
            None => Box::new(NullDevice),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Always(bool);

    impl ButtonDevice for Always {
        fn status(&self) -> bool {
            self.0
        }
    }

    struct AlwaysFactory;

    impl Factory<dyn ButtonDevice> for AlwaysFactory {
        fn create(&self, params: &ParamPackage) -> Box<dyn ButtonDevice> {
            Box::new(Always(params.get_int("id", 0) % 2 == 1))
        }
    }

    #[test]
    fn test_param_package_parse() {
        let params = ParamPackage::parse("engine:libretro,id:3");
        assert_eq!(params.get_str("engine"), Some("libretro"));
        assert_eq!(params.get_int("id", 0), 3);
        assert_eq!(params.get_int("missing", 9), 9);
    }

    #[test]
    fn test_param_package_skips_malformed_pairs() {
        let params = ParamPackage::parse("engine:x,garbage,:5,id:notanumber");
        assert_eq!(params.get_str("engine"), Some("x"));
        assert_eq!(params.get_int("id", -1), -1);
        assert_eq!(params.serialize(), "engine:x,id:notanumber");
    }

    #[test]
    fn test_registry_dispatches_by_engine() {
        let mut registry = InputRegistry::new();
        registry.register_button_factory("test", Arc::new(AlwaysFactory));
        assert!(registry.create_button("engine:test,id:1").status());
        assert!(!registry.create_button("engine:test,id:2").status());
    }

    #[test]
    fn test_unknown_engine_yields_idle_device() {
        let registry = InputRegistry::new();
        assert!(!registry.create_button("engine:nope,id:1").status());
        assert_eq!(registry.create_analog("").status(), (0.0, 0.0));
        assert_eq!(registry.create_touch("engine:nope").status(), (0.0, 0.0, false));
    }

    #[test]
    fn test_unregister_removes_engine() {
        let mut registry = InputRegistry::new();
        registry.register_button_factory("test", Arc::new(AlwaysFactory));
        assert!(registry.is_registered("test"));
        registry.unregister("test");
        assert!(!registry.is_registered("test"));
    }

    #[test]
    fn test_profile_for_engine_binds_native_ids() {
        let profile = InputProfile::for_engine("libretro");
        assert_eq!(profile.buttons.len(), NativeButton::COUNT);
        let zl = ParamPackage::parse(&profile.buttons[NativeButton::ZL as usize]);
        assert_eq!(zl.get_int("id", -1), NativeButton::ZL.id());
        assert_eq!(ParamPackage::parse(&profile.touch_device).get_str("engine"), Some("libretro"));
    }
}
