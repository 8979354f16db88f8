//! Virtual input devices fed from host polling.
//!
//! The run step writes host input into an [`InputBridge`]; the emulator's
//! input layer reads it back through proxies built by the factories below,
//! registered under [`ENGINE_NAME`]. Each device's state is one atomic, so a
//! read never takes the bridge's table lock.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use cytrus_core::input::{
    AnalogDevice, ButtonDevice, Factory, InputProfile, InputRegistry, ParamPackage, TouchDevice,
};

/// Engine name the adapter's factories are registered under.
pub const ENGINE_NAME: &str = "libretro";

#[derive(Default)]
pub struct ButtonState {
    pressed: AtomicBool,
}

impl ButtonState {
    pub fn set(&self, pressed: bool) {
        self.pressed.store(pressed, Ordering::Relaxed);
    }

    pub fn get(&self) -> bool {
        self.pressed.load(Ordering::Relaxed)
    }
}

/// Both axes packed as f32 bit patterns: x low, y high.
#[derive(Default)]
pub struct AnalogState {
    axes: AtomicU64,
}

impl AnalogState {
    pub fn set(&self, x: f32, y: f32) {
        let packed = (x.to_bits() as u64) | ((y.to_bits() as u64) << 32);
        self.axes.store(packed, Ordering::Relaxed);
    }

    pub fn get(&self) -> (f32, f32) {
        let packed = self.axes.load(Ordering::Relaxed);
        (f32::from_bits(packed as u32), f32::from_bits((packed >> 32) as u32))
    }
}

const TOUCH_PRESSED_BIT: u64 = 1 << 32;
const TOUCH_SCALE: f32 = u16::MAX as f32;

/// x and y as 16-bit fixed point in [0, 1], pressed flag at bit 32.
#[derive(Default)]
pub struct TouchState {
    packed: AtomicU64,
}

impl TouchState {
    pub fn set(&self, x: f32, y: f32, pressed: bool) {
        let fixed = |v: f32| (v.clamp(0.0, 1.0) * TOUCH_SCALE).round() as u64;
        let mut packed = fixed(x) | (fixed(y) << 16);
        if pressed {
            packed |= TOUCH_PRESSED_BIT;
        }
        self.packed.store(packed, Ordering::Relaxed);
    }

    pub fn get(&self) -> (f32, f32, bool) {
        let packed = self.packed.load(Ordering::Relaxed);
        let x = (packed & 0xFFFF) as f32 / TOUCH_SCALE;
        let y = ((packed >> 16) & 0xFFFF) as f32 / TOUCH_SCALE;
        (x, y, packed & TOUCH_PRESSED_BIT != 0)
    }
}

/// Table of virtual devices keyed by native id, created on first use.
#[derive(Default)]
pub struct InputBridge {
    buttons: Mutex<HashMap<i32, Arc<ButtonState>>>,
    analogs: Mutex<HashMap<i32, Arc<AnalogState>>>,
    touch: Mutex<Option<Arc<TouchState>>>,
}

impl InputBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn button_device(&self, id: i32) -> Arc<ButtonState> {
        let mut buttons = self.buttons.lock().unwrap_or_else(PoisonError::into_inner);
        buttons.entry(id).or_default().clone()
    }

    pub fn analog_device(&self, id: i32) -> Arc<AnalogState> {
        let mut analogs = self.analogs.lock().unwrap_or_else(PoisonError::into_inner);
        analogs.entry(id).or_default().clone()
    }

    pub fn touch_device(&self) -> Arc<TouchState> {
        let mut touch = self.touch.lock().unwrap_or_else(PoisonError::into_inner);
        touch.get_or_insert_with(Default::default).clone()
    }

    pub fn set_button(&self, id: i32, pressed: bool) {
        let mut buttons = self.buttons.lock().unwrap_or_else(PoisonError::into_inner);
        buttons.entry(id).or_default().set(pressed);
    }

    pub fn set_analog(&self, id: i32, x: f32, y: f32) {
        let mut analogs = self.analogs.lock().unwrap_or_else(PoisonError::into_inner);
        analogs.entry(id).or_default().set(x, y);
    }

    pub fn set_touch(&self, x: f32, y: f32, pressed: bool) {
        let mut touch = self.touch.lock().unwrap_or_else(PoisonError::into_inner);
        touch.get_or_insert_with(Default::default).set(x, y, pressed);
    }
}

struct ButtonProxy(Arc<ButtonState>);

impl ButtonDevice for ButtonProxy {
    fn status(&self) -> bool {
        self.0.get()
    }
}

struct AnalogProxy(Arc<AnalogState>);

impl AnalogDevice for AnalogProxy {
    fn status(&self) -> (f32, f32) {
        self.0.get()
    }
}

struct TouchProxy(Arc<TouchState>);

impl TouchDevice for TouchProxy {
    fn status(&self) -> (f32, f32, bool) {
        self.0.get()
    }
}

pub struct ButtonFactory(pub Arc<InputBridge>);

impl Factory<dyn ButtonDevice> for ButtonFactory {
    fn create(&self, params: &ParamPackage) -> Box<dyn ButtonDevice> {
        Box::new(ButtonProxy(self.0.button_device(params.get_int("id", 0))))
    }
}

pub struct AnalogFactory(pub Arc<InputBridge>);

impl Factory<dyn AnalogDevice> for AnalogFactory {
    fn create(&self, params: &ParamPackage) -> Box<dyn AnalogDevice> {
        Box::new(AnalogProxy(self.0.analog_device(params.get_int("id", 0))))
    }
}

pub struct TouchFactory(pub Arc<InputBridge>);

impl Factory<dyn TouchDevice> for TouchFactory {
    fn create(&self, _params: &ParamPackage) -> Box<dyn TouchDevice> {
        Box::new(TouchProxy(self.0.touch_device()))
    }
}

/// Register the bridge's factories with the emulator's input layer.
pub fn register_factories(registry: &mut InputRegistry, bridge: &Arc<InputBridge>) {
    registry.register_button_factory(ENGINE_NAME, Arc::new(ButtonFactory(bridge.clone())));
    registry.register_analog_factory(ENGINE_NAME, Arc::new(AnalogFactory(bridge.clone())));
    registry.register_touch_factory(ENGINE_NAME, Arc::new(TouchFactory(bridge.clone())));
}

pub fn unregister_factories(registry: &mut InputRegistry) {
    registry.unregister(ENGINE_NAME);
}

/// Bindings routing every control of the console through the bridge.
pub fn default_input_profile() -> InputProfile {
    InputProfile::for_engine(ENGINE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cytrus_core::input::NativeButton;

    fn registry(bridge: &Arc<InputBridge>) -> InputRegistry {
        let mut registry = InputRegistry::new();
        register_factories(&mut registry, bridge);
        registry
    }

    #[test]
    fn test_set_button_visible_through_proxy() {
        let bridge = Arc::new(InputBridge::new());
        let registry = registry(&bridge);
        let a = registry.create_button("engine:libretro,id:0");
        let b = registry.create_button("engine:libretro,id:1");

        bridge.set_button(NativeButton::A.id(), true);
        assert!(a.status());
        assert!(!b.status());
        bridge.set_button(NativeButton::A.id(), false);
        assert!(!a.status());
    }

    #[test]
    fn test_unset_ids_default_to_idle() {
        let bridge = InputBridge::new();
        assert!(!bridge.button_device(42).get());
        assert_eq!(bridge.analog_device(7).get(), (0.0, 0.0));
        assert_eq!(bridge.touch_device().get(), (0.0, 0.0, false));
    }

    #[test]
    fn test_proxy_created_before_first_write_sees_it() {
        let bridge = Arc::new(InputBridge::new());
        let registry = registry(&bridge);
        let stick = registry.create_analog("engine:libretro,id:1");
        bridge.set_analog(1, -0.5, 0.25);
        assert_eq!(stick.status(), (-0.5, 0.25));
    }

    #[test]
    fn test_touch_fixed_point_round_trip() {
        let bridge = Arc::new(InputBridge::new());
        let touch = registry(&bridge).create_touch("engine:libretro");
        bridge.set_touch(0.25, 0.75, true);
        let (x, y, pressed) = touch.status();
        assert!(pressed);
        assert!((x - 0.25).abs() < 1e-4);
        assert!((y - 0.75).abs() < 1e-4);

        bridge.set_touch(2.0, -1.0, false);
        assert_eq!(touch.status(), (1.0, 0.0, false));
    }

    #[test]
    fn test_unregister_falls_back_to_idle_devices() {
        let bridge = Arc::new(InputBridge::new());
        let mut registry = registry(&bridge);
        bridge.set_button(0, true);
        unregister_factories(&mut registry);
        assert!(!registry.is_registered(ENGINE_NAME));
        assert!(!registry.create_button("engine:libretro,id:0").status());
    }

    #[test]
    fn test_default_profile_uses_bridge_engine() {
        let profile = default_input_profile();
        let bridge = Arc::new(InputBridge::new());
        let registry = registry(&bridge);
        bridge.set_button(NativeButton::Home.id(), true);
        let home = registry.create_button(&profile.buttons[NativeButton::Home as usize]);
        assert!(home.status());
    }
}
