//! Host input mapping
//!
//! Translates the host's RetroPad, analog sticks and pointer into the
//! bridge's native button, stick and touch devices.

use cytrus_core::framebuffer_layout::FramebufferLayout;
use cytrus_core::input::{NativeAnalog, NativeButton};

use crate::ffi;
use crate::input::InputBridge;

/// RetroPad button id → console button.
pub const JOYPAD_MAP: [(u32, NativeButton); 15] = [
    (ffi::RETRO_DEVICE_ID_JOYPAD_A, NativeButton::A),
    (ffi::RETRO_DEVICE_ID_JOYPAD_B, NativeButton::B),
    (ffi::RETRO_DEVICE_ID_JOYPAD_X, NativeButton::X),
    (ffi::RETRO_DEVICE_ID_JOYPAD_Y, NativeButton::Y),
    (ffi::RETRO_DEVICE_ID_JOYPAD_UP, NativeButton::Up),
    (ffi::RETRO_DEVICE_ID_JOYPAD_DOWN, NativeButton::Down),
    (ffi::RETRO_DEVICE_ID_JOYPAD_LEFT, NativeButton::Left),
    (ffi::RETRO_DEVICE_ID_JOYPAD_RIGHT, NativeButton::Right),
    (ffi::RETRO_DEVICE_ID_JOYPAD_L, NativeButton::L),
    (ffi::RETRO_DEVICE_ID_JOYPAD_R, NativeButton::R),
    (ffi::RETRO_DEVICE_ID_JOYPAD_START, NativeButton::Start),
    (ffi::RETRO_DEVICE_ID_JOYPAD_SELECT, NativeButton::Select),
    (ffi::RETRO_DEVICE_ID_JOYPAD_L2, NativeButton::ZL),
    (ffi::RETRO_DEVICE_ID_JOYPAD_R2, NativeButton::ZR),
    (ffi::RETRO_DEVICE_ID_JOYPAD_L3, NativeButton::Home),
];

/// Host stick index → console stick.
pub const ANALOG_MAP: [(u32, NativeAnalog); 2] = [
    (ffi::RETRO_DEVICE_INDEX_ANALOG_LEFT, NativeAnalog::CirclePad),
    (ffi::RETRO_DEVICE_INDEX_ANALOG_RIGHT, NativeAnalog::CStick),
];

/// Largest magnitude a host pointer coordinate reaches.
const POINTER_RANGE: f32 = 0x7fff as f32;

/// Input descriptors announced to the host for port 0.
pub fn input_descriptors() -> Vec<(u32, u32, u32, u32, &'static str)> {
    let joypad = ffi::RETRO_DEVICE_JOYPAD;
    let analog = ffi::RETRO_DEVICE_ANALOG;
    let mut descriptors: Vec<_> = JOYPAD_MAP
        .iter()
        .map(|&(id, button)| (0, joypad, 0, id, button_label(button)))
        .collect();
    descriptors.extend([
        (0, analog, ffi::RETRO_DEVICE_INDEX_ANALOG_LEFT, ffi::RETRO_DEVICE_ID_ANALOG_X, "Circle Pad X"),
        (0, analog, ffi::RETRO_DEVICE_INDEX_ANALOG_LEFT, ffi::RETRO_DEVICE_ID_ANALOG_Y, "Circle Pad Y"),
        (0, analog, ffi::RETRO_DEVICE_INDEX_ANALOG_RIGHT, ffi::RETRO_DEVICE_ID_ANALOG_X, "C-Stick X"),
        (0, analog, ffi::RETRO_DEVICE_INDEX_ANALOG_RIGHT, ffi::RETRO_DEVICE_ID_ANALOG_Y, "C-Stick Y"),
    ]);
    descriptors
}

fn button_label(button: NativeButton) -> &'static str {
    match button {
        NativeButton::A => "A",
        NativeButton::B => "B",
        NativeButton::X => "X",
        NativeButton::Y => "Y",
        NativeButton::Up => "Up",
        NativeButton::Down => "Down",
        NativeButton::Left => "Left",
        NativeButton::Right => "Right",
        NativeButton::L => "L",
        NativeButton::R => "R",
        NativeButton::Start => "Start",
        NativeButton::Select => "Select",
        NativeButton::ZL => "ZL",
        NativeButton::ZR => "ZR",
        NativeButton::Home => "Home",
        NativeButton::Debug => "Debug",
        NativeButton::Gpio14 => "GPIO14",
    }
}

/// Convert a host axis value to [-1, 1].
pub fn axis_value(raw: i16) -> f32 {
    (raw as f32 / 32768.0).clamp(-1.0, 1.0)
}

/// Map a host pointer position to bottom-screen local coordinates.
///
/// Returns `None` when the pointer lies outside the bottom screen or the
/// layout does not show it.
pub fn map_pointer(px: i16, py: i16, layout: &FramebufferLayout) -> Option<(f32, f32)> {
    let rect = layout.bottom?;
    let nx = (px as f32 + POINTER_RANGE) / (2.0 * POINTER_RANGE);
    let ny = (py as f32 + POINTER_RANGE) / (2.0 * POINTER_RANGE);
    let fx = nx * layout.width as f32;
    let fy = ny * layout.height as f32;
    if !rect.contains(fx, fy) {
        return None;
    }
    let local_x = (fx - rect.left as f32) / rect.width as f32;
    let local_y = (fy - rect.top as f32) / rect.height as f32;
    Some((local_x, local_y))
}

/// Poll every mapped control on port 0 through `input_state` and write the
/// results into `bridge`.
pub fn update<F>(bridge: &InputBridge, layout: &FramebufferLayout, input_state: F)
where
    F: Fn(u32, u32, u32, u32) -> i16,
{
    for &(id, button) in &JOYPAD_MAP {
        let pressed = input_state(0, ffi::RETRO_DEVICE_JOYPAD, 0, id) != 0;
        bridge.set_button(button.id(), pressed);
    }

    for &(index, stick) in &ANALOG_MAP {
        let x = axis_value(input_state(0, ffi::RETRO_DEVICE_ANALOG, index, ffi::RETRO_DEVICE_ID_ANALOG_X));
        // Host Y grows downwards; the console's grows upwards.
        let y = -axis_value(input_state(0, ffi::RETRO_DEVICE_ANALOG, index, ffi::RETRO_DEVICE_ID_ANALOG_Y));
        bridge.set_analog(stick.id(), x, y);
    }

    let pressed = input_state(0, ffi::RETRO_DEVICE_POINTER, 0, ffi::RETRO_DEVICE_ID_POINTER_PRESSED) != 0;
    let touch = if pressed {
        let px = input_state(0, ffi::RETRO_DEVICE_POINTER, 0, ffi::RETRO_DEVICE_ID_POINTER_X);
        let py = input_state(0, ffi::RETRO_DEVICE_POINTER, 0, ffi::RETRO_DEVICE_ID_POINTER_Y);
        map_pointer(px, py, layout)
    } else {
        None
    };
    match touch {
        Some((x, y)) => bridge.set_touch(x, y, true),
        None => bridge.set_touch(0.0, 0.0, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cytrus_core::settings::LayoutOption;

    fn default_layout() -> FramebufferLayout {
        FramebufferLayout::compute(LayoutOption::Default, false, 1)
    }

    /// Host pointer coordinate for a framebuffer pixel along an axis.
    fn pointer(pixel: f32, extent: u32) -> i16 {
        ((pixel / extent as f32) * 2.0 * POINTER_RANGE - POINTER_RANGE) as i16
    }

    #[test]
    fn test_joypad_map_covers_every_face_button_once() {
        let mut ids: Vec<u32> = JOYPAD_MAP.iter().map(|(id, _)| *id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), JOYPAD_MAP.len());
        assert!(JOYPAD_MAP.contains(&(ffi::RETRO_DEVICE_ID_JOYPAD_L3, NativeButton::Home)));
    }

    #[test]
    fn test_pointer_on_bottom_screen_maps_into_unit_square() {
        let layout = default_layout();
        let (x, y) = map_pointer(pointer(200.0, 400), pointer(360.0, 480), &layout).expect("on bottom screen");
        assert!((0.0..=1.0).contains(&x), "x = {x}");
        assert!((0.0..=1.0).contains(&y), "y = {y}");
        assert!((x - 0.5).abs() < 0.01);
        assert!((y - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_pointer_on_top_screen_is_not_a_touch() {
        let layout = default_layout();
        assert!(map_pointer(pointer(200.0, 400), pointer(100.0, 480), &layout).is_none());
        // Letterbox beside the bottom screen
        assert!(map_pointer(pointer(10.0, 400), pointer(360.0, 480), &layout).is_none());
    }

    #[test]
    fn test_pointer_without_bottom_screen() {
        let layout = FramebufferLayout::compute(LayoutOption::SingleScreen, false, 1);
        assert!(map_pointer(0, 0, &layout).is_none());
    }

    #[test]
    fn test_update_writes_buttons_sticks_and_touch() {
        let bridge = InputBridge::new();
        let layout = default_layout();
        let touch_x = pointer(200.0, 400);
        let touch_y = pointer(300.0, 480);
        update(&bridge, &layout, |_, device, index, id| match (device, index, id) {
            (ffi::RETRO_DEVICE_JOYPAD, 0, ffi::RETRO_DEVICE_ID_JOYPAD_R2) => 1,
            (ffi::RETRO_DEVICE_ANALOG, ffi::RETRO_DEVICE_INDEX_ANALOG_LEFT, ffi::RETRO_DEVICE_ID_ANALOG_Y) => {
                -32768
            }
            (ffi::RETRO_DEVICE_POINTER, 0, ffi::RETRO_DEVICE_ID_POINTER_PRESSED) => 1,
            (ffi::RETRO_DEVICE_POINTER, 0, ffi::RETRO_DEVICE_ID_POINTER_X) => touch_x,
            (ffi::RETRO_DEVICE_POINTER, 0, ffi::RETRO_DEVICE_ID_POINTER_Y) => touch_y,
            _ => 0,
        });

        assert!(bridge.button_device(NativeButton::ZR.id()).get());
        assert!(!bridge.button_device(NativeButton::ZL.id()).get());
        assert_eq!(bridge.analog_device(NativeAnalog::CirclePad.id()).get(), (0.0, 1.0));
        assert_eq!(bridge.analog_device(NativeAnalog::CStick.id()).get(), (0.0, 0.0));
        let (_, _, pressed) = bridge.touch_device().get();
        assert!(pressed);
    }

    #[test]
    fn test_release_clears_touch() {
        let bridge = InputBridge::new();
        bridge.set_touch(0.5, 0.5, true);
        update(&bridge, &default_layout(), |_, _, _, _| 0);
        assert_eq!(bridge.touch_device().get(), (0.0, 0.0, false));
    }

    #[test]
    fn test_descriptors_cover_buttons_and_sticks() {
        let descriptors = input_descriptors();
        assert_eq!(descriptors.len(), JOYPAD_MAP.len() + 4);
        assert!(descriptors.iter().any(|d| d.4 == "Home"));
    }
}
