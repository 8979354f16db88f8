//! Host-configurable core options and how they land in [`Settings`].

pub use cytrus_core::framebuffer_layout::MAX_RESOLUTION_FACTOR;
use cytrus_core::settings::{AudioEmulation, GraphicsApi, LayoutOption, Region, Settings};

use crate::environment::Environment;

pub const REGION: &str = "cytrus_region";
pub const MODEL: &str = "cytrus_model";
pub const AUDIO_EMULATION: &str = "cytrus_audio_emulation";
pub const DIRECT_BOOT: &str = "cytrus_direct_boot";
pub const RENDERER: &str = "cytrus_renderer";
pub const LAYOUT: &str = "cytrus_layout";
pub const SWAP_SCREENS: &str = "cytrus_swap_screens";
pub const RESOLUTION_FACTOR: &str = "cytrus_resolution_factor";
pub const CPU_CLOCK: &str = "cytrus_cpu_clock";

/// One option: key, label, and its values with the default first.
pub struct CoreOption {
    pub key: &'static str,
    pub label: &'static str,
    pub values: &'static [&'static str],
}

impl CoreOption {
    /// `"Label; default|other|..."` as the legacy variables interface wants.
    pub fn definition(&self) -> String {
        format!("{}; {}", self.label, self.values.join("|"))
    }

    pub fn default_value(&self) -> &'static str {
        self.values[0]
    }
}

pub const CORE_OPTIONS: &[CoreOption] = &[
    CoreOption {
        key: REGION,
        label: "Region",
        values: &["Auto", "Japan", "USA", "Europe", "Australia", "China", "Korea", "Taiwan"],
    },
    CoreOption {
        key: MODEL,
        label: "Console model",
        values: &["New 3DS", "Old 3DS"],
    },
    CoreOption {
        key: AUDIO_EMULATION,
        label: "Audio emulation",
        values: &["HLE", "LLE"],
    },
    CoreOption {
        key: DIRECT_BOOT,
        label: "Direct Boot",
        values: &["enabled", "disabled"],
    },
    CoreOption {
        key: RENDERER,
        label: "Renderer (restart)",
        values: &["Software", "Vulkan"],
    },
    CoreOption {
        key: LAYOUT,
        label: "Screen layout",
        values: &["Default", "Single Screen", "Side by Side"],
    },
    CoreOption {
        key: SWAP_SCREENS,
        label: "Swap screens",
        values: &["disabled", "enabled"],
    },
    CoreOption {
        key: RESOLUTION_FACTOR,
        label: "Internal resolution",
        values: &["1x", "2x", "3x", "4x"],
    },
    CoreOption {
        key: CPU_CLOCK,
        label: "CPU clock",
        values: &["100%", "25%", "50%", "75%", "125%", "150%", "200%", "300%", "400%"],
    },
];

/// What an option pass changed that the caller has to react to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingsChange {
    /// Layout, swap or resolution factor differ; geometry must be resent.
    pub layout_changed: bool,
}

pub fn definitions() -> Vec<(&'static str, String)> {
    CORE_OPTIONS.iter().map(|o| (o.key, o.definition())).collect()
}

/// Apply one option value. Returns false for unknown keys or values.
pub fn apply_value(settings: &mut Settings, key: &str, value: &str) -> bool {
    match key {
        REGION => {
            let region = match value {
                "Auto" => Region::Auto,
                "Japan" => Region::Japan,
                "USA" => Region::Usa,
                "Europe" => Region::Europe,
                "Australia" => Region::Australia,
                "China" => Region::China,
                "Korea" => Region::Korea,
                "Taiwan" => Region::Taiwan,
                _ => return false,
            };
            settings.region = region;
        }
        MODEL => match value {
            "New 3DS" => settings.is_new_3ds = true,
            "Old 3DS" => settings.is_new_3ds = false,
            _ => return false,
        },
        AUDIO_EMULATION => match value {
            "HLE" => settings.audio_emulation = AudioEmulation::Hle,
            "LLE" => settings.audio_emulation = AudioEmulation::Lle,
            _ => return false,
        },
        DIRECT_BOOT => match value {
            "enabled" => settings.direct_boot = true,
            "disabled" => settings.direct_boot = false,
            _ => return false,
        },
        RENDERER => match value {
            "Software" => settings.graphics_api = GraphicsApi::Software,
            "Vulkan" => settings.graphics_api = GraphicsApi::Vulkan,
            _ => return false,
        },
        LAYOUT => match value {
            "Default" => settings.layout_option = LayoutOption::Default,
            "Single Screen" => settings.layout_option = LayoutOption::SingleScreen,
            "Side by Side" => settings.layout_option = LayoutOption::SideScreen,
            _ => return false,
        },
        SWAP_SCREENS => match value {
            "enabled" => settings.swap_screen = true,
            "disabled" => settings.swap_screen = false,
            _ => return false,
        },
        RESOLUTION_FACTOR => match parse_suffixed(value, 'x') {
            Some(factor) if (1..=MAX_RESOLUTION_FACTOR).contains(&factor) => settings.resolution_factor = factor,
            _ => return false,
        },
        CPU_CLOCK => match parse_suffixed(value, '%') {
            Some(percent) if percent > 0 => settings.cpu_clock_percentage = percent,
            _ => return false,
        },
        _ => return false,
    }
    true
}

fn parse_suffixed(value: &str, suffix: char) -> Option<u32> {
    value.strip_suffix(suffix)?.trim().parse().ok()
}

/// Pull every option through `lookup` and write the known values.
pub fn apply_with<F>(settings: &mut Settings, mut lookup: F) -> SettingsChange
where
    F: FnMut(&str) -> Option<String>,
{
    let before = (settings.layout_option, settings.swap_screen, settings.resolution_factor);
    for option in CORE_OPTIONS {
        if let Some(value) = lookup(option.key) {
            apply_value(settings, option.key, &value);
        }
    }
    let after = (settings.layout_option, settings.swap_screen, settings.resolution_factor);
    SettingsChange {
        layout_changed: before != after,
    }
}

/// Ask the host for the current value of every option it knows.
pub fn read_variables(env: &Environment) -> Vec<(&'static str, String)> {
    CORE_OPTIONS
        .iter()
        .filter_map(|option| env.variable(option.key).map(|value| (option.key, value)))
        .collect()
}

/// Write values fetched with [`read_variables`] into `settings`.
pub fn apply_variables(settings: &mut Settings, values: &[(&str, String)]) -> SettingsChange {
    apply_with(settings, |key| {
        values.iter().find(|(k, _)| *k == key).map(|(_, value)| value.clone())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_definitions_list_default_first() {
        let defs = definitions();
        assert_eq!(defs.len(), CORE_OPTIONS.len());
        let (key, def) = &defs[0];
        assert_eq!(*key, REGION);
        assert!(def.starts_with("Region; Auto|Japan"));
        let clock = CORE_OPTIONS.iter().find(|o| o.key == CPU_CLOCK).unwrap();
        assert_eq!(clock.default_value(), "100%");
    }

    #[test]
    fn test_every_listed_value_is_accepted() {
        for option in CORE_OPTIONS {
            for value in option.values {
                let mut settings = Settings::default();
                assert!(apply_value(&mut settings, option.key, value), "{} = {}", option.key, value);
            }
        }

        let mut settings = Settings::default();
        assert!(apply_value(&mut settings, DIRECT_BOOT, "disabled"));
        assert!(!settings.direct_boot);
        assert!(apply_value(&mut settings, DIRECT_BOOT, "enabled"));
        assert!(settings.direct_boot);
    }

    #[test]
    fn test_defaults_match_settings_defaults() {
        let mut settings = Settings::default();
        let change = apply_with(&mut settings, |key| {
            CORE_OPTIONS
                .iter()
                .find(|o| o.key == key)
                .map(|o| o.default_value().to_string())
        });
        assert!(!change.layout_changed);
        let defaults = Settings::default();
        assert_eq!(settings.region, defaults.region);
        assert_eq!(settings.is_new_3ds, defaults.is_new_3ds);
        assert_eq!(settings.resolution_factor, defaults.resolution_factor);
        assert_eq!(settings.cpu_clock_percentage, defaults.cpu_clock_percentage);
        assert_eq!(settings.direct_boot, defaults.direct_boot);
    }

    #[test]
    fn test_unknown_values_leave_setting_untouched() {
        let mut settings = Settings::default();
        assert!(!apply_value(&mut settings, RESOLUTION_FACTOR, "9x"));
        assert!(!apply_value(&mut settings, LAYOUT, "Diagonal"));
        assert!(!apply_value(&mut settings, "cytrus_unknown", "1"));
        assert_eq!(settings.resolution_factor, 1);
        assert_eq!(settings.layout_option, LayoutOption::Default);
    }

    #[test]
    fn test_layout_change_is_reported() {
        let values: HashMap<&str, &str> = [(LAYOUT, "Side by Side"), (CPU_CLOCK, "200%")].into();
        let mut settings = Settings::default();
        let change = apply_with(&mut settings, |key| values.get(key).map(|v| v.to_string()));
        assert!(change.layout_changed);
        assert_eq!(settings.layout_option, LayoutOption::SideScreen);
        assert_eq!(settings.cpu_clock_percentage, 200);

        let change = apply_with(&mut settings, |key| values.get(key).map(|v| v.to_string()));
        assert!(!change.layout_changed);
    }

    #[test]
    fn test_apply_variables_uses_fetched_values() {
        let values = vec![(REGION, "Japan".to_string()), (DIRECT_BOOT, "disabled".to_string())];
        let mut settings = Settings::default();
        let change = apply_variables(&mut settings, &values);
        assert!(!change.layout_changed);
        assert_eq!(settings.region, Region::Japan);
        assert!(!settings.direct_boot);
    }

    #[test]
    fn test_swap_and_factor_count_as_layout_changes() {
        let mut settings = Settings::default();
        let change = apply_with(&mut settings, |key| match key {
            RESOLUTION_FACTOR => Some("3x".into()),
            _ => None,
        });
        assert!(change.layout_changed);
        let change = apply_with(&mut settings, |key| (key == SWAP_SCREENS).then(|| "enabled".into()));
        assert!(change.layout_changed);
        assert!(settings.swap_screen);
    }
}
