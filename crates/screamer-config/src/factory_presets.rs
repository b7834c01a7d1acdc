//! Built-in presets.
//!
//! Each preset is a complete [`EngineConfig`] document embedded at compile
//! time. They are read-only.

use crate::engine_config::EngineConfig;
use crate::error::{ConfigError, Result};

/// A named built-in setting.
#[derive(Debug, Clone, Copy)]
pub struct FactoryPreset {
    /// Lookup name.
    pub name: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// TOML source.
    pub toml: &'static str,
}

impl FactoryPreset {
    /// Parse the embedded document.
    pub fn config(&self) -> Result<EngineConfig> {
        EngineConfig::from_toml_str(self.toml)
    }
}

/// All factory presets in display order.
pub static FACTORY_PRESETS: &[FactoryPreset] = &[
    FactoryPreset {
        name: "classic",
        description: "Low drive, centred tone: the mid-hump boost",
        toml: r#"
[params]
drive = 2.0
tone = 5.0
level = 7.0
"#,
    },
    FactoryPreset {
        name: "edge",
        description: "Pushed drive with a brighter top",
        toml: r#"
[params]
drive = 7.0
tone = 6.5
level = 5.5

[engine]
oversampling = "high"
"#,
    },
    FactoryPreset {
        name: "dark",
        description: "Full drive, treble rolled off, one extra reverse diode",
        toml: r#"
[params]
drive = 10.0
tone = 1.5
level = 5.0

[engine]
oversampling = "high"
diodes = { forward = 1, reverse = 2 }
"#,
    },
    FactoryPreset {
        name: "transparent",
        description: "Minimum drive for a clean boost with smoothed knob moves",
        toml: r#"
[params]
drive = 0.0
tone = 6.0
level = 10.0

[engine]
ramp_parameters = true
"#,
    },
];

/// Names of all factory presets.
pub fn factory_preset_names() -> impl Iterator<Item = &'static str> {
    FACTORY_PRESETS.iter().map(|p| p.name)
}

/// Look up a factory preset (case-insensitive).
pub fn factory_preset(name: &str) -> Result<&'static FactoryPreset> {
    FACTORY_PRESETS
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| ConfigError::PresetNotFound(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_preset_parses() {
        for preset in FACTORY_PRESETS {
            let config = preset.config();
            assert!(config.is_ok(), "{}: {:?}", preset.name, config.err());
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(factory_preset("Dark").unwrap().name, "dark");
        assert!(matches!(
            factory_preset("fuzz"),
            Err(ConfigError::PresetNotFound(name)) if name == "fuzz"
        ));
    }

    #[test]
    fn classic_matches_defaults() {
        let classic = factory_preset("classic").unwrap().config().unwrap();
        assert_eq!(classic, EngineConfig::default());
    }

    #[test]
    fn names_unique() {
        let names: Vec<_> = factory_preset_names().collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), names.len());
    }
}
