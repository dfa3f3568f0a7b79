//! Fog Effect Settings
//!
//! The per-profile switch for the deferred fog pass. The fog itself (falloff,
//! density, distances, colour) comes from the global [`GlobalFogState`]; this
//! only decides whether the pass runs and how it treats the skybox.
//!
//! [`GlobalFogState`]: super::fog_state::GlobalFogState

use serde::{Deserialize, Serialize};

/// How the fog pass interacts with skybox pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkyboxMode {
    /// Fog is applied over the skybox like any other far surface.
    IncludeSkybox,
    /// Skybox pixels are left untouched.
    ExcludeSkybox,
    /// Fog colour is sampled from the skybox cubemap along each view ray.
    #[default]
    FadeToSkybox,
}

impl SkyboxMode {
    /// Shader pass index of the variant that handles this mode.
    pub fn pass_index(self) -> u32 {
        self as u32
    }
}

/// Deferred fog settings owned by an effect profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FogSettings {
    /// Enables the deferred fog pass
    pub enabled: bool,
    /// Skybox interaction
    pub skybox_mode: SkyboxMode,
}

impl Default for FogSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            skybox_mode: SkyboxMode::FadeToSkybox,
        }
    }
}

impl FogSettings {
    /// Settings for plain distance fog that leaves the sky alone.
    pub fn flat() -> Self {
        Self {
            enabled: true,
            skybox_mode: SkyboxMode::ExcludeSkybox,
        }
    }

    /// Settings with the pass switched off.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Editable fields with their labels and tooltips, in display order.
    pub fn properties() -> &'static [PropertyDescriptor] {
        &FOG_SETTINGS_PROPERTIES
    }
}

/// Describes one editable field of [`FogSettings`] for whatever UI layer
/// the host uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PropertyDescriptor {
    /// Serialized field name
    pub name: &'static str,
    pub label: &'static str,
    pub tooltip: &'static str,
}

const FOG_SETTINGS_PROPERTIES: [PropertyDescriptor; 2] = [
    PropertyDescriptor {
        name: "enabled",
        label: "Enabled",
        tooltip: "Enables the internal deferred fog pass. Actual fog settings should be set in the lighting settings.",
    },
    PropertyDescriptor {
        name: "skybox_mode",
        label: "Skybox Mode",
        tooltip: "Whether the fog covers the skybox, ignores it, or fades into it.",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = FogSettings::default();
        assert!(settings.enabled);
        assert_eq!(settings.skybox_mode, SkyboxMode::FadeToSkybox);
    }

    #[test]
    fn test_pass_indices_follow_declaration_order() {
        assert_eq!(SkyboxMode::IncludeSkybox.pass_index(), 0);
        assert_eq!(SkyboxMode::ExcludeSkybox.pass_index(), 1);
        assert_eq!(SkyboxMode::FadeToSkybox.pass_index(), 2);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let settings: FogSettings = serde_json::from_str(r#"{ "enabled": false }"#).unwrap();
        assert!(!settings.enabled);
        assert_eq!(settings.skybox_mode, SkyboxMode::FadeToSkybox);
    }

    #[test]
    fn test_property_names_match_serialized_fields() {
        let json = serde_json::to_value(FogSettings::default()).unwrap();
        for property in FogSettings::properties() {
            assert!(json.get(property.name).is_some(), "no field {}", property.name);
        }
    }
}
