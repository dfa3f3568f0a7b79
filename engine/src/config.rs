//! Fog Scene Configuration
//!
//! JSON description of one fog scene: effect settings, global fog, an
//! optional skybox on disk, the camera and the output size. Used by the
//! `fog-demo` binary; hosts embedding the compositor usually build these
//! values from their own configuration instead.

use std::path::{Path, PathBuf};

use glam::Vec4;
use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::error::FogError;
use crate::render::{
    ColorSpace, FogSettings, GlobalFogState, LightingSettings, SkyboxMaterial, TextureHandle,
};

/// Skybox material whose cubemap is loaded from a folder of six PNG faces.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyboxConfig {
    /// Folder containing px.png, nx.png, py.png, ny.png, pz.png, nz.png
    pub folder: PathBuf,
    pub tint: Vec4,
    pub exposure: f32,
    /// Degrees around the vertical axis
    pub rotation: f32,
}

impl Default for SkyboxConfig {
    fn default() -> Self {
        let material = SkyboxMaterial::default();
        Self {
            folder: PathBuf::new(),
            tint: material.tint,
            exposure: material.exposure,
            rotation: material.rotation,
        }
    }
}

impl SkyboxConfig {
    /// The material for this skybox once its cubemap is (or failed to be) loaded.
    pub fn material(&self, cubemap: Option<TextureHandle>) -> SkyboxMaterial {
        SkyboxMaterial {
            cubemap,
            tint: self.tint,
            exposure: self.exposure,
            rotation: self.rotation,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FogSceneConfig {
    pub settings: FogSettings,
    pub fog: GlobalFogState,
    pub skybox: Option<SkyboxConfig>,
    pub camera: Camera,
    pub color_space: ColorSpace,
    pub width: u32,
    pub height: u32,
}

impl Default for FogSceneConfig {
    fn default() -> Self {
        Self {
            settings: FogSettings::default(),
            fog: GlobalFogState::linear(10.0, 200.0, Vec4::new(0.55, 0.45, 0.70, 1.0)),
            skybox: None,
            camera: Camera::default(),
            color_space: ColorSpace::Linear,
            width: 1280,
            height: 720,
        }
    }
}

impl FogSceneConfig {
    pub fn from_json_str(json: &str) -> Result<Self, FogError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, FogError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Lighting settings for this scene, with the skybox cubemap if one was loaded.
    pub fn lighting(&self, cubemap: Option<TextureHandle>) -> LightingSettings {
        LightingSettings {
            fog: self.fog,
            skybox: self.skybox.as_ref().map(|skybox| skybox.material(cubemap)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{FogMode, SkyboxMode};

    #[test]
    fn test_empty_json_is_default() {
        let config = FogSceneConfig::from_json_str("{}").unwrap();
        assert_eq!(config, FogSceneConfig::default());
    }

    #[test]
    fn test_partial_json() {
        let config = FogSceneConfig::from_json_str(
            r#"{
                "settings": { "skybox_mode": "ExcludeSkybox" },
                "fog": { "enabled": true, "mode": "Exponential", "density": 0.02 },
                "skybox": { "folder": "assets/sky", "rotation": 45.0 },
                "width": 640
            }"#,
        )
        .unwrap();

        assert!(config.settings.enabled);
        assert_eq!(config.settings.skybox_mode, SkyboxMode::ExcludeSkybox);
        assert_eq!(config.fog.mode, FogMode::Exponential);
        assert_eq!(config.fog.density, 0.02);
        assert_eq!(config.width, 640);
        assert_eq!(config.height, 720);

        let skybox = config.skybox.as_ref().unwrap();
        assert_eq!(skybox.folder, PathBuf::from("assets/sky"));
        assert_eq!(skybox.exposure, 1.0);
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let err = FogSceneConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, FogError::Config(_)));
    }

    #[test]
    fn test_lighting_without_cubemap_keeps_skybox_material() {
        let config = FogSceneConfig {
            skybox: Some(SkyboxConfig::default()),
            ..FogSceneConfig::default()
        };
        let lighting = config.lighting(None);
        let skybox = lighting.skybox.unwrap();
        assert_eq!(skybox.cubemap, None);
    }
}
