//! Skybox material as seen by the fog pass.

use glam::Vec4;

use super::commands::TextureHandle;

/// A cubemap skybox material. The fog pass only needs its cubemap, tint,
/// exposure and rotation to fade fog into the sky.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkyboxMaterial {
    /// Cubemap texture; `None` when the material has no usable cubemap
    pub cubemap: Option<TextureHandle>,
    /// Tint colour (RGBA, sRGB-authored)
    pub tint: Vec4,
    pub exposure: f32,
    /// Rotation around the vertical axis in degrees
    pub rotation: f32,
}

impl Default for SkyboxMaterial {
    fn default() -> Self {
        Self {
            cubemap: None,
            tint: Vec4::new(0.5, 0.5, 0.5, 0.5),
            exposure: 1.0,
            rotation: 0.0,
        }
    }
}

impl SkyboxMaterial {
    /// Material sampling `cubemap` with default tint, exposure and rotation.
    pub fn with_cubemap(cubemap: TextureHandle) -> Self {
        Self {
            cubemap: Some(cubemap),
            ..Self::default()
        }
    }

    /// Rotation in radians, negated: the fade samples the cubemap with the
    /// inverse of the skybox's own rotation.
    pub fn fade_rotation(&self) -> f32 {
        -self.rotation.to_radians()
    }
}
