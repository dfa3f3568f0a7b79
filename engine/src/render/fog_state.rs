//! Global Fog State
//!
//! Scene-wide fog as configured in the host's lighting settings. The fog
//! compositor only reads this each frame; it never owns or mutates it.

use glam::Vec4;
use serde::{Deserialize, Serialize};

use super::parameters::ShaderKeyword;
use super::skybox::SkyboxMaterial;

/// Fog attenuation formula.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FogMode {
    /// Fog grows linearly between the start and end distances.
    Linear,
    /// `e^(-density * distance)`
    Exponential,
    /// `e^(-(density * distance)^2)`
    #[default]
    ExponentialSquared,
}

impl FogMode {
    /// The shader keyword that selects this formula.
    pub fn keyword(self) -> ShaderKeyword {
        match self {
            FogMode::Linear => ShaderKeyword::FogLinear,
            FogMode::Exponential => ShaderKeyword::FogExp,
            FogMode::ExponentialSquared => ShaderKeyword::FogExp2,
        }
    }

    /// Fraction of the scene colour that survives the fog at `distance`
    /// (1.0 = no fog, 0.0 = fully fogged). Mirrors the WGSL `fog_factor`.
    pub fn attenuation(self, density: f32, start: f32, end: f32, distance: f32) -> f32 {
        let factor = match self {
            FogMode::Linear => {
                let range = end - start;
                if range.abs() <= f32::EPSILON {
                    if distance < end { 1.0 } else { 0.0 }
                } else {
                    (end - distance) / range
                }
            }
            FogMode::Exponential => (-density * distance).exp(),
            FogMode::ExponentialSquared => {
                let d = density * distance;
                (-d * d).exp()
            }
        };
        factor.clamp(0.0, 1.0)
    }
}

/// Ambient fog settings read from the host's lighting configuration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalFogState {
    /// Global fog toggle
    pub enabled: bool,
    pub mode: FogMode,
    /// Density for the exponential modes
    pub density: f32,
    /// Linear fog start distance (meters)
    pub start_distance: f32,
    /// Linear fog end distance (meters)
    pub end_distance: f32,
    /// Fog colour (RGBA, as authored)
    pub color: Vec4,
}

impl Default for GlobalFogState {
    fn default() -> Self {
        Self {
            enabled: false,
            mode: FogMode::ExponentialSquared,
            density: 0.01,
            start_distance: 0.0,
            end_distance: 300.0,
            color: Vec4::new(0.5, 0.5, 0.5, 1.0),
        }
    }
}

impl GlobalFogState {
    /// Enabled linear fog between `start` and `end`.
    pub fn linear(start: f32, end: f32, color: Vec4) -> Self {
        Self {
            enabled: true,
            mode: FogMode::Linear,
            start_distance: start,
            end_distance: end,
            color,
            ..Self::default()
        }
    }

    /// Enabled exponential fog.
    pub fn exponential(density: f32, color: Vec4) -> Self {
        Self {
            enabled: true,
            mode: FogMode::Exponential,
            density,
            color,
            ..Self::default()
        }
    }

    /// Enabled exponential-squared fog.
    pub fn exponential_squared(density: f32, color: Vec4) -> Self {
        Self {
            enabled: true,
            mode: FogMode::ExponentialSquared,
            density,
            color,
            ..Self::default()
        }
    }

    /// Attenuation at `distance` using this state's mode and parameters.
    pub fn attenuation(&self, distance: f32) -> f32 {
        self.mode
            .attenuation(self.density, self.start_distance, self.end_distance, distance)
    }
}

/// The slice of the host's lighting settings the fog pass reads.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LightingSettings {
    pub fog: GlobalFogState,
    /// Active skybox material, if the scene has one
    pub skybox: Option<SkyboxMaterial>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_per_mode() {
        assert_eq!(FogMode::Linear.keyword(), ShaderKeyword::FogLinear);
        assert_eq!(FogMode::Exponential.keyword(), ShaderKeyword::FogExp);
        assert_eq!(FogMode::ExponentialSquared.keyword(), ShaderKeyword::FogExp2);
    }

    #[test]
    fn test_linear_attenuation() {
        let mode = FogMode::Linear;
        assert_eq!(mode.attenuation(0.0, 10.0, 110.0, 0.0), 1.0);
        assert!((mode.attenuation(0.0, 10.0, 110.0, 60.0) - 0.5).abs() < 1e-6);
        assert_eq!(mode.attenuation(0.0, 10.0, 110.0, 500.0), 0.0);
    }

    #[test]
    fn test_linear_attenuation_degenerate_range() {
        assert_eq!(FogMode::Linear.attenuation(0.0, 50.0, 50.0, 10.0), 1.0);
        assert_eq!(FogMode::Linear.attenuation(0.0, 50.0, 50.0, 60.0), 0.0);
    }

    #[test]
    fn test_exponential_modes() {
        let exp = FogMode::Exponential.attenuation(0.1, 0.0, 0.0, 10.0);
        assert!((exp - (-1.0f32).exp()).abs() < 1e-6);

        let exp2 = FogMode::ExponentialSquared.attenuation(0.1, 0.0, 0.0, 20.0);
        assert!((exp2 - (-4.0f32).exp()).abs() < 1e-6);

        // Squared falls off slower up close, faster far away
        let near_exp = FogMode::Exponential.attenuation(0.1, 0.0, 0.0, 5.0);
        let near_exp2 = FogMode::ExponentialSquared.attenuation(0.1, 0.0, 0.0, 5.0);
        assert!(near_exp2 > near_exp);
    }

    #[test]
    fn test_default_state_is_disabled() {
        let state = GlobalFogState::default();
        assert!(!state.enabled);
        assert_eq!(state.mode, FogMode::ExponentialSquared);
    }
}
