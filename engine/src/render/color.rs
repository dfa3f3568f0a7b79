//! Colour space helpers.

use glam::Vec4;
use serde::{Deserialize, Serialize};

/// Colour space the host pipeline does its lighting math in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorSpace {
    /// Colours are used as authored (display-gamma encoded).
    Gamma,
    #[default]
    Linear,
}

/// Convert one sRGB-encoded channel to linear.
#[inline]
pub fn gamma_to_linear(value: f32) -> f32 {
    if value <= 0.04045 {
        value / 12.92
    } else {
        ((value + 0.055) / 1.055).powf(2.4)
    }
}

/// Convert an sRGB-encoded RGBA colour to linear. Alpha is not a colour
/// channel and passes through unchanged.
pub fn color_to_linear(color: Vec4) -> Vec4 {
    Vec4::new(
        gamma_to_linear(color.x),
        gamma_to_linear(color.y),
        gamma_to_linear(color.z),
        color.w,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_are_fixed() {
        assert_eq!(gamma_to_linear(0.0), 0.0);
        assert!((gamma_to_linear(1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_mid_grey() {
        // sRGB 0.5 is roughly 21.4% linear
        assert!((gamma_to_linear(0.5) - 0.214_041).abs() < 1e-4);
    }

    #[test]
    fn test_toe_is_linear_segment() {
        assert!((gamma_to_linear(0.04) - 0.04 / 12.92).abs() < 1e-7);
    }

    #[test]
    fn test_alpha_untouched() {
        let c = color_to_linear(Vec4::new(0.5, 0.5, 0.5, 0.5));
        assert_eq!(c.w, 0.5);
        assert!(c.x < 0.5);
    }
}
