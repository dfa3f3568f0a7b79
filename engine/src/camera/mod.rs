//! Camera Module
//!
//! The rendering camera as the fog pass sees it: projection parameters, an
//! orientation, and the rendering path the host actually used for it.
//! This module is window-system agnostic - it only deals with camera state and math.

pub mod frustum;

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

pub use frustum::{frustum_corners, frustum_corner_rays, FrustumCorners};

/// Rendering path a camera was actually drawn with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderingPath {
    /// Fog is evaluated inside the forward shaders already.
    Forward,
    #[default]
    DeferredShading,
}

/// Camera parameters for one frame.
///
/// Right-handed, looking down -Z at identity rotation (same convention as
/// `Mat4::look_at_rh`).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Camera {
    pub position: Vec3,
    pub rotation: Quat,
    /// Vertical field of view in degrees
    pub fov_y: f32,
    /// Width / height
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub rendering_path: RenderingPath,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 2.0, 8.0),
            rotation: Quat::IDENTITY,
            fov_y: 60.0,
            aspect: 16.0 / 9.0,
            near: 0.3,
            far: 1000.0,
            rendering_path: RenderingPath::DeferredShading,
        }
    }
}

impl Camera {
    /// Camera at `position` looking at `target` with world +Y as up.
    pub fn look_at(position: Vec3, target: Vec3) -> Self {
        let view = Mat4::look_at_rh(position, target, Vec3::Y);
        let (_, rotation, _) = view.inverse().to_scale_rotation_translation();
        Self {
            position,
            rotation: rotation.normalize(),
            ..Self::default()
        }
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position).inverse()
    }

    /// wgpu-style projection (depth 0 at near, 1 at far).
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Linear eye-space depth for a depth-buffer value of this camera's
    /// projection. Mirrors `linear_eye_depth` in deferred_fog.wgsl.
    ///
    /// Written around `1 - depth` so the far plane stays exact in f32.
    pub fn linear_eye_depth(&self, depth: f32) -> f32 {
        self.near * self.far / (self.near + (1.0 - depth) * (self.far - self.near))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    #[test]
    fn test_identity_basis() {
        let camera = Camera::default();
        assert!((camera.forward() - Vec3::NEG_Z).length() < EPSILON);
        assert!((camera.right() - Vec3::X).length() < EPSILON);
        assert!((camera.up() - Vec3::Y).length() < EPSILON);
    }

    #[test]
    fn test_look_at_points_forward_at_target() {
        let camera = Camera::look_at(Vec3::new(0.0, 0.0, 0.0), Vec3::new(10.0, 0.0, 0.0));
        assert!((camera.forward() - Vec3::X).length() < EPSILON);
        assert!((camera.up() - Vec3::Y).length() < EPSILON);
    }

    #[test]
    fn test_linear_eye_depth_endpoints() {
        let camera = Camera::default();
        assert!((camera.linear_eye_depth(0.0) - camera.near).abs() < EPSILON);
        assert!((camera.linear_eye_depth(1.0) - camera.far).abs() < 0.01);
    }

    #[test]
    fn test_linear_eye_depth_far_plane_precision() {
        for (near, far) in [(0.3, 1000.0), (0.01, 5000.0), (0.1, 100_000.0)] {
            let camera = Camera {
                near,
                far,
                ..Camera::default()
            };
            let at_far = camera.linear_eye_depth(1.0);
            assert!((at_far - far).abs() <= far * 1e-5, "near {near}, far {far}: {at_far}");
        }
    }

    #[test]
    fn test_projection_matches_linear_depth() {
        let camera = Camera::default();
        let point = camera.position + camera.forward() * 50.0;
        let clip = camera.view_proj() * point.extend(1.0);
        let depth = clip.z / clip.w;
        assert!((camera.linear_eye_depth(depth) - 50.0).abs() < 0.05);
    }
}
