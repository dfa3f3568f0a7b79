//! Frustum Corner Rays
//!
//! Directions from the camera towards the four corners of the far clip
//! plane, in world-space orientation (relative to the camera position).
//! Interpolating them across a full-screen quad gives a per-pixel view ray.

use glam::Vec3;

use super::Camera;

/// The four far-plane corner rays of a camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrustumCorners {
    pub top_left: Vec3,
    pub top_right: Vec3,
    pub bottom_right: Vec3,
    pub bottom_left: Vec3,
}

impl FrustumCorners {
    /// Corners in quad vertex order.
    ///
    /// The quad's first vertex sits at clip-space (-1, -1). When image UVs
    /// start at the top, that vertex lands on the top row of the destination,
    /// so the slot order starts at the top-left corner; otherwise it starts
    /// at the bottom-left.
    pub fn quad_order(&self, uv_starts_at_top: bool) -> [Vec3; 4] {
        if uv_starts_at_top {
            [self.top_left, self.top_right, self.bottom_right, self.bottom_left]
        } else {
            [self.bottom_left, self.bottom_right, self.top_right, self.top_left]
        }
    }
}

/// Far-plane corner rays for `camera`.
///
/// Corners are built on the near plane from the field of view and aspect,
/// then every ray is rescaled to the length the top-left corner ray has at
/// the far plane.
pub fn frustum_corners(camera: &Camera) -> FrustumCorners {
    let near = camera.near;
    let far = camera.far;

    let tan_half_fov = (camera.fov_y.to_radians() * 0.5).tan();
    let to_right = camera.right() * near * tan_half_fov * camera.aspect;
    let to_top = camera.up() * near * tan_half_fov;

    let origin = camera.forward() * near;
    let top_left = origin - to_right + to_top;
    let top_right = origin + to_right + to_top;
    let bottom_right = origin + to_right - to_top;
    let bottom_left = origin - to_right - to_top;

    let scale = top_left.length() * far / near;

    FrustumCorners {
        top_left: top_left.normalize() * scale,
        top_right: top_right.normalize() * scale,
        bottom_right: bottom_right.normalize() * scale,
        bottom_left: bottom_left.normalize() * scale,
    }
}

/// Far-plane corner rays in quad vertex order for the given UV convention.
pub fn frustum_corner_rays(camera: &Camera, uv_starts_at_top: bool) -> [Vec3; 4] {
    frustum_corners(camera).quad_order(uv_starts_at_top)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera {
            fov_y: 90.0,
            aspect: 1.0,
            near: 1.0,
            far: 100.0,
            ..Camera::default()
        }
    }

    #[test]
    fn test_corners_reach_far_plane() {
        let cam = camera();
        let corners = frustum_corners(&cam);
        // 90 degree square frustum: corner at far plane is (±100, ±100, -100)
        assert!((corners.top_left - Vec3::new(-100.0, 100.0, -100.0)).length() < 1e-2);
        assert!((corners.bottom_right - Vec3::new(100.0, -100.0, -100.0)).length() < 1e-2);
    }

    #[test]
    fn test_all_rays_same_length() {
        let cam = Camera {
            aspect: 1.6,
            ..camera()
        };
        let c = frustum_corners(&cam);
        let len = c.top_left.length();
        for ray in [c.top_right, c.bottom_right, c.bottom_left] {
            assert!((ray.length() - len).abs() < 1e-3);
        }
    }
}
