//! Camera Tests - Frustum Corner Rays
//!
//! Tests for the camera module: corner ray geometry, quad ordering and
//! agreement with the projection matrix.

use glam::{Quat, Vec3};
use deferred_fog_engine::camera::{frustum_corner_rays, frustum_corners, Camera};

fn tilted_camera() -> Camera {
    Camera {
        position: Vec3::new(4.0, 12.0, -3.0),
        rotation: Quat::from_rotation_y(0.7) * Quat::from_rotation_x(-0.2),
        fov_y: 50.0,
        aspect: 1.5,
        near: 0.5,
        far: 400.0,
        ..Camera::default()
    }
}

// ============================================================================
// Corner Geometry
// ============================================================================

#[test]
fn test_corner_rays_end_on_far_plane() {
    let camera = tilted_camera();
    let corners = frustum_corners(&camera);

    for ray in corners.quad_order(true) {
        let depth = ray.dot(camera.forward());
        assert!((depth - camera.far).abs() < 0.05, "depth {depth}");
    }
}

#[test]
fn test_corner_rays_project_to_screen_corners() {
    let camera = tilted_camera();
    let corners = frustum_corners(&camera);
    let view_proj = camera.view_proj();

    let expected = [
        (corners.top_left, -1.0, 1.0),
        (corners.top_right, 1.0, 1.0),
        (corners.bottom_right, 1.0, -1.0),
        (corners.bottom_left, -1.0, -1.0),
    ];

    for (ray, x, y) in expected {
        let clip = view_proj * (camera.position + ray).extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!((ndc.x - x).abs() < 1e-3, "ndc {ndc:?}");
        assert!((ndc.y - y).abs() < 1e-3, "ndc {ndc:?}");
        assert!((ndc.z - 1.0).abs() < 1e-3, "ndc {ndc:?}");
    }
}

#[test]
fn test_corner_rays_follow_camera_rotation() {
    let facing_z = Camera::default();
    let turned = Camera {
        rotation: Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
        ..Camera::default()
    };

    let a = frustum_corners(&facing_z);
    let b = frustum_corners(&turned);
    let rotated = turned.rotation * a.top_left;
    assert!((rotated - b.top_left).length() < 1e-2);
}

#[test]
fn test_corner_rays_ignore_camera_position() {
    let a = Camera::default();
    let b = Camera {
        position: Vec3::new(-500.0, 30.0, 77.0),
        ..Camera::default()
    };
    assert_eq!(frustum_corners(&a), frustum_corners(&b));
}

// ============================================================================
// Quad Ordering
// ============================================================================

#[test]
fn test_quad_order_starts_top_left_when_uv_at_top() {
    let camera = tilted_camera();
    let corners = frustum_corners(&camera);
    let rays = frustum_corner_rays(&camera, true);

    assert_eq!(
        rays,
        [
            corners.top_left,
            corners.top_right,
            corners.bottom_right,
            corners.bottom_left
        ]
    );
}

#[test]
fn test_quad_order_inverts_vertically_when_uv_at_bottom() {
    let camera = tilted_camera();
    let top = frustum_corner_rays(&camera, true);
    let bottom = frustum_corner_rays(&camera, false);

    // Slot 0 <-> 3 and 1 <-> 2: same column, opposite row
    assert_eq!(bottom[0], top[3]);
    assert_eq!(bottom[1], top[2]);
    assert_eq!(bottom[2], top[1]);
    assert_eq!(bottom[3], top[0]);
}

// ============================================================================
// Depth Linearization
// ============================================================================

#[test]
fn test_linear_eye_depth_monotonic() {
    let camera = tilted_camera();
    let mut previous = camera.linear_eye_depth(0.0);
    for step in 1..=10 {
        let depth = camera.linear_eye_depth(step as f32 / 10.0);
        assert!(depth > previous);
        previous = depth;
    }
    assert!((previous - camera.far).abs() < 0.1);
}
