//! Full-screen ray quad used by the fade-to-skybox draw.
//!
//! Four clip-space corners, each carrying a UV and a view ray towards the
//! matching far-plane frustum corner. The fragment stage interpolates the
//! ray to get a per-pixel direction for cubemap sampling.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

/// Vertex layout of the ray quad (must match `QuadInput` in deferred_fog.wgsl)
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 3], // 12 bytes (offset 0)
    pub uv: [f32; 2],       // 8 bytes (offset 12)
    pub ray: [f32; 3],      // 12 bytes (offset 20) - total 32
}

static_assertions::assert_eq_size!(QuadVertex, [u8; 32]);

/// Triangle-list indices of the two quad triangles.
pub const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

/// The owned quad. Positions and UVs never change; rays are rewritten each
/// frame from the camera frustum.
#[derive(Clone, Debug, PartialEq)]
pub struct FullscreenQuad {
    positions: [Vec3; 4],
    uvs: [Vec2; 4],
    rays: [Vec3; 4],
}

impl Default for FullscreenQuad {
    fn default() -> Self {
        Self::new()
    }
}

impl FullscreenQuad {
    pub fn new() -> Self {
        Self {
            positions: [
                Vec3::new(-1.0, -1.0, 0.0),
                Vec3::new(1.0, -1.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(-1.0, 1.0, 0.0),
            ],
            uvs: [
                Vec2::new(0.0, 0.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(1.0, 1.0),
                Vec2::new(0.0, 1.0),
            ],
            rays: [Vec3::ZERO; 4],
        }
    }

    pub fn set_rays(&mut self, rays: [Vec3; 4]) {
        self.rays = rays;
    }

    pub fn rays(&self) -> [Vec3; 4] {
        self.rays
    }

    /// Interleaved vertex data for upload.
    pub fn vertices(&self) -> [QuadVertex; 4] {
        std::array::from_fn(|i| QuadVertex {
            position: self.positions[i].to_array(),
            uv: self.uvs[i].to_array(),
            ray: self.rays[i].to_array(),
        })
    }
}
