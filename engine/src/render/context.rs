//! Per-call render context handed to post-process effects.

use bitflags::bitflags;

use super::color::ColorSpace;
use super::commands::{CommandRecorder, TextureHandle};
use super::fog_post::DeferredFogPass;
use super::fog_state::LightingSettings;
use super::parameters::{ParameterBlockPool, PostProcessResources};
use crate::camera::Camera;

bitflags! {
    /// Extra per-pixel camera buffers an effect needs rendered beforehand.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct DepthTextureMode: u8 {
        const DEPTH = 1 << 0;
        const DEPTH_NORMALS = 1 << 1;
        const MOTION_VECTORS = 1 << 2;
    }
}

/// Which render pipeline the host is running.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PipelineKind {
    /// Fixed forward/deferred pipeline with a dedicated fog pass slot.
    #[default]
    Builtin,
    /// User-scriptable pipeline that handles fog on its own.
    Scriptable,
}

/// Platform facts that affect how the pass is set up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlatformInfo {
    pub pipeline: PipelineKind,
    pub color_space: ColorSpace,
    /// Image V coordinate 0 is the top row. Must be
    /// [`DeferredFogPass::UV_STARTS_AT_TOP`] when replaying through the wgpu
    /// backend, whose quad vertex stage flips y unconditionally.
    pub uv_starts_at_top: bool,
}

impl Default for PlatformInfo {
    fn default() -> Self {
        Self {
            pipeline: PipelineKind::Builtin,
            color_space: ColorSpace::Linear,
            uv_starts_at_top: DeferredFogPass::UV_STARTS_AT_TOP,
        }
    }
}

/// Everything one effect call may read or record into. Borrowed for the
/// duration of the call only.
pub struct RenderContext<'a, R: CommandRecorder> {
    pub camera: &'a Camera,
    /// Image to read
    pub source: TextureHandle,
    /// Image to write
    pub destination: TextureHandle,
    pub command: &'a mut R,
    pub parameter_blocks: &'a mut ParameterBlockPool,
    pub resources: &'a PostProcessResources,
    pub lighting: &'a LightingSettings,
    pub platform: PlatformInfo,
}
