//! Deferred Fog Compositor
//!
//! Screen-space fog for cameras rendered with deferred shading. Forward
//! shading bakes fog into its own shaders, so this pass only runs for
//! deferred cameras on the builtin pipeline.
//!
//! Each frame the compositor:
//! - checks whether fog can run at all ([`DeferredFog::is_enabled_and_supported`])
//! - selects one fog keyword from the global falloff mode
//! - packs flat fog parameters, or fade-to-skybox parameters when the
//!   skybox has a cubemap
//! - records a single full-screen composite from source to destination
//!
//! # Usage
//!
//! ```rust,ignore
//! let mut fog = DeferredFog::new(FogSettings::default());
//!
//! // Each frame, per camera
//! if fog.is_enabled_and_supported(&ctx) {
//!     fog.render(&mut ctx);
//! }
//! ```

use glam::Vec4;

use super::color::{color_to_linear, ColorSpace};
use super::commands::{CommandRecorder, LoadAction, StoreAction};
use super::context::{DepthTextureMode, PipelineKind, RenderContext};
use super::fog_settings::{FogSettings, SkyboxMode};
use super::parameters::{ShaderParameterBlock, ShaderProperty};
use super::quad::FullscreenQuad;
use crate::camera::{frustum_corner_rays, Camera, RenderingPath};
use crate::render::fog_state::GlobalFogState;
use crate::render::skybox::SkyboxMaterial;

/// Which parameter set was written for this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FogBranch {
    /// Constant fog colour from the global fog state
    Flat,
    /// Fog colour sampled from the skybox cubemap along each view ray
    FadeToSkybox,
}

/// Result of one [`DeferredFog::render`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FogOutcome {
    /// Nothing was recorded this frame.
    Skipped,
    Flat,
    FadeToSkybox,
}

impl From<FogBranch> for FogOutcome {
    fn from(branch: FogBranch) -> Self {
        match branch {
            FogBranch::Flat => FogOutcome::Flat,
            FogBranch::FadeToSkybox => FogOutcome::FadeToSkybox,
        }
    }
}

/// Deferred fog compositor. Holds its settings and the ray quad used by the
/// fade-to-skybox draw; one instance per camera.
#[derive(Clone, Debug, Default)]
pub struct DeferredFog {
    settings: FogSettings,
    quad: FullscreenQuad,
}

impl DeferredFog {
    pub fn new(settings: FogSettings) -> Self {
        Self {
            settings,
            quad: FullscreenQuad::new(),
        }
    }

    pub fn settings(&self) -> &FogSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut FogSettings {
        &mut self.settings
    }

    pub fn set_settings(&mut self, settings: FogSettings) {
        self.settings = settings;
    }

    /// The ray quad as last written by a fade-to-skybox frame.
    pub fn quad(&self) -> &FullscreenQuad {
        &self.quad
    }

    /// Camera buffers this pass reads. The host must render them first.
    pub fn camera_flags(&self) -> DepthTextureMode {
        DepthTextureMode::DEPTH
    }

    /// Whether the fog pass should run for this camera this frame.
    ///
    /// Pure: any unmet prerequisite simply returns `false`.
    pub fn is_enabled_and_supported<R: CommandRecorder>(&self, ctx: &RenderContext<'_, R>) -> bool {
        self.settings.enabled
            && ctx.lighting.fog.enabled
            && ctx.platform.pipeline == PipelineKind::Builtin
            && ctx.resources.deferred_fog.is_some_and(|shader| shader.supported)
            && ctx.camera.rendering_path == RenderingPath::DeferredShading
    }

    /// Write this frame's fog parameters into the pooled parameter block.
    ///
    /// Returns `None` without touching anything when the deferred fog shader
    /// is not available.
    pub fn update_shader_parameters<R: CommandRecorder>(
        &mut self,
        ctx: &mut RenderContext<'_, R>,
    ) -> Option<FogBranch> {
        let Some(shader) = ctx.resources.deferred_fog else {
            log::debug!("[DeferredFog] No deferred fog shader, skipping parameters");
            return None;
        };

        let fog = &ctx.lighting.fog;
        let block = ctx.parameter_blocks.get(shader.id);
        block.clear();
        block.enable_keyword(fog.mode.keyword());
        block.set_vector(ShaderProperty::ZBufferParams, z_buffer_params(ctx.camera));

        let fade_skybox = match (self.settings.skybox_mode, ctx.lighting.skybox.as_ref()) {
            (SkyboxMode::FadeToSkybox, Some(skybox)) if skybox.cubemap.is_some() => Some(skybox),
            _ => None,
        };

        let branch = match fade_skybox {
            Some(skybox) => {
                write_fade_parameters(block, fog, skybox);
                self.quad.set_rays(frustum_corner_rays(
                    ctx.camera,
                    ctx.platform.uv_starts_at_top,
                ));
                FogBranch::FadeToSkybox
            }
            None => {
                write_flat_parameters(block, fog, ctx.platform.color_space);
                FogBranch::Flat
            }
        };

        log::debug!(
            "[DeferredFog] {:?} fog, keyword {}",
            branch,
            fog.mode.keyword().as_str()
        );
        Some(branch)
    }

    /// Record the composite draw for a branch prepared by
    /// [`Self::update_shader_parameters`].
    pub fn submit<R: CommandRecorder>(
        &self,
        ctx: &mut RenderContext<'_, R>,
        branch: FogBranch,
    ) -> FogOutcome {
        let Some(shader) = ctx.resources.deferred_fog else {
            return FogOutcome::Skipped;
        };
        let pass = self.pass_index(branch);
        let block = ctx.parameter_blocks.get(shader.id);

        match branch {
            FogBranch::FadeToSkybox => {
                let cmd = &mut *ctx.command;
                cmd.set_global_texture(ShaderProperty::MainTex, ctx.source);
                cmd.set_render_target(ctx.destination, LoadAction::DontCare, StoreAction::Store);
                cmd.draw_mesh(self.quad.vertices(), shader.id, pass, block);
            }
            FogBranch::Flat => {
                ctx.command.blit_fullscreen_triangle(
                    ctx.source,
                    ctx.destination,
                    shader.id,
                    pass,
                    block,
                );
            }
        }

        branch.into()
    }

    /// Compute parameters and record the composite in one call.
    pub fn render<R: CommandRecorder>(&mut self, ctx: &mut RenderContext<'_, R>) -> FogOutcome {
        match self.update_shader_parameters(ctx) {
            Some(branch) => self.submit(ctx, branch),
            None => FogOutcome::Skipped,
        }
    }

    /// Shader pass for a branch. A fade-to-skybox mode that fell back to
    /// flat fog has no cubemap to fade into and uses the include-skybox pass.
    pub fn pass_index(&self, branch: FogBranch) -> u32 {
        match (branch, self.settings.skybox_mode) {
            // The fade pass reads per-pixel rays, which only the ray quad carries
            (FogBranch::Flat, SkyboxMode::FadeToSkybox) => SkyboxMode::IncludeSkybox.pass_index(),
            (_, mode) => mode.pass_index(),
        }
    }
}

fn z_buffer_params(camera: &Camera) -> Vec4 {
    Vec4::new(camera.near, camera.far, 0.0, 0.0)
}

fn write_fade_parameters(
    block: &mut ShaderParameterBlock,
    fog: &GlobalFogState,
    skybox: &SkyboxMaterial,
) {
    let tint = color_to_linear(skybox.tint);
    block.set_vector(
        ShaderProperty::FogColor,
        Vec4::new(tint.x, tint.y, tint.z, skybox.exposure),
    );
    block.set_vector(
        ShaderProperty::FogParams,
        Vec4::new(
            fog.density,
            fog.start_distance,
            fog.end_distance,
            skybox.fade_rotation(),
        ),
    );
    if let Some(cubemap) = skybox.cubemap {
        block.set_texture(ShaderProperty::SkyCubemap, cubemap);
    }
}

fn write_flat_parameters(
    block: &mut ShaderParameterBlock,
    fog: &GlobalFogState,
    color_space: ColorSpace,
) {
    let color = match color_space {
        ColorSpace::Linear => color_to_linear(fog.color),
        ColorSpace::Gamma => fog.color,
    };
    block.set_vector(ShaderProperty::FogColor, color);
    block.set_vector(
        ShaderProperty::FogParams,
        Vec4::new(fog.density, fog.start_distance, fog.end_distance, 0.0),
    );
}
