//! Deferred Fog Engine Library
//!
//! A screen-space fog compositing pass for deferred-shaded cameras, with an
//! optional fade into the skybox cubemap. The compositor records commands;
//! a wgpu backend replays them.
//!
//! # Modules
//!
//! - [`render`] - Fog compositor, shader parameters, command recording, wgpu pass
//! - [`camera`] - Camera parameters and frustum corner rays
//! - [`config`] - JSON scene configuration
//! - [`error`] - Error type for asset loading, config and command replay
//!
//! # Example
//!
//! ```ignore
//! use deferred_fog_engine::camera::Camera;
//! use deferred_fog_engine::render::*;
//!
//! let fog_pass = DeferredFogPass::new(&device, &queue, wgpu::TextureFormat::Rgba8Unorm);
//! let resources = PostProcessResources { deferred_fog: Some(fog_pass.shader_program()) };
//! let mut fog = DeferredFog::new(FogSettings::default());
//! let mut pool = ParameterBlockPool::new();
//! let mut commands = CommandBuffer::new();
//! commands.set_global_texture(ShaderProperty::CameraDepthTexture, depth);
//!
//! let mut ctx = RenderContext {
//!     camera: &camera,
//!     source: scene,
//!     destination: output,
//!     command: &mut commands,
//!     parameter_blocks: &mut pool,
//!     resources: &resources,
//!     lighting: &lighting,
//!     platform: PlatformInfo::default(),
//! };
//! if fog.is_enabled_and_supported(&ctx) {
//!     fog.render(&mut ctx);
//! }
//! fog_pass.execute(&device, &queue, &mut encoder, commands.commands(), &textures)?;
//! ```

pub mod camera;
pub mod config;
pub mod error;
pub mod render;

pub use camera::{Camera, RenderingPath};
pub use config::{FogSceneConfig, SkyboxConfig};
pub use error::FogError;
// Re-export the render module contents at crate level for convenience
pub use render::*;
