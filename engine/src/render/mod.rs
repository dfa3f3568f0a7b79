//! Render Module
//!
//! The deferred fog compositor and its wgpu backend.
//!
//! - [`deferred_fog`] - capability check, parameter computation, command recording
//! - [`fog_post`] - replays recorded fog commands with wgpu
//! - [`parameters`], [`commands`], [`context`] - the host-facing data the
//!   compositor reads and writes

pub mod color;
pub mod commands;
pub mod context;
pub mod deferred_fog;
pub mod fog_post;
pub mod fog_settings;
pub mod fog_state;
pub mod parameters;
pub mod quad;
pub mod sky_cubemap;
pub mod skybox;
pub mod texture_registry;

// Re-export commonly used types for convenience
pub use color::{color_to_linear, gamma_to_linear, ColorSpace};
pub use commands::{
    CommandBuffer, CommandRecorder, LoadAction, RenderCommand, StoreAction, TextureHandle,
};
pub use context::{DepthTextureMode, PipelineKind, PlatformInfo, RenderContext};
pub use deferred_fog::{DeferredFog, FogBranch, FogOutcome};
pub use fog_post::{DeferredFogPass, FogUniforms};
pub use fog_settings::{FogSettings, PropertyDescriptor, SkyboxMode};
pub use fog_state::{FogMode, GlobalFogState, LightingSettings};
pub use parameters::{
    ParameterBlockPool, PostProcessResources, ShaderId, ShaderKeyword, ShaderParameterBlock,
    ShaderProgram, ShaderProperty,
};
pub use quad::{FullscreenQuad, QuadVertex, QUAD_INDICES};
pub use sky_cubemap::SkyCubemap;
pub use skybox::SkyboxMaterial;
pub use texture_registry::TextureRegistry;
