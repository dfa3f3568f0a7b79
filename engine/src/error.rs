//! Error type for the fallible host-integration paths.
//!
//! Normal "fog is unavailable this frame" outcomes are not errors; they are
//! reported through [`crate::render::FogOutcome`] and the capability check.
//! `FogError` covers loading assets from disk, reading configuration, and
//! replaying recorded commands against a texture registry.

use std::path::PathBuf;

use thiserror::Error;

use crate::render::{ShaderId, ShaderProperty, TextureHandle};

#[derive(Debug, Error)]
pub enum FogError {
    /// A cubemap face image could not be opened or decoded.
    #[error("failed to load cubemap face {}: {source}", .path.display())]
    CubemapFace {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Cubemap faces must be square and all the same size.
    #[error("cubemap face {} is {width}x{height}, expected {expected}x{expected}", .path.display())]
    CubemapFaceSize {
        path: PathBuf,
        width: u32,
        height: u32,
        expected: u32,
    },

    /// A recorded command referenced a texture the registry does not know.
    #[error("unknown texture handle {0:?}")]
    UnknownTexture(TextureHandle),

    /// A draw needed a global texture that was never set in the command stream.
    #[error("global texture {0:?} was not set before the fog draw")]
    MissingGlobalTexture(ShaderProperty),

    /// A mesh draw was recorded before any render target was bound.
    #[error("mesh draw recorded without a render target")]
    MissingRenderTarget,

    /// The fog pass reads the source image, so it cannot also write to it.
    #[error("fog pass cannot read and write the same texture {0:?}")]
    TargetAliasesSource(TextureHandle),

    /// A command was recorded for a shader this backend does not own.
    #[error("command targets shader {0:?}, which is not the deferred fog shader")]
    UnknownShader(ShaderId),

    /// Pass index outside the three fog variants.
    #[error("invalid fog pass index {0}")]
    InvalidPass(u32),

    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to create GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("failed to map readback buffer: {0}")]
    Readback(#[from] wgpu::BufferAsyncError),

    #[error("failed to write image: {0}")]
    Image(#[from] image::ImageError),

    #[error("invalid fog config: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
