//! Command Recording
//!
//! The fog pass never talks to the GPU directly. It records commands into a
//! [`CommandRecorder`]; the host (or [`super::fog_post::DeferredFogPass`])
//! executes them later in the frame.

use super::parameters::{ShaderId, ShaderParameterBlock, ShaderProperty};
use super::quad::QuadVertex;

/// Opaque reference to a host texture (colour target, depth buffer, cubemap).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureHandle(u64);

impl TextureHandle {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(self) -> u64 {
        self.0
    }
}

/// What happens to a render target's contents when it is bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadAction {
    Load,
    Clear,
    /// Previous contents are irrelevant; the draw covers every pixel.
    DontCare,
}

/// What happens to a render target's contents after the draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreAction {
    Store,
    DontCare,
}

/// One recorded command. Parameter blocks are captured by value at record
/// time, so later edits to the pooled block do not affect recorded draws.
#[derive(Clone, Debug, PartialEq)]
pub enum RenderCommand {
    SetGlobalTexture {
        property: ShaderProperty,
        texture: TextureHandle,
    },
    SetRenderTarget {
        target: TextureHandle,
        load: LoadAction,
        store: StoreAction,
    },
    /// Indexed quad draw into the current render target.
    DrawMesh {
        vertices: [QuadVertex; 4],
        shader: ShaderId,
        pass: u32,
        properties: ShaderParameterBlock,
    },
    /// Full-screen triangle from `source` into `destination`.
    BlitFullscreenTriangle {
        source: TextureHandle,
        destination: TextureHandle,
        shader: ShaderId,
        pass: u32,
        properties: ShaderParameterBlock,
    },
}

/// Command stream the fog pass records into.
pub trait CommandRecorder {
    fn set_global_texture(&mut self, property: ShaderProperty, texture: TextureHandle);

    fn set_render_target(&mut self, target: TextureHandle, load: LoadAction, store: StoreAction);

    fn draw_mesh(
        &mut self,
        vertices: [QuadVertex; 4],
        shader: ShaderId,
        pass: u32,
        properties: &ShaderParameterBlock,
    );

    fn blit_fullscreen_triangle(
        &mut self,
        source: TextureHandle,
        destination: TextureHandle,
        shader: ShaderId,
        pass: u32,
        properties: &ShaderParameterBlock,
    );
}

/// A plain in-memory command list.
#[derive(Clone, Debug, Default)]
pub struct CommandBuffer {
    commands: Vec<RenderCommand>,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Remove all commands so the buffer can be reused next frame.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Number of draw or blit commands recorded.
    pub fn draw_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| {
                matches!(
                    c,
                    RenderCommand::DrawMesh { .. } | RenderCommand::BlitFullscreenTriangle { .. }
                )
            })
            .count()
    }
}

impl CommandRecorder for CommandBuffer {
    fn set_global_texture(&mut self, property: ShaderProperty, texture: TextureHandle) {
        self.commands
            .push(RenderCommand::SetGlobalTexture { property, texture });
    }

    fn set_render_target(&mut self, target: TextureHandle, load: LoadAction, store: StoreAction) {
        self.commands
            .push(RenderCommand::SetRenderTarget { target, load, store });
    }

    fn draw_mesh(
        &mut self,
        vertices: [QuadVertex; 4],
        shader: ShaderId,
        pass: u32,
        properties: &ShaderParameterBlock,
    ) {
        self.commands.push(RenderCommand::DrawMesh {
            vertices,
            shader,
            pass,
            properties: properties.clone(),
        });
    }

    fn blit_fullscreen_triangle(
        &mut self,
        source: TextureHandle,
        destination: TextureHandle,
        shader: ShaderId,
        pass: u32,
        properties: &ShaderParameterBlock,
    ) {
        self.commands.push(RenderCommand::BlitFullscreenTriangle {
            source,
            destination,
            shader,
            pass,
            properties: properties.clone(),
        });
    }
}
