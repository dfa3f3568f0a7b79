//! Fog Post-Process Pass Module
//!
//! wgpu backend for the deferred fog compositor. Replays the commands that
//! [`DeferredFog`](super::deferred_fog::DeferredFog) recorded:
//! - `SetGlobalTexture` / `SetRenderTarget` update replay state
//! - `DrawMesh` draws the frustum-ray quad (fade-to-skybox)
//! - `BlitFullscreenTriangle` draws a full-screen triangle (flat fog)
//!
//! # Usage
//!
//! ```rust,ignore
//! // Initialize
//! let fog_pass = DeferredFogPass::new(&device, &queue, surface_format);
//! let resources = PostProcessResources { deferred_fog: Some(fog_pass.shader_program()) };
//!
//! // Host binds the camera depth buffer before the fog pass
//! commands.set_global_texture(ShaderProperty::CameraDepthTexture, depth_handle);
//! fog.render(&mut ctx);
//!
//! // Replay into the frame's encoder
//! fog_pass.execute(&device, &queue, &mut encoder, commands.commands(), &textures)?;
//! ```
//!
//! The uniform and quad vertex buffers are shared by every draw of one pass
//! instance, so each instance supports one fog draw per queue submission.

use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};

use super::commands::{LoadAction, RenderCommand, StoreAction, TextureHandle};
use super::parameters::{ShaderId, ShaderParameterBlock, ShaderProgram, ShaderProperty};
use super::quad::{QuadVertex, QUAD_INDICES};
use super::sky_cubemap::SkyCubemap;
use super::texture_registry::TextureRegistry;
use crate::error::FogError;

/// GPU uniform buffer layout (must match WGSL struct FogUniforms)
/// Total size: 64 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct FogUniforms {
    pub fog_color: [f32; 4],       // 16 bytes (offset 0)
    pub fog_params: [f32; 4],      // 16 bytes (offset 16)
    pub z_buffer_params: [f32; 4], // 16 bytes (offset 32)
    pub fog_mode: u32,             // 4 bytes (offset 48)
    pub _pad: [u32; 3],            // 12 bytes (offset 52) - total 64
}

static_assertions::assert_eq_size!(FogUniforms, [u8; 64]);

impl FogUniforms {
    /// Pack a recorded parameter block. Missing vectors read as zero and no
    /// fog keyword means `fog_mode = 0` (scene passes through).
    pub fn from_parameters(block: &ShaderParameterBlock) -> Self {
        let vector = |p| block.vector(p).unwrap_or_default().to_array();
        Self {
            fog_color: vector(ShaderProperty::FogColor),
            fog_params: vector(ShaderProperty::FogParams),
            z_buffer_params: vector(ShaderProperty::ZBufferParams),
            fog_mode: block.keywords().next().map_or(0, |k| k.fog_mode_id()),
            _pad: [0; 3],
        }
    }
}

/// Fragment entry points, indexed by pass (= skybox mode).
const FRAGMENT_ENTRIES: [&str; 3] = ["fs_include_skybox", "fs_exclude_skybox", "fs_fade_to_skybox"];

const QUAD_ATTRIBUTES: [wgpu::VertexAttribute; 3] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2, 2 => Float32x3];

/// Geometry a fog draw is issued with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FogGeometry {
    FullscreenTriangle,
    RayQuad,
}

/// Target and attachment ops of one resolved draw.
struct DrawTarget {
    source: TextureHandle,
    destination: TextureHandle,
    load: LoadAction,
    store: StoreAction,
}

/// Deferred fog renderer.
/// Owns the six fog pipelines (two geometries x three skybox variants) and
/// every GPU resource they need; all created once in [`DeferredFogPass::new`].
pub struct DeferredFogPass {
    triangle_pipelines: [wgpu::RenderPipeline; 3],
    quad_pipelines: [wgpu::RenderPipeline; 3],
    bind_group_layout: wgpu::BindGroupLayout,
    uniform_buffer: wgpu::Buffer,
    quad_vertex_buffer: wgpu::Buffer,
    quad_index_buffer: wgpu::Buffer,
    sky_sampler: wgpu::Sampler,
    fallback_cubemap: SkyCubemap,
    program: ShaderProgram,
}

impl DeferredFogPass {
    /// UV convention the ray quad must be recorded with. wgpu images start at
    /// the top row and `vs_quad` flips y to match.
    pub const UV_STARTS_AT_TOP: bool = true;

    /// Create the fog pass for render targets of `target_format`.
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, target_format: wgpu::TextureFormat) -> Self {
        use wgpu::util::DeviceExt;

        let supported = target_format
            .guaranteed_format_features(device.features())
            .allowed_usages
            .contains(wgpu::TextureUsages::RENDER_ATTACHMENT);

        // Load shader
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Deferred Fog Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../../../shaders/deferred_fog.wgsl").into()),
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Deferred Fog Uniform Buffer"),
            size: std::mem::size_of::<FogUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let quad_vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Deferred Fog Quad Vertex Buffer"),
            size: (std::mem::size_of::<QuadVertex>() * 4) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let quad_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Deferred Fog Quad Index Buffer"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        let sky_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Deferred Fog Sky Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        // Bound whenever a draw carries no skybox cubemap
        let fallback_cubemap = SkyCubemap::solid(device, queue, [0, 0, 0, 255]);

        // Binding 0: FogUniforms
        // Binding 1: Scene color texture (textureLoad, no sampler)
        // Binding 2: Camera depth texture
        // Binding 3: Sky cubemap
        // Binding 4: Sky sampler
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Deferred Fog Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: false },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Depth,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::Cube,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 4,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Deferred Fog Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let triangle_pipelines = std::array::from_fn(|pass| {
            create_pipeline(
                device,
                &pipeline_layout,
                &shader,
                target_format,
                FogGeometry::FullscreenTriangle,
                FRAGMENT_ENTRIES[pass],
            )
        });
        let quad_pipelines = std::array::from_fn(|pass| {
            create_pipeline(
                device,
                &pipeline_layout,
                &shader,
                target_format,
                FogGeometry::RayQuad,
                FRAGMENT_ENTRIES[pass],
            )
        });

        log::info!(
            "[DeferredFogPass] Initialized for {:?} (supported: {})",
            target_format,
            supported
        );

        Self {
            triangle_pipelines,
            quad_pipelines,
            bind_group_layout,
            uniform_buffer,
            quad_vertex_buffer,
            quad_index_buffer,
            sky_sampler,
            fallback_cubemap,
            program: ShaderProgram::deferred_fog(supported),
        }
    }

    /// The shader program to expose through `PostProcessResources`.
    pub fn shader_program(&self) -> ShaderProgram {
        self.program
    }

    /// Replay recorded commands into `encoder`. Returns the number of fog
    /// draws issued.
    pub fn execute(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        commands: &[RenderCommand],
        textures: &TextureRegistry,
    ) -> Result<usize, FogError> {
        let mut globals: HashMap<ShaderProperty, TextureHandle> = HashMap::new();
        let mut render_target: Option<(TextureHandle, LoadAction, StoreAction)> = None;
        let mut draws = 0;

        for command in commands {
            match command {
                RenderCommand::SetGlobalTexture { property, texture } => {
                    globals.insert(*property, *texture);
                }
                RenderCommand::SetRenderTarget { target, load, store } => {
                    render_target = Some((*target, *load, *store));
                }
                RenderCommand::DrawMesh {
                    vertices,
                    shader,
                    pass,
                    properties,
                } => {
                    self.check_shader(*shader)?;
                    let (destination, load, store) =
                        render_target.ok_or(FogError::MissingRenderTarget)?;
                    let source = global(&globals, ShaderProperty::MainTex)?;
                    queue.write_buffer(&self.quad_vertex_buffer, 0, bytemuck::cast_slice(vertices));
                    let target = DrawTarget {
                        source,
                        destination,
                        load,
                        store,
                    };
                    self.draw(device, queue, encoder, textures, &globals, FogGeometry::RayQuad, target, *pass, properties)?;
                    draws += 1;
                }
                RenderCommand::BlitFullscreenTriangle {
                    source,
                    destination,
                    shader,
                    pass,
                    properties,
                } => {
                    self.check_shader(*shader)?;
                    let target = DrawTarget {
                        source: *source,
                        destination: *destination,
                        load: LoadAction::DontCare,
                        store: StoreAction::Store,
                    };
                    self.draw(device, queue, encoder, textures, &globals, FogGeometry::FullscreenTriangle, target, *pass, properties)?;
                    draws += 1;
                }
            }
        }

        if draws > 1 {
            log::warn!(
                "[DeferredFogPass] {} fog draws in one replay share one uniform buffer; only the last parameters survive",
                draws
            );
        }

        Ok(draws)
    }

    fn check_shader(&self, shader: ShaderId) -> Result<(), FogError> {
        if shader == self.program.id {
            Ok(())
        } else {
            Err(FogError::UnknownShader(shader))
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn draw(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        textures: &TextureRegistry,
        globals: &HashMap<ShaderProperty, TextureHandle>,
        geometry: FogGeometry,
        target: DrawTarget,
        pass: u32,
        properties: &ShaderParameterBlock,
    ) -> Result<(), FogError> {
        let pipelines = match geometry {
            FogGeometry::FullscreenTriangle => &self.triangle_pipelines,
            FogGeometry::RayQuad => &self.quad_pipelines,
        };
        let pipeline = pipelines
            .get(pass as usize)
            .ok_or(FogError::InvalidPass(pass))?;

        if target.source == target.destination {
            return Err(FogError::TargetAliasesSource(target.source));
        }

        let depth = global(globals, ShaderProperty::CameraDepthTexture)?;
        let scene_view = textures.resolve(target.source)?;
        let depth_view = textures.resolve(depth)?;
        let output_view = textures.resolve(target.destination)?;
        let cube_view = match properties.texture(ShaderProperty::SkyCubemap) {
            Some(cubemap) => textures.resolve(cubemap)?,
            None => &self.fallback_cubemap.cube_view,
        };

        let uniforms = FogUniforms::from_parameters(properties);
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Deferred Fog Bind Group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: self.uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(scene_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(depth_view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::TextureView(cube_view),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: wgpu::BindingResource::Sampler(&self.sky_sampler),
                },
            ],
        });

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Deferred Fog Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: output_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: load_op(target.load),
                    store: store_op(target.store),
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_pipeline(pipeline);
        render_pass.set_bind_group(0, &bind_group, &[]);
        match geometry {
            FogGeometry::FullscreenTriangle => {
                // Fullscreen triangle (3 vertices, no vertex buffer)
                render_pass.draw(0..3, 0..1);
            }
            FogGeometry::RayQuad => {
                render_pass.set_vertex_buffer(0, self.quad_vertex_buffer.slice(..));
                render_pass.set_index_buffer(self.quad_index_buffer.slice(..), wgpu::IndexFormat::Uint16);
                render_pass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..1);
            }
        }

        Ok(())
    }
}

fn global(
    globals: &HashMap<ShaderProperty, TextureHandle>,
    property: ShaderProperty,
) -> Result<TextureHandle, FogError> {
    globals
        .get(&property)
        .copied()
        .ok_or(FogError::MissingGlobalTexture(property))
}

fn load_op(load: LoadAction) -> wgpu::LoadOp<wgpu::Color> {
    match load {
        LoadAction::Load => wgpu::LoadOp::Load,
        // Every fog draw covers the whole target, clearing is the cheap "don't care"
        LoadAction::Clear | LoadAction::DontCare => wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
    }
}

fn store_op(store: StoreAction) -> wgpu::StoreOp {
    match store {
        StoreAction::Store => wgpu::StoreOp::Store,
        StoreAction::DontCare => wgpu::StoreOp::Discard,
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    target_format: wgpu::TextureFormat,
    geometry: FogGeometry,
    fragment_entry: &str,
) -> wgpu::RenderPipeline {
    let quad_layout = [wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<QuadVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &QUAD_ATTRIBUTES,
    }];
    let (vertex_entry, buffers): (&str, &[wgpu::VertexBufferLayout]) = match geometry {
        FogGeometry::FullscreenTriangle => ("vs_fullscreen", &[]),
        FogGeometry::RayQuad => ("vs_quad", &quad_layout),
    };

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&format!("Deferred Fog Pipeline ({vertex_entry}, {fragment_entry})")),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some(vertex_entry),
            buffers,
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(fragment_entry),
            targets: &[Some(wgpu::ColorTargetState {
                format: target_format,
                blend: None, // Fog output replaces the destination
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None, // Quad winding flips with the y-flip in vs_quad
            unclipped_depth: false,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
        },
        depth_stencil: None, // Post-process doesn't write depth
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::parameters::ShaderKeyword;
    use glam::Vec4;

    #[test]
    fn test_uniforms_from_parameters() {
        let mut block = ShaderParameterBlock::new();
        block.enable_keyword(ShaderKeyword::FogExp2);
        block.set_vector(ShaderProperty::FogColor, Vec4::new(0.1, 0.2, 0.3, 1.0));
        block.set_vector(ShaderProperty::FogParams, Vec4::new(0.05, 0.0, 300.0, -1.5));
        block.set_vector(ShaderProperty::ZBufferParams, Vec4::new(0.3, 1000.0, 0.0, 0.0));

        let uniforms = FogUniforms::from_parameters(&block);
        assert_eq!(uniforms.fog_color, [0.1, 0.2, 0.3, 1.0]);
        assert_eq!(uniforms.fog_params[3], -1.5);
        assert_eq!(uniforms.z_buffer_params[1], 1000.0);
        assert_eq!(uniforms.fog_mode, 3);
    }

    #[test]
    fn test_empty_block_disables_fog() {
        let uniforms = FogUniforms::from_parameters(&ShaderParameterBlock::new());
        assert_eq!(uniforms.fog_mode, 0);
        assert_eq!(uniforms.fog_color, [0.0; 4]);
    }

    #[test]
    fn test_one_fragment_entry_per_skybox_mode() {
        use crate::render::SkyboxMode;
        assert_eq!(FRAGMENT_ENTRIES[SkyboxMode::IncludeSkybox.pass_index() as usize], "fs_include_skybox");
        assert_eq!(FRAGMENT_ENTRIES[SkyboxMode::ExcludeSkybox.pass_index() as usize], "fs_exclude_skybox");
        assert_eq!(FRAGMENT_ENTRIES[SkyboxMode::FadeToSkybox.pass_index() as usize], "fs_fade_to_skybox");
    }

    #[test]
    fn test_attachment_ops() {
        assert!(matches!(load_op(LoadAction::Load), wgpu::LoadOp::Load));
        assert!(matches!(load_op(LoadAction::DontCare), wgpu::LoadOp::Clear(_)));
        assert!(matches!(store_op(StoreAction::DontCare), wgpu::StoreOp::Discard));
    }
}
