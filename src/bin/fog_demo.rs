//! Deferred Fog Demo
//!
//! Run with: `cargo run --bin fog-demo -- [scene.json] [output.png]`
//!
//! Headless: builds a synthetic deferred frame (sky gradient over a ground
//! plane, with a matching depth buffer), runs the deferred fog compositor on
//! it and writes the fogged image to a PNG.
//!
//! Set `RUST_LOG=debug` to see the branch the compositor picks each frame.

use std::path::PathBuf;

use deferred_fog_engine::{
    Camera, CommandBuffer, CommandRecorder, DeferredFog, DeferredFogPass, FogError, FogOutcome,
    FogSceneConfig, ParameterBlockPool, PlatformInfo, PostProcessResources, RenderContext,
    ShaderProperty, SkyCubemap, TextureHandle, TextureRegistry,
};

const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth16Unorm;

/// Fraction of the image height above the horizon.
const HORIZON: f32 = 0.45;

// ============================================================================
// GPU SETUP
// ============================================================================

struct Gpu {
    device: wgpu::Device,
    queue: wgpu::Queue,
}

impl Gpu {
    fn new() -> Result<Self, FogError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::LowPower,
            compatible_surface: None,
            force_fallback_adapter: false,
        }))?;
        log::info!("[FogDemo] Adapter: {}", adapter.get_info().name);

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("Fog Demo Device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            memory_hints: wgpu::MemoryHints::Performance,
            ..Default::default()
        }))?;

        Ok(Self { device, queue })
    }

    fn texture(
        &self,
        label: &str,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
        usage: wgpu::TextureUsages,
    ) -> wgpu::Texture {
        self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage,
            view_formats: &[],
        })
    }

    fn upload(&self, texture: &wgpu::Texture, bytes_per_pixel: u32, data: &[u8]) {
        let size = texture.size();
        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(size.width * bytes_per_pixel),
                rows_per_image: Some(size.height),
            },
            size,
        );
    }
}

// ============================================================================
// SYNTHETIC FRAME
// ============================================================================

/// Sky gradient above the horizon, checkered ground below it.
fn scene_pixels(width: u32, height: u32) -> Vec<u8> {
    let horizon_row = (height as f32 * HORIZON) as u32;
    let mut pixels = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            let rgb = if y < horizon_row {
                let t = y as f32 / horizon_row.max(1) as f32;
                [
                    (40.0 + 120.0 * t) as u8,
                    (90.0 + 110.0 * t) as u8,
                    (200.0 + 40.0 * t) as u8,
                ]
            } else if ((x / 32) + (y / 32)) % 2 == 0 {
                [70, 110, 60]
            } else {
                [110, 150, 80]
            };
            pixels.extend_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
        }
    }
    pixels
}

/// Depth matching `scene_pixels`: far plane for the sky, ground distance
/// shrinking from the horizon towards the bottom edge.
fn depth_pixels(camera: &Camera, width: u32, height: u32) -> Vec<u8> {
    let horizon_row = (height as f32 * HORIZON) as u32;
    let ground_rows = (height - horizon_row).max(1) as f32;
    let horizon_distance = camera.far * 0.8;
    let nearest = camera.near * 4.0;

    let mut pixels = Vec::with_capacity((width * height * 2) as usize);
    for y in 0..height {
        let depth = if y < horizon_row {
            1.0
        } else {
            let t = (y - horizon_row) as f32 / ground_rows;
            // Perspective ground: distance falls off as 1 / t
            let distance = (nearest / t.max(nearest / horizon_distance)).min(horizon_distance);
            device_depth(camera, distance)
        };
        let value = (depth.clamp(0.0, 1.0) * u16::MAX as f32) as u16;
        for _ in 0..width {
            pixels.extend_from_slice(&value.to_le_bytes());
        }
    }
    pixels
}

/// Inverse of `Camera::linear_eye_depth`.
fn device_depth(camera: &Camera, distance: f32) -> f32 {
    (camera.far - camera.near * camera.far / distance) / (camera.far - camera.near)
}

// ============================================================================
// READBACK
// ============================================================================

fn read_back(gpu: &Gpu, texture: &wgpu::Texture) -> Result<Vec<u8>, FogError> {
    let size = texture.size();
    let unpadded_row = size.width * 4;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    let padded_row = unpadded_row.div_ceil(align) * align;

    let buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Fog Demo Readback"),
        size: (padded_row * size.height) as u64,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let mut encoder = gpu
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Fog Demo Readback Encoder"),
        });
    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: &buffer,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(padded_row),
                rows_per_image: Some(size.height),
            },
        },
        size,
    );
    gpu.queue.submit(std::iter::once(encoder.finish()));

    let slice = buffer.slice(..);
    let (tx, rx) = std::sync::mpsc::channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = tx.send(result);
    });
    if let Err(err) = gpu.device.poll(wgpu::PollType::Wait {
        submission_index: None,
        timeout: None,
    }) {
        log::warn!("[FogDemo] Device poll failed: {}", err);
    }
    rx.recv().map_err(|_| wgpu::BufferAsyncError)??;

    let mapped = slice.get_mapped_range();
    let mut pixels = Vec::with_capacity((unpadded_row * size.height) as usize);
    for row in mapped.chunks(padded_row as usize) {
        pixels.extend_from_slice(&row[..unpadded_row as usize]);
    }
    drop(mapped);
    buffer.unmap();

    Ok(pixels)
}

// ============================================================================
// MAIN
// ============================================================================

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run() {
        log::error!("[FogDemo] {}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<(), FogError> {
    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => {
            log::info!("[FogDemo] Loading scene {}", path);
            FogSceneConfig::load(&path)?
        }
        None => FogSceneConfig::default(),
    };
    let output_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("fog_demo.png"));

    let (width, height) = (config.width.max(1), config.height.max(1));
    let camera = Camera {
        aspect: width as f32 / height as f32,
        ..config.camera
    };

    let gpu = Gpu::new()?;
    let fog_pass = DeferredFogPass::new(&gpu.device, &gpu.queue, COLOR_FORMAT);
    let mut textures = TextureRegistry::new();

    // Camera buffers the host has already rendered
    let scene = gpu.texture(
        "Fog Demo Scene",
        width,
        height,
        COLOR_FORMAT,
        wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST | wgpu::TextureUsages::COPY_SRC,
    );
    gpu.upload(&scene, 4, &scene_pixels(width, height));

    let depth = gpu.texture(
        "Fog Demo Depth",
        width,
        height,
        DEPTH_FORMAT,
        wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
    );
    gpu.upload(&depth, 2, &depth_pixels(&camera, width, height));

    let output = gpu.texture(
        "Fog Demo Output",
        width,
        height,
        COLOR_FORMAT,
        wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC | wgpu::TextureUsages::COPY_DST,
    );

    let source = textures.insert(scene.create_view(&Default::default()));
    let depth_handle = textures.insert(depth.create_view(&Default::default()));
    let destination = textures.insert(output.create_view(&Default::default()));

    // A skybox that fails to load is not fatal: fog falls back to flat colour
    let cubemap: Option<TextureHandle> = match &config.skybox {
        Some(skybox) => match SkyCubemap::from_folder(&gpu.device, &gpu.queue, &skybox.folder) {
            Ok(cubemap) => Some(textures.insert(cubemap.cube_view.clone())),
            Err(err) => {
                log::warn!("[FogDemo] Skybox unavailable, using flat fog: {}", err);
                None
            }
        },
        None => None,
    };

    let lighting = config.lighting(cubemap);
    let resources = PostProcessResources {
        deferred_fog: Some(fog_pass.shader_program()),
    };
    let platform = PlatformInfo {
        color_space: config.color_space,
        ..PlatformInfo::default()
    };

    let mut fog = DeferredFog::new(config.settings);
    let mut pool = ParameterBlockPool::new();
    let mut commands = CommandBuffer::new();
    commands.set_global_texture(ShaderProperty::CameraDepthTexture, depth_handle);

    let mut ctx = RenderContext {
        camera: &camera,
        source,
        destination,
        command: &mut commands,
        parameter_blocks: &mut pool,
        resources: &resources,
        lighting: &lighting,
        platform,
    };

    let outcome = if fog.is_enabled_and_supported(&ctx) {
        fog.render(&mut ctx)
    } else {
        FogOutcome::Skipped
    };
    log::info!("[FogDemo] Fog outcome: {:?}", outcome);

    let mut encoder = gpu
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Fog Demo Encoder"),
        });

    if outcome == FogOutcome::Skipped {
        // Pass the scene through untouched
        encoder.copy_texture_to_texture(
            scene.as_image_copy(),
            output.as_image_copy(),
            scene.size(),
        );
    } else {
        let draws = fog_pass.execute(
            &gpu.device,
            &gpu.queue,
            &mut encoder,
            commands.commands(),
            &textures,
        )?;
        log::debug!("[FogDemo] Replayed {} commands, {} draws", commands.len(), draws);
    }
    gpu.queue.submit(std::iter::once(encoder.finish()));

    let pixels = read_back(&gpu, &output)?;
    image::save_buffer(
        &output_path,
        &pixels,
        width,
        height,
        image::ExtendedColorType::Rgba8,
    )?;
    log::info!("[FogDemo] Wrote {}", output_path.display());

    Ok(())
}
