//! Sky Cubemap - 6-face cubemap texture the fog pass fades into
//!
//! Either loaded from six PNG faces on disk or created as a solid colour
//! (used as the placeholder binding when a draw has no skybox).

use std::path::Path;

use crate::error::FogError;

/// Face file names in wgpu cube layer order (+X, -X, +Y, -Y, +Z, -Z).
pub const FACE_NAMES: [&str; 6] = ["px.png", "nx.png", "py.png", "ny.png", "pz.png", "nz.png"];

/// Holds a cubemap texture (6 faces) and its cube view.
pub struct SkyCubemap {
    pub texture: wgpu::Texture,
    pub cube_view: wgpu::TextureView,
    pub size: u32,
}

impl SkyCubemap {
    /// Load a cubemap from 6 PNG face files in a directory.
    ///
    /// Expects files named: px.png, nx.png, py.png, ny.png, pz.png, nz.png.
    /// All faces must be square and the same size.
    pub fn from_folder(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        folder: impl AsRef<Path>,
    ) -> Result<Self, FogError> {
        let folder = folder.as_ref();
        let faces = FACE_NAMES
            .iter()
            .map(|name| load_face(&folder.join(name)))
            .collect::<Result<Vec<_>, _>>()?;

        let size = faces[0].width();
        for (name, face) in FACE_NAMES.iter().zip(&faces) {
            if face.width() != size || face.height() != size {
                return Err(FogError::CubemapFaceSize {
                    path: folder.join(name),
                    width: face.width(),
                    height: face.height(),
                    expected: size,
                });
            }
        }

        let label = format!("fog_cubemap_{}", folder.display());
        let texture = create_cube_texture(device, &label, size);
        for (i, face) in faces.iter().enumerate() {
            write_face(queue, &texture, i as u32, size, face.as_raw());
        }

        log::info!(
            "[SkyCubemap] Loaded {} (6 faces, {}x{})",
            folder.display(),
            size,
            size
        );

        Ok(Self::from_texture(texture, &label, size))
    }

    /// A 1x1 cubemap filled with one RGBA8 colour.
    pub fn solid(device: &wgpu::Device, queue: &wgpu::Queue, rgba: [u8; 4]) -> Self {
        let label = "fog_cubemap_solid";
        let texture = create_cube_texture(device, label, 1);
        for layer in 0..6 {
            write_face(queue, &texture, layer, 1, &rgba);
        }
        Self::from_texture(texture, label, 1)
    }

    fn from_texture(texture: wgpu::Texture, label: &str, size: u32) -> Self {
        let cube_view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some(&format!("{label}_cube_view")),
            dimension: Some(wgpu::TextureViewDimension::Cube),
            array_layer_count: Some(6),
            ..Default::default()
        });
        Self {
            texture,
            cube_view,
            size,
        }
    }
}

fn load_face(path: &Path) -> Result<image::RgbaImage, FogError> {
    image::open(path)
        .map(|img| img.to_rgba8())
        .map_err(|source| FogError::CubemapFace {
            path: path.to_path_buf(),
            source,
        })
}

fn create_cube_texture(device: &wgpu::Device, label: &str, size: u32) -> wgpu::Texture {
    device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: size,
            height: size,
            depth_or_array_layers: 6,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    })
}

fn write_face(queue: &wgpu::Queue, texture: &wgpu::Texture, layer: u32, size: u32, data: &[u8]) {
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d {
                x: 0,
                y: 0,
                z: layer, // Array layer = cubemap face
            },
            aspect: wgpu::TextureAspect::All,
        },
        data,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * size),
            rows_per_image: Some(size),
        },
        wgpu::Extent3d {
            width: size,
            height: size,
            depth_or_array_layers: 1,
        },
    );
}
