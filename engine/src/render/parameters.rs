//! Shader Parameters
//!
//! The uniform data the fog pass hands to the shading stage: keyword flags
//! that pick the attenuation formula, vector properties, and texture
//! bindings. A [`ParameterBlockPool`] keeps one reusable block per shader
//! program so nothing is reallocated frame to frame.

use std::collections::{BTreeSet, HashMap};

use glam::Vec4;

use super::commands::TextureHandle;

/// Stable identifier of a compiled shader program.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShaderId(u64);

impl ShaderId {
    /// Id derived from the program name (FNV-1a).
    pub const fn of(name: &str) -> Self {
        let bytes = name.as_bytes();
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        let mut i = 0;
        while i < bytes.len() {
            hash ^= bytes[i] as u64;
            hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
            i += 1;
        }
        Self(hash)
    }
}

/// A precompiled shader program resolved from the host's resources.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShaderProgram {
    pub id: ShaderId,
    pub name: &'static str,
    /// Whether the current hardware can run it
    pub supported: bool,
}

impl ShaderProgram {
    pub const DEFERRED_FOG: &'static str = "deferred_fog";

    pub fn new(name: &'static str, supported: bool) -> Self {
        Self {
            id: ShaderId::of(name),
            name,
            supported,
        }
    }

    /// The deferred fog program with the given support status.
    pub fn deferred_fog(supported: bool) -> Self {
        Self::new(Self::DEFERRED_FOG, supported)
    }
}

/// Shader resources the post-process stack resolves up front. Any of them
/// may be missing; users must check before dereferencing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PostProcessResources {
    pub deferred_fog: Option<ShaderProgram>,
}

/// Named shader properties used by the fog pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShaderProperty {
    /// Source colour image
    MainTex,
    /// Camera depth buffer, set globally by the host
    CameraDepthTexture,
    /// rgb = fog colour, w = alpha or skybox exposure
    FogColor,
    /// (density, start, end, -skybox rotation in radians)
    FogParams,
    /// (near, far, 0, 0) of the rendering camera
    ZBufferParams,
    SkyCubemap,
}

/// Shader variant flags. Exactly one fog keyword is enabled per draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShaderKeyword {
    FogLinear,
    FogExp,
    FogExp2,
}

impl ShaderKeyword {
    pub fn as_str(self) -> &'static str {
        match self {
            ShaderKeyword::FogLinear => "FOG_LINEAR",
            ShaderKeyword::FogExp => "FOG_EXP",
            ShaderKeyword::FogExp2 => "FOG_EXP2",
        }
    }

    /// Value of the `fog_mode` uniform selecting this formula in WGSL.
    pub fn fog_mode_id(self) -> u32 {
        match self {
            ShaderKeyword::FogLinear => 1,
            ShaderKeyword::FogExp => 2,
            ShaderKeyword::FogExp2 => 3,
        }
    }
}

/// Keyword flags plus vector and texture properties for one draw.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShaderParameterBlock {
    keywords: BTreeSet<ShaderKeyword>,
    vectors: HashMap<ShaderProperty, Vec4>,
    textures: HashMap<ShaderProperty, TextureHandle>,
}

impl ShaderParameterBlock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enable_keyword(&mut self, keyword: ShaderKeyword) {
        self.keywords.insert(keyword);
    }

    pub fn is_keyword_enabled(&self, keyword: ShaderKeyword) -> bool {
        self.keywords.contains(&keyword)
    }

    /// Enabled keywords in a stable order.
    pub fn keywords(&self) -> impl Iterator<Item = ShaderKeyword> + '_ {
        self.keywords.iter().copied()
    }

    pub fn set_vector(&mut self, property: ShaderProperty, value: Vec4) {
        self.vectors.insert(property, value);
    }

    pub fn vector(&self, property: ShaderProperty) -> Option<Vec4> {
        self.vectors.get(&property).copied()
    }

    pub fn set_texture(&mut self, property: ShaderProperty, texture: TextureHandle) {
        self.textures.insert(property, texture);
    }

    pub fn texture(&self, property: ShaderProperty) -> Option<TextureHandle> {
        self.textures.get(&property).copied()
    }

    pub fn has_textures(&self) -> bool {
        !self.textures.is_empty()
    }

    /// Drop all keywords and properties, keeping the allocations.
    pub fn clear(&mut self) {
        self.keywords.clear();
        self.vectors.clear();
        self.textures.clear();
    }
}

/// Reusable parameter blocks keyed by shader program.
#[derive(Debug, Default)]
pub struct ParameterBlockPool {
    blocks: HashMap<ShaderId, ShaderParameterBlock>,
}

impl ParameterBlockPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// The block for `shader`, created empty on first request.
    pub fn get(&mut self, shader: ShaderId) -> &mut ShaderParameterBlock {
        self.blocks.entry(shader).or_default()
    }

    /// Read-only view of a block that has already been requested.
    pub fn peek(&self, shader: ShaderId) -> Option<&ShaderParameterBlock> {
        self.blocks.get(&shader)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
