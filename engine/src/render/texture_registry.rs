//! Texture Registry
//!
//! Maps the opaque [`TextureHandle`]s used in recorded commands to live
//! wgpu texture views.

use std::collections::HashMap;

use super::commands::TextureHandle;
use crate::error::FogError;

#[derive(Debug, Default)]
pub struct TextureRegistry {
    views: HashMap<TextureHandle, wgpu::TextureView>,
    next_id: u64,
}

impl TextureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a view and return its new handle.
    pub fn insert(&mut self, view: wgpu::TextureView) -> TextureHandle {
        let handle = TextureHandle::new(self.next_id);
        self.next_id += 1;
        self.views.insert(handle, view);
        handle
    }

    pub fn get(&self, handle: TextureHandle) -> Option<&wgpu::TextureView> {
        self.views.get(&handle)
    }

    /// Like [`Self::get`], but an unknown handle is an error.
    pub fn resolve(&self, handle: TextureHandle) -> Result<&wgpu::TextureView, FogError> {
        self.get(handle).ok_or(FogError::UnknownTexture(handle))
    }
}
