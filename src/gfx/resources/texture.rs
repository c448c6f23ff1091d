//! CPU-side textures
//!
//! A [`Texture`] is a cheap handle: the decoded pixels are shared behind an
//! `Arc`, while sampling state (wrapping, repeat) is per handle so the same
//! image can be tiled differently by different materials.

use std::{
    path::Path,
    sync::{
        atomic::{AtomicU32, Ordering},
        Arc,
    },
};

use crate::error::AssetError;

static NEXT_IMAGE_ID: AtomicU32 = AtomicU32::new(1);

/// Decoded RGBA8 pixels
#[derive(Debug)]
pub struct TextureImage {
    id: u32,
    pub label: String,
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TextureImage {
    pub fn new(label: &str, width: u32, height: u32, rgba: Vec<u8>) -> Self {
        debug_assert_eq!(rgba.len(), (width * height * 4) as usize);
        Self {
            id: NEXT_IMAGE_ID.fetch_add(1, Ordering::Relaxed),
            label: label.to_string(),
            width,
            height,
            rgba,
        }
    }

    /// Unique id used by the renderer to cache GPU uploads
    pub fn id(&self) -> u32 {
        self.id
    }
}

/// Texture coordinate wrapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Wrapping {
    #[default]
    ClampToEdge,
    Repeat,
    MirroredRepeat,
}

impl Wrapping {
    pub fn address_mode(self) -> wgpu::AddressMode {
        match self {
            Wrapping::ClampToEdge => wgpu::AddressMode::ClampToEdge,
            Wrapping::Repeat => wgpu::AddressMode::Repeat,
            Wrapping::MirroredRepeat => wgpu::AddressMode::MirrorRepeat,
        }
    }
}

/// Image plus sampling parameters
#[derive(Debug, Clone)]
pub struct Texture {
    pub image: Arc<TextureImage>,
    pub wrap_s: Wrapping,
    pub wrap_t: Wrapping,
    pub repeat: [f32; 2],
}

impl Texture {
    pub fn new(image: TextureImage) -> Self {
        Self {
            image: Arc::new(image),
            wrap_s: Wrapping::default(),
            wrap_t: Wrapping::default(),
            repeat: [1.0, 1.0],
        }
    }

    /// Tiles the texture `u` by `v` times with repeat wrapping on both axes
    pub fn with_repeat(mut self, u: f32, v: f32) -> Self {
        self.wrap_s = Wrapping::Repeat;
        self.wrap_t = Wrapping::Repeat;
        self.repeat = [u, v];
        self
    }

    /// Single white texel, bound when a material has no map
    pub fn white() -> Self {
        Self::new(TextureImage::new("white", 1, 1, vec![255; 4]))
    }
}

/// Loads textures from disk
#[derive(Debug, Default)]
pub struct TextureLoader;

impl TextureLoader {
    pub fn new() -> Self {
        Self
    }

    /// Reads and decodes the image at `path` into an RGBA8 texture
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Texture, AssetError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let decoded = image::load_from_memory(&bytes).map_err(|source| AssetError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();

        log::info!("Loaded texture '{}' ({}x{})", path.display(), width, height);
        Ok(Texture::new(TextureImage::new(
            &path.display().to_string(),
            width,
            height,
            rgba.into_raw(),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_reports_io_error() {
        let err = TextureLoader::new()
            .load("definitely/not/here.jpg")
            .unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
    }

    #[test]
    fn test_repeat_shares_image() {
        let base = Texture::white();
        let tiled = base.clone().with_repeat(80.0, 80.0);
        assert_eq!(tiled.wrap_s, Wrapping::Repeat);
        assert_eq!(tiled.wrap_t, Wrapping::Repeat);
        assert_eq!(tiled.repeat, [80.0, 80.0]);
        assert_eq!(base.image.id(), tiled.image.id());
        assert_eq!(base.wrap_s, Wrapping::ClampToEdge);
    }
}
