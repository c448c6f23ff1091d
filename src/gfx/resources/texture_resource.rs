//! Texture resource management for wgpu
//!
//! Provides utilities for creating GPU textures, views, and samplers: the
//! depth buffer, the spot light shadow map, and uploads of material maps.

use image::{imageops, imageops::FilterType, RgbaImage};

use super::texture::{Texture, TextureImage, Wrapping};

/// GPU texture resource containing texture, view, and sampler
#[derive(Clone)]
pub struct TextureResource {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

/// Identity of an uploaded map: one image sampled with one wrapping pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureKey {
    pub image: u32,
    pub wrap_s: Wrapping,
    pub wrap_t: Wrapping,
}

impl From<&Texture> for TextureKey {
    fn from(texture: &Texture) -> Self {
        Self {
            image: texture.image.id(),
            wrap_s: texture.wrap_s,
            wrap_t: texture.wrap_t,
        }
    }
}

impl TextureResource {
    /// Standard depth buffer format used throughout the engine
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Format of uploaded material maps
    pub const MAP_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

    /// Creates a depth texture matching the surface configuration
    pub fn create_depth_texture(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: config.width.max(1),
            height: config.height.max(1),
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Depth target rendered from the light, read back with a comparison sampler
    pub fn create_shadow_map(device: &wgpu::Device, size: [u32; 2]) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Shadow Map"),
            size: wgpu::Extent3d {
                width: size[0].max(1),
                height: size[1].max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Shadow Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            compare: Some(wgpu::CompareFunction::LessEqual),
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Uploads a material map with its full mip chain
    ///
    /// The sampler uses the texture's wrapping on both axes, so a map tiled
    /// many times over a large surface stays stable at grazing angles.
    pub fn from_texture(device: &wgpu::Device, queue: &wgpu::Queue, texture: &Texture) -> Self {
        let image = &texture.image;
        let max_dimension = device.limits().max_texture_dimension_2d;
        let levels = fit_mip_chain(mip_chain(image), max_dimension);
        let (width, height) = levels[0].dimensions();
        if (width, height) != (image.width, image.height) {
            log::warn!(
                "Texture '{}' is {}x{}; uploading from the {}x{} mip level",
                image.label,
                image.width,
                image.height,
                width,
                height
            );
        }

        let gpu_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(&image.label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: levels.len() as u32,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::MAP_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for (mip_level, level) in levels.iter().enumerate() {
            let (width, height) = level.dimensions();
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &gpu_texture,
                    mip_level: mip_level as u32,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                level.as_raw(),
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * width),
                    rows_per_image: Some(height),
                },
                wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
            );
        }

        let view = gpu_texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{} Sampler", image.label)),
            address_mode_u: texture.wrap_s.address_mode(),
            address_mode_v: texture.wrap_t.address_mode(),
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            anisotropy_clamp: 1,
            ..Default::default()
        });

        Self {
            texture: gpu_texture,
            view,
            sampler,
        }
    }
}

/// Base level followed by successively halved levels down to 1x1
pub fn mip_chain(image: &TextureImage) -> Vec<RgbaImage> {
    let base = RgbaImage::from_raw(image.width, image.height, image.rgba.clone())
        .filter(|base| base.width() > 0 && base.height() > 0);
    let Some(base) = base else {
        log::warn!(
            "Texture '{}' has {} bytes for {}x{}; using a white texel",
            image.label,
            image.rgba.len(),
            image.width,
            image.height
        );
        return vec![RgbaImage::from_pixel(1, 1, image::Rgba([255; 4]))];
    };

    let mut levels = vec![base];
    loop {
        let (width, height) = levels[levels.len() - 1].dimensions();
        if width == 1 && height == 1 {
            break;
        }
        let next = imageops::resize(
            &levels[levels.len() - 1],
            (width / 2).max(1),
            (height / 2).max(1),
            FilterType::Triangle,
        );
        levels.push(next);
    }
    levels
}

/// Drops leading mip levels wider or taller than `max_dimension`
///
/// The 1x1 level always fits, so the result is never empty.
pub fn fit_mip_chain(mut levels: Vec<RgbaImage>, max_dimension: u32) -> Vec<RgbaImage> {
    let first_fitting = levels
        .iter()
        .position(|level| level.width() <= max_dimension && level.height() <= max_dimension)
        .unwrap_or(levels.len().saturating_sub(1));
    levels.drain(..first_fitting);
    levels
}

/// `size` with each side limited to `1..=max_dimension`
pub fn clamp_extent(size: [u32; 2], max_dimension: u32) -> [u32; 2] {
    let max_dimension = max_dimension.max(1);
    [size[0].clamp(1, max_dimension), size[1].clamp(1, max_dimension)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mip_chain_halves_to_one_texel() {
        let image = TextureImage::new("checker", 8, 2, vec![128; 8 * 2 * 4]);
        let sizes: Vec<_> = mip_chain(&image).iter().map(|l| l.dimensions()).collect();
        assert_eq!(sizes, vec![(8, 2), (4, 1), (2, 1), (1, 1)]);
    }

    #[test]
    fn test_oversized_levels_are_dropped() {
        let image = TextureImage::new("wide", 16, 4, vec![255; 16 * 4 * 4]);
        let levels = fit_mip_chain(mip_chain(&image), 4);
        let sizes: Vec<_> = levels.iter().map(|l| l.dimensions()).collect();
        assert_eq!(sizes, vec![(4, 1), (2, 1), (1, 1)]);

        let untouched = fit_mip_chain(mip_chain(&image), 4096);
        assert_eq!(untouched[0].dimensions(), (16, 4));
    }

    #[test]
    fn test_clamp_extent_to_device_limit() {
        assert_eq!(clamp_extent([8192, 2048], 4096), [4096, 2048]);
        assert_eq!(clamp_extent([0, 512], 4096), [1, 512]);
    }

    #[test]
    fn test_single_texel_has_one_level() {
        let texture = Texture::white();
        assert_eq!(mip_chain(&texture.image).len(), 1);
    }

    #[test]
    fn test_texture_key_separates_wrapping() {
        let clamped = Texture::white();
        let tiled = clamped.clone().with_repeat(4.0, 4.0);
        assert_eq!(TextureKey::from(&clamped).image, TextureKey::from(&tiled).image);
        assert_ne!(TextureKey::from(&clamped), TextureKey::from(&tiled));
    }
}
