//! Per-material GPU data
//!
//! Every material is drawn through the same shader; [`MaterialUniform`] tells
//! it which shading model to evaluate and with which parameters. Group 2 holds
//! that uniform together with the material map (or a white texel).

use crate::{
    gfx::resources::material::{Material, MaterialKind},
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

use super::texture_resource::TextureResource;

/// Shading model selector; MUST match the `SHADING_*` constants in the shader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadingModel {
    Normal = 0,
    Phong = 1,
    Standard = 2,
    Basic = 3,
    Lambert = 4,
}

impl ShadingModel {
    pub fn of(kind: &MaterialKind) -> Self {
        match kind {
            MaterialKind::Normal(_) => ShadingModel::Normal,
            MaterialKind::Phong(_) => ShadingModel::Phong,
            MaterialKind::Standard(_) => ShadingModel::Standard,
            MaterialKind::Basic(_) => ShadingModel::Basic,
            MaterialKind::Lambert(_) => ShadingModel::Lambert,
        }
    }
}

/// MUST match the `MaterialUniform` struct in the shader
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    /// rgb diffuse color, a opacity
    pub color: [f32; 4],
    /// rgb emissive color, w shading model
    pub emissive: [f32; 4],
    /// rgb specular color, w shininess
    pub specular: [f32; 4],
    /// metalness, roughness, has map, flat shading
    pub surface: [f32; 4],
    /// dithering, premultiplied alpha, transparent, unused
    pub flags: [f32; 4],
    pub uv_repeat: [f32; 4],
}

impl MaterialUniform {
    pub fn from_material(material: &Material) -> Self {
        let common = &material.common;
        let color = material.color().unwrap_or_default().to_array();
        let emissive = material.emissive().to_array();
        let (specular, shininess, metalness, roughness) = match &material.kind {
            MaterialKind::Phong(p) => (p.specular.to_array(), p.shininess, 0.0, 1.0),
            MaterialKind::Standard(p) => ([0.0; 3], 0.0, p.metalness, p.roughness),
            _ => ([0.0; 3], 0.0, 0.0, 1.0),
        };
        let map = material.map();
        let repeat = map.map_or([1.0, 1.0], |t| t.repeat);

        Self {
            color: [color[0], color[1], color[2], common.opacity],
            emissive: [
                emissive[0],
                emissive[1],
                emissive[2],
                ShadingModel::of(&material.kind) as u32 as f32,
            ],
            specular: [specular[0], specular[1], specular[2], shininess],
            surface: [
                metalness,
                roughness,
                flag(map.is_some()),
                flag(common.flat_shading),
            ],
            flags: [
                flag(common.dithering),
                flag(common.premultiplied_alpha),
                flag(common.transparent),
                0.0,
            ],
            uv_repeat: [repeat[0], repeat[1], 0.0, 0.0],
        }
    }
}

fn flag(value: bool) -> f32 {
    if value {
        1.0
    } else {
        0.0
    }
}

pub type MaterialUBO = UniformBuffer<MaterialUniform>;

/// Layout for group 2: uniform, map texture, map sampler
pub struct MaterialBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
}

impl MaterialBindings {
    pub fn new(device: &wgpu::Device) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::uniform())
            .next_binding_fragment(binding_types::texture_2d())
            .next_binding_fragment(binding_types::sampler(wgpu::SamplerBindingType::Filtering))
            .create(device, "Material Bind Group Layout");

        Self { bind_group_layout }
    }

    pub fn create_bind_group(
        &self,
        device: &wgpu::Device,
        ubo: &MaterialUBO,
        map: &TextureResource,
        label: &str,
    ) -> wgpu::BindGroup {
        BindGroupBuilder::new(&self.bind_group_layout)
            .resource(ubo.binding_resource())
            .texture(&map.view)
            .sampler(&map.sampler)
            .create(device, label)
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }
}
