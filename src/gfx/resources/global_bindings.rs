//! Global uniform bindings for camera and scene lighting
//!
//! Manages the uniform buffer and bind group shared by every draw in a frame.
//! It is bound to slot 0 in both the shadow and the main pipelines.

use crate::{
    gfx::{camera::camera_utils::CameraUniform, resources::color::Color, scene::SpotLight},
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

/// Global uniform buffer content
///
/// MUST match the `Globals` struct in the shaders exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUniform {
    pub view_position: [f32; 4],
    pub view_proj: [[f32; 4]; 4],
    pub light_view_proj: [[f32; 4]; 4],
    /// xyz position, w is 1 when a spot light is present
    pub spot_position: [f32; 4],
    /// xyz unit direction, w cosine of the outer cone angle
    pub spot_direction: [f32; 4],
    /// rgb color times intensity, w cosine of the inner cone angle
    pub spot_color: [f32; 4],
    /// x range, y decay, z 1 when casting shadows, w shadow bias
    pub spot_params: [f32; 4],
    pub ambient: [f32; 4],
}

impl GlobalUniform {
    /// Packs the camera, the shadow-casting spot light and summed ambient light
    pub fn new(camera: &CameraUniform, spot: Option<&SpotLight>, ambient: [f32; 3]) -> Self {
        let identity = [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ];
        let mut content = Self {
            view_position: camera.view_position,
            view_proj: camera.view_proj,
            light_view_proj: identity,
            spot_position: [0.0; 4],
            spot_direction: [0.0, -1.0, 0.0, 1.0],
            spot_color: [0.0; 4],
            spot_params: [0.0; 4],
            ambient: [ambient[0], ambient[1], ambient[2], 0.0],
        };

        if let Some(light) = spot {
            let (cos_outer, cos_inner) = light.cone_cosines();
            let direction = light.direction();
            let color = scaled(light.color, light.intensity);
            content.light_view_proj = light.shadow_view_proj().into();
            content.spot_position = [light.position.x, light.position.y, light.position.z, 1.0];
            content.spot_direction = [direction.x, direction.y, direction.z, cos_outer];
            content.spot_color = [color[0], color[1], color[2], cos_inner];
            content.spot_params = [
                light.distance,
                light.decay,
                if light.cast_shadow { 1.0 } else { 0.0 },
                light.shadow.bias,
            ];
        }
        content
    }
}

fn scaled(color: Color, intensity: f32) -> [f32; 3] {
    let [r, g, b] = color.to_array();
    [r * intensity, g * intensity, b * intensity]
}

/// Type alias for the global uniform buffer
pub type GlobalUBO = UniformBuffer<GlobalUniform>;

/// Bind group layout and bind group for [`GlobalUniform`]
pub struct GlobalBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device, ubo: &GlobalUBO) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .create(device, "Globals Bind Group Layout");
        let bind_group = BindGroupBuilder::new(&bind_group_layout)
            .resource(ubo.binding_resource())
            .create(device, "Globals Bind Group");

        GlobalBindings {
            bind_group_layout,
            bind_group,
        }
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cgmath::Vector3;

    #[test]
    fn test_layout_is_vec4_aligned() {
        assert_eq!(std::mem::size_of::<GlobalUniform>(), 224);
        assert_eq!(std::mem::size_of::<GlobalUniform>() % 16, 0);
    }

    #[test]
    fn test_no_spot_light_leaves_it_disabled() {
        let content = GlobalUniform::new(&CameraUniform::default(), None, [0.2, 0.2, 0.2]);
        assert_eq!(content.spot_position[3], 0.0);
        assert_eq!(content.spot_color, [0.0; 4]);
        assert_relative_eq!(content.ambient[1], 0.2);
    }

    #[test]
    fn test_spot_light_is_packed() {
        let light = SpotLight {
            intensity: 2.0,
            position: Vector3::new(0.0, 10.0, 0.0),
            cast_shadow: true,
            penumbra: 0.05,
            ..SpotLight::new(Color::from_hex(0x808080))
        };
        let content = GlobalUniform::new(&CameraUniform::default(), Some(&light), [0.0; 3]);
        let (outer, inner) = light.cone_cosines();

        assert_eq!(content.spot_position, [0.0, 10.0, 0.0, 1.0]);
        assert_relative_eq!(content.spot_direction[1], -1.0);
        assert_relative_eq!(content.spot_direction[3], outer);
        assert_relative_eq!(content.spot_color[3], inner);
        assert_relative_eq!(content.spot_color[0], 2.0 * 128.0 / 255.0, epsilon = 1e-5);
        assert_eq!(content.spot_params[2], 1.0);
    }
}
