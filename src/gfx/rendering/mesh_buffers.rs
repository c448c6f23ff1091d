//! Per-object GPU data: vertex and index buffers plus the transform uniform

use std::sync::Arc;

use cgmath::{Matrix, Matrix4, SquareMatrix};
use wgpu::util::DeviceExt;

use crate::{
    gfx::{geometry::GeometryData, scene::Object},
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

/// MUST match the `ObjectUniform` struct in the shaders
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
    /// x is 1 when the object receives shadows
    pub flags: [f32; 4],
}

impl ObjectUniform {
    pub fn from_object(object: &Object) -> Self {
        let model = object.model_matrix();
        let normal_matrix = model
            .invert()
            .map(|inverse| inverse.transpose())
            .unwrap_or_else(Matrix4::identity);

        Self {
            model: model.into(),
            normal_matrix: normal_matrix.into(),
            flags: [if object.receive_shadow { 1.0 } else { 0.0 }, 0.0, 0.0, 0.0],
        }
    }
}

/// Geometry uploaded for both triangle and wireframe drawing
pub struct MeshBuffers {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
    pub edge_buffer: wgpu::Buffer,
    pub edge_count: u32,
}

impl MeshBuffers {
    pub fn new(device: &wgpu::Device, geometry: &GeometryData, label: &str) -> Self {
        let vertices = geometry.to_vertices();
        let edges = geometry.edge_indices();

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Vertex Buffer")),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Index Buffer")),
            contents: bytemuck::cast_slice(&geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let edge_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Edge Buffer")),
            contents: bytemuck::cast_slice(&edges),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: geometry.indices.len() as u32,
            edge_buffer,
            edge_count: edges.len() as u32,
        }
    }
}

/// Layout for group 1: the object transform uniform
pub struct ObjectBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
}

impl ObjectBindings {
    pub fn new(device: &wgpu::Device) -> Self {
        Self {
            bind_group_layout: BindGroupLayoutBuilder::new()
                .next_binding_rendering(binding_types::uniform())
                .create(device, "Object Bind Group Layout"),
        }
    }

    pub fn create_bind_group(
        &self,
        device: &wgpu::Device,
        ubo: &UniformBuffer<ObjectUniform>,
        label: &str,
    ) -> wgpu::BindGroup {
        BindGroupBuilder::new(&self.bind_group_layout)
            .resource(ubo.binding_resource())
            .create(device, label)
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }
}

/// Everything needed to draw one scene object
pub struct ObjectGpu {
    /// Geometry the buffers were built from
    pub geometry: Arc<GeometryData>,
    pub mesh: MeshBuffers,
    pub ubo: UniformBuffer<ObjectUniform>,
    pub bind_group: wgpu::BindGroup,
}

impl ObjectGpu {
    pub fn new(
        device: &wgpu::Device,
        bindings: &ObjectBindings,
        object: &Object,
        label: &str,
    ) -> Self {
        let mesh = MeshBuffers::new(device, &object.geometry, label);
        let ubo = UniformBuffer::new(device);
        let bind_group = bindings.create_bind_group(device, &ubo, label);
        Self {
            geometry: object.geometry.clone(),
            mesh,
            ubo,
            bind_group,
        }
    }

    /// Rebuilds the buffers if the object now points at different geometry
    pub fn sync_geometry(&mut self, device: &wgpu::Device, object: &Object, label: &str) {
        if !Arc::ptr_eq(&self.geometry, &object.geometry) {
            log::debug!("Geometry of '{}' changed; rebuilding buffers", label);
            self.mesh = MeshBuffers::new(device, &object.geometry, label);
            self.geometry = object.geometry.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{geometry::generate_box, resources::material::MaterialId};
    use approx::assert_relative_eq;
    use cgmath::Vector3;

    #[test]
    fn test_normal_matrix_undoes_nonuniform_scale() {
        let mut object = Object::new(generate_box(1.0, 1.0, 1.0), MaterialId(1));
        object.scale = Vector3::new(2.0, 1.0, 1.0);
        object.receive_shadow = true;

        let uniform = ObjectUniform::from_object(&object);
        assert_relative_eq!(uniform.model[0][0], 2.0);
        assert_relative_eq!(uniform.normal_matrix[0][0], 0.5);
        assert_relative_eq!(uniform.normal_matrix[1][1], 1.0);
        assert_eq!(uniform.flags[0], 1.0);
    }

    #[test]
    fn test_degenerate_scale_falls_back_to_identity() {
        let mut object = Object::new(generate_box(1.0, 1.0, 1.0), MaterialId(1));
        object.set_scale(0.0);
        let uniform = ObjectUniform::from_object(&object);
        let identity: [[f32; 4]; 4] = Matrix4::<f32>::identity().into();
        assert_eq!(uniform.normal_matrix, identity);
        assert_eq!(uniform.flags[0], 0.0);
    }
}
