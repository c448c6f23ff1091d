//! WGPU-based rendering engine
//!
//! Owns the surface, device and every GPU resource derived from the scene.
//! Each frame it syncs per-object and per-material buffers, renders the spot
//! light shadow map, draws the scene and hands the encoder to the UI overlay.

use std::{collections::HashMap, sync::Arc};

use cgmath::Vector3;
use wgpu::{Device, TextureFormat};

use crate::{
    error::RenderError,
    gfx::{
        camera::camera_utils::CameraUniform,
        resources::{
            global_bindings::{GlobalBindings, GlobalUBO, GlobalUniform},
            material::{Material, MaterialId},
            material_bindings::{MaterialBindings, MaterialUBO, MaterialUniform},
            texture::Texture,
            texture_resource::{clamp_extent, TextureKey, TextureResource},
        },
        scene::{NodeId, Scene, SpotLight},
    },
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
    },
};

use super::{
    draw_list::{plan_draws, DrawItem},
    mesh_buffers::{ObjectBindings, ObjectGpu, ObjectUniform},
    pipeline_manager::{PipelineConfig, PipelineManager},
};

const MESH_SHADER: &str = "mesh";
const SHADOW_SHADER: &str = "shadow";

/// Material state a bind group was built from
///
/// A different map, or a `mark_needs_update` since the last build, requires a
/// new bind group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MaterialStamp {
    map: Option<TextureKey>,
    version: u32,
}

impl MaterialStamp {
    fn of(material: &Material) -> Self {
        Self {
            map: material.map().map(TextureKey::from),
            version: material.common.version(),
        }
    }
}

struct MaterialGpu {
    ubo: MaterialUBO,
    stamp: MaterialStamp,
    bind_group: wgpu::BindGroup,
}

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    format: TextureFormat,
    pub pipeline_manager: PipelineManager,
    global_ubo: GlobalUBO,
    global_bindings: GlobalBindings,
    object_bindings: ObjectBindings,
    material_bindings: MaterialBindings,

    // Shadow mapping resources
    shadow_layout: BindGroupLayoutWithDesc,
    shadow_map: TextureResource,
    shadow_map_size: [u32; 2],
    shadow_bind_group: wgpu::BindGroup,

    white_map: TextureResource,
    textures: HashMap<TextureKey, TextureResource>,
    objects: HashMap<NodeId, ObjectGpu>,
    materials: HashMap<MaterialId, MaterialGpu>,
    eye: Vector3<f32>,
}

impl RenderEngine {
    /// Creates a render engine drawing to `window`
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> Result<RenderEngine, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or(RenderError::NoSurfaceFormat)?;
        let alpha_mode = surface_capabilities
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");

        let global_ubo = GlobalUBO::new(&device);
        let global_bindings = GlobalBindings::new(&device, &global_ubo);
        let object_bindings = ObjectBindings::new(&device);
        let material_bindings = MaterialBindings::new(&device);

        let shadow_layout = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::texture_depth_2d())
            .next_binding_fragment(binding_types::sampler(
                wgpu::SamplerBindingType::Comparison,
            ))
            .create(&device, "Shadow Bind Group Layout");
        let shadow_map_size = [512, 512];
        let shadow_map = TextureResource::create_shadow_map(&device, shadow_map_size);
        let shadow_bind_group = BindGroupBuilder::new(&shadow_layout)
            .texture(&shadow_map.view)
            .sampler(&shadow_map.sampler)
            .create(&device, "Shadow Bind Group");

        let white_map = TextureResource::from_texture(&device, &queue, &Texture::white());

        let device_handle: Arc<Device> = device.into();
        let queue_handle: Arc<wgpu::Queue> = queue.into();
        let mut pipeline_manager = PipelineManager::new(device_handle.clone());
        pipeline_manager.load_shader(MESH_SHADER, include_str!("shaders/mesh.wgsl"));
        pipeline_manager.load_shader(SHADOW_SHADER, include_str!("shaders/shadow.wgsl"));

        Ok(RenderEngine {
            surface,
            device: device_handle,
            queue: queue_handle,
            config,
            depth_texture,
            format,
            pipeline_manager,
            global_ubo,
            global_bindings,
            object_bindings,
            material_bindings,
            shadow_layout,
            shadow_map,
            shadow_map_size,
            shadow_bind_group,
            white_map,
            textures: HashMap::new(),
            objects: HashMap::new(),
            materials: HashMap::new(),
            eye: Vector3::new(0.0, 0.0, 0.0),
        })
    }

    /// Uploads camera and lighting for the next frame
    pub fn update(&mut self, camera_uniform: CameraUniform, scene: &Scene) {
        let [x, y, z, _] = camera_uniform.view_position;
        self.eye = Vector3::new(x, y, z);

        let spot = shadow_light(scene);
        if let Some(light) = spot {
            self.ensure_shadow_map(light.shadow.map_size);
        }
        let content = GlobalUniform::new(&camera_uniform, spot, scene.ambient_radiance());
        self.global_ubo.update_content(&self.queue, content);
    }

    /// Renders `scene`, then lets `ui_callback` record its overlay
    ///
    /// A lost or outdated surface is reconfigured and the frame skipped.
    pub fn render_frame<F>(
        &mut self,
        scene: &Scene,
        ui_callback: Option<F>,
    ) -> Result<(), RenderError>
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost or outdated; reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Timed out acquiring the next frame");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let draws = plan_draws(scene, self.eye);
        self.sync_scene(scene);
        self.prepare_pipelines(&draws)?;
        let casts_shadow = shadow_light(scene).is_some_and(|light| light.cast_shadow);

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut shadow_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Shadow Depth Pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.shadow_map.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if casts_shadow {
                shadow_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);
                for item in draws.iter().filter(|item| item.cast_shadow && !item.key.wireframe) {
                    let Some(material) = scene.material_manager.get_material(item.material) else {
                        continue;
                    };
                    let name = shadow_pipeline_name(material);
                    let (Some(pipeline), Some(object)) = (
                        self.pipeline_manager.get_pipeline(&name),
                        self.objects.get(&item.node),
                    ) else {
                        continue;
                    };
                    shadow_pass.set_pipeline(pipeline);
                    shadow_pass.set_bind_group(1, &object.bind_group, &[]);
                    shadow_pass.set_vertex_buffer(0, object.mesh.vertex_buffer.slice(..));
                    shadow_pass.set_index_buffer(
                        object.mesh.index_buffer.slice(..),
                        wgpu::IndexFormat::Uint32,
                    );
                    shadow_pass.draw_indexed(0..object.mesh.index_count, 0, 0..1);
                }
            }
        }

        {
            let [r, g, b] = scene.background.to_array();
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);
            render_pass.set_bind_group(3, &self.shadow_bind_group, &[]);

            for item in &draws {
                let (Some(pipeline), Some(object), Some(material)) = (
                    self.pipeline_manager.get_pipeline(&item.key.label()),
                    self.objects.get(&item.node),
                    self.materials.get(&item.material),
                ) else {
                    continue;
                };
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(1, &object.bind_group, &[]);
                render_pass.set_bind_group(2, &material.bind_group, &[]);
                render_pass.set_vertex_buffer(0, object.mesh.vertex_buffer.slice(..));
                if item.key.wireframe {
                    render_pass
                        .set_index_buffer(object.mesh.edge_buffer.slice(..), wgpu::IndexFormat::Uint32);
                    render_pass.draw_indexed(0..object.mesh.edge_count, 0, 0..1);
                } else {
                    render_pass
                        .set_index_buffer(object.mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                    render_pass.draw_indexed(0..object.mesh.index_count, 0, 0..1);
                }
            }
        }

        if let Some(ui_callback) = ui_callback {
            ui_callback(
                self.device.as_ref(),
                self.queue.as_ref(),
                &mut encoder,
                &surface_texture_view,
            );
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    /// Creates or refreshes GPU state for every object and material
    fn sync_scene(&mut self, scene: &Scene) {
        for (node, object) in scene.objects() {
            let label = scene
                .node(node)
                .and_then(|n| n.name.clone())
                .unwrap_or_else(|| format!("Node {}", node.0));
            let gpu = self.objects.entry(node).or_insert_with(|| {
                ObjectGpu::new(&self.device, &self.object_bindings, object, &label)
            });
            gpu.sync_geometry(&self.device, object, &label);
            gpu.ubo
                .update_content(&self.queue, ObjectUniform::from_object(object));
        }

        for material in scene.material_manager.iter() {
            self.sync_material(material);
        }
    }

    fn sync_material(&mut self, material: &Material) {
        let stamp = MaterialStamp::of(material);
        if let (Some(key), Some(texture)) = (stamp.map, material.map()) {
            self.textures.entry(key).or_insert_with(|| {
                log::debug!("Uploading texture '{}'", texture.image.label);
                TextureResource::from_texture(&self.device, &self.queue, texture)
            });
        }

        let stale = self
            .materials
            .get(&material.id())
            .is_none_or(|gpu| gpu.stamp != stamp);
        if stale {
            log::debug!("Building bind group for material {}", material.id());
            let ubo = MaterialUBO::new(&self.device);
            let map = stamp
                .map
                .and_then(|key| self.textures.get(&key))
                .unwrap_or(&self.white_map);
            let bind_group = self.material_bindings.create_bind_group(
                &self.device,
                &ubo,
                map,
                &format!("Material {} Bind Group", material.id()),
            );
            self.materials.insert(
                material.id(),
                MaterialGpu {
                    ubo,
                    stamp,
                    bind_group,
                },
            );
        }

        if let Some(gpu) = self.materials.get_mut(&material.id()) {
            gpu.ubo
                .update_content(&self.queue, MaterialUniform::from_material(material));
        }
    }

    fn prepare_pipelines(&mut self, draws: &[DrawItem]) -> Result<(), RenderError> {
        let main_layouts = vec![
            self.global_bindings.bind_group_layout().clone(),
            self.object_bindings.bind_group_layout().clone(),
            self.material_bindings.bind_group_layout().clone(),
            self.shadow_layout.layout.clone(),
        ];
        let shadow_layouts = vec![
            self.global_bindings.bind_group_layout().clone(),
            self.object_bindings.bind_group_layout().clone(),
        ];

        for item in draws {
            let name = item.key.label();
            if !self.pipeline_manager.has_pipeline(&name) {
                self.pipeline_manager.register_pipeline(
                    &name,
                    PipelineConfig::for_key(&item.key, self.format)
                        .with_bind_group_layouts(main_layouts.clone()),
                );
            }
            self.pipeline_manager.prepare(&name)?;
        }

        for cull_mode in [Some(wgpu::Face::Back), Some(wgpu::Face::Front), None] {
            let name = shadow_name(cull_mode);
            if !self.pipeline_manager.has_pipeline(&name) {
                self.pipeline_manager.register_pipeline(
                    &name,
                    PipelineConfig::default_with_shader(SHADOW_SHADER)
                        .with_label(&name)
                        .with_vertex_only()
                        .with_cull_mode(cull_mode)
                        .with_depth_stencil(TextureResource::DEPTH_FORMAT)
                        .with_depth_bias(2, 2.0)
                        .with_bind_group_layouts(shadow_layouts.clone()),
                );
                self.pipeline_manager.prepare(&name)?;
            }
        }
        Ok(())
    }

    fn ensure_shadow_map(&mut self, requested: [u32; 2]) {
        let size = clamp_extent(requested, self.device.limits().max_texture_dimension_2d);
        if size == self.shadow_map_size {
            return;
        }
        if size != requested {
            log::warn!(
                "Shadow map {}x{} exceeds the device limit; using {}x{}",
                requested[0],
                requested[1],
                size[0],
                size[1]
            );
        }
        log::info!("Resizing shadow map to {}x{}", size[0], size[1]);
        self.shadow_map = TextureResource::create_shadow_map(&self.device, size);
        self.shadow_map_size = size;
        self.shadow_bind_group = BindGroupBuilder::new(&self.shadow_layout)
            .texture(&self.shadow_map.view)
            .sampler(&self.shadow_map.sampler)
            .create(&self.device, "Shadow Bind Group");
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }
}

/// Light whose shadow camera drives the shadow pass
fn shadow_light(scene: &Scene) -> Option<&SpotLight> {
    scene
        .spot_lights()
        .find(|light| light.cast_shadow)
        .or_else(|| scene.spot_lights().next())
}

fn shadow_name(cull_mode: Option<wgpu::Face>) -> String {
    format!("Shadow cull={:?}", cull_mode)
}

fn shadow_pipeline_name(material: &Material) -> String {
    shadow_name(material.common.shadow_side.cull_mode())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::resources::material::{MaterialKind, MaterialManager, StandardParams};

    #[test]
    fn test_stamp_changes_with_needs_update_and_map() {
        let mut materials = MaterialManager::new();
        let id = materials.add_material(Material::standard(StandardParams::default()));

        let material = materials.get_material(id).unwrap();
        let built = MaterialStamp::of(material);
        assert_eq!(MaterialStamp::of(material), built);

        let material = materials.get_material_mut(id).unwrap();
        material.common.mark_needs_update();
        assert_ne!(MaterialStamp::of(material), built);

        let rebuilt = MaterialStamp::of(material);
        if let MaterialKind::Standard(params) = &mut material.kind {
            params.map = Some(Texture::white());
        }
        let textured = MaterialStamp::of(material);
        assert_ne!(textured, rebuilt);
        assert!(textured.map.is_some());
    }

    #[test]
    fn test_shadow_light_prefers_casting_spot() {
        let mut scene = Scene::new();
        assert!(shadow_light(&scene).is_none());

        let mut plain = SpotLight::new(crate::gfx::resources::Color::WHITE);
        plain.cast_shadow = false;
        scene.add_spot_light(None, plain);
        assert!(!shadow_light(&scene).unwrap().cast_shadow);

        let mut casting = plain;
        casting.cast_shadow = true;
        scene.add_spot_light(None, casting);
        assert!(shadow_light(&scene).unwrap().cast_shadow);
    }
}
