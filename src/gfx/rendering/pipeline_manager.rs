//! Render pipeline management for wgpu
//!
//! Pipelines are registered as [`PipelineConfig`]s under a name and created
//! lazily on first request. Material state that changes fixed-function
//! pipeline state is folded into a [`PipelineKey`], whose label doubles as the
//! pipeline name, so each distinct combination is built once.

use std::{collections::HashMap, sync::Arc};
use wgpu::*;

use crate::{
    error::RenderError,
    gfx::{resources::material::MaterialCommon, scene::vertex::Vertex3D},
};

/// How fragment output is combined with the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendMode {
    Opaque,
    Alpha,
    Premultiplied,
}

impl BlendMode {
    pub fn blend_state(self) -> Option<BlendState> {
        match self {
            BlendMode::Opaque => Some(BlendState::REPLACE),
            BlendMode::Alpha => Some(BlendState::ALPHA_BLENDING),
            BlendMode::Premultiplied => Some(BlendState::PREMULTIPLIED_ALPHA_BLENDING),
        }
    }
}

/// Fixed-function state a material selects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PipelineKey {
    pub wireframe: bool,
    pub cull_mode: Option<Face>,
    pub blend: BlendMode,
    pub color_write: bool,
}

impl PipelineKey {
    pub fn for_material(common: &MaterialCommon, wireframe: bool) -> Self {
        let blend = match (common.transparent, common.premultiplied_alpha) {
            (false, _) => BlendMode::Opaque,
            (true, false) => BlendMode::Alpha,
            (true, true) => BlendMode::Premultiplied,
        };
        Self {
            wireframe,
            cull_mode: if wireframe {
                None
            } else {
                common.side.cull_mode()
            },
            blend,
            color_write: common.color_write,
        }
    }

    /// Pipeline name, unique per key
    pub fn label(&self) -> String {
        format!(
            "Mesh {} cull={:?} blend={:?} write={}",
            if self.wireframe { "Lines" } else { "Triangles" },
            self.cull_mode,
            self.blend,
            self.color_write
        )
    }

    pub fn topology(&self) -> PrimitiveTopology {
        if self.wireframe {
            PrimitiveTopology::LineList
        } else {
            PrimitiveTopology::TriangleList
        }
    }

    pub fn write_mask(&self) -> ColorWrites {
        if self.color_write {
            ColorWrites::ALL
        } else {
            ColorWrites::empty()
        }
    }
}

/// Configuration for creating a render pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub label: String,
    pub shader: String,
    pub bind_group_layouts: Vec<BindGroupLayout>,
    pub primitive_topology: PrimitiveTopology,
    pub cull_mode: Option<Face>,
    pub depth_format: Option<TextureFormat>,
    pub depth_bias: DepthBiasState,
    pub multisample: MultisampleState,
    pub color_targets: Vec<Option<ColorTargetState>>,
    pub vertex_only: bool, // for the shadow pass
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            label: "Default Pipeline".to_string(),
            shader: "mesh".to_string(),
            bind_group_layouts: Vec::new(),
            primitive_topology: PrimitiveTopology::TriangleList,
            cull_mode: Some(Face::Back),
            depth_format: None,
            depth_bias: DepthBiasState::default(),
            multisample: MultisampleState::default(),
            color_targets: vec![Some(ColorTargetState {
                format: TextureFormat::Bgra8Unorm,
                blend: Some(BlendState::REPLACE),
                write_mask: ColorWrites::ALL,
            })],
            vertex_only: false,
        }
    }
}

impl PipelineConfig {
    pub fn default_with_shader(shader: &str) -> Self {
        Self {
            shader: shader.to_string(),
            ..Default::default()
        }
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_owned();
        self
    }

    pub fn with_cull_mode(mut self, face: Option<Face>) -> Self {
        self.cull_mode = face;
        self
    }

    pub fn with_vertex_only(mut self) -> Self {
        self.vertex_only = true;
        self.color_targets.clear();
        self
    }

    pub fn with_bind_group_layouts(mut self, layouts: Vec<BindGroupLayout>) -> Self {
        self.bind_group_layouts = layouts;
        self
    }

    pub fn with_depth_stencil(mut self, format: TextureFormat) -> Self {
        self.depth_format = Some(format);
        self
    }

    pub fn with_depth_bias(mut self, constant: i32, slope_scale: f32) -> Self {
        self.depth_bias = DepthBiasState {
            constant,
            slope_scale,
            clamp: 0.0,
        };
        self
    }

    pub fn with_color_targets(mut self, targets: Vec<Option<ColorTargetState>>) -> Self {
        self.color_targets = targets;
        self
    }

    pub fn with_primitive_topology(mut self, topology: PrimitiveTopology) -> Self {
        self.primitive_topology = topology;
        self
    }

    /// Mesh pipeline config for a material key rendering to `format`
    pub fn for_key(key: &PipelineKey, format: TextureFormat) -> Self {
        Self::default_with_shader("mesh")
            .with_label(&key.label())
            .with_cull_mode(key.cull_mode)
            .with_primitive_topology(key.topology())
            .with_depth_stencil(crate::gfx::resources::TextureResource::DEPTH_FORMAT)
            .with_color_targets(vec![Some(ColorTargetState {
                format,
                blend: key.blend.blend_state(),
                write_mask: key.write_mask(),
            })])
    }
}

/// Manages render pipelines with caching and lazy creation
pub struct PipelineManager {
    device: Arc<Device>,
    pipelines: HashMap<String, RenderPipeline>,
    pipeline_configs: HashMap<String, PipelineConfig>,
    shader_modules: HashMap<String, ShaderModule>,
}

impl PipelineManager {
    pub fn new(device: Arc<Device>) -> Self {
        Self {
            device,
            pipelines: HashMap::new(),
            pipeline_configs: HashMap::new(),
            shader_modules: HashMap::new(),
        }
    }

    /// Registers a pipeline configuration without creating it
    pub fn register_pipeline(&mut self, name: &str, config: PipelineConfig) {
        self.pipeline_configs.insert(name.to_string(), config);
    }

    pub fn load_shader(&mut self, name: &str, source: &str) {
        let shader_module = self.device.create_shader_module(ShaderModuleDescriptor {
            label: Some(name),
            source: ShaderSource::Wgsl(source.into()),
        });
        self.shader_modules.insert(name.to_string(), shader_module);
    }

    /// Creates the named pipeline if it is registered but not built yet
    pub fn prepare(&mut self, name: &str) -> Result<(), RenderError> {
        if self.pipelines.contains_key(name) {
            return Ok(());
        }
        let config = self
            .pipeline_configs
            .get(name)
            .ok_or_else(|| RenderError::UnknownPipeline(name.to_string()))?;
        let pipeline = self.create_pipeline_from_config(name, config)?;
        log::debug!("Created pipeline '{}'", name);
        self.pipelines.insert(name.to_string(), pipeline);
        Ok(())
    }

    /// Pipeline created by an earlier [`prepare`](Self::prepare)
    pub fn get_pipeline(&self, name: &str) -> Option<&RenderPipeline> {
        self.pipelines.get(name)
    }

    pub fn has_pipeline(&self, name: &str) -> bool {
        self.pipeline_configs.contains_key(name)
    }

    fn create_pipeline_from_config(
        &self,
        name: &str,
        config: &PipelineConfig,
    ) -> Result<RenderPipeline, RenderError> {
        let shader = self
            .shader_modules
            .get(&config.shader)
            .ok_or_else(|| RenderError::MissingShader(config.shader.clone()))?;

        let bind_group_layout_refs: Vec<&BindGroupLayout> =
            config.bind_group_layouts.iter().collect();
        let pipeline_layout = self
            .device
            .create_pipeline_layout(&PipelineLayoutDescriptor {
                label: Some(&format!("{} Layout", name)),
                bind_group_layouts: &bind_group_layout_refs,
                push_constant_ranges: &[],
            });

        let fragment_state = if config.vertex_only {
            None
        } else {
            Some(FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                targets: &config.color_targets,
                compilation_options: PipelineCompilationOptions::default(),
            })
        };

        let depth_stencil = config.depth_format.map(|format| DepthStencilState {
            format,
            depth_write_enabled: true,
            depth_compare: CompareFunction::Less,
            stencil: StencilState::default(),
            bias: config.depth_bias,
        });

        Ok(self
            .device
            .create_render_pipeline(&RenderPipelineDescriptor {
                label: Some(&config.label),
                layout: Some(&pipeline_layout),
                vertex: VertexState {
                    module: shader,
                    entry_point: Some("vs_main"),
                    buffers: &[Vertex3D::desc()],
                    compilation_options: PipelineCompilationOptions::default(),
                },
                fragment: fragment_state,
                primitive: PrimitiveState {
                    topology: config.primitive_topology,
                    strip_index_format: None,
                    front_face: FrontFace::Ccw,
                    cull_mode: config.cull_mode,
                    polygon_mode: PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil,
                multisample: config.multisample,
                multiview: None,
                cache: None,
            }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::resources::material::Side;

    #[test]
    fn test_default_material_is_opaque_back_culled() {
        let key = PipelineKey::for_material(&MaterialCommon::default(), false);
        assert_eq!(key.blend, BlendMode::Opaque);
        assert_eq!(key.cull_mode, Some(Face::Back));
        assert_eq!(key.topology(), PrimitiveTopology::TriangleList);
        assert_eq!(key.write_mask(), ColorWrites::ALL);
    }

    #[test]
    fn test_material_state_selects_distinct_pipelines() {
        let mut common = MaterialCommon::default();
        let opaque = PipelineKey::for_material(&common, false);

        common.transparent = true;
        let alpha = PipelineKey::for_material(&common, false);
        assert_eq!(alpha.blend, BlendMode::Alpha);

        common.premultiplied_alpha = true;
        common.side = Side::Both;
        common.color_write = false;
        let premultiplied = PipelineKey::for_material(&common, false);
        assert_eq!(premultiplied.blend, BlendMode::Premultiplied);
        assert_eq!(premultiplied.cull_mode, None);
        assert_eq!(premultiplied.write_mask(), ColorWrites::empty());

        let labels = [opaque.label(), alpha.label(), premultiplied.label()];
        assert_ne!(labels[0], labels[1]);
        assert_ne!(labels[1], labels[2]);
    }

    #[test]
    fn test_wireframe_draws_lines_without_culling() {
        let mut common = MaterialCommon::default();
        common.side = Side::Back;
        let key = PipelineKey::for_material(&common, true);
        assert_eq!(key.topology(), PrimitiveTopology::LineList);
        assert_eq!(key.cull_mode, None);
    }
}
