// src/gfx/rendering/mod.rs
//! Core rendering functionality
//!
//! Handles render pipelines, per-object GPU resources, and frame rendering.

pub mod draw_list;
pub mod mesh_buffers;
pub mod pipeline_manager;
pub mod render_engine;

pub use draw_list::{plan_draws, DrawItem};
pub use pipeline_manager::{BlendMode, PipelineConfig, PipelineKey, PipelineManager};
pub use render_engine::RenderEngine;
