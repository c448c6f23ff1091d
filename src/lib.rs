//! Material Lab
//!
//! A textured cube above a shadowed ground plane, rendered with wgpu, with a
//! Dear ImGui inspector that edits the cube's material while it spins.
//!
//! The inspector is window-independent: [`inspector::InspectorPanel`] holds
//! folders of field bindings and applies [`inspector::FieldEdit`] commands
//! to the scene's materials, and [`ui`] only turns widget interaction into
//! those commands.

pub mod app;
pub mod config;
pub mod demo;
pub mod error;
pub mod factory;
pub mod frame_loop;
pub mod gfx;
pub mod inspector;
pub mod ui;
pub mod wgpu_utils;

pub use app::MaterialLabApp;
pub use config::DemoConfig;
pub use factory::add_geometry;
