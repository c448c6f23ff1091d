//! # User Interface Module
//!
//! Dear ImGui overlay: [`UiManager`] integrates ImGui with winit and wgpu,
//! and [`inspector_window`] draws the material inspector.

pub mod inspector_window;
pub mod manager;

pub use inspector_window::inspector_window;
pub use manager::UiManager;
