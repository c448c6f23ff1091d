//! # Graphics Module
//!
//! - **Camera** ([`camera`]) - orbit camera steered by trackball controls
//! - **Geometry** ([`geometry`]) - procedural box and plane meshes
//! - **Rendering** ([`rendering`]) - forward shading with one shadowed spot light
//! - **Resources** ([`resources`]) - colors, textures, materials and their GPU bindings
//! - **Scene** ([`scene`]) - flat list of objects and lights
//!
//! Scene and material data are plain CPU values; [`RenderEngine`] mirrors
//! them to the GPU at the start of each frame.

pub mod camera;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;

pub use camera::orbit_camera::OrbitCamera;
pub use rendering::render_engine::RenderEngine;
