// src/gfx/resources/mod.rs
//! Materials, textures and the GPU resources derived from them

pub mod color;
pub mod global_bindings;
pub mod material;
pub mod material_bindings;
pub mod texture;
pub mod texture_resource;

pub use color::Color;
pub use global_bindings::{GlobalBindings, GlobalUBO, GlobalUniform};
pub use material::{Material, MaterialId, MaterialKind, MaterialManager};
pub use texture::{Texture, TextureLoader};
pub use texture_resource::TextureResource;
