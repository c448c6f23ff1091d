//! # Scene Management Module
//!
//! The scene is an append-only list of nodes (meshes, spot lights, ambient
//! lights) plus the material manager the meshes reference.
//!
//! ## Key Components
//!
//! - [`Scene`] - node container and material owner
//! - [`Object`] - geometry, material reference and transform
//! - [`SpotLight`] / [`AmbientLight`] - light sources
//! - [`builder`] - ground plane and default lighting
//! - [`Vertex3D`] - GPU vertex format
//!
//! ## Usage
//!
//! ```no_run
//! use material_lab::gfx::scene::{builder, Scene};
//!
//! let mut scene = Scene::new();
//! builder::build_ground_plane(&mut scene, None);
//! builder::init_default_lighting(&mut scene, None);
//! ```

pub mod builder;
pub mod light;
pub mod object;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use light::{AmbientLight, LightShadow, SpotLight};
pub use object::Object;
pub use scene::{Node, NodeId, NodeKind, Scene, SceneStatistics};
pub use vertex::Vertex3D;
