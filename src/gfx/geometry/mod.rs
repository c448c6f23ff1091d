//! # Procedural Geometry Generation
//!
//! Generates the primitive shapes the demo scene is made of, so no model
//! files are needed.
//!
//! ## Supported Primitives
//!
//! - **Box**: axis-aligned box with independent width, height and depth
//! - **Plane**: flat rectangle in the XY plane facing +Z
//!
//! ## Usage
//!
//! ```rust
//! use material_lab::gfx::geometry::{generate_box, generate_plane};
//!
//! let cube = generate_box(10.0, 10.0, 10.0);
//! assert_eq!(cube.triangle_count(), 12);
//!
//! let floor = generate_plane(100.0, 100.0);
//! assert_eq!(floor.vertex_count(), 4);
//! ```

pub mod primitives;

use std::collections::BTreeSet;

pub use primitives::*;

use crate::gfx::scene::vertex::Vertex3D;

/// Generated geometry data ready for GPU upload
#[derive(Debug, Clone, Default)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Texture coordinates (u, v), v pointing up
    pub tex_coords: Vec<[f32; 2]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Interleaves the attribute streams into the renderer's vertex format
    pub fn to_vertices(&self) -> Vec<Vertex3D> {
        (0..self.vertices.len())
            .map(|i| Vertex3D {
                position: self.vertices[i],
                normal: self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
                uv: self.tex_coords.get(i).copied().unwrap_or([0.0, 0.0]),
            })
            .collect()
    }

    /// Line-list indices covering every triangle edge once
    ///
    /// Used to draw wireframe materials.
    pub fn edge_indices(&self) -> Vec<u32> {
        let mut edges = BTreeSet::new();
        for triangle in self.indices.chunks_exact(3) {
            for (a, b) in [
                (triangle[0], triangle[1]),
                (triangle[1], triangle[2]),
                (triangle[2], triangle[0]),
            ] {
                edges.insert((a.min(b), a.max(b)));
            }
        }
        edges.into_iter().flat_map(|(a, b)| [a, b]).collect()
    }
}
