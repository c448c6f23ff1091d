use std::sync::Arc;

use cgmath::{Matrix4, Rad, Vector3, Zero};

use crate::gfx::{geometry::GeometryData, resources::material::MaterialId};

/// A renderable mesh: shared geometry, a material reference and a transform
///
/// Rotation is an Euler angle triple in radians applied in XYZ order.
#[derive(Debug, Clone)]
pub struct Object {
    pub geometry: Arc<GeometryData>,
    pub material: MaterialId,
    pub position: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
    pub visible: bool,
}

impl Object {
    /// Create a new Object with identity transformation
    pub fn new(geometry: impl Into<Arc<GeometryData>>, material: MaterialId) -> Self {
        Self {
            geometry: geometry.into(),
            material,
            position: Vector3::zero(),
            rotation: Vector3::zero(),
            scale: Vector3::new(1.0, 1.0, 1.0),
            cast_shadow: false,
            receive_shadow: false,
            visible: true,
        }
    }

    pub fn set_translation(&mut self, translation: Vector3<f32>) {
        self.position = translation;
    }

    pub fn set_rotation(&mut self, rotation: Vector3<f32>) {
        self.rotation = rotation;
    }

    /// Adds `delta` radians to each Euler angle
    pub fn rotate(&mut self, delta: Vector3<f32>) {
        self.rotation += delta;
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = Vector3::new(scale, scale, scale);
    }

    /// Model matrix: T * Rx * Ry * Rz * S
    pub fn model_matrix(&self) -> Matrix4<f32> {
        let t = Matrix4::from_translation(self.position);
        let r = Matrix4::from_angle_x(Rad(self.rotation.x))
            * Matrix4::from_angle_y(Rad(self.rotation.y))
            * Matrix4::from_angle_z(Rad(self.rotation.z));
        let s = Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z);
        t * r * s // Order matters: T * R * S
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::generate_plane;
    use approx::assert_relative_eq;
    use cgmath::Vector4;
    use std::f32::consts::PI;

    #[test]
    fn test_rotation_accumulates() {
        let mut object = Object::new(generate_plane(1.0, 1.0), MaterialId(0));
        object.rotate(Vector3::new(0.01, 0.02, 0.03));
        object.rotate(Vector3::new(0.01, 0.02, 0.03));
        assert_relative_eq!(object.rotation.x, 0.02);
        assert_relative_eq!(object.rotation.y, 0.04);
        assert_relative_eq!(object.rotation.z, 0.06);
    }

    #[test]
    fn test_quarter_turn_about_x_lays_plane_flat() {
        let mut object = Object::new(generate_plane(1.0, 1.0), MaterialId(0));
        object.set_rotation(Vector3::new(-0.5 * PI, 0.0, 0.0));

        let normal = object.model_matrix() * Vector4::new(0.0, 0.0, 1.0, 0.0);
        assert_relative_eq!(normal.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(normal.y, 1.0, epsilon = 1e-6);
        assert_relative_eq!(normal.z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_translation_is_applied_last() {
        let mut object = Object::new(generate_plane(1.0, 1.0), MaterialId(0));
        object.set_scale(2.0);
        object.set_translation(Vector3::new(0.0, -10.0, 0.0));
        let origin = object.model_matrix() * Vector4::new(1.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(origin.x, 2.0);
        assert_relative_eq!(origin.y, -10.0);
    }
}
