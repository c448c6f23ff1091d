//! Light sources
//!
//! Attenuation and cone falloff follow the usual physically-based-light
//! conventions: a `distance` of zero means no range cutoff, and the cone
//! fades over the outer `penumbra` fraction of `angle`.

use cgmath::{perspective, Deg, EuclideanSpace, InnerSpace, Matrix4, Point3, Vector3, Zero};

use crate::gfx::{camera::orbit_camera::OPENGL_TO_WGPU_MATRIX, resources::color::Color};

/// Shadow camera parameters of a shadow-casting light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightShadow {
    pub map_size: [u32; 2],
    /// Vertical field of view in degrees
    pub camera_fov: f32,
    pub camera_near: f32,
    pub camera_far: f32,
    pub bias: f32,
}

impl Default for LightShadow {
    fn default() -> Self {
        Self {
            map_size: [512, 512],
            camera_fov: 50.0,
            camera_near: 0.5,
            camera_far: 500.0,
            bias: 0.0,
        }
    }
}

/// Cone-shaped light aimed from `position` at `target`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotLight {
    pub color: Color,
    pub intensity: f32,
    /// Range cutoff; zero disables it
    pub distance: f32,
    /// Half-angle of the cone in radians
    pub angle: f32,
    pub penumbra: f32,
    pub decay: f32,
    pub position: Vector3<f32>,
    pub target: Vector3<f32>,
    pub cast_shadow: bool,
    pub shadow: LightShadow,
}

impl SpotLight {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            intensity: 1.0,
            distance: 0.0,
            angle: std::f32::consts::PI / 3.0,
            penumbra: 0.0,
            decay: 2.0,
            position: Vector3::new(0.0, 1.0, 0.0),
            target: Vector3::zero(),
            cast_shadow: false,
            shadow: LightShadow::default(),
        }
    }

    /// Unit vector from the light toward its target
    pub fn direction(&self) -> Vector3<f32> {
        let dir = self.target - self.position;
        if dir.magnitude2() > 0.0 {
            dir.normalize()
        } else {
            -Vector3::unit_y()
        }
    }

    /// Range attenuation for a point `d` units from the light
    pub fn distance_attenuation(&self, d: f32) -> f32 {
        if self.distance > 0.0 {
            (1.0 - d / self.distance).clamp(0.0, 1.0).powf(self.decay)
        } else {
            1.0
        }
    }

    /// Cone falloff for a direction at `cos_theta` from the light axis
    pub fn cone_attenuation(&self, cos_theta: f32) -> f32 {
        let (outer, inner) = self.cone_cosines();
        smoothstep(outer, inner, cos_theta)
    }

    /// Cosines of the outer and inner cone angles
    pub fn cone_cosines(&self) -> (f32, f32) {
        (
            self.angle.cos(),
            (self.angle * (1.0 - self.penumbra)).cos(),
        )
    }

    /// View-projection of the shadow camera
    pub fn shadow_view_proj(&self) -> Matrix4<f32> {
        let aspect = self.shadow.map_size[0] as f32 / self.shadow.map_size[1].max(1) as f32;
        let up = if self.direction().y.abs() > 0.999 {
            Vector3::unit_z()
        } else {
            Vector3::unit_y()
        };
        let view = Matrix4::look_at_rh(
            Point3::from_vec(self.position),
            Point3::from_vec(self.target),
            up,
        );
        let proj = OPENGL_TO_WGPU_MATRIX
            * perspective(
                Deg(self.shadow.camera_fov),
                aspect,
                self.shadow.camera_near,
                self.shadow.camera_far,
            );
        proj * view
    }
}

/// Uniform light applied to every surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: Color,
    pub intensity: f32,
}

impl AmbientLight {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            intensity: 1.0,
        }
    }

    /// Color contribution (color scaled by intensity)
    pub fn radiance(&self) -> [f32; 3] {
        let [r, g, b] = self.color.to_array();
        [r * self.intensity, g * self.intensity, b * self.intensity]
    }
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge0 == edge1 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_distance_means_no_cutoff() {
        let light = SpotLight::new(Color::WHITE);
        assert_relative_eq!(light.distance_attenuation(0.0), 1.0);
        assert_relative_eq!(light.distance_attenuation(1.0e6), 1.0);
    }

    #[test]
    fn test_range_attenuation_with_decay() {
        let light = SpotLight {
            distance: 10.0,
            decay: 2.0,
            ..SpotLight::new(Color::WHITE)
        };
        assert_relative_eq!(light.distance_attenuation(5.0), 0.25);
        assert_relative_eq!(light.distance_attenuation(12.0), 0.0);
    }

    #[test]
    fn test_cone_falls_off_in_penumbra() {
        let light = SpotLight {
            penumbra: 0.05,
            ..SpotLight::new(Color::WHITE)
        };
        let (outer, inner) = light.cone_cosines();
        assert!(inner > outer);
        assert_relative_eq!(light.cone_attenuation(1.0), 1.0);
        assert_relative_eq!(light.cone_attenuation(outer - 0.01), 0.0);
        let mid = light.cone_attenuation((outer + inner) * 0.5);
        assert!(mid > 0.0 && mid < 1.0);
    }

    #[test]
    fn test_direction_points_at_target() {
        let light = SpotLight {
            position: Vector3::new(0.0, 10.0, 0.0),
            ..SpotLight::new(Color::WHITE)
        };
        let dir = light.direction();
        assert_relative_eq!(dir.y, -1.0);
    }

    #[test]
    fn test_ambient_radiance() {
        let ambient = AmbientLight::new(Color::from_hex(0x343434));
        let [r, g, b] = ambient.radiance();
        assert_relative_eq!(r, 52.0 / 255.0);
        assert_eq!(r, g);
        assert_eq!(g, b);
    }
}
