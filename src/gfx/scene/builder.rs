//! Scene population helpers
//!
//! Builds the fixed parts of the demo scene: a large ground plane and the
//! default spot + ambient lighting.

use std::f32::consts::PI;

use cgmath::{Vector3, Zero};

use crate::{
    config::LightingConfig,
    gfx::{
        geometry::generate_plane,
        resources::{
            color::Color,
            material::{Material, PhongParams},
            texture::Texture,
        },
    },
};

use super::{
    light::{AmbientLight, LightShadow, SpotLight},
    object::Object,
    scene::{NodeId, Scene},
};

pub const GROUND_PLANE_NAME: &str = "groundPlane";
pub const SPOT_LIGHT_NAME: &str = "spotLight";
pub const AMBIENT_LIGHT_NAME: &str = "ambientLight";

const GROUND_PLANE_SIZE: f32 = 10000.0;
const GROUND_TEXTURE_REPEAT: f32 = 80.0;

/// Appends a horizontal 10000 x 10000 plane that receives shadows
///
/// A texture, when given, is tiled 80 times in each direction.
pub fn build_ground_plane(scene: &mut Scene, texture: Option<Texture>) -> NodeId {
    let material = scene.add_material(
        Material::phong(PhongParams {
            color: Color::WHITE,
            map: texture.map(|t| t.with_repeat(GROUND_TEXTURE_REPEAT, GROUND_TEXTURE_REPEAT)),
            ..Default::default()
        })
        .with_name(GROUND_PLANE_NAME),
    );

    let mut plane = Object::new(generate_plane(GROUND_PLANE_SIZE, GROUND_PLANE_SIZE), material);
    plane.receive_shadow = true;
    plane.set_rotation(Vector3::new(-0.5 * PI, 0.0, 0.0));
    plane.set_translation(Vector3::zero());

    let id = scene.add_object(Some(GROUND_PLANE_NAME), plane);
    log::info!("Ground plane added as node {}", id.0);
    id
}

/// Appends the default spot light and ambient light
///
/// `position` defaults to (-10, 30, 40).
pub fn init_default_lighting(scene: &mut Scene, position: Option<Vector3<f32>>) {
    let config = LightingConfig {
        spot_position: position.map(Into::into).unwrap_or(LightingConfig::default().spot_position),
        ..LightingConfig::default()
    };
    init_default_lighting_with(scene, &config);
}

/// [`init_default_lighting`] with shadow settings taken from configuration
pub fn init_default_lighting_with(scene: &mut Scene, config: &LightingConfig) {
    let spot = SpotLight {
        intensity: 1.0,
        distance: 0.0,
        angle: PI / 3.0,
        penumbra: 0.05,
        decay: 2.0,
        position: Vector3::from(config.spot_position),
        target: Vector3::zero(),
        cast_shadow: true,
        shadow: LightShadow {
            map_size: [config.shadow_map_size, config.shadow_map_size],
            camera_fov: config.shadow_fov,
            ..LightShadow::default()
        },
        ..SpotLight::new(Color::WHITE)
    };
    scene.add_spot_light(Some(SPOT_LIGHT_NAME), spot);
    scene.add_ambient_light(
        Some(AMBIENT_LIGHT_NAME),
        AmbientLight::new(Color::from_hex(0x343434)),
    );

    log::info!(
        "Default lighting: spot light at {:?}, {}px shadow map",
        config.spot_position,
        config.shadow_map_size
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{
        resources::{material::MaterialKind, texture::Wrapping},
        scene::scene::NodeKind,
    };
    use approx::assert_relative_eq;

    #[test]
    fn test_ground_plane_without_texture() {
        let mut scene = Scene::new();
        let id = build_ground_plane(&mut scene, None);

        assert_eq!(scene.node_by_name("groundPlane"), Some(id));
        let plane = scene.object(id).unwrap();
        assert!(plane.receive_shadow);
        assert!(!plane.cast_shadow);
        assert_relative_eq!(plane.rotation.x, -0.5 * PI);
        assert_relative_eq!(plane.geometry.vertices[2][0], 5000.0);

        let material = scene.material_manager.get_material(plane.material).unwrap();
        assert!(matches!(material.kind, MaterialKind::Phong(_)));
        assert_eq!(material.color(), Some(Color::WHITE));
        assert!(material.map().is_none());
    }

    #[test]
    fn test_ground_plane_texture_is_tiled() {
        let mut scene = Scene::new();
        let id = build_ground_plane(&mut scene, Some(Texture::white()));

        let plane = scene.object(id).unwrap();
        let map = scene
            .material_manager
            .get_material(plane.material)
            .and_then(|m| m.map())
            .expect("plane has a map");
        assert_eq!(map.wrap_s, Wrapping::Repeat);
        assert_eq!(map.wrap_t, Wrapping::Repeat);
        assert_eq!(map.repeat, [80.0, 80.0]);
    }

    #[test]
    fn test_default_lighting_order_and_parameters() {
        let mut scene = Scene::new();
        init_default_lighting(&mut scene, None);

        assert_eq!(scene.len(), 2);
        let spot = scene.node_by_name("spotLight").unwrap();
        let ambient = scene.node_by_name("ambientLight").unwrap();
        assert!(spot < ambient);

        let NodeKind::SpotLight(light) = &scene.node(spot).unwrap().kind else {
            panic!("expected a spot light");
        };
        assert_eq!(light.position, Vector3::new(-10.0, 30.0, 40.0));
        assert_eq!(light.shadow.map_size, [2048, 2048]);
        assert_relative_eq!(light.shadow.camera_fov, 15.0);
        assert_relative_eq!(light.angle, PI / 3.0);
        assert_relative_eq!(light.penumbra, 0.05);
        assert_relative_eq!(light.decay, 2.0);
        assert_relative_eq!(light.distance, 0.0);
        assert!(light.cast_shadow);

        let NodeKind::AmbientLight(light) = &scene.node(ambient).unwrap().kind else {
            panic!("expected an ambient light");
        };
        assert_eq!(light.color.to_hex(), 0x343434);
    }

    #[test]
    fn test_lighting_position_override() {
        let mut scene = Scene::new();
        init_default_lighting(&mut scene, Some(Vector3::new(1.0, 2.0, 3.0)));
        let spot = scene.spot_lights().next().unwrap();
        assert_eq!(spot.position, Vector3::new(1.0, 2.0, 3.0));
    }
}
