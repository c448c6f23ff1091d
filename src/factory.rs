//! Builds inspectable mesh objects
//!
//! [`add_geometry`] is the one-call path from a geometry to a shadow-casting
//! object in the scene with its material exposed in the inspector.

use std::sync::Arc;

use crate::{
    gfx::{
        geometry::GeometryData,
        resources::{
            color::Color,
            material::{Material, StandardParams},
            texture::Texture,
        },
        scene::{NodeId, Object, Scene},
    },
    inspector::{add_basic_material_settings, add_specific_material_settings, InspectorPanel},
};

/// Adds a shadow-casting object with a metallic/roughness material
///
/// Creates two inspector folders for the material: `"{name}-Material"` with
/// the common fields and `"{name}-MeshStandardMaterial"` with the standard
/// material fields.
pub fn add_geometry(
    scene: &mut Scene,
    panel: &mut InspectorPanel,
    geometry: impl Into<Arc<GeometryData>>,
    name: &str,
    texture: Option<Texture>,
) -> NodeId {
    let material_id = scene.add_material(
        Material::standard(StandardParams {
            color: Color::WHITE,
            emissive: Color::BLACK,
            metalness: 0.2,
            roughness: 0.07,
            map: texture,
            wireframe: false,
        })
        .with_name(name),
    );

    let mut object = Object::new(geometry, material_id);
    object.cast_shadow = true;
    let node = scene.add_object(Some(name), object);

    if let Some(material) = scene.material_manager.get_material(material_id) {
        add_basic_material_settings(panel, material, Some(&format!("{name}-Material")));
        add_specific_material_settings(
            panel,
            material,
            Some(&format!("{name}-{}", material.type_name())),
        );
    }

    log::info!("Added '{}' as node {} with material {}", name, node.0, material_id);
    node
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        gfx::{geometry::generate_box, resources::material::MaterialKind},
        inspector::{FieldEdit, FieldValue},
    };
    use approx::assert_relative_eq;

    #[test]
    fn test_add_geometry_creates_object_and_two_folders() {
        let mut scene = Scene::new();
        let mut panel = InspectorPanel::new();

        let node = add_geometry(
            &mut scene,
            &mut panel,
            generate_box(10.0, 10.0, 10.0),
            "cube",
            None,
        );

        let object = scene.object(node).unwrap();
        assert!(object.cast_shadow);
        assert_eq!(scene.node_by_name("cube"), Some(node));

        let material = scene.material_manager.get_material(object.material).unwrap();
        let MaterialKind::Standard(params) = &material.kind else {
            panic!("expected standard material");
        };
        assert_relative_eq!(params.metalness, 0.2);
        assert_relative_eq!(params.roughness, 0.07);
        assert!(params.map.is_none());

        assert_eq!(panel.folder_count(), 2);
        let common = panel.folder_by_name("cube-Material").unwrap();
        let specific = panel.folder_by_name("cube-MeshStandardMaterial").unwrap();
        assert_eq!(panel.folder(common).unwrap().fields().len(), 14);
        assert_eq!(
            panel.folder(specific).unwrap().field_names(),
            vec!["color", "emissive", "metalness", "roughness", "wireframe"]
        );
    }

    #[test]
    fn test_texture_becomes_material_map() {
        let mut scene = Scene::new();
        let mut panel = InspectorPanel::new();
        let texture = Texture::white();
        let image_id = texture.image.id();

        let node = add_geometry(
            &mut scene,
            &mut panel,
            generate_box(1.0, 1.0, 1.0),
            "cube",
            Some(texture),
        );

        let material_id = scene.object(node).unwrap().material;
        let map = scene
            .material_manager
            .get_material(material_id)
            .and_then(|m| m.map())
            .unwrap();
        assert_eq!(map.image.id(), image_id);
    }

    #[test]
    fn test_folder_edits_reach_the_scene_material() {
        let mut scene = Scene::new();
        let mut panel = InspectorPanel::new();
        let node = add_geometry(
            &mut scene,
            &mut panel,
            generate_box(1.0, 1.0, 1.0),
            "cube",
            None,
        );
        let folder = panel.folder_by_name("cube-MeshStandardMaterial").unwrap();

        panel
            .apply(
                FieldEdit::new(folder, "roughness", FieldValue::Number(1.5)),
                &mut scene.material_manager,
            )
            .unwrap();

        let material_id = scene.object(node).unwrap().material;
        let MaterialKind::Standard(params) =
            &scene.material_manager.get_material(material_id).unwrap().kind
        else {
            panic!("expected standard material");
        };
        assert_relative_eq!(params.roughness, 1.0);
    }

    #[test]
    fn test_two_objects_get_independent_folders() {
        let mut scene = Scene::new();
        let mut panel = InspectorPanel::new();
        add_geometry(&mut scene, &mut panel, generate_box(1.0, 1.0, 1.0), "a", None);
        add_geometry(&mut scene, &mut panel, generate_box(1.0, 1.0, 1.0), "b", None);

        assert_eq!(panel.folder_count(), 4);
        let a = panel.folder_by_name("a-Material").unwrap();
        let b = panel.folder_by_name("b-Material").unwrap();
        assert_ne!(
            panel.folder(a).unwrap().material(),
            panel.folder(b).unwrap().material()
        );
    }
}
