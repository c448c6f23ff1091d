//! Frame draw ordering
//!
//! Opaque draws go first in scene order, then transparent draws from the
//! farthest to the nearest so blending composites correctly.

use cgmath::{InnerSpace, Vector3};

use crate::gfx::{
    resources::material::MaterialId,
    scene::{NodeId, Scene},
};

use super::pipeline_manager::PipelineKey;

#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub node: NodeId,
    pub material: MaterialId,
    pub key: PipelineKey,
    pub transparent: bool,
    pub cast_shadow: bool,
    /// Squared distance from the camera eye
    pub depth: f32,
}

/// Visible objects of `scene` in submission order
///
/// Objects are skipped when hidden, when their material is hidden, or when
/// their material id is unknown.
pub fn plan_draws(scene: &Scene, eye: Vector3<f32>) -> Vec<DrawItem> {
    let mut opaque = Vec::new();
    let mut transparent = Vec::new();

    for (node, object) in scene.objects() {
        if !object.visible {
            continue;
        }
        let Some(material) = scene.material_manager.get_material(object.material) else {
            log::warn!("Node {} references unknown material {}", node.0, object.material);
            continue;
        };
        if !material.common.visible {
            continue;
        }

        let item = DrawItem {
            node,
            material: object.material,
            key: PipelineKey::for_material(&material.common, material.wireframe()),
            transparent: material.common.transparent,
            cast_shadow: object.cast_shadow,
            depth: (object.position - eye).magnitude2(),
        };
        if item.transparent {
            transparent.push(item);
        } else {
            opaque.push(item);
        }
    }

    transparent.sort_by(|a, b| b.depth.total_cmp(&a.depth));
    opaque.extend(transparent);
    opaque
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{
        geometry::generate_box,
        resources::material::{Material, MaterialKind, NormalParams},
        scene::Object,
    };
    use cgmath::Zero;

    fn add_box(scene: &mut Scene, material: MaterialId, z: f32) -> NodeId {
        let mut object = Object::new(generate_box(1.0, 1.0, 1.0), material);
        object.set_translation(Vector3::new(0.0, 0.0, z));
        scene.add_object(None, object)
    }

    #[test]
    fn test_transparent_draws_follow_opaque_far_to_near() {
        let mut scene = Scene::new();
        let opaque = scene.add_material(Material::normal());
        let mut glass = Material::normal();
        glass.common.transparent = true;
        let glass = scene.add_material(glass);

        let near = add_box(&mut scene, glass, 1.0);
        let solid = add_box(&mut scene, opaque, 5.0);
        let far = add_box(&mut scene, glass, 10.0);

        let order: Vec<_> = plan_draws(&scene, Vector3::zero())
            .into_iter()
            .map(|item| item.node)
            .collect();
        assert_eq!(order, vec![solid, far, near]);
    }

    #[test]
    fn test_hidden_objects_and_materials_are_skipped() {
        let mut scene = Scene::new();
        let shown = scene.add_material(Material::normal());
        let mut hidden = Material::normal();
        hidden.common.visible = false;
        let hidden = scene.add_material(hidden);

        let visible_node = add_box(&mut scene, shown, 0.0);
        add_box(&mut scene, hidden, 0.0);
        let hidden_node = add_box(&mut scene, shown, 0.0);
        scene.object_mut(hidden_node).unwrap().visible = false;
        add_box(&mut scene, MaterialId(999), 0.0);

        let draws = plan_draws(&scene, Vector3::zero());
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].node, visible_node);
    }

    #[test]
    fn test_wireframe_material_selects_line_pipeline() {
        let mut scene = Scene::new();
        let wire = scene.add_material(Material::new(MaterialKind::Normal(NormalParams {
            wireframe: true,
        })));
        add_box(&mut scene, wire, 0.0);
        let draws = plan_draws(&scene, Vector3::zero());
        assert!(draws[0].key.wireframe);
    }
}
