use crate::gfx::resources::{
    color::Color,
    material::{Material, MaterialId, MaterialManager},
};

use super::{
    light::{AmbientLight, SpotLight},
    object::Object,
};

/// Index of a node in its scene
///
/// Nodes are never removed, so an id stays valid for the life of the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// What a scene node is
#[derive(Debug, Clone)]
pub enum NodeKind {
    Mesh(Object),
    SpotLight(SpotLight),
    AmbientLight(AmbientLight),
}

/// A scene entry with an optional display name
#[derive(Debug, Clone)]
pub struct Node {
    pub name: Option<String>,
    pub kind: NodeKind,
}

/// Main scene containing objects, lights and materials
pub struct Scene {
    nodes: Vec<Node>,
    pub material_manager: MaterialManager, // Centralized material storage
    pub background: Color,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            material_manager: MaterialManager::new(),
            background: Color::BLACK,
        }
    }

    /// Appends a node and returns its id
    pub fn add(&mut self, name: Option<&str>, kind: NodeKind) -> NodeId {
        self.nodes.push(Node {
            name: name.map(str::to_string),
            kind,
        });
        NodeId(self.nodes.len() - 1)
    }

    pub fn add_object(&mut self, name: Option<&str>, object: Object) -> NodeId {
        self.add(name, NodeKind::Mesh(object))
    }

    pub fn add_spot_light(&mut self, name: Option<&str>, light: SpotLight) -> NodeId {
        self.add(name, NodeKind::SpotLight(light))
    }

    pub fn add_ambient_light(&mut self, name: Option<&str>, light: AmbientLight) -> NodeId {
        self.add(name, NodeKind::AmbientLight(light))
    }

    /// Registers a material with the scene's material manager
    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.material_manager.add_material(material)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// First node carrying `name`
    pub fn node_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|node| node.name.as_deref() == Some(name))
            .map(NodeId)
    }

    pub fn object(&self, id: NodeId) -> Option<&Object> {
        match self.node(id).map(|node| &node.kind) {
            Some(NodeKind::Mesh(object)) => Some(object),
            _ => None,
        }
    }

    pub fn object_mut(&mut self, id: NodeId) -> Option<&mut Object> {
        match self.node_mut(id).map(|node| &mut node.kind) {
            Some(NodeKind::Mesh(object)) => Some(object),
            _ => None,
        }
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeId(index), node))
    }

    /// Every mesh in insertion order
    pub fn objects(&self) -> impl Iterator<Item = (NodeId, &Object)> {
        self.nodes().filter_map(|(id, node)| match &node.kind {
            NodeKind::Mesh(object) => Some((id, object)),
            _ => None,
        })
    }

    pub fn spot_lights(&self) -> impl Iterator<Item = &SpotLight> {
        self.nodes.iter().filter_map(|node| match &node.kind {
            NodeKind::SpotLight(light) => Some(light),
            _ => None,
        })
    }

    /// Sum of all ambient light contributions
    pub fn ambient_radiance(&self) -> [f32; 3] {
        self.nodes
            .iter()
            .filter_map(|node| match &node.kind {
                NodeKind::AmbientLight(light) => Some(light.radiance()),
                _ => None,
            })
            .fold([0.0; 3], |acc, c| [acc[0] + c[0], acc[1] + c[1], acc[2] + c[2]])
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Gets statistics about the scene
    pub fn get_statistics(&self) -> SceneStatistics {
        let (object_count, total_triangles, total_vertices) =
            self.objects().fold((0, 0, 0), |(count, tris, verts), (_, object)| {
                (
                    count + 1,
                    tris + object.geometry.triangle_count(),
                    verts + object.geometry.vertex_count(),
                )
            });

        SceneStatistics {
            node_count: self.nodes.len(),
            object_count,
            material_count: self.material_manager.len(),
            total_triangles,
            total_vertices,
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

/// Scene statistics for debugging and UI display
#[derive(Debug, PartialEq, Eq)]
pub struct SceneStatistics {
    pub node_count: usize,
    pub object_count: usize,
    pub material_count: usize,
    pub total_triangles: usize,
    pub total_vertices: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::generate_box;

    #[test]
    fn test_node_ids_follow_insertion_order() {
        let mut scene = Scene::new();
        let material = scene.add_material(Material::normal());
        let a = scene.add_object(Some("a"), Object::new(generate_box(1.0, 1.0, 1.0), material));
        let b = scene.add_ambient_light(None, AmbientLight::new(Color::WHITE));
        let c = scene.add_object(Some("a"), Object::new(generate_box(1.0, 1.0, 1.0), material));

        assert_eq!((a, b, c), (NodeId(0), NodeId(1), NodeId(2)));
        assert_eq!(scene.node_by_name("a"), Some(a));
        assert!(scene.object(b).is_none());
        assert!(scene.object(c).is_some());
    }

    #[test]
    fn test_ambient_radiance_sums_lights() {
        let mut scene = Scene::new();
        scene.add_ambient_light(None, AmbientLight::new(Color::from_hex(0x343434)));
        scene.add_ambient_light(None, AmbientLight::new(Color::from_hex(0x444444)));
        let [r, _, _] = scene.ambient_radiance();
        approx::assert_relative_eq!(r, (0x34 + 0x44) as f32 / 255.0, epsilon = 1e-6);
    }

    #[test]
    fn test_statistics() {
        let mut scene = Scene::new();
        let material = scene.add_material(Material::normal());
        scene.add_object(None, Object::new(generate_box(1.0, 1.0, 1.0), material));
        scene.add_spot_light(None, SpotLight::new(Color::WHITE));

        assert_eq!(
            scene.get_statistics(),
            SceneStatistics {
                node_count: 2,
                object_count: 1,
                material_count: 1,
                total_triangles: 12,
                total_vertices: 24,
            }
        );
    }
}
