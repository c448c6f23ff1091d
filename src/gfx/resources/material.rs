//! Material system
//!
//! A [`Material`] is a set of fields shared by every kind plus a closed
//! [`MaterialKind`] carrying the kind-specific parameters. Materials are stored
//! in the [`MaterialManager`] and objects reference them by [`MaterialId`].

use std::collections::BTreeMap;

use super::{color::Color, texture::Texture};

/// Material ID for referencing materials
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MaterialId(pub u32);

impl std::fmt::Display for MaterialId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which faces are rendered (or cast shadows)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Side {
    #[default]
    Front,
    Back,
    Both,
}

impl Side {
    pub fn code(self) -> i32 {
        match self {
            Side::Front => 0,
            Side::Back => 1,
            Side::Both => 2,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Side::Front),
            1 => Some(Side::Back),
            2 => Some(Side::Both),
            _ => None,
        }
    }

    /// Faces to cull when drawing with counter-clockwise front faces
    pub fn cull_mode(self) -> Option<wgpu::Face> {
        match self {
            Side::Front => Some(wgpu::Face::Back),
            Side::Back => Some(wgpu::Face::Front),
            Side::Both => None,
        }
    }
}

/// Vertex coloring mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VertexColors {
    #[default]
    None,
    Face,
    Vertex,
}

impl VertexColors {
    pub fn code(self) -> i32 {
        match self {
            VertexColors::None => 0,
            VertexColors::Face => 1,
            VertexColors::Vertex => 2,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(VertexColors::None),
            1 => Some(VertexColors::Face),
            2 => Some(VertexColors::Vertex),
            _ => None,
        }
    }
}

/// Fields every material kind carries
#[derive(Debug, Clone)]
pub struct MaterialCommon {
    pub id: MaterialId,
    pub uuid: String,
    pub name: String,
    pub opacity: f32,
    pub transparent: bool,
    pub visible: bool,
    pub side: Side,
    pub color_write: bool,
    pub flat_shading: bool,
    pub premultiplied_alpha: bool,
    pub dithering: bool,
    pub shadow_side: Side,
    pub vertex_colors: VertexColors,
    pub fog: bool,
    version: u32,
}

impl Default for MaterialCommon {
    fn default() -> Self {
        Self {
            id: MaterialId(0),
            uuid: uuid::Uuid::new_v4().to_string(),
            name: String::new(),
            opacity: 1.0,
            transparent: false,
            visible: true,
            side: Side::Front,
            color_write: true,
            flat_shading: false,
            premultiplied_alpha: false,
            dithering: false,
            shadow_side: Side::Front,
            vertex_colors: VertexColors::None,
            fog: true,
            version: 0,
        }
    }
}

impl MaterialCommon {
    /// Counter bumped whenever derived GPU state must be rebuilt
    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn mark_needs_update(&mut self) {
        self.version = self.version.wrapping_add(1);
    }
}

/// Normal-visualizing material
#[derive(Debug, Clone, Default)]
pub struct NormalParams {
    pub wireframe: bool,
}

/// Blinn-Phong material with a specular highlight
#[derive(Debug, Clone)]
pub struct PhongParams {
    pub color: Color,
    pub specular: Color,
    pub shininess: f32,
    pub emissive: Color,
    pub map: Option<Texture>,
    pub wireframe: bool,
}

impl Default for PhongParams {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            specular: Color::from_hex(0x111111),
            shininess: 30.0,
            emissive: Color::BLACK,
            map: None,
            wireframe: false,
        }
    }
}

/// Metallic/roughness material
#[derive(Debug, Clone)]
pub struct StandardParams {
    pub color: Color,
    pub emissive: Color,
    pub metalness: f32,
    pub roughness: f32,
    pub map: Option<Texture>,
    pub wireframe: bool,
}

impl Default for StandardParams {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            emissive: Color::BLACK,
            metalness: 0.5,
            roughness: 0.5,
            map: None,
            wireframe: false,
        }
    }
}

/// Unlit material
#[derive(Debug, Clone, Default)]
pub struct BasicParams {
    pub color: Color,
    pub map: Option<Texture>,
    pub wireframe: bool,
}

/// Diffuse-only material
#[derive(Debug, Clone)]
pub struct LambertParams {
    pub color: Color,
    pub emissive: Color,
    pub map: Option<Texture>,
    pub wireframe: bool,
}

impl Default for LambertParams {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            emissive: Color::BLACK,
            map: None,
            wireframe: false,
        }
    }
}

/// Kind-specific material parameters
#[derive(Debug, Clone)]
pub enum MaterialKind {
    Normal(NormalParams),
    Phong(PhongParams),
    Standard(StandardParams),
    Basic(BasicParams),
    Lambert(LambertParams),
}

impl MaterialKind {
    /// Engine type name, used for default inspector folder names
    pub fn type_name(&self) -> &'static str {
        match self {
            MaterialKind::Normal(_) => "MeshNormalMaterial",
            MaterialKind::Phong(_) => "MeshPhongMaterial",
            MaterialKind::Standard(_) => "MeshStandardMaterial",
            MaterialKind::Basic(_) => "MeshBasicMaterial",
            MaterialKind::Lambert(_) => "MeshLambertMaterial",
        }
    }
}

/// Material definition
#[derive(Debug, Clone)]
pub struct Material {
    pub common: MaterialCommon,
    pub kind: MaterialKind,
}

impl Material {
    pub fn new(kind: MaterialKind) -> Self {
        Self {
            common: MaterialCommon::default(),
            kind,
        }
    }

    pub fn normal() -> Self {
        Self::new(MaterialKind::Normal(NormalParams::default()))
    }

    pub fn phong(params: PhongParams) -> Self {
        Self::new(MaterialKind::Phong(params))
    }

    pub fn standard(params: StandardParams) -> Self {
        Self::new(MaterialKind::Standard(params))
    }

    pub fn basic(params: BasicParams) -> Self {
        Self::new(MaterialKind::Basic(params))
    }

    pub fn lambert(params: LambertParams) -> Self {
        Self::new(MaterialKind::Lambert(params))
    }

    /// Builder pattern: Set the display name
    pub fn with_name(mut self, name: &str) -> Self {
        self.common.name = name.to_string();
        self
    }

    pub fn id(&self) -> MaterialId {
        self.common.id
    }

    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    /// Diffuse color, if the kind has one
    pub fn color(&self) -> Option<Color> {
        match &self.kind {
            MaterialKind::Normal(_) => None,
            MaterialKind::Phong(p) => Some(p.color),
            MaterialKind::Standard(p) => Some(p.color),
            MaterialKind::Basic(p) => Some(p.color),
            MaterialKind::Lambert(p) => Some(p.color),
        }
    }

    pub fn emissive(&self) -> Color {
        match &self.kind {
            MaterialKind::Phong(p) => p.emissive,
            MaterialKind::Standard(p) => p.emissive,
            MaterialKind::Lambert(p) => p.emissive,
            MaterialKind::Normal(_) | MaterialKind::Basic(_) => Color::BLACK,
        }
    }

    pub fn map(&self) -> Option<&Texture> {
        match &self.kind {
            MaterialKind::Normal(_) => None,
            MaterialKind::Phong(p) => p.map.as_ref(),
            MaterialKind::Standard(p) => p.map.as_ref(),
            MaterialKind::Basic(p) => p.map.as_ref(),
            MaterialKind::Lambert(p) => p.map.as_ref(),
        }
    }

    pub fn wireframe(&self) -> bool {
        match &self.kind {
            MaterialKind::Normal(p) => p.wireframe,
            MaterialKind::Phong(p) => p.wireframe,
            MaterialKind::Standard(p) => p.wireframe,
            MaterialKind::Basic(p) => p.wireframe,
            MaterialKind::Lambert(p) => p.wireframe,
        }
    }

    pub fn wireframe_mut(&mut self) -> &mut bool {
        match &mut self.kind {
            MaterialKind::Normal(p) => &mut p.wireframe,
            MaterialKind::Phong(p) => &mut p.wireframe,
            MaterialKind::Standard(p) => &mut p.wireframe,
            MaterialKind::Basic(p) => &mut p.wireframe,
            MaterialKind::Lambert(p) => &mut p.wireframe,
        }
    }
}

/// Owns every material in a scene
///
/// Ids are handed out in insertion order starting at zero, so iteration
/// order is stable.
pub struct MaterialManager {
    materials: BTreeMap<MaterialId, Material>,
    next_id: u32,
}

impl MaterialManager {
    pub fn new() -> Self {
        Self {
            materials: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// Adds a material, assigning it a fresh id
    pub fn add_material(&mut self, mut material: Material) -> MaterialId {
        let id = MaterialId(self.next_id);
        self.next_id += 1;
        material.common.id = id;
        self.materials.insert(id, material);
        id
    }

    pub fn get_material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(&id)
    }

    pub fn get_material_mut(&mut self, id: MaterialId) -> Option<&mut Material> {
        self.materials.get_mut(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Material> {
        self.materials.values()
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

impl Default for MaterialManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_sequential() {
        let mut manager = MaterialManager::new();
        let first = manager.add_material(Material::normal());
        let second = manager.add_material(Material::standard(StandardParams::default()));
        assert_eq!(first, MaterialId(0));
        assert_eq!(second, MaterialId(1));
        assert_eq!(manager.get_material(second).unwrap().id(), second);
    }

    #[test]
    fn test_codes_round_trip() {
        for side in [Side::Front, Side::Back, Side::Both] {
            assert_eq!(Side::from_code(side.code()), Some(side));
        }
        assert_eq!(Side::from_code(3), None);
        assert_eq!(VertexColors::from_code(2), Some(VertexColors::Vertex));
        assert_eq!(VertexColors::from_code(-1), None);
    }

    #[test]
    fn test_uuid_is_unique_per_material() {
        let a = Material::normal();
        let b = Material::normal();
        assert_ne!(a.common.uuid, b.common.uuid);
        assert_eq!(a.common.uuid.len(), 36);
    }

    #[test]
    fn test_needs_update_bumps_version() {
        let mut material = Material::normal();
        let before = material.common.version();
        material.common.mark_needs_update();
        assert_eq!(material.common.version(), before + 1);
    }
}
