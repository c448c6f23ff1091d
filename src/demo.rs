//! Stock demo scene: a textured cube spinning above a ground plane

use std::path::Path;

use cgmath::Vector3;

use crate::{
    config::DemoConfig,
    factory::add_geometry,
    gfx::{
        geometry::generate_box,
        resources::{Color, Texture, TextureLoader},
        scene::{
            builder::{build_ground_plane, init_default_lighting_with},
            AmbientLight, NodeId, Scene,
        },
    },
    inspector::InspectorPanel,
};

const FILL_LIGHT_COLOR: u32 = 0x444444;

/// Everything the app owns besides the window and the GPU
pub struct DemoScene {
    pub scene: Scene,
    pub panel: InspectorPanel,
    pub cube: NodeId,
}

#[derive(Default)]
pub struct DemoTextures {
    pub cube: Option<Texture>,
    pub floor: Option<Texture>,
}

impl DemoTextures {
    /// Loads the cube texture and, when enabled, the floor texture
    ///
    /// A texture that fails to load is left out and its object renders
    /// untextured.
    pub fn load(config: &DemoConfig, cube_override: Option<&Path>) -> Self {
        let loader = TextureLoader::new();
        let cube_path = cube_override.unwrap_or_else(|| Path::new(&config.scene.cube_texture));
        let floor = config
            .scene
            .use_floor_texture
            .then(|| load_or_warn(&loader, Path::new(&config.scene.floor_texture)))
            .flatten();

        Self {
            cube: load_or_warn(&loader, cube_path),
            floor,
        }
    }
}

fn load_or_warn(loader: &TextureLoader, path: &Path) -> Option<Texture> {
    match loader.load(path) {
        Ok(texture) => Some(texture),
        Err(e) => {
            log::warn!("Rendering without texture '{}': {}", path.display(), e);
            None
        }
    }
}

/// Composes the demo scene and its inspector panel
pub fn build_demo_scene(config: &DemoConfig, textures: DemoTextures) -> DemoScene {
    let mut scene = Scene::new();
    let mut panel = InspectorPanel::new();
    scene.background = Color::from_hex(config.scene.clear_color);

    let ground = build_ground_plane(&mut scene, textures.floor);
    if let Some(plane) = scene.object_mut(ground) {
        plane.set_translation(Vector3::new(0.0, config.scene.ground_y, 0.0));
    }

    init_default_lighting_with(&mut scene, &config.lighting);
    scene.add_ambient_light(None, AmbientLight::new(Color::from_hex(FILL_LIGHT_COLOR)));

    let size = config.scene.cube_size;
    let cube = add_geometry(
        &mut scene,
        &mut panel,
        generate_box(size, size, size),
        "cube",
        textures.cube,
    );

    let stats = scene.get_statistics();
    log::info!("Demo scene ready: {:?}", stats);

    DemoScene { scene, panel, cube }
}
