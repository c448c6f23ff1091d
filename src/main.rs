use std::path::PathBuf;

use anyhow::Result;
use cgmath::Vector3;
use clap::Parser;

use material_lab::{
    app::MaterialLabApp,
    config::DemoConfig,
    demo::{build_demo_scene, DemoTextures},
    frame_loop::FrameLoop,
};

/// Spinning textured cube with a live material inspector
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Cube texture, overriding the configured one
    #[arg(long)]
    texture: Option<PathBuf>,

    /// Tile the configured floor texture over the ground plane
    #[arg(long)]
    floor_texture: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => DemoConfig::load(path)?,
        None => DemoConfig::default(),
    };
    if args.floor_texture {
        config.scene.use_floor_texture = true;
    }

    let textures = DemoTextures::load(&config, args.texture.as_deref());
    let demo = build_demo_scene(&config, textures);
    let frame_loop = FrameLoop::new(demo.cube, Vector3::from(config.scene.rotation_step));

    MaterialLabApp::new(config, demo, frame_loop).run()
}
