//! Demo configuration
//!
//! Every section and field has a default, so an empty file (or no file at
//! all) gives the stock scene.

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default)]
pub struct DemoConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub controls: ControlsConfig,
    pub lighting: LightingConfig,
    pub scene: SceneConfig,
}

impl DemoConfig {
    /// Reads and parses a TOML configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&contents)?;
        log::info!("Loaded configuration from '{}'", path.display());
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Material Lab".to_string(),
            width: 1200,
            height: 800,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub target: [f32; 3],
    /// Vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 20.0, 40.0],
            target: [0.0, 0.0, 0.0],
            fov: 45.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub no_zoom: bool,
    pub no_pan: bool,
    pub static_moving: bool,
    pub dynamic_damping_factor: f32,
    /// Keys held to force rotate, zoom and pan respectively
    pub keys: [String; 3],
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            rotate_speed: 1.0,
            zoom_speed: 1.2,
            pan_speed: 0.8,
            no_zoom: false,
            no_pan: false,
            static_moving: true,
            dynamic_damping_factor: 0.3,
            keys: ["a".to_string(), "s".to_string(), "d".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    pub spot_position: [f32; 3],
    pub shadow_map_size: u32,
    /// Shadow camera field of view in degrees
    pub shadow_fov: f32,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            spot_position: [-10.0, 30.0, 40.0],
            shadow_map_size: 2048,
            shadow_fov: 15.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub cube_size: f32,
    pub cube_texture: String,
    pub ground_y: f32,
    pub floor_texture: String,
    pub use_floor_texture: bool,
    /// Radians added to the cube's rotation every frame
    pub rotation_step: [f32; 3],
    pub clear_color: u32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            cube_size: 10.0,
            cube_texture: "textures/stone.jpg".to_string(),
            ground_y: -10.0,
            floor_texture: "assets/textures/general/floor-wood.jpg".to_string(),
            use_floor_texture: false,
            rotation_step: [0.01, 0.02, 0.03],
            clear_color: 0x000000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = DemoConfig::from_toml("").unwrap();
        assert_eq!(config, DemoConfig::default());
        assert_eq!(config.window.width, 1200);
        assert_eq!(config.camera.position, [0.0, 20.0, 40.0]);
        assert_eq!(config.controls.keys, ["a", "s", "d"]);
        assert_eq!(config.lighting.shadow_map_size, 2048);
        assert_eq!(config.scene.rotation_step, [0.01, 0.02, 0.03]);
    }

    #[test]
    fn test_partial_override_keeps_other_defaults() {
        let config = DemoConfig::from_toml(
            r#"
            [window]
            width = 640

            [controls]
            static_moving = false

            [scene]
            use_floor_texture = true
            clear_color = 0x202020
            "#,
        )
        .unwrap();

        assert_eq!(config.window.width, 640);
        assert_eq!(config.window.height, 800);
        assert!(!config.controls.static_moving);
        assert_eq!(config.controls.rotate_speed, 1.0);
        assert!(config.scene.use_floor_texture);
        assert_eq!(config.scene.clear_color, 0x202020);
        assert_eq!(config.lighting, LightingConfig::default());
    }

    #[test]
    fn test_malformed_toml_is_a_parse_error() {
        let err = DemoConfig::from_toml("[window\nwidth = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let err = DemoConfig::load("no/such/config.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
