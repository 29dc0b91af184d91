//! Viewer configuration
//!
//! Everything is optional in the TOML file; missing fields take the defaults
//! below.
//!
//! ```toml
//! [window]
//! title = "Vantage"
//! width = 1280
//!
//! [camera]
//! fov = 45.0
//! position = [0.0, 10.0, 20.0]
//!
//! [scene.model]
//! obj = "assets/windmill.obj"
//! mtl = "assets/windmill.mtl"
//! ```

use std::path::{Path, PathBuf};

use cgmath::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ViewerConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub scene: SceneConfig,
}

impl ViewerConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Loads `path`, logging and falling back to defaults on any failure
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => {
                log::info!("Loaded configuration from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!(
                    "Could not load configuration from {}: {}, using defaults",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Vantage".to_string(),
            width: 1280,
            height: 720,
            vsync: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
    pub target: [f32; 3],
}

impl CameraConfig {
    pub fn position(&self) -> Vector3<f32> {
        self.position.into()
    }

    pub fn target(&self) -> Vector3<f32> {
        self.target.into()
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 45.0,
            near: 0.1,
            far: 100.0,
            position: [0.0, 10.0, 20.0],
            target: [0.0, 5.0, 0.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub model: Option<ModelConfig>,
    /// Image wrapped around the scene as an equirectangular background
    pub background: Option<PathBuf>,
    /// Image mapped onto the spinning cubes
    pub cube_texture: Option<PathBuf>,
    pub plate: PlateConfig,
    pub spinning_cubes: bool,
    /// Edge length of the square ground plane; 0 disables it
    pub ground_size: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            model: Some(ModelConfig::default()),
            background: Some(PathBuf::from("assets/background.jpg")),
            cube_texture: Some(PathBuf::from("assets/pic.jpg")),
            plate: PlateConfig::default(),
            spinning_cubes: true,
            ground_size: 40.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub obj: PathBuf,
    #[serde(default)]
    pub mtl: Option<PathBuf>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            obj: PathBuf::from("assets/model.obj"),
            mtl: Some(PathBuf::from("assets/model.mtl")),
        }
    }
}

/// Ring of primitives around the origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlateConfig {
    pub radii: Vec<f32>,
    /// Step between angle indices; indices run over 0..360
    pub angle_step: u32,
    pub height: f32,
    /// Uniform scale of each primitive
    pub scale: f32,
}

impl Default for PlateConfig {
    fn default() -> Self {
        Self {
            radii: vec![4.0, 6.0, 8.0],
            angle_step: 45,
            height: 0.5,
            scale: 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        assert_eq!(ViewerConfig::from_toml("").unwrap(), ViewerConfig::default());
    }

    #[test]
    fn test_partial_sections() {
        let config = ViewerConfig::from_toml(
            r#"
            [camera]
            fov = 60.0

            [scene]
            spinning_cubes = false

            [scene.model]
            obj = "boat.obj"
            "#,
        )
        .unwrap();

        assert_eq!(config.camera.fov, 60.0);
        assert_eq!(config.camera.near, 0.1);
        assert!(!config.scene.spinning_cubes);
        let model = config.scene.model.unwrap();
        assert_eq!(model.obj, PathBuf::from("boat.obj"));
        assert!(model.mtl.is_none());
        assert_eq!(config.window, WindowConfig::default());
    }

    #[test]
    fn test_parse_error() {
        let err = ViewerConfig::from_toml("[camera]\nfov = \"wide\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let config = ViewerConfig::load_or_default("/nonexistent/vantage.toml");
        assert_eq!(config, ViewerConfig::default());
    }
}
