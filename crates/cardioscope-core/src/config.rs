//! Viewer configuration.
//!
//! Every field has a default, so an empty JSON object (or no file at all)
//! yields the stock cardiac viewer setup.

use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::error::{CoreError, Result};
use crate::resolver::{MeshId, MeshTable};
use crate::visual::Light;

/// Top-level configuration injected into the viewer at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Mesh id to location table.
    pub meshes: MeshTable,
    /// Directory relative mesh locations are resolved against.
    pub base_dir: PathBuf,
    /// Material applied to every loaded mesh.
    pub material: MaterialPreset,
    /// Lights installed the first time the scene is populated.
    pub lights: Vec<LightPreset>,
    /// Colors at the low and high end of the scalar range.
    pub color: ColorPreset,
    /// Offset along Z applied to the visual object.
    pub z_offset: f32,
    /// Background color of the display.
    pub background: Rgb,
    /// Mesh shown at startup. `None` shows the fallback location.
    pub initial_mesh: Option<MeshId>,
    /// Window settings.
    pub window: WindowConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            meshes: MeshTable::default(),
            base_dir: PathBuf::from("."),
            material: MaterialPreset::default(),
            lights: LightPreset::defaults(),
            color: ColorPreset::default(),
            z_offset: -20.0,
            background: Vec3::splat(0.5),
            initial_mesh: None,
            window: WindowConfig::default(),
        }
    }
}

impl ViewerConfig {
    /// Parses a configuration from JSON text and validates it.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration file. Relative `base_dir` values are taken
    /// relative to the file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| CoreError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_json(&text)?;
        if config.base_dir.is_relative() {
            if let Some(parent) = path.parent() {
                config.base_dir = parent.join(&config.base_dir);
            }
        }
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Loads `path` if given, otherwise returns the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.material.specular) {
            return Err(CoreError::InvalidConfig {
                field: "material.specular",
                reason: format!("{} is outside [0, 1]", self.material.specular),
            });
        }
        if self.material.specular_power < 0.0 {
            return Err(CoreError::InvalidConfig {
                field: "material.specular_power",
                reason: "must not be negative".into(),
            });
        }
        if let Some(light) = self.lights.iter().find(|l| l.intensity < 0.0) {
            return Err(CoreError::InvalidConfig {
                field: "lights.intensity",
                reason: format!("negative intensity {}", light.intensity),
            });
        }
        if self.window.width == 0 || self.window.height == 0 {
            return Err(CoreError::InvalidConfig {
                field: "window",
                reason: "width and height must be positive".into(),
            });
        }
        Ok(())
    }

    /// Resolves a mesh id to a path under `base_dir`.
    pub fn mesh_path(&self, id: MeshId) -> PathBuf {
        self.base_dir.join(self.meshes.resolve(id))
    }

    /// The id loaded at startup.
    pub fn startup_mesh(&self) -> MeshId {
        self.initial_mesh
            .unwrap_or_else(|| self.meshes.fallback_id())
    }
}

/// Surface material applied to the visual object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialPreset {
    /// Specular coefficient in `[0, 1]`.
    pub specular: f32,
    /// Specular exponent.
    pub specular_power: f32,
    /// Color used when no scalar mapping is active.
    pub diffuse_color: Rgb,
}

impl Default for MaterialPreset {
    fn default() -> Self {
        Self {
            specular: 0.75,
            specular_power: 20.0,
            diffuse_color: Vec3::ONE,
        }
    }
}

/// A positional light.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightPreset {
    pub position: Vec3,
    pub focal_point: Vec3,
    pub intensity: f32,
    pub color: Rgb,
}

impl Default for LightPreset {
    fn default() -> Self {
        Self {
            position: Vec3::ONE,
            focal_point: Vec3::ZERO,
            intensity: 1.0,
            color: Vec3::ONE,
        }
    }
}

impl LightPreset {
    /// The stock three-light rig.
    pub fn defaults() -> Vec<Self> {
        [
            (Vec3::new(1.0, 1.0, 1.0), 0.5),
            (Vec3::new(-1.0, -1.0, -1.0), 0.7),
            (Vec3::new(0.0, 1.0, -1.0), 0.9),
        ]
        .into_iter()
        .map(|(position, intensity)| Self {
            position,
            intensity,
            ..Self::default()
        })
        .collect()
    }

    /// Builds the scene light.
    pub fn to_light(&self) -> Light {
        Light {
            position: self.position,
            focal_point: self.focal_point,
            intensity: self.intensity,
            color: self.color,
        }
    }
}

/// End colors of the scalar color ramp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorPreset {
    /// Color at the range minimum.
    pub low: Rgb,
    /// Color at the range maximum.
    pub high: Rgb,
}

impl Default for ColorPreset {
    fn default() -> Self {
        Self {
            low: Vec3::new(0.5, 0.0, 0.0),
            high: Vec3::new(0.1, 0.0, 1.0),
        }
    }
}

/// Window settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "cardioscope".to_string(),
            width: 1280,
            height: 800,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ViewerConfig::default();
        assert_eq!(config.material.specular, 0.75);
        assert_eq!(config.material.specular_power, 20.0);
        assert_eq!(config.z_offset, -20.0);
        let intensities: Vec<f32> = config.lights.iter().map(|l| l.intensity).collect();
        assert_eq!(intensities, vec![0.5, 0.7, 0.9]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_json_gives_defaults() {
        let config = ViewerConfig::from_json("{}").unwrap();
        assert_eq!(config, ViewerConfig::default());
    }

    #[test]
    fn test_partial_json_overrides() {
        let config = ViewerConfig::from_json(
            r#"{
                "meshes": { "entries": { "5": "five.vtk" }, "fallback": "none.vtk" },
                "z_offset": -5.0,
                "material": { "specular": 0.2 }
            }"#,
        )
        .unwrap();
        assert_eq!(config.meshes.resolve(5), "five.vtk");
        assert_eq!(config.meshes.resolve(0), "none.vtk");
        assert_eq!(config.z_offset, -5.0);
        assert_eq!(config.material.specular, 0.2);
        assert_eq!(config.material.specular_power, 20.0);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = ViewerConfig::from_json(r#"{ "material": { "specular": 1.5 } }"#).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidConfig {
                field: "material.specular",
                ..
            }
        ));
        assert!(ViewerConfig::from_json("{ not json").is_err());
    }

    #[test]
    fn test_startup_mesh_defaults_to_fallback() {
        let config = ViewerConfig::default();
        let id = config.startup_mesh();
        assert_eq!(config.meshes.resolve(id), config.meshes.fallback);
        assert_eq!(
            config.mesh_path(0),
            PathBuf::from(".").join("data/healthy.vtk")
        );
    }

    #[test]
    fn test_missing_config_file() {
        let err = ViewerConfig::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, CoreError::ConfigRead { .. }));
    }
}
