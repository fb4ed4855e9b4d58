use arplace_assets::{DEFAULT_MODEL_EXTENSION, DEFAULT_THUMBNAIL_EXTENSIONS, ResourceBundle};
use arplace_scene::{AlignmentFilter, PlaneDetection, SceneReconstruction, SessionConfig};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CatalogSection {
    pub resources: PathBuf,
    pub model_extension: String,
    pub thumbnail_extensions: Vec<String>,
}

impl Default for CatalogSection {
    fn default() -> Self {
        Self {
            resources: PathBuf::from("assets"),
            model_extension: DEFAULT_MODEL_EXTENSION.to_string(),
            thumbnail_extensions: DEFAULT_THUMBNAIL_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoaderSection {
    pub workers: usize,
}

impl Default for LoaderSection {
    fn default() -> Self {
        Self { workers: 2 }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SessionSection {
    pub horizontal_planes: bool,
    pub vertical_planes: bool,
    pub scene_reconstruction: bool,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            horizontal_planes: true,
            vertical_planes: true,
            scene_reconstruction: true,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaneTarget {
    #[default]
    Any,
    Horizontal,
    Vertical,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PlacementSection {
    pub alignment: PlaneTarget,
}

/// Contents of `arplace.toml`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub catalog: CatalogSection,
    pub loader: LoaderSection,
    pub session: SessionSection,
    pub placement: PlacementSection,
}

impl AppConfig {
    pub const FILE_NAME: &'static str = "arplace.toml";

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// A missing file is not an error; it yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml(&text),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|err| {
            log::error!("{err}; using default configuration");
            Self::default()
        })
    }

    pub fn bundle(&self) -> ResourceBundle {
        ResourceBundle::new(&self.catalog.resources, &self.catalog.model_extension)
            .with_thumbnail_extensions(self.catalog.thumbnail_extensions.iter().cloned())
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            plane_detection: PlaneDetection {
                horizontal: self.session.horizontal_planes,
                vertical: self.session.vertical_planes,
            },
            scene_reconstruction: if self.session.scene_reconstruction {
                SceneReconstruction::Mesh
            } else {
                SceneReconstruction::Disabled
            },
        }
    }

    pub fn alignment(&self) -> AlignmentFilter {
        match self.placement.alignment {
            PlaneTarget::Any => AlignmentFilter::Any,
            PlaneTarget::Horizontal => AlignmentFilter::Horizontal,
            PlaneTarget::Vertical => AlignmentFilter::Vertical,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config.catalog.resources, PathBuf::from("assets"));
        assert_eq!(config.bundle().model_extension(), "glb");
        assert_eq!(config.loader.workers, 2);
        assert_eq!(config.alignment(), AlignmentFilter::Any);
        assert_eq!(config.session_config(), SessionConfig::default());
    }

    #[test]
    fn sections_override_defaults() {
        let config = AppConfig::from_toml(
            r#"
[catalog]
resources = "bundle"
model_extension = "usdz"

[session]
vertical_planes = false
scene_reconstruction = false

[placement]
alignment = "horizontal"
"#,
        )
        .unwrap();

        assert_eq!(config.bundle().root(), Path::new("bundle"));
        assert_eq!(config.bundle().model_file_name("toy"), "toy.usdz");
        assert_eq!(config.alignment(), AlignmentFilter::Horizontal);

        let session = config.session_config();
        assert!(session.plane_detection.horizontal);
        assert!(!session.plane_detection.vertical);
        assert_eq!(session.scene_reconstruction, SceneReconstruction::Disabled);
    }

    #[test]
    fn bad_values_are_rejected() {
        let err = AppConfig::from_toml("[placement]\nalignment = \"diagonal\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join(AppConfig::FILE_NAME)).unwrap();
        assert_eq!(config.loader.workers, 2);
    }

    #[test]
    fn malformed_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(AppConfig::FILE_NAME);
        std::fs::write(&path, "[loader\nworkers = ").unwrap();

        assert!(AppConfig::load(&path).is_err());
        assert_eq!(AppConfig::load_or_default(&path).loader.workers, 2);
    }
}
