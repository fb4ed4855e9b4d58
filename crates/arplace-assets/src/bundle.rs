use crate::thumbnail::Thumbnail;
use std::io;
use std::path::{Path, PathBuf};

pub const DEFAULT_MODEL_EXTENSION: &str = "glb";
pub const DEFAULT_THUMBNAIL_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Read-only directory of bundled resources. Its contents are the catalog:
/// every file carrying the model extension is one model, and a same-named
/// image next to it is that model's thumbnail.
#[derive(Debug, Clone)]
pub struct ResourceBundle {
    root: PathBuf,
    model_extension: String,
    thumbnail_extensions: Vec<String>,
}

impl ResourceBundle {
    pub fn new(root: impl Into<PathBuf>, model_extension: impl Into<String>) -> Self {
        let model_extension: String = model_extension.into();
        Self {
            root: root.into(),
            model_extension: model_extension.trim_start_matches('.').to_string(),
            thumbnail_extensions: DEFAULT_THUMBNAIL_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }

    pub fn with_thumbnail_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.thumbnail_extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn model_extension(&self) -> &str {
        &self.model_extension
    }

    pub fn model_file_name(&self, identifier: &str) -> String {
        format!("{identifier}.{}", self.model_extension)
    }

    /// The identifier for `file_name`, or `None` if it is not a model file.
    pub fn model_identifier<'a>(&self, file_name: &'a str) -> Option<&'a str> {
        if file_name.starts_with('.') {
            return None;
        }
        let path = Path::new(file_name);
        let ext = path.extension()?.to_str()?;
        if ext != self.model_extension {
            return None;
        }
        path.file_stem()?.to_str().filter(|stem| !stem.is_empty())
    }

    /// Regular files in the bundle, in directory order.
    pub fn file_names(&self) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    log::warn!("skipping unreadable entry in {}: {err}", self.root.display());
                    continue;
                }
            };

            match entry.metadata() {
                Ok(meta) if meta.is_file() => {}
                Ok(_) => continue,
                Err(err) => {
                    log::warn!("skipping {}: {err}", entry.path().display());
                    continue;
                }
            }

            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(name) => log::warn!("skipping non UTF-8 file name {name:?}"),
            }
        }
        Ok(names)
    }

    pub fn thumbnail_path(&self, identifier: &str) -> Option<PathBuf> {
        self.thumbnail_extensions
            .iter()
            .map(|ext| self.root.join(format!("{identifier}.{ext}")))
            .find(|path| path.is_file())
    }

    /// Absent or undecodable thumbnails both come back as `None`.
    pub fn load_thumbnail(&self, identifier: &str) -> Option<Thumbnail> {
        let path = self.thumbnail_path(identifier)?;
        match Thumbnail::open(&path) {
            Ok(thumbnail) => Some(thumbnail),
            Err(err) => {
                log::warn!("ignoring thumbnail {}: {err}", path.display());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_strips_only_the_model_extension() {
        let bundle = ResourceBundle::new("assets", "glb");

        assert_eq!(bundle.model_identifier("chair.glb"), Some("chair"));
        assert_eq!(bundle.model_identifier("Chair.GLB"), None);
        assert_eq!(bundle.model_identifier("toy.robot.glb"), Some("toy.robot"));
        assert_eq!(bundle.model_identifier("chair.png"), None);
        assert_eq!(bundle.model_identifier("chairglb"), None);
        assert_eq!(bundle.model_identifier(".glb"), None);
        assert_eq!(bundle.model_identifier(".hidden.glb"), None);
        assert_eq!(bundle.model_identifier("._chair.glb"), None);
        assert_eq!(bundle.model_identifier("README"), None);
    }

    #[test]
    fn leading_dot_in_extension_is_ignored() {
        let bundle = ResourceBundle::new("assets", ".usdz");
        assert_eq!(bundle.model_extension(), "usdz");
        assert_eq!(bundle.model_file_name("teapot"), "teapot.usdz");
    }

    #[test]
    fn file_names_skip_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.glb"), b"").unwrap();
        std::fs::create_dir(dir.path().join("b.glb")).unwrap();

        let names = ResourceBundle::new(dir.path(), "glb").file_names().unwrap();
        assert_eq!(names, vec!["a.glb".to_string()]);
    }

    #[test]
    fn thumbnail_lookup_tolerates_absence_and_garbage() {
        let dir = tempfile::tempdir().unwrap();
        image::RgbaImage::from_pixel(3, 2, image::Rgba([255, 0, 0, 255]))
            .save(dir.path().join("chair.png"))
            .unwrap();
        std::fs::write(dir.path().join("lamp.png"), b"not a png").unwrap();
        let bundle = ResourceBundle::new(dir.path(), "glb");

        let thumb = bundle.load_thumbnail("chair").unwrap();
        assert_eq!((thumb.width, thumb.height), (3, 2));
        assert_eq!(&thumb.rgba[..4], &[255, 0, 0, 255]);

        assert!(bundle.load_thumbnail("lamp").is_none());
        assert!(bundle.load_thumbnail("table").is_none());
    }
}
