pub mod asset;
pub mod bundle;
pub mod catalog;
pub mod gltf_source;
pub mod loader;
pub mod renderable;
pub mod thumbnail;

pub use asset::{LoadState, ModelAsset};
pub use bundle::{DEFAULT_MODEL_EXTENSION, DEFAULT_THUMBNAIL_EXTENSIONS, ResourceBundle};
pub use catalog::{AssetCatalog, AssetHandle, list_available_models, model_identifiers};
pub use gltf_source::GltfSource;
pub use loader::{AssetLoader, LoadError, LoadResult, LoadSubscription, ModelSource};
pub use renderable::{Bounds, Material, Mesh, Renderable, Vertex};
pub use thumbnail::Thumbnail;
