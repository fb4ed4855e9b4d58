use crate::asset::ModelAsset;
use crate::bundle::ResourceBundle;
use crate::loader::AssetLoader;
use std::time::{Duration, Instant};

/// Stable index of an asset inside its catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AssetHandle(usize);

impl AssetHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Identifiers of every model file among `file_names`, in the given order.
pub fn model_identifiers<'a, I>(bundle: &ResourceBundle, file_names: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    file_names
        .into_iter()
        .filter_map(|name| bundle.model_identifier(name))
        .map(str::to_string)
        .collect()
}

/// Scans the bundle and starts loading one asset per model file.
///
/// An unreadable bundle yields an empty list.
pub fn list_available_models(bundle: &ResourceBundle, loader: &AssetLoader) -> Vec<ModelAsset> {
    let file_names = match bundle.file_names() {
        Ok(names) => names,
        Err(err) => {
            log::warn!(
                "cannot read resource directory {}: {err}",
                bundle.root().display()
            );
            return Vec::new();
        }
    };

    model_identifiers(bundle, file_names.iter().map(String::as_str))
        .into_iter()
        .map(|identifier| ModelAsset::new(identifier, bundle, loader))
        .collect()
}

#[derive(Debug, Default)]
pub struct AssetCatalog {
    assets: Vec<ModelAsset>,
}

impl AssetCatalog {
    pub fn scan(bundle: &ResourceBundle, loader: &AssetLoader) -> Self {
        let catalog = Self::from_assets(list_available_models(bundle, loader));
        log::info!(
            "found {} model(s) in {}",
            catalog.len(),
            bundle.root().display()
        );
        catalog
    }

    pub fn from_assets(assets: Vec<ModelAsset>) -> Self {
        Self { assets }
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn get(&self, handle: AssetHandle) -> Option<&ModelAsset> {
        self.assets.get(handle.0)
    }

    pub fn handle_of(&self, identifier: &str) -> Option<AssetHandle> {
        self.assets
            .iter()
            .position(|asset| asset.identifier() == identifier)
            .map(AssetHandle)
    }

    pub fn iter(&self) -> impl Iterator<Item = (AssetHandle, &ModelAsset)> {
        self.assets
            .iter()
            .enumerate()
            .map(|(index, asset)| (AssetHandle(index), asset))
    }

    /// Applies every load result delivered since the last call. Returns how
    /// many assets changed state.
    pub fn poll_loads(&mut self) -> usize {
        self.assets
            .iter_mut()
            .map(ModelAsset::poll)
            .filter(|changed| *changed)
            .count()
    }

    pub fn pending(&self) -> usize {
        self.assets.iter().filter(|asset| asset.is_pending()).count()
    }

    /// Blocks until every asset has settled or `timeout` elapses.
    pub fn wait_for_loads(&mut self, timeout: Duration) {
        let deadline = Instant::now() + timeout;
        for asset in &mut self.assets {
            let remaining = deadline.saturating_duration_since(Instant::now());
            asset.wait_for_load(remaining);
        }
    }
}
