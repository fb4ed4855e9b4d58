use crate::bundle::ResourceBundle;
use crate::loader::{AssetLoader, LoadError, LoadResult, LoadSubscription};
use crate::renderable::Renderable;
use crate::thumbnail::Thumbnail;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Pending,
    Loaded(Renderable),
    Failed(LoadError),
}

/// One entry of the model picker.
///
/// The renderable arrives asynchronously: construction queues the load and
/// returns at once, and the result is applied by [`ModelAsset::poll`] on
/// whichever thread owns the asset. A state leaves `Pending` exactly once.
/// Dropping the asset drops its subscription, so a late result is discarded
/// by the loader instead of touching freed state.
#[derive(Debug)]
pub struct ModelAsset {
    identifier: String,
    thumbnail: Option<Thumbnail>,
    state: LoadState,
    subscription: Option<LoadSubscription>,
}

impl ModelAsset {
    pub fn new(
        identifier: impl Into<String>,
        bundle: &ResourceBundle,
        loader: &AssetLoader,
    ) -> Self {
        let identifier = identifier.into();
        let thumbnail = bundle.load_thumbnail(&identifier);
        let subscription = loader.request(bundle.model_file_name(&identifier));

        Self {
            identifier,
            thumbnail,
            state: LoadState::Pending,
            subscription: Some(subscription),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn thumbnail(&self) -> Option<&Thumbnail> {
        self.thumbnail.as_ref()
    }

    pub fn load_state(&self) -> &LoadState {
        &self.state
    }

    pub fn renderable(&self) -> Option<&Renderable> {
        match &self.state {
            LoadState::Loaded(renderable) => Some(renderable),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, LoadState::Pending)
    }

    /// Applies a delivered load result, if one is waiting. Returns `true` when
    /// the state changed.
    pub fn poll(&mut self) -> bool {
        let result = match &self.subscription {
            Some(subscription) => subscription.try_take(),
            None => None,
        };
        match result {
            Some(result) => {
                self.settle(result);
                true
            }
            None => false,
        }
    }

    /// Blocks up to `timeout` for the load to finish.
    pub fn wait_for_load(&mut self, timeout: Duration) -> &LoadState {
        let result = match &self.subscription {
            Some(subscription) => subscription.wait(timeout),
            None => None,
        };
        if let Some(result) = result {
            self.settle(result);
        }
        &self.state
    }

    fn settle(&mut self, result: LoadResult) {
        self.subscription = None;
        self.state = match result {
            Ok(renderable) => {
                log::info!("loaded model {}", self.identifier);
                LoadState::Loaded(renderable)
            }
            Err(err) => {
                log::error!("unable to load model {}: {err}", self.identifier);
                LoadState::Failed(err)
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn echo(name: &str) -> LoadResult {
        Ok(Renderable::new(name, Vec::new()))
    }

    fn empty(name: &str) -> LoadResult {
        Err(LoadError::Empty(name.to_string()))
    }

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn bundle() -> ResourceBundle {
        ResourceBundle::new("does-not-exist", "glb")
    }

    #[test]
    fn requests_identifier_plus_extension() {
        let loader = AssetLoader::new(echo, 1);
        let mut asset = ModelAsset::new("chair", &bundle(), &loader);

        assert!(asset.thumbnail().is_none());
        asset.wait_for_load(TIMEOUT);
        assert_eq!(asset.renderable().unwrap().name, "chair.glb");
    }

    #[test]
    fn construction_returns_before_the_load_completes() {
        let (gate_tx, gate_rx) = bounded::<()>(0);
        let loader = AssetLoader::new(
            move |name: &str| -> LoadResult {
                let _ = gate_rx.recv();
                Ok(Renderable::new(name, Vec::new()))
            },
            1,
        );

        let mut asset = ModelAsset::new("lamp", &bundle(), &loader);
        assert!(asset.is_pending());
        assert!(!asset.poll());
        assert!(asset.renderable().is_none());

        gate_tx.send(()).unwrap();
        assert!(matches!(asset.wait_for_load(TIMEOUT), LoadState::Loaded(_)));
    }

    #[test]
    fn failure_is_only_visible_through_the_state() {
        let loader = AssetLoader::new(empty, 1);
        let mut asset = ModelAsset::new("broken", &bundle(), &loader);

        assert_eq!(
            asset.wait_for_load(TIMEOUT),
            &LoadState::Failed(LoadError::Empty("broken.glb".into()))
        );
        assert!(asset.renderable().is_none());
    }

    #[test]
    fn state_settles_once() {
        let loader = AssetLoader::new(echo, 1);
        let mut asset = ModelAsset::new("chair", &bundle(), &loader);

        asset.wait_for_load(TIMEOUT);
        assert!(!asset.poll());
        assert!(!asset.poll());
        assert!(asset.renderable().is_some());
    }

    #[test]
    fn releasing_mid_load_discards_the_result() {
        let (gate_tx, gate_rx) = bounded::<()>(0);
        let (done_tx, done_rx) = bounded::<()>(1);
        let finished = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&finished);
        let loader = AssetLoader::new(
            move |name: &str| -> LoadResult {
                let _ = gate_rx.recv();
                flag.store(true, Ordering::SeqCst);
                let _ = done_tx.send(());
                Ok(Renderable::new(name, Vec::new()))
            },
            1,
        );

        let asset = ModelAsset::new("chair", &bundle(), &loader);
        drop(asset);
        gate_tx.send(()).unwrap();
        drop(gate_tx);
        done_rx.recv_timeout(TIMEOUT).unwrap();
        assert!(finished.load(Ordering::SeqCst));

        let mut next = ModelAsset::new("lamp", &bundle(), &loader);
        assert!(matches!(next.wait_for_load(TIMEOUT), LoadState::Loaded(_)));
    }
}
