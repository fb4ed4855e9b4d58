use crate::indicator::PlacementIndicator;
use crate::plane::{AlignmentFilter, PlaneSet};
use crate::scene::{Anchor, AnchorId, Scene};
use crate::session::{ArSession, SessionConfig, SessionEvent};
use arplace_assets::{AssetCatalog, AssetHandle, ModelAsset};
use arplace_selection::SelectionState;

/// The live AR view: owns the session, the detected planes and the scene,
/// and turns confirmed selections into anchored copies of their models.
pub struct PlacementSurface<S: ArSession> {
    session: S,
    config: SessionConfig,
    alignment: AlignmentFilter,
    planes: PlaneSet,
    scene: Scene,
    indicator: PlacementIndicator,
}

impl<S: ArSession> PlacementSurface<S> {
    /// Configures and starts the session. This is the only time the
    /// configuration is applied.
    pub fn new(mut session: S, requested: SessionConfig, alignment: AlignmentFilter) -> Self {
        let config = requested.resolve(session.supports_scene_reconstruction());
        if config != requested {
            log::info!("scene reconstruction unsupported, running without it");
        }
        session.run(&config);
        log::info!("session running with {config:?}");

        Self {
            session,
            config,
            alignment,
            planes: PlaneSet::new(),
            scene: Scene::new(),
            indicator: PlacementIndicator::new(),
        }
    }

    /// Drains session events, pins anchors that were waiting on a plane and
    /// refreshes the indicator.
    pub fn update(&mut self) {
        for event in self.session.poll_events() {
            match event {
                SessionEvent::PlaneAdded(plane) | SessionEvent::PlaneUpdated(plane) => {
                    if self.planes.upsert(plane) {
                        log::debug!("detected {:?} plane {:?}", plane.alignment, plane.id);
                    }
                }
                SessionEvent::PlaneRemoved(id) => {
                    self.planes.remove(id);
                }
            }
        }

        let resolved = self.scene.resolve_pending(&self.planes);
        if resolved > 0 {
            log::debug!("pinned {resolved} pending anchor(s)");
        }

        self.indicator
            .update(self.session.raycast_center(self.alignment));
    }

    /// Consumes the pending confirmation, if any, and places it.
    ///
    /// The confirmation is cleared whether or not anything gets placed.
    pub fn observe(
        &mut self,
        selection: &mut SelectionState<AssetHandle>,
        catalog: &AssetCatalog,
    ) -> Option<AnchorId> {
        let handle = selection.take_confirmed()?;
        match catalog.get(handle) {
            Some(asset) => self.place(asset),
            None => {
                log::error!("confirmed asset {handle:?} is not in the catalog");
                None
            }
        }
    }

    /// Anchors a fresh copy of the asset's renderable. Unloaded assets are
    /// dropped with a diagnostic and never retried.
    pub fn place(&mut self, asset: &ModelAsset) -> Option<AnchorId> {
        let Some(renderable) = asset.renderable() else {
            log::error!(
                "unable to place {}: model is not loaded",
                asset.identifier()
            );
            return None;
        };

        let anchor = Anchor::on_plane(self.alignment).with_child(renderable.clone());
        let id = self.scene.add_anchor(anchor, &self.planes);
        log::info!("placed {} on anchor {}", asset.identifier(), id.get());
        Some(id)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn planes(&self) -> &PlaneSet {
        &self.planes
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn indicator(&self) -> &PlacementIndicator {
        &self.indicator
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut S {
        &mut self.session
    }
}
