use crate::plane::{AlignmentFilter, DetectedPlane, PlaneId};
use glam::Affine3A;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaneDetection {
    pub horizontal: bool,
    pub vertical: bool,
}

impl Default for PlaneDetection {
    fn default() -> Self {
        Self {
            horizontal: true,
            vertical: true,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SceneReconstruction {
    #[default]
    Disabled,
    Mesh,
}

/// World-tracking configuration handed to the session once, at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    pub plane_detection: PlaneDetection,
    pub scene_reconstruction: SceneReconstruction,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            plane_detection: PlaneDetection::default(),
            scene_reconstruction: SceneReconstruction::Mesh,
        }
    }
}

impl SessionConfig {
    /// Drops mesh reconstruction on devices that cannot do it.
    pub fn resolve(self, supports_scene_reconstruction: bool) -> Self {
        if self.scene_reconstruction == SceneReconstruction::Mesh && !supports_scene_reconstruction
        {
            Self {
                scene_reconstruction: SceneReconstruction::Disabled,
                ..self
            }
        } else {
            self
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SessionEvent {
    PlaneAdded(DetectedPlane),
    PlaneUpdated(DetectedPlane),
    PlaneRemoved(PlaneId),
}

/// The platform's AR session: tracking, plane detection and hit testing.
///
/// All calls happen on the update thread.
pub trait ArSession {
    fn supports_scene_reconstruction(&self) -> bool;

    fn run(&mut self, config: &SessionConfig);

    /// Events since the previous call, oldest first.
    fn poll_events(&mut self) -> Vec<SessionEvent>;

    /// Hit test from the centre of the view against detected surfaces.
    fn raycast_center(&self, filter: AlignmentFilter) -> Option<Affine3A>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mesh_reconstruction_needs_support() {
        let requested = SessionConfig::default();

        let resolved = requested.resolve(false);
        assert_eq!(resolved.scene_reconstruction, SceneReconstruction::Disabled);
        assert_eq!(resolved.plane_detection, requested.plane_detection);

        assert_eq!(requested.resolve(true), requested);
    }
}
