pub mod indicator;
pub mod plane;
pub mod scene;
pub mod session;
pub mod surface;

pub use indicator::{PlacementIndicator, TrackingState};
pub use plane::{AlignmentFilter, DetectedPlane, PlaneAlignment, PlaneId, PlaneSet};
pub use scene::{Anchor, AnchorId, Scene};
pub use session::{ArSession, PlaneDetection, SceneReconstruction, SessionConfig, SessionEvent};
pub use surface::PlacementSurface;
