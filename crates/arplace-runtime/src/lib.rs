pub mod camera;
pub mod graphics;
pub mod simulated;

pub use camera::{ViewCamera, forward_from_yaw_pitch};
pub use graphics::{Graphics, GraphicsError, GraphicsEvent, RcWindow, create_graphics};
pub use simulated::{ScriptedPlane, SimulatedSession, default_script};
