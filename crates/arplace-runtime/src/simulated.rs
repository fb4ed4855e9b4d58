use crate::camera::ViewCamera;
use arplace_scene::{
    AlignmentFilter, ArSession, DetectedPlane, PlaneAlignment, PlaneId, SessionConfig,
    SessionEvent,
};
use glam::{Affine3A, Quat, Vec2, Vec3};

/// A plane that the simulated session "discovers" after `frame` updates.
#[derive(Clone, Copy, Debug)]
pub struct ScriptedPlane {
    pub frame: u64,
    pub plane: DetectedPlane,
}

/// Stand-in for a device AR session in the desktop preview: planes appear on
/// a fixed schedule and the centre raycast is solved against them.
pub struct SimulatedSession {
    config: Option<SessionConfig>,
    frame: u64,
    script: Vec<ScriptedPlane>,
    revealed: Vec<DetectedPlane>,
    view: ViewCamera,
}

impl SimulatedSession {
    pub fn new(view: ViewCamera) -> Self {
        Self::with_script(view, default_script())
    }

    pub fn with_script(view: ViewCamera, mut script: Vec<ScriptedPlane>) -> Self {
        script.sort_by_key(|s| s.frame);
        Self {
            config: None,
            frame: 0,
            script,
            revealed: Vec::new(),
            view,
        }
    }

    pub fn view(&self) -> &ViewCamera {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ViewCamera {
        &mut self.view
    }

    fn detects(&self, alignment: PlaneAlignment) -> bool {
        let Some(config) = &self.config else {
            return false;
        };
        match alignment {
            PlaneAlignment::Horizontal => config.plane_detection.horizontal,
            PlaneAlignment::Vertical => config.plane_detection.vertical,
        }
    }
}

impl ArSession for SimulatedSession {
    fn supports_scene_reconstruction(&self) -> bool {
        false
    }

    fn run(&mut self, config: &SessionConfig) {
        self.config = Some(*config);
        self.frame = 0;
        self.revealed.clear();
    }

    fn poll_events(&mut self) -> Vec<SessionEvent> {
        if self.config.is_none() {
            return Vec::new();
        }
        self.frame += 1;

        let due: Vec<DetectedPlane> = self
            .script
            .iter()
            .filter(|s| s.frame <= self.frame)
            .map(|s| s.plane)
            .filter(|p| self.detects(p.alignment))
            .filter(|p| !self.revealed.iter().any(|r| r.id == p.id))
            .collect();

        self.revealed.extend(due.iter().copied());
        due.into_iter().map(SessionEvent::PlaneAdded).collect()
    }

    fn raycast_center(&self, filter: AlignmentFilter) -> Option<Affine3A> {
        let origin = self.view.eye;
        let dir = self.view.forward();

        self.revealed
            .iter()
            .filter(|p| filter.accepts(p.alignment))
            .filter_map(|p| intersect(p, origin, dir).map(|(t, hit)| (t, p, hit)))
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, plane, hit)| Affine3A {
                matrix3: plane.pose.matrix3,
                translation: hit.into(),
            })
    }
}

/// Ray hit against the finite plane rectangle, as `(distance, point)`.
fn intersect(plane: &DetectedPlane, origin: Vec3, dir: Vec3) -> Option<(f32, Vec3)> {
    let center = Vec3::from(plane.pose.translation);
    let normal = plane.pose.transform_vector3(Vec3::Y).normalize();
    let denom = normal.dot(dir);
    if denom.abs() < 1e-6 {
        return None;
    }

    let t = normal.dot(center - origin) / denom;
    if t <= 0.0 {
        return None;
    }

    let hit = origin + dir * t;
    let local = plane.pose.inverse().transform_point3(hit);
    let half = plane.extent * 0.5;
    (local.x.abs() <= half.x && local.z.abs() <= half.y).then_some((t, hit))
}

/// A floor under a hand-held device, then a wall in front of it.
pub fn default_script() -> Vec<ScriptedPlane> {
    vec![
        ScriptedPlane {
            frame: 45,
            plane: DetectedPlane {
                id: PlaneId(1),
                alignment: PlaneAlignment::Horizontal,
                pose: Affine3A::from_translation(Vec3::new(0.0, -1.4, -2.0)),
                extent: Vec2::new(4.0, 4.0),
            },
        },
        ScriptedPlane {
            frame: 150,
            plane: DetectedPlane {
                id: PlaneId(2),
                alignment: PlaneAlignment::Vertical,
                pose: Affine3A::from_rotation_translation(
                    Quat::from_rotation_x(std::f32::consts::FRAC_PI_2),
                    Vec3::new(0.0, 0.0, -4.0),
                ),
                extent: Vec2::new(4.0, 3.0),
            },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use arplace_scene::{PlacementSurface, PlaneDetection, SceneReconstruction};

    fn looking_down() -> ViewCamera {
        ViewCamera::new(Vec3::ZERO, 0.0, -35f32.to_radians())
    }

    fn run_frames(session: &mut SimulatedSession, frames: u64) -> Vec<SessionEvent> {
        (0..frames).flat_map(|_| session.poll_events()).collect()
    }

    #[test]
    fn nothing_happens_before_run() {
        let mut session = SimulatedSession::new(looking_down());
        assert!(run_frames(&mut session, 200).is_empty());
    }

    #[test]
    fn planes_appear_on_schedule_once() {
        let mut session = SimulatedSession::new(looking_down());
        session.run(&SessionConfig::default());

        assert!(run_frames(&mut session, 44).is_empty());
        let events = run_frames(&mut session, 1);
        assert!(matches!(
            events.as_slice(),
            [SessionEvent::PlaneAdded(p)] if p.id == PlaneId(1)
        ));
        assert_eq!(run_frames(&mut session, 200).len(), 1);
    }

    #[test]
    fn disabled_alignment_is_never_reported() {
        let mut session = SimulatedSession::new(looking_down());
        session.run(&SessionConfig {
            plane_detection: PlaneDetection {
                horizontal: true,
                vertical: false,
            },
            ..SessionConfig::default()
        });

        let events = run_frames(&mut session, 300);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn centre_ray_hits_the_floor() {
        let mut session = SimulatedSession::new(looking_down());
        session.run(&SessionConfig::default());
        assert!(session.raycast_center(AlignmentFilter::Any).is_none());

        run_frames(&mut session, 45);
        let hit = session.raycast_center(AlignmentFilter::Any).unwrap();
        assert!((hit.translation.y + 1.4).abs() < 1e-4);
        assert!(hit.translation.z < 0.0);
        assert!(session.raycast_center(AlignmentFilter::Vertical).is_none());
    }

    #[test]
    fn looking_up_misses() {
        let mut session = SimulatedSession::new(ViewCamera::new(Vec3::ZERO, 0.0, 0.5));
        session.run(&SessionConfig::default());
        run_frames(&mut session, 45);
        assert!(session.raycast_center(AlignmentFilter::Horizontal).is_none());
    }

    #[test]
    fn mesh_request_is_downgraded_on_the_desktop() {
        let surface = PlacementSurface::new(
            SimulatedSession::new(looking_down()),
            SessionConfig::default(),
            AlignmentFilter::Any,
        );
        assert_eq!(
            surface.config().scene_reconstruction,
            SceneReconstruction::Disabled
        );
    }
}
