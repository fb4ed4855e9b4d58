use glam::{Mat4, Vec2, Vec3};

const Z_NEAR: f32 = 0.05;
const Z_FAR: f32 = 100.0;

pub fn forward_from_yaw_pitch(yaw: f32, pitch: f32) -> Vec3 {
    let cp = pitch.cos();
    let sp = pitch.sin();
    let cy = yaw.cos();
    let sy = yaw.sin();
    Vec3::new(sy * cp, sp, -cy * cp)
}

/// The device camera of the preview. Yaw 0 / pitch 0 looks down -Z.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewCamera {
    pub eye: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub fov_y: f32,
}

impl ViewCamera {
    pub fn new(eye: Vec3, yaw: f32, pitch: f32) -> Self {
        Self {
            eye,
            yaw,
            pitch,
            fov_y: 60f32.to_radians(),
        }
    }

    pub fn forward(&self) -> Vec3 {
        forward_from_yaw_pitch(self.yaw, self.pitch)
    }

    pub fn look(&mut self, delta_yaw: f32, delta_pitch: f32) {
        let limit = 89f32.to_radians();
        self.yaw += delta_yaw;
        self.pitch = (self.pitch + delta_pitch).clamp(-limit, limit);
    }

    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        let proj = Mat4::perspective_rh(self.fov_y, aspect.max(0.01), Z_NEAR, Z_FAR);
        let view = Mat4::look_to_rh(self.eye, self.forward(), Vec3::Y);
        proj * view
    }

    /// Projects a world point into the viewport, `(0, 0)` top-left and
    /// `(1, 1)` bottom-right. Points behind the camera give `None`.
    pub fn project(&self, point: Vec3, aspect: f32) -> Option<Vec2> {
        let clip = self.view_proj(aspect) * point.extend(1.0);
        if clip.w <= Z_NEAR {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(Vec2::new((ndc.x + 1.0) * 0.5, (1.0 - ndc.y) * 0.5))
    }
}
