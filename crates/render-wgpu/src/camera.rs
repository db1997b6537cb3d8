use galaxy_render::RenderView;
use glam::{Mat4, Vec3};
use std::f32::consts::PI;

/// Keeps the polar angle away from the poles so `look_at` stays defined.
const POLE_EPSILON: f32 = 1e-3;

/// Orbit camera circling a target, with damped rotation.
///
/// Rotation input adds angular velocity; `update` applies it once per frame
/// and decays it by `damping`, so the view glides to a stop.
pub struct OrbitCamera {
    pub position: Vec3,
    pub target: Vec3,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Fraction of angular velocity removed per frame.
    pub damping: f32,
    /// Radians per pixel of mouse drag.
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    yaw_velocity: f32,
    pitch_velocity: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::from_view(&RenderView::default())
    }
}

impl OrbitCamera {
    pub fn from_view(view: &RenderView) -> Self {
        Self {
            position: view.eye,
            target: view.target,
            fov: view.fov_degrees.to_radians(),
            aspect: view.aspect(),
            near: 0.1,
            far: 1000.0,
            damping: 0.05,
            rotate_speed: 0.005,
            zoom_speed: 0.1,
            min_distance: 0.5,
            yaw_velocity: 0.0,
            pitch_velocity: 0.0,
        }
    }

    /// Add angular velocity from a mouse drag of `(dx, dy)` pixels.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw_velocity -= dx * self.rotate_speed * self.damping;
        self.pitch_velocity -= dy * self.rotate_speed * self.damping;
    }

    /// Move toward (positive) or away from the target.
    pub fn zoom(&mut self, delta: f32) {
        let offset = self.position - self.target;
        let distance = (offset.length() * (1.0 - delta * self.zoom_speed)).max(self.min_distance);
        self.position = self.target + offset.normalize_or(Vec3::Z) * distance;
    }

    /// Move the eye by a fixed delta; the target stays put.
    pub fn nudge(&mut self, delta: Vec3) {
        self.position += delta;
    }

    /// Apply and decay the pending rotation. Returns true if the camera moved.
    pub fn update(&mut self) -> bool {
        if self.yaw_velocity.abs() < 1e-6 && self.pitch_velocity.abs() < 1e-6 {
            self.yaw_velocity = 0.0;
            self.pitch_velocity = 0.0;
            return false;
        }

        let offset = self.position - self.target;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return false;
        }
        let theta = offset.x.atan2(offset.z) + self.yaw_velocity;
        let phi = ((offset.y / radius).clamp(-1.0, 1.0).acos() + self.pitch_velocity)
            .clamp(POLE_EPSILON, PI - POLE_EPSILON);

        self.position = self.target
            + Vec3::new(
                radius * phi.sin() * theta.sin(),
                radius * phi.cos(),
                radius * phi.sin() * theta.cos(),
            );

        self.yaw_velocity *= 1.0 - self.damping;
        self.pitch_velocity *= 1.0 - self.damping;
        true
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera() {
        let cam = OrbitCamera::default();
        assert_eq!(cam.position, Vec3::new(0.0, 0.0, 10.0));
        assert!((cam.fov - 75.0_f32.to_radians()).abs() < 1e-6);
        let vp = cam.view_projection();
        // Should produce a valid matrix (no NaN)
        assert!(!vp.col(0).x.is_nan());
    }

    #[test]
    fn rotation_keeps_distance_and_decays() {
        let mut cam = OrbitCamera::default();
        cam.rotate(200.0, 50.0);
        let start = cam.position;

        assert!(cam.update());
        assert_ne!(cam.position, start);
        assert!((cam.position.length() - 10.0).abs() < 1e-3);

        for _ in 0..2000 {
            cam.update();
        }
        assert!(!cam.update());
    }

    #[test]
    fn update_without_input_does_nothing() {
        let mut cam = OrbitCamera::default();
        assert!(!cam.update());
        assert_eq!(cam.position, Vec3::new(0.0, 0.0, 10.0));
    }

    #[test]
    fn nudge_moves_eye_only() {
        let mut cam = OrbitCamera::default();
        cam.nudge(Vec3::new(0.25, 0.0, 0.0));
        assert_eq!(cam.position, Vec3::new(0.25, 0.0, 10.0));
        assert_eq!(cam.target, Vec3::ZERO);
    }

    #[test]
    fn zoom_respects_min_distance() {
        let mut cam = OrbitCamera::default();
        cam.zoom(1.0);
        assert!((cam.position.length() - 9.0).abs() < 1e-4);
        for _ in 0..200 {
            cam.zoom(5.0);
        }
        assert!((cam.position.length() - cam.min_distance).abs() < 1e-4);
    }

    #[test]
    fn viewport_updates_aspect() {
        let mut cam = OrbitCamera::default();
        cam.set_viewport(1000, 500);
        assert_eq!(cam.aspect, 2.0);
    }
}
