use glam::{Mat4, Vec2, Vec3};
use std::f32::consts::{PI, TAU};

const EPS: f32 = 1e-6;

/// Perspective camera that looks at a target point.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    aspect: f32,
    projection: Mat4,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(75.0_f32.to_radians(), 1.0, 0.1, 100.0)
    }
}

impl OrbitCamera {
    pub fn new(fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            position: Vec3::new(0.0, 0.0, 4.0),
            target: Vec3::ZERO,
            fov_y,
            near,
            far,
            aspect,
            projection: Mat4::IDENTITY,
        };
        camera.update_projection();
        camera
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Set width / height and recompute the projection.
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.update_projection();
    }

    pub fn update_projection(&mut self) {
        self.projection = Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far);
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view_matrix()
    }

    pub fn distance(&self) -> f32 {
        self.position.distance(self.target)
    }
}

/// Damped orbit around the camera target, y up.
///
/// Pointer input accumulates angle deltas; `update` applies a fraction of
/// them each frame and decays the rest, so motion eases out after release.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    /// Distance multiplier per wheel notch towards the target.
    pub zoom_scale: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Pending (azimuth, polar) change in radians.
    delta: Vec2,
    scale: f32,
    drag_origin: Option<Vec2>,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            enable_damping: true,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_scale: 0.95,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            delta: Vec2::ZERO,
            scale: 1.0,
            drag_origin: None,
        }
    }
}

impl OrbitControls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_origin.is_some()
    }

    pub fn rotate_left(&mut self, angle: f32) {
        self.delta.x -= angle;
    }

    pub fn rotate_up(&mut self, angle: f32) {
        self.delta.y -= angle;
    }

    pub fn pointer_down(&mut self, position: Vec2) {
        self.drag_origin = Some(position);
    }

    /// Rotate by the drag since the last pointer position. A full viewport
    /// height of travel is one turn.
    pub fn pointer_move(&mut self, position: Vec2, viewport_height: f32) {
        let Some(origin) = self.drag_origin else {
            return;
        };
        if viewport_height > 0.0 {
            let moved = (position - origin) * self.rotate_speed;
            self.rotate_left(TAU * moved.x / viewport_height);
            self.rotate_up(TAU * moved.y / viewport_height);
        }
        self.drag_origin = Some(position);
    }

    pub fn pointer_up(&mut self) {
        self.drag_origin = None;
    }

    /// Dolly by wheel notches. Positive moves towards the target.
    pub fn wheel(&mut self, notches: f32) {
        self.scale *= self.zoom_scale.powf(notches);
    }

    /// Apply one step of pending motion to `camera`. Returns whether the
    /// camera moved.
    pub fn update(&mut self, camera: &mut OrbitCamera) -> bool {
        let offset = camera.position - camera.target;
        let radius = offset.length();
        if radius < EPS {
            return false;
        }

        let mut theta = offset.x.atan2(offset.z);
        let mut phi = (offset.y / radius).clamp(-1.0, 1.0).acos();
        let step = if self.enable_damping {
            self.delta * self.damping_factor
        } else {
            self.delta
        };
        theta += step.x;
        phi = (phi + step.y).clamp(EPS, PI - EPS);
        let radius = (radius * self.scale).clamp(self.min_distance, self.max_distance);

        let sin_phi = phi.sin();
        let next = camera.target
            + Vec3::new(sin_phi * theta.sin(), phi.cos(), sin_phi * theta.cos()) * radius;
        let moved = next.distance_squared(camera.position) > 1e-10;
        camera.position = next;

        if self.enable_damping {
            self.delta *= 1.0 - self.damping_factor;
        } else {
            self.delta = Vec2::ZERO;
        }
        self.scale = 1.0;
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera() {
        let cam = OrbitCamera::default();
        assert_eq!(cam.position, Vec3::new(0.0, 0.0, 4.0));
        assert_eq!(cam.target, Vec3::ZERO);
        assert!((cam.fov_y.to_degrees() - 75.0).abs() < 1e-4);
        assert_eq!((cam.near, cam.far), (0.1, 100.0));
        assert!(!cam.view_projection().is_nan());
    }

    #[test]
    fn aspect_updates_projection() {
        let mut cam = OrbitCamera::default();
        let before = cam.projection_matrix();
        cam.set_aspect(1920.0 / 1080.0);
        assert_ne!(cam.projection_matrix(), before);
        assert_eq!(
            cam.projection_matrix(),
            Mat4::perspective_rh(cam.fov_y, 1920.0 / 1080.0, 0.1, 100.0)
        );
    }

    #[test]
    fn idle_controls_keep_camera_still() {
        let mut cam = OrbitCamera::default();
        let mut controls = OrbitControls::new();
        assert!(!controls.update(&mut cam));
        assert!(cam.position.abs_diff_eq(Vec3::new(0.0, 0.0, 4.0), 1e-5));
    }

    #[test]
    fn drag_orbits_at_constant_distance() {
        let mut cam = OrbitCamera::default();
        let mut controls = OrbitControls::new();
        controls.pointer_down(Vec2::new(100.0, 100.0));
        controls.pointer_move(Vec2::new(160.0, 100.0), 600.0);
        controls.pointer_up();

        assert!(controls.update(&mut cam));
        assert!((cam.distance() - 4.0).abs() < 1e-4);
        // Dragging right swings the camera to -x.
        assert!(cam.position.x < 0.0);
    }

    #[test]
    fn damping_eases_out() {
        let mut cam = OrbitCamera::default();
        let mut controls = OrbitControls::new();
        controls.rotate_left(1.0);

        let mut steps = Vec::new();
        for _ in 0..3 {
            let before = cam.position;
            controls.update(&mut cam);
            steps.push(before.distance(cam.position));
        }
        assert!(steps[0] > steps[1] && steps[1] > steps[2]);

        let angle = (-cam.position.x).atan2(cam.position.z);
        assert!(angle > 0.0);
    }

    #[test]
    fn undamped_applies_full_delta_once() {
        let mut cam = OrbitCamera::default();
        let mut controls = OrbitControls {
            enable_damping: false,
            ..OrbitControls::default()
        };
        controls.rotate_left(std::f32::consts::FRAC_PI_2);
        controls.update(&mut cam);
        assert!(cam.position.abs_diff_eq(Vec3::new(-4.0, 0.0, 0.0), 1e-4));
        assert!(!controls.update(&mut cam));
    }

    #[test]
    fn polar_angle_is_clamped() {
        let mut cam = OrbitCamera::default();
        let mut controls = OrbitControls {
            enable_damping: false,
            ..OrbitControls::default()
        };
        controls.rotate_up(10.0);
        controls.update(&mut cam);
        assert!(cam.position.y > 3.99);
        assert!(!cam.view_matrix().is_nan());
    }

    #[test]
    fn wheel_dollies_within_limits() {
        let mut cam = OrbitCamera::default();
        let mut controls = OrbitControls {
            min_distance: 3.9,
            ..OrbitControls::default()
        };
        controls.wheel(1.0);
        controls.update(&mut cam);
        assert!((cam.distance() - 3.9).abs() < 1e-4);

        controls.wheel(-1.0);
        controls.update(&mut cam);
        assert!((cam.distance() - 3.9 / 0.95).abs() < 1e-4);
    }

    #[test]
    fn move_without_press_is_ignored() {
        let mut controls = OrbitControls::new();
        controls.pointer_move(Vec2::new(50.0, 50.0), 600.0);
        let mut cam = OrbitCamera::default();
        assert!(!controls.update(&mut cam));
        assert!(!controls.is_dragging());
    }
}
