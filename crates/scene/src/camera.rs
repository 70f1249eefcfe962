//! Trackball camera
//!
//! Controls (see [`crate::input`]):
//! - Middle mouse drag, or Alt + left drag: Orbit around target
//! - Ctrl + left drag: Pan
//! - Scroll wheel: Dolly (zoom)
//! - Ctrl + R: Move the pivot back to the origin

use facet_config::CameraConfig;
use glam::{Mat4, Quat, Vec2, Vec3};

/// Perspective camera looking at a target point
///
/// `position` must differ from `target`. `up` does not have to be orthogonal
/// to the view direction; the look-at construction re-orthogonalizes it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    /// World up hint
    pub up: Vec3,
    pub near: f32,
    pub far: f32,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub aspect: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

impl Camera {
    pub fn from_config(config: &CameraConfig) -> Self {
        Self {
            position: Vec3::from_array(config.position),
            target: Vec3::from_array(config.target),
            up: Vec3::from_array(config.up),
            near: config.near,
            far: config.far,
            fov: config.fov_degrees,
            aspect: config.aspect_ratio,
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }

    pub fn distance(&self) -> f32 {
        self.position.distance(self.target)
    }

    /// Camera right axis in world space
    pub fn right_axis(&self) -> Vec3 {
        self.view().inverse().x_axis.truncate()
    }

    /// Camera up axis in world space
    pub fn up_axis(&self) -> Vec3 {
        self.view().inverse().y_axis.truncate()
    }

    /// Rotation carrying the scene from trackball point `current` back to `previous`
    ///
    /// Both points are in trackball space and are moved into world space as
    /// directions before building the arc between them.
    pub fn trackball_rotation(&self, previous: Vec3, current: Vec3) -> Quat {
        let inv_view = self.view().inverse();
        let from = inv_view.transform_vector3(current).normalize_or_zero();
        let to = inv_view.transform_vector3(previous).normalize_or_zero();
        if from == Vec3::ZERO || to == Vec3::ZERO {
            return Quat::IDENTITY;
        }
        Quat::from_rotation_arc(from, to)
    }

    /// Rotate the camera position about the target
    ///
    /// When the offset crosses to the opposite side in both x and z the camera
    /// has gone over a pole, so the up vector's y component is flipped to keep
    /// the view from snapping. Returns whether that happened.
    pub fn orbit(&mut self, rotation: Quat) -> bool {
        let before = self.position - self.target;
        let after = rotation * before;
        self.position = self.target + after;

        let flipped = before.x * after.x < 0.0 && before.z * after.z < 0.0;
        if flipped {
            self.up.y = -self.up.y;
            tracing::debug!("Camera crossed a pole, up = {:?}", self.up);
        }
        flipped
    }

    /// Translate position and target in the view plane
    ///
    /// `delta` is the pointer movement in pixels, y down. The step grows with
    /// the distance to the target.
    pub fn pan(&mut self, delta: Vec2, factor: f32) {
        let scale = factor * self.distance();
        let offset = scale * (-delta.x * self.right_axis() + delta.y * self.up_axis());
        self.position += offset;
        self.target += offset;
    }

    /// Scale the distance to the target by `scroll_factor ^ wheel`
    pub fn dolly(&mut self, wheel: f32, scroll_factor: f32) {
        let offset = self.position - self.target;
        self.position = self.target + offset * scroll_factor.powf(wheel);
    }

    /// Move the target to the origin, keeping the view direction
    pub fn recenter(&mut self) {
        self.position -= self.target;
        self.target = Vec3::ZERO;
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f32 = 1e-4;

    #[test]
    fn test_default_camera() {
        let camera = Camera::default();
        assert_eq!(camera.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(camera.target, Vec3::ZERO);
        assert_eq!(camera.fov, 45.0);
        assert_eq!(camera.aspect, 0.75);
    }

    #[test]
    fn test_view_maps_target_forward() {
        let camera = Camera::default();
        let target_in_view = camera.view().transform_point3(camera.target);
        assert!(target_in_view.x.abs() < TOLERANCE);
        assert!(target_in_view.y.abs() < TOLERANCE);
        assert!((target_in_view.z + camera.distance()).abs() < TOLERANCE);
    }

    #[test]
    fn test_orbit_preserves_distance() {
        let mut camera = Camera::default();
        let distance = camera.distance();
        for angle in [0.3f32, 1.2, -2.5, 3.0] {
            camera.orbit(Quat::from_axis_angle(Vec3::new(1.0, 1.0, 0.0).normalize(), angle));
            assert!((camera.distance() - distance).abs() < TOLERANCE);
        }
    }

    #[test]
    fn test_orbit_over_pole_flips_up() {
        let mut camera = Camera {
            position: Vec3::new(1.0, 0.0, 1.0),
            ..Camera::default()
        };
        // Half turn about y sends (1, 0, 1) to (-1, 0, -1)
        assert!(camera.orbit(Quat::from_rotation_y(std::f32::consts::PI)));
        assert_eq!(camera.up.y, -1.0);

        // Small turn does not cross
        assert!(!camera.orbit(Quat::from_rotation_y(0.1)));
        assert_eq!(camera.up.y, -1.0);
    }

    #[test]
    fn test_dolly_round_trip() {
        let mut camera = Camera::default();
        let start = camera.position;
        camera.dolly(3.0, 0.8);
        assert!((camera.distance() - start.length() * 0.8f32.powi(3)).abs() < TOLERANCE);
        camera.dolly(-3.0, 0.8);
        assert!((camera.position - start).length() < TOLERANCE);
    }

    #[test]
    fn test_pan_moves_position_and_target_together() {
        let mut camera = Camera::default();
        let offset = camera.position - camera.target;
        let right = camera.right_axis();
        camera.pan(Vec2::new(10.0, 0.0), 0.001);

        assert!((camera.position - camera.target - offset).length() < TOLERANCE);
        // Dragging right moves the camera left
        let expected = -10.0 * 0.001 * offset.length() * right;
        assert!((camera.target - expected).length() < TOLERANCE);
    }

    #[test]
    fn test_recenter() {
        let mut camera = Camera::default();
        camera.pan(Vec2::new(40.0, -25.0), 0.01);
        let offset = camera.position - camera.target;
        camera.recenter();
        assert_eq!(camera.target, Vec3::ZERO);
        assert!((camera.position - offset).length() < TOLERANCE);
    }

    #[test]
    fn test_trackball_rotation_identity_for_same_point() {
        let camera = Camera::default();
        let p = Vec3::new(10.0, 20.0, 280.0);
        let q = camera.trackball_rotation(p, p);
        assert!(q.angle_between(Quat::IDENTITY) < 1e-3);
    }
}
