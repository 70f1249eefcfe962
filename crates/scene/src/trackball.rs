//! Virtual trackball
//!
//! Maps pointer positions onto a sphere centered on the window, blending into
//! a hyperbolic sheet away from the center so that points outside the sphere
//! still produce a smooth rotation.

use glam::{Vec2, Vec3};

/// Radius used until the first resize
pub const DEFAULT_TRACKBALL_RADIUS: f32 = 300.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trackball {
    radius: f32,
}

impl Default for Trackball {
    fn default() -> Self {
        Self::new(DEFAULT_TRACKBALL_RADIUS)
    }
}

impl Trackball {
    pub fn new(radius: f32) -> Self {
        Self { radius }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Fit the sphere to the window
    pub fn resize(&mut self, window: Vec2) {
        self.radius = window.x.min(window.y) / 2.0;
    }

    /// Project a pixel position onto the trackball surface
    ///
    /// Pixel coordinates have their origin at the top-left corner with y
    /// pointing down; the result is centered on the window with y up.
    pub fn project(&self, pixel: Vec2, window: Vec2) -> Vec3 {
        let x = pixel.x - window.x / 2.0;
        let y = window.y / 2.0 - pixel.y;
        let d2 = x * x + y * y;
        let r2 = self.radius * self.radius;

        let z = if d2 < r2 / 2.0 {
            (r2 - d2).sqrt()
        } else {
            r2 / (2.0 * d2.sqrt())
        };
        Vec3::new(x, y, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Vec2 = Vec2::new(800.0, 600.0);

    #[test]
    fn test_center_is_top_of_sphere() {
        let trackball = Trackball::default();
        let p = trackball.project(WINDOW / 2.0, WINDOW);
        assert_eq!(p, Vec3::new(0.0, 0.0, 300.0));
    }

    #[test]
    fn test_inner_region_lies_on_sphere() {
        let trackball = Trackball::new(250.0);
        for pixel in [
            Vec2::new(400.0, 300.0),
            Vec2::new(450.0, 250.0),
            Vec2::new(300.0, 400.0),
            Vec2::new(520.0, 310.0),
        ] {
            let p = trackball.project(pixel, WINDOW);
            assert!((p.length() - 250.0).abs() < 1e-3, "{p:?}");
        }
    }

    #[test]
    fn test_outer_region_lies_on_hyperbola() {
        let trackball = Trackball::new(250.0);
        for pixel in [Vec2::new(0.0, 0.0), Vec2::new(790.0, 300.0), Vec2::new(400.0, 20.0)] {
            let p = trackball.project(pixel, WINDOW);
            let d2 = p.x * p.x + p.y * p.y;
            let r2 = 250.0f32 * 250.0;
            assert!((4.0 * p.z * p.z * d2 - r2 * r2).abs() / (r2 * r2) < 1e-4);
        }
    }

    #[test]
    fn test_vertical_axis_is_inverted() {
        let trackball = Trackball::default();
        let p = trackball.project(Vec2::new(400.0, 200.0), WINDOW);
        assert_eq!(p.y, 100.0);
    }

    #[test]
    fn test_resize_uses_smaller_side() {
        let mut trackball = Trackball::default();
        trackball.resize(Vec2::new(1920.0, 1080.0));
        assert_eq!(trackball.radius(), 540.0);
    }
}
