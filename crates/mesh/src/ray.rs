//! Rays used for picking.

use glam::{Mat4, Vec3};

/// A ray with an origin and a direction
///
/// Rays built with [`Ray::new`] have a normalized direction so hit parameters
/// are world distances. [`Ray::to_local`] keeps the transformed direction
/// unnormalized, which preserves `t` across the transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Point at parameter `t` along the ray
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Move the ray into the space of a model transform
    ///
    /// `model` maps object space to world space. A hit at `t` against the
    /// returned ray is the same point as `self.at(t)` in world space.
    pub fn to_local(&self, model: &Mat4) -> Ray {
        let inverse = model.inverse();
        Ray {
            origin: inverse.transform_point3(self.origin),
            direction: inverse.transform_vector3(self.direction),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_direction() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -4.0));
        assert!((ray.direction.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_to_local_preserves_parameter() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z);
        let model = Mat4::from_scale_rotation_translation(
            Vec3::splat(2.0),
            glam::Quat::from_rotation_y(0.7),
            Vec3::new(1.0, -2.0, 3.0),
        );
        let local = ray.to_local(&model);
        let t = 4.5;
        let world_from_local = model.transform_point3(local.at(t));
        assert!((world_from_local - ray.at(t)).length() < 1e-4);
    }
}
