//! Ray-mesh intersection for picking.
//!
//! This module provides ray-triangle intersection using the Moller-Trumbore algorithm
//! and a brute-force nearest-hit search over a whole triangle list.

use glam::{Mat4, Vec3};

use crate::ray::Ray;
use crate::triangle_mesh::TriangleMesh;

/// Epsilon for floating point comparisons in ray intersection
const EPSILON: f32 = 1e-6;

/// Result of a ray-triangle intersection test
#[derive(Debug, Clone, Copy)]
pub struct TriangleHit {
    /// Distance along the ray to the intersection point
    pub t: f32,
    /// Barycentric coordinate u (weight for vertex 1)
    pub u: f32,
    /// Barycentric coordinate v (weight for vertex 2)
    pub v: f32,
}

impl TriangleHit {
    /// Per-corner weights `(w0, w1, w2)`, summing to one
    pub fn barycentric(&self) -> Vec3 {
        Vec3::new(1.0 - self.u - self.v, self.u, self.v)
    }
}

/// Nearest hit of a ray against a mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Ray parameter of the hit
    pub t: f32,
    /// Index of the triangle that was hit
    pub face_index: usize,
    /// Weights of the triangle's three corners at the hit point
    pub barycentric: Vec3,
}

/// Moller-Trumbore test of a ray against one triangle, hitting either side
///
/// `t` is measured in multiples of `ray_dir`, which need not be unit length.
pub fn ray_triangle_intersection(
    ray_origin: Vec3,
    ray_dir: Vec3,
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
) -> Option<TriangleHit> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let pvec = ray_dir.cross(edge2);
    let det = edge1.dot(pvec);

    // Ray lies in the plane of the triangle or misses
    if det.abs() < EPSILON {
        return None;
    }

    let inv_det = 1.0 / det;
    let tvec = ray_origin - v0;

    let u = tvec.dot(pvec) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let qvec = tvec.cross(edge1);
    let v = ray_dir.dot(qvec) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = edge2.dot(qvec) * inv_det;

    // Only accept hits in front of the ray
    if t < EPSILON {
        return None;
    }

    Some(TriangleHit { t, u, v })
}

/// Intersect a ray against one triangle of a mesh, given a ray already in mesh space
pub(crate) fn intersect_triangle(
    local: &Ray,
    mesh: &TriangleMesh,
    tri_index: usize,
) -> Option<Intersection> {
    let [v0, v1, v2] = mesh.triangle_positions(tri_index);
    ray_triangle_intersection(local.origin, local.direction, v0, v1, v2).map(|hit| {
        Intersection {
            t: hit.t,
            face_index: tri_index,
            barycentric: hit.barycentric(),
        }
    })
}

/// Test every triangle of a mesh and return the closest hit.
///
/// `model` maps the mesh into world space; the returned `t` is measured
/// along the world-space `ray`.
pub fn naive_intersect(ray: &Ray, mesh: &TriangleMesh, model: &Mat4) -> Option<Intersection> {
    let local = ray.to_local(model);
    let mut closest: Option<Intersection> = None;

    for tri_index in 0..mesh.triangle_count() {
        if let Some(hit) = intersect_triangle(&local, mesh, tri_index) {
            if closest.is_none_or(|prev| hit.t < prev.t) {
                closest = Some(hit);
            }
        }
    }

    closest
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: [Vec3; 3] = [Vec3::ZERO, Vec3::X, Vec3::Y];

    fn hit(origin: Vec3, dir: Vec3) -> Option<TriangleHit> {
        let [v0, v1, v2] = TRIANGLE;
        ray_triangle_intersection(origin, dir, v0, v1, v2)
    }

    #[test]
    fn test_triangle_is_two_sided() {
        let front = hit(Vec3::new(0.2, 0.6, 2.0), Vec3::NEG_Z).unwrap();
        let back = hit(Vec3::new(0.2, 0.6, -2.0), Vec3::Z).unwrap();
        assert!((front.t - 2.0).abs() < 1e-6);
        assert!((back.t - 2.0).abs() < 1e-6);
        assert!((front.barycentric() - back.barycentric()).length() < 1e-6);
        assert!((front.barycentric() - Vec3::new(0.2, 0.2, 0.6)).length() < 1e-6);
    }

    #[test]
    fn test_t_scales_with_direction_length() {
        // Local-space rays keep the scale of the model transform
        let unit = hit(Vec3::new(0.1, 0.1, 3.0), Vec3::NEG_Z).unwrap();
        let scaled = hit(Vec3::new(0.1, 0.1, 3.0), Vec3::NEG_Z * 4.0).unwrap();
        assert!((unit.t - 3.0).abs() < 1e-6);
        assert!((scaled.t - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_corner_hit_weights_one_vertex() {
        let corner = hit(Vec3::new(1.0, 0.0, 1.0), Vec3::NEG_Z).unwrap();
        assert!((corner.barycentric() - Vec3::new(0.0, 1.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_rejected_rays() {
        // Outside the hypotenuse
        assert!(hit(Vec3::new(0.6, 0.6, 1.0), Vec3::NEG_Z).is_none());
        // In the triangle's plane
        assert!(hit(Vec3::new(-1.0, 0.2, 0.0), Vec3::X).is_none());
        // Triangle behind the origin
        assert!(hit(Vec3::new(0.2, 0.2, 1.0), Vec3::Z).is_none());
    }

    #[test]
    fn test_naive_intersect_picks_front_face() {
        let cube = TriangleMesh::cube(1.0);
        let ray = Ray::new(Vec3::new(0.2, 0.3, 5.0), Vec3::NEG_Z);
        let hit = naive_intersect(&ray, &cube, &Mat4::IDENTITY).unwrap();
        // The +z side is made of the first two triangles
        assert!(hit.face_index < 2);
        assert!((hit.t - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_naive_intersect_respects_model_transform() {
        let cube = TriangleMesh::cube(1.0);
        let model = Mat4::from_translation(Vec3::new(0.0, 0.0, -3.0));
        let ray = Ray::new(Vec3::new(0.0, 0.1, 5.0), Vec3::NEG_Z);
        let hit = naive_intersect(&ray, &cube, &model).unwrap();
        assert!((hit.t - 7.0).abs() < 1e-5);
    }

    #[test]
    fn test_naive_intersect_miss() {
        let quad = TriangleMesh::quad(1.0);
        let ray = Ray::new(Vec3::new(3.0, 0.0, 1.0), Vec3::NEG_Z);
        assert!(naive_intersect(&ray, &quad, &Mat4::IDENTITY).is_none());
    }
}
