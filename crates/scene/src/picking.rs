//! Ray casting from the viewport
//!
//! Object picking goes through each object's BVH. Element picking tests the
//! isolated object's triangles directly and turns the barycentric weights of
//! the hit into a vertex, edge, half-edge, or face.

use glam::{Mat4, Vec2, Vec3, Vec4};
use mesh::half_edge::{HalfEdgeMesh, VertexId};
use mesh::{naive_intersect, Intersection, Ray};

use crate::camera::Camera;
use crate::selection::Selection;
use crate::world::{Object, ObjectId, Scene};

/// Weight above which the hit snaps to a corner
pub const VERTEX_WEIGHT: f32 = 0.9;
/// Weight below which the hit lies near the opposite edge
pub const EDGE_WEIGHT: f32 = 0.1;
/// Above this (and below [`EDGE_WEIGHT`]) the directed half-edge is picked
pub const HALFEDGE_WEIGHT: f32 = 0.05;

/// Which part of a triangle a barycentric hit refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementTarget {
    /// Corner index 0..3
    Vertex(usize),
    /// Edge opposite corner `opposite`; `directed` picks the half-edge
    Edge { opposite: usize, directed: bool },
    Face,
}

/// Classify barycentric weights `(w0, w1, w2)` of a triangle hit
pub fn classify_barycentric(weights: Vec3) -> ElementTarget {
    let w = weights.to_array();
    let max_corner = argmax(&w);
    let min_corner = argmin(&w);

    if w[max_corner] > VERTEX_WEIGHT {
        ElementTarget::Vertex(max_corner)
    } else if w[min_corner] < EDGE_WEIGHT {
        ElementTarget::Edge {
            opposite: min_corner,
            directed: w[min_corner] > HALFEDGE_WEIGHT,
        }
    } else {
        ElementTarget::Face
    }
}

fn argmax(w: &[f32; 3]) -> usize {
    (1..3).fold(0, |best, i| if w[i] > w[best] { i } else { best })
}

fn argmin(w: &[f32; 3]) -> usize {
    (1..3).fold(0, |best, i| if w[i] < w[best] { i } else { best })
}

/// World-space ray through a pixel
///
/// The far-plane point under the pixel is recovered through the inverse
/// view-projection; the ray starts at the camera position.
pub fn generate_ray(window: Vec2, pixel: Vec2, camera: &Camera) -> Ray {
    let ndc_x = 2.0 * pixel.x / window.x - 1.0;
    let ndc_y = 1.0 - 2.0 * pixel.y / window.y;
    let inv_view_projection: Mat4 = camera.view_projection().inverse();
    let far = inv_view_projection * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);
    let far = far.truncate() / far.w;
    Ray::new(camera.position, far - camera.position)
}

/// Closest object hit by the ray, across all groups
pub fn pick_object(ray: &Ray, scene: &Scene) -> Option<(ObjectId, Intersection)> {
    let mut closest: Option<(ObjectId, Intersection)> = None;
    for object in scene.objects() {
        if let Some(hit) = object.intersect(ray) {
            if closest.is_none_or(|(_, prev)| hit.t < prev.t) {
                closest = Some((object.id, hit));
            }
        }
    }
    if let Some((id, hit)) = &closest {
        tracing::debug!("Picked object {:?} at t = {}", id, hit.t);
    }
    closest
}

/// Sub-element of the isolated object hit by the ray
///
/// Vertex and face ids of `mesh` must match the object's triangle list.
pub fn pick_element(ray: &Ray, mesh: &HalfEdgeMesh, object: &Object) -> Option<Selection> {
    let hit = naive_intersect(ray, object.mesh(), &object.model)?;
    let corners = object.mesh().face(hit.face_index).map(VertexId);
    tracing::debug!(
        "Element hit on face {} with barycentric {:?}",
        hit.face_index,
        hit.barycentric
    );

    let selection = match classify_barycentric(hit.barycentric) {
        ElementTarget::Vertex(corner) => Selection::Vertex(corners[corner]),
        ElementTarget::Edge { opposite, directed } => {
            let from = corners[(opposite + 1) % 3];
            let to = corners[(opposite + 2) % 3];
            let he_id = mesh.half_edge_around(from, to)?;
            if directed {
                Selection::Halfedge(he_id)
            } else {
                Selection::Edge(mesh.half_edge(he_id)?.edge)
            }
        }
        ElementTarget::Face => {
            let he_id = mesh.half_edge_around(corners[0], corners[1])?;
            Selection::Face(mesh.half_edge(he_id)?.face?)
        }
    };
    Some(selection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh::TriangleMesh;
    use mesh::half_edge::FaceId;

    #[test]
    fn test_classify_dead_zones() {
        assert_eq!(
            classify_barycentric(Vec3::new(0.95, 0.03, 0.02)),
            ElementTarget::Vertex(0)
        );
        assert_eq!(
            classify_barycentric(Vec3::new(0.3, 0.05, 0.65)),
            ElementTarget::Edge {
                opposite: 1,
                directed: false
            }
        );
        assert_eq!(
            classify_barycentric(Vec3::new(0.3, 0.07, 0.63)),
            ElementTarget::Edge {
                opposite: 1,
                directed: true
            }
        );
        assert_eq!(
            classify_barycentric(Vec3::new(0.4, 0.35, 0.25)),
            ElementTarget::Face
        );
    }

    #[test]
    fn test_generate_ray_through_center_hits_target() {
        let camera = Camera::default();
        let window = Vec2::new(600.0, 800.0);
        let ray = generate_ray(window, window / 2.0, &camera);
        let expected = (camera.target - camera.position).normalize();
        assert_eq!(ray.origin, camera.position);
        assert!((ray.direction - expected).length() < 1e-4);
    }

    #[test]
    fn test_generate_ray_top_of_window_points_up() {
        let camera = Camera::default();
        let window = Vec2::new(600.0, 800.0);
        let center = generate_ray(window, window / 2.0, &camera);
        let top = generate_ray(window, Vec2::new(300.0, 0.0), &camera);
        assert!(top.direction.dot(camera.up_axis()) > center.direction.dot(camera.up_axis()));
    }

    #[test]
    fn test_nearest_object_wins() {
        let mut scene = Scene::new();
        let group = scene.add_group("props");
        let far = scene
            .add_object(
                group,
                "far",
                TriangleMesh::cube(1.0),
                Mat4::from_translation(Vec3::new(0.0, 0.0, -10.0)),
            )
            .unwrap();
        let near = scene
            .add_object(group, "near", TriangleMesh::cube(0.5), Mat4::IDENTITY)
            .unwrap();

        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z);
        assert_eq!(pick_object(&ray, &scene).map(|(id, _)| id), Some(near));

        // Offset past the small cube only the far one is hit
        let ray = Ray::new(Vec3::new(0.8, 0.0, 10.0), Vec3::NEG_Z);
        assert_eq!(pick_object(&ray, &scene).map(|(id, _)| id), Some(far));

        let ray = Ray::new(Vec3::new(0.0, 5.0, 10.0), Vec3::NEG_Z);
        assert!(pick_object(&ray, &scene).is_none());
    }

    fn quad_scene() -> (Scene, ObjectId) {
        let mut scene = Scene::new();
        let group = scene.add_group("props");
        let id = scene
            .add_object(group, "quad", TriangleMesh::quad(1.0), Mat4::IDENTITY)
            .unwrap();
        scene.isolate(id).unwrap();
        (scene, id)
    }

    fn pick_at(scene: &Scene, id: ObjectId, x: f32, y: f32) -> Option<Selection> {
        let editable = scene.editable_mesh().unwrap();
        let object = scene.object(id).unwrap();
        let ray = Ray::new(Vec3::new(x, y, 5.0), Vec3::NEG_Z);
        pick_element(&ray, &editable.mesh, object)
    }

    #[test]
    fn test_pick_element_vertex_edge_face() {
        let (scene, id) = quad_scene();
        let mesh = &scene.editable_mesh().unwrap().mesh;
        // Just inside triangle 0 next to corner (-1, -1)
        let near_corner = Vec3::new(-0.97, -0.98, 0.0);
        assert_eq!(
            pick_at(&scene, id, near_corner.x, near_corner.y),
            Some(Selection::Vertex(VertexId(0)))
        );

        // Inside triangle 0, away from edges
        let face0 = TriangleMesh::quad(1.0).triangle_positions(0);
        let centroid = (face0[0] + face0[1] + face0[2]) / 3.0;
        assert_eq!(
            pick_at(&scene, id, centroid.x, centroid.y),
            Some(Selection::Face(FaceId(0)))
        );

        // On the diagonal shared by both triangles
        let on_diagonal = (face0[0] + face0[2]) / 2.0;
        match pick_at(&scene, id, on_diagonal.x + 0.001, on_diagonal.y - 0.001) {
            Some(Selection::Edge(edge)) => {
                let (a, b) = mesh.edge_endpoints(edge).unwrap();
                let mut ends = [a.0, b.0];
                ends.sort();
                assert_eq!(ends, [0, 2]);
            }
            other => panic!("expected the diagonal edge, got {other:?}"),
        }

        assert_eq!(pick_at(&scene, id, 3.0, 3.0), None);
    }

    #[test]
    fn test_pick_element_halfedge_band() {
        let (scene, id) = quad_scene();
        let mesh = &scene.editable_mesh().unwrap().mesh;
        let [a, b, c] = TriangleMesh::quad(1.0).triangle_positions(0);
        // Weight 0.07 on corner 2, so next to edge 0 -> 1
        let point = a * 0.5 + b * 0.43 + c * 0.07;
        match pick_at(&scene, id, point.x, point.y) {
            Some(Selection::Halfedge(he)) => {
                assert_eq!(
                    mesh.half_edge_endpoints(he),
                    Some((VertexId(0), VertexId(1)))
                );
            }
            other => panic!("expected a half-edge, got {other:?}"),
        }
    }
}
