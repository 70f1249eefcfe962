//! Bounding volume hierarchy for object-level picking.
//!
//! Each scene object owns one [`Bvh`] over its own triangles. The tree is built
//! once with a median split on the longest axis and stored flat.

use glam::{Mat4, Vec3};

use crate::ray::Ray;
use crate::raycast::{intersect_triangle, Intersection};
use crate::triangle_mesh::TriangleMesh;

/// Triangles per leaf before a node is split
const MAX_LEAF_TRIANGLES: usize = 4;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::MAX),
            max: Vec3::splat(f32::MIN),
        }
    }

    pub fn include_point(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// The eight corners, ordered by the bit pattern `x | y << 1 | z << 2`
    pub fn corners(&self) -> [Vec3; 8] {
        std::array::from_fn(|i| {
            Vec3::new(
                if i & 1 != 0 { self.max.x } else { self.min.x },
                if i & 2 != 0 { self.max.y } else { self.min.y },
                if i & 4 != 0 { self.max.z } else { self.min.z },
            )
        })
    }

    /// Slab test. Returns the entry parameter, clamped to zero when the origin is inside.
    pub fn intersect_ray(&self, origin: Vec3, inv_dir: Vec3, max_t: f32) -> Option<f32> {
        let t0 = (self.min - origin) * inv_dir;
        let t1 = (self.max - origin) * inv_dir;
        let t_enter = t0.min(t1).max_element().max(0.0);
        let t_exit = t0.max(t1).min_element();
        if t_exit >= t_enter && t_enter <= max_t {
            Some(t_enter)
        } else {
            None
        }
    }

    fn longest_axis(&self) -> usize {
        let size = self.size();
        if size.x >= size.y && size.x >= size.z {
            0
        } else if size.y >= size.z {
            1
        } else {
            2
        }
    }
}

#[derive(Debug, Clone)]
enum BvhNode {
    Leaf {
        bounds: Aabb,
        start: usize,
        count: usize,
    },
    Internal {
        bounds: Aabb,
        left: usize,
        right: usize,
    },
}

impl BvhNode {
    fn bounds(&self) -> &Aabb {
        match self {
            BvhNode::Leaf { bounds, .. } | BvhNode::Internal { bounds, .. } => bounds,
        }
    }
}

/// Bounding volume hierarchy over the triangles of one mesh
///
/// The tree stores triangle indices only, so the mesh it was built from must be
/// passed back in when intersecting.
#[derive(Debug, Clone)]
pub struct Bvh {
    nodes: Vec<BvhNode>,
    triangles: Vec<usize>,
}

impl Bvh {
    pub fn build(mesh: &TriangleMesh) -> Self {
        let mut bvh = Self {
            nodes: Vec::new(),
            triangles: (0..mesh.triangle_count()).collect(),
        };
        if bvh.triangles.is_empty() {
            return bvh;
        }

        let centroids: Vec<Vec3> = (0..mesh.triangle_count())
            .map(|tri| {
                let [a, b, c] = mesh.triangle_positions(tri);
                (a + b + c) / 3.0
            })
            .collect();

        let count = bvh.triangles.len();
        bvh.build_node(mesh, &centroids, 0, count);
        tracing::trace!(
            "built BVH with {} nodes over {} triangles",
            bvh.nodes.len(),
            count
        );
        bvh
    }

    /// Build the node covering `triangles[start..end]` and return its index
    fn build_node(
        &mut self,
        mesh: &TriangleMesh,
        centroids: &[Vec3],
        start: usize,
        end: usize,
    ) -> usize {
        let mut bounds = Aabb::empty();
        for &tri in &self.triangles[start..end] {
            for p in mesh.triangle_positions(tri) {
                bounds.include_point(p);
            }
        }

        let index = self.nodes.len();
        let count = end - start;
        if count <= MAX_LEAF_TRIANGLES {
            self.nodes.push(BvhNode::Leaf {
                bounds,
                start,
                count,
            });
            return index;
        }

        let mut centroid_bounds = Aabb::empty();
        for &tri in &self.triangles[start..end] {
            centroid_bounds.include_point(centroids[tri]);
        }
        let axis = centroid_bounds.longest_axis();
        self.triangles[start..end]
            .sort_unstable_by(|a, b| centroids[*a][axis].total_cmp(&centroids[*b][axis]));

        // Reserve the slot, children are patched in once built
        self.nodes.push(BvhNode::Leaf {
            bounds,
            start,
            count,
        });
        let mid = start + count / 2;
        let left = self.build_node(mesh, centroids, start, mid);
        let right = self.build_node(mesh, centroids, mid, end);
        self.nodes[index] = BvhNode::Internal {
            bounds,
            left,
            right,
        };
        index
    }

    /// Closest hit of `ray` against `mesh` placed in the world by `model`
    ///
    /// `t` is measured along the world-space ray, so hits of different objects
    /// can be compared directly.
    pub fn intersect(&self, ray: &Ray, mesh: &TriangleMesh, model: &Mat4) -> Option<Intersection> {
        if self.nodes.is_empty() {
            return None;
        }

        let local = ray.to_local(model);
        let inv_dir = local.direction.recip();
        let mut closest: Option<Intersection> = None;
        let mut stack = vec![0usize];

        while let Some(node_index) = stack.pop() {
            let node = &self.nodes[node_index];
            let max_t = closest.map_or(f32::MAX, |hit| hit.t);
            if node
                .bounds()
                .intersect_ray(local.origin, inv_dir, max_t)
                .is_none()
            {
                continue;
            }

            match node {
                BvhNode::Leaf { start, count, .. } => {
                    for &tri in &self.triangles[*start..*start + *count] {
                        if let Some(hit) = intersect_triangle(&local, mesh, tri) {
                            if closest.is_none_or(|prev| hit.t < prev.t) {
                                closest = Some(hit);
                            }
                        }
                    }
                }
                BvhNode::Internal { left, right, .. } => {
                    stack.push(*right);
                    stack.push(*left);
                }
            }
        }

        closest
    }

    /// Bounds of every node, root first
    pub fn boxes(&self) -> Vec<Aabb> {
        self.nodes.iter().map(|node| *node.bounds()).collect()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of levels below and including the root
    pub fn depth(&self) -> usize {
        fn depth_of(nodes: &[BvhNode], index: usize) -> usize {
            match &nodes[index] {
                BvhNode::Leaf { .. } => 1,
                BvhNode::Internal { left, right, .. } => {
                    1 + depth_of(nodes, *left).max(depth_of(nodes, *right))
                }
            }
        }
        if self.nodes.is_empty() {
            0
        } else {
            depth_of(&self.nodes, 0)
        }
    }
}
