//! Indexed triangle meshes.
//!
//! This is the raw triangle soup each scene object carries. Picking against a
//! single isolated object walks it directly, object-level picking goes through
//! the object's [`crate::Bvh`].

use glam::Vec3;

use crate::bvh::Aabb;

/// Errors raised when building a triangle mesh from raw buffers
#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    #[error("Mesh has no positions")]
    NoPositions,
    #[error("Index count {0} is not divisible by 3")]
    IndexCount(usize),
    #[error("Index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },
}

/// Indexed triangle list in object space
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleMesh {
    positions: Vec<Vec3>,
    indices: Vec<u32>,
}

impl TriangleMesh {
    /// Build a mesh, checking that every index refers to a position
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Result<Self, MeshError> {
        if positions.is_empty() {
            return Err(MeshError::NoPositions);
        }
        if indices.len() % 3 != 0 {
            return Err(MeshError::IndexCount(indices.len()));
        }
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= positions.len()) {
            return Err(MeshError::IndexOutOfRange {
                index,
                vertex_count: positions.len(),
            });
        }
        Ok(Self { positions, indices })
    }

    /// Axis-aligned cube centered at the origin
    pub fn cube(half_extent: f32) -> Self {
        let h = half_extent;
        let positions = vec![
            Vec3::new(-h, -h, -h),
            Vec3::new(h, -h, -h),
            Vec3::new(h, h, -h),
            Vec3::new(-h, h, -h),
            Vec3::new(-h, -h, h),
            Vec3::new(h, -h, h),
            Vec3::new(h, h, h),
            Vec3::new(-h, h, h),
        ];
        #[rustfmt::skip]
        let indices = vec![
            4, 5, 6, 4, 6, 7, // +z
            1, 0, 3, 1, 3, 2, // -z
            5, 1, 2, 5, 2, 6, // +x
            0, 4, 7, 0, 7, 3, // -x
            7, 6, 2, 7, 2, 3, // +y
            0, 1, 5, 0, 5, 4, // -y
        ];
        Self { positions, indices }
    }

    /// Regular tetrahedron inscribed in the cube of the given half extent
    pub fn tetrahedron(half_extent: f32) -> Self {
        let h = half_extent;
        let positions = vec![
            Vec3::new(h, h, h),
            Vec3::new(h, -h, -h),
            Vec3::new(-h, h, -h),
            Vec3::new(-h, -h, h),
        ];
        let indices = vec![0, 1, 2, 0, 3, 1, 0, 2, 3, 1, 3, 2];
        Self { positions, indices }
    }

    /// Square in the XY plane facing +z, split along its 0-2 diagonal
    pub fn quad(half_extent: f32) -> Self {
        let h = half_extent;
        let positions = vec![
            Vec3::new(-h, -h, 0.0),
            Vec3::new(h, -h, 0.0),
            Vec3::new(h, h, 0.0),
            Vec3::new(-h, h, 0.0),
        ];
        let indices = vec![0, 1, 2, 0, 2, 3];
        Self { positions, indices }
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Vertex indices of a triangle
    pub fn face(&self, tri_index: usize) -> [u32; 3] {
        let base = tri_index * 3;
        [
            self.indices[base],
            self.indices[base + 1],
            self.indices[base + 2],
        ]
    }

    /// Vertex positions of a triangle
    pub fn triangle_positions(&self, tri_index: usize) -> [Vec3; 3] {
        self.face(tri_index).map(|i| self.positions[i as usize])
    }

    /// Bounds of all positions
    pub fn bounds(&self) -> Aabb {
        let mut bounds = Aabb::empty();
        for p in &self.positions {
            bounds.include_point(*p);
        }
        bounds
    }

    /// Each undirected edge once, as pairs of vertex indices
    pub fn wireframe_edges(&self) -> Vec<[u32; 2]> {
        let mut edges: Vec<[u32; 2]> = Vec::with_capacity(self.indices.len());
        for tri in self.indices.chunks_exact(3) {
            for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                let key = [a.min(b), a.max(b)];
                if !edges.contains(&key) {
                    edges.push(key);
                }
            }
        }
        edges
    }
}
