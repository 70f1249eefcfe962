//! Overlay geometry for the current selection
//!
//! Buffers are rebuilt from scratch whenever the selection changes and are
//! uploaded lazily: [`HighlightGeometry::to_gpu`] marks the buffer dirty and
//! the render pass consumes the flag.

use glam::{Mat4, Vec3};
use mesh::Aabb;

/// GPU vertex of an overlay buffer
///
/// This struct is designed for GPU compatibility with bytemuck.
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct HighlightVertex {
    pub position: [f32; 3],
}

impl From<Vec3> for HighlightVertex {
    fn from(position: Vec3) -> Self {
        Self {
            position: position.to_array(),
        }
    }
}

/// Point, line, and polygon buffers drawn on top of the scene
#[derive(Debug, Clone)]
pub struct HighlightGeometry {
    pub name: String,
    pub vertices: Vec<HighlightVertex>,
    /// Line segments as vertex index pairs
    pub edges: Vec<[u32; 2]>,
    /// Polygons as vertex index rings
    pub faces: Vec<Vec<u32>>,
    /// Transform applied when drawing
    pub model: Mat4,
    pending_upload: bool,
}

impl HighlightGeometry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vertices: Vec::new(),
            edges: Vec::new(),
            faces: Vec::new(),
            model: Mat4::IDENTITY,
            pending_upload: false,
        }
    }

    /// Empty every buffer and reset the transform
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.edges.clear();
        self.faces.clear();
        self.model = Mat4::IDENTITY;
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn push_vertex(&mut self, position: Vec3) -> u32 {
        self.vertices.push(position.into());
        (self.vertices.len() - 1) as u32
    }

    pub fn push_segment(&mut self, a: Vec3, b: Vec3) {
        let ia = self.push_vertex(a);
        let ib = self.push_vertex(b);
        self.edges.push([ia, ib]);
    }

    pub fn push_polygon(&mut self, ring: &[Vec3]) {
        let indices = ring.iter().map(|p| self.push_vertex(*p)).collect();
        self.faces.push(indices);
    }

    /// Twelve edges of each box
    pub fn push_box(&mut self, aabb: &Aabb) {
        const BOX_EDGES: [[u32; 2]; 12] = [
            [0, 1], [2, 3], [4, 5], [6, 7],
            [0, 2], [1, 3], [4, 6], [5, 7],
            [0, 4], [1, 5], [2, 6], [3, 7],
        ];
        let base = self.vertices.len() as u32;
        for corner in aabb.corners() {
            self.push_vertex(corner);
        }
        self.edges
            .extend(BOX_EDGES.iter().map(|[a, b]| [base + a, base + b]));
    }

    /// Overwrite existing vertex positions without touching connectivity
    pub fn set_positions(&mut self, positions: &[Vec3]) {
        for (vertex, position) in self.vertices.iter_mut().zip(positions) {
            *vertex = (*position).into();
        }
    }

    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.vertices.iter().map(|v| Vec3::from_array(v.position))
    }

    /// Position of a vertex by index
    pub fn position(&self, index: u32) -> Option<Vec3> {
        self.vertices
            .get(index as usize)
            .map(|v| Vec3::from_array(v.position))
    }

    /// Raw vertex data for upload
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Request an upload on the next render pass
    pub fn to_gpu(&mut self) {
        self.pending_upload = true;
    }

    pub fn needs_upload(&self) -> bool {
        self.pending_upload
    }

    /// Consume the upload request
    pub fn take_upload(&mut self) -> bool {
        std::mem::take(&mut self.pending_upload)
    }
}
