//! Topology query methods for HalfEdgeMesh.

use glam::Vec3;

use super::types::{Edge, EdgeId, Face, FaceId, HalfEdge, HalfEdgeId, Vertex, VertexId};
use super::HalfEdgeMesh;

impl HalfEdgeMesh {
    // ========================================================================
    // Accessors
    // ========================================================================

    /// Get vertex by ID
    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(id.0 as usize)
    }

    /// Get mutable vertex by ID
    pub fn vertex_mut(&mut self, id: VertexId) -> Option<&mut Vertex> {
        self.vertices.get_mut(id.0 as usize)
    }

    /// Get half-edge by ID
    pub fn half_edge(&self, id: HalfEdgeId) -> Option<&HalfEdge> {
        self.half_edges.get(id.0 as usize)
    }

    /// Get edge by ID
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.0 as usize)
    }

    /// Get face by ID
    pub fn face(&self, id: FaceId) -> Option<&Face> {
        self.faces.get(id.0 as usize)
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn half_edges(&self) -> &[HalfEdge] {
        &self.half_edges
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    // ========================================================================
    // Topology Queries
    // ========================================================================

    /// Find the half-edge going from `from` to `to` by direct lookup
    pub fn find_half_edge(&self, from: VertexId, to: VertexId) -> Option<HalfEdgeId> {
        self.edge_map.get(&(from, to)).copied()
    }

    /// Destination vertex of a half-edge
    pub fn get_half_edge_dest(&self, he_id: HalfEdgeId) -> Option<VertexId> {
        let he = self.half_edge(he_id)?;
        self.half_edge(he.next).map(|next| next.origin)
    }

    /// All half-edges leaving a vertex, in ring order
    ///
    /// Rotates through `prev.twin`. When the ring is open at a boundary the
    /// remaining half-edges are collected by rotating the other way through
    /// `twin.next`.
    pub fn outgoing_half_edges(&self, vertex_id: VertexId) -> Vec<HalfEdgeId> {
        let mut ring = Vec::new();
        let Some(start) = self.vertex(vertex_id).and_then(|v| v.outgoing_half_edge) else {
            return ring;
        };

        let mut current = start;
        let mut closed = false;
        loop {
            ring.push(current);
            let Some(next) = self
                .half_edge(current)
                .and_then(|he| self.half_edge(he.prev))
                .and_then(|prev| prev.twin)
            else {
                break;
            };
            if next == start {
                closed = true;
                break;
            }
            if ring.contains(&next) {
                break;
            }
            current = next;
        }

        if !closed {
            let mut current = start;
            while let Some(next) = self
                .half_edge(current)
                .and_then(|he| he.twin)
                .and_then(|twin| self.half_edge(twin))
                .map(|twin| twin.next)
            {
                if ring.contains(&next) {
                    break;
                }
                ring.push(next);
                current = next;
            }
        }

        ring
    }

    /// Half-edge from `from` to `to`, found by walking the ring of `from`
    pub fn half_edge_around(&self, from: VertexId, to: VertexId) -> Option<HalfEdgeId> {
        self.outgoing_half_edges(from)
            .into_iter()
            .find(|&he| self.get_half_edge_dest(he) == Some(to))
            .or_else(|| self.find_half_edge(from, to))
    }

    /// Vertices around a face, in winding order
    pub fn get_face_vertices(&self, face_id: FaceId) -> Vec<VertexId> {
        let mut vertices = Vec::new();
        let Some(face) = self.face(face_id) else {
            return vertices;
        };

        let start = face.half_edge;
        let mut current = start;
        loop {
            let Some(he) = self.half_edge(current) else {
                break;
            };
            vertices.push(he.origin);
            current = he.next;
            if current == start || vertices.len() > self.half_edges.len() {
                break;
            }
        }
        vertices
    }

    /// Origin and destination vertex of an edge's representative half-edge
    pub fn edge_endpoints(&self, edge_id: EdgeId) -> Option<(VertexId, VertexId)> {
        let he_id = self.edge(edge_id)?.half_edge;
        self.half_edge_endpoints(he_id)
    }

    pub fn half_edge_endpoints(&self, he_id: HalfEdgeId) -> Option<(VertexId, VertexId)> {
        let origin = self.half_edge(he_id)?.origin;
        let dest = self.get_half_edge_dest(he_id)?;
        Some((origin, dest))
    }

    pub fn position(&self, vertex_id: VertexId) -> Option<Vec3> {
        self.vertex(vertex_id).map(|v| v.position)
    }

    /// Average of a face's vertex positions
    pub fn face_centroid(&self, face_id: FaceId) -> Option<Vec3> {
        let vertices = self.get_face_vertices(face_id);
        if vertices.is_empty() {
            return None;
        }
        let sum: Vec3 = vertices.iter().filter_map(|&v| self.position(v)).sum();
        Some(sum / vertices.len() as f32)
    }

    /// Endpoints of the arrow drawn for a half-edge
    ///
    /// The segment is shortened by 10% at each end and pulled 10% of the way
    /// toward the centroid of its face, so the two halves of an edge do not
    /// overlap on screen.
    pub fn halfedge_arrow_endpoints(&self, he_id: HalfEdgeId) -> Option<(Vec3, Vec3)> {
        let (origin, dest) = self.half_edge_endpoints(he_id)?;
        let a = self.position(origin)?;
        let b = self.position(dest)?;
        let start = a.lerp(b, 0.1);
        let end = a.lerp(b, 0.9);

        match self.half_edge(he_id)?.face.and_then(|f| self.face_centroid(f)) {
            Some(centroid) => Some((start.lerp(centroid, 0.1), end.lerp(centroid, 0.1))),
            None => Some((start, end)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triangle_mesh::TriangleMesh;

    fn quad() -> HalfEdgeMesh {
        HalfEdgeMesh::from_triangle_mesh(&TriangleMesh::quad(1.0)).unwrap()
    }

    #[test]
    fn test_ring_of_closed_vertex() {
        let mesh = HalfEdgeMesh::from_triangle_mesh(&TriangleMesh::cube(1.0)).unwrap();
        for vertex in mesh.vertices() {
            let ring = mesh.outgoing_half_edges(vertex.id);
            let expected = mesh
                .half_edges()
                .iter()
                .filter(|he| he.origin == vertex.id)
                .count();
            assert_eq!(ring.len(), expected);
            for he in ring {
                assert_eq!(mesh.half_edge(he).unwrap().origin, vertex.id);
            }
        }
    }

    #[test]
    fn test_ring_of_boundary_vertex() {
        let mesh = quad();
        // Vertex 0 sits on the boundary and touches both triangles
        let ring = mesh.outgoing_half_edges(VertexId(0));
        assert_eq!(ring.len(), 2);
        let mut dests: Vec<u32> = ring
            .iter()
            .map(|&he| mesh.get_half_edge_dest(he).unwrap().0)
            .collect();
        dests.sort();
        assert_eq!(dests, vec![1, 2]);
    }

    #[test]
    fn test_half_edge_around() {
        let mesh = quad();
        let he = mesh.half_edge_around(VertexId(2), VertexId(0)).unwrap();
        assert_eq!(
            mesh.half_edge_endpoints(he),
            Some((VertexId(2), VertexId(0)))
        );
        // 1 and 3 are not connected
        assert!(mesh.half_edge_around(VertexId(1), VertexId(3)).is_none());
    }

    #[test]
    fn test_face_vertices_follow_winding() {
        let mesh = quad();
        assert_eq!(
            mesh.get_face_vertices(FaceId(1)),
            vec![VertexId(0), VertexId(2), VertexId(3)]
        );
    }

    #[test]
    fn test_arrow_is_inset_toward_face() {
        let mesh = HalfEdgeMesh::from_triangles(
            &[Vec3::ZERO, Vec3::new(3.0, 0.0, 0.0), Vec3::new(0.0, 3.0, 0.0)],
            &[0, 1, 2],
        )
        .unwrap();
        let he = mesh.find_half_edge(VertexId(0), VertexId(1)).unwrap();
        let (start, end) = mesh.halfedge_arrow_endpoints(he).unwrap();

        assert!(start.x > 0.0 && end.x < 3.0);
        // Pulled off the edge into the triangle
        assert!(start.y > 0.0 && end.y > 0.0);
        assert!((end - start).length() < 2.4 + 1e-4);
    }
}
