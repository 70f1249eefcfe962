//! Construction methods for HalfEdgeMesh.

use glam::Vec3;
use std::collections::HashMap;

use super::types::{
    Edge, EdgeId, Face, FaceId, HalfEdge, HalfEdgeError, HalfEdgeId, Vertex, VertexId,
};
use super::HalfEdgeMesh;
use crate::triangle_mesh::TriangleMesh;

impl HalfEdgeMesh {
    /// Build a half-edge mesh from a triangle mesh
    pub fn from_triangle_mesh(mesh: &TriangleMesh) -> Result<Self, HalfEdgeError> {
        Self::from_triangles(mesh.positions(), mesh.indices())
    }

    /// Build a half-edge mesh from positions and triangle indices
    ///
    /// Vertex `i` gets `VertexId(i)` and triangle `t` gets `FaceId(t)`, so
    /// hits against the source triangle list map straight onto the topology.
    pub fn from_triangles(positions: &[Vec3], indices: &[u32]) -> Result<Self, HalfEdgeError> {
        if positions.is_empty() {
            return Err(HalfEdgeError::NoPositions);
        }
        if indices.is_empty() {
            return Err(HalfEdgeError::NoIndices);
        }
        if indices.len() % 3 != 0 {
            return Err(HalfEdgeError::InvalidTopology(
                "Index count not divisible by 3".to_string(),
            ));
        }
        if let Some(index) = indices.iter().find(|&&i| i as usize >= positions.len()) {
            return Err(HalfEdgeError::InvalidTopology(format!(
                "Index {} out of range for {} vertices",
                index,
                positions.len()
            )));
        }

        let mut vertices: Vec<Vertex> = positions
            .iter()
            .enumerate()
            .map(|(i, pos)| Vertex {
                id: VertexId(i as u32),
                position: *pos,
                outgoing_half_edge: None,
            })
            .collect();

        let mut half_edges: Vec<HalfEdge> = Vec::with_capacity(indices.len());
        let mut edges: Vec<Edge> = Vec::new();
        let mut faces: Vec<Face> = Vec::with_capacity(indices.len() / 3);
        let mut edge_map: HashMap<(VertexId, VertexId), HalfEdgeId> = HashMap::new();

        for (tri_idx, tri) in indices.chunks_exact(3).enumerate() {
            let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            if i0 == i1 || i1 == i2 || i0 == i2 {
                return Err(HalfEdgeError::InvalidTopology(format!(
                    "Triangle {} is degenerate",
                    tri_idx
                )));
            }

            let v0 = VertexId(i0 as u32);
            let v1 = VertexId(i1 as u32);
            let v2 = VertexId(i2 as u32);

            let face_id = FaceId(tri_idx as u32);
            let base = half_edges.len() as u32;
            let he_ids = [HalfEdgeId(base), HalfEdgeId(base + 1), HalfEdgeId(base + 2)];
            let corners = [(v0, v1), (v1, v2), (v2, v0)];

            for (k, (origin, dest)) in corners.into_iter().enumerate() {
                if edge_map.contains_key(&(origin, dest)) {
                    return Err(HalfEdgeError::NonManifoldEdge(origin.0, dest.0));
                }

                let he_id = he_ids[k];
                // Share the undirected edge with an already-built twin
                let twin = edge_map.get(&(dest, origin)).copied();
                let edge = match twin {
                    Some(twin_id) => {
                        half_edges[twin_id.0 as usize].twin = Some(he_id);
                        half_edges[twin_id.0 as usize].edge
                    }
                    None => {
                        let edge_id = EdgeId(edges.len() as u32);
                        edges.push(Edge {
                            id: edge_id,
                            half_edge: he_id,
                        });
                        edge_id
                    }
                };

                half_edges.push(HalfEdge {
                    id: he_id,
                    origin,
                    twin,
                    next: he_ids[(k + 1) % 3],
                    prev: he_ids[(k + 2) % 3],
                    face: Some(face_id),
                    edge,
                });
                edge_map.insert((origin, dest), he_id);

                let vertex = &mut vertices[origin.0 as usize];
                if vertex.outgoing_half_edge.is_none() {
                    vertex.outgoing_half_edge = Some(he_id);
                }
            }

            let p0 = vertices[i0].position;
            let p1 = vertices[i1].position;
            let p2 = vertices[i2].position;
            let normal = (p1 - p0).cross(p2 - p0).normalize_or_zero();

            faces.push(Face {
                id: face_id,
                half_edge: he_ids[0],
                normal,
            });
        }

        let mesh = Self {
            vertices,
            half_edges,
            edges,
            faces,
            edge_map,
            inconsistent_element: None,
        };

        tracing::debug!(
            "built half-edge mesh: {} vertices, {} edges, {} faces",
            mesh.vertex_count(),
            mesh.edge_count(),
            mesh.face_count()
        );
        Ok(mesh)
    }
}
