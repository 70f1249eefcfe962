//! Half-edge mesh data structure for sub-element selection
//!
//! Provides topology information (vertex rings, edge/face adjacency) that is
//! not available in a simple triangle soup representation. Vertex and face
//! ids match the vertex and triangle indices of the source triangle list.

mod construction;
mod topology;
mod types;
mod validation;

use std::collections::HashMap;

pub use types::{
    Edge, EdgeId, Face, FaceId, HalfEdge, HalfEdgeError, HalfEdgeId, MeshElement, Vertex,
    VertexId,
};

/// Half-edge mesh data structure
///
/// Besides topology it carries the `inconsistent_element` marker: the element
/// an interactive editor currently has focus on.
#[derive(Debug, Clone)]
pub struct HalfEdgeMesh {
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) half_edges: Vec<HalfEdge>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) faces: Vec<Face>,
    /// Map from (origin, destination) vertex pair to half-edge
    pub(crate) edge_map: HashMap<(VertexId, VertexId), HalfEdgeId>,
    /// Element under interactive focus, if any
    pub inconsistent_element: Option<MeshElement>,
}
