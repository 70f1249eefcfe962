//! Type definitions for the half-edge mesh data structure.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Type-safe vertex identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VertexId(pub u32);

/// Type-safe half-edge identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HalfEdgeId(pub u32);

/// Type-safe undirected edge identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeId(pub u32);

/// Type-safe face identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FaceId(pub u32);

/// A vertex in the half-edge mesh
#[derive(Debug, Clone)]
pub struct Vertex {
    pub id: VertexId,
    pub position: Vec3,
    /// One outgoing half-edge from this vertex (arbitrary choice if multiple)
    pub outgoing_half_edge: Option<HalfEdgeId>,
}

/// A half-edge in the mesh
///
/// Each interior edge is represented by two half-edges pointing in opposite
/// directions. Half-edges store connectivity information for traversing the mesh.
#[derive(Debug, Clone)]
pub struct HalfEdge {
    pub id: HalfEdgeId,
    /// The vertex this half-edge originates from
    pub origin: VertexId,
    /// The opposite half-edge (None for boundary edges)
    pub twin: Option<HalfEdgeId>,
    /// The next half-edge around the face (counter-clockwise)
    pub next: HalfEdgeId,
    /// The previous half-edge around the face (counter-clockwise)
    pub prev: HalfEdgeId,
    /// The face this half-edge borders
    pub face: Option<FaceId>,
    /// The undirected edge shared with the twin
    pub edge: EdgeId,
}

/// An undirected edge, represented by one of its half-edges
#[derive(Debug, Clone)]
pub struct Edge {
    pub id: EdgeId,
    pub half_edge: HalfEdgeId,
}

/// A face (polygon) in the mesh
#[derive(Debug, Clone)]
pub struct Face {
    pub id: FaceId,
    /// One half-edge on the boundary of this face
    pub half_edge: HalfEdgeId,
    /// Cached face normal
    pub normal: Vec3,
}

/// The element an interactive editor is currently focused on
///
/// Editing operations treat this element as possibly out of sync with the
/// rest of the mesh until they have processed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeshElement {
    Vertex(VertexId),
    Edge(EdgeId),
    Face(FaceId),
}

/// Errors that can occur during half-edge mesh operations
#[derive(Debug, thiserror::Error)]
pub enum HalfEdgeError {
    #[error("Mesh has no position attribute")]
    NoPositions,
    #[error("Mesh has no indices")]
    NoIndices,
    #[error("Invalid mesh topology: {0}")]
    InvalidTopology(String),
    #[error("Non-manifold edge detected between vertices {0} and {1}")]
    NonManifoldEdge(u32, u32),
}
