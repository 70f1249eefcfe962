//! Facet mesh geometry
//!
//! This crate provides the geometry the viewport picks against:
//! - [`triangle_mesh::TriangleMesh`] - Indexed triangle list with a few primitive builders
//! - [`ray::Ray`] - World/object space rays
//! - [`raycast`] - Moller-Trumbore intersection and brute-force mesh picking
//! - [`bvh::Bvh`] - Per-object bounding volume hierarchy
//! - [`half_edge::HalfEdgeMesh`] - Topology used for sub-element selection

pub mod bvh;
pub mod half_edge;
pub mod ray;
pub mod raycast;
pub mod triangle_mesh;

pub use bvh::*;
pub use half_edge::{HalfEdgeError, HalfEdgeMesh, MeshElement};
pub use ray::*;
pub use raycast::*;
pub use triangle_mesh::*;
