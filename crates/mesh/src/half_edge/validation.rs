//! Validation methods for HalfEdgeMesh.

use super::types::HalfEdgeError;
use super::HalfEdgeMesh;

impl HalfEdgeMesh {
    /// Check connectivity invariants
    ///
    /// Validates that:
    /// 1. Every vertex's outgoing half-edge starts at that vertex
    /// 2. next/prev cycles are consistent
    /// 3. Twin relationships are symmetric and reversed
    /// 4. Twins share their undirected edge
    pub fn validate(&self) -> Result<(), HalfEdgeError> {
        for v in &self.vertices {
            if let Some(he_id) = v.outgoing_half_edge {
                let he = self.half_edge(he_id).ok_or_else(|| {
                    HalfEdgeError::InvalidTopology(format!(
                        "Vertex {:?}: missing half-edge {:?}",
                        v.id, he_id
                    ))
                })?;
                if he.origin != v.id {
                    return Err(HalfEdgeError::InvalidTopology(format!(
                        "Vertex {:?}: outgoing edge {:?} has wrong origin {:?}",
                        v.id, he_id, he.origin
                    )));
                }
            }
        }

        for he in &self.half_edges {
            let next_prev = self.half_edge(he.next).map(|next| next.prev);
            if next_prev != Some(he.id) {
                return Err(HalfEdgeError::InvalidTopology(format!(
                    "Half-edge {:?}: next.prev = {:?}",
                    he.id, next_prev
                )));
            }

            let prev_next = self.half_edge(he.prev).map(|prev| prev.next);
            if prev_next != Some(he.id) {
                return Err(HalfEdgeError::InvalidTopology(format!(
                    "Half-edge {:?}: prev.next = {:?}",
                    he.id, prev_next
                )));
            }

            if let Some(twin_id) = he.twin {
                let twin = self.half_edge(twin_id).ok_or_else(|| {
                    HalfEdgeError::InvalidTopology(format!(
                        "Half-edge {:?}: twin {:?} doesn't exist",
                        he.id, twin_id
                    ))
                })?;
                if twin.twin != Some(he.id) {
                    return Err(HalfEdgeError::InvalidTopology(format!(
                        "Half-edge {:?}: twin.twin = {:?}",
                        he.id, twin.twin
                    )));
                }
                if twin.edge != he.edge {
                    return Err(HalfEdgeError::InvalidTopology(format!(
                        "Half-edge {:?} and twin {:?} disagree on edge",
                        he.id, twin_id
                    )));
                }
                if self.get_half_edge_dest(twin_id) != Some(he.origin) {
                    return Err(HalfEdgeError::InvalidTopology(format!(
                        "Half-edge {:?}: twin does not run in reverse",
                        he.id
                    )));
                }
            }
        }

        for edge in &self.edges {
            let owner = self.half_edge(edge.half_edge).map(|he| he.edge);
            if owner != Some(edge.id) {
                return Err(HalfEdgeError::InvalidTopology(format!(
                    "Edge {:?}: representative half-edge belongs to {:?}",
                    edge.id, owner
                )));
            }
        }

        Ok(())
    }
}
