//! Working mode of the viewport
//!
//! Decides what a click picks: whole objects, sub-elements of the isolated
//! object, or nothing at all.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WorkingMode {
    /// Object picking across the scene
    #[default]
    Layout,
    /// Vertex, edge, face, and half-edge picking on the isolated object
    Model,
    /// Picking disabled, clicking clears the selection
    Render,
}
