//! Selection state machine
//!
//! At most one entity is selected at a time. Every transition runs
//! [`SelectionState::unselect`] for the old selection before the entry action
//! of the new one, so highlight buffers and the mesh's inconsistent-element
//! marker always describe exactly the current selection.

use glam::{Mat4, Vec3};
use mesh::half_edge::{EdgeId, FaceId, HalfEdgeId, MeshElement, VertexId};
use serde::{Deserialize, Serialize};

use crate::edit_mode::WorkingMode;
use crate::highlight::HighlightGeometry;
use crate::world::{LightId, ObjectId, Scene};

/// Half extent of the cross drawn for a selected light
const LIGHT_MARKER_SIZE: f32 = 0.1;

/// Arrow head length relative to the arrow
const ARROW_HEAD_RATIO: f32 = 0.2;

/// The single selected entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id")]
pub enum Selection {
    #[default]
    Empty,
    Object(ObjectId),
    Vertex(VertexId),
    Edge(EdgeId),
    Face(FaceId),
    Halfedge(HalfEdgeId),
    Light(LightId),
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        *self == Selection::Empty
    }

    /// Mesh element marked inconsistent while this is selected
    pub fn mesh_element(&self) -> Option<MeshElement> {
        match *self {
            Selection::Vertex(v) => Some(MeshElement::Vertex(v)),
            Selection::Edge(e) => Some(MeshElement::Edge(e)),
            Selection::Face(f) => Some(MeshElement::Face(f)),
            _ => None,
        }
    }
}

/// Current selection plus the overlay geometry describing it
#[derive(Debug, Clone)]
pub struct SelectionState {
    current: Selection,
    /// Vertex, edge, face, or light overlay
    element: HighlightGeometry,
    /// Directed arrow for a selected half-edge
    halfedge: HighlightGeometry,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self {
            current: Selection::Empty,
            element: HighlightGeometry::new("selected element"),
            halfedge: HighlightGeometry::new("selected halfedge"),
        }
    }
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Selection {
        self.current
    }

    pub fn element_highlight(&self) -> &HighlightGeometry {
        &self.element
    }

    pub fn halfedge_highlight(&self) -> &HighlightGeometry {
        &self.halfedge
    }

    pub(crate) fn highlights_mut(&mut self) -> [&mut HighlightGeometry; 2] {
        [&mut self.element, &mut self.halfedge]
    }

    /// Leave the current selection
    ///
    /// Clears both overlays and the mesh marker. The scene's selected object
    /// survives in Model mode, where it is the isolated object.
    pub fn unselect(&mut self, scene: &mut Scene, mode: WorkingMode) {
        if !self.current.is_empty() {
            tracing::debug!("Unselect {:?}", self.current);
        }
        self.current = Selection::Empty;

        for geometry in [&mut self.element, &mut self.halfedge] {
            if !geometry.is_empty() {
                geometry.clear();
                geometry.to_gpu();
            }
        }
        if let Some(editable) = scene.editable_mesh_mut() {
            editable.mesh.inconsistent_element = None;
        }
        if mode != WorkingMode::Model {
            scene.selected_object = None;
        }
    }

    /// Replace the selection, running exit then entry actions
    ///
    /// Returns the resulting selection, which is `Empty` if the requested
    /// entity does not exist.
    pub fn select(&mut self, selection: Selection, scene: &mut Scene, mode: WorkingMode) -> Selection {
        self.unselect(scene, mode);

        let entered = match selection {
            Selection::Empty => true,
            Selection::Object(id) => enter_object(id, scene, mode),
            Selection::Vertex(_) | Selection::Edge(_) | Selection::Face(_) => {
                self.enter_element(selection, scene)
            }
            Selection::Halfedge(id) => self.enter_halfedge(id, scene),
            Selection::Light(id) => self.enter_light(id, scene),
        };

        if entered {
            self.current = selection;
            tracing::debug!("Selected {:?}", selection);
        } else {
            tracing::warn!("Cannot select {:?}: no such element", selection);
        }
        self.current
    }

    fn enter_element(&mut self, selection: Selection, scene: &mut Scene) -> bool {
        let Some(ring) = element_ring(selection, scene) else {
            return false;
        };

        match ring.len() {
            1 => {
                self.element.push_vertex(ring[0]);
            }
            2 => self.element.push_segment(ring[0], ring[1]),
            _ => self.element.push_polygon(&ring),
        }
        self.element.to_gpu();

        if let Some(editable) = scene.editable_mesh_mut() {
            editable.mesh.inconsistent_element = selection.mesh_element();
        }
        true
    }

    fn enter_halfedge(&mut self, id: HalfEdgeId, scene: &Scene) -> bool {
        let Some(editable) = scene.editable_mesh() else {
            return false;
        };
        let Some((start, end)) = editable.mesh.halfedge_arrow_endpoints(id) else {
            return false;
        };
        let model = object_model(scene);
        let start = model.transform_point3(start);
        let end = model.transform_point3(end);

        let normal = editable
            .mesh
            .half_edge(id)
            .and_then(|he| he.face)
            .and_then(|f| editable.mesh.face(f))
            .map(|f| model.transform_vector3(f.normal))
            .unwrap_or(Vec3::ZERO);
        let back = (start - end) * ARROW_HEAD_RATIO;
        let side = normal.cross(back).normalize_or_zero() * back.length() * 0.5;

        self.halfedge.push_segment(start, end);
        self.halfedge.push_segment(end, end + back + side);
        self.halfedge.push_segment(end, end + back - side);
        self.halfedge.to_gpu();
        true
    }

    fn enter_light(&mut self, id: LightId, scene: &Scene) -> bool {
        let Some(light) = scene.light(id) else {
            return false;
        };
        self.element.push_vertex(Vec3::ZERO);
        for axis in [Vec3::X, Vec3::Y, Vec3::Z] {
            self.element.push_vertex(axis * LIGHT_MARKER_SIZE);
            self.element.push_vertex(-axis * LIGHT_MARKER_SIZE);
        }
        self.element.model = Mat4::from_translation(light.position);
        self.element.to_gpu();
        true
    }

    /// Re-read element positions from the live mesh
    ///
    /// Keeps the overlay attached when vertices are moved by an editor.
    pub fn refresh(&mut self, scene: &Scene) {
        if self.current.mesh_element().is_none() {
            return;
        }
        let Some(ring) = element_ring(self.current, scene) else {
            return;
        };
        let changed = ring.len() == self.element.vertices.len()
            && self.element.positions().zip(&ring).any(|(a, b)| a != *b);
        if changed {
            self.element.set_positions(&ring);
            self.element.to_gpu();
        }
    }
}

/// Record the selected object, moving the isolation to it in Model mode
///
/// Element picking works on the isolated mesh, so in Model mode the selected
/// object and the isolated object are always the same.
fn enter_object(id: ObjectId, scene: &mut Scene, mode: WorkingMode) -> bool {
    if scene.object(id).is_none() {
        return false;
    }
    let isolated = scene.editable_mesh().map(|e| e.object);
    if mode == WorkingMode::Model && isolated != Some(id) {
        if let Err(e) = scene.isolate(id) {
            tracing::warn!("Cannot isolate {:?}: {}", id, e);
            return false;
        }
        tracing::debug!("Isolation moved from {:?} to {:?}", isolated, id);
    }
    scene.selected_object = Some(id);
    true
}

/// World transform of the isolated object
fn object_model(scene: &Scene) -> Mat4 {
    scene
        .editable_mesh()
        .and_then(|e| scene.object(e.object))
        .map_or(Mat4::IDENTITY, |o| o.model)
}

/// World-space positions outlining a vertex, edge, or face of the editable mesh
fn element_ring(selection: Selection, scene: &Scene) -> Option<Vec<Vec3>> {
    let mesh = &scene.editable_mesh()?.mesh;
    let vertices = match selection {
        Selection::Vertex(v) => vec![mesh.vertex(v)?.id],
        Selection::Edge(e) => {
            let (a, b) = mesh.edge_endpoints(e)?;
            vec![a, b]
        }
        Selection::Face(f) => {
            let ring = mesh.get_face_vertices(f);
            if ring.is_empty() {
                return None;
            }
            ring
        }
        _ => return None,
    };

    let model = object_model(scene);
    vertices
        .into_iter()
        .map(|v| mesh.position(v).map(|p| model.transform_point3(p)))
        .collect()
}
