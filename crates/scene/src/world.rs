//! Scene model the viewport operates on
//!
//! Groups own objects, lights live in their own list. Everything is addressed
//! by ids handed out from a single monotonically increasing counter, so an id
//! is never reused after its entity is deleted.

use glam::{Mat4, Vec3};
use mesh::half_edge::{HalfEdgeError, HalfEdgeMesh};
use mesh::{Bvh, Intersection, Ray, TriangleMesh};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LightId(pub u32);

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("Unknown group {0:?}")]
    UnknownGroup(GroupId),
    #[error("Unknown object {0:?}")]
    UnknownObject(ObjectId),
    #[error("Object mesh has no triangles")]
    EmptyMesh,
    #[error("Failed to build half-edge mesh: {0}")]
    HalfEdge(#[from] HalfEdgeError),
}

/// A pickable mesh instance
#[derive(Debug, Clone)]
pub struct Object {
    pub id: ObjectId,
    pub name: String,
    /// Object to world transform
    pub model: Mat4,
    mesh: TriangleMesh,
    bvh: Bvh,
}

impl Object {
    pub fn mesh(&self) -> &TriangleMesh {
        &self.mesh
    }

    pub fn bvh(&self) -> &Bvh {
        &self.bvh
    }

    /// Closest hit of a world-space ray, `t` in world units
    pub fn intersect(&self, ray: &Ray) -> Option<Intersection> {
        self.bvh.intersect(ray, &self.mesh, &self.model)
    }
}

#[derive(Debug, Clone)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub objects: Vec<Object>,
}

#[derive(Debug, Clone)]
pub struct Light {
    pub id: LightId,
    pub name: String,
    pub position: Vec3,
    pub color: Vec3,
}

/// The object isolated for sub-element editing, with its topology
#[derive(Debug, Clone)]
pub struct EditableMesh {
    pub object: ObjectId,
    pub mesh: HalfEdgeMesh,
}

#[derive(Debug, Default)]
pub struct Scene {
    groups: Vec<Group>,
    lights: Vec<Light>,
    /// Object currently selected or isolated, if any
    pub selected_object: Option<ObjectId>,
    editable: Option<EditableMesh>,
    next_id: u32,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn add_group(&mut self, name: impl Into<String>) -> GroupId {
        let id = GroupId(self.next_id());
        self.groups.push(Group {
            id,
            name: name.into(),
            objects: Vec::new(),
        });
        id
    }

    /// Add an object to a group, building its BVH
    pub fn add_object(
        &mut self,
        group: GroupId,
        name: impl Into<String>,
        mesh: TriangleMesh,
        model: Mat4,
    ) -> Result<ObjectId, SceneError> {
        if mesh.triangle_count() == 0 {
            return Err(SceneError::EmptyMesh);
        }
        if self.group(group).is_none() {
            return Err(SceneError::UnknownGroup(group));
        }

        let id = ObjectId(self.next_id());
        let bvh = Bvh::build(&mesh);
        let object = Object {
            id,
            name: name.into(),
            model,
            mesh,
            bvh,
        };
        tracing::debug!("Added object {:?} ({})", id, object.name);

        self.group_mut(group)
            .ok_or(SceneError::UnknownGroup(group))?
            .objects
            .push(object);
        Ok(id)
    }

    pub fn add_light(&mut self, name: impl Into<String>, position: Vec3, color: Vec3) -> LightId {
        let id = LightId(self.next_id());
        self.lights.push(Light {
            id,
            name: name.into(),
            position,
            color,
        });
        id
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == id)
    }

    fn group_mut(&mut self, id: GroupId) -> Option<&mut Group> {
        self.groups.iter_mut().find(|g| g.id == id)
    }

    /// All objects in group order
    pub fn objects(&self) -> impl Iterator<Item = &Object> {
        self.groups.iter().flat_map(|g| g.objects.iter())
    }

    pub fn object(&self, id: ObjectId) -> Option<&Object> {
        self.objects().find(|o| o.id == id)
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn light(&self, id: LightId) -> Option<&Light> {
        self.lights.iter().find(|l| l.id == id)
    }

    /// Remove an object from its group, returning the group it was in
    ///
    /// Clears `selected_object` and the editable mesh when they refer to it.
    /// The group is left in place even if it becomes empty.
    pub fn remove_object(&mut self, id: ObjectId) -> Option<(GroupId, Object)> {
        let group = self
            .groups
            .iter_mut()
            .find(|g| g.objects.iter().any(|o| o.id == id))?;
        let index = group.objects.iter().position(|o| o.id == id)?;
        let object = group.objects.remove(index);
        let group_id = group.id;

        if self.selected_object == Some(id) {
            self.selected_object = None;
        }
        if self.editable.as_ref().is_some_and(|e| e.object == id) {
            self.editable = None;
        }
        Some((group_id, object))
    }

    pub fn remove_group(&mut self, id: GroupId) -> Option<Group> {
        let index = self.groups.iter().position(|g| g.id == id)?;
        Some(self.groups.remove(index))
    }

    pub fn remove_light(&mut self, id: LightId) -> Option<Light> {
        let index = self.lights.iter().position(|l| l.id == id)?;
        Some(self.lights.remove(index))
    }

    pub fn editable_mesh(&self) -> Option<&EditableMesh> {
        self.editable.as_ref()
    }

    pub fn editable_mesh_mut(&mut self) -> Option<&mut EditableMesh> {
        self.editable.as_mut()
    }

    /// Build the half-edge mesh of an object and make it the editable mesh
    pub fn isolate(&mut self, id: ObjectId) -> Result<&mut EditableMesh, SceneError> {
        let object = self.object(id).ok_or(SceneError::UnknownObject(id))?;
        let mesh = HalfEdgeMesh::from_triangle_mesh(object.mesh())?;
        Ok(self.editable.insert(EditableMesh { object: id, mesh }))
    }

    /// Drop the editable mesh, returning the object it belonged to
    pub fn release_isolation(&mut self) -> Option<ObjectId> {
        self.editable.take().map(|e| e.object)
    }
}
