//! Viewport interaction core for Facet
//!
//! This crate turns pointer and keyboard input into camera motion, object and
//! sub-element picking, and a single consistent selection:
//! - [`trackball::Trackball`] - Pointer to virtual-sphere projection
//! - [`camera::Camera`] - Look-at camera with orbit, pan, and dolly
//! - [`picking`] - Ray generation, BVH object picking, barycentric element picking
//! - [`selection::SelectionState`] - Selection state machine and its overlays
//! - [`input::InputDispatcher`] - Per-frame input classification
//! - [`controller::Controller`] - Owns all of the above plus the [`world::Scene`]
//!
//! The crate is engine-agnostic. Hosts implement [`render::RenderBackend`] to
//! draw the overlays and drain [`messages::ViewportEvent`]s for their UI.

pub mod camera;
pub mod controller;
pub mod edit_mode;
pub mod highlight;
pub mod input;
pub mod messages;
pub mod picking;
pub mod render;
pub mod selection;
pub mod trackball;
pub mod world;

pub use camera::Camera;
pub use controller::Controller;
pub use edit_mode::WorkingMode;
pub use highlight::{HighlightGeometry, HighlightVertex};
pub use input::{
    classify_drag, DragGesture, DragSession, InputDispatcher, InputSnapshot, Modifiers,
    ViewportCommand,
};
pub use messages::{OutboundEvents, ViewportEvent};
pub use picking::{classify_barycentric, generate_ray, pick_element, pick_object, ElementTarget};
pub use render::{Primitive, RecordingBackend, RenderBackend, RenderCall, Uniform};
pub use selection::{Selection, SelectionState};
pub use trackball::Trackball;
pub use world::{
    EditableMesh, Group, GroupId, Light, LightId, Object, ObjectId, Scene, SceneError,
};
