//! Viewport controller
//!
//! Owns the camera, the scene, and the selection, and ties input dispatch,
//! picking, and the overlay render pass together. One controller drives one
//! viewport; the host constructs it once and feeds it every frame.

use facet_config::{ControllerConfig, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use glam::{Mat4, Vec2};

use crate::camera::Camera;
use crate::edit_mode::WorkingMode;
use crate::highlight::HighlightGeometry;
use crate::input::{InputDispatcher, InputSnapshot, ViewportCommand};
use crate::messages::{OutboundEvents, ViewportEvent};
use crate::picking::{generate_ray, pick_element, pick_object};
use crate::render::{
    Primitive, RenderBackend, Uniform, BVH_COLOR, ELEMENT_COLOR, HALFEDGE_COLOR, LIGHT_COLOR,
    PICKING_RAY_COLOR,
};
use crate::selection::{Selection, SelectionState};
use crate::trackball::Trackball;
use crate::world::Scene;

/// Length of the debug picking ray overlay
const PICKING_RAY_LENGTH: f32 = 1000.0;

#[cfg_attr(feature = "bevy", derive(bevy::prelude::Resource))]
pub struct Controller {
    config: ControllerConfig,
    camera: Camera,
    trackball: Trackball,
    /// Viewport size in pixels
    window: Vec2,
    scene: Scene,
    mode: WorkingMode,
    selection: SelectionState,
    dispatcher: InputDispatcher,
    picking_ray: HighlightGeometry,
    outbound: OutboundEvents,
}

impl Controller {
    pub fn new(config: ControllerConfig, scene: Scene) -> Self {
        Self {
            camera: Camera::from_config(&config.camera),
            trackball: Trackball::new(config.trackball_radius),
            window: Vec2::new(DEFAULT_WIDTH as f32, DEFAULT_HEIGHT as f32),
            scene,
            mode: WorkingMode::default(),
            selection: SelectionState::new(),
            dispatcher: InputDispatcher::new(),
            picking_ray: HighlightGeometry::new("picking ray"),
            outbound: OutboundEvents::default(),
            config,
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ControllerConfig {
        &mut self.config
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn trackball(&self) -> &Trackball {
        &self.trackball
    }

    pub fn window_size(&self) -> Vec2 {
        self.window
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn mode(&self) -> WorkingMode {
        self.mode
    }

    pub fn selection(&self) -> Selection {
        self.selection.current()
    }

    pub fn selection_state(&self) -> &SelectionState {
        &self.selection
    }

    pub fn picking_ray(&self) -> &HighlightGeometry {
        &self.picking_ray
    }

    /// Take all queued UI messages
    pub fn drain_events(&mut self) -> Vec<ViewportEvent> {
        self.outbound.drain()
    }

    /// Fit the trackball and the camera aspect to a new viewport size
    pub fn resize(&mut self, width: f32, height: f32) {
        if width <= 0.0 || height <= 0.0 {
            tracing::warn!("Ignoring degenerate viewport size {}x{}", width, height);
            return;
        }
        self.window = Vec2::new(width, height);
        self.trackball.resize(self.window);
        self.camera.set_aspect(width / height);
    }

    /// Process one frame of input
    pub fn handle_input(&mut self, input: &InputSnapshot) {
        let commands = self.dispatcher.dispatch(input, &self.trackball, self.window);
        for command in commands {
            self.apply(command);
        }
    }

    pub fn apply(&mut self, command: ViewportCommand) {
        match command {
            ViewportCommand::Orbit { previous, current } => {
                let rotation = self.camera.trackball_rotation(previous, current);
                self.camera.orbit(rotation);
            }
            ViewportCommand::Pan { delta } => {
                self.camera.pan(delta, self.config.mouse_translation_factor);
            }
            ViewportCommand::Pick { pointer } => {
                self.pick(pointer);
            }
            ViewportCommand::Dolly { wheel } => {
                self.camera.dolly(wheel, self.config.wheel_scroll_factor);
            }
            ViewportCommand::DeleteSelection => self.delete_selection(),
            ViewportCommand::Recenter => self.recenter_camera(),
        }
    }

    /// Pick under a pointer position according to the working mode
    pub fn pick(&mut self, pointer: Vec2) -> Selection {
        let ray = generate_ray(self.window, pointer, &self.camera);
        if self.config.debug.show_picking_ray {
            self.picking_ray.clear();
            self.picking_ray
                .push_segment(ray.origin, ray.at(PICKING_RAY_LENGTH));
            self.picking_ray.to_gpu();
        }

        match self.mode {
            WorkingMode::Layout => match pick_object(&ray, &self.scene) {
                Some((id, _)) => self.select(Selection::Object(id)),
                None => {
                    self.unselect();
                    Selection::Empty
                }
            },
            WorkingMode::Model => {
                let Some(editable) = self.scene.editable_mesh() else {
                    return self.selection();
                };
                let Some(object) = self.scene.object(editable.object) else {
                    return self.selection();
                };
                match pick_element(&ray, &editable.mesh, object) {
                    Some(selection) => self.select(selection),
                    None => {
                        self.unselect();
                        Selection::Empty
                    }
                }
            }
            WorkingMode::Render => {
                self.unselect();
                Selection::Empty
            }
        }
    }

    /// Select an entity, replacing the current selection
    pub fn select(&mut self, selection: Selection) -> Selection {
        let previous = self.selection.current();
        let current = self.selection.select(selection, &mut self.scene, self.mode);
        if current != previous {
            self.outbound.send(if current.is_empty() {
                ViewportEvent::SelectionCleared
            } else {
                ViewportEvent::SelectionChanged { selection: current }
            });
        }
        current
    }

    pub fn unselect(&mut self) {
        if !self.selection.current().is_empty() {
            self.outbound.send(ViewportEvent::SelectionCleared);
        }
        self.selection.unselect(&mut self.scene, self.mode);
    }

    /// Toolbar entry point for selecting a specific element
    pub fn on_element_selected(&mut self, selection: Selection) -> Selection {
        self.select(selection)
    }

    /// Toolbar entry point for dropping the selection
    pub fn on_selection_canceled(&mut self) {
        self.unselect();
    }

    /// Delete the selected object or light
    ///
    /// A group left without objects is removed with it. Deleting the isolated
    /// object drops back to Layout mode. Other selections are not deletable
    /// and are left untouched.
    pub fn delete_selection(&mut self) {
        match self.selection.current() {
            Selection::Object(id) => {
                let Some((group, object)) = self.scene.remove_object(id) else {
                    return;
                };
                tracing::info!("Deleted object {:?} ({})", id, object.name);
                self.outbound.send(ViewportEvent::ObjectDeleted { id });

                if self.scene.group(group).is_some_and(|g| g.objects.is_empty()) {
                    self.scene.remove_group(group);
                    tracing::info!("Deleted empty group {:?}", group);
                    self.outbound.send(ViewportEvent::GroupDeleted { id: group });
                }
                self.unselect();

                if self.mode == WorkingMode::Model && self.scene.editable_mesh().is_none() {
                    tracing::warn!("Isolated object {:?} deleted, leaving Model mode", id);
                    self.set_mode(WorkingMode::Layout);
                }
            }
            Selection::Light(id) => {
                if let Some(light) = self.scene.remove_light(id) {
                    tracing::info!("Deleted light {:?} ({})", id, light.name);
                    self.outbound.send(ViewportEvent::LightDeleted { id });
                    self.unselect();
                }
            }
            other => {
                tracing::debug!("Nothing to delete for {:?}", other);
            }
        }
    }

    /// Move the camera pivot back to the origin
    pub fn recenter_camera(&mut self) {
        self.camera.recenter();
        self.outbound.send(ViewportEvent::CameraRecentered);
    }

    /// Switch working mode
    ///
    /// Entering Model isolates the selected object and builds its half-edge
    /// mesh; without a selected object the request is ignored. Leaving Model
    /// drops the mesh and the selected object. Returns whether the mode is now
    /// `mode`.
    pub fn set_mode(&mut self, mode: WorkingMode) -> bool {
        if mode == self.mode {
            return true;
        }
        let had_selection = !self.selection.current().is_empty();

        if mode == WorkingMode::Model {
            let Some(id) = self.scene.selected_object else {
                tracing::warn!("Cannot enter Model mode without a selected object");
                return false;
            };
            if let Err(e) = self.scene.isolate(id) {
                tracing::warn!("Cannot enter Model mode: {}", e);
                return false;
            }
            self.selection.unselect(&mut self.scene, WorkingMode::Model);
        } else {
            self.selection.unselect(&mut self.scene, mode);
            self.scene.release_isolation();
            self.scene.selected_object = None;
        }

        if had_selection {
            self.outbound.send(ViewportEvent::SelectionCleared);
        }
        tracing::info!("Working mode {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
        self.outbound.send(ViewportEvent::WorkingModeChanged { mode });
        true
    }

    /// Draw the selection overlays and debug helpers
    pub fn render(&mut self, backend: &mut impl RenderBackend) {
        backend.set_uniform(
            "view_projection",
            Uniform::Mat4(self.camera.view_projection()),
        );
        backend.set_uniform("camera_position", Uniform::Vec3(self.camera.position));

        self.selection.refresh(&self.scene);
        let [element, halfedge] = self.selection.highlights_mut();
        for geometry in [element, halfedge, &mut self.picking_ray] {
            if geometry.take_upload() {
                backend.upload(geometry);
            }
        }

        backend.set_depth_test(false);

        let element = self.selection.element_highlight();
        if !element.is_empty() {
            backend.set_uniform("model", Uniform::Mat4(element.model));
            match self.selection.current() {
                Selection::Vertex(_) => backend.draw(element, Primitive::Points, ELEMENT_COLOR),
                Selection::Edge(_) => {
                    backend.draw(element, Primitive::Lines, ELEMENT_COLOR);
                    backend.draw(element, Primitive::Points, ELEMENT_COLOR);
                }
                Selection::Face(_) => backend.draw(element, Primitive::Polygons, ELEMENT_COLOR),
                Selection::Light(_) => backend.draw(element, Primitive::Points, LIGHT_COLOR),
                _ => {}
            }
        }

        let halfedge = self.selection.halfedge_highlight();
        if !halfedge.is_empty() {
            backend.set_uniform("model", Uniform::Mat4(Mat4::IDENTITY));
            backend.draw(halfedge, Primitive::Lines, HALFEDGE_COLOR);
        }

        if self.config.debug.show_picking_ray && !self.picking_ray.is_empty() {
            backend.set_uniform("model", Uniform::Mat4(Mat4::IDENTITY));
            backend.draw(&self.picking_ray, Primitive::Lines, PICKING_RAY_COLOR);
        }

        if self.config.debug.show_bvh {
            for object in self.scene.objects() {
                let mut boxes = HighlightGeometry::new(format!("bvh {}", object.name));
                for aabb in object.bvh().boxes() {
                    boxes.push_box(&aabb);
                }
                backend.upload(&boxes);
                backend.set_uniform("model", Uniform::Mat4(object.model));
                backend.draw(&boxes, Primitive::Lines, BVH_COLOR);
            }
        }

        backend.set_depth_test(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;
    use crate::render::{RecordingBackend, RenderCall};
    use crate::world::{GroupId, LightId, ObjectId};
    use glam::Vec3;
    use mesh::TriangleMesh;

    const CENTER: Vec2 = Vec2::new(400.0, 300.0);

    fn controller() -> (Controller, GroupId, ObjectId, LightId) {
        let mut scene = Scene::new();
        let group = scene.add_group("props");
        let cube = scene
            .add_object(group, "cube", TriangleMesh::cube(0.5), Mat4::IDENTITY)
            .unwrap();
        let light = scene.add_light("key", Vec3::new(2.0, 3.0, 0.0), Vec3::ONE);
        let mut controller = Controller::new(ControllerConfig::default(), scene);
        controller.resize(800.0, 600.0);
        controller.drain_events();
        (controller, group, cube, light)
    }

    fn click(pointer: Vec2) -> InputSnapshot {
        InputSnapshot {
            pointer,
            left_clicked: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_resize() {
        let (mut controller, ..) = controller();
        controller.resize(1024.0, 512.0);
        assert_eq!(controller.trackball().radius(), 256.0);
        assert_eq!(controller.camera().aspect, 2.0);

        controller.resize(0.0, 512.0);
        assert_eq!(controller.window_size(), Vec2::new(1024.0, 512.0));
    }

    #[test]
    fn test_orbit_drag_keeps_distance() {
        let (mut controller, ..) = controller();
        let distance = controller.camera().distance();
        let start = controller.camera().position;

        for x in [400.0, 430.0, 470.0] {
            controller.handle_input(&InputSnapshot {
                pointer: Vec2::new(x, 280.0),
                middle_dragging: true,
                ..Default::default()
            });
        }
        assert!((controller.camera().distance() - distance).abs() < 1e-4);
        assert!((controller.camera().position - start).length() > 1e-3);
    }

    #[test]
    fn test_wheel_dollies() {
        let (mut controller, ..) = controller();
        let distance = controller.camera().distance();
        controller.handle_input(&InputSnapshot {
            wheel: 1.0,
            ..Default::default()
        });
        assert!((controller.camera().distance() - distance * 0.8).abs() < 1e-4);
    }

    #[test]
    fn test_layout_pick_and_miss() {
        let (mut controller, _, cube, _) = controller();
        controller.handle_input(&click(CENTER));
        assert_eq!(controller.selection(), Selection::Object(cube));
        assert_eq!(controller.scene().selected_object, Some(cube));

        controller.handle_input(&click(Vec2::ZERO));
        assert_eq!(controller.selection(), Selection::Empty);
        assert_eq!(controller.scene().selected_object, None);
        assert_eq!(
            controller.drain_events(),
            vec![
                ViewportEvent::SelectionChanged {
                    selection: Selection::Object(cube)
                },
                ViewportEvent::SelectionCleared,
            ]
        );
    }

    #[test]
    fn test_delete_sole_object_removes_group() {
        let (mut controller, group, cube, _) = controller();
        controller.select(Selection::Object(cube));
        controller.drain_events();

        controller.handle_input(&InputSnapshot {
            delete_pressed: true,
            ..Default::default()
        });
        assert!(controller.scene().object(cube).is_none());
        assert!(controller.scene().group(group).is_none());
        assert_eq!(controller.selection(), Selection::Empty);
        assert_eq!(
            controller.drain_events(),
            vec![
                ViewportEvent::ObjectDeleted { id: cube },
                ViewportEvent::GroupDeleted { id: group },
                ViewportEvent::SelectionCleared,
            ]
        );
    }

    #[test]
    fn test_delete_object_keeps_populated_group() {
        let (mut controller, group, cube, _) = controller();
        let other = controller
            .scene_mut()
            .add_object(group, "other", TriangleMesh::tetrahedron(0.5), Mat4::IDENTITY)
            .unwrap();
        controller.select(Selection::Object(cube));
        controller.delete_selection();
        assert!(controller.scene().group(group).is_some());
        assert!(controller.scene().object(other).is_some());
    }

    #[test]
    fn test_delete_light_unselects() {
        let (mut controller, _, _, light) = controller();
        controller.on_element_selected(Selection::Light(light));
        controller.delete_selection();
        assert!(controller.scene().light(light).is_none());
        assert_eq!(controller.selection(), Selection::Empty);
        assert!(controller.selection_state().element_highlight().is_empty());
    }

    #[test]
    fn test_delete_ignores_elements() {
        let (mut controller, _, cube, _) = controller();
        controller.select(Selection::Object(cube));
        assert!(controller.set_mode(WorkingMode::Model));
        controller.select(Selection::Face(mesh::half_edge::FaceId(0)));
        controller.delete_selection();
        assert_eq!(
            controller.selection(),
            Selection::Face(mesh::half_edge::FaceId(0))
        );
        assert!(controller.scene().object(cube).is_some());
    }

    #[test]
    fn test_model_mode_requires_selected_object() {
        let (mut controller, ..) = controller();
        assert!(!controller.set_mode(WorkingMode::Model));
        assert_eq!(controller.mode(), WorkingMode::Layout);
        assert!(controller.scene().editable_mesh().is_none());
    }

    #[test]
    fn test_model_mode_element_picking() {
        let (mut controller, _, cube, _) = controller();
        controller.handle_input(&click(CENTER));
        assert!(controller.set_mode(WorkingMode::Model));
        assert_eq!(controller.selection(), Selection::Empty);
        assert_eq!(controller.scene().selected_object, Some(cube));

        let picked = controller.pick(CENTER);
        assert!(matches!(
            picked,
            Selection::Vertex(_) | Selection::Edge(_) | Selection::Face(_) | Selection::Halfedge(_)
        ));

        // Missing the isolated object clears the element but keeps isolation
        controller.pick(Vec2::ZERO);
        assert_eq!(controller.selection(), Selection::Empty);
        assert_eq!(controller.scene().selected_object, Some(cube));

        assert!(controller.set_mode(WorkingMode::Layout));
        assert!(controller.scene().editable_mesh().is_none());
        assert_eq!(controller.scene().selected_object, None);
    }

    #[test]
    fn test_model_mode_object_selection_moves_isolation() {
        let (mut controller, group, cube, _) = controller();
        let other = controller
            .scene_mut()
            .add_object(
                group,
                "other",
                TriangleMesh::cube(0.5),
                Mat4::from_translation(Vec3::new(2.0, 0.0, 0.0)),
            )
            .unwrap();
        controller.select(Selection::Object(cube));
        assert!(controller.set_mode(WorkingMode::Model));

        assert_eq!(
            controller.on_element_selected(Selection::Object(other)),
            Selection::Object(other)
        );
        assert_eq!(controller.scene().selected_object, Some(other));
        assert_eq!(
            controller.scene().editable_mesh().map(|e| e.object),
            Some(other)
        );

        // The old object under the cursor is no longer pickable
        assert_eq!(controller.pick(CENTER), Selection::Empty);

        let ndc = controller
            .camera()
            .view_projection()
            .project_point3(Vec3::new(2.0, 0.0, 0.0));
        let pointer = Vec2::new((ndc.x + 1.0) * 400.0, (1.0 - ndc.y) * 300.0);
        let picked = controller.pick(pointer);
        assert!(!picked.is_empty());

        let state = controller.selection_state();
        let positions: Vec<Vec3> = state
            .element_highlight()
            .positions()
            .chain(state.halfedge_highlight().positions())
            .collect();
        assert!(!positions.is_empty());
        assert!(positions.iter().all(|p| p.x > 1.2), "{positions:?}");
    }

    #[test]
    fn test_selection_canceled_from_toolbar() {
        let (mut controller, _, cube, _) = controller();
        controller.select(Selection::Object(cube));
        assert!(controller.set_mode(WorkingMode::Model));
        let face = Selection::Face(mesh::half_edge::FaceId(0));
        assert_eq!(controller.on_element_selected(face), face);
        assert!(!controller.selection_state().element_highlight().is_empty());
        controller.drain_events();

        controller.on_selection_canceled();
        assert_eq!(controller.selection(), Selection::Empty);
        assert!(controller.selection_state().element_highlight().is_empty());
        assert!(controller.selection_state().halfedge_highlight().is_empty());
        assert_eq!(
            controller.scene().editable_mesh().unwrap().mesh.inconsistent_element,
            None
        );
        assert_eq!(controller.scene().selected_object, Some(cube));
        assert_eq!(controller.drain_events(), vec![ViewportEvent::SelectionCleared]);
    }

    #[test]
    fn test_deleting_isolated_object_leaves_model_mode() {
        let (mut controller, group, cube, _) = controller();
        controller.select(Selection::Object(cube));
        assert!(controller.set_mode(WorkingMode::Model));
        controller.on_element_selected(Selection::Object(cube));
        controller.drain_events();

        controller.delete_selection();
        assert_eq!(controller.mode(), WorkingMode::Layout);
        assert!(controller.scene().editable_mesh().is_none());
        assert_eq!(
            controller.drain_events(),
            vec![
                ViewportEvent::ObjectDeleted { id: cube },
                ViewportEvent::GroupDeleted { id: group },
                ViewportEvent::SelectionCleared,
                ViewportEvent::WorkingModeChanged {
                    mode: WorkingMode::Layout
                },
            ]
        );
    }

    #[test]
    fn test_render_mode_clears_on_click() {
        let (mut controller, _, _, light) = controller();
        controller.set_mode(WorkingMode::Render);
        controller.select(Selection::Light(light));
        controller.pick(CENTER);
        assert_eq!(controller.selection(), Selection::Empty);
    }

    #[test]
    fn test_ctrl_r_recenters() {
        let (mut controller, ..) = controller();
        controller.camera_mut().pan(Vec2::new(50.0, 20.0), 0.01);
        let offset = controller.camera().position - controller.camera().target;

        // Keys work even when the UI owns the pointer
        controller.handle_input(&InputSnapshot {
            r_pressed: true,
            pointer_over_ui: true,
            modifiers: Modifiers {
                ctrl: true,
                ..Default::default()
            },
            ..Default::default()
        });
        assert_eq!(controller.camera().target, Vec3::ZERO);
        assert!((controller.camera().position - offset).length() < 1e-5);
        assert_eq!(controller.drain_events(), vec![ViewportEvent::CameraRecentered]);
    }

    #[test]
    fn test_render_pass_draws_selection() {
        let (mut controller, _, _, light) = controller();
        controller.select(Selection::Light(light));

        let mut backend = RecordingBackend::default();
        controller.render(&mut backend);

        assert_eq!(
            backend.uniform("view_projection"),
            Some(Uniform::Mat4(controller.camera().view_projection()))
        );
        assert_eq!(backend.uploaded(), vec!["selected element"]);
        assert_eq!(backend.drawn(), vec!["selected element"]);
        assert_eq!(
            backend.uniform("model"),
            Some(Uniform::Mat4(Mat4::from_translation(Vec3::new(2.0, 3.0, 0.0))))
        );
        assert_eq!(backend.calls.first(), Some(&RenderCall::SetUniform(
            "view_projection".to_string(),
            Uniform::Mat4(controller.camera().view_projection()),
        )));
        assert_eq!(backend.calls.last(), Some(&RenderCall::DepthTest(true)));

        // Nothing changed, nothing to upload
        let mut backend = RecordingBackend::default();
        controller.render(&mut backend);
        assert!(backend.uploaded().is_empty());
    }

    #[test]
    fn test_render_debug_overlays() {
        let (mut controller, ..) = controller();
        controller.config_mut().debug.show_picking_ray = true;
        controller.config_mut().debug.show_bvh = true;
        controller.pick(CENTER);
        assert_eq!(controller.picking_ray().edges.len(), 1);

        let mut backend = RecordingBackend::default();
        controller.render(&mut backend);
        let drawn = backend.drawn();
        assert!(drawn.contains(&"picking ray"));
        assert!(drawn.contains(&"bvh cube"));
    }
}
