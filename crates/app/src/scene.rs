//! Demo scene setup and camera sync
//!
//! The viewport controller owns the scene; Bevy only mirrors its camera and
//! draws what it holds.

use bevy::prelude::*;
use facet_config::{ControllerConfig, DisplayConfig};
use facet_scene::{Controller, Scene, WorkingMode};
use mesh::TriangleMesh;

/// Marker component for the camera mirrored from the controller
#[derive(Component)]
pub struct ViewportCamera;

pub struct ViewportScenePlugin;

impl Plugin for ViewportScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_scene).add_systems(
            Update,
            (toggle_working_mode, sync_camera, forward_viewport_events).chain(),
        );
    }
}

/// Groups, objects, and a light to pick against
fn build_demo_scene() -> Scene {
    let mut scene = Scene::new();

    let props = scene.add_group("props");
    let shapes = [
        ("cube", TriangleMesh::cube(0.5), glam::Vec3::new(-1.0, 0.0, 0.0)),
        ("tetrahedron", TriangleMesh::tetrahedron(0.5), glam::Vec3::new(1.0, 0.0, 0.0)),
    ];
    for (name, mesh, offset) in shapes {
        if let Err(e) = scene.add_object(props, name, mesh, glam::Mat4::from_translation(offset)) {
            warn!("Failed to add {}: {}", name, e);
        }
    }

    let floor = scene.add_group("floor");
    let model = glam::Mat4::from_translation(glam::Vec3::new(0.0, -0.5, 0.0))
        * glam::Mat4::from_rotation_x(-std::f32::consts::FRAC_PI_2)
        * glam::Mat4::from_scale(glam::Vec3::splat(3.0));
    if let Err(e) = scene.add_object(floor, "floor", TriangleMesh::quad(1.0), model) {
        warn!("Failed to add floor: {}", e);
    }

    scene.add_light("key", glam::Vec3::new(2.0, 3.0, 1.0), glam::Vec3::ONE);
    scene
}

fn setup_scene(
    mut commands: Commands,
    config: Res<ControllerConfig>,
    display_config: Res<DisplayConfig>,
) {
    let mut controller = Controller::new(config.clone(), build_demo_scene());
    controller.resize(display_config.width_f32(), display_config.height_f32());

    let camera = controller.camera();
    let position = Vec3::from_array(camera.position.to_array());
    let target = Vec3::from_array(camera.target.to_array());
    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(position).looking_at(target, Vec3::Y),
        ViewportCamera,
    ));

    info!(
        "Viewport ready: {} groups, {} lights",
        controller.scene().groups().len(),
        controller.scene().lights().len()
    );
    commands.insert_resource(controller);
}

/// Tab toggles between Layout and Model, F12 enters Render
fn toggle_working_mode(key_input: Res<ButtonInput<KeyCode>>, mut controller: ResMut<Controller>) {
    if key_input.just_pressed(KeyCode::Tab) {
        let next = match controller.mode() {
            WorkingMode::Model => WorkingMode::Layout,
            _ => WorkingMode::Model,
        };
        controller.set_mode(next);
    }
    if key_input.just_pressed(KeyCode::F12) {
        controller.set_mode(WorkingMode::Render);
    }
}

/// Mirror the controller camera onto the Bevy camera
fn sync_camera(
    controller: Res<Controller>,
    mut camera_query: Query<(&mut Transform, &mut Projection), With<ViewportCamera>>,
) {
    let camera = controller.camera();
    let position = Vec3::from_array(camera.position.to_array());
    let target = Vec3::from_array(camera.target.to_array());
    let up = Vec3::from_array(camera.up.to_array());

    for (mut transform, mut projection) in camera_query.iter_mut() {
        *transform = Transform::from_translation(position).looking_at(target, up);
        if let Projection::Perspective(perspective) = projection.as_mut() {
            perspective.fov = camera.fov.to_radians();
            perspective.near = camera.near;
            perspective.far = camera.far;
        }
    }
}

/// Log viewport events as the JSON a UI would receive
fn forward_viewport_events(mut controller: ResMut<Controller>) {
    for event in controller.drain_events() {
        match event.to_json() {
            Ok(json) => info!("Viewport event: {}", json),
            Err(e) => warn!("Failed to serialize {:?}: {}", event, e),
        }
    }
}
