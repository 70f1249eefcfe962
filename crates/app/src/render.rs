//! Gizmo rendering of scene wireframes and viewport overlays
//!
//! Overlays go through their own gizmo group whose depth bias puts them in
//! front of the scene, which is how a disabled depth test is expressed here.

use bevy::prelude::*;
use facet_scene::highlight::HighlightGeometry;
use facet_scene::render::Color as OverlayColor;
use facet_scene::{Controller, Primitive, RenderBackend, Uniform};

/// Radius of point primitives
const POINT_SIZE: f32 = 0.03;

const WIREFRAME_COLOR: Color = Color::srgb(0.55, 0.55, 0.6);
const SELECTED_WIREFRAME_COLOR: Color = Color::srgb(1.0, 0.6, 0.1);

/// Gizmo group drawn on top of the scene
#[derive(Default, Reflect, GizmoConfigGroup)]
pub struct OverlayGizmos;

pub struct OverlayRenderPlugin;

impl Plugin for OverlayRenderPlugin {
    fn build(&self, app: &mut App) {
        app.init_gizmo_group::<OverlayGizmos>()
            .add_systems(Startup, configure_overlay_gizmos)
            .add_systems(Update, (draw_scene_wireframes, draw_viewport_overlays));
    }
}

fn configure_overlay_gizmos(mut config_store: ResMut<GizmoConfigStore>) {
    let (config, _) = config_store.config_mut::<OverlayGizmos>();
    config.depth_bias = -1.0;
}

fn to_bevy(v: glam::Vec3) -> Vec3 {
    Vec3::from_array(v.to_array())
}

fn to_color(c: OverlayColor) -> Color {
    Color::srgba(c[0], c[1], c[2], c[3])
}

/// Draw every object as a triangle wireframe, lights as small spheres
fn draw_scene_wireframes(controller: Res<Controller>, mut gizmos: Gizmos) {
    let scene = controller.scene();
    for object in scene.objects() {
        let color = if scene.selected_object == Some(object.id) {
            SELECTED_WIREFRAME_COLOR
        } else {
            WIREFRAME_COLOR
        };
        let positions: Vec<Vec3> = object
            .mesh()
            .positions()
            .iter()
            .map(|p| to_bevy(object.model.transform_point3(*p)))
            .collect();
        for [a, b] in object.mesh().wireframe_edges() {
            gizmos.line(positions[a as usize], positions[b as usize], color);
        }
    }
    for light in scene.lights() {
        let [r, g, b] = light.color.to_array();
        gizmos.sphere(to_bevy(light.position), 0.1, Color::srgb(r, g, b));
    }
}

/// Render backend that turns overlay draws into gizmo calls
struct GizmoBackend<'a, 'w, 's> {
    gizmos: &'a mut Gizmos<'w, 's, OverlayGizmos>,
    model: glam::Mat4,
    depth_test: bool,
}

impl RenderBackend for GizmoBackend<'_, '_, '_> {
    fn set_uniform(&mut self, name: &str, value: Uniform) {
        if let ("model", Uniform::Mat4(model)) = (name, value) {
            self.model = model;
        }
    }

    fn upload(&mut self, geometry: &HighlightGeometry) {
        // Gizmos are immediate mode, nothing is kept on the GPU between frames
        trace!(
            "overlay {} ({} bytes)",
            geometry.name,
            geometry.vertex_bytes().len()
        );
    }

    fn set_depth_test(&mut self, enabled: bool) {
        self.depth_test = enabled;
    }

    fn draw(&mut self, geometry: &HighlightGeometry, primitive: Primitive, color: OverlayColor) {
        if self.depth_test {
            trace!("overlay {} drawn with depth test enabled", geometry.name);
        }
        let color = to_color(color);
        let world: Vec<Vec3> = geometry
            .positions()
            .map(|p| to_bevy(self.model.transform_point3(p)))
            .collect();

        match primitive {
            Primitive::Points => {
                for p in &world {
                    self.gizmos.sphere(*p, POINT_SIZE, color);
                }
            }
            Primitive::Lines => {
                for [a, b] in &geometry.edges {
                    self.gizmos.line(world[*a as usize], world[*b as usize], color);
                }
            }
            Primitive::Polygons => {
                for ring in &geometry.faces {
                    let points = ring
                        .iter()
                        .chain(ring.first())
                        .map(|&i| world[i as usize]);
                    self.gizmos.linestrip(points, color);
                }
            }
        }
    }
}

fn draw_viewport_overlays(mut controller: ResMut<Controller>, mut gizmos: Gizmos<OverlayGizmos>) {
    let mut backend = GizmoBackend {
        gizmos: &mut gizmos,
        model: glam::Mat4::IDENTITY,
        depth_test: true,
    };
    controller.render(&mut backend);
}
