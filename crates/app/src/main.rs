//! Facet - Bevy host for the mesh viewport

use bevy::prelude::*;
use bevy::window::WindowResolution;
use facet_config::{ControllerConfig, DisplayConfig};

mod input;
mod render;
mod scene;

fn main() {
    // Display configuration - single source of truth for window size
    let display_config = DisplayConfig::default();
    let controller_config = ControllerConfig::from_env();

    let window_config = Window {
        title: "Facet".into(),
        resolution: WindowResolution::new(display_config.width, display_config.height),
        present_mode: bevy::window::PresentMode::AutoVsync,
        ..default()
    };

    App::new()
        .insert_resource(display_config)
        .insert_resource(controller_config)
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(window_config),
                    ..default()
                })
                .set(bevy::log::LogPlugin {
                    level: bevy::log::Level::INFO,
                    ..default()
                }),
        )
        .add_plugins(scene::ViewportScenePlugin)
        .add_plugins(input::InputPlugin)
        .add_plugins(render::OverlayRenderPlugin)
        .run();
}
