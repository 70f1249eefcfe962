//! Input handling - builds an input snapshot from Bevy input each frame
//!
//! Drag detection lives here: a press only becomes a drag once the pointer has
//! travelled past the configured threshold, so a short click still picks.

use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::input::InputSystems;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use facet_scene::{Controller, InputSnapshot, Modifiers};

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DragTracker>()
            .add_systems(PreUpdate, drive_viewport_input.after(InputSystems));
    }
}

/// Pixels per wheel notch for touchpads reporting in pixels
const PIXELS_PER_NOTCH: f32 = 100.0;

/// Press origins used to detect drags
#[derive(Resource, Default)]
pub struct DragTracker {
    left_origin: Option<Vec2>,
    middle_origin: Option<Vec2>,
    left_dragging: bool,
    middle_dragging: bool,
    last_window_size: Vec2,
}

fn update_drag(
    pressed: bool,
    just_pressed: bool,
    pointer: Vec2,
    threshold: f32,
    origin: &mut Option<Vec2>,
    dragging: &mut bool,
) {
    if just_pressed {
        *origin = Some(pointer);
    }
    if !pressed {
        *origin = None;
        *dragging = false;
        return;
    }
    if let Some(start) = *origin {
        if start.distance(pointer) > threshold {
            *dragging = true;
        }
    }
}

fn drive_viewport_input(
    mouse_button: Res<ButtonInput<MouseButton>>,
    key_input: Res<ButtonInput<KeyCode>>,
    mut wheel_events: MessageReader<MouseWheel>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut tracker: ResMut<DragTracker>,
    controller: Option<ResMut<Controller>>,
) {
    let Some(mut controller) = controller else {
        wheel_events.clear();
        return;
    };
    let Ok(window) = windows.single() else {
        wheel_events.clear();
        return;
    };

    let size = Vec2::new(window.width(), window.height());
    if size != tracker.last_window_size {
        controller.resize(size.x, size.y);
        tracker.last_window_size = size;
    }

    let pointer = window.cursor_position();
    let pointer_pos = pointer.unwrap_or(Vec2::ZERO);
    let threshold = controller.config().drag_threshold;

    let tracker = &mut *tracker;
    // A release ends a drag rather than a click when the pointer travelled
    let was_left_drag = tracker.left_dragging;
    update_drag(
        mouse_button.pressed(MouseButton::Left),
        mouse_button.just_pressed(MouseButton::Left),
        pointer_pos,
        threshold,
        &mut tracker.left_origin,
        &mut tracker.left_dragging,
    );
    update_drag(
        mouse_button.pressed(MouseButton::Middle),
        mouse_button.just_pressed(MouseButton::Middle),
        pointer_pos,
        threshold,
        &mut tracker.middle_origin,
        &mut tracker.middle_dragging,
    );

    let mut wheel = 0.0;
    for event in wheel_events.read() {
        wheel += match event.unit {
            MouseScrollUnit::Line => event.y,
            MouseScrollUnit::Pixel => event.y / PIXELS_PER_NOTCH,
        };
    }

    let modifiers = Modifiers {
        shift: key_input.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]),
        ctrl: key_input.any_pressed([KeyCode::ControlLeft, KeyCode::ControlRight]),
        alt: key_input.any_pressed([KeyCode::AltLeft, KeyCode::AltRight]),
    };

    let snapshot = InputSnapshot {
        pointer: glam::Vec2::new(pointer_pos.x, pointer_pos.y),
        left_dragging: tracker.left_dragging,
        middle_dragging: tracker.middle_dragging,
        left_clicked: mouse_button.just_released(MouseButton::Left) && !was_left_drag,
        // Scrolling up moves closer
        wheel,
        modifiers,
        delete_pressed: key_input.just_pressed(KeyCode::Delete),
        r_pressed: key_input.just_pressed(KeyCode::KeyR),
        // The pointer outside the window counts as owned by something else
        pointer_over_ui: pointer.is_none(),
    };
    controller.handle_input(&snapshot);
}
