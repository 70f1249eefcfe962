//! Per-frame input classification
//!
//! The host fills an [`InputSnapshot`] from its platform each frame and the
//! [`InputDispatcher`] turns it into [`ViewportCommand`]s, keeping track of the
//! drag gesture in progress between frames.
//!
//! Bindings:
//! - Middle drag, or Alt + left drag: orbit
//! - Ctrl + left drag: pan
//! - Left click without Alt: pick
//! - Wheel: dolly
//! - Delete: delete the selected object or light
//! - Ctrl + R: move the camera pivot to the origin

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::trackball::Trackball;

/// Keyboard modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

/// Input state for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSnapshot {
    /// Pointer position in pixels, origin top-left
    pub pointer: Vec2,
    /// Left button held and moved past the drag threshold
    pub left_dragging: bool,
    pub middle_dragging: bool,
    /// Left button pressed this frame
    pub left_clicked: bool,
    /// Vertical wheel movement in notches
    pub wheel: f32,
    pub modifiers: Modifiers,
    /// Delete pressed this frame
    pub delete_pressed: bool,
    /// R pressed this frame
    pub r_pressed: bool,
    /// A UI widget has claimed the pointer
    pub pointer_over_ui: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragGesture {
    Orbit,
    Pan,
}

/// Drag state carried between frames
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum DragSession {
    #[default]
    Idle,
    /// Last trackball point
    Orbit { previous: Vec3 },
    /// Last pointer position
    Pan { previous: Vec2 },
}

/// Operations requested by one frame of input
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewportCommand {
    /// Rotate so that trackball point `current` returns to `previous`
    Orbit { previous: Vec3, current: Vec3 },
    /// Pointer movement in pixels
    Pan { delta: Vec2 },
    Pick { pointer: Vec2 },
    Dolly { wheel: f32 },
    DeleteSelection,
    Recenter,
}

/// Gesture implied by the held buttons and modifiers
pub fn classify_drag(input: &InputSnapshot) -> Option<DragGesture> {
    if input.middle_dragging || (input.left_dragging && input.modifiers.alt) {
        Some(DragGesture::Orbit)
    } else if input.left_dragging && input.modifiers.ctrl {
        Some(DragGesture::Pan)
    } else {
        None
    }
}

#[derive(Debug, Clone, Default)]
pub struct InputDispatcher {
    session: DragSession,
}

impl InputDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> DragSession {
        self.session
    }

    /// Classify one frame of input
    ///
    /// The first frame of a drag, or a frame where the gesture kind changes,
    /// only records the baseline. Keyboard shortcuts are honoured even while
    /// the UI owns the pointer.
    pub fn dispatch(
        &mut self,
        input: &InputSnapshot,
        trackball: &Trackball,
        window: Vec2,
    ) -> Vec<ViewportCommand> {
        let mut commands = Vec::new();

        if input.pointer_over_ui {
            self.session = DragSession::Idle;
        } else {
            self.dispatch_pointer(input, trackball, window, &mut commands);
        }

        if input.delete_pressed {
            commands.push(ViewportCommand::DeleteSelection);
        }
        if input.modifiers.ctrl && input.r_pressed {
            commands.push(ViewportCommand::Recenter);
        }
        commands
    }

    fn dispatch_pointer(
        &mut self,
        input: &InputSnapshot,
        trackball: &Trackball,
        window: Vec2,
        commands: &mut Vec<ViewportCommand>,
    ) {
        self.session = match (classify_drag(input), self.session) {
            (Some(DragGesture::Orbit), DragSession::Orbit { previous }) => {
                let current = trackball.project(input.pointer, window);
                if current != previous {
                    commands.push(ViewportCommand::Orbit { previous, current });
                }
                DragSession::Orbit { previous: current }
            }
            (Some(DragGesture::Orbit), _) => DragSession::Orbit {
                previous: trackball.project(input.pointer, window),
            },
            (Some(DragGesture::Pan), DragSession::Pan { previous }) => {
                let delta = input.pointer - previous;
                if delta != Vec2::ZERO {
                    commands.push(ViewportCommand::Pan { delta });
                }
                DragSession::Pan {
                    previous: input.pointer,
                }
            }
            (Some(DragGesture::Pan), _) => DragSession::Pan {
                previous: input.pointer,
            },
            (None, _) => DragSession::Idle,
        };

        if input.left_clicked && !input.modifiers.alt {
            commands.push(ViewportCommand::Pick {
                pointer: input.pointer,
            });
        }
        if input.wheel != 0.0 {
            commands.push(ViewportCommand::Dolly { wheel: input.wheel });
        }
    }
}
