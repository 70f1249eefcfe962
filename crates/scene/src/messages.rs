//! Messages from the viewport to UI collaborators

use serde::{Deserialize, Serialize};

use crate::edit_mode::WorkingMode;
use crate::selection::Selection;
use crate::world::{GroupId, LightId, ObjectId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ViewportEvent {
    SelectionChanged { selection: Selection },
    SelectionCleared,
    ObjectDeleted { id: ObjectId },
    /// A group was removed because its last object was deleted
    GroupDeleted { id: GroupId },
    LightDeleted { id: LightId },
    WorkingModeChanged { mode: WorkingMode },
    CameraRecentered,
}

impl ViewportEvent {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Queue of messages for the UI
/// The host should drain this once per frame
#[derive(Debug, Default)]
pub struct OutboundEvents {
    pub messages: Vec<ViewportEvent>,
}

impl OutboundEvents {
    /// Queue a message to be sent to the UI
    pub fn send(&mut self, msg: ViewportEvent) {
        self.messages.push(msg);
    }

    /// Take all queued messages, leaving the queue empty
    pub fn drain(&mut self) -> Vec<ViewportEvent> {
        std::mem::take(&mut self.messages)
    }
}
