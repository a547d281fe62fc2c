//! Host-facing output of an [`crate::Assistant`].

use serde::{Deserialize, Serialize};

use sidekick_animation_core::{LayerState, Millis};

use crate::geometry::Point;
use crate::message::MessageEvent;

/// Everything a host needs to mirror the assistant on screen, in the order
/// it happened.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AssistantEvent {
    /// A frame was rendered; apply `layers` to the overlay surfaces.
    #[serde(rename_all = "camelCase")]
    Frame {
        animation: String,
        frame_index: usize,
        layers: Vec<LayerState>,
    },
    /// Play the sound at `source`.
    Sound { key: String, source: String },
    Message(MessageEvent),
    /// The assistant's top-left corner was placed at `(x, y)`.
    Moved { x: f64, y: f64 },
    /// A linear move towards `to` began; it lasts `duration` ms.
    MoveStarted { from: Point, to: Point, duration: Millis },
    Visibility { visible: bool },
}

impl AssistantEvent {
    pub(crate) fn moved(p: Point) -> Self {
        AssistantEvent::Moved { x: p.x, y: p.y }
    }
}
