//! Output contracts from the engine.
//!
//! The engine never touches a surface or an audio device. Each tick produces
//! events that adapters apply to the host: layer visibility and sprite-sheet
//! offsets, sound requests, and playback state changes addressed to the
//! listener registered with the animation.

use serde::{Deserialize, Serialize};

/// Rendered state of one overlay layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum LayerState {
    /// Show the layer with the sprite sheet shifted by `background_position`.
    #[serde(rename_all = "camelCase")]
    Visible { background_position: [i32; 2] },
    Hidden,
}

/// Playback milestone reported to the registered listener.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimatorState {
    /// Holding on the last frame until `exit_animation` is called.
    Waiting,
    Exited,
}

/// Discrete signals emitted while stepping.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum AnimatorEvent<L> {
    FrameRendered {
        animation: String,
        frame_index: usize,
        layers: Vec<LayerState>,
    },
    SoundTriggered {
        key: String,
        source: String,
    },
    StateChanged {
        listener: L,
        animation: String,
        state: AnimatorState,
    },
}
