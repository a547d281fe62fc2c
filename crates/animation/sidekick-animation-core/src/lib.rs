//! Sidekick Animation Core (host-agnostic)
//!
//! Data model and frame engine for sprite-sheet assistant characters. The
//! crate defines the asset format, the sound bank, injected randomness, a
//! virtual millisecond clock and the [`Animator`] that steps frames on it.
//! Rendering and audio playback are left to adapters, which consume
//! [`AnimatorEvent`]s.

pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod ids;
pub mod outputs;
pub mod random;
pub mod sound;
pub mod stored_assistant;
pub mod timer;

// Re-exports for consumers (orchestrator, adapters)
pub use config::Config;
pub use data::{Animation, AnimationSet, AssistantData, AudioCandidate, Branch, Branching, Frame};
pub use engine::{Animator, Playback};
pub use error::AnimationError;
pub use ids::{IdAllocator, Ticket, TimerId};
pub use outputs::{AnimatorEvent, AnimatorState, LayerState};
pub use random::{RandomSource, ScriptedRandom, SeededRandom};
pub use sound::{AudioProbe, MimeTable, NoAudio, Playability, SoundBank, SoundResource};
pub use stored_assistant::parse_assistant_json;
pub use timer::{Millis, TimerSet};
