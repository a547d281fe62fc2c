//! Orchestrator errors.

use sidekick_animation_core::AnimationError;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum OrchestratorError {
    /// Placement is unknown (no position yet) or not a number, so no
    /// direction can be derived.
    #[error(
        "Direction values missing: '{offset_top}', '{offset_left}', '{height}', '{width}'"
    )]
    MissingGeometry {
        offset_top: f64,
        offset_left: f64,
        width: f64,
        height: f64,
    },

    /// Assistant configuration could not be parsed
    #[error("Invalid assistant config: {reason}")]
    Config { reason: String },

    #[error(transparent)]
    Data(#[from] AnimationError),
}

impl OrchestratorError {
    /// Get error category for logging/metrics
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::MissingGeometry { .. } => "geometry",
            Self::Config { .. } => "config",
            Self::Data(inner) => inner.category(),
        }
    }
}
