//! Error types for assistant asset loading and validation.

use serde::{Deserialize, Serialize};

/// Errors raised while parsing or validating assistant data.
///
/// Runtime conditions (unknown animation names, missing sounds) are not
/// errors: the engine reports them through return values or degrades quietly.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum AnimationError {
    /// Asset JSON could not be parsed
    #[error("Assistant data parse error: {reason}")]
    Json { reason: String },

    /// Asset parsed but breaks a frame/animation invariant
    #[error("Invalid animation '{animation}': {reason}")]
    InvalidData { animation: String, reason: String },

    /// Asset defines no animations at all
    #[error("Assistant '{name}' defines no animations")]
    EmptyAnimationSet { name: String },
}

impl AnimationError {
    pub fn invalid(animation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidData {
            animation: animation.into(),
            reason: reason.into(),
        }
    }

    /// Get error category for logging/metrics
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::Json { .. } => "serialization",
            Self::InvalidData { .. } | Self::EmptyAnimationSet { .. } => "validation",
        }
    }
}

impl From<serde_json::Error> for AnimationError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        let err = AnimationError::invalid("Wave", "frame 0 has zero duration");
        assert_eq!(err.category(), "validation");
        assert_eq!(
            err.to_string(),
            "Invalid animation 'Wave': frame 0 has zero duration"
        );

        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(AnimationError::from(json_err).category(), "serialization");
    }
}
