//! Assistant configuration.

use serde::{Deserialize, Serialize};

use sidekick_animation_core::{Config, Millis};

use crate::diagnostics::DiagnosticsCfg;
use crate::error::OrchestratorError;

/// Message bubble timing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageConfig {
    /// Delay between revealed words.
    pub word_speak_time_ms: Millis,
    /// Delay before a finished message closes.
    pub close_delay_ms: Millis,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            word_speak_time_ms: 200,
            close_delay_ms: 2000,
        }
    }
}

/// Everything an [`crate::Assistant`] can be tuned with. Every field has a
/// default, so partial JSON documents are accepted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    pub animation: Config,
    pub message: MessageConfig,
    pub diagnostics: DiagnosticsCfg,
    /// Animations whose name starts with this prefix are idle animations.
    pub idle_prefix: String,
    /// Deadline after which a play task forces its animation to exit.
    pub play_timeout_ms: Millis,
    pub move_duration_ms: Millis,
    pub delay_ms: Millis,
    /// Minimum distance kept between the assistant and the viewport edges.
    pub reposition_margin: f64,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            animation: Config::default(),
            message: MessageConfig::default(),
            diagnostics: DiagnosticsCfg::default(),
            idle_prefix: "Idle".to_string(),
            play_timeout_ms: 5000,
            move_duration_ms: 1000,
            delay_ms: 250,
            reposition_margin: 5.0,
        }
    }
}

impl AssistantConfig {
    pub fn from_json(s: &str) -> Result<Self, OrchestratorError> {
        serde_json::from_str(s).map_err(|e| OrchestratorError::Config {
            reason: e.to_string(),
        })
    }

    /// Whether `name` is an idle animation (case-sensitive prefix match).
    #[inline]
    pub fn is_idle(&self, name: &str) -> bool {
        name.starts_with(self.idle_prefix.as_str())
    }
}
