//! Core configuration for sidekick-animation-core.

use serde::{Deserialize, Serialize};

/// Engine-level switches. Missing fields fall back to [`Config::default`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Start muted: frames still render but no sounds are requested.
    pub muted: bool,
    /// Seed for branch selection. `None` seeds from entropy.
    pub seed: Option<u64>,
}
