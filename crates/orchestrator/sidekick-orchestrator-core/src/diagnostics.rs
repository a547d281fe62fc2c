use std::fmt;

use serde::{Deserialize, Serialize};

/// Diagnostics configuration.
/// `debug` turns on `log::debug!` traces of actions, task transitions and
/// drag events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsCfg {
    pub debug: bool,
}

impl DiagnosticsCfg {
    #[inline]
    pub fn trace(&self, args: fmt::Arguments<'_>) {
        if self.debug {
            log::debug!(target: "sidekick::assistant", "{args}");
        }
    }
}
