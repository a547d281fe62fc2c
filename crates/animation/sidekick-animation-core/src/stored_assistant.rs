use serde::Deserialize;

use crate::data::AssistantData;
use crate::error::AnimationError;

/// Public API: parse an assistant asset (JSON) into [`AssistantData`] and
/// validate it.
///
/// Notes:
/// - Keys follow the asset format: `overlayCount`, `framesize`, `animations`,
///   `audio`, `name`, `map`.
/// - Frames accept `images` as `[[x, y], ...]`, plus optional `sound`,
///   `exitBranch` and `branching.branches[{frameIndex, weight}]`.
/// - A top-level `{ "assistant": { ... } }` wrapper is accepted as well, which
///   is how bundled agent files tend to ship.
pub fn parse_assistant_json(s: &str) -> Result<AssistantData, AnimationError> {
    let data = match serde_json::from_str::<StoredAssistant>(s)? {
        StoredAssistant::Wrapped { assistant } => assistant,
        StoredAssistant::Bare(data) => data,
    };
    data.validate_basic()?;
    Ok(data)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredAssistant {
    Wrapped { assistant: AssistantData },
    Bare(AssistantData),
}
