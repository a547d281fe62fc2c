//! Canonical assistant data model (sprite sheet, animations, audio candidates).
//!
//! Field names follow the JSON asset format (camelCase), so a parsed asset
//! round-trips through serde unchanged.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::AnimationError;

/// Ordered animation set; iteration order is definition order.
pub type AnimationSet = IndexMap<String, Animation>;

/// One weighted jump target of a branching frame.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub frame_index: usize,
    /// Relative weight; draws are taken in `[0, 100)`.
    pub weight: f64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Branching {
    #[serde(default)]
    pub branches: Vec<Branch>,
}

/// A single sprite frame.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    /// Display time in milliseconds.
    pub duration: u32,
    /// Sprite-sheet offsets, one per overlay layer.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<[i32; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_branch: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branching: Option<Branching>,
}

impl Frame {
    /// Plain frame with a duration and no images, sound or branches.
    pub fn new(duration: u32) -> Self {
        Self {
            duration,
            images: Vec::new(),
            sound: None,
            exit_branch: None,
            branching: None,
        }
    }

    pub fn with_image(mut self, x: i32, y: i32) -> Self {
        self.images.push([x, y]);
        self
    }

    pub fn with_sound(mut self, key: impl Into<String>) -> Self {
        self.sound = Some(key.into());
        self
    }

    pub fn with_exit_branch(mut self, frame_index: usize) -> Self {
        self.exit_branch = Some(frame_index);
        self
    }

    pub fn with_branches(mut self, branches: &[(usize, f64)]) -> Self {
        self.branching = Some(Branching {
            branches: branches
                .iter()
                .map(|&(frame_index, weight)| Branch {
                    frame_index,
                    weight,
                })
                .collect(),
        });
        self
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Animation {
    pub frames: Vec<Frame>,
    /// Hold the last frame in a waiting state until told to exit.
    #[serde(default)]
    pub use_exit_branching: bool,
}

impl Animation {
    pub fn new(frames: Vec<Frame>) -> Self {
        Self {
            frames,
            use_exit_branching: false,
        }
    }

    pub fn with_exit_branching(mut self) -> Self {
        self.use_exit_branching = true;
        self
    }

    #[inline]
    pub fn last_index(&self) -> usize {
        self.frames.len().saturating_sub(1)
    }
}

/// Sound files for one mime type, in the order the asset prefers them.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct AudioCandidate {
    pub mime: String,
    #[serde(default)]
    pub sounds: IndexMap<String, String>,
}

/// Everything needed to drive one assistant character.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssistantData {
    pub name: String,
    /// Number of stacked sprite layers; at least one layer is always rendered.
    #[serde(default)]
    pub overlay_count: usize,
    /// Frame size in pixels `[width, height]`.
    pub framesize: [u32; 2],
    pub animations: AnimationSet,
    #[serde(default)]
    pub audio: Vec<AudioCandidate>,
    /// Sprite-sheet locator.
    #[serde(default)]
    pub map: String,
}

impl AssistantData {
    pub fn new(name: impl Into<String>, framesize: [u32; 2]) -> Self {
        Self {
            name: name.into(),
            overlay_count: 1,
            framesize,
            animations: AnimationSet::new(),
            audio: Vec::new(),
            map: String::new(),
        }
    }

    pub fn with_animation(mut self, name: impl Into<String>, animation: Animation) -> Self {
        self.animations.insert(name.into(), animation);
        self
    }

    pub fn with_audio(mut self, candidate: AudioCandidate) -> Self {
        self.audio.push(candidate);
        self
    }

    /// Rendered layer count; the root surface always exists.
    #[inline]
    pub fn layer_count(&self) -> usize {
        self.overlay_count.max(1)
    }

    /// Validate basic invariants: at least one animation, every animation has
    /// frames, every frame has a positive duration and finite non-negative
    /// branch weights.
    ///
    /// Branch and exit targets past the last frame are allowed; the engine
    /// clamps them.
    pub fn validate_basic(&self) -> Result<(), AnimationError> {
        if self.animations.is_empty() {
            return Err(AnimationError::EmptyAnimationSet {
                name: self.name.clone(),
            });
        }
        for (name, animation) in &self.animations {
            if animation.frames.is_empty() {
                return Err(AnimationError::invalid(name, "animation has no frames"));
            }
            for (idx, frame) in animation.frames.iter().enumerate() {
                if frame.duration == 0 {
                    return Err(AnimationError::invalid(
                        name,
                        format!("frame {idx} has zero duration"),
                    ));
                }
                let Some(branching) = &frame.branching else {
                    continue;
                };
                if let Some(bad) = branching
                    .branches
                    .iter()
                    .find(|b| !b.weight.is_finite() || b.weight < 0.0)
                {
                    return Err(AnimationError::invalid(
                        name,
                        format!(
                            "frame {idx} branch to {} has invalid weight {}",
                            bad.frame_index, bad.weight
                        ),
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AssistantData {
        AssistantData::new("Tester", [124, 93])
            .with_animation("Wave", Animation::new(vec![Frame::new(100), Frame::new(100)]))
    }

    #[test]
    fn validate_accepts_plain_data() {
        assert!(sample().validate_basic().is_ok());
    }

    #[test]
    fn validate_rejects_empty_and_zero_duration() {
        let empty = AssistantData::new("Nobody", [1, 1]);
        assert!(matches!(
            empty.validate_basic(),
            Err(AnimationError::EmptyAnimationSet { .. })
        ));

        let no_frames = sample().with_animation("Blank", Animation::default());
        assert!(matches!(
            no_frames.validate_basic(),
            Err(AnimationError::InvalidData { animation, .. }) if animation == "Blank"
        ));

        let zero = sample().with_animation("Zero", Animation::new(vec![Frame::new(0)]));
        assert!(zero.validate_basic().is_err());
    }

    #[test]
    fn validate_rejects_negative_weight() {
        let data = sample().with_animation(
            "Branchy",
            Animation::new(vec![Frame::new(10).with_branches(&[(0, -1.0)]), Frame::new(10)]),
        );
        assert!(data.validate_basic().is_err());
    }

    #[test]
    fn layer_count_is_at_least_one() {
        let mut data = sample();
        data.overlay_count = 0;
        assert_eq!(data.layer_count(), 1);
        data.overlay_count = 3;
        assert_eq!(data.layer_count(), 3);
    }
}
