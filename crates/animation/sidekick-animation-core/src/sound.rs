//! Sound bank resolution.
//!
//! The asset lists audio candidates by mime type in preference order. The
//! host answers "can you play this mime?" through an [`AudioProbe`], and the
//! bank is resolved once at construction.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::data::AudioCandidate;

/// Answer of a playback-capability probe, mirroring `canPlayType`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Playability {
    /// Definitely supported.
    Probably,
    /// Possibly supported; only used when nothing definite exists.
    Maybe,
    No,
}

/// Host capability query used while resolving the sound bank.
pub trait AudioProbe {
    fn can_play_type(&self, mime: &str) -> Playability;
}

impl<F> AudioProbe for F
where
    F: Fn(&str) -> Playability,
{
    fn can_play_type(&self, mime: &str) -> Playability {
        self(mime)
    }
}

/// Probe for hosts without audio output; every candidate is rejected.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoAudio;

impl AudioProbe for NoAudio {
    fn can_play_type(&self, _mime: &str) -> Playability {
        Playability::No
    }
}

/// Probe that reports a fixed answer per mime type.
#[derive(Clone, Debug, Default)]
pub struct MimeTable {
    answers: HashMap<String, Playability>,
}

impl MimeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, mime: impl Into<String>, answer: Playability) -> Self {
        self.answers.insert(mime.into(), answer);
        self
    }
}

impl AudioProbe for MimeTable {
    fn can_play_type(&self, mime: &str) -> Playability {
        self.answers.get(mime).copied().unwrap_or(Playability::No)
    }
}

/// A playable sound: the asset key plus the locator the host should load.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundResource {
    pub key: String,
    pub source: String,
    pub mime: String,
}

/// Resolved key → sound mapping for one engine instance.
#[derive(Clone, Debug, Default)]
pub struct SoundBank {
    mime: Option<String>,
    sounds: HashMap<String, SoundResource>,
}

impl SoundBank {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Pick the candidate to use:
    /// a `Probably` answer wins immediately; otherwise the first `Maybe`
    /// candidate is used with a warning; otherwise the bank stays empty and a
    /// single "no compatible audio format" warning is logged.
    pub fn resolve(candidates: &[AudioCandidate], probe: &dyn AudioProbe) -> Self {
        let mut maybe: Option<&AudioCandidate> = None;
        for candidate in candidates {
            match probe.can_play_type(&candidate.mime) {
                Playability::Probably => return Self::from_candidate(candidate),
                Playability::Maybe if maybe.is_none() => maybe = Some(candidate),
                Playability::Maybe | Playability::No => {}
            }
        }
        match maybe {
            Some(candidate) => {
                log::warn!("Audio format '{}' maybe supported", candidate.mime);
                Self::from_candidate(candidate)
            }
            None => {
                log::warn!("No compatible audio format found");
                Self::empty()
            }
        }
    }

    fn from_candidate(candidate: &AudioCandidate) -> Self {
        let sounds = candidate
            .sounds
            .iter()
            .map(|(key, source)| {
                (
                    key.clone(),
                    SoundResource {
                        key: key.clone(),
                        source: source.clone(),
                        mime: candidate.mime.clone(),
                    },
                )
            })
            .collect();
        Self {
            mime: Some(candidate.mime.clone()),
            sounds,
        }
    }

    /// Mime type of the chosen candidate, if any.
    pub fn mime(&self) -> Option<&str> {
        self.mime.as_deref()
    }

    pub fn get(&self, key: &str) -> Option<&SoundResource> {
        self.sounds.get(key)
    }

    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }
}
