//! Animator: frame stepping over one assistant's animation set.
//!
//! The animator owns a single playback at a time and a single tick handle.
//! Hosts drive it with [`Animator::advance_to`]; every tick renders the shown
//! frame, requests its sound and re-arms the handle `duration` ms later.
//! Milestones are reported as [`AnimatorEvent::StateChanged`] carrying the
//! listener value registered with [`Animator::show_animation`].

use std::sync::Arc;

use crate::config::Config;
use crate::data::{AssistantData, Frame};
use crate::error::AnimationError;
use crate::outputs::{AnimatorEvent, AnimatorState, LayerState};
use crate::random::{RandomSource, SeededRandom};
use crate::sound::{AudioProbe, SoundBank};
use crate::timer::Millis;

/// Per-playback bookkeeping.
#[derive(Clone, Debug)]
pub struct Playback<L> {
    pub animation: String,
    pub frame_index: usize,
    /// Index of the frame object currently displayed. Lags `frame_index` while
    /// an exit-branching animation holds on its last frame.
    pub shown: Option<usize>,
    pub exiting: bool,
    pub listener: Option<L>,
}

#[derive(Debug)]
pub struct Animator<L> {
    data: Arc<AssistantData>,
    sounds: SoundBank,
    rng: Box<dyn RandomSource>,

    playback: Option<Playback<L>>,
    started: bool,
    paused: bool,
    muted: bool,
    next_tick: Option<Millis>,
    clock: Millis,

    layers: Vec<LayerState>,
    events: Vec<AnimatorEvent<L>>,
}

impl<L: Clone> Animator<L> {
    /// Validate `data`, resolve its sound bank against `probe` and seed branch
    /// selection from `cfg.seed`.
    pub fn new(
        data: Arc<AssistantData>,
        cfg: &Config,
        probe: &dyn AudioProbe,
    ) -> Result<Self, AnimationError> {
        let rng = Box::new(SeededRandom::from_seed_option(cfg.seed));
        Self::with_random(data, cfg, probe, rng)
    }

    /// Same as [`Animator::new`] with an explicit random source.
    pub fn with_random(
        data: Arc<AssistantData>,
        cfg: &Config,
        probe: &dyn AudioProbe,
        rng: Box<dyn RandomSource>,
    ) -> Result<Self, AnimationError> {
        data.validate_basic()?;
        let sounds = SoundBank::resolve(&data.audio, probe);
        let layers = vec![LayerState::Hidden; data.layer_count()];
        Ok(Self {
            data,
            sounds,
            rng,
            playback: None,
            started: false,
            paused: false,
            muted: cfg.muted,
            next_tick: None,
            clock: 0,
            layers,
            events: Vec::new(),
        })
    }

    /// Animation names in definition order.
    pub fn animation_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.data.animations.keys().map(String::as_str)
    }

    pub fn has_animation(&self, name: &str) -> bool {
        self.data.animations.contains_key(name)
    }

    /// Install `name` as the current playback with `listener` registered.
    ///
    /// Returns `false` and leaves the current playback untouched when the
    /// animation does not exist. The first call ever ticks immediately; later
    /// playbacks pick up on the running tick loop.
    pub fn show_animation(&mut self, name: &str, listener: impl Into<Option<L>>) -> bool {
        if !self.has_animation(name) {
            return false;
        }
        self.playback = Some(Playback {
            animation: name.to_string(),
            frame_index: 0,
            shown: None,
            exiting: false,
            listener: listener.into(),
        });
        // A loop that stopped on its own (nothing shown to time the next tick)
        // is restarted as well; a paused loop waits for `resume`.
        if !self.started || (self.next_tick.is_none() && !self.paused) {
            self.started = true;
            self.step();
        }
        true
    }

    /// Wind the current playback down: the next tick follows exit branches
    /// and the end is reported as `Exited` instead of `Waiting`.
    ///
    /// A playback holding without a tick (a one-frame exit-branching
    /// animation) is stepped right away so the exit can be observed.
    pub fn exit_animation(&mut self) {
        let Some(playback) = self.playback.as_mut() else {
            return;
        };
        playback.exiting = true;
        if self.started && !self.paused && self.next_tick.is_none() {
            self.step();
        }
    }

    /// Cancel the pending tick. Playback state is kept.
    pub fn pause(&mut self) {
        self.paused = true;
        self.next_tick = None;
    }

    /// Tick immediately, which re-arms the tick handle.
    pub fn resume(&mut self) {
        self.paused = false;
        self.step();
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_exiting(&self) -> bool {
        self.playback.as_ref().is_some_and(|p| p.exiting)
    }

    pub fn playback(&self) -> Option<&Playback<L>> {
        self.playback.as_ref()
    }

    pub fn current_animation(&self) -> Option<&str> {
        self.playback.as_ref().map(|p| p.animation.as_str())
    }

    pub fn current_frame_index(&self) -> Option<usize> {
        self.playback.as_ref().map(|p| p.frame_index)
    }

    /// The frame object on screen.
    pub fn current_frame(&self) -> Option<&Frame> {
        let playback = self.playback.as_ref()?;
        let animation = self.data.animations.get(&playback.animation)?;
        animation.frames.get(playback.shown?)
    }

    /// True when there is no playback or it reached its last frame.
    pub fn at_last_frame(&self) -> bool {
        let Some(playback) = self.playback.as_ref() else {
            return true;
        };
        self.data
            .animations
            .get(&playback.animation)
            .map_or(true, |a| playback.frame_index >= a.last_index())
    }

    /// Layer states from the most recent render.
    pub fn layers(&self) -> &[LayerState] {
        &self.layers
    }

    pub fn sounds(&self) -> &SoundBank {
        &self.sounds
    }

    pub fn data(&self) -> &Arc<AssistantData> {
        &self.data
    }

    pub fn now(&self) -> Millis {
        self.clock
    }

    /// Due time of the pending tick.
    pub fn next_wake(&self) -> Option<Millis> {
        self.next_tick
    }

    /// Fire every tick due at or before `t`, then move the clock to `t`.
    pub fn advance_to(&mut self, t: Millis) {
        while let Some(due) = self.next_tick.filter(|&due| due <= t) {
            self.clock = self.clock.max(due);
            self.next_tick = None;
            self.step();
        }
        self.clock = self.clock.max(t);
    }

    pub fn advance(&mut self, dt: Millis) {
        self.advance_to(self.clock.saturating_add(dt));
    }

    /// Drain events produced since the last call.
    pub fn take_events(&mut self) -> Vec<AnimatorEvent<L>> {
        std::mem::take(&mut self.events)
    }

    fn step(&mut self) {
        let Some(playback) = self.playback.as_mut() else {
            return;
        };
        let Some(animation) = self.data.animations.get(&playback.animation) else {
            return;
        };
        let last = animation.last_index();

        let candidate = match playback.shown.and_then(|i| animation.frames.get(i)) {
            None => 0,
            Some(shown) => {
                next_frame_index(shown, playback.frame_index, playback.exiting, &mut *self.rng)
            }
        };
        let new_index = candidate.min(last);
        let frame_changed = playback.shown.is_none() || new_index != playback.frame_index;
        playback.frame_index = new_index;

        let at_last = new_index >= last;
        if !(at_last && animation.use_exit_branching) {
            playback.shown = Some(new_index);
        }
        let shown = playback.shown.and_then(|i| animation.frames.get(i));

        let images = shown.map_or(&[][..], |f| f.images.as_slice());
        for (i, layer) in self.layers.iter_mut().enumerate() {
            *layer = match images.get(i) {
                Some(&[x, y]) => LayerState::Visible {
                    background_position: [-x, -y],
                },
                None => LayerState::Hidden,
            };
        }
        self.events.push(AnimatorEvent::FrameRendered {
            animation: playback.animation.clone(),
            frame_index: new_index,
            layers: self.layers.clone(),
        });

        if !self.muted {
            let sound = shown
                .and_then(|f| f.sound.as_deref())
                .and_then(|key| self.sounds.get(key));
            if let Some(sound) = sound {
                self.events.push(AnimatorEvent::SoundTriggered {
                    key: sound.key.clone(),
                    source: sound.source.clone(),
                });
            }
        }

        self.next_tick = shown.map(|f| self.clock + Millis::from(f.duration));

        if frame_changed && at_last {
            if let Some(listener) = playback.listener.clone() {
                let state = if animation.use_exit_branching && !playback.exiting {
                    AnimatorState::Waiting
                } else {
                    AnimatorState::Exited
                };
                self.events.push(AnimatorEvent::StateChanged {
                    listener,
                    animation: playback.animation.clone(),
                    state,
                });
            }
        }
    }
}

/// Transition rule for the frame after `shown`: exit branch while exiting,
/// then a weighted branch draw, then the next frame in order.
fn next_frame_index(
    shown: &Frame,
    current: usize,
    exiting: bool,
    rng: &mut dyn RandomSource,
) -> usize {
    if exiting {
        if let Some(exit) = shown.exit_branch {
            return exit;
        }
    }
    if let Some(branching) = &shown.branching {
        let mut draw = rng.next_unit() * 100.0;
        for branch in &branching.branches {
            if draw <= branch.weight {
                return branch.frame_index;
            }
            draw -= branch.weight;
        }
    }
    current + 1
}
