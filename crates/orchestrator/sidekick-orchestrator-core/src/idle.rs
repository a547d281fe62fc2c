//! Idle animations between queued actions.
//!
//! When the queue drains a random idle animation is shown. A task that needs
//! the engine while an idle animation is still running does not cut it off:
//! its show request is parked as [`Deferred`], the idle animation is asked to
//! exit, and the request runs once the idle animation reports `Exited`.

use sidekick_animation_core::AnimatorState;

use crate::tasks::Listener;
use crate::Assistant;

/// A show request waiting for the idle animation to wind down.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deferred {
    pub animation: String,
    pub listener: Listener,
    /// Set when the requester's deadline passed while it was parked; the
    /// animation is told to exit as soon as it is shown.
    pub exit_on_show: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum IdlePhase {
    #[default]
    NotIdle,
    Playing {
        generation: u64,
        deferred: Option<Deferred>,
    },
}

impl IdlePhase {
    pub fn is_playing(&self) -> bool {
        matches!(self, IdlePhase::Playing { .. })
    }
}

/// Show a random idle animation unless hidden, already idling, or the
/// assistant has no idle animations.
pub(crate) fn inject(a: &mut Assistant) {
    if a.hidden || a.idle.is_playing() {
        return;
    }
    let idles: Vec<String> = a
        .animator
        .animation_names()
        .filter(|name| a.config.is_idle(name))
        .map(str::to_string)
        .collect();
    if idles.is_empty() {
        return;
    }
    let pick = &idles[a.rng.next_index(idles.len())];

    a.idle_generation += 1;
    let generation = a.idle_generation;
    a.idle = IdlePhase::Playing {
        generation,
        deferred: None,
    };
    a.trace(format_args!("idle {generation}: {pick}"));
    a.animator.show_animation(pick, Listener::Idle(generation));
}

/// Show `animation`, or park the request behind a running idle animation.
///
/// Returns `false` only when the animation does not exist.
pub(crate) fn show_or_defer(a: &mut Assistant, animation: &str, listener: Listener) -> bool {
    if !a.animator.has_animation(animation) {
        return false;
    }
    if let IdlePhase::Playing { generation, deferred } = &mut a.idle {
        let generation = *generation;
        *deferred = Some(Deferred {
            animation: animation.to_string(),
            listener,
            exit_on_show: false,
        });
        a.trace(format_args!(
            "idle {generation}: deferring {animation} until the idle animation exits"
        ));
        a.animator.exit_animation();
        return true;
    }
    a.animator.show_animation(animation, listener)
}

/// Handle a state change of an idle animation.
pub(crate) fn on_state(a: &mut Assistant, generation: u64, state: AnimatorState) {
    if state != AnimatorState::Exited {
        return;
    }
    let current = matches!(a.idle, IdlePhase::Playing { generation: g, .. } if g == generation);
    if !current {
        return;
    }
    let IdlePhase::Playing { deferred, .. } = std::mem::take(&mut a.idle) else {
        return;
    };
    a.trace(format_args!("idle {generation}: exited"));
    if let Some(Deferred {
        animation,
        listener,
        exit_on_show,
    }) = deferred
    {
        a.animator.show_animation(&animation, listener);
        if exit_on_show {
            a.animator.exit_animation();
        }
    }
}

#[cfg(test)]
mod tests {
    use sidekick_animation_core::{Animation, AssistantData, Frame, NoAudio, ScriptedRandom};

    use super::*;
    use crate::AssistantConfig;

    fn assistant() -> Assistant {
        let two = || Animation::new(vec![Frame::new(100), Frame::new(100)]);
        let data = AssistantData::new("Tester", [10, 10])
            .with_animation("Wave", two())
            .with_animation("IdleA", two())
            .with_animation("IdleB", Animation::new(vec![Frame::new(100)]));
        let mut a = Assistant::with_random(
            data,
            AssistantConfig::default(),
            &NoAudio,
            Box::new(ScriptedRandom::default()),
            Box::new(ScriptedRandom::new([0.9])),
        )
        .expect("valid assistant");
        a.hidden = false;
        a
    }

    #[test]
    fn inject_picks_idle_animations_once() {
        let mut a = assistant();
        inject(&mut a);
        assert_eq!(a.animator.current_animation(), Some("IdleB"));
        assert_eq!(
            a.idle,
            IdlePhase::Playing {
                generation: 1,
                deferred: None
            }
        );

        inject(&mut a);
        assert_eq!(a.idle_generation, 1);
    }

    #[test]
    fn hidden_assistant_does_not_idle() {
        let mut a = assistant();
        a.hidden = true;
        inject(&mut a);
        assert_eq!(a.idle, IdlePhase::NotIdle);
        assert_eq!(a.animator.current_animation(), None);
    }

    #[test]
    fn only_current_generation_exit_ends_idle() {
        let mut a = assistant();
        inject(&mut a);
        on_state(&mut a, 7, AnimatorState::Exited);
        on_state(&mut a, 1, AnimatorState::Waiting);
        assert!(a.idle.is_playing());

        on_state(&mut a, 1, AnimatorState::Exited);
        assert_eq!(a.idle, IdlePhase::NotIdle);
    }

    #[test]
    fn show_request_waits_for_idle_exit() {
        let mut a = assistant();
        inject(&mut a);
        assert!(!show_or_defer(&mut a, "Nope", Listener::Hide));
        assert!(!a.animator.is_exiting());

        assert!(show_or_defer(&mut a, "Wave", Listener::Hide));
        assert!(a.animator.is_exiting());
        assert_eq!(a.animator.current_animation(), Some("IdleB"));

        on_state(&mut a, 1, AnimatorState::Exited);
        assert_eq!(a.animator.current_animation(), Some("Wave"));
        assert_eq!(a.idle, IdlePhase::NotIdle);
    }
}
