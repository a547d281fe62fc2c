//! Queued actions and their lifecycle.
//!
//! A task is started by [`start`] when the queue hands it out and ends with
//! [`finish`], which presents the task's ticket back to the queue. The
//! listener registered with an animation routes the engine's state changes to
//! the task that showed it.

use std::fmt;

use serde::{Deserialize, Serialize};

use sidekick_animation_core::{AnimatorState, Millis, Ticket, TimerId};

use crate::events::AssistantEvent;
use crate::geometry::{Direction, Motion, Point};
use crate::idle::{self, IdlePhase};
use crate::queue::Advance;
use crate::Assistant;

/// Caller-supplied completion hook.
pub struct Callback(Box<dyn FnOnce()>);

impl Callback {
    pub fn new(f: impl FnOnce() + 'static) -> Self {
        Self(Box::new(f))
    }

    pub fn call(self) {
        (self.0)()
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback")
    }
}

#[derive(Debug)]
pub(crate) enum Task {
    Play {
        animation: String,
        timeout: Millis,
        on_complete: Option<Callback>,
    },
    Move {
        target: Point,
        direction: Direction,
        duration: Millis,
    },
    Speak {
        text: String,
        hold: bool,
    },
    Delay {
        time: Millis,
    },
}

/// Kind of the task currently running.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskKind {
    Play,
    Move,
    Speak,
    Delay,
}

/// Which task role registered an animation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    Play,
    Move,
}

/// Listener value attached to every animation the assistant shows.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Listener {
    Task(Ticket, Role),
    /// Idle animation of the given generation.
    Idle(u64),
    Hide,
}

/// Orchestrator-level wakes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Wake {
    PlayDeadline(Ticket),
    MoveFinished(Ticket),
    DelayElapsed(Ticket),
}

#[derive(Debug)]
pub(crate) struct ActiveTask {
    pub(crate) ticket: Ticket,
    pub(crate) kind: ActiveKind,
}

#[derive(Debug)]
pub(crate) enum ActiveKind {
    Play {
        deadline: TimerId,
        on_complete: Option<Callback>,
    },
    Move {
        target: Point,
        duration: Millis,
        animated: bool,
        transition_started: bool,
    },
    Speak,
    Delay {
        timer: TimerId,
    },
}

impl ActiveKind {
    fn kind(&self) -> TaskKind {
        match self {
            ActiveKind::Play { .. } => TaskKind::Play,
            ActiveKind::Move { .. } => TaskKind::Move,
            ActiveKind::Speak => TaskKind::Speak,
            ActiveKind::Delay { .. } => TaskKind::Delay,
        }
    }
}

impl ActiveTask {
    pub(crate) fn kind(&self) -> TaskKind {
        self.kind.kind()
    }
}

pub(crate) fn enqueue(a: &mut Assistant, task: Task) {
    if let Some((ticket, task)) = a.queue.enqueue(task) {
        start(a, ticket, task);
    }
}

pub(crate) fn start(a: &mut Assistant, ticket: Ticket, task: Task) {
    match task {
        Task::Play {
            animation,
            timeout,
            on_complete,
        } => {
            a.trace(format_args!("task {ticket:?}: play {animation}"));
            let deadline = a
                .timers
                .schedule(a.clock.saturating_add(timeout), Wake::PlayDeadline(ticket));
            a.active = Some(ActiveTask {
                ticket,
                kind: ActiveKind::Play {
                    deadline,
                    on_complete,
                },
            });
            idle::show_or_defer(a, &animation, Listener::Task(ticket, Role::Play));
        }
        Task::Move {
            target,
            direction,
            duration,
        } => {
            a.trace(format_args!(
                "task {ticket:?}: move {direction} to ({}, {}) over {duration}ms",
                target.x, target.y
            ));
            if duration == 0 {
                a.motion = None;
                a.position = Some(target);
                a.events.push(AssistantEvent::moved(target));
                a.reposition();
                finish(a, ticket);
                return;
            }
            let animation = format!("Move{direction}");
            let animated = a.animator.has_animation(&animation);
            a.active = Some(ActiveTask {
                ticket,
                kind: ActiveKind::Move {
                    target,
                    duration,
                    animated,
                    transition_started: false,
                },
            });
            if animated {
                idle::show_or_defer(a, &animation, Listener::Task(ticket, Role::Move));
            } else {
                start_transition(a, ticket);
            }
        }
        Task::Speak { text, hold } => {
            a.trace(format_args!("task {ticket:?}: speak {text:?} (hold: {hold})"));
            a.active = Some(ActiveTask {
                ticket,
                kind: ActiveKind::Speak,
            });
            a.message.speak(&text, hold);
        }
        Task::Delay { time } => {
            a.trace(format_args!("task {ticket:?}: delay {time}ms"));
            idle::inject(a);
            let timer = a
                .timers
                .schedule(a.clock.saturating_add(time), Wake::DelayElapsed(ticket));
            a.active = Some(ActiveTask {
                ticket,
                kind: ActiveKind::Delay { timer },
            });
        }
    }
}

/// Complete `ticket` on the queue and move on: start the next task or, when
/// the queue drained, inject an idle animation.
pub(crate) fn finish(a: &mut Assistant, ticket: Ticket) {
    if a.active.as_ref().is_some_and(|t| t.ticket == ticket) {
        if let Some(task) = a.active.take() {
            match task.kind {
                ActiveKind::Play { deadline, .. } => {
                    a.timers.cancel(deadline);
                }
                ActiveKind::Delay { timer } => {
                    a.timers.cancel(timer);
                }
                ActiveKind::Move { .. } | ActiveKind::Speak => {}
            }
        }
    }
    match a.queue.complete(ticket) {
        Some(Advance::Start(next, task)) => {
            a.trace(format_args!("task {ticket:?} done, starting {next:?}"));
            start(a, next, task);
        }
        Some(Advance::Drained) => {
            a.trace(format_args!("task {ticket:?} done, queue drained"));
            idle::inject(a);
        }
        None => {}
    }
}

/// Route an engine state change to the task that registered `role`.
pub(crate) fn on_state(a: &mut Assistant, ticket: Ticket, role: Role, state: AnimatorState) {
    if !a.active.as_ref().is_some_and(|t| t.ticket == ticket) {
        return;
    }
    match (role, state) {
        (Role::Play, AnimatorState::Exited) => {
            let callback = match a.active.as_mut().map(|t| &mut t.kind) {
                Some(ActiveKind::Play { on_complete, .. }) => on_complete.take(),
                _ => None,
            };
            if let Some(callback) = callback {
                callback.call();
            }
            finish(a, ticket);
        }
        (Role::Play, AnimatorState::Waiting) => {}
        (Role::Move, AnimatorState::Waiting) => start_transition(a, ticket),
        (Role::Move, AnimatorState::Exited) => finish(a, ticket),
    }
}

pub(crate) fn fire(a: &mut Assistant, wake: Wake) {
    match wake {
        Wake::PlayDeadline(ticket) => {
            let playing = matches!(
                a.active.as_ref(),
                Some(ActiveTask { ticket: t, kind: ActiveKind::Play { .. } }) if *t == ticket
            );
            if !playing {
                return;
            }
            a.trace(format_args!("task {ticket:?}: play deadline, exiting"));
            if let IdlePhase::Playing {
                deferred: Some(deferred),
                ..
            } = &mut a.idle
            {
                if deferred.listener == Listener::Task(ticket, Role::Play) {
                    deferred.exit_on_show = true;
                    return;
                }
            }
            a.animator.exit_animation();
        }
        Wake::MoveFinished(ticket) => {
            if let Some((owner, motion)) = a.motion {
                if owner == ticket {
                    a.motion = None;
                    a.position = Some(motion.to);
                    a.events.push(AssistantEvent::moved(motion.to));
                }
            }
            let animated = match a.active.as_ref() {
                Some(ActiveTask {
                    ticket: t,
                    kind: ActiveKind::Move { animated, .. },
                }) if *t == ticket => *animated,
                _ => return,
            };
            if animated {
                a.animator.exit_animation();
            } else {
                finish(a, ticket);
            }
        }
        Wake::DelayElapsed(ticket) => {
            let delaying = a
                .active
                .as_ref()
                .is_some_and(|t| t.ticket == ticket && t.kind() == TaskKind::Delay);
            if delaying {
                finish(a, ticket);
            }
        }
    }
}

/// Begin the position transition of the active move task, once.
fn start_transition(a: &mut Assistant, ticket: Ticket) {
    let (target, duration) = match a.active.as_mut() {
        Some(ActiveTask {
            ticket: t,
            kind:
                ActiveKind::Move {
                    target,
                    duration,
                    transition_started,
                    ..
                },
        }) if *t == ticket && !*transition_started => {
            *transition_started = true;
            (*target, *duration)
        }
        _ => return,
    };
    let from = a.position().unwrap_or(target);
    let motion = Motion {
        from,
        to: target,
        start: a.clock,
        duration,
    };
    a.motion = Some((ticket, motion));
    a.events.push(AssistantEvent::MoveStarted {
        from,
        to: target,
        duration,
    });
    a.timers.schedule(motion.end(), Wake::MoveFinished(ticket));
}
