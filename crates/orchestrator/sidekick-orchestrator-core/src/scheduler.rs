//! Virtual-time driver.
//!
//! The engine tick, the orchestrator's own wakes and the message bubble each
//! keep their own pending wakes. [`advance_to`] repeatedly takes the earliest
//! one, syncs every clock to it and fires, in this order: engine ticks, then
//! orchestrator wakes (FIFO among equal times), then message wakes. Events
//! produced along the way are dispatched before the next wake is chosen.

use sidekick_animation_core::{AnimatorEvent, Millis};

use crate::events::AssistantEvent;
use crate::message::MessageEvent;
use crate::tasks::{self, Listener, TaskKind};
use crate::{idle, Assistant};

/// Earliest pending wake across the engine, the orchestrator and the bubble.
pub fn next_wake(a: &Assistant) -> Option<Millis> {
    [
        a.animator.next_wake(),
        a.timers.next_due(),
        a.message.next_wake(),
    ]
    .into_iter()
    .flatten()
    .min()
}

/// Fire everything due at or before `t` in timestamp order, then move every
/// clock to `t`.
pub fn advance_to(a: &mut Assistant, t: Millis) {
    pump(a);
    while let Some(at) = next_wake(a).filter(|&at| at <= t) {
        a.clock = a.clock.max(at);
        a.message.sync_clock(at);

        a.animator.advance_to(at);
        pump(a);

        while let Some((_, wake)) = a.timers.pop_due(at) {
            tasks::fire(a, wake);
            pump(a);
        }

        a.message.advance_to(at);
        pump(a);
    }
    a.clock = a.clock.max(t);
    a.animator.advance_to(t);
    a.message.advance_to(t);
    pump(a);
}

/// Dispatch engine and message events until both are quiet.
pub(crate) fn pump(a: &mut Assistant) {
    loop {
        let animator_events = a.animator.take_events();
        let message_events = a.message.take_events();
        if animator_events.is_empty() && message_events.is_empty() {
            break;
        }
        for event in animator_events {
            dispatch_animator(a, event);
        }
        for event in message_events {
            dispatch_message(a, event);
        }
    }
}

fn dispatch_animator(a: &mut Assistant, event: AnimatorEvent<Listener>) {
    match event {
        AnimatorEvent::FrameRendered {
            animation,
            frame_index,
            layers,
        } => a.events.push(AssistantEvent::Frame {
            animation,
            frame_index,
            layers,
        }),
        AnimatorEvent::SoundTriggered { key, source } => {
            a.events.push(AssistantEvent::Sound { key, source })
        }
        AnimatorEvent::StateChanged {
            listener,
            animation,
            state,
        } => {
            a.trace(format_args!("{animation}: {state:?} ({listener:?})"));
            match listener {
                Listener::Task(ticket, role) => tasks::on_state(a, ticket, role, state),
                Listener::Idle(generation) => idle::on_state(a, generation, state),
                Listener::Hide => a.on_hide_state(state),
            }
        }
    }
}

fn dispatch_message(a: &mut Assistant, event: MessageEvent) {
    let completed = event == MessageEvent::Completed;
    a.events.push(AssistantEvent::Message(event));
    if !completed {
        return;
    }
    let speaking = a
        .active
        .as_ref()
        .filter(|t| t.kind() == TaskKind::Speak)
        .map(|t| t.ticket);
    if let Some(ticket) = speaking {
        tasks::finish(a, ticket);
    }
}
