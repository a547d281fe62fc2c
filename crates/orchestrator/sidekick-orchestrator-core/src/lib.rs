//! sidekick-orchestrator
//!
//! Drives one assistant character: user actions are serialized through a
//! [`TaskQueue`], each task drives the frame engine, the message bubble or a
//! timed move, and an idle animation fills the gaps whenever the queue
//! drains. Time is virtual; hosts call [`Assistant::advance`] and apply the
//! [`AssistantEvent`]s returned by [`Assistant::take_events`].

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod events;
pub mod geometry;
pub mod idle;
pub mod message;
pub mod queue;
pub mod scheduler;
pub mod tasks;

use std::fmt;
use std::sync::Arc;

use sidekick_animation_core::{
    parse_assistant_json, Animator, AnimatorState, AssistantData, AudioProbe, Millis,
    RandomSource, SeededRandom, Ticket, TimerSet,
};

pub use crate::config::{AssistantConfig, MessageConfig};
pub use crate::diagnostics::DiagnosticsCfg;
pub use crate::error::OrchestratorError;
pub use crate::events::AssistantEvent;
pub use crate::geometry::{Direction, Motion, Point, Viewport};
pub use crate::idle::IdlePhase;
pub use crate::message::{Message, MessageEvent};
pub use crate::queue::{Advance, TaskQueue};
pub use crate::tasks::{Callback, Listener, Role, TaskKind};

use crate::tasks::{ActiveTask, Task, Wake};

/// Pointer offset from the assistant's top-left corner while dragging.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DragSession {
    pub offset: Point,
}

#[derive(Debug)]
pub struct Assistant {
    pub(crate) config: AssistantConfig,
    pub(crate) animator: Animator<Listener>,
    pub(crate) queue: TaskQueue<Task>,
    pub(crate) message: Message,
    pub(crate) timers: TimerSet<Wake>,
    /// Idle and `animate` selection.
    pub(crate) rng: Box<dyn RandomSource>,
    pub(crate) clock: Millis,

    pub(crate) hidden: bool,
    pub(crate) idle: IdlePhase,
    pub(crate) idle_generation: u64,
    pub(crate) active: Option<ActiveTask>,
    pub(crate) on_hidden: Option<Callback>,

    pub(crate) position: Option<Point>,
    pub(crate) motion: Option<(Ticket, Motion)>,
    pub(crate) viewport: Option<Viewport>,
    pub(crate) drag: Option<DragSession>,

    pub(crate) events: Vec<AssistantEvent>,
}

impl Assistant {
    /// Build an assistant for `data`. Starts hidden; call [`Assistant::show`].
    pub fn new(
        data: AssistantData,
        config: AssistantConfig,
        probe: &dyn AudioProbe,
    ) -> Result<Self, OrchestratorError> {
        let seed = config.animation.seed;
        Self::with_random(
            data,
            config,
            probe,
            Box::new(SeededRandom::from_seed_option(seed)),
            Box::new(SeededRandom::from_seed_option(seed.map(|s| s.wrapping_add(1)))),
        )
    }

    /// Parse and validate an assistant asset, then build it.
    pub fn from_json(
        json: &str,
        config: AssistantConfig,
        probe: &dyn AudioProbe,
    ) -> Result<Self, OrchestratorError> {
        let data = parse_assistant_json(json)?;
        Self::new(data, config, probe)
    }

    /// Build with explicit random sources for branch selection
    /// (`animator_rng`) and idle/`animate` selection (`selection_rng`).
    pub fn with_random(
        data: AssistantData,
        config: AssistantConfig,
        probe: &dyn AudioProbe,
        animator_rng: Box<dyn RandomSource>,
        selection_rng: Box<dyn RandomSource>,
    ) -> Result<Self, OrchestratorError> {
        let animator =
            Animator::with_random(Arc::new(data), &config.animation, probe, animator_rng)?;
        let message = Message::new(config.message.clone());
        Ok(Self {
            config,
            animator,
            queue: TaskQueue::new(),
            message,
            timers: TimerSet::new(),
            rng: selection_rng,
            clock: 0,
            hidden: true,
            idle: IdlePhase::NotIdle,
            idle_generation: 0,
            active: None,
            on_hidden: None,
            position: None,
            motion: None,
            viewport: None,
            drag: None,
            events: Vec::new(),
        })
    }

    pub(crate) fn trace(&self, args: fmt::Arguments<'_>) {
        self.config.diagnostics.trace(args);
    }

    /* ---------------------------- accessors ---------------------------- */

    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }

    pub fn animator(&self) -> &Animator<Listener> {
        &self.animator
    }

    pub fn message(&self) -> &Message {
        &self.message
    }

    pub fn now(&self) -> Millis {
        self.clock
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn idle_phase(&self) -> &IdlePhase {
        &self.idle
    }

    /// Kind of the running task, if any.
    pub fn active_task(&self) -> Option<TaskKind> {
        self.active.as_ref().map(ActiveTask::kind)
    }

    /// Tasks waiting behind the running one.
    pub fn pending_tasks(&self) -> usize {
        self.queue.len()
    }

    pub fn animation_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.animator.animation_names()
    }

    pub fn has_animation(&self, name: &str) -> bool {
        self.animator.has_animation(name)
    }

    /// Current top-left corner, following an in-flight move.
    pub fn position(&self) -> Option<Point> {
        match self.motion {
            Some((_, motion)) => Some(motion.position_at(self.clock)),
            None => self.position,
        }
    }

    pub fn set_position(&mut self, x: f64, y: f64) {
        let p = Point::new(x, y);
        self.motion = None;
        self.position = Some(p);
        self.events.push(AssistantEvent::moved(p));
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport = Some(Viewport::new(width, height));
    }

    fn size(&self) -> [f64; 2] {
        let [w, h] = self.animator.data().framesize;
        [f64::from(w), f64::from(h)]
    }

    /* ---------------------------- actions ---------------------------- */

    /// Queue `animation`. Returns `false` when it does not exist.
    pub fn play(&mut self, animation: &str) -> bool {
        self.enqueue_play(animation, self.config.play_timeout_ms, None)
    }

    /// Queue `animation` with an explicit deadline and a hook called once it
    /// exits.
    pub fn play_with(
        &mut self,
        animation: &str,
        timeout: Millis,
        on_complete: impl FnOnce() + 'static,
    ) -> bool {
        self.enqueue_play(animation, timeout, Some(Callback::new(on_complete)))
    }

    fn enqueue_play(&mut self, animation: &str, timeout: Millis, cb: Option<Callback>) -> bool {
        if !self.has_animation(animation) {
            return false;
        }
        self.trace(format_args!("play {animation}"));
        tasks::enqueue(
            self,
            Task::Play {
                animation: animation.to_string(),
                timeout,
                on_complete: cb,
            },
        );
        scheduler::pump(self);
        true
    }

    /// Play `Gesture<Dir>` towards `(x, y)`, falling back to `Look<Dir>`.
    pub fn gesture_at(&mut self, x: f64, y: f64) -> Result<bool, OrchestratorError> {
        let direction = geometry::direction_to(self.position(), self.size(), Point::new(x, y))?;
        let gesture = format!("Gesture{direction}");
        let animation = if self.has_animation(&gesture) {
            gesture
        } else {
            format!("Look{direction}")
        };
        Ok(self.play(&animation))
    }

    /// Queue a move to `(x, y)` with the configured duration.
    pub fn move_to(&mut self, x: f64, y: f64) -> Result<(), OrchestratorError> {
        self.move_to_with(x, y, self.config.move_duration_ms)
    }

    /// Queue a move to `(x, y)` lasting `duration` ms; `0` snaps. The
    /// direction is taken from the current placement.
    pub fn move_to_with(&mut self, x: f64, y: f64, duration: Millis) -> Result<(), OrchestratorError> {
        let target = Point::new(x, y);
        let direction = geometry::direction_to(self.position(), self.size(), target)?;
        self.trace(format_args!("move {direction} to ({x}, {y})"));
        tasks::enqueue(
            self,
            Task::Move {
                target,
                direction,
                duration,
            },
        );
        scheduler::pump(self);
        Ok(())
    }

    /// Queue a speech bubble. With `hold` the task completes only after
    /// [`Assistant::stop_current`].
    pub fn speak(&mut self, text: &str, hold: bool) {
        tasks::enqueue(
            self,
            Task::Speak {
                text: text.to_string(),
                hold,
            },
        );
        scheduler::pump(self);
    }

    /// Queue a pause that lets an idle animation play; `None` or `Some(0)`
    /// uses the configured delay.
    pub fn delay(&mut self, time: Option<Millis>) {
        let time = time.filter(|&t| t > 0).unwrap_or(self.config.delay_ms);
        tasks::enqueue(self, Task::Delay { time });
        scheduler::pump(self);
    }

    /// Play a random non-idle animation. Returns `false` when there is none.
    pub fn animate(&mut self) -> bool {
        let names: Vec<String> = self
            .animation_names()
            .filter(|n| !self.config.is_idle(n))
            .map(str::to_string)
            .collect();
        if names.is_empty() {
            return false;
        }
        let pick = &names[self.rng.next_index(names.len())];
        self.play(pick)
    }

    /// Double-click reaction: `ClickedOn`, or a random animation.
    pub fn on_double_click(&mut self) -> bool {
        self.play("ClickedOn") || self.animate()
    }

    /// Drop pending tasks, wind down the current animation and close the
    /// bubble.
    pub fn stop(&mut self) {
        let dropped = self.queue.clear();
        self.trace(format_args!("stop: dropped {dropped} pending task(s)"));
        self.animator.exit_animation();
        self.message.hide(false);
        scheduler::pump(self);
    }

    /// Skip the current animation and release a held message.
    pub fn stop_current(&mut self) {
        self.animator.exit_animation();
        self.message.close();
        scheduler::pump(self);
    }

    pub fn close_message(&mut self) {
        self.message.hide(false);
        scheduler::pump(self);
    }

    /// Un-hide. `fast` appears at once and idles; otherwise the assistant is
    /// placed (when it has no position yet) and plays `Show`.
    pub fn show(&mut self, fast: bool) -> bool {
        self.trace(format_args!("show (fast: {fast})"));
        self.hidden = false;
        self.events.push(AssistantEvent::Visibility { visible: true });

        if fast {
            self.resume();
            idle::inject(self);
            scheduler::pump(self);
            return true;
        }

        if self.position.is_none() {
            if let Some(vp) = self.viewport {
                self.set_position(vp.width * 0.8, vp.height * 0.8);
            }
        }
        self.resume();
        self.play("Show")
    }

    pub fn hide(&mut self, fast: bool) {
        self.hide_inner(fast, None);
    }

    /// Hide and call `on_hidden` once the assistant is gone.
    pub fn hide_with(&mut self, fast: bool, on_hidden: impl FnOnce() + 'static) {
        self.hide_inner(fast, Some(Callback::new(on_hidden)));
    }

    fn hide_inner(&mut self, fast: bool, on_hidden: Option<Callback>) {
        self.trace(format_args!("hide (fast: {fast})"));
        self.hidden = true;
        self.stop();
        // The running task is superseded by the hide.
        if let Some(ticket) = self.active.as_ref().map(|t| t.ticket) {
            tasks::finish(self, ticket);
        }

        let fast = fast || {
            let missing = !self.has_animation("Hide");
            if missing {
                log::warn!("No Hide animation; hiding immediately");
            }
            missing
        };
        if fast {
            self.finish_hide(on_hidden);
        } else {
            self.on_hidden = on_hidden;
            idle::show_or_defer(self, "Hide", Listener::Hide);
        }
        scheduler::pump(self);
    }

    pub(crate) fn on_hide_state(&mut self, state: AnimatorState) {
        if state != AnimatorState::Exited || !self.hidden {
            return;
        }
        let callback = self.on_hidden.take();
        self.finish_hide(callback);
    }

    fn finish_hide(&mut self, callback: Option<Callback>) {
        self.events.push(AssistantEvent::Visibility { visible: false });
        self.pause();
        if let Some(callback) = callback {
            callback.call();
        }
    }

    /// Freeze the engine and the bubble.
    pub fn pause(&mut self) {
        self.animator.pause();
        self.message.pause();
    }

    pub fn resume(&mut self) {
        self.animator.resume();
        self.message.resume();
        scheduler::pump(self);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.animator.set_muted(muted);
    }

    pub fn is_muted(&self) -> bool {
        self.animator.is_muted()
    }

    /// Clamp the assistant inside the viewport, keeping the configured
    /// margin. No-op until both position and viewport are known.
    pub fn reposition(&mut self) {
        let (Some(position), Some(viewport)) = (self.position(), self.viewport) else {
            return;
        };
        let clamped =
            geometry::clamp_into(position, self.size(), viewport, self.config.reposition_margin);
        self.trace(format_args!(
            "reposition ({}, {}) -> ({}, {})",
            position.x, position.y, clamped.x, clamped.y
        ));
        self.set_position(clamped.x, clamped.y);
    }

    /* ---------------------------- dragging ---------------------------- */

    /// Pointer pressed at page coordinates `(px, py)`.
    pub fn begin_drag(&mut self, px: f64, py: f64) {
        self.trace(format_args!("drag start at ({px}, {py})"));
        self.pause();
        self.message.hide(true);
        let origin = self.position().unwrap_or_default();
        self.drag = Some(DragSession {
            offset: Point::new(px - origin.x, py - origin.y),
        });
        scheduler::pump(self);
    }

    pub fn drag_to(&mut self, px: f64, py: f64) {
        let Some(session) = self.drag else {
            return;
        };
        self.set_position(px - session.offset.x, py - session.offset.y);
    }

    pub fn end_drag(&mut self) {
        if self.drag.take().is_none() {
            return;
        }
        self.trace(format_args!("drag end"));
        self.message.show();
        self.reposition();
        self.resume();
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /* ---------------------------- time ---------------------------- */

    pub fn next_wake(&self) -> Option<Millis> {
        scheduler::next_wake(self)
    }

    pub fn advance_to(&mut self, t: Millis) {
        scheduler::advance_to(self, t);
    }

    pub fn advance(&mut self, dt: Millis) {
        self.advance_to(self.clock.saturating_add(dt));
    }

    /// Drain events produced since the last call.
    pub fn take_events(&mut self) -> Vec<AssistantEvent> {
        std::mem::take(&mut self.events)
    }
}
