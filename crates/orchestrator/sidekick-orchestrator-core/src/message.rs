//! Speech bubble with word-by-word reveal.
//!
//! The bubble reveals one more word every `word_speak_time_ms` and, unless
//! told to hold, reports [`MessageEvent::Completed`] once the last word is
//! out and closes itself `close_delay_ms` later.

use serde::{Deserialize, Serialize};

use sidekick_animation_core::{Millis, TimerId, TimerSet};

use crate::config::MessageConfig;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MessageEvent {
    Shown,
    /// Text revealed so far.
    Text { text: String },
    Hidden,
    /// The current speech finished (or was closed while held).
    Completed,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Wake {
    Word,
    Hide,
}

#[derive(Debug)]
pub struct Message {
    cfg: MessageConfig,
    clock: Millis,
    timers: TimerSet<Wake>,
    word_timer: Option<TimerId>,
    hide_timer: Option<TimerId>,

    words: Vec<String>,
    next_word: usize,
    revealing: bool,
    active: bool,
    hold: bool,
    hidden: bool,
    completion_pending: bool,
    text: String,

    events: Vec<MessageEvent>,
}

impl Message {
    pub fn new(cfg: MessageConfig) -> Self {
        Self {
            cfg,
            clock: 0,
            timers: TimerSet::new(),
            word_timer: None,
            hide_timer: None,
            words: Vec::new(),
            next_word: 1,
            revealing: false,
            active: false,
            hold: false,
            hidden: true,
            completion_pending: false,
            text: String::new(),
            events: Vec::new(),
        }
    }

    /// Start revealing `text`. With `hold` the bubble stays open after the
    /// last word and completion waits for [`Message::close`].
    pub fn speak(&mut self, text: &str, hold: bool) {
        log::info!("Speak {text}");
        self.hidden = false;
        self.show();

        self.cancel_word();
        self.cancel_hide();
        self.words = text.split(char::is_whitespace).map(str::to_string).collect();
        self.next_word = 1;
        self.text.clear();
        self.active = true;
        self.hold = hold;
        self.completion_pending = true;
        self.revealing = true;
        self.add_word();
    }

    /// Make the bubble visible again unless it was closed.
    pub fn show(&mut self) {
        if self.hidden {
            return;
        }
        self.events.push(MessageEvent::Shown);
    }

    /// `fast` hides the bubble at once without closing it, so a later
    /// [`Message::show`] brings it back. Otherwise the bubble closes after
    /// the close delay, unless it is still revealing words by then.
    pub fn hide(&mut self, fast: bool) {
        if fast {
            self.events.push(MessageEvent::Hidden);
            return;
        }
        self.schedule_hide();
    }

    /// Skip the hold: while revealing, finish normally after the last word;
    /// when already held open, report completion now.
    pub fn close(&mut self) {
        if self.active {
            self.hold = false;
        } else if self.hold {
            self.complete();
        }
    }

    pub fn pause(&mut self) {
        self.cancel_word();
        self.cancel_hide();
    }

    pub fn resume(&mut self) {
        if self.revealing {
            self.cancel_word();
            self.add_word();
        } else if !self.hold && !self.hidden {
            self.schedule_hide();
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_holding(&self) -> bool {
        self.hold
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Text revealed so far.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn now(&self) -> Millis {
        self.clock
    }

    pub fn next_wake(&self) -> Option<Millis> {
        self.timers.next_due()
    }

    /// Move the clock forward without firing anything.
    pub fn sync_clock(&mut self, t: Millis) {
        self.clock = self.clock.max(t);
    }

    /// Fire every wake due at or before `t`, then move the clock to `t`.
    pub fn advance_to(&mut self, t: Millis) {
        while let Some(at) = self.timers.next_due().filter(|&at| at <= t) {
            self.clock = self.clock.max(at);
            let Some((id, wake)) = self.timers.pop_due(at) else {
                break;
            };
            match wake {
                Wake::Word => {
                    if self.word_timer == Some(id) {
                        self.word_timer = None;
                    }
                    self.add_word();
                }
                Wake::Hide => {
                    if self.hide_timer == Some(id) {
                        self.hide_timer = None;
                    }
                    self.finish_hide();
                }
            }
        }
        self.clock = self.clock.max(t);
    }

    pub fn advance(&mut self, dt: Millis) {
        self.advance_to(self.clock.saturating_add(dt));
    }

    pub fn take_events(&mut self) -> Vec<MessageEvent> {
        std::mem::take(&mut self.events)
    }

    fn add_word(&mut self) {
        if !self.active {
            return;
        }
        if self.next_word > self.words.len() {
            self.revealing = false;
            self.active = false;
            if !self.hold {
                self.complete();
                self.hide(false);
            }
            return;
        }
        self.text = self.words[..self.next_word].join(" ");
        self.events.push(MessageEvent::Text {
            text: self.text.clone(),
        });
        self.next_word += 1;
        let at = self.clock + self.cfg.word_speak_time_ms;
        self.word_timer = Some(self.timers.schedule(at, Wake::Word));
    }

    fn complete(&mut self) {
        if std::mem::take(&mut self.completion_pending) {
            self.events.push(MessageEvent::Completed);
        }
    }

    fn schedule_hide(&mut self) {
        self.cancel_hide();
        let at = self.clock + self.cfg.close_delay_ms;
        self.hide_timer = Some(self.timers.schedule(at, Wake::Hide));
    }

    fn finish_hide(&mut self) {
        if self.active {
            return;
        }
        self.events.push(MessageEvent::Hidden);
        self.hidden = true;
    }

    fn cancel_word(&mut self) {
        if let Some(id) = self.word_timer.take() {
            self.timers.cancel(id);
        }
    }

    fn cancel_hide(&mut self) {
        if let Some(id) = self.hide_timer.take() {
            self.timers.cancel(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> Message {
        Message::new(MessageConfig::default())
    }

    fn texts(events: &[MessageEvent]) -> Vec<String> {
        events
            .iter()
            .filter_map(|e| match e {
                MessageEvent::Text { text } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn reveals_word_by_word_then_completes_and_closes() {
        let mut m = message();
        m.speak("Hello there friend", false);
        let events = m.take_events();
        assert_eq!(events[0], MessageEvent::Shown);
        assert_eq!(texts(&events), ["Hello"]);

        m.advance_to(400);
        assert_eq!(texts(&m.take_events()), ["Hello there", "Hello there friend"]);
        assert!(m.is_active());

        m.advance_to(600);
        assert_eq!(m.take_events(), [MessageEvent::Completed]);
        assert!(!m.is_active());
        assert_eq!(m.next_wake(), Some(2_600));

        m.advance_to(2_600);
        assert_eq!(m.take_events(), [MessageEvent::Hidden]);
        assert!(m.is_hidden());
    }

    #[test]
    fn hold_defers_completion_until_close() {
        let mut m = message();
        m.speak("Wait", true);
        m.advance_to(1_000);
        let events = m.take_events();
        assert!(!events.contains(&MessageEvent::Completed));
        assert!(m.is_holding());
        assert_eq!(m.next_wake(), None);

        m.close();
        assert_eq!(m.take_events(), [MessageEvent::Completed]);
        m.close();
        assert!(m.take_events().is_empty());
    }

    #[test]
    fn close_while_revealing_drops_hold() {
        let mut m = message();
        m.speak("one two", true);
        m.close();
        assert!(!m.is_holding());
        m.advance_to(400);
        assert!(m.take_events().contains(&MessageEvent::Completed));
    }

    #[test]
    fn delayed_hide_waits_for_reveal() {
        let mut m = message();
        m.speak("a b c d e f g h i j k l m n", false);
        m.hide(false);
        m.advance_to(2_000);
        let events = m.take_events();
        assert!(!events.contains(&MessageEvent::Hidden));
        assert!(!m.is_hidden());
    }

    #[test]
    fn fast_hide_keeps_bubble_showable() {
        let mut m = message();
        m.speak("hi", false);
        m.take_events();
        m.hide(true);
        assert_eq!(m.take_events(), [MessageEvent::Hidden]);
        assert!(!m.is_hidden());
        m.show();
        assert_eq!(m.take_events(), [MessageEvent::Shown]);
    }

    #[test]
    fn show_does_nothing_while_closed() {
        let mut m = message();
        m.show();
        assert!(m.take_events().is_empty());
    }

    #[test]
    fn pause_and_resume_continue_the_reveal() {
        let mut m = message();
        m.speak("one two three", false);
        m.take_events();
        m.pause();
        m.advance_to(10_000);
        assert!(m.take_events().is_empty());

        m.resume();
        assert_eq!(texts(&m.take_events()), ["one two"]);
        assert_eq!(m.next_wake(), Some(10_200));
    }

    #[test]
    fn resume_rearms_close_after_reveal() {
        let mut m = message();
        m.speak("done", false);
        m.advance_to(200);
        m.pause();
        m.advance_to(5_000);
        assert!(!m.is_hidden());
        m.resume();
        assert_eq!(m.next_wake(), Some(7_000));
    }

    #[test]
    fn splits_on_single_whitespace() {
        let mut m = message();
        m.speak("a  b", false);
        m.advance_to(600);
        assert_eq!(texts(&m.take_events()), ["a", "a ", "a  b"]);
    }
}
