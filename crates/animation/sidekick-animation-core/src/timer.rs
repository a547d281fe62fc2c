//! Virtual millisecond clock primitives.
//!
//! Nothing in the workspace reads a wall clock. Hosts advance time explicitly
//! and every suspension point (frame ticks, word reveals, deadlines) is a wake
//! stored in a [`TimerSet`] or, for the engine's single tick loop, an
//! `Option<Millis>` handle.

use std::collections::BTreeMap;

use hashbrown::HashMap;

use crate::ids::{IdAllocator, TimerId};

/// Milliseconds on the virtual clock.
pub type Millis = u64;

/// Cancellable delayed wakes carrying a payload `E`.
///
/// Wakes are ordered by due time; wakes that share a due time fire in the
/// order they were scheduled.
#[derive(Debug)]
pub struct TimerSet<E> {
    ids: IdAllocator,
    queue: BTreeMap<(Millis, TimerId), E>,
    due_of: HashMap<TimerId, Millis>,
}

impl<E> Default for TimerSet<E> {
    fn default() -> Self {
        Self {
            ids: IdAllocator::new(),
            queue: BTreeMap::new(),
            due_of: HashMap::new(),
        }
    }
}

impl<E> TimerSet<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `event` to fire at absolute time `at`.
    pub fn schedule(&mut self, at: Millis, event: E) -> TimerId {
        let id = self.ids.alloc_timer();
        self.queue.insert((at, id), event);
        self.due_of.insert(id, at);
        id
    }

    /// Cancel a pending wake. Returns its payload if it had not fired yet.
    pub fn cancel(&mut self, id: TimerId) -> Option<E> {
        let at = self.due_of.remove(&id)?;
        self.queue.remove(&(at, id))
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.due_of.contains_key(&id)
    }

    /// Due time of the earliest pending wake.
    pub fn next_due(&self) -> Option<Millis> {
        self.queue.keys().next().map(|(at, _)| *at)
    }

    /// Remove and return the earliest wake due at or before `now`.
    pub fn pop_due(&mut self, now: Millis) -> Option<(TimerId, E)> {
        let (&(at, id), _) = self.queue.iter().next()?;
        if at > now {
            return None;
        }
        self.due_of.remove(&id);
        self.queue.remove(&(at, id)).map(|event| (id, event))
    }

    pub fn clear(&mut self) {
        self.queue.clear();
        self.due_of.clear();
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_due_order_then_fifo() {
        let mut timers = TimerSet::new();
        timers.schedule(30, "late");
        timers.schedule(10, "first");
        timers.schedule(10, "second");

        assert_eq!(timers.next_due(), Some(10));
        assert_eq!(timers.pop_due(5), None);
        assert_eq!(timers.pop_due(10).map(|(_, e)| e), Some("first"));
        assert_eq!(timers.pop_due(10).map(|(_, e)| e), Some("second"));
        assert_eq!(timers.pop_due(10), None);
        assert_eq!(timers.pop_due(100).map(|(_, e)| e), Some("late"));
        assert!(timers.is_empty());
    }

    #[test]
    fn cancel_removes_pending_wake_once() {
        let mut timers = TimerSet::new();
        let id = timers.schedule(10, 1u8);
        assert!(timers.is_pending(id));
        assert_eq!(timers.cancel(id), Some(1));
        assert_eq!(timers.cancel(id), None);
        assert!(!timers.is_pending(id));
        assert_eq!(timers.next_due(), None);
    }
}
