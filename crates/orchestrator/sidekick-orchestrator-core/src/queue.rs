//! Sequential task queue.
//!
//! Tasks run one at a time in FIFO order. The queue does not execute
//! anything itself: it hands a task back to the caller together with the
//! [`Ticket`] that must be presented to [`TaskQueue::complete`] when the task
//! is done.

use std::collections::VecDeque;

use sidekick_animation_core::{IdAllocator, Ticket};

/// What happens after the active task completes.
#[derive(Debug, PartialEq)]
pub enum Advance<T> {
    /// Start this task now; it is the new active task.
    Start(Ticket, T),
    /// Nothing is left. Reported once per drain.
    Drained,
}

#[derive(Debug)]
pub struct TaskQueue<T> {
    pending: VecDeque<T>,
    active: Option<Ticket>,
    ids: IdAllocator,
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        Self {
            pending: VecDeque::new(),
            active: None,
            ids: IdAllocator::new(),
        }
    }
}

impl<T> TaskQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `task`. When the queue is idle the task becomes active at once
    /// and is returned with its ticket for the caller to run.
    pub fn enqueue(&mut self, task: T) -> Option<(Ticket, T)> {
        self.pending.push_back(task);
        if self.pending.len() == 1 && self.active.is_none() {
            return self.start_next();
        }
        None
    }

    /// Drop every pending task and return how many were dropped. The active
    /// task keeps running.
    pub fn clear(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }

    /// Complete the active task. Tickets other than the active one are
    /// ignored, so a task can never advance the queue twice.
    pub fn complete(&mut self, ticket: Ticket) -> Option<Advance<T>> {
        if self.active != Some(ticket) {
            return None;
        }
        self.active = None;
        Some(match self.start_next() {
            Some((ticket, task)) => Advance::Start(ticket, task),
            None => Advance::Drained,
        })
    }

    fn start_next(&mut self) -> Option<(Ticket, T)> {
        let task = self.pending.pop_front()?;
        let ticket = self.ids.alloc_ticket();
        self.active = Some(ticket);
        Some((ticket, task))
    }

    pub fn active_ticket(&self) -> Option<Ticket> {
        self.active
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Number of pending (not yet started) tasks.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_task_starts_immediately() {
        let mut q = TaskQueue::new();
        let (ticket, task) = q.enqueue("a").expect("idle queue starts the task");
        assert_eq!(task, "a");
        assert!(q.is_active());
        assert_eq!(q.active_ticket(), Some(ticket));
        assert!(q.is_empty());
    }

    #[test]
    fn second_task_waits_for_first() {
        let mut q = TaskQueue::new();
        let (first, _) = q.enqueue(1).unwrap();
        assert!(q.enqueue(2).is_none());
        assert!(q.enqueue(3).is_none());
        assert_eq!(q.len(), 2);

        let Some(Advance::Start(second, 2)) = q.complete(first) else {
            panic!("second task should start");
        };
        let Some(Advance::Start(third, 3)) = q.complete(second) else {
            panic!("third task should start");
        };
        assert_eq!(q.complete(third), Some(Advance::Drained));
        assert!(!q.is_active());
    }

    #[test]
    fn stale_ticket_is_ignored() {
        let mut q = TaskQueue::new();
        let (first, _) = q.enqueue("a").unwrap();
        q.enqueue("b");
        let Some(Advance::Start(second, _)) = q.complete(first) else {
            panic!("b should start");
        };
        assert_eq!(q.complete(first), None);
        assert_eq!(q.active_ticket(), Some(second));
    }

    #[test]
    fn drained_reported_once() {
        let mut q = TaskQueue::new();
        let (t, _) = q.enqueue(()).unwrap();
        assert_eq!(q.complete(t), Some(Advance::Drained));
        assert_eq!(q.complete(t), None);
    }

    #[test]
    fn clear_keeps_active_task() {
        let mut q = TaskQueue::new();
        let (active, _) = q.enqueue('a').unwrap();
        q.enqueue('b');
        q.enqueue('c');
        assert_eq!(q.clear(), 2);
        assert!(q.is_active());
        assert_eq!(q.complete(active), Some(Advance::Drained));
    }

    #[test]
    fn enqueue_after_drain_starts_again() {
        let mut q = TaskQueue::new();
        let (t, _) = q.enqueue(1).unwrap();
        assert_eq!(q.complete(t), Some(Advance::Drained));
        let (t2, task) = q.enqueue(2).expect("re-entrant enqueue starts");
        assert_eq!(task, 2);
        assert_ne!(t, t2);
    }
}
