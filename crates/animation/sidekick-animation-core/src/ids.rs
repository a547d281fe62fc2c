//! Identifiers and simple allocators for scheduled wakes and queued tasks.

use serde::{Deserialize, Serialize};

/// Handle of a pending wake inside a [`crate::timer::TimerSet`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct TimerId(pub u64);

/// Completion handle of a queued task. Only the ticket of the active task
/// can advance a queue.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Ticket(pub u64);

/// Monotonic allocator for TimerId and Ticket.
/// IDs are opaque externally; ordering of TimerId doubles as FIFO order for
/// wakes that share a due time.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_timer: u64,
    next_ticket: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_timer(&mut self) -> TimerId {
        let id = TimerId(self.next_timer);
        self.next_timer = self.next_timer.wrapping_add(1);
        id
    }

    #[inline]
    pub fn alloc_ticket(&mut self) -> Ticket {
        let id = Ticket(self.next_ticket);
        self.next_ticket = self.next_ticket.wrapping_add(1);
        id
    }
}
