//! Cooperative single-threaded timeline
//!
//! Timer ticks, spawn ticks and per-cell expiries all live on one virtual
//! millisecond clock. Every task is stamped with the epoch of the session
//! that armed it; tasks from any other epoch are dropped on dispatch.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// Work the engine can schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// One second of session time elapsed
    TimerTick,
    /// Try to activate a cell, then reschedule
    SpawnTick,
    /// Revert `cell` if it still holds activation `generation`
    Expire { cell: usize, generation: u64 },
}

/// Proof that a session is live. Owned by the phase controller; dropping it
/// (on stop) orphans every task armed under its epoch.
#[derive(Debug, PartialEq, Eq)]
pub struct SessionHandle {
    epoch: u64,
}

impl SessionHandle {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// A task waiting on the timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scheduled {
    pub due_ms: u64,
    pub epoch: u64,
    pub task: Task,
    seq: u64,
}

impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.due_ms, self.seq).cmp(&(other.due_ms, other.seq))
    }
}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Virtual clock plus pending tasks, ordered by (due time, insertion order)
#[derive(Debug, Default)]
pub struct Scheduler {
    now_ms: u64,
    next_seq: u64,
    next_epoch: u64,
    queue: BinaryHeap<Reverse<Scheduled>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Open a new epoch. Anything still queued from before is discarded.
    pub fn open_session(&mut self) -> SessionHandle {
        self.queue.clear();
        self.next_epoch += 1;
        SessionHandle {
            epoch: self.next_epoch,
        }
    }

    /// Cancel everything. Safe to call repeatedly.
    pub fn cancel_all(&mut self) {
        self.queue.clear();
    }

    /// Arm `task` to run `delay_ms` from now under `handle`'s epoch
    pub fn schedule(&mut self, handle: &SessionHandle, delay_ms: u64, task: Task) {
        let scheduled = Scheduled {
            due_ms: self.now_ms.saturating_add(delay_ms),
            epoch: handle.epoch,
            task,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.queue.push(Reverse(scheduled));
    }

    /// Pop the earliest task due at or before `until_ms`, moving the clock
    /// to its due time
    pub fn pop_due(&mut self, until_ms: u64) -> Option<Scheduled> {
        let Reverse(next) = self.queue.peek()?;
        if next.due_ms > until_ms {
            return None;
        }
        let Reverse(next) = self.queue.pop()?;
        self.now_ms = self.now_ms.max(next.due_ms);
        Some(next)
    }

    /// Move the clock forward (never backward)
    pub fn advance_clock(&mut self, to_ms: u64) {
        self.now_ms = self.now_ms.max(to_ms);
    }
}
