//! Simulated clock with cancellable deadlines.
//!
//! The orchestrator never sleeps. Time moves only when `advance` is called,
//! and deadlines that come due are handed back to the caller in due order.
//!
//! Every task is stamped with the timeline's generation. `cancel_all` clears
//! the queue and bumps the generation, so a task scheduled before the cancel
//! can never fire afterwards, even if a caller kept a handle to it.

use std::collections::BTreeMap;

use crate::core::Phase;

/// Handle to a scheduled task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TaskHandle {
    seq: u64,
    generation: u64,
}

/// What a task does when it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskKind {
    /// The timed phase `phase` of wave `wave` has run out.
    PhaseDeadline { phase: Phase, wave: u32 },
}

#[derive(Clone, Debug, Default)]
pub struct Timeline {
    now_ms: u64,
    generation: u64,
    next_seq: u64,
    queue: BTreeMap<(u64, u64), (u64, TaskKind)>,
}

impl Timeline {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulated milliseconds since the timeline was created.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Schedule `kind` to fire `delay_ms` from now.
    pub fn schedule_in(&mut self, delay_ms: u64, kind: TaskKind) -> TaskHandle {
        let seq = self.next_seq;
        self.next_seq += 1;
        let due = self.now_ms.saturating_add(delay_ms);
        self.queue.insert((due, seq), (self.generation, kind));
        TaskHandle {
            seq,
            generation: self.generation,
        }
    }

    /// Drop every pending task and invalidate all outstanding handles.
    pub fn cancel_all(&mut self) {
        self.queue.clear();
        self.generation += 1;
    }

    /// Milliseconds until `handle` fires, or `None` if it is no longer live.
    #[must_use]
    pub fn remaining(&self, handle: TaskHandle) -> Option<u64> {
        if handle.generation != self.generation {
            return None;
        }
        self.queue
            .iter()
            .find(|(key, _)| key.1 == handle.seq)
            .map(|(&(due, _), _)| due.saturating_sub(self.now_ms))
    }

    /// Move the clock forward and pop every task due at or before the new time.
    pub fn advance(&mut self, ms: u64) -> Vec<TaskKind> {
        self.now_ms = self.now_ms.saturating_add(ms);

        let mut due = Vec::new();
        while let Some(entry) = self.queue.first_entry() {
            if entry.key().0 > self.now_ms {
                break;
            }
            let (generation, kind) = entry.remove();
            if generation == self.generation {
                due.push(kind);
            }
        }
        due
    }
}
