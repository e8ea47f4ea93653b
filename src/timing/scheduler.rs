use std::collections::BTreeMap;

use crate::foundation::core::Millis;

/// Handle for a scheduled wake-up. Stable across the lifetime of the entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId {
    due: Millis,
    seq: u64,
}

impl TimerId {
    /// Clock instant this entry is due.
    pub fn due(self) -> Millis {
        self.due
    }
}

/// Which suspension primitive produced a wake-up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WakeKind {
    /// Fixed-delay timer.
    Timer,
    /// Next animation-frame boundary.
    Frame,
}

/// One wake-up returned by [`Scheduler::pop_due`].
#[derive(Debug)]
pub struct Fired<T> {
    /// Handle the entry was scheduled under.
    pub id: TimerId,
    /// Clock instant it fired at (equals `id.due()`).
    pub at: Millis,
    /// Primitive that produced it.
    pub kind: WakeKind,
    /// Payload.
    pub task: T,
}

#[derive(Debug)]
struct Entry<T> {
    kind: WakeKind,
    task: T,
}

/// Deterministic virtual-time queue of timers and frame callbacks.
///
/// Determinism rule: entries fire in `(due, sequence)` order, so two entries due at the same
/// instant fire in the order they were scheduled. An entry scheduled with zero delay from inside a
/// callback fires within the same [`Scheduler::pop_due`] drain.
#[derive(Debug)]
pub struct Scheduler<T> {
    now: Millis,
    frame_interval_ms: u64,
    next_seq: u64,
    queue: BTreeMap<TimerId, Entry<T>>,
}

impl<T> Scheduler<T> {
    /// Create an empty queue at `Millis(0)`; `frame_interval_ms` of zero is treated as one.
    pub fn new(frame_interval_ms: u64) -> Self {
        Self {
            now: Millis(0),
            frame_interval_ms: frame_interval_ms.max(1),
            next_seq: 0,
            queue: BTreeMap::new(),
        }
    }

    /// Current clock value.
    pub fn now(&self) -> Millis {
        self.now
    }

    /// Length of one animation frame.
    pub fn frame_interval_ms(&self) -> u64 {
        self.frame_interval_ms
    }

    /// Number of live entries.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Instant of the earliest live entry.
    pub fn next_due(&self) -> Option<Millis> {
        self.queue.keys().next().map(|id| id.due)
    }

    /// Schedule `task` to fire `delay_ms` from now.
    pub fn schedule(&mut self, delay_ms: u64, task: T) -> TimerId {
        self.insert(self.now.after(delay_ms), WakeKind::Timer, task)
    }

    /// Schedule `task` for the next frame boundary strictly after now.
    pub fn request_frame(&mut self, task: T) -> TimerId {
        let interval = self.frame_interval_ms;
        let boundary = (self.now.0 / interval).saturating_add(1).saturating_mul(interval);
        self.insert(Millis(boundary), WakeKind::Frame, task)
    }

    fn insert(&mut self, due: Millis, kind: WakeKind, task: T) -> TimerId {
        let id = TimerId {
            due,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.queue.insert(id, Entry { kind, task });
        id
    }

    /// Cancel one entry. Returns `false` when it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.queue.remove(&id).is_some()
    }

    /// Cancel every entry whose payload matches `pred`; returns how many were removed.
    pub fn cancel_where(&mut self, mut pred: impl FnMut(&T) -> bool) -> usize {
        let before = self.queue.len();
        self.queue.retain(|_, e| !pred(&e.task));
        before - self.queue.len()
    }

    /// Drop every entry.
    pub fn clear(&mut self) -> usize {
        let n = self.queue.len();
        self.queue.clear();
        n
    }

    /// Remove and return the earliest entry due at or before `until`, moving the clock to its
    /// due instant.
    pub fn pop_due(&mut self, until: Millis) -> Option<Fired<T>> {
        let (&id, _) = self.queue.first_key_value()?;
        if id.due > until {
            return None;
        }
        let entry = self.queue.remove(&id)?;
        if id.due > self.now {
            self.now = id.due;
        }
        Some(Fired {
            id,
            at: self.now,
            kind: entry.kind,
            task: entry.task,
        })
    }

    /// Move the clock forward to `until`. The clock never moves backwards.
    pub fn advance_to(&mut self, until: Millis) {
        if until > self.now {
            self.now = until;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timing/scheduler.rs"]
mod tests;
