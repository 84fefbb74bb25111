use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use log::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(u64);

/// Tie-break between tasks due at the same instant. Lower runs first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TaskPriority {
    Callback,
    Tick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct QueueKey {
    due: Duration,
    priority: TaskPriority,
    handle: TaskHandle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueTask<T> {
    pub handle: TaskHandle,
    pub due: Duration,
    pub payload: T,
}

/// Single-threaded deferred task queue running on a virtual clock.
///
/// Nothing fires on its own: the owner advances the clock with [`pop_due`]
/// and [`advance_to`]. Tasks come out ordered by due time, then priority, then
/// the order they were scheduled in.
///
/// [`pop_due`]: Scheduler::pop_due
/// [`advance_to`]: Scheduler::advance_to
#[derive(Debug)]
pub struct Scheduler<T> {
    now: Duration,
    next_handle: u64,
    queue: BTreeMap<QueueKey, T>,
    keys: HashMap<TaskHandle, QueueKey>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_handle: 0,
            queue: BTreeMap::new(),
            keys: HashMap::new(),
        }
    }
}

impl<T: std::fmt::Debug> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.keys.contains_key(&handle)
    }

    pub fn schedule(&mut self, delay: Duration, priority: TaskPriority, payload: T) -> TaskHandle {
        let handle = TaskHandle(self.next_handle);
        self.next_handle += 1;
        let key = QueueKey {
            due: self.now + delay,
            priority,
            handle,
        };
        trace!(target: "scheduler", "Scheduling {:?} at {:?} as {:?}", payload, key.due, handle);
        self.queue.insert(key, payload);
        self.keys.insert(handle, key);
        handle
    }

    /// Returns true if the task was still waiting to run.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        match self.keys.remove(&handle) {
            Some(key) => {
                trace!(target: "scheduler", "Cancelled {:?}", handle);
                self.queue.remove(&key).is_some()
            }
            None => false,
        }
    }

    pub fn cancel_all(&mut self) -> usize {
        let cancelled = self.queue.len();
        if cancelled > 0 {
            trace!(target: "scheduler", "Cancelled {} pending tasks", cancelled);
        }
        self.queue.clear();
        self.keys.clear();
        cancelled
    }

    /// Removes the next task due at or before `until`, moving the clock to its due time.
    pub fn pop_due(&mut self, until: Duration) -> Option<DueTask<T>> {
        let key = *self.queue.keys().next()?;
        if key.due > until {
            return None;
        }
        let payload = self.queue.remove(&key)?;
        self.keys.remove(&key.handle);
        self.now = self.now.max(key.due);
        Some(DueTask {
            handle: key.handle,
            due: key.due,
            payload,
        })
    }

    pub fn advance_to(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }
}
