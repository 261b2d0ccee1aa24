use std::collections::VecDeque;
use std::fmt;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::event::{BasicEvent, Event};

/// Unbounded FIFO of pending events, shared between any number of producers and the
/// dispatch loop.
///
/// Pulling never fails: an empty queue hands out the `NotAnEvent` sentinel.
pub struct EventQueue {
    events: Mutex<VecDeque<Box<dyn Event>>>,
    available: Condvar,
}

impl EventQueue {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(VecDeque::new()),
            available: Condvar::new(),
        }
    }

    // A poisoned queue is still a valid queue.
    fn lock(&self) -> MutexGuard<VecDeque<Box<dyn Event>>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn push(&self, event: Box<dyn Event>) {
        self.lock().push_back(event);
        self.available.notify_one();
    }

    pub fn pull(&self) -> Box<dyn Event> {
        self.lock().pop_front().unwrap_or_else(empty)
    }

    /// Like `pull`, but hands out the sentinel without touching the queue once `stop`
    /// returns true. `stop` is checked under the queue lock.
    pub fn try_pull_unless<F>(&self, stop: F) -> Box<dyn Event>
    where
        F: Fn() -> bool,
    {
        let mut guard = self.lock();

        if stop() {
            return empty();
        }

        guard.pop_front().unwrap_or_else(empty)
    }

    /// Waits up to `timeout` for an event. Returns the sentinel if the wait times out or
    /// `stop` becomes true; in the latter case nothing is removed from the queue.
    ///
    /// Whoever makes `stop` true must call `wake` afterwards.
    pub fn pull_timeout<F>(&self, timeout: Duration, stop: F) -> Box<dyn Event>
    where
        F: Fn() -> bool,
    {
        let guard = self.lock();

        let (mut guard, _) = self.available
            .wait_timeout_while(guard, timeout, |events| events.is_empty() && !stop())
            .unwrap_or_else(PoisonError::into_inner);

        if stop() {
            return empty();
        }

        guard.pop_front().unwrap_or_else(empty)
    }

    /// Wakes every waiting consumer so it re-checks its stop condition.
    pub fn wake(&self) {
        let _guard = self.lock();
        self.available.notify_all();
    }

    /// Drops all pending events and returns how many there were.
    pub fn clear(&self) -> usize {
        let mut guard = self.lock();
        let count = guard.len();
        guard.clear();
        count
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventQueue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("EventQueue")
            .field("len", &self.len())
            .finish()
    }
}

fn empty() -> Box<dyn Event> {
    Box::new(BasicEvent::empty())
}
