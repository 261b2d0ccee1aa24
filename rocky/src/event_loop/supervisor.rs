use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use crate::event::{Event, EventError, EventKind};

pub type FailureHook = Arc<dyn Fn(&DispatchFailure) + Send + Sync>;

/// A dispatched event whose handling did not complete.
#[derive(Debug)]
pub struct DispatchFailure {
    pub id: u64,
    pub kind: EventKind,
    pub error: EventError,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct DispatchStats {
    pub dispatched: u64,
    pub completed: u64,
    pub failed: u64,
    pub in_flight: u64,
}

/// Runs every dispatched event on a thread of its own and keeps count of them.
///
/// Handler failures (panics, missing receivers, spawn errors) stop here: they are logged,
/// counted and passed to the failure hook.
pub struct Supervisor {
    stats: Mutex<DispatchStats>,
    idle: Condvar,
    on_failure: Option<FailureHook>,
}

impl Supervisor {
    pub fn new(on_failure: Option<FailureHook>) -> Self {
        Self {
            stats: Mutex::new(DispatchStats::default()),
            idle: Condvar::new(),
            on_failure,
        }
    }

    fn lock(&self) -> MutexGuard<DispatchStats> {
        self.stats.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Starts processing `event` and returns without waiting for it.
    pub fn dispatch(self: &Arc<Self>, event: Box<dyn Event>) {
        let kind = event.kind();

        let id = {
            let mut guard = self.lock();
            guard.dispatched += 1;
            guard.in_flight += 1;
            guard.dispatched
        };

        let spawned = thread::Builder::new()
            .name(format!("rocky handler #{}", id))
            .spawn({
                let supervisor = self.clone();
                move || {
                    let result = match panic::catch_unwind(AssertUnwindSafe(move || event.process())) {
                        Ok(result) => result,
                        Err(payload) => Err(EventError::HandlerPanicked(panic_message(payload))),
                    };
                    supervisor.finish(id, kind, result);
                }
            });

        if let Err(error) = spawned {
            self.finish(id, kind, Err(EventError::Spawn(error)));
        }
    }

    fn finish(&self, id: u64, kind: EventKind, result: Result<(), EventError>) {
        {
            let mut guard = self.lock();
            guard.in_flight -= 1;
            match result {
                Ok(()) => guard.completed += 1,
                Err(_) => guard.failed += 1,
            }
            self.idle.notify_all();
        }

        if let Err(error) = result {
            log!(ERROR, "Handling {:?} event #{} failed: {}", kind, id, error);

            if let Some(ref on_failure) = self.on_failure {
                on_failure(&DispatchFailure {
                    id,
                    kind,
                    error,
                });
            }
        }
    }

    pub fn stats(&self) -> DispatchStats {
        *self.lock()
    }

    /// Blocks until no handler is running or `timeout` elapses. Returns whether the
    /// supervisor went idle.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let guard = self.lock();

        let (guard, _) = self.idle
            .wait_timeout_while(guard, timeout, |stats| stats.in_flight > 0)
            .unwrap_or_else(PoisonError::into_inner);

        guard.in_flight == 0
    }
}

impl fmt::Debug for Supervisor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Supervisor")
            .field("stats", &self.stats())
            .field("on_failure", &self.on_failure.is_some())
            .finish()
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
