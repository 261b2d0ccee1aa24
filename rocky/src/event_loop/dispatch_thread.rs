use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use crate::config::PullStrategy;
use crate::event_loop::supervisor::Supervisor;
use crate::queue::EventQueue;

/// What the dispatch thread needs: the queue, the termination flag and somewhere to send
/// events.
#[derive(Clone, Debug)]
pub(super) struct Dispatcher {
    pub(super) queue: Arc<EventQueue>,
    pub(super) should_quit: Arc<AtomicBool>,
    pub(super) supervisor: Arc<Supervisor>,
    pub(super) pull: PullStrategy,
}

impl Dispatcher {
    pub(super) fn should_quit(&self) -> bool {
        self.should_quit.load(Ordering::SeqCst)
    }

    /// One loop iteration: pull once and dispatch the event unless it is the sentinel.
    /// Returns whether an event was dispatched.
    pub(super) fn step(&self) -> bool {
        if self.should_quit() {
            return false;
        }

        let stop = || self.should_quit();
        let event = match self.pull {
            PullStrategy::Polling => self.queue.try_pull_unless(stop),
            PullStrategy::Blocking { timeout_ms } => self.queue.pull_timeout(Duration::from_millis(timeout_ms), stop),
        };

        if !event.is_event() {
            return false;
        }

        log!(VERBOSE, "Dispatching {:?} event", event.kind());
        self.supervisor.dispatch(event);
        true
    }
}

pub(super) fn event_loop_dispatch_thread(dispatcher: Dispatcher) {
    log!(INFO, "Event loop started");

    while !dispatcher.should_quit() {
        if !dispatcher.step() {
            if let PullStrategy::Polling = dispatcher.pull {
                thread::yield_now();
            }
        }
    }

    log!(INFO, "Event loop stopped");
}
