use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use crate::config::{LoopConfig, ShutdownPolicy};
use crate::event::{Event, EventError, EventReceiver};
use crate::queue::EventQueue;
use crate::util::InnerThread;

use self::dispatch_thread::{Dispatcher, event_loop_dispatch_thread};

pub use self::supervisor::{DispatchFailure, DispatchStats, FailureHook, Supervisor};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LoopState {
    Idle,
    Running,
    Stopped,
}

/// Requests termination of an event loop. Cloneable and usable from any thread.
///
/// It is also a receiver: any event delivered to it requests termination, so a producer
/// can route a quit key straight to it.
#[derive(Clone, Debug)]
pub struct QuitHandle {
    should_quit: Arc<AtomicBool>,
    queue: Arc<EventQueue>,
}

impl QuitHandle {
    /// Idempotent. Returns `true` only for the call that actually requested termination.
    pub fn request(&self) -> bool {
        let first = !self.should_quit.swap(true, Ordering::SeqCst);
        if first {
            log!(INFO, "Event loop termination requested");
        }
        // The dispatch thread may be asleep on the queue.
        self.queue.wake();
        first
    }

    pub fn is_requested(&self) -> bool {
        self.should_quit.load(Ordering::SeqCst)
    }
}

impl EventReceiver for QuitHandle {
    fn process_event(&self, event: Box<dyn Event>) {
        log!(VERBOSE, "Quit requested by {:?} event", event.kind());
        self.request();
    }
}

/// Drains an `EventQueue` on a dedicated thread and hands every event to its receiver on
/// a thread of its own.
#[derive(Debug)]
pub struct EventLoop {
    dispatcher: Dispatcher,
    quit: QuitHandle,
    thread_name: String,
    shutdown_policy: ShutdownPolicy,

    dispatch_thread: InnerThread,
    state: Mutex<LoopState>,
}

impl EventLoop {
    pub fn new(config: LoopConfig) -> Self {
        let queue = Arc::new(EventQueue::new());
        let should_quit = Arc::new(AtomicBool::new(false));

        Self {
            dispatcher: Dispatcher {
                queue: queue.clone(),
                should_quit: should_quit.clone(),
                supervisor: Arc::new(Supervisor::new(config.on_failure)),
                pull: config.pull,
            },
            quit: QuitHandle {
                should_quit,
                queue,
            },
            thread_name: config.thread_name,
            shutdown_policy: config.shutdown,
            dispatch_thread: InnerThread::default(),
            state: Mutex::new(LoopState::Idle),
        }
    }

    fn lock_state(&self) -> MutexGuard<LoopState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn queue(&self) -> Arc<EventQueue> {
        self.dispatcher.queue.clone()
    }

    pub fn push(&self, event: Box<dyn Event>) {
        self.dispatcher.queue.push(event);
    }

    /// Starts the dispatch thread. A loop runs at most once: it cannot be started twice
    /// nor restarted after termination.
    pub fn exec(&self) -> Result<(), EventError> {
        let mut state = self.lock_state();

        match *state {
            LoopState::Running => return Err(EventError::AlreadyStarted),
            LoopState::Stopped => return Err(EventError::Terminated),
            LoopState::Idle => (),
        }

        if self.should_quit() {
            *state = LoopState::Stopped;
            return Err(EventError::Terminated);
        }

        let join_handle = thread::Builder::new()
            .name(self.thread_name.clone())
            .spawn({
                let dispatcher = self.dispatcher.clone();
                move || event_loop_dispatch_thread(dispatcher)
            })?;

        self.dispatch_thread.set(join_handle);
        *state = LoopState::Running;

        Ok(())
    }

    /// Runs a single iteration on the calling thread, for embedders that drive the loop
    /// themselves instead of calling `exec`. Returns whether an event was dispatched;
    /// always `false` while the dispatch thread is running or after termination.
    pub fn step(&self) -> bool {
        // Held for the whole iteration so `exec` cannot start a second consumer meanwhile.
        let state = self.lock_state();
        if *state == LoopState::Running {
            return false;
        }

        self.dispatcher.step()
    }

    pub fn terminate(&self) {
        self.quit.request();
    }

    pub fn should_quit(&self) -> bool {
        self.quit.is_requested()
    }

    pub fn quit_handle(&self) -> QuitHandle {
        self.quit.clone()
    }

    pub fn state(&self) -> LoopState {
        *self.lock_state()
    }

    pub fn stats(&self) -> DispatchStats {
        self.dispatcher.supervisor.stats()
    }

    /// Blocks until no handler is running or `timeout` elapses.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        self.dispatcher.supervisor.wait_idle(timeout)
    }

    /// Terminates the loop, joins the dispatch thread and applies the shutdown policy to
    /// handlers still in flight. Events that were never pulled are dropped.
    pub fn shutdown(&self) {
        self.terminate();

        let mut state = self.lock_state();
        if *state == LoopState::Stopped {
            return;
        }

        if *state == LoopState::Running && !self.dispatch_thread.join() {
            log!(ERROR, "Event loop dispatch thread panicked");
        }

        match self.shutdown_policy {
            ShutdownPolicy::Graceful { timeout_ms } => {
                if !self.wait_idle(Duration::from_millis(timeout_ms)) {
                    log!(
                        ERROR,
                        "{} event handler(s) still running after {}ms, detaching them",
                        self.stats().in_flight,
                        timeout_ms,
                    );
                }
            },
            ShutdownPolicy::Detach => (),
        }

        let dropped = self.dispatcher.queue.clear();
        if dropped > 0 {
            log!(INFO, "Dropped {} undispatched event(s)", dropped);
        }

        *state = LoopState::Stopped;
    }
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new(LoopConfig::default())
    }
}

impl Drop for EventLoop {
    fn drop(&mut self) {
        self.shutdown();
    }
}

mod dispatch_thread;
mod supervisor;
