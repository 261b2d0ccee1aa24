use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::event_loop::{DispatchFailure, FailureHook};

/// How the dispatch thread waits for events.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum PullStrategy {
    /// Spin on the non-blocking pull, yielding between empty pulls.
    Polling,
    /// Sleep on the queue until an event arrives, re-checking for termination at least
    /// every `timeout_ms`.
    Blocking { timeout_ms: u64 },
}

impl PullStrategy {
    pub fn blocking(timeout: Duration) -> Self {
        PullStrategy::Blocking {
            timeout_ms: timeout.as_millis() as u64,
        }
    }
}

impl Default for PullStrategy {
    fn default() -> Self {
        PullStrategy::Blocking { timeout_ms: 10 }
    }
}

/// What `EventLoop::shutdown` does about handlers that are still running.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum ShutdownPolicy {
    /// Wait up to `timeout_ms` for in-flight handlers to finish.
    Graceful { timeout_ms: u64 },
    /// Return immediately and leave in-flight handlers running.
    Detach,
}

impl ShutdownPolicy {
    pub fn graceful(timeout: Duration) -> Self {
        ShutdownPolicy::Graceful {
            timeout_ms: timeout.as_millis() as u64,
        }
    }
}

impl Default for ShutdownPolicy {
    fn default() -> Self {
        ShutdownPolicy::Graceful { timeout_ms: 1000 }
    }
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct LoopConfig {
    pub thread_name: String,
    pub pull: PullStrategy,
    pub shutdown: ShutdownPolicy,
    #[serde(skip)]
    pub on_failure: Option<FailureHook>,
}

impl LoopConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn thread_name(mut self, name: &str) -> Self {
        self.thread_name = name.to_string();
        self
    }

    pub fn pull(mut self, pull: PullStrategy) -> Self {
        self.pull = pull;
        self
    }

    pub fn shutdown(mut self, shutdown: ShutdownPolicy) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Called on the handler's thread whenever a dispatched event fails.
    pub fn on_failure<F>(mut self, hook: F) -> Self
    where
        F: Fn(&DispatchFailure) + Send + Sync + 'static,
    {
        self.on_failure = Some(Arc::new(hook));
        self
    }
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            thread_name: "rocky event loop".to_string(),
            pull: PullStrategy::default(),
            shutdown: ShutdownPolicy::default(),
            on_failure: None,
        }
    }
}

impl fmt::Debug for LoopConfig {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("LoopConfig")
            .field("thread_name", &self.thread_name)
            .field("pull", &self.pull)
            .field("shutdown", &self.shutdown)
            .field("on_failure", &self.on_failure.is_some())
            .finish()
    }
}
