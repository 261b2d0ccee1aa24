#[macro_use]
pub mod log;

pub mod config;
pub mod event;
pub mod event_loop;
#[cfg(not(target_os = "android"))]
pub mod input;
pub mod queue;
pub mod util;

pub use self::config::{LoopConfig, PullStrategy, ShutdownPolicy};
pub use self::event::{BasicEvent, Event, EventError, EventKind, EventReceiver};
pub use self::event_loop::{EventLoop, QuitHandle};
pub use self::queue::EventQueue;
