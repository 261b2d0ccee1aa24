use std::io;

use thiserror::Error;

use crate::event::EventKind;

#[derive(Debug, Error)]
pub enum EventError {
    #[error("{0:?} event has no receiver")]
    NoReceiver(EventKind),
    #[error("event loop is already running")]
    AlreadyStarted,
    #[error("event loop has been terminated")]
    Terminated,
    #[error("could not spawn thread: {0}")]
    Spawn(#[from] io::Error),
    #[error("event handler panicked: {0}")]
    HandlerPanicked(String),
}
