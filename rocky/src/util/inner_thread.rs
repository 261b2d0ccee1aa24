use std::sync::{Mutex, PoisonError};
use std::thread;

/// A join handle that can be set once and joined from `&self`.
#[derive(Debug, Default)]
pub struct InnerThread(Mutex<Option<thread::JoinHandle<()>>>);

impl InnerThread {
    pub fn new(join_handle: thread::JoinHandle<()>) -> Self {
        Self(Mutex::new(Some(join_handle)))
    }

    pub fn set(&self, join_handle: thread::JoinHandle<()>) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = Some(join_handle);
    }

    pub fn is_set(&self) -> bool {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).is_some()
    }

    /// Joins the thread if there is one. Returns `false` if the thread panicked.
    pub fn join(&self) -> bool {
        let join_handle = self.0.lock().unwrap_or_else(PoisonError::into_inner).take();

        match join_handle {
            Some(join_handle) => join_handle.join().is_ok(),
            None => true,
        }
    }
}
