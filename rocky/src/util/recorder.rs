use std::sync::{Arc, mpsc, Mutex};
use std::time::Duration;

use crate::event::{Event, EventReceiver};

/// Forwards every event it receives to the test thread.
pub struct Recorder {
    sender: Mutex<mpsc::Sender<Box<dyn Event>>>,
    receiver: Mutex<mpsc::Receiver<Box<dyn Event>>>,
}

impl Recorder {
    pub fn new() -> Arc<Self> {
        let (sender, receiver) = mpsc::channel();
        Arc::new(Self {
            sender: Mutex::new(sender),
            receiver: Mutex::new(receiver),
        })
    }

    pub fn next(&self) -> Option<Box<dyn Event>> {
        self.receiver.lock().unwrap().recv_timeout(Duration::from_secs(1)).ok()
    }

    pub fn next_within(&self, timeout: Duration) -> Option<Box<dyn Event>> {
        self.receiver.lock().unwrap().recv_timeout(timeout).ok()
    }
}

impl EventReceiver for Recorder {
    fn process_event(&self, event: Box<dyn Event>) {
        self.sender.lock().unwrap().send(event).ok();
    }
}
