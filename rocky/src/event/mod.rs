use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::util::AsAny;
use self::conversion::AsEvent;

pub use self::error::EventError;
pub use self::input::{Action, CursorEvent, Key, KeyEvent, Modifiers, MouseButton, MouseButtonEvent, ScrollEvent};

/// Classifies events. `NotAnEvent` is what an empty queue hands out; the dispatch loop
/// never delivers it.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum EventKind {
    NotAnEvent,
    Key,
    MouseButton,
    Cursor,
    Scroll,
}

impl Default for EventKind {
    fn default() -> Self {
        EventKind::NotAnEvent
    }
}

/// Anything that can act on an event: widgets, windows, audio players and so on.
///
/// Receivers are shared between the producers that address them and the handler threads
/// that call them, so `process_event` takes `&self`.
pub trait EventReceiver: Send + Sync {
    fn process_event(&self, event: Box<dyn Event>);
}

/// Base trait for all events. Concrete events usually get it through `#[derive(Event)]`.
pub trait Event: AsAny + AsEvent + fmt::Debug + Send {
    fn kind(&self) -> EventKind;

    fn receiver(&self) -> Option<&Arc<dyn EventReceiver>>;

    /// Replaces the receiver, if any.
    fn set_receiver(&mut self, receiver: Arc<dyn EventReceiver>);

    fn with_receiver(mut self, receiver: Arc<dyn EventReceiver>) -> Self
    where
        Self: Sized,
    {
        self.set_receiver(receiver);
        self
    }

    fn is_event(&self) -> bool {
        self.kind() != EventKind::NotAnEvent
    }

    /// Hands the event to its receiver.
    fn process(self: Box<Self>) -> Result<(), EventError> {
        match self.receiver().cloned() {
            Some(receiver) => {
                receiver.process_event(self.as_event());
                Ok(())
            },
            None => Err(EventError::NoReceiver(self.kind())),
        }
    }
}

// Receivers downcast through these rather than `as_any()`, which on a `Box<dyn Event>`
// resolves to the box itself.
impl dyn Event + '_ {
    pub fn is<T: Event + 'static>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: Event + 'static>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

/// Holds the receiver reference of an event.
#[derive(Clone, Default)]
pub struct ReceiverSlot(Option<Arc<dyn EventReceiver>>);

impl ReceiverSlot {
    pub fn get(&self) -> Option<&Arc<dyn EventReceiver>> {
        self.0.as_ref()
    }

    pub fn set(&mut self, receiver: Arc<dyn EventReceiver>) {
        self.0 = Some(receiver);
    }

    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }
}

impl fmt::Debug for ReceiverSlot {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_set() {
            write!(f, "ReceiverSlot(set)")
        } else {
            write!(f, "ReceiverSlot(unset)")
        }
    }
}

/// An event with no payload. Its kind is chosen at construction.
#[derive(Debug, Default)]
pub struct BasicEvent {
    kind: EventKind,
    receiver: ReceiverSlot,
}

impl BasicEvent {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            receiver: ReceiverSlot::default(),
        }
    }

    /// The sentinel "not an event".
    pub fn empty() -> Self {
        Self::new(EventKind::NotAnEvent)
    }
}

impl Event for BasicEvent {
    fn kind(&self) -> EventKind {
        self.kind
    }

    fn receiver(&self) -> Option<&Arc<dyn EventReceiver>> {
        self.receiver.get()
    }

    fn set_receiver(&mut self, receiver: Arc<dyn EventReceiver>) {
        self.receiver.set(receiver);
    }
}

pub mod conversion;
pub mod error;
pub mod input;
