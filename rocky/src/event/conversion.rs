use crate::event::Event;

/// Turns a boxed concrete event into a `Box<dyn Event>`, including from inside the trait's
/// own default methods.
pub trait AsEvent {
    fn as_event(self: Box<Self>) -> Box<dyn Event>;
}

impl<T: 'static + Event> AsEvent for T {
    fn as_event(self: Box<Self>) -> Box<dyn Event> {
        self
    }
}
