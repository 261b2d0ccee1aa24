use serde::{Deserialize, Serialize};

use rocky_derive::Event;

use crate::event::ReceiverSlot;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Action {
    Press,
    Release,
    Repeat,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Modifiers {
    pub shift: bool,
    pub control: bool,
    pub alt: bool,
    pub logo: bool,
}

impl Modifiers {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        !(self.shift || self.control || self.alt || self.logo)
    }
}

/// Keys with a meaning of their own. Letters and digits are `Char`, always lowercase;
/// everything else keeps the platform key code in `Other`.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Key {
    Escape,
    Enter,
    Tab,
    Backspace,
    Space,
    Left,
    Right,
    Up,
    Down,
    Char(char),
    Other(u32),
}

#[derive(Debug, Event)]
#[event_kind(Key)]
pub struct KeyEvent {
    pub key: Key,
    pub scancode: u32,
    pub action: Action,
    pub modifiers: Modifiers,
    receiver: ReceiverSlot,
}

impl KeyEvent {
    pub fn new(key: Key, scancode: u32, action: Action, modifiers: Modifiers) -> Self {
        Self {
            key,
            scancode,
            action,
            modifiers,
            receiver: ReceiverSlot::default(),
        }
    }
}

#[derive(Debug, Event)]
#[event_kind(MouseButton)]
pub struct MouseButtonEvent {
    pub button: MouseButton,
    pub action: Action,
    pub modifiers: Modifiers,
    receiver: ReceiverSlot,
}

impl MouseButtonEvent {
    pub fn new(button: MouseButton, action: Action, modifiers: Modifiers) -> Self {
        Self {
            button,
            action,
            modifiers,
            receiver: ReceiverSlot::default(),
        }
    }
}

/// Cursor position in window pixels, origin at the top left.
#[derive(Debug, Event)]
#[event_kind(Cursor)]
pub struct CursorEvent {
    pub x: f64,
    pub y: f64,
    receiver: ReceiverSlot,
}

impl CursorEvent {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            receiver: ReceiverSlot::default(),
        }
    }
}

/// Scroll offsets in lines. Positive `y_offset` scrolls up.
#[derive(Debug, Event)]
#[event_kind(Scroll)]
pub struct ScrollEvent {
    pub x_offset: f64,
    pub y_offset: f64,
    receiver: ReceiverSlot,
}

impl ScrollEvent {
    pub fn new(x_offset: f64, y_offset: f64) -> Self {
        Self {
            x_offset,
            y_offset,
            receiver: ReceiverSlot::default(),
        }
    }
}
