//! Wraps raw winit input notifications into typed events.

use std::collections::HashSet;
use std::sync::Arc;

use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, VirtualKeyCode, WindowEvent};

use crate::event::{Action, CursorEvent, Event, EventReceiver, Key, KeyEvent, Modifiers, MouseButton, MouseButtonEvent, ScrollEvent};
use crate::queue::EventQueue;

/// Pixel deltas (touchpads) are converted to lines at this rate.
pub const PIXELS_PER_LINE: f64 = 20.0;

/// Turns window events into typed events addressed to one receiver.
///
/// Keeps the state winit does not report per event: which modifiers are held, and which
/// keys are already down so that auto-repeat shows up as `Action::Repeat`.
pub struct InputTranslator {
    receiver: Arc<dyn EventReceiver>,
    modifiers: Modifiers,
    held_keys: HashSet<u32>,
}

impl InputTranslator {
    pub fn new(receiver: Arc<dyn EventReceiver>) -> Self {
        Self {
            receiver,
            modifiers: Modifiers::none(),
            held_keys: HashSet::new(),
        }
    }

    pub fn set_receiver(&mut self, receiver: Arc<dyn EventReceiver>) {
        self.receiver = receiver;
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Returns `None` for window events that carry no input. Losing focus releases every
    /// held key and modifier, since their release events go to another window.
    pub fn translate(&mut self, event: &WindowEvent) -> Option<Box<dyn Event>> {
        let translated: Box<dyn Event> = match event {
            WindowEvent::KeyboardInput { input, .. } => {
                Box::new(self.key(input.scancode, input.virtual_keycode, input.state))
            },
            WindowEvent::MouseInput { state, button, .. } => {
                Box::new(self.mouse_button(*button, *state))
            },
            WindowEvent::CursorMoved { position, .. } => {
                Box::new(CursorEvent::new(f64::from(position.x), f64::from(position.y)).with_receiver(self.receiver.clone()))
            },
            WindowEvent::MouseWheel { delta, .. } => {
                let (x_offset, y_offset) = scroll_offsets(*delta);
                Box::new(ScrollEvent::new(x_offset, y_offset).with_receiver(self.receiver.clone()))
            },
            WindowEvent::Focused(false) => {
                self.release_all();
                return None;
            },
            _ => return None,
        };

        Some(translated)
    }

    /// Translates `event` and pushes the result. Returns whether anything was pushed.
    pub fn push_window_event(&mut self, queue: &EventQueue, event: &WindowEvent) -> bool {
        match self.translate(event) {
            Some(event) => {
                queue.push(event);
                true
            },
            None => false,
        }
    }

    fn key(&mut self, scancode: u32, code: Option<VirtualKeyCode>, state: ElementState) -> KeyEvent {
        let action = match state {
            ElementState::Pressed => {
                if self.held_keys.insert(scancode) {
                    Action::Press
                } else {
                    Action::Repeat
                }
            },
            ElementState::Released => {
                self.held_keys.remove(&scancode);
                Action::Release
            },
        };

        if let Some(code) = code {
            self.update_modifiers(code, action != Action::Release);
        }

        let key = code.map(key_from).unwrap_or(Key::Other(scancode));
        KeyEvent::new(key, scancode, action, self.modifiers).with_receiver(self.receiver.clone())
    }

    fn mouse_button(&self, button: WinitMouseButton, state: ElementState) -> MouseButtonEvent {
        MouseButtonEvent::new(mouse_button_from(button), action_from(state), self.modifiers)
            .with_receiver(self.receiver.clone())
    }

    fn release_all(&mut self) {
        self.held_keys.clear();
        self.modifiers = Modifiers::none();
    }

    fn update_modifiers(&mut self, code: VirtualKeyCode, held: bool) {
        match code {
            VirtualKeyCode::LShift | VirtualKeyCode::RShift => self.modifiers.shift = held,
            VirtualKeyCode::LControl | VirtualKeyCode::RControl => self.modifiers.control = held,
            VirtualKeyCode::LAlt | VirtualKeyCode::RAlt => self.modifiers.alt = held,
            VirtualKeyCode::LWin | VirtualKeyCode::RWin => self.modifiers.logo = held,
            _ => (),
        }
    }
}

pub fn action_from(state: ElementState) -> Action {
    match state {
        ElementState::Pressed => Action::Press,
        ElementState::Released => Action::Release,
    }
}

pub fn mouse_button_from(button: WinitMouseButton) -> MouseButton {
    match button {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        WinitMouseButton::Other(other) => MouseButton::Other(other as u16),
    }
}

pub fn scroll_offsets(delta: MouseScrollDelta) -> (f64, f64) {
    match delta {
        MouseScrollDelta::LineDelta(x, y) => (x as f64, y as f64),
        MouseScrollDelta::PixelDelta(position) => (position.x / PIXELS_PER_LINE, position.y / PIXELS_PER_LINE),
    }
}

pub fn key_from(code: VirtualKeyCode) -> Key {
    use winit::event::VirtualKeyCode::*;

    match code {
        Escape => Key::Escape,
        Return => Key::Enter,
        Tab => Key::Tab,
        Back => Key::Backspace,
        Space => Key::Space,
        Left => Key::Left,
        Right => Key::Right,
        Up => Key::Up,
        Down => Key::Down,

        Key1 => Key::Char('1'), Key2 => Key::Char('2'), Key3 => Key::Char('3'),
        Key4 => Key::Char('4'), Key5 => Key::Char('5'), Key6 => Key::Char('6'),
        Key7 => Key::Char('7'), Key8 => Key::Char('8'), Key9 => Key::Char('9'),
        Key0 => Key::Char('0'),

        A => Key::Char('a'), B => Key::Char('b'), C => Key::Char('c'), D => Key::Char('d'),
        E => Key::Char('e'), F => Key::Char('f'), G => Key::Char('g'), H => Key::Char('h'),
        I => Key::Char('i'), J => Key::Char('j'), K => Key::Char('k'), L => Key::Char('l'),
        M => Key::Char('m'), N => Key::Char('n'), O => Key::Char('o'), P => Key::Char('p'),
        Q => Key::Char('q'), R => Key::Char('r'), S => Key::Char('s'), T => Key::Char('t'),
        U => Key::Char('u'), V => Key::Char('v'), W => Key::Char('w'), X => Key::Char('x'),
        Y => Key::Char('y'), Z => Key::Char('z'),

        other => Key::Other(other as u32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use winit::dpi::{LogicalPosition, PhysicalPosition};
    use winit::event::{DeviceId, KeyboardInput, ModifiersState, TouchPhase};

    use crate::event::EventKind;
    use crate::util::recorder::Recorder;

    fn device_id() -> DeviceId {
        unsafe { DeviceId::dummy() }
    }

    #[allow(deprecated)]
    fn keyboard_input(scancode: u32, code: Option<VirtualKeyCode>, state: ElementState) -> WindowEvent<'static> {
        WindowEvent::KeyboardInput {
            device_id: device_id(),
            input: KeyboardInput {
                scancode,
                state,
                virtual_keycode: code,
                modifiers: ModifiersState::default(),
            },
            is_synthetic: false,
        }
    }

    #[allow(deprecated)]
    fn mouse_wheel(delta: MouseScrollDelta) -> WindowEvent<'static> {
        WindowEvent::MouseWheel {
            device_id: device_id(),
            delta,
            phase: TouchPhase::Moved,
            modifiers: ModifiersState::default(),
        }
    }

    #[allow(deprecated)]
    fn cursor_moved(x: i32, y: i32) -> WindowEvent<'static> {
        WindowEvent::CursorMoved {
            device_id: device_id(),
            position: PhysicalPosition { x, y },
            modifiers: ModifiersState::default(),
        }
    }

    #[test]
    fn test_key_from() {
        assert_eq!(key_from(VirtualKeyCode::Escape), Key::Escape);
        assert_eq!(key_from(VirtualKeyCode::Return), Key::Enter);
        assert_eq!(key_from(VirtualKeyCode::Back), Key::Backspace);
        assert_eq!(key_from(VirtualKeyCode::Q), Key::Char('q'));
        assert_eq!(key_from(VirtualKeyCode::Key0), Key::Char('0'));
        assert_eq!(key_from(VirtualKeyCode::F1), Key::Other(VirtualKeyCode::F1 as u32));
    }

    #[test]
    fn test_mouse_and_action() {
        assert_eq!(mouse_button_from(WinitMouseButton::Left), MouseButton::Left);
        assert_eq!(mouse_button_from(WinitMouseButton::Other(8)), MouseButton::Other(8));
        assert_eq!(action_from(ElementState::Pressed), Action::Press);
        assert_eq!(action_from(ElementState::Released), Action::Release);
    }

    #[test]
    fn test_scroll_offsets() {
        assert_eq!(scroll_offsets(MouseScrollDelta::LineDelta(0.0, -2.0)), (0.0, -2.0));
    }

    #[test]
    fn test_scroll_offsets_scale_pixels() {
        let delta = MouseScrollDelta::PixelDelta(LogicalPosition { x: 40.0, y: -10.0 });
        assert_eq!(scroll_offsets(delta), (40.0 / PIXELS_PER_LINE, -10.0 / PIXELS_PER_LINE));
    }

    #[test]
    fn test_push_window_events() {
        let recorder = Recorder::new();
        let mut translator = InputTranslator::new(recorder.clone());
        let queue = EventQueue::new();

        assert!(translator.push_window_event(&queue, &cursor_moved(120, 45)));
        assert!(translator.push_window_event(&queue, &mouse_wheel(MouseScrollDelta::LineDelta(0.0, 3.0))));
        assert!(translator.push_window_event(&queue, &mouse_wheel(MouseScrollDelta::PixelDelta(LogicalPosition { x: 20.0, y: 0.0 }))));
        assert!(translator.push_window_event(&queue, &keyboard_input(1, Some(VirtualKeyCode::Escape), ElementState::Pressed)));
        assert_eq!(queue.len(), 4);

        let cursor = queue.pull();
        let cursor = cursor.downcast_ref::<CursorEvent>().expect("Not a CursorEvent");
        assert_eq!((cursor.x, cursor.y), (120.0, 45.0));

        let lines = queue.pull();
        let lines = lines.downcast_ref::<ScrollEvent>().expect("Not a ScrollEvent");
        assert_eq!((lines.x_offset, lines.y_offset), (0.0, 3.0));

        let pixels = queue.pull();
        let pixels = pixels.downcast_ref::<ScrollEvent>().expect("Not a ScrollEvent");
        assert_eq!((pixels.x_offset, pixels.y_offset), (1.0, 0.0));

        let key = queue.pull();
        assert!(key.receiver().is_some());
        let key = key.downcast_ref::<KeyEvent>().expect("Not a KeyEvent");
        assert_eq!(key.key, Key::Escape);
        assert_eq!(key.action, Action::Press);
    }

    #[test]
    fn test_non_input_window_events_are_ignored() {
        let recorder = Recorder::new();
        let mut translator = InputTranslator::new(recorder.clone());
        let queue = EventQueue::new();

        assert!(translator.translate(&WindowEvent::Focused(true)).is_none());
        assert!(!translator.push_window_event(&queue, &WindowEvent::Focused(true)));
        assert!(!translator.push_window_event(&queue, &WindowEvent::CursorLeft { device_id: device_id() }));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_focus_loss_releases_held_keys() {
        let recorder = Recorder::new();
        let mut translator = InputTranslator::new(recorder.clone());

        translator.translate(&keyboard_input(42, Some(VirtualKeyCode::LShift), ElementState::Pressed));
        translator.translate(&keyboard_input(30, Some(VirtualKeyCode::A), ElementState::Pressed));
        assert!(translator.modifiers().shift);

        assert!(translator.translate(&WindowEvent::Focused(false)).is_none());
        assert!(translator.modifiers().is_empty());

        let pressed = translator.translate(&keyboard_input(30, Some(VirtualKeyCode::A), ElementState::Pressed))
            .expect("Key press was not translated");
        let pressed = pressed.downcast_ref::<KeyEvent>().expect("Not a KeyEvent");
        assert_eq!(pressed.action, Action::Press);
        assert!(!pressed.modifiers.shift);
    }

    #[test]
    fn test_key_repeat_and_modifiers() {
        let recorder = Recorder::new();
        let mut translator = InputTranslator::new(recorder.clone());

        let shift = translator.key(42, Some(VirtualKeyCode::LShift), ElementState::Pressed);
        assert_eq!(shift.action, Action::Press);
        assert!(translator.modifiers().shift);

        let first = translator.key(30, Some(VirtualKeyCode::A), ElementState::Pressed);
        let repeat = translator.key(30, Some(VirtualKeyCode::A), ElementState::Pressed);
        let release = translator.key(30, Some(VirtualKeyCode::A), ElementState::Released);

        assert_eq!(first.key, Key::Char('a'));
        assert_eq!(first.action, Action::Press);
        assert!(first.modifiers.shift);
        assert_eq!(repeat.action, Action::Repeat);
        assert_eq!(release.action, Action::Release);

        translator.key(42, Some(VirtualKeyCode::LShift), ElementState::Released);
        assert!(translator.modifiers().is_empty());

        let unknown = translator.key(200, None, ElementState::Pressed);
        assert_eq!(unknown.key, Key::Other(200));
        assert_eq!(unknown.kind(), EventKind::Key);
        assert!(unknown.receiver().is_some());
    }

    #[test]
    fn test_mouse_button_event_carries_modifiers() {
        let recorder = Recorder::new();
        let mut translator = InputTranslator::new(recorder.clone());

        translator.key(29, Some(VirtualKeyCode::LControl), ElementState::Pressed);
        let event = translator.mouse_button(WinitMouseButton::Right, ElementState::Pressed);

        assert_eq!(event.button, MouseButton::Right);
        assert_eq!(event.action, Action::Press);
        assert!(event.modifiers.control);

        Box::new(event).process().unwrap();
        assert_eq!(recorder.next().map(|e| e.kind()), Some(EventKind::MouseButton));
    }
}
