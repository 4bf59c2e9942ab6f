use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton as WinitButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use super::{ButtonState, InputEvent, Key, Modifiers, MouseButton, WheelDelta};

/// Converts a winit window event into an [`InputEvent`].
///
/// `scale_factor` is the window's current DPI scale; positions come out in
/// logical pixels. Events the input layer ignores (IME, touch, drops) map to
/// `None`.
pub(crate) fn translate_window_event(scale_factor: f64, event: &WindowEvent) -> Option<InputEvent> {
    let ev = match event {
        WindowEvent::ModifiersChanged(m) => {
            let s = m.state();
            InputEvent::Modifiers(Modifiers {
                shift: s.shift_key(),
                ctrl: s.control_key(),
                alt: s.alt_key(),
                meta: s.super_key(),
            })
        }
        WindowEvent::Focused(focused) => InputEvent::Focused(*focused),
        WindowEvent::CursorLeft { .. } => InputEvent::PointerLeft,
        WindowEvent::CursorMoved { position, .. } => {
            let (x, y) = logical(scale_factor, *position);
            InputEvent::PointerMoved { x, y }
        }
        WindowEvent::MouseInput { state, button, .. } => InputEvent::Button {
            button: mouse_button(*button),
            state: button_state(*state),
        },
        WindowEvent::MouseWheel { delta, .. } => InputEvent::Wheel(match *delta {
            MouseScrollDelta::LineDelta(x, y) => WheelDelta::Lines { x, y },
            MouseScrollDelta::PixelDelta(p) => {
                let (x, y) = logical(scale_factor, p);
                WheelDelta::Pixels { x, y }
            }
        }),
        WindowEvent::KeyboardInput { event, .. } => InputEvent::Key {
            key: key(event.physical_key),
            state: button_state(event.state),
            repeat: event.repeat,
        },
        _ => return None,
    };
    Some(ev)
}

fn logical(scale_factor: f64, pos: PhysicalPosition<f64>) -> (f32, f32) {
    let p = pos.to_logical::<f64>(scale_factor);
    (p.x as f32, p.y as f32)
}

fn button_state(state: ElementState) -> ButtonState {
    if state.is_pressed() { ButtonState::Pressed } else { ButtonState::Released }
}

fn mouse_button(button: WinitButton) -> MouseButton {
    match button {
        WinitButton::Left => MouseButton::Left,
        WinitButton::Right => MouseButton::Right,
        WinitButton::Middle => MouseButton::Middle,
        WinitButton::Back => MouseButton::Other(3),
        WinitButton::Forward => MouseButton::Other(4),
        WinitButton::Other(n) => MouseButton::Other(n),
    }
}

const LETTERS: [KeyCode; 26] = [
    KeyCode::KeyA, KeyCode::KeyB, KeyCode::KeyC, KeyCode::KeyD, KeyCode::KeyE, KeyCode::KeyF,
    KeyCode::KeyG, KeyCode::KeyH, KeyCode::KeyI, KeyCode::KeyJ, KeyCode::KeyK, KeyCode::KeyL,
    KeyCode::KeyM, KeyCode::KeyN, KeyCode::KeyO, KeyCode::KeyP, KeyCode::KeyQ, KeyCode::KeyR,
    KeyCode::KeyS, KeyCode::KeyT, KeyCode::KeyU, KeyCode::KeyV, KeyCode::KeyW, KeyCode::KeyX,
    KeyCode::KeyY, KeyCode::KeyZ,
];

const DIGITS: [KeyCode; 10] = [
    KeyCode::Digit0, KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3, KeyCode::Digit4,
    KeyCode::Digit5, KeyCode::Digit6, KeyCode::Digit7, KeyCode::Digit8, KeyCode::Digit9,
];

const FUNCTION_KEYS: [KeyCode; 12] = [
    KeyCode::F1, KeyCode::F2, KeyCode::F3, KeyCode::F4, KeyCode::F5, KeyCode::F6,
    KeyCode::F7, KeyCode::F8, KeyCode::F9, KeyCode::F10, KeyCode::F11, KeyCode::F12,
];

fn key(physical: PhysicalKey) -> Key {
    let PhysicalKey::Code(code) = physical else {
        return Key::Other(0);
    };

    let named = match code {
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::Enter | KeyCode::NumpadEnter => Some(Key::Enter),
        KeyCode::Tab => Some(Key::Tab),
        KeyCode::Backspace => Some(Key::Backspace),
        KeyCode::Space => Some(Key::Space),
        KeyCode::Delete => Some(Key::Delete),
        KeyCode::ArrowUp => Some(Key::Up),
        KeyCode::ArrowDown => Some(Key::Down),
        KeyCode::ArrowLeft => Some(Key::Left),
        KeyCode::ArrowRight => Some(Key::Right),
        KeyCode::ShiftLeft | KeyCode::ShiftRight => Some(Key::Shift),
        KeyCode::ControlLeft | KeyCode::ControlRight => Some(Key::Control),
        KeyCode::AltLeft | KeyCode::AltRight => Some(Key::Alt),
        KeyCode::SuperLeft | KeyCode::SuperRight => Some(Key::Meta),
        _ => None,
    };
    if let Some(k) = named {
        return k;
    }

    if let Some(i) = index_in(&LETTERS, code) {
        Key::Char((b'a' + i as u8) as char)
    } else if let Some(i) = index_in(&DIGITS, code) {
        Key::Char((b'0' + i as u8) as char)
    } else if let Some(i) = index_in(&FUNCTION_KEYS, code) {
        Key::F(i as u8 + 1)
    } else {
        Key::Other(code as u32)
    }
}

fn index_in(table: &[KeyCode], code: KeyCode) -> Option<usize> {
    table.iter().position(|c| *c == code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_and_digits_become_chars() {
        assert_eq!(key(PhysicalKey::Code(KeyCode::KeyS)), Key::Char('s'));
        assert_eq!(key(PhysicalKey::Code(KeyCode::KeyZ)), Key::Char('z'));
        assert_eq!(key(PhysicalKey::Code(KeyCode::Digit7)), Key::Char('7'));
    }

    #[test]
    fn function_keys_are_numbered_from_one() {
        assert_eq!(key(PhysicalKey::Code(KeyCode::F1)), Key::F(1));
        assert_eq!(key(PhysicalKey::Code(KeyCode::F12)), Key::F(12));
    }

    #[test]
    fn named_keys_fold_left_and_right() {
        assert_eq!(key(PhysicalKey::Code(KeyCode::ShiftRight)), Key::Shift);
        assert_eq!(key(PhysicalKey::Code(KeyCode::NumpadEnter)), Key::Enter);
        assert_eq!(key(PhysicalKey::Code(KeyCode::Escape)), Key::Escape);
    }

    #[test]
    fn positions_are_logical() {
        assert_eq!(logical(2.0, PhysicalPosition::new(200.0, 50.0)), (100.0, 25.0));
    }
}
