use std::collections::HashSet;

use super::frame::{InputFrame, PIXELS_PER_LINE};
use super::types::{ButtonState, InputEvent, Key, Modifiers, MouseButton, WheelDelta};

/// Held keys and buttons, pointer position and modifiers.
#[derive(Debug, Default)]
pub struct InputState {
    pub modifiers: Modifiers,
    pub focused: bool,

    /// Logical pixels; `None` while the pointer is outside the window.
    pub pointer_pos: Option<(f32, f32)>,

    pub keys_down: HashSet<Key>,
    pub buttons_down: HashSet<MouseButton>,
}

/// Inserts into / removes from `held`, recording the edge in `pressed` / `released`.
fn track<T>(held: &mut HashSet<T>, pressed: &mut HashSet<T>, released: &mut HashSet<T>, item: T, state: ButtonState)
where
    T: Copy + Eq + std::hash::Hash,
{
    match state {
        ButtonState::Pressed if held.insert(item) => {
            pressed.insert(item);
        }
        ButtonState::Released if held.remove(&item) => {
            released.insert(item);
        }
        _ => {}
    }
}

impl InputState {
    /// Folds `ev` into the held state and records this frame's deltas.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match ev {
            InputEvent::Modifiers(m) => self.modifiers = m,

            InputEvent::Focused(focused) => {
                self.focused = focused;
                // Releases are not delivered while unfocused.
                if !focused {
                    self.keys_down.clear();
                    self.buttons_down.clear();
                }
            }

            InputEvent::PointerMoved { x, y } => {
                if let Some((px, py)) = self.pointer_pos.replace((x, y)) {
                    frame.pointer_delta.0 += x - px;
                    frame.pointer_delta.1 += y - py;
                }
            }

            InputEvent::PointerLeft => self.pointer_pos = None,

            InputEvent::Key { key, state, .. } => track(
                &mut self.keys_down,
                &mut frame.keys_pressed,
                &mut frame.keys_released,
                key,
                state,
            ),

            InputEvent::Button { button, state } => track(
                &mut self.buttons_down,
                &mut frame.buttons_pressed,
                &mut frame.buttons_released,
                button,
                state,
            ),

            InputEvent::Wheel(delta) => {
                let (dx, dy) = match delta {
                    WheelDelta::Lines { x, y } => (x, y),
                    WheelDelta::Pixels { x, y } => (x / PIXELS_PER_LINE, y / PIXELS_PER_LINE),
                };
                frame.wheel_lines.0 += dx;
                frame.wheel_lines.1 += dy;
            }
        }

        frame.events.push(ev);
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moved(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerMoved { x, y }
    }

    fn key(key: Key, state: ButtonState) -> InputEvent {
        InputEvent::Key { key, state, repeat: false }
    }

    #[test]
    fn pointer_delta_accumulates_after_first_sample() {
        let (mut s, mut f) = (InputState::default(), InputFrame::default());
        s.apply_event(&mut f, moved(10.0, 10.0));
        assert_eq!(f.pointer_delta, (0.0, 0.0));
        s.apply_event(&mut f, moved(13.0, 8.0));
        s.apply_event(&mut f, moved(15.0, 9.0));
        assert_eq!(f.pointer_delta, (5.0, -1.0));
        assert_eq!(f.events.len(), 3);
    }

    #[test]
    fn pointer_left_breaks_delta_chain() {
        let (mut s, mut f) = (InputState::default(), InputFrame::default());
        s.apply_event(&mut f, moved(0.0, 0.0));
        s.apply_event(&mut f, InputEvent::PointerLeft);
        s.apply_event(&mut f, moved(100.0, 100.0));
        assert_eq!(f.pointer_delta, (0.0, 0.0));
    }

    #[test]
    fn wheel_pixels_convert_to_lines() {
        let (mut s, mut f) = (InputState::default(), InputFrame::default());
        s.apply_event(&mut f, InputEvent::Wheel(WheelDelta::Lines { x: 0.0, y: 1.0 }));
        s.apply_event(&mut f, InputEvent::Wheel(WheelDelta::Pixels { x: 0.0, y: -40.0 }));
        assert_eq!(f.wheel_lines, (0.0, -1.0));
    }

    #[test]
    fn key_transitions_are_edge_triggered() {
        let (mut s, mut f) = (InputState::default(), InputFrame::default());
        let k = Key::Char('s');
        s.apply_event(&mut f, key(k, ButtonState::Pressed));
        s.apply_event(&mut f, key(k, ButtonState::Pressed));
        assert!(f.key_pressed(k));
        assert!(s.key_down(k));

        f.clear();
        s.apply_event(&mut f, key(k, ButtonState::Pressed));
        assert!(!f.key_pressed(k));

        s.apply_event(&mut f, key(k, ButtonState::Released));
        assert!(f.keys_released.contains(&k));
        assert!(!s.key_down(k));
    }

    #[test]
    fn focus_loss_releases_everything() {
        let (mut s, mut f) = (InputState::default(), InputFrame::default());
        s.apply_event(&mut f, key(Key::Char('a'), ButtonState::Pressed));
        s.apply_event(&mut f, InputEvent::Button { button: MouseButton::Left, state: ButtonState::Pressed });
        assert!(f.button_pressed(MouseButton::Left));
        assert!(s.button_down(MouseButton::Left));

        s.apply_event(&mut f, InputEvent::Focused(false));
        assert!(!s.key_down(Key::Char('a')));
        assert!(!s.button_down(MouseButton::Left));
    }

    #[test]
    fn clear_resets_motion_and_edges() {
        let (mut s, mut f) = (InputState::default(), InputFrame::default());
        s.apply_event(&mut f, moved(0.0, 0.0));
        s.apply_event(&mut f, moved(4.0, 0.0));
        s.apply_event(&mut f, key(Key::Space, ButtonState::Pressed));
        f.clear();
        assert_eq!(f.pointer_delta, (0.0, 0.0));
        assert!(f.events.is_empty() && f.keys_pressed.is_empty());
        assert!(s.key_down(Key::Space));
    }
}
