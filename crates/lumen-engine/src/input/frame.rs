use std::collections::HashSet;

use super::types::{InputEvent, Key, MouseButton};

/// Pixel wheel deltas are converted to lines at this rate.
pub const PIXELS_PER_LINE: f32 = 20.0;

/// What happened since the previous `display`.
///
/// Transitions and accumulated motion only; held state lives in
/// [`InputState`](super::InputState). The runtime clears it after every frame.
#[derive(Debug, Default)]
pub struct InputFrame {
    pub events: Vec<InputEvent>,

    pub keys_pressed: HashSet<Key>,
    pub keys_released: HashSet<Key>,
    pub buttons_pressed: HashSet<MouseButton>,
    pub buttons_released: HashSet<MouseButton>,

    /// Summed pointer motion, logical pixels.
    pub pointer_delta: (f32, f32),
    /// Summed wheel motion, lines.
    pub wheel_lines: (f32, f32),
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.events.clear();
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.buttons_pressed.clear();
        self.buttons_released.clear();
        self.pointer_delta = (0.0, 0.0);
        self.wheel_lines = (0.0, 0.0);
    }

    /// True if `key` went down this frame (repeats excluded).
    #[inline]
    pub fn key_pressed(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key)
    }

    #[inline]
    pub fn button_pressed(&self, button: MouseButton) -> bool {
        self.buttons_pressed.contains(&button)
    }
}
