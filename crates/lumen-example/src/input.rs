use lumen_engine::input::{InputFrame, InputState, Key, MouseButton};
use lumen_engine::math::VecF3;

use crate::settings::ExampleSettings;

/// Camera parameters for one `display` call.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraInput {
    /// Rotation about X, Y and Z in degrees.
    pub rotation: VecF3,
    pub view_dist: f32,
    pub screenshot_requested: bool,
}

/// Mouse orbit + wheel zoom, fed from the runtime's input snapshots.
#[derive(Debug, Clone)]
pub struct OrbitInput {
    rotation: VecF3,
    view_dist: f32,
    screenshot_requested: bool,

    rotation_sensitivity: f32,
    zoom_sensitivity: f32,
    view_dist_range: (f32, f32),
}

impl OrbitInput {
    pub fn new(settings: &ExampleSettings) -> Self {
        Self {
            rotation: settings.initial_rotation,
            view_dist: settings.initial_view_dist,
            screenshot_requested: false,
            rotation_sensitivity: settings.rotation_sensitivity,
            zoom_sensitivity: settings.zoom_sensitivity,
            view_dist_range: settings.view_dist_range,
        }
    }

    /// Folds this frame's input in and returns the camera for the frame.
    ///
    /// Left drag: vertical motion turns about X, horizontal about Y.
    /// Wheel: moves the camera along its view axis. `S` or `F12`: screenshot.
    pub fn update(&mut self, state: &InputState, frame: &InputFrame) -> CameraInput {
        if state.button_down(MouseButton::Left) {
            let (dx, dy) = frame.pointer_delta;
            self.rotation[0] = wrap_degrees(self.rotation[0] + dy * self.rotation_sensitivity);
            self.rotation[1] = wrap_degrees(self.rotation[1] + dx * self.rotation_sensitivity);
        }

        let (_, wheel) = frame.wheel_lines;
        if wheel != 0.0 {
            let (lo, hi) = self.view_dist_range;
            self.view_dist = (self.view_dist + wheel * self.zoom_sensitivity).clamp(lo, hi);
        }

        if frame.key_pressed(Key::Char('s')) || frame.key_pressed(Key::F(12)) {
            self.screenshot_requested = true;
        }

        self.snapshot()
    }

    pub fn snapshot(&self) -> CameraInput {
        CameraInput {
            rotation: self.rotation,
            view_dist: self.view_dist,
            screenshot_requested: self.screenshot_requested,
        }
    }

    /// Called once the screenshot was taken so the next frame does not repeat it.
    pub fn clear_screenshot(&mut self) {
        self.screenshot_requested = false;
    }
}

fn wrap_degrees(deg: f32) -> f32 {
    deg.rem_euclid(360.0)
}

#[cfg(test)]
mod tests {
    use lumen_engine::input::{ButtonState, InputEvent, WheelDelta};

    use super::*;

    fn orbit() -> OrbitInput {
        let settings = ExampleSettings {
            initial_rotation: VecF3::zero(),
            initial_view_dist: -3.0,
            rotation_sensitivity: 0.5,
            zoom_sensitivity: 1.0,
            view_dist_range: (-10.0, -1.0),
            ..ExampleSettings::default()
        };
        OrbitInput::new(&settings)
    }

    fn press_left(state: &mut InputState, frame: &mut InputFrame) {
        let ev = InputEvent::Button { button: MouseButton::Left, state: ButtonState::Pressed };
        state.apply_event(frame, ev);
    }

    fn move_to(state: &mut InputState, frame: &mut InputFrame, x: f32, y: f32) {
        state.apply_event(frame, InputEvent::PointerMoved { x, y });
    }

    fn wheel(state: &mut InputState, frame: &mut InputFrame, lines: f32) {
        state.apply_event(frame, InputEvent::Wheel(WheelDelta::Lines { x: 0.0, y: lines }));
    }

    #[test]
    fn drag_rotates_about_x_and_y() {
        let mut input = orbit();
        let (mut state, mut frame) = (InputState::default(), InputFrame::default());

        move_to(&mut state, &mut frame, 100.0, 100.0);
        press_left(&mut state, &mut frame);
        move_to(&mut state, &mut frame, 120.0, 90.0);

        let cam = input.update(&state, &frame);
        assert_eq!(cam.rotation, VecF3::new(355.0, 10.0, 0.0));
    }

    #[test]
    fn hover_without_button_does_not_rotate() {
        let mut input = orbit();
        let (mut state, mut frame) = (InputState::default(), InputFrame::default());

        move_to(&mut state, &mut frame, 0.0, 0.0);
        move_to(&mut state, &mut frame, 50.0, 50.0);

        assert_eq!(input.update(&state, &frame).rotation, VecF3::zero());
    }

    #[test]
    fn wheel_zooms_within_range() {
        let mut input = orbit();
        let (mut state, mut frame) = (InputState::default(), InputFrame::default());

        wheel(&mut state, &mut frame, 1.5);
        assert_eq!(input.update(&state, &frame).view_dist, -1.5);

        frame.clear();
        wheel(&mut state, &mut frame, 5.0);
        assert_eq!(input.update(&state, &frame).view_dist, -1.0);

        frame.clear();
        wheel(&mut state, &mut frame, -100.0);
        assert_eq!(input.update(&state, &frame).view_dist, -10.0);
    }

    #[test]
    fn screenshot_request_latches_until_cleared() {
        let mut input = orbit();
        let (mut state, mut frame) = (InputState::default(), InputFrame::default());

        state.apply_event(
            &mut frame,
            InputEvent::Key { key: Key::F(12), state: ButtonState::Pressed, repeat: false },
        );
        assert!(input.update(&state, &frame).screenshot_requested);

        frame.clear();
        assert!(input.update(&state, &frame).screenshot_requested);

        input.clear_screenshot();
        assert!(!input.update(&state, &frame).screenshot_requested);
    }

    #[test]
    fn angles_wrap_into_one_turn() {
        assert_eq!(wrap_degrees(370.0), 10.0);
        assert_eq!(wrap_degrees(-90.0), 270.0);
    }
}
