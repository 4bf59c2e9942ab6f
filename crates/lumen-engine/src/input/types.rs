use std::fmt;

/// Physical key, named after its US-layout legend.
///
/// Letters and digits are `Char` in lowercase (`Key::Char('s')`), function
/// keys are `F(n)`. Anything unmapped is `Other` with the platform code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Char(char),
    F(u8),

    Escape,
    Enter,
    Tab,
    Backspace,
    Space,
    Delete,

    Up,
    Down,
    Left,
    Right,

    Shift,
    Control,
    Alt,
    Meta,

    Other(u32),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{}", c.to_ascii_uppercase()),
            Key::F(n) => write!(f, "F{n}"),
            Key::Other(code) => write!(f, "key#{code}"),
            named => write!(f, "{named:?}"),
        }
    }
}

/// Shared by keys and mouse buttons.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ButtonState {
    Pressed,
    Released,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }
}

/// Wheel motion; positive `y` scrolls away from the user.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum WheelDelta {
    Lines { x: f32, y: f32 },
    /// High-precision devices, in logical pixels.
    Pixels { x: f32, y: f32 },
}

/// Window-system independent input event. Positions are logical pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key { key: Key, state: ButtonState, repeat: bool },
    Button { button: MouseButton, state: ButtonState },
    PointerMoved { x: f32, y: f32 },
    PointerLeft,
    Wheel(WheelDelta),
    Modifiers(Modifiers),
    Focused(bool),
}
