//! Keyboard and pointer input.
//!
//! The runtime converts each winit event into an [`InputEvent`] and folds it
//! into the held [`InputState`] and this frame's [`InputFrame`]. No winit type
//! appears in the public API.

mod frame;
mod state;
mod types;

pub(crate) mod translate;

pub use frame::{InputFrame, PIXELS_PER_LINE};
pub use state::InputState;
pub use types::{ButtonState, InputEvent, Key, Modifiers, MouseButton, WheelDelta};
