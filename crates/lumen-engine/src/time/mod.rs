//! Frame timing.
//!
//! The runtime owns one [`FrameClock`] and ticks it once per `display` call.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
