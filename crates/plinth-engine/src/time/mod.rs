//! Time subsystem.
//!
//! One `FrameClock` per window:
//! - `begin_frame()` once per frame yields `FrameTime` (delta to the previous frame)
//! - `frame_duration()` after presenting gives the time the frame took

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
