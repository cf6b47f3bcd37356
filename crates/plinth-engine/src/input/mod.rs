//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! Runtime code is responsible for translating platform events into `InputEvent`s
//! and delivering them to the window's `EventHandlers`.

mod handler;
mod state;
mod types;

pub mod platform;

pub use handler::{EventHandler, EventHandlers, HandlerCtx, Propagation};
pub use state::InputState;
pub use types::{Action, InputEvent, Key, Modifiers, MouseButton, ScrollDelta};
