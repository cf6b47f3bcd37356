//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and Windows, and wires them to the GPU layer,
//! the input subsystem and the per-window scene.

mod entry;
mod runtime;

pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};
