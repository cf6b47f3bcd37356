//! Screen-space types shared between the runtime and the renderer.
//!
//! World-space math (vectors, quaternions, matrices) comes from `glam`.

mod viewport;

pub use viewport::Viewport;
