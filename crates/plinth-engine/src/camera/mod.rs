//! Camera pose and projection.
//!
//! Conventions:
//! - right-handed world space, +Y is the canonical world-up axis
//! - the camera looks down its local -Z axis; local +Y is up, local +X is right
//! - clip-space depth is `[0, 1]` (wgpu)

mod camera;
mod projection;

pub use camera::{Camera, DEFAULT_FOV_Y};
pub use projection::infinite_perspective;
