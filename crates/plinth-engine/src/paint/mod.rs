//! Appearance model shared between the scene and the renderers.
//!
//! Scope:
//! - color representation (linear RGB, no alpha; this system does no blending)
//! - materials (color + render mode + procedural pattern scale)
//!
//! Geometry types live in `scene::shapes`.

pub mod color;
pub mod material;

pub use color::Color;
pub use material::{Material, DEFAULT_MATERIAL_COLOR, DEFAULT_PATTERN_GRID_SIZE};
