//! Scene description types (the per-frame draw stream).
//!
//! Responsibilities:
//! - shape value types, one file per shape under `scene::shapes`
//! - `Renderable`: shape + world transform + material
//! - `CommandBuffer`: typed per-shape buckets, reused across frames
//! - `Frame`: the scoped handle application code draws through
//!
//! Extending the scene:
//! - add a new shape module under `scene::shapes::*`
//! - add a bucket for it to `CommandBuffer`
//! - implement `Shape` for it (bucket routing)
//! - teach the renderer how to draw it

mod buffer;
mod frame;
mod renderable;

pub mod shapes;

pub use buffer::CommandBuffer;
pub use frame::Frame;
pub use renderable::{renderable, Renderable};
pub use shapes::{Cuboid, Line, MeshData, MeshId, Rectangle, Shape, Sphere, StaticMesh, Vertex};
