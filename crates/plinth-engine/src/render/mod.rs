//! Rendering subsystem.
//!
//! The renderer consumes a `scene::CommandBuffer` and drives a `RenderBackend`.
//! The backend is the only path to GPU resources; `gpu` implements it over
//! wgpu, tests use an in-memory recorder.
//!
//! Convention:
//! - reference primitives are unit sized and centered at the origin
//! - per-draw size comes from a reference transform applied before the
//!   renderable's scale, rotation and translation

mod backend;
mod cache;
mod ctx;
mod geometry;
mod partition;
mod primitive;
mod renderer;
mod transform;
mod uniforms;

pub mod gpu;

#[cfg(test)]
pub(crate) mod testing;

pub use backend::{Culling, DrawCount, Geometry, PipelineKind, RenderBackend, Topology};
pub use cache::{CachePolicy, MeshCache};
pub use ctx::{RenderCtx, RenderTarget};
pub use geometry::{unit_cube, unit_line, unit_rectangle, unit_sphere};
pub use partition::{group_meshes, partition_wireframes};
pub use primitive::{GarbagePile, GpuPrimitive};
pub use renderer::{FrameStats, Renderer, RendererConfig};
pub use transform::{line_transform, model_transform, normal_transform, ReferenceShape};
pub use uniforms::{DrawUniforms, FrameUniforms};
