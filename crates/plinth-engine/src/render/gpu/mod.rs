//! wgpu implementation of the render backend.
//!
//! `GpuState` lives as long as the window's surface; a `GpuContext` borrows it
//! together with the device and queue for one frame.

mod context;
mod shaders;
mod state;

pub use context::GpuContext;
pub use shaders::DEPTH_FORMAT;
pub use state::{GeometryHandle, GpuState};
