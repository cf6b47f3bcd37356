//! Plinth engine crate.
//!
//! A small 3D rendering facade: applications describe each frame as a stream
//! of shapes, the renderer turns it into GPU draw calls, and the runtime owns
//! windows, input and the GPU context.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod camera;
pub mod coords;
pub mod render;
pub mod paint;
pub mod scene;

pub use crate::camera::Camera;
pub use crate::coords::Viewport;
pub use crate::core::{App, AppControl, FrameCtx, SetupCtx};
pub use crate::paint::{Color, Material};
pub use crate::scene::{renderable, Cuboid, Frame, Line, Rectangle, Renderable, Sphere, StaticMesh};
pub use crate::window::{Runtime, RuntimeConfig};

pub use glam;
