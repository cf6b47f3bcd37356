//! Core engine-facing contracts.
//!
//! This module defines the stable interface between the runtime (platform loop)
//! and applications, plus the per-window scene state that the runtime owns on
//! their behalf.

mod app;
mod ctx;
mod scene;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, SetupCtx, WindowCtx};
pub use scene::WindowScene;
