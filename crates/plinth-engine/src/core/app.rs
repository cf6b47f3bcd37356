use winit::window::WindowId;

use crate::input::InputEvent;

use super::ctx::{FrameCtx, SetupCtx};

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by higher layers.
pub trait App {
    /// Called once for every new window, before its first frame.
    ///
    /// Typical work: register event handlers, place the camera.
    fn setup(&mut self, ctx: &mut SetupCtx<'_>) {
        let _ = ctx;
    }

    /// Called for input events that no event handler stopped.
    fn on_input(&mut self, window_id: WindowId, event: &InputEvent) -> AppControl {
        let _ = (window_id, event);
        AppControl::Continue
    }

    /// Called once per rendered frame per window.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
