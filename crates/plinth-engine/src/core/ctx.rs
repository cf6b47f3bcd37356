use winit::window::{Window, WindowId};

use crate::camera::Camera;
use crate::coords::Viewport;
use crate::device::{Gpu, SurfaceErrorAction};
use crate::input::{EventHandler, EventHandlers, InputState};
use crate::render::{FrameStats, RenderCtx, RenderTarget};
use crate::scene::Frame;
use crate::time::FrameTime;
use crate::window::RuntimeCtx;

use super::app::AppControl;
use super::scene::WindowScene;

/// Per-window handles and immutable window metadata.
pub struct WindowCtx<'a> {
    pub id: WindowId,
    pub window: &'a Window,
}

impl<'a> WindowCtx<'a> {
    /// Logical window size as `(width, height)`.
    pub fn logical_size(&self) -> (f32, f32) {
        let logical: winit::dpi::LogicalSize<f64> =
            self.window.inner_size().to_logical(self.window.scale_factor());
        (logical.width as f32, logical.height as f32)
    }

    /// Drawable size in physical pixels.
    pub fn viewport(&self) -> Viewport {
        let size = self.window.inner_size();
        Viewport::new(size.width, size.height)
    }

    pub fn set_title(&self, title: &str) {
        self.window.set_title(title);
    }
}

/// Context passed to `core::App::setup`.
pub struct SetupCtx<'a> {
    pub window: WindowCtx<'a>,
    pub camera: &'a mut Camera,
    pub handlers: &'a mut EventHandlers,
}

impl SetupCtx<'_> {
    /// Registers an event handler for this window.
    pub fn add_handler(&mut self, handler: impl EventHandler + 'static) {
        self.handlers.push(handler);
    }
}

/// Per-frame context passed to `core::App::on_frame`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu<'w>,
    pub scene: &'a mut WindowScene,
    pub input: &'a InputState,
    pub time: FrameTime,
    pub runtime: &'a mut RuntimeCtx,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    #[inline]
    pub fn camera(&self) -> &Camera {
        self.scene.camera()
    }

    #[inline]
    pub fn camera_mut(&mut self) -> &mut Camera {
        self.scene.camera_mut()
    }

    /// Runs `draw` against a fresh [`Frame`], renders the recorded commands
    /// and presents.
    ///
    /// A minimized window or a transient surface error skips the frame.
    /// Renderer initialization failures and fatal surface errors return
    /// [`AppControl::Exit`].
    pub fn render<F>(&mut self, draw: F) -> AppControl
    where
        F: FnOnce(&mut Frame<'_>),
    {
        let viewport = self.gpu.viewport();
        if !viewport.is_valid() {
            return AppControl::Continue;
        }

        if let Err(err) = self.scene.ensure_gpu(&*self.gpu) {
            log::error!("renderer initialization failed: {err:#}");
            return AppControl::Exit;
        }

        let mut frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                return match self.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => AppControl::Exit,
                    _ => AppControl::Continue,
                };
            }
        };

        // RenderTarget borrows frame.encoder; dropped before submit() takes frame.
        let stats: FrameStats = {
            let rctx = RenderCtx::new(
                self.gpu.device(),
                self.gpu.queue(),
                self.gpu.surface_format(),
                viewport,
            );
            let mut target = RenderTarget::new(&mut frame.encoder, &frame.view);
            self.scene.draw(&rctx, &mut target, draw)
        };

        self.window.window.pre_present_notify();
        self.gpu.submit(frame);

        log::trace!("frame {}: {stats:?}", self.time.frame_index);
        AppControl::Continue
    }
}
