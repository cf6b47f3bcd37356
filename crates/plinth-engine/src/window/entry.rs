use anyhow::{Context, Result};
use ouroboros::self_referencing;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl, FrameCtx, SetupCtx, WindowCtx, WindowScene};
use crate::device::{Gpu, GpuInit};
use crate::input::platform::{key_text, translate_window_event};
use crate::input::{EventHandlers, HandlerCtx, InputState, Propagation};
use crate::time::FrameClock;

use super::runtime::{RuntimeConfig, RuntimeCtx};

/// One open window with everything that renders into it.
///
/// The GPU surface borrows the window, so both live in one self-referencing
/// struct.
#[self_referencing]
pub(super) struct WindowEntry {
    input: InputState,
    clock: FrameClock,
    handlers: EventHandlers,
    scene: WindowScene,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

impl WindowEntry {
    /// Opens a window, binds a GPU context to it and runs `App::setup`.
    pub(super) fn open<A: App>(
        event_loop: &ActiveEventLoop,
        config: RuntimeConfig,
        gpu_init: GpuInit,
        app: &mut A,
    ) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title(config.title)
            .with_inner_size(config.initial_size);
        let window = event_loop.create_window(attrs).context("failed to create window")?;

        let mut entry = WindowEntryTryBuilder {
            input: InputState::default(),
            clock: FrameClock::new(),
            handlers: EventHandlers::new(),
            scene: WindowScene::new(config.renderer, config.sample_count),
            window,
            gpu_builder: |window: &Window| {
                pollster::block_on(Gpu::new(window, gpu_init)).context("GPU initialization failed")
            },
        }
        .try_build()?;

        entry.with_mut(|f| {
            app.setup(&mut SetupCtx {
                window: WindowCtx { id: f.window.id(), window: f.window },
                camera: f.scene.camera_mut(),
                handlers: f.handlers,
            });
        });

        Ok(entry)
    }

    pub(super) fn id(&self) -> WindowId {
        self.with_window(|w| w.id())
    }

    pub(super) fn request_redraw(&self) {
        self.with_window(|w| w.request_redraw());
    }

    /// Reconfigures the surface to the window's current inner size.
    pub(super) fn resize(&mut self, size: Option<PhysicalSize<u32>>) {
        let size = size.unwrap_or_else(|| self.with_window(|w| w.inner_size()));
        self.with_gpu_mut(|gpu| gpu.resize(size));
        self.request_redraw();
    }

    /// Input state first, then event handlers in order, then the app unless a
    /// handler stopped the event.
    pub(super) fn deliver_input<A: App>(&mut self, event: &WindowEvent, app: &mut A) -> AppControl {
        self.with_mut(|f| {
            let id = f.window.id();
            let viewport = f.gpu.viewport();
            let translated = translate_window_event(f.window.scale_factor(), &*f.input, event);

            let mut control = AppControl::Continue;
            for ev in translated.into_iter().chain(key_text(event)) {
                f.input.apply(&ev);

                let propagation = f.handlers.dispatch(
                    &mut HandlerCtx { camera: f.scene.camera_mut(), input: &*f.input, viewport },
                    &ev,
                );
                if propagation == Propagation::Continue && app.on_input(id, &ev) == AppControl::Exit {
                    control = AppControl::Exit;
                }
            }
            control
        })
    }

    /// Runs one frame: `before_frame` hooks, `App::on_frame`, `after_frame` hooks.
    pub(super) fn frame<A: App>(&mut self, app: &mut A, runtime: &mut RuntimeCtx) -> AppControl {
        self.with_mut(|f| {
            let time = f.clock.begin_frame();
            let viewport = f.gpu.viewport();

            f.handlers.before_frame(
                &mut HandlerCtx { camera: f.scene.camera_mut(), input: &*f.input, viewport },
                time.dt,
            );

            let control = app.on_frame(&mut FrameCtx {
                window: WindowCtx { id: f.window.id(), window: f.window },
                gpu: &mut *f.gpu,
                scene: &mut *f.scene,
                input: &*f.input,
                time,
                runtime: &mut *runtime,
            });

            f.handlers.after_frame(
                &mut HandlerCtx { camera: f.scene.camera_mut(), input: &*f.input, viewport },
                f.clock.frame_duration(),
            );

            control
        })
    }

    /// Releases GPU resources while the device is still alive. Consumes the
    /// entry, so the surface is dropped right after.
    pub(super) fn close(mut self) {
        self.with_mut(|f| f.scene.shutdown(f.gpu));
    }
}
