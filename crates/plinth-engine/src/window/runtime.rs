use anyhow::{Context, Result};
use std::collections::HashMap;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::WindowId;

use crate::core::{App, AppControl};
use crate::device::GpuInit;
use crate::render::RendererConfig;

use super::entry::WindowEntry;

/// Settings of one window.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    /// Requested MSAA sample count; lowered to 1 if the adapter cannot do it.
    pub sample_count: u32,
    pub renderer: RendererConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "plinth".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            sample_count: 4,
            renderer: RendererConfig::default(),
        }
    }
}

/// Requests an app can make from `on_frame`.
///
/// They take effect once the callback has returned.
#[derive(Default)]
pub struct RuntimeCtx {
    requests: Vec<Request>,
}

impl RuntimeCtx {
    pub fn open_window(&mut self, config: RuntimeConfig) {
        self.requests.push(Request::Open(config));
    }

    pub fn close_window(&mut self, id: WindowId) {
        self.requests.push(Request::Close(id));
    }

    pub fn exit(&mut self) {
        self.requests.push(Request::Exit);
    }
}

enum Request {
    Open(RuntimeConfig),
    Close(WindowId),
    Exit,
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the first window from `initial` and drives the event loop until
    /// the app exits or the last window closes.
    pub fn run<A>(initial: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: App + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut handler = Host {
            pending_first: Some(initial),
            gpu_init,
            app,
            windows: HashMap::new(),
        };

        event_loop
            .run_app(&mut handler)
            .context("winit event loop terminated with error")
    }
}

struct Host<A: App> {
    /// Config of the first window, taken on the first `resumed`.
    pending_first: Option<RuntimeConfig>,
    gpu_init: GpuInit,
    app: A,
    windows: HashMap<WindowId, WindowEntry>,
}

impl<A: App> Host<A> {
    fn open(&mut self, event_loop: &ActiveEventLoop, config: RuntimeConfig) -> Result<()> {
        let entry = WindowEntry::open(event_loop, config, self.gpu_init.clone(), &mut self.app)?;
        let id = entry.id();
        entry.request_redraw();
        self.windows.insert(id, entry);
        log::debug!("window {id:?} opened");
        Ok(())
    }

    fn close(&mut self, id: WindowId) {
        if let Some(entry) = self.windows.remove(&id) {
            entry.close();
            log::debug!("window {id:?} closed");
        }
    }

    fn close_all(&mut self) {
        let ids: Vec<WindowId> = self.windows.keys().copied().collect();
        for id in ids {
            self.close(id);
        }
    }

    /// Applies app requests; exits once no window is left.
    fn apply(&mut self, event_loop: &ActiveEventLoop, runtime: RuntimeCtx) {
        for request in runtime.requests {
            match request {
                Request::Open(config) => {
                    if let Err(e) = self.open(event_loop, config) {
                        log::error!("failed to open window: {e:#}");
                        event_loop.exit();
                    }
                }
                Request::Close(id) => self.close(id),
                Request::Exit => event_loop.exit(),
            }
        }

        if self.windows.is_empty() {
            event_loop.exit();
        }
    }
}

impl<A: App> ApplicationHandler for Host<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some(config) = self.pending_first.take() else {
            return;
        };

        if let Err(e) = self.open(event_loop, config) {
            log::error!("failed to open initial window: {e:#}");
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if event_loop.exiting() {
            return;
        }

        // Continuous redraw.
        for entry in self.windows.values() {
            entry.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        if event_loop.exiting() {
            return;
        }

        let Some(entry) = self.windows.get_mut(&id) else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                self.close(id);
                if self.windows.is_empty() {
                    event_loop.exit();
                }
            }
            WindowEvent::Resized(size) => entry.resize(Some(size)),
            WindowEvent::ScaleFactorChanged { .. } => entry.resize(None),
            WindowEvent::RedrawRequested => {
                let mut runtime = RuntimeCtx::default();
                if entry.frame(&mut self.app, &mut runtime) == AppControl::Exit {
                    runtime.exit();
                }
                self.apply(event_loop, runtime);
            }
            other => {
                if entry.deliver_input(&other, &mut self.app) == AppControl::Exit {
                    event_loop.exit();
                }
            }
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.close_all();
    }
}
