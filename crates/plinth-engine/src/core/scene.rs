use anyhow::Result;

use crate::camera::Camera;
use crate::device::Gpu;
use crate::paint::Color;
use crate::render::gpu::{GeometryHandle, GpuContext, GpuState, DEPTH_FORMAT};
use crate::render::{FrameStats, RenderCtx, RenderTarget, Renderer, RendererConfig};
use crate::scene::{CommandBuffer, Frame};

/// Everything one window needs to turn draw calls into pixels.
///
/// GPU resources are created on the first frame (the surface format is only
/// known once the window's GPU context exists) and released by
/// [`WindowScene::shutdown`] while that context is still alive.
pub struct WindowScene {
    config: RendererConfig,
    requested_samples: u32,

    camera: Camera,
    commands: CommandBuffer,

    gpu_state: Option<GpuState>,
    renderer: Option<Renderer<GeometryHandle>>,
    last_stats: FrameStats,
}

impl WindowScene {
    pub fn new(config: RendererConfig, sample_count: u32) -> Self {
        let mut camera = Camera::new();
        camera.set_fov_y(config.fov_y);

        Self {
            config,
            requested_samples: sample_count,
            camera,
            commands: CommandBuffer::new(),
            gpu_state: None,
            renderer: None,
            last_stats: FrameStats::default(),
        }
    }

    #[inline]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    #[inline]
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    #[inline]
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    #[inline]
    pub fn clear_color(&self) -> Color {
        self.config.clear_color
    }

    /// Statistics of the most recently rendered frame.
    #[inline]
    pub fn last_stats(&self) -> FrameStats {
        self.last_stats
    }

    /// Builds pipelines and uploads reference primitives if not done yet.
    pub fn ensure_gpu(&mut self, gpu: &Gpu<'_>) -> Result<()> {
        if self.renderer.is_some() {
            return Ok(());
        }

        let samples = gpu.supported_sample_count(self.requested_samples, DEPTH_FORMAT);
        let mut state = GpuState::new(gpu.device(), gpu.surface_format(), samples)?;

        let rctx = RenderCtx::new(gpu.device(), gpu.queue(), gpu.surface_format(), gpu.viewport());
        let renderer = Renderer::new(&mut GpuContext::new(&rctx, &mut state), self.config);

        self.gpu_state = Some(state);
        self.renderer = Some(renderer);
        Ok(())
    }

    /// Records `draw` into the command buffer, renders it into `target` and
    /// clears the buffer.
    pub fn draw<F>(&mut self, rctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, draw: F) -> FrameStats
    where
        F: FnOnce(&mut Frame<'_>),
    {
        let (Some(state), Some(renderer)) = (self.gpu_state.as_mut(), self.renderer.as_mut()) else {
            return FrameStats::default();
        };

        self.commands.record(draw);

        let mut backend = GpuContext::new(rctx, state);
        let stats = renderer.render(&mut backend, &mut self.commands, &self.camera, rctx.viewport);
        backend.finish(target, self.config.clear_color);

        self.last_stats = stats;
        stats
    }

    /// Releases GPU resources through `gpu`. Safe to call more than once.
    pub fn shutdown(&mut self, gpu: &Gpu<'_>) {
        let (Some(mut state), Some(renderer)) = (self.gpu_state.take(), self.renderer.take()) else {
            return;
        };

        let rctx = RenderCtx::new(gpu.device(), gpu.queue(), gpu.surface_format(), gpu.viewport());
        renderer.shutdown(&mut GpuContext::new(&rctx, &mut state));
    }
}
