use anyhow::{Context, Result};
use wgpu::SurfaceError;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::coords::Viewport;

use super::surface::{self, Swapchain};
use super::{GpuFrame, GpuInit, SurfaceErrorAction};

/// The graphics context of one window: adapter, device, queue and the
/// swapchain. `'w` is the lifetime of the window the surface draws into.
pub struct Gpu<'w> {
    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,
    swapchain: Swapchain<'w>,

    /// Last size reported by the window. May be empty while minimized, in
    /// which case the swapchain keeps its previous size.
    size: Viewport,
}

impl<'w> Gpu<'w> {
    /// Creates the wgpu instance, adapter and device for `window` and
    /// configures its surface.
    pub async fn new(window: &'w Window, init: GpuInit) -> Result<Self> {
        let inner = window.inner_size();
        let size = Viewport::new(inner.width, inner.height);
        anyhow::ensure!(size.is_valid(), "window has zero size");

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window).context("failed to create wgpu surface")?;

        let adapter = request_adapter(&instance, &surface).await?;
        let (device, queue) = request_device(&adapter, &init).await?;

        let caps = surface.get_capabilities(&adapter);
        let format = surface::choose_surface_format(&caps, init.prefer_srgb)
            .context("no supported surface formats")?;

        let mut swapchain = Swapchain::new(
            surface,
            wgpu::SurfaceConfiguration {
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                format,
                width: size.width,
                height: size.height,
                present_mode: init.present_mode,
                alpha_mode: surface::choose_alpha_mode(&caps, init.alpha_mode),
                view_formats: Vec::new(),
                desired_maximum_frame_latency: init.desired_maximum_frame_latency,
            },
        );
        swapchain.configure(&device, size);
        log::debug!("surface configured: {format:?} {}x{}", size.width, size.height);

        Ok(Self { adapter, device, queue, swapchain, size })
    }

    #[inline]
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.swapchain.format()
    }

    /// Drawable size in physical pixels; empty while the window is minimized.
    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.size
    }

    #[inline]
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    #[inline]
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// `requested` if both the surface format and the depth format support
    /// that many samples, otherwise 1.
    pub fn supported_sample_count(&self, requested: u32, depth_format: wgpu::TextureFormat) -> u32 {
        if requested <= 1 {
            return 1;
        }

        let supports = |format| {
            self.adapter
                .get_texture_format_features(format)
                .flags
                .sample_count_supported(requested)
        };

        let color_format = self.surface_format();
        if supports(color_format) && supports(depth_format) {
            requested
        } else {
            log::warn!("{requested}x MSAA unsupported for {color_format:?}; disabled");
            1
        }
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.size = Viewport::new(new_size.width, new_size.height);
        if self.swapchain.configure(&self.device, self.size) {
            log::trace!("surface resized to {}x{}", self.size.width, self.size.height);
        }
    }

    /// Acquires the next surface texture and opens an encoder for it.
    pub fn begin_frame(&self) -> std::result::Result<GpuFrame, SurfaceError> {
        let surface_texture = self.swapchain.acquire()?;
        let view = surface_texture.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("plinth frame encoder"),
        });

        Ok(GpuFrame { surface_texture, view, encoder })
    }

    /// Submits the frame's commands and presents it.
    pub fn submit(&self, frame: GpuFrame) {
        let GpuFrame { surface_texture, view, encoder } = frame;
        self.queue.submit([encoder.finish()]);
        drop(view);
        surface_texture.present();
    }

    /// Recovers from a failed [`Gpu::begin_frame`] where possible.
    pub fn handle_surface_error(&mut self, err: SurfaceError) -> SurfaceErrorAction {
        if !self.size.is_valid() {
            return SurfaceErrorAction::SkipFrame;
        }
        self.swapchain.recover(&self.device, err)
    }
}

async fn request_adapter(instance: &wgpu::Instance, surface: &wgpu::Surface<'_>) -> Result<wgpu::Adapter> {
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(surface),
            force_fallback_adapter: false,
        })
        .await
        .context("failed to find a suitable GPU adapter")?;

    let info = adapter.get_info();
    log::info!("using adapter {} ({:?})", info.name, info.backend);
    Ok(adapter)
}

async fn request_device(adapter: &wgpu::Adapter, init: &GpuInit) -> Result<(wgpu::Device, wgpu::Queue)> {
    let features = init.features_for(adapter.features());
    if !features.contains(wgpu::Features::POLYGON_MODE_LINE) {
        log::debug!("adapter lacks POLYGON_MODE_LINE");
    }

    adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("plinth device"),
            required_features: features,
            required_limits: init.required_limits.clone(),
            experimental_features: wgpu::ExperimentalFeatures::disabled(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::Off,
        })
        .await
        .context("failed to create wgpu device/queue")
}
