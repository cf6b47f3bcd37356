use anyhow::{ensure, Result};

use crate::coords::Viewport;
use crate::render::backend::{Culling, DrawCount, PipelineKind};
use crate::render::uniforms::{DrawUniforms, FrameUniforms};

use super::shaders::{Pipelines, DEPTH_FORMAT};

/// Slot of an uploaded geometry in [`GpuState`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct GeometryHandle(pub(super) u32);

pub(super) struct GeometryBuffers {
    pub vertices: wgpu::Buffer,
    pub indices: Option<wgpu::Buffer>,
}

pub(super) struct FrameTargets {
    pub size: Viewport,
    pub depth: wgpu::TextureView,
    pub msaa: Option<wgpu::TextureView>,
}

/// Backend call recorded during a frame, replayed into the render pass.
#[derive(Debug, Copy, Clone)]
pub(super) enum PassCommand {
    SetPipeline(PipelineKind, Culling),
    Bind(GeometryHandle),
    Unbind,
    Draw { slot: u32, count: DrawCount },
}

/// Long-lived wgpu resources of the renderer.
///
/// Pipelines and bind groups are created once; depth/MSAA targets follow the
/// surface size; the per-draw uniform buffer grows on demand. Uploaded
/// geometry lives in a slot table indexed by [`GeometryHandle`].
pub struct GpuState {
    pub(super) format: wgpu::TextureFormat,
    pub(super) sample_count: u32,

    pub(super) pipelines: Pipelines,

    pub(super) frame_ubo: wgpu::Buffer,
    pub(super) draw_ubo: wgpu::Buffer,
    pub(super) draw_capacity: usize,
    pub(super) draw_stride: u64,
    pub(super) bind_group: wgpu::BindGroup,

    pub(super) geometry: Vec<Option<GeometryBuffers>>,
    pub(super) free_slots: Vec<u32>,

    pub(super) targets: Option<FrameTargets>,

    pub(super) frame: Option<FrameUniforms>,
    pub(super) commands: Vec<PassCommand>,
    pub(super) draws: Vec<DrawUniforms>,
    staging: Vec<u8>,
}

const MIN_DRAW_CAPACITY: usize = 64;

impl GpuState {
    /// Compiles shaders and builds pipelines for `format`.
    ///
    /// `sample_count` is 1 (no MSAA) or 4.
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat, sample_count: u32) -> Result<Self> {
        ensure!(
            matches!(sample_count, 1 | 4),
            "unsupported MSAA sample count {sample_count} (expected 1 or 4)"
        );

        let pipelines = Pipelines::create(device, format, sample_count)?;

        let align = u64::from(device.limits().min_uniform_buffer_offset_alignment);
        let draw_stride = (std::mem::size_of::<DrawUniforms>() as u64).next_multiple_of(align);

        let frame_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("plinth frame ubo"),
            size: std::mem::size_of::<FrameUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let draw_ubo = create_draw_ubo(device, MIN_DRAW_CAPACITY, draw_stride);
        let bind_group = create_bind_group(device, &pipelines, &frame_ubo, &draw_ubo);

        log::debug!(
            "gpu state ready: format={format:?} samples={sample_count} draw stride={draw_stride}"
        );

        Ok(Self {
            format,
            sample_count,
            pipelines,
            frame_ubo,
            draw_ubo,
            draw_capacity: MIN_DRAW_CAPACITY,
            draw_stride,
            bind_group,
            geometry: Vec::new(),
            free_slots: Vec::new(),
            targets: None,
            frame: None,
            commands: Vec::new(),
            draws: Vec::new(),
            staging: Vec::new(),
        })
    }

    #[inline]
    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    #[inline]
    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    /// Number of live geometry uploads.
    pub fn geometry_count(&self) -> usize {
        self.geometry.iter().filter(|g| g.is_some()).count()
    }

    pub(super) fn ensure_targets(&mut self, device: &wgpu::Device, viewport: Viewport) {
        let size = Viewport::new(viewport.width.max(1), viewport.height.max(1));
        if self.targets.as_ref().is_some_and(|t| t.size == size) {
            return;
        }

        let depth = create_attachment(device, "plinth depth target", size, DEPTH_FORMAT, self.sample_count);
        let msaa = (self.sample_count > 1).then(|| {
            create_attachment(device, "plinth msaa target", size, self.format, self.sample_count)
        });

        self.targets = Some(FrameTargets { size, depth, msaa });
    }

    /// Writes the frame and per-draw uniforms recorded this frame.
    pub(super) fn upload_uniforms(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) {
        if let Some(frame) = &self.frame {
            queue.write_buffer(&self.frame_ubo, 0, bytemuck::bytes_of(frame));
        }
        if self.draws.is_empty() {
            return;
        }

        self.ensure_draw_capacity(device, self.draws.len());

        let stride = self.draw_stride as usize;
        let size = std::mem::size_of::<DrawUniforms>();
        self.staging.clear();
        self.staging.resize(self.draws.len() * stride, 0);
        for (i, draw) in self.draws.iter().enumerate() {
            let at = i * stride;
            self.staging[at..at + size].copy_from_slice(bytemuck::bytes_of(draw));
        }

        queue.write_buffer(&self.draw_ubo, 0, &self.staging);
    }

    fn ensure_draw_capacity(&mut self, device: &wgpu::Device, required: usize) {
        if required <= self.draw_capacity {
            return;
        }

        let new_cap = required.next_power_of_two().max(MIN_DRAW_CAPACITY);
        self.draw_ubo = create_draw_ubo(device, new_cap, self.draw_stride);
        self.bind_group = create_bind_group(device, &self.pipelines, &self.frame_ubo, &self.draw_ubo);
        self.draw_capacity = new_cap;
    }
}

fn create_draw_ubo(device: &wgpu::Device, capacity: usize, stride: u64) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("plinth draw ubo"),
        size: capacity as u64 * stride,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_bind_group(
    device: &wgpu::Device,
    pipelines: &Pipelines,
    frame_ubo: &wgpu::Buffer,
    draw_ubo: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("plinth uniforms bind group"),
        layout: &pipelines.bind_group_layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_ubo.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: draw_ubo,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<DrawUniforms>() as u64),
                }),
            },
        ],
    })
}

fn create_attachment(
    device: &wgpu::Device,
    label: &str,
    size: Viewport,
    format: wgpu::TextureFormat,
    sample_count: u32,
) -> wgpu::TextureView {
    device
        .create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: size.width,
                height: size.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        })
        .create_view(&wgpu::TextureViewDescriptor::default())
}
