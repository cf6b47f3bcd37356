use wgpu::util::DeviceExt;

use crate::coords::Viewport;
use crate::paint::Color;
use crate::render::backend::{Culling, DrawCount, Geometry, PipelineKind, RenderBackend};
use crate::render::uniforms::{DrawUniforms, FrameUniforms};
use crate::render::{RenderCtx, RenderTarget};
use crate::scene::Vertex;

use super::state::{GeometryBuffers, GeometryHandle, GpuState, PassCommand};

const PLACEHOLDER_VERTEX: [Vertex; 1] = [Vertex::new([0.0; 3], [0.0; 3])];

/// [`RenderBackend`] over wgpu for one frame.
///
/// Resource calls (`upload`, `destroy`) act on the device immediately. Draw
/// calls are recorded and replayed into a single render pass by
/// [`GpuContext::finish`].
pub struct GpuContext<'a> {
    device: &'a wgpu::Device,
    queue: &'a wgpu::Queue,
    viewport: Viewport,
    state: &'a mut GpuState,
}

impl<'a> GpuContext<'a> {
    pub fn new(ctx: &RenderCtx<'a>, state: &'a mut GpuState) -> Self {
        Self {
            device: ctx.device,
            queue: ctx.queue,
            viewport: ctx.viewport,
            state,
        }
    }

    /// Uploads this frame's uniforms and encodes the recorded draws into
    /// `target`, cleared to `clear` first.
    pub fn finish(self, target: &mut RenderTarget<'_>, clear: Color) {
        let Self { device, queue, viewport, state } = self;

        state.ensure_targets(device, viewport);
        state.upload_uniforms(device, queue);
        encode(state, target, clear);

        state.frame = None;
        state.commands.clear();
        state.draws.clear();
    }
}

impl RenderBackend for GpuContext<'_> {
    type Handle = GeometryHandle;

    fn upload(&mut self, geometry: &Geometry<'_>) -> GeometryHandle {
        // Zero-sized buffers cannot be bound; keep at least one element.
        let vertices: &[Vertex] = if geometry.vertices.is_empty() {
            &PLACEHOLDER_VERTEX
        } else {
            geometry.vertices
        };

        let vertex_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("plinth geometry vbo"),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = geometry.indices.map(|indices| {
            let indices: &[u32] = if indices.is_empty() { &[0] } else { indices };
            self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("plinth geometry ibo"),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            })
        });

        let buffers = GeometryBuffers { vertices: vertex_buffer, indices: index_buffer };
        let state = &mut *self.state;
        match state.free_slots.pop() {
            Some(slot) => {
                state.geometry[slot as usize] = Some(buffers);
                GeometryHandle(slot)
            }
            None => {
                state.geometry.push(Some(buffers));
                GeometryHandle((state.geometry.len() - 1) as u32)
            }
        }
    }

    fn destroy(&mut self, handle: GeometryHandle) {
        let Some(buffers) = self.state.geometry.get_mut(handle.0 as usize).and_then(Option::take)
        else {
            log::warn!("destroy of unknown geometry {handle:?}");
            return;
        };

        buffers.vertices.destroy();
        if let Some(indices) = buffers.indices {
            indices.destroy();
        }
        self.state.free_slots.push(handle.0);
    }

    fn begin_frame(&mut self, uniforms: &FrameUniforms) {
        self.state.frame = Some(*uniforms);
        self.state.commands.clear();
        self.state.draws.clear();
    }

    fn set_pipeline(&mut self, kind: PipelineKind, culling: Culling) {
        self.state.commands.push(PassCommand::SetPipeline(kind, culling));
    }

    fn bind(&mut self, handle: GeometryHandle) {
        self.state.commands.push(PassCommand::Bind(handle));
    }

    fn unbind(&mut self) {
        self.state.commands.push(PassCommand::Unbind);
    }

    fn draw(&mut self, uniforms: &DrawUniforms, count: DrawCount) {
        let slot = self.state.draws.len() as u32;
        self.state.draws.push(*uniforms);
        self.state.commands.push(PassCommand::Draw { slot, count });
    }
}

fn encode(state: &GpuState, target: &mut RenderTarget<'_>, clear: Color) {
    let Some(targets) = state.targets.as_ref() else { return };

    let (view, resolve_target, store) = match &targets.msaa {
        Some(msaa) => (msaa, Some(target.color_view), wgpu::StoreOp::Discard),
        None => (target.color_view, None, wgpu::StoreOp::Store),
    };

    let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("plinth scene pass"),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view,
            resolve_target,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(wgpu::Color {
                    r: clear.r() as f64,
                    g: clear.g() as f64,
                    b: clear.b() as f64,
                    a: 1.0,
                }),
                store,
            },
            depth_slice: None,
        })],
        depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
            view: &targets.depth,
            depth_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Clear(1.0),
                store: wgpu::StoreOp::Discard,
            }),
            stencil_ops: None,
        }),
        timestamp_writes: None,
        occlusion_query_set: None,
        multiview_mask: None,
    });

    if state.frame.is_none() {
        return;
    }

    let mut bound: Option<&GeometryBuffers> = None;
    for cmd in &state.commands {
        match *cmd {
            PassCommand::SetPipeline(kind, culling) => {
                rpass.set_pipeline(state.pipelines.get(kind, culling));
            }
            PassCommand::Bind(handle) => {
                bound = state.geometry.get(handle.0 as usize).and_then(Option::as_ref);
                match bound {
                    Some(g) => {
                        rpass.set_vertex_buffer(0, g.vertices.slice(..));
                        if let Some(indices) = &g.indices {
                            rpass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
                        }
                    }
                    None => log::warn!("bind of unknown geometry {handle:?}"),
                }
            }
            PassCommand::Unbind => bound = None,
            PassCommand::Draw { slot, count } => {
                if bound.is_none() {
                    continue;
                }
                let offset = (u64::from(slot) * state.draw_stride) as u32;
                rpass.set_bind_group(0, &state.bind_group, &[offset]);
                match count {
                    DrawCount::Vertices(n) => rpass.draw(0..n, 0..1),
                    DrawCount::Indexed(n) => rpass.draw_indexed(0..n, 0, 0..1),
                }
            }
        }
    }
}
