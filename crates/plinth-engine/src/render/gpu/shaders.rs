use std::num::NonZeroU64;

use anyhow::{bail, Result};

use crate::render::backend::{Culling, PipelineKind};
use crate::render::uniforms::{DrawUniforms, FrameUniforms};
use crate::scene::Vertex;

const MESH_SHADER: &str = concat!(include_str!("shaders/common.wgsl"), include_str!("shaders/mesh.wgsl"));
const LINE_SHADER: &str = concat!(include_str!("shaders/common.wgsl"), include_str!("shaders/line.wgsl"));

/// Depth attachment format of every pipeline.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

const VERTEX_ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
    0 => Float32x3, // position
    1 => Float32x3  // normal
];

fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRS,
    }
}

/// The fixed pipelines: lit mesh, unlit wireframe and unlit lines.
pub(super) struct Pipelines {
    pub bind_group_layout: wgpu::BindGroupLayout,
    filled: [wgpu::RenderPipeline; 2],
    wireframe: [wgpu::RenderPipeline; 2],
    lines: wgpu::RenderPipeline,
}

impl Pipelines {
    pub fn create(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        sample_count: u32,
    ) -> Result<Self> {
        let mesh = compile(device, "plinth mesh shader", MESH_SHADER)?;
        let line = compile(device, "plinth line shader", LINE_SHADER)?;

        let uniform_entry = |binding, size: usize, dynamic| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: dynamic,
                min_binding_size: NonZeroU64::new(size as u64),
            },
            count: None,
        };

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("plinth uniforms bgl"),
            entries: &[
                uniform_entry(0, std::mem::size_of::<FrameUniforms>(), false),
                uniform_entry(1, std::mem::size_of::<DrawUniforms>(), true),
            ],
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("plinth pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let line_polygons = device.features().contains(wgpu::Features::POLYGON_MODE_LINE);
        if !line_polygons {
            log::warn!("POLYGON_MODE_LINE unsupported; wireframes are drawn filled");
        }
        let wire_mode = if line_polygons { wgpu::PolygonMode::Line } else { wgpu::PolygonMode::Fill };

        let builder = PipelineBuilder { device, layout: &layout, format, sample_count };
        let tri = wgpu::PrimitiveTopology::TriangleList;

        Ok(Self {
            filled: [
                builder.build("plinth filled pipeline", &mesh, tri, wgpu::PolygonMode::Fill, None),
                builder.build(
                    "plinth filled culled pipeline",
                    &mesh,
                    tri,
                    wgpu::PolygonMode::Fill,
                    Some(wgpu::Face::Back),
                ),
            ],
            wireframe: [
                builder.build("plinth wireframe pipeline", &line, tri, wire_mode, None),
                builder.build(
                    "plinth wireframe culled pipeline",
                    &line,
                    tri,
                    wire_mode,
                    Some(wgpu::Face::Back),
                ),
            ],
            lines: builder.build(
                "plinth lines pipeline",
                &line,
                wgpu::PrimitiveTopology::LineList,
                wgpu::PolygonMode::Fill,
                None,
            ),
            bind_group_layout,
        })
    }

    pub fn get(&self, kind: PipelineKind, culling: Culling) -> &wgpu::RenderPipeline {
        let i = match culling {
            Culling::None => 0,
            Culling::Back => 1,
        };
        match kind {
            PipelineKind::Filled => &self.filled[i],
            PipelineKind::Wireframe => &self.wireframe[i],
            PipelineKind::Lines => &self.lines,
        }
    }
}

struct PipelineBuilder<'a> {
    device: &'a wgpu::Device,
    layout: &'a wgpu::PipelineLayout,
    format: wgpu::TextureFormat,
    sample_count: u32,
}

impl PipelineBuilder<'_> {
    fn build(
        &self,
        label: &str,
        shader: &wgpu::ShaderModule,
        topology: wgpu::PrimitiveTopology,
        polygon_mode: wgpu::PolygonMode,
        cull_mode: Option<wgpu::Face>,
    ) -> wgpu::RenderPipeline {
        self.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(self.layout),

            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[vertex_layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode,
                polygon_mode,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: self.sample_count,
                ..Default::default()
            },

            multiview_mask: None,
            cache: None,
        })
    }
}

/// Creates a shader module and fails on any compilation error.
fn compile(device: &wgpu::Device, label: &str, source: &str) -> Result<wgpu::ShaderModule> {
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    let info = pollster::block_on(module.get_compilation_info());
    let errors: Vec<String> = info
        .messages
        .iter()
        .filter(|m| matches!(m.message_type, wgpu::CompilationMessageType::Error))
        .map(|m| match &m.location {
            Some(loc) => format!("{}:{}: {}", loc.line_number, loc.line_position, m.message),
            None => m.message.clone(),
        })
        .collect();

    if !errors.is_empty() {
        bail!("{label} failed to compile:\n{}", errors.join("\n"));
    }
    Ok(module)
}
