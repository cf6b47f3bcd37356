//! In-memory backend that records every call, for renderer tests.

use std::collections::HashSet;

use super::backend::{Culling, DrawCount, Geometry, PipelineKind, RenderBackend, Topology};
use super::uniforms::{DrawUniforms, FrameUniforms};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Upload { handle: u32, vertices: usize, indices: Option<usize>, topology: Topology },
    Destroy(u32),
    BeginFrame(FrameUniforms),
    SetPipeline(PipelineKind, Culling),
    Bind(u32),
    Unbind,
    Draw(DrawUniforms, DrawCount),
}

#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub calls: Vec<Call>,
    pub live: HashSet<u32>,
    next_handle: u32,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn uploads(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, Call::Upload { .. })).count()
    }

    pub fn destroyed(&self) -> Vec<u32> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Destroy(h) => Some(*h),
                _ => None,
            })
            .collect()
    }

    pub fn draws(&self) -> Vec<(DrawUniforms, DrawCount)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Draw(u, n) => Some((*u, *n)),
                _ => None,
            })
            .collect()
    }

    pub fn frame_uniforms(&self) -> Option<FrameUniforms> {
        self.calls.iter().rev().find_map(|c| match c {
            Call::BeginFrame(u) => Some(*u),
            _ => None,
        })
    }

    /// Forgets recorded calls; live handles are kept.
    pub fn reset(&mut self) {
        self.calls.clear();
    }
}

impl RenderBackend for RecordingBackend {
    type Handle = u32;

    fn upload(&mut self, geometry: &Geometry<'_>) -> u32 {
        let handle = self.next_handle;
        self.next_handle += 1;
        self.live.insert(handle);
        self.calls.push(Call::Upload {
            handle,
            vertices: geometry.vertices.len(),
            indices: geometry.indices.map(<[u32]>::len),
            topology: geometry.topology,
        });
        handle
    }

    fn destroy(&mut self, handle: u32) {
        assert!(self.live.remove(&handle), "double destroy of handle {handle}");
        self.calls.push(Call::Destroy(handle));
    }

    fn begin_frame(&mut self, uniforms: &FrameUniforms) {
        self.calls.push(Call::BeginFrame(*uniforms));
    }

    fn set_pipeline(&mut self, kind: PipelineKind, culling: Culling) {
        self.calls.push(Call::SetPipeline(kind, culling));
    }

    fn bind(&mut self, handle: u32) {
        assert!(self.live.contains(&handle), "bind of dead handle {handle}");
        self.calls.push(Call::Bind(handle));
    }

    fn unbind(&mut self) {
        self.calls.push(Call::Unbind);
    }

    fn draw(&mut self, uniforms: &DrawUniforms, count: DrawCount) {
        self.calls.push(Call::Draw(*uniforms, count));
    }
}
