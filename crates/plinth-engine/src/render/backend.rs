use std::fmt::Debug;

use crate::scene::Vertex;

use super::uniforms::{DrawUniforms, FrameUniforms};

/// Which fixed pipeline a draw goes through.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PipelineKind {
    /// Lit mesh shader, filled triangles.
    Filled,
    /// Unlit shader, triangle edges only.
    Wireframe,
    /// Unlit shader, line-list topology.
    Lines,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum Culling {
    #[default]
    None,
    Back,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Topology {
    Triangles,
    Lines,
}

/// How many elements of the bound geometry a draw consumes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DrawCount {
    Vertices(u32),
    Indexed(u32),
}

/// CPU-side geometry handed to [`RenderBackend::upload`].
#[derive(Debug, Copy, Clone)]
pub struct Geometry<'a> {
    pub vertices: &'a [Vertex],
    pub indices: Option<&'a [u32]>,
    pub topology: Topology,
}

impl<'a> Geometry<'a> {
    #[inline]
    pub fn triangles(vertices: &'a [Vertex]) -> Self {
        Self { vertices, indices: None, topology: Topology::Triangles }
    }

    #[inline]
    pub fn indexed(vertices: &'a [Vertex], indices: &'a [u32]) -> Self {
        Self { vertices, indices: Some(indices), topology: Topology::Triangles }
    }

    #[inline]
    pub fn lines(vertices: &'a [Vertex]) -> Self {
        Self { vertices, indices: None, topology: Topology::Lines }
    }

    /// The element count a full draw of this geometry uses.
    pub fn draw_count(&self) -> DrawCount {
        match self.indices {
            Some(indices) => DrawCount::Indexed(indices.len() as u32),
            None => DrawCount::Vertices(self.vertices.len() as u32),
        }
    }
}

/// The graphics context, as seen by the renderer.
///
/// Holding `&mut impl RenderBackend` means the context is current: resource
/// creation and destruction only happen through this trait, so they cannot
/// run against the wrong (or a torn-down) context.
///
/// Calls within a frame arrive in this order: `begin_frame`, then any number
/// of `set_pipeline` / `bind` / `draw`. Uploads and destroys may happen
/// before `begin_frame`.
pub trait RenderBackend {
    /// Opaque GPU geometry handle.
    type Handle: Copy + Eq + Debug;

    fn upload(&mut self, geometry: &Geometry<'_>) -> Self::Handle;

    fn destroy(&mut self, handle: Self::Handle);

    fn begin_frame(&mut self, uniforms: &FrameUniforms);

    fn set_pipeline(&mut self, kind: PipelineKind, culling: Culling);

    fn bind(&mut self, handle: Self::Handle);

    fn unbind(&mut self) {}

    fn draw(&mut self, uniforms: &DrawUniforms, count: DrawCount);
}
