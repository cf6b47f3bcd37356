use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use bytemuck::{Pod, Zeroable};

use crate::scene::{CommandBuffer, Renderable};

/// Interleaved vertex: position followed by normal.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Default, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    /// Number of floats per vertex in the flat interleaved layout.
    pub const FLOATS: usize = 6;

    #[inline]
    pub const fn new(position: [f32; 3], normal: [f32; 3]) -> Self {
        Self { position, normal }
    }
}

/// Process-unique identity of one mesh data allocation.
///
/// Two `StaticMesh` values share an id exactly when one was cloned from the
/// other. Equal vertex data built twice gets two ids.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(u64);

impl MeshId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MeshId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mesh#{}", self.0)
    }
}

/// Immutable vertex/index data shared by every clone of a [`StaticMesh`].
#[derive(Debug)]
pub struct MeshData {
    id: MeshId,
    vertices: Vec<Vertex>,
    faces: Vec<u32>,
}

impl MeshData {
    #[inline]
    pub fn id(&self) -> MeshId {
        self.id
    }

    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Triangle list indices, three per face.
    #[inline]
    pub fn faces(&self) -> &[u32] {
        &self.faces
    }
}

/// Arbitrary indexed triangle mesh.
///
/// Cloning is cheap and shares the underlying data; the GPU upload for that
/// data is reused by every clone.
#[derive(Debug, Clone)]
pub struct StaticMesh {
    data: Arc<MeshData>,
}

impl StaticMesh {
    /// Builds a mesh from interleaved position+normal floats (six per vertex)
    /// and triangle index triples.
    ///
    /// Trailing floats that do not form a whole vertex are ignored.
    pub fn new(vertices_and_normals: Vec<f32>, faces: Vec<u32>) -> Self {
        let chunks = vertices_and_normals.chunks_exact(Vertex::FLOATS);
        debug_assert!(
            chunks.remainder().is_empty(),
            "vertex data length {} is not a multiple of {}",
            vertices_and_normals.len(),
            Vertex::FLOATS
        );

        let vertices = chunks
            .map(|c| Vertex::new([c[0], c[1], c[2]], [c[3], c[4], c[5]]))
            .collect();

        Self::from_vertices(vertices, faces)
    }

    pub fn from_vertices(vertices: Vec<Vertex>, faces: Vec<u32>) -> Self {
        debug_assert!(faces.len() % 3 == 0, "face index count must be a multiple of 3");
        debug_assert!(
            faces.iter().all(|&i| (i as usize) < vertices.len()),
            "face index out of range"
        );

        Self {
            data: Arc::new(MeshData { id: MeshId::next(), vertices, faces }),
        }
    }

    #[inline]
    pub fn id(&self) -> MeshId {
        self.data.id
    }

    #[inline]
    pub fn data(&self) -> &MeshData {
        &self.data
    }

    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.data.vertices
    }

    #[inline]
    pub fn faces(&self) -> &[u32] {
        &self.data.faces
    }

    /// Weak reference to the shared data; upgrades fail once every clone is gone.
    #[inline]
    pub fn downgrade(&self) -> Weak<MeshData> {
        Arc::downgrade(&self.data)
    }

    /// Whether both values share the same underlying data.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

impl CommandBuffer {
    /// Records a static mesh.
    #[inline]
    pub fn push_mesh(&mut self, renderable: Renderable<StaticMesh>) {
        self.meshes.push(renderable);
    }

    /// Static meshes in push order.
    #[inline]
    pub fn meshes(&self) -> &[Renderable<StaticMesh>] {
        &self.meshes
    }

    #[inline]
    pub fn meshes_mut(&mut self) -> &mut Vec<Renderable<StaticMesh>> {
        &mut self.meshes
    }
}
