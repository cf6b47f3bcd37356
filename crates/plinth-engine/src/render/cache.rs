use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Weak;

use crate::scene::{MeshData, MeshId, StaticMesh};

use super::backend::{Geometry, RenderBackend};
use super::primitive::{GarbagePile, GpuPrimitive};

/// When cached mesh uploads are released.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum CachePolicy {
    /// Uploads live as long as the renderer.
    #[default]
    KeepForever,
    /// Uploads whose mesh data has no live `StaticMesh` left are released at
    /// the start of the next frame.
    EvictUnreachable,
}

struct CachedMesh<H: Copy> {
    primitive: GpuPrimitive<H>,
    source: Weak<MeshData>,
}

/// GPU uploads of static meshes, keyed by mesh data identity.
///
/// At most one upload exists per [`MeshId`]. Entries are created lazily on
/// first use.
pub struct MeshCache<H: Copy> {
    entries: HashMap<MeshId, CachedMesh<H>>,
    garbage: Rc<GarbagePile<H>>,
    uploads: u64,
}

impl<H: Copy> MeshCache<H> {
    pub fn new(garbage: Rc<GarbagePile<H>>) -> Self {
        Self { entries: HashMap::new(), garbage, uploads: 0 }
    }

    /// Returns the upload for `mesh`, creating it through `backend` on a miss.
    pub fn get_or_create<B>(&mut self, backend: &mut B, mesh: &StaticMesh) -> &GpuPrimitive<H>
    where
        B: RenderBackend<Handle = H>,
    {
        let garbage = &self.garbage;
        let uploads = &mut self.uploads;

        let entry = self.entries.entry(mesh.id()).or_insert_with(|| {
            let geometry = Geometry::indexed(mesh.vertices(), mesh.faces());
            let primitive = GpuPrimitive::create(backend, &geometry, garbage);
            *uploads += 1;
            log::debug!(
                "mesh cache: uploaded {} ({} vertices, {} triangles)",
                mesh.id(),
                mesh.vertices().len(),
                mesh.faces().len() / 3
            );
            CachedMesh { primitive, source: mesh.downgrade() }
        });

        &entry.primitive
    }

    #[inline]
    pub fn contains(&self, id: MeshId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Drops entries whose mesh data is no longer reachable. Their handles
    /// go to the garbage pile. Returns the number of evicted entries.
    pub fn evict_unreachable(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|id, cached| {
            let alive = cached.source.strong_count() > 0;
            if !alive {
                log::debug!("mesh cache: evicting {id}");
            }
            alive
        });
        before - self.entries.len()
    }

    /// Drops every entry (handles go to the garbage pile).
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Total uploads performed over the cache's lifetime.
    #[inline]
    pub fn upload_count(&self) -> u64 {
        self.uploads
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
