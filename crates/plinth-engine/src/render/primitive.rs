use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::backend::{DrawCount, Geometry, RenderBackend};

/// Handles waiting to be destroyed.
///
/// GPU handles belong to the graphics context and may only be freed while it
/// is current. Dropping a [`GpuPrimitive`] therefore only queues its handle
/// here; [`GarbagePile::collect`] frees the queue through a backend.
pub struct GarbagePile<H> {
    pending: RefCell<Vec<H>>,
}

impl<H> Default for GarbagePile<H> {
    fn default() -> Self {
        Self { pending: RefCell::new(Vec::new()) }
    }
}

impl<H: fmt::Debug> fmt::Debug for GarbagePile<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GarbagePile").field("pending", &self.pending.borrow()).finish()
    }
}

impl<H> GarbagePile<H> {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn defer(&self, handle: H) {
        self.pending.borrow_mut().push(handle);
    }

    #[inline]
    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Destroys every queued handle. Returns how many were destroyed.
    pub fn collect<B>(&self, backend: &mut B) -> usize
    where
        B: RenderBackend<Handle = H>,
    {
        let drained = std::mem::take(&mut *self.pending.borrow_mut());
        let n = drained.len();
        for handle in drained {
            backend.destroy(handle);
        }
        n
    }
}

/// Uploaded geometry plus the counts needed to draw it.
///
/// Owns its handle: on drop the handle goes to the garbage pile it was
/// created with.
pub struct GpuPrimitive<H: Copy> {
    handle: H,
    vertex_count: u32,
    index_count: Option<u32>,
    garbage: Rc<GarbagePile<H>>,
}

impl<H: Copy + fmt::Debug> fmt::Debug for GpuPrimitive<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GpuPrimitive")
            .field("handle", &self.handle)
            .field("vertex_count", &self.vertex_count)
            .field("index_count", &self.index_count)
            .finish()
    }
}

impl<H: Copy> GpuPrimitive<H> {
    pub fn create<B>(backend: &mut B, geometry: &Geometry<'_>, garbage: &Rc<GarbagePile<H>>) -> Self
    where
        B: RenderBackend<Handle = H>,
    {
        Self {
            handle: backend.upload(geometry),
            vertex_count: geometry.vertices.len() as u32,
            index_count: geometry.indices.map(|i| i.len() as u32),
            garbage: Rc::clone(garbage),
        }
    }

    #[inline]
    pub fn handle(&self) -> H {
        self.handle
    }

    /// Element count for drawing the whole primitive.
    #[inline]
    pub fn draw_count(&self) -> DrawCount {
        match self.index_count {
            Some(n) => DrawCount::Indexed(n),
            None => DrawCount::Vertices(self.vertex_count),
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// `None` for non-indexed geometry.
    #[inline]
    pub fn index_count(&self) -> Option<u32> {
        self.index_count
    }

    #[inline]
    pub fn bind<B: RenderBackend<Handle = H>>(&self, backend: &mut B) {
        backend.bind(self.handle);
    }

    #[inline]
    pub fn unbind<B: RenderBackend<Handle = H>>(&self, backend: &mut B) {
        backend.unbind();
    }
}

impl<H: Copy> Drop for GpuPrimitive<H> {
    fn drop(&mut self) {
        self.garbage.defer(self.handle);
    }
}
