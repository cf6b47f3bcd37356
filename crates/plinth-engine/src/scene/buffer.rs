use super::shapes::{Cuboid, Line, Rectangle, Shape, Sphere, StaticMesh};
use super::{Frame, Renderable};

/// Recorded draw stream for one frame, bucketed by shape kind.
///
/// Performance characteristics:
/// - `push()` is O(1) amortized
/// - `clear()` keeps every bucket's capacity, so a warmed buffer does not
///   allocate per frame
///
/// Insertion order is preserved within each bucket. There is no ordering
/// between buckets; the renderer draws them kind by kind.
#[derive(Debug, Default)]
pub struct CommandBuffer {
    pub(in crate::scene) rectangles: Vec<Renderable<Rectangle>>,
    pub(in crate::scene) cuboids: Vec<Renderable<Cuboid>>,
    pub(in crate::scene) spheres: Vec<Renderable<Sphere>>,
    pub(in crate::scene) meshes: Vec<Renderable<StaticMesh>>,
    pub(in crate::scene) lines: Vec<Line>,
}

impl CommandBuffer {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a renderable to the bucket of its shape kind.
    #[inline]
    pub fn push<S: Shape>(&mut self, renderable: Renderable<S>) {
        S::bucket_mut(self).push(renderable);
    }

    /// The bucket for shape kind `S`, in push order.
    #[inline]
    pub fn bucket<S: Shape>(&self) -> &[Renderable<S>] {
        S::bucket(self)
    }

    #[inline]
    pub fn bucket_mut<S: Shape>(&mut self) -> &mut Vec<Renderable<S>> {
        S::bucket_mut(self)
    }

    /// Empties all buckets. Keeps allocated capacity for reuse.
    pub fn clear(&mut self) {
        self.rectangles.clear();
        self.cuboids.clear();
        self.spheres.clear();
        self.meshes.clear();
        self.lines.clear();
    }

    /// Total number of recorded items across all buckets.
    pub fn len(&self) -> usize {
        self.rectangles.len()
            + self.cuboids.len()
            + self.spheres.len()
            + self.meshes.len()
            + self.lines.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Runs `f` with a [`Frame`] writing into this buffer.
    ///
    /// The frame cannot outlive the call.
    #[inline]
    pub fn record<R>(&mut self, f: impl FnOnce(&mut Frame<'_>) -> R) -> R {
        let mut frame = Frame::new(self);
        f(&mut frame)
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::paint::{Color, Material};
    use crate::scene::renderable;

    // ── bucketing ──────────────────────────────────────────────────────────

    #[test]
    fn push_routes_by_kind() {
        let mut buf = CommandBuffer::new();
        buf.push(renderable(Rectangle::new(1.0, 2.0)));
        buf.push(renderable(Cuboid::cube(1.0)));
        buf.push(renderable(Sphere::new(0.5)));
        buf.push(renderable(Sphere::new(0.25)));

        assert_eq!(buf.rectangles().len(), 1);
        assert_eq!(buf.cuboids().len(), 1);
        assert_eq!(buf.spheres().len(), 2);
        assert!(buf.meshes().is_empty());
        assert_eq!(buf.len(), 4);
    }

    #[test]
    fn bucket_matches_typed_accessor() {
        let mut buf = CommandBuffer::new();
        buf.push(renderable(Sphere::new(3.0)));
        assert_eq!(buf.bucket::<Sphere>(), buf.spheres());
        assert!(buf.bucket::<Cuboid>().is_empty());
    }

    #[test]
    fn insertion_order_is_kept_within_kind() {
        let mut buf = CommandBuffer::new();
        for i in 0..5 {
            buf.push(renderable(Sphere::new(i as f32)));
        }
        let radii: Vec<f32> = buf.spheres().iter().map(|r| r.shape.radius).collect();
        assert_eq!(radii, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    }

    // ── lifecycle ──────────────────────────────────────────────────────────

    #[test]
    fn clear_keeps_capacity() {
        let mut buf = CommandBuffer::new();
        for _ in 0..32 {
            buf.push(renderable(Cuboid::cube(1.0)));
            buf.push_line(Line::new(Vec3::ZERO, Vec3::X));
        }
        let cuboid_cap = buf.cuboids.capacity();
        let line_cap = buf.lines.capacity();

        buf.clear();

        assert!(buf.is_empty());
        assert_eq!(buf.cuboids.capacity(), cuboid_cap);
        assert_eq!(buf.lines.capacity(), line_cap);
    }

    // ── frame ──────────────────────────────────────────────────────────────

    #[test]
    fn record_forwards_into_buffer() {
        let mut buf = CommandBuffer::new();
        let wire = Material::default().with_wireframe(true);

        let n = buf.record(|frame| {
            frame.draw(renderable(Cuboid::cube(1.0)).with_material(wire));
            frame.draw(renderable(Rectangle::new(2.0, 2.0)));
            frame.draw_line(Vec3::ZERO, Vec3::Y, Color::GREEN);
            3
        });

        assert_eq!(n, 3);
        assert_eq!(buf.cuboids().len(), 1);
        assert!(buf.cuboids()[0].material.wireframe);
        assert_eq!(buf.rectangles().len(), 1);
        assert_eq!(buf.lines(), &[Line::new(Vec3::ZERO, Vec3::Y).with_color(Color::GREEN)]);
    }
}
